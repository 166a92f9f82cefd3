//! Triangulation of monotone faces.
//!
//! After the sweep every interior face is monotone with respect to the
//! sweep direction: its boundary splits into an upper and a lower
//! chain, both advancing from left to right. Such a face is cut into
//! triangles by a single walk along both chains, adding diagonals with
//! [`Mesh::connect`]; no new vertices or intersections can appear.
use log::debug;

use crate::error::Result;
use crate::geom::{edge_sign, vert_leq};
use crate::mesh::{sym, Mesh, F_HEAD};

/// Triangulate the monotone face `face`.
///
/// The face must have at least three edges. Starting from the
/// rightmost vertex, triangles are cut from whichever chain has the
/// leftmost next vertex, for as long as they are convex; whatever is
/// left at the end is a fan around the leftmost vertex.
pub(crate) fn tessellate_mono_region(mesh: &mut Mesh, face: usize) -> Result<()> {
    let mut up = mesh.face(face).an_edge;
    debug_assert!(mesh.lnext(up) != up && mesh.lnext(mesh.lnext(up)) != up);

    // Find the rightmost vertex: the origin of `up` once it is the
    // first edge of the upper chain (right to left).
    while vert_leq(mesh.dst_pt(up), mesh.org_pt(up)) {
        up = mesh.lprev(up);
    }
    while vert_leq(mesh.org_pt(up), mesh.dst_pt(up)) {
        up = mesh.lnext(up);
    }
    let mut lo = mesh.lprev(up);

    while mesh.lnext(up) != lo {
        if vert_leq(mesh.dst_pt(up), mesh.org_pt(lo)) {
            // up.dst is on the left, so triangles can be formed from
            // lo.org. Checking that the edge goes left guarantees
            // progress even when some triangles are clockwise, as long
            // as the chains are truly monotone.
            while mesh.lnext(lo) != up
                && (mesh.edge_goes_left(mesh.lnext(lo))
                    || edge_sign(mesh.org_pt(lo), mesh.dst_pt(lo), mesh.dst_pt(mesh.lnext(lo))) <= 0.)
            {
                let e = mesh.connect(mesh.lnext(lo), lo)?;
                lo = sym(e);
            }
            lo = mesh.lprev(lo);
        } else {
            // lo.org is on the left: make counter-clockwise triangles
            // from up.dst.
            while mesh.lnext(lo) != up
                && (mesh.edge_goes_right(mesh.lprev(up))
                    || edge_sign(mesh.dst_pt(up), mesh.org_pt(up), mesh.org_pt(mesh.lprev(up))) >= 0.)
            {
                let e = mesh.connect(up, mesh.lprev(up))?;
                up = sym(e);
            }
            up = mesh.lnext(up);
        }
    }

    // lo.org == up.dst is now the leftmost vertex; fan out from it.
    debug_assert!(mesh.lnext(lo) != up);
    while mesh.lnext(mesh.lnext(lo)) != up {
        let e = mesh.connect(mesh.lnext(lo), lo)?;
        lo = sym(e);
    }
    Ok(())
}

/// Triangulate every interior face. New faces are linked in before the
/// face being split, so the walk never revisits them.
pub(crate) fn tessellate_interior(mesh: &mut Mesh) -> Result<()> {
    let mut faces = 0;
    let mut f = mesh.next_face(F_HEAD);
    while f != F_HEAD {
        let next = mesh.next_face(f);
        if mesh.face(f).inside {
            tessellate_mono_region(mesh, f)?;
            faces += 1;
        }
        f = next;
    }
    debug!("triangulated {faces} monotone faces");
    Ok(())
}
