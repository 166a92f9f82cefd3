//! Lowering of the finished mesh into flat vertex and element buffers.
//!
//! Polygon output numbers every vertex used by an emitted face once,
//! in face order, and writes `poly_size` indices per face padded with
//! [`TESS_UNDEF`]. Connected polygons append one neighbour slot per
//! edge. Boundary contours duplicate the vertices of each loop and
//! describe it with a `(base, count)` pair.
use log::debug;
use smallvec::SmallVec;

use crate::error::Result;
use crate::mesh::Mesh;
use crate::tess::ElementType;
use crate::{Real, TESS_UNDEF};

type Corners = SmallVec<[usize; 8]>;

/// Flat buffers of one tessellation result.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Output {
    pub vertices: Vec<Real>,
    pub vertex_indices: Vec<u32>,
    pub elements: Vec<u32>,
    pub element_count: usize,
}

impl Output {
    pub fn vertex_count(&self) -> usize {
        self.vertex_indices.len()
    }
}

/// Twice the signed area of face `f` in the sweep plane.
fn face_area(mesh: &Mesh, f: usize) -> Real {
    mesh.face_loop(mesh.face(f).an_edge)
        .map(|e| {
            let (org, dst) = (mesh.org_pt(e), mesh.dst_pt(e));
            (org.s - dst.s) * (org.t + dst.t)
        })
        .sum()
}

fn emitted(mesh: &Mesh, f: usize, no_empty_polygons: bool) -> bool {
    mesh.face(f).inside && !(no_empty_polygons && face_area(mesh, f) == 0.)
}

fn corners(mesh: &Mesh, f: usize) -> Corners {
    mesh.face_loop(mesh.face(f).an_edge).collect()
}

fn copy_vertex(mesh: &Mesh, v: usize, vertex_size: usize, out: &mut Vec<Real>) {
    out.extend_from_slice(&mesh.vert(v).coords[..vertex_size]);
}

/// Emit the inside faces of a triangulated mesh as polygons of at most
/// `poly_size` vertices. Exterior faces must already be discarded.
pub(crate) fn output_polymesh(
    mesh: &mut Mesh,
    element_type: ElementType,
    poly_size: usize,
    vertex_size: usize,
    no_empty_polygons: bool,
) -> Result<Output> {
    if poly_size > 3 {
        mesh.merge_convex_faces(poly_size)?;
    }

    let vertices: Vec<_> = mesh.vertices().collect();
    for &v in &vertices {
        mesh.vert_mut(v).n = TESS_UNDEF;
    }

    // Number the emitted faces, and their vertices on first use.
    let faces: Vec<_> = mesh.faces().collect();
    let mut vertex_count = 0;
    let mut element_count = 0;
    for &f in &faces {
        mesh.face_mut(f).n = TESS_UNDEF;
        if !emitted(mesh, f, no_empty_polygons) {
            continue;
        }
        let edges = corners(mesh, f);
        assert!(
            edges.len() <= poly_size,
            "face with {} corners exceeds polygon size {poly_size}",
            edges.len()
        );
        for e in edges {
            let v = mesh.org(e);
            if mesh.vert(v).n == TESS_UNDEF {
                mesh.vert_mut(v).n = vertex_count;
                vertex_count += 1;
            }
        }
        mesh.face_mut(f).n = element_count;
        element_count += 1;
    }

    let stride = match element_type {
        ElementType::ConnectedPolygons => 2 * poly_size,
        _ => poly_size,
    };
    let mut elements = Vec::with_capacity(element_count as usize * stride);
    for &f in &faces {
        if mesh.face(f).n == TESS_UNDEF {
            continue;
        }
        let edges = corners(mesh, f);
        let start = elements.len();
        elements.extend(edges.iter().map(|&e| mesh.vert(mesh.org(e)).n));
        elements.resize(start + poly_size, TESS_UNDEF);

        if element_type == ElementType::ConnectedPolygons {
            elements.extend(edges.iter().map(|&e| {
                mesh.rface(e)
                    .filter(|&r| mesh.face(r).inside)
                    .map_or(TESS_UNDEF, |r| mesh.face(r).n)
            }));
            elements.resize(start + stride, TESS_UNDEF);
        }
    }

    let mut out = Output {
        vertices: vec![0.; vertex_count as usize * vertex_size],
        vertex_indices: vec![TESS_UNDEF; vertex_count as usize],
        elements,
        element_count: element_count as usize,
    };
    for &v in &vertices {
        let vert = mesh.vert(v);
        if vert.n == TESS_UNDEF {
            continue;
        }
        let n = vert.n as usize;
        out.vertices[n * vertex_size..(n + 1) * vertex_size]
            .copy_from_slice(&vert.coords[..vertex_size]);
        out.vertex_indices[n] = vert.idx;
    }

    debug!(
        "emitted {} polygons over {} vertices",
        out.element_count,
        out.vertex_count()
    );
    Ok(out)
}

/// Emit every inside face loop as a contour. Each loop gets its own
/// copy of its vertices.
pub(crate) fn output_contours(mesh: &Mesh, vertex_size: usize, no_empty_polygons: bool) -> Output {
    let mut out = Output::default();
    for f in mesh.faces() {
        if !emitted(mesh, f, no_empty_polygons) {
            continue;
        }
        let base = out.vertex_indices.len();
        for e in mesh.face_loop(mesh.face(f).an_edge) {
            let v = mesh.org(e);
            copy_vertex(mesh, v, vertex_size, &mut out.vertices);
            out.vertex_indices.push(mesh.vert(v).idx);
        }
        let count = out.vertex_indices.len() - base;
        out.elements.push(base as u32);
        out.elements.push(count as u32);
        out.element_count += 1;
    }

    debug!(
        "emitted {} contours over {} vertices",
        out.element_count,
        out.vertex_count()
    );
    out
}
