//! Whole-mesh passes run after the sweep.
use log::debug;

use super::{sym, Mesh, E_HEAD, F_HEAD};
use crate::error::Result;
use crate::geom::vert_ccw;

impl Mesh {
    fn face_inside(&self, f: Option<usize>) -> bool {
        f.map_or(false, |f| self.face(f).inside)
    }

    /// Number of vertices (equivalently edges) around face `f`.
    pub fn count_face_verts(&self, f: usize) -> usize {
        self.face_loop(self.face(f).an_edge).count()
    }

    /// Destroy face `f`: every edge bordering it loses its left face,
    /// and edges that then have no face on either side are removed
    /// along with any vertices they leave isolated.
    pub fn zap_face(&mut self, f: usize) {
        let e_start = self.face(f).an_edge;
        let mut e_next = self.lnext(e_start);
        loop {
            let e = e_next;
            e_next = self.lnext(e);
            self.edge_mut(e).lface = None;
            if self.rface(e).is_none() {
                // Neither side is a face any more: delete the edge.
                if self.onext(e) == e {
                    let v = self.org(e);
                    self.kill_vertex(v, None);
                } else {
                    let (org, onext, oprev) = (self.org(e), self.onext(e), self.oprev(e));
                    self.vert_mut(org).an_edge = onext;
                    self.splice_rings(e, oprev);
                }
                let e_sym = sym(e);
                if self.onext(e_sym) == e_sym {
                    let v = self.org(e_sym);
                    self.kill_vertex(v, None);
                } else {
                    let (org, onext, oprev) =
                        (self.org(e_sym), self.onext(e_sym), self.oprev(e_sym));
                    self.vert_mut(org).an_edge = onext;
                    self.splice_rings(e_sym, oprev);
                }
                self.kill_edge(e);
            }
            if e == e_start {
                break;
            }
        }

        let face = self.faces.remove(f);
        self.faces[face.next].prev = face.prev;
        self.faces[face.prev].next = face.next;
    }

    /// Zap every face not marked inside.
    pub fn discard_exterior(&mut self) {
        let mut f = self.next_face(F_HEAD);
        let mut zapped = 0;
        while f != F_HEAD {
            let next = self.next_face(f);
            if !self.face(f).inside {
                self.zap_face(f);
                zapped += 1;
            }
            f = next;
        }
        debug!("discarded {zapped} exterior faces");
    }

    /// Relabel edge windings so that boundary edges between inside and
    /// outside faces carry `value` (or `-value` when the inside face is
    /// on the right). Other edges get a winding of zero, or are deleted
    /// when `keep_only_boundary` is set.
    pub fn set_winding_number(&mut self, value: i32, keep_only_boundary: bool) -> Result<()> {
        let mut e = self.first_edge();
        while e != E_HEAD {
            let e_next = self.edge(e).next;
            let l_inside = self.face_inside(self.lface(e));
            let r_inside = self.face_inside(self.rface(e));
            if l_inside != r_inside {
                self.edge_mut(e).winding = if l_inside { value } else { -value };
            } else if keep_only_boundary {
                self.delete_edge(e)?;
            } else {
                self.edge_mut(e).winding = 0;
            }
            e = e_next;
        }
        Ok(())
    }

    /// Greedily delete edges between pairs of inside faces when the
    /// merged face stays convex and has at most `max_verts_per_face`
    /// vertices.
    pub fn merge_convex_faces(&mut self, max_verts_per_face: usize) -> Result<()> {
        let mut merged = 0;
        let mut e = self.first_edge();
        while e != E_HEAD {
            let mut e_next = self.edge(e).next;
            let e_sym = sym(e);

            let (Some(lf), Some(rf)) = (self.lface(e), self.lface(e_sym)) else {
                e = e_next;
                continue;
            };
            if !self.face(lf).inside || !self.face(rf).inside {
                e = e_next;
                continue;
            }

            let left_nv = self.count_face_verts(lf);
            let right_nv = self.count_face_verts(rf);
            if left_nv + right_nv - 2 > max_verts_per_face {
                e = e_next;
                continue;
            }

            // Corners at both ends of e in the merged face.
            let va = self.org_pt(self.lprev(e));
            let vb = self.org_pt(e);
            let vc = self.dst_pt(self.lnext(e_sym));

            let vd = self.org_pt(self.lprev(e_sym));
            let ve = self.org_pt(e_sym);
            let vf = self.dst_pt(self.lnext(e));

            if vert_ccw(va, vb, vc) && vert_ccw(vd, ve, vf) {
                if e == e_next || e == sym(e_next) {
                    e_next = self.edge(e_next).next;
                }
                self.delete_edge(e)?;
                merged += 1;
            }
            e = e_next;
        }
        debug!("merged {merged} pairs of convex faces");
        Ok(())
    }
}
