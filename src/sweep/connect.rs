//! Attaching event vertices to the regions around them.
use log::trace;

use super::{ActiveRegion, Sweep};
use crate::active::DICT_HEAD;
use crate::error::Result;
use crate::events::SweepPoint;
use crate::geom::{edge_sign, vert_eq, vert_leq};
use crate::mesh::sym;
use crate::Real;

/// Sentinel edges extend this far beyond the bounding box, on top of
/// its own extent.
const SENTINEL_MARGIN: Real = 0.01;

impl<'m> Sweep<'m> {
    /// Insert the two horizontal sentinel edges bounding the sweep
    /// from below and above.
    pub(super) fn init_edge_dict(&mut self, bmin: SweepPoint, bmax: SweepPoint) -> Result<()> {
        let w = (bmax.s - bmin.s) + SENTINEL_MARGIN;
        let h = (bmax.t - bmin.t) + SENTINEL_MARGIN;
        let (smin, smax) = (bmin.s - w, bmax.s + w);
        let (tmin, tmax) = (bmin.t - h, bmax.t + h);
        self.add_sentinel(smin, smax, tmin)?;
        self.add_sentinel(smin, smax, tmax)
    }

    fn add_sentinel(&mut self, smin: Real, smax: Real, t: Real) -> Result<()> {
        let e = self.mesh.make_edge()?;
        let (org, dst) = (self.mesh.org(e), self.mesh.dst(e));
        {
            let v = self.mesh.vert_mut(org);
            v.s = smax;
            v.t = t;
        }
        {
            let v = self.mesh.vert_mut(dst);
            v.s = smin;
            v.t = t;
        }
        self.event = dst;

        let reg = self.regions.insert(
            self.mesh.allocator(),
            ActiveRegion {
                e_up: e,
                node_up: DICT_HEAD,
                winding_number: 0,
                inside: false,
                sentinel: true,
                dirty: false,
                fix_upper_edge: false,
            },
        )?;
        let after = self
            .dict
            .position_before(DICT_HEAD, |k| self.edge_leq(self.regions[k].e_up, e));
        let node = self.dict.insert_after(self.mesh.allocator(), after, reg)?;
        self.reg_mut(reg).node_up = node;
        self.mesh.edge_mut(e).active_region = Some(reg);
        Ok(())
    }

    /// The event has only left-going edges. Add a temporary edge to
    /// connect it to the rest of the mesh on the right, so that the
    /// region below it can be finished as a monotone face later.
    ///
    /// The new edge goes to the nearer origin of the edges above and
    /// below; it is marked fixable and replaced once a real edge is
    /// found.
    pub(super) fn connect_right_vertex(&mut self, reg_up: usize, e_bottom_left: usize) -> Result<()> {
        let mut reg_up = reg_up;
        let mut e_bottom_left = e_bottom_left;
        let mut e_top_left = self.mesh.onext(e_bottom_left);
        let reg_lo = self.below(reg_up);
        let e_up = self.e_up(reg_up);
        let e_lo = self.e_up(reg_lo);
        let mut degenerate = false;

        if self.mesh.dst(e_up) != self.mesh.dst(e_lo) {
            self.check_for_intersect(reg_up)?;
        }

        // The upper or lower edge may now pass through the event, or
        // coincide with a new intersection vertex.
        let event = self.event_pt();
        if vert_eq(self.mesh.org_pt(e_up), event) {
            self.mesh.splice(self.mesh.oprev(e_top_left), e_up)?;
            reg_up = self.top_left_region(reg_up)?;
            e_top_left = self.e_up(self.below(reg_up));
            self.finish_left_regions(self.below(reg_up), Some(reg_lo))?;
            degenerate = true;
        }
        if vert_eq(self.mesh.org_pt(e_lo), event) {
            self.mesh.splice(e_bottom_left, self.mesh.oprev(e_lo))?;
            e_bottom_left = self.finish_left_regions(reg_lo, None)?;
            degenerate = true;
        }
        if degenerate {
            let first = self.mesh.onext(e_bottom_left);
            return self.add_right_edges(reg_up, first, e_top_left, Some(e_top_left), true);
        }

        // Connect to the closer of e_lo.org and e_up.org.
        let target = if vert_leq(self.mesh.org_pt(e_lo), self.mesh.org_pt(e_up)) {
            self.mesh.oprev(e_lo)
        } else {
            e_up
        };
        let e_new = self.mesh.connect(self.mesh.lprev(e_bottom_left), target)?;
        trace!("temporary edge {e_new} for right vertex {}", self.event);

        // No clean up yet: e_new must not disappear before it is marked.
        let e_new_onext = self.mesh.onext(e_new);
        self.add_right_edges(reg_up, e_new, e_new_onext, Some(e_new_onext), false)?;
        let reg = self
            .mesh
            .edge(sym(e_new))
            .active_region
            .expect("region of temporary edge not found in storage");
        self.reg_mut(reg).fix_upper_edge = true;
        self.walk_dirty_regions(reg_up)
    }

    /// The event lies on the upper edge of `reg_up` (or at one of its
    /// ends). Merge it into the mesh there.
    fn connect_left_degenerate(&mut self, reg_up: usize, v_event: usize) -> Result<()> {
        let e = self.e_up(reg_up);
        let at = self.mesh.pt(v_event);

        if vert_eq(self.mesh.org_pt(e), at) {
            // e.org is an unprocessed vertex: combine them and wait for
            // e.org to come out of the queue.
            trace!("left vertex {v_event} coincides with pending vertex");
            let an_edge = self.mesh.vert(v_event).an_edge;
            return self.splice_merge_vertices(e, an_edge);
        }

        if !vert_eq(self.mesh.dst_pt(e), at) {
            // General case: splice the event into the edge passing
            // through it.
            trace!("left vertex {v_event} splits edge {e}");
            self.mesh.split_edge(sym(e))?;
            if self.reg(reg_up).fix_upper_edge {
                // The temporary edge is no longer needed past here.
                self.mesh.delete_edge(self.mesh.onext(e))?;
                self.reg_mut(reg_up).fix_upper_edge = false;
            }
            let an_edge = self.mesh.vert(v_event).an_edge;
            self.mesh.splice(an_edge, e)?;
            return self.sweep_event(v_event);
        }

        // The event coincides with e.dst, which was processed already.
        // Splice in the additional right-going edges.
        trace!("left vertex {v_event} coincides with processed vertex");
        let reg_up = self.top_right_region(reg_up);
        let reg = self.below(reg_up);
        let mut e_top_right = sym(self.e_up(reg));
        let e_last = self.mesh.onext(e_top_right);
        let mut e_top_left = Some(e_last);
        if self.reg(reg).fix_upper_edge {
            // e.dst had only a temporary edge going right; real ones
            // replace it.
            debug_assert_ne!(e_last, e_top_right);
            self.delete_region(reg);
            self.mesh.delete_edge(e_top_right)?;
            e_top_right = self.mesh.oprev(e_last);
        }
        let an_edge = self.mesh.vert(v_event).an_edge;
        self.mesh.splice(an_edge, e_top_right)?;
        if !self.mesh.edge_goes_left(e_last) {
            // e.dst had no left-going edges.
            e_top_left = None;
        }
        let first = self.mesh.onext(e_top_right);
        self.add_right_edges(reg_up, first, e_last, e_top_left, true)
    }

    /// The event has no processed edges: all its edges go right. Find
    /// the region containing it and connect it, if the region is
    /// inside, to keep the faces monotone.
    pub(super) fn connect_left_vertex(&mut self, v_event: usize) -> Result<()> {
        let e_tmp = sym(self.mesh.vert(v_event).an_edge);
        let node = self
            .dict
            .search(|k| self.edge_leq(e_tmp, self.regions[k].e_up));
        let reg_up = self
            .dict
            .key(node)
            .expect("region above left vertex not found in dictionary");
        let Some(reg_lo) = self.region_below(reg_up) else {
            // Can happen when the input is degenerate in the projection.
            return Ok(());
        };
        let e_up = self.e_up(reg_up);
        let e_lo = self.e_up(reg_lo);

        // Try merging with the edge above first.
        if edge_sign(self.mesh.dst_pt(e_up), self.mesh.pt(v_event), self.mesh.org_pt(e_up)) == 0. {
            return self.connect_left_degenerate(reg_up, v_event);
        }

        // Connect to the closer of e_lo.dst and e_up.dst.
        let reg = if vert_leq(self.mesh.dst_pt(e_lo), self.mesh.dst_pt(e_up)) {
            reg_up
        } else {
            reg_lo
        };

        if self.reg(reg_up).inside || self.reg(reg).fix_upper_edge {
            let an_edge = self.mesh.vert(v_event).an_edge;
            let e_new = if reg == reg_up {
                self.mesh.connect(sym(an_edge), self.mesh.lnext(e_up))?
            } else {
                sym(self.mesh.connect(self.mesh.dnext(e_lo), an_edge)?)
            };
            trace!("connecting left vertex {v_event} with edge {e_new}");
            if self.reg(reg).fix_upper_edge {
                self.fix_upper_edge(reg, e_new)?;
            } else {
                let new_reg = self.add_region_below(reg_up, e_new)?;
                self.compute_winding(new_reg);
            }
            self.sweep_event(v_event)
        } else {
            // The vertex is outside the polygon; it doesn't need to be
            // connected to the rest of the mesh.
            let an_edge = self.mesh.vert(v_event).an_edge;
            self.add_right_edges(reg_up, an_edge, an_edge, None, true)
        }
    }
}
