//! Repairs between neighbouring edges on the sweep line.
//!
//! Whenever two edges become adjacent in the dictionary, their order
//! is re-checked at both ends and any crossing to the right of the
//! sweep line is turned into a vertex. Rounding can leave an edge end
//! point marginally on the wrong side of its neighbour; such end points
//! are spliced into the neighbour instead.
use log::trace;

use super::Sweep;
use crate::error::Result;
use crate::events::SweepPoint;
use crate::geom::{edge_intersect, edge_sign, vert_eq, vert_leq};
use crate::mesh::sym;

impl<'m> Sweep<'m> {
    /// Check the upper and lower edges of `reg_up`'s lower neighbour
    /// boundary at their origins (right ends).
    ///
    /// If the origin of one lies on the wrong side of the other, it is
    /// spliced into that edge; if the origins coincide the two vertices
    /// are merged. Returns whether anything changed.
    pub(super) fn check_for_right_splice(&mut self, reg_up: usize) -> Result<bool> {
        let reg_lo = self.below(reg_up);
        let e_up = self.e_up(reg_up);
        let e_lo = self.e_up(reg_lo);
        let (org_up, org_lo) = (self.mesh.org_pt(e_up), self.mesh.org_pt(e_lo));

        if vert_leq(org_up, org_lo) {
            if edge_sign(self.mesh.dst_pt(e_lo), org_up, org_lo) > 0. {
                return Ok(false);
            }
            // e_up.org appears to be below e_lo.
            if !vert_eq(org_up, org_lo) {
                trace!("right splice: origin of {e_up} into {e_lo}");
                self.mesh.split_edge(sym(e_lo))?;
                self.mesh.splice(e_up, self.mesh.oprev(e_lo))?;
                self.reg_mut(reg_up).dirty = true;
                self.reg_mut(reg_lo).dirty = true;
            } else if self.mesh.org(e_up) != self.mesh.org(e_lo) {
                // Merge the two vertices, discarding e_up.org.
                let v = self.mesh.org(e_up);
                if let Some(handle) = self.mesh.vert_mut(v).pq_handle.take() {
                    self.pq.remove(handle);
                }
                trace!("right splice: merging vertex {v}");
                self.splice_merge_vertices(self.mesh.oprev(e_lo), e_up)?;
            }
        } else {
            if edge_sign(self.mesh.dst_pt(e_up), org_lo, org_up) < 0. {
                return Ok(false);
            }
            // e_lo.org appears to be above e_up, so splice it into e_up.
            trace!("right splice: origin of {e_lo} into {e_up}");
            let above = self.above(reg_up);
            self.reg_mut(above).dirty = true;
            self.reg_mut(reg_up).dirty = true;
            self.mesh.split_edge(sym(e_up))?;
            self.mesh.splice(self.mesh.oprev(e_lo), e_up)?;
        }
        Ok(true)
    }

    /// Same as [`check_for_right_splice`](Self::check_for_right_splice),
    /// at the destinations (left ends). The destinations must differ.
    pub(super) fn check_for_left_splice(&mut self, reg_up: usize) -> Result<bool> {
        let reg_lo = self.below(reg_up);
        let e_up = self.e_up(reg_up);
        let e_lo = self.e_up(reg_lo);
        let (dst_up, dst_lo) = (self.mesh.dst_pt(e_up), self.mesh.dst_pt(e_lo));
        debug_assert!(!vert_eq(dst_up, dst_lo));

        if vert_leq(dst_up, dst_lo) {
            if edge_sign(dst_up, dst_lo, self.mesh.org_pt(e_up)) < 0. {
                return Ok(false);
            }
            // e_lo.dst is above e_up, so splice it into e_up.
            trace!("left splice: destination of {e_lo} into {e_up}");
            let above = self.above(reg_up);
            self.reg_mut(above).dirty = true;
            self.reg_mut(reg_up).dirty = true;
            let e = self.mesh.split_edge(e_up)?;
            self.mesh.splice(sym(e_lo), e)?;
            let inside = self.reg(reg_up).inside;
            if let Some(f) = self.mesh.lface(e) {
                self.mesh.face_mut(f).inside = inside;
            }
        } else {
            if edge_sign(dst_lo, dst_up, self.mesh.org_pt(e_lo)) > 0. {
                return Ok(false);
            }
            // e_up.dst is below e_lo, so splice it into e_lo.
            trace!("left splice: destination of {e_up} into {e_lo}");
            self.reg_mut(reg_up).dirty = true;
            self.reg_mut(reg_lo).dirty = true;
            let e = self.mesh.split_edge(e_lo)?;
            self.mesh.splice(self.mesh.lnext(e_up), sym(e_lo))?;
            let inside = self.reg(reg_up).inside;
            if let Some(f) = self.mesh.rface(e) {
                self.mesh.face_mut(f).inside = inside;
            }
        }
        Ok(true)
    }

    /// Check the upper and lower edges of `reg_up` for an intersection
    /// right of the sweep line, and turn it into a vertex event.
    ///
    /// Returns `true` if the dirty regions were already walked by a
    /// recursive call.
    pub(super) fn check_for_intersect(&mut self, reg_up: usize) -> Result<bool> {
        let mut reg_up = reg_up;
        let mut reg_lo = self.below(reg_up);
        let e_up = self.e_up(reg_up);
        let mut e_lo = self.e_up(reg_lo);
        let (v_org_up, v_org_lo) = (self.mesh.org(e_up), self.mesh.org(e_lo));
        let (v_dst_up, v_dst_lo) = (self.mesh.dst(e_up), self.mesh.dst(e_lo));
        let (org_up, org_lo) = (self.mesh.pt(v_org_up), self.mesh.pt(v_org_lo));
        let (dst_up, dst_lo) = (self.mesh.pt(v_dst_up), self.mesh.pt(v_dst_lo));
        let event = self.event_pt();

        debug_assert!(!vert_eq(dst_lo, dst_up));
        debug_assert!(edge_sign(dst_up, event, org_up) <= 0.);
        debug_assert!(edge_sign(dst_lo, event, org_lo) >= 0.);
        debug_assert!(v_org_up != self.event && v_org_lo != self.event);
        debug_assert!(!self.reg(reg_up).fix_upper_edge && !self.reg(reg_lo).fix_upper_edge);

        if v_org_up == v_org_lo {
            // Right end points are the same.
            return Ok(false);
        }

        let t_min_up = org_up.t.min(dst_up.t);
        let t_max_lo = org_lo.t.max(dst_lo.t);
        if t_min_up > t_max_lo {
            // t ranges do not overlap.
            return Ok(false);
        }

        if vert_leq(org_up, org_lo) {
            if edge_sign(dst_lo, org_up, org_lo) > 0. {
                return Ok(false);
            }
        } else if edge_sign(dst_up, org_lo, org_up) < 0. {
            return Ok(false);
        }

        // The edges intersect, at least marginally.
        let mut isect = edge_intersect(dst_up, org_up, dst_lo, org_lo);
        debug_assert!(org_up.t.min(dst_up.t) <= isect.t);
        debug_assert!(isect.t <= org_lo.t.max(dst_lo.t));
        debug_assert!(dst_lo.s.min(dst_up.s) <= isect.s);
        debug_assert!(isect.s <= org_lo.s.max(org_up.s));

        if vert_leq(isect, event) {
            // Slightly left of the sweep line: move it onto the event.
            isect = event;
        }
        // Likewise, never go past the leftmost of the two origins.
        let org_min = if vert_leq(org_up, org_lo) { org_up } else { org_lo };
        if vert_leq(org_min, isect) {
            isect = org_min;
        }

        if vert_eq(isect, org_up) || vert_eq(isect, org_lo) {
            // Intersection at one of the right end points.
            self.check_for_right_splice(reg_up)?;
            return Ok(false);
        }

        if (!vert_eq(dst_up, event) && edge_sign(dst_up, event, isect) >= 0.)
            || (!vert_eq(dst_lo, event) && edge_sign(dst_lo, event, isect) <= 0.)
        {
            // The new upper or lower edge would pass on the wrong side
            // of the sweep event, or through it.
            if v_dst_lo == self.event {
                // Splice dst_lo into e_up, and process the new regions.
                trace!("intersection repair: event into upper edge {e_up}");
                self.mesh.split_edge(sym(e_up))?;
                self.mesh.splice(sym(e_lo), e_up)?;
                reg_up = self.top_left_region(reg_up)?;
                let e = self.e_up(self.below(reg_up));
                self.finish_left_regions(self.below(reg_up), Some(reg_lo))?;
                self.add_right_edges(reg_up, self.mesh.oprev(e), e, Some(e), true)?;
                return Ok(true);
            }
            if v_dst_up == self.event {
                // Splice dst_up into e_lo, and process the new regions.
                trace!("intersection repair: event into lower edge {e_lo}");
                self.mesh.split_edge(sym(e_lo))?;
                self.mesh.splice(self.mesh.lnext(e_up), self.mesh.oprev(e_lo))?;
                reg_lo = reg_up;
                reg_up = self.top_right_region(reg_up);
                let e = self.mesh.rprev(self.e_up(self.below(reg_up)));
                self.reg_mut(reg_lo).e_up = self.mesh.oprev(e_lo);
                e_lo = self.finish_left_regions(reg_lo, None)?;
                self.add_right_edges(reg_up, self.mesh.onext(e_lo), self.mesh.rprev(e_up), Some(e), true)?;
                return Ok(true);
            }
            // Called from connect_right_vertex. Split whichever edge
            // passes on the wrong side of the event, and leave the rest
            // to the caller.
            if edge_sign(dst_up, event, isect) >= 0. {
                let above = self.above(reg_up);
                self.reg_mut(above).dirty = true;
                self.reg_mut(reg_up).dirty = true;
                self.mesh.split_edge(sym(e_up))?;
                self.place_at_event(self.mesh.org(e_up));
            }
            if edge_sign(dst_lo, event, isect) <= 0. {
                self.reg_mut(reg_up).dirty = true;
                self.reg_mut(reg_lo).dirty = true;
                self.mesh.split_edge(sym(e_lo))?;
                self.place_at_event(self.mesh.org(e_lo));
            }
            return Ok(false);
        }

        // General case: split both edges and splice them into a new
        // vertex. The new face is expected on the processed side, which
        // keeps the splice cheap.
        self.mesh.split_edge(sym(e_up))?;
        self.mesh.split_edge(sym(e_lo))?;
        self.mesh.splice(self.mesh.oprev(e_lo), e_up)?;
        let v = self.mesh.org(e_up);
        {
            let vert = self.mesh.vert_mut(v);
            vert.s = isect.s;
            vert.t = isect.t;
        }
        let handle = self.pq.insert(self.mesh.allocator(), isect, v)?;
        self.mesh.vert_mut(v).pq_handle = Some(handle);
        self.intersect_data(v, v_org_up, v_dst_up, v_org_lo, v_dst_lo);
        let above = self.above(reg_up);
        self.reg_mut(above).dirty = true;
        self.reg_mut(reg_up).dirty = true;
        self.reg_mut(reg_lo).dirty = true;
        Ok(false)
    }

    /// Move the fresh split vertex `v` onto the current event, copying
    /// its attributes.
    fn place_at_event(&mut self, v: usize) {
        let (at, coords) = {
            let event = self.mesh.vert(self.event);
            (SweepPoint::new(event.s, event.t), event.coords)
        };
        let vert = self.mesh.vert_mut(v);
        vert.s = at.s;
        vert.t = at.t;
        vert.coords = coords;
    }

    /// Walk the dirty regions from the bottom up, restoring the
    /// dictionary invariants: edges ordered at both ends, no crossings
    /// right of the sweep line, and no two-edge loops.
    pub(super) fn walk_dirty_regions(&mut self, reg_up: usize) -> Result<()> {
        let mut reg_up = reg_up;
        let mut reg_lo = self.below(reg_up);

        loop {
            // Find the lowest dirty region.
            while self.reg(reg_lo).dirty {
                match self.region_below(reg_lo) {
                    Some(below) => {
                        reg_up = reg_lo;
                        reg_lo = below;
                    }
                    None => break,
                }
            }
            if !self.reg(reg_up).dirty {
                reg_lo = reg_up;
                match self.region_above(reg_up) {
                    Some(above) if self.reg(above).dirty => reg_up = above,
                    // Walked all the dirty regions.
                    _ => return Ok(()),
                }
            }
            self.reg_mut(reg_up).dirty = false;
            let mut e_up = self.e_up(reg_up);
            let mut e_lo = self.e_up(reg_lo);

            if self.mesh.dst(e_up) != self.mesh.dst(e_lo) {
                // Check the edge order at the destinations.
                if self.check_for_left_splice(reg_up)? {
                    // A temporary edge is no longer needed once its
                    // vertex gained another right-going edge.
                    if self.reg(reg_lo).fix_upper_edge {
                        self.delete_region(reg_lo);
                        self.mesh.delete_edge(e_lo)?;
                        reg_lo = self.below(reg_up);
                        e_lo = self.e_up(reg_lo);
                    } else if self.reg(reg_up).fix_upper_edge {
                        self.delete_region(reg_up);
                        self.mesh.delete_edge(e_up)?;
                        reg_up = self.above(reg_lo);
                        e_up = self.e_up(reg_up);
                    }
                }
            }

            if self.mesh.org(e_up) != self.mesh.org(e_lo) {
                if self.mesh.dst(e_up) != self.mesh.dst(e_lo)
                    && !self.reg(reg_up).fix_upper_edge
                    && !self.reg(reg_lo).fix_upper_edge
                    && (self.mesh.dst(e_up) == self.event || self.mesh.dst(e_lo) == self.event)
                {
                    // The intersection may fall back to the event
                    // itself, which needs the event between both edges
                    // and neither of them temporary.
                    if self.check_for_intersect(reg_up)? {
                        // Walked recursively.
                        return Ok(());
                    }
                } else {
                    // The origins may still violate the edge ordering.
                    self.check_for_right_splice(reg_up)?;
                }
            }

            if self.mesh.org(e_up) == self.mesh.org(e_lo) && self.mesh.dst(e_up) == self.mesh.dst(e_lo) {
                // A degenerate loop of two edges: delete it.
                trace!("removing two-edge loop {e_up}/{e_lo}");
                self.mesh.add_winding(e_lo, e_up);
                self.delete_region(reg_up);
                self.mesh.delete_edge(e_up)?;
                reg_up = self.above(reg_lo);
            }
        }
    }
}
