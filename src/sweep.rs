//! Sweep-line computation of the interior of the input contours.
//!
//! The sweep visits the mesh vertices in [`SweepPoint`] order. Edges
//! crossing the sweep line are kept in an [`EdgeDict`]: between each
//! pair of adjacent edges lies an [`ActiveRegion`], which knows its
//! winding number. Every intersection is turned into a mesh vertex as
//! it is discovered, and every face of the result is labelled inside or
//! outside according to the winding rule. The faces marked inside are
//! monotone, so they can be triangulated directly (see
//! [`crate::monotone`]).
//!
//! The sweep keeps edges oriented so that the upper edge of a region
//! goes from right to left: `e_up.dst` is the end already passed by
//! the sweep line.
use log::{debug, trace};

use crate::active::{EdgeDict, DICT_HEAD};
use crate::alloc::{AllocatorConfig, EntityKind, Pool};
use crate::error::Result;
use crate::events::{EventQueue, SweepPoint};
use crate::geom::{edge_eval, edge_sign, vert_eq, vert_l1_dist, vert_leq};
use crate::mesh::{sym, Mesh, E_HEAD, F_HEAD};
use crate::tess::WindingRule;
use crate::{Real, MAX_DIMENSIONS, TESS_UNDEF};

mod connect;
mod splice;

/// State of the strip between an edge on the sweep line and the next
/// edge below it.
#[derive(Debug, Clone)]
pub(crate) struct ActiveRegion {
    /// Upper edge, directed right to left.
    pub e_up: usize,
    /// Dictionary node holding this region.
    pub node_up: usize,
    /// Winding number of the region.
    pub winding_number: i32,
    pub inside: bool,
    /// One of the two bounding regions added before the sweep.
    pub sentinel: bool,
    /// The upper or lower edge changed; check for splices and
    /// intersections.
    pub dirty: bool,
    /// The upper edge is a temporary edge added for a vertex with no
    /// right-going edges; it is replaced as soon as a real edge is
    /// available.
    pub fix_upper_edge: bool,
}

/// Classify the faces of `mesh` against `rule`.
///
/// Afterwards every face is marked inside or outside, adjacent
/// interior faces may still be separated by edges, and every interior
/// face is monotone. `bmin`/`bmax` are the bounds of the projected
/// vertices.
pub(crate) fn compute_interior(
    mesh: &mut Mesh,
    rule: WindingRule,
    config: &AllocatorConfig,
    bmin: SweepPoint,
    bmax: SweepPoint,
) -> Result<()> {
    remove_degenerate_edges(mesh)?;

    let vertices: Vec<usize> = mesh.vertices().collect();
    let slots = vertices.len() + config.bucket_size(EntityKind::Event);
    let mut pq = EventQueue::with_slots(mesh.allocator(), slots)?;
    let dict = match EdgeDict::new(mesh.allocator(), config) {
        Ok(dict) => dict,
        Err(err) => {
            pq.release(mesh.allocator());
            return Err(err);
        }
    };

    let mut sweep = Sweep {
        mesh: &mut *mesh,
        dict,
        regions: Pool::new(EntityKind::Region, config),
        pq,
        event: 0,
        rule,
    };
    let swept = sweep.run(&vertices, bmin, bmax);
    sweep.release();
    swept?;

    remove_degenerate_faces(mesh)?;
    if cfg!(debug_assertions) {
        mesh.check_mesh();
    }
    Ok(())
}

pub(crate) struct Sweep<'m> {
    mesh: &'m mut Mesh,
    dict: EdgeDict,
    regions: Pool<ActiveRegion>,
    pq: EventQueue,
    /// Vertex currently being swept.
    event: usize,
    rule: WindingRule,
}

impl<'m> Sweep<'m> {
    fn run(&mut self, vertices: &[usize], bmin: SweepPoint, bmax: SweepPoint) -> Result<()> {
        for &v in vertices {
            let at = self.mesh.pt(v);
            let handle = self.pq.insert(self.mesh.allocator(), at, v)?;
            self.mesh.vert_mut(v).pq_handle = Some(handle);
        }
        self.init_edge_dict(bmin, bmax)?;
        debug!("sweeping {} vertices", vertices.len());

        let mut events = 0;
        while let Some(v) = self.pq.extract_min() {
            self.mesh.vert_mut(v).pq_handle = None;
            // Merge together all vertices at exactly the same location.
            while let Some(v_next) = self.pq.minimum() {
                if !vert_eq(self.mesh.pt(v_next), self.mesh.pt(v)) {
                    break;
                }
                self.pq.extract_min();
                self.mesh.vert_mut(v_next).pq_handle = None;
                trace!("merging coincident vertex {v_next} into {v}");
                let (e1, e2) = (self.mesh.vert(v).an_edge, self.mesh.vert(v_next).an_edge);
                self.splice_merge_vertices(e1, e2)?;
            }
            self.sweep_event(v)?;
            events += 1;
        }

        self.done_edge_dict();
        debug!("sweep finished after {events} events");
        Ok(())
    }

    fn release(&mut self) {
        self.dict.release(self.mesh.allocator());
        self.regions.release(self.mesh.allocator());
        self.pq.release(self.mesh.allocator());
    }

    // Region navigation.

    #[inline]
    fn reg(&self, r: usize) -> &ActiveRegion {
        &self.regions[r]
    }

    #[inline]
    fn reg_mut(&mut self, r: usize) -> &mut ActiveRegion {
        &mut self.regions[r]
    }

    #[inline]
    fn e_up(&self, r: usize) -> usize {
        self.regions[r].e_up
    }

    fn region_above(&self, r: usize) -> Option<usize> {
        self.dict.key(self.dict.succ(self.reg(r).node_up))
    }

    fn region_below(&self, r: usize) -> Option<usize> {
        self.dict.key(self.dict.pred(self.reg(r).node_up))
    }

    /// Region above `r`; the sentinels guarantee there is one for any
    /// region the sweep works with.
    fn above(&self, r: usize) -> usize {
        self.region_above(r).expect("region above not found in dictionary")
    }

    fn below(&self, r: usize) -> usize {
        self.region_below(r).expect("region below not found in dictionary")
    }

    #[inline]
    fn event_pt(&self) -> SweepPoint {
        self.mesh.pt(self.event)
    }

    /// Ordering of two edges on the sweep line: `true` if `e1` is at
    /// or below `e2` at the current event.
    ///
    /// Both edges must have their destination at or left of the event
    /// and their origin at or right of it.
    fn edge_leq(&self, e1: usize, e2: usize) -> bool {
        let event = self.event_pt();
        let (org1, dst1) = (self.mesh.org_pt(e1), self.mesh.dst_pt(e1));
        let (org2, dst2) = (self.mesh.org_pt(e2), self.mesh.dst_pt(e2));

        if self.mesh.dst(e1) == self.event {
            if self.mesh.dst(e2) == self.event {
                // Two edges right of the sweep line meeting at the
                // event: sort them by slope.
                if vert_leq(org1, org2) {
                    return edge_sign(dst2, org1, org2) <= 0.;
                }
                return edge_sign(dst1, org2, org1) >= 0.;
            }
            return edge_sign(dst2, event, org2) <= 0.;
        }
        if self.mesh.dst(e2) == self.event {
            return edge_sign(dst1, event, org1) >= 0.;
        }

        // General case: compare the heights of both edges at the event.
        let t1 = edge_eval(dst1, event, org1);
        let t2 = edge_eval(dst2, event, org2);
        t1 >= t2
    }

    // Region bookkeeping.

    /// Add a region below `reg_above` with upper edge `e_new_up`. The
    /// winding number is left for the caller to fill in.
    fn add_region_below(&mut self, reg_above: usize, e_new_up: usize) -> Result<usize> {
        let after = self.dict.position_before(self.reg(reg_above).node_up, |k| {
            self.edge_leq(self.regions[k].e_up, e_new_up)
        });
        let reg = self.regions.insert(
            self.mesh.allocator(),
            ActiveRegion {
                e_up: e_new_up,
                node_up: DICT_HEAD,
                winding_number: 0,
                inside: false,
                sentinel: false,
                dirty: false,
                fix_upper_edge: false,
            },
        )?;
        let node = self.dict.insert_after(self.mesh.allocator(), after, reg)?;
        self.reg_mut(reg).node_up = node;
        self.mesh.edge_mut(e_new_up).active_region = Some(reg);
        Ok(reg)
    }

    fn delete_region(&mut self, reg: usize) {
        let ActiveRegion {
            e_up,
            node_up,
            fix_upper_edge,
            ..
        } = *self.reg(reg);
        if fix_upper_edge {
            // Temporary edges were created with zero winding; they must
            // not have picked up any since.
            debug_assert_eq!(self.mesh.edge(e_up).winding, 0);
        }
        self.mesh.edge_mut(e_up).active_region = None;
        self.dict.delete(node_up);
        self.regions.remove(reg);
    }

    /// Replace the temporary upper edge of `reg` with `new_edge`.
    fn fix_upper_edge(&mut self, reg: usize, new_edge: usize) -> Result<()> {
        debug_assert!(self.reg(reg).fix_upper_edge);
        trace!("fixing temporary edge of region {reg}");
        self.mesh.delete_edge(self.e_up(reg))?;
        let r = self.reg_mut(reg);
        r.fix_upper_edge = false;
        r.e_up = new_edge;
        self.mesh.edge_mut(new_edge).active_region = Some(reg);
        Ok(())
    }

    /// Region above the uppermost edge with the same origin as
    /// `reg.e_up`, fixing up a temporary edge there if needed.
    fn top_left_region(&mut self, mut reg: usize) -> Result<usize> {
        let org = self.mesh.org(self.e_up(reg));
        loop {
            reg = self.above(reg);
            if self.mesh.org(self.e_up(reg)) != org {
                break;
            }
        }
        if self.reg(reg).fix_upper_edge {
            let below = self.below(reg);
            let e = self
                .mesh
                .connect(sym(self.e_up(below)), self.mesh.lnext(self.e_up(reg)))?;
            self.fix_upper_edge(reg, e)?;
            reg = self.above(reg);
        }
        Ok(reg)
    }

    /// Region above the uppermost edge with the same destination as
    /// `reg.e_up`.
    fn top_right_region(&self, mut reg: usize) -> usize {
        let dst = self.mesh.dst(self.e_up(reg));
        loop {
            reg = self.above(reg);
            if self.mesh.dst(self.e_up(reg)) != dst {
                return reg;
            }
        }
    }

    fn compute_winding(&mut self, reg: usize) {
        let above = self.above(reg);
        let n = self.reg(above).winding_number + self.mesh.edge(self.e_up(reg)).winding;
        let inside = self.rule.is_inside(n);
        let r = self.reg_mut(reg);
        r.winding_number = n;
        r.inside = inside;
    }

    /// The region is leaving the sweep: record its classification on
    /// the face to its left.
    fn finish_region(&mut self, reg: usize) {
        let e = self.e_up(reg);
        let inside = self.reg(reg).inside;
        if let Some(f) = self.mesh.lface(e) {
            let face = self.mesh.face_mut(f);
            face.inside = inside;
            face.an_edge = e;
        }
        self.delete_region(reg);
    }

    /// Finish the regions from `reg_first` down to `reg_last` (or down
    /// to the first region whose upper edge has a different origin),
    /// relinking the mesh edges to match the dictionary order. Returns
    /// the lowest left-going edge at the shared origin.
    fn finish_left_regions(&mut self, reg_first: usize, reg_last: Option<usize>) -> Result<usize> {
        let mut reg_prev = reg_first;
        let mut e_prev = self.e_up(reg_first);
        while Some(reg_prev) != reg_last {
            // The placement was fine.
            self.reg_mut(reg_prev).fix_upper_edge = false;
            let reg = self.below(reg_prev);
            let mut e = self.e_up(reg);
            if self.mesh.org(e) != self.mesh.org(e_prev) {
                if !self.reg(reg).fix_upper_edge {
                    // Last left-going edge. There may be more in the
                    // mesh, so the face still needs finishing.
                    self.finish_region(reg_prev);
                    break;
                }
                // The edge below was a temporary edge; fix it now.
                e = self.mesh.connect(self.mesh.lprev(e_prev), sym(e))?;
                self.fix_upper_edge(reg, e)?;
            }

            // Relink edges so that e_prev.onext == e.
            if self.mesh.onext(e_prev) != e {
                self.mesh.splice(self.mesh.oprev(e), e)?;
                self.mesh.splice(e_prev, e)?;
            }
            self.finish_region(reg_prev);
            e_prev = self.e_up(reg);
            reg_prev = reg;
        }
        Ok(e_prev)
    }

    /// Add the right-going edges `e_first..e_last` (in `onext` order
    /// around their shared origin) below `reg_up`, then update windings
    /// and relink the mesh around the origin in dictionary order.
    ///
    /// `e_top_left` is the edge just above the new ones at the origin,
    /// or `None` when the origin has no left-going edges. With
    /// `clean_up`, newly adjacent edges are checked for intersections.
    fn add_right_edges(
        &mut self,
        reg_up: usize,
        e_first: usize,
        e_last: usize,
        e_top_left: Option<usize>,
        clean_up: bool,
    ) -> Result<()> {
        // Insert the new right-going edges in the dictionary.
        let mut e = e_first;
        loop {
            debug_assert!(self.mesh.edge_goes_right(e));
            self.add_region_below(reg_up, sym(e))?;
            e = self.mesh.onext(e);
            if e == e_last {
                break;
            }
        }

        // Walk all right-going edges from the origin in dictionary
        // order, updating windings and relinking the mesh to match.
        let e_top_left = match e_top_left {
            Some(e) => e,
            None => self.mesh.rprev(self.e_up(self.below(reg_up))),
        };
        let mut reg_prev = reg_up;
        let mut e_prev = e_top_left;
        let mut first_time = true;
        loop {
            let reg = self.below(reg_prev);
            let e = sym(self.e_up(reg));
            if self.mesh.org(e) != self.mesh.org(e_prev) {
                break;
            }

            if self.mesh.onext(e) != e_prev {
                // Unlink e from its current position, and relink below
                // e_prev.
                self.mesh.splice(self.mesh.oprev(e), e)?;
                self.mesh.splice(self.mesh.oprev(e_prev), e)?;
            }
            // Winding number and inside flag for the new region.
            let n = self.reg(reg_prev).winding_number - self.mesh.edge(e).winding;
            let inside = self.rule.is_inside(n);
            let r = self.reg_mut(reg);
            r.winding_number = n;
            r.inside = inside;

            // Two outgoing edges with the same slope are merged before
            // any intersection tests.
            self.reg_mut(reg_prev).dirty = true;
            if !first_time && self.check_for_right_splice(reg_prev)? {
                self.mesh.add_winding(e, e_prev);
                self.delete_region(reg_prev);
                self.mesh.delete_edge(e_prev)?;
            }
            first_time = false;
            reg_prev = reg;
            e_prev = e;
        }
        self.reg_mut(reg_prev).dirty = true;

        if clean_up {
            self.walk_dirty_regions(reg_prev)?;
        }
        Ok(())
    }

    /// Process one vertex event.
    fn sweep_event(&mut self, v_event: usize) -> Result<()> {
        self.event = v_event;
        trace!("sweep event {v_event} at {:?}", self.mesh.pt(v_event));

        // Is this vertex the right end point of an edge already in the
        // dictionary?
        let start = self.mesh.vert(v_event).an_edge;
        let mut e = start;
        while self.mesh.edge(e).active_region.is_none() {
            e = self.mesh.onext(e);
            if e == start {
                // All edges go right: not incident to any processed
                // edges.
                return self.connect_left_vertex(v_event);
            }
        }

        // First finish the regions where both the upper and lower edges
        // end at the event, then add the right-going edges.
        let region = self
            .mesh
            .edge(e)
            .active_region
            .expect("active region of edge not found in storage");
        let reg_up = self.top_left_region(region)?;
        let reg = self.below(reg_up);
        let e_top_left = self.e_up(reg);
        let e_bottom_left = self.finish_left_regions(reg, None)?;

        if self.mesh.onext(e_bottom_left) == e_top_left {
            // No right-going edges: add a temporary fixable edge.
            self.connect_right_vertex(reg_up, e_bottom_left)
        } else {
            let first = self.mesh.onext(e_bottom_left);
            self.add_right_edges(reg_up, first, e_top_left, Some(e_top_left), true)
        }
    }

    fn done_edge_dict(&mut self) {
        while let Some(reg) = self.dict.key(self.dict.min()) {
            // Only the sentinels and at most one temporary edge left.
            if !self.reg(reg).sentinel {
                debug_assert!(self.reg(reg).fix_upper_edge);
            }
            debug_assert_eq!(self.reg(reg).winding_number, 0);
            self.delete_region(reg);
        }
        debug_assert!(self.dict.is_empty());
    }

    /// Merge the origin of `e2` into the origin of `e1`.
    fn splice_merge_vertices(&mut self, e1: usize, e2: usize) -> Result<()> {
        self.mesh.splice(e1, e2)
    }

    /// Fill in the attributes of intersection vertex `isect` by
    /// blending the end points of both edges, weighted by distance.
    fn intersect_data(&mut self, isect: usize, org_up: usize, dst_up: usize, org_lo: usize, dst_lo: usize) {
        let at = self.mesh.pt(isect);
        let mut coords = [0.; MAX_DIMENSIONS];
        for (org, dst) in [(org_up, dst_up), (org_lo, dst_lo)] {
            let (w0, w1) = vertex_weights(at, self.mesh.pt(org), self.mesh.pt(dst));
            let (c0, c1) = (self.mesh.vert(org).coords, self.mesh.vert(dst).coords);
            for (c, (x, y)) in coords.iter_mut().zip(c0.iter().zip(c1.iter())) {
                *c += w0 * x + w1 * y;
            }
        }
        let v = self.mesh.vert_mut(isect);
        v.coords = coords;
        v.idx = TESS_UNDEF;
        trace!("intersection vertex {isect} at {at:?}");
    }
}

/// Weights of the two end points of an edge at `isect`, each inversely
/// proportional to its L1 distance. They sum to 1/2.
fn vertex_weights(isect: SweepPoint, org: SweepPoint, dst: SweepPoint) -> (Real, Real) {
    let t1 = vert_l1_dist(org, isect);
    let t2 = vert_l1_dist(dst, isect);
    if t1 + t2 > 0. {
        (0.5 * t2 / (t1 + t2), 0.5 * t1 / (t1 + t2))
    } else {
        (0.25, 0.25)
    }
}

/// Remove zero-length edges, and contours with fewer than three edges.
fn remove_degenerate_edges(mesh: &mut Mesh) -> Result<()> {
    let mut e = mesh.first_edge();
    let mut removed = 0;
    while e != E_HEAD {
        let mut e_next = mesh.edge(e).next;
        let mut e_lnext = mesh.lnext(e);

        if vert_eq(mesh.org_pt(e), mesh.dst_pt(e)) && mesh.lnext(e_lnext) != e {
            // Zero-length edge, contour has at least 3 edges.
            mesh.splice(e_lnext, e)?;
            mesh.delete_edge(e)?;
            removed += 1;
            e = e_lnext;
            e_lnext = mesh.lnext(e);
        }
        if mesh.lnext(e_lnext) == e {
            // Degenerate contour of one or two edges.
            if e_lnext != e {
                if e_lnext == e_next || e_lnext == sym(e_next) {
                    e_next = mesh.edge(e_next).next;
                }
                mesh.delete_edge(e_lnext)?;
                removed += 1;
            }
            if e == e_next || e == sym(e_next) {
                e_next = mesh.edge(e_next).next;
            }
            mesh.delete_edge(e)?;
            removed += 1;
        }
        e = e_next;
    }
    if removed > 0 {
        debug!("removed {removed} degenerate edges");
    }
    Ok(())
}

/// Remove faces bounded by only two edges, folding their winding into
/// the neighbouring edge.
fn remove_degenerate_faces(mesh: &mut Mesh) -> Result<()> {
    let mut f = mesh.next_face(F_HEAD);
    while f != F_HEAD {
        let f_next = mesh.next_face(f);
        let e = mesh.face(f).an_edge;
        debug_assert_ne!(mesh.lnext(e), e);
        if mesh.lnext(mesh.lnext(e)) == e {
            trace!("removing two-edge face {f}");
            mesh.add_winding(mesh.onext(e), e);
            mesh.delete_edge(e)?;
        }
        f = f_next;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::mesh::tests::{add_loop, new_mesh};
    use crate::tests::init_log;

    fn bounds(mesh: &Mesh) -> (SweepPoint, SweepPoint) {
        let (mut smin, mut tmin) = (Real::MAX, Real::MAX);
        let (mut smax, mut tmax) = (Real::MIN, Real::MIN);
        for v in mesh.vertices() {
            let p = mesh.pt(v);
            smin = smin.min(p.s);
            smax = smax.max(p.s);
            tmin = tmin.min(p.t);
            tmax = tmax.max(p.t);
        }
        (SweepPoint::new(smin, tmin), SweepPoint::new(smax, tmax))
    }

    fn interior(mesh: &mut Mesh, rule: WindingRule) {
        let (bmin, bmax) = bounds(mesh);
        compute_interior(mesh, rule, &AllocatorConfig::default(), bmin, bmax).unwrap();
    }

    /// Total signed area of the faces marked inside.
    fn inside_area(mesh: &Mesh) -> Real {
        mesh.faces()
            .filter(|&f| mesh.face(f).inside)
            .map(|f| {
                mesh.face_loop(mesh.face(f).an_edge)
                    .map(|e| {
                        let (a, b) = (mesh.org_pt(e), mesh.dst_pt(e));
                        a.s * b.t - b.s * a.t
                    })
                    .sum::<Real>()
                    / 2.
            })
            .sum()
    }

    #[test]
    fn single_square() {
        init_log();
        let mut mesh = new_mesh();
        add_loop(&mut mesh, &[(0., 0.), (4., 0.), (4., 4.), (0., 4.)]);
        interior(&mut mesh, WindingRule::Odd);
        let inside: Vec<_> = mesh.faces().filter(|&f| mesh.face(f).inside).collect();
        assert_eq!(inside.len(), 1);
        assert_eq!(mesh.count_face_verts(inside[0]), 4);
        assert_relative_eq!(inside_area(&mesh), 16.);
    }

    #[test]
    fn bow_tie_gets_intersection() {
        init_log();
        let mut mesh = new_mesh();
        let input = [(0., 0.), (2., 2.), (2., 0.), (0., 2.)];
        add_loop(&mut mesh, &input);
        interior(&mut mesh, WindingRule::NonZero);

        // Ignore the vertices of the bounding sentinel edges.
        let synthetic: Vec<_> = mesh
            .vertices()
            .filter(|&v| {
                let p = mesh.pt(v);
                (0. ..=2.).contains(&p.s) && (0. ..=2.).contains(&p.t)
            })
            .filter(|&v| !input.contains(&(mesh.pt(v).s, mesh.pt(v).t)))
            .collect();
        assert_eq!(synthetic.len(), 1);
        let v = mesh.vert(synthetic[0]);
        assert_relative_eq!(v.s, 1.);
        assert_relative_eq!(v.t, 1.);
        assert_relative_eq!(v.coords[0], 1.);
        assert_relative_eq!(v.coords[1], 1.);
        assert_eq!(v.idx, TESS_UNDEF);
        assert_relative_eq!(inside_area(&mesh), 2.);
    }

    #[test]
    fn winding_rules_on_nested_squares() {
        init_log();
        let outer = [(0., 0.), (10., 0.), (10., 10.), (0., 10.)];
        let inner = [(2., 2.), (8., 2.), (8., 8.), (2., 8.)];
        let cases = [
            (WindingRule::Odd, 64.),
            (WindingRule::NonZero, 100.),
            (WindingRule::Positive, 100.),
            (WindingRule::Negative, 0.),
            (WindingRule::AbsGeqTwo, 36.),
        ];
        for (rule, expected) in cases {
            let mut mesh = new_mesh();
            add_loop(&mut mesh, &outer);
            add_loop(&mut mesh, &inner);
            interior(&mut mesh, rule);
            assert_relative_eq!(inside_area(&mesh), expected);
        }
    }

    #[test]
    fn zero_length_edges_removed() {
        init_log();
        let mut mesh = new_mesh();
        add_loop(&mut mesh, &[(0., 0.), (1., 0.), (1., 0.), (1., 1.)]);
        // A two-vertex contour disappears entirely.
        add_loop(&mut mesh, &[(5., 5.), (6., 6.)]);
        remove_degenerate_edges(&mut mesh).unwrap();
        mesh.check_mesh();
        assert_eq!(mesh.vertices().count(), 3);
    }

    #[test]
    fn weights_sum_to_half() {
        let (w0, w1) = vertex_weights(
            SweepPoint::new(1., 0.),
            SweepPoint::new(0., 0.),
            SweepPoint::new(4., 0.),
        );
        assert_eq!(w0 + w1, 0.5);
        assert!(w0 > w1);
        let origin = SweepPoint::new(0., 0.);
        assert_eq!(vertex_weights(origin, origin, origin), (0.25, 0.25));
    }
}
