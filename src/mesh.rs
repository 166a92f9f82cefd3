//! Half-edge mesh.
//!
//! Every undirected edge is a pair of half-edges stored together in
//! one pool slot; half-edge `e` lives in slot `e >> 1` and its twin is
//! `e ^ 1`. Vertices and faces are kept in circular doubly linked lists
//! threaded through their pools, each anchored at a dummy head stored
//! at key 0. Half-edge pairs are linked the same way, using `next` on
//! the even half and the twin's `next` as the back link.
//!
//! The two primitives are [`Mesh::make_edge`] and [`Mesh::splice`];
//! everything else is built from them. All operations keep the twin
//! relation and the origin/left-face rings consistent.
use log::trace;

use crate::alloc::{Allocator, AllocatorConfig, EntityKind, Pool};
use crate::error::Result;
use crate::events::{EventHandle, SweepPoint};
use crate::geom::vert_leq;
use crate::{Real, MAX_DIMENSIONS, TESS_UNDEF};

mod ops;

pub(crate) const V_HEAD: usize = 0;
pub(crate) const F_HEAD: usize = 0;
pub(crate) const E_HEAD: usize = 0;

#[derive(Debug, Clone)]
pub(crate) struct Vertex {
    pub next: usize,
    pub prev: usize,
    /// A half-edge with this vertex as origin.
    pub an_edge: usize,
    pub coords: [Real; MAX_DIMENSIONS],
    pub s: Real,
    pub t: Real,
    pub pq_handle: Option<EventHandle>,
    /// Output index.
    pub n: u32,
    /// Original input index, or `TESS_UNDEF` for synthetic vertices.
    pub idx: u32,
}

impl Vertex {
    fn new(next: usize, prev: usize, an_edge: usize) -> Self {
        Vertex {
            next,
            prev,
            an_edge,
            coords: [0.; MAX_DIMENSIONS],
            s: 0.,
            t: 0.,
            pq_handle: None,
            n: TESS_UNDEF,
            idx: TESS_UNDEF,
        }
    }

    #[inline]
    pub fn point(&self) -> SweepPoint {
        SweepPoint::new(self.s, self.t)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Face {
    pub next: usize,
    pub prev: usize,
    /// A half-edge with this face on its left.
    pub an_edge: usize,
    /// Output index.
    pub n: u32,
    pub inside: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct HalfEdge {
    /// Edge-list link; only meaningful on even halves (the twin's
    /// `next` is the back link).
    pub next: usize,
    /// Next edge CCW around the origin.
    pub onext: usize,
    /// Next edge CCW around the left face.
    pub lnext: usize,
    pub org: usize,
    pub lface: Option<usize>,
    pub active_region: Option<usize>,
    /// Change in winding number when crossing from the right face to
    /// the left face.
    pub winding: i32,
}

impl HalfEdge {
    fn new(e: usize) -> Self {
        HalfEdge {
            next: e,
            onext: e,
            lnext: e ^ 1,
            org: V_HEAD,
            lface: None,
            active_region: None,
            winding: 0,
        }
    }
}

#[inline]
pub(crate) fn sym(e: usize) -> usize {
    e ^ 1
}

/// The mesh, together with the allocator its pools draw from.
pub(crate) struct Mesh {
    verts: Pool<Vertex>,
    faces: Pool<Face>,
    edges: Pool<[HalfEdge; 2]>,
    alloc: Box<dyn Allocator>,
}

impl Mesh {
    pub fn new(alloc: Box<dyn Allocator>, config: &AllocatorConfig) -> Result<Self> {
        let mut mesh = Self::unclaimed(alloc, config);
        match mesh.claim_heads() {
            Ok(()) => Ok(mesh),
            Err(err) => {
                mesh.release();
                Err(err)
            }
        }
    }

    /// A mesh whose pools hold nothing yet, not even the list heads.
    /// [`claim_heads`](Self::claim_heads) must succeed before use.
    pub fn unclaimed(alloc: Box<dyn Allocator>, config: &AllocatorConfig) -> Self {
        Mesh {
            verts: Pool::new(EntityKind::Vertex, config),
            faces: Pool::new(EntityKind::Face, config),
            edges: Pool::new(EntityKind::Edge, config),
            alloc,
        }
    }

    pub fn claim_heads(&mut self) -> Result<()> {
        let v = self
            .verts
            .insert(&mut *self.alloc, Vertex::new(V_HEAD, V_HEAD, E_HEAD))?;
        let f = self.faces.insert(
            &mut *self.alloc,
            Face {
                next: F_HEAD,
                prev: F_HEAD,
                an_edge: E_HEAD,
                n: TESS_UNDEF,
                inside: false,
            },
        )?;
        let e = self
            .edges
            .insert(&mut *self.alloc, [HalfEdge::new(0), HalfEdge::new(1)])?;
        debug_assert_eq!((v, f, e), (V_HEAD, F_HEAD, E_HEAD));
        Ok(())
    }

    /// Hand back every pool bucket and return the allocator.
    pub fn release(mut self) -> Box<dyn Allocator> {
        self.verts.release(&mut *self.alloc);
        self.faces.release(&mut *self.alloc);
        self.edges.release(&mut *self.alloc);
        self.alloc
    }

    #[inline]
    pub fn allocator(&mut self) -> &mut dyn Allocator {
        &mut *self.alloc
    }

    // Accessors.

    #[inline]
    pub fn edge(&self, e: usize) -> &HalfEdge {
        &self.edges[e >> 1][e & 1]
    }

    #[inline]
    pub fn edge_mut(&mut self, e: usize) -> &mut HalfEdge {
        &mut self.edges[e >> 1][e & 1]
    }

    #[inline]
    pub fn vert(&self, v: usize) -> &Vertex {
        &self.verts[v]
    }

    #[inline]
    pub fn vert_mut(&mut self, v: usize) -> &mut Vertex {
        &mut self.verts[v]
    }

    #[inline]
    pub fn face(&self, f: usize) -> &Face {
        &self.faces[f]
    }

    #[inline]
    pub fn face_mut(&mut self, f: usize) -> &mut Face {
        &mut self.faces[f]
    }

    // Navigation.

    #[inline]
    pub fn onext(&self, e: usize) -> usize {
        self.edge(e).onext
    }

    #[inline]
    pub fn lnext(&self, e: usize) -> usize {
        self.edge(e).lnext
    }

    #[inline]
    pub fn org(&self, e: usize) -> usize {
        self.edge(e).org
    }

    #[inline]
    pub fn dst(&self, e: usize) -> usize {
        self.edge(sym(e)).org
    }

    #[inline]
    pub fn lface(&self, e: usize) -> Option<usize> {
        self.edge(e).lface
    }

    #[inline]
    pub fn rface(&self, e: usize) -> Option<usize> {
        self.edge(sym(e)).lface
    }

    #[inline]
    pub fn oprev(&self, e: usize) -> usize {
        self.edge(sym(e)).lnext
    }

    #[inline]
    pub fn lprev(&self, e: usize) -> usize {
        sym(self.edge(e).onext)
    }

    #[inline]
    pub fn rprev(&self, e: usize) -> usize {
        self.edge(sym(e)).onext
    }

    #[inline]
    pub fn dnext(&self, e: usize) -> usize {
        sym(self.rprev(e))
    }

    /// Sweep-plane position of `v`.
    #[inline]
    pub fn pt(&self, v: usize) -> SweepPoint {
        self.verts[v].point()
    }

    #[inline]
    pub fn org_pt(&self, e: usize) -> SweepPoint {
        self.pt(self.org(e))
    }

    #[inline]
    pub fn dst_pt(&self, e: usize) -> SweepPoint {
        self.pt(self.dst(e))
    }

    #[inline]
    pub fn edge_goes_left(&self, e: usize) -> bool {
        vert_leq(self.dst_pt(e), self.org_pt(e))
    }

    #[inline]
    pub fn edge_goes_right(&self, e: usize) -> bool {
        vert_leq(self.org_pt(e), self.dst_pt(e))
    }

    /// Add `src`'s winding to `dst` (on both halves).
    pub fn add_winding(&mut self, dst: usize, src: usize) {
        let (w, w_sym) = (self.edge(src).winding, self.edge(sym(src)).winding);
        self.edge_mut(dst).winding += w;
        self.edge_mut(sym(dst)).winding += w_sym;
    }

    /// Iterator over the vertex keys, in list order.
    pub fn vertices(&self) -> impl Iterator<Item = usize> + '_ {
        let mut v = self.verts[V_HEAD].next;
        std::iter::from_fn(move || {
            if v == V_HEAD {
                return None;
            }
            let cur = v;
            v = self.verts[v].next;
            Some(cur)
        })
    }

    /// Iterator over the face keys, in list order.
    pub fn faces(&self) -> impl Iterator<Item = usize> + '_ {
        let mut f = self.faces[F_HEAD].next;
        std::iter::from_fn(move || {
            if f == F_HEAD {
                return None;
            }
            let cur = f;
            f = self.faces[f].next;
            Some(cur)
        })
    }

    /// Half-edges around the left face of `start`, beginning with
    /// `start`.
    pub fn face_loop(&self, start: usize) -> impl Iterator<Item = usize> + '_ {
        let mut e = Some(start);
        std::iter::from_fn(move || {
            let cur = e?;
            let next = self.lnext(cur);
            e = if next == start { None } else { Some(next) };
            Some(cur)
        })
    }

    #[inline]
    pub fn next_face(&self, f: usize) -> usize {
        self.faces[f].next
    }

    #[inline]
    pub fn first_edge(&self) -> usize {
        self.edge(E_HEAD).next
    }

    // Low-level list surgery.

    /// Exchange `a.onext` and `b.onext`.
    ///
    /// If `a` and `b` share an origin this splits the origin ring in
    /// two, otherwise it joins the two rings. The left-face rings are
    /// updated correspondingly.
    fn splice_rings(&mut self, a: usize, b: usize) {
        let a_onext = self.onext(a);
        let b_onext = self.onext(b);
        self.edge_mut(sym(a_onext)).lnext = b;
        self.edge_mut(sym(b_onext)).lnext = a;
        self.edge_mut(a).onext = b_onext;
        self.edge_mut(b).onext = a_onext;
    }

    /// New edge pair, linked into the edge list before `e_next`.
    fn alloc_edge_pair(&mut self, e_next: usize) -> Result<usize> {
        let pair = self.edges.insert(
            &mut *self.alloc,
            [HalfEdge::new(0), HalfEdge::new(1)],
        )?;
        let e = pair << 1;
        let e_sym = e | 1;
        *self.edge_mut(e) = HalfEdge::new(e);
        *self.edge_mut(e_sym) = HalfEdge::new(e_sym);

        // Make sure e_next points to the first edge of its pair.
        let e_next = e_next & !1;
        let e_prev = self.edge(sym(e_next)).next;
        self.edge_mut(e_sym).next = e_prev;
        self.edge_mut(sym(e_prev)).next = e;
        self.edge_mut(e).next = e_next;
        self.edge_mut(sym(e_next)).next = e_sym;
        Ok(e)
    }

    /// New vertex before `v_next` in the vertex list, made the origin
    /// of every edge in the origin ring of `e_orig`.
    fn alloc_vertex(&mut self, e_orig: usize, v_next: usize) -> Result<usize> {
        let v_prev = self.verts[v_next].prev;
        let v = self
            .verts
            .insert(&mut *self.alloc, Vertex::new(v_next, v_prev, e_orig))?;
        self.verts[v_prev].next = v;
        self.verts[v_next].prev = v;
        self.set_ring_org(e_orig, v);
        Ok(v)
    }

    fn set_ring_org(&mut self, e_orig: usize, v: usize) {
        let mut e = e_orig;
        loop {
            self.edge_mut(e).org = v;
            e = self.onext(e);
            if e == e_orig {
                break;
            }
        }
    }

    /// New face before `f_next` in the face list, made the left face
    /// of every edge in the left ring of `e_orig`.
    fn alloc_face(&mut self, e_orig: usize, f_next: usize) -> Result<usize> {
        let f_prev = self.faces[f_next].prev;
        let inside = self.faces[f_next].inside;
        let f = self.faces.insert(
            &mut *self.alloc,
            Face {
                next: f_next,
                prev: f_prev,
                an_edge: e_orig,
                n: TESS_UNDEF,
                inside,
            },
        )?;
        self.faces[f_prev].next = f;
        self.faces[f_next].prev = f;
        self.set_ring_lface(e_orig, Some(f));
        Ok(f)
    }

    fn set_ring_lface(&mut self, e_orig: usize, f: Option<usize>) {
        let mut e = e_orig;
        loop {
            self.edge_mut(e).lface = f;
            e = self.lnext(e);
            if e == e_orig {
                break;
            }
        }
    }

    /// Unlink `e_del`'s pair from the edge list and free it.
    fn kill_edge(&mut self, e_del: usize) {
        let e_del = e_del & !1;
        let e_next = self.edge(e_del).next;
        let e_prev = self.edge(sym(e_del)).next;
        self.edge_mut(sym(e_next)).next = e_prev;
        self.edge_mut(sym(e_prev)).next = e_next;
        self.edges.remove(e_del >> 1);
    }

    /// Remove vertex `v`, re-pointing its origin ring at `new_org`.
    fn kill_vertex(&mut self, v: usize, new_org: Option<usize>) {
        if let Some(new_org) = new_org {
            let e_start = self.verts[v].an_edge;
            self.set_ring_org(e_start, new_org);
        }
        let Vertex { next, prev, .. } = self.verts.remove(v);
        self.verts[next].prev = prev;
        self.verts[prev].next = next;
    }

    /// Remove face `f`, re-pointing its left ring at `new_lface`.
    fn kill_face(&mut self, f: usize, new_lface: Option<usize>) {
        let e_start = self.faces[f].an_edge;
        self.set_ring_lface(e_start, new_lface);
        let Face { next, prev, .. } = self.faces.remove(f);
        self.faces[next].prev = prev;
        self.faces[prev].next = next;
    }

    /// Claim storage for the entities an operation is about to create,
    /// so that it fails before any topology changes.
    fn reserve(&mut self, verts: usize, faces: usize, edges: usize) -> Result<()> {
        self.verts.reserve(&mut *self.alloc, verts)?;
        self.faces.reserve(&mut *self.alloc, faces)?;
        self.edges.reserve(&mut *self.alloc, edges)
    }

    // Mesh operations.

    /// Create one edge, two vertices and a loop (face). The edge is a
    /// loop on its own: its left and right face coincide.
    pub fn make_edge(&mut self) -> Result<usize> {
        self.reserve(2, 1, 1)?;
        let e = self.alloc_edge_pair(E_HEAD)?;
        self.alloc_vertex(e, V_HEAD)?;
        self.alloc_vertex(sym(e), V_HEAD)?;
        self.alloc_face(e, F_HEAD)?;
        Ok(e)
    }

    /// The basic operation for changing the mesh connectivity and
    /// topology. Exchanges `e_org.onext` and `e_dst.onext`:
    ///
    /// - if the origins differ, the two vertices are merged (the origin
    ///   of `e_dst` is deleted), otherwise the shared vertex is split
    ///   in two;
    /// - if the left faces differ, the two faces are merged (`e_dst`'s
    ///   is deleted), otherwise the face is split in two.
    pub fn splice(&mut self, e_org: usize, e_dst: usize) -> Result<()> {
        if e_org == e_dst {
            return Ok(());
        }

        let joining_vertices = self.org(e_dst) != self.org(e_org);
        let joining_loops = self.lface(e_dst) != self.lface(e_org);
        let new_face = !joining_loops && self.lface(e_org).is_some();
        self.reserve(usize::from(!joining_vertices), usize::from(new_face), 0)?;

        if joining_vertices {
            // Merging two disjoint vertices: destroy e_dst's origin.
            let (old, new) = (self.org(e_dst), self.org(e_org));
            self.kill_vertex(old, Some(new));
        }
        if joining_loops {
            // Connecting two disjoint loops: destroy e_dst's left face.
            if let Some(f) = self.lface(e_dst) {
                let keep = self.lface(e_org);
                self.kill_face(f, keep);
            }
        }

        self.splice_rings(e_dst, e_org);

        if !joining_vertices {
            // Split one vertex into two: the new one is e_dst's origin.
            let before = self.org(e_org);
            self.alloc_vertex(e_dst, before)?;
            self.verts[before].an_edge = e_org;
        }
        if !joining_loops {
            // Split one loop into two: the new one is e_dst's left face.
            if let Some(f) = self.lface(e_org) {
                self.alloc_face(e_dst, f)?;
                self.faces[f].an_edge = e_org;
            }
        }
        Ok(())
    }

    /// Remove the edge `e_del`, with the effect of `splice`ing it away
    /// from both end points. Faces are joined when the edge separated
    /// two of them; vertices left without edges are deleted.
    pub fn delete_edge(&mut self, e_del: usize) -> Result<()> {
        let e_del_sym = sym(e_del);

        let joining_loops = self.lface(e_del) != self.rface(e_del);
        let new_face =
            !joining_loops && self.onext(e_del) != e_del && self.lface(e_del).is_some();
        self.reserve(0, usize::from(new_face), 0)?;

        if joining_loops {
            // Joining two loops into one: remove the left face.
            if let Some(f) = self.lface(e_del) {
                let keep = self.rface(e_del);
                self.kill_face(f, keep);
            }
        }

        if self.onext(e_del) == e_del {
            let v = self.org(e_del);
            self.kill_vertex(v, None);
        } else {
            // Make sure that e_del's origin and right face point to
            // valid half-edges that are not e_del.
            let oprev = self.oprev(e_del);
            if let Some(rf) = self.rface(e_del) {
                self.faces[rf].an_edge = oprev;
            }
            let onext = self.onext(e_del);
            let org = self.org(e_del);
            self.verts[org].an_edge = onext;

            self.splice_rings(e_del, oprev);
            if !joining_loops {
                // Splitting one loop into two: create a new one for
                // e_del.
                if let Some(f) = self.lface(e_del) {
                    self.alloc_face(e_del, f)?;
                }
            }
        }

        // e_del is now alone in its origin ring; deal with its twin.
        if self.onext(e_del_sym) == e_del_sym {
            let v = self.org(e_del_sym);
            self.kill_vertex(v, None);
            if let Some(f) = self.lface(e_del_sym) {
                self.kill_face(f, None);
            }
        } else {
            // Make sure that e_del's destination and left face point to
            // valid half-edges.
            let oprev = self.oprev(e_del_sym);
            if let Some(lf) = self.lface(e_del) {
                self.faces[lf].an_edge = oprev;
            }
            let onext = self.onext(e_del_sym);
            let org = self.org(e_del_sym);
            self.verts[org].an_edge = onext;
            self.splice_rings(e_del_sym, oprev);
        }

        self.kill_edge(e_del);
        Ok(())
    }

    /// Create a new edge `e_new` with `e_new.org == e_org.dst`, a new
    /// destination vertex, and `e_new.lface == e_org.lface`. Returns
    /// `e_new`.
    pub fn add_edge_vertex(&mut self, e_org: usize) -> Result<usize> {
        self.reserve(1, 0, 1)?;
        let e_new = self.alloc_edge_pair(e_org)?;
        let e_new_sym = sym(e_new);

        // Connect the new edge appropriately.
        let lnext = self.lnext(e_org);
        self.splice_rings(e_new, lnext);

        // Set the vertex and face information.
        let org = self.dst(e_org);
        self.edge_mut(e_new).org = org;
        self.alloc_vertex(e_new_sym, org)?;
        let lface = self.lface(e_org);
        self.edge_mut(e_new).lface = lface;
        self.edge_mut(e_new_sym).lface = lface;
        Ok(e_new)
    }

    /// Split `e_org` into two edges `e_org` and `e_new`, such that
    /// `e_new == e_org.lnext`. The new vertex is `e_org.dst ==
    /// e_new.org`. Windings are copied onto `e_new`.
    pub fn split_edge(&mut self, e_org: usize) -> Result<usize> {
        let temp = self.add_edge_vertex(e_org)?;
        let e_new = sym(temp);

        // Disconnect e_org from e_org.dst and connect it to e_new.org.
        let e_org_sym = sym(e_org);
        let oprev = self.oprev(e_org_sym);
        self.splice_rings(e_org_sym, oprev);
        self.splice_rings(e_org_sym, e_new);

        // Set the vertex and face information.
        let new_org = self.org(e_new);
        self.edge_mut(e_org_sym).org = new_org;
        let e_new_dst = self.dst(e_new);
        self.verts[e_new_dst].an_edge = sym(e_new);
        let rface = self.rface(e_org);
        self.edge_mut(sym(e_new)).lface = rface;
        let (w, w_sym) = (self.edge(e_org).winding, self.edge(e_org_sym).winding);
        self.edge_mut(e_new).winding = w;
        self.edge_mut(sym(e_new)).winding = w_sym;
        Ok(e_new)
    }

    /// Create a new edge from `e_org.dst` to `e_dst.org` and return it.
    ///
    /// If `e_org.lface == e_dst.lface` that face is split in two and
    /// the new one becomes `e_new.lface`; otherwise the two faces are
    /// merged.
    pub fn connect(&mut self, e_org: usize, e_dst: usize) -> Result<usize> {
        let joining_loops = self.lface(e_dst) != self.lface(e_org);
        let new_face = !joining_loops && self.lface(e_org).is_some();
        self.reserve(0, usize::from(new_face), 1)?;

        let e_new = self.alloc_edge_pair(e_org)?;
        let e_new_sym = sym(e_new);

        if joining_loops {
            // Connecting two disjoint loops: destroy e_dst's left face.
            if let Some(f) = self.lface(e_dst) {
                let keep = self.lface(e_org);
                self.kill_face(f, keep);
            }
        }

        // Connect the new edge appropriately.
        let lnext = self.lnext(e_org);
        self.splice_rings(e_new, lnext);
        self.splice_rings(e_new_sym, e_dst);

        // Set the vertex and face information.
        let (org, dst) = (self.dst(e_org), self.org(e_dst));
        self.edge_mut(e_new).org = org;
        self.edge_mut(e_new_sym).org = dst;
        let lface = self.lface(e_org);
        self.edge_mut(e_new).lface = lface;
        self.edge_mut(e_new_sym).lface = lface;

        if let Some(f) = lface {
            // Make sure the old face points to a valid half-edge.
            self.faces[f].an_edge = e_new_sym;
            if !joining_loops {
                self.alloc_face(e_new, f)?;
            }
        }
        Ok(e_new)
    }

    fn check_half_edge(&self, e: usize) {
        assert_ne!(sym(e), e);
        assert_eq!(sym(sym(e)), e);
        assert_eq!(sym(self.onext(self.lnext(e))), e);
        assert_eq!(self.lnext(sym(self.onext(e))), e);
    }

    /// Debug check of the mesh invariants. Panics on the first
    /// violation.
    ///
    /// Besides the local twin and ring relations, every half-edge in
    /// the edge list must be reachable from its origin vertex, and from
    /// its left face when it has one.
    pub fn check_mesh(&self) {
        let mut on_faces = 0;
        let mut f_prev = F_HEAD;
        for f in self.faces() {
            assert_eq!(self.faces[f].prev, f_prev);
            for e in self.face_loop(self.faces[f].an_edge) {
                self.check_half_edge(e);
                assert_eq!(self.lface(e), Some(f));
                on_faces += 1;
            }
            f_prev = f;
        }
        assert_eq!(self.faces[F_HEAD].prev, f_prev);

        let mut on_vertices = 0;
        let mut v_prev = V_HEAD;
        for v in self.vertices() {
            assert_eq!(self.verts[v].prev, v_prev);
            let start = self.verts[v].an_edge;
            let mut e = start;
            loop {
                self.check_half_edge(e);
                assert_eq!(self.org(e), v);
                on_vertices += 1;
                e = self.onext(e);
                if e == start {
                    break;
                }
            }
            v_prev = v;
        }
        assert_eq!(self.verts[V_HEAD].prev, v_prev);

        let (mut halves, mut with_face) = (0, 0);
        let mut e_prev = E_HEAD;
        let mut e = self.first_edge();
        while e != E_HEAD {
            assert_eq!(self.edge(sym(e)).next, sym(e_prev));
            self.check_half_edge(e);
            assert!(self.verts.contains(self.org(e)) && self.org(e) != V_HEAD);
            assert!(self.verts.contains(self.dst(e)) && self.dst(e) != V_HEAD);
            for h in [e, sym(e)] {
                if let Some(f) = self.lface(h) {
                    assert!(self.faces.contains(f) && f != F_HEAD);
                    with_face += 1;
                }
            }
            halves += 2;
            e_prev = e;
            e = self.edge(e).next;
        }
        assert_eq!(self.edge(sym(e)).next, sym(e_prev));
        assert_eq!(on_vertices, halves, "half-edges missing from vertex rings");
        assert_eq!(on_faces, with_face, "half-edges missing from face loops");
        trace!("mesh check passed");
    }
}
