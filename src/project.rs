//! Projection of the input vertices onto the sweep plane.
use itertools::Itertools;
use log::debug;

use crate::events::SweepPoint;
use crate::mesh::Mesh;
use crate::Real;

type Vec3 = [Real; 3];

#[inline]
fn dot(u: &Vec3, v: &Vec3) -> Real {
    u[0] * v[0] + u[1] * v[1] + u[2] * v[2]
}

#[inline]
fn is_zero(v: &Vec3) -> bool {
    v.iter().all(|&c| c == 0.)
}

fn long_axis(v: &Vec3) -> usize {
    let mut i = 0;
    if v[1].abs() > v[0].abs() {
        i = 1;
    }
    if v[2].abs() > v[i].abs() {
        i = 2;
    }
    i
}

fn short_axis(v: &Vec3) -> usize {
    let mut i = 0;
    if v[1].abs() < v[0].abs() {
        i = 1;
    }
    if v[2].abs() < v[i].abs() {
        i = 2;
    }
    i
}

fn position(mesh: &Mesh, v: usize) -> Vec3 {
    let c = &mesh.vert(v).coords;
    [c[0], c[1], c[2]]
}

/// Positions around each input contour, in contour order.
fn contour_loops(mesh: &Mesh) -> impl Iterator<Item = Vec<Vec3>> + '_ {
    mesh.faces()
        .map(move |f| mesh.face(f).an_edge)
        .filter(move |&e| mesh.edge(e).winding > 0)
        .map(move |e| {
            mesh.face_loop(e)
                .map(|e| position(mesh, mesh.org(e)))
                .collect()
        })
}

/// Newell's method over all contours. Opposite windings cancel out.
fn newell_normal(mesh: &Mesh) -> Vec3 {
    let mut n = [0.; 3];
    for contour in contour_loops(mesh) {
        for (a, b) in contour.iter().circular_tuple_windows() {
            n[0] += (a[1] - b[1]) * (a[2] + b[2]);
            n[1] += (a[2] - b[2]) * (a[0] + b[0]);
            n[2] += (a[0] - b[0]) * (a[1] + b[1]);
        }
    }
    n
}

/// Normal of the largest triangle through the two extreme vertices of
/// the longest axis of the extent. When every vertex is collinear, the
/// unit vector along the shortest axis of that line.
fn extremal_normal(mesh: &Mesh) -> Vec3 {
    let mut vertices = mesh.vertices();
    let Some(first) = vertices.next() else {
        return [0., 0., 1.];
    };

    let p = position(mesh, first);
    let (mut min_val, mut max_val) = (p, p);
    let (mut min_vert, mut max_vert) = ([first; 3], [first; 3]);
    for v in vertices {
        let p = position(mesh, v);
        for i in 0..3 {
            if p[i] < min_val[i] {
                min_val[i] = p[i];
                min_vert[i] = v;
            }
            if p[i] > max_val[i] {
                max_val[i] = p[i];
                max_vert[i] = v;
            }
        }
    }

    // Axis of greatest extent.
    let mut i = 0;
    if max_val[1] - min_val[1] > max_val[0] - min_val[0] {
        i = 1;
    }
    if max_val[2] - min_val[2] > max_val[i] - min_val[i] {
        i = 2;
    }
    if min_val[i] >= max_val[i] {
        // All vertices are the same.
        return [0., 0., 1.];
    }

    let (v1, v2) = (position(mesh, min_vert[i]), position(mesh, max_vert[i]));
    let d1 = [v1[0] - v2[0], v1[1] - v2[1], v1[2] - v2[2]];
    let mut max_len2 = 0.;
    let mut norm = [0.; 3];
    for v in mesh.vertices() {
        let p = position(mesh, v);
        let d2 = [p[0] - v2[0], p[1] - v2[1], p[2] - v2[2]];
        let tn = [
            d1[1] * d2[2] - d1[2] * d2[1],
            d1[2] * d2[0] - d1[0] * d2[2],
            d1[0] * d2[1] - d1[1] * d2[0],
        ];
        let len2 = dot(&tn, &tn);
        if len2 > max_len2 {
            max_len2 = len2;
            norm = tn;
        }
    }

    if max_len2 <= 0. {
        // All points lie on a single line.
        norm = [0.; 3];
        norm[short_axis(&d1)] = 1.;
    }
    norm
}

fn compute_normal(mesh: &Mesh) -> Vec3 {
    let n = newell_normal(mesh);
    if !is_zero(&n) {
        return n;
    }
    extremal_normal(mesh)
}

/// Flip the `t` axis if the contours with positive winding have
/// negative total area in the projection.
fn check_orientation(mesh: &mut Mesh) {
    let mut area = 0.;
    for f in mesh.faces() {
        let an_edge = mesh.face(f).an_edge;
        if mesh.edge(an_edge).winding <= 0 {
            continue;
        }
        for e in mesh.face_loop(an_edge) {
            let (org, dst) = (mesh.org_pt(e), mesh.dst_pt(e));
            area += (org.s - dst.s) * (org.t + dst.t);
        }
    }
    if area < 0. {
        debug!("reversing orientation of the projection");
        let vertices: Vec<_> = mesh.vertices().collect();
        for v in vertices {
            let vert = mesh.vert_mut(v);
            vert.t = -vert.t;
        }
    }
}

/// Project every vertex onto the plane perpendicular to the long axis
/// of `normal` (computed if `None` or zero), and return the bounds of
/// the projected points.
pub(crate) fn project_polygon(mesh: &mut Mesh, normal: Option<Vec3>) -> (SweepPoint, SweepPoint) {
    let (norm, computed) = match normal {
        Some(n) if !is_zero(&n) => (n, false),
        _ => (compute_normal(mesh), true),
    };

    let i = long_axis(&norm);
    let mut s_unit = [0.; 3];
    let mut t_unit = [0.; 3];
    s_unit[(i + 1) % 3] = 1.;
    t_unit[(i + 2) % 3] = if norm[i] > 0. { 1. } else { -1. };
    debug!("projecting along axis {i} of normal {norm:?} (computed: {computed})");

    let vertices: Vec<_> = mesh.vertices().collect();
    for &v in &vertices {
        let p = position(mesh, v);
        let vert = mesh.vert_mut(v);
        vert.s = dot(&p, &s_unit);
        vert.t = dot(&p, &t_unit);
    }
    if computed {
        check_orientation(mesh);
    }

    let mut points = vertices.iter().map(|&v| mesh.pt(v));
    let Some(first) = points.next() else {
        let origin = SweepPoint::new(0., 0.);
        return (origin, origin);
    };
    let (bmin, bmax) = points.fold((first, first), |(lo, hi), p| {
        (
            SweepPoint::new(lo.s.min(p.s), lo.t.min(p.t)),
            SweepPoint::new(hi.s.max(p.s), hi.t.max(p.t)),
        )
    });
    (bmin, bmax)
}
