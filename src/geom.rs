//! Geometric predicates on the sweep plane.
//!
//! All predicates take [`SweepPoint`]s in `(s, t)` coordinates. The
//! "transposed" variants swap the roles of `s` and `t`.
use crate::events::SweepPoint;
use crate::Real;

#[inline]
pub(crate) fn vert_eq(u: SweepPoint, v: SweepPoint) -> bool {
    u.s == v.s && u.t == v.t
}

/// `u <= v` in sweep order.
#[inline]
pub(crate) fn vert_leq(u: SweepPoint, v: SweepPoint) -> bool {
    u.s < v.s || (u.s == v.s && u.t <= v.t)
}

/// `u <= v` in transposed sweep order (by `t`, then `s`).
#[inline]
pub(crate) fn trans_leq(u: SweepPoint, v: SweepPoint) -> bool {
    u.t < v.t || (u.t == v.t && u.s <= v.s)
}

/// Signed vertical distance from `v` to the edge `uw`, evaluated at
/// `v.s`.
///
/// Requires `u <= v <= w`. The result is positive when `v` lies above
/// the edge, and is computed so that it is exact when `v` coincides
/// with either end point.
pub(crate) fn edge_eval(u: SweepPoint, v: SweepPoint, w: SweepPoint) -> Real {
    debug_assert!(vert_leq(u, v) && vert_leq(v, w));
    let gap_l = v.s - u.s;
    let gap_r = w.s - v.s;
    if gap_l + gap_r > 0. {
        if gap_l < gap_r {
            (v.t - u.t) + (u.t - w.t) * (gap_l / (gap_l + gap_r))
        } else {
            (v.t - w.t) + (w.t - u.t) * (gap_r / (gap_l + gap_r))
        }
    } else {
        // vertical line
        0.
    }
}

/// Same sign as [`edge_eval`], but cheaper to compute and not scaled.
pub(crate) fn edge_sign(u: SweepPoint, v: SweepPoint, w: SweepPoint) -> Real {
    let gap_l = v.s - u.s;
    let gap_r = w.s - v.s;
    if gap_l + gap_r > 0. {
        (v.t - w.t) * gap_l + (v.t - u.t) * gap_r
    } else {
        0.
    }
}

pub(crate) fn trans_eval(u: SweepPoint, v: SweepPoint, w: SweepPoint) -> Real {
    debug_assert!(trans_leq(u, v) && trans_leq(v, w));
    let gap_l = v.t - u.t;
    let gap_r = w.t - v.t;
    if gap_l + gap_r > 0. {
        if gap_l < gap_r {
            (v.s - u.s) + (u.s - w.s) * (gap_l / (gap_l + gap_r))
        } else {
            (v.s - w.s) + (w.s - u.s) * (gap_r / (gap_l + gap_r))
        }
    } else {
        0.
    }
}

pub(crate) fn trans_sign(u: SweepPoint, v: SweepPoint, w: SweepPoint) -> Real {
    let gap_l = v.t - u.t;
    let gap_r = w.t - v.t;
    if gap_l + gap_r > 0. {
        (v.s - w.s) * gap_l + (v.s - u.s) * gap_r
    } else {
        0.
    }
}

/// `true` if `u`, `v`, `w` are in counter-clockwise order (or
/// collinear).
#[inline]
pub(crate) fn vert_ccw(u: SweepPoint, v: SweepPoint, w: SweepPoint) -> bool {
    u.s * (v.t - w.t) + v.s * (w.t - u.t) + w.s * (u.t - v.t) >= 0.
}

#[inline]
pub(crate) fn vert_l1_dist(u: SweepPoint, v: SweepPoint) -> Real {
    (u.s - v.s).abs() + (u.t - v.t).abs()
}

/// Blend `x` and `y` with weights inversely proportional to the
/// (clamped) distances `a` and `b`.
///
/// The result always lies in `[min(x, y), max(x, y)]`, even when the
/// inputs are inconsistent.
fn interpolate(a: Real, x: Real, b: Real, y: Real) -> Real {
    let a = a.max(0.);
    let b = b.max(0.);
    if a <= b {
        if b == 0. {
            x / 2. + y / 2.
        } else {
            x + (y - x) * (a / (a + b))
        }
    } else {
        y + (x - y) * (b / (a + b))
    }
}

/// Intersection point of the edges `o1 d1` and `o2 d2`.
///
/// Each coordinate is computed separately by interpolating between the
/// two middle end points in that coordinate's order. The result is
/// guaranteed to lie inside the bounding box of the overlap, which is
/// what keeps the sweep consistent under rounding error.
pub(crate) fn edge_intersect(
    o1: SweepPoint,
    d1: SweepPoint,
    o2: SweepPoint,
    d2: SweepPoint,
) -> SweepPoint {
    let s = {
        let (mut o1, mut d1, mut o2, mut d2) = (o1, d1, o2, d2);
        if !vert_leq(o1, d1) {
            std::mem::swap(&mut o1, &mut d1);
        }
        if !vert_leq(o2, d2) {
            std::mem::swap(&mut o2, &mut d2);
        }
        if !vert_leq(o1, o2) {
            std::mem::swap(&mut o1, &mut o2);
            std::mem::swap(&mut d1, &mut d2);
        }
        if !vert_leq(o2, d1) {
            // Technically, no intersection; do our best.
            o2.s / 2. + d1.s / 2.
        } else if vert_leq(d1, d2) {
            // Interpolate between o2 and d1.
            let (z1, z2) = signed_pair(edge_eval(o1, o2, d1), edge_eval(o2, d1, d2));
            interpolate(z1, o2.s, z2, d1.s)
        } else {
            // Interpolate between o2 and d2.
            let (z1, z2) = signed_pair(edge_sign(o1, o2, d1), -edge_sign(o1, d2, d1));
            interpolate(z1, o2.s, z2, d2.s)
        }
    };

    let t = {
        let (mut o1, mut d1, mut o2, mut d2) = (o1, d1, o2, d2);
        if !trans_leq(o1, d1) {
            std::mem::swap(&mut o1, &mut d1);
        }
        if !trans_leq(o2, d2) {
            std::mem::swap(&mut o2, &mut d2);
        }
        if !trans_leq(o1, o2) {
            std::mem::swap(&mut o1, &mut o2);
            std::mem::swap(&mut d1, &mut d2);
        }
        if !trans_leq(o2, d1) {
            o2.t / 2. + d1.t / 2.
        } else if trans_leq(d1, d2) {
            let (z1, z2) = signed_pair(trans_eval(o1, o2, d1), trans_eval(o2, d1, d2));
            interpolate(z1, o2.t, z2, d1.t)
        } else {
            let (z1, z2) = signed_pair(trans_sign(o1, o2, d1), -trans_sign(o1, d2, d1));
            interpolate(z1, o2.t, z2, d2.t)
        }
    };

    SweepPoint::new(s, t)
}

#[inline]
fn signed_pair(z1: Real, z2: Real) -> (Real, Real) {
    if z1 + z2 < 0. {
        (-z1, -z2)
    } else {
        (z1, z2)
    }
}
