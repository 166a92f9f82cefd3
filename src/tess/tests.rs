use std::sync::atomic::{AtomicIsize, Ordering};
use std::sync::Arc;

use approx::assert_relative_eq;
use float_next_after::NextAfter;
use geo::{prelude::Area, Rect};
use itertools::Itertools;
use rand::{rngs::StdRng, SeedableRng};

use super::*;
use crate::alloc::EntityKind;
use crate::random;
use crate::tests::init_log;
use crate::TESS_UNDEF;

fn square(x0: Real, y0: Real, size: Real) -> Vec<[Real; 2]> {
    vec![
        [x0, y0],
        [x0 + size, y0],
        [x0 + size, y0 + size],
        [x0, y0 + size],
    ]
}

fn reversed(mut pts: Vec<[Real; 2]>) -> Vec<[Real; 2]> {
    pts.reverse();
    pts
}

fn tessellate(contours: &[Vec<[Real; 2]>], rule: WindingRule) -> Tessellator {
    let mut tess = Tessellator::new();
    for c in contours {
        tess.add_contour_2d(c).unwrap();
    }
    tess.tessellate(rule, ElementType::Polygons, 3, 2, None)
        .unwrap();
    tess
}

/// Output polygons as lists of 2D points.
fn polygons(tess: &Tessellator) -> Vec<Vec<[Real; 2]>> {
    let stride = match tess.element_type() {
        ElementType::ConnectedPolygons => 2 * tess.poly_size(),
        _ => tess.poly_size(),
    };
    let vs = tess.vertex_size();
    tess.elements()
        .chunks(stride)
        .map(|poly| {
            poly[..tess.poly_size()]
                .iter()
                .take_while(|&&i| i != TESS_UNDEF)
                .map(|&i| {
                    let i = i as usize * vs;
                    [tess.vertices()[i], tess.vertices()[i + 1]]
                })
                .collect()
        })
        .collect()
}

fn signed_area(pts: &[[Real; 2]]) -> Real {
    let n = pts.len();
    (0..n)
        .map(|i| {
            let (a, b) = (pts[i], pts[(i + 1) % n]);
            a[0] * b[1] - b[0] * a[1]
        })
        .sum::<Real>()
        / 2.
}

fn total_area(tess: &Tessellator) -> Real {
    polygons(tess).iter().map(|p| signed_area(p)).sum()
}

fn synthetic(tess: &Tessellator) -> usize {
    tess.vertex_indices()
        .iter()
        .filter(|&&i| i == TESS_UNDEF)
        .count()
}

const ALL_RULES: [WindingRule; 5] = [
    WindingRule::Odd,
    WindingRule::NonZero,
    WindingRule::Positive,
    WindingRule::Negative,
    WindingRule::AbsGeqTwo,
];

/// Winding number of the counter-clockwise contours around `p`.
fn winding_at(contours: &[Vec<[Real; 2]>], p: [Real; 2]) -> i32 {
    let mut w = 0;
    for (a, b) in contours.iter().flat_map(|c| c.iter().circular_tuple_windows()) {
        let side = (b[0] - a[0]) * (p[1] - a[1]) - (p[0] - a[0]) * (b[1] - a[1]);
        if a[1] <= p[1] {
            if b[1] > p[1] && side > 0. {
                w += 1;
            }
        } else if b[1] <= p[1] && side < 0. {
            w -= 1;
        }
    }
    w
}

fn centroid(poly: &[[Real; 2]]) -> [Real; 2] {
    let n = poly.len() as Real;
    let (x, y) = poly
        .iter()
        .fold((0., 0.), |(x, y), p| (x + p[0], y + p[1]));
    [x / n, y / n]
}

fn segment_distance(p: [Real; 2], a: [Real; 2], b: [Real; 2]) -> Real {
    let d = [b[0] - a[0], b[1] - a[1]];
    let len2 = d[0] * d[0] + d[1] * d[1];
    let t = (((p[0] - a[0]) * d[0] + (p[1] - a[1]) * d[1]) / len2).clamp(0., 1.);
    let q = [a[0] + t * d[0], a[1] + t * d[1]];
    (p[0] - q[0]).hypot(p[1] - q[1])
}

/// Every synthetic output vertex lies on at least two input edges.
fn assert_crossings_on_edges(tess: &Tessellator, contours: &[Vec<[Real; 2]>], eps: Real) {
    let vs = tess.vertex_size();
    for (v, _) in tess
        .vertex_indices()
        .iter()
        .enumerate()
        .filter(|(_, &i)| i == TESS_UNDEF)
    {
        let p = [tess.vertices()[vs * v], tess.vertices()[vs * v + 1]];
        let edges = contours
            .iter()
            .flat_map(|c| c.iter().circular_tuple_windows())
            .filter(|&(a, b)| segment_distance(p, *a, *b) < eps)
            .count();
        assert!(edges >= 2, "{p:?} lies on {edges} input edges");
    }
}

#[test]
fn square_makes_two_triangles() {
    init_log();
    let tess = tessellate(&[square(0., 0., 4.)], WindingRule::Odd);
    assert_eq!(tess.element_count(), 2);
    assert_eq!(tess.vertex_count(), 4);
    assert_eq!(synthetic(&tess), 0);
    assert_relative_eq!(total_area(&tess), 16.);

    let mut indices = tess.vertex_indices().to_vec();
    indices.sort_unstable();
    assert_eq!(indices, vec![0, 1, 2, 3]);
    for poly in polygons(&tess) {
        assert_eq!(poly.len(), 3);
        assert!(signed_area(&poly) > 0.);
    }
}

#[test]
fn bow_tie_has_one_synthetic_vertex() {
    init_log();
    let tess = tessellate(
        &[vec![[0., 0.], [2., 2.], [2., 0.], [0., 2.]]],
        WindingRule::NonZero,
    );
    assert_eq!(tess.element_count(), 2);
    assert_eq!(synthetic(&tess), 1);
    // The lobes cancel out, so the orientation of the output is up to
    // the fallback normal.
    assert_relative_eq!(total_area(&tess).abs(), 2.);

    let v = tess
        .vertex_indices()
        .iter()
        .position(|&i| i == TESS_UNDEF)
        .unwrap();
    assert_relative_eq!(tess.vertices()[2 * v], 1.);
    assert_relative_eq!(tess.vertices()[2 * v + 1], 1.);
}

#[test]
fn crossing_diagonals() {
    init_log();
    // Two triangles over the same square whose hypotenuses cross at
    // (2, 2). The diagonals cut the square into four regions winding
    // 2 (top), 1 (left and right) and 0 (bottom).
    let a = vec![[0., 0.], [4., 4.], [0., 4.]];
    let b = vec![[0., 4.], [4., 0.], [4., 4.]];
    let contours = [a, b];
    for (rule, regions) in [
        (WindingRule::Odd, 2),
        (WindingRule::NonZero, 3),
        (WindingRule::Positive, 3),
        (WindingRule::Negative, 0),
        (WindingRule::AbsGeqTwo, 1),
    ] {
        let tess = tessellate(&contours, rule);
        assert_eq!(tess.element_count(), regions, "{rule:?}");
        assert_relative_eq!(total_area(&tess), 4. * regions as Real);
        if regions > 0 {
            assert_eq!(synthetic(&tess), 1);
            assert_crossings_on_edges(&tess, &contours, 1e-12);
        }
        for poly in polygons(&tess) {
            assert!(rule.is_inside(winding_at(&contours, centroid(&poly))));
        }
    }
}

#[test]
fn crossing_thin_triangles() {
    init_log();
    let a = vec![[0., 0.], [4., 3.], [4., 4.]];
    let b = vec![[0., 4.], [4., 0.], [4., 1.]];
    let tess = tessellate(&[a.clone(), b.clone()], WindingRule::NonZero);
    assert_eq!(synthetic(&tess), 4);
    for poly in polygons(&tess) {
        assert!(signed_area(&poly) >= 0.);
    }

    // The overlap counts twice under NonZero and not at all under Odd.
    let union = total_area(&tess);
    let both = total_area(&tessellate(&[a.clone(), b.clone()], WindingRule::AbsGeqTwo));
    let odd = total_area(&tessellate(&[a.clone(), b.clone()], WindingRule::Odd));
    let each = signed_area(&a).abs();
    assert!(both > 0.);
    assert_relative_eq!(union, 2. * each - both, epsilon = 1e-9);
    assert_relative_eq!(odd, union - both, epsilon = 1e-9);
}

#[test]
fn nested_squares() {
    init_log();
    let outer = square(0., 0., 10.);
    let inner = square(2., 2., 6.);

    let same = [outer.clone(), inner.clone()];
    for (rule, area) in [
        (WindingRule::Odd, 64.),
        (WindingRule::NonZero, 100.),
        (WindingRule::Positive, 100.),
        (WindingRule::Negative, 0.),
        (WindingRule::AbsGeqTwo, 36.),
    ] {
        let tess = tessellate(&same, rule);
        assert_relative_eq!(total_area(&tess), area);
        assert_eq!(synthetic(&tess), 0);
    }

    let hole = [outer, reversed(inner)];
    for (rule, area) in [
        (WindingRule::Odd, 64.),
        (WindingRule::NonZero, 64.),
        (WindingRule::Positive, 64.),
        (WindingRule::Negative, 0.),
        (WindingRule::AbsGeqTwo, 0.),
    ] {
        assert_relative_eq!(total_area(&tessellate(&hole, rule)), area);
    }
}

#[test]
fn clockwise_input_is_oriented() {
    // The computed normal points down, so the output turns clockwise
    // in the xy plane.
    let tess = tessellate(&[reversed(square(0., 0., 4.))], WindingRule::Positive);
    assert_eq!(tess.element_count(), 2);
    assert_relative_eq!(total_area(&tess), -16.);

    // With the normal fixed to +z, the clockwise square winds -1.
    let mut tess = Tessellator::new();
    tess.add_contour_2d(&reversed(square(0., 0., 4.)))
        .unwrap();
    tess.tessellate(
        WindingRule::Positive,
        ElementType::Polygons,
        3,
        2,
        Some([0., 0., 1.]),
    )
    .unwrap();
    assert_eq!(tess.element_count(), 0);
}

#[test]
fn polygons_respect_poly_size() {
    init_log();
    let mut rng = StdRng::seed_from_u64(7);
    let poly = random::circular_polygon(&mut rng, 64);
    let closed = &poly.exterior().0;
    let ring: Vec<[Real; 2]> = closed[..closed.len() - 1].iter().map(|c| [c.x, c.y]).collect();

    for poly_size in [3, 4, 6, 16] {
        let mut tess = Tessellator::new();
        tess.add_contour_2d(&ring).unwrap();
        tess.tessellate(WindingRule::Odd, ElementType::Polygons, poly_size, 2, None)
            .unwrap();
        assert_eq!(tess.elements().len(), tess.element_count() * poly_size);
        for p in polygons(&tess) {
            assert!((3..=poly_size).contains(&p.len()));
        }
        assert_relative_eq!(total_area(&tess), poly.unsigned_area(), epsilon = 1e-9);
    }
}

#[test]
fn adjacency_is_symmetric() {
    init_log();
    let ring = vec![
        [0., 0.],
        [3., 1.],
        [6., 0.],
        [5., 3.],
        [6., 6.],
        [3., 5.],
        [0., 6.],
        [1., 3.],
    ];
    for poly_size in [3, 5] {
        let mut tess = Tessellator::new();
        tess.add_contour_2d(&ring).unwrap();
        tess.tessellate(
            WindingRule::Odd,
            ElementType::ConnectedPolygons,
            poly_size,
            2,
            None,
        )
        .unwrap();

        let elems = tess.elements();
        let polys: Vec<_> = elems.chunks(2 * poly_size).collect();
        let mut boundary = 0;
        for (p, poly) in polys.iter().enumerate() {
            let n = poly[..poly_size]
                .iter()
                .take_while(|&&i| i != TESS_UNDEF)
                .count();
            for j in 0..n {
                let q = poly[poly_size + j];
                if q == TESS_UNDEF {
                    boundary += 1;
                    continue;
                }
                let (a, b) = (poly[j], poly[(j + 1) % n]);
                let other = polys[q as usize];
                let m = other[..poly_size]
                    .iter()
                    .take_while(|&&i| i != TESS_UNDEF)
                    .count();
                // The shared edge runs the other way in the neighbour.
                let k = (0..m)
                    .find(|&k| other[k] == b && other[(k + 1) % m] == a)
                    .unwrap();
                assert_eq!(other[poly_size + k], p as u32);
            }
        }
        assert_eq!(boundary, ring.len());
    }
}

#[test]
fn boundary_contours() {
    init_log();
    // Two overlapping squares merge into one outline with two
    // synthetic corners.
    let mut tess = Tessellator::new();
    tess.add_contour_2d(&square(0., 0., 2.)).unwrap();
    tess.add_contour_2d(&square(1., 1., 2.)).unwrap();
    tess.tessellate(WindingRule::NonZero, ElementType::BoundaryContours, 0, 2, None)
        .unwrap();
    assert_eq!(tess.element_count(), 1);
    assert_eq!(tess.elements(), &[0, 8]);
    assert_eq!(tess.vertex_count(), 8);
    assert_eq!(synthetic(&tess), 2);

    let pts: Vec<[Real; 2]> = tess.vertices().chunks(2).map(|v| [v[0], v[1]]).collect();
    assert_relative_eq!(signed_area(&pts).abs(), 7.);

    // A square with a hole gives two loops of opposite orientation.
    let mut tess = Tessellator::new();
    tess.add_contour_2d(&square(0., 0., 10.)).unwrap();
    tess.add_contour_2d(&reversed(square(2., 2., 6.)))
        .unwrap();
    tess.tessellate(WindingRule::Odd, ElementType::BoundaryContours, 0, 2, None)
        .unwrap();
    assert_eq!(tess.element_count(), 2);
    let areas: Real = tess
        .elements()
        .chunks(2)
        .map(|c| {
            let (base, count) = (c[0] as usize, c[1] as usize);
            assert_eq!(count, 4);
            let pts: Vec<[Real; 2]> = tess.vertices()[2 * base..2 * (base + count)]
                .chunks(2)
                .map(|v| [v[0], v[1]])
                .collect();
            signed_area(&pts)
        })
        .sum();
    assert_relative_eq!(areas, 64.);
}

#[test]
fn no_empty_polygons() {
    init_log();
    // Collinear runs along the bottom and top edges.
    let ring = vec![
        [0., 0.],
        [1., 0.],
        [2., 0.],
        [3., 0.],
        [3., 1.],
        [2., 1.],
        [1., 1.],
        [0., 1.],
    ];
    let mut tess = Tessellator::new();
    assert!(!tess.no_empty_polygons());
    tess.set_no_empty_polygons(true);
    assert!(tess.no_empty_polygons());

    tess.add_contour_2d(&ring).unwrap();
    tess.tessellate(WindingRule::Odd, ElementType::Polygons, 3, 2, None)
        .unwrap();
    for poly in polygons(&tess) {
        assert!(signed_area(&poly) != 0.);
    }
    assert_relative_eq!(total_area(&tess), 3.);
}

#[test]
fn identical_runs_match() {
    let mut rng = StdRng::seed_from_u64(42);
    let bounds = Rect::new((0., 0.), (10., 10.));
    let walk = random::uniform_walk(&mut rng, bounds, 24);

    let run = || {
        let mut tess = Tessellator::new();
        tess.add_contour_2d(&walk).unwrap();
        tess.tessellate(
            WindingRule::NonZero,
            ElementType::ConnectedPolygons,
            4,
            2,
            None,
        )
        .unwrap();
        (
            tess.vertices().to_vec(),
            tess.vertex_indices().to_vec(),
            tess.elements().to_vec(),
        )
    };
    assert_eq!(run(), run());
}

#[test]
fn tilted_plane() {
    init_log();
    // The square in the plane z = x.
    let data = [0., 0., 0., 2., 0., 2., 2., 2., 2., 0., 2., 0.];
    let mut tess = Tessellator::new();
    tess.add_contour(3, &data, 3 * size_of::<Real>(), 4)
        .unwrap();
    tess.tessellate(WindingRule::Odd, ElementType::Polygons, 3, 3, None)
        .unwrap();
    assert_eq!(tess.element_count(), 2);
    assert_eq!(tess.vertex_count(), 4);
    for v in tess.vertices().chunks(3) {
        assert_eq!(v[0], v[2]);
    }
}

#[test]
fn strided_input() {
    // Each vertex followed by a value that is not part of it.
    let data = [0., 0., 9., 4., 0., 9., 4., 4., 9., 0., 4.];
    let mut tess = Tessellator::new();
    tess.add_contour(2, &data, 3 * size_of::<Real>(), 4)
        .unwrap();
    tess.tessellate(WindingRule::Odd, ElementType::Polygons, 3, 2, None)
        .unwrap();
    assert_eq!(tess.vertex_count(), 4);
    assert!(tess.vertices().iter().all(|&c| c != 9.));
    assert_relative_eq!(total_area(&tess), 16.);
}

#[test]
fn invalid_arguments() {
    let data = [0., 0., 1., 0., 1., 1.];
    let mut tess = Tessellator::new();
    let invalid = |r: Result<()>| matches!(r, Err(TessError::InvalidArgument(_)));

    assert!(invalid(tess.add_contour(1, &data, 8, 3)));
    assert!(invalid(tess.add_contour(13, &data, 13 * 8, 1)));
    assert!(invalid(tess.add_contour(2, &data, 12, 3)));
    assert!(invalid(tess.add_contour(2, &data, 8, 3)));
    assert!(invalid(tess.add_contour(2, &data, 16, 4)));

    tess.add_contour(2, &data, 16, 3).unwrap();
    assert!(invalid(tess.tessellate(
        WindingRule::Odd,
        ElementType::Polygons,
        2,
        2,
        None
    )));
    assert!(invalid(tess.tessellate(
        WindingRule::Odd,
        ElementType::Polygons,
        3,
        13,
        None
    )));

    assert!(matches!(
        WindingRule::try_from(5),
        Err(TessError::InvalidArgument(_))
    ));
    assert_eq!(WindingRule::try_from(4).unwrap(), WindingRule::AbsGeqTwo);
    assert_eq!(i32::from(WindingRule::Positive), 2);
    assert_eq!(
        ElementType::try_from(1).unwrap(),
        ElementType::ConnectedPolygons
    );
    assert!(ElementType::try_from(-1).is_err());

    // The contour survives rejected calls.
    tess.tessellate(WindingRule::Odd, ElementType::Polygons, 3, 2, None)
        .unwrap();
    assert_eq!(tess.element_count(), 1);
}

#[test]
fn invalid_coordinates() {
    let mut tess = Tessellator::new();
    tess.add_contour_2d(&square(0., 0., 1.)).unwrap();
    let err = tess
        .add_contour_2d(&[[0., 0.], [1., Real::NAN], [1., 1.]])
        .unwrap_err();
    assert!(matches!(err, TessError::InvalidCoordinate { index: 5, .. }));
    let err = tess
        .add_contour_2d(&[[0., 0.], [1., 0.], [1e200, 1.]])
        .unwrap_err();
    assert!(matches!(err, TessError::InvalidCoordinate { index: 6, .. }));

    // Rejected contours consume no indices.
    tess.add_contour_2d(&square(2., 2., 1.)).unwrap();
    tess.tessellate(WindingRule::Odd, ElementType::Polygons, 3, 2, None)
        .unwrap();
    assert!(tess.vertex_indices().iter().all(|&i| i < 8));
}

#[test]
fn contours_are_consumed() {
    let mut tess = Tessellator::new();
    assert!(matches!(
        tess.tessellate(WindingRule::Odd, ElementType::Polygons, 3, 2, None),
        Err(TessError::DegenerateInput(_))
    ));

    // A two-vertex contour is skipped but still takes indices 0 and 1.
    tess.add_contour_2d(&[[5., 5.], [6., 6.]]).unwrap();
    assert!(matches!(
        tess.tessellate(WindingRule::Odd, ElementType::Polygons, 3, 2, None),
        Err(TessError::DegenerateInput(_))
    ));

    tess.add_contour_2d(&[[5., 5.], [6., 6.]]).unwrap();
    tess.add_contour_2d(&square(0., 0., 1.)).unwrap();
    tess.tessellate(WindingRule::Odd, ElementType::Polygons, 3, 2, None)
        .unwrap();
    let mut indices = tess.vertex_indices().to_vec();
    indices.sort_unstable();
    assert_eq!(indices, vec![4, 5, 6, 7]);

    assert!(tess
        .tessellate(WindingRule::Odd, ElementType::Polygons, 3, 2, None)
        .is_err());
    assert_eq!(tess.element_count(), 0);
    assert!(tess.elements().is_empty());
    assert!(tess.vertices().is_empty());
}

#[test]
fn extra_dimensions_are_interpolated() {
    init_log();
    // Bow tie with a fourth value per vertex.
    let data = [
        0., 0., 0., 0., //
        2., 2., 0., 4., //
        2., 0., 0., 8., //
        0., 2., 0., 12.,
    ];
    let mut tess = Tessellator::new();
    tess.add_contour(4, &data, 4 * size_of::<Real>(), 4)
        .unwrap();
    tess.tessellate(WindingRule::Odd, ElementType::Polygons, 3, 4, None)
        .unwrap();

    let v = tess
        .vertex_indices()
        .iter()
        .position(|&i| i == TESS_UNDEF)
        .unwrap();
    let values = &tess.vertices()[4 * v..4 * v + 4];
    assert_relative_eq!(values[0], 1.);
    assert_relative_eq!(values[1], 1.);
    assert_relative_eq!(values[3], 6.);

    // Input vertices keep their values.
    for (v, &i) in tess.vertex_indices().iter().enumerate() {
        if i != TESS_UNDEF {
            assert_eq!(tess.vertices()[4 * v + 3], data[4 * i as usize + 3]);
        }
    }
}

#[test]
fn nearly_degenerate_input() {
    init_log();
    // Two squares sharing an edge, one nudged by an ulp.
    let nudged = 2f64.next_after(Real::INFINITY);
    let a = square(0., 0., 2.);
    let b = vec![[nudged, 0.], [4., 0.], [4., 2.], [nudged, 2.]];
    let tess = tessellate(&[a, b], WindingRule::NonZero);
    assert_relative_eq!(total_area(&tess), 8., epsilon = 1e-9);

    // A spike whose tip is an ulp off the base line.
    let tip = 0f64.next_after(Real::INFINITY);
    let tess = tessellate(
        &[vec![[0., 0.], [4., 0.], [4., 4.], [2., tip], [0., 4.]]],
        WindingRule::Odd,
    );
    assert!(total_area(&tess) > 0.);
}

/// Allocator sharing its slot count with the test.
struct Counting(Arc<AtomicIsize>);

impl Allocator for Counting {
    fn alloc(&mut self, _kind: EntityKind, slots: usize) -> bool {
        self.0.fetch_add(slots as isize, Ordering::SeqCst);
        true
    }

    fn realloc(&mut self, _kind: EntityKind, old_slots: usize, new_slots: usize) -> bool {
        self.0
            .fetch_add(new_slots as isize - old_slots as isize, Ordering::SeqCst);
        true
    }

    fn free(&mut self, _kind: EntityKind, slots: usize) {
        self.0.fetch_sub(slots as isize, Ordering::SeqCst);
    }
}

#[test]
fn storage_is_returned() {
    let live = Arc::new(AtomicIsize::new(0));
    let config = AllocatorConfig::default().with_bucket_size(16);
    let mut tess = Tessellator::with_allocator(config, Counting(live.clone()));
    tess.add_contour_2d(&random::star_polygon(11, 5)).unwrap();
    assert!(live.load(Ordering::SeqCst) > 0);
    tess.tessellate(WindingRule::Odd, ElementType::Polygons, 3, 2, None)
        .unwrap();
    assert_eq!(live.load(Ordering::SeqCst), 0);

    // Pending contours are released on drop.
    tess.add_contour_2d(&square(0., 0., 1.)).unwrap();
    assert!(live.load(Ordering::SeqCst) > 0);
    drop(tess);
    assert_eq!(live.load(Ordering::SeqCst), 0);
}

#[test]
fn allocation_failure() {
    init_log();
    let config = AllocatorConfig::default().with_bucket_size(16);
    let mut tess = Tessellator::with_allocator(config, HeapAllocator::with_limit(50));
    let star = random::star_polygon(11, 5);

    // The first contour fits, the next one runs out of edges.
    tess.add_contour_2d(&star).unwrap();
    let err = tess.add_contour_2d(&star).unwrap_err();
    assert!(matches!(err, TessError::AllocationFailure { .. }));
    assert_eq!(tess.add_contour_2d(&star).unwrap_err(), err);

    assert_eq!(
        tess.tessellate(WindingRule::Odd, ElementType::Polygons, 3, 2, None),
        Err(err)
    );
    assert_eq!(tess.element_count(), 0);

    // The sweep itself needs more than the limit.
    tess.add_contour_2d(&star).unwrap();
    assert!(matches!(
        tess.tessellate(WindingRule::Odd, ElementType::Polygons, 3, 2, None),
        Err(TessError::AllocationFailure { .. })
    ));
}

#[test]
fn growth_unsupported() {
    init_log();
    // 44 intersections, far more than the 8 spare event slots.
    let star = random::star_polygon(11, 5);
    let mut tess = Tessellator::with_allocator(AllocatorConfig::default(), HeapAllocator::new().fixed());
    tess.add_contour_2d(&star).unwrap();
    assert!(matches!(
        tess.tessellate(WindingRule::Odd, ElementType::Polygons, 3, 2, None),
        Err(TessError::GrowthUnsupported {
            kind: EntityKind::Event,
            ..
        })
    ));

    // Reserving room for them up front works without reallocation.
    let config = AllocatorConfig::default().with_extra_vertices(64);
    let mut tess = Tessellator::with_allocator(config, HeapAllocator::new().fixed());
    tess.add_contour_2d(&star).unwrap();
    tess.tessellate(WindingRule::Odd, ElementType::Polygons, 3, 2, None)
        .unwrap();
    assert_eq!(synthetic(&tess), 44);
    assert_crossings_on_edges(&tess, &[star], 1e-9);
}

#[test]
fn random_inputs() {
    init_log();
    let mut rng = StdRng::seed_from_u64(1);
    let bounds = Rect::new((-5., -5.), (5., 5.));
    for round in 0..64 {
        let contours: Vec<_> = (0..1 + round % 3)
            .map(|_| random::uniform_walk(&mut rng, bounds, 3 + round % 13))
            .collect();
        let n: usize = contours.iter().map(|c| c.len()).sum();
        for rule in ALL_RULES {
            let mut tess = Tessellator::new();
            for c in &contours {
                tess.add_contour_2d(c).unwrap();
            }
            tess.tessellate(rule, ElementType::Polygons, 3, 2, Some([0., 0., 1.]))
                .unwrap();
            for &i in tess.vertex_indices() {
                assert!(i == TESS_UNDEF || (i as usize) < n);
            }
            for &e in tess.elements() {
                assert!((e as usize) < tess.vertex_count());
            }
            for poly in polygons(&tess) {
                let area = signed_area(&poly);
                assert!(area > -1e-6);
                if area < 1e-9 {
                    continue;
                }
                let w = winding_at(&contours, centroid(&poly));
                assert!(rule.is_inside(w), "{rule:?} emitted a triangle winding {w}");
            }
        }
    }
}

#[test]
fn separate_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let mut tess = Tessellator::new();
                tess.add_contour_2d(&square(i as Real, 0., 4.)).unwrap();
                tess.tessellate(WindingRule::Odd, ElementType::Polygons, 3, 2, None)
                    .unwrap();
                total_area(&tess)
            })
        })
        .collect();
    for h in handles {
        assert_relative_eq!(h.join().unwrap(), 16.);
    }
}
