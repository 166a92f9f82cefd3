#![allow(dead_code)]
use std::f64::consts::PI;

use geo::{Coordinate, LineString, Polygon, Rect};

use rand::Rng;
use rand_distr::{Distribution, Normal, Standard};

#[inline]
pub fn uniform_point<R: Rng>(rng: &mut R, bounds: Rect<f64>) -> Coordinate<f64> {
    let coords: [f64; 2] = rng.sample(Standard);
    let dims = bounds.max() - bounds.min();
    Coordinate {
        x: bounds.min().x + dims.x * coords[0],
        y: bounds.min().y + dims.y * coords[1],
    }
}

/// Closed walk through `steps` uniform points of `bounds`. Almost
/// always self-intersecting.
pub fn uniform_walk<R: Rng>(rng: &mut R, bounds: Rect<f64>, steps: usize) -> Vec<[f64; 2]> {
    (0..steps)
        .map(|_| {
            let c = uniform_point(rng, bounds);
            [c.x, c.y]
        })
        .collect()
}

/// Star-shaped polygon around the origin: `steps` vertices at evenly
/// spaced (slightly jittered) angles, with normally distributed radii.
pub fn circular_polygon<R: Rng>(mut rng: R, steps: usize) -> Polygon<f64> {
    let ang_step = 2. * PI / steps as f64;
    let ang_nudge = ang_step / 100.;
    let r_dist = Normal::new(1f64, 0.2).unwrap();

    let ring = (0..steps)
        .map(|i| {
            let r: f64 = r_dist.sample(&mut rng).abs().max(0.01);
            let ang = i as f64 * ang_step + rng.gen_range(-ang_nudge..ang_nudge);
            Coordinate {
                x: r * ang.cos(),
                y: r * ang.sin(),
            }
        })
        .collect::<Vec<_>>();
    Polygon::new(LineString(ring), vec![])
}

/// Zig-zag polygon over `[0, steps]`: an upper chain above `y = 0`
/// and a lower chain below it, both with random heights.
pub fn steppy_polygon<R: Rng>(mut rng: R, steps: usize) -> Polygon<f64> {
    let mut ring = Vec::with_capacity(2 * steps);
    for i in 0..steps {
        let y: f64 = rng.gen_range(0.1..1.);
        ring.push(Coordinate { x: i as f64, y: -y });
    }
    for i in (0..steps).rev() {
        let y: f64 = rng.gen_range(0.1..1.);
        ring.push(Coordinate {
            x: i as f64 + 0.5,
            y,
        });
    }
    Polygon::new(LineString(ring), vec![])
}

/// Star polygon `{n/k}`: `n` points on the unit circle, each joined to
/// the `k`-th next. It crosses itself `n (k - 1)` times.
pub fn star_polygon(n: usize, k: usize) -> Vec<[f64; 2]> {
    (0..n)
        .map(|i| {
            let ang = 2. * PI * ((i * k) % n) as f64 / n as f64;
            [ang.cos(), ang.sin()]
        })
        .collect()
}

/// A fixed set of inputs to cycle through in benchmarks.
pub struct Samples<T>(Vec<T>);

impl<T> Samples<T> {
    pub fn from_fn<F: FnMut() -> T>(size: usize, mut proc: F) -> Self {
        Self((0..size).map(|_| proc()).collect())
    }

    pub fn sampler<'a>(&'a self) -> impl FnMut() -> &'a T {
        let mut curr = 0;
        move || {
            let sample = &self.0[curr];
            curr = (curr + 1) % self.0.len();
            sample
        }
    }
}
