//! Random coplanar point clouds (replay tokens).
//!
//! Purpose
//! - Deterministic inputs for hull benchmarks, property tests and the CLI.
//!
//! Model
//! - Pick a plane (random normal and origin, or `z = 0`), draw `count` points
//!   in a disk or square of the given radius on it, then push each point off
//!   the plane by at most `jitter`.
//! - Determinism uses a replay token `(seed, index)` mixed into one RNG.

use nalgebra::{Point3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Point layout on the plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloudLayout {
    Disk,
    Square,
}

/// Cloud sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct CloudCfg {
    pub count: usize,
    /// Disk radius, or half side of the square.
    pub radius: f64,
    pub layout: CloudLayout,
    /// Maximum off-plane displacement. Keep below the hull `eps` for coplanar input.
    pub jitter: f64,
    /// Random plane through a random origin, else `z = 0` through the origin.
    pub random_plane: bool,
}

impl Default for CloudCfg {
    fn default() -> Self {
        Self {
            count: 64,
            radius: 1.0,
            layout: CloudLayout::Disk,
            jitter: 0.0,
            random_plane: true,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    pub fn new(seed: u64, index: u64) -> Self {
        Self { seed, index }
    }

    /// Token for the next draw in the same sequence.
    #[inline]
    pub fn next(self) -> Self {
        Self {
            index: self.index.wrapping_add(1),
            ..self
        }
    }

    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64 finalizer.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        StdRng::seed_from_u64(mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15))))
    }
}

/// A drawn cloud and the plane it was drawn on.
#[derive(Clone, Debug)]
pub struct Cloud {
    pub points: Vec<Point3<f64>>,
    /// Unit normal of the sampling plane.
    pub normal: Vector3<f64>,
    pub origin: Point3<f64>,
}

fn unit_vector<R: Rng>(rng: &mut R) -> Vector3<f64> {
    loop {
        let v = Vector3::<f64>::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        let n2 = v.norm_squared();
        if n2 > 1e-6 && n2 <= 1.0 {
            return v / n2.sqrt();
        }
    }
}

/// Orthonormal pair spanning the plane with unit normal `n`.
fn plane_basis(n: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let helper = if n.x.abs() < 0.9 { Vector3::x() } else { Vector3::y() };
    let u = n.cross(&helper).normalize();
    let v = n.cross(&u);
    (u, v)
}

pub fn draw_coplanar_cloud(cfg: CloudCfg, tok: ReplayToken) -> Cloud {
    let mut rng = tok.to_std_rng();
    let (normal, origin) = if cfg.random_plane {
        let o = Point3::from(unit_vector(&mut rng) * rng.gen_range(0.0..=cfg.radius.abs()));
        (unit_vector(&mut rng), o)
    } else {
        (Vector3::z(), Point3::origin())
    };
    let (u, v) = plane_basis(&normal);
    let r = cfg.radius.abs().max(1e-9);
    let jitter = cfg.jitter.max(0.0);
    let points = (0..cfg.count)
        .map(|_| {
            let (a, b) = match cfg.layout {
                CloudLayout::Disk => {
                    let rad = r * rng.gen::<f64>().sqrt();
                    let th = rng.gen::<f64>() * std::f64::consts::TAU;
                    (rad * th.cos(), rad * th.sin())
                }
                CloudLayout::Square => (rng.gen_range(-r..=r), rng.gen_range(-r..=r)),
            };
            let off = if jitter > 0.0 {
                rng.gen_range(-jitter..=jitter)
            } else {
                0.0
            };
            origin + u * a + v * b + normal * off
        })
        .collect();
    Cloud {
        points,
        normal,
        origin,
    }
}
