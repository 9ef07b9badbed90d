//! 3D geometry kernel: axis-aligned boxes and coplanar convex hulls.
//!
//! Layout
//! - `tolerance`: `eps` predicates and point dedup.
//! - `primitives`: planes, lines, segments, rays, triangles, rectangles.
//! - `aabb`: per-axis planar boxes, 3D boxes, viewport rectangles.
//! - `hull`: quickhull `ConvexArea`, simplification, half-space clipping.
//! - `polygon`: union of convex parts minus holes.
//! - `sample`: reproducible coplanar point clouds.
//!
//! Tolerance Policy
//! - Every tolerance-dependent call takes `eps` explicitly; there is no
//!   crate-wide default. Choose it relative to your coordinate magnitudes.
//! - "No intersection" is `None`. Only constructors return `Err`.

pub mod aabb;
pub mod error;
pub mod geometry;
pub mod hull;
pub mod polygon;
pub mod primitives;
pub mod sample;
pub mod tolerance;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::GeomError;
pub use geometry::Geometry;
pub use hull::{ConvexArea, Simplified};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::aabb::{Aabb, Axis, AxisBox, BoxSide, Corner, Edge};
    pub use crate::hull::{ConvexArea, Simplified};
    pub use crate::polygon::Polygon;
    pub use crate::primitives::{Line, LineHit, Plane, Ray, Rectangle, Segment, Triangle};
    pub use crate::sample::{draw_coplanar_cloud, CloudCfg, CloudLayout, ReplayToken};
    pub use crate::{GeomError, Geometry};
    pub use nalgebra::{Point3, Vector3};
}
