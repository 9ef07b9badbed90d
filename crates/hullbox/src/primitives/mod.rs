//! Lines, planes, triangles and rectangles consumed by the box and hull engines.
//!
//! Conventions
//! - Points are `nalgebra::Point3<f64>`, directions `Vector3<f64>`.
//! - Planes carry a unit normal; "above" means on the side the normal points to.
//! - Every tolerance-dependent call takes an explicit `eps`.

mod line;
mod plane;
mod rectangle;
mod triangle;

pub use line::{Line, LineHit, Ray, Segment};
pub use plane::Plane;
pub use rectangle::Rectangle;
pub use triangle::Triangle;

#[cfg(test)]
mod tests;
