//! Axis-aligned bounding boxes.
//!
//! Purpose
//! - `AxisBox`: planar box at a fixed coordinate on one axis (X, Y or Z), with
//!   lazily derived corners, side edges and bounding planes.
//! - `Aabb`: full 3D box composed of six `AxisBox` faces, with union,
//!   containment, intersection and viewport derivation.
//!
//! Conventions
//! - Bounds are stored untranslated; `translate` accumulates an offset that is
//!   applied on read. Every cached derived value is dropped on `translate`.
//! - Caches are `OnceLock` cells: first access computes, later reads share.
//! - `is_beyond` uses strict comparisons, so touching boxes intersect.

mod aabb3;
mod axis_box;
mod viewport;

pub use aabb3::Aabb;
pub use axis_box::{Axis, AxisBox, BoxSide, Corner, Edge};

#[cfg(test)]
mod tests;
