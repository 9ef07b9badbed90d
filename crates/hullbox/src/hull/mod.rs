//! Coplanar convex hulls (quickhull) and half-space clipping.
//!
//! Purpose
//! - Build the minimal convex polygon holding a coplanar point set.
//! - Clip it against planes and triangle edge half-spaces.
//! - Answer intersection queries through an AABB gate and the fan triangles.
//!
//! Why
//! - Clipping and intersection results come back as `Geometry`, so a clip can
//!   degrade an area to a triangle, segment or point without a separate path.
//!
//! References
//! - Barber, Dobkin, Huhdanpaa, "The Quickhull Algorithm for Convex Hulls" (1996).
//! - Sutherland, Hodgman, "Reentrant Polygon Clipping" (1974).

mod area;
mod clip;
mod quickhull;

pub use area::{ConvexArea, Simplified};
pub(crate) use clip::{clip_points_by_plane, oriented_toward};
