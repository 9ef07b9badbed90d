//! Construction errors shared by boxes, hulls and polygons.
//!
//! Intersection queries never fail: "no intersection" is `None`. Only
//! constructors report errors, and they never hand back a partial value.

use std::fmt;

/// Error type shared by all constructors.
#[derive(Clone, Debug, PartialEq)]
pub enum GeomError {
    /// No points (or geometries) were supplied.
    EmptyInput { what: &'static str },
    /// Input collapsed to something lower-dimensional than requested.
    Degenerate { reason: String },
    /// A point lies off the supporting plane by more than the tolerance.
    NotCoplanar { distance: f64 },
}

impl GeomError {
    pub(crate) fn empty(what: &'static str) -> Self {
        Self::EmptyInput { what }
    }

    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        Self::Degenerate {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GeomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput { what } => write!(f, "empty input: {what}"),
            Self::Degenerate { reason } => write!(f, "degenerate input: {reason}"),
            Self::NotCoplanar { distance } => {
                write!(f, "points are not coplanar (off by {distance:e})")
            }
        }
    }
}

impl std::error::Error for GeomError {}
