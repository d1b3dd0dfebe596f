//! Closed vertex loops as drawn by the annotation UI.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::coord::Coord;
use super::coord::Annotation;

/// Minimum number of vertices for a ring to enclose any area.
pub const MIN_RING_VERTICES: usize = 3;

/// An ordered sequence of vertices, implicitly closed.
///
/// Vertices are kept exactly as they arrived on the wire (`[[x, y], ...]`).
/// A vertex of the wrong arity does not fail deserialization; the ring is
/// reported as defective when it is resolved with [`Ring::points`] and the
/// renderer skips it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ring(Vec<Vec<f64>>);

impl Ring {
    /// Creates a ring from `(x, y)` pairs.
    pub fn new(points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Self(points.into_iter().map(|(x, y)| vec![x, y]).collect())
    }

    /// Creates a ring from raw vertex tuples of any arity.
    pub fn from_raw(vertices: Vec<Vec<f64>>) -> Self {
        Self(vertices)
    }

    /// Number of raw vertices.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the ring has no vertices.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolves the ring into annotation-space points.
    ///
    /// # Errors
    /// Returns a [`RingDefect`] if any vertex is not a finite 2D point or if
    /// fewer than [`MIN_RING_VERTICES`] vertices are present.
    pub fn points(&self) -> Result<Vec<Coord<Annotation>>, RingDefect> {
        let mut points = Vec::with_capacity(self.0.len());
        for (index, vertex) in self.0.iter().enumerate() {
            let &[x, y] = vertex.as_slice() else {
                return Err(RingDefect::NotTwoDimensional {
                    index,
                    arity: vertex.len(),
                });
            };
            let point = Coord::new(x, y);
            if !point.is_finite() {
                return Err(RingDefect::NonFinite { index });
            }
            points.push(point);
        }

        if points.len() < MIN_RING_VERTICES {
            return Err(RingDefect::TooFewVertices(points.len()));
        }
        Ok(points)
    }
}

/// Why a ring cannot be rasterized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RingDefect {
    /// Fewer than three vertices.
    TooFewVertices(usize),
    /// A vertex that is not an `(x, y)` pair.
    NotTwoDimensional { index: usize, arity: usize },
    /// A vertex with a NaN or infinite component.
    NonFinite { index: usize },
}

impl fmt::Display for RingDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RingDefect::TooFewVertices(n) => {
                write!(f, "ring has {} vertices (need at least {})", n, MIN_RING_VERTICES)
            }
            RingDefect::NotTwoDimensional { index, arity } => {
                write!(f, "vertex {} has {} components (expected 2)", index, arity)
            }
            RingDefect::NonFinite { index } => write!(f, "vertex {} is not finite", index),
        }
    }
}
