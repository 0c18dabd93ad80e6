//! Cube coordinates on a hexagonal grid.
//!
//! Every cell is addressed by three integers `(q, r, s)` with
//! `q + r + s == 0`. A hexagon of radius `range` holds every coordinate whose
//! [`Coordinate::length`] is at most `range`.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from coordinate construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoordinateError {
    #[error("cube coordinate ({q}, {r}, {s}) does not sum to zero")]
    NotOnPlane { q: i32, r: i32, s: i32 },
    #[error("axial coordinate ({q}, {r}) has no representable s")]
    Overflow { q: i32, r: i32 },
}

// ---------------------------------------------------------------------------
// Coordinate
// ---------------------------------------------------------------------------

/// A cell on the hex grid in cube form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    q: i32,
    r: i32,
    s: i32,
}

/// Offsets to the six adjacent cells, clockwise from east.
const NEIGHBOUR_OFFSETS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

/// Largest hexagon radius whose cells all have representable coordinates.
///
/// Within it `q + r` never leaves the `i32` range, so `s` always exists.
pub const MAX_RANGE: u32 = (i32::MAX / 2) as u32;

impl Coordinate {
    /// The centre cell.
    pub const ORIGIN: Coordinate = Coordinate { q: 0, r: 0, s: 0 };

    /// Build a coordinate from all three components.
    pub fn new(q: i32, r: i32, s: i32) -> Result<Self, CoordinateError> {
        if i64::from(q) + i64::from(r) + i64::from(s) != 0 {
            return Err(CoordinateError::NotOnPlane { q, r, s });
        }
        Ok(Self { q, r, s })
    }

    /// Build a coordinate from `q` and `r`; `s` is derived.
    pub fn axial(q: i32, r: i32) -> Result<Self, CoordinateError> {
        q.checked_add(r)
            .and_then(i32::checked_neg)
            .map(|s| Self { q, r, s })
            .ok_or(CoordinateError::Overflow { q, r })
    }

    /// `axial` for cells of a hexagon no larger than [`MAX_RANGE`].
    fn in_range(q: i32, r: i32) -> Self {
        Self { q, r, s: -q - r }
    }

    pub fn q(&self) -> i32 {
        self.q
    }

    pub fn r(&self) -> i32 {
        self.r
    }

    pub fn s(&self) -> i32 {
        self.s
    }

    /// Hex distance to another coordinate.
    pub fn distance(&self, other: &Coordinate) -> u32 {
        // Differences of two i32 values fit in 32 unsigned bits.
        let delta = |a: i32, b: i32| (i64::from(a) - i64::from(b)).unsigned_abs() as u32;
        delta(self.q, other.q)
            .max(delta(self.r, other.r))
            .max(delta(self.s, other.s))
    }

    /// Hex distance from the origin.
    pub fn length(&self) -> u32 {
        self.distance(&Self::ORIGIN)
    }

    /// The adjacent cells, clockwise from east. Cells past the edge of the
    /// `i32` plane are left out.
    pub fn neighbours(&self) -> impl Iterator<Item = Coordinate> + use<> {
        let Self { q, r, .. } = *self;
        NEIGHBOUR_OFFSETS
            .into_iter()
            .filter_map(move |(dq, dr)| Self::axial(q.checked_add(dq)?, r.checked_add(dr)?).ok())
    }

    /// Every coordinate of a hexagon with the given radius, row by row
    /// (`r` ascending, then `q` ascending). Empty above [`MAX_RANGE`].
    pub fn hexagon(range: u32) -> impl Iterator<Item = Coordinate> {
        let extent = (range <= MAX_RANGE).then_some(range as i32);
        extent
            .into_iter()
            .flat_map(move |extent| (-extent..=extent).flat_map(move |r| Self::row(range, r)))
    }

    /// The cells of row `r` in a hexagon of radius `range`, `q` ascending.
    ///
    /// Empty when `r` lies outside the hexagon or `range` exceeds
    /// [`MAX_RANGE`].
    pub fn row(range: u32, r: i32) -> impl Iterator<Item = Coordinate> {
        let (first_q, width) = Self::row_bounds(range, r).unwrap_or((0, 0));
        (0..width as i32).map(move |offset| Self::in_range(first_q + offset, r))
    }

    /// First `q` and width of row `r` in a hexagon of radius `range`.
    ///
    /// Returns `None` when `r` lies outside the hexagon or `range` exceeds
    /// [`MAX_RANGE`].
    pub fn row_bounds(range: u32, r: i32) -> Option<(i32, u32)> {
        if range > MAX_RANGE {
            return None;
        }
        let range = range as i32;
        if r.unsigned_abs() > range as u32 {
            return None;
        }
        let first_q = (-range).max(-range - r);
        let last_q = range.min(range - r);
        Some((first_q, (last_q - first_q + 1) as u32))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.q, self.r, self.s)
    }
}
