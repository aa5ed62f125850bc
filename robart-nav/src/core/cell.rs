//! Cell index types for the occupancy grid.

use serde::{Deserialize, Serialize};

/// Integral X and Z indices into the occupancy grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellIndices {
    /// Column index, in `[0, cells_wide)`
    pub x: usize,
    /// Row index, in `[0, cells_deep)`
    pub z: usize,
}

impl CellIndices {
    /// Create new cell indices
    #[inline]
    pub fn new(x: usize, z: usize) -> Self {
        Self { x, z }
    }
}

/// Fractional X and Z indices into the occupancy grid.
///
/// Not floored to integral values; used for ray traversal and
/// visualization. Each axis is clamped to `[-0.5, n - 1 + 0.5]` so that
/// positions exactly at the grid edges round to valid cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FractionalCell {
    /// Fractional column index
    pub x: f32,
    /// Fractional row index
    pub z: f32,
}

impl FractionalCell {
    /// Create new fractional indices
    #[inline]
    pub fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// The integral cell this fractional position rounds to
    #[inline]
    pub fn rounded(&self) -> (i64, i64) {
        ((self.x + 0.5).floor() as i64, (self.z + 0.5).floor() as i64)
    }
}
