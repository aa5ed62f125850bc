//! Occupancy map storage and world/cell coordinate mapping.
//!
//! The map is a fixed-extent planar grid over the floor plane. One
//! instance holds raw LiDAR sample counts, a second instance derived from
//! it holds binary occupancy; both share the same geometry. Cloning a map
//! is shallow: the clone aliases the same backing array, so a "counts"
//! view and an "occupancy" view can be held by different subsystems
//! without duplication. Use [`OccupancyMap::deep_copy`] for isolation.

use crate::config::MapExtents;
use crate::core::{CellIndices, FractionalCell, Vector3};
use crate::error::{Error, Result};
use log::error;
use parking_lot::{RwLock, RwLockReadGuard};
use std::sync::Arc;

/// Fixed-extent 2D grid of real-valued occupancy on the floor plane.
///
/// Cells are addressed by integer `(x, z)` with `x` in `[0, cells_wide)`
/// and `z` in `[0, cells_deep)`. The linear layout is `z * cells_deep + x`
/// with both indices clamped to the last row/column first. External
/// consumers locate cells by the same rule, so the stride convention must
/// not change.
#[derive(Clone, Debug)]
pub struct OccupancyMap {
    width: f32,
    depth: f32,
    cell_side: f32,
    cells_wide: usize,
    cells_deep: usize,
    center_point: Vector3,
    values: Arc<RwLock<Vec<f32>>>,
    world_positions: Arc<Vec<Vector3>>,
}

impl OccupancyMap {
    /// Create a map spanning `width` x `depth` meters of floor centered on
    /// `center_point`, divided into square cells of side `cell_side`.
    pub fn new(width: f32, depth: f32, cell_side: f32, center_point: Vector3) -> Result<Self> {
        if !(cell_side > 0.0) || cell_side > width || cell_side > depth {
            return Err(Error::Config(format!(
                "cell side {} must be positive and no larger than the {}x{} extents",
                cell_side, width, depth
            )));
        }

        let cells_wide = (width / cell_side).floor() as usize;
        let cells_deep = (depth / cell_side).floor() as usize;
        if cells_wide == 0 || cells_deep == 0 {
            return Err(Error::Config(format!(
                "extents {}x{} with cell side {} yield an empty grid",
                width, depth, cell_side
            )));
        }

        // The legacy stride makes the highest reachable index exceed
        // cells_wide * cells_deep when the grid is deeper than wide; pad
        // the backing array so every clamped index stays in bounds.
        let backing_len =
            (cells_wide * cells_deep).max((cells_deep - 1) * cells_deep + cells_wide);

        let center = Self::center_cell_of(cells_wide, cells_deep);
        let mut world_positions = vec![Vector3::ZERO; backing_len];
        let mut z = center_point.z - cell_side * center.z as f32;
        for zi in 0..cells_deep {
            let mut x = center_point.x - cell_side * center.x as f32;
            for xi in 0..cells_wide {
                world_positions[Self::linear(xi, zi, cells_wide, cells_deep)] =
                    Vector3::new(x, 0.0, z);
                x += cell_side;
            }
            z += cell_side;
        }

        Ok(Self {
            width,
            depth,
            cell_side,
            cells_wide,
            cells_deep,
            center_point,
            values: Arc::new(RwLock::new(vec![0.0; backing_len])),
            world_positions: Arc::new(world_positions),
        })
    }

    /// Create a map from configured extents
    pub fn from_extents(extents: &MapExtents) -> Result<Self> {
        Self::new(
            extents.width,
            extents.depth,
            extents.cell_side,
            extents.center_point,
        )
    }

    /// Copy with freshly allocated cell values. Unlike `clone()`, mutations
    /// of the copy are not visible through the original.
    pub fn deep_copy(&self) -> Self {
        let values = self.values.read().clone();
        Self {
            values: Arc::new(RwLock::new(values)),
            world_positions: Arc::clone(&self.world_positions),
            ..self.clone()
        }
    }

    /// Reset every cell to zero
    pub fn clear(&mut self) {
        self.values.write().fill(0.0);
    }

    /// World width spanned by the grid (meters)
    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    /// World depth spanned by the grid (meters)
    #[inline]
    pub fn depth(&self) -> f32 {
        self.depth
    }

    /// Side of a square cell (meters)
    #[inline]
    pub fn cell_side(&self) -> f32 {
        self.cell_side
    }

    /// Number of columns
    #[inline]
    pub fn cells_wide(&self) -> usize {
        self.cells_wide
    }

    /// Number of rows
    #[inline]
    pub fn cells_deep(&self) -> usize {
        self.cells_deep
    }

    /// Total number of addressable cells
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.cells_wide * self.cells_deep
    }

    /// World-space point the grid is centered on
    #[inline]
    pub fn center_point(&self) -> Vector3 {
        self.center_point
    }

    /// Cell value after clamping indices to the grid range. Out-of-range
    /// indices saturate to the last row/column.
    #[inline]
    pub fn at(&self, cell_x: usize, cell_z: usize) -> f32 {
        self.values.read()[self.linear_index(cell_x, cell_z)]
    }

    /// Cell value by cell indices
    #[inline]
    pub fn at_cell(&self, cell: CellIndices) -> f32 {
        self.at(cell.x, cell.z)
    }

    /// Map a world position to the cell containing it, clamped to the grid
    pub fn position_to_cell(&self, position: Vector3) -> CellIndices {
        let center = self.center_cell();
        let grid_center = self.world_positions[self.center_index()];

        let xi = ((position.x - grid_center.x) / self.cell_side + 0.5).floor() as i64
            + center.x as i64;
        let zi = ((position.z - grid_center.z) / self.cell_side + 0.5).floor() as i64
            + center.z as i64;

        CellIndices::new(
            xi.clamp(0, self.cells_wide as i64 - 1) as usize,
            zi.clamp(0, self.cells_deep as i64 - 1) as usize,
        )
    }

    /// Map a world position to fractional cell indices.
    ///
    /// The integral mapping adds 0.5 and floors, so the fractional range is
    /// clamped to `[-0.5, n - 1 + 0.5]` per axis; within that range the two
    /// mappings agree.
    pub fn position_to_fractional_cell(&self, position: Vector3) -> FractionalCell {
        let center = self.center_cell();
        let grid_center = self.world_positions[self.center_index()];

        let xf = (position.x - grid_center.x) / self.cell_side + center.x as f32;
        let zf = (position.z - grid_center.z) / self.cell_side + center.z as f32;

        FractionalCell::new(
            xf.clamp(-0.5, (self.cells_wide - 1) as f32 + 0.5),
            zf.clamp(-0.5, (self.cells_deep - 1) as f32 + 0.5),
        )
    }

    /// World position at the center of a cell (Y = 0)
    #[inline]
    pub fn cell_to_position(&self, cell: CellIndices) -> Vector3 {
        self.world_positions[self.linear_index(cell.x, cell.z)]
    }

    /// Mark occupied every cell whose count in `counts` reaches
    /// `threshold_amount`. Additive: cells below the threshold keep their
    /// current value, so occupancy accumulates across calls until cleared.
    pub fn update_occupancy_from_counts(&mut self, counts: &OccupancyMap, threshold_amount: f32) {
        debug_assert_eq!(self.num_cells(), counts.num_cells());
        if self.num_cells() != counts.num_cells() {
            error!("[OccupancyMap] Count map dimensions do not match occupancy map");
            return;
        }

        if Arc::ptr_eq(&self.values, &counts.values) {
            // Same backing storage; threshold in place
            let mut values = self.values.write();
            for value in values.iter_mut() {
                if *value >= threshold_amount {
                    *value = 1.0;
                }
            }
        } else {
            let count_values = counts.values.read();
            let mut values = self.values.write();
            for (value, &count) in values.iter_mut().zip(count_values.iter()) {
                if count >= threshold_amount {
                    *value = 1.0;
                }
            }
        }
    }

    /// Rewrite occupancy from a per-cell height map: occupied where the
    /// height reaches `height_threshold`, free elsewhere.
    pub fn update_occupancy_from_height_map(&mut self, heights: &[f32], height_threshold: f32) {
        if heights.len() != self.num_cells() {
            error!("[OccupancyMap] Height map dimensions do not match occupancy map");
            return;
        }

        let mut values = self.values.write();
        for (value, &height) in values.iter_mut().zip(heights) {
            *value = if height >= height_threshold { 1.0 } else { 0.0 };
        }
    }

    /// Rewrite all cell values from a raw occupancy array
    pub fn update_occupancy_from_array(&mut self, occupied: &[f32]) {
        if occupied.len() != self.num_cells() {
            error!("[OccupancyMap] Array dimensions do not match occupancy map");
            return;
        }

        self.values.write()[..occupied.len()].copy_from_slice(occupied);
    }

    /// Copy all cell values into a caller buffer of matching size
    pub fn get_occupancy_array(&self, occupied: &mut [f32]) {
        if occupied.len() != self.num_cells() {
            error!("[OccupancyMap] Array dimensions do not match occupancy map");
            return;
        }

        occupied.copy_from_slice(&self.values.read()[..occupied.len()]);
    }

    /// Center cell of the grid
    pub(crate) fn center_cell(&self) -> CellIndices {
        Self::center_cell_of(self.cells_wide, self.cells_deep)
    }

    fn center_cell_of(cells_wide: usize, cells_deep: usize) -> CellIndices {
        CellIndices::new(
            (cells_wide as f32 * 0.5).round() as usize,
            (cells_deep as f32 * 0.5).round() as usize,
        )
    }

    fn center_index(&self) -> usize {
        let center = self.center_cell();
        self.linear_index(center.x, center.z)
    }

    #[inline]
    pub(crate) fn linear_index(&self, cell_x: usize, cell_z: usize) -> usize {
        Self::linear(cell_x, cell_z, self.cells_wide, self.cells_deep)
    }

    #[inline]
    fn linear(cell_x: usize, cell_z: usize, cells_wide: usize, cells_deep: usize) -> usize {
        let x = cell_x.min(cells_wide - 1);
        let z = cell_z.min(cells_deep - 1);
        z * cells_deep + x
    }

    /// Read access to the backing cell values
    #[inline]
    pub(crate) fn read_values(&self) -> RwLockReadGuard<'_, Vec<f32>> {
        self.values.read()
    }

    /// Write access to the backing cell values
    #[inline]
    pub(crate) fn write_values(&self) -> parking_lot::RwLockWriteGuard<'_, Vec<f32>> {
        self.values.write()
    }
}
