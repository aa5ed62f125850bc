//! Per-frame navigation pipeline.
//!
//! Ties the depth filter, the grid projector and the occupancy threshold
//! together: one call per captured frame keeps a counts map and a derived
//! binary occupancy map current, and path and visibility queries run
//! against the derived map.

use crate::config::NavigationConfig;
use crate::core::{CellIndices, ImageView, ImageViewMut, Matrix3, Matrix4, Vector3};
use crate::depth::filter_depth_map;
use crate::error::Result;
use crate::grid::OccupancyMap;
use crate::pathfinding;
use log::debug;

/// Drives the mapping pipeline over a stream of depth frames.
pub struct NavigationMapper {
    config: NavigationConfig,
    counts: OccupancyMap,
    occupancy: OccupancyMap,
    frames_observed: u64,
}

impl NavigationMapper {
    /// Create a mapper with a counts map and a derived occupancy map over
    /// the configured extents.
    pub fn new(config: NavigationConfig) -> Result<Self> {
        let counts = OccupancyMap::from_extents(&config.extents)?;
        let occupancy = counts.deep_copy();
        Ok(Self {
            config,
            counts,
            occupancy,
            frames_observed: 0,
        })
    }

    /// Ingest one captured frame.
    ///
    /// Filters the depth map in place against its confidence map, projects
    /// the surviving samples into the counts map (decaying prior counts),
    /// and re-thresholds the derived occupancy.
    pub fn observe_frame(
        &mut self,
        depth_map: &mut ImageViewMut<'_, f32>,
        confidence_map: &ImageView<'_, u8>,
        intrinsics: Matrix3,
        rgb_resolution: (f32, f32),
        view_matrix: Matrix4,
    ) {
        filter_depth_map(
            depth_map,
            confidence_map,
            self.config.minimum_depth_confidence,
        );
        self.counts.update_cell_counts(
            &depth_map.as_view(),
            intrinsics,
            rgb_resolution,
            view_matrix,
            &self.config.depth_update,
        );
        self.occupancy
            .update_occupancy_from_counts(&self.counts, self.config.occupancy.threshold_amount);

        self.frames_observed += 1;
        debug!(
            "[NavigationMapper] Observed frame #{} ({}x{})",
            self.frames_observed,
            depth_map.width(),
            depth_map.height()
        );
    }

    /// Plan a path over the derived occupancy with the configured robot
    /// footprint.
    pub fn find_path(&self, from: Vector3, to: Vector3) -> Vec<CellIndices> {
        pathfinding::find_path(&self.occupancy, from, to, &self.config.path)
    }

    /// Visibility test over the derived occupancy
    pub fn is_line_unobstructed(&self, from: Vector3, to: Vector3) -> bool {
        self.occupancy.is_line_unobstructed(from, to)
    }

    /// The raw counts map (shared handle)
    pub fn counts(&self) -> &OccupancyMap {
        &self.counts
    }

    /// The derived binary occupancy map (shared handle)
    pub fn occupancy(&self) -> &OccupancyMap {
        &self.occupancy
    }

    /// Frames ingested so far
    pub fn frames_observed(&self) -> u64 {
        self.frames_observed
    }

    /// Reset both maps, keeping the configuration
    pub fn clear(&mut self) {
        self.counts.clear();
        self.occupancy.clear();
        self.frames_observed = 0;
    }
}
