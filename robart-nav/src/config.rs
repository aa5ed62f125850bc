//! Configuration types for the navigation core.

use crate::core::Vector3;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Occupancy map extents
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MapExtents {
    /// World width spanned by the grid (meters, X axis)
    pub width: f32,

    /// World depth spanned by the grid (meters, Z axis)
    pub depth: f32,

    /// Side of a square cell (meters)
    pub cell_side: f32,

    /// World-space point the grid is centered on
    pub center_point: Vector3,
}

impl Default for MapExtents {
    fn default() -> Self {
        Self {
            width: 20.0,
            depth: 20.0,
            cell_side: 0.25,
            center_point: Vector3::ZERO,
        }
    }
}

/// Parameters for projecting a depth frame into cell counts
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct DepthUpdateConfig {
    /// Reject depth samples closer than this (meters)
    pub min_depth: f32,

    /// Reject depth samples farther than this (meters)
    pub max_depth: f32,

    /// Ignore points below this world height (floor rejection, meters)
    pub min_height: f32,

    /// Ignore points above this world height (ceiling rejection, meters)
    pub max_height: f32,

    /// Weight added to a cell per landing sample
    pub incoming_sample_weight: f32,

    /// Multiplier applied to all prior counts before accumulating.
    /// 1.0 retains everything; below 1.0 forgets exponentially.
    pub previous_weight: f32,
}

impl Default for DepthUpdateConfig {
    fn default() -> Self {
        Self {
            // LiDAR returns outside 1-3m tend to be noisy
            min_depth: 1.0,
            max_depth: 3.0,
            min_height: 0.25,
            max_height: 1.5,
            incoming_sample_weight: 1.0,
            previous_weight: 1.0,
        }
    }
}

/// Parameters for deriving binary occupancy from cell counts
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct OccupancyConfig {
    /// A cell whose count reaches this amount becomes occupied
    pub threshold_amount: f32,
}

impl Default for OccupancyConfig {
    fn default() -> Self {
        Self {
            threshold_amount: 10.0,
        }
    }
}

/// Parameters for path planning
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PathConfig {
    /// Robot radius in meters, inflated to a square cell footprint
    pub robot_radius: f32,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self { robot_radius: 0.25 }
    }
}

/// Full navigation configuration
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Grid extents shared by the counts and occupancy maps
    pub extents: MapExtents,
    /// Depth frame projection parameters
    pub depth_update: DepthUpdateConfig,
    /// Count thresholding parameters
    pub occupancy: OccupancyConfig,
    /// Path planning parameters
    pub path: PathConfig,
    /// Depth samples with confidence below this are discarded
    pub minimum_depth_confidence: u8,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            extents: MapExtents::default(),
            depth_update: DepthUpdateConfig::default(),
            occupancy: OccupancyConfig::default(),
            path: PathConfig::default(),
            // ARKit-style confidence: 2 keeps only high-confidence samples
            minimum_depth_confidence: 2,
        }
    }
}

impl NavigationConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &std::path::Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Save configuration to a YAML file
    pub fn to_yaml_file(&self, path: &std::path::Path) -> Result<()> {
        std::fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    /// Serialize to a YAML string
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
