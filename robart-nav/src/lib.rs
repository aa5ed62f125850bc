//! # RoBart-Nav: Occupancy Mapping and Path Planning
//!
//! Navigation core for a mobile robot whose sensing comes from a handheld
//! depth-imaging device (LiDAR + RGB camera + pose tracking). The library
//! turns a stream of depth frames and camera poses into a 2D occupancy
//! grid of the surrounding floor, extracts human obstacles from a
//! segmentation mask, and plans collision-free paths that respect the
//! robot's physical footprint.
//!
//! ## Quick Start
//!
//! ```rust
//! use robart_nav::{NavigationConfig, NavigationMapper};
//! use robart_nav::core::{ImageView, ImageViewMut, Matrix3, Matrix4, Vector3};
//!
//! let mut mapper = NavigationMapper::new(NavigationConfig::default()).unwrap();
//!
//! // Per captured frame: depth + confidence buffers, intrinsics, pose
//! let mut depth = vec![2.0f32; 256 * 192];
//! let confidence = vec![255u8; 256 * 192];
//! let mut depth_view = ImageViewMut::new(&mut depth, 256, 192);
//! let confidence_view = ImageView::new(&confidence, 256, 192);
//! mapper.observe_frame(
//!     &mut depth_view,
//!     &confidence_view,
//!     Matrix3::intrinsics(1500.0, 1500.0, 960.0, 720.0),
//!     (1920.0, 1440.0),
//!     Matrix4::identity(),
//! );
//!
//! // Query the derived occupancy
//! let path = mapper.find_path(Vector3::ZERO, Vector3::new(2.0, 0.0, 0.0));
//! let visible = mapper.is_line_unobstructed(Vector3::ZERO, Vector3::new(2.0, 0.0, 0.0));
//! # let _ = (path, visible);
//! ```
//!
//! ## Coordinate Frames
//!
//! - **World**: meters; X/Z span the floor plane, Y is up. Poses are 4x4
//!   column-major camera-to-world transforms.
//! - **Grid**: integer `(x, z)` cell indices over a fixed-extent grid
//!   centered on a configured world point.
//! - **Image**: row-major pixels, +Y down, with row strides that may
//!   exceed the visible width.
//!
//! ## Architecture
//!
//! - [`core`]: vectors/matrices, cell indices, pixel buffer views
//! - [`depth`]: confidence filtering of depth frames
//! - [`grid`]: the occupancy map, depth projection, line-of-sight
//! - [`humans`]: human instancing and per-instance depth
//! - [`pathfinding`]: footprint-aware breadth-first path search
//! - [`mapper`]: the per-frame pipeline driver
//! - [`config`]: construction and tuning parameters
//!
//! ## Data Flow
//!
//! ```text
//!  depth frame ─┬─► filter_depth_map (confidence gate, in place)
//!               │
//!               └─► OccupancyMap::update_cell_counts
//!                        │  decay + unproject + height slice
//!                        ▼
//!                   counts map ──► update_occupancy_from_counts
//!                                        │  threshold
//!                                        ▼
//!                                  occupancy map ──► find_path
//!                                                ──► is_line_unobstructed
//!  segmentation mask ──► find_humans ──► average_depth_of_box
//! ```

pub mod config;
pub mod core;
pub mod depth;
pub mod error;
pub mod grid;
pub mod humans;
pub mod mapper;
pub mod pathfinding;

// Re-export main types at crate root
pub use config::{DepthUpdateConfig, MapExtents, NavigationConfig, OccupancyConfig, PathConfig};
pub use error::{Error, Result};
pub use grid::OccupancyMap;
pub use humans::{Box2D, HumanInstance};
pub use mapper::NavigationMapper;
pub use pathfinding::find_path;
