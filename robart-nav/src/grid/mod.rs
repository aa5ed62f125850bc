//! Occupancy grid: storage, depth projection and line-of-sight.

mod depth_update;
mod map;
mod raycast;

pub use map::OccupancyMap;
