//! Human obstacle detection from segmentation masks.

mod box2d;
mod depth;
mod instancing;

pub use box2d::Box2D;
pub use depth::{average_depth_of_box, find_human_instances, HumanInstance, NO_VALID_DEPTH};
pub use instancing::find_humans;
