//! Per-instance depth estimation.
//!
//! Pairs each human bounding box with the mean of the depth samples it
//! covers, giving a distance estimate per person. The depth map is used
//! unfiltered here; wild samples are rejected by the maximum-depth gate
//! instead.

use super::box2d::Box2D;
use super::instancing::find_humans;
use crate::core::ImageView;

/// Mean depth reported when a box contains no valid sample
pub const NO_VALID_DEPTH: f32 = -1.0;

/// A detected person: an image-space bounding box and its mean depth in
/// meters, or [`NO_VALID_DEPTH`] when no usable depth sample was found.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HumanInstance {
    /// Bounding box in segmentation mask coordinates
    pub bounds: Box2D,
    /// Mean depth in meters, or -1 when unavailable
    pub depth: f32,
}

/// Average the depth samples inside `bounds` that are at most
/// `maximum_depth`, clipping the box to the frame first.
///
/// Returns [`NO_VALID_DEPTH`] when the box lies entirely off-frame or no
/// sample passes the gate.
pub fn average_depth_of_box(
    bounds: Box2D,
    depth_map: &ImageView<'_, f32>,
    maximum_depth: f32,
) -> f32 {
    let frame_width = depth_map.width() as i32;
    let frame_height = depth_map.height() as i32;

    // Clip to frame
    if bounds.x >= frame_width
        || bounds.y >= frame_height
        || bounds.x + bounds.width <= 0
        || bounds.y + bounds.height <= 0
    {
        return NO_VALID_DEPTH;
    }
    let x = bounds.x.max(0);
    let y = bounds.y.max(0);
    let width = (frame_width - x).min(bounds.width);
    let height = (frame_height - y).min(bounds.height);

    let mut cumulative_depth = 0.0f32;
    let mut samples_counted = 0usize;
    for yi in y..y + height {
        let row = depth_map.row(yi as usize);
        for &depth in &row[x as usize..(x + width) as usize] {
            if depth <= maximum_depth {
                cumulative_depth += depth;
                samples_counted += 1;
            }
        }
    }

    if samples_counted == 0 {
        return NO_VALID_DEPTH;
    }

    cumulative_depth / samples_counted as f32
}

/// Run instancing on `mask` and annotate every box with its mean depth.
///
/// The mask and depth map must cover the same field of view at the same
/// resolution.
pub fn find_human_instances(
    mask: &ImageView<'_, u8>,
    depth_map: &ImageView<'_, f32>,
    minimum_confidence: u8,
    maximum_depth: f32,
) -> Vec<HumanInstance> {
    find_humans(mask, minimum_confidence)
        .into_iter()
        .map(|bounds| HumanInstance {
            bounds,
            depth: average_depth_of_box(bounds, depth_map, maximum_depth),
        })
        .collect()
}
