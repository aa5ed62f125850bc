//! Human instance extraction from a segmentation mask.
//!
//! The segmentation model emits a per-pixel confidence byte. Instancing
//! groups confident pixels into one bounding box per person in two
//! passes: an agglomerative raster scan that grows boxes pixel by pixel,
//! then a transitive merge that collapses any boxes left overlapping.

use super::box2d::Box2D;
use crate::core::ImageView;
use log::trace;

/// Window searched around each mask pixel for an existing box to join.
/// Odd, and wide enough that near-adjacent blobs merge despite mask noise.
const NEIGHBOR_WINDOW_SIZE: i32 = 17;

/// Index of the first box in `humans` overlapping `probe`, if any
fn find_overlapping_box_index(humans: &[Box2D], probe: &Box2D) -> Option<usize> {
    humans.iter().position(|human| human.overlaps(probe))
}

/// Cluster mask pixels with confidence at or above `minimum_confidence`
/// into bounding boxes, one per detected human. Output boxes are pairwise
/// disjoint.
pub fn find_humans(mask: &ImageView<'_, u8>, minimum_confidence: u8) -> Vec<Box2D> {
    let offset = NEIGHBOR_WINDOW_SIZE / 2;
    let mut humans: Vec<Box2D> = Vec::new();

    for y in 0..mask.height() {
        for (x, &value) in mask.row(y).iter().enumerate() {
            if value < minimum_confidence {
                continue;
            }

            let xi = x as i32;
            let yi = y as i32;

            // A human pixel: look for an existing box near it
            let neighborhood = Box2D::new(
                xi - offset,
                yi - offset,
                NEIGHBOR_WINDOW_SIZE,
                NEIGHBOR_WINDOW_SIZE,
            );
            match find_overlapping_box_index(&humans, &neighborhood) {
                None => {
                    // New human, start with a single pixel
                    humans.push(Box2D::pixel(xi, yi));
                }
                Some(index) => {
                    // Grow the existing box to enclose the pixel
                    let existing = humans[index];
                    let x2 = (existing.x + existing.width - 1).max(xi);
                    let y2 = (existing.y + existing.height - 1).max(yi);
                    let grown = Box2D::new(
                        existing.x,
                        existing.y,
                        x2 - existing.x + 1,
                        y2 - existing.y + 1,
                    );

                    // Swap to the front of the list: the next human pixel
                    // almost always belongs to the same blob, so the linear
                    // search above finds it immediately
                    humans[index] = humans[0];
                    humans[0] = grown;
                }
            }
        }
    }

    merge_overlapping(&mut humans);
    trace!("[HumanInstancing] {} instances found", humans.len());
    humans
}

/// Merge overlapping boxes in place until no pair overlaps
fn merge_overlapping(humans: &mut Vec<Box2D>) {
    loop {
        let mut merged_something = false;

        let mut i = 0;
        while i < humans.len() {
            // Merge the current box with all subsequent overlapping ones
            let mut j = i + 1;
            while j < humans.len() {
                if humans[i].overlaps(&humans[j]) {
                    let other = humans.remove(j);
                    humans[i].merge_with(&other);
                    merged_something = true;
                } else {
                    j += 1;
                }
            }
            i += 1;
        }

        if !merged_something {
            break;
        }
    }
}
