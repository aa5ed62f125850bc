//! Depth map confidence filtering.
//!
//! The depth sensor reports a per-pixel confidence byte alongside each
//! frame. Samples below a minimum confidence are poisoned with the
//! [`NO_DEPTH`] sentinel so that downstream consumers (the grid projector
//! and the human instancer's box depth) reject them with their existing
//! range gates.

use crate::core::{ImageView, ImageViewMut, NO_DEPTH};

/// Overwrite every depth sample whose confidence is strictly below
/// `minimum_confidence` with the [`NO_DEPTH`] sentinel, in place.
///
/// The two images must have identical dimensions; their row strides are
/// honored independently. Absent buffers leave the depth map unmodified.
pub fn filter_depth_map(
    depth_map: &mut ImageViewMut<'_, f32>,
    confidence_map: &ImageView<'_, u8>,
    minimum_confidence: u8,
) {
    debug_assert_eq!(depth_map.width(), confidence_map.width());
    debug_assert_eq!(depth_map.height(), confidence_map.height());

    if depth_map.is_empty() || confidence_map.is_empty() {
        return;
    }

    for y in 0..depth_map.height() {
        let confidence_row = confidence_map.row(y);
        for (depth, &confidence) in depth_map.row_mut(y).iter_mut().zip(confidence_row) {
            if confidence < minimum_confidence {
                *depth = NO_DEPTH;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_confidence_samples_are_poisoned() {
        let mut depth = [1.0f32, 2.0, 3.0, 4.0];
        let confidence = [0u8, 255, 255, 0];

        let mut depth_view = ImageViewMut::new(&mut depth, 2, 2);
        let confidence_view = ImageView::new(&confidence, 2, 2);
        filter_depth_map(&mut depth_view, &confidence_view, 128);

        assert_eq!(depth, [NO_DEPTH, 2.0, 3.0, NO_DEPTH]);
    }

    #[test]
    fn test_all_confident_leaves_depth_untouched() {
        let mut depth = [1.5f32, 2.5];
        let confidence = [200u8, 200];

        let mut depth_view = ImageViewMut::new(&mut depth, 2, 1);
        let confidence_view = ImageView::new(&confidence, 2, 1);
        filter_depth_map(&mut depth_view, &confidence_view, 128);

        assert_eq!(depth, [1.5, 2.5]);
    }

    #[test]
    fn test_independent_strides() {
        // Depth rows padded to 3 elements, confidence rows padded to 4
        let mut depth = [1.0f32, 2.0, 9.0, 3.0, 4.0, 9.0];
        let confidence = [0u8, 255, 7, 7, 255, 0, 7, 7];

        let mut depth_view = ImageViewMut::with_stride(&mut depth, 2, 2, 3);
        let confidence_view = ImageView::with_stride(&confidence, 2, 2, 4);
        filter_depth_map(&mut depth_view, &confidence_view, 128);

        // Padding bytes untouched, visible pixels filtered
        assert_eq!(depth, [NO_DEPTH, 2.0, 9.0, 3.0, NO_DEPTH, 9.0]);
    }

    #[test]
    fn test_empty_buffers_are_a_no_op() {
        let mut depth: [f32; 0] = [];
        let confidence: [u8; 0] = [];

        let mut depth_view = ImageViewMut::new(&mut depth, 0, 0);
        let confidence_view = ImageView::new(&confidence, 0, 0);
        filter_depth_map(&mut depth_view, &confidence_view, 128);
    }
}
