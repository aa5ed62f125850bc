//! Depth frame projection into cell counts.
//!
//! Each depth frame is unprojected pixel by pixel through the scaled
//! camera intrinsics and the camera-to-world pose, sliced to a horizontal
//! band (floor and ceiling rejected), and accumulated into the map as a
//! temporally decaying evidence count.

use crate::config::DepthUpdateConfig;
use crate::core::{ImageView, Matrix3, Matrix4, Vector3};
use crate::grid::OccupancyMap;

impl OccupancyMap {
    /// Project a depth frame into the cell counts.
    ///
    /// `intrinsics` and `rgb_resolution` describe the RGB camera the
    /// intrinsics were calibrated for; the effective depth intrinsics are
    /// derived by scaling to the depth image resolution. `view_matrix` is
    /// the tracked camera-to-world pose.
    ///
    /// Prior counts decay by `config.previous_weight` exactly once before
    /// the pixel loop; each surviving sample adds
    /// `config.incoming_sample_weight` to the cell it lands in. Samples
    /// outside `[min_depth, max_depth]` or the `[min_height, max_height]`
    /// world slice are skipped; non-positive and sentinel-poisoned depths
    /// fail the depth gate.
    pub fn update_cell_counts(
        &mut self,
        depth_map: &ImageView<'_, f32>,
        intrinsics: Matrix3,
        rgb_resolution: (f32, f32),
        view_matrix: Matrix4,
        config: &DepthUpdateConfig,
    ) {
        let depth_width = depth_map.width();
        let depth_height = depth_map.height();

        // Depth intrinsics from the RGB calibration, scaled by
        // (depth resolution / rgb resolution)
        let scale_x = depth_width as f32 / rgb_resolution.0;
        let scale_y = depth_height as f32 / rgb_resolution.1;
        let inv_fx = (1.0 / scale_x) * (1.0 / intrinsics.fx());
        let inv_fy = (1.0 / scale_y) * (1.0 / intrinsics.fy());
        let cx = scale_x * intrinsics.cx();
        let cy = scale_y * intrinsics.cy();

        // The depth image frame matches the tracked camera frame except
        // that Y points down: rotate 180 degrees about X.
        let camera_to_world = view_matrix * Matrix4::rotation_x_pi();

        let mut values = self.write_values();

        // Decay existing counts
        for value in values.iter_mut() {
            *value *= config.previous_weight;
        }

        for y in 0..depth_height {
            for (x, &depth) in depth_map.row(y).iter().enumerate() {
                if depth < config.min_depth || depth > config.max_depth {
                    continue;
                }

                let camera_pos = Vector3::new(
                    depth * (x as f32 - cx) * inv_fx,
                    depth * (y as f32 - cy) * inv_fy,
                    depth,
                );
                let world_pos = camera_to_world.transform_point(camera_pos);

                // Constrain to a horizontal slice above the floor and
                // below the sensor
                if world_pos.y < config.min_height || world_pos.y > config.max_height {
                    continue;
                }

                let cell = self.position_to_cell(world_pos);
                values[self.linear_index(cell.x, cell.z)] += config.incoming_sample_weight;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NO_DEPTH;

    fn test_config() -> DepthUpdateConfig {
        DepthUpdateConfig {
            min_depth: 0.5,
            max_depth: 5.0,
            min_height: -10.0,
            max_height: 10.0,
            incoming_sample_weight: 1.0,
            previous_weight: 1.0,
        }
    }

    fn unit_intrinsics() -> Matrix3 {
        // Focal length 1, principal point at the single pixel: the pixel
        // unprojects straight down the camera Z axis
        Matrix3::intrinsics(1.0, 1.0, 0.0, 0.0)
    }

    #[test]
    fn test_single_pixel_lands_ahead_of_camera() {
        let mut map = OccupancyMap::new(10.0, 10.0, 1.0, Vector3::ZERO).unwrap();

        let depth = [2.0f32];
        let view = ImageView::new(&depth, 1, 1);

        map.update_cell_counts(
            &view,
            unit_intrinsics(),
            (1.0, 1.0),
            Matrix4::identity(),
            &test_config(),
        );

        // Camera at origin looking down +Z in the depth frame; after the
        // Y-flip the world point is (0, 0, -2)
        let cell = map.position_to_cell(Vector3::new(0.0, 0.0, -2.0));
        assert_eq!(map.at_cell(cell), 1.0);

        let unrelated = map.position_to_cell(Vector3::new(3.0, 0.0, 3.0));
        assert_eq!(map.at_cell(unrelated), 0.0);
    }

    #[test]
    fn test_depth_gate_skips_out_of_range_samples() {
        let mut map = OccupancyMap::new(10.0, 10.0, 1.0, Vector3::ZERO).unwrap();

        // Too close, too far, sentinel-poisoned, and negative "no data"
        let depth = [0.1f32, 50.0, NO_DEPTH, -1.0];
        let view = ImageView::new(&depth, 2, 2);

        map.update_cell_counts(
            &view,
            unit_intrinsics(),
            (2.0, 2.0),
            Matrix4::identity(),
            &test_config(),
        );

        let mut values = vec![0.0; map.num_cells()];
        map.get_occupancy_array(&mut values);
        assert!(values.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_height_slice_rejects_floor_and_ceiling() {
        let mut map = OccupancyMap::new(10.0, 10.0, 1.0, Vector3::ZERO).unwrap();

        let depth = [2.0f32];
        let view = ImageView::new(&depth, 1, 1);

        // Camera raised 5m: the unprojected point sits at world height 5,
        // above the accepted slice
        let pose = Matrix4::translation(Vector3::new(0.0, 5.0, 0.0));
        let config = DepthUpdateConfig {
            min_height: 0.25,
            max_height: 1.5,
            ..test_config()
        };
        map.update_cell_counts(&view, unit_intrinsics(), (1.0, 1.0), pose, &config);

        let mut values = vec![0.0; map.num_cells()];
        map.get_occupancy_array(&mut values);
        assert!(values.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_previous_weight_decays_counts() {
        let mut map = OccupancyMap::new(10.0, 10.0, 1.0, Vector3::ZERO).unwrap();

        let depth = [2.0f32];
        let view = ImageView::new(&depth, 1, 1);
        let config = DepthUpdateConfig {
            previous_weight: 0.5,
            ..test_config()
        };

        map.update_cell_counts(&view, unit_intrinsics(), (1.0, 1.0), Matrix4::identity(), &config);
        map.update_cell_counts(&view, unit_intrinsics(), (1.0, 1.0), Matrix4::identity(), &config);

        // First frame's count decayed to 0.5 before the second landed
        let cell = map.position_to_cell(Vector3::new(0.0, 0.0, -2.0));
        assert_eq!(map.at_cell(cell), 1.5);
    }

    #[test]
    fn test_incoming_weight_scales_accumulation() {
        let mut map = OccupancyMap::new(10.0, 10.0, 1.0, Vector3::ZERO).unwrap();

        let depth = [2.0f32, 2.0];
        let view = ImageView::new(&depth, 1, 2);
        let config = DepthUpdateConfig {
            incoming_sample_weight: 0.25,
            ..test_config()
        };

        // Both pixels unproject to nearly the same ray; with a tall
        // principal point both land in the same cell
        map.update_cell_counts(
            &view,
            Matrix3::intrinsics(1.0, 100.0, 0.0, 0.0),
            (1.0, 2.0),
            Matrix4::identity(),
            &config,
        );

        let cell = map.position_to_cell(Vector3::new(0.0, 0.0, -2.0));
        assert_eq!(map.at_cell(cell), 0.5);
    }
}
