//! Line-of-sight tests over the occupancy grid.
//!
//! Uses Amanatides-Woo voxel traversal: the segment is walked cell by
//! cell, advancing along whichever axis crosses its next cell boundary
//! first, so every cell the segment passes through is visited exactly
//! once.

use crate::core::Vector3;
use crate::grid::OccupancyMap;

#[inline]
fn step_of(v: f32) -> i64 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

impl OccupancyMap {
    /// True iff every cell the segment from `from` to `to` passes through
    /// is unoccupied. A zero-length segment tests only its own cell.
    pub fn is_line_unobstructed(&self, from: Vector3, to: Vector3) -> bool {
        let u = self.position_to_fractional_cell(from);
        let t = self.position_to_fractional_cell(to);

        let vx = t.x - u.x;
        let vz = t.z - u.z;
        let step_x = step_of(vx);
        let step_z = step_of(vz);

        let (mut x, mut z) = u.rounded();
        let (tx, tz) = t.rounded();
        let x_end = tx + step_x;
        let z_end = tz + step_z;

        // A degenerate axis never crosses a boundary: give it infinite
        // crossing times so progress continues on the live axis only.
        let (mut t_max_x, t_delta_x) = if step_x == 0 {
            (f32::INFINITY, f32::INFINITY)
        } else {
            (
                ((x as f32 + 0.5 * step_x as f32) - u.x) / vx,
                step_x as f32 / vx,
            )
        };
        let (mut t_max_z, t_delta_z) = if step_z == 0 {
            (f32::INFINITY, f32::INFINITY)
        } else {
            (
                ((z as f32 + 0.5 * step_z as f32) - u.z) / vz,
                step_z as f32 / vz,
            )
        };

        let values = self.read_values();
        loop {
            let idx = self.linear_index(x.max(0) as usize, z.max(0) as usize);
            if values[idx] != 0.0 {
                return false;
            }

            if t_max_x < t_max_z {
                x += step_x;
                if x == x_end {
                    break;
                }
                t_max_x += t_delta_x;
            } else {
                z += step_z;
                if z == z_end {
                    break;
                }
                t_max_z += t_delta_z;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CellIndices;

    /// 5x5 free map with 1m cells centered at the origin
    fn open_map() -> OccupancyMap {
        OccupancyMap::new(5.0, 5.0, 1.0, Vector3::ZERO).unwrap()
    }

    fn occupy(map: &mut OccupancyMap, cells: &[(usize, usize)]) {
        let mut values = vec![0.0; map.num_cells()];
        map.get_occupancy_array(&mut values);
        for &(x, z) in cells {
            values[map.linear_index(x, z)] = 1.0;
        }
        map.update_occupancy_from_array(&values);
    }

    fn cell_pos(map: &OccupancyMap, x: usize, z: usize) -> Vector3 {
        map.cell_to_position(CellIndices::new(x, z))
    }

    #[test]
    fn test_open_map_is_fully_visible() {
        let map = open_map();
        let a = cell_pos(&map, 0, 0);
        let b = cell_pos(&map, 4, 4);
        assert!(map.is_line_unobstructed(a, b));
        assert!(map.is_line_unobstructed(b, a));
    }

    #[test]
    fn test_center_obstacle_blocks_diagonals() {
        let mut map = open_map();
        occupy(&mut map, &[(2, 2)]);

        let corner_a = cell_pos(&map, 0, 0);
        let corner_b = cell_pos(&map, 4, 4);
        let corner_c = cell_pos(&map, 0, 4);
        let corner_d = cell_pos(&map, 4, 0);

        assert!(!map.is_line_unobstructed(corner_a, corner_b));
        assert!(!map.is_line_unobstructed(corner_c, corner_d));

        // A ray along the first column never touches the center
        assert!(map.is_line_unobstructed(corner_a, corner_c));
    }

    #[test]
    fn test_axis_aligned_ray_hits_wall() {
        let mut map = open_map();
        occupy(&mut map, &[(2, 1)]);

        let from = cell_pos(&map, 0, 1);
        let to = cell_pos(&map, 4, 1);
        assert!(!map.is_line_unobstructed(from, to));

        // One row over is clear
        let from = cell_pos(&map, 0, 0);
        let to = cell_pos(&map, 4, 0);
        assert!(map.is_line_unobstructed(from, to));
    }

    #[test]
    fn test_zero_length_segment_tests_its_own_cell() {
        let mut map = open_map();
        occupy(&mut map, &[(1, 3)]);

        let free = cell_pos(&map, 0, 0);
        assert!(map.is_line_unobstructed(free, free));

        let blocked = cell_pos(&map, 1, 3);
        assert!(!map.is_line_unobstructed(blocked, blocked));
    }

    #[test]
    fn test_ray_stops_at_destination_cell() {
        let mut map = open_map();
        occupy(&mut map, &[(4, 1)]);

        // Obstacle beyond the destination must not obstruct
        let from = cell_pos(&map, 0, 1);
        let to = cell_pos(&map, 3, 1);
        assert!(map.is_line_unobstructed(from, to));
    }
}
