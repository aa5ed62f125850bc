//! Breadth-first path search over the occupancy grid.
//!
//! The search runs from the destination outward on the 4-connected grid,
//! so the predecessor chain followed from the start cell reconstructs the
//! forward path in order without a reversal pass. Candidate cells are
//! gated by the robot footprint: a cell is safe only if the whole block of
//! cells covering the robot's physical extent is free of obstacles.
//!
//! "No route" and "destination occupied" are not errors; both return an
//! empty path.

use crate::config::PathConfig;
use crate::core::{CellIndices, Vector3};
use crate::grid::OccupancyMap;
use log::{debug, error, trace};
use std::collections::{HashMap, VecDeque};

/// Find a collision-free path of cell waypoints from `from` to `to`.
///
/// The returned sequence starts at the start cell, ends at the goal cell,
/// and contains only the corners of the route: interior cells of straight
/// segments are compressed away. Empty when the destination is occupied or
/// unreachable.
pub fn find_path(
    occupancy: &OccupancyMap,
    from: Vector3,
    to: Vector3,
    config: &PathConfig,
) -> Vec<CellIndices> {
    let dest = occupancy.position_to_cell(to);
    let src = occupancy.position_to_cell(from);

    let values = occupancy.read_values();
    let occupied =
        |cell: CellIndices| values[occupancy.linear_index(cell.x, cell.z)] != 0.0;

    if occupied(dest) {
        debug!(
            "[FindPath] Destination cell ({},{}) is occupied, no path",
            dest.x, dest.z
        );
        return Vec::new();
    }

    if dest == src {
        return vec![src];
    }

    // Number of cells the footprint extends beyond the center cell on each
    // side; the safety block is (2 * half_extent + 1) cells square.
    let half_extent = (config.robot_radius / occupancy.cell_side()).ceil() as usize;
    let is_safe = |cell: CellIndices| -> bool {
        let x0 = cell.x.saturating_sub(half_extent);
        let z0 = cell.z.saturating_sub(half_extent);
        let x1 = (cell.x + half_extent).min(occupancy.cells_wide() - 1);
        let z1 = (cell.z + half_extent).min(occupancy.cells_deep() - 1);
        for z in z0..=z1 {
            for x in x0..=x1 {
                if occupied(CellIndices::new(x, z)) {
                    return false;
                }
            }
        }
        true
    };

    // Search from the destination toward the start
    let mut transitions: HashMap<CellIndices, CellIndices> = HashMap::new();
    let mut frontier: VecDeque<CellIndices> = VecDeque::new();
    frontier.push_back(dest);
    transitions.insert(dest, dest);

    let mut reached_start = false;
    'search: while let Some(cell) = frontier.pop_front() {
        for neighbor in neighbors_4(occupancy, cell) {
            if transitions.contains_key(&neighbor) {
                continue;
            }
            if !is_safe(neighbor) {
                continue;
            }

            transitions.insert(neighbor, cell);
            if neighbor == src {
                reached_start = true;
                break 'search;
            }

            frontier.push_back(neighbor);
        }
    }

    if !reached_start {
        debug!(
            "[FindPath] No route from ({},{}) to ({},{}) after {} cells",
            src.x,
            src.z,
            dest.x,
            dest.z,
            transitions.len()
        );
        return Vec::new();
    }

    let path = compress_waypoints(&transitions, src, dest);
    trace!(
        "[FindPath] Route from ({},{}) to ({},{}): {} waypoints",
        src.x,
        src.z,
        dest.x,
        dest.z,
        path.len()
    );
    path
}

/// In-bounds 4-connected neighbors of a cell
fn neighbors_4(occupancy: &OccupancyMap, cell: CellIndices) -> Vec<CellIndices> {
    let mut neighbors = Vec::with_capacity(4);
    if cell.x > 0 {
        neighbors.push(CellIndices::new(cell.x - 1, cell.z));
    }
    if cell.x < occupancy.cells_wide() - 1 {
        neighbors.push(CellIndices::new(cell.x + 1, cell.z));
    }
    if cell.z > 0 {
        neighbors.push(CellIndices::new(cell.x, cell.z - 1));
    }
    if cell.z < occupancy.cells_deep() - 1 {
        neighbors.push(CellIndices::new(cell.x, cell.z + 1));
    }
    neighbors
}

/// Walk the predecessor chain from `src` to `dest`, keeping only corners.
///
/// Collinear interior cells overwrite the previously emitted waypoint, so
/// a straight run contributes exactly its two endpoints.
fn compress_waypoints(
    transitions: &HashMap<CellIndices, CellIndices>,
    src: CellIndices,
    dest: CellIndices,
) -> Vec<CellIndices> {
    let mut path = vec![src];
    let mut current = src;
    let mut direction: Option<(i64, i64)> = None;

    while current != dest {
        let next = match transitions.get(&current) {
            Some(&next) => next,
            None => {
                // The chain must link every visited cell back to dest
                error!("[FindPath] Path is corrupted");
                return Vec::new();
            }
        };

        let step = (
            next.x as i64 - current.x as i64,
            next.z as i64 - current.z as i64,
        );
        if direction == Some(step) {
            if let Some(last) = path.last_mut() {
                *last = next;
            }
        } else {
            path.push(next);
            direction = Some(step);
        }

        current = next;
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_map(side_m: f32) -> OccupancyMap {
        OccupancyMap::new(side_m, side_m, 1.0, Vector3::ZERO).unwrap()
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

    fn point_footprint() -> PathConfig {
        PathConfig { robot_radius: 0.0 }
    }

    #[test]
    fn test_same_cell_yields_single_waypoint() {
        let map = open_map(5.0);
        let a = cell_pos(&map, 2, 2);
        let path = find_path(&map, a, a, &point_footprint());
        assert_eq!(path, vec![CellIndices::new(2, 2)]);
    }

    #[test]
    fn test_straight_run_compresses_to_two_waypoints() {
        let map = open_map(5.0);
        let from = cell_pos(&map, 0, 2);
        let to = cell_pos(&map, 4, 2);

        let path = find_path(&map, from, to, &point_footprint());
        assert_eq!(
            path,
            vec![CellIndices::new(0, 2), CellIndices::new(4, 2)]
        );
    }

    #[test]
    fn test_path_endpoints_and_connectivity_on_open_map() {
        let map = open_map(5.0);
        let from = cell_pos(&map, 0, 0);
        let to = cell_pos(&map, 4, 4);

        let path = find_path(&map, from, to, &point_footprint());
        assert_eq!(path.first(), Some(&CellIndices::new(0, 0)));
        assert_eq!(path.last(), Some(&CellIndices::new(4, 4)));

        // Consecutive waypoints differ along exactly one axis
        for pair in path.windows(2) {
            let dx = pair[0].x != pair[1].x;
            let dz = pair[0].z != pair[1].z;
            assert!(dx != dz, "waypoints {:?} are not axis-aligned", pair);
        }
    }

    #[test]
    fn test_occupied_destination_has_no_path() {
        let mut map = open_map(5.0);
        occupy(&mut map, &[(4, 2)]);

        let from = cell_pos(&map, 0, 2);
        let to = cell_pos(&map, 4, 2);
        assert!(find_path(&map, from, to, &point_footprint()).is_empty());
    }

    #[test]
    fn test_full_wall_blocks_path() {
        let mut map = open_map(5.0);
        occupy(&mut map, &[(2, 0), (2, 1), (2, 2), (2, 3), (2, 4)]);

        let from = cell_pos(&map, 0, 2);
        let to = cell_pos(&map, 4, 2);
        assert!(find_path(&map, from, to, &point_footprint()).is_empty());
    }

    #[test]
    fn test_footprint_rejects_narrow_corridor() {
        let mut map = open_map(5.0);
        // Wall along column 2 with a one-cell gap at (2, 2)
        occupy(&mut map, &[(2, 0), (2, 1), (2, 3), (2, 4)]);

        let from = cell_pos(&map, 0, 2);
        let to = cell_pos(&map, 4, 2);

        // A point robot slips through the gap
        let path = find_path(&map, from, to, &point_footprint());
        assert!(!path.is_empty());
        assert_eq!(path.last(), Some(&CellIndices::new(4, 2)));

        // A robot one cell wide on each side does not
        let wide = PathConfig { robot_radius: 1.0 };
        assert!(find_path(&map, from, to, &wide).is_empty());
    }

    #[test]
    fn test_path_routes_around_obstacle() {
        let mut map = open_map(7.0);
        occupy(&mut map, &[(3, 2), (3, 3), (3, 4)]);

        let from = cell_pos(&map, 1, 3);
        let to = cell_pos(&map, 5, 3);

        let path = find_path(&map, from, to, &point_footprint());
        assert_eq!(path.first(), Some(&CellIndices::new(1, 3)));
        assert_eq!(path.last(), Some(&CellIndices::new(5, 3)));

        // The route must detour: more than the two straight-line waypoints
        assert!(path.len() > 2);
        for waypoint in &path {
            assert_ne!(map.at_cell(*waypoint), 1.0, "path crosses {:?}", waypoint);
        }
    }

    #[test]
    fn test_footprint_keeps_distance_from_walls() {
        let mut map = open_map(7.0);
        occupy(&mut map, &[(3, 0), (3, 1), (3, 2)]);

        let from = cell_pos(&map, 1, 3);
        let to = cell_pos(&map, 5, 3);
        let config = PathConfig { robot_radius: 1.0 };

        let path = find_path(&map, from, to, &config);
        assert!(!path.is_empty());

        // Every waypoint keeps the footprint block clear of the wall
        for waypoint in &path {
            for dz in -1i64..=1 {
                for dx in -1i64..=1 {
                    let x = (waypoint.x as i64 + dx).clamp(0, 6) as usize;
                    let z = (waypoint.z as i64 + dz).clamp(0, 6) as usize;
                    assert_eq!(map.at(x, z), 0.0);
                }
            }
        }
    }
}
