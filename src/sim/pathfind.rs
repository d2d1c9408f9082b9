//! Distance-field propagation and path extraction
//!
//! Fields are built by a breadth-first wavefront done as repeated full-grid
//! scans: for cost `c = 0, 1, ..` every cell at `c` relaxes its four
//! axis neighbours to `c + 1`. That is O(budget × area), which is fine for the
//! small fixed-size arenas this runs on.

use glam::IVec2;

use super::heat_map::{HeatMap, UNREACHABLE};

/// Neighbour order used by propagation and the path descent tie-break:
/// East, West, North, South
pub const NEIGHBOURS: [IVec2; 4] = [IVec2::X, IVec2::NEG_X, IVec2::NEG_Y, IVec2::Y];

/// Fill `field` with tile-step distances from `seed`.
///
/// Cells farther than `max_cost` steps, or walled off by `is_solid`, stay at
/// [`UNREACHABLE`]. The seed itself is always cost 0, even when solid.
pub fn propagate<F>(field: &mut HeatMap, seed: IVec2, max_cost: u32, is_solid: F)
where
    F: Fn(IVec2) -> bool,
{
    field.fill(UNREACHABLE);
    if !field.contains(seed) {
        return;
    }
    field.set(seed, 0.0);

    for cost in 0..max_cost {
        let current = cost as f32;
        let next = current + 1.0;
        let mut frontier = false;

        for index in 0..field.len() {
            if field.get_index(index) != current {
                continue;
            }
            frontier = true;
            let coord = field.coord_of(index);

            for offset in NEIGHBOURS {
                let neighbour = coord + offset;
                if !field.contains(neighbour) || is_solid(neighbour) {
                    continue;
                }
                if field.get(neighbour) > next {
                    field.set(neighbour, next);
                }
            }
        }

        // Nothing sat at this cost, so nothing can sit at any later one
        if !frontier {
            break;
        }
    }
}

/// Walk a populated field from `goal` back down to its seed.
///
/// Each step moves to the first neighbour (East, West, North, South) whose
/// cost is exactly one lower. The result is ordered seed first, goal last,
/// and includes both ends. `None` when the goal is off the field or was never
/// reached.
pub fn extract_path(field: &HeatMap, goal: IVec2) -> Option<Vec<IVec2>> {
    if !field.is_reachable(goal) {
        return None;
    }

    let mut cost = field.get(goal);
    let mut coord = goal;
    let mut path = Vec::with_capacity(cost as usize + 1);
    path.push(coord);

    while cost > 0.0 {
        let wanted = cost - 1.0;
        let step = NEIGHBOURS
            .iter()
            .map(|&offset| coord + offset)
            .find(|&n| field.contains(n) && field.get(n) == wanted)?;
        coord = step;
        cost = wanted;
        path.push(coord);
    }

    path.reverse();
    Some(path)
}
