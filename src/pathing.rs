// Dijkstra's Algorithm over the carved passages.
// Every passage is one step so the flood fill is a breadth first search: the first time a cell
// is reached its distance is final.

use std::fmt::{Debug, Display};
use std::ops::Add;

use fnv::FnvHashMap;
use itertools::Itertools;
use num::traits::{Bounded, One, Unsigned, Zero};
use smallvec::SmallVec;

use crate::cells::Cartesian3DCoordinate;
use crate::grid::MazeGrid;
use crate::masks::BinaryMask3D;

// Trait (hack) used purely as a generic type parameter alias because it looks ugly to type this
// out each time.
pub trait MaxDistance
    : Zero + One + Bounded + Unsigned + Add + Debug + Clone + Copy + Display + Ord
    {
}
impl<T: Zero + One + Bounded + Unsigned + Add + Debug + Clone + Copy + Display + Ord> MaxDistance for T {}

pub type FurthestPoints = SmallVec<[Cartesian3DCoordinate; 8]>;

#[derive(Debug, Clone)]
pub struct Distances<MaxDistanceT = u32> {
    start_coordinate: Cartesian3DCoordinate,
    distances: FnvHashMap<Cartesian3DCoordinate, MaxDistanceT>,
    max_distance: MaxDistanceT,
}

impl<MaxDistanceT> Distances<MaxDistanceT>
    where MaxDistanceT: MaxDistance
{
    /// Flood fill the steps from `start_coordinate` to every cell reachable through passages.
    /// Returns None if the start is not on the grid, or if some reachable cell is further away
    /// than `MaxDistanceT` can count.
    pub fn new(grid: &MazeGrid,
               start_coordinate: Cartesian3DCoordinate)
               -> Option<Distances<MaxDistanceT>> {

        if !grid.in_bounds(start_coordinate) {
            return None;
        }

        let mut max = Zero::zero();
        let mut distances = FnvHashMap::with_capacity_and_hasher(grid.size(), Default::default());
        let _ = distances.insert(start_coordinate, Zero::zero());

        // The distances map doubles as the visited set, so the frontier needs no deduplication.
        let mut frontier = vec![start_coordinate];
        while !frontier.is_empty() {

            let mut new_frontier = vec![];
            for cell_coord in &frontier {

                let distance_to_cell: MaxDistanceT = match distances.get(cell_coord) {
                    Some(d) => *d,
                    None => continue,
                };
                if distance_to_cell > max {
                    max = distance_to_cell;
                }

                for link_coordinate in grid.links(*cell_coord).unwrap_or_default() {
                    if !distances.contains_key(&link_coordinate) {
                        if distance_to_cell == Bounded::max_value() {
                            return None;
                        }
                        let _ = distances.insert(link_coordinate, distance_to_cell + One::one());
                        new_frontier.push(link_coordinate);
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start_coordinate,
            distances,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> Cartesian3DCoordinate {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn max(&self) -> MaxDistanceT {
        self.max_distance
    }

    /// None for cells the flood fill never reached.
    #[inline(always)]
    pub fn distance_from_start_to(&self, coord: Cartesian3DCoordinate) -> Option<MaxDistanceT> {
        self.distances.get(&coord).cloned()
    }

    /// Number of cells reachable from the start, the start included.
    pub fn reachable_count(&self) -> usize {
        self.distances.len()
    }

    /// All cells at the maximum distance, in coordinate order.
    pub fn furthest_points_on_grid(&self) -> FurthestPoints {
        let furthest_distance = self.max();
        self.distances
            .iter()
            .filter(|&(_, distance)| *distance == furthest_distance)
            .map(|(coord, _)| *coord)
            .sorted()
            .collect()
    }
}

/// Walk back downhill from `end_point` to the start of the distances.
/// The path runs start to end inclusive. None if the end is unreachable.
pub fn shortest_path<MaxDistanceT>(grid: &MazeGrid,
                                   distances_from_start: &Distances<MaxDistanceT>,
                                   end_point: Cartesian3DCoordinate)
                                   -> Option<Vec<Cartesian3DCoordinate>>
    where MaxDistanceT: MaxDistance
{
    let mut current_distance = distances_from_start.distance_from_start_to(end_point)?;

    let mut path = vec![end_point];
    let start = distances_from_start.start();
    let mut current_coord = end_point;

    while current_coord != start {

        let closest_to_start = grid.links(current_coord)?
            .into_iter()
            .filter_map(|coord| {
                distances_from_start.distance_from_start_to(coord).map(|d| (coord, d))
            })
            .min_by_key(|&(_, d)| d);

        match closest_to_start {
            Some((closer_coord, closer_distance)) if closer_distance < current_distance => {
                current_coord = closer_coord;
                current_distance = closer_distance;
                path.push(current_coord);
            }
            // Not getting any closer: the distances belong to some other grid.
            _ => return None,
        }
    }

    path.reverse();
    Some(path)
}

/// The longest path through a perfect maze: the furthest cell from an arbitrary start is one end
/// of the longest path and the furthest cell from that is the other.
///
/// With a mask the arbitrary start is the first unmasked cell. If the mask splits the maze into
/// disconnected regions only the region holding that cell is considered.
pub fn dijkstra_longest_path<MaxDistanceT>(grid: &MazeGrid,
                                           mask: Option<&BinaryMask3D>)
                                           -> Option<Vec<Cartesian3DCoordinate>>
    where MaxDistanceT: MaxDistance
{
    let arbitrary_start_point = match mask {
        Some(m) => m.first_unmasked_coordinate()?,
        None => Cartesian3DCoordinate::new(0, 0, 0),
    };

    let first_distances = Distances::<MaxDistanceT>::new(grid, arbitrary_start_point)?;
    let long_path_start_coordinate = *first_distances.furthest_points_on_grid().first()?;

    let distances_from_start = Distances::<MaxDistanceT>::new(grid, long_path_start_coordinate)?;
    let end_point = *distances_from_start.furthest_points_on_grid().first()?;

    shortest_path(grid, &distances_from_start, end_point)
}
