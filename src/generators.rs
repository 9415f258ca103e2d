use error_chain::bail;
use log::debug;
use rand::Rng;

use crate::cells::Cartesian3DCoordinate;
use crate::directions::{Direction, DIRECTIONS_COUNT};
use crate::errors::*;
use crate::grid::MazeGrid;
use crate::masks::BinaryMask3D;

/// The six directions in a uniformly random order.
///
/// Fisher-Yates: for each index `i` but the last, swap in an element drawn uniformly from
/// `i..n`. This is the only randomness maze carving consumes.
pub fn shuffled_directions<R: Rng + ?Sized>(rng: &mut R) -> [Direction; DIRECTIONS_COUNT] {
    let mut dirs = Direction::ALL;
    let n = dirs.len();
    for i in 0..(n - 1) {
        let j = rng.gen_range(i..n);
        dirs.swap(i, j);
    }
    dirs
}

/// Carve a perfect maze through every cell reachable from `start`.
///
/// The recursive backtracker walks randomly from the current cell into any in-bounds neighbour
/// that has not been carved into yet (its passage mask is still empty), opening the passage as
/// it goes. When a cell has tried every direction it backtracks to the cell it came from.
/// The result is a spanning tree over the reachable cells: no loops, exactly one route between
/// any two cells.
///
/// The walk keeps an explicit stack of frames rather than recursing, so large grids cannot
/// overflow the call stack. Each frame shuffles its directions when it is pushed, which
/// consumes the random number generator in the same order a recursive walk would.
///
/// Masked cells are never entered. A grid with existing passages is not reset; cells that
/// already have passages are treated as visited.
pub fn recursive_backtracker<R: Rng + ?Sized>(grid: &mut MazeGrid,
                                              start: Cartesian3DCoordinate,
                                              rng: &mut R,
                                              mask: Option<&BinaryMask3D>)
                                              -> Result<()> {
    if !grid.in_bounds(start) {
        bail!(ErrorKind::InvalidCoordinate(start));
    }
    if let Some(m) = mask {
        if m.dimensions() != grid.dimensions() {
            bail!(ErrorKind::MaskDimensionsMismatch);
        }
        if m.is_masked(start) {
            bail!(ErrorKind::MaskedStartCell(start));
        }
    }
    let is_masked = |coord: Cartesian3DCoordinate| mask.map_or(false, |m| m.is_masked(coord));

    let mut stack = vec![CarveFrame::new(start, rng)];
    let mut max_depth = 1;
    let mut carved = 0;

    while let Some(frame) = stack.last_mut() {

        if frame.next_direction == DIRECTIONS_COUNT {
            let _ = stack.pop();
            continue;
        }

        let cell = frame.cell;
        let dir = frame.directions[frame.next_direction];
        frame.next_direction += 1;

        match grid.neighbour_at_direction(cell, dir) {
            Some(next) if !grid.is_visited(next) && !is_masked(next) => {}
            _ => continue,
        }

        let next = grid.link(cell, dir).map_err(|_| ErrorKind::InvalidCoordinate(cell))?;
        carved += 1;

        stack.push(CarveFrame::new(next, rng));
        if stack.len() > max_depth {
            max_depth = stack.len();
        }
    }

    debug!("recursive backtracker from {:?}: {} passages carved, max depth {}",
           start,
           carved,
           max_depth);
    Ok(())
}

/// Carve a perfect maze over the whole grid from `start`, nothing masked.
pub fn carve<R: Rng + ?Sized>(grid: &mut MazeGrid,
                              start: Cartesian3DCoordinate,
                              rng: &mut R)
                              -> Result<()> {
    recursive_backtracker(grid, start, rng, None)
}

/// A cell on the carving stack and the directions it still has to try.
struct CarveFrame {
    cell: Cartesian3DCoordinate,
    directions: [Direction; DIRECTIONS_COUNT],
    next_direction: usize,
}

impl CarveFrame {
    fn new<R: Rng + ?Sized>(cell: Cartesian3DCoordinate, rng: &mut R) -> CarveFrame {
        CarveFrame {
            cell,
            directions: shuffled_directions(rng),
            next_direction: 0,
        }
    }
}

#[cfg(test)]
mod tests {

    use petgraph::algo::{connected_components, is_cyclic_undirected};
    use quickcheck::{quickcheck, TestResult};
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use super::*;
    use crate::grid_dimensions::GridDimensions;
    use crate::units::{Height, Length, Width};

    fn grid(w: usize, h: usize, l: usize) -> MazeGrid {
        MazeGrid::new(GridDimensions::new(Width(w), Height(h), Length(l)).expect("valid dimensions"))
    }

    fn gc(x: u32, y: u32, z: u32) -> Cartesian3DCoordinate {
        Cartesian3DCoordinate::new(x, y, z)
    }

    fn set_bits(g: &MazeGrid) -> u32 {
        g.iter().map(|coord| g.get(coord).unwrap().count()).sum()
    }

    fn is_symmetric(g: &MazeGrid) -> bool {
        g.iter().all(|coord| {
            Direction::ALL.iter().all(|&dir| {
                let open = g.get(coord).unwrap().is_open(dir);
                match g.neighbour_at_direction(coord, dir) {
                    Some(neighbour) => open == g.get(neighbour).unwrap().is_open(dir.opposite()),
                    None => !open,
                }
            })
        })
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = XorShiftRng::seed_from_u64(1);
        for _ in 0..100 {
            let mut dirs = shuffled_directions(&mut rng).to_vec();
            dirs.sort();
            let mut all = Direction::ALL.to_vec();
            all.sort();
            assert_eq!(dirs, all);
        }
    }

    #[test]
    fn shuffle_with_lowest_draws_keeps_order() {
        // Every draw picks `i` itself, so nothing moves.
        let mut rng = StepRng::new(0, 0);
        assert_eq!(shuffled_directions(&mut rng), Direction::ALL);
    }

    #[test]
    fn shuffle_reaches_every_first_direction() {
        let mut rng = XorShiftRng::seed_from_u64(99);
        let mut seen = [false; DIRECTIONS_COUNT];
        for _ in 0..200 {
            seen[shuffled_directions(&mut rng)[0].index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn two_cube_is_fully_connected_spanning_tree() {
        let mut g = grid(2, 2, 2);
        let mut rng = XorShiftRng::seed_from_u64(2024);
        carve(&mut g, gc(0, 0, 0), &mut rng).unwrap();

        assert!(g.iter().all(|coord| g.is_visited(coord)));
        assert_eq!(set_bits(&g), 2 * 7);
        assert_eq!(g.links_count(), 7);
        assert!(is_symmetric(&g));
    }

    #[test]
    fn fixed_draws_carve_known_maze() {
        // With every shuffle the identity the walk always tries South, North, West, East, Up,
        // Down in that order, which snakes through the 2x2x2 cube in a single corridor.
        let mut g = grid(2, 2, 2);
        let mut rng = StepRng::new(0, 0);
        carve(&mut g, gc(0, 0, 0), &mut rng).unwrap();

        let bits = |x, y, z| g.get(gc(x, y, z)).unwrap().bits();
        use crate::directions::Direction::*;
        assert_eq!(bits(0, 0, 0), South.bit());
        assert_eq!(bits(0, 1, 0), North.bit() | East.bit());
        assert_eq!(bits(1, 1, 0), West.bit() | North.bit());
        assert_eq!(bits(1, 0, 0), South.bit() | Up.bit());
        assert_eq!(bits(1, 0, 1), Down.bit() | South.bit());
        assert_eq!(bits(1, 1, 1), North.bit() | West.bit());
        assert_eq!(bits(0, 1, 1), East.bit() | North.bit());
        assert_eq!(bits(0, 0, 1), South.bit());
    }

    #[test]
    fn same_seed_same_maze() {
        let carve_seeded = |seed| {
            let mut g = grid(5, 4, 3);
            let mut rng = XorShiftRng::seed_from_u64(seed);
            carve(&mut g, gc(2, 2, 1), &mut rng).unwrap();
            g
        };
        assert_eq!(carve_seeded(17), carve_seeded(17));
        assert_ne!(carve_seeded(17), carve_seeded(18));
    }

    #[test]
    fn single_cell_grid_stays_walled() {
        let mut g = grid(1, 1, 1);
        let mut rng = XorShiftRng::seed_from_u64(5);
        carve(&mut g, gc(0, 0, 0), &mut rng).unwrap();
        assert_eq!(g.links_count(), 0);
        assert!(!g.is_visited(gc(0, 0, 0)));
    }

    #[test]
    fn long_corridor_does_not_exhaust_the_stack() {
        let mut g = grid(100_000, 1, 1);
        let mut rng = XorShiftRng::seed_from_u64(3);
        carve(&mut g, gc(0, 0, 0), &mut rng).unwrap();
        assert_eq!(g.links_count(), 99_999);
    }

    #[test]
    fn existing_passages_count_as_visited() {
        let mut g = grid(3, 1, 1);
        g.link(gc(0, 0, 0), Direction::East).expect("link failed");
        let mut rng = XorShiftRng::seed_from_u64(6);
        carve(&mut g, gc(2, 0, 0), &mut rng).unwrap();

        assert_eq!(g.links_count(), 1);
        assert!(!g.is_visited(gc(2, 0, 0)));

        // From a fresh start every carved passage is reported back through the link.
        g.reset();
        carve(&mut g, gc(2, 0, 0), &mut rng).unwrap();
        assert_eq!(g.iter_links().collect::<Vec<_>>(),
                   vec![(gc(0, 0, 0), gc(1, 0, 0)), (gc(1, 0, 0), gc(2, 0, 0))]);
    }

    #[test]
    fn start_must_be_in_bounds() {
        let mut g = grid(2, 2, 2);
        let mut rng = XorShiftRng::seed_from_u64(5);
        assert!(carve(&mut g, gc(2, 0, 0), &mut rng).is_err());
        assert_eq!(g.links_count(), 0);
    }

    #[test]
    fn masked_cells_are_never_carved() {
        let text = "...\n.#.\n...\n\n...\n.#.\n...\n";
        let mask = BinaryMask3D::from_text(text).unwrap();
        let mut g = MazeGrid::new(*mask.dimensions());
        let mut rng = XorShiftRng::seed_from_u64(11);
        recursive_backtracker(&mut g, gc(0, 0, 0), &mut rng, Some(&mask)).unwrap();

        assert!(!g.is_visited(gc(1, 1, 0)));
        assert!(!g.is_visited(gc(1, 1, 1)));
        assert_eq!(g.links_count(), mask.count_unmasked() - 1);
        assert!(is_symmetric(&g));
    }

    #[test]
    fn masked_start_or_mismatched_mask_rejected() {
        let mask = BinaryMask3D::from_text("#.\n..\n").unwrap();
        let mut rng = XorShiftRng::seed_from_u64(11);

        let mut g = MazeGrid::new(*mask.dimensions());
        assert!(recursive_backtracker(&mut g, gc(0, 0, 0), &mut rng, Some(&mask)).is_err());

        let mut other = grid(3, 3, 1);
        assert!(recursive_backtracker(&mut other, gc(1, 1, 0), &mut rng, Some(&mask)).is_err());
    }

    #[test]
    fn walled_off_region_stays_unvisited() {
        // The middle layer is masked, so nothing above it is reachable from below.
        let mask = BinaryMask3D::from_text("..\n..\n\n##\n##\n\n..\n..\n").unwrap();
        let mut g = MazeGrid::new(*mask.dimensions());
        let mut rng = XorShiftRng::seed_from_u64(8);
        recursive_backtracker(&mut g, gc(0, 0, 0), &mut rng, Some(&mask)).unwrap();

        assert_eq!(g.links_count(), 3);
        for coord in g.iter().filter(|c| c.z > 0) {
            assert!(!g.is_visited(coord));
        }
    }

    #[test]
    fn quickcheck_carved_grid_is_a_spanning_tree() {

        fn prop(w: u8, h: u8, l: u8, seed: u64) -> TestResult {
            let (w, h, l) = (1 + w as usize % 6, 1 + h as usize % 6, 1 + l as usize % 6);
            if w * h * l == 1 {
                return TestResult::discard();
            }

            let mut g = grid(w, h, l);
            let mut rng = XorShiftRng::seed_from_u64(seed);
            let start = g.dimensions().random_cell(&mut rng);
            carve(&mut g, start, &mut rng).unwrap();

            let graph = g.as_graph();
            let cells = g.size();
            TestResult::from_bool(set_bits(&g) as usize == 2 * (cells - 1) &&
                                  g.iter().all(|coord| g.is_visited(coord)) &&
                                  connected_components(&graph) == 1 &&
                                  !is_cyclic_undirected(&graph) &&
                                  is_symmetric(&g))
        }
        quickcheck(prop as fn(u8, u8, u8, u64) -> TestResult);
    }
}
