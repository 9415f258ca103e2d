use log::trace;
use petgraph::graph::{NodeIndex, UnGraph};
use std::fmt;

use crate::cells::{Cartesian3DCoordinate, CoordinateSmallVec, PassageMask};
use crate::directions::{Direction, POSITIVE_DIRECTIONS};
use crate::grid_dimensions::GridDimensions;
use crate::grid_iterators::{BoundaryIter, CellIter};
use crate::units::NodesCount;


/// A 3D maze: one passage mask per cell, stored z-major.
///
/// Passages are always symmetric: if a cell is open towards a neighbour, the neighbour is open
/// back towards it. Every mutation goes through `link`/`unlink` which keep that true.
#[derive(Clone, PartialEq, Eq)]
pub struct MazeGrid {
    passages: Vec<PassageMask>,
    dimensions: GridDimensions,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CellLinkError {
    InvalidGridCoordinate,
}

impl fmt::Debug for MazeGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "MazeGrid :: dimensions: {:?}, links: {:?}",
               self.dimensions,
               self.links_count())
    }
}

impl MazeGrid {
    /// A fully walled grid: every mask is empty.
    pub fn new(dimensions: GridDimensions) -> MazeGrid {
        MazeGrid {
            passages: vec![PassageMask::empty(); dimensions.size().0],
            dimensions,
        }
    }

    #[inline]
    pub fn dimensions(&self) -> &GridDimensions {
        &self.dimensions
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.passages.len()
    }

    /// Number of open passages. Each passage sets two symmetric bits.
    pub fn links_count(&self) -> usize {
        let bits: usize = self.passages.iter().map(|mask| mask.count() as usize).sum();
        bits / 2
    }

    #[inline]
    pub fn in_bounds(&self, coord: Cartesian3DCoordinate) -> bool {
        self.dimensions.is_valid_coordinate(coord)
    }

    /// The passage mask of a cell, None if the coordinate is out of bounds.
    #[inline]
    pub fn get(&self, coord: Cartesian3DCoordinate) -> Option<PassageMask> {
        self.dimensions
            .coordinate_to_index(coord)
            .map(|index| self.passages[index])
    }

    /// Has any passage been carved into this cell?
    #[inline]
    pub fn is_visited(&self, coord: Cartesian3DCoordinate) -> bool {
        self.get(coord).map_or(false, |mask| !mask.is_empty())
    }

    /// Back to a fully walled grid. Any mesh extracted earlier no longer describes this grid.
    pub fn reset(&mut self) {
        for mask in self.passages.iter_mut() {
            *mask = PassageMask::empty();
        }
    }

    pub fn neighbour_at_direction(&self,
                                  coord: Cartesian3DCoordinate,
                                  direction: Direction)
                                  -> Option<Cartesian3DCoordinate> {
        let [dx, dy, dz] = direction.offset();
        let offset_axis = |c: u32, d: i32| -> Option<u32> {
            let moved = i64::from(c) + i64::from(d);
            if moved < 0 || moved > i64::from(u32::MAX) {
                None
            } else {
                Some(moved as u32)
            }
        };

        let neighbour = Cartesian3DCoordinate::new(offset_axis(coord.x, dx)?,
                                                   offset_axis(coord.y, dy)?,
                                                   offset_axis(coord.z, dz)?);
        if self.in_bounds(neighbour) {
            Some(neighbour)
        } else {
            None
        }
    }

    /// Cells adjacent to a cell, but not necessarily linked by a passage.
    pub fn neighbours(&self, coord: Cartesian3DCoordinate) -> CoordinateSmallVec {
        Direction::ALL
            .iter()
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect()
    }

    /// Cells linked to a cell by a passage. None if the coordinate is invalid.
    pub fn links(&self, coord: Cartesian3DCoordinate) -> Option<CoordinateSmallVec> {
        self.get(coord).map(|mask| {
            mask.open_directions()
                .iter()
                .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
                .collect()
        })
    }

    /// Open a passage from a cell to its neighbour in `direction`, setting both symmetric bits.
    /// Returns the neighbour's coordinate.
    pub fn link(&mut self,
                coord: Cartesian3DCoordinate,
                direction: Direction)
                -> Result<Cartesian3DCoordinate, CellLinkError> {

        let a_index = self.dimensions.coordinate_to_index(coord);
        let neighbour = self.neighbour_at_direction(coord, direction);

        match (a_index, neighbour) {
            (Some(a), Some(b_coord)) => {
                let b = self.dimensions
                    .coordinate_to_index(b_coord)
                    .ok_or(CellLinkError::InvalidGridCoordinate)?;
                self.passages[a].open(direction);
                self.passages[b].open(direction.opposite());
                trace!("link {:?} -{:?}-> {:?}", coord, direction, b_coord);
                Ok(b_coord)
            }
            _ => Err(CellLinkError::InvalidGridCoordinate),
        }
    }

    /// Wall up the passage from a cell towards `direction`, if there is one.
    /// Returns true if an unlink occurred.
    pub fn unlink(&mut self, coord: Cartesian3DCoordinate, direction: Direction) -> bool {
        if !self.is_neighbour_linked(coord, direction) {
            return false;
        }

        let indices = self.neighbour_at_direction(coord, direction)
            .and_then(|b| self.dimensions.coordinate_to_index(b))
            .and_then(|b| self.dimensions.coordinate_to_index(coord).map(|a| (a, b)));

        if let Some((a, b)) = indices {
            self.passages[a].close(direction);
            self.passages[b].close(direction.opposite());
            true
        } else {
            false
        }
    }

    /// Are two cells in the grid adjacent and linked by a passage?
    pub fn is_linked(&self, a: Cartesian3DCoordinate, b: Cartesian3DCoordinate) -> bool {
        Direction::ALL
            .iter()
            .any(|dir| self.neighbour_at_direction(a, *dir) == Some(b) &&
                       self.is_neighbour_linked(a, *dir))
    }

    pub fn is_neighbour_linked(&self, coord: Cartesian3DCoordinate, direction: Direction) -> bool {
        self.neighbour_at_direction(coord, direction).is_some() &&
        self.get(coord).map_or(false, |mask| mask.is_open(direction))
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.dimensions)
    }

    /// Cells on the maximal face of the grid for a positive direction.
    #[inline]
    pub fn iter_boundary(&self, direction: Direction) -> Option<BoundaryIter> {
        BoundaryIter::new(self.dimensions, direction)
    }

    /// Every passage exactly once, as (cell, neighbour in a positive direction) pairs.
    pub fn iter_links<'a>(&'a self) -> impl Iterator<Item = (Cartesian3DCoordinate, Cartesian3DCoordinate)> + 'a {
        self.iter().flat_map(move |coord| {
            POSITIVE_DIRECTIONS
                .iter()
                .filter(move |dir| self.is_neighbour_linked(coord, **dir))
                .filter_map(move |dir| self.neighbour_at_direction(coord, *dir))
                .map(move |neighbour| (coord, neighbour))
        })
    }

    /// The carved topology as an undirected graph. Node indices are the z-major cell indices,
    /// node weights the cell coordinates, edge weights the positive direction of the passage.
    pub fn as_graph(&self) -> UnGraph<Cartesian3DCoordinate, Direction> {
        let (NodesCount(nodes), _) = self.dimensions.graph_size();

        let mut graph = UnGraph::with_capacity(nodes, self.links_count());
        for coord in self.iter() {
            let _ = graph.add_node(coord);
        }
        for (index, coord) in self.iter().enumerate() {
            for &dir in &POSITIVE_DIRECTIONS {
                if !self.is_neighbour_linked(coord, dir) {
                    continue;
                }
                let neighbour_index = self.neighbour_at_direction(coord, dir)
                    .and_then(|neighbour| self.dimensions.coordinate_to_index(neighbour));
                if let Some(neighbour_index) = neighbour_index {
                    let _ = graph.add_edge(NodeIndex::new(index), NodeIndex::new(neighbour_index), dir);
                }
            }
        }
        graph
    }
}
