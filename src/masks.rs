use bit_set::BitSet;
use error_chain::bail;
use log::trace;

use crate::cells::Cartesian3DCoordinate;
use crate::errors::*;
use crate::grid_dimensions::GridDimensions;
use crate::grid_iterators::CellIter;
use crate::units::{Height, Length, Width};

/// Cells switched off for maze generation. A masked cell is never carved into and stays fully
/// walled.
#[derive(Debug, Clone)]
pub struct BinaryMask3D {
    mask: BitSet,
    dimensions: GridDimensions,
}

impl BinaryMask3D {
    /// A mask of the given size with nothing masked off.
    pub fn new(dimensions: GridDimensions) -> BinaryMask3D {
        BinaryMask3D {
            mask: BitSet::with_capacity(dimensions.size().0),
            dimensions,
        }
    }

    /// Parse a layered text mask.
    ///
    /// Layers (z) are separated by a blank line, each line of a layer is a row (y) and each
    /// character a cell (x). `#` or `X` masks a cell off, `.` leaves it open.
    /// Every row must be the same length and every layer the same number of rows.
    pub fn from_text(text: &str) -> Result<BinaryMask3D> {

        let mut layers: Vec<Vec<&str>> = vec![];
        let mut current_layer = vec![];
        for line in text.lines().map(|l| l.trim_end_matches('\r')) {
            if line.trim().is_empty() {
                if !current_layer.is_empty() {
                    layers.push(current_layer);
                    current_layer = vec![];
                }
            } else {
                current_layer.push(line);
            }
        }
        if !current_layer.is_empty() {
            layers.push(current_layer);
        }

        let rows = match layers.first() {
            Some(layer) => layer.len(),
            None => {
                bail!(ErrorKind::InvalidMaskData(String::from("no mask layers")));
            }
        };
        let columns = layers[0][0].chars().count();

        for (z, layer) in layers.iter().enumerate() {
            if layer.len() != rows {
                bail!(ErrorKind::InvalidMaskData(format!("layer {} has {} rows, expected {}",
                                                         z,
                                                         layer.len(),
                                                         rows)));
            }
            for (y, row) in layer.iter().enumerate() {
                let row_length = row.chars().count();
                if row_length != columns {
                    bail!(ErrorKind::InvalidMaskData(format!("layer {} row {} has {} cells, expected {}",
                                                             z,
                                                             y,
                                                             row_length,
                                                             columns)));
                }
            }
        }

        let dimensions = GridDimensions::new(Width(columns), Height(rows), Length(layers.len()))?;
        let mut mask = BinaryMask3D::new(dimensions);

        for (z, layer) in layers.iter().enumerate() {
            for (y, row) in layer.iter().enumerate() {
                for (x, glyph) in row.chars().enumerate() {
                    let coord = Cartesian3DCoordinate::new(x as u32, y as u32, z as u32);
                    match glyph {
                        '#' | 'X' => mask.mask_cell(coord)?,
                        '.' => {}
                        other => {
                            bail!(ErrorKind::InvalidMaskData(format!("unexpected character {:?} at ({}, {}, {})",
                                                                     other,
                                                                     x,
                                                                     y,
                                                                     z)));
                        }
                    }
                }
            }
        }

        trace!("parsed mask {:?} with {} unmasked cells", dimensions, mask.count_unmasked());
        Ok(mask)
    }

    #[inline]
    pub fn dimensions(&self) -> &GridDimensions {
        &self.dimensions
    }

    pub fn mask_cell(&mut self, coord: Cartesian3DCoordinate) -> Result<()> {
        let index = self.bit_index(coord)?;
        let _ = self.mask.insert(index);
        Ok(())
    }

    pub fn unmask_cell(&mut self, coord: Cartesian3DCoordinate) -> Result<()> {
        let index = self.bit_index(coord)?;
        let _ = self.mask.remove(index);
        Ok(())
    }

    /// Is the given coordinate masked out / turned off?
    ///
    /// A coordinate is not masked if it is outside the bounds of the mask's 3d space.
    pub fn is_masked(&self, coord: Cartesian3DCoordinate) -> bool {
        self.dimensions
            .coordinate_to_index(coord)
            .map_or(false, |index| self.mask.contains(index))
    }

    pub fn count_unmasked(&self) -> usize {
        self.dimensions.size().0 - self.mask.len()
    }

    pub fn first_unmasked_coordinate(&self) -> Option<Cartesian3DCoordinate> {
        // The bitset iterator yields the masked indices, so walk the cells instead.
        CellIter::new(self.dimensions).find(|coord| !self.is_masked(*coord))
    }

    fn bit_index(&self, coord: Cartesian3DCoordinate) -> Result<usize> {
        self.dimensions
            .coordinate_to_index(coord)
            .ok_or_else(|| ErrorKind::InvalidCoordinate(coord).into())
    }
}
