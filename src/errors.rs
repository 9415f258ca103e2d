// Create the Error, ErrorKind, ResultExt, and Result types.
// Other modules `use crate::errors::*;` to pick them up.
use error_chain::error_chain;

use crate::cells::Cartesian3DCoordinate;

error_chain! {

    errors {
        InvalidDimensions(width: usize, height: usize, length: usize) {
            description("invalid grid dimensions")
            display("invalid grid dimensions {}x{}x{}: each dimension must be positive and the cell count must fit in a u32",
                    width, height, length)
        }

        InvalidCoordinate(coord: Cartesian3DCoordinate) {
            description("grid coordinate out of bounds")
            display("grid coordinate ({}, {}, {}) is out of bounds", coord.x, coord.y, coord.z)
        }

        InvalidWallSize(size: f32) {
            description("invalid wall size")
            display("invalid wall size {}: must be finite and greater than zero", size)
        }

        InvalidDirectionBits(bits: u8) {
            description("no direction for bits")
            display("there is no direction for bits {:#04x}", bits)
        }

        InvalidPassageBits(bits: u8) {
            description("invalid passage mask bits")
            display("passage mask bits {:#04x} use more than the six direction bits", bits)
        }

        MaskedStartCell(coord: Cartesian3DCoordinate) {
            description("start cell is masked")
            display("cannot start carving at masked cell ({}, {}, {})", coord.x, coord.y, coord.z)
        }

        MaskDimensionsMismatch {
            description("mask dimensions do not match the grid dimensions")
            display("mask dimensions do not match the grid dimensions")
        }

        InvalidMaskData(reason: String) {
            description("invalid mask data")
            display("invalid mask data: {}", reason)
        }
    }
}
