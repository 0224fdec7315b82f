//! Bit layout of a packed cell value.
//!
//! ```text
//!  31  30  29  28 ........................ 0
//!  H   V   D   tile code (29 bits)
//! ```
//!
//! The codec only splits and joins these bits. How a flag combination maps to
//! a rotation or mirror on screen is left to the renderer.

use bitflags::bitflags;

/// Low 29 bits of a cell: the tile code (a GID, 0 meaning "no tile").
pub const TILE_CODE_MASK: u32 = 0x1FFF_FFFF;

/// Bit 31 of a raw cell.
pub const FLIPPED_HORIZONTALLY_FLAG: u32 = 0x8000_0000;
/// Bit 30 of a raw cell.
pub const FLIPPED_VERTICALLY_FLAG: u32 = 0x4000_0000;
/// Bit 29 of a raw cell.
pub const FLIPPED_DIAGONALLY_FLAG: u32 = 0x2000_0000;

const TRANSFORM_SHIFT: u32 = 29;

bitflags! {
    /// The 3-bit transform carried in the high bits of a cell, shifted down to `0..8`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TileTransform: u32 {
        const DIAGONAL = 0b001;
        const VERTICAL = 0b010;
        const HORIZONTAL = 0b100;

        const ROTATE_90 = Self::DIAGONAL.bits() | Self::HORIZONTAL.bits();
        const ROTATE_180 = Self::HORIZONTAL.bits() | Self::VERTICAL.bits();
        const ROTATE_270 = Self::VERTICAL.bits() | Self::DIAGONAL.bits();
        const VFLIP_ROTATE_90 = Self::HORIZONTAL.bits() | Self::VERTICAL.bits() | Self::DIAGONAL.bits();
        const HFLIP_ROTATE_270 = Self::VFLIP_ROTATE_90.bits();
    }
}

/// Tile code of a raw cell value.
pub fn get_code(raw: u32) -> u32 {
    raw & TILE_CODE_MASK
}

/// Transform flags of a raw cell value.
pub fn get_transform(raw: u32) -> TileTransform {
    TileTransform::from_bits_truncate(raw >> TRANSFORM_SHIFT)
}

/// A decoded cell: tile code plus transform flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    pub code: u32,
    pub transform: TileTransform,
}

impl Cell {
    pub fn new(code: u32, transform: TileTransform) -> Self {
        Self {
            code: code & TILE_CODE_MASK,
            transform,
        }
    }

    pub fn from_raw(raw: u32) -> Self {
        Self {
            code: get_code(raw),
            transform: get_transform(raw),
        }
    }

    /// Pack back into the on-wire `u32` representation.
    pub fn pack(self) -> u32 {
        (self.code & TILE_CODE_MASK) | (self.transform.bits() << TRANSFORM_SHIFT)
    }

    pub fn is_empty(self) -> bool {
        self.code == 0
    }

    pub fn flipped_h(self) -> bool {
        self.transform.contains(TileTransform::HORIZONTAL)
    }

    pub fn flipped_v(self) -> bool {
        self.transform.contains(TileTransform::VERTICAL)
    }

    pub fn flipped_d(self) -> bool {
        self.transform.contains(TileTransform::DIAGONAL)
    }
}

impl From<u32> for Cell {
    fn from(raw: u32) -> Self {
        Cell::from_raw(raw)
    }
}
