use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Fixed-point units in one 16 px tile.
pub const TILE_UNITS: i32 = 1 << TILE_SHIFT;
/// Fixed-point units in one pixel.
pub const PIXEL_UNITS: i32 = 1 << PIXEL_SHIFT;

const TILE_SHIFT: u32 = 12;
const PIXEL_SHIFT: u32 = 8;

/// Signed fixed-point coordinate used for cameras and plane positions.
///
/// * `raw >> 12` is the tile index, `raw >> 8` the pixel.
/// * Shifts are arithmetic, so negative positions floor towards −∞.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed(i32);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);

    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn from_tiles(tiles: i32) -> Self {
        Self(tiles * TILE_UNITS)
    }

    #[inline]
    pub const fn from_pixels(pixels: i32) -> Self {
        Self(pixels * PIXEL_UNITS)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Tile index containing this position.
    #[inline]
    pub const fn tile(self) -> i32 {
        self.0 >> TILE_SHIFT
    }

    /// Whole pixel containing this position.
    #[inline]
    pub const fn pixel(self) -> i32 {
        self.0 >> PIXEL_SHIFT
    }

    /// Pixel offset inside a toroidal buffer `dim_px` pixels long.
    #[inline]
    pub const fn wrapped_pixel(self, dim_px: i32) -> i32 {
        self.pixel().rem_euclid(dim_px)
    }

    /// Drop the sub-pixel bits, keeping whole-pixel positions only.
    #[inline]
    pub const fn mask_subpixel(self) -> Self {
        Self(self.0 & !(PIXEL_UNITS - 1))
    }

    /// Keep only the sub-pixel bits.
    #[inline]
    pub const fn subpixel(self) -> Self {
        Self(self.0 & (PIXEL_UNITS - 1))
    }
}

impl Add for Fixed {
    type Output = Fixed;
    #[inline]
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0 + rhs.0)
    }
}

impl Sub for Fixed {
    type Output = Fixed;
    #[inline]
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0 - rhs.0)
    }
}

impl Neg for Fixed {
    type Output = Fixed;
    #[inline]
    fn neg(self) -> Fixed {
        Fixed(-self.0)
    }
}

impl AddAssign for Fixed {
    #[inline]
    fn add_assign(&mut self, rhs: Fixed) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Fixed {
    #[inline]
    fn sub_assign(&mut self, rhs: Fixed) {
        self.0 -= rhs.0;
    }
}

/// A point in fixed-point space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Position {
    pub x: Fixed,
    pub y: Fixed,
}

impl Position {
    #[inline]
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }

    /// Top-left corner of tile (`x`, `y`).
    #[inline]
    pub const fn from_tiles(x: i32, y: i32) -> Self {
        Self::new(Fixed::from_tiles(x), Fixed::from_tiles(y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_and_pixel_floor_for_negatives() {
        let p = Fixed::from_raw(-1);
        assert_eq!(p.tile(), -1);
        assert_eq!(p.pixel(), -1);
        assert_eq!(Fixed::from_raw(4095).tile(), 0);
        assert_eq!(Fixed::from_raw(4096).tile(), 1);
        assert_eq!(Fixed::from_tiles(3).pixel(), 48);
    }

    #[test]
    fn wrapped_pixel_stays_in_buffer() {
        assert_eq!(Fixed::from_pixels(515).wrapped_pixel(512), 3);
        assert_eq!(Fixed::from_pixels(-1).wrapped_pixel(512), 511);
    }

    #[test]
    fn subpixel_split() {
        let p = Fixed::from_raw(0x12_34);
        assert_eq!(p.mask_subpixel().raw(), 0x12_00);
        assert_eq!(p.subpixel().raw(), 0x34);
        assert_eq!(Fixed::from_raw(-0x101).mask_subpixel().raw(), -0x200);
    }
}
