// Typed pixel storage.  Every copy in the crate (tile paints into the scroll
// buffers, buffer -> screen presentation) goes through the two primitives
// below, so no code outside this file indexes pixels by hand.

use super::{Rect, Rgba};

/// Edge length of one map block in pixels.
pub const TILE_PX: usize = 16;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SurfaceError {
    /// The allocator refused the pixel storage.
    #[error("cannot allocate {width}x{height} surface")]
    Alloc { width: usize, height: usize },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BlitError {
    /// Source or destination rectangle leaves its surface.
    #[error("blit {rect:?} -> ({dst_x},{dst_y}) out of bounds")]
    OutOfBounds { rect: Rect, dst_x: i32, dst_y: i32 },
}

/// Row-major pixel surface; the stride is always `width`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Surface {
    pixels: Vec<Rgba>,
    width: usize,
    height: usize,
}

impl Surface {
    /// Allocate a black surface, reporting allocator failure instead of
    /// aborting.
    pub fn try_new(width: usize, height: usize) -> Result<Self, SurfaceError> {
        let len = width
            .checked_mul(height)
            .ok_or(SurfaceError::Alloc { width, height })?;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| SurfaceError::Alloc { width, height })?;
        pixels.resize(len, 0);
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Wrap existing pixels.  `None` if the length does not match.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Rgba>) -> Option<Self> {
        (pixels.len() == width * height).then_some(Self {
            pixels,
            width,
            height,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn as_slice(&self) -> &[Rgba] {
        &self.pixels
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgba) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    pub fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    /// Fill a rectangle, clipped to the surface.
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: Rgba) {
        let x_end = (x + w).min(self.width);
        let y_end = (y + h).min(self.height);
        if x >= x_end {
            return;
        }
        for row in y..y_end {
            let start = row * self.width;
            self.pixels[start + x..start + x_end].fill(color);
        }
    }

    /// `true` if `rect` lies fully inside this surface.
    fn contains(&self, rect: Rect) -> bool {
        rect.x >= 0
            && rect.y >= 0
            && rect.w >= 0
            && rect.h >= 0
            && (rect.x + rect.w) as usize <= self.width
            && (rect.y + rect.h) as usize <= self.height
    }

    /// Copy one `TILE_PX` x `TILE_PX` block from `src` at (`src_x`,`src_y`)
    /// to (`dst_x`,`dst_y`).  Opaque copy, one slice copy per row.
    pub fn blit_tile(
        &mut self,
        dst_x: usize,
        dst_y: usize,
        src: &Surface,
        src_x: usize,
        src_y: usize,
    ) -> Result<(), BlitError> {
        let side = TILE_PX as i32;
        let rect = Rect::new(src_x as i32, src_y as i32, side, side);
        let dst = Rect::new(dst_x as i32, dst_y as i32, side, side);
        if !src.contains(rect) || !self.contains(dst) {
            return Err(BlitError::OutOfBounds {
                rect,
                dst_x: dst.x,
                dst_y: dst.y,
            });
        }

        for row in 0..TILE_PX {
            let s = (src_y + row) * src.width + src_x;
            let d = (dst_y + row) * self.width + dst_x;
            self.pixels[d..d + TILE_PX].copy_from_slice(&src.pixels[s..s + TILE_PX]);
        }
        Ok(())
    }

    /// Copy `rect` of `src` to (`dst_x`,`dst_y`).
    ///
    /// With a `color_key`, source pixels equal to it are skipped so the
    /// destination shows through.  Nothing is written when either rectangle
    /// leaves its surface.
    pub fn blit_rect(
        &mut self,
        src: &Surface,
        rect: Rect,
        dst_x: i32,
        dst_y: i32,
        color_key: Option<Rgba>,
    ) -> Result<(), BlitError> {
        let dst = Rect::new(dst_x, dst_y, rect.w, rect.h);
        if !src.contains(rect) || !self.contains(dst) {
            return Err(BlitError::OutOfBounds { rect, dst_x, dst_y });
        }

        let w = rect.w as usize;
        for row in 0..rect.h as usize {
            let s = (rect.y as usize + row) * src.width + rect.x as usize;
            let d = (dst_y as usize + row) * self.width + dst_x as usize;
            let src_row = &src.pixels[s..s + w];
            let dst_row = &mut self.pixels[d..d + w];
            match color_key {
                None => dst_row.copy_from_slice(src_row),
                Some(key) => {
                    for (out, &px) in dst_row.iter_mut().zip(src_row) {
                        if px != key {
                            *out = px;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(w: usize, h: usize) -> Surface {
        let pixels = (0..w * h).map(|i| i as Rgba).collect();
        Surface::from_pixels(w, h, pixels).unwrap()
    }

    #[test]
    fn blit_tile_copies_block() {
        let src = gradient(32, 32);
        let mut dst = Surface::try_new(48, 48).unwrap();
        dst.blit_tile(16, 32, &src, 16, 0).unwrap();

        for y in 0..TILE_PX {
            for x in 0..TILE_PX {
                assert_eq!(dst.pixel(16 + x, 32 + y), src.pixel(16 + x, y));
            }
        }
        assert_eq!(dst.pixel(0, 0), Some(0));
    }

    #[test]
    fn blit_tile_rejects_partial_block() {
        let src = gradient(32, 32);
        let mut dst = Surface::try_new(32, 32).unwrap();
        let err = dst.blit_tile(24, 0, &src, 0, 0).unwrap_err();
        assert!(matches!(err, BlitError::OutOfBounds { .. }));
        assert!(dst.as_slice().iter().all(|&p| p == 0));
    }

    #[test]
    fn color_key_lets_destination_show_through() {
        let key = 0x00FF_00FF;
        let src = Surface::from_pixels(2, 1, vec![key, 0x0012_3456]).unwrap();
        let mut dst = Surface::try_new(2, 1).unwrap();
        dst.fill(0x0000_00AA);

        dst.blit_rect(&src, Rect::new(0, 0, 2, 1), 0, 0, Some(key))
            .unwrap();
        assert_eq!(dst.as_slice(), &[0x0000_00AA, 0x0012_3456]);

        dst.blit_rect(&src, Rect::new(0, 0, 2, 1), 0, 0, None).unwrap();
        assert_eq!(dst.as_slice(), &[key, 0x0012_3456]);
    }

    #[test]
    fn fill_rect_is_clipped() {
        let mut s = Surface::try_new(4, 4).unwrap();
        s.fill_rect(2, 2, 10, 10, 7);
        assert_eq!(s.as_slice().iter().filter(|&&p| p == 7).count(), 4);
    }
}
