//! Presenting a toroidal buffer on a linear screen.
//!
//! The window starts at the plane's pixel position modulo the buffer size.
//! When it runs past the right and/or bottom seam it is split into 2 or 4
//! rectangles, each copied to the matching corner of the screen.

use smallvec::SmallVec;
use tracing::warn;

use super::fixed::Position;
use crate::renderer::{Rect, Rgba, Surface};

/// One buffer rectangle and where it lands on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlitRegion {
    pub src: Rect,
    pub dst_x: i32,
    pub dst_y: i32,
}

pub type BlitRegions = SmallVec<[BlitRegion; 4]>;

/// Split the `screen`-sized window at `pos` into buffer rectangles.
pub fn blit_regions(pos: Position, screen: (i32, i32), buffer: (i32, i32)) -> BlitRegions {
    let (sw, sh) = screen;
    let (bw, bh) = buffer;
    let x1 = pos.x.wrapped_pixel(bw);
    let y1 = pos.y.wrapped_pixel(bh);
    let x2 = x1 + sw - 1;
    let y2 = y1 + sh - 1;

    // widths/heights left and right of the seams
    let (left_w, right_w) = if x2 >= bw { (bw - x1, x2 - bw + 1) } else { (sw, 0) };
    let (top_h, bottom_h) = if y2 >= bh { (bh - y1, y2 - bh + 1) } else { (sh, 0) };

    let mut out = BlitRegions::new();
    out.push(BlitRegion {
        src: Rect::new(x1, y1, left_w, top_h),
        dst_x: 0,
        dst_y: 0,
    });
    if right_w > 0 {
        out.push(BlitRegion {
            src: Rect::new(0, y1, right_w, top_h),
            dst_x: left_w,
            dst_y: 0,
        });
    }
    if bottom_h > 0 {
        out.push(BlitRegion {
            src: Rect::new(x1, 0, left_w, bottom_h),
            dst_x: 0,
            dst_y: top_h,
        });
        if right_w > 0 {
            out.push(BlitRegion {
                src: Rect::new(0, 0, right_w, bottom_h),
                dst_x: left_w,
                dst_y: top_h,
            });
        }
    }
    out
}

/// Copy the window of `buffer` at `pos` onto `target`.
///
/// A rectangle that cannot be copied is logged and skipped; the others are
/// still drawn.  Returns the number of rectangles drawn.
pub fn present(
    buffer: &Surface,
    pos: Position,
    screen: (i32, i32),
    target: &mut Surface,
    color_key: Option<Rgba>,
) -> usize {
    let dims = (buffer.width() as i32, buffer.height() as i32);
    let mut drawn = 0;
    for r in blit_regions(pos, screen, dims) {
        match target.blit_rect(buffer, r.src, r.dst_x, r.dst_y, color_key) {
            Ok(()) => drawn += 1,
            Err(e) => warn!("plane blit failed: {e}"),
        }
    }
    drawn
}
