//! ---------------------------------------------------------------------------
//! Toroidal tile cache
//!
//! * One per plane, fixed size, reused across levels.
//! * Map tile (x, y) lives at cell (x mod W, y mod H); painting a column or a
//!   row only touches those cells, the plane position is not moved here.
//! ---------------------------------------------------------------------------

use tracing::{trace, warn};

use super::hooks::ScrollHooks;
use crate::{
    config::ScrollConfig,
    map::MapStore,
    renderer::{Surface, SurfaceError, TILE_PX},
};

pub struct ScrollBuffer {
    surface: Surface,
    tiles_w: i32,
    tiles_h: i32,
    /// Tiles painted per column (visible height + 1).
    column_len: i32,
    /// Tiles painted per row (visible width + 1).
    row_len: i32,
}

impl ScrollBuffer {
    /// Allocate a buffer sized by `config`.
    pub fn new(config: &ScrollConfig) -> Result<Self, SurfaceError> {
        Ok(Self {
            surface: Surface::try_new(config.buffer_width, config.buffer_height)?,
            tiles_w: config.buffer_tiles_w(),
            tiles_h: config.buffer_tiles_h(),
            column_len: config.visible_tiles_h() + 1,
            row_len: config.visible_tiles_w() + 1,
        })
    }

    #[inline]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Top-left pixel of the cell holding map tile (`x`, `y`).
    #[inline]
    pub fn cell_origin(&self, tile_x: i32, tile_y: i32) -> (usize, usize) {
        (
            tile_x.rem_euclid(self.tiles_w) as usize * TILE_PX,
            tile_y.rem_euclid(self.tiles_h) as usize * TILE_PX,
        )
    }

    /// Paint column `tile_x` from row `tile_y` down.  Returns the number of
    /// tiles painted; 0 when the column is outside the plane.
    pub fn paint_column<M, H>(
        &mut self,
        map: &M,
        plane: usize,
        tile_x: i32,
        tile_y: i32,
        hooks: &mut H,
    ) -> usize
    where
        M: MapStore + ?Sized,
        H: ScrollHooks + ?Sized,
    {
        let (w, h) = map.plane_extent(plane);
        if tile_x < 0 || tile_x >= w {
            return 0;
        }
        let mut painted = 0;
        for y in (tile_y..tile_y + self.column_len).filter(|&y| y >= 0 && y < h) {
            if self.paint_tile(map, plane, tile_x, y, 0) {
                hooks.on_animated_tile_refresh(plane, tile_x, y);
                painted += 1;
            }
        }
        trace!(plane, tile_x, tile_y, painted, "column");
        painted
    }

    /// Paint row `tile_y` from column `tile_x` rightwards.
    pub fn paint_row<M, H>(
        &mut self,
        map: &M,
        plane: usize,
        tile_x: i32,
        tile_y: i32,
        hooks: &mut H,
    ) -> usize
    where
        M: MapStore + ?Sized,
        H: ScrollHooks + ?Sized,
    {
        let (w, h) = map.plane_extent(plane);
        if tile_y < 0 || tile_y >= h {
            return 0;
        }
        let mut painted = 0;
        for x in (tile_x..tile_x + self.row_len).filter(|&x| x >= 0 && x < w) {
            if self.paint_tile(map, plane, x, tile_y, 0) {
                hooks.on_animated_tile_refresh(plane, x, tile_y);
                painted += 1;
            }
        }
        trace!(plane, tile_x, tile_y, painted, "row");
        painted
    }

    /// Repaint one cell with `block + frame_offset` (animated blocks).
    pub fn refresh_block<M: MapStore + ?Sized>(
        &mut self,
        map: &M,
        plane: usize,
        tile_x: i32,
        tile_y: i32,
        frame_offset: i32,
    ) -> bool {
        self.paint_tile(map, plane, tile_x, tile_y, frame_offset)
    }

    fn paint_tile<M: MapStore + ?Sized>(
        &mut self,
        map: &M,
        plane: usize,
        tile_x: i32,
        tile_y: i32,
        frame_offset: i32,
    ) -> bool {
        let Some(atlas) = map.atlas(plane) else {
            return false;
        };
        let Some(block) = map.block(plane, tile_x, tile_y) else {
            return false;
        };
        let Some((src_x, src_y)) = u16::try_from(block as i32 + frame_offset)
            .ok()
            .and_then(|b| atlas.tile_origin(b))
        else {
            warn!(plane, tile_x, tile_y, block, frame_offset, "block not in atlas");
            return false;
        };

        let (dst_x, dst_y) = self.cell_origin(tile_x, tile_y);
        match self
            .surface
            .blit_tile(dst_x, dst_y, atlas.sheet(), src_x, src_y)
        {
            Ok(()) => true,
            Err(e) => {
                warn!(plane, tile_x, tile_y, "tile paint failed: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        map::{MapData, PlaneLayer, TileAtlas},
        renderer::Rgba,
        scroll::hooks::{NoHooks, recording::Recorder},
    };

    /// Atlas whose block `n` is filled with colour `n + 1`.
    pub(crate) fn numbered_atlas(tiles: usize) -> TileAtlas {
        let mut sheet = Surface::try_new(tiles * TILE_PX, TILE_PX).unwrap();
        for n in 0..tiles {
            sheet.fill_rect(n * TILE_PX, 0, TILE_PX, TILE_PX, n as Rgba + 1);
        }
        TileAtlas::new(sheet).unwrap()
    }

    /// Single-plane map where block (x, y) = (x + 3y) mod 16.
    pub(crate) fn pattern_map(w: i32, h: i32) -> MapData {
        let blocks = (0..h)
            .flat_map(|y| (0..w).map(move |x| ((x + 3 * y) % 16) as u16))
            .collect();
        let layer = PlaneLayer {
            width: w,
            height: h,
            atlas: numbered_atlas(16),
            blocks,
        };
        MapData::new(w as usize, 0, 0, vec![layer]).unwrap()
    }

    /// Colour of the cell holding tile (x, y), if the cell is uniform.
    pub(crate) fn cell_color(buf: &ScrollBuffer, x: i32, y: i32) -> Option<Rgba> {
        let (ox, oy) = buf.cell_origin(x, y);
        let c = buf.surface().pixel(ox, oy)?;
        (0..TILE_PX)
            .flat_map(|dy| (0..TILE_PX).map(move |dx| (dx, dy)))
            .all(|(dx, dy)| buf.surface().pixel(ox + dx, oy + dy) == Some(c))
            .then_some(c)
    }

    #[test]
    fn column_lands_at_wrapped_address() {
        let map = pattern_map(64, 20);
        let mut buf = ScrollBuffer::new(&ScrollConfig::default()).unwrap();
        let painted = buf.paint_column(&map, 0, 40, 2, &mut NoHooks);
        assert_eq!(painted, 15);

        for y in 2..17 {
            let block = map.planes()[0].blocks[(y * 64 + 40) as usize];
            assert_eq!(cell_color(&buf, 40, y), Some(block as Rgba + 1), "row {y}");
        }
        // tile 40 shares the cell of tile 8, row 17 wraps onto row 1
        assert_eq!(buf.cell_origin(40, 17), buf.cell_origin(8, 1));
    }

    #[test]
    fn row_is_clipped_to_plane() {
        let map = pattern_map(24, 16);
        let mut buf = ScrollBuffer::new(&ScrollConfig::default()).unwrap();
        let mut rec = Recorder::default();
        let painted = buf.paint_row(&map, 0, 10, 5, &mut rec);

        assert_eq!(painted, 14, "columns 10..24 only");
        assert_eq!(rec.tiles.len(), 14);
        assert_eq!(rec.tiles.first(), Some(&(0, 10, 5)));
        assert_eq!(rec.tiles.last(), Some(&(0, 23, 5)));
    }

    #[test]
    fn outside_strips_are_no_ops() {
        let map = pattern_map(24, 16);
        let mut buf = ScrollBuffer::new(&ScrollConfig::default()).unwrap();
        let mut rec = Recorder::default();
        assert_eq!(buf.paint_column(&map, 0, 24, 0, &mut rec), 0);
        assert_eq!(buf.paint_column(&map, 0, -1, 0, &mut rec), 0);
        assert_eq!(buf.paint_row(&map, 0, 0, 16, &mut rec), 0);
        assert_eq!(buf.paint_row(&map, 3, 0, 0, &mut rec), 0);
        assert!(rec.tiles.is_empty());
        assert!(buf.surface().as_slice().iter().all(|&p| p == 0));
    }

    #[test]
    fn negative_start_skips_missing_rows() {
        let map = pattern_map(24, 16);
        let mut buf = ScrollBuffer::new(&ScrollConfig::default()).unwrap();
        assert_eq!(buf.paint_column(&map, 0, 3, -4, &mut NoHooks), 11);
    }

    #[test]
    fn repaint_is_idempotent() {
        let map = pattern_map(48, 20);
        let mut buf = ScrollBuffer::new(&ScrollConfig::default()).unwrap();
        buf.paint_column(&map, 0, 33, 0, &mut NoHooks);
        buf.paint_row(&map, 0, 20, 4, &mut NoHooks);
        let first = buf.surface().clone();

        buf.paint_row(&map, 0, 20, 4, &mut NoHooks);
        buf.paint_column(&map, 0, 33, 0, &mut NoHooks);
        assert_eq!(buf.surface(), &first);
    }

    #[test]
    fn refresh_block_uses_frame_offset() {
        let map = pattern_map(8, 8);
        let mut buf = ScrollBuffer::new(&ScrollConfig::default()).unwrap();
        // tile (1, 0) is block 1; +2 selects block 3 (colour 4)
        assert!(buf.refresh_block(&map, 0, 1, 0, 2));
        assert_eq!(cell_color(&buf, 1, 0), Some(4));
        assert!(!buf.refresh_block(&map, 0, 1, 0, 100), "past the atlas");
        assert!(!buf.refresh_block(&map, 0, 1, 0, -5), "negative block");
    }
}
