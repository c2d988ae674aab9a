use crate::renderer::{Surface, TILE_PX};

/// Graphics for one plane: a sheet of `TILE_PX`-square blocks numbered
/// left-to-right, top-to-bottom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileAtlas {
    sheet: Surface,
}

impl TileAtlas {
    /// `None` unless both sheet dimensions are whole, non-zero tiles.
    pub fn new(sheet: Surface) -> Option<Self> {
        let aligned = |v: usize| v > 0 && v % TILE_PX == 0;
        (aligned(sheet.width()) && aligned(sheet.height())).then_some(Self { sheet })
    }

    #[inline]
    pub fn sheet(&self) -> &Surface {
        &self.sheet
    }

    #[inline]
    pub fn tiles_per_row(&self) -> usize {
        self.sheet.width() / TILE_PX
    }

    /// Number of blocks in the sheet.
    #[inline]
    pub fn len(&self) -> usize {
        self.tiles_per_row() * (self.sheet.height() / TILE_PX)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Top-left pixel of `block` in the sheet, `None` past the last block.
    pub fn tile_origin(&self, block: u16) -> Option<(usize, usize)> {
        let block = block as usize;
        if block >= self.len() {
            return None;
        }
        let per_row = self.tiles_per_row();
        Some(((block % per_row) * TILE_PX, (block / per_row) * TILE_PX))
    }
}
