// Read-only tile store the scroll engine paints from.
// The engine only talks to `MapStore`; `MapData` is the in-memory
// implementation used by the loader, the tools and the tests.

use super::TileAtlas;
use crate::renderer::{Rgba, SurfaceError};

/// Everything the scroll engine needs to know about a level's planes.
pub trait MapStore {
    /// Number of planes in the level (back to front).
    fn plane_count(&self) -> usize;

    /// Index of the plane the camera follows.
    fn hero_plane(&self) -> usize;

    /// `(width, height)` of `plane` in tiles; `(0, 0)` for unknown planes.
    fn plane_extent(&self, plane: usize) -> (i32, i32);

    /// Block number at tile (`x`, `y`), `None` outside the plane.
    fn block(&self, plane: usize, x: i32, y: i32) -> Option<u16>;

    /// Graphics of `plane`.
    fn atlas(&self, plane: usize) -> Option<&TileAtlas>;

    /// Pixels of this colour are transparent on every plane but the first.
    fn color_key(&self) -> Rgba;
}

/// One plane: its extent, graphics and block grid.
///
/// The grid shares the level's row stride, so a plane narrower than the
/// level only uses the left part of each row.
#[derive(Clone, Debug)]
pub struct PlaneLayer {
    pub width: i32,
    pub height: i32,
    pub atlas: TileAtlas,
    pub blocks: Vec<u16>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MapError {
    #[error("level has no planes")]
    NoPlanes,

    #[error("plane {0}: atlas is not made of whole 16x16 tiles")]
    RaggedAtlas(usize),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error("hero plane {0} out of range")]
    BadHeroPlane(usize),

    #[error("plane {plane} is {width} tiles wide but the row stride is {stride}")]
    WiderThanStride { plane: usize, width: i32, stride: usize },

    #[error("plane {plane}: grid holds {len} blocks, {needed} needed")]
    ShortGrid {
        plane: usize,
        len: usize,
        needed: usize,
    },

    #[error("plane {plane}: block {block} at ({x},{y}) is not in the atlas")]
    BlockOutOfAtlas {
        plane: usize,
        block: u16,
        x: i32,
        y: i32,
    },
}

/// In-memory level.
#[derive(Clone, Debug)]
pub struct MapData {
    stride: usize,
    hero: usize,
    color_key: Rgba,
    planes: Vec<PlaneLayer>,
}

impl MapData {
    /// Validate and build a level.  Every block of every plane must exist in
    /// that plane's atlas.
    pub fn new(
        stride: usize,
        hero: usize,
        color_key: Rgba,
        planes: Vec<PlaneLayer>,
    ) -> Result<Self, MapError> {
        if planes.is_empty() {
            return Err(MapError::NoPlanes);
        }
        if hero >= planes.len() {
            return Err(MapError::BadHeroPlane(hero));
        }
        for (i, p) in planes.iter().enumerate() {
            if p.width < 0 || p.height < 0 || p.width as usize > stride {
                return Err(MapError::WiderThanStride {
                    plane: i,
                    width: p.width,
                    stride,
                });
            }
            let needed = stride * p.height as usize;
            if p.blocks.len() < needed {
                return Err(MapError::ShortGrid {
                    plane: i,
                    len: p.blocks.len(),
                    needed,
                });
            }
            let tiles = p.atlas.len();
            for y in 0..p.height {
                for x in 0..p.width {
                    let block = p.blocks[y as usize * stride + x as usize];
                    if block as usize >= tiles {
                        return Err(MapError::BlockOutOfAtlas {
                            plane: i,
                            block,
                            x,
                            y,
                        });
                    }
                }
            }
        }
        Ok(Self {
            stride,
            hero,
            color_key,
            planes,
        })
    }

    /// Row stride of every block grid, in tiles.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn planes(&self) -> &[PlaneLayer] {
        &self.planes
    }
}

impl MapStore for MapData {
    fn plane_count(&self) -> usize {
        self.planes.len()
    }

    fn hero_plane(&self) -> usize {
        self.hero
    }

    fn plane_extent(&self, plane: usize) -> (i32, i32) {
        self.planes
            .get(plane)
            .map_or((0, 0), |p| (p.width, p.height))
    }

    fn block(&self, plane: usize, x: i32, y: i32) -> Option<u16> {
        let p = self.planes.get(plane)?;
        if x < 0 || y < 0 || x >= p.width || y >= p.height {
            return None;
        }
        p.blocks
            .get(y as usize * self.stride + x as usize)
            .copied()
    }

    fn atlas(&self, plane: usize) -> Option<&TileAtlas> {
        self.planes.get(plane).map(|p| &p.atlas)
    }

    fn color_key(&self) -> Rgba {
        self.color_key
    }
}
