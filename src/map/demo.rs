//! Procedural levels for the viewer, the `gen_map` tool and tests.
//!
//! Plane `i` of `n` is `visible + (size - visible) * (i + 1) / n` tiles, so
//! far planes scroll proportionally slower than the hero plane (the last
//! one).  Block 0 is transparent on every plane but the first.

use super::{MapData, MapError, PlaneLayer, TileAtlas};
use crate::renderer::{Rgba, Surface, TILE_PX};

/// Colour treated as transparent by demo levels.
pub const DEMO_COLOR_KEY: Rgba = 0x00FF_00FF;

const SHEET_TILES: usize = 8;

/// Shape of a generated level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DemoLevel {
    /// Hero plane width in tiles.
    pub width: i32,
    /// Hero plane height in tiles.
    pub height: i32,
    pub planes: usize,
    /// Visible window in tiles; background planes never get smaller.
    pub visible_w: i32,
    pub visible_h: i32,
    pub seed: u32,
}

impl Default for DemoLevel {
    fn default() -> Self {
        Self {
            width: 128,
            height: 32,
            planes: 3,
            visible_w: 20,
            visible_h: 14,
            seed: 0x5EED,
        }
    }
}

/// Cheap integer hash; only needs to look random.
fn mix(seed: u32, v: i32) -> u32 {
    let mut h = seed ^ (v as u32).wrapping_mul(0x9E37_79B9);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85EB_CA6B);
    h ^= h >> 13;
    h = h.wrapping_mul(0xC2B2_AE35);
    h ^ (h >> 16)
}

fn shade(color: Rgba, num: u32, den: u32) -> Rgba {
    let ch = |shift: u32| (((color >> shift) & 0xFF) * num / den).min(0xFF) << shift;
    ch(16) | ch(8) | ch(0)
}

/// One row of `SHEET_TILES` blocks: flat colour, darker bottom/right edge
/// and a light dot so movement is visible even on uniform areas.
fn sheet(plane: usize, palette: &[Rgba; SHEET_TILES]) -> Result<TileAtlas, MapError> {
    let mut s = Surface::try_new(SHEET_TILES * TILE_PX, TILE_PX)?;
    for (i, &color) in palette.iter().enumerate() {
        let x0 = i * TILE_PX;
        s.fill_rect(x0, 0, TILE_PX, TILE_PX, color);
        if color == DEMO_COLOR_KEY {
            continue;
        }
        let edge = shade(color, 3, 4);
        s.fill_rect(x0, TILE_PX - 1, TILE_PX, 1, edge);
        s.fill_rect(x0 + TILE_PX - 1, 0, 1, TILE_PX, edge);
        s.fill_rect(x0 + 4, 4, 2, 2, shade(color, 5, 4));
    }
    TileAtlas::new(s).ok_or(MapError::RaggedAtlas(plane))
}

fn palette(plane: usize, planes: usize) -> [Rgba; SHEET_TILES] {
    if plane == 0 && planes > 1 {
        // sky bands, then clouds/stars
        return [
            0x0018_2848, 0x0020_3860, 0x0030_4C78, 0x0048_6890,
            0x00C8_D0E0, 0x00F0_F0C0, 0x0010_1830, 0x0060_80A8,
        ];
    }
    // nearer planes get brighter
    let num = 2 + plane as u32;
    let den = 1 + planes as u32;
    [
        DEMO_COLOR_KEY,
        shade(0x0040_C040, num, den),
        shade(0x0090_6030, num, den),
        shade(0x00A0_4030, num, den),
        shade(0x0080_8080, num, den),
        shade(0x00E0_C040, num, den),
        shade(0x0030_8030, num, den),
        shade(0x0060_4020, num, den),
    ]
}

/// Surface row (top of the ground) of column `x`.  Plateaus of 8 tiles.
fn ground_row(seed: u32, height: i32, x: i32) -> i32 {
    let rise = (mix(seed, x.div_euclid(8)) % 5) as i32;
    (height - 3 - rise).max(1)
}

fn fill_plane(level: &DemoLevel, plane: usize, w: i32, h: i32, stride: usize) -> Vec<u16> {
    let mut blocks = vec![0u16; stride * h as usize];
    let seed = level.seed.wrapping_add(plane as u32 * 7919);
    let hero = plane + 1 == level.planes;

    for y in 0..h {
        for x in 0..w {
            let r = mix(seed, y * w + x);
            let block = if plane == 0 && level.planes > 1 {
                let band = (y * 4 / h.max(1)) as u16;
                if r % 23 == 0 { 4 + (r % 2) as u16 } else { band }
            } else {
                let top = ground_row(seed, h, x);
                match y.cmp(&top) {
                    std::cmp::Ordering::Less => {
                        // floating platforms on the hero plane only
                        let platform = hero
                            && y == top - 4
                            && mix(seed ^ 0xA5A5, x.div_euclid(6)) % 3 == 0;
                        if platform { 3 } else { 0 }
                    }
                    std::cmp::Ordering::Equal => 1,
                    std::cmp::Ordering::Greater if r % 11 == 0 => 4,
                    std::cmp::Ordering::Greater => 2,
                }
            };
            blocks[y as usize * stride + x as usize] = block;
        }
    }
    blocks
}

/// Generate a level; hero plane is the last one.
pub fn demo_map(level: &DemoLevel) -> Result<MapData, MapError> {
    if level.planes == 0 {
        return Err(MapError::NoPlanes);
    }
    let w = level.width.max(level.visible_w);
    let h = level.height.max(level.visible_h);
    let stride = w as usize;
    let n = level.planes as i32;

    let mut planes = Vec::with_capacity(level.planes);
    for i in 0..level.planes {
        let k = i as i32 + 1;
        let pw = level.visible_w + (w - level.visible_w) * k / n;
        let ph = level.visible_h + (h - level.visible_h) * k / n;
        planes.push(PlaneLayer {
            width: pw,
            height: ph,
            atlas: sheet(i, &palette(i, level.planes))?,
            blocks: fill_plane(level, i, pw, ph, stride),
        });
    }
    MapData::new(stride, level.planes - 1, DEMO_COLOR_KEY, planes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MapStore;

    #[test]
    fn planes_grow_towards_the_hero() {
        let map = demo_map(&DemoLevel::default()).unwrap();
        assert_eq!(map.plane_count(), 3);
        assert_eq!(map.hero_plane(), 2);
        assert_eq!(map.plane_extent(2), (128, 32));
        let (w0, h0) = map.plane_extent(0);
        let (w1, h1) = map.plane_extent(1);
        assert!(20 <= w0 && w0 < w1 && w1 < 128);
        assert!(14 <= h0 && h0 <= h1 && h1 <= 32);
    }

    #[test]
    fn hero_plane_has_ground_in_every_column() {
        let map = demo_map(&DemoLevel::default()).unwrap();
        let (w, h) = map.plane_extent(2);
        for x in 0..w {
            assert!((0..h).any(|y| map.block(2, x, y) == Some(1)), "column {x}");
        }
    }

    #[test]
    fn same_seed_same_level() {
        let a = demo_map(&DemoLevel::default()).unwrap();
        let b = demo_map(&DemoLevel::default()).unwrap();
        assert_eq!(a.planes()[2].blocks, b.planes()[2].blocks);
    }

    #[test]
    fn zero_planes_is_an_error() {
        let level = DemoLevel {
            planes: 0,
            ..DemoLevel::default()
        };
        assert_eq!(demo_map(&level).unwrap_err(), MapError::NoPlanes);
    }
}
