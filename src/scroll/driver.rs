//! Incremental buffer update.
//!
//! Compares every plane's current tile offset with its new one and paints
//! exactly the columns, then rows, that entered the window.  Multi-tile
//! jumps are walked one tile at a time so a jump paints the same cells as
//! the equivalent sequence of single steps.

use super::{
    buffer::ScrollBuffer,
    fixed::Position,
    hooks::{Direction, ScrollHooks},
};
use crate::{config::ScrollConfig, map::MapStore, renderer::SurfaceError};

/// Engine-side state of one plane.
pub struct Plane {
    pub(crate) buffer: ScrollBuffer,
    /// Position the buffer contents currently match.
    pub position: Position,
    /// Position computed for this frame, applied by [`apply_scroll`].
    pub new_position: Position,
}

impl Plane {
    pub fn new(cfg: &ScrollConfig) -> Result<Self, SurfaceError> {
        Ok(Self {
            buffer: ScrollBuffer::new(cfg)?,
            position: Position::default(),
            new_position: Position::default(),
        })
    }

    #[inline]
    pub fn buffer(&self) -> &ScrollBuffer {
        &self.buffer
    }
}

/// Bring every active plane from `position` to `new_position`.
pub fn apply_scroll<M, H>(map: &M, planes: &mut [Plane], cfg: &ScrollConfig, hooks: &mut H)
where
    M: MapStore + ?Sized,
    H: ScrollHooks + ?Sized,
{
    let hero = map.hero_plane();
    for (i, plane) in planes.iter_mut().enumerate().take(map.plane_count()) {
        scroll_horizontal(map, i, i == hero, plane, cfg, hooks);
        scroll_vertical(map, i, i == hero, plane, cfg, hooks);
    }
}

fn scroll_horizontal<M, H>(
    map: &M,
    index: usize,
    is_hero: bool,
    plane: &mut Plane,
    cfg: &ScrollConfig,
    hooks: &mut H,
) where
    M: MapStore + ?Sized,
    H: ScrollHooks + ?Sized,
{
    let vis_w = cfg.visible_tiles_w();
    let clip = cfg.clip_margin;
    let row = plane.position.y.tile();
    let mut old = plane.position.x.tile();
    let new = plane.new_position.x.tile();

    while old < new {
        old += 1;
        let col = old + vis_w;
        plane.buffer.paint_column(map, index, col, row, hooks);
        if is_hero {
            hooks.on_column_revealed(col + clip, row - clip, Direction::Positive);
        }
    }
    while old > new {
        old -= 1;
        plane.buffer.paint_column(map, index, old, row, hooks);
        if is_hero {
            hooks.on_column_revealed(old - clip, row - clip, Direction::Negative);
        }
    }
    plane.position.x = plane.new_position.x;
}

fn scroll_vertical<M, H>(
    map: &M,
    index: usize,
    is_hero: bool,
    plane: &mut Plane,
    cfg: &ScrollConfig,
    hooks: &mut H,
) where
    M: MapStore + ?Sized,
    H: ScrollHooks + ?Sized,
{
    let vis_h = cfg.visible_tiles_h();
    let clip = cfg.clip_margin;
    // the horizontal pass already moved X
    let col = plane.position.x.tile();
    let mut old = plane.position.y.tile();
    let new = plane.new_position.y.tile();

    while old < new {
        old += 1;
        let row = old + vis_h;
        plane.buffer.paint_row(map, index, col, row, hooks);
        if is_hero {
            hooks.on_row_revealed(row + clip, col - clip, Direction::Positive);
        }
    }
    while old > new {
        old -= 1;
        plane.buffer.paint_row(map, index, col, old, hooks);
        if is_hero {
            hooks.on_row_revealed(old - clip, col - clip, Direction::Negative);
        }
    }
    plane.position.y = plane.new_position.y;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        map::{DemoLevel, MapData, demo_map},
        scroll::{
            buffer::tests::pattern_map,
            fixed::Fixed,
            hooks::{NoHooks, recording::Recorder},
        },
    };

    fn plane_at(map: &MapData, x: i32, y: i32) -> Plane {
        let cfg = ScrollConfig::default();
        let mut p = Plane::new(&cfg).unwrap();
        p.position = Position::from_tiles(x, y);
        p.new_position = p.position;
        for i in 0..=cfg.visible_tiles_w() {
            p.buffer.paint_column(map, 0, x + i, y, &mut NoHooks);
        }
        p
    }

    fn step_to(map: &MapData, plane: &mut Plane, to: Position) {
        plane.new_position = to;
        apply_scroll(map, std::slice::from_mut(plane), &ScrollConfig::default(), &mut NoHooks);
    }

    #[test]
    fn single_steps_match_one_jump() {
        let map = pattern_map(96, 48);
        for (from, to) in [((3, 4), (16, 4)), ((40, 4), (27, 4)), ((5, 2), (5, 9)), ((5, 30), (5, 21))] {
            let mut stepped = plane_at(&map, from.0, from.1);
            let mut jumped = plane_at(&map, from.0, from.1);

            let (dx, dy) = ((to.0 - from.0).signum(), (to.1 - from.1).signum());
            let mut cur = from;
            while cur != to {
                cur = (cur.0 + dx, cur.1 + dy);
                step_to(&map, &mut stepped, Position::from_tiles(cur.0, cur.1));
            }
            step_to(&map, &mut jumped, Position::from_tiles(to.0, to.1));

            assert_eq!(stepped.position, jumped.position);
            assert!(
                stepped.buffer().surface() == jumped.buffer().surface(),
                "{from:?} -> {to:?}"
            );
        }
    }

    #[test]
    fn sub_tile_moves_paint_nothing() {
        let map = pattern_map(64, 32);
        let mut plane = plane_at(&map, 4, 4);
        let mut rec = Recorder::default();
        plane.new_position.x += Fixed::from_raw(0xF00);
        plane.new_position.y += Fixed::from_raw(0x0FF);
        apply_scroll(&map, std::slice::from_mut(&mut plane), &ScrollConfig::default(), &mut rec);

        assert!(rec.tiles.is_empty() && rec.columns.is_empty() && rec.rows.is_empty());
        assert_eq!(plane.position, plane.new_position);
    }

    #[test]
    fn only_the_hero_plane_reveals_entities() {
        let map = demo_map(&DemoLevel::default()).unwrap();
        let cfg = ScrollConfig::default();
        let mut planes: Vec<Plane> = (0..3).map(|_| Plane::new(&cfg).unwrap()).collect();
        for p in &mut planes {
            p.position = Position::from_tiles(10, 5);
            p.new_position = Position::from_tiles(13, 3);
        }
        let mut rec = Recorder::default();
        apply_scroll(&map, &mut planes, &cfg, &mut rec);

        use Direction::*;
        assert_eq!(rec.columns, vec![(33, 3, Positive), (34, 3, Positive), (35, 3, Positive)]);
        // rows 4 and 3 enter at the top, after X moved to 13
        assert_eq!(rec.rows, vec![(2, 11, Negative), (1, 11, Negative)]);
        // every plane painted: 3 columns of 15 and 2 rows of 21
        let per_plane = |n| rec.tiles.iter().filter(|t| t.0 == n).count();
        assert_eq!(per_plane(2), 3 * 15 + 2 * 21);
        assert!(per_plane(0) > 0 && per_plane(1) > 0);
    }
}
