//! Per-level replacements for the default camera + parallax step.
//!
//! A level either follows the player ([`ScrollOverride::Default`]) or runs
//! one of the special behaviours below.  Each variant carries the scratch
//! value it needs; the value is reset from [`OverrideKind::initial`] when a
//! level starts.

use tracing::debug;

use super::{
    camera::{PlayerState, ScrollState, advance_position},
    driver::Plane,
    fixed::{Fixed, Position},
    parallax::compute_plane_positions,
};
use crate::{config::ScrollConfig, map::MapStore};

/// Number of levels in the override table.
pub const LEVEL_COUNT: usize = 18;

/// Per-frame drift of the two backmost planes on the auto-scrolling
/// horizontal level.
const DRIFT_X: [Fixed; 2] = [Fixed::from_raw(0x100), Fixed::from_raw(0x140)];
const HORIZONTAL_SPEED: Fixed = Fixed::from_raw(0x40);

const RISE_Y: Fixed = Fixed::from_raw(0x100);
const RISE_LOOP: Fixed = Fixed::from_tiles(16);
const VERTICAL_SPEED: Fixed = Fixed::from_raw(-0x40);

const BACKDROP_SPEED: Fixed = Fixed::from_raw(0x200);
/// Backdrop tile at which the looping backdrop jumps back.
const BACKDROP_LOOP_TILE: i32 = 208;
const BACKDROP_LOOP_SPAN: Fixed = Fixed::from_tiles(160);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverrideKind {
    Default,
    /// Background layers drift on their own, the hero plane is pushed
    /// right at a constant speed.
    HorizontalAutoScroll,
    /// The back plane rises forever, the hero plane is pushed upwards.
    VerticalAutoScroll,
    /// Player-driven hero plane over a backdrop that keeps moving and
    /// loops.
    LoopingBackdrop,
}

use OverrideKind as K;

static LEVEL_OVERRIDES: [OverrideKind; LEVEL_COUNT] = [
    K::Default,
    K::Default,
    K::HorizontalAutoScroll,
    K::Default,
    K::Default,
    K::Default,
    K::Default,
    K::Default,
    K::LoopingBackdrop,
    K::Default,
    K::Default,
    K::VerticalAutoScroll,
    K::Default,
    K::Default,
    K::Default,
    K::Default,
    K::Default,
    K::Default,
];

impl OverrideKind {
    /// Table lookup; unknown levels scroll normally.
    pub fn for_level(level: usize) -> Self {
        LEVEL_OVERRIDES.get(level).copied().unwrap_or(K::Default)
    }

    /// The override with its level-start scratch value.
    pub fn initial(self) -> ScrollOverride {
        match self {
            K::Default => ScrollOverride::Default,
            K::HorizontalAutoScroll => ScrollOverride::HorizontalAutoScroll {
                speed: HORIZONTAL_SPEED,
            },
            K::VerticalAutoScroll => ScrollOverride::VerticalAutoScroll {
                speed: VERTICAL_SPEED,
            },
            K::LoopingBackdrop => ScrollOverride::LoopingBackdrop {
                backdrop_x: Fixed::ZERO,
            },
        }
    }
}

/// Active override plus its scratch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollOverride {
    #[default]
    Default,
    HorizontalAutoScroll { speed: Fixed },
    VerticalAutoScroll { speed: Fixed },
    LoopingBackdrop { backdrop_x: Fixed },
}

impl ScrollOverride {
    pub fn for_level(level: usize) -> Self {
        OverrideKind::for_level(level).initial()
    }

    pub fn kind(&self) -> OverrideKind {
        match self {
            ScrollOverride::Default => K::Default,
            ScrollOverride::HorizontalAutoScroll { .. } => K::HorizontalAutoScroll,
            ScrollOverride::VerticalAutoScroll { .. } => K::VerticalAutoScroll,
            ScrollOverride::LoopingBackdrop { .. } => K::LoopingBackdrop,
        }
    }

    /// Compute this frame's `new_position` for every plane.
    ///
    /// On return `state.position` is the hero-relative camera.
    pub fn position_planes<M: MapStore + ?Sized>(
        &mut self,
        map: &M,
        planes: &mut [Plane],
        state: &mut ScrollState,
        player: &PlayerState,
        cfg: &ScrollConfig,
    ) {
        let hero = map.hero_plane();
        if hero >= planes.len() {
            return;
        }
        match self {
            ScrollOverride::Default => {
                advance_position(state, player, map.plane_extent(hero), cfg);
                compute_plane_positions(map, planes, hero, state.position, cfg);
            }
            ScrollOverride::HorizontalAutoScroll { speed } => {
                horizontal_auto_scroll(map, planes, player, *speed, cfg);
                state.position = planes[hero].new_position;
            }
            ScrollOverride::VerticalAutoScroll { speed } => {
                vertical_auto_scroll(map, planes, player, *speed);
                state.position = planes[hero].new_position;
            }
            ScrollOverride::LoopingBackdrop { backdrop_x } => {
                advance_position(state, player, map.plane_extent(hero), cfg);
                looping_backdrop(map, planes, state.position, backdrop_x, cfg);
            }
        }
    }
}

fn horizontal_auto_scroll<M: MapStore + ?Sized>(
    map: &M,
    planes: &mut [Plane],
    player: &PlayerState,
    speed: Fixed,
    cfg: &ScrollConfig,
) {
    let hero = map.hero_plane();
    let screen_w = cfg.screen_w_fixed();

    for (i, drift) in DRIFT_X.iter().enumerate().take(hero) {
        let plane = &mut planes[i];
        plane.new_position.x += *drift;
        let (w, _) = map.plane_extent(i);
        if plane.new_position.x + screen_w >= Fixed::from_tiles(w) {
            // one pixel left of zero so the right edge column is repainted
            plane.position.x = plane.position.x.subpixel() - Fixed::from_pixels(1);
            plane.new_position.x = plane.new_position.x.subpixel();
            debug!(plane = i, "background loop");
        }
    }

    if !player.dead {
        let right_edge = Fixed::from_tiles(map.plane_extent(hero).0);
        let hero = &mut planes[hero];
        hero.new_position.x += speed;
        if hero.new_position.x + screen_w >= right_edge {
            hero.new_position.x = right_edge - screen_w;
        }
    }
}

fn vertical_auto_scroll<M: MapStore + ?Sized>(
    map: &M,
    planes: &mut [Plane],
    player: &PlayerState,
    speed: Fixed,
) {
    let hero = map.hero_plane();
    if hero > 0 {
        let back = &mut planes[0];
        back.new_position.y -= RISE_Y;
        if back.new_position.y < Fixed::ZERO {
            // shift both so nothing gets repainted
            back.position.y += RISE_LOOP;
            back.new_position.y += RISE_LOOP;
        }
    }
    if !player.dead {
        let hero = &mut planes[hero];
        hero.new_position.y += speed;
        if hero.new_position.y < Fixed::ZERO {
            hero.new_position.y = Fixed::ZERO;
        }
    }
}

/// `camera` is the player-driven hero camera of this frame.
fn looping_backdrop<M: MapStore + ?Sized>(
    map: &M,
    planes: &mut [Plane],
    camera: Position,
    backdrop_x: &mut Fixed,
    cfg: &ScrollConfig,
) {
    let hero = map.hero_plane();
    if hero == 0 {
        compute_plane_positions(map, planes, hero, camera, cfg);
        return;
    }
    let backdrop = hero - 1;

    // the backdrop follows the hero's movement plus the constant speed
    let mut previous = *backdrop_x;
    *backdrop_x += camera.x - planes[hero].position.x + BACKDROP_SPEED;
    if *backdrop_x < Fixed::ZERO {
        *backdrop_x = Fixed::ZERO;
    }

    if backdrop_x.tile() >= BACKDROP_LOOP_TILE {
        // snap the back planes to the looped position instead of scrolling
        // all the way back to it
        previous -= BACKDROP_LOOP_SPAN;
        let looped = Position::new(previous, camera.y);
        compute_plane_positions(map, &mut planes[..hero], backdrop, looped, cfg);
        for p in &mut planes[..hero] {
            p.position = p.new_position;
        }
        *backdrop_x -= BACKDROP_LOOP_SPAN;
        debug!(backdrop_x = backdrop_x.raw(), "backdrop loop");
    }

    // planes in front of the hero follow the backdrop too
    compute_plane_positions(
        map,
        planes,
        backdrop,
        Position::new(*backdrop_x, camera.y),
        cfg,
    );
    planes[hero].new_position = camera;
}
