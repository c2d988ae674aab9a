use super::fixed::{Fixed, Position};
use crate::config::ScrollConfig;

/// How the camera may move horizontally.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollType {
    #[default]
    Free,
    /// Forward-only: the camera never retreats more than a third of the
    /// screen behind the right-most position it reached.
    RightOnly,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// What the camera needs to know about the player each frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerState {
    pub position: Position,
    pub grounded: bool,
    /// Y of the last frame the player stood on something.
    pub last_ground_y: Fixed,
    pub facing: Facing,
    /// Vertical catch-up speed used while the player drops far below the
    /// window.
    pub max_fall_speed: Fixed,
    /// Auto-scroll levels stop pushing the hero plane while this is set.
    pub dead: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            position: Position::default(),
            grounded: true,
            last_ground_y: Fixed::ZERO,
            facing: Facing::Right,
            max_fall_speed: Fixed::from_raw(0x800),
            dead: false,
        }
    }
}

/// Explicit camera bounds (fixed-point); `None` disables a bound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollLimits {
    pub x_min: Option<Fixed>,
    pub x_max: Option<Fixed>,
    pub y_min: Option<Fixed>,
    pub y_max: Option<Fixed>,
}

/// Camera state, reset at every level start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollState {
    /// Hero-relative camera (top-left of the window).
    pub position: Position,
    /// Forward-most X reached (anti-backtrack bookkeeping).
    pub last_x: Fixed,
    pub scroll_type: ScrollType,
    pub limits: ScrollLimits,
}

/// Where the camera wants to be for `player`.
///
/// The player sits a third of the screen from the edge behind it, and two
/// thirds down.  While airborne the last ground height is used so jumps do
/// not shake the view.
pub fn player_target(player: &PlayerState, cfg: &ScrollConfig) -> Position {
    let vis_w = cfg.visible_tiles_w();
    let vis_h = cfg.visible_tiles_h();
    let lead = match player.facing {
        Facing::Left => 2,
        Facing::Right => 1,
    };
    let base_y = if player.grounded {
        player.position.y
    } else {
        player.last_ground_y
    };
    Position::new(
        player.position.x - Fixed::from_tiles(lead * vis_w / 3),
        base_y - Fixed::from_tiles(2 * vis_h / 3),
    )
}

/// Half the remaining distance, capped at `speed`.
#[inline]
fn ease(delta: Fixed, speed: Fixed) -> Fixed {
    let cap = speed.raw().abs();
    Fixed::from_raw((delta.raw() / 2).clamp(-cap, cap))
}

/// Move the camera one frame towards the player.
///
/// `hero_extent` is the hero plane's size in tiles; the window never shows
/// anything outside it.
pub fn advance_position(
    state: &mut ScrollState,
    player: &PlayerState,
    hero_extent: (i32, i32),
    cfg: &ScrollConfig,
) {
    let vis_w = cfg.visible_tiles_w();
    let vis_h = cfg.visible_tiles_h();
    let target = player_target(player, cfg);
    let pos = &mut state.position;
    let limits = state.limits;

    /*----------- easing ---------------------------------------------*/
    pos.x += ease(target.x - pos.x, Fixed::from_raw(cfg.speed_x));

    let mut target_y = target.y;
    let mut speed_y = Fixed::from_raw(cfg.speed_y);
    let drop = Fixed::from_tiles(3 * vis_h / 4);
    if player.position.y > target_y + drop {
        // fell into a hole: follow at fall speed
        target_y = player.position.y - drop;
        speed_y = player.max_fall_speed;
    }
    pos.y += ease(target_y - pos.y, speed_y);

    /*----------- anti-backtrack -------------------------------------*/
    if limits.x_min.is_none() && state.scroll_type == ScrollType::RightOnly {
        let floor = state.last_x - Fixed::from_tiles(vis_w / 3);
        if pos.x < floor {
            pos.x = floor;
        }
    }

    /*----------- explicit limits ------------------------------------*/
    let (screen_w, screen_h) = (cfg.screen_w_fixed(), cfg.screen_h_fixed());
    if let Some(max) = limits.x_max {
        if pos.x + screen_w >= max {
            pos.x = max - screen_w;
        }
    }
    if let Some(min) = limits.x_min {
        if pos.x < min {
            pos.x = min;
        }
    }
    if let Some(max) = limits.y_max {
        if pos.y + screen_h >= max {
            pos.y = max - screen_h;
        }
    }
    if let Some(min) = limits.y_min {
        if pos.y < min {
            pos.y = min;
        }
    }

    /*----------- map edges ------------------------------------------*/
    let (hero_w, hero_h) = hero_extent;
    if pos.x.tile() + vis_w >= hero_w {
        pos.x = Fixed::from_tiles(hero_w - vis_w);
    }
    if pos.x < Fixed::ZERO {
        pos.x = Fixed::ZERO;
    }
    if pos.y.tile() + vis_h >= hero_h {
        pos.y = Fixed::from_tiles(hero_h - vis_h);
    }
    if pos.y < Fixed::ZERO {
        pos.y = Fixed::ZERO;
    }

    // whole pixels only, or sprites jitter against the background
    pos.x = pos.x.mask_subpixel();
    pos.y = pos.y.mask_subpixel();

    if limits.x_min.is_none() {
        state.last_x = match state.scroll_type {
            ScrollType::RightOnly => state.last_x.max(pos.x),
            ScrollType::Free => pos.x,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HERO: (i32, i32) = (100, 40);

    fn player_at(x: i32, y: i32) -> PlayerState {
        PlayerState {
            position: Position::from_tiles(x, y),
            last_ground_y: Fixed::from_tiles(y),
            ..PlayerState::default()
        }
    }

    fn settle(state: &mut ScrollState, player: &PlayerState, frames: usize) {
        let cfg = ScrollConfig::default();
        for _ in 0..frames {
            advance_position(state, player, HERO, &cfg);
        }
    }

    #[test]
    fn target_leads_in_facing_direction() {
        let cfg = ScrollConfig::default();
        let mut p = player_at(30, 20);
        assert_eq!(player_target(&p, &cfg), Position::from_tiles(24, 11));
        p.facing = Facing::Left;
        assert_eq!(player_target(&p, &cfg).x, Fixed::from_tiles(17));
        p.grounded = false;
        p.position.y = Fixed::from_tiles(5);
        assert_eq!(player_target(&p, &cfg).y, Fixed::from_tiles(11), "uses last ground");
    }

    #[test]
    fn step_is_half_distance_capped() {
        let cfg = ScrollConfig::default();
        let mut s = ScrollState {
            position: Position::from_tiles(24, 11),
            ..ScrollState::default()
        };
        let mut p = player_at(30, 20);
        p.position.x += Fixed::from_raw(0x300);
        advance_position(&mut s, &p, HERO, &cfg);
        assert_eq!(s.position.x, Fixed::from_tiles(24) + Fixed::from_raw(0x100));

        let far = player_at(60, 20);
        advance_position(&mut s, &far, HERO, &cfg);
        assert_eq!(s.position.x - Fixed::from_tiles(24), Fixed::from_raw(0x500));
    }

    #[test]
    fn fast_catch_up_when_falling() {
        let cfg = ScrollConfig::default();
        let mut s = ScrollState::default();
        let p = PlayerState {
            position: Position::from_tiles(6, 20),
            grounded: false,
            last_ground_y: Fixed::ZERO,
            ..PlayerState::default()
        };
        advance_position(&mut s, &p, HERO, &cfg);
        assert_eq!(s.position.y, Fixed::from_raw(0x800));
    }

    #[test]
    fn window_never_leaves_hero_plane() {
        let cfg = ScrollConfig::default();
        let max_x = Fixed::from_tiles(HERO.0 - cfg.visible_tiles_w());
        let max_y = Fixed::from_tiles(HERO.1 - cfg.visible_tiles_h());
        let mut s = ScrollState::default();
        for px in (-20..140).step_by(7) {
            for py in (-20..70).step_by(5) {
                let p = player_at(px, py);
                for _ in 0..4 {
                    advance_position(&mut s, &p, HERO, &cfg);
                    assert!(Fixed::ZERO <= s.position.x && s.position.x <= max_x);
                    assert!(Fixed::ZERO <= s.position.y && s.position.y <= max_y);
                    assert_eq!(s.position.x.subpixel(), Fixed::ZERO);
                }
            }
        }
    }

    #[test]
    fn right_only_never_backs_off_more_than_a_third() {
        let mut s = ScrollState {
            scroll_type: ScrollType::RightOnly,
            ..ScrollState::default()
        };
        for x in 6..60 {
            settle(&mut s, &player_at(x, 20), 2);
        }
        settle(&mut s, &player_at(59, 20), 200);
        let furthest = s.last_x;
        assert_eq!(furthest, s.position.x);

        let mut lowest = s.position.x;
        for x in (0..60).rev() {
            let mut p = player_at(x, 20);
            p.facing = Facing::Left;
            settle(&mut s, &p, 2);
            lowest = lowest.min(s.position.x);
        }
        assert_eq!(s.last_x, furthest);
        assert_eq!(lowest, furthest - Fixed::from_tiles(6));
    }

    #[test]
    fn free_camera_follows_back() {
        let mut s = ScrollState::default();
        settle(&mut s, &player_at(60, 20), 400);
        settle(&mut s, &player_at(10, 20), 400);
        assert_eq!(s.position.x, Fixed::from_tiles(4));
        assert_eq!(s.last_x, s.position.x);
    }

    #[test]
    fn explicit_limits_hold_the_window() {
        let mut s = ScrollState {
            limits: ScrollLimits {
                x_min: Some(Fixed::from_tiles(8)),
                x_max: Some(Fixed::from_tiles(40)),
                ..ScrollLimits::default()
            },
            ..ScrollState::default()
        };
        settle(&mut s, &player_at(90, 20), 200);
        // right edge of the screen stops short of the bound
        assert_eq!(s.position.x, Fixed::from_tiles(40) - Fixed::from_pixels(320));

        settle(&mut s, &player_at(0, 20), 200);
        assert_eq!(s.position.x, Fixed::from_tiles(8));
        assert_eq!(s.last_x, Fixed::ZERO, "bookkeeping frozen while x_min is set");
    }
}
