//! ---------------------------------------------------------------------------
//! ScrollEngine
//!
//! * Owns one [`Plane`] (buffer + positions) per possible layer, allocated
//!   once in [`ScrollEngine::new`] and reused by every level.
//! * Per frame: level override or default camera → parallax → incremental
//!   buffer update; [`ScrollEngine::draw_plane`] then presents each plane.
//! ---------------------------------------------------------------------------

use tracing::debug;

use super::{
    blit::present,
    camera::{PlayerState, ScrollLimits, ScrollState, ScrollType, advance_position, player_target},
    driver::{Plane, apply_scroll},
    fixed::Position,
    hooks::{Direction, ScrollHooks},
    overrides::ScrollOverride,
    parallax::compute_plane_positions,
};
use crate::{
    config::{ConfigError, ScrollConfig},
    map::{MapError, MapStore},
    renderer::{Rgba, Surface, SurfaceError},
};

#[derive(Debug, thiserror::Error)]
pub enum ScrollError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Scroll buffers could not be allocated.
    #[error("cannot allocate scroll buffers: {0}")]
    Alloc(#[from] SurfaceError),

    #[error("level has {planes} planes, engine holds {max}")]
    TooManyPlanes { planes: usize, max: usize },

    #[error(transparent)]
    Map(#[from] MapError),
}

pub struct ScrollEngine {
    config: ScrollConfig,
    planes: Vec<Plane>,
    /// Planes used by the current level.
    active: usize,
    hero: usize,
    color_key: Rgba,
    state: ScrollState,
    level_override: ScrollOverride,
    frame_missed: bool,
}

impl ScrollEngine {
    /// Validate `config` and allocate `max_planes` scroll buffers.
    pub fn new(config: ScrollConfig, max_planes: usize) -> Result<Self, ScrollError> {
        config.validate()?;
        let planes = (0..max_planes)
            .map(|_| Plane::new(&config))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            max_planes,
            buffer_w = config.buffer_width,
            buffer_h = config.buffer_height,
            "scroll buffers allocated"
        );
        Ok(Self {
            config,
            planes,
            active: 0,
            hero: 0,
            color_key: 0,
            state: ScrollState::default(),
            level_override: ScrollOverride::Default,
            frame_missed: false,
        })
    }

    /// Place the camera on the player and fill every plane's visible window.
    ///
    /// Limits are cleared and the override of `level` is installed with its
    /// initial scratch.
    pub fn init_scroll<M, H>(
        &mut self,
        map: &M,
        player: &PlayerState,
        scroll_type: ScrollType,
        level: usize,
        hooks: &mut H,
    ) -> Result<(), ScrollError>
    where
        M: MapStore + ?Sized,
        H: ScrollHooks + ?Sized,
    {
        let count = map.plane_count();
        if count > self.planes.len() {
            return Err(ScrollError::TooManyPlanes {
                planes: count,
                max: self.planes.len(),
            });
        }
        let hero = map.hero_plane();
        if hero >= count {
            return Err(MapError::BadHeroPlane(hero).into());
        }
        let cfg = &self.config;
        self.active = count;
        self.hero = hero;
        self.color_key = map.color_key();

        let start = player_target(player, cfg);
        self.state = ScrollState {
            position: start,
            last_x: start.x,
            scroll_type,
            limits: ScrollLimits::default(),
        };
        // only for the map clamps
        advance_position(&mut self.state, player, map.plane_extent(hero), cfg);

        let planes = &mut self.planes[..count];
        compute_plane_positions(map, planes, hero, self.state.position, cfg);
        for (i, plane) in planes.iter_mut().enumerate() {
            plane.position = plane.new_position;
            let (x, y) = (plane.position.x.tile(), plane.position.y.tile());
            for c in 0..=cfg.visible_tiles_w() {
                plane.buffer.paint_column(map, i, x + c, y, hooks);
            }
        }

        // entities already inside the window (plus margin)
        let clip = cfg.clip_margin;
        let origin = planes[hero].position;
        let (x, y) = (origin.x.tile(), origin.y.tile());
        for i in -clip..=cfg.visible_tiles_w() + clip {
            hooks.on_column_revealed(x + i, y - clip, Direction::Positive);
        }
        hooks.on_row_revealed(y + cfg.visible_tiles_h() + clip, x - clip, Direction::Positive);

        self.level_override = ScrollOverride::for_level(level);
        debug!(
            level,
            planes = count,
            hero,
            camera_x = self.state.position.x.raw(),
            camera_y = self.state.position.y.raw(),
            scroll = ?self.level_override.kind(),
            "scroll initialised"
        );
        Ok(())
    }

    /// Move every plane for this frame and paint what came into view.
    pub fn advance_frame<M, H>(&mut self, map: &M, player: &PlayerState, hooks: &mut H)
    where
        M: MapStore + ?Sized,
        H: ScrollHooks + ?Sized,
    {
        let planes = &mut self.planes[..self.active];
        self.level_override
            .position_planes(map, planes, &mut self.state, player, &self.config);
        apply_scroll(map, planes, &self.config, hooks);
    }

    /// Present `plane` on `target`.  Planes above the first are colour keyed.
    /// Returns the number of rectangles drawn.
    pub fn draw_plane(&self, plane: usize, target: &mut Surface) -> usize {
        if plane >= self.active || self.frame_missed {
            return 0;
        }
        let screen = (
            self.config.screen_width as i32,
            self.config.screen_height as i32,
        );
        let key = (plane != 0).then_some(self.color_key);
        let p = &self.planes[plane];
        present(p.buffer.surface(), p.position, screen, target, key)
    }

    /// Draw all planes back to front.
    pub fn draw(&self, target: &mut Surface) {
        for plane in 0..self.active {
            self.draw_plane(plane, target);
        }
    }

    /// Repaint one block of `plane` with `block + frame_offset`.
    pub fn refresh_block<M: MapStore + ?Sized>(
        &mut self,
        map: &M,
        plane: usize,
        tile_x: i32,
        tile_y: i32,
        frame_offset: i32,
    ) -> bool {
        match self.planes[..self.active].get_mut(plane) {
            Some(p) => p.buffer.refresh_block(map, plane, tile_x, tile_y, frame_offset),
            None => false,
        }
    }

    /// Current (already painted) position of `plane`.
    pub fn plane_position(&self, plane: usize) -> Option<Position> {
        self.planes[..self.active].get(plane).map(|p| p.position)
    }

    /// Pending position of the hero plane; used to place entities on
    /// auto-scrolling levels.
    pub fn hero_plane_new_position(&self) -> Option<Position> {
        self.planes[..self.active]
            .get(self.hero)
            .map(|p| p.new_position)
    }

    pub fn set_limits(&mut self, limits: ScrollLimits) {
        self.state.limits = limits;
    }

    pub fn limits(&self) -> ScrollLimits {
        self.state.limits
    }

    /// Skip presentation (not scrolling) while set.
    pub fn set_frame_missed(&mut self, missed: bool) {
        self.frame_missed = missed;
    }

    #[inline]
    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    #[inline]
    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    #[inline]
    pub fn level_override(&self) -> ScrollOverride {
        self.level_override
    }

    /// Planes of the current level.
    #[inline]
    pub fn plane_count(&self) -> usize {
        self.active
    }

    pub fn buffer(&self, plane: usize) -> Option<&Surface> {
        self.planes[..self.active]
            .get(plane)
            .map(|p| p.buffer.surface())
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
