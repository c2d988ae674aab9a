//! Camera, parallax and the toroidal scroll buffers.
//!
//! Frame order: [`ScrollEngine::advance_frame`] (override or camera →
//! parallax → incremental paint), then [`ScrollEngine::draw_plane`] for
//! each plane, back to front.

mod blit;
mod buffer;
mod camera;
mod driver;
mod engine;
mod fixed;
mod hooks;
mod overrides;
mod parallax;

pub use blit::{BlitRegion, BlitRegions, blit_regions, present};
pub use buffer::ScrollBuffer;
pub use camera::{
    Facing, PlayerState, ScrollLimits, ScrollState, ScrollType, advance_position, player_target,
};
pub use driver::{Plane, apply_scroll};
pub use engine::{ScrollEngine, ScrollError};
pub use fixed::{Fixed, PIXEL_UNITS, Position, TILE_UNITS};
pub use hooks::{Direction, NoHooks, ScrollHooks};
pub use overrides::{LEVEL_COUNT, OverrideKind, ScrollOverride};
pub use parallax::{compute_plane_positions, differential, plane_position};
