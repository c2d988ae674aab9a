//! Multi-plane parallax tile scrolling.
//!
//! Every plane of a level keeps a small toroidal pixel cache (the *scroll
//! buffer*).  As the camera moves only the tile columns/rows that enter the
//! view are painted; presenting a plane is then one to four rectangle copies.
//!
//! * [`map`] – read-only tile store the engine paints from.
//! * [`renderer`] – typed pixel surfaces and the tile blit primitive.
//! * [`scroll`] – camera, parallax, incremental update and presentation.

pub mod config;
pub mod map;
pub mod renderer;
pub mod scroll;

pub use config::{ConfigError, ScrollConfig};
