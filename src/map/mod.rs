//! Level data as the scroll engine sees it.
//!
//! The engine paints from a read-only [`MapStore`]; [`MapData`] is the
//! in-memory store produced by [`load_map`] or [`demo_map`].

mod atlas;
mod demo;
mod file;
mod store;

pub use atlas::TileAtlas;
pub use demo::{DEMO_COLOR_KEY, DemoLevel, demo_map};
pub use file::{MapFileError, load_map, read_map, save_map, write_map};
pub use store::{MapData, MapError, MapStore, PlaneLayer};
