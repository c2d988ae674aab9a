/// Which way the window moved when an edge was revealed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Right or down.
    Positive,
    /// Left or up.
    Negative,
}

impl Direction {
    #[inline]
    pub const fn sign(self) -> i32 {
        match self {
            Direction::Positive => 1,
            Direction::Negative => -1,
        }
    }
}

/// Callbacks into the systems living next to the scroll engine.
///
/// * `on_column_revealed` / `on_row_revealed` fire for the hero plane only,
///   already offset by the clip margin, so the entity system can spawn or
///   despawn whatever stands on that line.
/// * `on_animated_tile_refresh` fires once per painted tile on every plane.
///
/// All methods default to doing nothing.
pub trait ScrollHooks {
    fn on_column_revealed(&mut self, _tile_x: i32, _tile_y: i32, _dir: Direction) {}

    fn on_row_revealed(&mut self, _tile_y: i32, _tile_x: i32, _dir: Direction) {}

    fn on_animated_tile_refresh(&mut self, _plane: usize, _tile_x: i32, _tile_y: i32) {}
}

/// Hooks that ignore every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHooks;

impl ScrollHooks for NoHooks {}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    /// Test double remembering every call, in order.
    #[derive(Debug, Default)]
    pub struct Recorder {
        pub columns: Vec<(i32, i32, Direction)>,
        pub rows: Vec<(i32, i32, Direction)>,
        pub tiles: Vec<(usize, i32, i32)>,
    }

    impl ScrollHooks for Recorder {
        fn on_column_revealed(&mut self, tile_x: i32, tile_y: i32, dir: Direction) {
            self.columns.push((tile_x, tile_y, dir));
        }

        fn on_row_revealed(&mut self, tile_y: i32, tile_x: i32, dir: Direction) {
            self.rows.push((tile_y, tile_x, dir));
        }

        fn on_animated_tile_refresh(&mut self, plane: usize, tile_x: i32, tile_y: i32) {
            self.tiles.push((plane, tile_x, tile_y));
        }
    }
}
