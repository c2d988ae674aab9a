//! Runtime configuration shared by every scroll component.

use crate::{renderer::TILE_PX, scroll::Fixed};

/// Screen / buffer geometry and camera tuning.
///
/// All pixel dimensions must be whole tiles.  The scroll buffer must be at
/// least one tile larger than the screen on each axis, otherwise the column
/// entering on the right would overwrite the one still shown on the left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollConfig {
    pub screen_width: usize,
    pub screen_height: usize,
    pub buffer_width: usize,
    pub buffer_height: usize,
    /// Max camera step per frame on X (fixed-point units).
    pub speed_x: i32,
    /// Max camera step per frame on Y, unless the fast fall catch-up kicks in.
    pub speed_y: i32,
    /// Extra tiles beyond the visible window used for entity reveal checks.
    pub clip_margin: i32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            screen_width: 320,
            screen_height: 224,
            buffer_width: 512,
            buffer_height: 256,
            speed_x: 0x400,
            speed_y: 0x400,
            clip_margin: 2,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{what} ({value} px) is not a multiple of the 16 px tile size")]
    NotTileAligned { what: &'static str, value: usize },

    #[error("scroll buffer {buffer_w}x{buffer_h} must exceed the screen {screen_w}x{screen_h} by one tile")]
    BufferTooSmall {
        buffer_w: usize,
        buffer_h: usize,
        screen_w: usize,
        screen_h: usize,
    },

    #[error("camera speed must be positive")]
    BadSpeed,
}

impl ScrollConfig {
    /// Check the geometry invariants every component relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (what, value) in [
            ("screen width", self.screen_width),
            ("screen height", self.screen_height),
            ("buffer width", self.buffer_width),
            ("buffer height", self.buffer_height),
        ] {
            if value == 0 || value % TILE_PX != 0 {
                return Err(ConfigError::NotTileAligned { what, value });
            }
        }
        if self.buffer_width < self.screen_width + TILE_PX
            || self.buffer_height < self.screen_height + TILE_PX
        {
            return Err(ConfigError::BufferTooSmall {
                buffer_w: self.buffer_width,
                buffer_h: self.buffer_height,
                screen_w: self.screen_width,
                screen_h: self.screen_height,
            });
        }
        if self.speed_x <= 0 || self.speed_y <= 0 {
            return Err(ConfigError::BadSpeed);
        }
        Ok(())
    }

    /// Whole tiles visible horizontally.
    #[inline]
    pub fn visible_tiles_w(&self) -> i32 {
        (self.screen_width / TILE_PX) as i32
    }

    /// Whole tiles visible vertically.
    #[inline]
    pub fn visible_tiles_h(&self) -> i32 {
        (self.screen_height / TILE_PX) as i32
    }

    #[inline]
    pub fn buffer_tiles_w(&self) -> i32 {
        (self.buffer_width / TILE_PX) as i32
    }

    #[inline]
    pub fn buffer_tiles_h(&self) -> i32 {
        (self.buffer_height / TILE_PX) as i32
    }

    /// Screen width expressed in fixed-point units.
    #[inline]
    pub fn screen_w_fixed(&self) -> Fixed {
        Fixed::from_pixels(self.screen_width as i32)
    }

    /// Screen height expressed in fixed-point units.
    #[inline]
    pub fn screen_h_fixed(&self) -> Fixed {
        Fixed::from_pixels(self.screen_height as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let cfg = ScrollConfig::default();
        assert_eq!(cfg.validate(), Ok(()));
        assert_eq!(cfg.visible_tiles_w(), 20);
        assert_eq!(cfg.visible_tiles_h(), 14);
        assert_eq!(cfg.buffer_tiles_w(), 32);
        assert_eq!(cfg.buffer_tiles_h(), 16);
    }

    #[test]
    fn rejects_unaligned_screen() {
        let cfg = ScrollConfig {
            screen_width: 321,
            ..ScrollConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NotTileAligned { what: "screen width", .. })
        ));
    }

    #[test]
    fn rejects_buffer_without_margin() {
        let cfg = ScrollConfig {
            buffer_height: 224,
            ..ScrollConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::BufferTooSmall { .. })));
    }
}
