//! ---------------------------------------------------------------------------
//! CPU frame composer
//!
//! * Owns one screen-sized [`Surface`] in **0x00RRGGBB** format.
//! * Planes are blitted into it back-to-front by the scroll engine, so no
//!   depth information is needed: later planes simply overwrite earlier ones
//!   wherever they are not transparent.
//! ---------------------------------------------------------------------------

use crate::renderer::{Renderer, Rgba, Surface, SurfaceError};

/// Colour the screen is cleared to before plane 0 is drawn.
const CLEAR_COLOR: Rgba = 0x00_20_20_20;

#[derive(Default)]
pub struct Software {
    screen: Surface,
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) -> Result<(), SurfaceError> {
        // (re)allocate if resolution changed
        if w != self.screen.width() || h != self.screen.height() {
            self.screen = Surface::try_new(w, h)?;
        }
        self.screen.fill(CLEAR_COLOR);
        Ok(())
    }

    fn target(&mut self) -> &mut Surface {
        &mut self.screen
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(self.screen.as_slice(), self.screen.width(), self.screen.height());
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
