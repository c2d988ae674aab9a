//! Rendering abstraction layer.
//!
//! *The scroll engine never touches the window.*  It composes planes into a
//! [`Surface`] handed out by a type implementing [`Renderer`]; the renderer
//! then loans the finished frame to whatever presents it.
//!
//! * [`Surface`] is the only pixel container in the crate: tile atlases,
//!   scroll buffers and the screen are all surfaces.
//! * A helper blanket-impl [`RendererExt`] adds `draw_frame` so call-sites
//!   stay short.

mod software;
mod surface;

pub use software::Software;
pub use surface::{BlitError, Surface, SurfaceError, TILE_PX};

/// Pixel format of every surface (0x00RRGGBB).
pub type Rgba = u32;

/// Axis-aligned rectangle in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    #[inline]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn area(&self) -> i64 {
        self.w as i64 * self.h as i64
    }
}

/// A renderer that owns the screen surface for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
pub trait Renderer {
    /// (Re)allocate the screen for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize) -> Result<(), SurfaceError>;

    /// Surface the planes are composed into between `begin_frame` and
    /// `end_frame`.
    fn target(&mut self) -> &mut Surface;

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * A minifb caller passes `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    /// Begin a frame, let `compose` draw into the target, then submit it.
    fn draw_frame<C, F>(
        &mut self,
        width: usize,
        height: usize,
        compose: C,
        submit: F,
    ) -> Result<(), SurfaceError>
    where
        C: FnOnce(&mut Surface),
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(width, height)?;
        compose(self.target());
        self.end_frame(submit);
        Ok(())
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}
