//! The seam between the animation core and whatever owns the pixels.
//!
//! A `Surface` hands out its `Canvas` for one frame at a time. The director
//! locks it, composes, and posts it straight back; when no canvas is
//! available the frame is simply skipped.

use anyhow::Result;

use crate::assets::{Bitmap, Sprite};
use crate::types::{Bounds, Color};

pub trait Canvas {
    /// Fill the whole canvas with a solid color.
    fn draw_color(&mut self, color: &Color);

    /// Draw a bitmap with its top-left corner at (`left`, `top`).
    fn draw_bitmap(&mut self, bitmap: &Bitmap, left: f32, top: f32);

    /// Draw a sprite stretched to `bounds`.
    fn draw_sprite(&mut self, sprite: &Sprite, bounds: Bounds);
}

pub trait Surface {
    /// Borrow the canvas for one frame. `None` means the surface is not
    /// drawable right now.
    fn lock_canvas(&mut self) -> Option<&mut dyn Canvas>;

    /// Release the canvas locked by `lock_canvas` and show what was drawn.
    fn unlock_canvas_and_post(&mut self) -> Result<()>;
}
