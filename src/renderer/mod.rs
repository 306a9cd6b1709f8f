//! Rendering abstraction layer.
//!
//! *The frame loop never touches a pixel buffer directly.*
//! It casts one [`Ray`] per screen column and hands each to a type that
//! implements [`Renderer`], which owns the projection buffer.
//!
//! * [`Software`] is the CPU column renderer.
//! * [`Surface`] is the magnified, host-visible copy of the last frame.

use crate::{engine::Ray, sim::Player, world::Scene};

pub mod software;
mod surface;

pub use software::Software;
pub use surface::Surface;

/// Pixel format of every buffer and texture (0xAARRGGBB).
pub type Rgba = u32;

pub const OPAQUE_BLACK: Rgba = 0xFF_000000;

#[inline]
pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Rgba {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// `(r, g, b, a)` channels of a packed colour.
#[inline]
pub const fn channels(c: Rgba) -> (u8, u8, u8, u8) {
    ((c >> 16) as u8, (c >> 8) as u8, c as u8, (c >> 24) as u8)
}

/// A renderer that owns the projection buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
pub trait Renderer {
    /// (Re)allocate the buffer for the requested resolution and clear it
    /// to opaque black.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Write background, wall and floor pixels for `ray.column`.
    fn draw_column(&mut self, ray: &Ray, player: &Player, scene: &Scene);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_frame<F>(
        &mut self,
        width: usize,
        height: usize,
        rays: &[Ray],
        player: &Player,
        scene: &Scene,
        submit: F,
    ) where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(width, height);
        for ray in rays {
            self.draw_column(ray, player, scene);
        }
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_and_unpack() {
        let c = rgba(255, 241, 232, 128);
        assert_eq!(c, 0x80_FFF1E8);
        assert_eq!(channels(c), (255, 241, 232, 128));
        assert_eq!(channels(OPAQUE_BLACK), (0, 0, 0, 255));
    }
}
