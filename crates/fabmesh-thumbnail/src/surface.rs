//! Off-screen render surfaces and the host that tracks them.
//!
//! A [`RenderSurface`] is attached to a [`SurfaceHost`] for exactly as long
//! as it is alive; dropping it detaches it, whichever way the render ends.

use std::cell::{Cell, RefCell};

use image::{Rgba, RgbaImage};

/// Tracks the render surfaces currently attached.
///
/// Passed explicitly to the thumbnail entry points; each browser view or
/// CLI invocation owns one.
#[derive(Debug, Default)]
pub struct SurfaceHost {
    attached: RefCell<Vec<u64>>,
    next_id: Cell<u64>,
}

impl SurfaceHost {
    /// A host with nothing attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of surfaces attached right now.
    pub fn attached_count(&self) -> usize {
        self.attached.borrow().len()
    }

    /// Attach a cleared `width` x `height` surface.
    pub fn attach(&self, width: u32, height: u32) -> RenderSurface<'_> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.attached.borrow_mut().push(id);
        RenderSurface {
            host: self,
            id,
            color: RgbaImage::new(width, height),
            depth: vec![f32::INFINITY; width as usize * height as usize],
        }
    }

    fn detach(&self, id: u64) {
        self.attached.borrow_mut().retain(|&a| a != id);
    }
}

/// Color and depth buffers for one render.
///
/// The color buffer starts fully transparent.
pub struct RenderSurface<'h> {
    host: &'h SurfaceHost,
    id: u64,
    color: RgbaImage,
    depth: Vec<f32>,
}

impl RenderSurface<'_> {
    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        self.color.width()
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        self.color.height()
    }

    /// Write `rgba` at `(x, y)` if `depth` is nearer than what is there.
    ///
    /// Returns whether the sample was kept.
    pub fn plot(&mut self, x: u32, y: u32, depth: f32, rgba: [u8; 4]) -> bool {
        let slot = y as usize * self.width() as usize + x as usize;
        if depth >= self.depth[slot] {
            return false;
        }
        self.depth[slot] = depth;
        self.color.put_pixel(x, y, Rgba(rgba));
        true
    }

    /// Take the color buffer and detach.
    pub fn into_color(mut self) -> RgbaImage {
        std::mem::replace(&mut self.color, RgbaImage::new(0, 0))
    }
}

impl Drop for RenderSurface<'_> {
    fn drop(&mut self) {
        self.host.detach(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn test_attach_and_drop() {
        let host = SurfaceHost::new();
        let a = host.attach(4, 4);
        let b = host.attach(2, 2);
        assert_eq!(host.attached_count(), 2);
        drop(a);
        assert_eq!(host.attached_count(), 1);
        let image = b.into_color();
        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(host.attached_count(), 0);
    }

    #[test]
    fn test_starts_transparent() {
        let host = SurfaceHost::new();
        let image = host.attach(3, 3).into_color();
        assert!(image.pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn test_depth_test_keeps_nearest() {
        let host = SurfaceHost::new();
        let mut surface = host.attach(1, 1);
        assert!(surface.plot(0, 0, 0.5, [255, 0, 0, 255]));
        assert!(!surface.plot(0, 0, 0.7, [0, 255, 0, 255]));
        assert!(surface.plot(0, 0, 0.1, [0, 0, 255, 255]));
        assert_eq!(surface.into_color().get_pixel(0, 0).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_detached_on_unwind() {
        let host = SurfaceHost::new();
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _surface = host.attach(8, 8);
            panic!("render blew up");
        }));
        assert!(result.is_err());
        assert_eq!(host.attached_count(), 0);
    }
}
