//! Window extent watchers

use crate::window::Window;
use casement_core::PropertyReader;

/// Read-only access to a window's drawable extent
///
/// For consumers (swapchains, render targets) that only need the current
/// size and pixel density, not the full window API.
pub trait WindowExtentWatcher {
    /// Width in physical pixels
    fn width(&self) -> u32;
    /// Height in physical pixels
    fn height(&self) -> u32;
    /// Device pixel ratio, 1.0 = no scaling
    fn scale_factor(&self) -> f32;
}

/// Extent watcher bound to a [`Window`]
///
/// Reads straight through to the window's `width`, `height` and
/// `scale_factor` properties. It shares the property values rather than
/// the window, so it can safely outlive the window and then keeps
/// reporting the last extent the window had.
#[derive(Clone, Debug)]
pub struct GuiWindowExtentWatcher {
    width: PropertyReader<u32>,
    height: PropertyReader<u32>,
    scale_factor: PropertyReader<f32>,
}

impl GuiWindowExtentWatcher {
    pub fn new(window: &Window) -> Self {
        Self {
            width: window.width.reader(),
            height: window.height.reader(),
            scale_factor: window.scale_factor.reader(),
        }
    }
}

impl WindowExtentWatcher for GuiWindowExtentWatcher {
    fn width(&self) -> u32 {
        self.width.get()
    }

    fn height(&self) -> u32 {
        self.height.get()
    }

    fn scale_factor(&self) -> f32 {
        self.scale_factor.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casement_platform::headless::HeadlessPlatform;
    use std::rc::Rc;

    #[test]
    fn test_defaults_before_creation() {
        let window = Window::new(Rc::new(HeadlessPlatform::new()));
        let watcher = GuiWindowExtentWatcher::new(&window);

        assert_eq!(watcher.width(), 800);
        assert_eq!(watcher.height(), 600);
        assert_eq!(watcher.scale_factor(), 1.0);
    }

    #[test]
    fn test_tracks_window() {
        let platform = HeadlessPlatform::with_scale_factor(2.0);
        let mut window = Window::new(Rc::new(platform.clone()));
        let watcher = window.extent_watcher();

        window.width.set(1280);
        assert_eq!(watcher.width(), 1280);

        window.create().unwrap();
        assert_eq!(watcher.scale_factor(), 2.0);

        platform.simulate_resize(window.id(), 1024, 768);
        window.process_events();
        assert_eq!((watcher.width(), watcher.height()), (1024, 768));
    }

    #[test]
    fn test_survives_destroy_and_drop() {
        let platform = HeadlessPlatform::new();
        let mut window = Window::new(Rc::new(platform.clone()));
        let watcher: Box<dyn WindowExtentWatcher> = Box::new(window.extent_watcher());

        window.create().unwrap();
        window.height.set(480);
        window.destroy();
        assert_eq!(watcher.height(), 480);

        drop(window);
        assert_eq!(watcher.width(), 800);
        assert_eq!(watcher.height(), 480);
        assert_eq!(watcher.scale_factor(), 1.0);
    }
}
