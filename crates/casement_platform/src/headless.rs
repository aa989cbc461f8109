//! Headless backend
//!
//! An in-process platform without a display. Every call a toolkit window
//! makes on its surface is recorded, and OS-side activity (user resizes,
//! DPI changes, input) can be injected. Resizes requested by the owner are
//! applied synchronously and are not echoed back as events.

use crate::error::{PlatformError, Result};
use crate::event::Event;
use crate::platform::PlatformIntegration;
use crate::window::{PlatformWindow, WindowConfig, WindowId};
use rustc_hash::FxHashMap;
use std::any::Any;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// A call made on the headless platform
#[derive(Clone, Debug, PartialEq)]
pub enum PlatformCall {
    Create {
        id: WindowId,
        title: String,
        width: u32,
        height: u32,
    },
    Destroy(WindowId),
    Show(WindowId),
    Hide(WindowId),
    Resize {
        id: WindowId,
        width: u32,
        height: u32,
    },
    SetTitle {
        id: WindowId,
        title: String,
    },
    SetCursorVisible {
        id: WindowId,
        visible: bool,
    },
    SetRawMouseInput {
        id: WindowId,
        enabled: bool,
    },
}

impl PlatformCall {
    /// The window the call was made for
    pub fn window_id(&self) -> WindowId {
        match self {
            PlatformCall::Create { id, .. }
            | PlatformCall::Resize { id, .. }
            | PlatformCall::SetTitle { id, .. }
            | PlatformCall::SetCursorVisible { id, .. }
            | PlatformCall::SetRawMouseInput { id, .. } => *id,
            PlatformCall::Destroy(id) | PlatformCall::Show(id) | PlatformCall::Hide(id) => *id,
        }
    }
}

/// Observable state of a headless surface
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceState {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub scale_factor: f32,
    pub visible: bool,
    pub cursor_visible: bool,
    pub raw_mouse_input: bool,
}

struct Surface {
    state: SurfaceState,
    pending: VecDeque<Event>,
}

struct HeadlessState {
    calls: Vec<PlatformCall>,
    surfaces: FxHashMap<WindowId, Surface>,
    scale_factor: f32,
    available: bool,
    fail_next_create: Option<String>,
    fail_next_resize: Option<String>,
}

/// Headless platform integration
///
/// Cloning yields another handle to the same platform, so a test can keep
/// one clone for inspection while windows hold another.
#[derive(Clone)]
pub struct HeadlessPlatform {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self::with_scale_factor(1.0)
    }

    /// Platform whose display reports `scale_factor`
    pub fn with_scale_factor(scale_factor: f32) -> Self {
        Self {
            state: Rc::new(RefCell::new(HeadlessState {
                calls: Vec::new(),
                surfaces: FxHashMap::default(),
                scale_factor,
                available: true,
                fail_next_create: None,
                fail_next_resize: None,
            })),
        }
    }

    /// Simulate losing (or regaining) the display connection
    pub fn set_available(&self, available: bool) {
        self.state.borrow_mut().available = available;
    }

    /// Make the next window allocation fail
    pub fn fail_next_create(&self, reason: impl Into<String>) {
        self.state.borrow_mut().fail_next_create = Some(reason.into());
    }

    /// Make the next resize request fail
    pub fn fail_next_resize(&self, reason: impl Into<String>) {
        self.state.borrow_mut().fail_next_resize = Some(reason.into());
    }

    /// All calls made so far, in order
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.state.borrow().calls.clone()
    }

    /// Calls made for one window, in order
    pub fn calls_for(&self, id: WindowId) -> Vec<PlatformCall> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|call| call.window_id() == id)
            .cloned()
            .collect()
    }

    /// Number of recorded calls matching `predicate`
    pub fn count_calls(&self, predicate: impl Fn(&PlatformCall) -> bool) -> usize {
        self.state.borrow().calls.iter().filter(|c| predicate(c)).count()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Snapshot of a live surface
    pub fn surface(&self, id: WindowId) -> Option<SurfaceState> {
        self.state
            .borrow()
            .surfaces
            .get(&id)
            .map(|surface| surface.state.clone())
    }

    /// Number of surfaces not yet destroyed
    pub fn live_windows(&self) -> usize {
        self.state.borrow().surfaces.len()
    }

    /// Queue an event for a window, as if the OS produced it
    ///
    /// Returns `false` if the window has no live surface.
    pub fn post_event(&self, id: WindowId, event: Event) -> bool {
        match self.state.borrow_mut().surfaces.get_mut(&id) {
            Some(surface) => {
                surface.pending.push_back(event);
                true
            }
            None => false,
        }
    }

    /// Resize a surface from the OS side (e.g. the user dragged its border)
    pub fn simulate_resize(&self, id: WindowId, width: u32, height: u32) -> bool {
        match self.state.borrow_mut().surfaces.get_mut(&id) {
            Some(surface) => {
                surface.state.width = width;
                surface.state.height = height;
                surface.pending.push_back(Event::resize(width, height));
                true
            }
            None => false,
        }
    }

    /// Move a surface to a display with a different scale factor
    pub fn simulate_scale_factor(&self, id: WindowId, scale_factor: f32) -> bool {
        match self.state.borrow_mut().surfaces.get_mut(&id) {
            Some(surface) => {
                surface.state.scale_factor = scale_factor;
                let (width, height) = (surface.state.width, surface.state.height);
                surface.pending.push_back(Event::resize(width, height));
                true
            }
            None => false,
        }
    }
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformIntegration for HeadlessPlatform {
    fn name(&self) -> &'static str {
        "headless"
    }

    fn scale_factor(&self) -> f32 {
        self.state.borrow().scale_factor
    }

    fn create_window(
        &self,
        id: WindowId,
        config: &WindowConfig,
    ) -> Result<Box<dyn PlatformWindow>> {
        let mut state = self.state.borrow_mut();

        if !state.available {
            return Err(PlatformError::Unavailable(
                "no display connection".to_string(),
            ));
        }
        if let Some(reason) = state.fail_next_create.take() {
            return Err(PlatformError::WindowCreation(reason));
        }
        if state.surfaces.contains_key(&id) {
            return Err(PlatformError::WindowCreation(format!(
                "{id} already has a surface"
            )));
        }

        let scale_factor = state.scale_factor;
        state.surfaces.insert(
            id,
            Surface {
                state: SurfaceState {
                    title: config.title.clone(),
                    width: config.width,
                    height: config.height,
                    scale_factor,
                    visible: false,
                    cursor_visible: true,
                    raw_mouse_input: false,
                },
                pending: VecDeque::new(),
            },
        );
        state.calls.push(PlatformCall::Create {
            id,
            title: config.title.clone(),
            width: config.width,
            height: config.height,
        });
        tracing::debug!(%id, width = config.width, height = config.height, "headless surface created");

        Ok(Box::new(HeadlessWindow {
            id,
            state: Rc::clone(&self.state),
            destroyed: false,
        }))
    }
}

/// A surface owned by the headless platform
pub struct HeadlessWindow {
    id: WindowId,
    state: Rc<RefCell<HeadlessState>>,
    destroyed: bool,
}

impl HeadlessWindow {
    /// Snapshot of this surface
    pub fn surface(&self) -> Option<SurfaceState> {
        self.state
            .borrow()
            .surfaces
            .get(&self.id)
            .map(|surface| surface.state.clone())
    }

    fn apply(&mut self, call: PlatformCall, f: impl FnOnce(&mut SurfaceState)) -> Result<()> {
        if self.destroyed {
            return Err(PlatformError::WindowDestroyed);
        }
        let mut state = self.state.borrow_mut();
        let surface = state
            .surfaces
            .get_mut(&self.id)
            .ok_or(PlatformError::WindowDestroyed)?;
        f(&mut surface.state);
        state.calls.push(call);
        Ok(())
    }
}

impl PlatformWindow for HeadlessWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    fn destroy(&mut self) -> Result<()> {
        if self.destroyed {
            return Err(PlatformError::WindowDestroyed);
        }
        self.destroyed = true;
        let mut state = self.state.borrow_mut();
        state.surfaces.remove(&self.id);
        state.calls.push(PlatformCall::Destroy(self.id));
        tracing::debug!(id = %self.id, "headless surface destroyed");
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        let id = self.id;
        self.apply(PlatformCall::Show(id), |s| s.visible = true)
    }

    fn hide(&mut self) -> Result<()> {
        let id = self.id;
        self.apply(PlatformCall::Hide(id), |s| s.visible = false)
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if let Some(reason) = self.state.borrow_mut().fail_next_resize.take() {
            return Err(PlatformError::Other(reason));
        }
        let id = self.id;
        self.apply(PlatformCall::Resize { id, width, height }, |s| {
            s.width = width;
            s.height = height;
        })
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        let id = self.id;
        let call = PlatformCall::SetTitle {
            id,
            title: title.to_string(),
        };
        self.apply(call, |s| s.title = title.to_string())
    }

    fn set_cursor_visible(&mut self, visible: bool) -> Result<()> {
        let id = self.id;
        self.apply(PlatformCall::SetCursorVisible { id, visible }, |s| {
            s.cursor_visible = visible
        })
    }

    fn set_raw_mouse_input(&mut self, enabled: bool) -> Result<()> {
        let id = self.id;
        self.apply(PlatformCall::SetRawMouseInput { id, enabled }, |s| {
            s.raw_mouse_input = enabled
        })
    }

    fn size(&self) -> (u32, u32) {
        self.surface()
            .map_or((0, 0), |surface| (surface.width, surface.height))
    }

    fn scale_factor(&self) -> f32 {
        self.surface()
            .map_or(1.0, |surface| surface.scale_factor)
    }

    fn poll_events(&mut self) -> Vec<Event> {
        self.state
            .borrow_mut()
            .surfaces
            .get_mut(&self.id)
            .map(|surface| surface.pending.drain(..).collect())
            .unwrap_or_default()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Drop for HeadlessWindow {
    fn drop(&mut self) {
        if !self.destroyed {
            let _ = self.destroy();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(platform: &HeadlessPlatform) -> (WindowId, Box<dyn PlatformWindow>) {
        let id = WindowId::next();
        let window = platform
            .create_window(id, &WindowConfig::new("Test").size(320, 240))
            .unwrap();
        (id, window)
    }

    #[test]
    fn test_create_records_call() {
        let platform = HeadlessPlatform::new();
        let (id, window) = create(&platform);

        assert_eq!(window.id(), id);
        assert_eq!(window.size(), (320, 240));
        assert_eq!(platform.live_windows(), 1);
        assert_eq!(
            platform.calls(),
            vec![PlatformCall::Create {
                id,
                title: "Test".to_string(),
                width: 320,
                height: 240,
            }]
        );

        let surface = platform.surface(id).unwrap();
        assert!(!surface.visible);
        assert!(surface.cursor_visible);
    }

    #[test]
    fn test_create_failures() {
        let platform = HeadlessPlatform::new();

        platform.fail_next_create("out of handles");
        let err = platform
            .create_window(WindowId::next(), &WindowConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, PlatformError::WindowCreation(_)));

        platform.set_available(false);
        let err = platform
            .create_window(WindowId::next(), &WindowConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, PlatformError::Unavailable(_)));

        assert_eq!(platform.live_windows(), 0);
        assert!(platform.calls().is_empty());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let platform = HeadlessPlatform::new();
        let (id, _window) = create(&platform);
        assert!(platform
            .create_window(id, &WindowConfig::default())
            .is_err());
    }

    #[test]
    fn test_surface_operations() {
        let platform = HeadlessPlatform::with_scale_factor(2.0);
        let (id, mut window) = create(&platform);

        window.show().unwrap();
        window.resize(640, 480).unwrap();
        window.set_title("Renamed").unwrap();
        window.set_cursor_visible(false).unwrap();
        window.set_raw_mouse_input(true).unwrap();

        let surface = platform.surface(id).unwrap();
        assert_eq!(
            surface,
            SurfaceState {
                title: "Renamed".to_string(),
                width: 640,
                height: 480,
                scale_factor: 2.0,
                visible: true,
                cursor_visible: false,
                raw_mouse_input: true,
            }
        );
        assert_eq!(window.scale_factor(), 2.0);
        assert_eq!(platform.calls_for(id).len(), 6);
    }

    #[test]
    fn test_resize_failure() {
        let platform = HeadlessPlatform::new();
        let (id, mut window) = create(&platform);

        platform.fail_next_resize("compositor refused");
        assert!(window.resize(1, 1).is_err());
        assert!(window.resize(2, 2).is_ok());
        assert_eq!(window.size(), (2, 2));
        assert_eq!(
            platform.count_calls(|c| matches!(c, PlatformCall::Resize { .. })),
            1
        );
        assert_eq!(platform.surface(id).unwrap().width, 2);
    }

    #[test]
    fn test_destroy() {
        let platform = HeadlessPlatform::new();
        let (id, mut window) = create(&platform);

        window.destroy().unwrap();
        assert!(matches!(window.destroy(), Err(PlatformError::WindowDestroyed)));
        assert!(matches!(window.show(), Err(PlatformError::WindowDestroyed)));
        assert_eq!(platform.live_windows(), 0);
        assert!(platform.surface(id).is_none());

        drop(window);
        assert_eq!(
            platform.count_calls(|c| matches!(c, PlatformCall::Destroy(_))),
            1
        );
    }

    #[test]
    fn test_drop_releases_surface() {
        let platform = HeadlessPlatform::new();
        let (id, window) = create(&platform);
        drop(window);

        assert_eq!(platform.live_windows(), 0);
        assert_eq!(platform.calls().last(), Some(&PlatformCall::Destroy(id)));
    }

    #[test]
    fn test_events_are_queued_per_window() {
        let platform = HeadlessPlatform::new();
        let (a, mut window_a) = create(&platform);
        let (b, mut window_b) = create(&platform);

        assert!(platform.post_event(a, Event::mouse_move(1, 1)));
        assert!(platform.simulate_resize(b, 1024, 768));
        assert!(!platform.post_event(WindowId::next(), Event::mouse_move(0, 0)));

        assert_eq!(window_a.poll_events(), vec![Event::mouse_move(1, 1)]);
        assert!(window_a.poll_events().is_empty());
        assert_eq!(window_b.poll_events(), vec![Event::resize(1024, 768)]);
        assert_eq!(window_b.size(), (1024, 768));

        // OS-side resizes are not calls made by the owner
        assert!(platform
            .calls()
            .iter()
            .all(|c| !matches!(c, PlatformCall::Resize { .. })));
    }

    #[test]
    fn test_simulate_scale_factor() {
        let platform = HeadlessPlatform::new();
        let (id, mut window) = create(&platform);

        assert!(platform.simulate_scale_factor(id, 1.5));
        assert_eq!(window.scale_factor(), 1.5);
        assert_eq!(window.poll_events(), vec![Event::resize(320, 240)]);
    }

    #[test]
    fn test_downcast() {
        let platform = HeadlessPlatform::new();
        let (_, window) = create(&platform);
        assert!(window.as_any().downcast_ref::<HeadlessWindow>().is_some());
    }
}
