//! The toolkit window
//!
//! A [`Window`] is a set of reactive properties plus, once created, one
//! platform window. Changing a property pushes the change to the platform
//! window; events coming back from the platform update the properties and
//! are then handed to the window's [`WindowHandler`] and to every
//! registered [`EventReceiver`].
//!
//! ```ignore
//! let mut window = Window::new(Rc::new(HeadlessPlatform::new()));
//! window.title.set("Viewer".into());
//! window.width.set(1280);
//! window.create()?;          // platform window created at 1280x600
//! window.visible.set(true);  // shown
//! window.process_events();   // resize/input from the platform
//! ```

use crate::error::{GuiError, Result};
use crate::extent::GuiWindowExtentWatcher;
use crate::handler::WindowHandler;
use crate::receiver::{EventReceiver, ReceiverList};
use casement_core::{ConnectionHandle, Property};
use casement_platform::{
    Event, PlatformIntegration, PlatformWindow, Position, WindowConfig, WindowId,
};
use std::cell::{Ref, RefCell, RefMut};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

/// Upper bound on events a handler may dispatch to its own window while
/// one event is being handled.
///
/// Nested events are queued and delivered after the current one; a handler
/// that answers every event with another would otherwise never settle.
pub const MAX_NESTED_EVENTS: usize = 32;

/// State shared between the window and its property reactions
struct WindowCore {
    id: WindowId,
    integration: Rc<dyn PlatformIntegration>,
    platform: Option<Box<dyn PlatformWindow>>,
}

/// Subscriptions the window holds on its own properties
struct Reactions {
    title: ConnectionHandle,
    visible: ConnectionHandle,
    cursor_enabled: ConnectionHandle,
    raw_mouse_input_enabled: ConnectionHandle,
    width: ConnectionHandle,
    height: ConnectionHandle,
}

/// An on-screen surface with reactive properties
pub struct Window {
    pub title: Property<String>,
    pub visible: Property<bool>,
    pub cursor_enabled: Property<bool>,
    pub raw_mouse_input_enabled: Property<bool>,
    /// Width in physical pixels
    pub width: Property<u32>,
    /// Height in physical pixels
    pub height: Property<u32>,
    /// Last cursor position reported by the platform
    pub cursor_position: Property<Position>,
    /// Device pixel ratio of the display the window is on
    pub scale_factor: Property<f32>,

    core: Rc<RefCell<WindowCore>>,
    reactions: Reactions,
    receivers: ReceiverList,
    handler: Option<Box<dyn WindowHandler>>,
    dispatching: bool,
    pending: VecDeque<(WindowId, Event)>,
}

fn report(id: WindowId, op: &'static str, result: casement_platform::Result<()>) {
    if let Err(err) = result {
        tracing::warn!(window = %id, error = %err, "platform {} failed", op);
    }
}

/// Run `f` on the platform window, if the window is alive and created
fn with_platform(
    core: &Weak<RefCell<WindowCore>>,
    op: &'static str,
    f: impl FnOnce(&mut dyn PlatformWindow) -> casement_platform::Result<()>,
) {
    let Some(core) = core.upgrade() else {
        return;
    };
    // Held by a `platform_window()` guard
    let Ok(mut core) = core.try_borrow_mut() else {
        tracing::warn!("platform window is borrowed, skipping platform {}", op);
        return;
    };
    let id = core.id;
    if let Some(platform) = core.platform.as_deref_mut() {
        report(id, op, f(platform));
    }
}

impl Window {
    /// Create a window with default properties
    pub fn new(integration: Rc<dyn PlatformIntegration>) -> Self {
        Self::from_config(integration, &WindowConfig::default())
    }

    /// Create a window whose properties start from `config`
    pub fn from_config(integration: Rc<dyn PlatformIntegration>, config: &WindowConfig) -> Self {
        let title = Property::new(config.title.clone());
        let visible = Property::new(config.visible);
        let cursor_enabled = Property::new(config.cursor_enabled);
        let raw_mouse_input_enabled = Property::new(config.raw_mouse_input_enabled);
        let width = Property::new(config.width);
        let height = Property::new(config.height);
        let scale_factor = Property::new(integration.scale_factor());

        let core = Rc::new(RefCell::new(WindowCore {
            id: WindowId::next(),
            integration,
            platform: None,
        }));
        let weak = Rc::downgrade(&core);

        let reactions = Reactions {
            title: {
                let core = weak.clone();
                title.subscribe(move |title: &String| {
                    with_platform(&core, "set_title", |pw| pw.set_title(title))
                })
            },
            visible: {
                let core = weak.clone();
                visible.subscribe(move |&visible: &bool| {
                    if visible {
                        with_platform(&core, "show", |pw| pw.show())
                    } else {
                        with_platform(&core, "hide", |pw| pw.hide())
                    }
                })
            },
            cursor_enabled: {
                let core = weak.clone();
                cursor_enabled.subscribe(move |&enabled: &bool| {
                    with_platform(&core, "set_cursor_visible", |pw| {
                        pw.set_cursor_visible(enabled)
                    })
                })
            },
            raw_mouse_input_enabled: {
                let core = weak.clone();
                raw_mouse_input_enabled.subscribe(move |&enabled: &bool| {
                    with_platform(&core, "set_raw_mouse_input", |pw| {
                        pw.set_raw_mouse_input(enabled)
                    })
                })
            },
            width: {
                let core = weak.clone();
                let height = height.downgrade();
                width.subscribe(move |&width: &u32| {
                    let Some(height) = height.get() else {
                        return;
                    };
                    with_platform(&core, "resize", |pw| pw.resize(width, height))
                })
            },
            height: {
                let core = weak;
                let width = width.downgrade();
                height.subscribe(move |&height: &u32| {
                    let Some(width) = width.get() else {
                        return;
                    };
                    with_platform(&core, "resize", |pw| pw.resize(width, height))
                })
            },
        };

        Self {
            title,
            visible,
            cursor_enabled,
            raw_mouse_input_enabled,
            width,
            height,
            cursor_position: Property::new(Position::default()),
            scale_factor,
            core,
            reactions,
            receivers: ReceiverList::default(),
            handler: None,
            dispatching: false,
            pending: VecDeque::new(),
        }
    }

    /// Create a window with default properties and an event handler
    pub fn with_handler(
        integration: Rc<dyn PlatformIntegration>,
        handler: impl WindowHandler + 'static,
    ) -> Self {
        let mut window = Self::new(integration);
        window.set_handler(handler);
        window
    }

    /// Replace the window's event handler
    pub fn set_handler(&mut self, handler: impl WindowHandler + 'static) {
        self.handler = Some(Box::new(handler));
    }

    /// Remove the window's event handler
    pub fn clear_handler(&mut self) {
        self.handler = None;
    }

    /// Target id of events addressed to this window
    pub fn id(&self) -> WindowId {
        self.core.borrow().id
    }

    /// Snapshot of the current property values as a configuration
    pub fn config(&self) -> WindowConfig {
        WindowConfig {
            title: self.title.get(),
            width: self.width.get(),
            height: self.height.get(),
            visible: self.visible.get(),
            cursor_enabled: self.cursor_enabled.get(),
            raw_mouse_input_enabled: self.raw_mouse_input_enabled.get(),
        }
    }

    /// Switch to another backend; only possible while not created
    pub fn set_platform_integration(
        &mut self,
        integration: Rc<dyn PlatformIntegration>,
    ) -> Result<()> {
        if self.is_created() {
            return Err(GuiError::InvalidOperation(
                "cannot change the platform integration of a created window".to_string(),
            ));
        }
        self.core.borrow_mut().integration = integration;
        Ok(())
    }

    /// Allocate the platform window from the current property values
    ///
    /// Calling this on a window that is already created does nothing. On
    /// failure the window stays not created and the error is returned.
    pub fn create(&mut self) -> Result<()> {
        if self.is_created() {
            tracing::debug!(window = %self.id(), "window already created, ignoring create()");
            return Ok(());
        }

        let config = self.config();
        let (id, integration) = {
            let core = self.core.borrow();
            (core.id, Rc::clone(&core.integration))
        };

        let mut platform = integration.create_window(id, &config)?;

        // State the backend does not take at allocation time
        if !config.cursor_enabled {
            report(id, "set_cursor_visible", platform.set_cursor_visible(false));
        }
        if config.raw_mouse_input_enabled {
            report(id, "set_raw_mouse_input", platform.set_raw_mouse_input(true));
        }
        if config.visible {
            report(id, "show", platform.show());
        }

        let (width, height) = platform.size();
        let scale_factor = platform.scale_factor();
        self.core.borrow_mut().platform = Some(platform);

        self.sync_extent(width, height, Some(scale_factor));

        tracing::debug!(
            window = %id,
            platform = integration.name(),
            width,
            height,
            scale_factor,
            "window created"
        );
        Ok(())
    }

    /// Release the platform window; does nothing if not created
    pub fn destroy(&mut self) {
        let platform = self.core.borrow_mut().platform.take();
        if let Some(mut platform) = platform {
            let id = platform.id();
            report(id, "destroy", platform.destroy());
            tracing::debug!(window = %id, "window destroyed");
        }
    }

    /// Whether a platform window is currently held
    pub fn is_created(&self) -> bool {
        self.core.borrow().platform.is_some()
    }

    /// The platform window, or `None` if not created
    ///
    /// Property changes made while the returned guard is alive are not
    /// forwarded to the platform window; they are logged and skipped.
    pub fn platform_window(&self) -> Option<Ref<'_, dyn PlatformWindow + 'static>> {
        Ref::filter_map(self.core.borrow(), |core| core.platform.as_deref()).ok()
    }

    /// Mutable access to the platform window, or `None` if not created
    pub fn platform_window_mut(&mut self) -> Option<RefMut<'_, dyn PlatformWindow + 'static>> {
        RefMut::filter_map(self.core.borrow_mut(), |core| core.platform.as_deref_mut()).ok()
    }

    /// The platform window downcast to a concrete backend type
    pub fn platform_window_as<T: 'static>(&self) -> Option<Ref<'_, T>> {
        Ref::filter_map(self.core.borrow(), |core| {
            core.platform
                .as_deref()
                .and_then(|platform| platform.as_any().downcast_ref::<T>())
        })
        .ok()
    }

    /// Mutable access to the platform window as a concrete backend type
    pub fn platform_window_as_mut<T: 'static>(&mut self) -> Option<RefMut<'_, T>> {
        RefMut::filter_map(self.core.borrow_mut(), |core| {
            core.platform
                .as_deref_mut()
                .and_then(|platform| platform.as_any_mut().downcast_mut::<T>())
        })
        .ok()
    }

    /// Start forwarding events to `receiver`
    ///
    /// Only a weak reference is kept. Returns `false` if the receiver was
    /// already registered.
    pub fn register_event_receiver<R>(&mut self, receiver: &Rc<RefCell<R>>) -> bool
    where
        R: EventReceiver + 'static,
    {
        self.receivers.register(receiver)
    }

    /// Stop forwarding events to `receiver`
    ///
    /// Returns `false` if the receiver was not registered.
    pub fn unregister_event_receiver<R>(&mut self, receiver: &Rc<RefCell<R>>) -> bool
    where
        R: EventReceiver + 'static,
    {
        self.receivers.unregister(receiver)
    }

    /// Whether `receiver` is currently registered
    pub fn is_event_receiver_registered<R>(&self, receiver: &Rc<RefCell<R>>) -> bool
    where
        R: EventReceiver + 'static,
    {
        self.receivers.contains(receiver)
    }

    /// Number of live registered receivers
    pub fn event_receiver_count(&self) -> usize {
        self.receivers.len()
    }

    /// Read-only extent view for renderers and similar consumers
    pub fn extent_watcher(&self) -> GuiWindowExtentWatcher {
        GuiWindowExtentWatcher::new(self)
    }

    /// Dispatch one event
    ///
    /// Events targeted at this window first update its properties (resize
    /// updates the extent, mouse motion the cursor position), then go to
    /// the window's handler. Every event, whatever its target, is then
    /// forwarded to the registered receivers in registration order.
    ///
    /// Events dispatched from inside a handler are queued and delivered,
    /// in order, once the current event has reached every receiver. At most
    /// [`MAX_NESTED_EVENTS`] are delivered per outer event; the rest are
    /// dropped with a warning.
    pub fn event(&mut self, target: WindowId, event: &Event) {
        if self.dispatching {
            tracing::trace!(window = %self.id(), %target, kind = ?event.kind(), "queueing nested event");
            self.pending.push_back((target, event.clone()));
            return;
        }

        self.dispatching = true;
        self.dispatch(target, event);

        let mut nested = 0;
        while let Some((target, event)) = self.pending.pop_front() {
            if nested == MAX_NESTED_EVENTS {
                tracing::warn!(
                    window = %self.id(),
                    dropped = self.pending.len() + 1,
                    "too many nested events, dropping the rest"
                );
                self.pending.clear();
                break;
            }
            nested += 1;
            self.dispatch(target, &event);
        }
        self.dispatching = false;
    }

    /// Poll the platform window and dispatch everything it reported
    ///
    /// Returns the number of events taken from the platform. Called from a
    /// handler, the events are queued rather than dispatched immediately.
    pub fn process_events(&mut self) -> usize {
        let events = match self.core.borrow_mut().platform.as_deref_mut() {
            Some(platform) => platform.poll_events(),
            None => return 0,
        };

        let id = self.id();
        for event in &events {
            self.event(id, event);
        }
        events.len()
    }

    fn dispatch(&mut self, target: WindowId, event: &Event) {
        tracing::trace!(window = %self.id(), %target, kind = ?event.kind(), "dispatching event");

        if target == self.id() {
            self.apply_event(event);
            self.invoke_handler(event);
        }

        self.receivers.dispatch(target, event);
    }

    fn apply_event(&mut self, event: &Event) {
        match event {
            Event::Resize(resize) => {
                let scale_factor = self
                    .platform_window()
                    .map(|platform| platform.scale_factor());
                self.sync_extent(resize.width, resize.height, scale_factor);
            }
            Event::MouseMove(motion) => {
                self.cursor_position.set(motion.position);
            }
            _ => {}
        }
    }

    fn invoke_handler(&mut self, event: &Event) {
        let Some(mut handler) = self.handler.take() else {
            return;
        };

        match event {
            Event::Resize(ev) => handler.resize_event(self, ev),
            Event::KeyPress(ev) => handler.key_press_event(self, ev),
            Event::KeyRelease(ev) => handler.key_release_event(self, ev),
            Event::MouseMove(ev) => handler.mouse_move_event(self, ev),
            Event::MousePress(ev) => handler.mouse_press_event(self, ev),
            Event::MouseRelease(ev) => handler.mouse_release_event(self, ev),
            Event::MouseWheel(ev) => handler.mouse_wheel_event(self, ev),
        }

        // The handler may have installed a replacement
        if self.handler.is_none() {
            self.handler = Some(handler);
        }
    }

    /// Adopt the platform's extent without echoing a resize request back
    fn sync_extent(&mut self, width: u32, height: u32, scale_factor: Option<f32>) {
        self.width.block(self.reactions.width);
        self.height.block(self.reactions.height);

        self.width.set(width);
        self.height.set(height);

        self.width.unblock(self.reactions.width);
        self.height.unblock(self.reactions.height);

        if let Some(scale_factor) = scale_factor {
            self.scale_factor.set(scale_factor);
        }
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        self.destroy();

        // Extent watchers may keep the property values alive past this point
        self.title.disconnect(self.reactions.title);
        self.visible.disconnect(self.reactions.visible);
        self.cursor_enabled
            .disconnect(self.reactions.cursor_enabled);
        self.raw_mouse_input_enabled
            .disconnect(self.reactions.raw_mouse_input_enabled);
        self.width.disconnect(self.reactions.width);
        self.height.disconnect(self.reactions.height);
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.id())
            .field("created", &self.is_created())
            .field("title", &self.title)
            .field("visible", &self.visible)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("scale_factor", &self.scale_factor)
            .field("receivers", &self.receivers.len())
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}
