//! Casement GUI
//!
//! A window façade over the platform layer:
//!
//! - [`Window`] - reactive properties (title, size, visibility, cursor
//!   state, scale factor) mirrored onto a platform window, plus event
//!   dispatch to a [`WindowHandler`] and registered [`EventReceiver`]s
//! - [`WindowExtentWatcher`] - read-only extent view for renderers
//!
//! # Example
//!
//! ```rust
//! use casement_gui::prelude::*;
//! use casement_platform::headless::HeadlessPlatform;
//! use std::rc::Rc;
//!
//! let platform = HeadlessPlatform::new();
//! let mut window = Window::new(Rc::new(platform.clone()));
//! let extent = window.extent_watcher();
//!
//! window.width.set(1280);
//! window.create().unwrap();
//! window.visible.set(true);
//!
//! platform.simulate_resize(window.id(), 1024, 768);
//! window.process_events();
//! assert_eq!((extent.width(), extent.height()), (1024, 768));
//! ```

mod error;
mod extent;
mod handler;
mod receiver;
mod window;

pub use error::{GuiError, Result};
pub use extent::{GuiWindowExtentWatcher, WindowExtentWatcher};
pub use handler::WindowHandler;
pub use receiver::EventReceiver;
pub use window::{Window, MAX_NESTED_EVENTS};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{GuiError, Result};
    pub use crate::extent::{GuiWindowExtentWatcher, WindowExtentWatcher};
    pub use crate::handler::WindowHandler;
    pub use crate::receiver::EventReceiver;
    pub use crate::window::Window;
    pub use casement_core::Property;
    pub use casement_platform::{
        Event, EventKind, Key, KeyEvent, Modifiers, MouseButton, MouseButtonEvent,
        MouseMoveEvent, MouseWheelEvent, PlatformIntegration, PlatformWindow, Position,
        ResizeEvent, WindowConfig, WindowId,
    };
}
