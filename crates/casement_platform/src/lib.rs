//! Casement Platform Abstraction Layer
//!
//! This crate provides platform-agnostic traits and types for creating
//! windows and receiving their input and resize events.
//!
//! # Architecture
//!
//! - [`PlatformIntegration`] - allocates platform windows
//! - [`PlatformWindow`] - one live OS-level surface
//! - [`Event`] - resize and input notifications polled from a surface
//! - [`WindowConfig`] - window attributes, loadable from TOML
//!
//! # Backends
//!
//! - [`headless`] - in-process backend with call recording and event
//!   injection, used by tests and CI
//!
//! # Example
//!
//! ```rust
//! use casement_platform::prelude::*;
//! use casement_platform::headless::HeadlessPlatform;
//!
//! let platform = HeadlessPlatform::new();
//! let id = WindowId::next();
//! let mut window = platform.create_window(id, &WindowConfig::new("Demo")).unwrap();
//!
//! window.show().unwrap();
//! platform.simulate_resize(id, 1024, 768);
//! assert_eq!(window.poll_events(), vec![Event::resize(1024, 768)]);
//! ```

mod error;
mod event;
pub mod headless;
mod input;
mod platform;
mod window;

// Re-export all public types
pub use error::{PlatformError, Result};
pub use event::{
    Event, EventKind, KeyEvent, MouseButtonEvent, MouseMoveEvent, MouseWheelEvent, ResizeEvent,
};
pub use input::{Key, Modifiers, MouseButton, Position};
pub use platform::PlatformIntegration;
pub use window::{PlatformWindow, WindowConfig, WindowId, DEFAULT_TITLE};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{PlatformError, Result};
    pub use crate::event::{
        Event, EventKind, KeyEvent, MouseButtonEvent, MouseMoveEvent, MouseWheelEvent,
        ResizeEvent,
    };
    pub use crate::input::{Key, Modifiers, MouseButton, Position};
    pub use crate::platform::PlatformIntegration;
    pub use crate::window::{PlatformWindow, WindowConfig, WindowId};
}
