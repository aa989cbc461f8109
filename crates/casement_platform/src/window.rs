//! Window abstraction and configuration

use crate::error::Result;
use crate::event::Event;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// Title used when none is configured
pub const DEFAULT_TITLE: &str = "KDGui";

/// Process-unique window identifier, used as the target of platform events
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(u64);

static NEXT_WINDOW_ID: AtomicU64 = AtomicU64::new(1);

impl WindowId {
    /// Allocate a fresh id
    pub fn next() -> Self {
        Self(NEXT_WINDOW_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

/// Window configuration
///
/// Doubles as the set of attributes handed to a backend when a platform
/// window is created. Can be loaded from the `[window]` table of a TOML file:
///
/// ```toml
/// [window]
/// title = "Viewer"
/// width = 1280
/// height = 720
/// visible = true
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Width in physical pixels
    pub width: u32,
    /// Height in physical pixels
    pub height: u32,
    /// Whether the window is shown once created
    pub visible: bool,
    /// Whether the OS cursor is shown over the window
    pub cursor_enabled: bool,
    /// Whether relative (raw) mouse motion is captured
    pub raw_mouse_input_enabled: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            width: 800,
            height: 600,
            visible: false,
            cursor_enabled: true,
            raw_mouse_input_enabled: false,
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default)]
    window: WindowConfig,
}

impl WindowConfig {
    /// Create a new window configuration with a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Parse the `[window]` table of a TOML document
    ///
    /// Missing keys, or a missing table, fall back to the defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(source)?;
        Ok(file.window)
    }

    /// Load from a TOML file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), ?config, "loaded window configuration");
        Ok(config)
    }

    /// Set the window title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the window size
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set whether the window is shown on creation
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Set whether the cursor is shown
    pub fn cursor_enabled(mut self, enabled: bool) -> Self {
        self.cursor_enabled = enabled;
        self
    }

    /// Set whether raw mouse input is captured
    pub fn raw_mouse_input_enabled(mut self, enabled: bool) -> Self {
        self.raw_mouse_input_enabled = enabled;
        self
    }
}

/// A live, backend-specific window
///
/// Created by [`PlatformIntegration::create_window`](crate::PlatformIntegration::create_window)
/// and exclusively owned by the toolkit window that requested it. Backends
/// create the surface hidden; showing it is left to the owner.
pub trait PlatformWindow {
    /// Id of the toolkit window this surface belongs to
    fn id(&self) -> WindowId;

    /// Release the OS resources. Further calls return [`PlatformError::WindowDestroyed`](crate::PlatformError::WindowDestroyed).
    fn destroy(&mut self) -> Result<()>;

    fn show(&mut self) -> Result<()>;

    fn hide(&mut self) -> Result<()>;

    /// Request a new drawable size in physical pixels
    fn resize(&mut self, width: u32, height: u32) -> Result<()>;

    fn set_title(&mut self, title: &str) -> Result<()>;

    /// Show or hide the OS cursor while it is over this window
    fn set_cursor_visible(&mut self, visible: bool) -> Result<()>;

    /// Toggle raw (relative, unaccelerated) mouse capture
    fn set_raw_mouse_input(&mut self, enabled: bool) -> Result<()>;

    /// Current drawable size in physical pixels
    fn size(&self) -> (u32, u32);

    /// Display scale factor (1.0 = no scaling)
    fn scale_factor(&self) -> f32;

    /// Drain events the platform produced for this window since the last poll
    fn poll_events(&mut self) -> Vec<Event>;

    /// Access to the concrete backend type
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlatformError;

    #[test]
    fn test_window_id_unique() {
        let a = WindowId::next();
        let b = WindowId::next();
        assert_ne!(a, b);
        assert!(b.as_raw() > a.as_raw());
        assert!(a.to_string().starts_with("window#"));
    }

    #[test]
    fn test_config_defaults() {
        let config = WindowConfig::default();
        assert_eq!(config.title, "KDGui");
        assert_eq!((config.width, config.height), (800, 600));
        assert!(!config.visible);
        assert!(config.cursor_enabled);
        assert!(!config.raw_mouse_input_enabled);
    }

    #[test]
    fn test_config_builder() {
        let config = WindowConfig::new("Viewer")
            .size(1280, 720)
            .visible(true)
            .cursor_enabled(false)
            .raw_mouse_input_enabled(true);
        assert_eq!(config.title, "Viewer");
        assert_eq!((config.width, config.height), (1280, 720));
        assert!(config.visible);
        assert!(!config.cursor_enabled);
        assert!(config.raw_mouse_input_enabled);
    }

    #[test]
    fn test_config_from_toml() {
        let config = WindowConfig::from_toml_str(
            r#"
            [window]
            title = "Viewer"
            width = 1280
            visible = true
            "#,
        )
        .unwrap();

        assert_eq!(config.title, "Viewer");
        assert_eq!(config.width, 1280);
        assert_eq!(config.height, 600);
        assert!(config.visible);
    }

    #[test]
    fn test_config_missing_table() {
        let config = WindowConfig::from_toml_str("").unwrap();
        assert_eq!(config, WindowConfig::default());
    }

    #[test]
    fn test_config_invalid() {
        let err = WindowConfig::from_toml_str("[window]\nwidth = -3\n").unwrap_err();
        assert!(matches!(err, PlatformError::Config(_)));
    }

    #[test]
    fn test_config_load_missing_file() {
        let err = WindowConfig::load("/nonexistent/casement/window.toml").unwrap_err();
        assert!(matches!(err, PlatformError::Io(_)));
    }

    #[test]
    fn test_config_load_file() {
        let path = std::env::temp_dir().join(format!(
            "casement-window-config-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[window]\ntitle = \"From disk\"\nheight = 480\n").unwrap();

        let config = WindowConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.title, "From disk");
        assert_eq!(config.height, 480);
    }
}
