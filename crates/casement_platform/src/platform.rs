//! Platform trait and abstraction

use crate::error::Result;
use crate::window::{PlatformWindow, WindowConfig, WindowId};

/// Platform abstraction trait
///
/// Implemented by each backend to allocate platform windows. Toolkit windows
/// hold the integration behind an `Rc` and ask it for a surface on `create()`.
pub trait PlatformIntegration {
    /// Get the platform name, e.g. "headless"
    fn name(&self) -> &'static str;

    /// Default display scale factor
    ///
    /// Individual windows may report a different value.
    fn scale_factor(&self) -> f32;

    /// Allocate a platform window for `id`
    ///
    /// The surface is created hidden with `config`'s title and size. On error
    /// no resources are left behind.
    fn create_window(&self, id: WindowId, config: &WindowConfig)
        -> Result<Box<dyn PlatformWindow>>;
}
