//! Per-window event handlers

use crate::window::Window;
use casement_platform::{KeyEvent, MouseButtonEvent, MouseMoveEvent, MouseWheelEvent, ResizeEvent};

/// Overridable reactions to the events a window receives
///
/// Every method defaults to doing nothing, so implementors only override
/// the kinds they care about. Handlers run after the window has applied
/// its own bookkeeping (extent and cursor position are already updated)
/// and before the event is forwarded to registered receivers. The window is
/// passed mutably so handlers may change its properties.
///
/// Events a handler dispatches to its own window (through
/// [`Window::event`] or [`Window::process_events`]) are queued and reach
/// the handler after the current method returns, bounded by
/// [`MAX_NESTED_EVENTS`](crate::MAX_NESTED_EVENTS).
pub trait WindowHandler {
    fn resize_event(&mut self, _window: &mut Window, _event: &ResizeEvent) {}

    fn mouse_press_event(&mut self, _window: &mut Window, _event: &MouseButtonEvent) {}

    fn mouse_release_event(&mut self, _window: &mut Window, _event: &MouseButtonEvent) {}

    fn mouse_move_event(&mut self, _window: &mut Window, _event: &MouseMoveEvent) {}

    fn mouse_wheel_event(&mut self, _window: &mut Window, _event: &MouseWheelEvent) {}

    fn key_press_event(&mut self, _window: &mut Window, _event: &KeyEvent) {}

    fn key_release_event(&mut self, _window: &mut Window, _event: &KeyEvent) {}
}
