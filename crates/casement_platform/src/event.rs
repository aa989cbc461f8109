//! Platform events delivered to windows

use crate::input::{Key, Modifiers, MouseButton, Position};

/// Events a platform window reports back to its owner
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The window was resized by the platform (user drag, DPI change, ...)
    Resize(ResizeEvent),
    /// A key was pressed
    KeyPress(KeyEvent),
    /// A key was released
    KeyRelease(KeyEvent),
    /// The cursor moved
    MouseMove(MouseMoveEvent),
    /// A mouse button was pressed
    MousePress(MouseButtonEvent),
    /// A mouse button was released
    MouseRelease(MouseButtonEvent),
    /// The wheel or trackpad scrolled
    MouseWheel(MouseWheelEvent),
}

/// Discriminant of [`Event`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Resize,
    KeyPress,
    KeyRelease,
    MouseMove,
    MousePress,
    MouseRelease,
    MouseWheel,
}

impl Event {
    /// The kind of this event
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Resize(_) => EventKind::Resize,
            Event::KeyPress(_) => EventKind::KeyPress,
            Event::KeyRelease(_) => EventKind::KeyRelease,
            Event::MouseMove(_) => EventKind::MouseMove,
            Event::MousePress(_) => EventKind::MousePress,
            Event::MouseRelease(_) => EventKind::MouseRelease,
            Event::MouseWheel(_) => EventKind::MouseWheel,
        }
    }

    /// Whether this is a keyboard or mouse event
    pub fn is_input(&self) -> bool {
        !matches!(self, Event::Resize(_))
    }

    pub fn resize(width: u32, height: u32) -> Self {
        Event::Resize(ResizeEvent { width, height })
    }

    pub fn key_press(key: Key, modifiers: Modifiers) -> Self {
        Event::KeyPress(KeyEvent { key, modifiers })
    }

    pub fn key_release(key: Key, modifiers: Modifiers) -> Self {
        Event::KeyRelease(KeyEvent { key, modifiers })
    }

    pub fn mouse_move(x: i64, y: i64) -> Self {
        Event::MouseMove(MouseMoveEvent {
            position: Position::new(x, y),
        })
    }

    pub fn mouse_press(button: MouseButton, x: i64, y: i64) -> Self {
        Event::MousePress(MouseButtonEvent {
            button,
            position: Position::new(x, y),
        })
    }

    pub fn mouse_release(button: MouseButton, x: i64, y: i64) -> Self {
        Event::MouseRelease(MouseButtonEvent {
            button,
            position: Position::new(x, y),
        })
    }

    pub fn mouse_wheel(x_delta: i32, y_delta: i32) -> Self {
        Event::MouseWheel(MouseWheelEvent { x_delta, y_delta })
    }
}

/// New drawable size in physical pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResizeEvent {
    pub width: u32,
    pub height: u32,
}

/// Keyboard press or release
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    /// Modifier keys held during this event
    pub modifiers: Modifiers,
}

/// Cursor motion
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MouseMoveEvent {
    pub position: Position,
}

/// Mouse button press or release
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MouseButtonEvent {
    pub button: MouseButton,
    /// Cursor position when the button changed state
    pub position: Position,
}

/// Scroll deltas in wheel steps (positive y scrolls up)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MouseWheelEvent {
    pub x_delta: i32,
    pub y_delta: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind() {
        assert_eq!(Event::resize(10, 20).kind(), EventKind::Resize);
        assert_eq!(
            Event::key_press(Key::Escape, Modifiers::NONE).kind(),
            EventKind::KeyPress
        );
        assert_eq!(
            Event::key_release(Key::Escape, Modifiers::NONE).kind(),
            EventKind::KeyRelease
        );
        assert_eq!(Event::mouse_move(1, 2).kind(), EventKind::MouseMove);
        assert_eq!(
            Event::mouse_press(MouseButton::Left, 1, 2).kind(),
            EventKind::MousePress
        );
        assert_eq!(
            Event::mouse_release(MouseButton::Left, 1, 2).kind(),
            EventKind::MouseRelease
        );
        assert_eq!(Event::mouse_wheel(0, -1).kind(), EventKind::MouseWheel);
    }

    #[test]
    fn test_is_input() {
        assert!(!Event::resize(1, 1).is_input());
        assert!(Event::mouse_wheel(0, 1).is_input());
    }

    #[test]
    fn test_constructors_carry_payload() {
        match Event::mouse_press(MouseButton::Right, 5, 7) {
            Event::MousePress(ev) => {
                assert_eq!(ev.button, MouseButton::Right);
                assert_eq!(ev.position, Position::new(5, 7));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
