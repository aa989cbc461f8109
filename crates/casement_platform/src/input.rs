//! Input primitives shared by keyboard and mouse events

use std::ops::{Add, Sub};

/// A point in window coordinates (physical pixels, origin top-left)
///
/// Addition and subtraction saturate at the coordinate range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl From<(i64, i64)> for Position {
    fn from((x, y): (i64, i64)) -> Self {
        Self { x, y }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

// ============================================================================
// Mouse
// ============================================================================

/// Mouse buttons
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button (scroll wheel click)
    Middle,
    /// Back button (side button)
    Back,
    /// Forward button (side button)
    Forward,
    /// Other button with index
    Other(u16),
}

// ============================================================================
// Keyboard
// ============================================================================

/// Modifier key state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    /// Option on macOS
    pub alt: bool,
    /// Command on macOS, Windows key on Windows
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Check if no modifiers are held
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

/// Logical keys
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// A key producing a printable character
    Character(char),
    /// F1..F24
    Function(u8),

    Space,
    Enter,
    Escape,
    Backspace,
    Tab,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,

    Left,
    Right,
    Up,
    Down,

    Shift,
    Ctrl,
    Alt,
    Meta,

    /// Native key code the backend could not map
    Unknown(u32),
}

impl Key {
    /// Whether this key is one of the modifier keys
    pub fn is_modifier(&self) -> bool {
        matches!(self, Key::Shift | Key::Ctrl | Key::Alt | Key::Meta)
    }

    /// The character this key produces, if any
    pub fn to_char(&self) -> Option<char> {
        match self {
            Key::Character(c) => Some(*c),
            Key::Space => Some(' '),
            Key::Enter => Some('\n'),
            Key::Tab => Some('\t'),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_arithmetic() {
        let a = Position::new(10, 20);
        let b = Position::from((3, -4));
        assert_eq!(a + b, Position::new(13, 16));
        assert_eq!(a - b, Position::new(7, 24));
        assert_eq!(Position::default(), Position::new(0, 0));

        // Clamps at the coordinate range instead of overflowing
        let far = Position::new(i64::MAX, i64::MIN);
        assert_eq!(far + Position::new(1, -1), far);
        assert_eq!(far - Position::new(-1, 1), far);
    }

    #[test]
    fn test_modifiers() {
        assert!(Modifiers::default().is_empty());
        let ctrl = Modifiers {
            ctrl: true,
            ..Default::default()
        };
        assert!(!ctrl.is_empty());
    }

    #[test]
    fn test_key_helpers() {
        assert!(Key::Shift.is_modifier());
        assert!(!Key::Character('a').is_modifier());
        assert_eq!(Key::Character('q').to_char(), Some('q'));
        assert_eq!(Key::Space.to_char(), Some(' '));
        assert_eq!(Key::Escape.to_char(), None);
    }
}
