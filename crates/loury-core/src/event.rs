#![forbid(unsafe_code)]

//! Host-delivered input events.
//!
//! The host translates browser events into [`UiEvent`] values and hands them
//! to the page context. Targets are identified by [`ElementId`]; components
//! match them against the elements they subscribed, never by walking
//! selectors.

use crate::element::ElementId;

/// Keyboard key, reduced to what the components react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// `Escape`.
    Escape,
    /// `Enter`.
    Enter,
    /// `Tab`.
    Tab,
    /// A printable character.
    Char(char),
    /// Any other named key, carried verbatim.
    Other(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => Self::Other(key.to_string()),
                }
            }
        }
    }
}

/// One input event from the host.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Primary click at viewport coordinates.
    Click { target: ElementId, x: f32, y: f32 },
    /// Key pressed anywhere in the document.
    KeyDown { key: Key },
    /// Pointer entered an element.
    MouseOver { target: ElementId },
    /// Pointer left an element.
    MouseOut { target: ElementId },
    /// Window scrolled to vertical offset `y`.
    Scroll { y: f32 },
    /// Intersection observer reported an element's visible ratio.
    Intersection { target: ElementId, ratio: f32 },
}

impl UiEvent {
    /// Convenience constructor for a click without coordinates.
    #[must_use]
    pub const fn click(target: ElementId) -> Self {
        Self::Click {
            target,
            x: 0.0,
            y: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_keys_map() {
        assert_eq!(Key::from_dom("Escape"), Key::Escape);
        assert_eq!(Key::from_dom("Esc"), Key::Escape);
        assert_eq!(Key::from_dom("a"), Key::Char('a'));
        assert_eq!(Key::from_dom("ArrowUp"), Key::Other("ArrowUp".into()));
    }
}
