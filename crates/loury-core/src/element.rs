#![forbid(unsafe_code)]

//! Host element contract.
//!
//! Components never reach into a concrete DOM. They hold [`ElementRef`]s
//! and write typed style values through the [`Element`] trait; new nodes come
//! from a [`Document`]. A browser host implements these traits over
//! `web-sys`; [`MemoryDocument`](crate::memory::MemoryDocument) implements
//! them in memory.
//!
//! # Missing elements
//!
//! Writing to an element that is no longer connected is harmless. Callers
//! that animate over time check [`Element::is_connected`] and stop quietly
//! once the element has left the document.

use std::fmt;
use std::rc::Rc;

/// Stable identity of an element within its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shared handle to a host element.
pub type ElementRef = Rc<dyn Element>;

/// Layout participation (`display`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    /// Laid out as a block.
    #[default]
    Block,
    /// Removed from layout (`display: none`).
    None,
}

/// Translation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal (`translateX`).
    X,
    /// Vertical (`translateY`).
    Y,
}

/// A CSS-style length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    /// Percentage of the element's own size.
    Percent(f32),
    /// Absolute pixels.
    Px(f32),
}

/// A single-axis translation, or none.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Transform {
    /// No transform.
    #[default]
    None,
    /// Translate along one axis.
    Translate {
        /// Axis of movement.
        axis: Axis,
        /// Offset along the axis.
        offset: Length,
    },
}

impl Transform {
    /// `translateX(<percent>%)`.
    #[must_use]
    pub const fn translate_percent(axis: Axis, percent: f32) -> Self {
        Self::Translate {
            axis,
            offset: Length::Percent(percent),
        }
    }

    /// `translateY(<px>px)`.
    #[must_use]
    pub const fn translate_y_px(px: f32) -> Self {
        Self::Translate {
            axis: Axis::Y,
            offset: Length::Px(px),
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Translate { axis, offset } => {
                let func = match axis {
                    Axis::X => "translateX",
                    Axis::Y => "translateY",
                };
                match offset {
                    Length::Percent(p) => write!(f, "{func}({p}%)"),
                    Length::Px(px) => write!(f, "{func}({px}px)"),
                }
            }
        }
    }
}

/// Drop-shadow level used by hover effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Elevation {
    /// No shadow.
    #[default]
    Flat,
    /// `0 10px 25px rgba(0,0,0,0.15)`.
    Raised,
}

/// Axis-aligned rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A node the page components can style and mutate.
///
/// Methods take `&self`: hosts either wrap interior-mutable DOM handles or,
/// like the in-memory document, share a `RefCell`ed tree.
pub trait Element {
    /// Identity of this element.
    fn id(&self) -> ElementId;

    /// Whether the element is attached under the document body.
    fn is_connected(&self) -> bool;

    /// Whether `other` is this element or one of its descendants.
    fn contains(&self, other: ElementId) -> bool;

    /// Bounding box relative to the viewport.
    fn bounds(&self) -> Rect;

    /// Computed opacity in [0, 1].
    fn opacity(&self) -> f32;

    /// Set inline opacity.
    fn set_opacity(&self, opacity: f32);

    /// Current inline transform.
    fn transform(&self) -> Transform;

    /// Set inline transform.
    fn set_transform(&self, transform: Transform);

    /// Current display mode.
    fn display(&self) -> Display;

    /// Set display mode.
    fn set_display(&self, display: Display);

    /// Set drop-shadow level.
    fn set_elevation(&self, elevation: Elevation);

    /// Absolutely position and size the element inside its parent.
    fn set_geometry(&self, rect: Rect);

    /// Text content.
    fn text(&self) -> String;

    /// Replace text content.
    fn set_text(&self, text: &str);

    /// Append one character to the text content.
    fn push_char(&self, ch: char) {
        let mut text = self.text();
        text.push(ch);
        self.set_text(&text);
    }

    /// Add a class marker.
    fn add_class(&self, class: &str);

    /// Remove a class marker.
    fn remove_class(&self, class: &str);

    /// Whether a class marker is present.
    fn has_class(&self, class: &str) -> bool;

    /// Set an attribute.
    fn set_attribute(&self, name: &str, value: &str);

    /// Read an attribute.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Whether the element carries the `disabled` attribute.
    fn is_disabled(&self) -> bool {
        self.attribute("disabled").is_some()
    }

    /// Move `child` under this element, detaching it from any old parent.
    fn append_child(&self, child: &ElementRef);

    /// Detach this element from its parent. No-op when already detached.
    fn remove(&self);
}

/// Factory and root access for host elements.
pub trait Document {
    /// Create a detached element carrying the given whitespace-separated
    /// class markers.
    fn create_element(&self, classes: &str) -> ElementRef;

    /// The document body; every connected element descends from it.
    fn body(&self) -> ElementRef;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_renders_as_css() {
        assert_eq!(
            Transform::translate_percent(Axis::X, -100.0).to_string(),
            "translateX(-100%)"
        );
        assert_eq!(Transform::translate_y_px(-4.0).to_string(), "translateY(-4px)");
        assert_eq!(Transform::None.to_string(), "none");
    }

    #[test]
    fn element_id_display() {
        assert_eq!(ElementId(7).to_string(), "#7");
    }
}
