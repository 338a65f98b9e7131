#![forbid(unsafe_code)]

//! Page-global style scope that receives theme tokens.
//!
//! A browser host implements [`StyleScope`] over
//! `document.documentElement`: set `data-theme`, then write the ten custom
//! properties. The whole palette arrives in one call so the host can commit it
//! before the next paint; there is never a frame with tokens from two themes.

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::palette::{Palette, ThemeId};

/// Receiver for a full theme palette.
pub trait StyleScope {
    /// Apply every token of `palette` and mark the scope with `theme`.
    fn apply(&self, theme: ThemeId, palette: &Palette);
}

/// One committed application, as seen by [`RecordingScope`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedTheme {
    /// Value written to `data-theme`.
    pub theme: ThemeId,
    /// Custom property name → `#rrggbb`.
    pub tokens: BTreeMap<&'static str, String>,
}

/// In-memory [`StyleScope`] that keeps the live token set and a history.
#[derive(Debug, Default)]
pub struct RecordingScope {
    current: RefCell<Option<AppliedTheme>>,
    history: RefCell<Vec<ThemeId>>,
}

impl RecordingScope {
    /// Create an empty scope with no tokens applied.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The live token set, if any theme was applied.
    #[must_use]
    pub fn current(&self) -> Option<AppliedTheme> {
        self.current.borrow().clone()
    }

    /// Live value of one custom property.
    #[must_use]
    pub fn value(&self, css_name: &str) -> Option<String> {
        self.current
            .borrow()
            .as_ref()
            .and_then(|a| a.tokens.get(css_name).cloned())
    }

    /// Current `data-theme` marker.
    #[must_use]
    pub fn data_theme(&self) -> Option<ThemeId> {
        self.current.borrow().as_ref().map(|a| a.theme)
    }

    /// Every theme applied so far, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<ThemeId> {
        self.history.borrow().clone()
    }
}

impl StyleScope for RecordingScope {
    fn apply(&self, theme: ThemeId, palette: &Palette) {
        let tokens = palette
            .iter()
            .map(|(token, rgb)| (token.css_name(), rgb.to_string()))
            .collect();
        *self.current.borrow_mut() = Some(AppliedTheme { theme, tokens });
        self.history.borrow_mut().push(theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::ColorToken;

    #[test]
    fn apply_replaces_every_token() {
        let scope = RecordingScope::new();
        scope.apply(ThemeId::Dark, ThemeId::Dark.palette());
        scope.apply(ThemeId::Green, ThemeId::Green.palette());

        let current = scope.current().unwrap();
        assert_eq!(current.theme, ThemeId::Green);
        assert_eq!(current.tokens.len(), ColorToken::ALL.len());
        for (token, rgb) in ThemeId::Green.palette().iter() {
            assert_eq!(
                scope.value(token.css_name()),
                Some(rgb.to_string()),
                "{}",
                token.css_name()
            );
        }
        assert_eq!(scope.history(), vec![ThemeId::Dark, ThemeId::Green]);
    }
}
