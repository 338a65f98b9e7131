#![forbid(unsafe_code)]

//! Theme switcher: active theme, toggle button, and option selector.
//!
//! # State machine
//!
//! The selector is either [`SelectorState::Closed`] or
//! [`SelectorState::Open`]; the active theme is orthogonal to it.
//!
//! | From | Input | To | Effect |
//! |------|-------|----|--------|
//! | Closed | toggle click | Open | re-mark active option |
//! | Open | toggle click | Closed | |
//! | Open | option click | Closed | switch theme |
//! | Open | outside click | Closed | |
//! | Open | Escape | Closed | |
//!
//! # Invariants
//!
//! 1. Exactly one theme is active; its ten tokens reach the [`StyleScope`] in
//!    a single [`apply`](StyleScope::apply) before `current_theme` reports it.
//! 2. Unknown identifiers never change state.
//! 3. Exactly one option carries the `active` marker after any switch or
//!    open.
//! 4. A failed preference write never blocks a switch.

use std::fmt;
use std::rc::Rc;

use loury_core::{Document, Element, ElementId, ElementRef, Key};
use tracing::{debug, warn};

use crate::palette::ThemeId;
use crate::scope::StyleScope;
use crate::storage::PreferenceStore;

/// Preference key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "vocabloury-theme";

const ACTIVE_CLASS: &str = "active";
const OPEN_CLASS: &str = "open";

/// Visibility of the option selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectorState {
    #[default]
    Closed,
    Open,
}

/// Construction parameters for [`ThemeController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeSettings {
    /// Key the active theme id is persisted under.
    pub storage_key: String,
    /// Theme used when nothing valid is persisted.
    pub default_theme: ThemeId,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_theme: ThemeId::default(),
        }
    }
}

/// Owns the active theme and the switcher widgets.
pub struct ThemeController {
    settings: ThemeSettings,
    scope: Rc<dyn StyleScope>,
    store: Rc<dyn PreferenceStore>,
    active: ThemeId,
    selector_state: SelectorState,
    toggle: ElementRef,
    selector: ElementRef,
    options: Vec<(ThemeId, ElementRef)>,
}

impl ThemeController {
    /// Restore the persisted theme, apply it, and build the switcher.
    ///
    /// A missing, unreadable, or unknown persisted value falls back to
    /// `settings.default_theme`. Nothing is written back to the store here.
    pub fn initialize(
        document: &dyn Document,
        scope: Rc<dyn StyleScope>,
        store: Rc<dyn PreferenceStore>,
        settings: ThemeSettings,
    ) -> Self {
        let active = restore(store.as_ref(), &settings);
        scope.apply(active, active.palette());

        let body = document.body();

        let toggle = document.create_element("theme-toggle");
        toggle.set_text(active.icon());
        toggle.set_attribute("aria-label", "Toggle theme");
        body.append_child(&toggle);

        let selector = document.create_element("theme-selector");
        let list = document.create_element("theme-options");
        let options: Vec<_> = ThemeId::ALL
            .into_iter()
            .map(|theme| {
                let option = document.create_element("theme-option");
                option.set_attribute("data-theme", theme.as_str());
                option.set_attribute("title", theme.title());
                list.append_child(&option);
                (theme, option)
            })
            .collect();
        selector.append_child(&list);
        body.append_child(&selector);

        let controller = Self {
            settings,
            scope,
            store,
            active,
            selector_state: SelectorState::Closed,
            toggle,
            selector,
            options,
        };
        controller.sync_active_option();
        debug!(message = "theme.init", theme = active.as_str());
        controller
    }

    /// The active theme.
    #[must_use]
    pub fn current_theme(&self) -> ThemeId {
        self.active
    }

    /// Current selector visibility.
    #[must_use]
    pub fn selector_state(&self) -> SelectorState {
        self.selector_state
    }

    /// The toggle button.
    #[must_use]
    pub fn toggle_element(&self) -> &ElementRef {
        &self.toggle
    }

    /// The selector panel.
    #[must_use]
    pub fn selector_element(&self) -> &ElementRef {
        &self.selector
    }

    /// The option element for `theme`.
    #[must_use]
    pub fn option_element(&self, theme: ThemeId) -> Option<&ElementRef> {
        self.options
            .iter()
            .find(|(t, _)| *t == theme)
            .map(|(_, el)| el)
    }

    /// Switch by identifier. Unknown identifiers are ignored.
    ///
    /// Returns whether the identifier was recognized.
    pub fn set_theme(&mut self, id: &str) -> bool {
        match ThemeId::parse(id) {
            Some(theme) => {
                self.set_theme_id(theme);
                true
            }
            None => {
                debug!(message = "theme.unknown", id);
                false
            }
        }
    }

    /// Switch to a known theme.
    pub fn set_theme_id(&mut self, theme: ThemeId) {
        if let Err(err) = self.store.set(&self.settings.storage_key, theme.as_str()) {
            warn!(
                message = "theme.persist_failed",
                theme = theme.as_str(),
                store = self.store.name(),
                error = %err
            );
        }

        self.scope.apply(theme, theme.palette());
        let previous = std::mem::replace(&mut self.active, theme);
        self.toggle.set_text(theme.icon());
        self.sync_active_option();

        debug!(
            message = "theme.switch",
            from = previous.as_str(),
            to = theme.as_str()
        );
    }

    /// Same as [`set_theme`](Self::set_theme).
    pub fn switch_theme(&mut self, id: &str) -> bool {
        self.set_theme(id)
    }

    /// Open when closed, close when open.
    pub fn toggle_selector(&mut self) {
        match self.selector_state {
            SelectorState::Closed => self.open_selector(),
            SelectorState::Open => self.close_selector(),
        }
    }

    /// Show the selector and re-mark the active option.
    pub fn open_selector(&mut self) {
        self.selector.add_class(OPEN_CLASS);
        self.selector_state = SelectorState::Open;
        self.sync_active_option();
    }

    /// Hide the selector.
    pub fn close_selector(&mut self) {
        self.selector.remove_class(OPEN_CLASS);
        self.selector_state = SelectorState::Closed;
    }

    /// React to a click anywhere in the document.
    ///
    /// Returns `true` when the click changed controller state.
    pub fn handle_click(&mut self, target: ElementId) -> bool {
        if self.toggle.contains(target) {
            self.toggle_selector();
            return true;
        }

        let picked = self
            .options
            .iter()
            .find(|(_, el)| el.contains(target))
            .map(|(theme, _)| *theme);
        if let Some(theme) = picked {
            self.set_theme_id(theme);
            self.close_selector();
            return true;
        }

        if self.selector_state == SelectorState::Open && !self.selector.contains(target) {
            self.close_selector();
            return true;
        }
        false
    }

    /// React to a key press. Escape closes an open selector.
    pub fn handle_key(&mut self, key: &Key) -> bool {
        if *key == Key::Escape && self.selector_state == SelectorState::Open {
            self.close_selector();
            return true;
        }
        false
    }

    fn sync_active_option(&self) {
        for (theme, option) in &self.options {
            if *theme == self.active {
                option.add_class(ACTIVE_CLASS);
            } else {
                option.remove_class(ACTIVE_CLASS);
            }
        }
    }
}

fn restore(store: &dyn PreferenceStore, settings: &ThemeSettings) -> ThemeId {
    match store.get(&settings.storage_key) {
        Ok(Some(value)) => ThemeId::parse(&value).unwrap_or_else(|| {
            debug!(message = "theme.unknown", id = value.as_str());
            settings.default_theme
        }),
        Ok(None) => settings.default_theme,
        Err(err) => {
            warn!(
                message = "theme.load_failed",
                store = store.name(),
                error = %err
            );
            settings.default_theme
        }
    }
}

impl fmt::Debug for ThemeController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeController")
            .field("active", &self.active)
            .field("selector_state", &self.selector_state)
            .field("storage_key", &self.settings.storage_key)
            .field("store", &self.store.name())
            .finish()
    }
}
