#![forbid(unsafe_code)]

//! The page context.
//!
//! [`Page`] owns one of each component, all sharing a single
//! [`FrameScheduler`]. The host constructs it once, forwards input through
//! [`Page::dispatch`], and drives time through [`Page::frame`] or
//! [`Page::pump`].

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use loury_core::{Document, FrameClock, FrameScheduler, UiEvent};
use loury_fx::{InterpolationEngine, Interactions, NotificationQueue};
use loury_theme::{PreferenceStore, StyleScope, ThemeController, ThemeId};
use tracing::{debug, info};

use crate::config::{ConfigError, LouryConfig};
use crate::Result;

/// Explicitly constructed page context.
pub struct Page {
    document: Rc<dyn Document>,
    scheduler: FrameScheduler,
    theme: ThemeController,
    engine: InterpolationEngine,
    notifications: NotificationQueue,
    interactions: Interactions,
    config: LouryConfig,
}

impl Page {
    /// Build every component from `config`.
    ///
    /// The theme is restored from `store` and applied to `scope` before this
    /// returns. An invalid config is rejected with every problem listed.
    ///
    /// Time only moves when the host runs a frame. A host that pauses its
    /// frame loop while idle should use [`Page::with_clock`] instead.
    pub fn new(
        document: Rc<dyn Document>,
        scope: Rc<dyn StyleScope>,
        store: Rc<dyn PreferenceStore>,
        config: LouryConfig,
    ) -> Result<Self> {
        Self::build(document, scope, store, config, FrameScheduler::new())
    }

    /// Like [`Page::new`], but every delay and transition counts from the
    /// moment it is requested, read from `clock`.
    pub fn with_clock(
        document: Rc<dyn Document>,
        scope: Rc<dyn StyleScope>,
        store: Rc<dyn PreferenceStore>,
        config: LouryConfig,
        clock: Rc<dyn FrameClock>,
    ) -> Result<Self> {
        Self::build(document, scope, store, config, FrameScheduler::with_clock(clock))
    }

    fn build(
        document: Rc<dyn Document>,
        scope: Rc<dyn StyleScope>,
        store: Rc<dyn PreferenceStore>,
        config: LouryConfig,
        scheduler: FrameScheduler,
    ) -> Result<Self> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors).into());
        }

        let theme = ThemeController::initialize(
            document.as_ref(),
            scope,
            Rc::clone(&store),
            config.to_theme_settings(),
        );
        let engine =
            InterpolationEngine::with_defaults(scheduler.clone(), config.to_transition_defaults());
        let notifications = NotificationQueue::new(
            Rc::clone(&document),
            scheduler.clone(),
            config.to_queue_config(),
        );
        let interactions = Interactions::new(
            Rc::clone(&document),
            scheduler.clone(),
            config.to_interaction_config(),
        );

        info!(
            message = "page.init",
            theme = theme.current_theme().as_str(),
            store = store.name(),
            clock = scheduler.has_clock()
        );

        Ok(Self {
            document,
            scheduler,
            theme,
            engine,
            notifications,
            interactions,
            config,
        })
    }

    /// Build a page whose theme preference lives in a JSON file.
    ///
    /// Uses `theme.storage_path` when set, else the per-app state directory
    /// derived from `theme.app_name`.
    #[cfg(feature = "file-storage")]
    pub fn with_file_storage(
        document: Rc<dyn Document>,
        scope: Rc<dyn StyleScope>,
        config: LouryConfig,
    ) -> Result<Self> {
        let store = match &config.theme.storage_path {
            Some(path) => loury_theme::FileStorage::new(path),
            None => loury_theme::FileStorage::default_for_app(&config.theme.app_name),
        };
        if !store.is_available() {
            return Err(crate::Error::Storage(loury_theme::StorageError::Unavailable(
                store.path().display().to_string(),
            )));
        }
        Self::new(document, scope, Rc::new(store), config)
    }

    /// Route one host event.
    ///
    /// Clicks go to the theme switcher, the notification close buttons, and
    /// the interaction effects, in that order; keys go to the theme
    /// switcher; everything else goes to the interaction effects. Returns
    /// `true` if any component reacted.
    pub fn dispatch(&mut self, event: &UiEvent) -> bool {
        let handled = match event {
            UiEvent::Click { target, .. } => {
                let theme = self.theme.handle_click(*target);
                let toast = self.notifications.handle_click(*target);
                let effect = self.interactions.handle_event(event);
                theme | toast | effect
            }
            UiEvent::KeyDown { key } => self.theme.handle_key(key),
            _ => self.interactions.handle_event(event),
        };
        if !handled {
            debug!(message = "page.dispatch_ignored", event = ?event);
        }
        handled
    }

    /// Run one frame at `now`. Returns the number of tasks executed.
    pub fn frame(&self, now: Duration) -> usize {
        self.scheduler.run_frame(now)
    }

    /// Run one frame at the clock's current time.
    pub fn pump(&self, clock: &impl FrameClock) -> usize {
        self.scheduler.pump(clock)
    }

    /// Switch theme by id, reporting ids outside the built-in set.
    pub fn switch_theme(&mut self, id: &str) -> Result<()> {
        let theme: ThemeId = id.parse()?;
        self.theme.set_theme_id(theme);
        Ok(())
    }

    /// The document every component writes to.
    #[must_use]
    pub fn document(&self) -> &Rc<dyn Document> {
        &self.document
    }

    /// Shared frame scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    #[must_use]
    pub fn theme(&self) -> &ThemeController {
        &self.theme
    }

    pub fn theme_mut(&mut self) -> &mut ThemeController {
        &mut self.theme
    }

    #[must_use]
    pub fn engine(&self) -> &InterpolationEngine {
        &self.engine
    }

    #[must_use]
    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    #[must_use]
    pub fn interactions(&self) -> &Interactions {
        &self.interactions
    }

    /// Register elements for reveal, parallax, hover, or button effects.
    pub fn interactions_mut(&mut self) -> &mut Interactions {
        &mut self.interactions
    }

    /// Configuration the page was built from.
    #[must_use]
    pub fn config(&self) -> &LouryConfig {
        &self.config
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("theme", &self.theme.current_theme())
            .field("notifications", &self.notifications.active_count())
            .field("scheduler", &self.scheduler.stats())
            .finish_non_exhaustive()
    }
}
