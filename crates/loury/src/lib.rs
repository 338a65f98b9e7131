#![forbid(unsafe_code)]

//! loury public facade crate.
//!
//! This crate provides the surface a host page uses: one explicitly
//! constructed [`Page`], its [`LouryConfig`], log setup, and re-exports of
//! the component crates. A lightweight prelude covers day-to-day usage.
//!
//! ```rust,ignore
//! use loury::prelude::*;
//!
//! let config = LouryConfig::from_toml_file("loury.toml")?;
//! loury::logging::init(&config.logging)?;
//! let mut page = Page::new(document, scope, store, config)?;
//!
//! page.notifications().success("Saved");
//! page.dispatch(&UiEvent::click(target));
//! page.frame(now);
//! ```

use std::fmt;

pub mod config;
pub mod logging;
pub mod page;

pub use config::{ConfigError, LouryConfig};
pub use page::Page;

// --- Core re-exports -------------------------------------------------------

pub use loury_core::{
    CancellationSource, CancellationToken, DeterministicClock, Document, Element, ElementId,
    ElementRef, FrameClock, FrameScheduler, Key, MemoryDocument, MonotonicClock, Step, UiEvent,
};

// --- Theme re-exports ------------------------------------------------------

#[cfg(feature = "file-storage")]
pub use loury_theme::FileStorage;
pub use loury_theme::{
    MemoryStorage, Palette, PreferenceStore, RecordingScope, StorageError, StyleScope,
    ThemeController, ThemeId, UnknownTheme,
};

// --- Effect re-exports -----------------------------------------------------

pub use loury_fx::{
    InterpolationEngine, Interactions, NotificationKind, NotificationQueue, SlideDirection,
    TransitionHandle,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for loury hosts.
#[derive(Debug)]
pub enum Error {
    /// Configuration could not be loaded or is invalid.
    Config(ConfigError),
    /// Preference storage failure.
    Storage(StorageError),
    /// A theme id outside the built-in set.
    UnknownTheme(UnknownTheme),
    /// Log subscriber could not be installed.
    Logging(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::UnknownTheme(err) => write!(f, "{err}"),
            Self::Logging(msg) => write!(f, "logging setup failed: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::UnknownTheme(err) => Some(err),
            Self::Logging(_) => None,
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

impl From<UnknownTheme> for Error {
    fn from(err: UnknownTheme) -> Self {
        Self::UnknownTheme(err)
    }
}

/// Standard result type for loury APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Document, Element, ElementRef, Error, FrameScheduler, Key, LouryConfig, NotificationKind,
        Page, Result, SlideDirection, ThemeId, UiEvent,
    };

    pub use crate::{core, fx, theme};
}

pub use loury_core as core;
pub use loury_fx as fx;
pub use loury_theme as theme;
