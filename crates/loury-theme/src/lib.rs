#![forbid(unsafe_code)]

//! Themes: palettes, persisted preference, and the theme switcher.
//!
//! # Key Components
//!
//! - [`ThemeId`] / [`Palette`] - the six built-in themes and their ten color
//!   tokens, as `const` data
//! - [`StyleScope`] - where a palette is applied (the document root)
//! - [`PreferenceStore`] - where the chosen theme is remembered
//! - [`ThemeController`] - toggle button, option selector, and switching
//!
//! # Role in loury
//! `loury-theme` sits on top of `loury-core`'s element contract. It never
//! schedules frames; a theme switch is a single synchronous commit.

pub mod controller;
pub mod palette;
pub mod scope;
pub mod storage;

pub use controller::{DEFAULT_STORAGE_KEY, SelectorState, ThemeController, ThemeSettings};
pub use palette::{ColorToken, Palette, Rgb, ThemeId, UnknownTheme};
pub use scope::{AppliedTheme, RecordingScope, StyleScope};
#[cfg(feature = "file-storage")]
pub use storage::FileStorage;
pub use storage::{MemoryStorage, PreferenceStore, StorageError, StorageResult};
