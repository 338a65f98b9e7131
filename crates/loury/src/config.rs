#![forbid(unsafe_code)]

//! Page configuration as data.
//!
//! Every tunable lives in one [`LouryConfig`] that can be loaded from TOML or
//! JSON at startup. Missing sections and fields take their defaults, and the
//! defaults reproduce the stock page behavior.
//!
//! ```toml
//! [theme]
//! storage_key = "vocabloury-theme"
//! default_theme = "purple"
//!
//! [notifications]
//! default_duration_ms = 8000
//!
//! [interactions]
//! parallax_speed = 0.3
//! ```
//!
//! ```rust,ignore
//! let config = LouryConfig::from_toml_file("loury.toml")?;
//! let config = LouryConfig::from_json_str(json)?.validated()?;
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use loury_fx::{InteractionConfig, QueueConfig, TransitionDefaults};
use loury_theme::{DEFAULT_STORAGE_KEY, ThemeId, ThemeSettings};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level LouryConfig
// ---------------------------------------------------------------------------

/// All page tunables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LouryConfig {
    /// Theme switcher settings.
    pub theme: ThemeConfig,
    /// Default transition timings.
    pub transitions: TransitionConfig,
    /// Toast notification timings.
    pub notifications: NotificationConfig,
    /// Decorative interaction constants.
    pub interactions: InteractionsConfig,
    /// Log filter and format.
    pub logging: LoggingConfig,
}

impl LouryConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.theme.storage_key.trim().is_empty() {
            errors.push("theme.storage_key must not be empty".into());
        }

        if self.transitions.type_speed_ms == 0 {
            errors.push("transitions.type_speed_ms must be > 0".into());
        }

        if self.notifications.default_duration_ms == 0 {
            errors.push("notifications.default_duration_ms must be > 0".into());
        }

        let threshold = self.interactions.reveal_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            errors.push(format!(
                "interactions.reveal_threshold must be in (0, 1], got {threshold}"
            ));
        }

        if !self.interactions.parallax_speed.is_finite() {
            errors.push(format!(
                "interactions.parallax_speed must be finite, got {}",
                self.interactions.parallax_speed
            ));
        }

        let lift = self.interactions.hover_lift_px;
        if !lift.is_finite() || lift < 0.0 {
            errors.push(format!("interactions.hover_lift_px must be >= 0, got {lift}"));
        }

        if self.logging.filter.trim().is_empty() {
            errors.push("logging.filter must not be empty".into());
        }

        errors
    }

    /// Return `self` if it validates, else every problem found.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Build the theme controller settings.
    #[must_use]
    pub fn to_theme_settings(&self) -> ThemeSettings {
        ThemeSettings {
            storage_key: self.theme.storage_key.clone(),
            default_theme: self.theme.default_theme,
        }
    }

    /// Build the interpolation engine defaults.
    #[must_use]
    pub fn to_transition_defaults(&self) -> TransitionDefaults {
        TransitionDefaults {
            fade: Duration::from_millis(self.transitions.fade_ms),
            slide: Duration::from_millis(self.transitions.slide_ms),
            counter: Duration::from_millis(self.transitions.counter_ms),
            type_speed: Duration::from_millis(self.transitions.type_speed_ms),
        }
    }

    /// Build the notification queue configuration.
    #[must_use]
    pub fn to_queue_config(&self) -> QueueConfig {
        QueueConfig::new()
            .default_duration(Duration::from_millis(
                self.notifications.default_duration_ms,
            ))
            .exit_delay(Duration::from_millis(self.notifications.exit_delay_ms))
    }

    /// Build the interaction registry configuration.
    #[must_use]
    pub fn to_interaction_config(&self) -> InteractionConfig {
        InteractionConfig {
            reveal_threshold: self.interactions.reveal_threshold,
            parallax_speed: self.interactions.parallax_speed,
            hover_lift_px: self.interactions.hover_lift_px,
            ripple_duration: Duration::from_millis(self.interactions.ripple_ms),
            loading_duration: Duration::from_millis(self.interactions.loading_ms),
        }
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Theme switcher settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Preference key for the active theme. Default: `vocabloury-theme`.
    pub storage_key: String,
    /// Theme used when nothing valid is persisted. Default: `dark`.
    pub default_theme: ThemeId,
    /// JSON preference file. Default: none (per-app state directory).
    pub storage_path: Option<PathBuf>,
    /// Application name for the default state directory. Default: `vocabloury`.
    pub app_name: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_theme: ThemeId::Dark,
            storage_path: None,
            app_name: "vocabloury".to_string(),
        }
    }
}

/// Default transition timings, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// Default: 300.
    pub fade_ms: u64,
    /// Default: 300.
    pub slide_ms: u64,
    /// Default: 2000.
    pub counter_ms: u64,
    /// Delay between typed characters. Default: 50.
    pub type_speed_ms: u64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            fade_ms: 300,
            slide_ms: 300,
            counter_ms: 2000,
            type_speed_ms: 50,
        }
    }
}

/// Toast notification timings, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Auto-dismiss delay. Default: 5000.
    pub default_duration_ms: u64,
    /// Exit animation length before detaching. Default: 300.
    pub exit_delay_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: 5000,
            exit_delay_ms: 300,
        }
    }
}

/// Decorative interaction constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionsConfig {
    /// Visible ratio that triggers a reveal. Default: 0.1.
    pub reveal_threshold: f32,
    /// Parallax speed without `data-speed`. Default: 0.5.
    pub parallax_speed: f32,
    /// Hover lift in pixels. Default: 4.
    pub hover_lift_px: f32,
    /// Ripple lifetime. Default: 600.
    pub ripple_ms: u64,
    /// Loading state length. Default: 2000.
    pub loading_ms: u64,
}

impl Default for InteractionsConfig {
    fn default() -> Self {
        Self {
            reveal_threshold: 0.1,
            parallax_speed: 0.5,
            hover_lift_px: 4.0,
            ripple_ms: 600,
            loading_ms: 2000,
        }
    }
}

/// Log filter and format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives used when `LOURY_LOG` is unset. Default: `warn`.
    pub filter: String,
    /// JSON lines output (needs the `tracing-json` feature). Default: false.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
