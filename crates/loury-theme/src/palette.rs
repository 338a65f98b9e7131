#![forbid(unsafe_code)]

//! Built-in themes and their color tokens.
//!
//! Every theme defines exactly ten tokens, one per [`ColorToken`]. The table
//! is `const` data; nothing here allocates or changes at runtime.
//!
//! | Theme | Icon | `--bg-primary` | `--accent` |
//! |-------|------|----------------|------------|
//! | dark | 🌙 | `#0f0f0f` | `#3b82f6` |
//! | light | ☀️ | `#ffffff` | `#3b82f6` |
//! | blue | 🔵 | `#0f172a` | `#0ea5e9` |
//! | purple | 🟣 | `#1a0b2e` | `#a855f7` |
//! | green | 🟢 | `#0c1b0f` | `#22c55e` |
//! | orange | 🟠 | `#1c0f0a` | `#f97316` |

use std::fmt;
use std::str::FromStr;

/// Built-in theme identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ThemeId {
    /// Near-black background, blue accent (default).
    #[default]
    Dark,
    /// White background, blue accent.
    Light,
    /// Slate background, sky accent.
    Blue,
    /// Deep violet background, purple accent.
    Purple,
    /// Forest background, green accent.
    Green,
    /// Ember background, orange accent.
    Orange,
}

impl ThemeId {
    /// Every theme, in selector order.
    pub const ALL: [ThemeId; 6] = [
        ThemeId::Dark,
        ThemeId::Light,
        ThemeId::Blue,
        ThemeId::Purple,
        ThemeId::Green,
        ThemeId::Orange,
    ];

    /// Identifier used for storage and `data-theme`.
    pub const fn as_str(self) -> &'static str {
        match self {
            ThemeId::Dark => "dark",
            ThemeId::Light => "light",
            ThemeId::Blue => "blue",
            ThemeId::Purple => "purple",
            ThemeId::Green => "green",
            ThemeId::Orange => "orange",
        }
    }

    /// Tooltip shown on the selector option.
    pub const fn title(self) -> &'static str {
        match self {
            ThemeId::Dark => "Dark Theme",
            ThemeId::Light => "Light Theme",
            ThemeId::Blue => "Blue Theme",
            ThemeId::Purple => "Purple Theme",
            ThemeId::Green => "Green Theme",
            ThemeId::Orange => "Orange Theme",
        }
    }

    /// Glyph shown on the toggle button.
    pub const fn icon(self) -> &'static str {
        match self {
            ThemeId::Dark => "\u{1F319}",
            ThemeId::Light => "\u{2600}\u{FE0F}",
            ThemeId::Blue => "\u{1F535}",
            ThemeId::Purple => "\u{1F7E3}",
            ThemeId::Green => "\u{1F7E2}",
            ThemeId::Orange => "\u{1F7E0}",
        }
    }

    /// The theme's token palette.
    pub const fn palette(self) -> &'static Palette {
        match self {
            ThemeId::Dark => &DARK,
            ThemeId::Light => &LIGHT,
            ThemeId::Blue => &BLUE,
            ThemeId::Purple => &PURPLE,
            ThemeId::Green => &GREEN,
            ThemeId::Orange => &ORANGE,
        }
    }

    /// Parse an identifier, returning `None` for anything unknown.
    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == id)
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by [`ThemeId::from_str`] for identifiers outside the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTheme(pub String);

impl fmt::Display for UnknownTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown theme: {:?}", self.0)
    }
}

impl std::error::Error for UnknownTheme {}

impl FromStr for ThemeId {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownTheme(s.to_string()))
    }
}

/// Named color slot consumed by the stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColorToken {
    BgPrimary,
    BgSecondary,
    BgTertiary,
    Accent,
    AccentHover,
    TextPrimary,
    TextSecondary,
    TextMuted,
    Border,
    BorderLight,
}

impl ColorToken {
    /// Every token, in palette order.
    pub const ALL: [ColorToken; 10] = [
        ColorToken::BgPrimary,
        ColorToken::BgSecondary,
        ColorToken::BgTertiary,
        ColorToken::Accent,
        ColorToken::AccentHover,
        ColorToken::TextPrimary,
        ColorToken::TextSecondary,
        ColorToken::TextMuted,
        ColorToken::Border,
        ColorToken::BorderLight,
    ];

    /// CSS custom-property name.
    pub const fn css_name(self) -> &'static str {
        match self {
            ColorToken::BgPrimary => "--bg-primary",
            ColorToken::BgSecondary => "--bg-secondary",
            ColorToken::BgTertiary => "--bg-tertiary",
            ColorToken::Accent => "--accent",
            ColorToken::AccentHover => "--accent-hover",
            ColorToken::TextPrimary => "--text-primary",
            ColorToken::TextSecondary => "--text-secondary",
            ColorToken::TextMuted => "--text-muted",
            ColorToken::Border => "--border",
            ColorToken::BorderLight => "--border-light",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Build from a packed `0xRRGGBB` literal.
    pub const fn hex(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) & 0xFF) as u8,
            g: ((packed >> 8) & 0xFF) as u8,
            b: (packed & 0xFF) as u8,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// The ten token values of one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    values: [Rgb; 10],
}

impl Palette {
    const fn new(values: [u32; 10]) -> Self {
        let mut out = [Rgb::hex(0); 10];
        let mut i = 0;
        while i < 10 {
            out[i] = Rgb::hex(values[i]);
            i += 1;
        }
        Self { values: out }
    }

    /// Value of one token.
    pub const fn get(&self, token: ColorToken) -> Rgb {
        self.values[token.index()]
    }

    /// All `(token, value)` pairs in palette order.
    pub fn iter(&self) -> impl Iterator<Item = (ColorToken, Rgb)> + '_ {
        ColorToken::ALL.into_iter().map(|t| (t, self.get(t)))
    }
}

// bg-primary, bg-secondary, bg-tertiary, accent, accent-hover,
// text-primary, text-secondary, text-muted, border, border-light
const DARK: Palette = Palette::new([
    0x0f0f0f, 0x1a1a1a, 0x2a2a2a, 0x3b82f6, 0x2563eb, 0xffffff, 0xd1d5db, 0x9ca3af, 0x374151,
    0x4b5563,
]);
const LIGHT: Palette = Palette::new([
    0xffffff, 0xf8fafc, 0xf1f5f9, 0x3b82f6, 0x2563eb, 0x1e293b, 0x475569, 0x64748b, 0xe2e8f0,
    0xf1f5f9,
]);
const BLUE: Palette = Palette::new([
    0x0f172a, 0x1e293b, 0x334155, 0x0ea5e9, 0x0284c7, 0xf8fafc, 0xcbd5e1, 0x94a3b8, 0x475569,
    0x64748b,
]);
const PURPLE: Palette = Palette::new([
    0x1a0b2e, 0x2d1b4e, 0x3d2a5e, 0xa855f7, 0x9333ea, 0xf3e8ff, 0xd8b4fe, 0xc084fc, 0x6b46c1,
    0x8b5cf6,
]);
const GREEN: Palette = Palette::new([
    0x0c1b0f, 0x1a2e1d, 0x2a3e2d, 0x22c55e, 0x16a34a, 0xf0fdf4, 0xbbf7d0, 0x86efac, 0x4ade80,
    0x6ee7b7,
]);
const ORANGE: Palette = Palette::new([
    0x1c0f0a, 0x2d1b0f, 0x3d2a1a, 0xf97316, 0xea580c, 0xfff7ed, 0xfed7aa, 0xfdba74, 0xfb923c,
    0xfdba74,
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_strings() {
        for id in ThemeId::ALL {
            assert_eq!(id.as_str().parse::<ThemeId>(), Ok(id));
        }
    }

    #[test]
    fn unknown_ids_are_rejected() {
        assert_eq!(ThemeId::parse("Dark"), None);
        assert_eq!(ThemeId::parse(""), None);
        assert_eq!(
            "neon".parse::<ThemeId>(),
            Err(UnknownTheme("neon".to_string()))
        );
    }

    #[test]
    fn default_is_dark() {
        assert_eq!(ThemeId::default(), ThemeId::Dark);
    }

    #[test]
    fn every_palette_has_ten_tokens() {
        for id in ThemeId::ALL {
            assert_eq!(id.palette().iter().count(), 10, "{id}");
        }
    }

    #[test]
    fn token_names_are_distinct() {
        let mut names: Vec<_> = ColorToken::ALL.iter().map(|t| t.css_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 10);
    }

    #[test]
    fn palette_values_match_table() {
        assert_eq!(
            ThemeId::Dark.palette().get(ColorToken::BgPrimary).to_string(),
            "#0f0f0f"
        );
        assert_eq!(
            ThemeId::Purple.palette().get(ColorToken::Border).to_string(),
            "#6b46c1"
        );
        assert_eq!(
            ThemeId::Orange.palette().get(ColorToken::BorderLight).to_string(),
            "#fdba74"
        );
        assert_eq!(
            ThemeId::Light.palette().get(ColorToken::TextPrimary).to_string(),
            "#1e293b"
        );
    }

    #[test]
    fn icons_are_distinct() {
        let mut icons: Vec<_> = ThemeId::ALL.iter().map(|t| t.icon()).collect();
        icons.sort_unstable();
        icons.dedup();
        assert_eq!(icons.len(), ThemeId::ALL.len());
    }
}
