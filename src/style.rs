//! Style profiles and their resolution into concrete formatting values.
//!
//! A [`StyleProfile`] is what the user picks: a font family, a size tier and
//! a color theme, all from fixed menus. [`resolve`] turns it into a
//! [`ResolvedStyle`] by looking the tier and theme up in two fixed tables.
//!
//! | Tier   | Title | Subtitle | Body |
//! |--------|-------|----------|------|
//! | Small  | 32 pt | 24 pt    | 18 pt |
//! | Medium | 40 pt | 28 pt    | 20 pt |
//! | Large  | 44 pt | 32 pt    | 24 pt |

use crate::error::DeckError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Six-digit uppercase hex, as PresentationML's `srgbClr/@val` expects.
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Font families offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontFamily {
    #[default]
    Arial,
    Calibri,
    TimesNewRoman,
    Helvetica,
    Georgia,
}

impl FontFamily {
    pub const ALL: [FontFamily; 5] = [
        FontFamily::Arial,
        FontFamily::Calibri,
        FontFamily::TimesNewRoman,
        FontFamily::Helvetica,
        FontFamily::Georgia,
    ];

    /// The typeface name written into the document.
    pub fn name(self) -> &'static str {
        match self {
            FontFamily::Arial => "Arial",
            FontFamily::Calibri => "Calibri",
            FontFamily::TimesNewRoman => "Times New Roman",
            FontFamily::Helvetica => "Helvetica",
            FontFamily::Georgia => "Georgia",
        }
    }
}

/// Size tier controlling the three per-role point sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SizeTier {
    Small,
    #[default]
    Medium,
    Large,
}

impl SizeTier {
    pub const ALL: [SizeTier; 3] = [SizeTier::Small, SizeTier::Medium, SizeTier::Large];

    pub fn name(self) -> &'static str {
        match self {
            SizeTier::Small => "Small",
            SizeTier::Medium => "Medium",
            SizeTier::Large => "Large",
        }
    }
}

/// Named color themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColorTheme {
    #[default]
    ProfessionalBlue,
    ForestGreen,
    ClassicGray,
    DeepPurple,
    ElegantBlack,
}

impl ColorTheme {
    pub const ALL: [ColorTheme; 5] = [
        ColorTheme::ProfessionalBlue,
        ColorTheme::ForestGreen,
        ColorTheme::ClassicGray,
        ColorTheme::DeepPurple,
        ColorTheme::ElegantBlack,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColorTheme::ProfessionalBlue => "Professional Blue",
            ColorTheme::ForestGreen => "Forest Green",
            ColorTheme::ClassicGray => "Classic Gray",
            ColorTheme::DeepPurple => "Deep Purple",
            ColorTheme::ElegantBlack => "Elegant Black",
        }
    }
}

macro_rules! display_and_parse_by_name {
    ($ty:ident, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = DeckError;

            /// Case-insensitive; spaces, dashes and underscores are ignored
            /// so `"forest-green"` and `"Forest Green"` are the same theme.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = name_key(s);
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|v| name_key(v.name()) == wanted)
                    .ok_or_else(|| {
                        DeckError::Configuration(format!(
                            "unknown {} '{}' (expected one of: {})",
                            $what,
                            s,
                            $ty::ALL.iter().map(|v| v.name()).collect::<Vec<_>>().join(", ")
                        ))
                    })
            }
        }
    };
}

display_and_parse_by_name!(FontFamily, "font family");
display_and_parse_by_name!(SizeTier, "size tier");
display_and_parse_by_name!(ColorTheme, "color theme");

fn name_key(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// The user's unresolved style choice. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StyleProfile {
    pub font_family: FontFamily,
    pub size_tier: SizeTier,
    pub color_theme: ColorTheme,
}

impl StyleProfile {
    pub fn new(font_family: FontFamily, size_tier: SizeTier, color_theme: ColorTheme) -> Self {
        Self {
            font_family,
            size_tier,
            color_theme,
        }
    }

    /// Build a profile from display names such as `"Georgia"`, `"Large"`,
    /// `"Forest Green"`.
    ///
    /// # Errors
    /// [`DeckError::Configuration`] naming the first unrecognised value.
    pub fn from_names(font: &str, size: &str, theme: &str) -> Result<Self, DeckError> {
        Ok(Self {
            font_family: font.parse()?,
            size_tier: size.parse()?,
            color_theme: theme.parse()?,
        })
    }
}

/// Concrete formatting values derived from a [`StyleProfile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedStyle {
    pub font_family: String,
    pub title_size: u32,
    pub subtitle_size: u32,
    pub body_size: u32,
    pub primary_color: Rgb,
    pub secondary_color: Rgb,
}

#[derive(Debug, Clone, Copy)]
struct FontSizes {
    title: u32,
    subtitle: u32,
    body: u32,
}

#[derive(Debug, Clone, Copy)]
struct ThemeColors {
    primary: Rgb,
    secondary: Rgb,
}

const WHITE: Rgb = Rgb(255, 255, 255);

const fn sizes(title: u32, subtitle: u32, body: u32) -> FontSizes {
    FontSizes {
        title,
        subtitle,
        body,
    }
}

const fn on_white(primary: Rgb) -> ThemeColors {
    ThemeColors {
        primary,
        secondary: WHITE,
    }
}

static FONT_SIZES: &[(SizeTier, FontSizes)] = &[
    (SizeTier::Small, sizes(32, 24, 18)),
    (SizeTier::Medium, sizes(40, 28, 20)),
    (SizeTier::Large, sizes(44, 32, 24)),
];

static COLOR_THEMES: &[(ColorTheme, ThemeColors)] = &[
    (ColorTheme::ProfessionalBlue, on_white(Rgb(0, 75, 150))),
    (ColorTheme::ForestGreen, on_white(Rgb(34, 139, 34))),
    (ColorTheme::ClassicGray, on_white(Rgb(80, 80, 80))),
    (ColorTheme::DeepPurple, on_white(Rgb(75, 0, 130))),
    (ColorTheme::ElegantBlack, on_white(Rgb(0, 0, 0))),
];

/// Look up the profile's size tier and color theme.
///
/// # Errors
/// [`DeckError::Configuration`] if either key is missing from its table.
pub fn resolve(profile: &StyleProfile) -> Result<ResolvedStyle, DeckError> {
    let sizes = FONT_SIZES
        .iter()
        .find(|(tier, _)| *tier == profile.size_tier)
        .map(|(_, s)| *s)
        .ok_or_else(|| {
            DeckError::Configuration(format!("no font sizes for tier '{}'", profile.size_tier))
        })?;

    let colors = COLOR_THEMES
        .iter()
        .find(|(theme, _)| *theme == profile.color_theme)
        .map(|(_, c)| *c)
        .ok_or_else(|| {
            DeckError::Configuration(format!("no colors for theme '{}'", profile.color_theme))
        })?;

    Ok(ResolvedStyle {
        font_family: profile.font_family.name().to_string(),
        title_size: sizes.title,
        subtitle_size: sizes.subtitle,
        body_size: sizes.body,
        primary_color: colors.primary,
        secondary_color: colors.secondary,
    })
}
