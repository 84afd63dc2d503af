//! Hex → HSL conversion and color-family classification.
//!
//! Classification runs in three tiers:
//! 1. low saturation resolves to black / gray / white by lightness
//! 2. the brown predicate, which outranks the orange and yellow hue bands
//! 3. hue banding
//!
//! The same band table backs every consumer (browse filters, the
//! auto-detected badge, random-by-family), so a color lands in one bucket
//! wherever it is looked at.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::enums::ColorFamily;

/// Saturation below which a color is treated as achromatic.
const GRAYSCALE_SATURATION: f64 = 0.10;
/// Achromatic colors darker than this are black.
const BLACK_LIGHTNESS: f64 = 0.15;
/// Achromatic colors lighter than this are white.
const WHITE_LIGHTNESS: f64 = 0.85;

/// Hue bands as `(lower inclusive, upper exclusive, family)`.
///
/// Red wraps: `[345, 360)` is checked here and `[0, 15)` sits first.
const HUE_BANDS: [(f64, f64, ColorFamily); 9] = [
    (0.0, 15.0, ColorFamily::Red),
    (15.0, 40.0, ColorFamily::Orange),
    (40.0, 65.0, ColorFamily::Yellow),
    (65.0, 165.0, ColorFamily::Green),
    (165.0, 195.0, ColorFamily::Cyan),
    (195.0, 255.0, ColorFamily::Blue),
    (255.0, 285.0, ColorFamily::Purple),
    (285.0, 345.0, ColorFamily::Pink),
    (345.0, 360.0, ColorFamily::Red),
];

/// Errors from parsing a hex color string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("Malformed hex color '{0}': expected 6 hex digits (#RRGGBB)")]
    Malformed(String),
}

/// A color in HSL space. `h` in degrees `[0, 360)`, `s` and `l` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// Parse `#RRGGBB` / `RRGGBB` (any case) into its three channels.
///
/// Three-digit shorthand is rejected, not expanded. Surrounding whitespace
/// is not stripped; callers trim user input.
///
/// # Errors
///
/// Returns [`ColorError::Malformed`] for anything other than six hex digits
/// with an optional leading `#`.
pub fn parse_hex(hex: &str) -> Result<[u8; 3], ColorError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);

    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ColorError::Malformed(hex.to_string()));
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).map_err(|_| ColorError::Malformed(hex.to_string()))
    };
    Ok([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}

/// Canonical storage form: uppercase with a leading `#`.
///
/// # Errors
///
/// Returns [`ColorError::Malformed`] if `hex` does not parse.
pub fn normalize_hex(hex: &str) -> Result<String, ColorError> {
    let [r, g, b] = parse_hex(hex)?;
    Ok(format!("#{r:02X}{g:02X}{b:02X}"))
}

/// Convert 8-bit RGB channels to HSL.
#[must_use]
#[allow(clippy::many_single_char_names)]
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> Hsl {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);

    let max_f = f64::from(max) / 255.0;
    let min_f = f64::from(min) / 255.0;
    let l = f64::midpoint(max_f, min_f);

    if max == min {
        return Hsl { h: 0.0, s: 0.0, l };
    }

    let d = max_f - min_f;
    let s = if l > 0.5 {
        d / (2.0 - max_f - min_f)
    } else {
        d / (max_f + min_f)
    };

    let (rf, gf, bf) = (
        f64::from(r) / 255.0,
        f64::from(g) / 255.0,
        f64::from(b) / 255.0,
    );
    let sector = if max == r {
        (gf - bf) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (bf - rf) / d + 2.0
    } else {
        (rf - gf) / d + 4.0
    };

    Hsl {
        h: (sector * 60.0) % 360.0,
        s,
        l,
    }
}

/// Convert a hex color string to HSL.
///
/// # Errors
///
/// Returns [`ColorError::Malformed`] if `hex` does not parse.
pub fn hex_to_hsl(hex: &str) -> Result<Hsl, ColorError> {
    let [r, g, b] = parse_hex(hex)?;
    Ok(rgb_to_hsl(r, g, b))
}

/// Dark, moderately saturated oranges and yellows read as brown.
fn is_brown(hsl: Hsl) -> bool {
    let Hsl { h, s, l } = hsl;
    let muted = (15.0..50.0).contains(&h) && s > 0.10 && s < 0.70 && l < 0.50;
    let deep = (20.0..40.0).contains(&h) && s > 0.30 && s < 0.80 && l < 0.40;
    muted || deep
}

fn hue_family(h: f64) -> ColorFamily {
    HUE_BANDS
        .iter()
        .find(|(lower, upper, _)| h >= *lower && h < *upper)
        .map_or(ColorFamily::Unknown, |(_, _, family)| *family)
}

/// Classify an already-converted color.
#[must_use]
pub fn classify_hsl(hsl: Hsl) -> ColorFamily {
    if hsl.s < GRAYSCALE_SATURATION {
        return if hsl.l < BLACK_LIGHTNESS {
            ColorFamily::Black
        } else if hsl.l > WHITE_LIGHTNESS {
            ColorFamily::White
        } else {
            ColorFamily::Gray
        };
    }

    if is_brown(hsl) {
        return ColorFamily::Brown;
    }

    hue_family(hsl.h)
}

/// Classify a hex color into its family. Malformed input is `Unknown`.
#[must_use]
pub fn classify(hex: &str) -> ColorFamily {
    hex_to_hsl(hex).map_or(ColorFamily::Unknown, classify_hsl)
}

/// Filter predicate: does `hex` belong to `family`?
///
/// A color satisfying the brown predicate never matches orange or yellow,
/// even when its hue sits inside those bands.
#[must_use]
pub fn family_matches(hex: &str, family: ColorFamily) -> bool {
    let Ok(hsl) = hex_to_hsl(hex) else {
        return family == ColorFamily::Unknown;
    };

    if matches!(family, ColorFamily::Orange | ColorFamily::Yellow) && is_brown(hsl) {
        return false;
    }

    classify_hsl(hsl) == family
}

/// Every family `hex` matches under [`family_matches`].
#[must_use]
pub fn matching_families(hex: &str) -> Vec<ColorFamily> {
    if parse_hex(hex).is_err() {
        return vec![ColorFamily::Unknown];
    }
    ColorFamily::ALL
        .into_iter()
        .filter(|family| family_matches(hex, *family))
        .collect()
}

/// The override when present, otherwise the derived family.
#[must_use]
pub fn effective_family(family_override: Option<ColorFamily>, hex: &str) -> ColorFamily {
    family_override.unwrap_or_else(|| classify(hex))
}
