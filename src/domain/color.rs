//! Color detection and presentation.

use serde::{Deserialize, Serialize};

use crate::domain::document::Range;
use crate::domain::value::format_number;

/// Channels in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorInformation {
    pub range: Range,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPresentation {
    pub label: String,
}

/// Parses a CSS color string. Only functional notations, hex and named colors
/// qualify; `transparent` and `currentColor` are not swatches.
pub fn parse_color(value: &str) -> Option<Rgba> {
    let trimmed = value.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower == "transparent" || lower == "currentcolor" {
        return None;
    }
    if !is_functional(trimmed) && !is_hex(trimmed) && !is_named(trimmed) {
        return None;
    }
    let color = csscolorparser::parse(trimmed).ok()?;
    Some(Rgba {
        red: f64::from(color.r),
        green: f64::from(color.g),
        blue: f64::from(color.b),
        alpha: f64::from(color.a),
    })
}

fn is_functional(value: &str) -> bool {
    let Some(open) = value.find('(') else {
        return false;
    };
    let name = value[..open].trim_end();
    matches!(name, "rgb" | "rgba" | "hsl" | "hsla")
        && value.ends_with(')')
        && !value[open + 1..value.len() - 1].contains(')')
        && value.len() > open + 2
}

fn is_hex(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit()))
}

fn is_named(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_lowercase())
}

// ─────────────────────────────────────────────────────────────────────────────
// Formatting
// ─────────────────────────────────────────────────────────────────────────────

fn channel(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

/// `#rrggbbaa`.
pub fn format_hex8(color: &Rgba) -> String {
    format!(
        "#{:02x}{:02x}{:02x}{:02x}",
        channel(color.red),
        channel(color.green),
        channel(color.blue),
        channel(color.alpha)
    )
}

pub fn format_rgb(color: &Rgba) -> String {
    let (r, g, b) = (channel(color.red), channel(color.green), channel(color.blue));
    if color.alpha < 1.0 {
        let alpha = format_number(round_to(color.alpha.max(0.0), 4));
        format!("rgba({}, {}, {}, {})", r, g, b, alpha)
    } else {
        format!("rgb({}, {}, {})", r, g, b)
    }
}

pub fn format_hsl(color: &Rgba) -> String {
    let (h, s, l) = to_hsl(color);
    let (h, s, l) = (
        format_number(round_to(h, 2)),
        format_number(round_to(s * 100.0, 2)),
        format_number(round_to(l * 100.0, 2)),
    );
    if color.alpha < 1.0 {
        let alpha = format_number(round_to(color.alpha.max(0.0), 4));
        format!("hsla({}, {}%, {}%, {})", h, s, l, alpha)
    } else {
        format!("hsl({}, {}%, {}%)", h, s, l)
    }
}

fn to_hsl(color: &Rgba) -> (f64, f64, f64) {
    let (r, g, b) = (
        color.red.clamp(0.0, 1.0),
        color.green.clamp(0.0, 1.0),
        color.blue.clamp(0.0, 1.0),
    );
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let lightness = (max + min) / 2.0;
    let delta = max - min;
    if delta == 0.0 {
        return (0.0, 0.0, lightness);
    }

    let saturation = delta / (1.0 - (2.0 * lightness - 1.0).abs());
    let hue = if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    (hue, saturation, lightness)
}

/// Edit choices for the swatch at `range`. The previous color is looked up by
/// range start in `previous`, which must be sorted by it.
pub fn color_presentations(previous: &[ColorInformation], range: Range, color: Rgba) -> Vec<ColorPresentation> {
    let prior = previous
        .binary_search_by(|info| info.range.start.cmp(&range.start))
        .ok()
        .and_then(|index| previous.get(index));

    let mut hex = format_hex8(&color);
    let prior_opaque = prior.map_or(true, |info| info.color.alpha == 0.0 || info.color.alpha == 1.0);
    if color.alpha == 1.0 && prior_opaque {
        hex.truncate(hex.len() - 2);
    }

    vec![
        ColorPresentation { label: hex },
        ColorPresentation { label: format_rgb(&color) },
        ColorPresentation { label: format_hsl(&color) },
    ]
}
