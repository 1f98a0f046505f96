//! CSS value normalization matching what the style compiler emits.

use crate::domain::value::format_number;
use crate::ports::{CssScalar, ValueNormalizer};

/// Properties whose numeric values take no unit.
const UNITLESS_PROPERTIES: &[&str] = &[
    "animationIterationCount",
    "aspectRatio",
    "borderImageOutset",
    "borderImageSlice",
    "borderImageWidth",
    "boxFlex",
    "boxFlexGroup",
    "boxOrdinalGroup",
    "columnCount",
    "columns",
    "fillOpacity",
    "flex",
    "flexGrow",
    "flexNegative",
    "flexOrder",
    "flexPositive",
    "flexShrink",
    "floodOpacity",
    "fontWeight",
    "gridArea",
    "gridColumn",
    "gridColumnEnd",
    "gridColumnSpan",
    "gridColumnStart",
    "gridRow",
    "gridRowEnd",
    "gridRowSpan",
    "gridRowStart",
    "lineClamp",
    "lineHeight",
    "mathDepth",
    "opacity",
    "order",
    "orphans",
    "stopOpacity",
    "strokeDasharray",
    "strokeDashoffset",
    "strokeMiterlimit",
    "strokeOpacity",
    "strokeWidth",
    "tabSize",
    "widows",
    "zIndex",
    "zoom",
];

/// Properties whose numeric values are milliseconds.
const TIME_PROPERTIES: &[&str] = &["animationDelay", "animationDuration", "transitionDelay", "transitionDuration"];

/// Keywords left unquoted in `content`-like properties.
const CONTENT_KEYWORDS: &[&str] = &[
    "normal",
    "none",
    "open-quote",
    "close-quote",
    "no-open-quote",
    "no-close-quote",
    "inherit",
    "initial",
    "revert",
    "revert-layer",
    "unset",
];

#[derive(Debug, Clone, Default)]
pub struct StylexValueNormalizer {
    use_rem_for_font_size: bool,
}

impl StylexValueNormalizer {
    pub fn new(use_rem_for_font_size: bool) -> Self {
        Self { use_rem_for_font_size }
    }

    fn number(&self, property: &str, value: f64) -> String {
        if property == "fontSize" && self.use_rem_for_font_size {
            return format!("{}rem", format_number(round4(value / 16.0)));
        }
        let rounded = round4(value);
        if rounded == 0.0 {
            return "0".to_string();
        }
        let suffix = if property.starts_with("--") || UNITLESS_PROPERTIES.contains(&property) {
            ""
        } else if TIME_PROPERTIES.contains(&property) {
            "ms"
        } else {
            "px"
        };
        strip_leading_zeros(&format!("{}{}", format_number(rounded), suffix))
    }

    fn string(&self, property: &str, value: &str) -> String {
        if value.is_empty() {
            return "\"\"".to_string();
        }
        let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
        if matches!(property, "content" | "quotes" | "hyphenateCharacter") {
            return quote_content(&collapsed);
        }
        if property.starts_with("--") {
            return collapsed;
        }
        strip_leading_zeros(&collapsed)
    }
}

impl ValueNormalizer for StylexValueNormalizer {
    fn normalize(&self, property: &str, value: CssScalar<'_>) -> String {
        match value {
            CssScalar::Number(n) => self.number(property, n),
            CssScalar::Str(s) => self.string(property, s),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Private helpers
// ─────────────────────────────────────────────────────────────────────────────

fn round4(value: f64) -> f64 {
    (value * 10000.0).round() / 10000.0
}

fn quote_content(value: &str) -> String {
    let already_quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"')) || (value.starts_with('\'') && value.ends_with('\'')));
    if already_quoted || value.contains('(') || CONTENT_KEYWORDS.contains(&value) {
        value.to_string()
    } else {
        format!("\"{}\"", value)
    }
}

/// `0.5em` → `.5em`, leaving `10.5` and identifiers alone.
fn strip_leading_zeros(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len());
    for (i, &ch) in chars.iter().enumerate() {
        let starts_number = i == 0 || !(chars[i - 1].is_ascii_alphanumeric() || chars[i - 1] == '.');
        let is_leading_zero = ch == '0'
            && starts_number
            && chars.get(i + 1) == Some(&'.')
            && chars.get(i + 2).is_some_and(|c| c.is_ascii_digit());
        if !is_leading_zero {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(property: &str, value: CssScalar<'_>) -> String {
        StylexValueNormalizer::default().normalize(property, value)
    }

    #[test]
    fn test_numbers_get_units() {
        assert_eq!(norm("width", CssScalar::Number(100.0)), "100px");
        assert_eq!(norm("opacity", CssScalar::Number(0.5)), ".5");
        assert_eq!(norm("zIndex", CssScalar::Number(10.0)), "10");
        assert_eq!(norm("transitionDuration", CssScalar::Number(300.0)), "300ms");
        assert_eq!(norm("margin", CssScalar::Number(0.0)), "0");
        assert_eq!(norm("--gap", CssScalar::Number(4.0)), "4");
        assert_eq!(norm("width", CssScalar::Number(1.234567)), "1.2346px");
    }

    #[test]
    fn test_rem_font_size() {
        let normalizer = StylexValueNormalizer::new(true);
        assert_eq!(normalizer.normalize("fontSize", CssScalar::Number(24.0)), "1.5rem");
        assert_eq!(norm("fontSize", CssScalar::Number(24.0)), "24px");
    }

    #[test]
    fn test_strings() {
        assert_eq!(norm("margin", CssScalar::Str("  0.5em   auto ")), ".5em auto");
        assert_eq!(norm("color", CssScalar::Str("red")), "red");
        assert_eq!(norm("width", CssScalar::Str("10.5px")), "10.5px");
        assert_eq!(norm("content", CssScalar::Str("")), "\"\"");
        assert_eq!(norm("content", CssScalar::Str("hi")), "\"hi\"");
        assert_eq!(norm("content", CssScalar::Str("none")), "none");
        assert_eq!(norm("content", CssScalar::Str("attr(title)")), "attr(title)");
    }
}
