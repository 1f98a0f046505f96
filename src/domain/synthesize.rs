//! CSS preview synthesis.
//!
//! Given where a style key sits (which API call, which caller, which parent
//! keys) and what its value evaluated to, produce the CSS rule the compiler
//! would emit for it.

use crate::domain::scope::CallKind;
use crate::domain::value::{Evaluation, Value};
use crate::ports::{CssScalar, ValueNormalizer};

/// `backgroundColor` → `background-color`, `WebkitAppearance` →
/// `-webkit-appearance`.
pub fn dashify(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut previous: Option<char> = None;
    for ch in name.chars() {
        if ch.is_ascii_uppercase() && previous.map_or(true, |p| p.is_ascii_lowercase()) {
            out.push('-');
        }
        out.push(ch.to_ascii_lowercase());
        previous = Some(ch);
    }
    out
}

/// Where a declaration sits in the style tree.
#[derive(Debug, Clone, Copy)]
pub struct DeclarationContext<'a> {
    pub call: CallKind,
    /// Variable the call result is assigned to, if any.
    pub caller: Option<&'a str>,
    /// Enclosing keys, outermost first.
    pub parents: &'a [String],
    pub key: &'a str,
    /// CSS value type from a `types.*()` wrapper.
    pub value_type: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssPreview {
    lines: Vec<String>,
}

impl CssPreview {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn to_markdown(&self) -> String {
        format!("```css\n{}\n```", self.text())
    }
}

/// Builds the CSS preview for one declaration. `None` when the value cannot
/// be rendered statically.
pub fn synthesize(
    ctx: &DeclarationContext<'_>,
    value: &Evaluation,
    normalizer: &dyn ValueNormalizer,
) -> Option<CssPreview> {
    let class_line = class_line(ctx);

    let mut at_rules: Vec<String> = class_line.iter().filter(|c| c.starts_with('@')).cloned().collect();
    if ctx.call == CallKind::Keyframes {
        at_rules.insert(0, format!("@keyframes {}", ctx.caller.unwrap_or("unknown")));
    }
    let indentation = "  ".repeat(at_rules.len() + 1);
    let outer = &indentation[2..];

    let property = property_name(ctx, &class_line);
    let dashed = dashify(&property);
    let values = declaration_values(&property, value, normalizer)?;

    let mut lines = Vec::new();
    if let Some(value_type) = ctx.value_type {
        lines.push(format!("@property {} {{", dashed));
        lines.push(format!("  syntax: \"<{}>\";", value_type));
        lines.push("}".to_string());
        lines.push(String::new());
    }
    for (depth, rule) in at_rules.iter().enumerate() {
        lines.push(format!("{}{} {{", "  ".repeat(depth), rule));
    }
    lines.push(format!("{}{} {{", outer, selector(ctx.call, &class_line)));
    for declared in values {
        lines.push(format!("{}{}: {};", indentation, dashed, declared));
    }
    lines.push(format!("{}}}", outer));
    for depth in (0..at_rules.len()).rev() {
        lines.push(format!("{}}}", "  ".repeat(depth)));
    }

    (lines.len() > 2).then_some(CssPreview { lines })
}

// ─────────────────────────────────────────────────────────────────────────────
// Private helpers
// ─────────────────────────────────────────────────────────────────────────────

fn class_line(ctx: &DeclarationContext<'_>) -> Vec<String> {
    let mut line = Vec::with_capacity(ctx.parents.len() + 2);
    let mut parents = ctx.parents;
    if ctx.call.is_theme() {
        line.push(match ctx.caller {
            Some(caller) => format!(".{}", caller),
            None => ":root".to_string(),
        });
        // The first parent names the variable, not a selector.
        parents = parents.get(1..).unwrap_or_default();
    }
    line.extend(parents.iter().cloned());
    line.push(ctx.key.to_string());
    line
}

fn property_name(ctx: &DeclarationContext<'_>, class_line: &[String]) -> String {
    if ctx.call.is_theme() {
        let name = ctx.parents.first().map(String::as_str).unwrap_or(ctx.key);
        return if name.starts_with("--") {
            name.to_string()
        } else {
            format!("--{}", name)
        };
    }
    class_line
        .iter()
        .rev()
        .find(|c| !c.starts_with(':') && !c.starts_with('@') && c.as_str() != "default")
        .cloned()
        .unwrap_or_else(|| "unknown".to_string())
}

fn selector(call: CallKind, class_line: &[String]) -> String {
    if call != CallKind::Create {
        return class_line.first().cloned().unwrap_or_else(|| "unknown".to_string());
    }
    // Sorted then reversed so pseudo-classes land after the class name.
    let mut parts: Vec<&str> = class_line
        .iter()
        .enumerate()
        .filter(|(index, c)| *index == 0 || c.starts_with(':'))
        .map(|(_, c)| c.as_str())
        .collect();
    parts.sort_unstable();
    parts.reverse();
    let joined = parts.concat();
    if joined.is_empty() {
        ".unknown".to_string()
    } else {
        format!(".{}", joined)
    }
}

fn declaration_values(property: &str, value: &Evaluation, normalizer: &dyn ValueNormalizer) -> Option<Vec<String>> {
    match value {
        // One unrenderable fallback drops the whole declaration.
        Evaluation::Static { value: Value::Array(items), .. } => {
            items.iter().map(|item| scalar_value(property, item, normalizer)).collect()
        }
        other => scalar_value(property, other, normalizer).map(|v| vec![v]),
    }
}

fn scalar_value(property: &str, value: &Evaluation, normalizer: &dyn ValueNormalizer) -> Option<String> {
    match value {
        Evaluation::Static { value, .. } => match value {
            Value::Null | Value::Undefined => Some("initial".to_string()),
            Value::String(s) => Some(normalizer.normalize(property, CssScalar::Str(s))),
            Value::Number(n) => Some(normalizer.normalize(property, CssScalar::Number(*n))),
            _ => None,
        },
        Evaluation::Reference { path, .. } => Some(if matches!(property, "animation" | "animationName") {
            path.clone()
        } else {
            format!("var(--{})", path)
        }),
        Evaluation::Dynamic => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ast::Span;
    use pretty_assertions::assert_eq;

    struct Plain;

    impl ValueNormalizer for Plain {
        fn normalize(&self, _property: &str, value: CssScalar<'_>) -> String {
            match value {
                CssScalar::Str(s) => s.to_string(),
                CssScalar::Number(n) => format!("{}px", n),
            }
        }
    }

    fn text(value: &str) -> Evaluation {
        Evaluation::at(Value::String(value.into()), Span::default())
    }

    fn parents(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_dashify() {
        assert_eq!(dashify("backgroundColor"), "background-color");
        assert_eq!(dashify("WebkitAppearance"), "-webkit-appearance");
        assert_eq!(dashify("--myVar"), "--my-var");
        assert_eq!(dashify("lengthPercentage"), "length-percentage");
        assert_eq!(dashify("color"), "color");
    }

    #[test]
    fn test_create_with_pseudo_class() {
        let parents = parents(&["button", "color"]);
        let ctx = DeclarationContext {
            call: CallKind::Create,
            caller: Some("styles"),
            parents: &parents,
            key: ":hover",
            value_type: None,
        };
        let preview = synthesize(&ctx, &text("blue"), &Plain).expect("preview");
        assert_eq!(preview.text(), ".button:hover {\n  color: blue;\n}");
    }

    #[test]
    fn test_default_key_uses_parent_property() {
        let parents = parents(&["button", "color"]);
        let ctx = DeclarationContext {
            call: CallKind::Create,
            caller: None,
            parents: &parents,
            key: "default",
            value_type: None,
        };
        let preview = synthesize(&ctx, &text("red"), &Plain).expect("preview");
        assert_eq!(preview.text(), ".button {\n  color: red;\n}");
    }

    #[test]
    fn test_at_rules_nest() {
        let parents = parents(&["card", "width", "@media (max-width: 800px)"]);
        let ctx = DeclarationContext {
            call: CallKind::Create,
            caller: None,
            parents: &parents,
            key: ":hover",
            value_type: None,
        };
        let value = Evaluation::at(Value::Number(100.0), Span::default());
        let preview = synthesize(&ctx, &value, &Plain).expect("preview");
        assert_eq!(
            preview.text(),
            "@media (max-width: 800px) {\n  .card:hover {\n    width: 100px;\n  }\n}"
        );
    }

    #[test]
    fn test_keyframes() {
        let parents = parents(&["from"]);
        let ctx = DeclarationContext {
            call: CallKind::Keyframes,
            caller: Some("fadeIn"),
            parents: &parents,
            key: "opacity",
            value_type: None,
        };
        let value = Evaluation::at(Value::String("0".into()), Span::default());
        let preview = synthesize(&ctx, &value, &Plain).expect("preview");
        assert_eq!(preview.text(), "@keyframes fadeIn {\n  from {\n    opacity: 0;\n  }\n}");
    }

    #[test]
    fn test_define_vars_with_property_type() {
        let parents = parents(&["primaryColor"]);
        let ctx = DeclarationContext {
            call: CallKind::DefineVars,
            caller: Some("colors"),
            parents: &parents,
            key: "default",
            value_type: Some("color"),
        };
        let preview = synthesize(&ctx, &text("red"), &Plain).expect("preview");
        assert_eq!(
            preview.lines(),
            &[
                "@property --primary-color {",
                "  syntax: \"<color>\";",
                "}",
                "",
                ".colors {",
                "  --primary-color: red;",
                "}",
            ]
        );
    }

    #[test]
    fn test_theme_without_caller_uses_root() {
        let ctx = DeclarationContext {
            call: CallKind::DefineVars,
            caller: None,
            parents: &[],
            key: "accent",
            value_type: None,
        };
        let preview = synthesize(&ctx, &text("blue"), &Plain).expect("preview");
        assert_eq!(preview.text(), ":root {\n  --accent: blue;\n}");
        assert_eq!(preview.to_markdown(), "```css\n:root {\n  --accent: blue;\n}\n```");
    }

    #[test]
    fn test_fallback_list_and_references() {
        let ctx = DeclarationContext {
            call: CallKind::Create,
            caller: None,
            parents: &parents(&["root"]),
            key: "animationName",
            value_type: None,
        };
        let value = Evaluation::at(
            Value::Array(vec![text("none"), Evaluation::reference("fadeIn", Span::default())]),
            Span::default(),
        );
        let preview = synthesize(&ctx, &value, &Plain).expect("preview");
        assert_eq!(preview.text(), ".root {\n  animation-name: none;\n  animation-name: fadeIn;\n}");

        let ctx = DeclarationContext { key: "color", ..ctx };
        let value = Evaluation::reference("tokens.primary", Span::default());
        let preview = synthesize(&ctx, &value, &Plain).expect("preview");
        assert_eq!(preview.text(), ".root {\n  color: var(--tokens.primary);\n}");
    }

    #[test]
    fn test_unrenderable_values_abort() {
        let ctx = DeclarationContext {
            call: CallKind::Create,
            caller: None,
            parents: &parents(&["root"]),
            key: "color",
            value_type: None,
        };
        assert_eq!(synthesize(&ctx, &Evaluation::Dynamic, &Plain), None);
        let flag = Evaluation::at(Value::Bool(true), Span::default());
        assert_eq!(synthesize(&ctx, &flag, &Plain), None);
        let mixed = Evaluation::at(Value::Array(vec![text("red"), Evaluation::Dynamic]), Span::default());
        assert_eq!(synthesize(&ctx, &mixed, &Plain), None);
        let null = Evaluation::at(Value::Null, Span::default());
        assert_eq!(synthesize(&ctx, &null, &Plain).map(|p| p.text()), Some(".root {\n  color: initial;\n}".into()));
    }
}
