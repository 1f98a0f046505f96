//! Static values produced by the partial evaluator, with the JavaScript
//! conversions the evaluator needs (`ToString`, `ToNumber`, truthiness).

use indexmap::IndexMap;
use num_bigint::BigInt;

use crate::domain::ast::Span;

/// Result of evaluating an expression without executing it.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// Not statically known.
    Dynamic,
    /// Fully known value.
    Static { value: Value, span: Span },
    /// A symbolically known name (`tokens.primary`) whose value is not.
    Reference { path: String, span: Span },
}

impl Evaluation {
    pub fn at(value: Value, span: Span) -> Self {
        Evaluation::Static { value, span }
    }

    pub fn reference(path: impl Into<String>, span: Span) -> Self {
        Evaluation::Reference { path: path.into(), span }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Evaluation::Dynamic)
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Evaluation::Static { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Evaluation::Static { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Evaluation::Static { span, .. } | Evaluation::Reference { span, .. } => Some(*span),
            Evaluation::Dynamic => None,
        }
    }
}

/// A JavaScript value known at analysis time. Objects keep insertion order.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(BigInt),
    String(String),
    Regex { pattern: String, flags: String },
    Array(Vec<Evaluation>),
    Object(IndexMap<String, Evaluation>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn is_primitive(&self) -> bool {
        !matches!(self, Value::Regex { .. } | Value::Array(_) | Value::Object(_))
    }

    pub fn truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::BigInt(b) => *b != BigInt::from(0),
            Value::String(s) => !s.is_empty(),
            Value::Regex { .. } | Value::Array(_) | Value::Object(_) => true,
        }
    }

    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::Null | Value::Regex { .. } | Value::Array(_) | Value::Object(_) => "object",
        }
    }

    /// `ToString` for primitives. Composite values are not folded.
    pub fn to_js_string(&self) -> Option<String> {
        match self {
            Value::Undefined => Some("undefined".into()),
            Value::Null => Some("null".into()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(format_number(*n)),
            Value::BigInt(b) => Some(b.to_string()),
            Value::String(s) => Some(s.clone()),
            Value::Regex { .. } | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// `ToNumber` for primitives. BigInts and composites are not folded.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Value::Undefined => Some(f64::NAN),
            Value::Null => Some(0.0),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Number(n) => Some(*n),
            Value::String(s) => Some(string_to_number(s)),
            Value::BigInt(_) | Value::Regex { .. } | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

/// Formats a number the way JavaScript's `Number.prototype.toString` does.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".into();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity".into() } else { "-Infinity".into() };
    }
    if n == 0.0 {
        return "0".into();
    }
    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{}", n);
    }
    let exponential = format!("{:e}", n);
    match exponential.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
        _ => exponential,
    }
}

/// `ToInt32`.
pub fn to_int32(n: f64) -> i32 {
    to_uint32(n) as i32
}

/// `ToUint32`.
pub fn to_uint32(n: f64) -> u32 {
    if !n.is_finite() {
        return 0;
    }
    n.trunc().rem_euclid(4_294_967_296.0) as u32
}

fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    let radix = match trimmed.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u64::from_str_radix(&trimmed[2..], radix)
            .map(|v| v as f64)
            .unwrap_or(f64::NAN);
    }
    match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if trimmed.chars().all(|c| c.is_ascii_digit() || "+-.eE".contains(c)) => {
            trimmed.parse::<f64>().unwrap_or(f64::NAN)
        }
        _ => f64::NAN,
    }
}
