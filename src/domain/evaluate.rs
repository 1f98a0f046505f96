//! Partial evaluator.
//!
//! Folds the side-effect-free subset of JavaScript expressions into static
//! values. Anything it cannot prove is [`Evaluation::Dynamic`]; it never runs
//! user code and never fails.

use std::cmp::Ordering;

use indexmap::IndexMap;
use num_bigint::BigInt;

use crate::domain::ast::{
    ArrayLiteral, Binary, Call, ExprOrSpread, Identifier, Member, Node, ObjectLiteral, Template,
    Unary,
};
use crate::domain::scope::{ApiMember, ScopeTracker};
use crate::domain::value::{format_number, to_int32, to_uint32, Evaluation, Value};

/// Largest bigint exponent folded; anything above is left dynamic.
const MAX_BIGINT_EXPONENT: u32 = 4096;

pub fn evaluate(expr: &Node, tracker: &ScopeTracker) -> Evaluation {
    match expr {
        Node::StringLiteral(lit) => Evaluation::at(Value::String(lit.value.clone()), lit.span),
        Node::NumericLiteral(lit) => Evaluation::at(Value::Number(lit.value), lit.span),
        Node::BooleanLiteral(lit) => Evaluation::at(Value::Bool(lit.value), lit.span),
        Node::NullLiteral(lit) => Evaluation::at(Value::Null, lit.span),
        Node::BigIntLiteral(lit) => match lit.value() {
            Some(value) => Evaluation::at(Value::BigInt(value), lit.span),
            None => Evaluation::Dynamic,
        },
        Node::RegExpLiteral(lit) => Evaluation::at(
            Value::Regex {
                pattern: lit.pattern.clone(),
                flags: lit.flags.clone(),
            },
            lit.span,
        ),
        Node::Identifier(ident) => identifier(ident, tracker),
        Node::ArrayExpression(array) => array_literal(array, tracker),
        Node::ObjectExpression(object) => object_literal(object, tracker),
        Node::TemplateLiteral(template) => template_literal(template, tracker),
        Node::BinaryExpression(binary) => binary_expression(binary, tracker),
        Node::UnaryExpression(unary) => unary_expression(unary, tracker),
        Node::ConditionalExpression(cond) => match evaluate(&cond.test, tracker).into_value() {
            Some(test) if test.truthy() => evaluate(&cond.consequent, tracker),
            Some(_) => match &cond.alternate {
                Some(alternate) => evaluate(alternate, tracker),
                None => Evaluation::Dynamic,
            },
            None => Evaluation::Dynamic,
        },
        Node::MemberExpression(member) => member_expression(member, tracker),
        Node::CallExpression(call) => call_expression(call, tracker),
        Node::ParenthesisExpression(inner)
        | Node::TsConstAssertion(inner)
        | Node::TsNonNullExpression(inner)
        | Node::Computed(inner) => evaluate(&inner.expression, tracker),
        Node::TsAsExpression(cast)
        | Node::TsSatisfiesExpression(cast)
        | Node::TsTypeAssertion(cast)
        | Node::TsInstantiation(cast) => evaluate(&cast.expression, tracker),
        Node::SequenceExpression(seq) => match seq.expressions.last() {
            Some(last) => evaluate(last, tracker),
            None => Evaluation::Dynamic,
        },
        Node::AssignmentExpression(assign) => evaluate(&assign.right, tracker),
        Node::AwaitExpression(arg) => match &arg.argument {
            Some(argument) => evaluate(argument, tracker),
            None => Evaluation::Dynamic,
        },
        _ => Evaluation::Dynamic,
    }
}

/// Static name of an object key: identifiers, strings, numbers, and computed
/// keys that fold to a string or number.
pub fn property_key(key: &Node, tracker: &ScopeTracker) -> Option<String> {
    match key {
        Node::Identifier(ident) => Some(ident.value.clone()),
        Node::StringLiteral(lit) => Some(lit.value.clone()),
        Node::NumericLiteral(lit) => Some(format_number(lit.value)),
        Node::BigIntLiteral(lit) => lit.value().map(|value| value.to_string()),
        Node::Computed(computed) => match evaluate(&computed.expression, tracker).into_value() {
            Some(value @ (Value::String(_) | Value::Number(_))) => value.to_js_string(),
            _ => None,
        },
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Literals
// ─────────────────────────────────────────────────────────────────────────────

fn identifier(ident: &Identifier, tracker: &ScopeTracker) -> Evaluation {
    if ident.value == "undefined" {
        return Evaluation::at(Value::Undefined, ident.span);
    }
    match tracker.lookup(&ident.value) {
        Some(value) => Evaluation::at(value.clone(), ident.span),
        None => Evaluation::reference(ident.value.clone(), ident.span),
    }
}

fn array_literal(array: &ArrayLiteral, tracker: &ScopeTracker) -> Evaluation {
    let items = array_elements(array.elements.iter().flatten(), tracker);
    Evaluation::at(Value::Array(items), array.span)
}

/// Evaluates elements in order. A spread of a static array is inlined; any
/// other spread stays as one opaque element.
fn array_elements<'a>(
    elements: impl Iterator<Item = &'a ExprOrSpread>,
    tracker: &ScopeTracker,
) -> Vec<Evaluation> {
    let mut items = Vec::new();
    for element in elements {
        let result = evaluate(&element.expression, tracker);
        if !element.is_spread() {
            items.push(result);
            continue;
        }
        match result {
            Evaluation::Static {
                value: Value::Array(inner),
                ..
            } => items.extend(inner),
            _ => items.push(Evaluation::Dynamic),
        }
    }
    items
}

fn object_literal(object: &ObjectLiteral, tracker: &ScopeTracker) -> Evaluation {
    let mut entries = IndexMap::new();
    for property in &object.properties {
        match property {
            Node::KeyValueProperty(kv) | Node::AssignmentProperty(kv) => {
                if let Some(key) = property_key(&kv.key, tracker) {
                    entries.insert(key, evaluate(&kv.value, tracker));
                }
            }
            Node::Identifier(ident) => {
                let result = identifier(ident, tracker);
                if !result.is_dynamic() {
                    entries.insert(ident.value.clone(), result);
                }
            }
            Node::SpreadElement(spread) => {
                if let Some(Value::Object(inner)) = evaluate(&spread.arguments, tracker).into_value() {
                    entries.extend(inner);
                }
            }
            // Getters, setters and methods are not data.
            _ => {}
        }
    }
    Evaluation::at(Value::Object(entries), object.span)
}

fn template_literal(template: &Template, tracker: &ScopeTracker) -> Evaluation {
    let mut text = String::new();
    for (index, quasi) in template.quasis.iter().enumerate() {
        let Node::TemplateElement(element) = quasi else {
            return Evaluation::Dynamic;
        };
        text.push_str(element.cooked.as_deref().unwrap_or(&element.raw));

        if let Some(expr) = template.expressions.get(index) {
            match evaluate(expr, tracker).into_value().and_then(|v| v.to_js_string()) {
                Some(part) => text.push_str(&part),
                None => return Evaluation::Dynamic,
            }
        }
    }
    Evaluation::at(Value::String(text), template.span)
}

// ─────────────────────────────────────────────────────────────────────────────
// Operators
// ─────────────────────────────────────────────────────────────────────────────

fn binary_expression(binary: &Binary, tracker: &ScopeTracker) -> Evaluation {
    if matches!(binary.operator.as_str(), "&&" | "||" | "??") {
        return logical(binary, tracker);
    }
    let left = evaluate(&binary.left, tracker).into_value();
    let right = evaluate(&binary.right, tracker).into_value();
    let (Some(left), Some(right)) = (left, right) else {
        return Evaluation::Dynamic;
    };
    match binary_operation(&binary.operator, &left, &right) {
        Some(value) => Evaluation::at(value, binary.span),
        None => Evaluation::Dynamic,
    }
}

/// Short-circuits on a static left operand; the right side is only
/// evaluated when it decides the result.
fn logical(binary: &Binary, tracker: &ScopeTracker) -> Evaluation {
    let left = evaluate(&binary.left, tracker);
    let Some(value) = left.value() else {
        return Evaluation::Dynamic;
    };
    let keep_left = match binary.operator.as_str() {
        "&&" => !value.truthy(),
        "||" => value.truthy(),
        _ => !value.is_nullish(),
    };
    if keep_left {
        left
    } else {
        evaluate(&binary.right, tracker)
    }
}

fn binary_operation(op: &str, left: &Value, right: &Value) -> Option<Value> {
    match op {
        "+" => add(left, right),
        "-" | "*" | "/" | "%" | "**" => arithmetic(op, left, right),
        "<" | "<=" | ">" | ">=" => compare(op, left, right).map(Value::Bool),
        "===" => strict_equals(left, right).map(Value::Bool),
        "!==" => strict_equals(left, right).map(|eq| Value::Bool(!eq)),
        "==" => loose_equals(left, right).map(Value::Bool),
        "!=" => loose_equals(left, right).map(|eq| Value::Bool(!eq)),
        "|" | "&" | "^" | "<<" | ">>" | ">>>" => bitwise(op, left, right),
        "in" => has_property(left, right).map(Value::Bool),
        _ => None,
    }
}

fn add(left: &Value, right: &Value) -> Option<Value> {
    if !left.is_primitive() || !right.is_primitive() {
        return None;
    }
    if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) {
        let mut text = left.to_js_string()?;
        text.push_str(&right.to_js_string()?);
        return Some(Value::String(text));
    }
    arithmetic("+", left, right)
}

fn arithmetic(op: &str, left: &Value, right: &Value) -> Option<Value> {
    match (left, right) {
        (Value::BigInt(a), Value::BigInt(b)) => bigint_arithmetic(op, a, b).map(Value::BigInt),
        (Value::BigInt(_), _) | (_, Value::BigInt(_)) => None,
        _ => {
            let (a, b) = (left.to_number()?, right.to_number()?);
            let result = match op {
                "+" => a + b,
                "-" => a - b,
                "*" => a * b,
                "/" => a / b,
                "%" => a % b,
                "**" => a.powf(b),
                _ => return None,
            };
            Some(Value::Number(result))
        }
    }
}

fn bigint_arithmetic(op: &str, a: &BigInt, b: &BigInt) -> Option<BigInt> {
    let zero = BigInt::from(0);
    match op {
        "+" => Some(a + b),
        "-" => Some(a - b),
        "*" => Some(a * b),
        "/" if *b != zero => Some(a / b),
        "%" if *b != zero => Some(a % b),
        "**" => u32::try_from(b)
            .ok()
            .filter(|exp| *exp <= MAX_BIGINT_EXPONENT)
            .map(|exp| a.pow(exp)),
        _ => None,
    }
}

fn compare(op: &str, left: &Value, right: &Value) -> Option<bool> {
    let ordering = match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.encode_utf16().cmp(b.encode_utf16())),
        (Value::BigInt(a), Value::BigInt(b)) => Some(a.cmp(b)),
        (Value::BigInt(_), _) | (_, Value::BigInt(_)) => return None,
        _ => left.to_number()?.partial_cmp(&right.to_number()?),
    };
    // NaN compares false both ways.
    let Some(ordering) = ordering else {
        return Some(false);
    };
    Some(match op {
        "<" => ordering == Ordering::Less,
        "<=" => ordering != Ordering::Greater,
        ">" => ordering == Ordering::Greater,
        _ => ordering != Ordering::Less,
    })
}

fn strict_equals(left: &Value, right: &Value) -> Option<bool> {
    match (left, right) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => Some(true),
        (Value::Bool(a), Value::Bool(b)) => Some(a == b),
        (Value::Number(a), Value::Number(b)) => Some(a == b),
        (Value::BigInt(a), Value::BigInt(b)) => Some(a == b),
        (Value::String(a), Value::String(b)) => Some(a == b),
        _ if left.is_primitive() && right.is_primitive() => Some(false),
        // Object identity is unknown.
        _ => None,
    }
}

fn loose_equals(left: &Value, right: &Value) -> Option<bool> {
    if left.is_nullish() || right.is_nullish() {
        return Some(left.is_nullish() && right.is_nullish());
    }
    if std::mem::discriminant(left) == std::mem::discriminant(right) {
        return strict_equals(left, right);
    }
    if left.is_primitive() && right.is_primitive() {
        return Some(left.to_number()? == right.to_number()?);
    }
    None
}

fn bitwise(op: &str, left: &Value, right: &Value) -> Option<Value> {
    let (a, b) = (left.to_number()?, right.to_number()?);
    let shift = to_uint32(b) & 31;
    let result = match op {
        "|" => f64::from(to_int32(a) | to_int32(b)),
        "&" => f64::from(to_int32(a) & to_int32(b)),
        "^" => f64::from(to_int32(a) ^ to_int32(b)),
        "<<" => f64::from(to_int32(a).wrapping_shl(shift)),
        ">>" => f64::from(to_int32(a) >> shift),
        ">>>" => f64::from(to_uint32(a) >> shift),
        _ => return None,
    };
    Some(Value::Number(result))
}

fn has_property(key: &Value, target: &Value) -> Option<bool> {
    let key = key.to_js_string()?;
    match target {
        Value::Object(entries) => Some(entries.contains_key(&key)),
        Value::Array(items) => {
            Some(key == "length" || key.parse::<usize>().is_ok_and(|i| i < items.len()))
        }
        _ => None,
    }
}

fn unary_expression(unary: &Unary, tracker: &ScopeTracker) -> Evaluation {
    if unary.operator == "delete" {
        return Evaluation::Dynamic;
    }
    let Some(value) = evaluate(&unary.argument, tracker).into_value() else {
        return Evaluation::Dynamic;
    };
    let result = match unary.operator.as_str() {
        "typeof" => Some(Value::String(value.type_of().to_string())),
        "void" => Some(Value::Undefined),
        "!" => Some(Value::Bool(!value.truthy())),
        "-" => match value {
            Value::BigInt(b) => Some(Value::BigInt(-b)),
            other => other.to_number().map(|n| Value::Number(-n)),
        },
        "+" => value.to_number().map(Value::Number),
        "~" => match value {
            Value::BigInt(b) => Some(Value::BigInt(-b - BigInt::from(1))),
            other => other.to_number().map(|n| Value::Number(f64::from(!to_int32(n)))),
        },
        _ => None,
    };
    match result {
        Some(value) => Evaluation::at(value, unary.span),
        None => Evaluation::Dynamic,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Member access and calls
// ─────────────────────────────────────────────────────────────────────────────

fn member_expression(member: &Member, tracker: &ScopeTracker) -> Evaluation {
    let key = match member.property.as_ref() {
        Node::Identifier(ident) => ident.value.clone(),
        Node::Computed(computed) => {
            match evaluate(&computed.expression, tracker).into_value().and_then(|v| v.to_js_string()) {
                Some(key) => key,
                None => return Evaluation::Dynamic,
            }
        }
        _ => return Evaluation::Dynamic,
    };

    match evaluate(&member.object, tracker) {
        Evaluation::Reference { path, .. } => {
            Evaluation::reference(format!("{}.{}", path, key), member.span)
        }
        Evaluation::Static { value, .. } => property_of(value, &key, member),
        Evaluation::Dynamic => Evaluation::Dynamic,
    }
}

fn property_of(value: Value, key: &str, member: &Member) -> Evaluation {
    let missing = || Evaluation::at(Value::Undefined, member.span);
    match value {
        Value::Object(mut entries) => entries.swap_remove(key).unwrap_or_else(missing),
        Value::Array(mut items) => {
            if key == "length" {
                return Evaluation::at(Value::Number(items.len() as f64), member.span);
            }
            match key.parse::<usize>() {
                Ok(index) if index < items.len() => items.swap_remove(index),
                Ok(_) => missing(),
                Err(_) => Evaluation::Dynamic,
            }
        }
        Value::String(text) => {
            let units: Vec<u16> = text.encode_utf16().collect();
            if key == "length" {
                return Evaluation::at(Value::Number(units.len() as f64), member.span);
            }
            match key.parse::<usize>() {
                Ok(index) => match units.get(index) {
                    Some(unit) => match String::from_utf16(&[*unit]) {
                        Ok(ch) => Evaluation::at(Value::String(ch), member.span),
                        Err(_) => Evaluation::Dynamic,
                    },
                    None => missing(),
                },
                Err(_) => Evaluation::Dynamic,
            }
        }
        _ => Evaluation::Dynamic,
    }
}

/// Only the fallback-list call folds. Its arguments come back reversed so the
/// most preferred value is declared last.
fn call_expression(call: &Call, tracker: &ScopeTracker) -> Evaluation {
    if tracker.resolve_callee(&call.callee) != Some(ApiMember::FirstThatWorks) {
        return Evaluation::Dynamic;
    }
    let mut items = array_elements(call.arguments.iter(), tracker);
    items.reverse();
    Evaluation::at(Value::Array(items), call.span)
}
