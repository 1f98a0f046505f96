// Builds SWC-shaped JSON syntax trees for integration tests.
// Spans are located by scanning the source left to right and offset by a
// base, the way SWC numbers files in a shared source map.

#![allow(dead_code)]

use serde_json::{json, Value};

pub struct JsonTree<'s> {
    source: &'s str,
    cursor: usize,
    base: u32,
}

impl<'s> JsonTree<'s> {
    pub fn new(source: &'s str, base: u32) -> Self {
        Self { source, cursor: 0, base }
    }

    /// Span of the next occurrence of `needle`.
    pub fn span(&mut self, needle: &str) -> Value {
        let found = self.source[self.cursor..]
            .find(needle)
            .unwrap_or_else(|| panic!("`{}` not found after byte {}", needle, self.cursor))
            + self.cursor;
        self.cursor = found + needle.len();
        self.raw_span(found, found + needle.len())
    }

    /// Span from the next `open` to the last `close` in the source, without
    /// moving the cursor.
    pub fn enclosing(&self, open: &str, close: &str) -> Value {
        let start = self.source[self.cursor..].find(open).expect("open token") + self.cursor;
        let end = self.source.rfind(close).expect("close token") + close.len();
        self.raw_span(start, end)
    }

    pub fn ident(&mut self, name: &str) -> Value {
        json!({"type": "Identifier", "span": self.span(name), "value": name, "optional": false})
    }

    pub fn str(&mut self, value: &str) -> Value {
        let raw = format!("'{}'", value);
        json!({"type": "StringLiteral", "span": self.span(&raw), "value": value, "raw": raw})
    }

    pub fn num(&mut self, raw: &str) -> Value {
        let value: f64 = raw.parse().expect("numeric literal");
        json!({"type": "NumericLiteral", "span": self.span(raw), "value": value, "raw": raw})
    }

    pub fn module(&self, body: Vec<Value>) -> Value {
        json!({
            "type": "Module",
            "span": self.raw_span(0, self.source.len()),
            "body": body,
            "interpreter": null
        })
    }

    fn raw_span(&self, start: usize, end: usize) -> Value {
        json!({"start": self.base + start as u32, "end": self.base + end as u32, "ctxt": 0})
    }
}

pub fn import_namespace(local: Value, source: Value) -> Value {
    json!({
        "type": "ImportDeclaration",
        "span": {"start": local["span"]["start"], "end": source["span"]["end"]},
        "specifiers": [{"type": "ImportNamespaceSpecifier", "span": local["span"].clone(), "local": local}],
        "source": source,
        "typeOnly": false
    })
}

pub fn member(object: Value, property: Value) -> Value {
    json!({
        "type": "MemberExpression",
        "span": {"start": object["span"]["start"], "end": property["span"]["end"]},
        "object": object,
        "property": property
    })
}

pub fn call(span: Value, callee: Value, arguments: Vec<Value>) -> Value {
    let arguments: Vec<Value> = arguments.into_iter().map(|a| json!({"spread": null, "expression": a})).collect();
    json!({"type": "CallExpression", "span": span, "callee": callee, "arguments": arguments})
}

pub fn object(span: Value, properties: Vec<Value>) -> Value {
    json!({"type": "ObjectExpression", "span": span, "properties": properties})
}

pub fn array(span: Value, elements: Vec<Value>) -> Value {
    let elements: Vec<Value> = elements.into_iter().map(|e| json!({"spread": null, "expression": e})).collect();
    json!({"type": "ArrayExpression", "span": span, "elements": elements})
}

pub fn kv(key: Value, value: Value) -> Value {
    json!({"type": "KeyValueProperty", "key": key, "value": value})
}

/// `export const <id> = <init>;`
pub fn export_const(span: Value, id: Value, init: Value) -> Value {
    json!({
        "type": "ExportDeclaration",
        "span": span.clone(),
        "declaration": {
            "type": "VariableDeclaration",
            "span": span.clone(),
            "kind": "const",
            "declare": false,
            "declarations": [{
                "type": "VariableDeclarator",
                "span": span,
                "id": id,
                "init": init,
                "definite": false
            }]
        }
    })
}

/// Position of the byte after the start of `needle` (inside the token).
pub fn position_in(source: &str, needle: &str) -> (u32, u32) {
    let byte = source.find(needle).unwrap_or_else(|| panic!("`{}` not in source", needle)) + 1;
    let line = source[..byte].matches('\n').count() as u32;
    let line_start = source[..byte].rfind('\n').map_or(0, |i| i + 1);
    (line, source[line_start..byte].encode_utf16().count() as u32)
}
