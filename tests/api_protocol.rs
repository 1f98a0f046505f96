//! API server protocol: document lifecycle and capability requests, both
//! through the command dispatcher and over a real TCP connection.

mod common;

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;

use common::*;
use serde_json::{json, Value};
use stylelens::api::{process_command, serve};
use stylelens::application::LanguageService;
use stylelens::infrastructure::Settings;

const URI: &str = "file:///card.ts";
const SOURCE: &str = "import * as stylex from 'stylex';\n\
export const styles = stylex.create({ card: { color: ['#ff0000', 'transparent'], display: 'fl' } });\n";

fn tree() -> Value {
    let mut t = JsonTree::new(SOURCE, 0);
    let import_decl = import_namespace(t.ident("stylex"), t.str("stylex"));

    let statement = t.enclosing("export", ";");
    let id = t.ident("styles");
    let call_span = t.enclosing("stylex.create", ")");
    let callee = member(t.ident("stylex"), t.ident("create"));
    let outer_span = t.enclosing("{ card", "} }");
    let card = t.ident("card");
    let inner_span = t.enclosing("{ color", "} }");
    let color = t.ident("color");
    let array_span = t.enclosing("['#ff0000'", "]");
    let fallbacks = array(array_span, vec![t.str("#ff0000"), t.str("transparent")]);
    let display = kv(t.ident("display"), t.str("fl"));

    let inner = object(inner_span, vec![kv(color, fallbacks), display]);
    let styles = object(outer_span, vec![kv(card, inner)]);
    let init = call(call_span, callee, vec![styles]);
    t.module(vec![import_decl, export_const(statement, id, init)])
}

fn request(service: &LanguageService, command: &str, params: Value) -> Value {
    let line = json!({"command": command, "params": params}).to_string();
    process_command(service, &line).unwrap_or_else(|e| panic!("{} failed: {:#}", command, e))
}

fn opened() -> LanguageService {
    let service = LanguageService::new(Settings::default()).expect("service");
    request(
        &service,
        "OPEN",
        json!({"uri": URI, "languageId": "typescript", "version": 1, "text": SOURCE, "ast": tree()}),
    );
    service
}

fn column_of(needle: &str) -> u32 {
    SOURCE.lines().nth(1).and_then(|line| line.find(needle)).expect("needle on line 1") as u32
}

#[test]
fn test_colors_then_presentation() {
    let service = opened();

    let colors = request(&service, "COLORS", json!({"uri": URI}));
    let colors = colors.as_array().expect("color list");
    assert_eq!(colors.len(), 1);
    let start = column_of("'#ff0000'") + 1;
    assert_eq!(
        colors[0]["range"],
        json!({"start": {"line": 1, "character": start}, "end": {"line": 1, "character": start + 7}})
    );
    assert_eq!(colors[0]["color"], json!({"red": 1.0, "green": 0.0, "blue": 0.0, "alpha": 1.0}));

    let presentations = request(
        &service,
        "COLOR_PRESENTATION",
        json!({"uri": URI, "range": colors[0]["range"], "color": {"red": 0.0, "green": 0.0, "blue": 1.0, "alpha": 1.0}}),
    );
    assert_eq!(presentations[0]["label"], "#0000ff");
    assert_eq!(presentations[1]["label"], "rgb(0, 0, 255)");
}

#[test]
fn test_completions_inside_value() {
    let service = opened();
    let character = column_of("'fl'") + 3;

    let data = request(&service, "COMPLETE", json!({"uri": URI, "position": {"line": 1, "character": character}}));
    assert_eq!(data["isIncomplete"], json!(true));
    let labels: Vec<&str> = data["items"]
        .as_array()
        .expect("items")
        .iter()
        .filter_map(|item| item["label"].as_str())
        .collect();
    assert!(labels.contains(&"flex"), "labels: {:?}", labels);
}

#[test]
fn test_hover_change_and_close() {
    let service = opened();
    let character = column_of("display") + 1;
    let position = json!({"line": 1, "character": character});

    let found = request(&service, "HOVER", json!({"uri": URI, "position": position}));
    assert_eq!(found["contents"], "```css\n.card {\n  display: fl;\n}\n```");

    // Without a tree or a parser command there is nothing to answer with.
    request(&service, "CHANGE", json!({"uri": URI, "version": 2, "text": SOURCE}));
    assert_eq!(request(&service, "HOVER", json!({"uri": URI, "position": position})), Value::Null);

    request(&service, "CLOSE", json!({"uri": URI}));
    let line = json!({"command": "HOVER", "params": {"uri": URI, "position": position}}).to_string();
    assert!(process_command(&service, &line).is_err());
}

#[test]
fn test_configure_disables_colors() {
    let service = opened();
    request(&service, "CONFIGURE", json!({"colorDecorators": false}));
    assert_eq!(request(&service, "COLORS", json!({"uri": URI})), Value::Null);
}

#[test]
fn test_json_lines_over_tcp() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let address = listener.local_addr().expect("address");
    let service = Arc::new(LanguageService::new(Settings::default()).expect("service"));
    thread::spawn(move || serve(listener, service));

    let mut stream = TcpStream::connect(address).expect("connect");
    let mut reader = BufReader::new(stream.try_clone().expect("clone"));
    let mut exchange = |line: &str| -> Value {
        stream.write_all(line.as_bytes()).expect("write");
        stream.write_all(b"\n").expect("write");
        let mut response = String::new();
        reader.read_line(&mut response).expect("read");
        serde_json::from_str(&response).expect("json response")
    };

    assert_eq!(exchange(r#"{"command": "PING"}"#), json!({"status": "success", "data": "PONG"}));

    let error = exchange(r#"{"command": "NOPE"}"#);
    assert_eq!(error["status"], "error");
    assert_eq!(error["message"], "Unknown command: NOPE");
}
