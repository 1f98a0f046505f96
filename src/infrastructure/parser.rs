//! Syntax tree sources.
//!
//! - JSON emitted by SWC (`swc.parseSync(...)` serialized) is read directly.
//! - An external command can be configured to produce that JSON from source
//!   text on stdin.

use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};

use crate::domain::ast::Node;
use crate::ports::AstParser;

/// Reads an SWC-compatible JSON syntax tree.
pub fn parse_ast_json(json: &str) -> Result<Node> {
    serde_json::from_str(json).context("Failed to decode syntax tree JSON")
}

pub fn parse_ast_value(value: serde_json::Value) -> Result<Node> {
    serde_json::from_value(value).context("Failed to decode syntax tree JSON")
}

// ═══════════════════════════════════════════════════════════════════════════
// External parser process
// ═══════════════════════════════════════════════════════════════════════════

/// Runs a parser command that reads source on stdin and prints the tree as
/// JSON. `{languageId}` and `{tsx}` in arguments are substituted per call.
#[derive(Debug, Clone)]
pub struct ExternalParser {
    command: Vec<String>,
}

/// Describes the command that would be run for a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserCommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl ExternalParser {
    pub fn new(command: Vec<String>) -> Result<Self> {
        if command.is_empty() {
            bail!("Parser command must name a program");
        }
        Ok(Self { command })
    }

    pub fn command_spec(&self, language_id: &str) -> ParserCommandSpec {
        let tsx = if language_id.ends_with("react") { "true" } else { "false" };
        let mut parts = self
            .command
            .iter()
            .map(|arg| arg.replace("{languageId}", language_id).replace("{tsx}", tsx));
        ParserCommandSpec {
            program: parts.next().unwrap_or_default(),
            args: parts.collect(),
        }
    }
}

impl AstParser for ExternalParser {
    fn parse(&self, source: &str, language_id: &str) -> Result<Node> {
        let spec = self.command_spec(language_id);
        log::debug!("[Parser] Running {} {:?}", spec.program, spec.args);

        let mut child = Command::new(&spec.program)
            .args(&spec.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to execute parser `{}`", spec.program))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(source.as_bytes())
                .context("Failed to write source to parser")?;
        }

        let output = child.wait_with_output().context("Parser did not finish")?;
        if !output.status.success() {
            bail!(
                "Parser `{}` failed with exit code {:?}: {}",
                spec.program,
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let json = String::from_utf8(output.stdout).context("Parser output is not UTF-8")?;
        parse_ast_json(&json)
    }
}
