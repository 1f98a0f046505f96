// Command-line entry point for StyleLens.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;

use stylelens::api::start_server;
use stylelens::application::{document_colors, hover, LanguageService};
use stylelens::domain::ast::Node;
use stylelens::domain::document::{Document, Position};
use stylelens::domain::scope::ScopeTracker;
use stylelens::domain::walk::CancellationToken;
use stylelens::infrastructure::concurrency::init_thread_pool;
use stylelens::infrastructure::{parse_ast_json, Settings, StylexValueNormalizer};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (TOML, or JSON by extension)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the CSS preview for the style key at a position
    Hover {
        /// Source file
        #[arg(long)]
        source: PathBuf,

        /// SWC-compatible JSON syntax tree of the source
        #[arg(long)]
        ast: PathBuf,

        /// Zero-based line
        #[arg(long)]
        line: u32,

        /// Zero-based UTF-16 column
        #[arg(long)]
        character: u32,
    },

    /// Print the color swatches of one or more files as JSON
    Colors {
        /// `<source>=<ast.json>` pairs
        #[arg(short, long = "file", required = true)]
        files: Vec<String>,
    },

    /// Run the JSON-lines API server
    Serve {
        #[arg(short, long, default_value_t = 7878)]
        port: u16,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = setup_logger(&cli.log_level) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    match cli.command {
        Command::Hover { source, ast, line, character } => {
            let (document, tree) = load_pair(&source, &ast)?;
            let tracker = ScopeTracker::with_modules(settings.alias_module_names.iter().cloned());
            let normalizer = StylexValueNormalizer::new(settings.use_rem_for_font_size);
            let position = Position::new(line, character);

            match hover(&document, &tree, tracker, position, &normalizer, &CancellationToken::new())? {
                Some(found) => println!("{}", found.contents),
                None => log::info!("[StyleLens] Nothing to preview at {}:{}", line, character),
            }
        }
        Command::Colors { files } => {
            let pairs = files
                .iter()
                .map(|pair| split_pair(pair))
                .collect::<Result<Vec<_>>>()?;
            init_thread_pool()?;

            let results: Vec<Result<(String, serde_json::Value)>> = pairs
                .par_iter()
                .map(|(source, ast)| {
                    let (document, tree) = load_pair(source, ast)?;
                    let tracker = ScopeTracker::with_modules(settings.alias_module_names.iter().cloned());
                    let colors = document_colors(&document, &tree, tracker, &CancellationToken::new())?;
                    Ok((document.uri.clone(), serde_json::to_value(colors.unwrap_or_default())?))
                })
                .collect();

            let mut report = serde_json::Map::new();
            for result in results {
                match result {
                    Ok((uri, colors)) => {
                        report.insert(uri, colors);
                    }
                    Err(e) => log::warn!("[StyleLens] Skipping file: {:#}", e),
                }
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Serve { port } => {
            let service = LanguageService::new(settings)?;
            start_server(port, Arc::new(service))?;
        }
    }
    Ok(())
}

fn setup_logger(level: &str) -> Result<()> {
    let level: log::LevelFilter = level
        .parse()
        .map_err(|_| anyhow::anyhow!("Unknown log level `{}`", level))?;
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{}] {}", record.level(), message))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
        .context("Failed to initialize logger")
}

fn split_pair(pair: &str) -> Result<(PathBuf, PathBuf)> {
    match pair.split_once('=') {
        Some((source, ast)) if !source.is_empty() && !ast.is_empty() => Ok((source.into(), ast.into())),
        _ => bail!("Expected <source>=<ast.json>, got `{}`", pair),
    }
}

fn load_pair(source: &Path, ast: &Path) -> Result<(Document, Node)> {
    let text = fs::read_to_string(source)
        .with_context(|| format!("Cannot read source file {}", source.display()))?;
    let json = fs::read_to_string(ast)
        .with_context(|| format!("Cannot read syntax tree {}", ast.display()))?;
    let tree = parse_ast_json(&json).with_context(|| format!("In {}", ast.display()))?;

    let language_id = match source.extension().and_then(|ext| ext.to_str()) {
        Some("tsx") => "typescriptreact",
        Some("jsx") => "javascriptreact",
        Some("js" | "mjs" | "cjs") => "javascript",
        _ => "typescript",
    };
    let document = Document::new(source.display().to_string(), language_id, 0, text);
    Ok((document, tree))
}
