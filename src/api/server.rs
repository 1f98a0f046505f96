use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::api::dto::{ChangeParams, ColorPresentationParams, DocumentParams, OpenParams, PositionParams};
use crate::application::LanguageService;
use crate::domain::walk::CancellationToken;
use crate::infrastructure::Settings;

#[derive(Debug, Deserialize)]
struct CommandReq {
    command: String,
    params: Option<serde_json::Value>,
}

pub fn start_server(port: u16, service: Arc<LanguageService>) -> Result<()> {
    let address = format!("127.0.0.1:{}", port);
    let listener = TcpListener::bind(&address)
        .with_context(|| format!("Failed to bind to {}", address))?;

    log::info!("[API] Server listening on {}", address);
    serve(listener, service)
}

/// Accepts connections on `listener`, one thread per connection.
pub fn serve(listener: TcpListener, service: Arc<LanguageService>) -> Result<()> {
    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let service = Arc::clone(&service);
                thread::spawn(move || {
                    if let Err(e) = handle_connection(stream, &service) {
                        log::error!("[API] Connection error: {}", e);
                    }
                });
            }
            Err(e) => log::error!("[API] Accept error: {}", e),
        }
    }

    Ok(())
}

fn handle_connection(mut stream: TcpStream, service: &LanguageService) -> Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line)?;
        if bytes_read == 0 {
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = match process_command(service, trimmed) {
            Ok(data) => json!({
                "status": "success",
                "data": data
            }),
            Err(e) => json!({
                "status": "error",
                "message": format!("{:#}", e)
            }),
        };

        let response_str = serde_json::to_string(&response)?;
        stream.write_all(response_str.as_bytes())?;
        stream.write_all(b"\n")?;

        if is_shutdown(trimmed) {
            log::info!("[API] Shutdown requested.");
            std::process::exit(0);
        }
    }
    Ok(())
}

fn is_shutdown(line: &str) -> bool {
    serde_json::from_str::<CommandReq>(line).is_ok_and(|req| req.command == "SHUTDOWN")
}

/// Runs one request line against the service and returns the `data` payload.
pub fn process_command(service: &LanguageService, json_str: &str) -> Result<serde_json::Value> {
    let req: CommandReq = serde_json::from_str(json_str)
        .context("Invalid JSON format")?;
    log::debug!("[API] {}", req.command);

    // Requests on one connection are answered in order, so nothing is
    // ever canceled from this side.
    let token = CancellationToken::new();
    let command = req.command.as_str();
    match command {
        "PING" => Ok(json!("PONG")),
        "CONFIGURE" => {
            let settings: Settings = params(command, req.params)?;
            service.configure(settings)?;
            Ok(json!(null))
        }
        "OPEN" => {
            let p: OpenParams = params(command, req.params)?;
            service.open_document(&p.uri, &p.language_id, p.version, &p.text, p.ast)?;
            Ok(json!(null))
        }
        "CHANGE" => {
            let p: ChangeParams = params(command, req.params)?;
            service.change_document(&p.uri, p.version, &p.text, p.ast)?;
            Ok(json!(null))
        }
        "CLOSE" => {
            let p: DocumentParams = params(command, req.params)?;
            service.close_document(&p.uri);
            Ok(json!(null))
        }
        "HOVER" => {
            let p: PositionParams = params(command, req.params)?;
            Ok(serde_json::to_value(service.hover(&p.uri, p.position, &token)?)?)
        }
        "COMPLETE" => {
            let p: PositionParams = params(command, req.params)?;
            Ok(serde_json::to_value(service.completions(&p.uri, p.position, &token)?)?)
        }
        "COLORS" => {
            let p: DocumentParams = params(command, req.params)?;
            Ok(serde_json::to_value(service.document_colors(&p.uri, &token)?)?)
        }
        "COLOR_PRESENTATION" => {
            let p: ColorPresentationParams = params(command, req.params)?;
            Ok(serde_json::to_value(service.color_presentation(&p.uri, p.range, p.color))?)
        }
        "SHUTDOWN" => Ok(json!("Shutting down...")),
        _ => anyhow::bail!("Unknown command: {}", req.command),
    }
}

fn params<T: DeserializeOwned>(command: &str, params: Option<serde_json::Value>) -> Result<T> {
    let params = params.ok_or_else(|| anyhow::anyhow!("Missing params for {}", command))?;
    serde_json::from_value(params).with_context(|| format!("Invalid params for {}", command))
}
