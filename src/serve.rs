//! Local HTTP server for the generated site.
//!
//! Serves the output directory over `tiny_http` and hosts the two dynamic
//! endpoints that the static pages call:
//!
//! - `POST /api/track-visits?subject=..&output=..`: increments and returns
//!   the visit counter for one document
//! - `GET /api/og?title=..&subject=..`: renders the social preview card
//!
//! Everything else is resolved against the output directory:
//!
//! 1. Exact file match: serve the file
//! 2. Directory with an `index.html`: serve that
//! 3. Anything else: serve the generated `404.html` with status 404
//!
//! The server binds the configured interface and port (retrying on the next
//! few ports when taken) and blocks until Ctrl+C.

use crate::generate;
use crate::views::VisitStore;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("Invalid interface address: {0}")]
    Interface(#[from] std::net::AddrParseError),
    #[error("Bind error: {0}")]
    Bind(String),
    #[error("Failed to set Ctrl+C handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

/// Shared state for request handling.
pub struct ServeContext {
    /// Directory the generated site was written to.
    pub root: PathBuf,
    /// Visit counter backend, shared with the generate stage.
    pub store: VisitStore,
}

/// Start the server and block until Ctrl+C.
pub fn serve(root: &Path, interface: &str, port: u16, store: VisitStore) -> Result<(), ServeError> {
    let interface: IpAddr = interface.parse()?;
    let (server, addr) = try_bind_port(interface, port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    // Ctrl+C unblocks the accept loop below
    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        println!("Shutting down");
        server_for_signal.unblock();
    })?;

    let ctx = ServeContext {
        root: root.to_path_buf(),
        store,
    };

    println!("Serving {} at http://{}", root.display(), addr);

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &ctx) {
            eprintln!("Warning: request failed: {e}");
        }
    }

    Ok(())
}

fn try_bind_port(
    interface: IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(Server, SocketAddr), ServeError> {
    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    eprintln!("Warning: port {base_port} in use, using {port} instead");
                }
                return Ok((server, addr));
            }
            Err(_) if offset + 1 < max_retries => continue,
            Err(e) => {
                return Err(ServeError::Bind(format!(
                    "no free port in {base_port}-{port}: {e}"
                )));
            }
        }
    }
    unreachable!()
}

// ============================================================================
// Request Handling
// ============================================================================

/// Handle a single HTTP request.
///
/// API routes are matched on the literal path before any decoding; the
/// rest goes through static file resolution.
pub fn handle_request(request: Request, ctx: &ServeContext) -> io::Result<()> {
    let url = request.url().to_string();
    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, query),
        None => (url.as_str(), ""),
    };

    match path {
        "/api/track-visits" => handle_track_visits(request, query, &ctx.store),
        "/api/og" => handle_og(request, query),
        _ => serve_static(request, path, &ctx.root),
    }
}

fn handle_track_visits(request: Request, query: &str, store: &VisitStore) -> io::Result<()> {
    if *request.method() != Method::Post {
        return respond_method_not_allowed(request, "POST");
    }

    let params = parse_query(query);
    let subject = params.get("subject").map(String::as_str).unwrap_or("");
    let output = params.get("output").map(String::as_str).unwrap_or("");

    if subject.is_empty() || output.is_empty() {
        let body = serde_json::json!({"error": "Missing subject or output parameter"});
        return respond_json(request, StatusCode(400), &body);
    }

    let visits = store.increment(subject, output);
    respond_json(request, StatusCode(200), &serde_json::json!({"visits": visits}))
}

fn handle_og(request: Request, query: &str) -> io::Result<()> {
    if *request.method() != Method::Get {
        return respond_method_not_allowed(request, "GET");
    }

    let params = parse_query(query);
    let svg = generate::render_og_card(
        params.get("title").map(String::as_str),
        params.get("subject").map(String::as_str),
    );

    let response = Response::from_string(svg)
        .with_header(Header::from_bytes("Content-Type", "image/svg+xml").unwrap());
    request.respond(response)
}

fn serve_static(request: Request, path: &str, root: &Path) -> io::Result<()> {
    match request.method() {
        Method::Get | Method::Head => {}
        _ => return respond_method_not_allowed(request, "GET, HEAD"),
    }

    // Decode URL-encoded characters (e.g., %20 → space)
    let decoded = urlencoding::decode(path)
        .map(Cow::into_owned)
        .unwrap_or_default();
    let relative = decoded.trim_matches('/');

    // Reject anything that could climb out of the output directory
    let climbs = Path::new(relative)
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if climbs {
        return serve_not_found(request, root);
    }

    let local_path = root.join(relative);

    if local_path.is_file() {
        return serve_file(request, &local_path);
    }

    if local_path.is_dir() {
        let index_path = local_path.join("index.html");
        if index_path.is_file() {
            return serve_file(request, &index_path);
        }
    }

    serve_not_found(request, root)
}

// ============================================================================
// Response Helpers
// ============================================================================

fn serve_file(request: Request, path: &Path) -> io::Result<()> {
    let content = fs::read(path)?;
    let content_type = guess_content_type(path);

    let response = Response::from_data(content)
        .with_header(Header::from_bytes("Content-Type", content_type).unwrap());
    request.respond(response)
}

/// Serve the generated 404 page, or a plain-text fallback when the output
/// directory has not been generated yet.
fn serve_not_found(request: Request, root: &Path) -> io::Result<()> {
    let body = fs::read_to_string(root.join("404.html"))
        .unwrap_or_else(|_| "404 Not Found".to_string());

    let response = Response::from_string(body)
        .with_status_code(StatusCode(404))
        .with_header(Header::from_bytes("Content-Type", "text/html; charset=utf-8").unwrap());
    request.respond(response)
}

fn respond_json(request: Request, status: StatusCode, body: &serde_json::Value) -> io::Result<()> {
    let response = Response::from_string(body.to_string())
        .with_status_code(status)
        .with_header(Header::from_bytes("Content-Type", "application/json").unwrap());
    request.respond(response)
}

fn respond_method_not_allowed(request: Request, allow: &str) -> io::Result<()> {
    let response = Response::from_string("405 Method Not Allowed")
        .with_status_code(StatusCode(405))
        .with_header(Header::from_bytes("Allow", allow).unwrap());
    request.respond(response)
}

/// Parse a query string into a key/value map. Values are form-decoded
/// (`+` as space, then percent-decoding); pairs without `=` are dropped.
fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            let value = value.replace('+', " ");
            let value = urlencoding::decode(&value).map(Cow::into_owned).ok()?;
            Some((key.to_string(), value))
        })
        .collect()
}

// ============================================================================
// Content Type Detection
// ============================================================================

/// Guess MIME content type from file extension.
///
/// Returns `application/octet-stream` for unknown extensions.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("woff2") => "font/woff2",
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain; charset=utf-8",
        Some("md") => "text/markdown; charset=utf-8",
        _ => "application/octet-stream",
    }
}

// ============================================================================
// Tests
// ============================================================================
