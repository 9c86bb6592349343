//! HTTP surface for wave.
//!
//! A sync `tiny_http` server that serves:
//! - `POST /wave-ai`, the canned copy/strategy endpoint
//! - a JSON API over the live dashboard state and the record stores
//! - the embedded single-page dashboard at `/`
//!
//! Every response carries permissive CORS headers, and any `OPTIONS`
//! request is answered with an empty 200.
//!
//! Launched via `wave serve` (default: `http://127.0.0.1:9747`).

pub mod api;
mod frontend;

use std::io::{Cursor, Read};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use rand::rngs::StdRng;
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

use crate::catalog::{CatalogError, Catalogs};
use crate::config::WaveConfig;
use crate::metrics::{self, Dashboard, Ticker};

pub type HttpResponse = Response<Cursor<Vec<u8>>>;

const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, OPTIONS"),
    (
        "Access-Control-Allow-Headers",
        "Content-Type, Authorization, X-Client-Info, Apikey",
    ),
];

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Everything the handlers read and mutate.
///
/// The dashboard is shared with the [`Ticker`] thread; the rest is only
/// touched from the accept loop.
pub struct AppState {
    dashboard: Arc<Mutex<Dashboard>>,
    catalogs: Mutex<Catalogs>,
    rng: Mutex<StdRng>,
    config: WaveConfig,
}

impl AppState {
    pub fn new(config: WaveConfig) -> Self {
        let now = Utc::now();
        // offset so the responder and the ticker draw different streams
        let seed = config.simulator.seed.map(|s| s.wrapping_add(1));
        Self {
            dashboard: Arc::new(Mutex::new(Dashboard::new(&config.simulator, now))),
            catalogs: Mutex::new(Catalogs::seeded(now)),
            rng: Mutex::new(metrics::seeded_rng(seed)),
            config,
        }
    }

    /// Handle to the dashboard, for driving it with a [`Ticker`].
    pub fn dashboard(&self) -> Arc<Mutex<Dashboard>> {
        Arc::clone(&self.dashboard)
    }

    pub fn config(&self) -> &WaveConfig {
        &self.config
    }

    pub(crate) fn lock_dashboard(&self) -> MutexGuard<'_, Dashboard> {
        metrics::updater::lock(&self.dashboard)
    }

    pub(crate) fn lock_catalogs(&self) -> MutexGuard<'_, Catalogs> {
        self.catalogs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn lock_rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

pub fn bind(addr: &str) -> Result<Server> {
    Server::http(addr).map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))
}

/// Start the ticker and serve until the process is stopped.
pub fn serve(config: &WaveConfig) -> Result<()> {
    let server = bind(&config.server.addr)?;
    let state = AppState::new(config.clone());

    let _ticker = Ticker::start(
        state.dashboard(),
        Duration::from_millis(config.simulator.tick_ms),
        metrics::seeded_rng(config.simulator.seed),
    )?;

    let addr = server
        .server_addr()
        .to_ip()
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| config.server.addr.clone());
    let url = format!("http://{addr}");

    println!("{} running at {}", "wave dashboard".bold(), url.cyan());
    println!("Copy endpoint: {}/wave-ai", url);
    println!("Press Ctrl+C to stop.\n");

    if config.server.open_browser {
        // best-effort
        let _ = open_browser(&url);
    }

    run(&server, &state);
    Ok(())
}

/// Accept loop. Handles requests sequentially and returns once the server
/// is unblocked. A failing request never stops the loop.
pub fn run(server: &Server, state: &AppState) {
    for request in server.incoming_requests() {
        handle(state, request);
    }
}

fn handle(state: &AppState, mut request: Request) {
    let method = request.method().clone();
    let url = request.url().to_string();

    let response = if method == Method::Options {
        Ok(Response::from_data(Vec::new()).with_status_code(StatusCode(200)))
    } else {
        let body = if matches!(method, Method::Put | Method::Post | Method::Patch) {
            let mut buf = String::new();
            // an unreadable body is handed on empty and fails JSON parsing
            let _ = request.as_reader().read_to_string(&mut buf);
            Some(buf)
        } else {
            None
        };
        dispatch(state, &method, &url, body.as_deref())
    };

    let response = response.unwrap_or_else(|e| error_response(&e));
    let response = with_cors(response).unwrap_or_else(|e| plain_500(&e));
    let _ = request.respond(response);

    // Brief access log
    println!(
        "{} {} {}",
        method,
        url,
        chrono::Local::now().format("%H:%M:%S")
    );
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
fn dispatch(state: &AppState, method: &Method, url: &str, body: Option<&str>) -> Result<HttpResponse> {
    // Strip query string for path matching
    let path = url.split('?').next().unwrap_or(url);
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let body = body.unwrap_or("");

    match (method, segments.as_slice()) {
        // Copy endpoint
        (Method::Post, ["wave-ai"]) => api::post_wave_ai(state, body),

        // Frontend
        (Method::Get, []) | (Method::Get, ["index.html"]) => serve_frontend(),

        // Dashboard
        (Method::Get, ["api", "dashboard"]) => api::get_dashboard(state),
        (Method::Get, ["api", "health"]) => api::get_health(state),

        // Records
        (Method::Get, ["api", "products", id, "report"]) => api::get_product_report(state, id),
        (Method::Post, ["api", "funnels", id, "steps"]) => api::post_funnel_step(state, id, body),
        (Method::Delete, ["api", "funnels", id, "steps", step_id]) => {
            api::delete_funnel_step(state, id, step_id)
        }
        (Method::Post, ["api", kind, id, "duplicate"]) => match api::Collection::parse(kind) {
            Some(c) => api::duplicate_record(state, c, id),
            None => not_found(),
        },
        (Method::Post, ["api", kind, id, "toggle"]) => match api::Collection::parse(kind) {
            Some(c) => api::toggle_record(state, c, id),
            None => not_found(),
        },
        (Method::Get, ["api", kind]) => match api::Collection::parse(kind) {
            Some(c) => api::list_records(state, c, url),
            None => not_found(),
        },
        (Method::Post, ["api", kind]) => match api::Collection::parse(kind) {
            Some(c) => api::create_record(state, c, body),
            None => not_found(),
        },
        (Method::Put, ["api", kind, id]) => match api::Collection::parse(kind) {
            Some(c) => api::update_record(state, c, id, body),
            None => not_found(),
        },
        (Method::Delete, ["api", kind, id]) => match api::Collection::parse(kind) {
            Some(c) => api::delete_record(state, c, id),
            None => not_found(),
        },

        // 404
        _ => not_found(),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Build a header, failing instead of panicking on bad bytes.
fn header(name: &str, value: &str) -> Result<Header> {
    Header::from_bytes(name, value).map_err(|()| anyhow::anyhow!("invalid header {name}: {value}"))
}

/// JSON content type header.
pub(crate) fn content_type_json() -> Result<Header> {
    header("Content-Type", "application/json; charset=utf-8")
}

/// JSON body with the given status.
pub(crate) fn json_with_status(body: String, status: u16) -> Result<HttpResponse> {
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json()?)
        .with_status_code(StatusCode(status)))
}

fn with_cors(mut response: HttpResponse) -> Result<HttpResponse> {
    for (name, value) in CORS_HEADERS {
        response.add_header(header(name, value)?);
    }
    Ok(response)
}

/// Serve the embedded single-page frontend.
fn serve_frontend() -> Result<HttpResponse> {
    Ok(Response::from_data(frontend::INDEX_HTML.as_bytes().to_vec())
        .with_header(header("Content-Type", "text/html; charset=utf-8")?)
        .with_status_code(StatusCode(200)))
}

/// 404 response.
fn not_found() -> Result<HttpResponse> {
    json_with_status(r#"{"error": "not found"}"#.to_string(), 404)
}

/// Map a handler error to a JSON error response: missing records are 404,
/// invalid input 400, everything else 500.
fn error_response(err: &anyhow::Error) -> HttpResponse {
    let status = match err.downcast_ref::<CatalogError>() {
        Some(CatalogError::NotFound { .. }) => 404,
        Some(CatalogError::Invalid { .. }) => 400,
        None => 500,
    };
    let body = serde_json::json!({ "error": err.to_string() }).to_string();
    json_with_status(body, status).unwrap_or_else(|e| plain_500(&e))
}

fn plain_500(err: &anyhow::Error) -> HttpResponse {
    Response::from_string(err.to_string()).with_status_code(StatusCode(500))
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        let mut config = WaveConfig::default();
        config.logging.enabled = false;
        config.simulator.seed = Some(7);
        AppState::new(config)
    }

    fn status(resp: &HttpResponse) -> u16 {
        resp.status_code().0
    }

    #[test]
    fn unknown_routes_are_404() {
        let s = state();
        for (method, url) in [
            (Method::Get, "/nope"),
            (Method::Get, "/api/widgets"),
            (Method::Post, "/api/affiliates/1/duplicate"),
            (Method::Put, "/api"),
        ] {
            let resp = dispatch(&s, &method, url, Some("{}")).unwrap();
            assert_eq!(status(&resp), 404, "{method} {url}");
        }
    }

    #[test]
    fn query_string_is_ignored_for_routing() {
        let s = state();
        let resp = dispatch(&s, &Method::Get, "/api/funnels?q=webinar&status=all", None).unwrap();
        assert_eq!(status(&resp), 200);
    }

    #[test]
    fn catalog_errors_map_to_status_codes() {
        let missing: anyhow::Error = CatalogError::NotFound {
            kind: "funnel",
            id: "9".to_string(),
        }
        .into();
        assert_eq!(status(&error_response(&missing)), 404);

        let invalid: anyhow::Error = CatalogError::Invalid {
            kind: "flow",
            reason: "name is required".to_string(),
        }
        .into();
        assert_eq!(status(&error_response(&invalid)), 400);

        assert_eq!(status(&error_response(&anyhow::anyhow!("boom"))), 500);
    }

    #[test]
    fn cors_headers_are_added() {
        let resp = with_cors(not_found().unwrap()).unwrap();
        let names: Vec<String> = resp
            .headers()
            .iter()
            .map(|h| h.field.as_str().as_str().to_string())
            .collect();
        assert!(names.iter().any(|n| n == "Access-Control-Allow-Origin"));
        assert!(names.iter().any(|n| n == "Access-Control-Allow-Headers"));
    }
}
