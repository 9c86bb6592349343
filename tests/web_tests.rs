/// End-to-end tests for the HTTP surface.
///
/// Each test binds a server on an ephemeral port, runs the accept loop on a
/// background thread and talks to it with `ureq`, the same client the
/// `wave ai --remote` command uses. Request logging is disabled so nothing
/// is written under the home directory.
use std::sync::Arc;
use std::thread::JoinHandle;

use serde_json::{Value, json};

use wave::ai::client::EdgeClient;
use wave::ai::{AiRequest, ProductContext};
use wave::config::WaveConfig;
use wave::config::schema::ClientConfig;
use wave::web::{self, AppState};

struct TestServer {
    base: String,
    server: Arc<tiny_http::Server>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    fn start() -> Self {
        let mut config = WaveConfig::default();
        config.logging.enabled = false;
        config.simulator.seed = Some(21);

        let server = Arc::new(web::bind("127.0.0.1:0").expect("bind ephemeral port"));
        let addr = server
            .server_addr()
            .to_ip()
            .expect("tcp listener has an ip address");
        let state = AppState::new(config);

        let loop_server = Arc::clone(&server);
        let handle = std::thread::spawn(move || web::run(&loop_server, &state));

        Self {
            base: format!("http://{addr}"),
            server,
            handle: Some(handle),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Status and JSON body, treating 4xx/5xx as ordinary replies.
fn send(request: ureq::Request, body: Option<Value>) -> (u16, Value) {
    let result = match body {
        Some(body) => request.send_json(body),
        None => request.call(),
    };
    let resp = match result {
        Ok(resp) => resp,
        Err(ureq::Error::Status(_, resp)) => resp,
        Err(e) => panic!("transport error: {e}"),
    };
    let status = resp.status();
    let text = resp.into_string().expect("readable body");
    let json = serde_json::from_str(&text).unwrap_or(Value::Null);
    (status, json)
}

// ---------------------------------------------------------------------------
// /wave-ai
// ---------------------------------------------------------------------------

#[test]
fn wave_ai_returns_copy() {
    let srv = TestServer::start();
    let (status, body) = send(
        ureq::post(&srv.url("/wave-ai")),
        Some(json!({
            "prompt": "headline",
            "type": "copy",
            "copyType": "landing",
            "context": { "name": "Método Wave" }
        })),
    );
    assert_eq!(status, 200);
    assert_eq!(body["success"], json!(true));
    let text = body["response"].as_str().expect("response text");
    assert!(text.contains("Copy para Landing Page - Método Wave"));
}

#[test]
fn wave_ai_bad_body_is_500_failure() {
    let srv = TestServer::start();
    let resp = ureq::post(&srv.url("/wave-ai"))
        .set("Content-Type", "application/json")
        .send_string("{not json");
    let resp = match resp {
        Err(ureq::Error::Status(code, resp)) => {
            assert_eq!(code, 500);
            resp
        }
        other => panic!("expected a 500, got {other:?}"),
    };
    assert_eq!(resp.header("Access-Control-Allow-Origin"), Some("*"));
    let body: Value = resp.into_json().expect("json body");
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
}

#[test]
fn preflight_is_empty_200_with_cors() {
    let srv = TestServer::start();
    let resp = ureq::request("OPTIONS", &srv.url("/wave-ai"))
        .call()
        .expect("preflight succeeds");
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.header("Access-Control-Allow-Origin"), Some("*"));
    assert!(
        resp.header("Access-Control-Allow-Methods")
            .is_some_and(|m| m.contains("POST"))
    );
    assert_eq!(resp.into_string().expect("body"), "");
}

#[test]
fn edge_client_round_trips_through_the_server() {
    let srv = TestServer::start();
    let client = EdgeClient::from_config(&ClientConfig {
        edge_url: srv.url("/wave-ai"),
        ..ClientConfig::default()
    });
    let request = AiRequest {
        prompt: "checkout".to_string(),
        kind: "copy".to_string(),
        copy_type: Some("checkout".to_string()),
        context: Some(ProductContext {
            price: Some("R$ 1200".to_string()),
            ..ProductContext::default()
        }),
    };
    let text = client.generate(&request).expect("copy generated");
    assert!(text.contains("Ou 12x de R$ 100"));
}

// ---------------------------------------------------------------------------
// Dashboard API
// ---------------------------------------------------------------------------

#[test]
fn dashboard_reports_metrics_and_charts() {
    let srv = TestServer::start();
    let (status, body) = send(ureq::get(&srv.url("/api/dashboard")), None);
    assert_eq!(status, 200);
    assert!(body["metrics"]["revenue"].is_number());
    assert_eq!(body["series"]["revenue"].as_array().map(Vec::len), Some(24));
    assert_eq!(body["recent_sales"].as_array().map(Vec::len), Some(3));
}

#[test]
fn frontend_is_served_at_root() {
    let srv = TestServer::start();
    let resp = ureq::get(&srv.url("/")).call().expect("index served");
    assert!(
        resp.header("Content-Type")
            .is_some_and(|c| c.starts_with("text/html"))
    );
    assert!(resp.into_string().expect("body").contains("Wave"));
}

#[test]
fn unknown_path_is_404() {
    let srv = TestServer::start();
    let (status, body) = send(ureq::get(&srv.url("/api/nope/at/all/here")), None);
    assert_eq!(status, 404);
    assert_eq!(body["error"], json!("not found"));
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[test]
fn funnel_crud_over_http() {
    let srv = TestServer::start();

    let (status, created) = send(
        ureq::post(&srv.url("/api/funnels")),
        Some(json!({ "name": "Funil de Teste", "type": "lead" })),
    );
    assert_eq!(status, 201);
    let id = created["id"].as_str().expect("assigned id").to_string();
    assert_eq!(created["status"], json!("draft"));

    let (status, toggled) = send(
        ureq::post(&srv.url(&format!("/api/funnels/{id}/toggle"))),
        None,
    );
    assert_eq!(status, 200);
    assert_eq!(toggled["status"], json!("active"));

    let (status, listed) = send(ureq::get(&srv.url("/api/funnels?q=teste")), None);
    assert_eq!(status, 200);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let (status, _) = send(ureq::delete(&srv.url(&format!("/api/funnels/{id}"))), None);
    assert_eq!(status, 200);

    let (status, _) = send(ureq::delete(&srv.url(&format!("/api/funnels/{id}"))), None);
    assert_eq!(status, 404);
}

#[test]
fn blank_name_is_400() {
    let srv = TestServer::start();
    let (status, body) = send(
        ureq::post(&srv.url("/api/products")),
        Some(json!({ "name": "" })),
    );
    assert_eq!(status, 400);
    assert!(body["error"].as_str().is_some_and(|e| e.contains("name")));
}

#[test]
fn update_of_missing_record_is_404() {
    let srv = TestServer::start();
    let (status, _) = send(
        ureq::put(&srv.url("/api/flows/999")),
        Some(json!({ "name": "Fluxo" })),
    );
    assert_eq!(status, 404);
}

#[test]
fn create_after_max_id_keeps_serving() {
    let srv = TestServer::start();
    let (status, _) = send(
        ureq::post(&srv.url("/api/funnels")),
        Some(json!({ "id": u64::MAX.to_string(), "name": "A" })),
    );
    assert_eq!(status, 201);

    let (status, created) = send(
        ureq::post(&srv.url("/api/funnels")),
        Some(json!({ "name": "B" })),
    );
    assert_eq!(status, 201);
    assert_eq!(created["id"], json!("4"));

    let (status, _) = send(
        ureq::post(&srv.url("/api/funnels/1/steps")),
        Some(json!({ "type": "email" })),
    );
    assert_eq!(status, 201);

    let (status, health) = send(ureq::get(&srv.url("/api/health")), None);
    assert_eq!(status, 200);
    assert_eq!(health["records"]["funnels"], json!(5));
}
