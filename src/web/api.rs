//! JSON API handlers.
//!
//! Each handler corresponds to an endpoint and returns a
//! `Response<Cursor<Vec<u8>>>` with JSON content. Catalog failures are
//! returned as [`CatalogError`] so the router can pick 404 or 400.

use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{AppState, HttpResponse, json_with_status, not_found};
use crate::ai::{self, AiRequest, AiResponse};
use crate::analytics::logger::{self, AiLogEntry};
use crate::catalog::records::{Funnel, StepKind};
use crate::catalog::{CatalogError, FunnelTotals, ProductReport, Record, Store};
use crate::chart::{self, AREA, SPARKLINE};
use crate::format;
use crate::metrics::sales::{SaleRecord, SaleStatus};
use crate::metrics::snapshot::MetricSnapshot;
use crate::metrics::updater::ChartSeries;

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

/// Record lists addressable under `/api/{kind}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Affiliates,
    Products,
    Funnels,
    Flows,
}

impl Collection {
    pub fn parse(segment: &str) -> Option<Self> {
        match segment {
            "affiliates" => Some(Self::Affiliates),
            "products" => Some(Self::Products),
            "funnels" => Some(Self::Funnels),
            "flows" => Some(Self::Flows),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// JSON response types
// ---------------------------------------------------------------------------

/// `GET /api/dashboard`.
#[derive(Serialize)]
struct DashboardResponse<'a> {
    metrics: &'a MetricSnapshot,
    formatted: FormattedMetrics,
    series: &'a ChartSeries,
    charts: Charts,
    recent_sales: Vec<SaleView<'a>>,
    funnel_totals: FunnelTotals,
    ticks: u64,
}

#[derive(Serialize)]
struct FormattedMetrics {
    revenue: String,
    sales_count: String,
    active_affiliates: String,
    conversion_rate: String,
    revenue_growth: String,
    sales_growth: String,
    affiliates_growth: String,
    conversion_growth: String,
}

impl FormattedMetrics {
    fn from_snapshot(m: &MetricSnapshot) -> Self {
        Self {
            revenue: format::format_currency(m.revenue),
            sales_count: format::format_integer(m.sales_count),
            active_affiliates: format::format_integer(m.active_affiliates),
            conversion_rate: format::format_percent(m.conversion_rate),
            revenue_growth: format::format_growth(m.revenue_growth),
            sales_growth: format::format_growth(m.sales_growth),
            affiliates_growth: format::format_growth(m.affiliates_growth),
            conversion_growth: format::format_growth(m.conversion_growth),
        }
    }
}

#[derive(Serialize)]
struct Charts {
    sales: ChartPaths,
    revenue: ChartPaths,
    conversion: ChartPaths,
}

/// Sparkline for the metric card plus the smoothed area chart.
#[derive(Serialize)]
struct ChartPaths {
    sparkline: String,
    smooth: String,
    area: String,
    last_point: Option<(f64, f64)>,
}

impl ChartPaths {
    fn from_samples(samples: &[f64]) -> Self {
        Self {
            sparkline: chart::line_path(samples, &SPARKLINE),
            smooth: chart::smooth_path(samples, &AREA),
            area: chart::area_path(samples, &AREA),
            last_point: chart::last_point(samples, &AREA),
        }
    }
}

#[derive(Serialize)]
struct SaleView<'a> {
    #[serde(flatten)]
    sale: &'a SaleRecord,
    amount_formatted: String,
    date_formatted: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    ticks: u64,
    tick_ms: u64,
    logging: bool,
    records: RecordCounts,
}

#[derive(Serialize)]
struct RecordCounts {
    affiliates: usize,
    products: usize,
    funnels: usize,
    flows: usize,
    recent_sales: usize,
    pending_sales: usize,
}

#[derive(serde::Deserialize)]
struct StepRequest {
    #[serde(rename = "type")]
    kind: StepKind,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON success response.
fn json_response<T: Serialize>(data: &T) -> Result<HttpResponse> {
    json_status(data, 200)
}

fn json_status<T: Serialize>(data: &T, status: u16) -> Result<HttpResponse> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    json_with_status(body, status)
}

/// Value of query parameter `key`, with `+` and `%XX` decoded.
fn query_param(url: &str, key: &str) -> Option<String> {
    url.split('?').nth(1)?.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        if k == key { Some(percent_decode(v)) } else { None }
    })
}

/// `+` is a space in query strings; `urlencoding` only handles `%XX`.
fn percent_decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned(),
    }
}

fn parse_body<T: Record + DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        CatalogError::Invalid {
            kind: T::KIND,
            reason: e.to_string(),
        }
        .into()
    })
}

fn list_in<T: Record + Serialize>(store: &Store<T>, url: &str) -> Result<HttpResponse> {
    let q = query_param(url, "q").unwrap_or_default();
    let status = query_param(url, "status").unwrap_or_default();
    json_response(&store.filter(&q, &status))
}

fn create_in<T: Record + Serialize + DeserializeOwned>(store: &mut Store<T>, body: &str) -> Result<HttpResponse> {
    let record = parse_body::<T>(body)?;
    json_status(store.create(record, Utc::now())?, 201)
}

fn update_in<T: Record + Serialize + DeserializeOwned>(
    store: &mut Store<T>,
    id: &str,
    body: &str,
) -> Result<HttpResponse> {
    let record = parse_body::<T>(body)?;
    json_response(store.update(id, record)?)
}

fn delete_in<T: Record + Serialize>(store: &mut Store<T>, id: &str) -> Result<HttpResponse> {
    json_response(&store.delete(id)?)
}

// ---------------------------------------------------------------------------
// Copy endpoint
// ---------------------------------------------------------------------------

/// `POST /wave-ai`: canned copy or strategy.
///
/// Never returns `Err`: a bad body becomes `500 { success: false, error }`.
/// Every call is written to the request log.
pub fn post_wave_ai(state: &AppState, body: &str) -> Result<HttpResponse> {
    let started = Instant::now();
    let logging = &state.config().logging;

    let request: AiRequest = match serde_json::from_str(body) {
        Ok(req) => req,
        Err(e) => {
            let message = format!("invalid request body: {e}");
            let latency = started.elapsed().as_millis() as u64;
            logger::log_ai_request(logging, &AiLogEntry::failed("unknown", latency, &message));
            return json_status(&AiResponse::failed(message), 500);
        }
    };

    let category = request.category();
    let text = ai::respond(&request, &mut *state.lock_rng());

    let copy_type = match category {
        ai::AiCategory::Copy => Some(ai::CopyType::parse(request.copy_type.as_deref()).to_string()),
        ai::AiCategory::Strategy => None,
    };
    let latency = started.elapsed().as_millis() as u64;
    logger::log_ai_request(
        logging,
        &AiLogEntry::succeeded(&category.to_string(), copy_type.as_deref(), latency, &text),
    );

    json_response(&AiResponse::ok(text))
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// `GET /api/dashboard`: the live dashboard state with chart paths.
pub fn get_dashboard(state: &AppState) -> Result<HttpResponse> {
    let funnel_totals = state.lock_catalogs().funnel_totals();
    let dashboard = state.lock_dashboard();
    let series = dashboard.series();

    let resp = DashboardResponse {
        metrics: dashboard.metrics(),
        formatted: FormattedMetrics::from_snapshot(dashboard.metrics()),
        series,
        charts: Charts {
            sales: ChartPaths::from_samples(&series.sales.to_vec()),
            revenue: ChartPaths::from_samples(&series.revenue.to_vec()),
            conversion: ChartPaths::from_samples(&series.conversion.to_vec()),
        },
        recent_sales: dashboard
            .recent_sales()
            .iter()
            .map(|sale| SaleView {
                sale,
                amount_formatted: format::format_currency(sale.amount),
                date_formatted: format::format_datetime(&sale.date.with_timezone(&Local)),
            })
            .collect(),
        funnel_totals,
        ticks: dashboard.ticks(),
    };

    json_response(&resp)
}

/// `GET /api/health`: liveness plus counts.
pub fn get_health(state: &AppState) -> Result<HttpResponse> {
    let (ticks, recent_sales, pending_sales) = {
        let d = state.lock_dashboard();
        let pending = d
            .recent_sales()
            .iter()
            .filter(|s| s.status == SaleStatus::Pending)
            .count();
        (d.ticks(), d.recent_sales().len(), pending)
    };
    let catalogs = state.lock_catalogs();

    let resp = HealthResponse {
        status: "ok",
        ticks,
        tick_ms: state.config().simulator.tick_ms,
        logging: state.config().logging.enabled,
        records: RecordCounts {
            affiliates: catalogs.affiliates.len(),
            products: catalogs.products.len(),
            funnels: catalogs.funnels.len(),
            flows: catalogs.flows.len(),
            recent_sales,
            pending_sales,
        },
    };

    json_response(&resp)
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// `GET /api/{kind}?q=&status=`.
pub fn list_records(state: &AppState, collection: Collection, url: &str) -> Result<HttpResponse> {
    let c = state.lock_catalogs();
    match collection {
        Collection::Affiliates => list_in(&c.affiliates, url),
        Collection::Products => list_in(&c.products, url),
        Collection::Funnels => list_in(&c.funnels, url),
        Collection::Flows => list_in(&c.flows, url),
    }
}

/// `POST /api/{kind}`: 201 with the stored record.
pub fn create_record(state: &AppState, collection: Collection, body: &str) -> Result<HttpResponse> {
    let mut c = state.lock_catalogs();
    match collection {
        Collection::Affiliates => create_in(&mut c.affiliates, body),
        Collection::Products => create_in(&mut c.products, body),
        Collection::Funnels => create_in(&mut c.funnels, body),
        Collection::Flows => create_in(&mut c.flows, body),
    }
}

/// `PUT /api/{kind}/{id}`.
pub fn update_record(state: &AppState, collection: Collection, id: &str, body: &str) -> Result<HttpResponse> {
    let mut c = state.lock_catalogs();
    match collection {
        Collection::Affiliates => update_in(&mut c.affiliates, id, body),
        Collection::Products => update_in(&mut c.products, id, body),
        Collection::Funnels => update_in(&mut c.funnels, id, body),
        Collection::Flows => update_in(&mut c.flows, id, body),
    }
}

/// `DELETE /api/{kind}/{id}`: returns the removed record.
pub fn delete_record(state: &AppState, collection: Collection, id: &str) -> Result<HttpResponse> {
    let mut c = state.lock_catalogs();
    match collection {
        Collection::Affiliates => delete_in(&mut c.affiliates, id),
        Collection::Products => delete_in(&mut c.products, id),
        Collection::Funnels => delete_in(&mut c.funnels, id),
        Collection::Flows => delete_in(&mut c.flows, id),
    }
}

/// `POST /api/{funnels|flows}/{id}/duplicate`: 201 with the copy.
pub fn duplicate_record(state: &AppState, collection: Collection, id: &str) -> Result<HttpResponse> {
    let mut c = state.lock_catalogs();
    let now = Utc::now();
    match collection {
        Collection::Funnels => json_status(c.funnels.duplicate(id, now)?, 201),
        Collection::Flows => json_status(c.flows.duplicate(id, now)?, 201),
        Collection::Affiliates | Collection::Products => not_found(),
    }
}

/// `POST /api/{funnels|flows}/{id}/toggle`.
pub fn toggle_record(state: &AppState, collection: Collection, id: &str) -> Result<HttpResponse> {
    let mut c = state.lock_catalogs();
    match collection {
        Collection::Funnels => json_response(c.funnels.toggle(id)?),
        Collection::Flows => json_response(c.flows.toggle(id)?),
        Collection::Affiliates | Collection::Products => not_found(),
    }
}

/// `GET /api/products/{id}/report`.
pub fn get_product_report(state: &AppState, id: &str) -> Result<HttpResponse> {
    let c = state.lock_catalogs();
    let product = c.products.get(id).ok_or_else(|| CatalogError::NotFound {
        kind: "product",
        id: id.to_string(),
    })?;
    json_response(&ProductReport::for_product(product))
}

/// `POST /api/funnels/{id}/steps` with `{ "type": kind }`: 201 with the funnel.
pub fn post_funnel_step(state: &AppState, id: &str, body: &str) -> Result<HttpResponse> {
    let req: StepRequest = serde_json::from_str(body).map_err(|e| CatalogError::Invalid {
        kind: "funnel step",
        reason: e.to_string(),
    })?;
    let mut c = state.lock_catalogs();
    let funnel = c.funnels.modify(id, |f: &mut Funnel| {
        f.add_step(req.kind);
        f.clone()
    })?;
    json_status(&funnel, 201)
}

/// `DELETE /api/funnels/{id}/steps/{step_id}`: the funnel without the step.
pub fn delete_funnel_step(state: &AppState, id: &str, step_id: &str) -> Result<HttpResponse> {
    let mut c = state.lock_catalogs();
    let funnel = c.funnels.modify(id, |f: &mut Funnel| f.remove_step(step_id).then(|| f.clone()))?;
    match funnel {
        Some(funnel) => json_response(&funnel),
        None => Err(CatalogError::NotFound {
            kind: "funnel step",
            id: step_id.to_string(),
        }
        .into()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WaveConfig;

    fn state() -> AppState {
        let mut config = WaveConfig::default();
        config.logging.enabled = false;
        config.simulator.seed = Some(11);
        AppState::new(config)
    }

    fn body_json(resp: HttpResponse) -> serde_json::Value {
        let mut buf = String::new();
        std::io::Read::read_to_string(&mut resp.into_reader(), &mut buf).unwrap();
        serde_json::from_str(&buf).unwrap()
    }

    #[test]
    fn query_param_decodes() {
        assert_eq!(query_param("/api/funnels?q=e-book&status=all", "q").as_deref(), Some("e-book"));
        assert_eq!(query_param("/api/funnels?q=Leads+E-book", "q").as_deref(), Some("Leads E-book"));
        assert_eq!(query_param("/api/flows?q=ol%C3%A1", "q").as_deref(), Some("olá"));
        assert_eq!(query_param("/api/flows?q=100%", "q").as_deref(), Some("100%"));
        assert_eq!(query_param("/api/flows?q=a%2Bb", "q").as_deref(), Some("a+b"));
        assert_eq!(query_param("/api/flows?q=%FF", "q").as_deref(), Some("\u{FFFD}"));
        assert_eq!(query_param("/api/flows", "q"), None);
        assert_eq!(query_param("/api/flows?status=paused", "q"), None);
    }

    #[test]
    fn wave_ai_copy_response() {
        let s = state();
        let resp = post_wave_ai(
            &s,
            r#"{"prompt":"","type":"copy","copyType":"checkout","context":{"name":"Kit","price":"R$ 1200"}}"#,
        )
        .unwrap();
        assert_eq!(resp.status_code().0, 200);
        let json = body_json(resp);
        assert_eq!(json["success"], true);
        let text = json["response"].as_str().unwrap();
        assert!(text.contains("Copy para Página de Checkout - Kit"));
        assert!(text.contains("Ou 12x de R$ 100"));
    }

    #[test]
    fn wave_ai_bad_body_is_500() {
        let s = state();
        let resp = post_wave_ai(&s, "{not json").unwrap();
        assert_eq!(resp.status_code().0, 500);
        let json = body_json(resp);
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("invalid request body"));
    }

    #[test]
    fn dashboard_has_formatted_values_and_paths() {
        let s = state();
        let json = body_json(get_dashboard(&s).unwrap());
        assert_eq!(json["formatted"]["revenue"], "R$ 24.587,00");
        assert_eq!(json["formatted"]["conversion_rate"], "7,2%");
        assert_eq!(json["formatted"]["revenue_growth"], "↑ 12,0%");
        assert_eq!(json["series"]["sales"].as_array().unwrap().len(), 24);
        assert!(json["charts"]["revenue"]["area"].as_str().unwrap().ends_with(" L 300,120 L 0,120 Z"));
        assert!(json["charts"]["sales"]["sparkline"].as_str().unwrap().starts_with("M 0,"));
        assert_eq!(json["recent_sales"].as_array().unwrap().len(), 3);
        assert_eq!(json["recent_sales"][0]["amount_formatted"], "R$ 497,00");
        assert_eq!(json["funnel_totals"]["visitors"], 9537);
    }

    #[test]
    fn funnel_step_routes() {
        let s = state();
        let json = body_json(post_funnel_step(&s, "2", r#"{"type":"upsell"}"#).unwrap());
        assert_eq!(json["steps"].as_array().unwrap().len(), 3);
        assert_eq!(json["steps"][2]["name"], "Upsell");

        let json = body_json(delete_funnel_step(&s, "2", "3").unwrap());
        assert_eq!(json["steps"].as_array().unwrap().len(), 2);

        let err = delete_funnel_step(&s, "2", "3").err().expect("expected error");
        assert!(matches!(err.downcast_ref::<CatalogError>(), Some(CatalogError::NotFound { .. })));
        assert!(post_funnel_step(&s, "2", r#"{"type":"rocket"}"#).is_err());
    }

    #[test]
    fn duplicate_not_offered_for_products() {
        let s = state();
        let resp = duplicate_record(&s, Collection::Products, "1").unwrap();
        assert_eq!(resp.status_code().0, 404);
    }
}
