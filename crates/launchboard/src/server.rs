//! Dashboard HTTP server.
//!
//! Serves the single-page dashboard and the JSON endpoints behind it. The
//! browser owns the input state and posts it back on every change; the server
//! keeps nothing per client, only the shared read-only dataset.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::binding::{BindingTable, InputId, InputState, SlotUpdate};
use crate::config::Config;
use crate::dataset::{Dataset, DatasetSummary};
use crate::error::{Error, Result};
use crate::layout::Layout;
use crate::views::{
    compute_outcome_rate_view, compute_scatter_view, OutcomeRateView, PayloadRange, ScatterView,
    SiteFilter,
};

/// The dashboard page. Controls and charts are driven by `/api/layout` and
/// `/api/update`.
const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    dataset: Arc<Dataset>,
    bindings: Arc<BindingTable>,
    layout: Arc<Layout>,
}

impl AppState {
    /// Wire the dataset to the standard dashboard bindings and layout.
    #[must_use]
    pub fn new(config: &Config, dataset: Arc<Dataset>) -> Self {
        let layout = Layout::build(&config.dashboard, &dataset);
        Self {
            dataset,
            bindings: Arc::new(BindingTable::dashboard()),
            layout: Arc::new(layout),
        }
    }
}

/// Body of `POST /api/update`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateRequest {
    /// The input that changed; `None` re-renders every slot.
    #[serde(default)]
    pub changed: Option<InputId>,
    /// Current value of every input.
    pub state: InputState,
}

/// Response of `POST /api/update`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateResponse {
    /// Replacement figures for the affected slots.
    pub outputs: Vec<SlotUpdate>,
}

/// Query string of the raw view endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewQuery {
    /// Site value, `ALL` when absent.
    pub site: Option<String>,
    /// Lower payload bound, the slider's initial value when absent.
    pub low: Option<f64>,
    /// Upper payload bound, the slider's initial value when absent.
    pub high: Option<f64>,
}

impl ViewQuery {
    fn site(&self) -> SiteFilter {
        self.site
            .as_deref()
            .map_or(SiteFilter::All, SiteFilter::parse)
    }

    fn range(&self, default: PayloadRange) -> PayloadRange {
        PayloadRange::new(
            self.low.unwrap_or(default.low),
            self.high.unwrap_or(default.high),
        )
    }
}

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    /// Always `ok`.
    pub status: String,
    /// Records in the loaded dataset.
    pub rows: usize,
}

/// Build the dashboard router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/layout", get(layout_handler))
        .route("/api/update", post(update_handler))
        .route("/api/dataset", get(dataset_handler))
        .route("/api/views/outcome-rates", get(outcome_rates_handler))
        .route("/api/views/scatter", get(scatter_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `config.listen_addr()` and serve until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn serve(config: &Config, dataset: Arc<Dataset>) -> Result<()> {
    let addr = config.listen_addr();
    let app = router(AppState::new(config, dataset));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| Error::ServerBind {
            addr: addr.clone(),
            source,
        })?;

    info!(
        url = %format!("http://{addr}"),
        debug = config.server.debug,
        "Dashboard server ready"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Dashboard server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the process is killed.
        std::future::pending::<()>().await;
    }
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_handler(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        rows: state.dataset.len(),
    })
}

async fn layout_handler(State(state): State<AppState>) -> Json<Layout> {
    Json(state.layout.as_ref().clone())
}

async fn update_handler(
    State(state): State<AppState>,
    Json(request): Json<UpdateRequest>,
) -> Json<UpdateResponse> {
    let outputs = match request.changed {
        Some(changed) => state
            .bindings
            .dispatch(&state.dataset, &request.state, changed),
        None => state.bindings.render_all(&state.dataset, &request.state),
    };
    Json(UpdateResponse { outputs })
}

async fn dataset_handler(State(state): State<AppState>) -> Json<DatasetSummary> {
    Json(state.dataset.summary())
}

async fn outcome_rates_handler(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Json<OutcomeRateView> {
    Json(compute_outcome_rate_view(&state.dataset, &query.site()))
}

async fn scatter_handler(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Json<ScatterView> {
    let range = query.range(state.layout.slider.value);
    Json(compute_scatter_view(&state.dataset, &query.site(), range))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use crate::binding::OutputSlot;
    use crate::dataset::{LaunchRecord, Outcome};

    fn app() -> Router {
        crate::logging::init_test_logging();
        let dataset = Dataset::new(
            vec![
                LaunchRecord::new("CCAFS LC-40", 500.0, "v1.0", Outcome::Failure),
                LaunchRecord::new("CCAFS LC-40", 1500.0, "v1.1", Outcome::Success),
                LaunchRecord::new("KSC LC-39A", 3000.0, "FT", Outcome::Success),
                LaunchRecord::new("VAFB SLC-4E", 9000.0, "B5", Outcome::Success),
            ],
            "test",
        );
        router(AppState::new(&Config::default(), Arc::new(dataset)))
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or_default())
    }

    async fn post_update(body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/update")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or_default())
    }

    #[tokio::test]
    async fn test_index_serves_html() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("success-pie-graph"));
        assert!(html.contains("/api/update"));
    }

    #[tokio::test]
    async fn test_index_applies_slider_step_and_drops_stale_updates() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();

        assert!(html.contains("input.step = slider.step"));
        assert!(!html.contains("\"any\""));
        assert!(html.contains("latest[slot] !== seq"));
    }

    #[tokio::test]
    async fn test_layout_slider_step_from_config() {
        let (_, json) = get_json("/api/layout").await;
        assert_eq!(json["slider"]["step"], 1000.0);
        assert_eq!(json["slider"]["min"], 0.0);
        assert_eq!(json["slider"]["max"], 10000.0);
    }

    #[tokio::test]
    async fn test_health() {
        let (status, json) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["rows"], 4);
    }

    #[tokio::test]
    async fn test_layout_initial_value_from_dataset() {
        let (status, json) = get_json("/api/layout").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["slider"]["value"], serde_json::json!([500.0, 9000.0]));
        assert_eq!(json["dropdown"]["options"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_update_without_changed_renders_all() {
        let (status, json) = post_update(serde_json::json!({
            "state": { "site": "ALL", "payload": [0, 10000] }
        }))
        .await;
        assert_eq!(status, StatusCode::OK);

        let outputs: Vec<SlotUpdate> = serde_json::from_value(json["outputs"].clone()).unwrap();
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].slot, OutputSlot::SuccessPieGraph);
        assert_eq!(outputs[1].figure.point_count(), 4);
    }

    #[tokio::test]
    async fn test_update_slider_change_only_scatter() {
        let (status, json) = post_update(serde_json::json!({
            "changed": "payload-slider",
            "state": { "site": "CCAFS LC-40", "payload": [1000, 5000] }
        }))
        .await;
        assert_eq!(status, StatusCode::OK);

        let outputs = json["outputs"].as_array().unwrap();
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0]["slot"], "success-scatter-graph");
        assert_eq!(
            outputs[0]["figure"]["layout"]["title"]["text"],
            "Payload Mass vs. Launch Outcome for CCAFS LC-40"
        );
        assert_eq!(outputs[0]["figure"]["data"][0]["x"], serde_json::json!([1500.0]));
    }

    #[tokio::test]
    async fn test_update_rejects_malformed_body() {
        let (status, _) = post_update(serde_json::json!({ "changed": "site-dropdown" })).await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_outcome_rates_view() {
        let (status, json) = get_json("/api/views/outcome-rates?site=CCAFS%20LC-40").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["site"], "CCAFS LC-40");
        assert_eq!(json["slices"][0]["label"], "Success");
        assert_eq!(json["slices"][0]["value"], 0.5);

        let (_, json) = get_json("/api/views/outcome-rates").await;
        assert_eq!(json["slices"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_outcome_rates_unknown_site_is_empty() {
        let (status, json) = get_json("/api/views/outcome-rates?site=Nowhere").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["slices"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_scatter_view() {
        let (status, json) = get_json("/api/views/scatter?low=1000&high=5000").await;
        assert_eq!(status, StatusCode::OK);
        let masses: Vec<f64> = json["points"]
            .as_array()
            .unwrap()
            .iter()
            .map(|point| point["payload_mass_kg"].as_f64().unwrap())
            .collect();
        assert_eq!(masses, vec![1500.0, 3000.0]);
    }

    #[tokio::test]
    async fn test_scatter_view_inverted_range() {
        let (status, json) = get_json("/api/views/scatter?low=5000&high=1000").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["points"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_scatter_view_bad_query() {
        let (status, _) = get_json("/api/views/scatter?low=heavy").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_dataset_summary() {
        let (status, json) = get_json("/api/dataset").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["rows"], 4);
        assert_eq!(json["source"], "test");
        assert_eq!(json["sites"].as_array().unwrap().len(), 3);
    }
}
