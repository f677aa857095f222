use crate::infra::{
    deserialize_optional_date, deserialize_ordered_documents, serialize_ordered_documents,
    AppState, DocumentService,
};
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::NaiveDate;
use docintel::dispatch::{AlertChannel, DigestChannel, DispatchReport, LogChannel};
use docintel::report::{render_methodology, ClassificationSummary, ClassificationView};
use docintel::samples::SAMPLE_DOCUMENTS;
use docintel::{AppError, ScoringConfig};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Deserialize)]
pub(crate) struct ClassifyRequest {
    pub(crate) document_name: String,
    pub(crate) content: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) reference_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BatchRequest {
    #[serde(deserialize_with = "deserialize_ordered_documents")]
    pub(crate) documents: Vec<(String, String)>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) reference_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadParams {
    pub(crate) name: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) reference_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct BatchResponse {
    pub(crate) results: Vec<ClassificationView>,
    pub(crate) summary: ClassificationSummary,
    pub(crate) automation: DispatchReport,
}

#[derive(Debug, Serialize)]
pub(crate) struct WorkflowResponse {
    pub(crate) message: &'static str,
    pub(crate) document_count: usize,
    pub(crate) automation: DispatchReport,
}

#[derive(Debug, Serialize)]
pub(crate) struct MethodologyResponse {
    pub(crate) methodology: String,
    pub(crate) scoring_system: ScoringConfig,
}

#[derive(Debug, Serialize)]
pub(crate) struct SampleDocumentsResponse {
    pub(crate) count: usize,
    #[serde(serialize_with = "serialize_ordered_documents")]
    pub(crate) documents: &'static [(&'static str, &'static str)],
}

/// Document classification and automation endpoints.
pub(crate) fn document_router<A, D, L>(service: Arc<DocumentService<A, D, L>>) -> Router
where
    A: AlertChannel + 'static,
    D: DigestChannel + 'static,
    L: LogChannel + 'static,
{
    Router::new()
        .route("/api/v1/documents/classify", post(classify_handler::<A, D, L>))
        .route(
            "/api/v1/documents/classify-batch",
            post(classify_batch_handler::<A, D, L>),
        )
        .route("/api/v1/documents/upload", post(upload_handler::<A, D, L>))
        .route(
            "/api/v1/automation/workflows",
            post(workflows_handler::<A, D, L>),
        )
        .route("/api/v1/methodology", get(methodology_handler::<A, D, L>))
        .with_state(service)
}

/// Adds the operational and reference routes to `router`.
pub(crate) fn with_service_routes(router: Router) -> Router {
    router
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/sample-documents", get(sample_documents_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn sample_documents_endpoint() -> Json<SampleDocumentsResponse> {
    Json(SampleDocumentsResponse {
        count: SAMPLE_DOCUMENTS.len(),
        documents: SAMPLE_DOCUMENTS,
    })
}

pub(crate) async fn classify_handler<A, D, L>(
    State(service): State<Arc<DocumentService<A, D, L>>>,
    Json(request): Json<ClassifyRequest>,
) -> Json<ClassificationView>
where
    A: AlertChannel + 'static,
    D: DigestChannel + 'static,
    L: LogChannel + 'static,
{
    let now = service.reference_time(request.reference_date);
    let result = service
        .engine()
        .classify_at(&request.content, &request.document_name, now);
    Json(ClassificationView::from(&result))
}

pub(crate) async fn classify_batch_handler<A, D, L>(
    State(service): State<Arc<DocumentService<A, D, L>>>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<BatchResponse>, AppError>
where
    A: AlertChannel + 'static,
    D: DigestChannel + 'static,
    L: LogChannel + 'static,
{
    let now = service.reference_time(request.reference_date);
    let (results, automation) = service.process_batch(request.documents, now).await?;
    let summary = ClassificationSummary::from_results(&results);

    info!(
        documents = summary.total_documents,
        high = summary.high_priority,
        "batch classified"
    );

    Ok(Json(BatchResponse {
        results: results.iter().map(ClassificationView::from).collect(),
        summary,
        automation,
    }))
}

pub(crate) async fn workflows_handler<A, D, L>(
    State(service): State<Arc<DocumentService<A, D, L>>>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<WorkflowResponse>, AppError>
where
    A: AlertChannel + 'static,
    D: DigestChannel + 'static,
    L: LogChannel + 'static,
{
    let now = service.reference_time(request.reference_date);
    let (results, automation) = service.process_batch(request.documents, now).await?;

    Ok(Json(WorkflowResponse {
        message: "Automation workflows executed successfully",
        document_count: results.len(),
        automation,
    }))
}

pub(crate) async fn upload_handler<A, D, L>(
    State(service): State<Arc<DocumentService<A, D, L>>>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Result<Json<ClassificationView>, AppError>
where
    A: AlertChannel + 'static,
    D: DigestChannel + 'static,
    L: LogChannel + 'static,
{
    if !params.name.to_ascii_lowercase().ends_with(".txt") {
        return Err(AppError::bad_request("only .txt files are supported"));
    }

    let content = String::from_utf8(body.to_vec())
        .map_err(|_| AppError::bad_request("uploaded file is not valid UTF-8 text"))?;

    let now = service.reference_time(params.reference_date);
    let result = service.engine().classify_at(&content, &params.name, now);
    Ok(Json(ClassificationView::from(&result)))
}

pub(crate) async fn methodology_handler<A, D, L>(
    State(service): State<Arc<DocumentService<A, D, L>>>,
) -> Json<MethodologyResponse>
where
    A: AlertChannel + 'static,
    D: DigestChannel + 'static,
    L: LogChannel + 'static,
{
    let config = service.engine().config();
    Json(MethodologyResponse {
        methodology: render_methodology(config),
        scoring_system: config.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use docintel::dispatch::{
        MemoryAlertChannel, MemoryDigestChannel, MemoryLog, NotificationDispatcher,
    };
    use docintel::scoring::{FixedClock, ScoringEngine};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    struct Harness {
        router: Router,
        alerts: Arc<MemoryAlertChannel>,
        log: Arc<MemoryLog>,
    }

    fn harness() -> Harness {
        let engine = ScoringEngine::with_clock(
            ScoringConfig::standard(),
            Arc::new(FixedClock::on_date(
                NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid date"),
            )),
        )
        .expect("engine builds");

        let alerts = Arc::new(MemoryAlertChannel::default());
        let log = Arc::new(MemoryLog::default());
        let dispatcher = NotificationDispatcher::new(
            alerts.clone(),
            Arc::new(MemoryDigestChannel::default()),
            log.clone(),
            vec!["stakeholders@yourcompany.com".to_string()],
        );
        let service = Arc::new(DocumentService::new(engine, dispatcher));

        let state = AppState {
            readiness: Arc::new(AtomicBool::new(true)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };

        Harness {
            router: with_service_routes(document_router(service)).layer(Extension(state)),
            alerts,
            log,
        }
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router
            .clone()
            .oneshot(request)
            .await
            .expect("router dispatch");
        let status = response.status();
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("read body");
        let payload = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, payload)
    }

    fn post_json(uri: &str, payload: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::to_vec(&payload).expect("serialize payload"),
            ))
            .expect("request")
    }

    fn post_raw(uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .expect("request")
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    #[tokio::test]
    async fn health_and_readiness_report_ok() {
        let harness = harness();

        let (status, payload) = send(&harness.router, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["status"], "ok");

        let (status, payload) = send(&harness.router, get("/ready")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["status"], "ready");
    }

    #[tokio::test]
    async fn classify_returns_labelled_result() {
        let harness = harness();
        let request = post_json(
            "/api/v1/documents/classify",
            json!({
                "document_name": "notice.txt",
                "content": "Sales are prohibited and banned.",
            }),
        );

        let (status, payload) = send(&harness.router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["score"], -6);
        assert_eq!(payload["classification"], "IRRELEVANT");
        assert_eq!(payload["recommended_action"], "ignore");
        assert_eq!(payload["reasoning"], "Limited cannabis relevance");
    }

    #[tokio::test]
    async fn reference_date_moves_the_date_window() {
        let harness = harness();
        let content = format!("{}Hearing on 06/01/2025", "\n".repeat(10));

        let (_, default_window) = send(
            &harness.router,
            post_json(
                "/api/v1/documents/classify",
                json!({ "document_name": "notice.txt", "content": content }),
            ),
        )
        .await;
        let (_, shifted_window) = send(
            &harness.router,
            post_json(
                "/api/v1/documents/classify",
                json!({
                    "document_name": "notice.txt",
                    "content": content,
                    "reference_date": "2025-05-20",
                }),
            ),
        )
        .await;

        assert_eq!(default_window["score"], 0);
        assert_eq!(shifted_window["score"], 5);
        assert!(shifted_window["processed_at"]
            .as_str()
            .expect("timestamp")
            .starts_with("2025-05-20"));
    }

    #[tokio::test]
    async fn batch_keeps_order_and_dispatches() {
        let harness = harness();
        // Raw body: keys are not in alphabetical order.
        let request = post_raw(
            "/api/v1/documents/classify-batch",
            r#"{"documents": {
                "zoning.txt": "Park maintenance only.",
                "ordinance.txt": "Cannabis retail ordinance approved. Licensing program and application period open; second reading, merit-based selection, dispensary license, application window, conditional use permit approved.",
                "budget.txt": "Budget discussion mentions cannabis tax revenue and marijuana dispensary retail."
            }}"#,
        );

        let (status, payload) = send(&harness.router, request).await;

        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = payload["results"]
            .as_array()
            .expect("results array")
            .iter()
            .map(|result| result["document_name"].as_str().expect("name"))
            .collect();
        assert_eq!(names, vec!["zoning.txt", "ordinance.txt", "budget.txt"]);
        assert_eq!(payload["summary"]["total_documents"], 3);
        assert_eq!(payload["results"][0]["classification"], "IRRELEVANT");
        assert_eq!(payload["results"][1]["classification"], "HIGH_PRIORITY");
        assert_eq!(payload["results"][2]["classification"], "LOW_PRIORITY");
        assert_eq!(payload["automation"]["alerts"]["status"], "delivered");
        assert_eq!(harness.alerts.messages().len(), 1);
        assert_eq!(harness.log.entries().len(), 1);
    }

    #[tokio::test]
    async fn workflows_report_document_count() {
        let harness = harness();
        let request = post_json(
            "/api/v1/automation/workflows",
            json!({ "documents": { "library.txt": "Library hours update." } }),
        );

        let (status, payload) = send(&harness.router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["document_count"], 1);
        assert_eq!(payload["automation"]["ignored"], 1);
        assert_eq!(payload["automation"]["log"]["status"], "skipped");
    }

    #[tokio::test]
    async fn upload_rejects_non_text_files() {
        let harness = harness();
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/documents/upload?name=minutes.pdf")
            .body(Body::from("binary"))
            .expect("request");

        let (status, payload) = send(&harness.router, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(payload["error"]
            .as_str()
            .expect("error message")
            .contains("only .txt files"));
    }

    #[tokio::test]
    async fn upload_classifies_text_body() {
        let harness = harness();
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/documents/upload?name=hearing.txt")
            .body(Body::from("Public hearing scheduled by the planning commission."))
            .expect("request");

        let (status, payload) = send(&harness.router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["document_name"], "hearing.txt");
        assert_eq!(payload["score"], 12);
        assert_eq!(payload["classification"], "LOW_PRIORITY");
    }

    #[tokio::test]
    async fn methodology_exposes_active_tables() {
        let harness = harness();

        let (status, payload) = send(&harness.router, get("/api/v1/methodology")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["scoring_system"]["thresholds"]["high"], 70);
        assert_eq!(
            payload["scoring_system"]["keywords"]["high"]["phrases"][0],
            "cannabis retail"
        );
        assert!(payload["methodology"]
            .as_str()
            .expect("methodology text")
            .contains("HIGH PRIORITY"));
    }

    #[tokio::test]
    async fn sample_documents_are_listed() {
        let harness = harness();

        let (status, payload) = send(&harness.router, get("/api/v1/sample-documents")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["count"], SAMPLE_DOCUMENTS.len());
        assert!(payload["documents"]
            .get("cannabis_retail_ordinance_approved.txt")
            .is_some());
    }
}
