use axum::{
    Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, HeaderValue, Request, StatusCode, header::CONTENT_TYPE},
    middleware::{Next, from_fn},
    response::{Json, Response},
    routing::{get, post},
};
use refund_appeal::{AnalysisClient, AppealError, EvidenceDocument, render_report, verify};
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{Instrument, error, info, warn};
use uuid::Uuid;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
pub const FILE_NAME_HEADER: &str = "x-file-name";
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;
type ApiError = (StatusCode, Json<Value>);

fn bad_request_error(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn analysis_error(err: &AppealError) -> ApiError {
    let status = match err {
        AppealError::Validation(_) => StatusCode::BAD_REQUEST,
        AppealError::Transport(_) | AppealError::Format(_) => StatusCode::BAD_GATEWAY,
        AppealError::Config(_) | AppealError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": err.user_message() })))
}

#[derive(Clone)]
pub struct AppState {
    pub client: AnalysisClient,
}

pub fn create_app(client: AnalysisClient, max_upload_bytes: usize) -> Router {
    build_router(AppState { client }, max_upload_bytes)
}

fn build_router(app_state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/refund/analyze", post(analyze_evidence))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(from_fn(correlation_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Tag every request with a correlation id and run it inside a span carrying it
async fn correlation_id_middleware(
    mut request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let correlation_id = Uuid::new_v4().to_string();
    let header_value = HeaderValue::from_str(&correlation_id).ok();

    if let Some(value) = &header_value {
        request
            .headers_mut()
            .insert(CORRELATION_ID_HEADER, value.clone());
    }

    let span = tracing::info_span!("http_request", correlation_id = %correlation_id);
    let mut response = next.run(request).instrument(span).await;

    if let Some(value) = header_value {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }
    response
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "Refund Appeal Service",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Upload PDF evidence to generate a cited refund appeal",
        "endpoints": {
            "POST /refund/analyze": "Analyze a PDF (raw body, Content-Type: application/pdf, optional X-File-Name)",
            "GET /health": "Health check"
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn analyze_evidence(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Value> {
    if body.is_empty() {
        return Err(bad_request_error("Please select a PDF file first."));
    }

    let document = evidence_from_upload(&headers, body);
    let analysis_id = Uuid::new_v4().to_string();

    info!(
        analysis_id = %analysis_id,
        document = %document.name,
        media_type = %document.media_type,
        bytes = document.bytes.len(),
        "Starting refund evidence analysis"
    );

    let result = state.client.analyze(&document).await.map_err(|e| {
        error!(analysis_id = %analysis_id, error = %e, "Refund evidence analysis failed");
        analysis_error(&e)
    })?;

    let audit = verify(&result);
    for warning in &audit.warnings {
        warn!(analysis_id = %analysis_id, warning = %warning, "Audit finding");
    }

    info!(
        analysis_id = %analysis_id,
        status = result.status(),
        "Refund evidence analysis finished"
    );

    Ok(Json(json!({
        "analysis_id": analysis_id,
        "status": result.status(),
        "report": render_report(&result, &audit),
        "warnings": audit.warnings,
        "claimed_checks": audit.claimed_checks,
        "result": result,
    })))
}

fn evidence_from_upload(headers: &HeaderMap, body: Bytes) -> EvidenceDocument {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let media_type = header(CONTENT_TYPE.as_str()).unwrap_or_default();
    let name = header(FILE_NAME_HEADER)
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| "evidence.pdf".to_string());

    EvidenceDocument::new(name, media_type, body.to_vec())
}
