use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use forecast::ResupplyReport;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use shared::{
    domain::{DispenseRecord, LockStatus, MedicationId, StockRecord},
    error::{ApiError, CabinetError, ErrorCode},
    protocol::{
        AdjustRequest, CabinetEvent, ReviewSummary, SessionSnapshot, SubjectSummary,
    },
};
use storage::LedgerError;
use tokio::sync::broadcast::{self, error::RecvError};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{debug, info, warn};

mod app_state;
mod config;

use app_state::AppState;
use config::load_settings;

const MAX_REQUEST_BYTES: usize = 16 * 1024;
const DEFAULT_AUDIT_LIMIT: usize = 20;

type HttpError = (StatusCode, Json<ApiError>);

#[derive(Debug, Serialize, Deserialize)]
struct LockStatusResponse {
    lock_status: LockStatus,
}

#[derive(Debug, Deserialize)]
struct AuditQuery {
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ForecastQuery {
    as_of: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct RestockRequest {
    medication_id: MedicationId,
    units: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct RestockResponse {
    medication_id: MedicationId,
    current_units: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings().context("failed to load cabinet settings")?;
    let state = AppState::simulated(&settings);
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.bind_addr))?;
    info!(
        %addr,
        unlock_seconds = settings.unlock_duration_seconds,
        horizon_days = settings.resupply_horizon_days,
        "cabinet controller listening"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/session", get(session_snapshot))
        .route("/session/capture", post(session_capture))
        .route("/session/identify", post(session_identify))
        .route("/session/adjust", post(session_adjust))
        .route("/session/review", post(session_review))
        .route("/session/back", post(session_back))
        .route("/session/confirm", post(session_confirm))
        .route("/session/cancel", post(session_cancel))
        .route("/session/close", post(session_close))
        .route("/inventory", get(inventory))
        .route("/inventory/forecast", get(inventory_forecast))
        .route("/inventory/restock", post(inventory_restock))
        .route("/audit", get(audit))
        .route("/lock/refresh", post(lock_refresh))
        .route("/lock/clear-fault", post(lock_clear_fault))
        .route("/events", get(ws_handler))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BYTES))
        .with_state(state)
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::DeviceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::NoMatch => StatusCode::UNAUTHORIZED,
        ErrorCode::InvalidPhase | ErrorCode::AlreadyProcessing => StatusCode::CONFLICT,
        ErrorCode::EmptySelection => StatusCode::BAD_REQUEST,
        ErrorCode::InsufficientStock => StatusCode::CONFLICT,
        ErrorCode::EntitlementExceeded => StatusCode::FORBIDDEN,
        ErrorCode::ActuatorError => StatusCode::BAD_GATEWAY,
        ErrorCode::LockFault => StatusCode::LOCKED,
        ErrorCode::UnknownMedication => StatusCode::NOT_FOUND,
    }
}

fn http_error(err: CabinetError) -> HttpError {
    let api = ApiError::from(&err);
    if !err.is_recoverable() {
        warn!(code = ?api.code, %err, "request failed");
    }
    (status_for(api.code), Json(api))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn session_snapshot(State(state): State<Arc<AppState>>) -> Json<SessionSnapshot> {
    Json(state.controller.snapshot().await)
}

async fn session_capture(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SessionSnapshot>, HttpError> {
    state.controller.begin_capture().await.map_err(http_error)?;
    Ok(Json(state.controller.snapshot().await))
}

async fn session_identify(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SubjectSummary>, HttpError> {
    let subject = state.controller.identify().await.map_err(http_error)?;
    Ok(Json(subject))
}

async fn session_adjust(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AdjustRequest>,
) -> Result<Json<SessionSnapshot>, HttpError> {
    let snapshot = state
        .controller
        .adjust(&req.medication_id, req.delta)
        .await
        .map_err(http_error)?;
    Ok(Json(snapshot))
}

async fn session_review(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReviewSummary>, HttpError> {
    let review = state.controller.review().await.map_err(http_error)?;
    Ok(Json(review))
}

async fn session_back(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SessionSnapshot>, HttpError> {
    let snapshot = state.controller.back().await.map_err(http_error)?;
    Ok(Json(snapshot))
}

async fn session_confirm(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DispenseRecord>, HttpError> {
    let record = state.controller.confirm().await.map_err(http_error)?;
    Ok(Json(record))
}

async fn session_cancel(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SessionSnapshot>, HttpError> {
    state.controller.cancel().await.map_err(http_error)?;
    Ok(Json(state.controller.snapshot().await))
}

async fn session_close(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LockStatusResponse>, HttpError> {
    let lock_status = state.controller.close().await.map_err(http_error)?;
    Ok(Json(LockStatusResponse { lock_status }))
}

async fn inventory(State(state): State<Arc<AppState>>) -> Json<Vec<StockRecord>> {
    Json(state.controller.inventory().await)
}

async fn inventory_forecast(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ForecastQuery>,
) -> Json<ResupplyReport> {
    let as_of = q.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let records = state.controller.inventory().await;
    Json(forecast::forecast(&records, &state.forecast, as_of))
}

async fn inventory_restock(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RestockRequest>,
) -> Result<Json<RestockResponse>, HttpError> {
    let current_units = state
        .controller
        .restock(&req.medication_id, req.units)
        .await
        .map_err(|err| {
            let mut api = ApiError::new(ErrorCode::UnknownMedication, err.to_string());
            api.medication_id = match err {
                LedgerError::UnknownMedication(id)
                | LedgerError::InsufficientStock {
                    medication_id: id, ..
                } => Some(id),
            };
            (status_for(api.code), Json(api))
        })?;
    Ok(Json(RestockResponse {
        medication_id: req.medication_id,
        current_units,
    }))
}

async fn audit(
    State(state): State<Arc<AppState>>,
    Query(q): Query<AuditQuery>,
) -> Json<Vec<DispenseRecord>> {
    let limit = q.limit.unwrap_or(DEFAULT_AUDIT_LIMIT);
    Json(state.controller.recent_dispenses(limit).await)
}

async fn lock_refresh(State(state): State<Arc<AppState>>) -> Json<LockStatusResponse> {
    Json(LockStatusResponse {
        lock_status: state.controller.refresh_lock_status().await,
    })
}

async fn lock_clear_fault(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LockStatusResponse>, HttpError> {
    let lock_status = state.controller.clear_lock_fault().await.map_err(http_error)?;
    Ok(Json(LockStatusResponse { lock_status }))
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| ws_connection(state, socket))
}

/// Next event for one subscriber, already encoded as a JSON text frame. A
/// subscriber that fell behind skips to the oldest event still buffered.
/// `None` once the controller is gone.
async fn next_event_frame(events_rx: &mut broadcast::Receiver<CabinetEvent>) -> Option<String> {
    loop {
        match events_rx.recv().await {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(text) => return Some(text),
                Err(err) => warn!(%err, "events: failed to encode event"),
            },
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "events: subscriber fell behind, events dropped");
            }
            Err(RecvError::Closed) => return None,
        }
    }
}

/// Streams controller events to one subscriber until either side hangs up.
async fn ws_connection(state: Arc<AppState>, socket: WebSocket) {
    let (mut sender, mut receiver) = socket.split();
    let mut events_rx = state.controller.subscribe_events();

    loop {
        tokio::select! {
            frame = next_event_frame(&mut events_rx) => {
                let Some(text) = frame else { break };
                if sender.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }
    debug!("events: subscriber disconnected");
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
