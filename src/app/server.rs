use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use crate::adapters::storage::LocalStorage;
use crate::app::pipelines::plan_pipeline::PlanPipeline;
use crate::core::etl::PlanEngine;
use crate::core::{ConfigProvider, MonthPlan};
use crate::utils::error::PlannerError;

const USAGE_HINT: &str =
    "Server running. Use POST /api/generate_monthly_plan with {\"month\":4}.";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn internal(err: PlannerError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct PlanRequest {
    #[serde(default)]
    pub month: Option<serde_json::Number>,
}

impl PlanRequest {
    /// Requested month, 1 when absent. Integral floats such as `4.0` count as
    /// integers.
    pub fn month(&self) -> Result<i64, AppError> {
        let Some(number) = &self.month else {
            return Ok(1);
        };
        if let Some(month) = number.as_i64() {
            return Ok(month);
        }
        match number.as_f64() {
            Some(value) if value.fract() == 0.0 && value.abs() < i64::MAX as f64 => Ok(value as i64),
            _ => Err(AppError::bad_request(format!(
                "Invalid month '{number}': expected a whole number"
            ))),
        }
    }
}

/// Shared, read-only handler state. Inventory is re-read on every request.
pub struct PlanState<C> {
    config: Arc<C>,
    storage: LocalStorage,
    monitor: bool,
}

impl<C> Clone for PlanState<C> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            storage: self.storage.clone(),
            monitor: self.monitor,
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router<C>(config: C, storage: LocalStorage, monitor: bool) -> Router
where
    C: ConfigProvider + Clone + 'static,
{
    let state = PlanState {
        config: Arc::new(config),
        storage,
        monitor,
    };

    Router::new()
        .route("/", get(index))
        .route("/api/generate_monthly_plan", post(generate_monthly_plan::<C>))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve<C>(config: C, bind: &str, port: u16, monitor: bool) -> Result<()>
where
    C: ConfigProvider + Clone + 'static,
{
    let app = build_router(config, LocalStorage::default(), monitor);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("plan-server listening on http://{addr}");
    if monitor {
        tracing::info!("🔍 System monitoring enabled");
    }
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("plan-server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for Ctrl+C: {e}");
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index() -> &'static str {
    USAGE_HINT
}

async fn generate_monthly_plan<C>(
    State(state): State<PlanState<C>>,
    body: Bytes,
) -> Result<Json<MonthPlan>, AppError>
where
    C: ConfigProvider + Clone + 'static,
{
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        PlanRequest::default()
    } else {
        serde_json::from_slice::<PlanRequest>(&body)
            .map_err(|e| AppError::bad_request(format!("Invalid request body: {e}")))?
    };
    let month = request.month()?;
    tracing::info!("Generating plan for month {month}");

    let pipeline = PlanPipeline::new(state.storage.clone(), (*state.config).clone(), month);
    let engine = PlanEngine::new_with_monitoring(pipeline, state.monitor);

    match engine.plan().await {
        Ok(plan) => Ok(Json(plan)),
        Err(e) => {
            tracing::error!("Plan for month {month} failed: {e}");
            Err(AppError::internal(e))
        }
    }
}
