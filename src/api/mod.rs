use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::core::{
    LenientNumber, Plan, Projection, ProjectionMetrics, RawPlan, derive_metrics, project,
};

/// Inflation assumed for derived metrics when the caller leaves it out.
pub const DEFAULT_INFLATION_RATE: f64 = 4.5;
pub const MAX_TIME_HORIZON_YEARS: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    #[error("timeHorizon is required")]
    MissingHorizon,

    #[error("timeHorizon must be > 0")]
    NonPositiveHorizon,

    #[error("timeHorizon must be <= {} years", MAX_TIME_HORIZON_YEARS)]
    HorizonTooLong,

    #[error("targetAmount must be > 0 when supplied")]
    NonPositiveTarget,

    #[error("{0} must be >= 0")]
    Negative(&'static str),

    #[error("taxRate must be between 0 and 100")]
    TaxRateOutOfRange,

    #[error("invalid plan payload: {0}")]
    InvalidPayload(String),
}

impl IntoResponse for PlanError {
    fn into_response(self) -> Response {
        error_response(StatusCode::BAD_REQUEST, &self.to_string())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub plan: Plan,
    pub projection: Projection,
    pub metrics: ProjectionMetrics,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Coerces a submitted plan and rejects the business inputs the engine does
/// not check itself.
pub fn build_plan(mut raw: RawPlan) -> Result<Plan, PlanError> {
    if raw.time_horizon.is_none() {
        return Err(PlanError::MissingHorizon);
    }
    let target_supplied = raw.target_amount.is_some();
    if raw.inflation_rate.is_none() {
        raw.inflation_rate = Some(LenientNumber::Number(DEFAULT_INFLATION_RATE));
    }

    let plan = raw.to_plan();

    if plan.time_horizon <= 0.0 {
        return Err(PlanError::NonPositiveHorizon);
    }
    if plan.time_horizon > MAX_TIME_HORIZON_YEARS {
        return Err(PlanError::HorizonTooLong);
    }
    if target_supplied && plan.target_amount <= 0.0 {
        return Err(PlanError::NonPositiveTarget);
    }

    for (name, value) in [
        ("initialInvestment", plan.initial_investment),
        ("periodicInvestment", plan.periodic_investment),
        ("annualReturn", plan.annual_return),
        ("inflationRate", plan.inflation_rate),
    ] {
        if value < 0.0 {
            return Err(PlanError::Negative(name));
        }
    }

    if !(0.0..=100.0).contains(&plan.tax_rate) {
        return Err(PlanError::TaxRateOutOfRange);
    }

    Ok(plan)
}

pub fn run_plan(plan: Plan) -> ProjectResponse {
    let projection = project(&plan);
    let metrics = derive_metrics(&plan, &projection);
    ProjectResponse {
        plan,
        projection,
        metrics,
    }
}

pub fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .fallback(not_found_handler)
}

pub async fn run_http_server(addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "projection API listening");

    axum::serve(listener, router()).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(query: Result<Query<RawPlan>, QueryRejection>) -> Response {
    match query {
        Ok(Query(raw)) => project_handler_impl(raw),
        Err(rejection) => PlanError::InvalidPayload(rejection.body_text()).into_response(),
    }
}

async fn project_post_handler(body: Result<Json<RawPlan>, JsonRejection>) -> Response {
    match body {
        Ok(Json(raw)) => project_handler_impl(raw),
        Err(rejection) => PlanError::InvalidPayload(rejection.body_text()).into_response(),
    }
}

fn project_handler_impl(raw: RawPlan) -> Response {
    debug!(?raw, "projection requested");
    let plan = match build_plan(raw) {
        Ok(plan) => plan,
        Err(err) => {
            warn!(error = %err, "rejected plan");
            return err.into_response();
        }
    };

    let response = run_plan(plan);
    info!(
        periods = response.projection.periods,
        target_met = response.projection.target_met(),
        "projected plan"
    );
    json_response(StatusCode::OK, response)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn plan_from_json(json: &str) -> Result<Plan, PlanError> {
    let raw = serde_json::from_str::<RawPlan>(json)
        .map_err(|e| PlanError::InvalidPayload(e.to_string()))?;
    build_plan(raw)
}
