pub mod admin;
pub mod auth;
pub mod courier;
pub mod orders;

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::error::AppError;
use crate::models::actor::{Actor, Role};
use crate::models::order::Order;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let authed = Router::new()
        .merge(orders::router())
        .merge(admin::router())
        .merge(courier::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_actor,
        ));

    Router::new()
        .merge(authed)
        .merge(auth::router())
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    actors: usize,
    open_orders: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        actors: state.identity.len(),
        open_orders: state.metrics.orders_open.get(),
    })
}

async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err).into_response(),
    }
}

pub(crate) fn require_role(actor: &Actor, required: Role) -> Result<(), AppError> {
    if actor.role != required {
        return Err(AppError::UnauthorizedRole {
            required,
            actual: actor.role,
        });
    }
    Ok(())
}

pub(crate) fn record_transition(
    state: &AppState,
    operation: &'static str,
    result: &Result<Order, AppError>,
    started: Instant,
) {
    let outcome = match result {
        Ok(_) => "success",
        Err(err) => err.kind(),
    };
    state
        .metrics
        .observe_transition(operation, outcome, started.elapsed().as_secs_f64());
}
