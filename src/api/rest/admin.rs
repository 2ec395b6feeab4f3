use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::Extension;
use axum::Json;
use axum::Router;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::api::rest::{record_transition, require_role};
use crate::error::AppError;
use crate::identity::CourierProfile;
use crate::models::actor::{Actor, Role};
use crate::models::order::Order;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/orders", get(review_queue))
        .route("/admin/orders/:id", put(decide_order))
        .route("/admin/couriers", get(list_unverified_couriers))
        .route("/admin/couriers/:id/verify", put(verify_courier))
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Cancel,
}

#[derive(Deserialize)]
pub struct DecisionRequest {
    pub decision: Decision,
}

async fn review_queue(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<Order>>, AppError> {
    require_role(&actor, Role::Admin)?;
    let orders = state.engine.pending_queue().await?;
    Ok(Json(orders))
}

async fn decide_order(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DecisionRequest>,
) -> Result<Json<Order>, AppError> {
    let started = Instant::now();
    let (operation, result) = match payload.decision {
        Decision::Approve => ("approve", state.engine.approve(&actor, id).await),
        Decision::Cancel => ("cancel", state.engine.cancel(&actor, id).await),
    };

    record_transition(&state, operation, &result, started);
    if result.is_ok() && payload.decision == Decision::Cancel {
        state.metrics.orders_open.dec();
    }

    result.map(Json)
}

async fn list_unverified_couriers(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<CourierProfile>>, AppError> {
    require_role(&actor, Role::Admin)?;
    Ok(Json(state.identity.unverified_couriers()))
}

async fn verify_courier(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<CourierProfile>, AppError> {
    require_role(&actor, Role::Admin)?;

    let profile = state
        .identity
        .verify_courier(id)
        .ok_or_else(|| AppError::NotFound(format!("courier {id}")))?;

    info!(courier_id = %id, admin_id = %actor.id, "courier verified");
    Ok(Json(profile))
}
