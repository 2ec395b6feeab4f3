use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::Extension;
use axum::Json;
use axum::Router;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::rest::{record_transition, require_role};
use crate::error::AppError;
use crate::models::actor::{Actor, Role};
use crate::models::order::Order;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/courier/orders", get(board))
        .route("/courier/orders/:id", put(act_on_order))
}

#[derive(Serialize)]
pub struct CourierOrdersResponse {
    pub available: Vec<Order>,
    pub mine: Vec<Order>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub enum CourierAction {
    Accept,
    Deliver,
}

#[derive(Deserialize)]
pub struct ActionRequest {
    pub action: CourierAction,
}

/// Marketplace plus the courier's own claims in one response, so the client
/// renders both lists from a single fetch.
async fn board(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<CourierOrdersResponse>, AppError> {
    require_role(&actor, Role::Courier)?;

    let available = state.engine.marketplace().await?;
    let mine = state.engine.courier_orders(actor.id).await?;
    Ok(Json(CourierOrdersResponse { available, mine }))
}

async fn act_on_order(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ActionRequest>,
) -> Result<Json<Order>, AppError> {
    let started = Instant::now();
    let (operation, result) = match payload.action {
        CourierAction::Accept => ("accept", state.engine.accept(&actor, id).await),
        CourierAction::Deliver => ("deliver", state.engine.deliver(&actor, id).await),
    };

    record_transition(&state, operation, &result, started);
    if result.is_ok() && payload.action == CourierAction::Deliver {
        state.metrics.orders_open.dec();
    }

    result.map(Json)
}
