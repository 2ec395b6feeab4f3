use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::routing::post;
use axum::Extension;
use axum::Json;
use axum::Router;
use serde::Deserialize;

use crate::api::rest::record_transition;
use crate::engine::lifecycle::OrderDraft;
use crate::error::AppError;
use crate::models::actor::Actor;
use crate::models::order::{Location, Order};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/orders", post(create_order).get(list_own_orders))
}

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub item_description: String,
    pub pickup: Location,
    pub dropoff: Location,
}

async fn create_order(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Json<Order>, AppError> {
    let started = Instant::now();
    let result = state
        .engine
        .create_order(
            &actor,
            OrderDraft {
                item_description: payload.item_description,
                pickup: payload.pickup,
                dropoff: payload.dropoff,
            },
        )
        .await;

    record_transition(&state, "create", &result, started);
    if result.is_ok() {
        state.metrics.orders_open.inc();
    }

    result.map(Json)
}

async fn list_own_orders(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<Order>>, AppError> {
    let orders = state.engine.customer_orders(actor.id).await?;
    Ok(Json(orders))
}
