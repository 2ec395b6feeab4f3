use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use axum::routing::post;
use axum::Json;
use axum::Router;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::actor::Role;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/auth/register", post(register))
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub role: Role,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub token: String,
    pub id: Uuid,
    pub name: String,
    pub role: Role,
    pub verified: bool,
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }

    let (token, actor) = state.identity.register(name, payload.role);
    info!(actor_id = %actor.id, role = ?actor.role, "actor registered");

    Ok(Json(RegisterResponse {
        token,
        id: actor.id,
        name: name.to_string(),
        role: actor.role,
        verified: actor.verified,
    }))
}

/// Resolves the bearer token and stashes the actor in request extensions, so
/// handlers behind this layer can take `Extension<Actor>` directly.
pub async fn require_actor(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let actor = bearer_token(request.headers())
        .and_then(|token| state.identity.resolve(token))
        .ok_or(AppError::Unauthenticated)?;

    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
