use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::transition::Transition;
use crate::error::AppError;
use crate::models::actor::{Actor, Role};
use crate::models::order::{Location, Order};
use crate::store::{OrderStore, StoreError};

pub struct OrderDraft {
    pub item_description: String,
    pub pickup: Location,
    pub dropoff: Location,
}

/// Owns the order state machine. Every mutation flows through a transition
/// from the table and commits with a conditional update, so two racing
/// callers can never both observe the same source state at commit time.
#[derive(Clone)]
pub struct LifecycleEngine {
    pub(crate) store: Arc<dyn OrderStore>,
}

impl LifecycleEngine {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }

    pub async fn create_order(&self, actor: &Actor, draft: OrderDraft) -> Result<Order, AppError> {
        if actor.role != Role::Customer {
            return Err(AppError::UnauthorizedRole {
                required: Role::Customer,
                actual: actor.role,
            });
        }

        let description = draft.item_description.trim();
        if description.is_empty() {
            return Err(AppError::Validation(
                "item description cannot be empty".to_string(),
            ));
        }
        if draft.pickup.address.trim().is_empty() {
            return Err(AppError::Validation(
                "pickup address cannot be empty".to_string(),
            ));
        }
        if draft.dropoff.address.trim().is_empty() {
            return Err(AppError::Validation(
                "dropoff address cannot be empty".to_string(),
            ));
        }

        let order = Order::new(
            actor.id,
            description.to_string(),
            draft.pickup,
            draft.dropoff,
        );
        self.store
            .insert(order.clone())
            .await
            .map_err(store_error)?;

        info!(order_id = %order.id, customer_id = %actor.id, "order created");
        Ok(order)
    }

    pub async fn approve(&self, actor: &Actor, order_id: Uuid) -> Result<Order, AppError> {
        self.apply(actor, order_id, Transition::Approve).await
    }

    pub async fn cancel(&self, actor: &Actor, order_id: Uuid) -> Result<Order, AppError> {
        self.apply(actor, order_id, Transition::Cancel).await
    }

    pub async fn accept(&self, actor: &Actor, order_id: Uuid) -> Result<Order, AppError> {
        self.apply(actor, order_id, Transition::Accept { courier_id: actor.id })
            .await
    }

    pub async fn deliver(&self, actor: &Actor, order_id: Uuid) -> Result<Order, AppError> {
        self.apply(actor, order_id, Transition::Deliver { courier_id: actor.id })
            .await
    }

    async fn apply(
        &self,
        actor: &Actor,
        order_id: Uuid,
        transition: Transition,
    ) -> Result<Order, AppError> {
        transition.authorize_actor(actor)?;

        let order = self.load(order_id).await?;
        transition.check_order(&order)?;

        match self
            .store
            .conditional_update(order_id, transition.expected(), transition.update())
            .await
        {
            Ok(updated) => {
                info!(
                    order_id = %order_id,
                    actor_id = %actor.id,
                    transition = transition.name(),
                    status = ?updated.status,
                    "order transition applied"
                );
                Ok(updated)
            }
            Err(StoreError::Conflict(_)) => {
                warn!(
                    order_id = %order_id,
                    actor_id = %actor.id,
                    transition = transition.name(),
                    "conditional update lost, classifying against current state"
                );
                let current = self.load(order_id).await?;
                Err(transition.classify_conflict(&current))
            }
            Err(StoreError::NotFound(id)) => Err(not_found(id)),
            Err(err) => Err(store_error(err)),
        }
    }

    async fn load(&self, order_id: Uuid) -> Result<Order, AppError> {
        match self.store.find_by_id(order_id).await {
            Ok(order) => Ok(order),
            Err(StoreError::NotFound(id)) => Err(not_found(id)),
            Err(err) => Err(store_error(err)),
        }
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("order {id}"))
}

fn store_error(err: StoreError) -> AppError {
    AppError::Store(err.to_string())
}
