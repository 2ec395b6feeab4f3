use uuid::Uuid;

use crate::engine::lifecycle::LifecycleEngine;
use crate::error::AppError;
use crate::models::order::{Order, OrderStatus};
use crate::store::{CourierSelector, OrderFilter, OrderSort};

/// Read-side queries. Each view is a filter plus a fixed sort; none of them
/// mutate, so they go straight to the store without touching the transition
/// table.
impl LifecycleEngine {
    /// Review queue for admins, oldest submission first.
    pub async fn pending_queue(&self) -> Result<Vec<Order>, AppError> {
        self.find(
            OrderFilter {
                status: Some(OrderStatus::Pending),
                ..OrderFilter::default()
            },
            OrderSort::CreatedAsc,
        )
        .await
    }

    /// Claimable orders for couriers, newest approval first.
    pub async fn marketplace(&self) -> Result<Vec<Order>, AppError> {
        self.find(
            OrderFilter {
                status: Some(OrderStatus::Approved),
                courier: Some(CourierSelector::Unassigned),
                ..OrderFilter::default()
            },
            OrderSort::CreatedDesc,
        )
        .await
    }

    /// Orders a courier has claimed, most recently touched first.
    pub async fn courier_orders(&self, courier_id: Uuid) -> Result<Vec<Order>, AppError> {
        self.find(
            OrderFilter {
                courier: Some(CourierSelector::Assigned(courier_id)),
                ..OrderFilter::default()
            },
            OrderSort::UpdatedDesc,
        )
        .await
    }

    /// Everything a customer has submitted, newest first.
    pub async fn customer_orders(&self, customer_id: Uuid) -> Result<Vec<Order>, AppError> {
        self.find(
            OrderFilter {
                customer_id: Some(customer_id),
                ..OrderFilter::default()
            },
            OrderSort::CreatedDesc,
        )
        .await
    }

    async fn find(&self, filter: OrderFilter, sort: OrderSort) -> Result<Vec<Order>, AppError> {
        self.store
            .find(filter, sort)
            .await
            .map_err(|err| AppError::Store(err.to_string()))
    }
}
