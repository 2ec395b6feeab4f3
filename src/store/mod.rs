pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::order::{Order, OrderStatus};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("order {0} not found")]
    NotFound(Uuid),

    #[error("order {0} already exists")]
    Duplicate(Uuid),

    #[error("conditional update conflict on order {0}")]
    Conflict(Uuid),

    #[error("backend error: {0}")]
    Backend(String),
}

/// Snapshot a conditional update must still match at commit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedOrder {
    pub status: OrderStatus,
    pub courier_id: Option<Uuid>,
}

/// Fields a successful transition writes.
#[derive(Debug, Clone, Copy)]
pub struct OrderUpdate {
    pub status: OrderStatus,
    /// `Some` only for the accept transition; `None` leaves the assignment
    /// untouched. Assignments are never cleared.
    pub courier_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourierSelector {
    Unassigned,
    Assigned(Uuid),
}

/// Declarative filter so non-memory backends can translate it into their
/// own query language instead of scanning.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub customer_id: Option<Uuid>,
    pub courier: Option<CourierSelector>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        if let Some(status) = self.status {
            if order.status != status {
                return false;
            }
        }

        if let Some(customer_id) = self.customer_id {
            if order.customer_id != customer_id {
                return false;
            }
        }

        match self.courier {
            Some(CourierSelector::Unassigned) => order.courier_id.is_none(),
            Some(CourierSelector::Assigned(id)) => order.courier_id == Some(id),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum OrderSort {
    CreatedAsc,
    CreatedDesc,
    UpdatedDesc,
}

impl OrderSort {
    pub fn apply(&self, orders: &mut [Order]) {
        match self {
            OrderSort::CreatedAsc => orders.sort_by_key(|order| order.created_at),
            OrderSort::CreatedDesc => {
                orders.sort_by_key(|order| std::cmp::Reverse(order.created_at))
            }
            OrderSort::UpdatedDesc => {
                orders.sort_by_key(|order| std::cmp::Reverse(order.updated_at))
            }
        }
    }
}

/// Order persistence boundary. Implementations shared across processes must
/// back `conditional_update` with a database conditional write; the contract
/// rules out read-then-write pairs.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Order, StoreError>;

    async fn find(&self, filter: OrderFilter, sort: OrderSort) -> Result<Vec<Order>, StoreError>;

    async fn insert(&self, order: Order) -> Result<(), StoreError>;

    /// Applies `update` only if the record still matches `expected`, and
    /// refreshes `updated_at` at the commit instant. Returns the updated
    /// record, or `Conflict` when the snapshot no longer holds.
    async fn conditional_update(
        &self,
        id: Uuid,
        expected: ExpectedOrder,
        update: OrderUpdate,
    ) -> Result<Order, StoreError>;
}
