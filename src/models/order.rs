use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Free-form address plus optional coordinates. Coordinates are carried for
/// callers that have them but are never interpreted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    pub coords: Option<GeoPoint>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Approved,
    PickedUp,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    /// Set exactly once by the accept transition, never cleared.
    pub courier_id: Option<Uuid>,
    pub item_description: String,
    pub pickup: Location,
    pub dropoff: Location,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(
        customer_id: Uuid,
        item_description: String,
        pickup: Location,
        dropoff: Location,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            customer_id,
            courier_id: None,
            item_description,
            pickup,
            dropoff,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}
