use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    Customer,
    Admin,
    Courier,
}

/// Authenticated identity attempting an operation. Resolved by the caller
/// and passed explicitly into every engine call; the engine never reads
/// ambient authentication state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
    pub verified: bool,
}
