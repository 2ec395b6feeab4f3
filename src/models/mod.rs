pub mod actor;
pub mod order;
