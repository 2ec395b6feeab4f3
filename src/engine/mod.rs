pub mod lifecycle;
pub mod transition;
pub mod views;
