//! REST API controllers.

pub mod health_controller;
pub mod metrics_controller;
pub mod players_controller;

pub use health_controller::*;
