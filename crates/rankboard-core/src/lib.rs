//! # Rankboard Core
//!
//! Core types, pagination rules, and error definitions for Rankboard.
//! This crate provides the foundational abstractions shared by the
//! repository, service, and REST layers.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod result;
pub mod telemetry;

pub use domain::*;
pub use error::*;
pub use pagination::*;
pub use result::*;
pub use telemetry::*;
