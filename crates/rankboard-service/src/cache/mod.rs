//! Caching infrastructure for the service layer.
//!
//! An in-process TTL store shared by every request task, plus a per-key
//! single-flight guard so identical misses hit the database once.

mod cache_interface;
pub mod cache_keys;
mod memory_cache;
mod single_flight;

pub use cache_interface::CacheStore;
pub use memory_cache::{MemoryCacheStore, DEFAULT_SWEEP_INTERVAL, DEFAULT_TTL};
pub use single_flight::{FlightGuard, SingleFlight};
