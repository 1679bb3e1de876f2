//! Common types module for the delight order backend.
//!
//! This module defines the core data types and structures shared across
//! the service crates. It provides a centralized location for domain
//! entities, API shapes, and configuration validation so that all
//! components agree on the same representations.

/// Delivery agent types for order assignment and tracking.
pub mod agent;
/// API types for HTTP endpoints and request/response structures.
pub mod api;
/// Catalog types: products and their list prices.
pub mod catalog;
/// Customer types referenced by orders and notifications.
pub mod customer;
/// Order types: orders, line items, statuses, history, and alerts.
pub mod order;
/// Registry trait for self-registering implementations.
pub mod registry;
/// Storage namespace keys for persistent collections.
pub mod storage;
/// Small shared helpers.
pub mod utils;
/// Configuration validation types for type-safe TOML configs.
pub mod validation;

// Re-export all types for convenient access
pub use agent::*;
pub use api::*;
pub use catalog::*;
pub use customer::*;
pub use order::*;
pub use registry::*;
pub use storage::*;
pub use utils::truncate_id;
pub use validation::*;
