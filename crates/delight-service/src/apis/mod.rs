//! HTTP API handlers, grouped by resource.

pub mod agents;
pub mod catalog;
pub mod orders;
