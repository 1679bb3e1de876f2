//! Catalog module for the delight order backend.
//!
//! This module provides read-only access to products and their current
//! list prices. The order core consults it in exactly one place: as the
//! price fallback when a line item carries no usable unit price.

use async_trait::async_trait;
use delight_storage::StorageService;
use delight_types::{ConfigSchema, ImplementationRegistry, Product};
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod store;
}

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
	/// Error that occurs when a product does not exist.
	#[error("Product not found: {0}")]
	ProductNotFound(String),
	/// Error from the underlying storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

impl From<CatalogError> for delight_types::ApiError {
	fn from(err: CatalogError) -> Self {
		use delight_types::ApiError;
		match err {
			CatalogError::ProductNotFound(id) => {
				ApiError::not_found(format!("Product not found: {}", id))
			},
			other => ApiError::internal(other.to_string()),
		}
	}
}

/// Trait defining the interface for catalog implementations.
#[async_trait]
pub trait CatalogInterface: Send + Sync {
	/// Returns the configuration schema for this catalog implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Looks up a product by id.
	async fn product(&self, product_id: &str) -> Result<Product, CatalogError>;

	/// Lists all products.
	async fn list(&self) -> Result<Vec<Product>, CatalogError>;
}

/// Type alias for catalog factory functions.
///
/// Catalog implementations read from the shared storage service, so the
/// factory receives it alongside the implementation's TOML section.
pub type CatalogFactory =
	fn(&toml::Value, Arc<StorageService>) -> Result<Box<dyn CatalogInterface>, CatalogError>;

/// Registry trait for catalog implementations.
pub trait CatalogRegistry: ImplementationRegistry<Factory = CatalogFactory> {}

/// Get all registered catalog implementations.
pub fn get_all_implementations() -> Vec<(&'static str, CatalogFactory)> {
	use implementations::store;

	vec![(store::Registry::NAME, store::Registry::factory())]
}

/// Service that provides read-only catalog lookups.
///
/// Wraps the configured catalog implementation and adds the price
/// convenience used by the total calculator.
pub struct CatalogService {
	/// The underlying catalog implementation.
	implementation: Box<dyn CatalogInterface>,
}

impl CatalogService {
	/// Creates a new CatalogService with the specified implementation.
	pub fn new(implementation: Box<dyn CatalogInterface>) -> Self {
		Self { implementation }
	}

	/// Looks up a product by id.
	pub async fn product(&self, product_id: &str) -> Result<Product, CatalogError> {
		self.implementation.product(product_id).await
	}

	/// Lists all products.
	pub async fn list(&self) -> Result<Vec<Product>, CatalogError> {
		self.implementation.list().await
	}

	/// Returns the current list price of a product.
	///
	/// This is the calculator's fallback path; callers treat any error
	/// as "price unavailable" and degrade the item to zero contribution.
	pub async fn price_of(&self, product_id: &str) -> Result<Decimal, CatalogError> {
		Ok(self.implementation.product(product_id).await?.price)
	}
}
