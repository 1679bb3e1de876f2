//! Storage-backed catalog implementation.
//!
//! Reads products from the shared storage service's `products` namespace.
//! This is the only implementation today; a remote catalog service would
//! slot in behind the same trait.

use crate::{CatalogError, CatalogFactory, CatalogInterface, CatalogRegistry};
use async_trait::async_trait;
use delight_storage::{StorageError, StorageService};
use delight_types::{ConfigSchema, ImplementationRegistry, Product, Schema, StorageKey, ValidationError};
use std::sync::Arc;

/// Catalog backed by the shared storage service.
pub struct StoreCatalog {
	storage: Arc<StorageService>,
}

impl StoreCatalog {
	/// Creates a new storage-backed catalog.
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}
}

#[async_trait]
impl CatalogInterface for StoreCatalog {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(StoreCatalogSchema)
	}

	async fn product(&self, product_id: &str) -> Result<Product, CatalogError> {
		match self
			.storage
			.retrieve::<Product>(StorageKey::Products.as_str(), product_id)
			.await
		{
			Ok(product) => Ok(product),
			Err(StorageError::NotFound) => {
				Err(CatalogError::ProductNotFound(product_id.to_string()))
			},
			Err(e) => Err(CatalogError::Backend(e.to_string())),
		}
	}

	async fn list(&self) -> Result<Vec<Product>, CatalogError> {
		self.storage
			.retrieve_all::<Product>(StorageKey::Products.as_str())
			.await
			.map_err(|e| CatalogError::Backend(e.to_string()))
	}
}

/// Configuration schema for StoreCatalog.
pub struct StoreCatalogSchema;

impl ConfigSchema for StoreCatalogSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		// The storage-backed catalog needs no configuration of its own
		let schema = Schema::new(vec![], vec![]);
		schema.validate(config)
	}
}

/// Registry for the storage-backed catalog implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "store";
	type Factory = CatalogFactory;

	fn factory() -> Self::Factory {
		create_catalog
	}
}

impl CatalogRegistry for Registry {}

/// Factory function to create a storage-backed catalog.
pub fn create_catalog(
	_config: &toml::Value,
	storage: Arc<StorageService>,
) -> Result<Box<dyn CatalogInterface>, CatalogError> {
	Ok(Box::new(StoreCatalog::new(storage)))
}

#[cfg(test)]
mod tests {
	use super::*;
	use delight_storage::implementations::memory::MemoryStorage;
	use rust_decimal::Decimal;

	fn product(id: &str, name: &str, price: i64) -> Product {
		Product {
			id: id.to_string(),
			name: name.to_string(),
			flavor: "Chocolate".to_string(),
			size: "8 servings".to_string(),
			price: Decimal::from(price),
		}
	}

	#[tokio::test]
	async fn test_lookup_and_missing_product() {
		let storage = Arc::new(StorageService::new(Box::new(MemoryStorage::new())));
		storage
			.store(StorageKey::Products.as_str(), "p1", &product("p1", "Truffle", 499))
			.await
			.unwrap();

		let catalog = StoreCatalog::new(storage);
		let found = catalog.product("p1").await.unwrap();
		assert_eq!(found.price, Decimal::from(499));

		assert!(matches!(
			catalog.product("missing").await,
			Err(CatalogError::ProductNotFound(_))
		));
	}
}
