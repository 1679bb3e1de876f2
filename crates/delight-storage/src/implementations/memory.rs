//! In-memory storage backend.
//!
//! This module provides a memory-based implementation of the
//! StorageInterface trait, useful for testing and development scenarios
//! where persistence across restarts is not required.

use crate::{StorageError, StorageFactory, StorageInterface, StorageRegistry};
use async_trait::async_trait;
use delight_types::{ConfigSchema, ImplementationRegistry, Schema, ValidationError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory storage implementation.
///
/// Stores data in a HashMap protected by a read-write lock, providing
/// fast access but no persistence across restarts. Each `set_bytes`
/// replaces the whole value under the lock, so readers never observe a
/// partially written document.
pub struct MemoryStorage {
	/// The in-memory store protected by a read-write lock.
	store: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
	/// Creates a new MemoryStorage instance.
	pub fn new() -> Self {
		Self {
			store: Arc::new(RwLock::new(HashMap::new())),
		}
	}
}

impl Default for MemoryStorage {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl StorageInterface for MemoryStorage {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		let store = self.store.read().await;
		store.get(key).cloned().ok_or(StorageError::NotFound)
	}

	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		let mut store = self.store.write().await;
		store.insert(key.to_string(), value);
		Ok(())
	}

	async fn delete(&self, key: &str) -> Result<(), StorageError> {
		let mut store = self.store.write().await;
		store.remove(key);
		Ok(())
	}

	async fn exists(&self, key: &str) -> Result<bool, StorageError> {
		let store = self.store.read().await;
		Ok(store.contains_key(key))
	}

	async fn keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
		let store = self.store.read().await;
		Ok(store
			.keys()
			.filter(|k| k.starts_with(prefix))
			.cloned()
			.collect())
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(MemoryStorageSchema)
	}
}

/// Configuration schema for MemoryStorage.
pub struct MemoryStorageSchema;

impl ConfigSchema for MemoryStorageSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		// Memory storage has no required configuration
		let schema = Schema::new(vec![], vec![]);
		schema.validate(config)
	}
}

/// Registry for the in-memory storage implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "memory";
	type Factory = StorageFactory;

	fn factory() -> Self::Factory {
		create_storage
	}
}

impl StorageRegistry for Registry {}

/// Factory function to create a memory storage backend from configuration.
///
/// Configuration parameters:
/// - None required for memory storage
pub fn create_storage(_config: &toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> {
	Ok(Box::new(MemoryStorage::new()))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_basic_operations() {
		let storage = MemoryStorage::new();

		let key = "orders:abc";
		let value = b"{\"id\":\"abc\"}".to_vec();
		storage.set_bytes(key, value.clone()).await.unwrap();

		let retrieved = storage.get_bytes(key).await.unwrap();
		assert_eq!(retrieved, value);

		assert!(storage.exists(key).await.unwrap());

		storage.delete(key).await.unwrap();
		assert!(!storage.exists(key).await.unwrap());

		let result = storage.get_bytes(key).await;
		assert!(matches!(result, Err(StorageError::NotFound)));
	}

	#[tokio::test]
	async fn test_overwrite_replaces_whole_value() {
		let storage = MemoryStorage::new();

		let key = "orders:xyz";
		let value1 = b"value1".to_vec();
		let value2 = b"value2".to_vec();

		storage.set_bytes(key, value1.clone()).await.unwrap();
		assert_eq!(storage.get_bytes(key).await.unwrap(), value1);

		storage.set_bytes(key, value2.clone()).await.unwrap();
		assert_eq!(storage.get_bytes(key).await.unwrap(), value2);
	}

	#[tokio::test]
	async fn test_keys_filters_by_prefix() {
		let storage = MemoryStorage::new();

		storage.set_bytes("agents:1", b"a".to_vec()).await.unwrap();
		storage.set_bytes("agents:2", b"b".to_vec()).await.unwrap();
		storage.set_bytes("orders:1", b"c".to_vec()).await.unwrap();

		let mut agent_keys = storage.keys("agents:").await.unwrap();
		agent_keys.sort();
		assert_eq!(agent_keys, vec!["agents:1", "agents:2"]);

		assert!(storage.keys("customers:").await.unwrap().is_empty());
	}
}
