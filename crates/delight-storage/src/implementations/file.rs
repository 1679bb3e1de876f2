//! File-based storage backend.
//!
//! This module provides a durable implementation of the StorageInterface
//! trait that keeps one JSON file per record under a base directory, with
//! one subdirectory per namespace. Writes go through a temp file plus
//! rename so readers never observe a partially written document, and the
//! base directory is locked exclusively at startup so two service
//! instances cannot share it.

use crate::{StorageError, StorageFactory, StorageInterface, StorageRegistry};
use async_trait::async_trait;
use delight_types::{ConfigSchema, Field, FieldType, ImplementationRegistry, Schema, ValidationError};
use fs2::FileExt;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File-based storage implementation.
pub struct FileStorage {
	/// Base directory holding one subdirectory per namespace.
	base_dir: PathBuf,
	/// Exclusive lock on the base directory, held for the life of the backend.
	_lock: std::fs::File,
}

impl FileStorage {
	/// Creates a new FileStorage rooted at the given directory.
	///
	/// Creates the directory if needed and takes an exclusive advisory
	/// lock on `.lock` inside it.
	pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
		let base_dir = base_dir.into();
		std::fs::create_dir_all(&base_dir)
			.map_err(|e| StorageError::Backend(format!("Failed to create {:?}: {}", base_dir, e)))?;

		let lock_path = base_dir.join(".lock");
		let lock = std::fs::File::create(&lock_path)
			.map_err(|e| StorageError::Backend(format!("Failed to create lock file: {}", e)))?;
		lock.try_lock_exclusive().map_err(|_| {
			StorageError::Backend(format!(
				"Storage directory {:?} is locked by another process",
				base_dir
			))
		})?;

		Ok(Self {
			base_dir,
			_lock: lock,
		})
	}

	/// Resolves a `namespace:id` key to its file path.
	///
	/// Ids may only contain characters that are safe as file names;
	/// anything else is rejected rather than escaped.
	fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
		let (namespace, id) = key
			.split_once(':')
			.ok_or_else(|| StorageError::Backend(format!("Malformed key '{}'", key)))?;
		if namespace.is_empty() || id.is_empty() {
			return Err(StorageError::Backend(format!("Malformed key '{}'", key)));
		}
		for part in [namespace, id] {
			if !part
				.chars()
				.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
				|| part.starts_with('.')
			{
				return Err(StorageError::Backend(format!(
					"Key '{}' contains characters unsafe for file storage",
					key
				)));
			}
		}
		Ok(self.base_dir.join(namespace).join(format!("{}.json", id)))
	}
}

#[async_trait]
impl StorageInterface for FileStorage {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		let path = self.path_for(key)?;
		match fs::read(&path).await {
			Ok(bytes) => Ok(bytes),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		let path = self.path_for(key)?;
		let dir = path
			.parent()
			.ok_or_else(|| StorageError::Backend("Key has no namespace directory".into()))?;
		fs::create_dir_all(dir)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		// Write-then-rename keeps the visible file whole at all times.
		let tmp = path.with_extension("json.tmp");
		fs::write(&tmp, &value)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;
		fs::rename(&tmp, &path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;
		Ok(())
	}

	async fn delete(&self, key: &str) -> Result<(), StorageError> {
		let path = self.path_for(key)?;
		match fs::remove_file(&path).await {
			Ok(()) => Ok(()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	async fn exists(&self, key: &str) -> Result<bool, StorageError> {
		let path = self.path_for(key)?;
		Ok(fs::try_exists(&path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?)
	}

	async fn keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
		let (namespace, id_prefix) = match prefix.split_once(':') {
			Some((ns, rest)) => (ns, rest),
			None => (prefix, ""),
		};

		let dir = self.base_dir.join(namespace);
		let mut entries = match fs::read_dir(&dir).await {
			Ok(entries) => entries,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
			Err(e) => return Err(StorageError::Backend(e.to_string())),
		};

		let mut keys = Vec::new();
		while let Some(entry) = entries
			.next_entry()
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?
		{
			let name = entry.file_name();
			let Some(name) = name.to_str() else { continue };
			let Some(id) = name.strip_suffix(".json") else {
				continue;
			};
			if id.starts_with(id_prefix) {
				keys.push(format!("{}:{}", namespace, id));
			}
		}
		Ok(keys)
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(FileStorageSchema)
	}
}

/// Configuration schema for FileStorage.
pub struct FileStorageSchema;

impl ConfigSchema for FileStorageSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(vec![Field::new("path", FieldType::String)], vec![]);
		schema.validate(config)
	}
}

/// Registry for the file storage implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "file";
	type Factory = StorageFactory;

	fn factory() -> Self::Factory {
		create_storage
	}
}

impl StorageRegistry for Registry {}

/// Factory function to create a file storage backend from configuration.
///
/// Configuration parameters:
/// - `path`: base directory for the storage tree (required)
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> {
	let path = config
		.get("path")
		.and_then(|v| v.as_str())
		.ok_or_else(|| StorageError::Configuration("'path' is required".into()))?;
	Ok(Box::new(FileStorage::new(Path::new(path))?))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_roundtrip_and_delete() {
		let dir = tempfile::tempdir().unwrap();
		let storage = FileStorage::new(dir.path()).unwrap();

		let key = "orders:a1b2";
		let value = b"{\"id\":\"a1b2\"}".to_vec();
		storage.set_bytes(key, value.clone()).await.unwrap();
		assert_eq!(storage.get_bytes(key).await.unwrap(), value);
		assert!(storage.exists(key).await.unwrap());

		storage.delete(key).await.unwrap();
		assert!(matches!(
			storage.get_bytes(key).await,
			Err(StorageError::NotFound)
		));
	}

	#[tokio::test]
	async fn test_keys_lists_namespace() {
		let dir = tempfile::tempdir().unwrap();
		let storage = FileStorage::new(dir.path()).unwrap();

		storage.set_bytes("agents:1", b"a".to_vec()).await.unwrap();
		storage.set_bytes("agents:2", b"b".to_vec()).await.unwrap();
		storage.set_bytes("orders:9", b"c".to_vec()).await.unwrap();

		let mut keys = storage.keys("agents:").await.unwrap();
		keys.sort();
		assert_eq!(keys, vec!["agents:1", "agents:2"]);
	}

	#[tokio::test]
	async fn test_rejects_unsafe_keys() {
		let dir = tempfile::tempdir().unwrap();
		let storage = FileStorage::new(dir.path()).unwrap();

		assert!(storage.get_bytes("orders:../escape").await.is_err());
		assert!(storage.get_bytes("no-namespace").await.is_err());
	}

	#[tokio::test]
	async fn test_survives_reopen() {
		let dir = tempfile::tempdir().unwrap();
		{
			let storage = FileStorage::new(dir.path()).unwrap();
			storage
				.set_bytes("products:p1", b"{\"price\":\"499\"}".to_vec())
				.await
				.unwrap();
		}
		let storage = FileStorage::new(dir.path()).unwrap();
		assert_eq!(
			storage.get_bytes("products:p1").await.unwrap(),
			b"{\"price\":\"499\"}".to_vec()
		);
	}
}
