//! Storage-backed agent roster implementation.

use crate::{AgentError, AgentFactory, AgentInterface, AgentRegistry};
use async_trait::async_trait;
use delight_storage::{StorageError, StorageService};
use delight_types::{ConfigSchema, DeliveryAgent, ImplementationRegistry, Schema, StorageKey, ValidationError};
use std::sync::Arc;

/// Agent roster backed by the shared storage service.
pub struct StoreAgents {
	storage: Arc<StorageService>,
}

impl StoreAgents {
	/// Creates a new storage-backed agent roster.
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}
}

#[async_trait]
impl AgentInterface for StoreAgents {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(StoreAgentsSchema)
	}

	async fn first_available(&self) -> Result<Option<DeliveryAgent>, AgentError> {
		// Stable id order makes "first" deterministic across backends.
		let mut agents = self.list().await?;
		agents.sort_by(|a, b| a.id.cmp(&b.id));
		Ok(agents.into_iter().find(|a| a.available))
	}

	async fn get(&self, agent_id: &str) -> Result<DeliveryAgent, AgentError> {
		match self
			.storage
			.retrieve::<DeliveryAgent>(StorageKey::Agents.as_str(), agent_id)
			.await
		{
			Ok(agent) => Ok(agent),
			Err(StorageError::NotFound) => Err(AgentError::AgentNotFound(agent_id.to_string())),
			Err(e) => Err(AgentError::Backend(e.to_string())),
		}
	}

	async fn list(&self) -> Result<Vec<DeliveryAgent>, AgentError> {
		self.storage
			.retrieve_all::<DeliveryAgent>(StorageKey::Agents.as_str())
			.await
			.map_err(|e| AgentError::Backend(e.to_string()))
	}

	async fn put(&self, agent: &DeliveryAgent) -> Result<(), AgentError> {
		self.storage
			.store(StorageKey::Agents.as_str(), &agent.id, agent)
			.await
			.map_err(|e| AgentError::Backend(e.to_string()))
	}
}

/// Configuration schema for StoreAgents.
pub struct StoreAgentsSchema;

impl ConfigSchema for StoreAgentsSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		// The storage-backed roster needs no configuration of its own
		let schema = Schema::new(vec![], vec![]);
		schema.validate(config)
	}
}

/// Registry for the storage-backed agent roster implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "store";
	type Factory = AgentFactory;

	fn factory() -> Self::Factory {
		create_agents
	}
}

impl AgentRegistry for Registry {}

/// Factory function to create a storage-backed agent roster.
pub fn create_agents(
	_config: &toml::Value,
	storage: Arc<StorageService>,
) -> Result<Box<dyn AgentInterface>, AgentError> {
	Ok(Box::new(StoreAgents::new(storage)))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::AgentService;
	use delight_storage::implementations::memory::MemoryStorage;

	fn agent(id: &str, available: bool) -> DeliveryAgent {
		DeliveryAgent {
			id: id.to_string(),
			name: format!("Agent {}", id),
			phone: format!("+91-{}", id),
			email: None,
			available,
			location: None,
		}
	}

	#[tokio::test]
	async fn test_first_available_picks_lowest_id() {
		let storage = Arc::new(StorageService::new(Box::new(MemoryStorage::new())));
		let roster = StoreAgents::new(storage);

		roster.put(&agent("a2", true)).await.unwrap();
		roster.put(&agent("a1", false)).await.unwrap();
		roster.put(&agent("a3", true)).await.unwrap();

		let first = roster.first_available().await.unwrap().unwrap();
		assert_eq!(first.id, "a2");
	}

	#[tokio::test]
	async fn test_first_available_none_when_all_busy() {
		let storage = Arc::new(StorageService::new(Box::new(MemoryStorage::new())));
		let roster = StoreAgents::new(storage);

		roster.put(&agent("a1", false)).await.unwrap();
		assert!(roster.first_available().await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_location_update() {
		let storage = Arc::new(StorageService::new(Box::new(MemoryStorage::new())));
		let service = AgentService::new(Box::new(StoreAgents::new(storage)));

		service.put(&agent("a1", true)).await.unwrap();
		let updated = service
			.set_location("a1", "MG Road".to_string())
			.await
			.unwrap();
		assert_eq!(updated.location.as_deref(), Some("MG Road"));

		assert!(matches!(
			service.set_location("ghost", "x".to_string()).await,
			Err(AgentError::AgentNotFound(_))
		));
	}
}
