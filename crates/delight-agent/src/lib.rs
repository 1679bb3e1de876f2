//! Delivery agent module for the delight order backend.
//!
//! This module answers the one question order creation asks — "is any
//! delivery agent available right now?" — and carries the small amount
//! of agent bookkeeping around it: listing, availability toggling, and
//! free-text location updates for tracking display.

use async_trait::async_trait;
use delight_storage::StorageService;
use delight_types::{ConfigSchema, DeliveryAgent, ImplementationRegistry};
use std::sync::Arc;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod store;
}

/// Errors that can occur during agent operations.
#[derive(Debug, Error)]
pub enum AgentError {
	/// Error that occurs when an agent does not exist.
	#[error("Agent not found: {0}")]
	AgentNotFound(String),
	/// Error from the underlying storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

impl From<AgentError> for delight_types::ApiError {
	fn from(err: AgentError) -> Self {
		use delight_types::ApiError;
		match err {
			AgentError::AgentNotFound(id) => ApiError::not_found(format!("Agent not found: {}", id)),
			other => ApiError::internal(other.to_string()),
		}
	}
}

/// Trait defining the interface for agent roster implementations.
#[async_trait]
pub trait AgentInterface: Send + Sync {
	/// Returns the configuration schema for this implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Returns the first available agent, if any.
	///
	/// "First" means first in stable id order; there is deliberately no
	/// ranking or load balancing. There is also no atomic claim: two
	/// concurrent callers may both receive the same agent.
	async fn first_available(&self) -> Result<Option<DeliveryAgent>, AgentError>;

	/// Looks up an agent by id.
	async fn get(&self, agent_id: &str) -> Result<DeliveryAgent, AgentError>;

	/// Lists all agents.
	async fn list(&self) -> Result<Vec<DeliveryAgent>, AgentError>;

	/// Stores an agent record, creating or replacing it.
	async fn put(&self, agent: &DeliveryAgent) -> Result<(), AgentError>;
}

/// Type alias for agent roster factory functions.
pub type AgentFactory =
	fn(&toml::Value, Arc<StorageService>) -> Result<Box<dyn AgentInterface>, AgentError>;

/// Registry trait for agent roster implementations.
pub trait AgentRegistry: ImplementationRegistry<Factory = AgentFactory> {}

/// Get all registered agent roster implementations.
pub fn get_all_implementations() -> Vec<(&'static str, AgentFactory)> {
	use implementations::store;

	vec![(store::Registry::NAME, store::Registry::factory())]
}

/// Service that manages the delivery agent roster.
pub struct AgentService {
	/// The underlying roster implementation.
	implementation: Box<dyn AgentInterface>,
}

impl AgentService {
	/// Creates a new AgentService with the specified implementation.
	pub fn new(implementation: Box<dyn AgentInterface>) -> Self {
		Self { implementation }
	}

	/// Returns the first available agent, if any.
	pub async fn first_available(&self) -> Result<Option<DeliveryAgent>, AgentError> {
		self.implementation.first_available().await
	}

	/// Looks up an agent by id.
	pub async fn get(&self, agent_id: &str) -> Result<DeliveryAgent, AgentError> {
		self.implementation.get(agent_id).await
	}

	/// Lists all agents.
	pub async fn list(&self) -> Result<Vec<DeliveryAgent>, AgentError> {
		self.implementation.list().await
	}

	/// Lists agents currently flagged available.
	pub async fn available(&self) -> Result<Vec<DeliveryAgent>, AgentError> {
		let agents = self.implementation.list().await?;
		Ok(agents.into_iter().filter(|a| a.available).collect())
	}

	/// Stores an agent record, creating or replacing it.
	pub async fn put(&self, agent: &DeliveryAgent) -> Result<(), AgentError> {
		self.implementation.put(agent).await
	}

	/// Toggles an agent's availability flag.
	pub async fn set_availability(
		&self,
		agent_id: &str,
		available: bool,
	) -> Result<DeliveryAgent, AgentError> {
		let mut agent = self.implementation.get(agent_id).await?;
		agent.available = available;
		self.implementation.put(&agent).await?;
		tracing::info!(agent_id = %agent.id, available, "Agent availability changed");
		Ok(agent)
	}

	/// Updates an agent's free-text location.
	pub async fn set_location(
		&self,
		agent_id: &str,
		location: String,
	) -> Result<DeliveryAgent, AgentError> {
		let mut agent = self.implementation.get(agent_id).await?;
		agent.location = Some(location);
		self.implementation.put(&agent).await?;
		Ok(agent)
	}
}
