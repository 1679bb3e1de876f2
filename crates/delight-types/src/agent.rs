//! Delivery agent types.

use serde::{Deserialize, Serialize};

/// A delivery agent that can be assigned to orders.
///
/// Agents are referenced by orders, not owned by them: deleting an agent
/// leaves orders pointing at a dangling id rather than cascading. Nothing
/// in the data model limits an agent to a single order at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryAgent {
	/// Unique identifier for this agent.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Contact phone number. Unique across agents.
	pub phone: String,
	/// Optional contact email.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	/// Whether the agent can currently take assignments.
	pub available: bool,
	/// Free-text last-known location, for tracking display.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,
}
