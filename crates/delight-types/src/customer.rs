//! Customer types referenced by orders and notifications.

use serde::{Deserialize, Serialize};

/// A customer account, as far as the order backend needs to know it.
///
/// Authentication and profile management live outside this service;
/// orders only keep a reference, and notifications only need a name and
/// an email address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
	/// Unique identifier for this customer.
	pub id: String,
	/// Display name used in notification greetings.
	pub name: String,
	/// Email address, when the customer provided one. Notifications are
	/// silently skipped without it.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
}
