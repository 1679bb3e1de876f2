//! Notification module for the delight order backend.
//!
//! This module delivers best-effort customer notifications at the two
//! lifecycle moments that warrant one: order received and order
//! delivered. Delivery is strictly fire-and-forget from the core's point
//! of view — the service wrapper logs failures and swallows them, so a
//! broken notifier can never fail an order mutation.

use async_trait::async_trait;
use delight_types::{truncate_id, ConfigSchema, Customer, ImplementationRegistry, Order};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod log;
	pub mod webhook;
}

/// Errors that can occur during notification delivery.
///
/// These never escape the NotifyService wrapper; they exist so
/// implementations can report what went wrong for the log line.
#[derive(Debug, Error)]
pub enum NotifyError {
	/// Error that occurs during network communication.
	#[error("Network error: {0}")]
	Network(String),
	/// Error that occurs when the notifier rejects the payload.
	#[error("Delivery rejected: {0}")]
	Rejected(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the interface for notification implementations.
#[async_trait]
pub trait NotifyInterface: Send + Sync {
	/// Returns the configuration schema for this implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Notifies the customer that their order was received.
	async fn order_received(&self, customer: &Customer, order: &Order) -> Result<(), NotifyError>;

	/// Notifies the customer that their order was delivered.
	async fn order_delivered(&self, customer: &Customer, order: &Order) -> Result<(), NotifyError>;
}

/// Type alias for notifier factory functions.
pub type NotifyFactory = fn(&toml::Value) -> Result<Box<dyn NotifyInterface>, NotifyError>;

/// Registry trait for notifier implementations.
pub trait NotifyRegistry: ImplementationRegistry<Factory = NotifyFactory> {}

/// Get all registered notifier implementations.
pub fn get_all_implementations() -> Vec<(&'static str, NotifyFactory)> {
	use implementations::{log, webhook};

	vec![
		(log::Registry::NAME, log::Registry::factory()),
		(webhook::Registry::NAME, webhook::Registry::factory()),
	]
}

/// Service that dispatches best-effort notifications.
///
/// All methods return `()`: a failure is logged at warn level and
/// otherwise discarded, never retried, never surfaced to the caller.
pub struct NotifyService {
	/// The underlying notifier implementation.
	implementation: Box<dyn NotifyInterface>,
}

impl NotifyService {
	/// Creates a new NotifyService with the specified implementation.
	pub fn new(implementation: Box<dyn NotifyInterface>) -> Self {
		Self { implementation }
	}

	/// Sends the order-received notification, best-effort.
	///
	/// Skipped silently when the customer has no email address, matching
	/// the behavior of a mail-based notifier with nowhere to deliver.
	pub async fn order_received(&self, customer: &Customer, order: &Order) {
		if customer.email.is_none() {
			return;
		}
		if let Err(e) = self.implementation.order_received(customer, order).await {
			tracing::warn!(
				order_id = %truncate_id(&order.id),
				customer_id = %customer.id,
				error = %e,
				"Failed to send order-received notification"
			);
		}
	}

	/// Sends the order-delivered notification, best-effort.
	pub async fn order_delivered(&self, customer: &Customer, order: &Order) {
		if customer.email.is_none() {
			return;
		}
		if let Err(e) = self.implementation.order_delivered(customer, order).await {
			tracing::warn!(
				order_id = %truncate_id(&order.id),
				customer_id = %customer.id,
				error = %e,
				"Failed to send order-delivered notification"
			);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use delight_types::{OrderStatus, Schema, ValidationError};

	struct FailingNotifier;

	#[async_trait]
	impl NotifyInterface for FailingNotifier {
		fn config_schema(&self) -> Box<dyn ConfigSchema> {
			struct Empty;
			impl ConfigSchema for Empty {
				fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
					Schema::new(vec![], vec![]).validate(config)
				}
			}
			Box::new(Empty)
		}

		async fn order_received(&self, _: &Customer, _: &Order) -> Result<(), NotifyError> {
			Err(NotifyError::Network("connection refused".into()))
		}

		async fn order_delivered(&self, _: &Customer, _: &Order) -> Result<(), NotifyError> {
			Err(NotifyError::Network("connection refused".into()))
		}
	}

	fn sample_order() -> Order {
		Order {
			id: "o1".into(),
			customer_id: "c1".into(),
			created_at: chrono::Utc::now(),
			updated_at: chrono::Utc::now(),
			status: OrderStatus::Confirmed,
			estimated_delivery: None,
			agent_id: None,
			items: vec![],
			history: vec![],
		}
	}

	#[tokio::test]
	async fn failures_are_swallowed() {
		let service = NotifyService::new(Box::new(FailingNotifier));
		let customer = Customer {
			id: "c1".into(),
			name: "Asha".into(),
			email: Some("asha@example.com".into()),
		};
		// Must not panic or propagate anything.
		service.order_received(&customer, &sample_order()).await;
		service.order_delivered(&customer, &sample_order()).await;
	}
}
