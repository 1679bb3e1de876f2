//! Log-based notifier implementation.
//!
//! Writes each notification to the process log instead of delivering it
//! anywhere. Useful for development and for deployments that have not
//! wired up a real channel yet.

use crate::{NotifyError, NotifyFactory, NotifyInterface, NotifyRegistry};
use async_trait::async_trait;
use delight_types::{ConfigSchema, Customer, ImplementationRegistry, Order, Schema, ValidationError};

/// Notifier that emits notifications as structured log lines.
pub struct LogNotifier;

/// Configuration schema for the log notifier (accepts no options).
pub struct LogNotifierSchema;

impl ConfigSchema for LogNotifierSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		Schema::new(vec![], vec![]).validate(config)
	}
}

#[async_trait]
impl NotifyInterface for LogNotifier {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(LogNotifierSchema)
	}

	async fn order_received(&self, customer: &Customer, order: &Order) -> Result<(), NotifyError> {
		tracing::info!(
			order_id = %order.id,
			customer = %customer.name,
			items = order.items.len(),
			"Order received notification"
		);
		Ok(())
	}

	async fn order_delivered(&self, customer: &Customer, order: &Order) -> Result<(), NotifyError> {
		tracing::info!(
			order_id = %order.id,
			customer = %customer.name,
			"Order delivered notification"
		);
		Ok(())
	}
}

/// Factory function to create a log notifier.
pub fn create_notifier(config: &toml::Value) -> Result<Box<dyn NotifyInterface>, NotifyError> {
	LogNotifierSchema
		.validate(config)
		.map_err(|e| NotifyError::Configuration(e.to_string()))?;
	Ok(Box::new(LogNotifier))
}

/// Registry for the log notifier implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "log";
	type Factory = NotifyFactory;

	fn factory() -> Self::Factory {
		create_notifier
	}
}

impl NotifyRegistry for Registry {}
