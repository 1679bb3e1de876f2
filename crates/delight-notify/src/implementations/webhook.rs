//! Webhook notifier implementation.
//!
//! Delivers notifications by POSTing a small JSON event to a configured
//! endpoint. A non-success status code counts as a delivery failure; the
//! service layer decides what to do with it (it logs and moves on).

use crate::{NotifyError, NotifyFactory, NotifyInterface, NotifyRegistry};
use async_trait::async_trait;
use delight_types::{
	ConfigSchema, Customer, Field, FieldType, ImplementationRegistry, Order, Schema,
	ValidationError,
};
use serde_json::json;

/// Notifier that POSTs JSON events to an HTTP endpoint.
pub struct WebhookNotifier {
	/// Endpoint that receives the event payloads.
	url: String,
	/// Shared HTTP client.
	client: reqwest::Client,
}

/// Upper bound on one delivery attempt. Order mutations await the
/// notifier, so a stalled endpoint must not hold a request open.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

impl WebhookNotifier {
	/// Creates a new webhook notifier targeting the given URL.
	pub fn new(url: String) -> Result<Self, NotifyError> {
		let client = reqwest::Client::builder()
			.timeout(REQUEST_TIMEOUT)
			.build()
			.map_err(|e| NotifyError::Configuration(e.to_string()))?;
		Ok(Self { url, client })
	}

	async fn post_event(
		&self,
		event: &str,
		customer: &Customer,
		order: &Order,
	) -> Result<(), NotifyError> {
		let payload = json!({
			"event": event,
			"order_id": order.id,
			"customer_id": customer.id,
			"status": order.status.as_str(),
		});

		let response = self
			.client
			.post(&self.url)
			.json(&payload)
			.send()
			.await
			.map_err(|e| NotifyError::Network(e.to_string()))?;

		if !response.status().is_success() {
			return Err(NotifyError::Rejected(format!(
				"endpoint returned {}",
				response.status()
			)));
		}

		Ok(())
	}
}

/// Configuration schema for the webhook notifier.
pub struct WebhookNotifierSchema;

impl ConfigSchema for WebhookNotifierSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![Field::new("url", FieldType::String).with_validator(|v| {
				let s = v.as_str().unwrap_or_default();
				if s.starts_with("http://") || s.starts_with("https://") {
					Ok(())
				} else {
					Err("must start with http:// or https://".to_string())
				}
			})],
			vec![],
		);
		schema.validate(config)
	}
}

#[async_trait]
impl NotifyInterface for WebhookNotifier {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(WebhookNotifierSchema)
	}

	async fn order_received(&self, customer: &Customer, order: &Order) -> Result<(), NotifyError> {
		self.post_event("order_received", customer, order).await
	}

	async fn order_delivered(&self, customer: &Customer, order: &Order) -> Result<(), NotifyError> {
		self.post_event("order_delivered", customer, order).await
	}
}

/// Factory function to create a webhook notifier from configuration.
pub fn create_notifier(config: &toml::Value) -> Result<Box<dyn NotifyInterface>, NotifyError> {
	WebhookNotifierSchema
		.validate(config)
		.map_err(|e| NotifyError::Configuration(e.to_string()))?;

	let url = config
		.get("url")
		.and_then(|v| v.as_str())
		.ok_or_else(|| NotifyError::Configuration("'url' is required".to_string()))?
		.to_string();

	Ok(Box::new(WebhookNotifier::new(url)?))
}

/// Registry for the webhook notifier implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "webhook";
	type Factory = NotifyFactory;

	fn factory() -> Self::Factory {
		create_notifier
	}
}

impl NotifyRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn schema_requires_http_url() {
		let schema = WebhookNotifierSchema;
		let ok: toml::Value = toml::from_str("url = \"https://hooks.example.com/orders\"").unwrap();
		assert!(schema.validate(&ok).is_ok());

		let bad_scheme: toml::Value = toml::from_str("url = \"ftp://example.com\"").unwrap();
		assert!(schema.validate(&bad_scheme).is_err());

		let missing: toml::Value = toml::from_str("other = 1").unwrap();
		assert!(schema.validate(&missing).is_err());
	}

	#[test]
	fn factory_rejects_missing_url() {
		let config: toml::Value = toml::from_str("timeout = 5").unwrap();
		assert!(create_notifier(&config).is_err());
	}

	#[test]
	fn factory_builds_notifier_from_valid_config() {
		let config: toml::Value = toml::from_str("url = \"https://hooks.example.com/orders\"").unwrap();
		assert!(create_notifier(&config).is_ok());
	}
}
