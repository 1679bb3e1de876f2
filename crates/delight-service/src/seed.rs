//! Demo data seeding.
//!
//! Populates storage with a small catalog, a couple of delivery agents,
//! and one customer so a fresh instance has something to serve.

use delight_storage::{StorageError, StorageService};
use delight_types::{Customer, DeliveryAgent, Product, StorageKey};
use rust_decimal::Decimal;

/// Seeds the storage backend with demo products, agents, and a customer.
///
/// Idempotent: records are keyed by fixed ids, so running it again just
/// rewrites the same content.
pub async fn seed_demo_data(storage: &StorageService) -> Result<(), StorageError> {
	let products = [
		Product {
			id: "choc-fudge-8".to_string(),
			name: "Chocolate Fudge".to_string(),
			flavor: "chocolate".to_string(),
			size: "8 servings".to_string(),
			price: Decimal::new(49900, 2),
		},
		Product {
			id: "red-velvet-8".to_string(),
			name: "Red Velvet".to_string(),
			flavor: "red velvet".to_string(),
			size: "8 servings".to_string(),
			price: Decimal::new(35000, 2),
		},
		Product {
			id: "lemon-drizzle-12".to_string(),
			name: "Lemon Drizzle".to_string(),
			flavor: "lemon".to_string(),
			size: "12 servings".to_string(),
			price: Decimal::new(52500, 2),
		},
		Product {
			id: "custom-cake".to_string(),
			name: "Custom Cake".to_string(),
			flavor: "choose your own".to_string(),
			size: "varies".to_string(),
			price: Decimal::new(69900, 2),
		},
	];
	for product in &products {
		storage
			.store(StorageKey::Products.as_str(), &product.id, product)
			.await?;
	}

	let agents = [
		DeliveryAgent {
			id: "agent-priya".to_string(),
			name: "Priya Nair".to_string(),
			phone: "555-0101".to_string(),
			email: Some("priya@delight.example".to_string()),
			available: true,
			location: None,
		},
		DeliveryAgent {
			id: "agent-sam".to_string(),
			name: "Sam Okafor".to_string(),
			phone: "555-0102".to_string(),
			email: None,
			available: true,
			location: None,
		},
	];
	for agent in &agents {
		storage
			.store(StorageKey::Agents.as_str(), &agent.id, agent)
			.await?;
	}

	let customer = Customer {
		id: "demo-customer".to_string(),
		name: "Asha Rahman".to_string(),
		email: Some("asha@example.com".to_string()),
	};
	storage
		.store(StorageKey::Customers.as_str(), &customer.id, &customer)
		.await?;

	tracing::info!(
		products = products.len(),
		agents = agents.len(),
		"Seeded demo data"
	);

	Ok(())
}
