//! End-to-end lifecycle tests for the order service, running against
//! in-memory storage with a recording notifier.

use async_trait::async_trait;
use delight_agent::{implementations::store as agent_store, AgentService};
use delight_catalog::{implementations::store as catalog_store, CatalogService};
use delight_notify::{NotifyError, NotifyInterface, NotifyService};
use delight_order::{OrderError, OrderService};
use delight_storage::{implementations::memory, StorageService};
use delight_types::{
	AlertType, ConfigSchema, CreateOrderRequest, Customer, DeliveryAgent, NewLineItem, Order,
	OrderStatus, Product, Schema, StorageKey, ValidationError,
};
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::{Arc, Mutex};

/// Notifier that records every event it is asked to deliver.
#[derive(Clone, Default)]
struct RecordingNotifier {
	events: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
	fn events(&self) -> Vec<String> {
		self.events.lock().unwrap().clone()
	}
}

#[async_trait]
impl NotifyInterface for RecordingNotifier {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		struct Empty;
		impl ConfigSchema for Empty {
			fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
				Schema::new(vec![], vec![]).validate(config)
			}
		}
		Box::new(Empty)
	}

	async fn order_received(&self, _: &Customer, order: &Order) -> Result<(), NotifyError> {
		self.events
			.lock()
			.unwrap()
			.push(format!("received:{}", order.id));
		Ok(())
	}

	async fn order_delivered(&self, _: &Customer, order: &Order) -> Result<(), NotifyError> {
		self.events
			.lock()
			.unwrap()
			.push(format!("delivered:{}", order.id));
		Ok(())
	}
}

struct Fixture {
	orders: OrderService,
	agents: Arc<AgentService>,
	notifier: RecordingNotifier,
}

async fn fixture() -> Fixture {
	let empty = toml::Value::Table(Default::default());
	let storage = Arc::new(StorageService::new(memory::create_storage(&empty).unwrap()));

	// Seed a small catalog, one agent, and one customer.
	let products = [
		Product {
			id: "p-choc".to_string(),
			name: "Chocolate Fudge".to_string(),
			flavor: "chocolate".to_string(),
			size: "8 servings".to_string(),
			price: Decimal::from(499),
		},
		Product {
			id: "p-red".to_string(),
			name: "Red Velvet".to_string(),
			flavor: "red velvet".to_string(),
			size: "8 servings".to_string(),
			price: Decimal::from(350),
		},
		Product {
			id: "p-custom".to_string(),
			name: "Custom Cake".to_string(),
			flavor: "choose your own".to_string(),
			size: "varies".to_string(),
			price: Decimal::from(699),
		},
	];
	for product in &products {
		storage
			.store(StorageKey::Products.as_str(), &product.id, product)
			.await
			.unwrap();
	}
	storage
		.store(
			StorageKey::Agents.as_str(),
			"agent-1",
			&DeliveryAgent {
				id: "agent-1".to_string(),
				name: "Priya".to_string(),
				phone: "555-0101".to_string(),
				email: None,
				available: true,
				location: None,
			},
		)
		.await
		.unwrap();
	storage
		.store(
			StorageKey::Customers.as_str(),
			"cust-1",
			&Customer {
				id: "cust-1".to_string(),
				name: "Asha".to_string(),
				email: Some("asha@example.com".to_string()),
			},
		)
		.await
		.unwrap();

	let catalog = Arc::new(CatalogService::new(
		catalog_store::create_catalog(&empty, storage.clone()).unwrap(),
	));
	let agents = Arc::new(AgentService::new(
		agent_store::create_agents(&empty, storage.clone()).unwrap(),
	));
	let notifier = RecordingNotifier::default();
	let orders = OrderService::new(
		storage,
		catalog,
		agents.clone(),
		Arc::new(NotifyService::new(Box::new(notifier.clone()))),
		90,
	);

	Fixture {
		orders,
		agents,
		notifier,
	}
}

fn item(product_id: &str) -> NewLineItem {
	NewLineItem {
		product_id: product_id.to_string(),
		quantity: None,
		unit_price: None,
		customization: None,
	}
}

fn request(items: Vec<NewLineItem>) -> CreateOrderRequest {
	CreateOrderRequest {
		customer_id: "cust-1".to_string(),
		items,
	}
}

#[tokio::test]
async fn empty_cart_is_rejected() {
	let fx = fixture().await;
	let err = fx.orders.create_order(request(vec![])).await.unwrap_err();
	assert!(matches!(err, OrderError::EmptyCart));
}

#[tokio::test]
async fn creation_assigns_agent_and_records_initial_history() {
	let fx = fixture().await;
	let order = fx
		.orders
		.create_order(request(vec![item("p-choc")]))
		.await
		.unwrap();

	assert_eq!(order.status, OrderStatus::Confirmed);
	assert_eq!(order.agent_id.as_deref(), Some("agent-1"));
	assert!(order.estimated_delivery.is_some());
	assert_eq!(order.history.len(), 1);
	assert_eq!(order.history[0].status, OrderStatus::Confirmed);
	assert_eq!(fx.notifier.events(), vec![format!("received:{}", order.id)]);
}

#[tokio::test]
async fn no_available_agent_leaves_order_unassigned() {
	let fx = fixture().await;
	fx.agents.set_availability("agent-1", false).await.unwrap();

	let order = fx
		.orders
		.create_order(request(vec![item("p-choc")]))
		.await
		.unwrap();
	assert_eq!(order.agent_id, None);
}

#[tokio::test]
async fn status_changes_append_history_in_order() {
	let fx = fixture().await;
	let order = fx
		.orders
		.create_order(request(vec![item("p-choc")]))
		.await
		.unwrap();

	fx.orders
		.set_status(&order.id, OrderStatus::Preparing)
		.await
		.unwrap();
	fx.orders
		.set_status(&order.id, OrderStatus::Ready)
		.await
		.unwrap();
	let updated = fx
		.orders
		.set_status(&order.id, OrderStatus::OutForDelivery)
		.await
		.unwrap();

	assert_eq!(updated.status, OrderStatus::OutForDelivery);
	let history = fx.orders.history(&order.id).await.unwrap();
	let statuses: Vec<OrderStatus> = history.iter().map(|r| r.status).collect();
	assert_eq!(
		statuses,
		vec![
			OrderStatus::Confirmed,
			OrderStatus::Preparing,
			OrderStatus::Ready,
			OrderStatus::OutForDelivery,
		]
	);
	for pair in history.windows(2) {
		assert!(pair[0].timestamp <= pair[1].timestamp);
	}
}

#[tokio::test]
async fn setting_the_same_status_does_not_grow_history() {
	let fx = fixture().await;
	let order = fx
		.orders
		.create_order(request(vec![item("p-choc")]))
		.await
		.unwrap();

	let before = fx.orders.get(&order.id).await.unwrap();
	let after = fx
		.orders
		.set_status(&order.id, OrderStatus::Confirmed)
		.await
		.unwrap();

	assert_eq!(after.history.len(), before.history.len());
	assert!(after.updated_at >= before.updated_at);
}

#[tokio::test]
async fn delivery_fires_notification() {
	let fx = fixture().await;
	let order = fx
		.orders
		.create_order(request(vec![item("p-choc")]))
		.await
		.unwrap();

	fx.orders
		.set_status(&order.id, OrderStatus::Delivered)
		.await
		.unwrap();

	let events = fx.notifier.events();
	assert!(events.contains(&format!("delivered:{}", order.id)));
}

#[tokio::test]
async fn cancel_is_allowed_only_before_preparation() {
	let fx = fixture().await;

	for (status, allowed) in [
		(OrderStatus::Pending, true),
		(OrderStatus::Confirmed, true),
		(OrderStatus::Preparing, false),
		(OrderStatus::Ready, false),
		(OrderStatus::OutForDelivery, false),
		(OrderStatus::Delivered, false),
	] {
		let order = fx
			.orders
			.create_order(request(vec![item("p-choc")]))
			.await
			.unwrap();
		fx.orders.set_status(&order.id, status).await.unwrap();

		let result = fx.orders.cancel(&order.id).await;
		if allowed {
			let cancelled = result.unwrap();
			assert_eq!(cancelled.status, OrderStatus::Cancelled);
			// Cancellation is a transition, not a deletion.
			let reloaded = fx.orders.get(&order.id).await.unwrap();
			assert_eq!(reloaded.status, OrderStatus::Cancelled);
		} else {
			assert!(matches!(result, Err(OrderError::InvalidTransition(_))));
		}
	}
}

#[tokio::test]
async fn cancelling_twice_is_rejected() {
	let fx = fixture().await;
	let order = fx
		.orders
		.create_order(request(vec![item("p-choc")]))
		.await
		.unwrap();

	fx.orders.cancel(&order.id).await.unwrap();
	let err = fx.orders.cancel(&order.id).await.unwrap_err();
	assert!(matches!(err, OrderError::InvalidTransition(_)));
}

#[tokio::test]
async fn tracking_reflects_the_latest_status() {
	let fx = fixture().await;
	let order = fx
		.orders
		.create_order(request(vec![item("p-choc")]))
		.await
		.unwrap();

	let first = fx.orders.tracking(&order.id).await.unwrap();
	assert_eq!(first.status, OrderStatus::Confirmed);

	fx.orders
		.set_status(&order.id, OrderStatus::Preparing)
		.await
		.unwrap();
	let second = fx.orders.tracking(&order.id).await.unwrap();
	assert_eq!(second.status, OrderStatus::Preparing);
	assert_eq!(second.id, order.id);

	// Polling without intervening writes returns the same projection.
	let third = fx.orders.tracking(&order.id).await.unwrap();
	assert_eq!(second, third);
}

#[tokio::test]
async fn totals_fall_back_from_explicit_price_to_catalog_to_zero() {
	let fx = fixture().await;

	// Unpriced items use catalog prices: 499 * 2 + 350 = 1348.
	let mut two_choc = item("p-choc");
	two_choc.quantity = Some(json!(2));
	let order = fx
		.orders
		.create_order(request(vec![two_choc, item("p-red")]))
		.await
		.unwrap();
	let total = fx.orders.total(&order.id).await.unwrap();
	assert_eq!(total, "1348.00".parse::<Decimal>().unwrap());

	// A malformed price on an unknown product degrades to zero while
	// the explicitly priced item still counts: 500 * 2 = 1000.
	let mut bad = item("p-unknown");
	bad.unit_price = Some(json!("bad"));
	let mut priced = item("p-unknown");
	priced.unit_price = Some(json!(500));
	priced.quantity = Some(json!(2));
	let order = fx
		.orders
		.create_order(request(vec![bad, priced]))
		.await
		.unwrap();
	let total = fx.orders.total(&order.id).await.unwrap();
	assert_eq!(total, "1000.00".parse::<Decimal>().unwrap());
}

#[tokio::test]
async fn multibyte_product_names_survive_creation() {
	let fx = fixture().await;

	// Unknown product, so the request id doubles as the display name;
	// the customization payload routes it through the custom-name check.
	let mut accented = item("Fraisé Cake");
	accented.customization = Some("size:10 servings".to_string());

	let order = fx
		.orders
		.create_order(request(vec![accented]))
		.await
		.unwrap();
	assert_eq!(order.items[0].product_name, "Fraisé Cake");
	assert_eq!(order.items[0].unit_price, None);
}

#[tokio::test]
async fn custom_product_is_priced_by_heuristic() {
	let fx = fixture().await;
	let mut custom = item("p-custom");
	custom.customization = Some("size:12 servings|gluten_free:True|vegan:False".to_string());

	let order = fx.orders.create_order(request(vec![custom])).await.unwrap();
	assert_eq!(order.items[0].unit_price, Some(Decimal::from(959)));

	let total = fx.orders.total(&order.id).await.unwrap();
	assert_eq!(total, "959.00".parse::<Decimal>().unwrap());
}

#[tokio::test]
async fn alerts_are_listed_newest_first() {
	let fx = fixture().await;
	let order = fx
		.orders
		.create_order(request(vec![item("p-choc")]))
		.await
		.unwrap();

	assert!(fx.orders.alerts(&order.id).await.unwrap().is_empty());

	fx.orders
		.add_alert(&order.id, AlertType::Delayed, "Running 20 minutes late".to_string())
		.await
		.unwrap();
	fx.orders
		.add_alert(&order.id, AlertType::Issue, "Address unreachable".to_string())
		.await
		.unwrap();

	let alerts = fx.orders.alerts(&order.id).await.unwrap();
	assert_eq!(alerts.len(), 2);
	assert_eq!(alerts[0].alert_type, AlertType::Issue);
	assert_eq!(alerts[1].alert_type, AlertType::Delayed);
}

#[tokio::test]
async fn alerts_require_an_existing_order() {
	let fx = fixture().await;
	let err = fx
		.orders
		.add_alert("no-such-order", AlertType::Issue, "x".to_string())
		.await
		.unwrap_err();
	assert!(matches!(err, OrderError::OrderNotFound(_)));
}

#[tokio::test]
async fn sales_summary_excludes_cancelled_orders() {
	let fx = fixture().await;

	let kept = fx
		.orders
		.create_order(request(vec![item("p-choc")]))
		.await
		.unwrap();
	let dropped = fx
		.orders
		.create_order(request(vec![item("p-red")]))
		.await
		.unwrap();
	fx.orders.cancel(&dropped.id).await.unwrap();

	let summary = fx.orders.sales_summary().await.unwrap();
	assert_eq!(summary.total_orders, 1);
	assert_eq!(summary.total_sales, 499.0);

	let _ = kept;
}

#[tokio::test]
async fn missing_order_reports_not_found() {
	let fx = fixture().await;
	let err = fx.orders.get("no-such-order").await.unwrap_err();
	assert!(matches!(err, OrderError::OrderNotFound(_)));
}
