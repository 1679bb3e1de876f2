//! Order module for the delight order backend.
//!
//! This module owns the order lifecycle: creation from a validated
//! cart, status transitions with an append-only audit trail, customer
//! cancellation, order alerts, and total calculation. It coordinates
//! the catalog (price fallback), the agent roster (delivery
//! assignment), and the notifier (best-effort customer messages), but
//! storage is the only component an order mutation depends on.

use chrono::{Duration, Utc};
use delight_agent::AgentService;
use delight_catalog::CatalogService;
use delight_notify::NotifyService;
use delight_storage::{StorageError, StorageService};
use delight_types::{
	truncate_id, AlertType, CreateOrderRequest, Customer, LineItem, Order, OrderAlert,
	OrderStatus, SalesSummary, StatusRecord, StorageKey, TrackingView,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

pub mod pricing;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
	/// Error that occurs when creating an order from an empty cart.
	#[error("Cannot create an order from an empty cart")]
	EmptyCart,
	/// Error that occurs when a status transition is not allowed.
	#[error("Invalid transition: {0}")]
	InvalidTransition(String),
	/// Error that occurs when an order does not exist.
	#[error("Order not found: {0}")]
	OrderNotFound(String),
	/// Error from the underlying storage backend.
	#[error("Storage error: {0}")]
	Storage(#[from] StorageError),
}

impl From<OrderError> for delight_types::ApiError {
	fn from(err: OrderError) -> Self {
		use delight_types::ApiError;
		match err {
			OrderError::EmptyCart => {
				ApiError::bad_request("empty_cart", "Cannot create an order from an empty cart")
			},
			OrderError::InvalidTransition(reason) => {
				ApiError::bad_request("invalid_transition", reason)
			},
			OrderError::OrderNotFound(id) => ApiError::not_found(format!("Order not found: {}", id)),
			OrderError::Storage(e) => ApiError::internal(e.to_string()),
		}
	}
}

/// Service that manages the order lifecycle.
///
/// All mutations persist the order as a single document (line items and
/// history embedded), so a status change and its audit append are one
/// atomic write against the storage backend.
pub struct OrderService {
	/// Persistent storage for orders, alerts, and customer lookups.
	storage: Arc<StorageService>,
	/// Catalog, consulted as the price fallback for unpriced items.
	catalog: Arc<CatalogService>,
	/// Delivery agent roster, consulted once at order creation.
	agents: Arc<AgentService>,
	/// Best-effort customer notifications.
	notifier: Arc<NotifyService>,
	/// Minutes from creation to the estimated delivery time.
	estimated_delivery_minutes: i64,
}

impl OrderService {
	/// Creates a new OrderService.
	pub fn new(
		storage: Arc<StorageService>,
		catalog: Arc<CatalogService>,
		agents: Arc<AgentService>,
		notifier: Arc<NotifyService>,
		estimated_delivery_minutes: i64,
	) -> Self {
		Self {
			storage,
			catalog,
			agents,
			notifier,
			estimated_delivery_minutes,
		}
	}

	/// Creates an order from a validated cart.
	///
	/// Captures each item's unit price at creation time: an explicit
	/// positive price from the request wins, a build-your-own product
	/// with a customization payload is priced by heuristic, and anything
	/// else is left unpriced for the total calculator's catalog fallback.
	/// The first available delivery agent, if any, is assigned; none
	/// being available is not an error. Fires the order-received
	/// notification after the order is persisted.
	pub async fn create_order(&self, request: CreateOrderRequest) -> Result<Order, OrderError> {
		if request.items.is_empty() {
			return Err(OrderError::EmptyCart);
		}

		let mut items = Vec::with_capacity(request.items.len());
		for new_item in &request.items {
			let quantity = pricing::parse_quantity(new_item.quantity.as_ref());
			// Product lookup is best-effort here; a missing product only
			// costs us the display name and the creation-time heuristic.
			let product = self.catalog.product(&new_item.product_id).await.ok();
			let product_name = product
				.as_ref()
				.map(|p| p.name.clone())
				.unwrap_or_else(|| new_item.product_id.clone());

			let unit_price = pricing::parse_price(new_item.unit_price.as_ref()).or_else(|| {
				match &new_item.customization {
					Some(c) if pricing::is_custom_product(&product_name) => {
						Some(pricing::custom_price(c))
					},
					_ => None,
				}
			});

			items.push(LineItem {
				product_id: new_item.product_id.clone(),
				product_name,
				quantity,
				unit_price,
				customization: new_item.customization.clone(),
			});
		}

		let now = Utc::now();
		let agent_id = match self.agents.first_available().await {
			Ok(agent) => agent.map(|a| a.id),
			Err(e) => {
				tracing::warn!(error = %e, "Agent lookup failed; creating order unassigned");
				None
			},
		};

		let status = OrderStatus::Confirmed;
		let order = Order {
			id: Uuid::new_v4().to_string(),
			customer_id: request.customer_id,
			created_at: now,
			updated_at: now,
			status,
			estimated_delivery: Some(now + Duration::minutes(self.estimated_delivery_minutes)),
			agent_id,
			items,
			history: vec![StatusRecord {
				status,
				timestamp: now,
			}],
		};

		self.storage
			.store(StorageKey::Orders.as_str(), &order.id, &order)
			.await?;

		tracing::info!(
			order_id = %truncate_id(&order.id),
			customer_id = %order.customer_id,
			items = order.items.len(),
			agent = order.agent_id.as_deref().unwrap_or("none"),
			"Order created"
		);

		self.notify_received(&order).await;

		Ok(order)
	}

	/// Retrieves an order by id.
	pub async fn get(&self, order_id: &str) -> Result<Order, OrderError> {
		match self
			.storage
			.retrieve::<Order>(StorageKey::Orders.as_str(), order_id)
			.await
		{
			Ok(order) => Ok(order),
			Err(StorageError::NotFound) => Err(OrderError::OrderNotFound(order_id.to_string())),
			Err(e) => Err(e.into()),
		}
	}

	/// Moves an order to the given status.
	///
	/// A history record is appended only when the status actually
	/// changes; setting the current status again is a no-op apart from
	/// refreshing `updated_at`. Reaching `delivered` fires the
	/// order-delivered notification.
	pub async fn set_status(
		&self,
		order_id: &str,
		status: OrderStatus,
	) -> Result<Order, OrderError> {
		let mut order = self.get(order_id).await?;
		let now = Utc::now();

		let changed = order.status != status;
		if changed {
			order.status = status;
			order.history.push(StatusRecord {
				status,
				timestamp: now,
			});
		}
		order.updated_at = now;

		self.storage
			.update(StorageKey::Orders.as_str(), &order.id, &order)
			.await?;

		if changed {
			tracing::info!(
				order_id = %truncate_id(&order.id),
				status = %status,
				"Order status updated"
			);
			if status == OrderStatus::Delivered {
				self.notify_delivered(&order).await;
			}
		}

		Ok(order)
	}

	/// Cancels an order on behalf of the customer.
	///
	/// Allowed only while the order is pending or confirmed; once
	/// preparation has started the transition is rejected. Cancellation
	/// is a status transition, never a deletion, so the order and its
	/// history remain queryable.
	pub async fn cancel(&self, order_id: &str) -> Result<Order, OrderError> {
		let order = self.get(order_id).await?;

		if order.status == OrderStatus::Cancelled {
			return Err(OrderError::InvalidTransition(
				"order is already cancelled".to_string(),
			));
		}
		if !order.status.cancellable() {
			return Err(OrderError::InvalidTransition(format!(
				"cannot cancel an order in status '{}'",
				order.status
			)));
		}

		self.set_status(order_id, OrderStatus::Cancelled).await
	}

	/// Returns an order's status history, oldest first.
	pub async fn history(&self, order_id: &str) -> Result<Vec<StatusRecord>, OrderError> {
		Ok(self.get(order_id).await?.history)
	}

	/// Returns the minimal tracking projection for polling clients.
	pub async fn tracking(&self, order_id: &str) -> Result<TrackingView, OrderError> {
		Ok(self.get(order_id).await?.tracking())
	}

	/// Raises an alert against an order.
	pub async fn add_alert(
		&self,
		order_id: &str,
		alert_type: AlertType,
		message: String,
	) -> Result<OrderAlert, OrderError> {
		// Alerts are only meaningful against an existing order.
		self.get(order_id).await?;

		let mut alerts = self.alert_list(order_id).await?;
		let alert = OrderAlert {
			alert_type,
			message,
			timestamp: Utc::now(),
		};
		alerts.push(alert.clone());
		self.storage
			.store(StorageKey::Alerts.as_str(), order_id, &alerts)
			.await?;

		tracing::info!(
			order_id = %truncate_id(order_id),
			alert_type = %alert.alert_type,
			"Order alert raised"
		);

		Ok(alert)
	}

	/// Returns all alerts raised against an order, newest first.
	pub async fn alerts(&self, order_id: &str) -> Result<Vec<OrderAlert>, OrderError> {
		self.get(order_id).await?;
		// Stored oldest-first (append-only); readers want the latest on top.
		let mut alerts = self.alert_list(order_id).await?;
		alerts.reverse();
		Ok(alerts)
	}

	async fn alert_list(&self, order_id: &str) -> Result<Vec<OrderAlert>, OrderError> {
		match self
			.storage
			.retrieve::<Vec<OrderAlert>>(StorageKey::Alerts.as_str(), order_id)
			.await
		{
			Ok(alerts) => Ok(alerts),
			Err(StorageError::NotFound) => Ok(Vec::new()),
			Err(e) => Err(e.into()),
		}
	}

	/// Calculates an order's total.
	///
	/// Recomputed on demand rather than stored: captured prices are
	/// fixed, but unpriced items track the current catalog price.
	pub async fn total(&self, order_id: &str) -> Result<Decimal, OrderError> {
		let order = self.get(order_id).await?;
		Ok(self.total_of(&order).await)
	}

	/// Aggregates sales across all non-cancelled orders.
	pub async fn sales_summary(&self) -> Result<SalesSummary, OrderError> {
		let orders = self
			.storage
			.retrieve_all::<Order>(StorageKey::Orders.as_str())
			.await?;

		let mut total_sales = Decimal::ZERO;
		let mut total_orders = 0u64;
		for order in &orders {
			if order.status == OrderStatus::Cancelled {
				continue;
			}
			total_orders += 1;
			total_sales += self.total_of(order).await;
		}

		Ok(SalesSummary {
			total_sales: total_sales.to_f64().unwrap_or(0.0),
			total_orders,
		})
	}

	async fn total_of(&self, order: &Order) -> Decimal {
		let mut total = Decimal::ZERO;
		for item in &order.items {
			let catalog_price = match item.unit_price {
				Some(_) => None,
				None => self.catalog.price_of(&item.product_id).await.ok(),
			};
			let unit = pricing::effective_unit_price(item.unit_price, catalog_price);
			total += unit * Decimal::from(item.quantity);
		}
		pricing::round_total(total)
	}

	async fn notify_received(&self, order: &Order) {
		if let Some(customer) = self.customer_of(order).await {
			self.notifier.order_received(&customer, order).await;
		}
	}

	async fn notify_delivered(&self, order: &Order) {
		if let Some(customer) = self.customer_of(order).await {
			self.notifier.order_delivered(&customer, order).await;
		}
	}

	async fn customer_of(&self, order: &Order) -> Option<Customer> {
		match self
			.storage
			.retrieve::<Customer>(StorageKey::Customers.as_str(), &order.customer_id)
			.await
		{
			Ok(customer) => Some(customer),
			Err(StorageError::NotFound) => {
				tracing::debug!(
					order_id = %truncate_id(&order.id),
					customer_id = %order.customer_id,
					"No customer record; skipping notification"
				);
				None
			},
			Err(e) => {
				tracing::warn!(
					order_id = %truncate_id(&order.id),
					error = %e,
					"Customer lookup failed; skipping notification"
				);
				None
			},
		}
	}
}
