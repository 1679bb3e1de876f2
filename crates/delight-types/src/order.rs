//! Order types for the delight backend.
//!
//! This module defines the order entity with its line items, status
//! history, and alerts. The order document embeds its line items and
//! history records so that a status mutation and its audit append are
//! persisted in a single write.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of an order in the fulfilment lifecycle.
///
/// Serialized as the literal snake_case strings used on the wire
/// (e.g. "out_for_delivery").
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
	/// Order has been placed but not yet acknowledged by the store.
	Pending,
	/// Order has been acknowledged; the canonical initial status at checkout.
	Confirmed,
	/// Order is being prepared.
	Preparing,
	/// Order is ready for pickup by a delivery agent.
	Ready,
	/// Order has left the store with an agent.
	OutForDelivery,
	/// Order has reached the customer.
	Delivered,
	/// Order was cancelled. A terminal status, not a deletion.
	Cancelled,
}

impl OrderStatus {
	/// Returns the wire representation of this status.
	pub fn as_str(&self) -> &'static str {
		match self {
			OrderStatus::Pending => "pending",
			OrderStatus::Confirmed => "confirmed",
			OrderStatus::Preparing => "preparing",
			OrderStatus::Ready => "ready",
			OrderStatus::OutForDelivery => "out_for_delivery",
			OrderStatus::Delivered => "delivered",
			OrderStatus::Cancelled => "cancelled",
		}
	}

	/// Whether an order in this status may still be cancelled by the customer.
	pub fn cancellable(&self) -> bool {
		matches!(self, OrderStatus::Pending | OrderStatus::Confirmed)
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for OrderStatus {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"pending" => Ok(OrderStatus::Pending),
			"confirmed" => Ok(OrderStatus::Confirmed),
			"preparing" => Ok(OrderStatus::Preparing),
			"ready" => Ok(OrderStatus::Ready),
			"out_for_delivery" => Ok(OrderStatus::OutForDelivery),
			"delivered" => Ok(OrderStatus::Delivered),
			"cancelled" => Ok(OrderStatus::Cancelled),
			other => Err(format!("unknown order status '{}'", other)),
		}
	}
}

/// One product-quantity-price tuple attached to an order.
///
/// The unit price is captured when the order is created and never
/// changes afterwards, independent of later catalog price changes.
/// `unit_price` is `None` when no price could be resolved at creation
/// time; the total calculator then falls back to the catalog price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
	/// Identifier of the ordered product.
	pub product_id: String,
	/// Product name captured at order time, for display.
	pub product_name: String,
	/// Ordered quantity. Always at least 1.
	pub quantity: u32,
	/// Unit price captured at order time, if it could be resolved.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub unit_price: Option<Decimal>,
	/// Optional pipe-delimited `key:value` customization payload,
	/// e.g. "size:12 servings|gluten_free:True|vegan:False".
	#[serde(skip_serializing_if = "Option::is_none")]
	pub customization: Option<String>,
}

/// One entry in an order's append-only status audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusRecord {
	/// The status the order entered.
	pub status: OrderStatus,
	/// When the transition happened.
	pub timestamp: DateTime<Utc>,
}

/// A customer order with its line items and status history.
///
/// Line items and history records are embedded in the order document:
/// they are exclusively owned by the order, and embedding them makes a
/// status mutation plus its history append a single atomic write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
	/// Unique identifier for this order.
	pub id: String,
	/// Identifier of the owning customer.
	pub customer_id: String,
	/// Timestamp when this order was created. Immutable.
	pub created_at: DateTime<Utc>,
	/// Timestamp when this order was last saved. Refreshed on every save.
	pub updated_at: DateTime<Utc>,
	/// Current status of the order.
	pub status: OrderStatus,
	/// Estimated delivery time, when known.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub estimated_delivery: Option<DateTime<Utc>>,
	/// Identifier of the assigned delivery agent, when one was available.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub agent_id: Option<String>,
	/// Line items, created in bulk at order creation and never mutated.
	pub items: Vec<LineItem>,
	/// Append-only status history, ascending by timestamp. The first
	/// entry always carries the order's initial status.
	pub history: Vec<StatusRecord>,
}

/// Category of an order alert.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
	/// Delivery is running late.
	Delayed,
	/// A problem occurred with the order.
	Issue,
	/// The store cancelled the order.
	CancelledByStore,
}

impl fmt::Display for AlertType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			AlertType::Delayed => "delayed",
			AlertType::Issue => "issue",
			AlertType::CancelledByStore => "cancelled_by_store",
		};
		f.write_str(s)
	}
}

/// An alert raised against an order. Append-only, like status history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderAlert {
	/// Category of the alert.
	pub alert_type: AlertType,
	/// Human-readable alert message.
	pub message: String,
	/// When the alert was raised.
	pub timestamp: DateTime<Utc>,
}

/// Minimal read-only view of an order for polling clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackingView {
	/// Order identifier.
	pub id: String,
	/// Current status.
	pub status: OrderStatus,
	/// Estimated delivery time, when known.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub estimated_delivery: Option<DateTime<Utc>>,
	/// Last time the order was saved.
	pub updated_at: DateTime<Utc>,
}

impl Order {
	/// Builds the tracking projection for this order.
	pub fn tracking(&self) -> TrackingView {
		TrackingView {
			id: self.id.clone(),
			status: self.status,
			estimated_delivery: self.estimated_delivery,
			updated_at: self.updated_at,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn status_serializes_as_snake_case_strings() {
		let json = serde_json::to_string(&OrderStatus::OutForDelivery).unwrap();
		assert_eq!(json, "\"out_for_delivery\"");
		let back: OrderStatus = serde_json::from_str("\"cancelled\"").unwrap();
		assert_eq!(back, OrderStatus::Cancelled);
	}

	#[test]
	fn status_display_matches_wire_format() {
		for status in [
			OrderStatus::Pending,
			OrderStatus::Confirmed,
			OrderStatus::Preparing,
			OrderStatus::Ready,
			OrderStatus::OutForDelivery,
			OrderStatus::Delivered,
			OrderStatus::Cancelled,
		] {
			assert_eq!(status.to_string().parse::<OrderStatus>().unwrap(), status);
		}
	}

	#[test]
	fn only_pending_and_confirmed_are_cancellable() {
		assert!(OrderStatus::Pending.cancellable());
		assert!(OrderStatus::Confirmed.cancellable());
		assert!(!OrderStatus::Preparing.cancellable());
		assert!(!OrderStatus::Ready.cancellable());
		assert!(!OrderStatus::OutForDelivery.cancellable());
		assert!(!OrderStatus::Delivered.cancellable());
		assert!(!OrderStatus::Cancelled.cancellable());
	}
}
