//! API types for HTTP endpoints and request/response structures.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{AlertType, OrderStatus};

/// Request body for creating an order from a validated cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
	/// Identifier of the ordering customer.
	pub customer_id: String,
	/// Line items from the cart. Must be non-empty.
	pub items: Vec<NewLineItem>,
}

/// One line item in an order creation request.
///
/// `quantity` and `unit_price` are accepted as arbitrary JSON values and
/// parsed leniently: a malformed price degrades to "unpriced" (catalog
/// fallback, then zero contribution) instead of rejecting the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLineItem {
	/// Identifier of the ordered product.
	pub product_id: String,
	/// Ordered quantity. Missing or invalid values default to 1.
	#[serde(default)]
	pub quantity: Option<serde_json::Value>,
	/// Explicit unit price, as a JSON number or numeric string.
	#[serde(default)]
	pub unit_price: Option<serde_json::Value>,
	/// Optional pipe-delimited customization payload.
	#[serde(default)]
	pub customization: Option<String>,
}

/// Request body for setting an order's status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetStatusRequest {
	/// The status to move the order to.
	pub status: OrderStatus,
}

/// Request body for raising an order alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAlertRequest {
	/// Category of the alert.
	pub alert_type: AlertType,
	/// Human-readable alert message.
	pub message: String,
}

/// Request body for updating a delivery agent's location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentLocationRequest {
	/// Free-text location description.
	pub location: String,
}

/// Response body for the order total endpoint.
///
/// The total is exposed as a plain JSON number; internally it is
/// accumulated as a decimal and only converted at this boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalResponse {
	/// Order identifier.
	pub order_id: String,
	/// Total rounded to 2 decimal places, round-half-up.
	pub total: f64,
}

/// Response body for the sales summary endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesSummary {
	/// Sum of order totals across non-cancelled orders.
	pub total_sales: f64,
	/// Number of non-cancelled orders.
	pub total_orders: u64,
}

/// JSON error body returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Machine-readable error kind.
	pub error: String,
	/// Human-readable reason.
	pub message: String,
}

/// Errors surfaced by the HTTP API.
#[derive(Debug)]
pub enum ApiError {
	/// Malformed or unacceptable request (400).
	BadRequest { error: String, message: String },
	/// Requested entity does not exist (404).
	NotFound { message: String },
	/// Unexpected failure (500).
	Internal { message: String },
}

impl ApiError {
	/// Shorthand for a 400 with the given error kind and reason.
	pub fn bad_request(error: impl Into<String>, message: impl Into<String>) -> Self {
		ApiError::BadRequest {
			error: error.into(),
			message: message.into(),
		}
	}

	/// Shorthand for a 404.
	pub fn not_found(message: impl Into<String>) -> Self {
		ApiError::NotFound {
			message: message.into(),
		}
	}

	/// Shorthand for a 500.
	pub fn internal(message: impl Into<String>) -> Self {
		ApiError::Internal {
			message: message.into(),
		}
	}
}

impl fmt::Display for ApiError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ApiError::BadRequest { message, .. } => write!(f, "Bad Request: {}", message),
			ApiError::NotFound { message } => write!(f, "Not Found: {}", message),
			ApiError::Internal { message } => write!(f, "Internal Server Error: {}", message),
		}
	}
}

impl std::error::Error for ApiError {}

impl axum::response::IntoResponse for ApiError {
	fn into_response(self) -> axum::response::Response {
		use axum::{http::StatusCode, response::Json};

		let (status, body) = match self {
			ApiError::BadRequest { error, message } => {
				(StatusCode::BAD_REQUEST, ErrorResponse { error, message })
			},
			ApiError::NotFound { message } => (
				StatusCode::NOT_FOUND,
				ErrorResponse {
					error: "not_found".to_string(),
					message,
				},
			),
			ApiError::Internal { message } => (
				StatusCode::INTERNAL_SERVER_ERROR,
				ErrorResponse {
					error: "internal".to_string(),
					message,
				},
			),
		};

		(status, Json(body)).into_response()
	}
}
