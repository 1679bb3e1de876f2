//! Order endpoint handlers.

use crate::server::AppState;
use axum::{
	extract::{Path, State},
	response::Json,
};
use delight_types::{
	ApiError, CreateOrderRequest, NewAlertRequest, Order, OrderAlert, SalesSummary,
	SetStatusRequest, StatusRecord, TotalResponse, TrackingView,
};
use rust_decimal::prelude::ToPrimitive;

/// Handles POST /api/orders requests.
///
/// Creates an order from a validated cart. An empty cart is rejected
/// with a 400; a malformed item price is not an error, the item just
/// falls through the price source chain.
pub async fn create_order(
	State(state): State<AppState>,
	Json(request): Json<CreateOrderRequest>,
) -> Result<Json<Order>, ApiError> {
	let order = state.orders.create_order(request).await?;
	Ok(Json(order))
}

/// Handles GET /api/orders/{id} requests.
pub async fn get_order(
	Path(id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<Order>, ApiError> {
	let order = state.orders.get(&id).await?;
	Ok(Json(order))
}

/// Handles POST /api/orders/{id}/status requests.
pub async fn set_status(
	Path(id): Path<String>,
	State(state): State<AppState>,
	Json(request): Json<SetStatusRequest>,
) -> Result<Json<Order>, ApiError> {
	let order = state.orders.set_status(&id, request.status).await?;
	Ok(Json(order))
}

/// Handles POST /api/orders/{id}/cancel requests.
///
/// Customer cancellation; rejected with a 400 once preparation has
/// started.
pub async fn cancel_order(
	Path(id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<Order>, ApiError> {
	let order = state.orders.cancel(&id).await?;
	Ok(Json(order))
}

/// Handles GET /api/orders/{id}/history requests.
pub async fn get_history(
	Path(id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<Vec<StatusRecord>>, ApiError> {
	let history = state.orders.history(&id).await?;
	Ok(Json(history))
}

/// Handles GET /api/orders/{id}/tracking requests.
pub async fn get_tracking(
	Path(id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<TrackingView>, ApiError> {
	let tracking = state.orders.tracking(&id).await?;
	Ok(Json(tracking))
}

/// Handles GET /api/orders/{id}/total requests.
pub async fn get_total(
	Path(id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<TotalResponse>, ApiError> {
	let total = state.orders.total(&id).await?;
	Ok(Json(TotalResponse {
		order_id: id,
		total: total.to_f64().unwrap_or(0.0),
	}))
}

/// Handles GET /api/orders/{id}/alerts requests.
pub async fn get_alerts(
	Path(id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<Vec<OrderAlert>>, ApiError> {
	let alerts = state.orders.alerts(&id).await?;
	Ok(Json(alerts))
}

/// Handles POST /api/orders/{id}/alerts requests.
pub async fn add_alert(
	Path(id): Path<String>,
	State(state): State<AppState>,
	Json(request): Json<NewAlertRequest>,
) -> Result<Json<OrderAlert>, ApiError> {
	let alert = state
		.orders
		.add_alert(&id, request.alert_type, request.message)
		.await?;
	Ok(Json(alert))
}

/// Handles GET /api/analytics/sales requests.
pub async fn sales_summary(
	State(state): State<AppState>,
) -> Result<Json<SalesSummary>, ApiError> {
	let summary = state.orders.sales_summary().await?;
	Ok(Json(summary))
}
