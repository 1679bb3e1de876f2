//! HTTP server for the delight order API.
//!
//! This module provides the HTTP server infrastructure: shared state,
//! routing, and middleware. The handlers themselves live under `apis`.

use crate::apis;
use axum::{
	routing::{get, post, put},
	Router,
};
use delight_agent::AgentService;
use delight_catalog::CatalogService;
use delight_config::ApiConfig;
use delight_order::OrderService;
use delight_storage::StorageService;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Order lifecycle operations.
	pub orders: Arc<OrderService>,
	/// Delivery agent roster.
	pub agents: Arc<AgentService>,
	/// Read-only product catalog.
	pub catalog: Arc<CatalogService>,
	/// Shared storage, kept for seeding demo data.
	pub storage: Arc<StorageService>,
}

/// Starts the HTTP server for the API.
///
/// This function creates and configures the HTTP server with routing,
/// middleware, and error handling for all endpoints.
pub async fn start_server(
	api_config: ApiConfig,
	state: AppState,
) -> Result<(), Box<dyn std::error::Error>> {
	// Build the router with /api base path
	let app = Router::new()
		.nest(
			"/api",
			Router::new()
				.route("/orders", post(apis::orders::create_order))
				.route("/orders/{id}", get(apis::orders::get_order))
				.route("/orders/{id}/status", post(apis::orders::set_status))
				.route("/orders/{id}/cancel", post(apis::orders::cancel_order))
				.route("/orders/{id}/history", get(apis::orders::get_history))
				.route("/orders/{id}/tracking", get(apis::orders::get_tracking))
				.route("/orders/{id}/total", get(apis::orders::get_total))
				.route(
					"/orders/{id}/alerts",
					get(apis::orders::get_alerts).post(apis::orders::add_alert),
				)
				.route("/agents", get(apis::agents::list_agents))
				.route("/agents/available", get(apis::agents::available_agents))
				.route("/agents/{id}/location", put(apis::agents::set_location))
				.route("/products", get(apis::catalog::list_products))
				.route("/products/{id}", get(apis::catalog::get_product))
				.route("/analytics/sales", get(apis::orders::sales_summary)),
		)
		.layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
		.with_state(state);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Delight API server starting on {}", bind_address);

	axum::serve(listener, app).await?;

	Ok(())
}
