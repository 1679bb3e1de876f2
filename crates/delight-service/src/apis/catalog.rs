//! Product catalog endpoint handlers.

use crate::server::AppState;
use axum::{
	extract::{Path, State},
	response::Json,
};
use delight_types::{ApiError, Product};

/// Handles GET /api/products requests.
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
	let products = state.catalog.list().await?;
	Ok(Json(products))
}

/// Handles GET /api/products/{id} requests.
pub async fn get_product(
	Path(id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<Product>, ApiError> {
	let product = state.catalog.product(&id).await?;
	Ok(Json(product))
}
