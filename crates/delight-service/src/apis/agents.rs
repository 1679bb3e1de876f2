//! Delivery agent endpoint handlers.

use crate::server::AppState;
use axum::{
	extract::{Path, State},
	response::Json,
};
use delight_types::{AgentLocationRequest, ApiError, DeliveryAgent};

/// Handles GET /api/agents requests.
pub async fn list_agents(
	State(state): State<AppState>,
) -> Result<Json<Vec<DeliveryAgent>>, ApiError> {
	let agents = state.agents.list().await?;
	Ok(Json(agents))
}

/// Handles GET /api/agents/available requests.
pub async fn available_agents(
	State(state): State<AppState>,
) -> Result<Json<Vec<DeliveryAgent>>, ApiError> {
	let agents = state.agents.available().await?;
	Ok(Json(agents))
}

/// Handles PUT /api/agents/{id}/location requests.
///
/// Free-text location updates from agents in the field, surfaced by
/// the tracking display.
pub async fn set_location(
	Path(id): Path<String>,
	State(state): State<AppState>,
	Json(request): Json<AgentLocationRequest>,
) -> Result<Json<DeliveryAgent>, ApiError> {
	let agent = state.agents.set_location(&id, request.location).await?;
	Ok(Json(agent))
}
