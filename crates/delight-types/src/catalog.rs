//! Catalog types: products and their current list prices.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product in the catalog.
///
/// The catalog price is the product's *current* list price. Orders
/// capture their own unit price at creation time; the catalog price is
/// only consulted as a fallback when a line item carries no usable price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
	/// Unique identifier for this product.
	pub id: String,
	/// Display name. Names starting with "custom" (case-insensitive)
	/// identify the build-your-own product priced by heuristic.
	pub name: String,
	/// Flavor label.
	pub flavor: String,
	/// Size label, e.g. "8 servings".
	pub size: String,
	/// Current list price.
	pub price: Decimal,
}
