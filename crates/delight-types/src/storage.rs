//! Storage-related types for the delight backend.

use std::str::FromStr;

/// Storage namespaces for the persistent collections.
///
/// This enum provides type safety for storage operations by replacing
/// string literals with strongly typed variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
	/// Namespace for order documents (including embedded items and history)
	Orders,
	/// Namespace for order alert lists, keyed by order id
	Alerts,
	/// Namespace for catalog products
	Products,
	/// Namespace for delivery agents
	Agents,
	/// Namespace for customer records
	Customers,
}

impl StorageKey {
	/// Returns the string representation of the storage namespace.
	pub fn as_str(&self) -> &'static str {
		match self {
			StorageKey::Orders => "orders",
			StorageKey::Alerts => "alerts",
			StorageKey::Products => "products",
			StorageKey::Agents => "agents",
			StorageKey::Customers => "customers",
		}
	}

	/// Returns an iterator over all StorageKey variants.
	pub fn all() -> impl Iterator<Item = Self> {
		[
			Self::Orders,
			Self::Alerts,
			Self::Products,
			Self::Agents,
			Self::Customers,
		]
		.into_iter()
	}
}

impl FromStr for StorageKey {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"orders" => Ok(Self::Orders),
			"alerts" => Ok(Self::Alerts),
			"products" => Ok(Self::Products),
			"agents" => Ok(Self::Agents),
			"customers" => Ok(Self::Customers),
			_ => Err(()),
		}
	}
}

impl From<StorageKey> for &'static str {
	fn from(key: StorageKey) -> Self {
		key.as_str()
	}
}
