//! Order total calculation.
//!
//! Totals are accumulated as decimals and rounded exactly once, at the
//! end, to 2 decimal places with round-half-up. Each line item resolves
//! its price independently: an explicit captured price wins, an unpriced
//! item falls back to the current catalog price, and an item whose price
//! cannot be resolved at all contributes zero instead of failing the
//! whole total.

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

/// Base price of a build-your-own product, sized for 8 servings.
const CUSTOM_BASE: i64 = 699;
/// Servings included in the base price.
const CUSTOM_BASE_SERVINGS: u32 = 8;
/// Surcharge per serving above the base size.
const CUSTOM_PER_EXTRA_SERVING: i64 = 50;
/// Flat surcharge for a gluten-free recipe.
const CUSTOM_GLUTEN_FREE: i64 = 60;
/// Flat surcharge for a vegan recipe.
const CUSTOM_VEGAN: i64 = 90;

/// Parses an explicit unit price from a request value.
///
/// Accepts a JSON number or a numeric string. Returns `None` for
/// anything malformed, non-positive, or absent; the caller then falls
/// through to the next price source rather than rejecting the request.
pub fn parse_price(value: Option<&Value>) -> Option<Decimal> {
	let raw = value?;
	let parsed = match raw {
		Value::Number(n) => n.to_string().parse::<Decimal>().ok(),
		Value::String(s) => s.trim().parse::<Decimal>().ok(),
		_ => None,
	};
	parsed.filter(|d| d.is_sign_positive() && !d.is_zero())
}

/// Parses a requested quantity from a request value.
///
/// Accepts a JSON number or a numeric string. Missing, zero, or
/// unparseable values default to 1 so a cart row always buys something.
pub fn parse_quantity(value: Option<&Value>) -> u32 {
	let parsed = match value {
		Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
		Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
		_ => None,
	};
	match parsed {
		Some(0) | None => 1,
		Some(q) => q,
	}
}

/// Whether a product name identifies the build-your-own product.
///
/// Names come from the catalog or straight from the request, so the
/// prefix check must tolerate arbitrary UTF-8.
pub fn is_custom_product(name: &str) -> bool {
	name.get(..6)
		.is_some_and(|prefix| prefix.eq_ignore_ascii_case("custom"))
}

/// Prices a build-your-own product from its customization payload.
///
/// The payload is a pipe-delimited list of `key:value` pairs, e.g.
/// `size:12 servings|gluten_free:True|vegan:False`. Pricing starts from
/// a fixed base covering 8 servings and adds a per-serving surcharge
/// above that plus flat surcharges for dietary options. Unknown keys
/// and malformed segments are ignored; an unreadable size falls back to
/// the base serving count.
pub fn custom_price(customization: &str) -> Decimal {
	let mut servings = CUSTOM_BASE_SERVINGS;
	let mut gluten_free = false;
	let mut vegan = false;

	for segment in customization.split('|') {
		let Some((key, value)) = segment.split_once(':') else {
			continue;
		};
		let value = value.trim();
		match key.trim().to_ascii_lowercase().as_str() {
			"size" => {
				// Value looks like "12 servings"; the leading integer is
				// the part that matters.
				if let Some(n) = value
					.split_whitespace()
					.next()
					.and_then(|w| w.parse::<u32>().ok())
				{
					servings = n;
				}
			},
			"gluten_free" => gluten_free = value.eq_ignore_ascii_case("true"),
			"vegan" => vegan = value.eq_ignore_ascii_case("true"),
			_ => {},
		}
	}

	let extra = servings.saturating_sub(CUSTOM_BASE_SERVINGS);
	let mut price = Decimal::from(CUSTOM_BASE)
		+ Decimal::from(CUSTOM_PER_EXTRA_SERVING) * Decimal::from(extra);
	if gluten_free {
		price += Decimal::from(CUSTOM_GLUTEN_FREE);
	}
	if vegan {
		price += Decimal::from(CUSTOM_VEGAN);
	}
	price
}

/// Resolves the unit price a line item contributes to the total.
///
/// The captured price wins; an unpriced item uses the catalog price;
/// an item with neither contributes zero.
pub fn effective_unit_price(captured: Option<Decimal>, catalog: Option<Decimal>) -> Decimal {
	captured.or(catalog).unwrap_or(Decimal::ZERO)
}

/// Rounds a completed total to 2 decimal places, round-half-up.
pub fn round_total(total: Decimal) -> Decimal {
	total.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn parse_price_accepts_numbers_and_numeric_strings() {
		assert_eq!(parse_price(Some(&json!(500))), Some(Decimal::from(500)));
		assert_eq!(
			parse_price(Some(&json!("12.50"))),
			Some("12.50".parse().unwrap())
		);
	}

	#[test]
	fn parse_price_rejects_malformed_zero_and_negative() {
		assert_eq!(parse_price(Some(&json!("bad"))), None);
		assert_eq!(parse_price(Some(&json!(0))), None);
		assert_eq!(parse_price(Some(&json!(-5))), None);
		assert_eq!(parse_price(Some(&json!(null))), None);
		assert_eq!(parse_price(None), None);
	}

	#[test]
	fn parse_quantity_defaults_to_one() {
		assert_eq!(parse_quantity(Some(&json!(3))), 3);
		assert_eq!(parse_quantity(Some(&json!("2"))), 2);
		assert_eq!(parse_quantity(Some(&json!(0))), 1);
		assert_eq!(parse_quantity(Some(&json!("lots"))), 1);
		assert_eq!(parse_quantity(None), 1);
	}

	#[test]
	fn custom_product_is_detected_by_name_prefix() {
		assert!(is_custom_product("Custom Cake"));
		assert!(is_custom_product("CUSTOMIZED TREAT"));
		assert!(!is_custom_product("Chocolate Fudge"));
		assert!(!is_custom_product("cus"));
	}

	#[test]
	fn custom_product_check_handles_multibyte_names() {
		// A multibyte character straddling the prefix boundary must not panic.
		assert!(!is_custom_product("Fraisé Cake"));
		assert!(!is_custom_product("Gâteau"));
		assert!(!is_custom_product("五層チョコケーキ"));
	}

	#[test]
	fn custom_price_adds_serving_and_dietary_surcharges() {
		// 699 base + 4 extra servings * 50 + gluten-free 60
		assert_eq!(
			custom_price("size:12 servings|gluten_free:True|vegan:False"),
			Decimal::from(959)
		);
		// Base size, no options
		assert_eq!(custom_price("size:8 servings"), Decimal::from(699));
		// Smaller-than-base sizes do not discount
		assert_eq!(custom_price("size:6 servings"), Decimal::from(699));
		// Vegan only
		assert_eq!(custom_price("vegan:True"), Decimal::from(789));
	}

	#[test]
	fn custom_price_ignores_malformed_segments() {
		assert_eq!(
			custom_price("size:many servings|nonsense|flavor:chocolate"),
			Decimal::from(699)
		);
		assert_eq!(custom_price(""), Decimal::from(699));
	}

	#[test]
	fn effective_price_prefers_captured_then_catalog_then_zero() {
		let captured = Some(Decimal::from(500));
		let catalog = Some(Decimal::from(350));
		assert_eq!(effective_unit_price(captured, catalog), Decimal::from(500));
		assert_eq!(effective_unit_price(None, catalog), Decimal::from(350));
		assert_eq!(effective_unit_price(None, None), Decimal::ZERO);
	}

	#[test]
	fn totals_accumulate_before_rounding() {
		// Two unpriced items at catalog 499 plus one at catalog 350.
		let total = effective_unit_price(None, Some(Decimal::from(499))) * Decimal::from(2)
			+ effective_unit_price(None, Some(Decimal::from(350)));
		assert_eq!(round_total(total), "1348.00".parse().unwrap());

		// A malformed price degrades to zero, not an error.
		let total = effective_unit_price(parse_price(Some(&json!("bad"))), None)
			+ effective_unit_price(Some(Decimal::from(500)), None) * Decimal::from(2);
		assert_eq!(round_total(total), "1000.00".parse().unwrap());
	}

	#[test]
	fn rounding_is_half_up_at_two_places() {
		assert_eq!(
			round_total("10.005".parse().unwrap()),
			"10.01".parse::<Decimal>().unwrap()
		);
		assert_eq!(
			round_total("10.004".parse().unwrap()),
			"10.00".parse::<Decimal>().unwrap()
		);
	}
}
