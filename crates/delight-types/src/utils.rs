//! Small shared helpers.

/// Truncates an id to its first 8 characters for log display.
pub fn truncate_id(id: &str) -> String {
	if id.len() <= 8 {
		id.to_string()
	} else {
		format!("{}..", &id[..8])
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn truncate_id_shortens_long_ids() {
		assert_eq!(truncate_id("abcd"), "abcd");
		assert_eq!(truncate_id("0123456789abcdef"), "01234567..");
	}
}
