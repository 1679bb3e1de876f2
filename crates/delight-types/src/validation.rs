//! Configuration validation types for the delight backend.
//!
//! Pluggable implementations receive their configuration as raw TOML
//! sections. Each implementation describes the fields it expects with a
//! small schema, which the service validates before constructing the
//! implementation. Parse errors then point at the offending field rather
//! than surfacing later as a missing-value panic.

use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Debug, Error)]
pub enum ValidationError {
	/// A required field is absent from the configuration section.
	#[error("Missing required field: {0}")]
	MissingField(String),
	/// A field is present but its value fails validation.
	#[error("Invalid value for field '{field}': {message}")]
	InvalidValue { field: String, message: String },
	/// A field has the wrong TOML type.
	#[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
	TypeMismatch {
		field: String,
		expected: String,
		actual: String,
	},
}

/// Expected type of a configuration field.
#[derive(Debug)]
pub enum FieldType {
	/// A string value.
	String,
	/// An integer value with optional inclusive bounds.
	Integer { min: Option<i64>, max: Option<i64> },
	/// A boolean value.
	Boolean,
}

/// Type alias for custom per-field validator functions.
pub type FieldValidator = Box<dyn Fn(&toml::Value) -> Result<(), String> + Send + Sync>;

/// One field in a configuration schema.
pub struct Field {
	pub name: String,
	pub field_type: FieldType,
	pub validator: Option<FieldValidator>,
}

impl std::fmt::Debug for Field {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Field")
			.field("name", &self.name)
			.field("field_type", &self.field_type)
			.field("validator", &self.validator.is_some())
			.finish()
	}
}

impl Field {
	/// Creates a new field with the given name and expected type.
	pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
		Self {
			name: name.into(),
			field_type,
			validator: None,
		}
	}

	/// Attaches a custom validator that runs after the type check.
	pub fn with_validator<F>(mut self, validator: F) -> Self
	where
		F: Fn(&toml::Value) -> Result<(), String> + Send + Sync + 'static,
	{
		self.validator = Some(Box::new(validator));
		self
	}
}

/// A validation schema: required fields that must be present and
/// optional fields that are checked only when present.
#[derive(Debug)]
pub struct Schema {
	pub required: Vec<Field>,
	pub optional: Vec<Field>,
}

impl Schema {
	/// Creates a new schema from required and optional fields.
	pub fn new(required: Vec<Field>, optional: Vec<Field>) -> Self {
		Self { required, optional }
	}

	/// Validates a TOML section against this schema.
	///
	/// Checks presence of required fields, the type of every known
	/// field, and runs custom validators where attached.
	pub fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let table = config
			.as_table()
			.ok_or_else(|| ValidationError::TypeMismatch {
				field: "root".to_string(),
				expected: "table".to_string(),
				actual: config.type_str().to_string(),
			})?;

		for field in &self.required {
			let value = table
				.get(&field.name)
				.ok_or_else(|| ValidationError::MissingField(field.name.clone()))?;
			check_field(field, value)?;
		}

		for field in &self.optional {
			if let Some(value) = table.get(&field.name) {
				check_field(field, value)?;
			}
		}

		Ok(())
	}
}

fn check_field(field: &Field, value: &toml::Value) -> Result<(), ValidationError> {
	match &field.field_type {
		FieldType::String => {
			if !value.is_str() {
				return Err(mismatch(&field.name, "string", value));
			}
		},
		FieldType::Integer { min, max } => {
			let n = value
				.as_integer()
				.ok_or_else(|| mismatch(&field.name, "integer", value))?;
			if let Some(lo) = min {
				if n < *lo {
					return Err(ValidationError::InvalidValue {
						field: field.name.clone(),
						message: format!("Value {} is less than minimum {}", n, lo),
					});
				}
			}
			if let Some(hi) = max {
				if n > *hi {
					return Err(ValidationError::InvalidValue {
						field: field.name.clone(),
						message: format!("Value {} is greater than maximum {}", n, hi),
					});
				}
			}
		},
		FieldType::Boolean => {
			if !value.is_bool() {
				return Err(mismatch(&field.name, "boolean", value));
			}
		},
	}

	if let Some(validator) = &field.validator {
		validator(value).map_err(|message| ValidationError::InvalidValue {
			field: field.name.clone(),
			message,
		})?;
	}

	Ok(())
}

fn mismatch(field: &str, expected: &str, value: &toml::Value) -> ValidationError {
	ValidationError::TypeMismatch {
		field: field.to_string(),
		expected: expected.to_string(),
		actual: value.type_str().to_string(),
	}
}

/// Trait for implementation-specific configuration schemas.
///
/// Every pluggable implementation returns one of these so the service
/// can validate its TOML section before construction.
pub trait ConfigSchema: Send + Sync {
	/// Validates a TOML configuration value against this schema.
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(s: &str) -> toml::Value {
		toml::from_str(s).unwrap()
	}

	#[test]
	fn missing_required_field_is_reported() {
		let schema = Schema::new(vec![Field::new("url", FieldType::String)], vec![]);
		let err = schema.validate(&parse("other = 1")).unwrap_err();
		assert!(matches!(err, ValidationError::MissingField(f) if f == "url"));
	}

	#[test]
	fn integer_bounds_are_enforced() {
		let schema = Schema::new(
			vec![Field::new(
				"port",
				FieldType::Integer {
					min: Some(1),
					max: Some(65535),
				},
			)],
			vec![],
		);
		assert!(schema.validate(&parse("port = 8080")).is_ok());
		assert!(schema.validate(&parse("port = 0")).is_err());
		assert!(schema.validate(&parse("port = 70000")).is_err());
	}

	#[test]
	fn custom_validator_runs_after_type_check() {
		let schema = Schema::new(
			vec![
				Field::new("url", FieldType::String).with_validator(|v| {
					let s = v.as_str().unwrap_or_default();
					if s.starts_with("http://") || s.starts_with("https://") {
						Ok(())
					} else {
						Err("must start with http:// or https://".to_string())
					}
				}),
			],
			vec![],
		);
		assert!(schema.validate(&parse("url = \"https://x\"")).is_ok());
		assert!(schema.validate(&parse("url = \"ftp://x\"")).is_err());
	}
}
