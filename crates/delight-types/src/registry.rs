//! Registry trait for self-registering implementations.
//!
//! This module provides the base trait that all pluggable implementations
//! must implement to register themselves with their configuration name
//! and factory function.

/// Base trait for implementation registries.
///
/// Each implementation module (storage, catalog, agent, notifier) must
/// provide a Registry struct that implements this trait, so that every
/// implementation declares its configuration name and factory function.
pub trait ImplementationRegistry {
	/// The name used in configuration files to reference this implementation.
	///
	/// This should match the key used in the TOML configuration, for example:
	/// - "memory" for storage.implementations.memory
	/// - "log" for notifier.implementations.log
	const NAME: &'static str;

	/// The factory function type this implementation provides.
	///
	/// Each module defines its own factory type, for example
	/// StorageFactory for storage backends or NotifyFactory for notifiers.
	type Factory;

	/// Get the factory function for this implementation.
	fn factory() -> Self::Factory;
}
