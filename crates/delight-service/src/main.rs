//! Main entry point for the delight order service.
//!
//! This binary wires the configured storage, catalog, agent roster, and
//! notifier implementations into the order service and exposes it over
//! HTTP. It uses a modular architecture with pluggable implementations
//! for each component.

use clap::Parser;
use delight_agent::AgentService;
use delight_catalog::CatalogService;
use delight_config::Config;
use delight_notify::NotifyService;
use delight_order::OrderService;
use delight_storage::StorageService;
use std::path::PathBuf;
use std::sync::Arc;

mod apis;
mod seed;
mod server;

/// Command-line arguments for the delight service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,

	/// Populate storage with demo products, agents, and a customer
	#[arg(long)]
	seed: bool,
}

/// Main entry point for the delight service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds the order service from the configured implementations
/// 5. Serves the HTTP API until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	let config_path = args
		.config
		.to_str()
		.ok_or("Configuration path is not valid UTF-8")?;
	let config = Config::from_file(config_path).await?;
	tracing::info!("Loaded configuration [{}]", config.service.id);

	let state = build_state(&config)?;

	if args.seed {
		seed::seed_demo_data(&state.storage).await?;
	}

	let api_enabled = config.api.as_ref().is_some_and(|api| api.enabled);
	match (api_enabled, config.api) {
		(true, Some(api_config)) => {
			server::start_server(api_config, state).await?;
		},
		_ => {
			tracing::warn!("API server disabled in configuration; nothing left to do");
		},
	}

	tracing::info!("Stopped service");
	Ok(())
}

/// Resolves one component's primary implementation from its factory list.
fn pick_factory<F: Copy>(
	component: &str,
	primary: &str,
	implementations: &std::collections::HashMap<String, toml::Value>,
	factories: &[(&'static str, F)],
) -> Result<(F, toml::Value), Box<dyn std::error::Error>> {
	let factory = factories
		.iter()
		.find(|(name, _)| *name == primary)
		.map(|(_, factory)| *factory)
		.ok_or_else(|| format!("Unknown {} implementation '{}'", component, primary))?;
	let section = implementations
		.get(primary)
		.cloned()
		.ok_or_else(|| format!("No configuration for {} implementation '{}'", component, primary))?;
	Ok((factory, section))
}

/// Builds the application state from the configured implementations.
fn build_state(config: &Config) -> Result<server::AppState, Box<dyn std::error::Error>> {
	let (storage_factory, storage_section) = pick_factory(
		"storage",
		&config.storage.primary,
		&config.storage.implementations,
		&delight_storage::get_all_implementations(),
	)?;
	let storage = Arc::new(StorageService::new(storage_factory(&storage_section)?));

	let (catalog_factory, catalog_section) = pick_factory(
		"catalog",
		&config.catalog.primary,
		&config.catalog.implementations,
		&delight_catalog::get_all_implementations(),
	)?;
	let catalog = Arc::new(CatalogService::new(catalog_factory(
		&catalog_section,
		storage.clone(),
	)?));

	let (agent_factory, agent_section) = pick_factory(
		"agent",
		&config.agent.primary,
		&config.agent.implementations,
		&delight_agent::get_all_implementations(),
	)?;
	let agents = Arc::new(AgentService::new(agent_factory(
		&agent_section,
		storage.clone(),
	)?));

	let (notify_factory, notify_section) = pick_factory(
		"notifier",
		&config.notifier.primary,
		&config.notifier.implementations,
		&delight_notify::get_all_implementations(),
	)?;
	let notifier = Arc::new(NotifyService::new(notify_factory(&notify_section)?));

	let orders = Arc::new(OrderService::new(
		storage.clone(),
		catalog.clone(),
		agents.clone(),
		notifier,
		config.order.estimated_delivery_minutes,
	));

	Ok(server::AppState {
		orders,
		agents,
		catalog,
		storage,
	})
}
