//! Command line entry point for the oracle roster.
//!
//! Loads the feed configuration and an aggregator state snapshot, derives the
//! ordered oracle views for the round and prints them as JSON on stdout.

use clap::Parser;
use feeds_config::Config;
use feeds_core::{DeriveOptions, OracleViewDeriver};
use feeds_types::{DerivedOracleView, RoundSummary};
use std::path::PathBuf;

mod snapshot;

/// Command-line arguments for the roster tool.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Path to the JSON snapshot of the aggregator state
	#[arg(short, long, env = "FEEDS_SNAPSHOT")]
	snapshot: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,

	/// Pretty-print the JSON output
	#[arg(long)]
	pretty: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	// Logs go to stderr so stdout only carries the derived views
	fmt()
		.with_env_filter(env_filter)
		.with_target(true)
		.with_writer(std::io::stderr)
		.init();

	let config_path = args
		.config
		.to_str()
		.ok_or("Configuration path is not valid UTF-8")?;
	let config = Config::from_file(config_path).await?;
	tracing::info!(
		oracles = config.oracles.len(),
		"Loaded configuration [{}]",
		config.feeds.id
	);

	let snapshot = snapshot::load_snapshot(&args.snapshot).await?;
	let snapshot = snapshot::with_configured_directory(snapshot, config.oracle_directory());

	let deriver = OracleViewDeriver::new(derive_options(&config));
	let views = deriver.derive(&snapshot);

	let summary = RoundSummary::from_views(&views);
	tracing::info!(
		pending_answer_id = snapshot.pending_answer_id,
		total = summary.total,
		fulfilled = summary.fulfilled,
		pending = summary.pending,
		"Derived oracle roster"
	);

	println!("{}", render(&views, args.pretty)?);
	Ok(())
}

fn derive_options(config: &Config) -> DeriveOptions {
	DeriveOptions {
		unknown_name: config.feeds.unknown_name.clone(),
	}
}

fn render(views: &[DerivedOracleView], pretty: bool) -> Result<String, serde_json::Error> {
	if pretty {
		serde_json::to_string_pretty(views)
	} else {
		serde_json::to_string(views)
	}
}
