use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use clipmark::config::{CONFIG_FILE_NAME, CONFIG_TEMPLATE, load_config, user_config_path};
use clipmark::rewrite::{RewriteEngine, RewriteMode};
use clipmark::watch::{ClipboardMonitor, SystemClipboard, TickOutcome};

#[derive(Parser)]
#[command(name = "clipmark")]
#[command(
	author,
	version,
	about = "Clipboard watcher that marks Figma links with a VPN/proxy prefix"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Watch the clipboard and rewrite Figma links as they appear
	Watch {
		/// Poll interval in milliseconds (overrides config)
		#[arg(long, value_name = "MILLIS")]
		interval_ms: Option<u64>,

		/// Rewrite policy: grouped or global (overrides config)
		#[arg(long, value_name = "MODE")]
		mode: Option<RewriteMode>,

		/// Use this config file instead of the usual discovery
		#[arg(long, value_name = "PATH")]
		config: Option<PathBuf>,

		/// Start with monitoring switched off
		#[arg(long)]
		disabled: bool,
	},

	/// Rewrite text from stdin to stdout once
	Rewrite {
		/// Rewrite policy: grouped or global
		#[arg(long, value_name = "MODE")]
		mode: Option<RewriteMode>,
	},

	/// Create a template .clipmark.toml in the current directory
	Init {
		/// Overwrite an existing .clipmark.toml
		#[arg(long)]
		force: bool,
	},

	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display the effective configuration and where it came from
	Show,
	/// Check the discovered config file for errors
	Validate,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	init_tracing();

	let cli = Cli::parse();

	match cli.command {
		Commands::Watch {
			interval_ms,
			mode,
			config,
			disabled,
		} => handle_watch(interval_ms, mode, config.as_deref(), disabled),
		Commands::Rewrite { mode } => handle_rewrite(mode),
		Commands::Init { force } => handle_init(force),
		Commands::Config { action } => match action {
			ConfigAction::Show => handle_config_show(),
			ConfigAction::Validate => handle_config_validate(),
		},
	}
}

fn init_tracing() {
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("clipmark=info"));

	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(std::io::stderr)
		.init();
}

fn handle_watch(
	interval_ms: Option<u64>,
	mode: Option<RewriteMode>,
	config_path: Option<&std::path::Path>,
	disabled: bool,
) -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let resolved = load_config(config_path, &cwd).context("Failed to load configuration")?;

	let mut config = resolved.config;
	if let Some(ms) = interval_ms {
		config.poll_interval_ms = ms;
	}
	if let Some(mode) = mode {
		config.mode = mode;
	}
	config.validate().context("Invalid configuration")?;

	let engine = RewriteEngine::with_mode(config.mode)?;
	let source = SystemClipboard::new().context("Failed to open system clipboard")?;
	let mut monitor = ClipboardMonitor::new(source, engine);
	monitor.set_enabled(config.enabled && !disabled);

	info!(
		interval_ms = config.poll_interval_ms,
		mode = %config.mode,
		enabled = monitor.is_enabled(),
		source = %resolved
			.source
			.as_deref()
			.map(|p| p.display().to_string())
			.unwrap_or_else(|| "defaults".to_string()),
		"watching clipboard"
	);

	let interval = config.poll_interval();
	loop {
		match monitor.tick() {
			Ok(TickOutcome::Rewritten) => info!("clipboard rewritten"),
			Ok(outcome) => debug!(?outcome, "tick"),
			// Clipboard hiccups are transient; keep polling.
			Err(e) => warn!(error = %e, "tick failed"),
		}
		std::thread::sleep(interval);
	}
}

fn handle_rewrite(mode: Option<RewriteMode>) -> Result<ExitCode> {
	let engine = RewriteEngine::with_mode(mode.unwrap_or_default())?;

	let text = std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")?;
	let rewritten = engine.rewrite(&text);

	std::io::stdout()
		.write_all(rewritten.as_bytes())
		.context("Failed to write stdout")?;

	Ok(ExitCode::SUCCESS)
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!(".clipmark.toml already exists. Use --force to overwrite.");
	}

	std::fs::write(&config_path, CONFIG_TEMPLATE)
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created .clipmark.toml");
	Ok(ExitCode::SUCCESS)
}

fn handle_config_show() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let resolved = load_config(None, &cwd).context("Failed to load configuration")?;

	match resolved.source {
		Some(ref path) => println!("# Source: {}", path.display()),
		None => println!("# Source: built-in defaults"),
	}
	println!("poll-interval-ms = {}", resolved.config.poll_interval_ms);
	println!("enabled = {}", resolved.config.enabled);
	println!("mode = \"{}\"", resolved.config.mode);
	println!();

	if let Ok(user_path) = user_config_path() {
		println!("User config path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	match load_config(None, &cwd) {
		Ok(resolved) => {
			match resolved.source {
				Some(path) => println!("Configuration is valid: {}", path.display()),
				None => println!("No configuration files found; defaults apply."),
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {}", e);
			Ok(ExitCode::FAILURE)
		}
	}
}
