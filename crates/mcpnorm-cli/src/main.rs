//! mcpnorm - MCP server configuration normalizer
//!
//! Usage:
//!   mcpnorm normalize fs.json --name filesystem
//!   mcpnorm inspect fs.json
//!   mcpnorm collect --config ./mcpnorm.toml

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mcpnorm_core::config::{collect_from_file, default_config_path};
use mcpnorm_core::mcp::candidate::extract_candidates;
use mcpnorm_core::mcp::{Endpoint, NormalizedServerConfig, classify, normalize_to_array};
use mcpnorm_core::mcp::normalizer::{normalize_candidate, peel};
use mcpnorm_core::mcp::to_json_array;

#[derive(Parser)]
#[command(name = "mcpnorm")]
#[command(about = "Normalize MCP server configurations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize one JSON configuration document
    Normalize {
        /// JSON file to read (stdin when omitted or "-")
        input: Option<PathBuf>,

        /// Default server name (the stored record's name)
        #[arg(short, long)]
        name: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,
    },

    /// Show the server candidates found in a document and their transports
    Inspect {
        /// JSON file to read (stdin when omitted or "-")
        input: Option<PathBuf>,
    },

    /// Normalize every enabled server listed in a config file
    Collect {
        /// Config file (defaults to <config dir>/mcpnorm/mcpnorm.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Machine-readable JSON array
    #[default]
    Json,
    /// Human-readable table
    Table,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mcpnorm=info,mcpnorm_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Normalize {
            input,
            name,
            format,
        } => run_normalize(input.as_deref(), name.as_deref(), format),
        Commands::Inspect { input } => run_inspect(input.as_deref()),
        Commands::Collect { config, format } => run_collect(config, format),
    }
}

fn run_normalize(input: Option<&Path>, name: Option<&str>, format: OutputFormat) -> Result<()> {
    let doc = read_document(input)?;
    let configs = normalize_to_array(Some(&doc), name);
    tracing::debug!(count = configs.len(), "normalized document");
    print_configs(&configs, format)
}

fn run_inspect(input: Option<&Path>) -> Result<()> {
    let doc = read_document(input)?;
    let Value::Object(map) = &doc else {
        anyhow::bail!("Expected a JSON object at the document root");
    };

    println!("{:<24} {:<16} STATUS", "CANDIDATE", "TRANSPORT");
    for candidate in extract_candidates(map) {
        let label = candidate.name_override.unwrap_or("<document>");
        let transport = classify(peel(candidate.body))
            .map(|t| t.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let status = match normalize_candidate(&candidate) {
            Ok(_) => "ok".to_string(),
            Err(reason) => format!("skipped: {reason}"),
        };
        println!("{:<24} {:<16} {}", label, transport, status);
    }
    Ok(())
}

fn run_collect(config: Option<PathBuf>, format: OutputFormat) -> Result<()> {
    let path = match config {
        Some(path) => path,
        None => default_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?,
    };
    let configs = collect_from_file(&path)?;
    tracing::info!(count = configs.len(), config = %path.display(), "collected MCP servers");
    print_configs(&configs, format)
}

/// Read and parse a JSON document from a file or stdin.
fn read_document(input: Option<&Path>) -> Result<Value> {
    let text = match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };
    serde_json::from_str(&text).context("Input is not valid JSON")
}

fn print_configs(configs: &[NormalizedServerConfig], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let rendered = serde_json::to_string_pretty(&to_json_array(configs))
                .context("Failed to render JSON output")?;
            println!("{rendered}");
        }
        OutputFormat::Table => print_table(configs),
    }
    Ok(())
}

fn print_table(configs: &[NormalizedServerConfig]) {
    if configs.is_empty() {
        println!("No MCP servers.");
        return;
    }

    println!("{:<32} {:<16} TARGET", "NAME", "TRANSPORT");
    for config in configs {
        let target = match &config.endpoint {
            Endpoint::Stdio { command, args, .. } => match args {
                Some(args) if !args.is_empty() => format!("{} {}", command, args.join(" ")),
                _ => command.clone(),
            },
            Endpoint::Remote { url, .. } => url.clone(),
        };
        println!(
            "{:<32} {:<16} {}",
            config.name.as_deref().unwrap_or("-"),
            config.transport,
            target
        );
    }
}
