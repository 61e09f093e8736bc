use anyhow::{Result, bail};
use clap::Parser;
use colored::Colorize;
use serde_json::json;
use std::env;
use std::path::PathBuf;

use google_oauth_config::oauth::client_id::ClientIdShape;
use google_oauth_config::utils::app_config::{AppConfig, GOOGLE_CLIENT_ID_VAR};

/// Print the Google OAuth client id this environment resolves to
#[derive(Parser, Debug)]
#[command(name = "google-oauth-config", version)]
struct Args {
    /// Read this file instead of searching for a .env
    #[arg(long, env = "GOOGLE_OAUTH_ENV_FILE")]
    env_file: Option<PathBuf>,

    /// Print machine readable output
    #[arg(long)]
    json: bool,

    /// Fail when the placeholder client id is in effect
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG")
                .unwrap_or_else(|_| "info".to_string())
                .as_str(),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.env_file {
        Some(path) => AppConfig::from_env_file(path)?,
        None => AppConfig::from_env()?,
    };

    let output = run(&args, &config)?;
    println!("{}", output);

    Ok(())
}

/// Renders the resolved config, or fails under `--strict` while the placeholder is in effect.
fn run(args: &Args, config: &AppConfig) -> Result<String> {
    let shape = ClientIdShape::inspect(&config.google_client_id);
    shape.log(&config.google_client_id);

    if args.strict && config.is_placeholder() {
        bail!(
            "{} is not configured; set it in the environment or a .env file",
            GOOGLE_CLIENT_ID_VAR
        );
    }

    let output = if args.json {
        let output = json!({
            "google_client_id": config.google_client_id,
            "source": config.source,
            "shape": shape,
        });
        serde_json::to_string_pretty(&output)?
    } else if config.is_placeholder() {
        format!(
            "{}={} {}",
            GOOGLE_CLIENT_ID_VAR.bright_cyan(),
            config.google_client_id.yellow(),
            "(placeholder)".dimmed()
        )
    } else {
        format!(
            "{}={}",
            GOOGLE_CLIENT_ID_VAR.bright_cyan(),
            config.google_client_id.green()
        )
    };

    Ok(output)
}
