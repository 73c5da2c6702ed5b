use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod app;
mod config;
mod endpoint;
mod error;
mod events;
mod session;
mod tui;
mod ui;

use app::App;
use config::Config;
use endpoint::HttpEndpoint;

#[derive(Parser)]
#[command(name = "chatline")]
#[command(version)]
#[command(about = "Chat with a message endpoint from the terminal", long_about = None)]
struct Cli {
    /// Endpoint URL (overrides config file and CHATLINE_ENDPOINT)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Config file to use instead of ~/.chatline/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective configuration
    Config {
        /// Write the default config file if none exists
        #[arg(long)]
        init: bool,
    },
    /// Send one message and print the reply
    Send { text: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(url) = cli.endpoint {
        config.endpoint_url = url;
        config.validate()?;
    }

    match cli.command {
        None => {
            init_file_logging(&config)?;
            run_chat(config).await
        }
        Some(Commands::Config { init }) => {
            init_stderr_logging(&config);
            if init {
                let path = match cli.config {
                    Some(path) => path,
                    None => Config::default_path()?,
                };
                if Config::init_file(&path)? {
                    println!("Wrote {}", path.display());
                } else {
                    println!("{} already exists", path.display());
                }
            }
            print!("{}", config.to_toml()?);
            Ok(())
        }
        Some(Commands::Send { text }) => {
            init_stderr_logging(&config);
            let text = outgoing_text(&text)?;
            let endpoint = HttpEndpoint::new(&config.endpoint_url, config.request_timeout())?;
            let reply = endpoint
                .post_message(text)
                .await
                .with_context(|| format!("No reply from {}", endpoint.url()))?;
            println!("{reply}");
            Ok(())
        }
    }
}

async fn run_chat(config: Config) -> Result<()> {
    let endpoint = HttpEndpoint::new(&config.endpoint_url, config.request_timeout())?;
    tracing::info!(endpoint = %config.endpoint_url, "starting chat");
    let mut app = App::new(&config, endpoint);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();

    let result = app::run(&mut terminal, &mut app, &mut events).await;
    tui::restore()?;
    result
}

/// Blank messages are never sent, same as in the chat window.
fn outgoing_text(text: &str) -> Result<&str> {
    let text = text.trim();
    if text.is_empty() {
        bail!("Nothing to send: the message is blank");
    }
    Ok(text)
}

fn env_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
}

/// The TUI owns the terminal, so logs go to a file under the config home.
fn init_file_logging(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.home).context("Failed to create .chatline directory")?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())
        .context("Failed to open log file")?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(env_filter(config))
        .init();
    Ok(())
}

fn init_stderr_logging(config: &Config) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter(config))
        .init();
}
