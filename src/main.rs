//! rillchat binary entry point

use std::io::Write;
use std::sync::Arc;

use color_eyre::Result;
use rillchat::cli::{Cli, Commands};
use rillchat::config::Config;
use rillchat::services::http::HttpChatBackend;
use rillchat::services::streaming::ResponseSink;
use rillchat::services::stream_reply;
use rillchat::tui;

#[tokio::main]
async fn main() -> Result<()> {
    // Install error handler
    color_eyre::install()?;

    // Pick up a local .env if present
    dotenv::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse_args();
    let config = Config::load()?;

    // Set up logging
    if cli.verbose || config.global.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("rillchat=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    // Handle commands
    match cli.command {
        Some(Commands::Ask {
            text,
            show_reasoning,
        }) => {
            ask(&config, &text, show_reasoning).await?;
        }
        Some(Commands::Config {
            get,
            set,
            value,
            list,
        }) => {
            handle_config(config, get, set, value, list)?;
        }
        Some(Commands::Version) => {
            println!("rillchat version {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Chat) | None => {
            let backend = Arc::new(HttpChatBackend::new(&config)?);
            tui::run(backend, config.idle_timeout()).await?;
        }
    }

    Ok(())
}

/// One-shot question over the streaming pipeline, printed to stdout
async fn ask(config: &Config, text: &str, show_reasoning: bool) -> Result<()> {
    let backend = HttpChatBackend::new(config)?;
    let mut sink = StdoutSink { show_reasoning };
    stream_reply(&backend, text, config.idle_timeout(), &mut sink).await;
    Ok(())
}

/// Sink printing the reply as it resolves
struct StdoutSink {
    show_reasoning: bool,
}

impl ResponseSink for StdoutSink {
    fn on_reasoning_delta(&mut self, text: &str) {
        if self.show_reasoning {
            eprint!("{text}");
            let _ = std::io::stderr().flush();
        }
    }

    fn on_content_delta(&mut self, text: &str) {
        print!("{text}");
        let _ = std::io::stdout().flush();
    }

    fn on_complete(&mut self) {
        if self.show_reasoning {
            eprintln!();
        }
        println!();
    }
}

fn handle_config(
    mut config: Config,
    get: Option<String>,
    set: Option<String>,
    value: Option<String>,
    list: bool,
) -> Result<()> {
    if list {
        for (key, val) in config.list_values() {
            println!("{key} = {val}");
        }
    } else if let Some(key) = get {
        println!("{}", config.get_value(&key)?);
    } else if let Some(key) = set {
        if let Some(val) = value {
            config.set_value(&key, &val)?;
            config.save()?;
            println!("{key} = {val}");
        }
    }
    Ok(())
}
