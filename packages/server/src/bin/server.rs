//! Doodle Duel multiplayer game server.
//!
//! Pairs players over WebSocket, hands out labels and classifies drawings
//! through an external classification service.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin doodleduel-server -- --classifier-url http://localhost:9000/classify
//! cargo run --bin doodleduel-server -- --host 0.0.0.0 --port 3000 --config game.toml
//! ```

use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use doodleduel_server::{
    config::GameConfig,
    infrastructure::HttpClassifier,
    ui::{AppState, Server},
};
use doodleduel_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "doodleduel-server")]
#[command(about = "Multiplayer session server for Doodle Duel", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Game configuration file (TOML). Defaults are used when omitted.
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Endpoint of the image classification service
    #[arg(long, env = "DOODLEDUEL_CLASSIFIER_URL")]
    classifier_url: String,

    /// Key sent in the Prediction-Key header
    #[arg(long, env = "DOODLEDUEL_CLASSIFIER_KEY", hide_env_values = true)]
    classifier_key: Option<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Configuration
    // 2. Classifier
    // 3. AppState (repositories, MessagePusher, UseCases)
    // 4. Server

    // 1. Load the game configuration
    let config = match GameConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // 2. Create the classifier client
    tracing::info!("Using classifier at {}", args.classifier_url);
    let classifier = match HttpClassifier::new(args.classifier_url, args.classifier_key) {
        Ok(classifier) => Arc::new(classifier),
        Err(e) => {
            tracing::error!("Classifier error: {}", e);
            std::process::exit(1);
        }
    };

    // 3. Wire repositories, MessagePusher and UseCases
    let app_state = AppState::new(&config, classifier, Arc::new(SystemClock));

    // 4. Create and run the server
    let server = Server::new(app_state, Duration::from_secs(config.sweep_interval_secs));
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
