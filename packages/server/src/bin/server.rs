//! WebSocket chat relay server with presence, chat and typing broadcast.
//!
//! Tracks which user occupies which connection and fans chat messages,
//! presence snapshots and typing signals out to every connected client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! cargo run --bin server -- --host 127.0.0.1 --port 3000
//! PORT=4000 cargo run --bin server
//! ```

use std::sync::Arc;

use clap::Parser;
use hubbub_server::{
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryPresenceRepository,
    },
    ui::Server,
    usecase::Relay,
};
use hubbub_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "WebSocket chat relay with presence and typing broadcast", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "3001")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_PKG_NAME"), env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository (presence registry)
    // 2. MessagePusher
    // 3. Relay
    // 4. Server

    let repository = Box::new(InMemoryPresenceRepository::new());
    let message_pusher = Box::new(WebSocketMessagePusher::new());
    let (relay, _relay_task) =
        Relay::new(repository, message_pusher, Arc::new(SystemClock)).spawn();

    let server = Server::new(relay);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
