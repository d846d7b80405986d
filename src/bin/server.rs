//! CauseMap HTTP server
//!
//! Run with: causemap-server

use std::net::IpAddr;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use causemap::config::{
    GenerationConfig, ServerConfig, DEFAULT_PORT, DEFAULT_SERVER_EVENT_COUNT,
};
use causemap::error::Result;
use causemap::server::ApiServer;
use causemap::CategoryRegistry;

#[derive(Parser, Debug)]
#[command(name = "causemap-server")]
#[command(about = "Serve generated historical event graphs over HTTP")]
#[command(version)]
struct Args {
    /// Address to bind
    #[arg(long, env = "CAUSEMAP_BIND", default_value = "0.0.0.0")]
    bind: IpAddr,

    /// Port to listen on
    #[arg(long, env = "CAUSEMAP_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Events generated per request
    #[arg(long, env = "CAUSEMAP_SERVER_EVENTS", default_value_t = DEFAULT_SERVER_EVENT_COUNT)]
    events: usize,

    /// Seed for reproducible responses (fresh randomness when unset)
    #[arg(long, env = "CAUSEMAP_SEED")]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = ServerConfig {
        bind: args.bind,
        port: args.port,
        generation: GenerationConfig::default()
            .with_count(args.events)
            .with_seed(args.seed),
    };
    config.generation.connections.validate()?;

    tracing::info!(
        "Serving {} events per request (seed: {:?})",
        config.generation.event_count,
        config.generation.seed
    );

    ApiServer::new(CategoryRegistry::default(), config)
        .start()
        .await?;

    Ok(())
}
