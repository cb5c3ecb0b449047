use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mcp_apps::config::Transport;
use mcp_apps::http::build_client;
use mcp_apps::mcp::stdio;
use mcp_apps::{AgeService, AppsConfig, AppsServer, PlacesService, WeatherService, logging, web};
use serde::Serialize;
use tracing::info;

#[derive(Parser)]
#[command(name = "mcp-apps")]
#[command(about = "MCP server with weather, age and fast-food tools for chat Apps")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Configuration file path
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve MCP over stdio or HTTP
    Serve {
        /// Transport to speak (overrides the config file)
        #[arg(long, value_enum)]
        transport: Option<Transport>,
        /// Bind address for the HTTP transport
        #[arg(long)]
        host: Option<String>,
        /// Port for the HTTP transport
        #[arg(long)]
        port: Option<u16>,
    },
    /// Look up the weather once and print the structured result
    Weather {
        #[arg(long)]
        city: String,
    },
    /// Predict an age once and print the structured result
    Age {
        #[arg(long)]
        name: String,
    },
    /// Search for fast food once and print the structured result
    FastFood {
        #[arg(long)]
        location: String,
        /// Search radius in metres
        #[arg(long)]
        radius: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppsConfig::load_from_path(cli.config.clone())?;
    logging::init(&config.logging, cli.verbose)?;

    match cli.command {
        Command::Serve {
            transport,
            host,
            port,
        } => {
            if let Some(transport) = transport {
                config.server.transport = transport;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            info!(
                "Starting mcp-apps {} ({:?} transport)",
                mcp_apps::VERSION,
                config.server.transport
            );
            let server = AppsServer::from_config(&config).context("Failed to build MCP server")?;
            match config.server.transport {
                Transport::Stdio => stdio::run(server).await?,
                Transport::Http => {
                    web::run(server, &config.server.host, config.server.port).await?;
                }
            }
        }
        Command::Weather { city } => {
            let weather = WeatherService::open_meteo(build_client(&config.http)?, &config.upstream);
            print_json(&weather.lookup(&city).await)?;
        }
        Command::Age { name } => {
            let age = AgeService::agify(build_client(&config.http)?, &config.upstream);
            print_json(&age.predict(&name).await)?;
        }
        Command::FastFood { location, radius } => {
            let places = PlacesService::openstreetmap(
                build_client(&config.http)?,
                &config.upstream,
                config.places.clone(),
            );
            print_json(&places.search(&location, radius).await)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    println!("{json}");
    Ok(())
}
