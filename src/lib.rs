//! `mcp-apps` - Model Context Protocol server for chat "Apps"
//!
//! This library provides the weather, age prediction and fast-food tools,
//! the adapters for the public APIs behind them, and the HTML widgets they
//! render into. The tools are served with `rmcp` over stdio or streamable
//! HTTP.

pub mod age;
pub mod config;
pub mod error;
pub mod geo;
pub mod http;
pub mod logging;
pub mod mcp;
pub mod models;
pub mod places;
pub mod weather;
pub mod web;
pub mod widgets;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export core types for public API
pub use age::AgeService;
pub use config::AppsConfig;
pub use error::AppsError;
pub use mcp::AppsServer;
pub use models::{AgeResult, Location, PlacesResult, WeatherResult};
pub use places::PlacesService;
pub use weather::WeatherService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AppsError>;
