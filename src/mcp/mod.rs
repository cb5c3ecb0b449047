//! Model Context Protocol surface
//!
//! [`AppsServer`] is an rmcp `ServerHandler` exposing the tools and their
//! widget resources. Transports live in [`stdio`] and [`crate::web`].

pub mod resources;
pub mod server;
pub mod stdio;
pub mod tools;

pub use server::{AppsServer, SERVER_NAME};
