//! # Web Library
//!
//! Logging setup, HTTP handlers, middleware, and server startup for the
//! Email Reply Agent service.

pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod server;

pub use server::{start_server, AppState, ServerConfig};
