//! # Core Library
//!
//! Settings, error handling, and the database store for the Email Reply
//! Agent service.

pub mod config;
pub mod error;
pub mod model;

// Re-export commonly used types
pub use config::Settings;
pub use error::{AppError, Result};
pub use model::store::{check_connectivity, create_pool, with_session, DbPool, Session};
