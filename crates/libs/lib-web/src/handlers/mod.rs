//! # HTTP Handlers

pub mod system;
