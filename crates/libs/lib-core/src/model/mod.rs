//! # Model Layer
//!
//! Database access for the application. Domain entities arrive with the
//! email ingestion work; for now the layer owns the pool and the
//! request-scoped unit of work.

pub mod store;
