//! # Utility Library
//!
//! Small shared helpers with no domain knowledge.

pub mod envs;
