//! # Environment Variables
//!
//! Utilities for reading and parsing environment variables. Required
//! variables produce an [`Error`] naming the offending variable so startup
//! failures are diagnosable from the message alone.

use std::env;
use std::str::FromStr;

/// Get a required environment variable by name.
pub fn get_env(name: &'static str) -> Result<String, Error> {
    env::var(name).map_err(|_| Error::MissingEnv(name))
}

/// Get an environment variable, falling back to a default when unset.
pub fn get_env_or(name: &'static str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Get and parse an environment variable, falling back to a default when
/// unset. A present-but-malformed value is still an error rather than a
/// silent fallback.
pub fn get_env_parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, Error> {
    match env::var(name) {
        Ok(val) => val.parse::<T>().map_err(|_| Error::WrongFormat(name)),
        Err(_) => Ok(default),
    }
}

// region:    --- Error
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    MissingEnv(&'static str),
    WrongFormat(&'static str),
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::MissingEnv(name) => {
                write!(fmt, "required environment variable {name} is not set")
            }
            Error::WrongFormat(name) => {
                write!(fmt, "environment variable {name} has an invalid format")
            }
        }
    }
}

impl std::error::Error for Error {}
// endregion: --- Error
