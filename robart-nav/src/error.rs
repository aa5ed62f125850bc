//! Error types for the navigation core.
//!
//! Most operations encode failure in their return values (empty paths, the
//! `-1.0` depth sentinel); this type covers construction and configuration,
//! where a `Result` is the natural shape.

use thiserror::Error;

/// Errors that can occur in robart-nav
#[derive(Error, Debug)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
