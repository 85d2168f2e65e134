// Error types for the PEAQ analyzer.
//
// Mirrors the fingerprint-server error enum in spirit (thiserror, one
// variant per failure class) but carries no HTTP mapping: this is a
// library, not a service.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PeaqError {
    #[error("config error: {0}")]
    Config(String),

    #[error("input error: {0}")]
    Input(String),

    #[error("unsupported: {0}")]
    Unsupported(String),
}

pub type Result<T> = std::result::Result<T, PeaqError>;
