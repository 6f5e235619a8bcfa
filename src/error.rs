use thiserror::Error;

use crate::engine::EngineError;

#[derive(Debug, Error)]
pub enum RedressError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Ticket file not found: {0}")]
    TicketNotFound(String),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
