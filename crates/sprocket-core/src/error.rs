use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The rendering backend could not build its program/pipeline. Not
    /// recoverable; hosts abort initialization.
    #[error("renderer initialization failed: {0}")]
    Renderer(String),

    #[error("invalid ui config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
