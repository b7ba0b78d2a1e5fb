/// Result alias that carries the custom [`MembraneError`] type.
pub type Result<T> = std::result::Result<T, MembraneError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum MembraneError {
    /// Invalid geometry, mode indices or physical parameters.
    #[error("domain error: {0}")]
    Domain(String),
    /// Drawing a frame failed inside the plotting backend.
    #[error("render error: {0}")]
    Render(String),
    /// Encoding or writing an output artifact failed.
    #[error("export error: {0}")]
    Export(String),
    /// Configuration values that cannot drive a render.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Image(#[from] image::ImageError),
}

impl MembraneError {
    /// Creates a domain error from the provided message.
    pub fn domain<T: Into<String>>(msg: T) -> Self {
        Self::Domain(msg.into())
    }

    pub fn render<T: Into<String>>(msg: T) -> Self {
        Self::Render(msg.into())
    }

    pub fn export<T: Into<String>>(msg: T) -> Self {
        Self::Export(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::Config(msg.into())
    }
}
