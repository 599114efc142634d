use thiserror::Error;

#[derive(Debug, Error)]
pub enum RollPackerError {
    #[error("Invalid roll width: {0} (must be a positive, finite length)")]
    InvalidRollWidth(f64),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Invalid item '{id}': {width}x{height} (sides must be positive and finite)")]
    InvalidItem { id: String, width: f64, height: f64 },
    #[error("Encoding error: {0}")]
    Encode(String),
}

impl From<serde_json::Error> for RollPackerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RollPackerError>;
