use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl DashError {
    /// Short error code string used in structured log fields.
    pub fn code(&self) -> &'static str {
        match self {
            DashError::Config(_) => "CONFIG_ERROR",
            DashError::Invalid { .. } => "CONFIG_INVALID",
        }
    }
}

pub type Result<T> = std::result::Result<T, DashError>;
