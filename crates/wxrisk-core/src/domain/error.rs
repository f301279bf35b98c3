//! Error taxonomy for the edges of the engine.
//!
//! Evaluators, aggregation and messaging are total and never produce these;
//! they only surface when loading configuration or fingerprinting results.

/// wxrisk errors.
#[derive(Debug, thiserror::Error)]
pub enum RiskError {
    #[error("invalid engine config: {0}")]
    InvalidConfig(String),

    #[error("unknown risk profile: {0} (expected standard, conservative or aggressive)")]
    UnknownProfile(String),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for wxrisk edge operations.
pub type Result<T> = std::result::Result<T, RiskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_display() {
        let err = RiskError::InvalidConfig("secondary_weight must be within [0, 1]".to_string());
        assert!(err.to_string().contains("invalid engine config"));
        assert!(err.to_string().contains("secondary_weight"));
    }

    #[test]
    fn test_unknown_profile_display() {
        let err = RiskError::UnknownProfile("reckless".to_string());
        assert!(err.to_string().contains("reckless"));
        assert!(err.to_string().contains("conservative"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.toml");
        let err: RiskError = io.into();
        assert!(err.to_string().contains("io error"));
    }
}
