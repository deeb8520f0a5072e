use thiserror::Error;

/// Errors raised while loading [`crate::AppConfig`] from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown contact type: {0}")]
    UnknownContactKind(String),

    #[error("unknown payment provider: {0}")]
    UnknownPaymentProvider(String),

    #[error("failed to read file {path}: {source}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
