use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] quoterace_core::ValidationError),

    #[error(transparent)]
    Config(#[from] quoterace_core::ConfigError),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Config(_) => 3,
            Self::Command(_) => 2,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_stable() {
        let validation = CliError::from(quoterace_core::ValidationError::EmptyRecordId);
        assert_eq!(validation.exit_code(), 2);
        assert_eq!(CliError::Command(String::from("x")).exit_code(), 2);

        let config = CliError::from(quoterace_core::ConfigError::InvalidEnv {
            name: "QUOTERACE_TIMEOUT_MS",
            value: String::from("x"),
            reason: String::from("bad"),
        });
        assert_eq!(config.exit_code(), 3);
    }
}
