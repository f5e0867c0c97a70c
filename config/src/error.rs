use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] config::ConfigError),
    #[error("Config is missing required key '{key}'")]
    MissingKey { key: String },
    #[error("Config key '{key}' has an invalid value: {reason}")]
    InvalidValue { key: String, reason: String },
}

impl ConfigError {
    /// The dotted path of the offending key, if the error concerns a single key.
    pub fn key(&self) -> Option<&str> {
        match self {
            ConfigError::MissingKey { key } | ConfigError::InvalidValue { key, .. } => Some(key),
            ConfigError::Read { .. } | ConfigError::Parse(_) => None,
        }
    }
}
