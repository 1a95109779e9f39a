use thiserror::Error;

/// Failures reported by a [`crate::terminal::TerminalSession`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("timed out waiting for the terminal: {0}")]
    Timeout(String),
    #[error("keyboard locked: {0}")]
    KeyboardLocked(String),
    #[error("network failure: {0}")]
    Network(String),
    #[error("no field containing '{marker}' on the current screen")]
    FieldNotFound { marker: String },
    #[error("data stream error: {0}")]
    Datastream(String),
}

/// Failures while loading configuration or resolving the values the
/// navigator is constructed with.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("no application name configured for '{0}' and no default set")]
    UnknownApplication(String),
    #[error("missing credential: {0}")]
    MissingCredential(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("screen still unrecognised after {attempts} reconnect attempts")]
    RecoveryExhausted { attempts: u32 },
    #[error("expected '{marker}' exactly once on the screen, found {occurrences}")]
    UnexpectedScreen { marker: String, occurrences: usize },
}
