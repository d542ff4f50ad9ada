use crate::mode::Mode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SummitError {
    #[error("Input is empty")]
    EmptyInput,

    #[error("Input is too long: {length} characters (maximum is {max})")]
    InputTooLong { length: usize, max: usize },

    #[error("A request is already in flight")]
    Busy,

    #[error("API error: {0}")]
    Api(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unrecognized {mode} response: {detail}")]
    UnrecognizedResponseShape { mode: Mode, detail: String },

    #[error("Invalid usage delta: {0}")]
    InvalidUsageDelta(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{message}: {source}")]
    Context {
        message: String,
        #[source]
        source: Box<SummitError>,
    },
}

/// Failure classes a caller can act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    EmptyInput,
    InputTooLong,
    Busy,
    TransportFailure,
    UnrecognizedResponseShape,
    InvalidUsageDelta,
    Config,
}

impl SummitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SummitError::EmptyInput => ErrorKind::EmptyInput,
            SummitError::InputTooLong { .. } => ErrorKind::InputTooLong,
            SummitError::Busy => ErrorKind::Busy,
            SummitError::Api(_) | SummitError::Http(_) | SummitError::Json(_) => {
                ErrorKind::TransportFailure
            }
            SummitError::UnrecognizedResponseShape { .. } => ErrorKind::UnrecognizedResponseShape,
            SummitError::InvalidUsageDelta(_) => ErrorKind::InvalidUsageDelta,
            SummitError::Config(_) | SummitError::Io(_) | SummitError::Toml(_) => {
                ErrorKind::Config
            }
            SummitError::Context { source, .. } => source.kind(),
        }
    }

    /// True for failures caught before anything was sent or mutated.
    pub fn is_validation(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::EmptyInput | ErrorKind::InputTooLong | ErrorKind::Busy
        )
    }

    pub fn hint(&self) -> Option<String> {
        match self {
            SummitError::InputTooLong { max, .. } => Some(format!(
                "Shorten the input to at most {} characters or raise --max-input-length",
                max
            )),
            SummitError::Busy => Some("Wait for the current request to finish".to_string()),
            SummitError::Http(e) if e.is_connect() => {
                Some("Is the backend running? Check --base-url or SUMMIT_BASE_URL".to_string())
            }
            SummitError::Http(e) if e.is_timeout() => {
                Some("The backend did not answer in time; raise --timeout".to_string())
            }
            SummitError::UnrecognizedResponseShape { mode, .. } => Some(format!(
                "The /{} endpoint did not return a '{}' field; check the backend version",
                mode.endpoint(),
                mode.content_field()
            )),
            SummitError::Context { source, .. } => source.hint(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SummitError>;
