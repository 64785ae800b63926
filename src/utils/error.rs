use thiserror::Error;

/// Failures talking to the text-generation capability.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("generation API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("could not decode generation response: {0}")]
    Parse(String),
}

/// Shape failures of the generator's raw output.
///
/// `NotJson` keeps the unwrapped text for diagnostic logging. `Display` never
/// includes it, so the error can be formatted anywhere without leaking output.
#[derive(Error, Debug)]
pub enum SanitizeError {
    #[error("generator output is not valid JSON: {source}")]
    NotJson {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    #[error("generator output has no products array")]
    MissingProductsArray,
}

impl SanitizeError {
    /// Raw text for the log line, truncated to `max_chars`.
    pub fn diagnostic_excerpt(&self, max_chars: usize) -> Option<String> {
        match self {
            SanitizeError::NotJson { raw, .. } => Some(raw.chars().take(max_chars).collect()),
            SanitizeError::MissingProductsArray => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum CurateError {
    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Generation failure: {0}")]
    Generation(#[from] GenerationError),

    #[error("Sanitize error: {0}")]
    Sanitize(#[from] SanitizeError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

impl CurateError {
    /// Short message safe to show to an end user.
    pub fn user_friendly_message(&self) -> String {
        match self {
            CurateError::ValidationError { .. } => "Missing fields in request.".to_string(),
            CurateError::Generation(_) => {
                "Something went wrong generating gift ideas. Try again.".to_string()
            }
            CurateError::Sanitize(SanitizeError::NotJson { .. }) => {
                "AI returned non-JSON. Try again.".to_string()
            }
            CurateError::Sanitize(SanitizeError::MissingProductsArray) => {
                "AI JSON missing products array.".to_string()
            }
            CurateError::IoError(e) => format!("File access failed: {}", e),
            CurateError::ConfigError { message } => format!("Configuration problem: {}", message),
            CurateError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            CurateError::MissingConfigError { field } => {
                format!("Missing required setting '{}'", field)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CurateError::ValidationError { .. } => {
                "Provide a recipient, an occasion and a budget"
            }
            CurateError::Generation(_) => {
                "Check the generation endpoint, API key and network, then retry"
            }
            CurateError::Sanitize(_) => "Retry the request; the model output was malformed",
            CurateError::IoError(_) => "Check that the file exists and is readable",
            CurateError::ConfigError { .. }
            | CurateError::InvalidConfigValueError { .. }
            | CurateError::MissingConfigError { .. } => {
                "Fix the configuration file or environment variables and restart"
            }
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, CurateError::ValidationError { .. })
    }
}

pub type Result<T> = std::result::Result<T, CurateError>;
