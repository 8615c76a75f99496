use thiserror::Error;

/// Error types for the listing extraction engine
#[derive(Error, Debug)]
pub enum ScrapeError {
    // Session errors
    #[error("Failed to launch browser session: {message}")]
    SessionLaunch { message: String },

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Timed out after {seconds}s waiting for '{selector}': {message}")]
    WaitTimeout { selector: String, seconds: u64, message: String },

    // Element errors
    #[error("Query '{selector}' failed: {message}")]
    Query { selector: String, message: String },

    #[error("Element is no longer attached to the page")]
    StaleElement,

    #[error("Operation not supported by this session: {operation}")]
    Unsupported { operation: String },

    // Network and I/O
    #[error("HTTP request failed: {url} - {message}")]
    Http { url: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Configuration and output
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Export error: {message}")]
    Export { message: String },
}

impl ScrapeError {
    /// Create a session launch error
    pub fn launch(message: impl Into<String>) -> Self {
        Self::SessionLaunch { message: message.into() }
    }

    /// Create a navigation error
    pub fn navigation(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Navigation { url: url.into(), message: message.into() }
    }

    /// Create a query error
    pub fn query(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Query { selector: selector.into(), message: message.into() }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Create an export error
    pub fn export(message: impl Into<String>) -> Self {
        Self::Export { message: message.into() }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::SessionLaunch { .. } | Self::Navigation { .. } | Self::WaitTimeout { .. } => "page",
            Self::Query { .. } | Self::StaleElement | Self::Unsupported { .. } => "element",
            Self::Http { .. } => "network",
            Self::Io(_) | Self::Serialization(_) | Self::Export { .. } => "output",
            Self::Configuration { .. } => "configuration",
        }
    }
}

/// Result type alias for the extraction engine
pub type ScrapeResult<T> = std::result::Result<T, ScrapeError>;
