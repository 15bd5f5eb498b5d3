use thiserror::Error;

/// Unified error type for the lattice walk engine
#[derive(Debug, Error)]
pub enum LatticeError {
    /// Grid bound rejected before any explorer was spawned
    #[error("Invalid grid bound ({nx}, {ny}): {reason}")]
    InvalidGridBound { nx: i64, ny: i64, reason: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
    },

    /// Resource ceiling hit before the walk started
    #[error("Resource exhausted: {resource} (current: {current}, limit: {limit})")]
    ResourceExhaustion {
        resource: String,
        current: u64,
        limit: u64,
    },

    /// Every signal sender went away while explorers were still unaccounted for
    #[error("Signal channels closed before convergence (started: {started}, finished: {finished})")]
    SignalChannelClosed { started: u64, finished: u64 },

    /// Tokio runtime construction failed
    #[error("Runtime error: {operation}")]
    Runtime {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization errors
    #[error("Serialization failed: {format}")]
    Serialization {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl LatticeError {
    /// Create an invalid grid bound error
    pub fn invalid_bound<S: Into<String>>(nx: i64, ny: i64, reason: S) -> Self {
        Self::InvalidGridBound {
            nx,
            ny,
            reason: reason.into(),
        }
    }

    /// Create a configuration error naming the offending field
    pub fn configuration_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Configuration {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a resource exhaustion error
    pub fn resource_exhausted<S: Into<String>>(resource: S, current: u64, limit: u64) -> Self {
        Self::ResourceExhaustion {
            resource: resource.into(),
            current,
            limit,
        }
    }

    pub fn channel_closed(started: u64, finished: u64) -> Self {
        Self::SignalChannelClosed { started, finished }
    }

    /// Create a runtime error
    pub fn runtime<S: Into<String>>(operation: S, source: std::io::Error) -> Self {
        Self::Runtime {
            operation: operation.into(),
            source,
        }
    }

    /// Create a serialization error
    pub fn serialization<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        format: S,
        source: E,
    ) -> Self {
        Self::Serialization {
            format: format.into(),
            source: Box::new(source),
        }
    }

    /// True when the caller supplied something the engine refuses to run
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidGridBound { .. }
                | Self::Configuration { .. }
                | Self::ResourceExhaustion { .. }
        )
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidGridBound { .. } => "validation",
            Self::Configuration { .. } => "configuration",
            Self::ResourceExhaustion { .. } => "resource",
            Self::SignalChannelClosed { .. } => "channel",
            Self::Runtime { .. } => "runtime",
            Self::Serialization { .. } => "serialization",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, LatticeError>;

impl From<serde_json::Error> for LatticeError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization("json", err)
    }
}
