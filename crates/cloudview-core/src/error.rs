//! Error types for Cloudview
//!
//! Covers the four failure classes of the synchronization layer:
//! - Missing credentials or base URL (fatal, raised before any request)
//! - Transport failures and non-success HTTP status on reads
//! - Failed create/delete mutations
//! - Upstream records with missing or mistyped fields

/// Main Cloudview error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CloudError {
    /// Required credential or URL is missing
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Network failure talking to the upstream API
    #[error("transport error: {0}")]
    Transport(String),

    /// Upstream answered with a non-success status
    #[error("upstream returned {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Upstream message or canonical reason
        message: String,
    },

    /// Create or delete call failed
    #[error("mutation failed: {0}")]
    Mutation(String),

    /// Upstream record could not be mapped
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// Operation against a view that has been deactivated
    #[error("view has been deactivated")]
    Terminated,
}

impl CloudError {
    /// Create configuration error
    #[inline]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create transport error
    #[inline]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Create mutation error
    #[inline]
    pub fn mutation(message: impl Into<String>) -> Self {
        Self::Mutation(message.into())
    }

    /// Check if error is a configuration failure
    #[inline]
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Check if a read that failed this way degrades to an empty collection
    #[inline]
    #[must_use]
    pub fn is_read_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Status { .. } | Self::MalformedRecord(_)
        )
    }

    /// Check if the user may retry the failed operation
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Configuration(_) | Self::Terminated)
    }

    /// Turn a read-path failure into a mutation failure
    ///
    /// Create and delete calls share the transport with reads; callers see
    /// every non-configuration failure of a write as `Mutation`.
    #[must_use]
    pub fn into_mutation(self) -> Self {
        match self {
            Self::Configuration(_) | Self::Mutation(_) | Self::Terminated => self,
            other => Self::Mutation(other.to_string()),
        }
    }
}

/// Result alias used across the workspace
pub type Result<T, E = CloudError> = std::result::Result<T, E>;
