//! Error types for content loading.

/// Errors that can occur when loading or validating content tables.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// Failed to read the content file from disk.
    #[error("failed to read content file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse content YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The content parsed but violates a structural invariant.
    #[error("invalid content: {reason}")]
    Invalid {
        /// Which invariant was violated and where.
        reason: String,
    },
}

impl From<serde_yml::Error> for ContentError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

impl ContentError {
    /// Shorthand for an [`ContentError::Invalid`] with a formatted reason.
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }
}
