//! Error types for the terminal host.
//!
//! [`AppError`] covers startup and the event loop; [`CommandError`] covers a
//! single line of user input and is reported without stopping the app.

/// Top-level error for the terminal host.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: greentrack_core::ConfigError,
    },

    /// Content loading failed.
    #[error("content error: {source}")]
    Content {
        /// The underlying content error.
        #[from]
        source: greentrack_content::ContentError,
    },

    /// The scene clock could not advance.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: greentrack_core::ClockError,
    },

    /// Reading input or writing output failed.
    #[error("terminal I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

/// A line of input that could not be turned into a command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The first word is not a known command.
    #[error("unknown command '{word}' (type 'help' for a list)")]
    Unknown {
        /// The word that was typed.
        word: String,
    },

    /// The command needs an argument that was not given.
    #[error("'{command}' needs {expected}")]
    MissingArgument {
        /// The command that was typed.
        command: &'static str,
        /// What the argument should be.
        expected: &'static str,
    },

    /// The argument could not be parsed.
    #[error("'{value}' is not valid for '{command}': expected {expected}")]
    InvalidArgument {
        /// The command that was typed.
        command: &'static str,
        /// The argument that was typed.
        value: String,
        /// What the argument should be.
        expected: &'static str,
    },
}
