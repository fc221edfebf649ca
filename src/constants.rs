//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Generation constants
pub mod generation {
    /// Tokens kept free for the model's response. A prompt whose estimate
    /// leaves less than this headroom is rejected before any network call.
    pub const MIN_RESPONSE_RESERVE: usize = 5000;

    /// Maximum characters in the user half of a prompt; longer prompts are
    /// truncated with a warning, never rejected.
    pub const DEFAULT_PROMPT_CHAR_LIMIT: usize = 10_000;

    /// Default context window when neither preset nor flag supplies one.
    pub const DEFAULT_MAX_CONTEXT: usize = 16_384;

    /// Sampling temperature for docstring generation.
    pub const TEMPERATURE: f32 = 0.3;
}

/// Docstring formatting constants
pub mod formatting {
    /// Spaces prepended to every line of a docstring after the first.
    pub const INDENT_WIDTH: usize = 4;

    /// Delimiter used when no existing docstring dictates a style.
    pub const DEFAULT_DELIMITER: &str = "\"\"\"";

    /// Alternate delimiter, reused when an overwritten docstring opens
    /// with it.
    pub const ALT_DELIMITER: &str = "'''";
}

/// Configuration discovery constants
pub mod config {
    /// Files probed in the working directory, in order, when no explicit
    /// config path is given.
    pub const DEFAULT_FILES: &[&str] = &[
        ".docweave.yml",
        ".docweave.yaml",
        "docweave.yml",
        "docweave.yaml",
        ".docweave.toml",
        "docweave.toml",
    ];
}

/// File discovery constants
pub mod fs {
    /// Extension of the source files this tool documents.
    pub const PYTHON_EXTENSION: &str = "py";
}

/// HTTP/Network constants
pub mod network {
    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

    /// Connection timeout (seconds)
    pub const CONNECTION_TIMEOUT_SECS: u64 = 30;
}
