//! Error types for shader hook injection.
//!
//! Content-level misses (no entry point, hook already present) are not errors;
//! they surface as [`crate::StepOutcome`] values. Only I/O and configuration
//! failures reach this enum.

use thiserror::Error;

/// Error types for reading, configuring and writing shader sources.
#[derive(Error, Debug)]
pub enum HookError {
    /// File does not exist.
    #[error("File not found: {0}")]
    NotFound(String),

    /// File exceeds size limit.
    #[error("File too large: {0} bytes (limit: {1})")]
    TooLarge(u64, u64),

    /// File contains binary content (NULL bytes detected).
    #[error("Binary file detected")]
    BinaryFile,

    /// File is not valid UTF-8 and cannot be patched without loss.
    #[error("Invalid UTF-8 in {0}")]
    Encoding(String),

    /// Low-level I/O error from std::io.
    #[error("IO error: {0}")]
    System(#[from] std::io::Error),

    /// Injection profile failed validation.
    #[error("Config error: {0}")]
    Config(String),

    /// Injection profile is not valid YAML for the expected shape.
    #[error("Profile parse error: {0}")]
    ProfileParse(#[from] serde_yaml::Error),

    /// An anchor pattern built from the profile failed to compile.
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}
