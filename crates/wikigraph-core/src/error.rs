use std::path::PathBuf;

/// Errors that can abort a wikigraph build.
///
/// Unresolved links, duplicate pages and other graph-data problems are never
/// errors; they are recorded as [`Diagnostic`](crate::Diagnostic)s. What ends
/// up here is configuration, filesystem and serialization failure.
///
/// # Examples
///
/// ```
/// use wikigraph_core::WikigraphError;
///
/// let err = WikigraphError::FileNotFound("docs".into());
/// assert_eq!(err.to_string(), "file not found: docs");
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum WikigraphError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    #[diagnostic(code(wikigraph::io))]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    #[diagnostic(code(wikigraph::serialization))]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    #[diagnostic(code(wikigraph::toml), help("check your .wikigraph.toml"))]
    Toml(#[from] toml::de::Error),

    /// A required file or directory was not found.
    #[error("file not found: {}", .0.display())]
    #[diagnostic(code(wikigraph::not_found))]
    FileNotFound(PathBuf),

    /// Invalid exclude glob.
    #[error("invalid glob pattern: {0}")]
    #[diagnostic(code(wikigraph::pattern))]
    Pattern(#[from] glob::PatternError),
}
