use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How node sizes (and categories) are computed.
///
/// `Depth` is the primary mode: sizes come from directory depth and every
/// node gets a category. `LinkCount` is the legacy mode: every inserted edge
/// grows both endpoints and the exported graph carries no categories.
///
/// # Examples
///
/// ```
/// use wikigraph_core::SizingMode;
///
/// let mode: SizingMode = "link-count".parse().unwrap();
/// assert_eq!(mode, SizingMode::LinkCount);
/// assert_eq!(SizingMode::default(), SizingMode::Depth);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizingMode {
    /// Size by path depth, categorize by top-level section.
    #[default]
    Depth,
    /// Size by number of incident edges, no categories.
    LinkCount,
}

impl fmt::Display for SizingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizingMode::Depth => write!(f, "depth"),
            SizingMode::LinkCount => write!(f, "link-count"),
        }
    }
}

impl FromStr for SizingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "depth" => Ok(SizingMode::Depth),
            "link-count" | "linkcount" | "links" => Ok(SizingMode::LinkCount),
            other => Err(format!("unknown sizing mode: {other}")),
        }
    }
}

/// A recovered, non-fatal problem found while building the graph.
///
/// Diagnostics never abort a build. They are logged as they happen and
/// collected on the builder so callers can report them afterwards.
///
/// # Examples
///
/// ```
/// use wikigraph_core::Diagnostic;
///
/// let d = Diagnostic::UnresolvedLink {
///     source: "notes/today".into(),
///     target: "NoSuchPage".into(),
/// };
/// assert_eq!(d.to_string(), "unresolved link [[NoSuchPage]] in notes/today");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Diagnostic {
    /// A wiki-link target matched no known node; the link was dropped.
    UnresolvedLink { source: String, target: String },
    /// Two pages mapped to the same path key; the first one was kept.
    DuplicatePath { key: String, path: String },
    /// A node's parent directory has no node; no containment edge was made.
    MissingParent { key: String, parent: String },
    /// Document text arrived for a page that was never collected.
    MissingSource { key: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnresolvedLink { source, target } => {
                write!(f, "unresolved link [[{target}]] in {source}")
            }
            Diagnostic::DuplicatePath { key, path } => {
                write!(f, "duplicate page key {key} (from {path}), keeping the first")
            }
            Diagnostic::MissingParent { key, parent } => {
                write!(f, "parent {parent} of {key} is not a node")
            }
            Diagnostic::MissingSource { key } => {
                write!(f, "page {key} was never collected, skipping its links")
            }
        }
    }
}

/// Output format for CLI subcommands.
///
/// Implements [`FromStr`] so it can be used directly with `clap` argument parsing.
///
/// # Examples
///
/// ```
/// use wikigraph_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable summary.
    #[default]
    Text,
    /// Machine-readable JSON.
    Json,
    /// Markdown-formatted output.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "markdown".parse::<OutputFormat>().unwrap(),
            OutputFormat::Markdown
        );
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn output_format_display() {
        assert_eq!(OutputFormat::Text.to_string(), "text");
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!(OutputFormat::Markdown.to_string(), "markdown");
    }

    #[test]
    fn sizing_mode_round_trips_through_serde() {
        let mode: SizingMode = serde_json::from_str("\"link-count\"").unwrap();
        assert_eq!(mode, SizingMode::LinkCount);
        assert_eq!(serde_json::to_string(&SizingMode::Depth).unwrap(), "\"depth\"");
    }

    #[test]
    fn sizing_mode_rejects_unknown() {
        let err = "radius".parse::<SizingMode>().unwrap_err();
        assert!(err.contains("radius"));
    }

    #[test]
    fn diagnostic_serializes_with_kind_tag() {
        let d = Diagnostic::MissingParent {
            key: "a/b".into(),
            parent: "a".into(),
        };
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["kind"], "missingParent");
        assert_eq!(json["parent"], "a");
    }
}
