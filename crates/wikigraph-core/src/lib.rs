//! Core types, configuration, and error handling for wikigraph.
//!
//! This crate provides the shared foundation used by the other wikigraph crates:
//! - [`WikigraphError`]: unified error type using `thiserror`
//! - [`WikigraphConfig`]: configuration loaded from `.wikigraph.toml`
//! - Shared types: [`SizingMode`], [`Diagnostic`], [`OutputFormat`]

mod config;
mod error;
mod types;

pub use config::{GraphConfig, SiteConfig, WikigraphConfig};
pub use error::WikigraphError;
pub use types::{Diagnostic, OutputFormat, SizingMode};

/// A convenience `Result` type for wikigraph operations.
pub type Result<T> = std::result::Result<T, WikigraphError>;
