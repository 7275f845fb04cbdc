//! Template error types.

use stepgraph_core::{BuildError, GraphError};
use thiserror::Error;

/// Errors from rendering a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// The template text is malformed. `position` is the byte offset where
    /// the problem was detected.
    #[error("syntax error at byte {position}: {message}")]
    Syntax { position: usize, message: String },

    #[error("output exceeds the limit of {limit} bytes")]
    OutputLimit { limit: usize },

    #[error("invalid template syntax: {reason}")]
    InvalidSyntax { reason: String },

    #[error("template machine failed to build: {0}")]
    Build(#[from] BuildError),

    #[error("template machine failed: {0}")]
    Graph(#[from] GraphError),
}

impl TemplateError {
    /// Returns a stable error code for display.
    pub fn error_code(&self) -> &'static str {
        match self {
            TemplateError::Syntax { .. } => "SYNTAX_ERROR",
            TemplateError::OutputLimit { .. } => "OUTPUT_LIMIT",
            TemplateError::InvalidSyntax { .. } => "BAD_SYNTAX_CONFIG",
            TemplateError::Build(e) => e.error_code(),
            TemplateError::Graph(e) => e.error_code(),
        }
    }
}
