use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum OntokitError {
    #[error("Failed to parse project config {path}:{line}:{column}\n{snippet}")]
    #[diagnostic(help("Check the YAML against the documented project schema"))]
    ConfigParse {
        path: PathBuf,
        /// 1-based line of the offending token.
        line: usize,
        /// 1-based column of the offending token.
        column: usize,
        /// The offending line's text with a caret marker under the column.
        snippet: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid project configuration: {message}")]
    ConfigValidation { message: String },

    #[error("Failed to serialize project configuration")]
    ConfigSerialize {
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Template rendering failed for {file}")]
    #[diagnostic(help("Check the template against the resolved project configuration"))]
    Render {
        file: String,
        #[source]
        source: tera::Error,
    },

    #[error("File marker \"^^^ \" required before content line {line:?}")]
    UnpackFormat { line: String },

    #[error("Expected exactly one target, got {}: {}", candidates.len(), candidates.join(", "))]
    AmbiguousTarget { candidates: Vec<String> },

    #[error("No project config matching *-ontokit.yaml found under {}", dir.display())]
    #[diagnostic(help("Seed the repository first, or pass an explicit config with -C"))]
    MissingConfig { dir: PathBuf },

    #[error("External command failed: {command}\n{stderr}")]
    ExternalTool { command: String, stderr: String },

    #[error("Git author identity is not configured")]
    #[diagnostic(help("Set user.name and user.email with `git config` before committing"))]
    MissingIdentity,

    #[error("Glob pattern error: {pattern}")]
    GlobPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Malformed XML catalog: {message}")]
    CatalogFormat { message: String },

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, OntokitError>;

impl OntokitError {
    /// Wrap an IO failure with a human-readable operation description.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        OntokitError::Io {
            context: context.into(),
            source,
        }
    }
}
