//! Error types for the split/join engine.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for jmx2git operations.
#[derive(Debug, Error)]
pub enum SplitJoinError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// Source file does not carry the `.jmx` extension.
    #[error("Not a .jmx file: {}", .0.display())]
    InvalidExtension(PathBuf),

    /// A `--jmx-file` glob pattern was malformed.
    #[error("Invalid glob pattern: {0}")]
    InvalidPattern(#[from] glob::PatternError),

    /// No source file matched any of the given patterns.
    #[error(
        "No files matched: {patterns}\n\
         Usage: jmx2git --jmx-file <PATTERN>... (--split | --join)"
    )]
    NoFilesMatched { patterns: String },

    /// Two or more selected controllers normalize to the same identifier.
    ///
    /// Duplicate identifiers would make fragment file names collide, so the
    /// split aborts before writing anything. Carries each offending
    /// identifier with its occurrence count.
    #[error("Controller names must be unique. Duplicates: {}", format_duplicates(.0))]
    DuplicateIdentifiers(Vec<(String, usize)>),

    /// A sibling walk took more steps than the configured limit.
    #[error("Sibling range exceeded {limit} steps without reaching the companion hashTree")]
    SiblingRangeOverflow { limit: usize },

    /// A sibling walk ran out of siblings before reaching its end node.
    #[error("Sibling range ended before reaching the companion hashTree")]
    SiblingRangeBroken,

    /// The workspace file was not found in the fragment folder.
    #[error("Workspace file not found: {}", .0.display())]
    MissingWorkspace(PathBuf),

    /// A placeholder references a fragment file that is not on disk.
    #[error("Fragment file '{filename}' not found in {}", .folder.display())]
    MissingFragment { filename: String, folder: PathBuf },

    /// A required attribute is missing from an element.
    #[error("Missing attribute '{attribute}' on <{element}>")]
    MissingAttribute {
        attribute: &'static str,
        element: String,
    },
}

fn format_duplicates(duplicates: &[(String, usize)]) -> String {
    duplicates
        .iter()
        .map(|(identifier, count)| format!("{count}x \"{identifier}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for jmx2git operations.
pub type Result<T> = std::result::Result<T, SplitJoinError>;
