//! jmx2git - Split JMeter test plans into git-friendly fragments.
//!
//! A large `.jmx` file diffs terribly: one edited controller churns the
//! whole document. This crate splits a test plan into one fragment file per
//! test-case controller, each under a name derived from the controller's
//! normalized label, plus a workspace document of placeholders - and joins
//! the fragments back into a structurally identical plan.
//!
//! # Example
//!
//! ```
//! use jmx2git::identifier::extract_identifier;
//!
//! assert_eq!(
//!     extract_identifier("## Checkout flow - T5521 | owner: alice"),
//!     "Checkout flow"
//! );
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Sentinel tag names and on-disk conventions
//! - [`error`]: Error types and Result alias
//! - [`identifier`]: Controller-name normalization and fragment naming
//! - [`xml`]: Owned document tree, navigation, serialization
//! - [`splitter`]: Split engine (select, validate, rewrite, persist)
//! - [`joiner`]: Join engine (load, splice, persist)
//! - [`report`]: Diagnostics sink with optional coloring
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod identifier;
pub mod joiner;
pub mod report;
pub mod splitter;
pub mod xml;

// Re-export the two entry points and common items.
pub use error::{Result, SplitJoinError};
pub use joiner::Joiner;
pub use report::Diagnostics;
pub use splitter::Splitter;
