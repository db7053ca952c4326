//! Identifier policy: normalizing controller names and deriving fragment
//! file names from them.
//!
//! Controller names follow the convention
//! `"## <label> - T<ticket> | <comment>"` where the `## ` marker tags a
//! top-level test case, the ticket token references an issue tracker, and
//! everything after `|` is free-form commentary. Only the label identifies
//! the unit; marker, ticket, and comment are stripped before hashing.

use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};

/// Marker prefix tagging a controller as an independently versioned test case.
pub const TEST_CASE_MARKER: &str = "## ";

/// The label, then an optional `|`-separated trailing comment. Matched
/// after the `## ` marker has been stripped.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static LABEL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^|]+?)\s*(?:\|.*)?$").expect("valid regex"));

/// Embedded ticket reference, e.g. ` - T5521`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static TICKET_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*-\s*T\d+\b").expect("valid regex"));

/// Normalize a controller's declared name into its identifier.
///
/// Strips the leading `## ` marker, the trailing `| ...` comment, and any
/// embedded ` - T<digits>` ticket token, then trims whitespace. Returns an
/// empty string when the name does not match the expected shape at all.
///
/// # Examples
/// ```
/// use jmx2git::identifier::extract_identifier;
///
/// assert_eq!(
///     extract_identifier("## Checkout flow - T5521 | owner: alice"),
///     "Checkout flow"
/// );
/// ```
pub fn extract_identifier(declared_name: &str) -> String {
    let name = declared_name
        .strip_prefix(TEST_CASE_MARKER)
        .unwrap_or(declared_name);
    let Some(captures) = LABEL_PATTERN.captures(name) else {
        return String::new();
    };
    let label = captures.get(1).map(|m| m.as_str()).unwrap_or("");
    TICKET_PATTERN.replace_all(label, "").trim().to_string()
}

/// Whether a declared name carries the `## ` test-case marker, tagging the
/// controller as a top-level extraction unit rather than a nested helper.
pub fn is_test_case(declared_name: &str) -> bool {
    declared_name.starts_with(TEST_CASE_MARKER)
}

/// Fragment file name for an identifier: the hex SHA-256 of the identifier
/// plus `.xml`. Deterministic, so re-splitting the same controller always
/// targets the same file and diffs stay stable.
pub fn fragment_file_name(identifier: &str) -> String {
    let digest = Sha256::digest(identifier.as_bytes());
    format!("{digest:x}.xml")
}
