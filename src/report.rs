//! Diagnostics sink for split/join progress lines.
//!
//! The splitter and joiner write through an explicit [`Diagnostics`] value
//! instead of printing ad hoc, so color handling lives in one place and
//! tests can capture output by handing in a `Vec<u8>`. Styling is forced on
//! when enabled so piped output matches what an operator sees.

use std::io::Write;
use std::path::Path;

use console::Style;

use crate::config::WORKSPACE_FILE_NAME;

/// Sink for the line-per-fragment audit output.
pub struct Diagnostics<W: Write> {
    out: W,
    /// Test-case unit identifiers.
    unit_style: Style,
    /// Controllers extracted without the `## ` marker.
    nested_style: Style,
    /// Fragment and workspace file names.
    file_style: Style,
}

impl Diagnostics<std::io::Stdout> {
    /// Diagnostics writing to stdout.
    pub fn stdout(colored: bool) -> Self {
        Self::new(std::io::stdout(), colored)
    }
}

impl<W: Write> Diagnostics<W> {
    /// Create a sink over any writer. With `colored` off every line is
    /// plain text.
    pub fn new(out: W, colored: bool) -> Self {
        let styled = |style: Style| {
            if colored {
                style.force_styling(true)
            } else {
                Style::new()
            }
        };
        Self {
            out,
            unit_style: styled(Style::new().green()),
            nested_style: styled(Style::new().cyan()),
            file_style: styled(Style::new().yellow()),
        }
    }

    /// Header line for a file about to be split.
    pub fn begin_split(&mut self, source: &Path) {
        let _ = writeln!(self.out, "Splitting {}", source.display());
    }

    /// Header line for a file about to be joined.
    pub fn begin_join(&mut self, source: &Path) {
        let _ = writeln!(self.out, "Joining {}", source.display());
    }

    /// One extraction: identifier to fragment file. Test-case units and
    /// nested controllers get distinct colors so an operator can audit
    /// which kind was extracted.
    pub fn extracted(&mut self, identifier: &str, filename: &str, test_case: bool) {
        let style = if test_case {
            &self.unit_style
        } else {
            &self.nested_style
        };
        let _ = writeln!(
            self.out,
            "  {} to {}",
            style.apply_to(identifier),
            self.file_style.apply_to(filename)
        );
    }

    /// The workspace document has been written.
    pub fn workspace_written(&mut self) {
        let _ = writeln!(
            self.out,
            "  {} to {}",
            self.unit_style.apply_to("Workspace"),
            self.file_style.apply_to(WORKSPACE_FILE_NAME)
        );
    }

    /// One splice: fragment file back to its identifier.
    pub fn spliced(&mut self, filename: &str, identifier: &str) {
        let _ = writeln!(
            self.out,
            "  {} to {}",
            self.file_style.apply_to(filename),
            self.unit_style.apply_to(identifier)
        );
    }

    /// The reconstructed document has been written.
    pub fn destination_written(&mut self, destination: &Path) {
        let _ = writeln!(
            self.out,
            "  {} to {}",
            self.unit_style.apply_to("Document"),
            self.file_style.apply_to(destination.display())
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captured(colored: bool, write: impl FnOnce(&mut Diagnostics<&mut Vec<u8>>)) -> String {
        let mut buffer = Vec::new();
        let mut diagnostics = Diagnostics::new(&mut buffer, colored);
        write(&mut diagnostics);
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_plain_output_has_no_escape_codes() {
        let output = captured(false, |d| {
            d.extracted("Login", "abc.xml", true);
            d.workspace_written();
        });
        assert!(!output.contains('\x1b'));
        assert!(output.contains("  Login to abc.xml"));
        assert!(output.contains("  Workspace to _workspace.xml"));
    }

    #[test]
    fn test_colored_output_styles_identifier_and_file() {
        let output = captured(true, |d| d.extracted("Login", "abc.xml", true));
        assert!(output.contains("\x1b[32mLogin\x1b[0m"));
        assert!(output.contains("\x1b[33mabc.xml\x1b[0m"));
    }

    #[test]
    fn test_nested_controllers_are_visually_distinct() {
        let unit = captured(true, |d| d.extracted("Login", "a.xml", true));
        let nested = captured(true, |d| d.extracted("Login", "a.xml", false));
        assert_ne!(unit, nested);
        assert!(nested.contains("\x1b[36mLogin\x1b[0m"));
    }

    #[test]
    fn test_spliced_line() {
        let output = captured(false, |d| d.spliced("abc.xml", "Login"));
        assert_eq!(output, "  abc.xml to Login\n");
    }
}
