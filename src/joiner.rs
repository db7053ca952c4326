//! Join engine: splice fragment files back over their placeholders and
//! reconstruct the original document.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::{destination_path, parts_folder, PLACEHOLDER_TAG, WORKSPACE_FILE_NAME};
use crate::error::{Result, SplitJoinError};
use crate::report::Diagnostics;
use crate::xml::{fix_string_prop_tags, serialize_document, Document, NodeId};

/// Joins one `.jmx` file's fragment folder back into a full document.
pub struct Joiner<'a, W: Write> {
    source: PathBuf,
    diagnostics: &'a mut Diagnostics<W>,
}

impl<'a, W: Write> Joiner<'a, W> {
    /// Create a joiner for one source file.
    pub fn new(source: impl Into<PathBuf>, diagnostics: &'a mut Diagnostics<W>) -> Self {
        Self {
            source: source.into(),
            diagnostics,
        }
    }

    /// Rebuild the document from the workspace file and its fragments,
    /// writing the result next to the source file with a `.dest.xml`
    /// suffix.
    ///
    /// # Errors
    /// Fails fatally on a missing workspace, a placeholder without a
    /// `filename` attribute, a missing or malformed fragment file, or IO
    /// errors. Nothing is written on failure.
    pub fn join_from_parts(&mut self) -> Result<()> {
        self.diagnostics.begin_join(&self.source);
        let folder = parts_folder(&self.source)?;
        let mut doc = load_workspace(&folder)?;

        for placeholder in doc.elements_by_tag(PLACEHOLDER_TAG) {
            self.splice_fragment(&mut doc, placeholder, &folder)?;
        }

        let destination = destination_path(&self.source);
        fs::write(&destination, fix_string_prop_tags(&serialize_document(&doc)))?;
        self.diagnostics.destination_written(&destination);
        Ok(())
    }

    /// Replace one placeholder with the child nodes of its fragment's
    /// synthetic `<root>`, inserted as a contiguous block in original order.
    fn splice_fragment(
        &mut self,
        doc: &mut Document,
        placeholder: NodeId,
        folder: &Path,
    ) -> Result<()> {
        let filename = doc
            .attribute(placeholder, "filename")
            .ok_or(SplitJoinError::MissingAttribute {
                attribute: "filename",
                element: PLACEHOLDER_TAG.to_string(),
            })?
            .to_string();
        let identifier = doc.attribute(placeholder, "testname").unwrap_or("").to_string();
        self.diagnostics.spliced(&filename, &identifier);

        let fragment_path = folder.join(&filename);
        let text = fs::read_to_string(&fragment_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SplitJoinError::MissingFragment {
                    filename: filename.clone(),
                    folder: folder.to_path_buf(),
                }
            } else {
                SplitJoinError::Io(e)
            }
        })?;
        let fragment = Document::parse(&text)?;
        let Some(fragment_root) = fragment.root_element() else {
            // An empty fragment splices to nothing.
            doc.detach(placeholder);
            return Ok(());
        };

        for &child in fragment.children(fragment_root) {
            let imported = doc.import_from(&fragment, child);
            doc.insert_before(imported, placeholder);
        }
        doc.detach(placeholder);
        Ok(())
    }
}

fn load_workspace(folder: &Path) -> Result<Document> {
    let workspace = folder.join(WORKSPACE_FILE_NAME);
    let text = fs::read_to_string(&workspace).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SplitJoinError::MissingWorkspace(workspace.clone())
        } else {
            SplitJoinError::Io(e)
        }
    })?;
    Document::parse(&text)
}
