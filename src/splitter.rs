//! Split engine: extract each test-case controller and its sub-tree into a
//! fragment file and rewrite the main document into a workspace file of
//! placeholders.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::{
    parts_folder, CONTROLLER_TAG, DEFAULT_SIBLING_RANGE_LIMIT, HASH_TREE_TAG,
    MODULE_CONTROLLER_TAG, PLACEHOLDER_TAG, WORKSPACE_FILE_NAME,
};
use crate::error::{Result, SplitJoinError};
use crate::identifier::{extract_identifier, fragment_file_name, is_test_case};
use crate::report::Diagnostics;
use crate::xml::serialize::XML_DECLARATION;
use crate::xml::{
    child_elements, fix_string_prop_tags, is_element_tag, nearest_ancestor_matching,
    next_element_sibling, serialize_document, serialize_node, sibling_range, Document, NodeId,
};

/// Splits one `.jmx` file into a fragment folder.
///
/// Selection and validation run before any rewrite, so a failed validation
/// leaves the fragment folder untouched.
pub struct Splitter<'a, W: Write> {
    source: PathBuf,
    range_limit: usize,
    diagnostics: &'a mut Diagnostics<W>,
}

impl<'a, W: Write> Splitter<'a, W> {
    /// Create a splitter for one source file.
    pub fn new(source: impl Into<PathBuf>, diagnostics: &'a mut Diagnostics<W>) -> Self {
        Self {
            source: source.into(),
            range_limit: DEFAULT_SIBLING_RANGE_LIMIT,
            diagnostics,
        }
    }

    /// Override the sibling-range safety limit.
    #[must_use]
    pub fn with_range_limit(mut self, limit: usize) -> Self {
        self.range_limit = limit;
        self
    }

    /// Split the source file into fragments plus a workspace document.
    ///
    /// # Errors
    /// Fails without writing anything on a missing or malformed source file
    /// and on duplicate identifiers; fails mid-write on IO errors or a
    /// sibling range exceeding the limit (re-running the split is safe, the
    /// folder is fully regenerated each time).
    pub fn split_to_parts(&mut self) -> Result<()> {
        self.diagnostics.begin_split(&self.source);
        let folder = parts_folder(&self.source)?;
        let text = fs::read_to_string(&self.source)?;
        let mut doc = Document::parse(&text)?;

        let controllers = select_controllers(&doc);
        check_duplicates(&doc, &controllers)?;
        self.export_to_parts(&mut doc, &controllers, &folder)
    }

    fn export_to_parts(
        &mut self,
        doc: &mut Document,
        controllers: &[NodeId],
        folder: &Path,
    ) -> Result<()> {
        prepare_folder(folder)?;

        for &controller in controllers {
            let declared = doc.attribute(controller, "testname").unwrap_or("").to_string();
            let Some(companion) = next_element_sibling(doc, controller) else {
                tracing::warn!(
                    testname = %declared,
                    "controller has no following hashTree, skipping extraction"
                );
                continue;
            };
            if !is_element_tag(doc, companion, HASH_TREE_TAG) {
                tracing::warn!(
                    testname = %declared,
                    "controller is not followed by a hashTree, skipping extraction"
                );
                continue;
            }

            let range = sibling_range(doc, controller, companion, self.range_limit)?;
            let identifier = extract_identifier(&declared);
            let filename = fragment_file_name(&identifier);

            let body: String = range.iter().map(|&node| serialize_node(doc, node)).collect();
            let fragment = format!("{XML_DECLARATION}\n<root>{body}</root>");
            fs::write(folder.join(&filename), fix_string_prop_tags(&fragment))?;
            self.diagnostics
                .extracted(&identifier, &filename, is_test_case(&declared));

            let placeholder = doc.create_element(PLACEHOLDER_TAG);
            doc.set_attribute(placeholder, "testname", &identifier);
            doc.set_attribute(placeholder, "filename", &filename);
            doc.replace_child(companion, placeholder);
            // Range holds at least controller and companion; everything but
            // the replaced companion comes out of the tree.
            for &node in &range[..range.len() - 1] {
                doc.detach(node);
            }
        }

        let workspace = fix_string_prop_tags(&serialize_document(doc));
        fs::write(folder.join(WORKSPACE_FILE_NAME), workspace)?;
        self.diagnostics.workspace_written();
        Ok(())
    }
}

/// Create the fragment folder and delete stale `.xml` files from previous
/// splits, so the folder always reflects exactly the current extraction set.
fn prepare_folder(folder: &Path) -> Result<()> {
    fs::create_dir_all(folder)?;
    for entry in fs::read_dir(folder)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "xml") {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Select the controllers to extract, in document order.
///
/// Drops reference controllers (their sub-tree is a lone ModuleController
/// pointing elsewhere) and controllers nested inside a test-case unit. For
/// plans that never adopted the `## ` marker, a controller nested inside
/// another selected controller is dropped as well.
fn select_controllers(doc: &Document) -> Vec<NodeId> {
    let candidates: Vec<NodeId> = doc
        .elements_by_tag(CONTROLLER_TAG)
        .into_iter()
        .filter(|&controller| !is_reference_controller(doc, controller))
        .collect();
    let candidate_set: HashSet<NodeId> = candidates.iter().copied().collect();

    candidates
        .iter()
        .copied()
        .filter(|&controller| match nearest_enclosing_controller(doc, controller) {
            Some(enclosing) => {
                let name = doc.attribute(enclosing, "testname").unwrap_or("");
                if is_test_case(name) {
                    false
                } else {
                    !candidate_set.contains(&enclosing)
                }
            }
            None => true,
        })
        .collect()
}

/// A controller whose hashTree holds exactly one non-hashTree child, a
/// ModuleController: a pure reference to a controller defined elsewhere,
/// never an extraction unit of its own.
fn is_reference_controller(doc: &Document, controller: NodeId) -> bool {
    let Some(next) = next_element_sibling(doc, controller) else {
        return false;
    };
    if !is_element_tag(doc, next, HASH_TREE_TAG) {
        return false;
    }
    let children: Vec<NodeId> = child_elements(doc, next)
        .into_iter()
        .filter(|&child| !is_element_tag(doc, child, HASH_TREE_TAG))
        .collect();
    children.len() == 1 && is_element_tag(doc, children[0], MODULE_CONTROLLER_TAG)
}

/// The controller owning the nearest enclosing hashTree sub-tree, if any.
fn nearest_enclosing_controller(doc: &Document, node: NodeId) -> Option<NodeId> {
    nearest_ancestor_matching(doc, node, |doc, candidate| {
        is_element_tag(doc, candidate, CONTROLLER_TAG)
    })
}

/// Fail when two selected controllers normalize to the same identifier:
/// their fragment files would collide and joins would be ambiguous.
fn check_duplicates(doc: &Document, controllers: &[NodeId]) -> Result<()> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for &controller in controllers {
        let identifier = extract_identifier(doc.attribute(controller, "testname").unwrap_or(""));
        if let Some(entry) = counts.iter_mut().find(|(name, _)| *name == identifier) {
            entry.1 += 1;
        } else {
            counts.push((identifier, 1));
        }
    }

    let duplicates: Vec<(String, usize)> = counts
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .collect();
    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(SplitJoinError::DuplicateIdentifiers(duplicates))
    }
}
