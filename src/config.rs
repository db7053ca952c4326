//! Sentinel tag names and on-disk conventions for the split/join engine.

use std::path::{Path, PathBuf};

use crate::error::{Result, SplitJoinError};

/// Tag name of a parameterized controller, the boundary of an extractable unit.
pub const CONTROLLER_TAG: &str = "kg.apc.jmeter.control.ParameterizedController";

/// Tag name of the grouping node that follows every JMeter element and holds
/// its sub-tree.
pub const HASH_TREE_TAG: &str = "hashTree";

/// Tag name of a module reference. A controller whose hashTree holds only a
/// ModuleController points at a controller defined elsewhere and is not an
/// independent unit.
pub const MODULE_CONTROLLER_TAG: &str = "ModuleController";

/// Tag name of the placeholder element substituted for an extracted range.
/// Exists only inside workspace files.
pub const PLACEHOLDER_TAG: &str = "jmeter2git.controller";

/// Directory created next to each source file to hold its fragment folders.
pub const PARTS_DIR_NAME: &str = "jmeter2git-parts";

/// Name of the rewritten main document inside a fragment folder.
pub const WORKSPACE_FILE_NAME: &str = "_workspace.xml";

/// Suffix appended to the source path for join output.
pub const DEST_SUFFIX: &str = ".dest.xml";

/// Extension required on source files.
pub const JMX_EXTENSION: &str = "jmx";

/// Maximum number of sibling steps a range walk may take before it is
/// treated as a structural failure rather than a real extraction range.
pub const DEFAULT_SIBLING_RANGE_LIMIT: usize = 100;

/// Fragment folder for a source file: `<parent>/jmeter2git-parts/<stem>/`.
///
/// A pure function of the source path, so repeated splits of the same file
/// always target the same folder.
///
/// # Errors
/// Returns `InvalidExtension` if the path does not end in `.jmx`.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use jmx2git::config::parts_folder;
///
/// let folder = parts_folder(Path::new("plans/checkout.jmx")).unwrap();
/// assert_eq!(folder, Path::new("plans/jmeter2git-parts/checkout"));
/// assert!(parts_folder(Path::new("plans/checkout.xml")).is_err());
/// ```
pub fn parts_folder(source: &Path) -> Result<PathBuf> {
    let stem = match (source.extension(), source.file_stem()) {
        (Some(ext), Some(stem)) if ext == JMX_EXTENSION => stem,
        _ => return Err(SplitJoinError::InvalidExtension(source.to_path_buf())),
    };
    let parent = source.parent().unwrap_or_else(|| Path::new(""));
    Ok(parent.join(PARTS_DIR_NAME).join(stem))
}

/// Join output path for a source file: the source path with `.dest.xml`
/// appended.
pub fn destination_path(source: &Path) -> PathBuf {
    let mut path = source.as_os_str().to_os_string();
    path.push(DEST_SUFFIX);
    PathBuf::from(path)
}
