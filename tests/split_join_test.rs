//! End-to-end split/join tests over a realistic JMeter plan fixture.
//!
//! The fixture carries the shapes the engine has to handle: two `## `
//! test-case controllers (one with a ticket token, one with a trailing
//! comment), a helper controller nested inside a test case, and a
//! reference controller whose hashTree holds only a ModuleController.

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;

use jmx2git::config::{destination_path, parts_folder, CONTROLLER_TAG, WORKSPACE_FILE_NAME};
use jmx2git::identifier::fragment_file_name;
use jmx2git::xml::{fix_string_prop_tags, serialize_document, Document};
use jmx2git::{Diagnostics, Joiner, Result, SplitJoinError, Splitter};

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Copy a fixture into a scratch directory so splits write next to it.
fn stage_fixture(dir: &Path, name: &str) -> PathBuf {
    let staged = dir.join(name);
    fs::copy(fixture_path(name), &staged).unwrap();
    staged
}

fn run_split(source: &Path) -> (Result<()>, String) {
    let mut buffer = Vec::new();
    let mut diagnostics = Diagnostics::new(&mut buffer, false);
    let result = Splitter::new(source, &mut diagnostics).split_to_parts();
    (result, String::from_utf8(buffer).unwrap())
}

fn run_join(source: &Path) -> (Result<()>, String) {
    let mut buffer = Vec::new();
    let mut diagnostics = Diagnostics::new(&mut buffer, false);
    let result = Joiner::new(source, &mut diagnostics).join_from_parts();
    (result, String::from_utf8(buffer).unwrap())
}

fn xml_files(folder: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(folder)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".xml"))
        .collect();
    names.sort();
    names
}

#[test]
fn test_round_trip_reproduces_the_original_document() {
    let dir = tempfile::tempdir().unwrap();
    let source = stage_fixture(dir.path(), "sample.jmx");

    run_split(&source).0.unwrap();
    run_join(&source).0.unwrap();

    let original = Document::parse(&fs::read_to_string(&source).unwrap()).unwrap();
    let expected = fix_string_prop_tags(&serialize_document(&original));
    let actual = fs::read_to_string(destination_path(&source)).unwrap();
    assert_eq!(actual, expected);
}

#[test]
fn test_split_writes_one_fragment_per_test_case() {
    let dir = tempfile::tempdir().unwrap();
    let source = stage_fixture(dir.path(), "sample.jmx");

    run_split(&source).0.unwrap();

    let folder = parts_folder(&source).unwrap();
    let mut expected = vec![
        WORKSPACE_FILE_NAME.to_string(),
        fragment_file_name("Login"),
        fragment_file_name("Checkout flow"),
    ];
    expected.sort();
    assert_eq!(xml_files(&folder), expected);
}

#[test]
fn test_workspace_keeps_only_unextracted_controllers() {
    let dir = tempfile::tempdir().unwrap();
    let source = stage_fixture(dir.path(), "sample.jmx");

    run_split(&source).0.unwrap();

    let folder = parts_folder(&source).unwrap();
    let workspace =
        Document::parse(&fs::read_to_string(folder.join(WORKSPACE_FILE_NAME)).unwrap()).unwrap();

    // The reference controller stays; the extracted and nested ones do not.
    let remaining: Vec<&str> = workspace
        .elements_by_tag(CONTROLLER_TAG)
        .iter()
        .filter_map(|&id| workspace.attribute(id, "testname"))
        .collect();
    assert_eq!(remaining, vec!["Call login"]);

    let placeholders = workspace.elements_by_tag("jmeter2git.controller");
    let labels: Vec<&str> = placeholders
        .iter()
        .filter_map(|&id| workspace.attribute(id, "testname"))
        .collect();
    assert_eq!(labels, vec!["Login", "Checkout flow"]);
    for &placeholder in &placeholders {
        let filename = workspace.attribute(placeholder, "filename").unwrap();
        assert!(folder.join(filename).exists());
    }
}

#[test]
fn test_fragment_wraps_range_in_synthetic_root() {
    let dir = tempfile::tempdir().unwrap();
    let source = stage_fixture(dir.path(), "sample.jmx");

    run_split(&source).0.unwrap();

    let folder = parts_folder(&source).unwrap();
    let fragment = fs::read_to_string(folder.join(fragment_file_name("Login"))).unwrap();
    assert!(fragment.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root>"));
    assert!(fragment.ends_with("</root>"));
    // The extracted range: the controller itself plus its hashTree, with
    // the nested helper controller inside.
    assert!(fragment.contains("testname=\"## Login - T1001\""));
    assert!(fragment.contains("testname=\"Fill credentials\""));
    // stringProp elements are never self-closed on disk.
    assert!(fragment.contains("<stringProp name=\"HTTPSampler.domain\"></stringProp>"));
    assert!(!fragment.contains("<stringProp name=\"HTTPSampler.domain\"/>"));
}

#[test]
fn test_resplit_is_deterministic_and_purges_stale_files() {
    let dir = tempfile::tempdir().unwrap();
    let source = stage_fixture(dir.path(), "sample.jmx");

    run_split(&source).0.unwrap();
    let folder = parts_folder(&source).unwrap();
    let first = xml_files(&folder);

    // A leftover from an extraction set that no longer exists.
    fs::write(folder.join("deadbeef.xml"), "stale").unwrap();

    run_split(&source).0.unwrap();
    assert_eq!(xml_files(&folder), first);
}

#[test]
fn test_split_diagnostics_name_each_fragment() {
    let dir = tempfile::tempdir().unwrap();
    let source = stage_fixture(dir.path(), "sample.jmx");

    let (result, output) = run_split(&source);
    result.unwrap();

    assert!(output.contains(&format!("  Login to {}", fragment_file_name("Login"))));
    assert!(output.contains(&format!(
        "  Checkout flow to {}",
        fragment_file_name("Checkout flow")
    )));
    assert!(output.contains("  Workspace to _workspace.xml"));
}

#[test]
fn test_duplicate_identifiers_abort_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("dup.jmx");
    fs::write(
        &source,
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <jmeterTestPlan><hashTree>\
               <{tag} testname=\"## Login | step 1\"/>\
               <hashTree><sampler/><hashTree/></hashTree>\
               <{tag} testname=\"## Login - T1234\"/>\
               <hashTree><sampler/><hashTree/></hashTree>\
             </hashTree></jmeterTestPlan>",
            tag = CONTROLLER_TAG
        ),
    )
    .unwrap();

    let (result, _) = run_split(&source);
    match result.unwrap_err() {
        SplitJoinError::DuplicateIdentifiers(duplicates) => {
            assert_eq!(duplicates, vec![("Login".to_string(), 2)]);
        }
        other => panic!("expected DuplicateIdentifiers, got {other:?}"),
    }
    // Validation fails before the fragment folder is even created.
    assert!(!parts_folder(&source).unwrap().exists());
}

#[test]
fn test_oversized_sibling_range_fails_instead_of_hanging() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("wide.jmx");
    let filler = "<!-- filler -->".repeat(150);
    fs::write(
        &source,
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <jmeterTestPlan><hashTree>\
               <{CONTROLLER_TAG} testname=\"## Wide\"/>\
               {filler}\
               <hashTree><sampler/><hashTree/></hashTree>\
             </hashTree></jmeterTestPlan>"
        ),
    )
    .unwrap();

    let (result, _) = run_split(&source);
    assert!(matches!(
        result.unwrap_err(),
        SplitJoinError::SiblingRangeOverflow { limit: 100 }
    ));
}

#[test]
fn test_split_rejects_non_jmx_sources() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("plan.xml");
    fs::write(&source, "<jmeterTestPlan/>").unwrap();

    let (result, _) = run_split(&source);
    assert!(matches!(
        result.unwrap_err(),
        SplitJoinError::InvalidExtension(_)
    ));
}

#[test]
fn test_split_fails_on_missing_source() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("absent.jmx");

    let (result, _) = run_split(&source);
    assert!(matches!(result.unwrap_err(), SplitJoinError::Io(_)));
}

#[test]
fn test_join_diagnostics_name_each_splice() {
    let dir = tempfile::tempdir().unwrap();
    let source = stage_fixture(dir.path(), "sample.jmx");
    run_split(&source).0.unwrap();

    let (result, output) = run_join(&source);
    result.unwrap();

    assert!(output.contains(&format!("  {} to Login", fragment_file_name("Login"))));
    assert!(output.contains(&format!(
        "  {} to Checkout flow",
        fragment_file_name("Checkout flow")
    )));
}
