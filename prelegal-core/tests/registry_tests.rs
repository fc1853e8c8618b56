//! Catalog loading, error-message, and built-in schema integration tests.

use assert_fs::prelude::*;
use predicates::prelude::predicate;
use prelegal_core::{DocType, DocumentRegistry, RegistryError};
use rstest::rstest;

const MINIMAL_CATALOG: &str = r#"
version: 1
fallback: unknown
documents:
  - id: pilot
    name: Pilot Agreement
    fields: [providerName, customerName]
    prompt: Ask about the pilot.
  - id: unknown
    name: Unknown
    fields: [detectedDocType]
    prompt: Work out the document.
"#;

// ---------------------------------------------------------------------------
// 1. Load from disk
// ---------------------------------------------------------------------------

#[test]
fn load_catalog_from_file() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("catalog.yaml");
    file.write_str(MINIMAL_CATALOG).expect("write");
    file.assert(predicate::path::exists());

    let registry = DocumentRegistry::load_at(file.path()).expect("load");
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.lookup("pilot").fields, vec!["providerName", "customerName"]);
    assert_eq!(registry.lookup("sla").id, DocType::unknown());
}

#[test]
fn load_missing_catalog_returns_not_found() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let err = DocumentRegistry::load_at(&dir.path().join("nope.yaml")).unwrap_err();
    assert!(matches!(err, RegistryError::CatalogNotFound { .. }), "got: {err}");
    assert!(err.to_string().contains("nope.yaml"));
}

#[test]
fn load_corrupt_yaml_returns_parse_error_with_path() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("broken.yaml");
    file.write_str(": : corrupt : yaml : !!!\n  - broken: [unclosed").expect("write");

    let err = DocumentRegistry::load_at(file.path()).unwrap_err();
    assert!(matches!(err, RegistryError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains("broken.yaml"), "must contain file path, got: {err}");
}

#[test]
fn catalog_without_fallback_entry_is_rejected() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("catalog.yaml");
    file.write_str(
        "fallback: classifier\ndocuments:\n  - id: pilot\n    name: Pilot\n    prompt: p\n",
    )
    .expect("write");

    let err = DocumentRegistry::load_at(file.path()).unwrap_err();
    assert!(matches!(err, RegistryError::MissingFallback(ref id) if id == "classifier"));
}

// ---------------------------------------------------------------------------
// 2. Built-in catalog contents
// ---------------------------------------------------------------------------

#[rstest]
#[case("mnda", 16)]
#[case("csa", 8)]
#[case("sla", 8)]
#[case("design_partner", 7)]
#[case("psa", 6)]
#[case("dpa", 6)]
#[case("partnership", 8)]
#[case("software_license", 7)]
#[case("pilot", 6)]
#[case("baa", 5)]
#[case("ai_addendum", 5)]
#[case("unknown", 1)]
fn builtin_field_counts(#[case] doc_type: &str, #[case] expected: usize) {
    let registry = DocumentRegistry::builtin().expect("builtin");
    let config = registry.get(doc_type).unwrap_or_else(|| panic!("{doc_type} missing"));
    assert_eq!(config.fields.len(), expected, "[{doc_type}] field count");
    assert!(!config.prompt.is_empty(), "[{doc_type}] prompt");
    assert!(
        config.prompt.ends_with("Always respond in the structured format requested."),
        "[{doc_type}] prompt must end with the structured-output reminder"
    );
}

#[test]
fn classifier_prompt_names_every_draftable_document() {
    let registry = DocumentRegistry::builtin().expect("builtin");
    let classifier = registry.fallback();
    assert!(classifier.has_field("detectedDocType"));
    for doc in registry.drafts() {
        assert!(
            classifier.prompt.contains(&format!("- {}:", doc.id)),
            "classifier prompt does not mention {}",
            doc.id
        );
    }
}
