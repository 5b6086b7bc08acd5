//! Integration tests for the `suggest` and `apply` front door, driven through
//! declaration outlines written to a temporary directory.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use tugaccess::cli::{run_apply, run_suggest};
use tugaccess::csharp::decl::NodeId;
use tugaccess::csharp::ops::AdvisorOptions;
use tugaccess::csharp::tree::DeclarationTree;
use tugaccess::error::{AccessError, OutputErrorCode};
use tugaccess::output::ErrorResponse;
use tugaccess::visibility::Visibility;

const OUTLINE: &str = r#"{
  "declarations": [
    { "id": 0, "name": "Widget", "kind": "type", "modifiers": ["public"] },
    { "id": 1, "name": "Count", "kind": "property", "modifiers": ["public"], "parent": 0 },
    { "id": 2, "name": "set", "kind": "accessor", "parent": 1 },
    { "id": 3, "name": "Draw", "kind": "method", "modifiers": ["static"], "parent": 0 },
    { "id": 4, "name": "Paint", "kind": "method", "modifiers": ["public", "override"], "parent": 0 },
    { "id": 5, "name": "IShape", "kind": "type", "is_interface": true },
    { "id": 6, "name": "Area", "kind": "method", "parent": 5 },
    { "id": 7, "name": "Helpers", "kind": "type" }
  ]
}"#;

fn write_outline(contents: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("outline.json");
    fs::write(&path, contents).expect("Failed to write outline");
    (dir, path)
}

fn opts() -> AdvisorOptions {
    AdvisorOptions::default()
}

// ============================================================================
// suggest
// ============================================================================

#[test]
fn suggest_nested_method() {
    let (_dir, path) = write_outline(OUTLINE);
    let response = run_suggest(&path, 3, &opts()).unwrap();
    assert_eq!(response.status, "ok");
    assert_eq!(response.name.as_deref(), Some("Draw"));
    assert_eq!(response.current, Some(Visibility::Private));
    let targets: Vec<_> = response.actions.iter().map(|a| a.target).collect();
    assert_eq!(
        targets,
        vec![
            Visibility::Protected,
            Visibility::ProtectedInternal,
            Visibility::Internal,
            Visibility::Public
        ]
    );
    assert!(response.actions.iter().all(|a| a.node == 3));
}

#[test]
fn suggest_accessor_narrows_owner() {
    let (_dir, path) = write_outline(OUTLINE);
    let response = run_suggest(&path, 2, &opts()).unwrap();
    assert_eq!(response.current, Some(Visibility::Public));
    assert_eq!(response.actions[0].label, "To private");
    assert!(!response
        .actions
        .iter()
        .any(|a| a.target == Visibility::Public));
}

#[test]
fn suggest_override_is_empty_but_reports_current() {
    let (_dir, path) = write_outline(OUTLINE);
    let response = run_suggest(&path, 4, &opts()).unwrap();
    assert_eq!(response.current, Some(Visibility::Public));
    assert!(response.actions.is_empty());
}

#[test]
fn suggest_interface_member_has_no_current() {
    let (_dir, path) = write_outline(OUTLINE);
    let response = run_suggest(&path, 6, &opts()).unwrap();
    assert_eq!(response.current, None);
    assert!(response.actions.is_empty());
}

#[test]
fn suggest_top_level_respects_option() {
    let (_dir, path) = write_outline(OUTLINE);
    let default = run_suggest(&path, 7, &opts()).unwrap();
    assert_eq!(default.current, Some(Visibility::Internal));
    assert_eq!(default.actions.len(), 1);
    assert_eq!(default.actions[0].label, "To public");

    let permissive = AdvisorOptions {
        top_level_protected_internal: true,
    };
    let response = run_suggest(&path, 7, &permissive).unwrap();
    assert_eq!(response.actions[0].label, "To protected internal");
}

#[test]
fn suggest_response_serializes_schema() {
    let (_dir, path) = write_outline(OUTLINE);
    let response = run_suggest(&path, 3, &opts()).unwrap();
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["schema_version"], "1");
    assert_eq!(json["current"], "private");
    assert_eq!(json["actions"][1]["target"], "protected_internal");
}

// ============================================================================
// apply
// ============================================================================

#[test]
fn apply_without_write_leaves_file_untouched() {
    let (_dir, path) = write_outline(OUTLINE);
    let response = run_apply(&path, 3, Visibility::Internal, &opts(), false).unwrap();
    assert_eq!(response.modifiers, vec!["internal", "static"]);
    assert!(!response.written);
    assert_eq!(fs::read_to_string(&path).unwrap(), OUTLINE);
}

#[test]
fn apply_with_write_persists_and_resuggests() {
    let (_dir, path) = write_outline(OUTLINE);
    let response = run_apply(&path, 3, Visibility::Public, &opts(), true).unwrap();
    assert!(response.written);

    let tree = DeclarationTree::from_path(&path).unwrap();
    let draw = tree.get(NodeId(3)).unwrap();
    assert_eq!(draw.modifiers.visibility(), Ok(Some(Visibility::Public)));
    assert_eq!(draw.name.as_deref(), Some("Draw"));
    assert_eq!(tree.len(), 8);

    let again = run_suggest(&path, 3, &opts()).unwrap();
    assert_eq!(again.current, Some(Visibility::Public));
    assert!(!again.actions.iter().any(|a| a.target == Visibility::Public));
}

#[test]
fn apply_refuses_excluded_declaration() {
    let (_dir, path) = write_outline(OUTLINE);
    let err = run_apply(&path, 4, Visibility::Private, &opts(), true).unwrap_err();
    assert_eq!(err.error_code(), OutputErrorCode::ApplyError);
    assert_eq!(fs::read_to_string(&path).unwrap(), OUTLINE);
}

#[test]
fn apply_refuses_widening_accessor() {
    let (_dir, path) = write_outline(OUTLINE);
    let err = run_apply(&path, 2, Visibility::Public, &opts(), false).unwrap_err();
    assert!(matches!(err, AccessError::ApplyError { node: Some(2), .. }));
}

// ============================================================================
// errors
// ============================================================================

#[test]
fn missing_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let err = run_suggest(&dir.path().join("absent.json"), 0, &opts()).unwrap_err();
    assert!(matches!(err, AccessError::FileNotFound { .. }));
}

#[test]
fn unknown_node_is_resolution_error() {
    let (_dir, path) = write_outline(OUTLINE);
    let err = run_suggest(&path, 99, &opts()).unwrap_err();
    assert_eq!(err.error_code(), OutputErrorCode::ResolutionError);
    assert_eq!(err.error_code().code(), 3);
}

#[test]
fn cyclic_outline_is_invalid_arguments() {
    let (_dir, path) = write_outline(
        r#"{ "declarations": [
            { "id": 0, "kind": "type", "parent": 1 },
            { "id": 1, "kind": "type", "parent": 0 }
        ] }"#,
    );
    let err = run_suggest(&path, 0, &opts()).unwrap_err();
    assert_eq!(err.error_code(), OutputErrorCode::InvalidArguments);
}

#[test]
fn malformed_json_is_invalid_arguments() {
    let (_dir, path) = write_outline("{ not json");
    let err = run_suggest(&path, 0, &opts()).unwrap_err();
    assert_eq!(err.error_code(), OutputErrorCode::InvalidArguments);

    let response = ErrorResponse::from_error(&err);
    assert_eq!(response.status, "error");
    assert_eq!(response.error.code, 2);
}

#[test]
fn conflicting_modifiers_are_resolution_error() {
    let (_dir, path) = write_outline(
        r#"{ "declarations": [
            { "id": 0, "kind": "field", "modifiers": ["public", "private"] }
        ] }"#,
    );
    let err = run_suggest(&path, 0, &opts()).unwrap_err();
    assert!(matches!(err, AccessError::MalformedContext { node: 0, .. }));
}

#[test]
fn modifiers_may_be_written_as_source_text() {
    let (_dir, path) = write_outline(
        r#"{ "declarations": [
            { "id": 0, "kind": "type", "modifiers": "public sealed" },
            { "id": 1, "kind": "method", "modifiers": "protected internal static", "parent": 0 }
        ] }"#,
    );
    let response = run_suggest(&path, 1, &opts()).unwrap();
    assert_eq!(response.current, Some(Visibility::ProtectedInternal));

    let applied = run_apply(&path, 1, Visibility::Private, &opts(), true).unwrap();
    assert_eq!(applied.modifiers, vec!["private", "static"]);
    let tree = DeclarationTree::from_path(&path).unwrap();
    assert_eq!(
        tree.get(NodeId(1)).unwrap().modifiers.keywords(),
        vec!["private", "static"]
    );
}

#[test]
fn unknown_modifier_text_is_invalid_arguments() {
    let (_dir, path) = write_outline(
        r#"{ "declarations": [ { "id": 0, "kind": "type", "modifiers": "public friend" } ] }"#,
    );
    let err = run_suggest(&path, 0, &opts()).unwrap_err();
    assert_eq!(err.error_code(), OutputErrorCode::InvalidArguments);
}
