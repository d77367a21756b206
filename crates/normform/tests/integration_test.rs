//! Integration tests for normform.

use std::io::Write;
use std::path::Path;

use tempfile::{NamedTempFile, TempDir};

use normform::{
    DependencyRule, DiscoveryConfig, KeyRegistry, MissingKeys, NormalForm, Normalizer,
    NormalizerConfig, NormformError, Parser, ParserConfig, PrimaryKey,
};

/// Helper to create a temporary CSV file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".csv").expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

fn write_file(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).expect("Failed to write data file");
}

fn key(attributes: &[&str]) -> PrimaryKey {
    PrimaryKey::new(attributes.iter().copied()).expect("non-empty key")
}

fn rendered(result: &normform::AnalysisResult) -> Vec<String> {
    result.dependencies.iter().map(ToString::to_string).collect()
}

// =============================================================================
// Discovery Tests
// =============================================================================

#[test]
fn test_worked_example_discovery() {
    let file = create_test_file("A,B,C\n1,x,p\n1,x,q\n2,y,p\n");

    let result = Normalizer::new()
        .analyze(file.path(), &key(&["A"]))
        .expect("Analysis failed");

    // Only {A, C} and {B, C} split the rows into singletons.
    assert_eq!(rendered(&result), ["{A, C} -> B", "{B, C} -> A"]);
    assert_eq!(result.summary.candidate_count, 6);
}

#[test]
fn test_all_but_one_attribute_determinant() {
    let file = create_test_file("a,b,c,d\n1,1,1,9\n1,1,2,9\n1,2,1,9\n2,1,1,9\n");

    let result = Normalizer::new()
        .analyze(file.path(), &key(&["a", "b", "c"]))
        .expect("Analysis failed");

    assert!(rendered(&result).contains(&"{a, b, c} -> d".to_string()));
    assert!(result.normal_forms.is_3nf);
}

#[test]
fn test_value_consistency_rule_from_file() {
    let file = create_test_file("A,B,C\n1,x,p\n1,x,q\n2,y,p\n");
    let config = NormalizerConfig {
        discovery: DiscoveryConfig {
            rule: DependencyRule::ValueConsistency,
            ..Default::default()
        },
        ..Default::default()
    };

    let result = Normalizer::with_config(config)
        .analyze(file.path(), &key(&["A", "C"]))
        .expect("Analysis failed");

    // {A} -> B is a partial dependency on the key {A, C}.
    assert!(!result.normal_forms.is_2nf);
    assert_eq!(result.normal_forms.partial_dependencies[0].to_string(), "{A} -> B");
}

#[test]
fn test_missing_keys_from_file() {
    // Empty cells and NA tokens are both missing; only the X row keeps a key.
    let content = "code,label\n,first\n,second\nNA,third\nNA,fourth\nX,fifth\n";
    let file = create_test_file(content);

    let skipped = Normalizer::new()
        .analyze(file.path(), &key(&["code"]))
        .expect("Analysis failed");
    assert_eq!(rendered(&skipped), ["{code} -> label", "{label} -> code"]);
    assert_eq!(skipped.source.as_ref().map(|s| s.missing_cells), Some(4));

    let config = NormalizerConfig {
        discovery: DiscoveryConfig {
            missing_keys: MissingKeys::Group,
            ..Default::default()
        },
        ..Default::default()
    };
    let grouped = Normalizer::with_config(config)
        .analyze(file.path(), &key(&["code"]))
        .expect("Analysis failed");
    assert_eq!(rendered(&grouped), ["{label} -> code"]);
}

#[test]
fn test_mixed_codes_are_compared_as_text() {
    let file = create_test_file("k,v\n01,a\n1,b\nabc,c\n");

    let result = Normalizer::new()
        .analyze(file.path(), &key(&["k"]))
        .expect("Analysis failed");

    assert_eq!(rendered(&result), ["{k} -> v", "{v} -> k"]);
}

// =============================================================================
// Classification Tests
// =============================================================================

#[test]
fn test_composite_key_partial_dependency() {
    // EmployeeID alone identifies the rows, so it determines Amount while
    // being a strict subset of the key.
    let content = "EmployeeID,PayrollDate,Amount\n\
                   1,2024-01-31,100\n\
                   2,2024-01-31,200\n\
                   3,2024-02-29,100\n";
    let file = create_test_file(content);

    let result = Normalizer::new()
        .analyze(file.path(), &key(&["EmployeeID", "PayrollDate"]))
        .expect("Analysis failed");

    assert!(result.normal_forms.is_1nf);
    assert!(!result.normal_forms.is_2nf);
    assert!(
        result
            .normal_forms
            .partial_dependencies
            .iter()
            .any(|fd| fd.to_string() == "{EmployeeID} -> Amount")
    );
    assert_eq!(result.summary.highest_normal_form, Some(NormalForm::First));
}

#[test]
fn test_third_normal_form_holds() {
    let content = "id,amount\n1,10\n2,10\n3,20\n";
    let file = create_test_file(content);

    let result = Normalizer::new()
        .analyze(file.path(), &key(&["id"]))
        .expect("Analysis failed");

    assert_eq!(rendered(&result), ["{id} -> amount"]);
    assert!(result.normal_forms.is_2nf);
    assert!(result.normal_forms.is_3nf);
    assert_eq!(result.summary.highest_normal_form, Some(NormalForm::Third));
}

#[test]
fn test_composite_cells_fail_first_normal_form() {
    let content = "id\ttags\n1\t[\"a\", \"b\"]\n2\t[\"c\"]\n";
    let file = create_test_file(content);
    let config = NormalizerConfig {
        parser: ParserConfig {
            composite_values: true,
            ..Default::default()
        },
        ..Default::default()
    };

    let result = Normalizer::with_config(config)
        .analyze(file.path(), &key(&["id"]))
        .expect("Analysis failed");

    assert!(!result.normal_forms.is_1nf);
    assert_eq!(result.summary.highest_normal_form, None);
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[test]
fn test_ragged_file_is_malformed() {
    let file = create_test_file("a,b,c\n1,2,3\n4,5\n");

    let err = Normalizer::new()
        .analyze(file.path(), &key(&["a"]))
        .unwrap_err();

    let name = file
        .path()
        .file_name()
        .unwrap()
        .to_string_lossy()
        .into_owned();
    match err {
        NormformError::MalformedData { dataset, .. } => assert_eq!(dataset, name),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_single_column_has_no_dependencies() {
    let file = create_test_file("id\n1\n2\n");

    let result = Normalizer::new()
        .analyze(file.path(), &key(&["id"]))
        .expect("Analysis failed");

    assert!(result.dependencies.is_empty());
    assert_eq!(result.summary.candidate_count, 0);
    assert!(result.normal_forms.is_1nf);
    assert!(result.normal_forms.is_2nf);
    assert!(result.normal_forms.is_3nf);
}

#[test]
fn test_missing_file_is_io_error() {
    let err = Parser::new()
        .parse_file("/nonexistent/path/data.csv")
        .unwrap_err();
    assert!(matches!(err, NormformError::Io { .. }));
}

// =============================================================================
// Directory Tests
// =============================================================================

#[test]
fn test_directory_analysis_is_independent_per_file() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "department.csv",
        "DepartmentID,Name,Floor\n1,Sales,2\n2,IT,2\n3,HR,1\n",
    );
    write_file(dir.path(), "project.csv", "ProjectID,Budget\n10,500\n11,500\n");
    write_file(dir.path(), "broken.csv", "a,b\n1\n");
    write_file(dir.path(), "unregistered.csv", "x,y\n1,2\n");

    let registry = KeyRegistry::new()
        .with("department.csv", ["DepartmentID"])
        .with("project.csv", ["ProjectID"])
        .with("broken.csv", ["a"]);

    let entries = Normalizer::new()
        .analyze_directory(dir.path(), &registry)
        .expect("Directory analysis failed");

    let names: Vec<&str> = entries.iter().map(|e| e.dataset.as_str()).collect();
    assert_eq!(
        names,
        ["broken.csv", "department.csv", "project.csv", "unregistered.csv"]
    );

    assert!(matches!(
        entries[0].outcome,
        Err(NormformError::MalformedData { .. })
    ));
    assert!(matches!(
        entries[3].outcome,
        Err(NormformError::MissingInput { .. })
    ));

    let department = entries[1].outcome.as_ref().expect("department analyzed");
    let project = entries[2].outcome.as_ref().expect("project analyzed");

    // {Name} -> Floor breaks 3NF for departments only.
    assert!(!department.normal_forms.is_3nf);
    assert!(project.normal_forms.is_3nf);
    assert!(project.normal_forms.transitive_dependencies.is_empty());
    assert!(
        department
            .normal_forms
            .transitive_dependencies
            .iter()
            .any(|fd| fd.to_string() == "{Name} -> Floor")
    );
}

#[test]
fn test_registry_file_round_trip_drives_analysis() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "employee.csv", "EmployeeID,Name\n1,Ann\n2,Bo\n");
    let keys = dir.path().join("keys.json");
    std::fs::write(&keys, r#"{"employee.csv": ["EmployeeID"]}"#).unwrap();

    let registry = KeyRegistry::load(&keys).expect("registry loads");
    let result = Normalizer::new()
        .analyze_with_registry(dir.path().join("employee.csv"), &registry)
        .expect("Analysis failed");

    assert_eq!(result.primary_key.to_string(), "{EmployeeID}");
    assert_eq!(result.dataset, "employee.csv");
}

#[test]
fn test_result_serializes_to_json() {
    let file = create_test_file("id,amount\n1,10\n2,10\n3,20\n");
    let result = Normalizer::new()
        .analyze(file.path(), &key(&["id"]))
        .expect("Analysis failed");

    let json = serde_json::to_value(&result).expect("serializes");
    assert_eq!(json["primary_key"], serde_json::json!(["id"]));
    assert_eq!(json["normal_forms"]["is_3nf"], serde_json::json!(true));
    assert_eq!(json["summary"]["highest_normal_form"], serde_json::json!("3NF"));
    assert_eq!(
        json["dependencies"][0],
        serde_json::json!({"determinant": ["id"], "dependent": "amount"})
    );
}
