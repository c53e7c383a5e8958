//! Dataset loading and subsetting tests

use super::*;
use crate::config::DatasetConfig;
use crate::error::Error;
use crate::schema::Kind;
use pretty_assertions::assert_eq;
use test_case::test_case;

const SCENARIO_A: &str = "{\"a\":1,\"b\":\"x\"}\n{\"a\":2.5,\"b\":\"y\"}\n{\"a\":3}\n";

fn numbered(n: usize) -> Dataset {
    let text: String = (1..=n).map(|i| format!("{{\"x\": {}}}\n", i * 10)).collect();
    Dataset::new(text)
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_dataset_is_lazy() {
    let ds = Dataset::new(SCENARIO_A);
    assert!(!ds.is_realized());
    ds.realize().unwrap();
    assert!(ds.is_realized());
}

#[test]
fn test_aggregate_type_of_heterogeneous_records() {
    let ds = Dataset::new(SCENARIO_A);
    assert_eq!(ds.nrow().unwrap(), 3);
    assert_eq!(ds.kind().unwrap(), Kind::Record);
    assert_eq!(ds.datatype().unwrap(), r#"{"a": real, "b": text?}"#);
    assert_eq!(ds.names().unwrap(), Some(vec!["a".to_string(), "b".to_string()]));
    assert_eq!(ds.dims().unwrap(), Some((3, 2)));
    assert_eq!(ds.len().unwrap(), 2);
    assert_eq!(
        ds.datatypes().unwrap(),
        Some(vec![
            ("a".to_string(), "real".to_string()),
            ("b".to_string(), "text?".to_string()),
        ])
    );
}

#[test]
fn test_loading_is_idempotent() {
    let ds = Dataset::new(SCENARIO_A);
    ds.realize().unwrap();
    let first = ds.values().unwrap().as_ptr();
    let type_id = ds.type_id().unwrap();

    ds.realize().unwrap();
    assert_eq!(ds.values().unwrap().as_ptr(), first);
    assert_eq!(ds.type_id().unwrap(), type_id);
    assert_eq!(ds.nrow().unwrap(), 3);
}

#[test]
fn test_concurrent_realize_loads_once() {
    let ds = numbered(200);
    let results: Vec<(usize, usize)> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ds = ds.clone();
                scope.spawn(move || {
                    let rows = ds.values().unwrap();
                    (rows.len(), rows.as_ptr() as usize)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(results.iter().all(|r| *r == results[0]));
    assert_eq!(results[0].0, 200);
}

#[test_case("" ; "empty source")]
#[test_case("\n\n  \n" ; "blank lines only")]
fn test_empty_dataset(text: &'static str) {
    let ds = Dataset::new(text);
    assert_eq!(ds.nrow().unwrap(), 0);
    assert_eq!(ds.kind().unwrap(), Kind::Null);
    assert_eq!(ds.datatype().unwrap(), "null");
    assert!(ds.values().unwrap().is_empty());
}

#[test_case("1\n2\n3", "integer" ; "integers")]
#[test_case("1\n2.5\nnull", "real" ; "numbers with null")]
#[test_case("\"a\"\n1", "any" ; "text and integer")]
#[test_case("[1]\n[2.5, 3]", "[real]" ; "arrays")]
#[test_case("true\nnull\nfalse", "boolean" ; "booleans")]
fn test_aggregate_datatype(text: &'static str, expected: &str) {
    let ds = Dataset::new(text);
    assert_eq!(ds.datatype().unwrap(), expected);
}

#[test]
fn test_malformed_row_reports_row_number() {
    let ds = Dataset::new("{\"a\": 1}\n{\"a\": }\n");
    let err = ds.realize().unwrap_err();
    assert!(matches!(err, Error::MalformedRecord { row: 2, .. }), "{err}");
    assert!(err.to_string().starts_with("error parsing row 2 of JSON file"));
}

#[test]
fn test_duplicate_field_is_malformed() {
    let ds = Dataset::new("{\"a\": 1}\n{\"a\": 1}\n{\"a\": 1, \"a\": 2}\n");
    let err = ds.realize().unwrap_err();
    assert_eq!(err.row(), Some(3));
}

#[test]
fn test_failed_load_stays_unloaded() {
    let ds = Dataset::new("{\"a\": 1}\nnot json\n");
    assert!(ds.realize().is_err());
    assert!(!ds.is_realized());
    assert!(ds.nrow().is_err());
    assert!(ds.to_string().contains("not loaded"));
}

#[test]
fn test_max_rows_limit() {
    let config = DatasetConfig::default().with_max_rows(2);
    let ds = Dataset::with_config("1\n2\n3\n", config);
    let err = ds.realize().unwrap_err();
    assert!(matches!(
        err,
        Error::CapacityExceeded {
            requested: 3,
            maximum: 2
        }
    ));
    assert!(err.is_resource_exhausted());
}

#[test]
fn test_max_depth_limit() {
    let config = DatasetConfig::default().with_max_depth(2);
    let ds = Dataset::with_config("[[[1]]]\n", config);
    assert_eq!(ds.realize().unwrap_err().row(), Some(1));
}

#[test]
fn test_blank_lines_are_not_rows() {
    let ds = Dataset::new("1\n\n2\n");
    assert_eq!(ds.nrow().unwrap(), 2);

    let config = DatasetConfig {
        source: crate::config::SourceConfig {
            skip_blank_lines: false,
            ..Default::default()
        },
        ..Default::default()
    };
    let ds = Dataset::with_config("1\n\n2\n", config);
    assert_eq!(ds.realize().unwrap_err().row(), Some(2));
}

// ============================================================================
// Summary
// ============================================================================

#[test]
fn test_display_record_dataset() {
    let ds = Dataset::new(SCENARIO_A);
    assert_eq!(
        ds.to_string(),
        "JSON dataset with 3 rows of the following type:\n{\n    \"a\": real,\n    \"b\": text?\n}"
    );
}

#[test]
fn test_display_scalar_dataset() {
    let ds = Dataset::new("1\n2\n");
    assert_eq!(ds.to_string(), "JSON dataset with 2 rows of type integer");
}

#[test]
fn test_clone_is_same_dataset() {
    let ds = Dataset::new("1\n");
    let other = ds.clone();
    assert_eq!(ds, other);
    assert_ne!(ds, Dataset::new("1\n"));
}

// ============================================================================
// Row subsets
// ============================================================================

#[test]
fn test_rows_select_in_order() {
    let ds = numbered(5);
    let sub = ds.rows(&[4, 2, 4]).unwrap();
    assert!(sub.is_realized());
    assert_eq!(sub.nrow().unwrap(), 3);
    assert_eq!(sub.row_numbers().unwrap(), vec![4, 2, 4]);
    assert_eq!(sub.row_text(0).unwrap(), Some("{\"x\": 40}"));
    assert_eq!(sub.row_text(1).unwrap(), Some("{\"x\": 20}"));
    assert!(sub.source().ptr_eq(ds.source()));
}

#[test_case(0 ; "zero")]
#[test_case(6 ; "past the end")]
fn test_rows_out_of_range(index: usize) {
    let ds = numbered(5);
    let err = ds.rows(&[1, index]).unwrap_err();
    assert!(matches!(err, Error::IndexOutOfRange { index: i, len: 5 } if i == index));
}

#[test]
fn test_rows_empty_selection() {
    let ds = numbered(5);
    let sub = ds.rows(&[]).unwrap();
    assert_eq!(sub.nrow().unwrap(), 0);
    assert_eq!(sub.kind().unwrap(), Kind::Null);
}

#[test]
fn test_rows_rederive_schema() {
    let ds = Dataset::new("1\n\"two\"\n3\n");
    assert_eq!(ds.datatype().unwrap(), "any");
    let sub = ds.rows(&[1, 3]).unwrap();
    assert_eq!(sub.datatype().unwrap(), "integer");
}

#[test]
fn test_rows_of_rows_map_to_source_rows() {
    let ds = numbered(10);
    let sub = ds.rows(&[3, 5, 7, 9]).unwrap();
    let subsub = sub.rows(&[2, 4]).unwrap();
    assert_eq!(subsub.row_numbers().unwrap(), vec![5, 9]);
}

#[test]
fn test_repeated_rows_respect_max_rows() {
    let config = DatasetConfig::default().with_max_rows(3);
    let ds = Dataset::with_config("1\n2\n3\n", config);
    assert_eq!(ds.rows(&[3, 1, 2]).unwrap().nrow().unwrap(), 3);

    let err = ds.rows(&[1, 2, 3, 1, 2, 3, 1]).unwrap_err();
    assert!(matches!(
        err,
        Error::CapacityExceeded {
            requested: 4,
            maximum: 3
        }
    ));
}

#[test]
fn test_elements_respect_max_rows() {
    let config = DatasetConfig::default().with_max_rows(2);
    let ds = Dataset::with_config("[1, 2]\n[1, 2, 3]\n", config);
    let err = ds.elements().unwrap_err();
    assert!(matches!(err, Error::CapacityExceeded { maximum: 2, .. }));
}

// ============================================================================
// Field projection
// ============================================================================

#[test]
fn test_field_projection() {
    let ds = Dataset::new(SCENARIO_A);
    let a = ds.field("a").unwrap().unwrap();
    assert_eq!(a.nrow().unwrap(), 3);
    assert_eq!(a.datatype().unwrap(), "real");
    assert_eq!(a.field_path().as_deref(), Some("a"));

    let b = ds.field("b").unwrap().unwrap();
    assert_eq!(b.datatype().unwrap(), "text");
    assert!(b.values().unwrap()[2].is_absent());
}

#[test]
fn test_unknown_field_is_none() {
    let ds = Dataset::new(SCENARIO_A);
    assert!(ds.field("missing").unwrap().is_none());
}

#[test]
fn test_field_preserves_row_count() {
    let ds = Dataset::new("{\"a\": {\"b\": 1}}\n[1]\n{\"c\": true}\n7\n");
    for name in ["a", "b", "c"] {
        let projected = ds.field(name).unwrap().unwrap();
        assert_eq!(projected.nrow().unwrap(), 4, "field {name}");
    }
    // "b" only appears nested, so every top-level row contributes null
    let b = ds.field("b").unwrap().unwrap();
    assert_eq!(b.kind().unwrap(), Kind::Null);
}

#[test]
fn test_nested_field_path() {
    let ds = Dataset::new("{\"a\": {\"b\": [1, 2]}}\n{\"a\": {\"b\": []}}\n");
    let b = ds
        .field("a")
        .unwrap()
        .unwrap()
        .field("b")
        .unwrap()
        .unwrap();
    assert_eq!(b.field_path().as_deref(), Some("a.b"));
    assert_eq!(b.datatype().unwrap(), "[integer]");
}

#[test]
fn test_rows_then_field_keeps_row_numbers() {
    let ds = numbered(5);
    let x = ds.subset(Some(&[2, 4]), Some("x")).unwrap().unwrap();
    assert_eq!(x.row_numbers().unwrap(), vec![2, 4]);
    assert_eq!(x.datatype().unwrap(), "integer");
    assert_eq!(x.row_text(1).unwrap(), Some("40"));
}

#[test]
fn test_subset_without_arguments_is_same_dataset() {
    let ds = numbered(3);
    let same = ds.subset(None, None).unwrap().unwrap();
    assert!(same.ptr_eq(&ds));
}

#[test]
fn test_subset_unknown_field() {
    let ds = numbered(3);
    assert!(ds.subset(Some(&[1]), Some("nope")).unwrap().is_none());
}

// ============================================================================
// Subscript and columns
// ============================================================================

#[test]
fn test_subscript_record_selects_field() {
    let ds = Dataset::new(SCENARIO_A);
    let b = ds.subscript(2).unwrap();
    assert_eq!(b.field_path().as_deref(), Some("b"));
    assert_eq!(b.nrow().unwrap(), 3);

    let err = ds.subscript(3).unwrap_err();
    assert!(matches!(err, Error::IndexOutOfRange { index: 3, len: 2 }));
    assert!(ds.subscript(0).is_err());
}

#[test]
fn test_subscript_scalar_selects_row() {
    let ds = Dataset::new("10\n20\n30\n");
    let row = ds.subscript(2).unwrap();
    assert_eq!(row.nrow().unwrap(), 1);
    assert_eq!(row.row_numbers().unwrap(), vec![2]);
    assert!(matches!(
        ds.subscript(4).unwrap_err(),
        Error::IndexOutOfRange { index: 4, len: 3 }
    ));
}

#[test]
fn test_columns() {
    let ds = Dataset::new(SCENARIO_A);
    let columns = ds.columns().unwrap();
    let names: Vec<_> = columns.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(columns[1].1.datatype().unwrap(), "text");

    assert!(Dataset::new("1\n").columns().unwrap().is_empty());
}

#[test]
fn test_provenance_row_number_defaults_to_position() {
    let provenance = Provenance::root();
    assert_eq!(provenance.row_number(0), 1);
    assert_eq!(provenance.field_path(), None);
}

#[test]
fn test_dataset_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Dataset>();
}
