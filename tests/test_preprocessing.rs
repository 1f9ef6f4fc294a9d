//! Integration tests for normalization: encoding, scaling, class handling

use ml_bench::error::BenchError;
use ml_bench::preprocessing::{ColumnRole, Normalizer, NormalizerConfig, RawTable};

fn table(rows: &[Vec<&str>]) -> RawTable {
    RawTable::from_str_rows(rows).unwrap()
}

// ============================================================================
// Numeric tables
// ============================================================================

#[test]
fn test_numeric_table_without_force_equals_direct_parse() {
    let rows = vec![
        vec!["1.5", "-2", "0"],
        vec!["3.25", "4e1", "1"],
        vec!["0", "7.125", "0"],
        vec!["-8", "0.5", "1"],
    ];
    let dataset = Normalizer::new(NormalizerConfig::default())
        .normalize(&table(&rows))
        .unwrap();

    assert!(!dataset.is_normalized());
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            assert_eq!(dataset.data()[[r, c]], cell.parse::<f64>().unwrap());
        }
    }
}

#[test]
fn test_force_normalize_scales_numeric_attributes() {
    let rows = vec![
        vec!["2", "10", "a"],
        vec!["4", "30", "b"],
        vec!["6", "20", "a"],
    ];
    let config = NormalizerConfig::new().with_force_normalize(true);
    let dataset = Normalizer::new(config).normalize(&table(&rows)).unwrap();

    assert!(dataset.is_normalized());
    let data = dataset.data();
    assert_eq!(data.column(0).to_vec(), vec![0.0, 0.5, 1.0]);
    assert_eq!(data.column(1).to_vec(), vec![0.0, 1.0, 0.5]);
    // class column keeps its codes
    assert_eq!(data.column(2).to_vec(), vec![0.0, 1.0, 0.0]);
}

// ============================================================================
// Categorical columns
// ============================================================================

#[test]
fn test_categorical_codes_follow_first_seen_order() {
    let rows = vec![
        vec!["red", "1", "yes"],
        vec!["blue", "2", "no"],
        vec!["red", "3", "yes"],
        vec!["green", "4", "no"],
        vec!["blue", "5", "yes"],
    ];
    let dataset = Normalizer::new(NormalizerConfig::default())
        .normalize(&table(&rows))
        .unwrap();

    assert_eq!(dataset.roles()[0], ColumnRole::Categorical);
    assert_eq!(dataset.roles()[1], ColumnRole::Numeric);

    let colours = dataset.codebook(0).unwrap();
    assert_eq!(colours.len(), 3);
    assert_eq!(colours.categories(), &["red", "blue", "green"]);
    assert_eq!(colours.encode("red"), Some(0.0));
    assert_eq!(colours.encode("blue"), Some(1.0));
    assert_eq!(colours.encode("green"), Some(2.0));
}

#[test]
fn test_categorical_column_turns_scaling_on() {
    let rows = vec![
        vec!["x", "10", "c1"],
        vec!["y", "20", "c2"],
        vec!["z", "30", "c1"],
    ];
    let dataset = Normalizer::new(NormalizerConfig::default())
        .normalize(&table(&rows))
        .unwrap();

    assert!(dataset.is_normalized());
    for col in 0..2 {
        let column = dataset.data().column(col);
        let min = column.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = column.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(min, 0.0);
        assert_eq!(max, 1.0);
    }
}

#[test]
fn test_class_labels_decode() {
    let rows = vec![
        vec!["1", "Iris-setosa"],
        vec!["2", "Iris-virginica"],
        vec!["3", "Iris-setosa"],
    ];
    let dataset = Normalizer::new(NormalizerConfig::default())
        .normalize(&table(&rows))
        .unwrap();

    assert_eq!(dataset.class_index(), 1);
    assert_eq!(dataset.class_label(0.0), "Iris-setosa");
    assert_eq!(dataset.class_label(1.0), "Iris-virginica");
    assert_eq!(dataset.labels().to_vec(), vec![0.0, 1.0, 0.0]);
}

#[test]
fn test_explicit_class_index() {
    let rows = vec![vec!["a", "1", "2"], vec!["b", "3", "4"]];
    let config = NormalizerConfig::new().with_class_index(0);
    let dataset = Normalizer::new(config).normalize(&table(&rows)).unwrap();

    assert_eq!(dataset.class_index(), 0);
    // only the class column is categorical, so no scaling
    assert!(!dataset.is_normalized());
    assert_eq!(dataset.data()[[1, 2]], 4.0);
}

// ============================================================================
// Edge cases
// ============================================================================

#[test]
fn test_degenerate_column_becomes_zero() {
    let rows = vec![
        vec!["5", "1", "a"],
        vec!["5", "2", "b"],
        vec!["5", "3", "a"],
    ];
    let config = NormalizerConfig::new().with_force_normalize(true);
    let dataset = Normalizer::new(config).normalize(&table(&rows)).unwrap();

    assert!(dataset.data().column(0).iter().all(|&v| v == 0.0));
    assert_eq!(dataset.data().column(1).to_vec(), vec![0.0, 0.5, 1.0]);
}

#[test]
fn test_unparseable_numeric_cell_is_rejected() {
    let rows = vec![vec!["1", "a"], vec!["oops", "b"]];
    let err = Normalizer::new(NormalizerConfig::default())
        .normalize(&table(&rows))
        .unwrap_err();

    match err {
        BenchError::ParseFailure { row, column, value } => {
            assert_eq!(row, 1);
            assert_eq!(column, 0);
            assert_eq!(value, "oops");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_malformed_row_is_rejected() {
    let rows = vec![
        vec!["1".to_string(), "a".to_string()],
        vec!["2".to_string()],
    ];
    let err = RawTable::new(rows).unwrap_err();
    assert!(matches!(err, BenchError::MalformedRow { row: 1, expected: 2, actual: 1 }));
}

#[test]
fn test_class_index_out_of_range() {
    let rows = vec![vec!["1", "a"]];
    let config = NormalizerConfig::new().with_class_index(2);
    let err = Normalizer::new(config).normalize(&table(&rows)).unwrap_err();
    assert!(matches!(err, BenchError::InvalidParameter { .. }));
}

#[test]
fn test_input_table_is_untouched() {
    let rows = vec![vec!["x", "1", "a"], vec!["y", "2", "b"]];
    let raw = table(&rows);
    let before = raw.clone();
    Normalizer::new(NormalizerConfig::default()).normalize(&raw).unwrap();
    assert_eq!(raw, before);
}
