use bom_etl::{load_query, CellValue, ColumnKind, ColumnMeta, EtlMode, RowSet};
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn run_start() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(5, 0, 0)
        .unwrap()
}

#[test]
fn test_mode_selection() {
    assert_eq!(EtlMode::Daily.query_name(), "BOM_DAILY");
    assert_eq!(EtlMode::Monthly.query_name(), "BOM_MONTHLY");
    assert_ne!(EtlMode::Daily.sql_file(), EtlMode::Monthly.sql_file());
}

#[test]
fn test_query_files_resolve_from_sql_subdirectory() {
    // Shipped query files live under sql/; resolution falls back there
    let daily = load_query(EtlMode::Daily.sql_file()).unwrap();
    let monthly = load_query(EtlMode::Monthly.sql_file()).unwrap();

    assert!(daily.contains("SELECT"));
    assert!(monthly.contains("SELECT"));
    // The daily pass is the incremental one
    assert!(daily.contains("DATEADD(DAY, -1"));
    assert!(!monthly.contains("DATEADD(DAY, -1"));
}

#[test]
fn test_missing_query_file_is_an_error() {
    assert!(load_query("no_such_query.sql").is_err());
}

#[test]
fn test_normalization_over_mixed_rows() {
    // 5 rows, some missing a numeric quantity or a textual unit
    let rowset = RowSet {
        columns: vec![
            ColumnMeta {
                name: "InputUnit".to_string(),
                kind: ColumnKind::Text,
            },
            ColumnMeta {
                name: "FinishedQty".to_string(),
                kind: ColumnKind::Decimal,
            },
        ],
        rows: vec![
            vec![
                CellValue::String("PCS".to_string()),
                CellValue::Decimal(Decimal::new(1_000_000, 6)),
            ],
            vec![CellValue::Null, CellValue::Decimal(Decimal::new(2, 0))],
            vec![CellValue::String("KG".to_string()), CellValue::Null],
            vec![CellValue::Null, CellValue::Null],
            vec![
                CellValue::String("M".to_string()),
                CellValue::Decimal(Decimal::new(5, 1)),
            ],
        ],
    };

    let normalized = bom_etl::normalize::normalize(rowset, run_start());

    for row in &normalized.rows {
        assert!(!row[0].is_null(), "textual field left missing");
        assert!(!row[1].is_null(), "numeric field left missing");
        assert_eq!(row[2], CellValue::DateTime(run_start()));
    }
    assert_eq!(normalized.rows[1][0], CellValue::String(String::new()));
    assert_eq!(normalized.rows[2][1], CellValue::Decimal(Decimal::ZERO));
    // Present values untouched
    assert_eq!(normalized.rows[0][0], CellValue::String("PCS".to_string()));
    assert_eq!(
        normalized.rows[4][1],
        CellValue::Decimal(Decimal::new(5, 1))
    );
}

#[test]
fn test_empty_rowset_reports_empty() {
    let rowset = RowSet::default();
    assert!(rowset.is_empty());
    assert_eq!(rowset.len(), 0);
}
