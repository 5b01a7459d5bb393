//! Tables written by the exporter load back through the stage readers.

use rollover_data::{
    MonthlyMetricRow, ReconciledRow, SpotColumn, SpotRow, read_monthly_table,
    read_reconciled_table, read_spot_table,
};
use rollover_output::{ExportFormat, Exporter, Table};
use std::path::PathBuf;

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("rollover-output-{}", std::process::id()))
        .join(name)
}

fn reconciled() -> Vec<ReconciledRow> {
    vec![
        ReconciledRow {
            symbol: "ABC".to_string(),
            spot_close: Some(101.25),
            prev_spot_close: Some(99.5),
            fut_next_price: Some(55.0),
            roll_cost_pct_m: Some(10.0),
            roll_oi_pct_m: Some(83.3333),
            roll_oi_pct_6m: Some(79.1667),
            roll_cost_pct_6m: Some(-0.1235),
        },
        ReconciledRow {
            symbol: "XYZ".to_string(),
            spot_close: Some(12.0),
            prev_spot_close: None,
            fut_next_price: None,
            roll_cost_pct_m: None,
            roll_oi_pct_m: None,
            roll_oi_pct_6m: None,
            roll_cost_pct_6m: None,
        },
    ]
}

#[test]
fn reconciled_table_survives_write_and_read() {
    let path = scratch("final.csv");
    let rows = reconciled();
    Table::new(&rows)
        .export_to_file(&path, ExportFormat::Csv)
        .unwrap();

    let back = read_reconciled_table(&path).unwrap();
    assert_eq!(back.len(), rows.len());
    for (a, b) in rows.iter().zip(&back) {
        assert_eq!(a.symbol, b.symbol);
        for (x, y) in a.values().iter().zip(b.values()) {
            match (x, y) {
                (Some(x), Some(y)) => assert!((x - y).abs() < 1e-4, "{x} != {y}"),
                (None, None) => {}
                other => panic!("null mismatch for {}: {other:?}", a.symbol),
            }
        }
    }
}

#[test]
fn empty_monthly_table_reads_back_empty() {
    let path = scratch("monthly_empty.csv");
    let rows: Vec<MonthlyMetricRow> = Vec::new();
    Table::new(&rows)
        .export_to_file(&path, ExportFormat::Csv)
        .unwrap();

    let back = read_monthly_table(&path).unwrap();
    assert!(back.is_empty());
}

#[test]
fn previous_spot_table_uses_previous_header() {
    let path = scratch("eq_spot_previous.csv");
    let rows = vec![SpotRow {
        trade_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 31),
        symbol: "TCS".to_string(),
        close: Some(3900.5),
    }];
    Table::with_columns(SpotColumn::Previous.output_columns(), &rows)
        .export_to_file(&path, ExportFormat::Csv)
        .unwrap();

    let back = read_spot_table(&path, SpotColumn::Previous).unwrap();
    assert_eq!(back.len(), 1);
    assert_eq!(back[0].symbol, "TCS");
    assert_eq!(back[0].close, Some(3900.5));
}
