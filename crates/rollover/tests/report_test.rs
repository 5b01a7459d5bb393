//! From raw settlement files to the sector report.

use approx::assert_relative_eq;
use rollover::data::{SpotRow, discover_settlement_files, read_settlement_file};
use rollover::metrics::{
    DatedMetric, MetricWindow, MonthlyWindow, TrailingWindow, compute_file_metrics, reconcile,
};
use rollover::output::{ExportFormat, Exporter};
use rollover::{SectorMap, SectorReport};
use std::fs;
use std::path::PathBuf;

const HEADER: &str = "INSTRUMENT,SYMBOL,EXPIRY_DT,CLOSE_PRICE,OPEN_INT*\n";

fn scratch() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("rollover-report-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_settlement(dir: &PathBuf, name: &str, body: &str) {
    fs::write(dir.join(name), format!("{HEADER}{body}")).unwrap();
}

#[test]
fn settlement_files_flow_into_sector_report() {
    let dir = scratch();
    write_settlement(
        &dir,
        "fo04032024.csv",
        "FUTSTK,TCS,28-Mar-2024,50,100\n\
         FUTSTK,TCS,25-Apr-2024,55,200\n\
         FUTSTK,TCS,30-May-2024,60,300\n\
         FUTSTK,lti,28-Mar-2024,10,10\n\
         FUTSTK,lti,25-Apr-2024,11,10\n",
    );
    write_settlement(
        &dir,
        "fo05032024.csv",
        "FUTSTK,TCS,28-Mar-2024,40,100\n\
         FUTSTK,TCS,25-Apr-2024,44,100\n\
         FUTSTK,TCS,30-May-2024,48,200\n\
         FUTSTK,SBIN,28-Mar-2024,700,10\n\
         FUTSTK,SBIN,25-Apr-2024,707,30\n\
         FUTSTK,SBIN,30-May-2024,714,60\n",
    );
    fs::write(dir.join("notes.txt"), "ignored").unwrap();

    let files = discover_settlement_files(&dir).unwrap();
    assert_eq!(files.len(), 2);

    let mut metrics = Vec::new();
    for file in &files {
        let trade_date = file.require_trade_date().unwrap();
        let observations = read_settlement_file(&file.path, trade_date).unwrap();
        metrics.extend(
            compute_file_metrics(&observations)
                .unwrap()
                .into_iter()
                .map(|m| DatedMetric::new(trade_date, m)),
        );
    }

    let monthly = MonthlyWindow.aggregate(&metrics).unwrap();
    let trailing = TrailingWindow::default().aggregate(&metrics).unwrap();
    assert_eq!(monthly.len(), 2);

    let tcs = monthly.iter().find(|r| r.symbol == "TCS").unwrap();
    assert_relative_eq!(tcs.roll_oi_pct.unwrap(), 79.1667, epsilon = 1e-9);
    assert_relative_eq!(tcs.roll_cost_pct.unwrap(), 10.0, epsilon = 1e-9);

    let spot = vec![SpotRow {
        trade_date: None,
        symbol: "TCS".to_string(),
        close: Some(3900.0),
    }];
    let reconciled = reconcile(&monthly, &trailing, &spot, None).unwrap();
    assert_eq!(reconciled.len(), 2);

    let report = SectorReport::build(reconciled, &SectorMap::nse_default());
    assert_eq!(report.sectors(), 2);
    assert_eq!(report.unmapped(), 0);

    let csv = report.table().export_to_string(ExportFormat::Csv).unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines.len(), 1 + 2 + 2);
    assert!(lines[1].starts_with("BANKING,SBIN,,,707.0,1.0,"));
    assert!(lines[3].starts_with("IT,TCS,3900.0,,49.5,10.0,79.1667,79.1667,10.0"));

    fs::remove_dir_all(dir).ok();
}
