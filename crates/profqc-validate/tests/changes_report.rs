use std::collections::BTreeMap;

use profqc_model::{Depth, Measurement, MeasurementTable, QcFlags};
use profqc_validate::changes_report;

fn row(parameter: &str, depth: f64, value: &str, unit: &str, flags: &str, remark: &str) -> Measurement {
    Measurement {
        visit_key: "77_10_0001_001".to_string(),
        serno: "001".to_string(),
        parameter: parameter.to_string(),
        depth: Depth::new(depth),
        depth_text: None,
        value: value.to_string(),
        flags: QcFlags::parse(flags).unwrap(),
        attributes: BTreeMap::from([
            ("STATN".to_string(), "BY31".to_string()),
            ("unit".to_string(), unit.to_string()),
            ("automatic_range_remark".to_string(), remark.to_string()),
        ]),
    }
}

fn five_rows() -> MeasurementTable {
    let columns = [
        "STATN",
        "SERNO",
        "DEPH",
        "parameter",
        "value",
        "unit",
        "visit_key",
        "quality_flag_long",
        "automatic_range_remark",
    ]
    .map(String::from)
    .to_vec();
    MeasurementTable::with_rows(
        columns,
        vec![
            row("TEMP", 5.0, "7.1", "C", "1_0000000000_0_1", "ok"),
            row("TEMP", 10.0, "45", "C", "1_0400000000_0_4", "above 40"),
            row("PHOS", 5.0, "0.32", "umol/l", "2_0000000000_0_2", "ok"),
            row("PHOS", 10.0, "0.30", "umol/l", "2_0000000000_4_4", "ok"),
            row("NTRZ", 5.0, "1.2", "umol/l", "0_0000000000_0_0", "ok"),
        ],
    )
}

fn render(columns: &[String], rows: &[Vec<String>]) -> String {
    std::iter::once(columns.join("\t"))
        .chain(rows.iter().map(|row| row.join("\t")))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn changes_report_projection() {
    let table = five_rows();
    let report = changes_report(&table);
    assert_eq!(report.len(), 2);
    insta::assert_snapshot!(render(&report.columns, &report.rows));
}

#[test]
fn report_is_pure() {
    let table = five_rows();
    let before = table.clone();
    let first = changes_report(&table);
    let second = changes_report(&table);
    assert_eq!(first, second);
    assert_eq!(table, before);
}

#[test]
fn no_changes_yields_empty_report_with_columns() {
    let table = MeasurementTable::with_rows(
        vec!["parameter".to_string(), "DEPH".to_string()],
        vec![row("TEMP", 5.0, "7.1", "C", "1_0000000000_0_1", "ok")],
    );
    let report = changes_report(&table);
    assert!(report.is_empty());
    assert_eq!(
        report.columns,
        ["DEPH", "parameter", "INCOMING_QC", "AUTO_QC", "MANUAL_QC", "TOTAL_QC"]
    );
}
