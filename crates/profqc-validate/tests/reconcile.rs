//! Automatic pass, manual override and feedback merge working on one table.

use std::collections::BTreeMap;

use profqc_model::{
    Depth, FeedbackRow, FeedbackTable, Measurement, MeasurementKey, MeasurementTable, QcFlag,
    QcFlags, VisitMeasurementKey,
};
use profqc_validate::{
    AutomaticQc, MergeOutcome, QcConfig, ValidationLog, apply_manual_override, changes_report,
    merge_feedback,
};

const VISIT: &str = "77_10_0001_004";

fn row(parameter: &str, depth: f64, value: &str, flags: &str) -> Measurement {
    Measurement {
        visit_key: VISIT.to_string(),
        serno: "004".to_string(),
        parameter: parameter.to_string(),
        depth: Depth::new(depth),
        depth_text: None,
        value: value.to_string(),
        flags: QcFlags::parse(flags).unwrap(),
        attributes: BTreeMap::new(),
    }
}

fn table() -> MeasurementTable {
    MeasurementTable::with_rows(
        vec![],
        vec![
            row("TEMP", 5.0, "7.1", "2_0000000000_0_2"),
            row("TEMP", 10.0, "45.0", "1_0000000000_0_1"),
            row("PHOS", 5.0, "0.01", "1_0000000000_0_1"),
            row("PHOS", 10.0, "<0.02", "1_0000000000_0_1"),
        ],
    )
}

fn config() -> QcConfig {
    QcConfig::from_toml_str(
        "[ranges.TEMP]\nmin = -2.0\nmax = 40.0\n\n[detection_limits]\nPHOS = 0.02\n",
    )
    .unwrap()
}

fn flags(table: &MeasurementTable) -> Vec<String> {
    table.rows().iter().map(|r| r.flags.to_string()).collect()
}

fn feedback(depth: f64, parameter: &str, manual: Option<&str>) -> FeedbackRow {
    FeedbackRow {
        key: VisitMeasurementKey {
            visit_key: VISIT.to_string(),
            depth: Depth::new(depth),
            parameter: parameter.to_string(),
        },
        manual_qc: manual.map(String::from),
    }
}

#[test]
fn automatic_pass_is_idempotent() {
    let qc = AutomaticQc::from_config(&config()).unwrap();
    let mut table = table();

    let mut log = ValidationLog::new();
    let first = qc.run(&mut table, &mut log).unwrap();
    let after_first = flags(&table);
    let second = qc.run(&mut table, &mut ValidationLog::new()).unwrap();

    assert_eq!(after_first, flags(&table));
    assert_eq!(first.rows_changed, 4);
    assert_eq!(second.rows_changed, 0);
    assert_eq!(
        after_first,
        [
            "2_0100000000_0_2",
            "1_0400000000_0_4",
            "1_6000000000_0_6",
            "1_6000000000_0_6",
        ]
    );
    assert_eq!(log.get("Range").unwrap().fail_count(), 1);
    assert_eq!(log.get("DetectionLimit").unwrap().fail_count(), 1);
}

#[test]
fn manual_override_survives_automatic_rerun() {
    let qc = AutomaticQc::from_config(&config()).unwrap();
    let mut table = table();
    qc.run(&mut table, &mut ValidationLog::new()).unwrap();

    let key = MeasurementKey {
        serno: "004".to_string(),
        parameter: "TEMP".to_string(),
        depth: Depth::new(10.0),
    };
    apply_manual_override(&mut table, &[key], QcFlag::GoodData);
    qc.run(&mut table, &mut ValidationLog::new()).unwrap();

    assert_eq!(table.rows()[1].flags.to_string(), "1_0400000000_1_1");
    assert_eq!(table.rows()[1].flags.total(), QcFlag::GoodData);
}

#[test]
fn documented_example_override() {
    let mut table = table();
    let key = table.rows()[0].key();
    apply_manual_override(&mut table, &[key], QcFlag::BadData);
    assert_eq!(table.rows()[0].flags.to_string(), "2_0000000000_4_4");
}

#[test]
fn feedback_merge_is_idempotent() {
    let mut table = table();
    let sheet = FeedbackTable::new(vec![
        feedback(5.0, "TEMP", Some("4")),
        feedback(10.0, "TEMP", None),
        feedback(5.0, "PHOS", Some("3")),
    ]);

    let first = merge_feedback(&mut table, &sheet);
    let once = table.clone();
    let second = merge_feedback(&mut table, &sheet);

    assert_eq!(table, once);
    assert_eq!(first.applied, 2);
    assert_eq!(second.applied, 0);
    assert_eq!(second.matched, 3);
    assert_eq!(
        flags(&table),
        [
            "2_0000000000_4_4",
            "1_0000000000_0_1",
            "1_0000000000_3_3",
            "1_0000000000_0_1",
        ]
    );
}

#[test]
fn unmatched_feedback_row_changes_nothing() {
    let mut table = table();
    let before = table.clone();
    let sheet = FeedbackTable::new(vec![feedback(999.0, "TEMP", Some("4"))]);

    let outcome = merge_feedback(&mut table, &sheet);
    assert_eq!(table, before);
    assert_eq!(
        outcome,
        MergeOutcome {
            feedback_rows: 1,
            unmatched: 1,
            ..MergeOutcome::default()
        }
    );
}

#[test]
fn rows_dropped_on_load_are_reported_by_the_merge() {
    let mut table = table();
    let sheet = FeedbackTable::new(vec![feedback(5.0, "TEMP", Some("4"))]).with_invalid_rows(2);

    let outcome = merge_feedback(&mut table, &sheet);
    assert_eq!(outcome.applied, 1);
    assert_eq!(outcome.invalid_key, 2);
    assert_eq!(outcome.feedback_rows, 1);
}

#[test]
fn unparseable_and_duplicate_feedback_is_skipped() {
    let mut table = table();
    let sheet = FeedbackTable::new(vec![
        feedback(5.0, "TEMP", Some("bad")),
        feedback(5.0, "TEMP", Some("4")),
        feedback(10.0, "PHOS", Some("12")),
    ]);
    let outcome = merge_feedback(&mut table, &sheet);
    assert_eq!(outcome.unparseable, 2);
    assert_eq!(outcome.duplicates, 1);
    assert_eq!(outcome.applied, 0);
    assert_eq!(flags(&table), flags(&self::table()));
}

#[test]
fn feedback_flag_zero_clears_override() {
    let mut table = table();
    let key = table.rows()[0].key();
    apply_manual_override(&mut table, &[key], QcFlag::BadData);

    merge_feedback(
        &mut table,
        &FeedbackTable::new(vec![feedback(5.0, "TEMP", Some("0"))]),
    );
    assert_eq!(table.rows()[0].flags.to_string(), "2_0000000000_0_2");
    assert!(changes_report(&table).is_empty());
}
