//! End-to-end command runs against files in a temporary directory.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use profqc_cli::commands::{run_changes, run_check, run_flag, run_merge_feedback, run_visits};
use profqc_cli::types::{CheckRequest, FlagRequest, MergeRequest, Outputs, VisitsRequest};
use profqc_ingest::load_measurements;
use profqc_model::{QcFlag, VisitFilter};
use tempfile::{TempDir, tempdir};

const CRUISE: &str = "\
visit_key\tSERNO\tSTATN\tCRUISE_NO\tsample_date\tparameter\tDEPH\tvalue\tquality_flag_long
77_10_0001_001\t1\tBY31\t0001\t2024-05-02\tTEMP\t5\t7.10\t1_0000000000_0_1
77_10_0001_001\t1\tBY31\t0001\t2024-05-02\tTEMP\t10\t55\t1_0000000000_0_1
77_10_0001_001\t1\tBY31\t0001\t2024-05-02\tPHOS\t10\t0.32\t1_0000000000_0_1
77_10_0001_002\t2\tANHOLT E\t0001\t2024-05-03\tTEMP\t0\t12.5\t2_0000000000_0_2
";

const CONFIG: &str = "\
checks = [\"DetectionLimit\", \"Range\"]

[ranges.TEMP]
min = -2.0
max = 40.0

[detection_limits]
PHOS = 0.02
";

fn workspace() -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let input = dir.path().join("cruise.txt");
    fs::write(&input, CRUISE).unwrap();
    (dir, input)
}

fn flags(path: &Path) -> Vec<String> {
    load_measurements(path)
        .unwrap()
        .rows()
        .iter()
        .map(|row| row.flags.to_string())
        .collect()
}

#[test]
fn check_writes_table_and_changes_report() {
    let (dir, input) = workspace();
    let config = dir.path().join("qc.toml");
    fs::write(&config, CONFIG).unwrap();
    let output = dir.path().join("checked.txt");
    let changes = dir.path().join("changes.txt");

    let result = run_check(&CheckRequest {
        input,
        config: Some(config),
        visit: None,
        outputs: Outputs {
            table: Some(output.clone()),
            changes: Some(changes.clone()),
        },
    })
    .unwrap();

    assert_eq!(result.visits, 2);
    assert_eq!(result.summary.rows, 4);
    assert_eq!(result.written.changed_rows, 1);
    assert_eq!(result.log.fail_count(), 1);
    assert_eq!(
        flags(&output),
        [
            "1_0100000000_0_1",
            "1_0400000000_0_4",
            "1_1000000000_0_1",
            "2_0100000000_0_2",
        ]
    );

    let report = fs::read_to_string(&changes).unwrap();
    assert_eq!(report.lines().count(), 2);
    assert!(report.lines().nth(1).unwrap().contains("\t55\t"));
}

#[test]
fn check_on_one_visit_keeps_the_others() {
    let (dir, input) = workspace();
    let config = dir.path().join("qc.toml");
    fs::write(&config, CONFIG).unwrap();
    let output = dir.path().join("checked.txt");

    let result = run_check(&CheckRequest {
        input,
        config: Some(config),
        visit: Some("77_10_0001_002".to_string()),
        outputs: Outputs {
            table: Some(output.clone()),
            changes: None,
        },
    })
    .unwrap();

    assert_eq!(result.summary.rows, 1);
    assert_eq!(
        flags(&output),
        [
            "1_0000000000_0_1",
            "1_0000000000_0_1",
            "1_0000000000_0_1",
            "2_0100000000_0_2",
        ]
    );
}

#[test]
fn check_with_missing_config_fails() {
    let (dir, input) = workspace();
    let err = run_check(&CheckRequest {
        input,
        config: Some(dir.path().join("absent.toml")),
        visit: None,
        outputs: Outputs::default(),
    })
    .unwrap_err();
    assert!(format!("{err:#}").contains("QC configuration"));
}

#[test]
fn flag_sets_manual_override_on_selected_depths() {
    let (dir, input) = workspace();
    let output = dir.path().join("flagged.txt");

    let result = run_flag(&FlagRequest {
        input: input.clone(),
        visit_key: "77_10_0001_001".to_string(),
        parameter: "TEMP".to_string(),
        depths: vec![5.0, 250.0],
        flag: QcFlag::BadData,
        outputs: Outputs {
            table: Some(output.clone()),
            changes: None,
        },
    })
    .unwrap();

    assert_eq!(result.selected, 1);
    assert_eq!(result.outcome.as_ref().map(|o| o.rows_updated), Some(1));
    assert_eq!(result.written.changed_rows, 1);
    let saved = flags(&output);
    assert_eq!(saved[0], "1_0000000000_4_4");
    assert_eq!(saved[1..], flags(&input)[1..]);

    let changes = dir.path().join("changes.csv");
    assert_eq!(run_changes(&output, &changes).unwrap(), 1);
    let report = fs::read_to_string(&changes).unwrap();
    assert!(report.lines().next().unwrap().contains(','));
}

#[test]
fn flag_without_matching_depths_changes_nothing() {
    let (dir, input) = workspace();
    let output = dir.path().join("flagged.txt");

    let result = run_flag(&FlagRequest {
        input: input.clone(),
        visit_key: "77_10_0001_001".to_string(),
        parameter: "PHOS".to_string(),
        depths: vec![5.0],
        flag: QcFlag::BadData,
        outputs: Outputs {
            table: Some(output.clone()),
            changes: None,
        },
    })
    .unwrap();

    assert_eq!(result.selected, 0);
    assert!(result.outcome.is_none());
    assert_eq!(flags(&output), flags(&input));
}

#[test]
fn flag_on_unknown_visit_fails() {
    let (_dir, input) = workspace();
    let err = run_flag(&FlagRequest {
        input,
        visit_key: "nope".to_string(),
        parameter: "TEMP".to_string(),
        depths: vec![5.0],
        flag: QcFlag::BadData,
        outputs: Outputs::default(),
    })
    .unwrap_err();
    assert!(format!("{err:#}").contains("select visit nope"));
}

#[test]
fn merge_feedback_is_idempotent() {
    let (dir, input) = workspace();
    let feedback = dir.path().join("feedback.csv");
    fs::write(
        &feedback,
        "visit_key,DEPH,parameter,MANUAL_QC\n\
         77_10_0001_001,10,TEMP,3\n\
         77_10_0001_001,999,TEMP,4\n\
         ,,,\n",
    )
    .unwrap();
    let first = dir.path().join("merged.txt");
    let second = dir.path().join("merged_again.txt");

    let result = run_merge_feedback(&MergeRequest {
        input,
        feedback: feedback.clone(),
        outputs: Outputs {
            table: Some(first.clone()),
            changes: None,
        },
    })
    .unwrap();
    assert_eq!(result.outcome.applied, 1);
    assert_eq!(result.outcome.unmatched, 1);
    assert_eq!(result.outcome.invalid_key, 1);
    assert_eq!(flags(&first)[1], "1_0000000000_3_3");

    let again = run_merge_feedback(&MergeRequest {
        input: first.clone(),
        feedback,
        outputs: Outputs {
            table: Some(second.clone()),
            changes: None,
        },
    })
    .unwrap();
    assert_eq!(again.outcome.applied, 0);
    assert_eq!(flags(&first), flags(&second));
}

#[test]
fn visits_are_filtered_by_station() {
    let (_dir, input) = workspace();
    let result = run_visits(&VisitsRequest {
        input,
        filter: VisitFilter {
            stations: BTreeSet::from(["BY31".to_string()]),
            ..VisitFilter::default()
        },
    })
    .unwrap();

    assert_eq!(result.total, 2);
    assert_eq!(result.visits.len(), 1);
    let visit = &result.visits[0];
    assert_eq!(visit.visit_key, "77_10_0001_001");
    assert_eq!(visit.rows, 3);
    assert_eq!(visit.parameters, ["PHOS", "TEMP"]);
    assert_eq!(visit.date.as_deref(), Some("2024-05-02"));
    assert_eq!(result.possible_stations, ["ANHOLT E", "BY31"]);
    assert_eq!(result.possible_years, [2024]);
}

#[test]
fn empty_input_is_rejected() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("empty.txt");
    fs::write(&input, "visit_key\tSERNO\tparameter\tDEPH\tquality_flag_long\n").unwrap();
    let err = run_visits(&VisitsRequest {
        input,
        filter: VisitFilter::default(),
    })
    .unwrap_err();
    assert!(err.to_string().contains("contains no measurements"));
}
