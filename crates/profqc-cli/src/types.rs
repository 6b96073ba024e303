use std::path::PathBuf;

use profqc_model::{QcFlag, VisitFilter};
use profqc_validate::{ManualOutcome, MergeOutcome, PassSummary, ValidationLog};

/// Optional destinations of a flag-changing command.
#[derive(Debug, Clone, Default)]
pub struct Outputs {
    pub table: Option<PathBuf>,
    pub changes: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct CheckRequest {
    pub input: PathBuf,
    pub config: Option<PathBuf>,
    pub visit: Option<String>,
    pub outputs: Outputs,
}

#[derive(Debug, Clone)]
pub struct FlagRequest {
    pub input: PathBuf,
    pub visit_key: String,
    pub parameter: String,
    pub depths: Vec<f64>,
    pub flag: QcFlag,
    pub outputs: Outputs,
}

#[derive(Debug, Clone)]
pub struct MergeRequest {
    pub input: PathBuf,
    pub feedback: PathBuf,
    pub outputs: Outputs,
}

#[derive(Debug, Clone)]
pub struct VisitsRequest {
    pub input: PathBuf,
    pub filter: VisitFilter,
}

/// Files written by a command, with the changed-row count of the report.
#[derive(Debug, Clone, Default)]
pub struct Written {
    pub table: Option<PathBuf>,
    pub changes: Option<PathBuf>,
    pub changed_rows: usize,
}

#[derive(Debug)]
pub struct CheckResult {
    pub input: PathBuf,
    pub visits: usize,
    pub summary: PassSummary,
    pub log: ValidationLog,
    pub written: Written,
}

#[derive(Debug)]
pub struct FlagResult {
    pub visit_key: String,
    pub parameter: String,
    pub flag: QcFlag,
    pub selected: usize,
    /// `None` when no point of the series matched the requested depths.
    pub outcome: Option<ManualOutcome>,
    pub written: Written,
}

#[derive(Debug)]
pub struct MergeResult {
    pub outcome: MergeOutcome,
    pub written: Written,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisitSummary {
    pub visit_key: String,
    pub station: Option<String>,
    pub cruise: Option<String>,
    pub date: Option<String>,
    pub rows: usize,
    pub parameters: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct VisitsResult {
    pub total: usize,
    pub visits: Vec<VisitSummary>,
    pub possible_years: Vec<i32>,
    pub possible_months: Vec<u32>,
    pub possible_cruises: Vec<String>,
    pub possible_stations: Vec<String>,
}
