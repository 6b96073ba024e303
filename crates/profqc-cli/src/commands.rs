//! Command implementations. Each command loads the input file, drives a
//! [`Session`] and writes the requested outputs.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, info_span, warn};

use profqc_ingest::{load_feedback, load_measurements, write_measurements, write_text_table};
use profqc_model::{Depth, MeasurementTable};
use profqc_session::{Session, SourceId};
use profqc_validate::{AutomaticQc, QcConfig, changes_report};

use crate::types::{
    CheckRequest, CheckResult, FlagRequest, FlagResult, MergeRequest, MergeResult, Outputs,
    VisitSummary, VisitsRequest, VisitsResult, Written,
};

/// Source id of selections made from the command line.
const CLI_SOURCE: &str = "cli";

pub fn run_check(request: &CheckRequest) -> Result<CheckResult> {
    let span = info_span!("check", input = %request.input.display());
    let _guard = span.enter();
    let start = Instant::now();

    let config = QcConfig::resolve(request.config.as_deref()).context("load QC configuration")?;
    let qc = AutomaticQc::from_config(&config).context("build automatic checks")?;
    let mut session = Session::new(load(&request.input)?);
    let (summary, log) = match &request.visit {
        Some(visit_key) => {
            session
                .select_visit(visit_key)
                .with_context(|| format!("select visit {visit_key}"))?;
            session.run_automatic_qc_on_visit(&qc)
        }
        None => session.run_automatic_qc(&qc),
    }
    .context("run automatic QC")?;
    log_events(&mut session);

    let written = write_outputs(session.table(), &request.outputs)?;
    info!(
        rows = summary.rows,
        rows_flagged = summary.rows_flagged,
        duration_ms = start.elapsed().as_millis(),
        "check complete"
    );
    Ok(CheckResult {
        input: request.input.clone(),
        visits: session.visits().len(),
        summary,
        log,
        written,
    })
}

pub fn run_visits(request: &VisitsRequest) -> Result<VisitsResult> {
    let mut session = Session::new(load(&request.input)?);
    session.set_filter(request.filter.clone());
    log_events(&mut session);

    let table = session.table();
    let visits = session
        .filtered_visits()
        .map(|visit| VisitSummary {
            visit_key: visit.visit_key.clone(),
            station: visit.station_name.clone(),
            cruise: visit.cruise_number.clone(),
            date: visit.sample_date.map(|date| date.to_string()),
            rows: visit.rows.len(),
            parameters: visit.parameters(table),
        })
        .collect();
    let index = session.visits();
    let filter = session.filter();
    Ok(VisitsResult {
        total: index.len(),
        visits,
        possible_years: index.possible_years(filter).into_iter().collect(),
        possible_months: index.possible_months(filter).into_iter().collect(),
        possible_cruises: index.possible_cruises(filter).into_iter().collect(),
        possible_stations: index.possible_stations(filter).into_iter().collect(),
    })
}

pub fn run_flag(request: &FlagRequest) -> Result<FlagResult> {
    let span = info_span!("flag", visit_key = %request.visit_key, parameter = %request.parameter);
    let _guard = span.enter();

    let mut session = Session::new(load(&request.input)?);
    session
        .select_visit(&request.visit_key)
        .with_context(|| format!("select visit {}", request.visit_key))?;

    let depths: Vec<Depth> = request.depths.iter().copied().map(Depth::new).collect();
    let indices: Vec<usize> = match session.current_visit() {
        Some(visit) => visit
            .series(session.table(), &request.parameter)
            .filter(|(_, row)| depths.contains(&row.depth))
            .map(|(index, _)| index)
            .collect(),
        None => Vec::new(),
    };
    if indices.len() < depths.len() {
        warn!(
            requested = depths.len(),
            found = indices.len(),
            "some depths have no {} value in this visit",
            request.parameter
        );
    }

    let selected = session
        .select_values(SourceId::new(CLI_SOURCE), &request.parameter, &indices)
        .context("select values")?;
    let outcome = session.set_flag(request.flag);
    log_events(&mut session);

    let written = write_outputs(session.table(), &request.outputs)?;
    Ok(FlagResult {
        visit_key: request.visit_key.clone(),
        parameter: request.parameter.clone(),
        flag: request.flag,
        selected,
        outcome,
        written,
    })
}

pub fn run_merge_feedback(request: &MergeRequest) -> Result<MergeResult> {
    let span = info_span!("merge_feedback", feedback = %request.feedback.display());
    let _guard = span.enter();

    let mut session = Session::new(load(&request.input)?);
    let feedback = load_feedback(&request.feedback)
        .with_context(|| format!("load feedback {}", request.feedback.display()))?;
    let outcome = session.merge_feedback(&feedback);
    log_events(&mut session);

    let written = write_outputs(session.table(), &request.outputs)?;
    Ok(MergeResult { outcome, written })
}

/// Writes the changes report of `input` to `output`; returns the row count.
pub fn run_changes(input: &Path, output: &Path) -> Result<usize> {
    let table = load(input)?;
    let report = changes_report(&table);
    write_text_table(&report.columns, &report.rows, output)
        .with_context(|| format!("write changes report {}", output.display()))?;
    Ok(report.len())
}

fn load(path: &Path) -> Result<MeasurementTable> {
    let table =
        load_measurements(path).with_context(|| format!("load {}", path.display()))?;
    if table.is_empty() {
        bail!("{} contains no measurements", path.display());
    }
    Ok(table)
}

fn write_outputs(table: &MeasurementTable, outputs: &Outputs) -> Result<Written> {
    let mut written = Written::default();
    if let Some(path) = &outputs.table {
        write_measurements(table, path).with_context(|| format!("write {}", path.display()))?;
        written.table = Some(path.clone());
    }
    let report = changes_report(table);
    written.changed_rows = report.len();
    if let Some(path) = &outputs.changes {
        write_text_table(&report.columns, &report.rows, path)
            .with_context(|| format!("write changes report {}", path.display()))?;
        written.changes = Some(path.clone());
    }
    Ok(written)
}

/// The CLI has no views; events are only traced.
fn log_events(session: &mut Session) {
    let delivered = session.drain_events(|event, _| debug!(?event, "session event"));
    debug!(delivered, "session events drained");
}
