//! Automatic QC pass.
//!
//! Every registered check produces one flag per row for its own slot of the
//! automatic tuple. The pass builds a fresh tuple for every row, so running it
//! twice over unchanged values yields the same composite flags; nothing from a
//! previous pass is merged in.

use std::collections::BTreeSet;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, info_span};

use profqc_model::{AutomaticFlags, Measurement, MeasurementTable, QcField, QcFlag, Visit};

use crate::checks::build_checks;
use crate::config::QcConfig;
use crate::error::{QcError, Result};
use crate::log::ValidationLog;

/// One automatic validator, owning one slot of the automatic tuple.
pub trait AutomaticCheck {
    fn field(&self) -> QcField;

    fn name(&self) -> &str {
        self.field().as_str()
    }

    fn description(&self) -> &str;

    /// Returns exactly one flag per table row, in table order.
    fn check(&self, table: &MeasurementTable, log: &mut ValidationLog) -> Result<Vec<QcFlag>>;
}

/// Result of one automatic pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    pub checks: usize,
    pub rows: usize,
    /// Rows whose composite flag string changed.
    pub rows_changed: usize,
    /// Rows whose total ended up worse than good data.
    pub rows_flagged: usize,
}

/// Ordered set of automatic checks.
#[derive(Default)]
pub struct AutomaticQc {
    checks: Vec<Box<dyn AutomaticCheck>>,
}

impl AutomaticQc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in checks enabled by `config`.
    pub fn from_config(config: &QcConfig) -> Result<Self> {
        Ok(Self {
            checks: build_checks(config)?,
        })
    }

    #[must_use]
    pub fn with_check(mut self, check: impl AutomaticCheck + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    pub fn add_check(&mut self, check: Box<dyn AutomaticCheck>) {
        self.checks.push(check);
    }

    pub fn checks(&self) -> impl Iterator<Item = &dyn AutomaticCheck> {
        self.checks.iter().map(|check| check.as_ref())
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Runs every check, then commits the new automatic tuples.
    ///
    /// A failing check aborts the pass before anything is written: the table
    /// is either fully updated or left as it was. Remarks recorded by checks
    /// that ran before the failure stay in `log`.
    pub fn run(&self, table: &mut MeasurementTable, log: &mut ValidationLog) -> Result<PassSummary> {
        let span = info_span!("automatic_qc", rows = table.len(), checks = self.checks.len());
        let _guard = span.enter();
        let pass_start = Instant::now();

        let automatic = self.evaluate(table, log)?;
        let summary = self.commit(table.rows_mut().iter_mut(), automatic);
        log_summary(&summary, pass_start);
        Ok(summary)
    }

    /// Re-checks the rows of one visit, leaving every other row untouched.
    pub fn run_visit(
        &self,
        table: &mut MeasurementTable,
        visit: &Visit,
        log: &mut ValidationLog,
    ) -> Result<PassSummary> {
        let span = info_span!("automatic_qc_visit", visit_key = %visit.visit_key);
        let _guard = span.enter();
        self.run_rows(table, &visit.rows, log)
    }

    /// Like [`AutomaticQc::run`], restricted to the rows at `indices`.
    ///
    /// Checks see only the selected rows, in ascending index order. Repeated
    /// indices are checked once.
    pub fn run_rows(
        &self,
        table: &mut MeasurementTable,
        indices: &[usize],
        log: &mut ValidationLog,
    ) -> Result<PassSummary> {
        let span = info_span!("automatic_qc", rows = indices.len(), checks = self.checks.len());
        let _guard = span.enter();
        let pass_start = Instant::now();

        let indices: BTreeSet<usize> = indices.iter().copied().collect();
        let mut subset = Vec::with_capacity(indices.len());
        for &index in &indices {
            let row = table.row(index).ok_or(QcError::RowOutOfRange {
                index,
                rows: table.len(),
            })?;
            subset.push(row.clone());
        }
        let subset = MeasurementTable::with_rows(table.columns().to_vec(), subset);

        let automatic = self.evaluate(&subset, log)?;
        let rows = table
            .rows_mut()
            .iter_mut()
            .enumerate()
            .filter(|(index, _)| indices.contains(index))
            .map(|(_, row)| row);
        let summary = self.commit(rows, automatic);
        log_summary(&summary, pass_start);
        Ok(summary)
    }

    /// One fresh automatic tuple per row of `table`.
    fn evaluate(
        &self,
        table: &MeasurementTable,
        log: &mut ValidationLog,
    ) -> Result<Vec<AutomaticFlags>> {
        self.ensure_distinct_slots()?;

        let mut automatic = vec![AutomaticFlags::new(); table.len()];
        for check in &self.checks {
            let start = Instant::now();
            log.describe(check.name(), check.description());
            let flags = check.check(table, log)?;
            if flags.len() != table.len() {
                return Err(QcError::OutputLength {
                    check: check.name().to_string(),
                    expected: table.len(),
                    actual: flags.len(),
                });
            }
            let mut flagged = 0usize;
            for (slot, flag) in automatic.iter_mut().zip(flags) {
                if flag > QcFlag::GoodData {
                    flagged += 1;
                }
                slot.set(check.field(), flag);
            }
            debug!(
                check = check.name(),
                slot = check.field().index(),
                flagged,
                duration_ms = start.elapsed().as_millis(),
                "check complete"
            );
        }
        Ok(automatic)
    }

    fn commit<'a>(
        &self,
        rows: impl Iterator<Item = &'a mut Measurement>,
        automatic: Vec<AutomaticFlags>,
    ) -> PassSummary {
        let mut summary = PassSummary {
            checks: self.checks.len(),
            rows: automatic.len(),
            ..PassSummary::default()
        };
        for (row, tuple) in rows.zip(automatic) {
            let before = row.flags;
            row.flags.set_automatic(tuple);
            if row.flags != before {
                summary.rows_changed += 1;
            }
            if row.flags.total() > QcFlag::GoodData {
                summary.rows_flagged += 1;
            }
        }
        summary
    }

    fn ensure_distinct_slots(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for check in &self.checks {
            if !seen.insert(check.field()) {
                return Err(QcError::Config(format!(
                    "more than one check writes the {} slot",
                    check.field()
                )));
            }
        }
        Ok(())
    }
}

fn log_summary(summary: &PassSummary, pass_start: Instant) {
    info!(
        rows = summary.rows,
        rows_changed = summary.rows_changed,
        rows_flagged = summary.rows_flagged,
        duration_ms = pass_start.elapsed().as_millis(),
        "automatic QC complete"
    );
}
