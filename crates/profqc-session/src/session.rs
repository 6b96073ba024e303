//! Manual QC session.
//!
//! Selection states: `Empty` -> `Selected` (one gesture in one series) ->
//! applying (inside [`Session::set_flag`]) -> `Empty`. Changing the visit,
//! the filter or the table always returns to `Empty`.

use tracing::{debug, info, warn};

use profqc_model::{FeedbackTable, MeasurementTable, QcFlag, Visit, VisitFilter, VisitIndex};
use profqc_validate::{
    AutomaticQc, ChangesReport, ManualOutcome, MergeOutcome, PassSummary, ValidationLog,
    apply_manual_override, changes_report, merge_feedback,
};

use crate::error::{Result, SessionError};
use crate::events::{EventQueue, SessionEvent};
use crate::selection::{SelectedValue, Selection, SelectionState, SourceId};

#[derive(Debug)]
pub struct Session {
    table: MeasurementTable,
    visits: VisitIndex,
    current_visit: Option<String>,
    filter: VisitFilter,
    selection: SelectionState,
    events: EventQueue<SessionEvent>,
}

impl Session {
    /// Opens a session on `table` with its first visit selected.
    pub fn new(table: MeasurementTable) -> Self {
        let visits = VisitIndex::build(&table);
        let current_visit = visits.first().map(|visit| visit.visit_key.clone());
        let mut session = Self {
            table,
            visits,
            current_visit,
            filter: VisitFilter::default(),
            selection: SelectionState::Empty,
            events: EventQueue::new(),
        };
        session.events.push(SessionEvent::NewData);
        session.push_visit_selected();
        info!(
            rows = session.table.len(),
            visits = session.visits.len(),
            "session opened"
        );
        session
    }

    /// Replaces the live table, keeping the current visit when it still exists.
    pub fn replace_table(&mut self, table: MeasurementTable) {
        self.table = table;
        self.clear_selection();
        self.events.push(SessionEvent::NewData);
        self.refresh_visits();
    }

    pub fn table(&self) -> &MeasurementTable {
        &self.table
    }

    pub fn into_table(self) -> MeasurementTable {
        self.table
    }

    pub fn visits(&self) -> &VisitIndex {
        &self.visits
    }

    pub fn current_visit(&self) -> Option<&Visit> {
        self.current_visit
            .as_deref()
            .and_then(|key| self.visits.get(key))
    }

    pub fn filter(&self) -> &VisitFilter {
        &self.filter
    }

    /// Visits passing the current filter, in key order.
    pub fn filtered_visits(&self) -> impl Iterator<Item = &Visit> {
        self.visits.filtered(&self.filter)
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn select_visit(&mut self, visit_key: &str) -> Result<()> {
        if self.visits.get(visit_key).is_none() {
            return Err(SessionError::UnknownVisit(visit_key.to_string()));
        }
        self.clear_selection();
        self.current_visit = Some(visit_key.to_string());
        self.push_visit_selected();
        Ok(())
    }

    /// Applies a visit filter. When the current visit no longer passes, the
    /// first visit that does becomes current.
    pub fn set_filter(&mut self, filter: VisitFilter) {
        self.filter = filter;
        self.events.push(SessionEvent::FilterApplied);
        let current_passes = self
            .current_visit()
            .is_some_and(|visit| self.filter.matches(visit));
        if !current_passes {
            let next = self
                .filtered_visits()
                .next()
                .map(|visit| visit.visit_key.clone());
            self.clear_selection();
            self.current_visit = next;
            self.push_visit_selected();
        }
    }

    /// Replaces the selection with rows of one series of the current visit.
    ///
    /// `indices` are row indices into [`Session::table`]. The previous
    /// selection is dropped before the new rows are checked, so an empty
    /// slice or a rejected gesture leaves nothing selected.
    pub fn select_values(
        &mut self,
        source: SourceId,
        parameter: &str,
        indices: &[usize],
    ) -> Result<usize> {
        self.clear_selection();
        if indices.is_empty() {
            return Ok(0);
        }
        let visit_key = self
            .current_visit
            .clone()
            .ok_or(SessionError::NoCurrentVisit)?;

        let mut values = Vec::with_capacity(indices.len());
        for &index in indices {
            let row = self
                .table
                .row(index)
                .ok_or(SessionError::RowOutOfRange { index })?;
            if row.visit_key != visit_key || row.parameter != parameter {
                return Err(SessionError::ForeignRow {
                    index,
                    parameter: parameter.to_string(),
                    visit_key,
                });
            }
            if values.iter().any(|v: &SelectedValue| v.index == index) {
                continue;
            }
            values.push(SelectedValue {
                index,
                key: row.key(),
                flags: row.flags,
            });
        }

        let count = values.len();
        self.selection = SelectionState::Selected(Selection {
            source: source.clone(),
            parameter: parameter.to_string(),
            values,
        });
        debug!(source = %source, parameter, count, "values selected");
        self.events.push(SessionEvent::ValuesSelected {
            source,
            parameter: parameter.to_string(),
            count,
        });
        Ok(count)
    }

    /// Sets the manual flag of every selected row.
    ///
    /// Without a selection this does nothing and returns `None`. Otherwise the
    /// override runs once for the whole selection, the selection is cleared
    /// and the originating view is asked to re-select the same rows.
    pub fn set_flag(&mut self, flag: QcFlag) -> Option<ManualOutcome> {
        let Some(selection) = self.selection.take() else {
            debug!(flag = %flag, "set_flag without selection ignored");
            return None;
        };

        let outcome = apply_manual_override(&mut self.table, &selection.keys(), flag);
        self.events.push(SessionEvent::QcPerformed {
            flag,
            rows_updated: outcome.rows_updated,
        });
        self.events.push(SessionEvent::DataUpdated);
        self.refresh_visits();
        self.events.push(SessionEvent::SelectionCleared);
        self.events.push(SessionEvent::ReselectRequested {
            indices: selection.indices(),
            source: selection.source,
            parameter: selection.parameter,
        });
        Some(outcome)
    }

    /// Runs the automatic pass over the live table.
    pub fn run_automatic_qc(&mut self, qc: &AutomaticQc) -> Result<(PassSummary, ValidationLog)> {
        let mut log = ValidationLog::new();
        let summary = qc.run(&mut self.table, &mut log)?;
        self.clear_selection();
        self.events.push(SessionEvent::DataUpdated);
        self.refresh_visits();
        Ok((summary, log))
    }

    /// Re-runs the automatic pass on the current visit only.
    pub fn run_automatic_qc_on_visit(
        &mut self,
        qc: &AutomaticQc,
    ) -> Result<(PassSummary, ValidationLog)> {
        let visit = self
            .current_visit()
            .cloned()
            .ok_or(SessionError::NoCurrentVisit)?;
        let mut log = ValidationLog::new();
        let summary = qc.run_visit(&mut self.table, &visit, &mut log)?;
        self.clear_selection();
        self.events.push(SessionEvent::DataUpdated);
        self.refresh_visits();
        Ok((summary, log))
    }

    pub fn merge_feedback(&mut self, feedback: &FeedbackTable) -> MergeOutcome {
        let outcome = merge_feedback(&mut self.table, feedback);
        self.clear_selection();
        self.events.push(SessionEvent::FeedbackMerged {
            applied: outcome.applied,
        });
        self.events.push(SessionEvent::DataUpdated);
        self.refresh_visits();
        outcome
    }

    pub fn changes_report(&self) -> ChangesReport {
        changes_report(&self.table)
    }

    /// Delivers pending events in order; the handler may queue more.
    pub fn drain_events<F>(&mut self, handler: F) -> usize
    where
        F: FnMut(SessionEvent, &mut EventQueue<SessionEvent>),
    {
        self.events.drain_with(handler)
    }

    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        self.events.take()
    }

    fn clear_selection(&mut self) {
        if self.selection.take().is_some() {
            self.events.push(SessionEvent::SelectionCleared);
        }
    }

    fn push_visit_selected(&mut self) {
        if let Some(visit_key) = self.current_visit.clone() {
            self.events.push(SessionEvent::VisitSelected { visit_key });
        }
    }

    /// Rebuilds the visit index and re-resolves the current visit by key.
    fn refresh_visits(&mut self) {
        self.visits = VisitIndex::build(&self.table);
        let kept = self
            .current_visit
            .as_deref()
            .is_some_and(|key| self.visits.get(key).is_some());
        if !kept {
            if let Some(previous) = self.current_visit.take() {
                warn!(visit_key = %previous, "current visit no longer present");
            }
            self.current_visit = self.visits.first().map(|visit| visit.visit_key.clone());
            self.push_visit_selected();
        }
    }
}
