//! Caller-owned validation log.
//!
//! Each automatic pass writes into the log it is handed; nothing is kept in
//! process-wide state, so two loads never see each other's remarks.

use std::collections::BTreeMap;

use serde::Serialize;

/// Column bucket for remarks not tied to a column.
pub const GENERAL_COLUMN: &str = "General";

/// Remarks of one check, grouped by outcome and column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckRemarks {
    pub description: String,
    pub fail: BTreeMap<String, Vec<String>>,
    pub success: BTreeMap<String, Vec<String>>,
}

impl CheckRemarks {
    pub fn fail_count(&self) -> usize {
        self.fail.values().map(Vec::len).sum()
    }

    pub fn success_count(&self) -> usize {
        self.success.values().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationLog {
    checks: BTreeMap<String, CheckRemarks>,
}

impl ValidationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn describe(&mut self, check: &str, description: &str) {
        self.entry(check).description = description.to_string();
    }

    pub fn record_fail(&mut self, check: &str, column: Option<&str>, message: impl Into<String>) {
        self.entry(check)
            .fail
            .entry(column.unwrap_or(GENERAL_COLUMN).to_string())
            .or_default()
            .push(message.into());
    }

    pub fn record_success(
        &mut self,
        check: &str,
        column: Option<&str>,
        message: impl Into<String>,
    ) {
        self.entry(check)
            .success
            .entry(column.unwrap_or(GENERAL_COLUMN).to_string())
            .or_default()
            .push(message.into());
    }

    pub fn get(&self, check: &str) -> Option<&CheckRemarks> {
        self.checks.get(check)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CheckRemarks)> {
        self.checks.iter().map(|(name, remarks)| (name.as_str(), remarks))
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn fail_count(&self) -> usize {
        self.checks.values().map(CheckRemarks::fail_count).sum()
    }

    pub fn clear(&mut self) {
        self.checks.clear();
    }

    fn entry(&mut self, check: &str) -> &mut CheckRemarks {
        self.checks.entry(check.to_string()).or_default()
    }
}
