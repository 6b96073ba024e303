//! Automatic QC configuration.
//!
//! ```toml
//! checks = ["DetectionLimit", "Range"]
//!
//! [ranges.TEMP]
//! min = -2.0
//! max = 40.0
//!
//! [detection_limits]
//! PHOS = 0.02
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use profqc_model::QcField;

use crate::error::{QcError, Result};

/// Environment variable naming a config file when none is given explicitly.
pub const CONFIG_ENV_VAR: &str = "PROFQC_CONFIG";

/// Inclusive value limits for one parameter. A missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangeLimit {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RangeLimit {
    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QcConfig {
    /// Enabled automatic checks by name; empty enables every built-in check.
    pub checks: Vec<String>,
    /// Range limits keyed by parameter.
    pub ranges: BTreeMap<String, RangeLimit>,
    /// Detection limits keyed by parameter.
    pub detection_limits: BTreeMap<String, f64>,
}

impl QcConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|e| QcError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| QcError::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&contents)
            .map_err(|e| QcError::Config(format!("{}: {e}", path.display())))?;
        info!(path = %path.display(), "QC configuration loaded");
        Ok(config)
    }

    /// Explicit path first, then [`CONFIG_ENV_VAR`], then defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => Self::load(Path::new(&path)),
            _ => {
                debug!("no QC configuration given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Enabled checks in slot order, without duplicates.
    pub fn enabled_checks(&self) -> Result<Vec<QcField>> {
        if self.checks.is_empty() {
            return Ok(vec![QcField::DetectionLimit, QcField::Range]);
        }
        let mut fields = self
            .checks
            .iter()
            .map(|name| name.parse::<QcField>().map_err(QcError::Config))
            .collect::<Result<Vec<_>>>()?;
        fields.sort();
        fields.dedup();
        Ok(fields)
    }

    fn validate(&self) -> Result<()> {
        for (parameter, limit) in &self.ranges {
            if let (Some(min), Some(max)) = (limit.min, limit.max)
                && min > max
            {
                return Err(QcError::Config(format!(
                    "range for {parameter} has min {min} above max {max}"
                )));
            }
        }
        if let Some((parameter, limit)) = self
            .detection_limits
            .iter()
            .find(|(_, limit)| !limit.is_finite() || **limit < 0.0)
        {
            return Err(QcError::Config(format!(
                "detection limit for {parameter} must be a non-negative number, got {limit}"
            )));
        }
        self.enabled_checks().map(|_| ())
    }
}
