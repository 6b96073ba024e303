//! Composite quality flag `INCOMING_AUTOMATIC_MANUAL_TOTAL`.
//!
//! The string form is the canonical on-disk representation, for example
//! `2_0000000000_0_2`: incoming flag 2, ten automatic slots without QC, no
//! manual flag, total 2.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use crate::{ModelError, QcField, QcFlag};

const SEPARATOR: char = '_';

/// One flag per automatic test, indexed by [`QcField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AutomaticFlags([QcFlag; QcField::COUNT]);

impl AutomaticFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: QcField) -> QcFlag {
        self.0[field.index()]
    }

    pub fn set(&mut self, field: QcField, flag: QcFlag) {
        self.0[field.index()] = flag;
    }

    /// Worst flag over all slots; `NoQcPerformed` when no test has run.
    pub fn worst(&self) -> QcFlag {
        self.0.iter().copied().max().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QcField, QcFlag)> + '_ {
        QcField::ALL.into_iter().map(|field| (field, self.get(field)))
    }

    /// Serialized automatic segment, always `QcField::COUNT` characters.
    pub fn to_segment(&self) -> String {
        self.0.iter().map(|flag| flag.as_char()).collect()
    }

    /// Parses an automatic segment. Segments written before newer tests were
    /// defined are shorter; their missing slots read as `NoQcPerformed`.
    fn parse_segment(segment: &str, value: &str) -> Result<Self, ModelError> {
        let width = segment.chars().count();
        if width > QcField::COUNT {
            return Err(ModelError::AutomaticTooWide {
                value: value.to_string(),
                width,
                max: QcField::COUNT,
            });
        }
        let mut flags = Self::new();
        for (slot, c) in segment.chars().enumerate() {
            flags.0[slot] = parse_code(c, value)?;
        }
        Ok(flags)
    }
}

impl Index<QcField> for AutomaticFlags {
    type Output = QcFlag;

    fn index(&self, field: QcField) -> &QcFlag {
        &self.0[field.index()]
    }
}

/// Composite quality flag of one measurement.
///
/// `total` is derived from the other three components by every mutator; the
/// only way to hold a total that disagrees with the derivation rule is to
/// parse one from a file, so that source bytes survive a save/reload cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QcFlags {
    incoming: QcFlag,
    automatic: AutomaticFlags,
    manual: QcFlag,
    total: QcFlag,
}

impl QcFlags {
    /// Builds a composite flag and derives its total.
    pub fn new(incoming: QcFlag, automatic: AutomaticFlags, manual: QcFlag) -> Self {
        let mut flags = Self {
            incoming,
            automatic,
            manual,
            total: QcFlag::NoQcPerformed,
        };
        flags.total = flags.derived_total();
        flags
    }

    /// Bootstrap from a legacy single `quality_flag` column.
    ///
    /// The incoming flag becomes the total, no automatic test has run and no
    /// manual flag is set. This is the only constructor that does not consult
    /// the derivation rule; it agrees with it by construction.
    pub fn from_simple(flag: QcFlag) -> Self {
        Self {
            incoming: flag,
            automatic: AutomaticFlags::new(),
            manual: QcFlag::NoQcPerformed,
            total: flag,
        }
    }

    /// Parses `INCOMING_AUTOMATIC_MANUAL_TOTAL`.
    pub fn parse(value: &str) -> Result<Self, ModelError> {
        let segments: Vec<&str> = value.split(SEPARATOR).collect();
        if segments.len() != 4 {
            return Err(ModelError::InvalidFormat {
                value: value.to_string(),
                reason: format!("expected 4 segments, found {}", segments.len()),
            });
        }
        Ok(Self {
            incoming: parse_single(segments[0], value)?,
            automatic: AutomaticFlags::parse_segment(segments[1], value)?,
            manual: parse_single(segments[2], value)?,
            total: parse_single(segments[3], value)?,
        })
    }

    pub fn incoming(&self) -> QcFlag {
        self.incoming
    }

    pub fn automatic(&self) -> &AutomaticFlags {
        &self.automatic
    }

    pub fn manual(&self) -> QcFlag {
        self.manual
    }

    pub fn total(&self) -> QcFlag {
        self.total
    }

    /// True once an analyst has set a manual flag.
    pub fn has_manual(&self) -> bool {
        !self.manual.is_no_qc()
    }

    /// Total according to the derivation rule: the manual flag when set,
    /// otherwise the worst of incoming and all automatic slots.
    pub fn derived_total(&self) -> QcFlag {
        if self.has_manual() {
            self.manual
        } else {
            self.incoming.max(self.automatic.worst())
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.total == self.derived_total()
    }

    pub fn set_incoming(&mut self, flag: QcFlag) {
        self.incoming = flag;
        self.rederive();
    }

    /// Replaces the whole automatic tuple.
    pub fn set_automatic(&mut self, automatic: AutomaticFlags) {
        self.automatic = automatic;
        self.rederive();
    }

    /// Sets the manual flag. `NoQcPerformed` clears a previous override.
    pub fn set_manual(&mut self, flag: QcFlag) {
        self.manual = flag;
        self.rederive();
    }

    fn rederive(&mut self) {
        self.total = self.derived_total();
    }

    /// The four serialized segments, as stored in the unpacked QC columns.
    pub fn segments(&self) -> [String; 4] {
        [
            self.incoming.to_string(),
            self.automatic.to_segment(),
            self.manual.to_string(),
            self.total.to_string(),
        ]
    }
}

fn parse_code(c: char, value: &str) -> Result<QcFlag, ModelError> {
    QcFlag::from_char(c).ok_or_else(|| ModelError::InvalidFlagCode {
        value: value.to_string(),
        code: c.to_string(),
    })
}

fn parse_single(segment: &str, value: &str) -> Result<QcFlag, ModelError> {
    let mut chars = segment.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => parse_code(c, value),
        _ => Err(ModelError::InvalidFlagCode {
            value: value.to_string(),
            code: segment.to_string(),
        }),
    }
}

impl fmt::Display for QcFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{}",
            self.incoming,
            self.automatic.to_segment(),
            self.manual,
            self.total
        )
    }
}

impl FromStr for QcFlags {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for QcFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for QcFlags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
