//! Quality flag and automatic test enumerations.
//!
//! Flag codes follow the SeaDataNet measurand qualifier scale (digits 0-9)
//! used by the national oceanographic data centres.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// Quality category of one measurement.
///
/// Equality follows the numeric code, ordering follows [`QcFlag::severity`]:
/// `a < b` means `b` is the worse flag. `max()` therefore picks the worst flag
/// among several checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QcFlag {
    /// 0: no quality control performed. Also the "manual not set" sentinel.
    #[default]
    NoQcPerformed,
    /// 1: good data.
    GoodData,
    /// 2: probably good data.
    ProbablyGoodData,
    /// 3: bad data that are potentially correctable.
    BadDataCorrectable,
    /// 4: bad data.
    BadData,
    /// 5: value changed.
    ValueChanged,
    /// 6: value below detection limit.
    BelowDetection,
    /// 7: value in excess of the measuring range.
    InExcess,
    /// 8: interpolated value.
    InterpolatedValue,
    /// 9: missing value.
    MissingValue,
}

impl QcFlag {
    /// All flags in code order.
    pub const ALL: [QcFlag; 10] = [
        QcFlag::NoQcPerformed,
        QcFlag::GoodData,
        QcFlag::ProbablyGoodData,
        QcFlag::BadDataCorrectable,
        QcFlag::BadData,
        QcFlag::ValueChanged,
        QcFlag::BelowDetection,
        QcFlag::InExcess,
        QcFlag::InterpolatedValue,
        QcFlag::MissingValue,
    ];

    pub fn code(self) -> u8 {
        match self {
            QcFlag::NoQcPerformed => 0,
            QcFlag::GoodData => 1,
            QcFlag::ProbablyGoodData => 2,
            QcFlag::BadDataCorrectable => 3,
            QcFlag::BadData => 4,
            QcFlag::ValueChanged => 5,
            QcFlag::BelowDetection => 6,
            QcFlag::InExcess => 7,
            QcFlag::InterpolatedValue => 8,
            QcFlag::MissingValue => 9,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    /// Single character used in the composite flag string.
    pub fn as_char(self) -> char {
        char::from(b'0' + self.code())
    }

    pub fn from_char(c: char) -> Option<Self> {
        c.to_digit(10)
            .and_then(|d| u8::try_from(d).ok())
            .and_then(Self::from_code)
    }

    /// Rank used to pick the worst flag; higher is worse.
    ///
    /// The scale is a fixed lookup, not the numeric code: a missing value
    /// outranks "bad but correctable" and only "bad" outranks a missing value.
    pub fn severity(self) -> u8 {
        match self {
            QcFlag::NoQcPerformed => 0,
            QcFlag::GoodData => 1,
            QcFlag::InterpolatedValue => 2,
            QcFlag::ValueChanged => 3,
            QcFlag::ProbablyGoodData => 4,
            QcFlag::BelowDetection => 5,
            QcFlag::InExcess => 6,
            QcFlag::BadDataCorrectable => 7,
            QcFlag::MissingValue => 8,
            QcFlag::BadData => 9,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            QcFlag::NoQcPerformed => "No QC performed",
            QcFlag::GoodData => "Good data",
            QcFlag::ProbablyGoodData => "Probably good data",
            QcFlag::BadDataCorrectable => "Bad data correctable",
            QcFlag::BadData => "Bad data",
            QcFlag::ValueChanged => "Value changed",
            QcFlag::BelowDetection => "Below detection limit",
            QcFlag::InExcess => "In excess of quoted value",
            QcFlag::InterpolatedValue => "Interpolated value",
            QcFlag::MissingValue => "Missing value",
        }
    }

    pub fn is_no_qc(self) -> bool {
        self == QcFlag::NoQcPerformed
    }
}

impl Ord for QcFlag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.severity().cmp(&other.severity())
    }
}

impl PartialOrd for QcFlag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for QcFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for QcFlag {
    type Err = ModelError;

    /// Parses a single flag code such as `"4"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => None,
        }
        .ok_or_else(|| ModelError::InvalidFlagCode {
            value: s.to_string(),
            code: trimmed.to_string(),
        })
    }
}

/// Automatic QC test kinds, one slot each in the automatic flag tuple.
///
/// The declaration order is the slot order of the serialized automatic
/// segment and must never change for a given deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QcField {
    DetectionLimit,
    Range,
    Spike,
    Gradient,
    Statistic,
    Consistency,
    H2s,
    IncreasingDecreasing,
    RepeatedValue,
    Stability,
}

impl QcField {
    pub const COUNT: usize = 10;

    pub const ALL: [QcField; QcField::COUNT] = [
        QcField::DetectionLimit,
        QcField::Range,
        QcField::Spike,
        QcField::Gradient,
        QcField::Statistic,
        QcField::Consistency,
        QcField::H2s,
        QcField::IncreasingDecreasing,
        QcField::RepeatedValue,
        QcField::Stability,
    ];

    /// Slot of this test in the automatic flag tuple.
    pub fn index(self) -> usize {
        match self {
            QcField::DetectionLimit => 0,
            QcField::Range => 1,
            QcField::Spike => 2,
            QcField::Gradient => 3,
            QcField::Statistic => 4,
            QcField::Consistency => 5,
            QcField::H2s => 6,
            QcField::IncreasingDecreasing => 7,
            QcField::RepeatedValue => 8,
            QcField::Stability => 9,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QcField::DetectionLimit => "DetectionLimit",
            QcField::Range => "Range",
            QcField::Spike => "Spike",
            QcField::Gradient => "Gradient",
            QcField::Statistic => "Statistic",
            QcField::Consistency => "Consistency",
            QcField::H2s => "H2s",
            QcField::IncreasingDecreasing => "IncreasingDecreasing",
            QcField::RepeatedValue => "RepeatedValue",
            QcField::Stability => "Stability",
        }
    }
}

impl fmt::Display for QcField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QcField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace(['_', '-', ' '], "").to_uppercase();
        QcField::ALL
            .into_iter()
            .find(|field| field.as_str().to_uppercase() == normalized)
            .ok_or_else(|| format!("Unknown automatic QC field: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_codes_round_trip() {
        for flag in QcFlag::ALL {
            assert_eq!(QcFlag::from_code(flag.code()), Some(flag));
            assert_eq!(QcFlag::from_char(flag.as_char()), Some(flag));
        }
        assert_eq!(QcFlag::from_code(10), None);
        assert_eq!(QcFlag::from_char('A'), None);
    }

    #[test]
    fn test_worst_flag_uses_severity_lookup() {
        assert!(QcFlag::BadData > QcFlag::ProbablyGoodData);
        assert!(QcFlag::MissingValue > QcFlag::BadDataCorrectable);
        assert!(QcFlag::BadData > QcFlag::MissingValue);
        assert!(QcFlag::GoodData > QcFlag::NoQcPerformed);
        let worst = [QcFlag::GoodData, QcFlag::BadDataCorrectable, QcFlag::InExcess]
            .into_iter()
            .max();
        assert_eq!(worst, Some(QcFlag::BadDataCorrectable));
    }

    #[test]
    fn test_flag_from_str() {
        assert_eq!("4".parse::<QcFlag>().unwrap(), QcFlag::BadData);
        assert_eq!(" 1 ".parse::<QcFlag>().unwrap(), QcFlag::GoodData);
        assert!("44".parse::<QcFlag>().is_err());
        assert!("".parse::<QcFlag>().is_err());
    }

    #[test]
    fn test_field_slots_follow_declaration_order() {
        for (slot, field) in QcField::ALL.into_iter().enumerate() {
            assert_eq!(field.index(), slot);
        }
        assert_eq!("range".parse::<QcField>().unwrap(), QcField::Range);
        assert_eq!(
            "detection_limit".parse::<QcField>().unwrap(),
            QcField::DetectionLimit
        );
    }
}
