//! Column-name constants for the measurement table.
//! Single source of truth for ingest, export and the changes report.

// ── Identity columns ────────────────────────────────────────────────────────
pub const VISIT_KEY: &str = "visit_key";
pub const SERNO: &str = "SERNO";
pub const PARAMETER: &str = "parameter";
pub const DEPTH: &str = "DEPH";
pub const VALUE: &str = "value";

pub const COUNTRY: &str = "CTRYID";
pub const SHIP: &str = "SHIPC";
pub const CRUISE: &str = "CRUISE_NO";
pub const STATION: &str = "STATN";
pub const LATITUDE: &str = "LATIT";
pub const LONGITUDE: &str = "LONGI";
pub const LATITUDE_DD: &str = "sample_latitude_dd";
pub const LONGITUDE_DD: &str = "sample_longitude_dd";
pub const SAMPLE_DATE: &str = "sample_date";
pub const WATER_DEPTH: &str = "WADEP";

/// Columns joined to build a `visit_key` when the source file has none.
pub const VISIT_KEY_PARTS: [&str; 4] = [COUNTRY, SHIP, CRUISE, SERNO];

// ── Quality flag columns ────────────────────────────────────────────────────
pub const QUALITY_FLAG: &str = "quality_flag";
pub const QUALITY_FLAG_LONG: &str = "quality_flag_long";

pub const INCOMING_QC: &str = "INCOMING_QC";
pub const AUTO_QC: &str = "AUTO_QC";
pub const MANUAL_QC: &str = "MANUAL_QC";
pub const TOTAL_QC: &str = "TOTAL_QC";

/// Unpacked `quality_flag_long` segments, in serialization order.
pub const UNPACKED_QC: [&str; 4] = [INCOMING_QC, AUTO_QC, MANUAL_QC, TOTAL_QC];

/// Substring marking per-test automatic QC detail columns.
pub const AUTOMATIC_DETAIL_MARKER: &str = "automatic";

// ── Changes report ──────────────────────────────────────────────────────────
/// Fixed projection of the changes report, before automatic detail columns.
pub const REPORT_COLUMNS: [&str; 19] = [
    LATITUDE,
    LONGITUDE,
    STATION,
    COUNTRY,
    SHIP,
    CRUISE,
    SERNO,
    SAMPLE_DATE,
    "reported_sample_time",
    "sea_basin",
    WATER_DEPTH,
    DEPTH,
    PARAMETER,
    VALUE,
    "unit",
    INCOMING_QC,
    AUTO_QC,
    MANUAL_QC,
    TOTAL_QC,
];

/// True for columns regenerated from `quality_flag_long` and never stored.
pub fn is_unpacked_qc(column: &str) -> bool {
    UNPACKED_QC.contains(&column)
}
