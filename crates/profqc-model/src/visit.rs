//! Visits: one sampling occasion (station, cruise, series), the unit of
//! navigation. A visit owns row indices into the table, not copies.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};

use crate::columns;
use crate::{Measurement, MeasurementTable};

#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    pub visit_key: String,
    /// Indices into the table this visit was built from.
    pub rows: Vec<usize>,
    pub serno: String,
    pub station_name: Option<String>,
    pub cruise_number: Option<String>,
    pub ship: Option<String>,
    pub country: Option<String>,
    pub sample_date: Option<NaiveDate>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub water_depth: Option<f64>,
}

impl Visit {
    fn from_first_row(visit_key: &str, first: &Measurement) -> Self {
        let text = |column: &str| first.attribute(column).map(|v| v.trim().to_string());
        let number = |column: &str| first.attribute(column).and_then(|v| v.trim().parse::<f64>().ok());
        Self {
            visit_key: visit_key.to_string(),
            rows: Vec::new(),
            serno: first.serno.clone(),
            station_name: text(columns::STATION),
            cruise_number: text(columns::CRUISE),
            ship: text(columns::SHIP),
            country: text(columns::COUNTRY),
            sample_date: first.attribute(columns::SAMPLE_DATE).and_then(parse_date),
            latitude: number(columns::LATITUDE_DD)
                .or_else(|| number(columns::LATITUDE).map(degrees_minutes_to_decimal)),
            longitude: number(columns::LONGITUDE_DD)
                .or_else(|| number(columns::LONGITUDE).map(degrees_minutes_to_decimal)),
            water_depth: number(columns::WATER_DEPTH),
        }
    }

    /// Rows of this visit in table order.
    pub fn measurements<'a>(
        &'a self,
        table: &'a MeasurementTable,
    ) -> impl Iterator<Item = (usize, &'a Measurement)> + 'a {
        self.rows
            .iter()
            .filter_map(move |&index| table.row(index).map(|row| (index, row)))
    }

    /// Rows of one parameter, the series plotted in one profile.
    pub fn series<'a>(
        &'a self,
        table: &'a MeasurementTable,
        parameter: &'a str,
    ) -> impl Iterator<Item = (usize, &'a Measurement)> + 'a {
        self.measurements(table)
            .filter(move |(_, row)| row.parameter == parameter)
    }

    pub fn parameters(&self, table: &MeasurementTable) -> Vec<String> {
        self.measurements(table)
            .map(|(_, row)| row.parameter.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn year(&self) -> Option<i32> {
        self.sample_date.map(|date| date.year())
    }

    pub fn month(&self) -> Option<u32> {
        self.sample_date.map(|date| date.month())
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    ["%Y-%m-%d", "%Y%m%d", "%Y/%m/%d"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            trimmed
                .get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })
}

/// Converts a `DDMM.mm` coordinate to decimal degrees.
pub fn degrees_minutes_to_decimal(value: f64) -> f64 {
    let degrees = (value / 100.0).trunc();
    let minutes = value - degrees * 100.0;
    degrees + minutes / 60.0
}

/// Filter dimensions, used to compute the options still reachable when one
/// dimension is left open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDimension {
    Year,
    Month,
    Cruise,
    Station,
}

/// Visit filter; an empty set leaves its dimension unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitFilter {
    pub years: BTreeSet<i32>,
    pub months: BTreeSet<u32>,
    pub cruises: BTreeSet<String>,
    pub stations: BTreeSet<String>,
}

impl VisitFilter {
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
            && self.months.is_empty()
            && self.cruises.is_empty()
            && self.stations.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, visit: &Visit) -> bool {
        self.matches_ignoring(visit, None)
    }

    pub fn matches_ignoring(&self, visit: &Visit, ignore: Option<FilterDimension>) -> bool {
        let check = |dimension: FilterDimension, empty: bool, hit: bool| {
            ignore == Some(dimension) || empty || hit
        };
        check(
            FilterDimension::Year,
            self.years.is_empty(),
            visit.year().is_some_and(|y| self.years.contains(&y)),
        ) && check(
            FilterDimension::Month,
            self.months.is_empty(),
            visit.month().is_some_and(|m| self.months.contains(&m)),
        ) && check(
            FilterDimension::Cruise,
            self.cruises.is_empty(),
            visit
                .cruise_number
                .as_ref()
                .is_some_and(|c| self.cruises.contains(c)),
        ) && check(
            FilterDimension::Station,
            self.stations.is_empty(),
            visit
                .station_name
                .as_ref()
                .is_some_and(|s| self.stations.contains(s)),
        )
    }
}

/// All visits of a table, sorted by visit key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisitIndex {
    visits: BTreeMap<String, Visit>,
}

impl VisitIndex {
    /// Groups table rows by `visit_key`. Must be rebuilt whenever the table
    /// is replaced; row indices refer to that table only.
    pub fn build(table: &MeasurementTable) -> Self {
        let mut visits: BTreeMap<String, Visit> = BTreeMap::new();
        for (index, row) in table.rows().iter().enumerate() {
            visits
                .entry(row.visit_key.clone())
                .or_insert_with(|| Visit::from_first_row(&row.visit_key, row))
                .rows
                .push(index);
        }
        Self { visits }
    }

    pub fn len(&self) -> usize {
        self.visits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    pub fn get(&self, visit_key: &str) -> Option<&Visit> {
        self.visits.get(visit_key)
    }

    pub fn first(&self) -> Option<&Visit> {
        self.visits.values().next()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.visits.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Visit> {
        self.visits.values()
    }

    pub fn filtered<'a>(&'a self, filter: &'a VisitFilter) -> impl Iterator<Item = &'a Visit> + 'a {
        self.visits.values().filter(move |visit| filter.matches(visit))
    }

    pub fn possible_years(&self, filter: &VisitFilter) -> BTreeSet<i32> {
        self.reachable(filter, FilterDimension::Year)
            .filter_map(Visit::year)
            .collect()
    }

    pub fn possible_months(&self, filter: &VisitFilter) -> BTreeSet<u32> {
        self.reachable(filter, FilterDimension::Month)
            .filter_map(Visit::month)
            .collect()
    }

    pub fn possible_cruises(&self, filter: &VisitFilter) -> BTreeSet<String> {
        self.reachable(filter, FilterDimension::Cruise)
            .filter_map(|visit| visit.cruise_number.clone())
            .collect()
    }

    pub fn possible_stations(&self, filter: &VisitFilter) -> BTreeSet<String> {
        self.reachable(filter, FilterDimension::Station)
            .filter_map(|visit| visit.station_name.clone())
            .collect()
    }

    fn reachable<'a>(
        &'a self,
        filter: &'a VisitFilter,
        ignore: FilterDimension,
    ) -> impl Iterator<Item = &'a Visit> + 'a {
        self.visits
            .values()
            .filter(move |visit| filter.matches_ignoring(visit, Some(ignore)))
    }
}
