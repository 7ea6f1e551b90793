#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Insight series returned by the `/insights` endpoints.
//!
//! Car ownership and CBD population are yearly series. The backend also
//! derives growth metrics from them; [`yearly_percentage_change`],
//! [`average_annual_growth_rate`] and [`values_per_1000`] compute the same
//! metrics locally for responses that omit them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A yearly absolute value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InsightSeriesPoint {
    /// Reference year.
    pub year: i32,
    /// Value for the year.
    pub value: f64,
}

/// A yearly percentage.
///
/// Older backends label the figure `value` instead of `percent`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InsightPercentPoint {
    /// Reference year.
    pub year: i32,
    /// Percentage change into this year.
    #[serde(alias = "value")]
    pub percent: f64,
}

/// The region an insight series describes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Region kind, e.g. `"STATE"`.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Response of `GET /insights/carOwnership`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarOwnershipResponse {
    /// Registered vehicles per year.
    pub values: Vec<InsightSeriesPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yearly_percentage_change: Option<Vec<InsightPercentPoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_annual_growth_rate: Option<f64>,
    /// Vehicles per 1000 residents, when population data is available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicles_per_1000: Option<Vec<InsightSeriesPoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<RegionDescriptor>,
}

impl CarOwnershipResponse {
    /// Returns the yearly change, computing it from `values` when the
    /// backend left it out.
    #[must_use]
    pub fn yearly_change_or_computed(&self) -> Vec<InsightPercentPoint> {
        self.yearly_percentage_change
            .clone()
            .unwrap_or_else(|| yearly_percentage_change(&self.values))
    }

    /// Returns the average annual growth rate, computing it from `values`
    /// when the backend left it out.
    #[must_use]
    pub fn growth_rate_or_computed(&self) -> Option<f64> {
        self.average_annual_growth_rate
            .or_else(|| average_annual_growth_rate(&self.values))
    }
}

/// Response of `GET /insights/cbdPopulation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CbdPopulationResponse {
    /// Residents per year.
    pub values: Vec<InsightSeriesPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yearly_percentage_change: Option<Vec<InsightPercentPoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_annual_growth_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<RegionDescriptor>,
}

impl CbdPopulationResponse {
    /// See [`CarOwnershipResponse::yearly_change_or_computed`].
    #[must_use]
    pub fn yearly_change_or_computed(&self) -> Vec<InsightPercentPoint> {
        self.yearly_percentage_change
            .clone()
            .unwrap_or_else(|| yearly_percentage_change(&self.values))
    }

    /// See [`CarOwnershipResponse::growth_rate_or_computed`].
    #[must_use]
    pub fn growth_rate_or_computed(&self) -> Option<f64> {
        self.average_annual_growth_rate
            .or_else(|| average_annual_growth_rate(&self.values))
    }
}

/// Percentage change between consecutive points, tagged with the later
/// year. Pairs whose earlier value is zero are skipped.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn yearly_percentage_change(series: &[InsightSeriesPoint]) -> Vec<InsightPercentPoint> {
    series
        .windows(2)
        .filter(|pair| pair[0].value != 0.0)
        .map(|pair| InsightPercentPoint {
            year: pair[1].year,
            percent: (pair[1].value - pair[0].value) / pair[0].value * 100.0,
        })
        .collect()
}

/// Compound annual growth rate between the first and last points, as a
/// percentage.
///
/// Returns `None` for fewer than two points, a non-positive year span, or a
/// non-positive starting value.
#[must_use]
pub fn average_annual_growth_rate(series: &[InsightSeriesPoint]) -> Option<f64> {
    let (first, last) = match series {
        [first, .., last] => (first, last),
        _ => return None,
    };

    let years = last.year - first.year;
    if years <= 0 || first.value <= 0.0 {
        return None;
    }

    Some(((last.value / first.value).powf(1.0 / f64::from(years)) - 1.0) * 100.0)
}

/// Per-year `numerator / denominator * 1000` for years present in both
/// series with a positive denominator.
///
/// Returns `None` if either input is empty or no year matches.
#[must_use]
pub fn values_per_1000(
    numerator: &[InsightSeriesPoint],
    denominator: &[InsightSeriesPoint],
) -> Option<Vec<InsightSeriesPoint>> {
    if numerator.is_empty() || denominator.is_empty() {
        return None;
    }

    let by_year: BTreeMap<i32, f64> = denominator.iter().map(|p| (p.year, p.value)).collect();

    let out: Vec<InsightSeriesPoint> = numerator
        .iter()
        .filter_map(|p| {
            by_year
                .get(&p.year)
                .filter(|d| **d > 0.0)
                .map(|d| InsightSeriesPoint {
                    year: p.year,
                    value: p.value / d * 1000.0,
                })
        })
        .collect();

    if out.is_empty() { None } else { Some(out) }
}
