//! Historical occupancy types: top segments, hourly buckets and the
//! day-of-week by hour-of-day heatmap.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{is_valid_ratio, string_or_number};

/// What a history query is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryScope {
    /// A street segment (all bays sharing a `segment_id`).
    #[serde(alias = "street_segment")]
    Segment,
    /// A single parking bay.
    Bay,
}

impl fmt::Display for HistoryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Segment => "segment",
            Self::Bay => "bay",
        })
    }
}

/// Body of `POST /parking/history`.
///
/// Dates are optional; the backend defaults to the 30 days before now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    /// Scope of `id`.
    pub scope: HistoryScope,
    /// Segment or bay identifier.
    pub id: String,
    /// Inclusive window start (ISO 8601).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Inclusive window end (ISO 8601).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl HistoryQuery {
    /// Creates a segment-scoped query with backend-default dates.
    #[must_use]
    pub fn segment(id: impl Into<String>) -> Self {
        Self {
            scope: HistoryScope::Segment,
            id: id.into(),
            start_date: None,
            end_date: None,
        }
    }

    /// Creates a bay-scoped query with backend-default dates.
    #[must_use]
    pub fn bay(id: impl Into<String>) -> Self {
        Self {
            scope: HistoryScope::Bay,
            ..Self::segment(id)
        }
    }

    /// Restricts the query to `[start, end]`.
    #[must_use]
    pub fn between(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date = Some(start.into());
        self.end_date = Some(end.into());
        self
    }
}

/// Body of `POST /parking/history/summary`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummaryQuery {
    /// Scope, id and window.
    #[serde(flatten)]
    pub history: HistoryQuery,
    /// Buckets with fewer samples are not suggested as arrival windows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_samples_per_bucket: Option<u32>,
    /// Number of arrival windows to suggest (backend clamps to 1-10).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_n: Option<u32>,
}

impl From<HistoryQuery> for HistorySummaryQuery {
    fn from(history: HistoryQuery) -> Self {
        Self {
            history,
            min_samples_per_bucket: None,
            top_n: None,
        }
    }
}

/// Query parameters of `GET /parking/history/top-segments`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopSegmentsQuery {
    /// Window start (ISO 8601).
    pub start_date: Option<String>,
    /// Window end (ISO 8601).
    pub end_date: Option<String>,
    /// Maximum number of segments to return.
    pub limit: Option<u32>,
}

/// A segment ranked by observation volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySegmentSummary {
    /// Street segment identifier.
    #[serde(deserialize_with = "string_or_number")]
    pub segment_id: String,
    /// Number of sensor readings in the window.
    pub samples: u64,
    /// Earliest reading in the window.
    #[serde(default)]
    pub first_seen: Option<String>,
    /// Latest reading in the window.
    #[serde(default)]
    pub last_seen: Option<String>,
}

/// The date window a top-segments response covers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSegmentsWindow {
    /// Window start.
    #[serde(default, alias = "start")]
    pub start_date: Option<String>,
    /// Window end.
    #[serde(default, alias = "end")]
    pub end_date: Option<String>,
}

/// Response of `GET /parking/history/top-segments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopSegmentsResponse {
    /// Segments, busiest first.
    pub items: Vec<HistorySegmentSummary>,
    /// Window the ranking was computed over.
    #[serde(default)]
    pub window: TopSegmentsWindow,
}

/// One hour of aggregated observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryBucket {
    /// Start of the hour (`YYYY-MM-DD HH:00:00`).
    pub timestamp: String,
    /// Fraction of readings that found the bay free, or `None` when there
    /// were no samples.
    #[serde(default)]
    pub free_ratio: Option<f64>,
    /// Number of readings in the hour.
    pub samples: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupied: Option<u64>,
}

/// Summary block of a history response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySummary {
    /// Number of buckets.
    pub count: u64,
    /// First bucket timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// Last bucket timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

/// Response of `POST /parking/history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryResponse {
    /// Hourly buckets in chronological order.
    pub items: Vec<HistoryBucket>,
    #[serde(default)]
    pub summary: HistorySummary,
    /// Set by the backend when the window had no observations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl HistoryResponse {
    /// Returns `true` if every present free ratio lies in `[0, 1]`.
    #[must_use]
    pub fn ratios_in_range(&self) -> bool {
        self.items
            .iter()
            .filter_map(|b| b.free_ratio)
            .all(is_valid_ratio)
    }
}

/// One cell of the 7x24 occupancy heatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    /// Day of week, 0 = Monday through 6 = Sunday.
    pub dow: u8,
    /// Hour of day, 0-23.
    pub hh: u8,
    /// Number of readings in the cell.
    pub samples: u64,
    /// Mean fraction of readings that found a bay free.
    pub avg_free_ratio: f64,
}

/// A suggested arrival slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrivalWindow {
    /// Day of week, 0 = Monday.
    pub dow: u8,
    /// Hour of day.
    pub hour: u8,
    /// Mean free ratio for the slot.
    pub avg_free_ratio: f64,
}

/// Response of `POST /parking/history/summary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapResponse {
    /// Cells ordered by day then hour. Cells with no data are absent.
    pub heatmap: Vec<HeatmapCell>,
    /// Best arrival windows, highest free ratio first.
    #[serde(default)]
    pub windows: Vec<ArrivalWindow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl HeatmapResponse {
    /// Looks up the cell for a day/hour pair.
    #[must_use]
    pub fn cell(&self, dow: u8, hh: u8) -> Option<&HeatmapCell> {
        self.heatmap.iter().find(|c| c.dow == dow && c.hh == hh)
    }
}
