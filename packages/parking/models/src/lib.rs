#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Request and response types for the parking finder API.
//!
//! These types mirror the JSON contract of the parking backend. The nearby
//! endpoints have shipped two response shapes over time (a bare array of
//! observations and an `{origin, nearby}` envelope), so [`NearbyResponse`]
//! models both and picks one by probing the decoded body.

pub mod history;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};

/// Walking time (minutes) the backend assumes when `max_walk_time` is
/// omitted from a nearby request.
pub const DEFAULT_MAX_WALK_TIME: f64 = 5.0;

/// Returns `true` if `value` is a valid ratio or probability in `[0, 1]`.
#[must_use]
pub fn is_valid_ratio(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

/// A location-based parking query anchored at a street address.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationQuery {
    /// Address to geocode. Must be non-empty.
    pub address: String,
    /// Maximum walking time from the address, in minutes.
    pub max_walk_time: Option<f64>,
    /// When the caller intends to arrive (predict endpoint only).
    pub datetime: Option<PredictTime>,
}

impl LocationQuery {
    /// Creates a query for `address` with server-side defaults for
    /// everything else.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            max_walk_time: None,
            datetime: None,
        }
    }

    /// Sets the maximum walking time in minutes.
    #[must_use]
    pub fn with_max_walk_time(mut self, minutes: f64) -> Self {
        self.max_walk_time = Some(minutes);
        self
    }

    /// Sets the intended arrival time.
    #[must_use]
    pub fn at(mut self, datetime: impl Into<PredictTime>) -> Self {
        self.datetime = Some(datetime.into());
        self
    }
}

/// Arrival time for a prediction request.
///
/// A typed timestamp is rendered as ISO-8601 UTC on the wire. A raw string
/// is sent exactly as given, with no parsing or validation; the backend
/// reports its own error for malformed values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictTime {
    /// A concrete UTC instant.
    At(DateTime<Utc>),
    /// A caller-formatted timestamp passed through untouched.
    Raw(String),
}

impl PredictTime {
    /// Renders the value as it is transmitted to the backend.
    #[must_use]
    pub fn to_wire(&self) -> String {
        match self {
            Self::At(at) => at.to_rfc3339_opts(SecondsFormat::Millis, true),
            Self::Raw(raw) => raw.clone(),
        }
    }
}

impl From<DateTime<Utc>> for PredictTime {
    fn from(value: DateTime<Utc>) -> Self {
        Self::At(value)
    }
}

impl From<String> for PredictTime {
    fn from(value: String) -> Self {
        Self::Raw(value)
    }
}

impl From<&str> for PredictTime {
    fn from(value: &str) -> Self {
        Self::Raw(value.to_string())
    }
}

/// A single kerbside parking bay observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkingObservation {
    /// Kerbside sensor identifier.
    #[serde(deserialize_with = "string_or_number")]
    pub kerbside_id: String,
    /// Parking zone number.
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub zone_number: Option<String>,
    /// Human-readable sensor status (e.g. `"Present"`, `"Unoccupied"`).
    #[serde(default)]
    pub status_description: String,
    /// When the sensor last reported its status.
    #[serde(default)]
    pub status_timestamp: Option<String>,
    /// Latitude (WGS84, decimal degrees).
    pub latitude: f64,
    /// Longitude (WGS84, decimal degrees).
    pub longitude: f64,
    /// Whether a vehicle was present at the last reading.
    #[serde(default)]
    pub is_occupied: bool,
    /// Regulatory sign text for the bay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign: Option<String>,
    /// Days the restriction applies (e.g. `"Mon-Fri"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<String>,
    /// Start of the restricted time window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// End of the restricted time window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    /// Walking time from the query origin, in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub walking_time: Option<f64>,
    /// Distance from the query origin, in kilometres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    /// Predicted probability that the bay is free (0-1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
    /// When the backend last refreshed this record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl ParkingObservation {
    /// Returns `false` if a predicted probability is present but outside
    /// `[0, 1]`.
    #[must_use]
    pub fn has_valid_probability(&self) -> bool {
        self.probability.is_none_or(is_valid_ratio)
    }
}

/// The geocoded anchor point of a nearby query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginDescriptor {
    /// Latitude of the resolved address.
    pub latitude: f64,
    /// Longitude of the resolved address.
    pub longitude: f64,
    /// Address as submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Address as formatted by the geocoder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
}

/// The `{origin, nearby}` envelope returned by newer backends.
///
/// When the backend answered with a bare list, `origin` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyEnvelope {
    /// Resolved query origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<OriginDescriptor>,
    /// Observations near the origin.
    pub nearby: Vec<ParkingObservation>,
}

/// A decoded nearby/predict response in whichever shape the backend used.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NearbyResponse {
    /// `{origin, nearby: [...]}`.
    Envelope(NearbyEnvelope),
    /// `[...]`.
    Bare(Vec<ParkingObservation>),
}

impl NearbyResponse {
    /// Decodes a JSON body, treating any object with a `nearby` key as an
    /// envelope and anything else as a bare list.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if the body matches neither shape.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        if value.get("nearby").is_some() {
            Ok(Self::Envelope(serde_json::from_value(value)?))
        } else {
            Ok(Self::Bare(serde_json::from_value(value)?))
        }
    }

    /// Returns the resolved origin, if the backend sent one.
    #[must_use]
    pub const fn origin(&self) -> Option<&OriginDescriptor> {
        match self {
            Self::Envelope(envelope) => envelope.origin.as_ref(),
            Self::Bare(_) => None,
        }
    }

    /// Returns the observation list regardless of shape.
    #[must_use]
    pub fn nearby(&self) -> &[ParkingObservation] {
        match self {
            Self::Envelope(envelope) => &envelope.nearby,
            Self::Bare(list) => list,
        }
    }

    /// Consumes the response, keeping only the observation list.
    #[must_use]
    pub fn into_nearby(self) -> Vec<ParkingObservation> {
        match self {
            Self::Envelope(envelope) => envelope.nearby,
            Self::Bare(list) => list,
        }
    }

    /// Consumes the response as an envelope. A bare list becomes an
    /// envelope without an origin.
    #[must_use]
    pub fn into_envelope(self) -> NearbyEnvelope {
        match self {
            Self::Envelope(envelope) => envelope,
            Self::Bare(nearby) => NearbyEnvelope {
                origin: None,
                nearby,
            },
        }
    }
}

impl<'de> Deserialize<'de> for NearbyResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(D::Error::custom)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Integer(i64),
    Float(f64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Integer(n) => n.to_string(),
            StringOrNumber::Float(n) => n.to_string(),
        }
    }
}

/// Accepts identifiers the backend may encode as either strings or numbers.
pub(crate) fn string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<String, D::Error> {
    StringOrNumber::deserialize(deserializer).map(String::from)
}

pub(crate) fn optional_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Option::<StringOrNumber>::deserialize(deserializer).map(|v| v.map(String::from))
}
