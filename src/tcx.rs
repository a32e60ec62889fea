//! Training Center (TCX) document tree.
//!
//! The XML is deserialized into plain node structs that mirror the file:
//! repeated children become `Vec`s, attributes are `@`-prefixed, and every
//! leaf value is kept as raw text so numeric coercion happens later in
//! [`crate::fields`]. Required paths are non-optional fields, so a missing
//! one fails deserialization as a whole.

use log::debug;
use serde::Deserialize;

use crate::error::{Result, SummaryError};

/// Root `<TrainingCenterDatabase>` element.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingCenterDatabase {
    #[serde(rename = "Activities")]
    pub activities: ActivitiesNode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivitiesNode {
    #[serde(rename = "Activity", default)]
    pub activities: Vec<ActivityNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityNode {
    #[serde(rename = "@Sport")]
    pub sport: Option<String>,
    /// Activity identifier; TCX files use the start time here.
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Lap")]
    pub laps: Vec<LapNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LapNode {
    #[serde(rename = "@StartTime")]
    pub start_time: String,
    #[serde(rename = "TotalTimeSeconds")]
    pub total_time_seconds: Option<String>,
    #[serde(rename = "DistanceMeters")]
    pub distance_meters: Option<String>,
    #[serde(rename = "MaximumSpeed")]
    pub maximum_speed: Option<String>,
    #[serde(rename = "Calories")]
    pub calories: Option<String>,
    #[serde(rename = "AverageHeartRateBpm")]
    pub average_heart_rate: HeartRateNode,
    #[serde(rename = "MaximumHeartRateBpm")]
    pub maximum_heart_rate: HeartRateNode,
    #[serde(rename = "Cadence")]
    pub cadence: Option<String>,
    #[serde(rename = "Track")]
    pub track: TrackNode,
}

/// `<…HeartRateBpm><Value>…</Value></…HeartRateBpm>`
#[derive(Debug, Clone, Deserialize)]
pub struct HeartRateNode {
    #[serde(rename = "Value")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackNode {
    #[serde(rename = "Trackpoint")]
    pub points: Vec<TrackpointNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackpointNode {
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Position")]
    pub position: Option<PositionNode>,
    #[serde(rename = "AltitudeMeters")]
    pub altitude_meters: Option<String>,
    #[serde(rename = "DistanceMeters")]
    pub distance_meters: Option<String>,
    #[serde(rename = "HeartRateBpm")]
    pub heart_rate: Option<HeartRateNode>,
    #[serde(rename = "Cadence")]
    pub cadence: Option<String>,
    #[serde(rename = "Extensions")]
    pub extensions: Option<ExtensionsNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PositionNode {
    #[serde(rename = "LatitudeDegrees")]
    pub latitude_degrees: Option<String>,
    #[serde(rename = "LongitudeDegrees")]
    pub longitude_degrees: Option<String>,
}

/// Vendor extension block. Garmin writes `<ns3:TPX>`; the prefix varies by
/// exporter, so names are matched on their local part.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtensionsNode {
    #[serde(rename = "TPX", alias = "ns3:TPX")]
    pub tpx: Option<TpxNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TpxNode {
    #[serde(rename = "Speed", alias = "ns3:Speed")]
    pub speed: Option<String>,
}

impl TrainingCenterDatabase {
    /// Take the one activity this document must contain.
    pub fn single_activity(self) -> Result<ActivityNode> {
        let mut activities = self.activities.activities.into_iter();
        match (activities.next(), activities.next()) {
            (Some(activity), None) => Ok(activity),
            (None, _) => Err(SummaryError::MalformedInput(
                "no Activity element under Activities".to_string(),
            )),
            (Some(_), Some(_)) => Err(SummaryError::MalformedInput(
                "expected a single Activity element".to_string(),
            )),
        }
    }
}

/// Parse raw TCX text into the document tree.
pub fn parse_document(xml: &str) -> Result<TrainingCenterDatabase> {
    let doc: TrainingCenterDatabase = quick_xml::de::from_str(xml)?;
    debug!(
        "[TcxSummary] parsed document with {} activities",
        doc.activities.activities.len()
    );
    Ok(doc)
}
