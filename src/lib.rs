//! # TCX Summary
//!
//! Parse a Garmin Training Center (TCX) activity file into per-point readings,
//! per-lap summaries and whole-activity rollups.
//!
//! This library provides:
//! - A typed view of the TCX document tree ([`tcx`])
//! - Null-safe field extraction with the source's coercion rules ([`fields`])
//! - Timestamps fixed to US Mountain Time ([`time_utils`])
//! - Single-pass lap/point aggregation ([`aggregate`])
//!
//! ## Features
//!
//! - **`cli`** - Build the `tcx-summary` binary that writes the summary as JSON
//!
//! ## Quick Start
//!
//! ```rust
//! use tcx_summary::summarize;
//!
//! let xml = r#"<TrainingCenterDatabase>
//!   <Activities>
//!     <Activity Sport="Running">
//!       <Id>2018-04-20T00:50:43.000Z</Id>
//!       <Lap StartTime="2018-04-20T00:50:43.000Z">
//!         <TotalTimeSeconds>10</TotalTimeSeconds>
//!         <DistanceMeters>30</DistanceMeters>
//!         <Calories>2</Calories>
//!         <AverageHeartRateBpm><Value>120</Value></AverageHeartRateBpm>
//!         <MaximumHeartRateBpm><Value>125</Value></MaximumHeartRateBpm>
//!         <Track>
//!           <Trackpoint>
//!             <Time>2018-04-20T00:50:43.000Z</Time>
//!             <AltitudeMeters>1600</AltitudeMeters>
//!             <DistanceMeters>0</DistanceMeters>
//!             <HeartRateBpm><Value>120</Value></HeartRateBpm>
//!           </Trackpoint>
//!         </Track>
//!       </Lap>
//!     </Activity>
//!   </Activities>
//! </TrainingCenterDatabase>"#;
//!
//! let summary = summarize(xml).unwrap();
//! assert_eq!(summary.activity.laps.len(), 1);
//! assert_eq!(summary.activity.average_bpm, 120.0);
//! assert!(summary.activity.average_cadence.is_nan()); // no cadence readings
//! ```

use log::debug;
use serde::Serialize;

pub mod aggregate;
pub mod error;
pub mod fields;
pub mod tcx;
pub mod time_utils;

pub use aggregate::{
    ActivityAccumulator, ActivityVisitor, MetricAccumulator, parse_lap, parse_track_point,
};
pub use error::{Result, SummaryError};
pub use time_utils::{Timestamp, format_long, parse_date};

// ============================================================================
// Core Types
// ============================================================================

/// Latitude/longitude in degrees, as written in the file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// One timestamped sample within a lap.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTrackPoint {
    #[serde(serialize_with = "time_utils::serialize_timestamp")]
    pub time: Timestamp,
    pub altitude_meters: f64,
    pub distance_meters: f64,
    /// Heart rate in beats per minute
    #[serde(rename = "BPM")]
    pub bpm: Option<f64>,
    pub cadence: Option<f64>,
    /// Meters per second
    pub speed: Option<f64>,
    pub position: Option<Position>,
}

/// A contiguous segment of the activity with its own totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lap {
    #[serde(serialize_with = "time_utils::serialize_timestamp")]
    pub start_time: Timestamp,
    pub total_seconds: f64,
    pub total_meters: f64,
    pub calories: f64,
    #[serde(rename = "averageBPM")]
    pub average_bpm: f64,
    #[serde(rename = "maxBPM")]
    pub max_bpm: f64,
    pub cadence: Option<f64>,
    /// As recorded by the device, meters per second
    pub max_speed: Option<f64>,
    pub track: Vec<ActivityTrackPoint>,
}

/// The whole recorded session.
///
/// Speeds are in miles per hour rounded to two decimals. Averages are `NaN`
/// when no reading of that kind was recorded (serialized as `null`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub sport: Option<String>,
    #[serde(serialize_with = "time_utils::serialize_timestamp")]
    pub start_time: Timestamp,
    pub total_activity_seconds: f64,
    pub total_activity_meters: f64,
    pub total_activity_calories: f64,
    pub max_speed: f64,
    pub average_speed: f64,
    pub max_cadence: f64,
    pub average_cadence: f64,
    #[serde(rename = "maxBPM")]
    pub max_bpm: f64,
    #[serde(rename = "averageBPM")]
    pub average_bpm: f64,
    pub laps: Vec<Lap>,
    /// Every lap's track points, in lap order then point order
    pub total_activity_track: Vec<ActivityTrackPoint>,
}

/// Top-level `{ "activity": … }` envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityDocument {
    pub activity: Activity,
}

// ============================================================================
// Core Functions
// ============================================================================

/// Transform TCX text into an activity summary.
///
/// Fails with [`SummaryError::MalformedInput`] when the activity, its laps,
/// a lap's track or a lap's heart-rate summary is missing, and with
/// [`SummaryError::InvalidTimestamp`] when a present timestamp cannot be read.
/// No partial result is returned.
pub fn summarize(xml: &str) -> Result<ActivityDocument> {
    let started = std::time::Instant::now();
    let node = tcx::parse_document(xml)?.single_activity()?;

    let mut acc = ActivityAccumulator::new();
    let laps = node
        .laps
        .iter()
        .map(|lap| parse_lap(lap, &mut acc))
        .collect::<Result<Vec<_>>>()?;
    let start_time = parse_date(&node.id)?;

    let activity = acc.finish(node.sport, start_time, laps);
    debug!(
        "[TcxSummary] summarized {} laps, {} points in {:?}",
        activity.laps.len(),
        activity.total_activity_track.len(),
        started.elapsed()
    );

    Ok(ActivityDocument { activity })
}

/// [`summarize`] and encode the envelope as JSON.
pub fn summarize_to_json(xml: &str, pretty: bool) -> Result<String> {
    let document = summarize(xml)?;
    let json = if pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    Ok(json)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const HEART_RATE_150: &str = "<HeartRateBpm><Value>150</Value></HeartRateBpm>";

    fn trackpoint(second: u32, extra: &str) -> String {
        format!(
            "<Trackpoint><Time>2018-04-20T00:51:{:02}.000Z</Time>\
             <AltitudeMeters>1600</AltitudeMeters>\
             <DistanceMeters>{}</DistanceMeters>{}</Trackpoint>",
            second, second, extra
        )
    }

    fn lap(start_second: u32, points: &[String]) -> String {
        format!(
            "<Lap StartTime=\"2018-04-20T00:51:{:02}.000Z\">\
             <TotalTimeSeconds>30</TotalTimeSeconds>\
             <DistanceMeters>100</DistanceMeters>\
             <Calories>5</Calories>\
             <AverageHeartRateBpm><Value>130</Value></AverageHeartRateBpm>\
             <MaximumHeartRateBpm><Value>140</Value></MaximumHeartRateBpm>\
             <Track>{}</Track></Lap>",
            start_second,
            points.concat()
        )
    }

    fn document(laps: &[String]) -> String {
        format!(
            "<TrainingCenterDatabase><Activities><Activity Sport=\"Biking\">\
             <Id>2018-04-20T00:51:00.000Z</Id>{}</Activity></Activities>\
             </TrainingCenterDatabase>",
            laps.concat()
        )
    }

    fn with_speed(speed: &str) -> String {
        format!("<Extensions><ns3:TPX><ns3:Speed>{}</ns3:Speed></ns3:TPX></Extensions>", speed)
    }

    #[test]
    fn test_flat_track_follows_lap_then_point_order() {
        let xml = document(&[
            lap(0, &[trackpoint(1, ""), trackpoint(2, "")]),
            lap(3, &[trackpoint(3, ""), trackpoint(4, ""), trackpoint(5, "")]),
        ]);
        let activity = summarize(&xml).unwrap().activity;

        let lap_points: usize = activity.laps.iter().map(|l| l.track.len()).sum();
        assert_eq!(activity.total_activity_track.len(), lap_points);

        let flattened: Vec<&ActivityTrackPoint> =
            activity.laps.iter().flat_map(|l| l.track.iter()).collect();
        for (flat, nested) in activity.total_activity_track.iter().zip(flattened) {
            assert_eq!(flat, nested);
        }
        let distances: Vec<f64> = activity
            .total_activity_track
            .iter()
            .map(|p| p.distance_meters)
            .collect();
        assert_eq!(distances, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_lap_totals_are_summed() {
        let xml = document(&[lap(0, &[trackpoint(1, "")]), lap(2, &[trackpoint(2, "")])]);
        let activity = summarize(&xml).unwrap().activity;
        assert_eq!(activity.total_activity_seconds, 60.0);
        assert_eq!(activity.total_activity_meters, 200.0);
        assert_eq!(activity.total_activity_calories, 10.0);
        assert_eq!(activity.sport.as_deref(), Some("Biking"));
    }

    #[test]
    fn test_no_cadence_readings_average_is_nan() {
        let xml = document(&[lap(
            0,
            &[trackpoint(1, ""), trackpoint(2, "<Cadence>0</Cadence>")],
        )]);
        let activity = summarize(&xml).unwrap().activity;
        // 0 / 0
        assert!(activity.average_cadence.is_nan());
        assert_eq!(activity.max_cadence, 0.0);
        assert_eq!(activity.total_activity_track[1].cadence, Some(0.0));
    }

    #[test]
    fn test_speeds_are_converted_and_rounded() {
        let xml = document(&[lap(
            0,
            &[
                trackpoint(1, &with_speed("2.5")),
                trackpoint(2, &with_speed("3.333")),
                trackpoint(3, ""),
            ],
        )]);
        let activity = summarize(&xml).unwrap().activity;
        // 3.333 * 2.23694 = 7.45572102
        assert_eq!(activity.max_speed, 7.46);
        // 2.9165 * 2.23694 = 6.52403551
        assert_eq!(activity.average_speed, 6.52);
        assert_eq!(activity.total_activity_track[0].speed, Some(2.5));
    }

    #[test]
    fn test_position_presence() {
        let xml = document(&[lap(
            0,
            &[
                trackpoint(
                    1,
                    "<Position><LatitudeDegrees>39.7392</LatitudeDegrees>\
                     <LongitudeDegrees>-104.9903</LongitudeDegrees></Position>",
                ),
                trackpoint(2, "<Position><LatitudeDegrees>39.7392</LatitudeDegrees></Position>"),
                trackpoint(3, ""),
            ],
        )]);
        let track = summarize(&xml).unwrap().activity.total_activity_track;
        assert_eq!(
            track[0].position,
            Some(Position { latitude: 39.7392, longitude: -104.9903 })
        );
        assert_eq!(track[1].position, None);
        assert_eq!(track[2].position, None);
    }

    #[test]
    fn test_non_numeric_reading_poisons_nothing_but_its_field() {
        let xml = document(&[lap(
            0,
            &[
                trackpoint(1, "<Cadence>fast</Cadence>"),
                trackpoint(2, "<Cadence>90</Cadence>"),
            ],
        )]);
        let activity = summarize(&xml).unwrap().activity;
        assert!(activity.total_activity_track[0].cadence.unwrap().is_nan());
        assert_eq!(activity.average_cadence, 90.0);
        assert_eq!(activity.max_cadence, 90.0);
    }

    #[test]
    fn test_missing_lap_collection_fails() {
        let xml = document(&[]);
        assert!(matches!(summarize(&xml), Err(SummaryError::MalformedInput(_))));
    }

    #[test]
    fn test_independent_calls_do_not_share_state() {
        let xml = document(&[lap(0, &[trackpoint(1, HEART_RATE_150)])]);
        let first = summarize(&xml).unwrap().activity;
        let second = summarize(&xml).unwrap().activity;

        // No cadence or speed readings, so those averages are NaN on both runs
        assert!(first.average_cadence.is_nan() && second.average_cadence.is_nan());
        assert!(first.average_speed.is_nan() && second.average_speed.is_nan());
        assert_eq!(first.total_activity_track, second.total_activity_track);
        assert_eq!(second.total_activity_track.len(), 1);
        assert_eq!(second.total_activity_seconds, 30.0);
        assert_eq!(second.average_bpm, 150.0);
        assert_eq!(second.max_bpm, 150.0);

        assert_eq!(
            summarize_to_json(&xml, false).unwrap(),
            summarize_to_json(&xml, false).unwrap()
        );
    }

    #[test]
    fn test_multiple_activities_fail() {
        let single = document(&[lap(0, &[trackpoint(1, "")])]);
        let activity = single
            .trim_start_matches("<TrainingCenterDatabase><Activities>")
            .trim_end_matches("</Activities></TrainingCenterDatabase>");
        let xml = format!(
            "<TrainingCenterDatabase><Activities>{}{}</Activities></TrainingCenterDatabase>",
            activity, activity
        );
        assert!(matches!(summarize(&xml), Err(SummaryError::MalformedInput(_))));
    }

    #[test]
    fn test_json_shape() {
        let xml = document(&[lap(0, &[trackpoint(1, HEART_RATE_150)])]);
        let json: serde_json::Value =
            serde_json::from_str(&summarize_to_json(&xml, false).unwrap()).unwrap();

        let activity = &json["activity"];
        assert_eq!(activity["sport"], "Biking");
        assert_eq!(activity["startTime"], "2018-04-19T18:51:00.000-06:00");
        assert_eq!(activity["averageBPM"], 150.0);
        assert!(activity["averageCadence"].is_null());
        assert!(activity["laps"][0]["maxBPM"].is_number());

        let point = &activity["totalActivityTrack"][0];
        assert_eq!(point["BPM"], 150.0);
        assert!(point["cadence"].is_null());
        assert!(point["position"].is_null());
        assert_eq!(point["altitudeMeters"], 1600.0);
    }
}
