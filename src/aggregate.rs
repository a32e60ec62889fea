//! # Lap and Track-Point Aggregation
//!
//! Laps and track points are built depth first, in document order. Each
//! finished record is handed to an [`ActivityVisitor`]: every point of a lap
//! is visited before the lap itself. [`ActivityAccumulator`] is the visitor
//! that [`crate::summarize`] threads through the walk to produce the
//! activity-level rollups.
//!
//! Aggregation rules:
//! - Lap totals (seconds, meters, calories) are summed as-is, `NaN` included.
//! - Cadence, heart rate and speed are summed, counted and maximized per
//!   point, and only when the reading is present, non-zero and not `NaN`.
//! - The running maximum starts at 0 and uses a plain `>` comparison.

use log::trace;

use crate::error::Result;
use crate::fields::{
    get_bpm, get_cadence, get_latitude, get_longitude, get_number, get_speed, has_position,
    is_reading, number_or_nan,
};
use crate::tcx::{LapNode, TrackpointNode};
use crate::time_utils::{parse_date, Timestamp};
use crate::{Activity, ActivityTrackPoint, Lap, Position};

/// Meters per second to miles per hour.
pub const MPS_TO_MPH: f64 = 2.23694;

/// Decimal places kept on activity speeds.
pub const SPEED_PRECISION: i32 = 2;

/// Hooks fired as records are completed during the walk.
pub trait ActivityVisitor {
    fn on_point(&mut self, _point: &ActivityTrackPoint) {}
    fn on_lap(&mut self, _lap: &Lap) {}
}

/// No hooks.
impl ActivityVisitor for () {}

/// Running sum, count and maximum of one per-point reading.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricAccumulator {
    pub sum: f64,
    pub count: usize,
    pub max: f64,
}

impl MetricAccumulator {
    /// Fold one reading in, skipping it unless [`is_reading`] accepts it.
    pub fn record(&mut self, value: Option<f64>) {
        match value {
            Some(v) if is_reading(value) => {
                self.sum += v;
                self.count += 1;
                if v > self.max {
                    self.max = v;
                }
            }
            _ => {}
        }
    }

    /// `sum / count`; `NaN` when nothing was recorded.
    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Activity-wide state built up while laps and points are parsed.
///
/// Create a fresh one per document; nothing here is shared between calls.
#[derive(Debug, Clone, Default)]
pub struct ActivityAccumulator {
    pub total_seconds: f64,
    pub total_meters: f64,
    pub total_calories: f64,
    pub cadence: MetricAccumulator,
    pub bpm: MetricAccumulator,
    pub speed: MetricAccumulator,
    pub track: Vec<ActivityTrackPoint>,
}

impl ActivityVisitor for ActivityAccumulator {
    fn on_point(&mut self, point: &ActivityTrackPoint) {
        self.cadence.record(point.cadence);
        self.bpm.record(point.bpm);
        self.speed.record(point.speed);
        self.track.push(point.clone());
    }

    fn on_lap(&mut self, lap: &Lap) {
        self.total_seconds += lap.total_seconds;
        self.total_meters += lap.total_meters;
        self.total_calories += lap.calories;
    }
}

impl ActivityAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compose the activity record from the accumulated state.
    pub fn finish(self, sport: Option<String>, start_time: Timestamp, laps: Vec<Lap>) -> Activity {
        Activity {
            sport,
            start_time,
            total_activity_seconds: self.total_seconds,
            total_activity_meters: self.total_meters,
            total_activity_calories: self.total_calories,
            max_speed: precision_round(self.speed.max * MPS_TO_MPH, SPEED_PRECISION),
            average_speed: precision_round(self.speed.mean() * MPS_TO_MPH, SPEED_PRECISION),
            max_cadence: self.cadence.max,
            average_cadence: self.cadence.mean().round(),
            max_bpm: self.bpm.max,
            average_bpm: self.bpm.mean().round(),
            laps,
            total_activity_track: self.track,
        }
    }
}

/// Round to `precision` decimal places, halves away from zero.
///
/// ```rust
/// use tcx_summary::aggregate::precision_round;
///
/// assert_eq!(precision_round(7.82929, 2), 7.83);
/// assert_eq!(precision_round(-2.5, 0), -3.0);
/// assert!(precision_round(f64::NAN, 2).is_nan());
/// ```
pub fn precision_round(value: f64, precision: i32) -> f64 {
    let factor = 10f64.powi(precision);
    (value * factor).round() / factor
}

/// Build one track point and report it to the visitor.
pub fn parse_track_point<V>(node: &TrackpointNode, visitor: &mut V) -> Result<ActivityTrackPoint>
where
    V: ActivityVisitor + ?Sized,
{
    let position = if has_position(node) {
        Some(Position {
            latitude: get_latitude(node),
            longitude: get_longitude(node),
        })
    } else {
        None
    };

    let point = ActivityTrackPoint {
        time: parse_date(&node.time)?,
        altitude_meters: number_or_nan(node.altitude_meters.as_deref()),
        distance_meters: number_or_nan(node.distance_meters.as_deref()),
        bpm: get_bpm(node),
        cadence: get_cadence(node),
        speed: get_speed(node),
        position,
    };

    visitor.on_point(&point);
    Ok(point)
}

/// Build a lap, visiting each of its points in order, then the lap itself.
pub fn parse_lap<V>(node: &LapNode, visitor: &mut V) -> Result<Lap>
where
    V: ActivityVisitor + ?Sized,
{
    let track = node
        .track
        .points
        .iter()
        .map(|point| parse_track_point(point, visitor))
        .collect::<Result<Vec<_>>>()?;

    let lap = Lap {
        start_time: parse_date(&node.start_time)?,
        total_seconds: number_or_nan(node.total_time_seconds.as_deref()),
        total_meters: number_or_nan(node.distance_meters.as_deref()),
        calories: number_or_nan(node.calories.as_deref()),
        average_bpm: number_or_nan(node.average_heart_rate.value.as_deref()),
        max_bpm: number_or_nan(node.maximum_heart_rate.value.as_deref()),
        cadence: get_cadence(node),
        max_speed: get_number(node.maximum_speed.as_deref()),
        track,
    };
    trace!(
        "[TcxSummary] lap at {} with {} points",
        lap.start_time,
        lap.track.len()
    );

    visitor.on_lap(&lap);
    Ok(lap)
}
