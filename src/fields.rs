//! Field extractors over the TCX node tree.
//!
//! Two access styles, which must not be mixed up:
//!
//! | Accessor | Absent source value | Non-numeric text |
//! |----------|---------------------|------------------|
//! | [`get_number`] and the `get_*` readings built on it | `None` | `Some(NaN)` |
//! | [`number_or_nan`] for fields the schema guarantees | `NaN` | `NaN` |

use crate::tcx::{LapNode, TrackpointNode};

/// Nodes that may carry a `<Cadence>` child directly.
pub trait HasCadence {
    fn cadence_text(&self) -> Option<&str>;
}

impl HasCadence for LapNode {
    fn cadence_text(&self) -> Option<&str> {
        self.cadence.as_deref()
    }
}

impl HasCadence for TrackpointNode {
    fn cadence_text(&self) -> Option<&str> {
        self.cadence.as_deref()
    }
}

/// Convert element text to a number. Blank text is zero; anything else that
/// does not parse is `NaN`.
pub fn coerce_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// `None` when the value is absent, otherwise its numeric conversion.
///
/// ```rust
/// use tcx_summary::fields::get_number;
///
/// assert_eq!(get_number(None), None);
/// assert_eq!(get_number(Some("82")), Some(82.0));
/// assert!(get_number(Some("fast")).unwrap().is_nan());
/// ```
pub fn get_number(text: Option<&str>) -> Option<f64> {
    text.map(coerce_number)
}

/// Numeric conversion for fields that are expected to be present; absence
/// yields `NaN` rather than `None`.
pub fn number_or_nan(text: Option<&str>) -> f64 {
    text.map_or(f64::NAN, coerce_number)
}

/// `HeartRateBpm.Value` of a track point.
pub fn get_bpm(point: &TrackpointNode) -> Option<f64> {
    get_number(point.heart_rate.as_ref().and_then(|hr| hr.value.as_deref()))
}

pub fn get_cadence<N: HasCadence>(node: &N) -> Option<f64> {
    get_number(node.cadence_text())
}

/// Speed in m/s from the `Extensions.TPX.Speed` vendor path.
pub fn get_speed(point: &TrackpointNode) -> Option<f64> {
    get_number(
        point
            .extensions
            .as_ref()
            .and_then(|ext| ext.tpx.as_ref())
            .and_then(|tpx| tpx.speed.as_deref()),
    )
}

/// True only when both coordinates are present and non-empty.
pub fn has_position(point: &TrackpointNode) -> bool {
    point.position.as_ref().is_some_and(|pos| {
        is_present(pos.latitude_degrees.as_deref()) && is_present(pos.longitude_degrees.as_deref())
    })
}

/// Only meaningful after [`has_position`] returned true.
pub fn get_latitude(point: &TrackpointNode) -> f64 {
    number_or_nan(point.position.as_ref().and_then(|pos| pos.latitude_degrees.as_deref()))
}

/// Only meaningful after [`has_position`] returned true.
pub fn get_longitude(point: &TrackpointNode) -> f64 {
    number_or_nan(point.position.as_ref().and_then(|pos| pos.longitude_degrees.as_deref()))
}

/// Whether a reading takes part in aggregation: present, non-zero and not
/// `NaN`. A genuine zero reading is therefore skipped, same as a missing one.
pub fn is_reading(value: Option<f64>) -> bool {
    matches!(value, Some(v) if v != 0.0 && !v.is_nan())
}

fn is_present(text: Option<&str>) -> bool {
    text.is_some_and(|t| !t.is_empty())
}
