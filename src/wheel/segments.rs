//! Segment model: equal angular wedges in entry order

use crate::common::types::{Segment, FULL_TURN_DEGREES};

/// Guards floor() against representation error right at a boundary
const BOUNDARY_EPSILON: f64 = 1e-9;

/// Angular width of one segment on a wheel of `segment_count` entries
pub fn segment_width(segment_count: usize) -> f64 {
    FULL_TURN_DEGREES / segment_count as f64
}

/// Derive one segment per entry, partitioning [0, 360) in list order.
///
/// Pure and O(n); identical input always yields identical output.
pub fn segments<S: AsRef<str>>(entries: &[S]) -> Vec<Segment> {
    let n = entries.len();
    entries
        .iter()
        .enumerate()
        .map(|(index, label)| Segment {
            index,
            label: label.as_ref().to_string(),
            start_angle: index as f64 * FULL_TURN_DEGREES / n as f64,
            end_angle: (index + 1) as f64 * FULL_TURN_DEGREES / n as f64,
        })
        .collect()
}

/// Index of the wedge containing `angle` in the wheel's own frame
pub fn segment_at(angle: f64, segment_count: usize) -> usize {
    let width = segment_width(segment_count);
    let normalized = angle.rem_euclid(FULL_TURN_DEGREES);
    let index = (normalized / width + BOUNDARY_EPSILON).floor() as usize;
    index % segment_count
}

/// Index of the segment resting under the fixed pointer after the wheel
/// has turned clockwise by `rotation_degrees`.
///
/// The pointer sits at angle 0 on screen, which is wheel angle `-rotation`.
pub fn pointer_segment(rotation_degrees: f64, segment_count: usize) -> usize {
    segment_at(-rotation_degrees, segment_count)
}
