//! Interval merging and coverage-fraction computation.
//!
//! Mapped read spans accumulated for one reference are merged into disjoint
//! maximal intervals with a sort-then-sweep pass, and the merged length is
//! divided by the reference length to get the fraction of the reference
//! covered by at least one read.

use thiserror::Error;
use tracing::warn;

use crate::core::Interval;

#[derive(Error, Debug)]
pub enum CoverageError {
    #[error("coverage fraction is undefined for a zero-length reference")]
    EmptyReference,
}

/// Merge intervals into a disjoint, sorted, maximal set.
///
/// Intervals are sorted by start ascending (ties by end ascending), then a
/// single sweep extends a running interval while the next interval's start
/// does not pass the running end. Adjacent half-open intervals
/// (`running.end == next.start`) are merged into one span.
#[must_use]
pub fn merge(intervals: &[Interval]) -> Vec<Interval> {
    if intervals.is_empty() {
        return Vec::new();
    }

    let mut sorted = intervals.to_vec();
    sorted.sort_by_key(|iv| (iv.start, iv.end));

    let mut merged = Vec::new();
    let mut running = sorted[0];
    for &next in &sorted[1..] {
        if next.start <= running.end {
            running.end = running.end.max(next.end);
        } else {
            merged.push(running);
            running = next;
        }
    }
    merged.push(running);
    merged
}

/// Fraction of the reference's length covered by the merged intervals.
///
/// The result is deliberately not capped: a fraction above 1.0 signals
/// malformed input (overlaps that survived merging, or spans past the
/// reference end) and is the caller's data-integrity problem to surface.
///
/// # Errors
///
/// Returns `CoverageError::EmptyReference` when `reference_length` is zero.
pub fn coverage_fraction(
    reference_length: u64,
    merged: &[Interval],
) -> Result<f64, CoverageError> {
    if reference_length == 0 {
        return Err(CoverageError::EmptyReference);
    }

    let covered: u64 = merged.iter().map(Interval::len).sum();
    #[allow(clippy::cast_precision_loss)]
    let fraction = covered as f64 / reference_length as f64;

    if fraction > 1.0 {
        warn!(
            covered,
            reference_length, "coverage fraction exceeds 1.0; input intervals look malformed"
        );
    }
    Ok(fraction)
}
