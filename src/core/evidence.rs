use serde::{Deserialize, Serialize};

/// Half-open interval `[start, end)` in reference coordinates.
///
/// `end - start` is the number of covered bases, matching the coordinate
/// convention reported by the alignment engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Interval {
    pub start: u64,
    pub end: u64,
}

impl Interval {
    #[must_use]
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Number of bases spanned
    #[must_use]
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Mapping evidence accumulated for one reference during a classification pass.
///
/// Appended to once per read that maps uniquely to the reference; never
/// mutated after the pass completes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingEvidence {
    /// Mapping qualities of every uniquely-assigned read, in arrival order
    pub qualities: Vec<u8>,

    /// Reference span of each uniquely-assigned read's best alignment
    pub intervals: Vec<Interval>,

    /// Number of uniquely-assigned reads
    pub hit_count: u64,
}

impl MappingEvidence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one uniquely-mapped read
    pub fn record(&mut self, quality: u8, interval: Interval) {
        self.qualities.push(quality);
        self.intervals.push(interval);
        self.hit_count += 1;
    }

    /// Mean mapping quality over all recorded reads, `None` when empty
    #[must_use]
    pub fn mean_quality(&self) -> Option<f64> {
        if self.qualities.is_empty() {
            return None;
        }
        let total: u64 = self.qualities.iter().map(|&q| u64::from(q)).sum();
        #[allow(clippy::cast_precision_loss)]
        let mean = total as f64 / self.qualities.len() as f64;
        Some(mean)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hit_count == 0
    }
}
