//! Built-in alignment engine: exact k-mer seeding with diagonal voting.
//!
//! The index maps every 2-bit-packed k-mer of the reference to its start
//! positions. A query votes with each of its k-mers on the diagonal
//! `reference_pos - query_pos`; the diagonal collecting the most seed votes
//! defines the reported alignment span, and the vote fraction scales the
//! mapping quality into `0..=60`. K-mers containing non-ACGT bases are
//! skipped on both sides.
//!
//! This is deliberately simple and fully deterministic: ties on vote count
//! are broken toward the smallest diagonal, which keeps classification
//! results reproducible across runs.

use std::collections::{BTreeMap, HashMap};

use crate::align::{AlignmentBackend, BestHit, IndexBuildError, QueryIndex, MAX_MAPPING_QUALITY};
use crate::core::Reference;

/// Default seed length
pub const DEFAULT_KMER_SIZE: usize = 15;

/// Default minimum fraction of a query's seeds that must agree on one
/// diagonal for a hit to be reported
pub const DEFAULT_MIN_SEED_FRACTION: f64 = 0.25;

/// K-mer seeding aligner; acts as the index factory
#[derive(Debug, Clone)]
pub struct KmerAligner {
    k: usize,
    min_seed_fraction: f64,
}

impl Default for KmerAligner {
    fn default() -> Self {
        Self {
            k: DEFAULT_KMER_SIZE,
            min_seed_fraction: DEFAULT_MIN_SEED_FRACTION,
        }
    }
}

impl KmerAligner {
    #[must_use]
    pub fn new(k: usize, min_seed_fraction: f64) -> Self {
        Self {
            k,
            min_seed_fraction,
        }
    }

    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }
}

impl AlignmentBackend for KmerAligner {
    fn build_index(&self, reference: &Reference) -> Result<Box<dyn QueryIndex>, IndexBuildError> {
        if reference.is_empty() {
            return Err(IndexBuildError::EmptySequence(reference.id.clone()));
        }

        let mut seeds: HashMap<u64, Vec<u32>> = HashMap::new();
        for (pos, window) in reference.sequence.windows(self.k).enumerate() {
            if let Some(packed) = pack_kmer(window) {
                seeds.entry(packed).or_default().push(pos as u32);
            }
        }

        if seeds.is_empty() {
            return Err(IndexBuildError::NoValidSeeds {
                id: reference.id.clone(),
                length: reference.len(),
                k: self.k,
            });
        }

        Ok(Box::new(KmerIndex {
            k: self.k,
            min_seed_fraction: self.min_seed_fraction,
            seeds,
        }))
    }
}

/// Packed k-mer index over one reference sequence
struct KmerIndex {
    k: usize,
    min_seed_fraction: f64,
    seeds: HashMap<u64, Vec<u32>>,
}

/// Per-diagonal vote tally during a query
#[derive(Debug, Clone, Copy)]
struct DiagonalTally {
    votes: u32,
    min_ref_pos: u64,
    max_ref_pos: u64,
}

impl QueryIndex for KmerIndex {
    fn best_hit(&self, query: &[u8]) -> Option<BestHit> {
        if query.len() < self.k {
            return None;
        }

        // BTreeMap keeps diagonals ordered so the vote-count tie-break
        // (smallest diagonal wins) is deterministic.
        let mut diagonals: BTreeMap<i64, DiagonalTally> = BTreeMap::new();
        let mut valid_seeds: u32 = 0;

        for (query_pos, window) in query.windows(self.k).enumerate() {
            let Some(packed) = pack_kmer(window) else {
                continue;
            };
            valid_seeds += 1;
            let Some(positions) = self.seeds.get(&packed) else {
                continue;
            };
            for &ref_pos in positions {
                let diagonal = i64::from(ref_pos) - query_pos as i64;
                let tally = diagonals.entry(diagonal).or_insert(DiagonalTally {
                    votes: 0,
                    min_ref_pos: u64::from(ref_pos),
                    max_ref_pos: u64::from(ref_pos),
                });
                tally.votes += 1;
                tally.min_ref_pos = tally.min_ref_pos.min(u64::from(ref_pos));
                tally.max_ref_pos = tally.max_ref_pos.max(u64::from(ref_pos));
            }
        }

        if valid_seeds == 0 {
            return None;
        }

        // Strictly-greater comparison keeps the first (smallest) diagonal on ties
        let mut best: Option<DiagonalTally> = None;
        for tally in diagonals.values() {
            if best.map_or(true, |b| tally.votes > b.votes) {
                best = Some(*tally);
            }
        }
        let best = best?;

        let min_votes = (self.min_seed_fraction * f64::from(valid_seeds)).ceil().max(1.0);
        if f64::from(best.votes) < min_votes {
            return None;
        }

        let quality = scale_quality(best.votes, valid_seeds);
        Some(BestHit {
            quality,
            start: best.min_ref_pos,
            end: best.max_ref_pos + self.k as u64,
        })
    }
}

/// Scale the seed agreement fraction into a `0..=60` mapping quality
fn scale_quality(votes: u32, valid_seeds: u32) -> u8 {
    let fraction = f64::from(votes) / f64::from(valid_seeds);
    let scaled = (fraction * f64::from(MAX_MAPPING_QUALITY)).round();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        (scaled as u8).min(MAX_MAPPING_QUALITY)
    }
}

/// Pack a k-mer into 2 bits per base; `None` if it contains a non-ACGT base
/// or is too long to pack into 64 bits
fn pack_kmer(kmer: &[u8]) -> Option<u64> {
    if kmer.len() > 32 {
        return None;
    }
    let mut packed: u64 = 0;
    for &base in kmer {
        let code = match base {
            b'A' | b'a' => 0u64,
            b'C' | b'c' => 1,
            b'G' | b'g' => 2,
            b'T' | b't' => 3,
            _ => return None,
        };
        packed = (packed << 2) | code;
    }
    Some(packed)
}
