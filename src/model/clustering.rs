//! Strategies mapping `(source_row_index, target_row_count) -> target_row_index`.
//!
//! Kept as a small polymorphic capability (rather than hard-wiring the
//! power-law formula into `Relationship`) so a future cardinality or
//! weighting scheme can be plugged in without touching `LinkPhase`.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The exponent of the power-law distribution used for many-side FK
/// clustering. Concentrates selections on low-index targets.
const POWER_LAW_ALPHA: f64 = 1.5;

#[derive(Debug)]
pub enum ClusteringStrategy {
    /// `index = source_index mod target_count`. Deterministic, no RNG.
    RoundRobin,
    /// Deterministic pseudo-random source seeded once per relationship so
    /// repeated runs with the same seed reproduce the same FK sequence.
    PowerLaw { rng: ChaCha8Rng },
    /// Weighted selection from a fixed per-target-row weight vector.
    /// Not wired into the default cardinality table in `Relationship`, but
    /// available for callers that want to bias clustering explicitly.
    Weighted { rng: ChaCha8Rng, weights: Vec<f64> },
}

impl ClusteringStrategy {
    pub fn power_law(seed: u64) -> Self {
        ClusteringStrategy::PowerLaw {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn weighted(seed: u64, weights: Vec<f64>) -> Self {
        ClusteringStrategy::Weighted {
            rng: ChaCha8Rng::seed_from_u64(seed),
            weights,
        }
    }

    /// Selects a target row index for `source_index` out of `target_count`
    /// candidates. `target_count` must be non-zero; callers check that via
    /// `LinkError::EmptyTarget` before reaching here.
    pub fn select_target_index(&mut self, source_index: usize, target_count: usize) -> usize {
        debug_assert!(target_count > 0, "target_count must be non-zero");
        match self {
            ClusteringStrategy::RoundRobin => source_index % target_count,
            ClusteringStrategy::PowerLaw { rng } => power_law_index(rng, target_count),
            ClusteringStrategy::Weighted { rng, weights } => weighted_index(rng, weights, target_count),
        }
    }
}

/// Draws `u ∈ (0,1)` and computes `x = (1−u)^(−1/(α−1)) − 1`, clamping the
/// scaled result into `[0, target_count−1]`.
fn power_law_index(rng: &mut ChaCha8Rng, target_count: usize) -> usize {
    // avoid u == 1.0, which would make (1-u) == 0 and blow up the power.
    let u: f64 = rng.gen_range(0.0..1.0_f64);
    let x = (1.0 - u).powf(-1.0 / (POWER_LAW_ALPHA - 1.0)) - 1.0;
    let scaled = (x * (target_count - 1) as f64).floor();
    scaled.clamp(0.0, (target_count - 1) as f64) as usize
}

/// Cumulative-distribution weighted pick. Falls back to uniform when
/// weights don't line up with `target_count` or all sum to zero.
fn weighted_index(rng: &mut ChaCha8Rng, weights: &[f64], target_count: usize) -> usize {
    if weights.len() != target_count {
        return rng.gen_range(0..target_count);
    }
    let clamped: Vec<f64> = weights.iter().map(|w| w.max(0.0)).collect();
    let total: f64 = clamped.iter().sum();
    if total <= 0.0 {
        return rng.gen_range(0..target_count);
    }
    let roll: f64 = rng.gen_range(0.0..1.0_f64) * total;
    let mut cumulative = 0.0;
    for (i, w) in clamped.iter().enumerate() {
        cumulative += w;
        if roll < cumulative {
            return i;
        }
    }
    target_count - 1
}
