//! Classification and scoring of a sampled batch.
//!
//! Each sample is reduced to a bucket in `[0, 10000)` and compared against
//! the threshold from both ends of the bucket space. The two counts are
//! independent: with a threshold of 5000 or more a bucket can land in both,
//! and it is counted twice. The score halves the sum to compensate.

/// Size of the bucket space samples are reduced into.
pub const BUCKET_SPACE: u32 = 10_000;

/// Reduces a raw sample to its bucket.
#[inline]
pub fn bucket(sample: u16) -> u32 {
    u32::from(sample) % BUCKET_SPACE
}

/// A success percentage scaled into bucket space.
///
/// Not clamped: a percentage outside `[0, 100]` simply makes the predicates
/// always or never true.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Threshold(f64);

impl Threshold {
    /// Scales a percentage (`30.0` = 30%) to bucket space.
    pub fn from_percentage(percentage: f64) -> Self {
        Self(percentage * 100.0)
    }

    /// Returns the threshold in bucket units.
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Which end of the outcome distribution a scan is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Objective {
    /// Count buckets at or inside the threshold from either end.
    #[default]
    Success,

    /// Inverted predicates: count buckets strictly outside the threshold.
    Failure,
}

impl Objective {
    /// Returns the objective name.
    pub fn name(&self) -> &'static str {
        match self {
            Objective::Success => "success",
            Objective::Failure => "failure",
        }
    }

    /// Low-end predicate.
    #[inline]
    fn positive(&self, bucket: f64, threshold: f64) -> bool {
        match self {
            Objective::Success => bucket <= threshold,
            Objective::Failure => bucket > threshold,
        }
    }

    /// High-end predicate.
    #[inline]
    fn negative(&self, bucket: f64, threshold: f64) -> bool {
        let mirrored = f64::from(BUCKET_SPACE) - threshold;
        match self {
            Objective::Success => bucket >= mirrored,
            Objective::Failure => bucket < mirrored,
        }
    }
}

impl std::fmt::Display for Objective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Predicate hit counts for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub positive: u64,
    pub negative: u64,
}

impl Tally {
    /// Average of the two counts; ranges over `[0, batch_len]`.
    pub fn score(&self) -> f64 {
        (self.positive + self.negative) as f64 / 2.0
    }
}

/// Classifies a batch against the threshold.
pub fn tally(samples: &[u16], threshold: Threshold, objective: Objective) -> Tally {
    let t = threshold.value();
    samples.iter().fold(Tally::default(), |mut acc, &sample| {
        let b = f64::from(bucket(sample));
        if objective.positive(b, t) {
            acc.positive += 1;
        }
        if objective.negative(b, t) {
            acc.negative += 1;
        }
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bucket_wraps_at_ten_thousand() {
        assert_eq!(bucket(0), 0);
        assert_eq!(bucket(9_999), 9_999);
        assert_eq!(bucket(10_000), 0);
        assert_eq!(bucket(32_767), 2_767);
    }

    #[test]
    fn test_threshold_scaling() {
        assert_relative_eq!(Threshold::from_percentage(30.0).value(), 3_000.0);
        assert_relative_eq!(Threshold::from_percentage(0.25).value(), 25.0);
    }

    #[test]
    fn test_success_boundaries_are_inclusive() {
        let t = Threshold::from_percentage(30.0);
        // 3000 is on the low edge, 7000 on the high edge
        let hits = tally(&[3_000, 7_000], t, Objective::Success);
        assert_eq!(hits, Tally { positive: 1, negative: 1 });

        let misses = tally(&[3_001, 6_999], t, Objective::Success);
        assert_eq!(misses, Tally::default());
    }

    #[test]
    fn test_high_threshold_double_counts() {
        let t = Threshold::from_percentage(60.0);
        // bucket 5000 satisfies both <= 6000 and >= 4000
        let tally = tally(&[5_000], t, Objective::Success);
        assert_eq!(tally, Tally { positive: 1, negative: 1 });
        assert_relative_eq!(tally.score(), 1.0);
    }

    #[test]
    fn test_failure_inverts_both_predicates() {
        let t = Threshold::from_percentage(30.0);
        let samples = [0, 2_999, 3_000, 3_001, 6_999, 7_000, 9_999];
        let success = tally(&samples, t, Objective::Success);
        let failure = tally(&samples, t, Objective::Failure);

        assert_eq!(success.positive + failure.positive, samples.len() as u64);
        assert_eq!(success.negative + failure.negative, samples.len() as u64);
    }

    #[test]
    fn test_full_threshold_counts_everything_twice() {
        let samples: Vec<u16> = (0..=32_767).step_by(97).collect();
        let tally = tally(&samples, Threshold::from_percentage(100.0), Objective::Success);
        assert_eq!(tally.positive, samples.len() as u64);
        assert_eq!(tally.negative, samples.len() as u64);
        assert_relative_eq!(tally.score(), samples.len() as f64);
    }

    #[test]
    fn test_zero_threshold_only_hits_bucket_zero() {
        let t = Threshold::from_percentage(0.0);
        assert_eq!(tally(&[1, 9_999, 12_345], t, Objective::Success), Tally::default());
        assert_eq!(
            tally(&[0, 10_000, 20_000], t, Objective::Success),
            Tally { positive: 3, negative: 0 }
        );
    }

    #[test]
    fn test_out_of_range_threshold_saturates() {
        let samples = [0, 5_000, 9_999];
        let above = tally(&samples, Threshold::from_percentage(250.0), Objective::Success);
        assert_eq!(above, Tally { positive: 3, negative: 3 });

        let below = tally(&samples, Threshold::from_percentage(-5.0), Objective::Success);
        assert_eq!(below, Tally::default());
    }
}
