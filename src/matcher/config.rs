//! Search configuration and defaults.

use crate::error::{Error, Result};

/// Absolute tolerance used when comparing accumulated costs.
///
/// Weighted costs such as `0.1` are not exact in binary floating point, so an
/// alignment costing `0.1 + 0.1 + 0.1` must still be admitted by a threshold
/// of `0.3`. Costs within this distance are also treated as ties when ranking.
pub const COST_EPSILON: f64 = 1e-9;

/// Check if `cost` is admitted by `threshold`.
#[inline]
pub(crate) fn within(cost: f64, threshold: f64) -> bool {
    cost <= threshold + COST_EPSILON
}

/// Integer ranking key for a cost, quantized to [`COST_EPSILON`].
#[inline]
pub(crate) fn cost_key(cost: f64) -> i64 {
    // Saturating cast: infinite costs map to i64::MAX
    (cost / COST_EPSILON).round() as i64
}

/// Reject thresholds that would make pruning meaningless.
pub(crate) fn validate_threshold(threshold: f64) -> Result<f64> {
    if threshold.is_finite() && threshold >= 0.0 {
        Ok(threshold)
    } else {
        Err(Error::InvalidThreshold(threshold))
    }
}

/// How the threshold is chosen when a search does not specify one.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum ThresholdPolicy {
    /// The same threshold for every query.
    Fixed(f64),

    /// `max(floor, ratio * query_len)`, measured on the normalized query.
    Proportional {
        /// Cost allowed per query token
        ratio: f64,
        /// Lower bound for short queries
        floor: f64,
    },
}

impl ThresholdPolicy {
    /// Threshold for a normalized query of `query_len` tokens.
    pub fn resolve(&self, query_len: usize) -> f64 {
        match *self {
            ThresholdPolicy::Fixed(threshold) => threshold,
            ThresholdPolicy::Proportional { ratio, floor } => floor.max(ratio * query_len as f64),
        }
    }

    /// Check that the policy can only produce valid thresholds.
    pub fn validate(&self) -> Result<()> {
        let valid = |value: f64| value.is_finite() && value >= 0.0;
        match *self {
            ThresholdPolicy::Fixed(threshold) if !valid(threshold) => Err(Error::InvalidConfig(
                format!("fixed threshold must be finite and non-negative, got {}", threshold),
            )),
            ThresholdPolicy::Proportional { ratio, floor } if !valid(ratio) || !valid(floor) => {
                Err(Error::InvalidConfig(format!(
                    "proportional threshold needs finite non-negative ratio and floor, got ratio={} floor={}",
                    ratio, floor
                )))
            }
            _ => Ok(()),
        }
    }
}

impl Default for ThresholdPolicy {
    /// A quarter edit per query token, but at least one edit.
    fn default() -> Self {
        ThresholdPolicy::Proportional {
            ratio: 0.25,
            floor: 1.0,
        }
    }
}

/// Defaults applied by [`Matcher::search_default`](super::Matcher::search_default)
/// and as the starting point of every [`QueryBuilder`](super::QueryBuilder).
///
/// `alignments_per_term` also applies to [`Matcher::search`](super::Matcher::search).
/// The number of distinct alignments of one term within a threshold grows
/// combinatorially with the threshold and the term length, so by default
/// only the best [`DEFAULT_ALIGNMENTS_PER_TERM`](Self::DEFAULT_ALIGNMENTS_PER_TERM)
/// of each term are reported. Set it to `None` to get all of them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SearchConfig {
    /// Threshold used when none is given
    pub threshold: ThresholdPolicy,
    /// Result cap used when none is given (0 = unbounded)
    pub max_results: usize,
    /// Alignments reported per stored term (`None` = all within threshold)
    pub alignments_per_term: Option<usize>,
    /// Maximum number of trie nodes a search may visit (`None` = unlimited)
    pub step_budget: Option<usize>,
}

impl SearchConfig {
    /// Default result cap.
    pub const DEFAULT_MAX_RESULTS: usize = 10;

    /// Default number of alignments reported per term.
    pub const DEFAULT_ALIGNMENTS_PER_TERM: usize = 4;

    /// Validate every field.
    pub fn validate(&self) -> Result<()> {
        self.threshold.validate()?;
        if self.alignments_per_term == Some(0) {
            return Err(Error::InvalidConfig(
                "alignments_per_term must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: ThresholdPolicy::default(),
            max_results: Self::DEFAULT_MAX_RESULTS,
            alignments_per_term: Some(Self::DEFAULT_ALIGNMENTS_PER_TERM),
            step_budget: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold_policy() {
        let policy = ThresholdPolicy::default();
        assert_eq!(policy.resolve(0), 1.0);
        assert_eq!(policy.resolve(5), 1.25);
        assert_eq!(policy.resolve(14), 3.5);
        assert_eq!(ThresholdPolicy::Fixed(2.0).resolve(100), 2.0);
    }

    #[test]
    fn test_within_tolerates_rounding() {
        assert!(within(0.1 + 0.1 + 0.1, 0.3));
        assert!(!within(0.31, 0.3));
        assert_eq!(cost_key(0.1 + 0.2), cost_key(0.3));
        assert!(cost_key(1.3) < cost_key(2.3));
        assert_eq!(cost_key(f64::INFINITY), i64::MAX);
    }

    #[test]
    fn test_threshold_validation() {
        assert!(validate_threshold(0.0).is_ok());
        assert_eq!(validate_threshold(-1.0), Err(Error::InvalidThreshold(-1.0)));
        assert!(validate_threshold(f64::NAN).is_err());
        assert!(validate_threshold(f64::INFINITY).is_err());
    }

    #[test]
    fn test_default_alignments_are_bounded() {
        let config = SearchConfig::default();
        assert_eq!(
            config.alignments_per_term,
            Some(SearchConfig::DEFAULT_ALIGNMENTS_PER_TERM)
        );
        assert_eq!(config.max_results, SearchConfig::DEFAULT_MAX_RESULTS);
    }

    #[test]
    fn test_config_validation() {
        assert!(SearchConfig::default().validate().is_ok());

        let negative = SearchConfig {
            threshold: ThresholdPolicy::Fixed(-0.5),
            ..SearchConfig::default()
        };
        assert!(matches!(negative.validate(), Err(Error::InvalidConfig(_))));

        let zero_alignments = SearchConfig {
            alignments_per_term: Some(0),
            ..SearchConfig::default()
        };
        assert!(zero_alignments.validate().is_err());
    }
}
