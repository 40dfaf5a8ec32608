use std::fmt;

use serde::Serialize;

use crate::aggregate::round_to;
use crate::dataset::{Dataset, StudentRecord};

/// Minimum total score that counts as a pass.
pub const PASS_THRESHOLD: f64 = 150.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Outcome {
    Pass,
    Fail,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Outcome::Pass => write!(f, "Pass"),
            Outcome::Fail => write!(f, "Fail"),
        }
    }
}

pub fn derive_result(record: &StudentRecord) -> Outcome {
    if record.total_score >= PASS_THRESHOLD {
        Outcome::Pass
    } else {
        Outcome::Fail
    }
}

/// One outcome per row of `dataset`, in row order.
pub fn derive_results(dataset: &Dataset) -> Vec<Outcome> {
    dataset.iter().map(derive_result).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeBucket {
    pub outcome: Outcome,
    pub count: usize,
    /// Percentage of all rows, one decimal place.
    pub share: f64,
}

/// Frequency of each outcome, largest bucket first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutcomeTally {
    pub total: usize,
    pub buckets: Vec<OutcomeBucket>,
}

impl OutcomeTally {
    pub fn tabulate(dataset: &Dataset) -> Self {
        let outcomes = derive_results(dataset);
        let total = outcomes.len();
        let mut buckets: Vec<OutcomeBucket> = [Outcome::Pass, Outcome::Fail]
            .into_iter()
            .map(|outcome| {
                let count = outcomes.iter().filter(|&&o| o == outcome).count();
                OutcomeBucket {
                    outcome,
                    count,
                    share: 0.0,
                }
            })
            .filter(|bucket| bucket.count > 0)
            .collect();
        for bucket in buckets.iter_mut() {
            bucket.share = round_to(bucket.count as f64 / total as f64 * 100.0, 1);
        }
        // Stable sort, so a tie keeps Pass ahead of Fail.
        buckets.sort_by(|a, b| b.count.cmp(&a.count));
        OutcomeTally { total, buckets }
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.buckets
            .iter()
            .find(|b| b.outcome == outcome)
            .map_or(0, |b| b.count)
    }
}
