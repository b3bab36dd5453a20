//! Occurrence counting per bucket.
//!
//! A `Tally` is built fresh for every analysis call and dropped afterwards.
//! It is backed by a `BTreeMap`, so iteration (and therefore the order of a
//! peak set) follows the key's natural order rather than the order in which
//! buckets were first seen.

use std::collections::BTreeMap;

use crate::model::{AnalysisError, PeakResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally<K: Ord> {
    counts: BTreeMap<K, usize>,
}

impl<K: Ord + Clone> Tally<K> {
    pub fn count(&self, key: &K) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The highest count in the tally, or `None` if nothing was counted.
    pub fn max_count(&self) -> Option<usize> {
        self.counts.values().copied().max()
    }

    /// All keys whose count equals the maximum, ascending.
    pub fn peak(&self) -> Result<PeakResult<K>, AnalysisError> {
        let count = self.max_count().ok_or(AnalysisError::EmptyInput)?;
        let keys = self
            .counts
            .iter()
            .filter(|&(_, &c)| c == count)
            .map(|(k, _)| k.clone())
            .collect();
        Ok(PeakResult { keys, count })
    }
}

impl<K: Ord> FromIterator<K> for Tally<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut counts = BTreeMap::new();
        for key in iter {
            *counts.entry(key).or_insert(0) += 1;
        }
        Tally { counts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_each_distinct_key() {
        let tally: Tally<u32> = [9, 9, 14, 9, 20].into_iter().collect();
        assert_eq!(tally.count(&9), 3);
        assert_eq!(tally.count(&14), 1);
        assert_eq!(tally.count(&20), 1);
        assert_eq!(tally.count(&3), 0, "unseen keys count as zero");
    }

    #[test]
    fn test_peak_of_empty_tally_is_validation_error() {
        let tally: Tally<u32> = std::iter::empty().collect();
        assert!(tally.is_empty());
        assert_eq!(tally.max_count(), None);
        assert_eq!(tally.peak(), Err(AnalysisError::EmptyInput));
    }

    #[test]
    fn test_peak_keeps_every_tied_key() {
        // 9 and 14 tie at two; 20 has one and must be excluded.
        let tally: Tally<u32> = [14, 9, 20, 9, 14].into_iter().collect();
        let peak = tally.peak().expect("non-empty tally has a peak");
        assert_eq!(peak.keys, vec![9, 14]);
        assert_eq!(peak.count, 2);
    }

    #[test]
    fn test_peak_order_ignores_first_seen_order() {
        let forwards: Tally<u32> = [3, 1, 2].into_iter().collect();
        let backwards: Tally<u32> = [2, 1, 3].into_iter().collect();
        assert_eq!(forwards.peak().unwrap().keys, vec![1, 2, 3]);
        assert_eq!(forwards.peak(), backwards.peak());
    }
}
