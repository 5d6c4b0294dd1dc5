//! Fractional ordering arithmetic
//!
//! Manual ordering stores one real-number key per event. Moving an event
//! writes a single key computed from its new neighbors; when the keys run out
//! of room the whole collection is rebalanced to evenly spaced values.

use crate::models::Event;

/// Step used when placing an event before the first or after the last neighbor
pub const GAP: f64 = 1000.0;

/// Spacing between consecutive keys after rebalancing
pub const STEP: f64 = 1000.0;

/// Smallest neighbor distance that still leaves room for a midpoint
pub const MIN_GAP: f64 = 1.0;

/// Key assigned when an event has no usable neighbor at all
pub const BASELINE: f64 = 0.0;

/// What a requested neighbor contributes to the new key
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Neighbor {
    /// No neighbor requested, or the record no longer exists
    Absent,
    /// The record exists but carries no key
    Unordered,
    /// The record exists with a key
    Ordered(f64),
}

impl Neighbor {
    /// Classify a looked-up neighbor record
    pub fn from_record(event: Option<&Event>) -> Self {
        match event {
            None => Neighbor::Absent,
            Some(event) => match event.priority {
                Some(priority) => Neighbor::Ordered(priority),
                None => Neighbor::Unordered,
            },
        }
    }
}

/// Calculates the fractional order for placing an event between two neighbors
pub struct FractionalOrderCalculator;

impl FractionalOrderCalculator {
    /// Calculate the key for an event placed between `before` and `after`
    ///
    /// Returns `None` when the neighbors cannot produce a key that sorts
    /// strictly between them: an unordered neighbor, no neighbor at all, or
    /// neighbor keys that collide or are out of order. Callers rebalance and
    /// retry in that case.
    ///
    /// # Examples
    /// ```
    /// use event_planner_core::db::fractional_ordering::{FractionalOrderCalculator, Neighbor};
    ///
    /// // Between two neighbors
    /// assert_eq!(
    ///     FractionalOrderCalculator::calculate_order(Neighbor::Ordered(0.0), Neighbor::Ordered(1000.0)),
    ///     Some(500.0)
    /// );
    /// // Before the first
    /// assert_eq!(
    ///     FractionalOrderCalculator::calculate_order(Neighbor::Absent, Neighbor::Ordered(0.0)),
    ///     Some(-1000.0)
    /// );
    /// // After the last
    /// assert_eq!(
    ///     FractionalOrderCalculator::calculate_order(Neighbor::Ordered(2000.0), Neighbor::Absent),
    ///     Some(3000.0)
    /// );
    /// ```
    pub fn calculate_order(before: Neighbor, after: Neighbor) -> Option<f64> {
        let key = match (before, after) {
            (Neighbor::Ordered(prev), Neighbor::Ordered(next)) if prev < next => {
                Self::midpoint(prev, next)
            }
            (Neighbor::Absent, Neighbor::Ordered(next)) => next - GAP,
            (Neighbor::Ordered(prev), Neighbor::Absent) => prev + GAP,
            _ => return None,
        };

        // At large magnitudes the arithmetic can round onto a neighbor
        Self::sorts_between(key, before, after).then_some(key)
    }

    /// True when `key` sorts strictly after `before` and strictly before `after`
    fn sorts_between(key: f64, before: Neighbor, after: Neighbor) -> bool {
        let after_prev = match before {
            Neighbor::Ordered(prev) => prev < key,
            _ => true,
        };
        let before_next = match after {
            Neighbor::Ordered(next) => key < next,
            _ => true,
        };
        key.is_finite() && after_prev && before_next
    }

    /// Same as [`calculate_order`](Self::calculate_order), used once the
    /// collection has just been rebalanced
    ///
    /// Rebalanced keys are distinct, so any two ordered neighbors yield a
    /// midpoint strictly between them even when the caller named them in the
    /// opposite order. With no usable neighbor the key falls back to
    /// [`BASELINE`].
    pub fn calculate_order_after_rebalance(before: Neighbor, after: Neighbor) -> f64 {
        match (before, after) {
            (Neighbor::Ordered(prev), Neighbor::Ordered(next)) if prev != next => {
                Self::midpoint(prev, next)
            }
            _ => Self::calculate_order(before, after).unwrap_or(BASELINE),
        }
    }

    /// Check whether two neighbor keys are too close for further midpoints
    pub fn needs_rebalancing(before: Neighbor, after: Neighbor) -> bool {
        match (before, after) {
            (Neighbor::Ordered(prev), Neighbor::Ordered(next)) => (next - prev).abs() < MIN_GAP,
            _ => false,
        }
    }

    /// Evenly spaced keys for `count` events already in display order
    ///
    /// # Example
    /// Input:  4
    /// Output: [0.0, 1000.0, 2000.0, 3000.0]
    pub fn rebalance(count: usize) -> Vec<f64> {
        (0..count).map(|i| i as f64 * STEP).collect()
    }

    fn midpoint(prev: f64, next: f64) -> f64 {
        prev + (next - prev) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_order_between() {
        assert_eq!(
            FractionalOrderCalculator::calculate_order(
                Neighbor::Ordered(0.0),
                Neighbor::Ordered(1000.0)
            ),
            Some(500.0)
        );
    }

    #[test]
    fn test_calculate_order_before_first() {
        assert_eq!(
            FractionalOrderCalculator::calculate_order(Neighbor::Absent, Neighbor::Ordered(0.0)),
            Some(-1000.0)
        );
    }

    #[test]
    fn test_calculate_order_after_last() {
        assert_eq!(
            FractionalOrderCalculator::calculate_order(Neighbor::Ordered(2000.0), Neighbor::Absent),
            Some(3000.0)
        );
    }

    #[test]
    fn test_calculate_order_unresolved() {
        let unresolved = [
            (Neighbor::Absent, Neighbor::Absent),
            (Neighbor::Unordered, Neighbor::Unordered),
            (Neighbor::Unordered, Neighbor::Ordered(5.0)),
            (Neighbor::Ordered(5.0), Neighbor::Unordered),
            (Neighbor::Ordered(5.0), Neighbor::Ordered(5.0)),
            (Neighbor::Ordered(9.0), Neighbor::Ordered(5.0)),
        ];

        for (before, after) in unresolved {
            assert_eq!(
                FractionalOrderCalculator::calculate_order(before, after),
                None,
                "expected no key for {:?} / {:?}",
                before,
                after
            );
        }
    }

    #[test]
    fn test_calculate_order_rejects_rounded_collisions() {
        // Representable keys 16 apart: the midpoint rounds onto `prev`
        let prev = 1.0e17;
        let next = prev + 16.0;
        assert!(!FractionalOrderCalculator::needs_rebalancing(
            Neighbor::Ordered(prev),
            Neighbor::Ordered(next)
        ));
        assert_eq!(
            FractionalOrderCalculator::calculate_order(
                Neighbor::Ordered(prev),
                Neighbor::Ordered(next)
            ),
            None
        );

        // Edge placement that cannot move away from the neighbor
        assert_eq!(
            FractionalOrderCalculator::calculate_order(Neighbor::Ordered(1.0e300), Neighbor::Absent),
            None
        );
        assert_eq!(
            FractionalOrderCalculator::calculate_order(
                Neighbor::Absent,
                Neighbor::Ordered(-1.0e300)
            ),
            None
        );
    }

    #[test]
    fn test_after_rebalance_accepts_reversed_neighbors() {
        let key = FractionalOrderCalculator::calculate_order_after_rebalance(
            Neighbor::Ordered(2000.0),
            Neighbor::Ordered(1000.0),
        );
        assert_eq!(key, 1500.0);
    }

    #[test]
    fn test_after_rebalance_falls_back_to_baseline() {
        assert_eq!(
            FractionalOrderCalculator::calculate_order_after_rebalance(
                Neighbor::Absent,
                Neighbor::Absent
            ),
            BASELINE
        );
    }

    #[test]
    fn test_midpoint_stays_strictly_between() {
        let prev = 0.0;
        let mut next = 1000.0;

        while !FractionalOrderCalculator::needs_rebalancing(
            Neighbor::Ordered(prev),
            Neighbor::Ordered(next),
        ) {
            let key = FractionalOrderCalculator::calculate_order(
                Neighbor::Ordered(prev),
                Neighbor::Ordered(next),
            )
            .unwrap();
            assert!(prev < key && key < next);
            next = key;
        }

        assert!(next - prev < MIN_GAP);
        assert!(next > prev);
    }

    #[test]
    fn test_needs_rebalancing() {
        assert!(!FractionalOrderCalculator::needs_rebalancing(
            Neighbor::Ordered(1.0),
            Neighbor::Ordered(2.0)
        ));
        assert!(FractionalOrderCalculator::needs_rebalancing(
            Neighbor::Ordered(1.0),
            Neighbor::Ordered(1.5)
        ));
        assert!(!FractionalOrderCalculator::needs_rebalancing(
            Neighbor::Absent,
            Neighbor::Ordered(1.0)
        ));
    }

    #[test]
    fn test_rebalance() {
        assert_eq!(
            FractionalOrderCalculator::rebalance(4),
            vec![0.0, 1000.0, 2000.0, 3000.0]
        );
        assert!(FractionalOrderCalculator::rebalance(0).is_empty());
    }
}
