use tracing::debug;

use crate::config::{HEADROOM, TARGET_TICK_COUNT};
use crate::ir::Scale;

/// Build the value axis for a set of values.
///
/// The ceiling is the largest value (at least 1) plus 15% headroom, rounded up.
/// Ticks step from 0 by `max(1, ceil(nice_max / 8))` and never pass the ceiling.
pub fn compute_scale(values: &[f64]) -> Scale {
    let raw_max = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(1.0, f64::max);

    let nice_max = (raw_max * HEADROOM).ceil();
    let tick_step = (nice_max / TARGET_TICK_COUNT).ceil().max(1.0);

    let ticks: Vec<f64> = (0u32..)
        .map(|i| f64::from(i) * tick_step)
        .take_while(|t| *t <= nice_max)
        .collect();

    debug!(raw_max, nice_max, tick_step, ticks = ticks.len(), "computed scale");

    Scale {
        raw_max,
        nice_max,
        tick_step,
        ticks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_reference_values() {
        let scale = compute_scale(&[23.0, 45.0, 12.0]);
        assert_eq!(scale.raw_max, 45.0);
        assert_eq!(scale.nice_max, 52.0);
        assert_eq!(scale.tick_step, 7.0);
        assert_eq!(scale.ticks, vec![0.0, 7.0, 14.0, 21.0, 28.0, 35.0, 42.0, 49.0]);
    }

    #[test]
    fn test_scale_empty_input() {
        let scale = compute_scale(&[]);
        assert_eq!(scale.raw_max, 1.0);
        assert_eq!(scale.nice_max, 2.0);
        assert_eq!(scale.tick_step, 1.0);
        assert_eq!(scale.ticks, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_scale_all_zero() {
        let scale = compute_scale(&[0.0, 0.0]);
        assert_eq!(scale.raw_max, 1.0);
        assert!(scale.nice_max > 0.0);
    }

    #[test]
    fn test_scale_small_fractions_floor_at_one() {
        let scale = compute_scale(&[0.2, 0.4]);
        assert_eq!(scale.raw_max, 1.0);
        assert_eq!(scale.nice_max, 2.0);
    }

    #[test]
    fn test_scale_ignores_negative_and_non_finite() {
        let scale = compute_scale(&[-50.0, f64::NAN, 10.0]);
        assert_eq!(scale.raw_max, 10.0);
        assert_eq!(scale.nice_max, 12.0);
        assert_eq!(scale.tick_step, 2.0);
    }

    #[test]
    fn test_scale_last_tick_not_past_ceiling() {
        let scale = compute_scale(&[77.0]);
        // 77 * 1.15 = 88.55 -> 89, step ceil(89 / 8) = 12
        assert_eq!(scale.nice_max, 89.0);
        assert_eq!(scale.tick_step, 12.0);
        assert_eq!(*scale.ticks.last().unwrap(), 84.0);
        assert_eq!(scale.ticks.len(), 8);
    }

    #[test]
    fn test_scale_large_values() {
        let scale = compute_scale(&[1_000_000.0]);
        assert_eq!(scale.nice_max, 1_150_000.0);
        assert_eq!(scale.tick_step, 143_750.0);
        assert_eq!(scale.ticks.len(), 9);
    }
}
