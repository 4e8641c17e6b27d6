use chartloom::core::{Axis, TickCalculator};
use proptest::prelude::*;

proptest! {
    #[test]
    fn limits_equal_extremes_of_finite_updates(
        values in proptest::collection::vec(prop_oneof![
            4 => -1_000_000.0f64..1_000_000.0,
            1 => Just(f64::NAN),
        ], 1..64)
    ) {
        let mut axis = Axis::value("values");
        for value in &values {
            axis.update_limits(*value);
        }

        let finite: Vec<f64> = values.iter().copied().filter(|value| !value.is_nan()).collect();
        if finite.is_empty() {
            prop_assert!(!axis.has_limits());
        } else {
            let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
            let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert_eq!(axis.minimum(), min);
            prop_assert_eq!(axis.maximum(), max);
        }
    }

    #[test]
    fn repeated_updates_are_idempotent(
        values in proptest::collection::vec(-1_000.0f64..1_000.0, 1..32)
    ) {
        let mut once = Axis::category("categories");
        let mut twice = Axis::category("categories");
        for value in &values {
            once.update_limits(*value);
            twice.update_limits(*value);
            twice.update_limits(*value);
        }
        prop_assert_eq!(once.minimum(), twice.minimum());
        prop_assert_eq!(once.maximum(), twice.maximum());
        prop_assert_eq!(once.range(), twice.range());
    }

    #[test]
    fn ticks_are_ordered_bounded_and_within_budget(
        minimum in -1_000_000.0f64..1_000_000.0,
        span in 0.001f64..1_000_000.0,
        max_ticks in 2usize..=10
    ) {
        let maximum = minimum + span;
        prop_assume!(maximum > minimum);
        let ticks = TickCalculator::new(minimum, maximum, max_ticks).collect_ticks();
        let tolerance = 1e-9 * (minimum.abs().max(maximum.abs()) + 1.0);

        prop_assert!(!ticks.is_empty());
        prop_assert!(ticks.len() <= max_ticks);
        prop_assert!(ticks.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert!(ticks.iter().all(|tick| *tick >= minimum - tolerance && *tick <= maximum + tolerance));
    }

    #[test]
    fn ticks_stay_bounded_across_the_f64_range(
        minimum_mantissa in -10.0f64..10.0,
        minimum_exponent in -300i32..300,
        span_mantissa in 1.0f64..10.0,
        span_exponent in -300i32..300,
        max_ticks in 2usize..=10
    ) {
        let minimum = minimum_mantissa * 10f64.powi(minimum_exponent);
        let maximum = minimum + span_mantissa * 10f64.powi(span_exponent);
        prop_assume!(maximum.is_finite() && maximum > minimum);

        let ticks = TickCalculator::new(minimum, maximum, max_ticks).collect_ticks();
        prop_assert!(!ticks.is_empty());
        prop_assert!(ticks.len() <= max_ticks);
        prop_assert!(ticks.windows(2).all(|pair| pair[0] <= pair[1]));
        prop_assert!(ticks.iter().all(|tick| *tick >= minimum && *tick <= maximum));
    }
}
