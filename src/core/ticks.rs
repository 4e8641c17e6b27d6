use std::f64::consts::LOG10_2;

use smallvec::SmallVec;

/// Default upper bound on the number of ticks an axis shows.
pub const DEFAULT_MAX_TICKS: usize = 5;

const NICE_MULTIPLIERS: [f64; 4] = [1.0, 2.0, 5.0, 10.0];
const STEP_EPSILON: f64 = 1e-9;
// Tick indices stay where `i64 -> f64` is exact.
const MAX_TICK_INDEX: f64 = 9_007_199_254_740_992.0;

/// Tick set storage sized for typical axes without heap allocation.
pub type TickSet = SmallVec<[f64; 16]>;

#[derive(Debug, Clone, Copy, PartialEq)]
enum TickPlan {
    Empty,
    Single(f64),
    Stepped {
        first: i64,
        last: i64,
        interval: f64,
        decimals: i32,
        low: f64,
        high: f64,
    },
}

/// Nice-interval tick generator for one `(minimum, maximum)` pair.
///
/// The interval is chosen from `{1, 2, 5, 10} x 10^e`, taking the candidate
/// whose tick count is the largest one not exceeding `max_ticks`. Ticks are
/// the multiples of the interval inside the closed range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickCalculator {
    minimum: f64,
    maximum: f64,
    plan: TickPlan,
}

impl TickCalculator {
    #[must_use]
    pub fn new(minimum: f64, maximum: f64, max_ticks: usize) -> Self {
        Self {
            minimum,
            maximum,
            plan: plan_ticks(minimum, maximum, max_ticks.max(1)),
        }
    }

    #[must_use]
    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    #[must_use]
    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    #[must_use]
    pub fn range(&self) -> f64 {
        self.maximum - self.minimum
    }

    /// Chosen tick interval, or NaN when there is no stepped tick set.
    #[must_use]
    pub fn interval(&self) -> f64 {
        match self.plan {
            TickPlan::Stepped { interval, .. } => interval,
            TickPlan::Empty | TickPlan::Single(_) => f64::NAN,
        }
    }

    /// Returns a fresh iterator over the ticks; may be called repeatedly.
    #[must_use]
    pub fn ticks(&self) -> Ticks {
        let cursor = match self.plan {
            TickPlan::Stepped { first, .. } => first,
            TickPlan::Empty | TickPlan::Single(_) => 0,
        };
        Ticks {
            plan: self.plan,
            cursor,
        }
    }

    #[must_use]
    pub fn collect_ticks(&self) -> TickSet {
        self.ticks().collect()
    }
}

/// Finite iterator over the ticks of a [`TickCalculator`].
#[derive(Debug, Clone)]
pub struct Ticks {
    plan: TickPlan,
    cursor: i64,
}

impl Iterator for Ticks {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        match self.plan {
            TickPlan::Empty => None,
            TickPlan::Single(value) => {
                self.plan = TickPlan::Empty;
                Some(value)
            }
            TickPlan::Stepped {
                last,
                interval,
                decimals,
                low,
                high,
                ..
            } => {
                if self.cursor > last {
                    return None;
                }
                let value = round_to_decimals(self.cursor as f64 * interval, decimals);
                self.cursor += 1;
                Some(value.clamp(low, high))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.plan {
            TickPlan::Empty => 0,
            TickPlan::Single(_) => 1,
            TickPlan::Stepped { last, .. } => last
                .checked_sub(self.cursor)
                .and_then(|span| span.checked_add(1))
                .and_then(|count| usize::try_from(count).ok())
                .unwrap_or(0),
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Ticks {}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    count: usize,
    first: i64,
    last: i64,
    interval: f64,
    decimals: i32,
}

fn plan_ticks(minimum: f64, maximum: f64, max_ticks: usize) -> TickPlan {
    if !minimum.is_finite() || !maximum.is_finite() {
        return TickPlan::Empty;
    }
    let (low, high) = if minimum <= maximum {
        (minimum, maximum)
    } else {
        (maximum, minimum)
    };
    if low == high {
        return TickPlan::Single(low);
    }

    let Some(exponent) = span_exponent(low, high) else {
        return TickPlan::Single(low);
    };
    let mut best: Option<Candidate> = None;
    let mut fewest: Option<Candidate> = None;
    for candidate_exponent in [exponent.saturating_sub(1), exponent] {
        let mut magnitude = 10_f64.powi(candidate_exponent);
        if magnitude == 0.0 || !magnitude.is_finite() {
            magnitude = 10_f64.powf(f64::from(candidate_exponent));
        }
        for multiplier in NICE_MULTIPLIERS {
            let interval = magnitude * multiplier;
            if !interval.is_finite() || interval <= 0.0 {
                continue;
            }
            let Some((first, last)) = index_bounds(low, high, interval) else {
                continue;
            };
            let Some(count) = last
                .checked_sub(first)
                .and_then(|span| span.checked_add(1))
                .and_then(|count| usize::try_from(count).ok())
            else {
                continue;
            };
            let decimals = if multiplier >= 10.0 {
                candidate_exponent.saturating_add(1).saturating_neg()
            } else {
                candidate_exponent.saturating_neg()
            };
            let candidate = Candidate {
                count,
                first,
                last,
                interval,
                decimals,
            };
            if count <= max_ticks {
                if best.is_none_or(|current| count > current.count) {
                    best = Some(candidate);
                }
            } else if fewest.is_none_or(|current| count < current.count) {
                fewest = Some(candidate);
            }
        }
    }

    match best.or(fewest) {
        Some(candidate) => TickPlan::Stepped {
            first: candidate.first,
            last: candidate.last,
            interval: candidate.interval,
            decimals: candidate.decimals.max(0),
            low,
            high,
        },
        None => TickPlan::Single(low),
    }
}

/// Decimal exponent of `high - low`, also when the difference overflows.
fn span_exponent(low: f64, high: f64) -> Option<i32> {
    let span = high - low;
    let log = if span.is_finite() {
        span.log10()
    } else {
        (high * 0.5 - low * 0.5).log10() + LOG10_2
    };
    if !log.is_finite() {
        return None;
    }
    Some(log.floor() as i32)
}

/// Inclusive range of interval multiples inside `[low, high]`.
fn index_bounds(low: f64, high: f64, interval: f64) -> Option<(i64, i64)> {
    let first = (low / interval - STEP_EPSILON).ceil();
    let last = (high / interval + STEP_EPSILON).floor();
    if !first.is_finite() || !last.is_finite() {
        return None;
    }
    if first.abs() > MAX_TICK_INDEX || last.abs() > MAX_TICK_INDEX || last < first {
        return None;
    }
    Some((first as i64, last as i64))
}

fn round_to_decimals(value: f64, decimals: i32) -> f64 {
    if decimals <= 0 {
        return value;
    }
    let scale = 10_f64.powi(decimals);
    let scaled = value * scale;
    if !scale.is_finite() || !scaled.is_finite() {
        return value;
    }
    scaled.round() / scale
}

#[cfg(test)]
mod tests {
    use super::TickCalculator;

    #[test]
    fn chooses_interval_two_for_mixed_sign_range() {
        let calculator = TickCalculator::new(-5.25, 4.0, 5);
        assert_eq!(calculator.interval(), 2.0);
        assert_eq!(
            calculator.ticks().collect::<Vec<_>>(),
            vec![-4.0, -2.0, 0.0, 2.0, 4.0]
        );
    }

    #[test]
    fn fractional_ticks_are_rounded_to_interval_precision() {
        let calculator = TickCalculator::new(0.0, 1.0, 6);
        let ticks = calculator.ticks().collect::<Vec<_>>();
        assert_eq!(ticks, vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    }

    #[test]
    fn iterator_reports_exact_size() {
        let calculator = TickCalculator::new(0.0, 100.0, 5);
        let ticks = calculator.ticks();
        assert_eq!(ticks.len(), 3);
    }
}
