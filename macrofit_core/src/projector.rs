//! Time-to-target-weight projection.
//!
//! Derives a weeks-until-goal estimate from a single logged entry's
//! calorie balance and weight delta. Depends on nothing but the input
//! values; a zero calorie balance yields a soft sentinel, never an error.

use crate::ProgressEntry;
use std::fmt;

/// Energy content of one kilogram of body fat, a fixed domain constant
pub const KCAL_PER_KG: f64 = 7700.0;

/// Outcome of a time-to-goal projection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GoalEstimate {
    /// Approximate whole weeks until the target weight is reached
    Weeks(u32),
    /// caloriesOut == caloriesIn exactly; no basis for an estimate
    NoDeficit,
}

impl fmt::Display for GoalEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalEstimate::Weeks(weeks) => {
                write!(f, "{} week(s) approx to reach your target weight", weeks)
            }
            GoalEstimate::NoDeficit => {
                write!(f, "Cannot estimate time with zero calorie deficit")
            }
        }
    }
}

/// Estimate weeks until the target weight from one progress entry
///
/// days = |weightDiff × 7700 / dailyDeficit|, weeks = ceil(days / 7).
/// The sign of the weight delta is deliberately not checked against the
/// sign of the deficit; a surplus paired with a loss target still gets an
/// estimate.
pub fn estimate_time_to_goal(entry: &ProgressEntry) -> GoalEstimate {
    let daily_deficit = entry.calories_out - entry.calories_in;
    if daily_deficit == 0.0 {
        return GoalEstimate::NoDeficit;
    }

    let weight_diff_kg = entry.target_weight_kg - entry.weight_kg;
    let days_needed = (weight_diff_kg * KCAL_PER_KG / daily_deficit).abs();
    GoalEstimate::Weeks((days_needed / 7.0).ceil() as u32)
}
