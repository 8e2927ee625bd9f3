//! Nutrition formula engine.
//!
//! Pure arithmetic pipeline: BMR (Mifflin-St Jeor) → TDEE → goal-adjusted
//! calorie target → body-type macro split → weekly meal plan. No I/O and
//! no randomness; every stage is deterministic given its inputs.

use crate::{
    BodyType, Error, Gender, Goal, NutritionProfile, NutritionResult, Result,
    ACTIVITY_MULTIPLIERS,
};
use std::fmt;

/// kcal per gram of carbohydrate
pub const KCAL_PER_GRAM_CARBS: u32 = 4;
/// kcal per gram of protein
pub const KCAL_PER_GRAM_PROTEIN: u32 = 4;
/// kcal per gram of fat
pub const KCAL_PER_GRAM_FATS: u32 = 9;

/// Compute Basal Metabolic Rate from a profile, unrounded
///
/// Fails with `Error::InvalidInput` when age, weight, or height is
/// non-positive or non-finite. Rounding artifacts never produce errors.
pub fn compute_bmr(profile: &NutritionProfile) -> Result<f64> {
    if profile.age == 0 {
        return Err(Error::InvalidInput("age must be positive".into()));
    }
    if !profile.weight_kg.is_finite() || profile.weight_kg <= 0.0 {
        return Err(Error::InvalidInput("weight must be a positive number".into()));
    }
    if !profile.height_cm.is_finite() || profile.height_cm <= 0.0 {
        return Err(Error::InvalidInput("height must be a positive number".into()));
    }

    let base = 10.0 * profile.weight_kg + 6.25 * profile.height_cm - 5.0 * f64::from(profile.age);
    Ok(match profile.gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    })
}

/// Compute Total Daily Energy Expenditure from BMR and an activity multiplier
///
/// The multiplier must be one of the five canonical values; anything else
/// fails with `Error::InvalidInput`.
pub fn compute_tdee(bmr: f64, multiplier: f64) -> Result<f64> {
    let recognized = ACTIVITY_MULTIPLIERS
        .iter()
        .any(|m| (m - multiplier).abs() < 1e-9);
    if !recognized {
        return Err(Error::InvalidInput(format!(
            "unrecognized activity multiplier: {}",
            multiplier
        )));
    }
    Ok(bmr * multiplier)
}

/// Adjust a TDEE for the user's goal, rounded half-up to whole kcal
pub fn adjust_for_goal(tdee: f64, goal: Goal) -> u32 {
    let adjusted = match goal {
        Goal::Maintain => tdee,
        Goal::Bulk => tdee * 1.2,
        Goal::Cut => tdee * 0.8,
    };
    adjusted.round() as u32
}

/// Macro ratio table per body type: (carbs, protein, fats)
fn macro_ratios(body_type: BodyType) -> (f64, f64, f64) {
    match body_type {
        BodyType::Ectomorph => (0.55, 0.25, 0.20),
        BodyType::Mesomorph => (0.40, 0.30, 0.30),
        BodyType::Endomorph => (0.30, 0.35, 0.35),
    }
}

/// Split a calorie target into macro grams by body type
///
/// Each gram figure is rounded independently; the reconstructed kcal sum
/// may drift a few kcal from the target and is left as-is.
pub fn split_macros(calories: u32, body_type: BodyType) -> NutritionResult {
    let (carb_ratio, protein_ratio, fat_ratio) = macro_ratios(body_type);
    let calories_f = f64::from(calories);
    NutritionResult {
        calories,
        carbs_grams: (calories_f * carb_ratio / f64::from(KCAL_PER_GRAM_CARBS)).round() as u32,
        protein_grams: (calories_f * protein_ratio / f64::from(KCAL_PER_GRAM_PROTEIN)).round()
            as u32,
        fats_grams: (calories_f * fat_ratio / f64::from(KCAL_PER_GRAM_FATS)).round() as u32,
    }
}

/// Run the full pipeline for a profile
pub fn calculate(profile: &NutritionProfile) -> Result<NutritionResult> {
    let bmr = compute_bmr(profile)?;
    let tdee = compute_tdee(bmr, profile.activity_multiplier)?;
    let calories = adjust_for_goal(tdee, profile.goal);
    Ok(split_macros(calories, profile.body_type))
}

// ============================================================================
// Weekly Meal Plan
// ============================================================================

/// One of the five daily meal slots
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack1,
    Snack2,
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MealSlot::Breakfast => write!(f, "Breakfast"),
            MealSlot::Lunch => write!(f, "Lunch"),
            MealSlot::Dinner => write!(f, "Dinner"),
            MealSlot::Snack1 => write!(f, "Snack 1"),
            MealSlot::Snack2 => write!(f, "Snack 2"),
        }
    }
}

/// Fixed share of the day's macros per meal slot; ratios sum to 1.00
pub const MEAL_DISTRIBUTION: [(MealSlot, f64); 5] = [
    (MealSlot::Breakfast, 0.30),
    (MealSlot::Lunch, 0.30),
    (MealSlot::Dinner, 0.30),
    (MealSlot::Snack1, 0.05),
    (MealSlot::Snack2, 0.05),
];

const CARB_FOODS: [&str; 4] = ["Oats (50g)", "Rice (100g)", "Potatoes (150g)", "Bread (2 slices)"];
const PROTEIN_FOODS: [&str; 4] = ["Chicken (150g)", "Eggs (2)", "Fish (150g)", "Tofu (100g)"];
const FAT_FOODS: [&str; 4] = [
    "Avocado (50g)",
    "Olive oil (1 tbsp)",
    "Nuts (30g)",
    "Peanut butter (1 tbsp)",
];

/// A single meal: its share of the macros plus canned food suggestions
#[derive(Clone, Debug, PartialEq)]
pub struct Meal {
    pub slot: MealSlot,
    pub carbs_grams: u32,
    pub protein_grams: u32,
    pub fats_grams: u32,
    pub carb_suggestion: &'static str,
    pub protein_suggestion: &'static str,
    pub fat_suggestion: &'static str,
}

/// One day of the plan: day number 1..=7 and its five meals
#[derive(Clone, Debug, PartialEq)]
pub struct DayPlan {
    pub day: u32,
    pub meals: Vec<Meal>,
}

/// A 7-day meal plan derived from a macro split
///
/// Days are produced lazily and the iterator is restartable: `days()` can
/// be called any number of times and always yields the same 7 entries.
#[derive(Clone, Debug)]
pub struct WeeklyMealPlan {
    result: NutritionResult,
}

impl WeeklyMealPlan {
    pub fn new(result: NutritionResult) -> Self {
        Self { result }
    }

    /// Iterate over the 7 day-plans
    pub fn days(&self) -> impl Iterator<Item = DayPlan> + '_ {
        (1..=7).map(move |day| DayPlan {
            day,
            meals: self.meals_for_day(),
        })
    }

    fn meals_for_day(&self) -> Vec<Meal> {
        MEAL_DISTRIBUTION
            .iter()
            .enumerate()
            .map(|(idx, &(slot, ratio))| Meal {
                slot,
                carbs_grams: (f64::from(self.result.carbs_grams) * ratio).round() as u32,
                protein_grams: (f64::from(self.result.protein_grams) * ratio).round() as u32,
                fats_grams: (f64::from(self.result.fats_grams) * ratio).round() as u32,
                carb_suggestion: CARB_FOODS[idx % CARB_FOODS.len()],
                protein_suggestion: PROTEIN_FOODS[idx % PROTEIN_FOODS.len()],
                fat_suggestion: FAT_FOODS[idx % FAT_FOODS.len()],
            })
            .collect()
    }
}
