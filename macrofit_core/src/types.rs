//! Core domain types for the MacroFit system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Nutrition profiles and their enumerated inputs
//! - Computed nutrition results (calorie target + macro grams)
//! - Progress entries logged from the dashboard
//! - History records persisted per calculation
//! - The authenticated user profile

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Nutrition Input Types
// ============================================================================

/// Biological sex used by the Mifflin-St Jeor formula
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Somatotype classification driving macro ratios
///
/// Unrecognized values deserialize to `Mesomorph`: unknown body types get
/// mesomorph ratios rather than a rejection.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BodyType {
    Ectomorph,
    Endomorph,
    #[serde(other)]
    Mesomorph,
}

/// Calorie adjustment goal
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Maintain,
    Bulk,
    Cut,
}

/// The five canonical activity multipliers, sedentary through extra active
pub const ACTIVITY_MULTIPLIERS: [f64; 5] = [1.2, 1.375, 1.55, 1.725, 1.9];

/// User inputs to the nutrition calculation pipeline
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NutritionProfile {
    pub age: u32,
    #[serde(rename = "weight")]
    pub weight_kg: f64,
    #[serde(rename = "height")]
    pub height_cm: f64,
    pub gender: Gender,
    #[serde(rename = "activityLevel")]
    pub activity_multiplier: f64,
    pub body_type: BodyType,
    pub goal: Goal,
}

// ============================================================================
// Nutrition Output Types
// ============================================================================

/// Goal-adjusted calorie target plus the macro split in grams
///
/// The grams are rounded independently, so reconverting them to kcal
/// (carbs and protein at 4 kcal/g, fats at 9 kcal/g) may deviate from
/// `calories` by a few kcal. That drift is accepted, not corrected.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NutritionResult {
    #[serde(rename = "tdee")]
    pub calories: u32,
    #[serde(rename = "carbs")]
    pub carbs_grams: u32,
    #[serde(rename = "protein")]
    pub protein_grams: u32,
    #[serde(rename = "fats")]
    pub fats_grams: u32,
}

// ============================================================================
// Progress Types
// ============================================================================

/// A single logged progress entry
///
/// Immutable once created. The client only appends; the server assigns
/// authoritative ordering and replies with the full collection, which
/// replaces the local view wholesale.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub date: String,
    pub calories_in: f64,
    pub calories_out: f64,
    #[serde(rename = "weight")]
    pub weight_kg: f64,
    #[serde(rename = "targetWeight")]
    pub target_weight_kg: f64,
}

// ============================================================================
// History Types
// ============================================================================

/// One persisted nutrition calculation: inputs, outputs, and when
///
/// The id is assigned by the server when saved remotely, or a local UUID
/// when the record only exists in the on-device store.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HistoryRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub profile: NutritionProfile,
    #[serde(flatten)]
    pub result: NutritionResult,
    #[serde(rename = "createdAt", default = "Utc::now")]
    pub recorded_at: DateTime<Utc>,
}

impl HistoryRecord {
    /// Build an unsaved record from a calculation, stamped now
    pub fn new(profile: NutritionProfile, result: NutritionResult) -> Self {
        Self {
            id: None,
            profile,
            result,
            recorded_at: Utc::now(),
        }
    }
}

// ============================================================================
// User Types
// ============================================================================

/// Authenticated user identity, as returned by the auth endpoints
///
/// Never carries the token; the token is stored and transmitted separately.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> NutritionProfile {
        NutritionProfile {
            age: 30,
            weight_kg: 80.0,
            height_cm: 180.0,
            gender: Gender::Male,
            activity_multiplier: 1.55,
            body_type: BodyType::Mesomorph,
            goal: Goal::Cut,
        }
    }

    #[test]
    fn test_profile_wire_names_are_camel_case() {
        let json = serde_json::to_value(sample_profile()).unwrap();
        assert_eq!(json["weight"], 80.0);
        assert_eq!(json["height"], 180.0);
        assert_eq!(json["activityLevel"], 1.55);
        assert_eq!(json["bodyType"], "mesomorph");
        assert_eq!(json["goal"], "cut");
    }

    #[test]
    fn test_unknown_body_type_falls_back_to_mesomorph() {
        // An unrecognized body type is treated as mesomorph, not rejected.
        let body: BodyType = serde_json::from_str("\"somatotype_x\"").unwrap();
        assert_eq!(body, BodyType::Mesomorph);
    }

    #[test]
    fn test_history_record_flattens_profile_and_result() {
        let record = HistoryRecord::new(
            sample_profile(),
            NutritionResult {
                calories: 2223,
                carbs_grams: 222,
                protein_grams: 167,
                fats_grams: 74,
            },
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["tdee"], 2223);
        assert_eq!(json["carbs"], 222);
        assert_eq!(json["age"], 30);
        assert!(json.get("id").is_none());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_history_record_without_timestamp_defaults_to_now() {
        // Server responses that omit createdAt still deserialize.
        let json = r#"{"id":"7","age":25,"weight":70.0,"height":175.0,
            "gender":"female","activityLevel":1.2,"bodyType":"ectomorph",
            "goal":"maintain","tdee":1700,"carbs":234,"protein":106,"fats":38}"#;
        let record: HistoryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id.as_deref(), Some("7"));
        assert_eq!(record.result.calories, 1700);
    }

    #[test]
    fn test_progress_entry_wire_roundtrip() {
        let entry = ProgressEntry {
            date: "2026-08-29".into(),
            calories_in: 2000.0,
            calories_out: 2500.0,
            weight_kg: 82.0,
            target_weight_kg: 78.0,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["caloriesIn"], 2000.0);
        assert_eq!(json["targetWeight"], 78.0);
        let back: ProgressEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }
}
