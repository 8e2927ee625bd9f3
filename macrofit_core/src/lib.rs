#![forbid(unsafe_code)]

//! Core domain model and business logic for the MacroFit system.
//!
//! This crate provides:
//! - Domain types (nutrition profiles, macro results, progress entries)
//! - The nutrition formula engine and weekly meal planner
//! - Time-to-goal projection
//! - Session context and on-device session persistence
//! - Dual-backend persistence (remote API with local fallback)
//! - The static workout catalog and contact form validation

pub mod types;
pub mod error;
pub mod formula;
pub mod projector;
pub mod session;
pub mod local;
pub mod remote;
pub mod gateway;
pub mod contact;
pub mod workouts;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use formula::{adjust_for_goal, calculate, compute_bmr, compute_tdee, split_macros};
pub use formula::{DayPlan, Meal, MealSlot, WeeklyMealPlan};
pub use projector::{estimate_time_to_goal, GoalEstimate};
pub use session::{SessionContext, SessionState, SessionStore};
pub use local::{LocalStore, HISTORY_CAP};
pub use remote::{RemoteApi, RemoteError};
pub use gateway::{Outcome, PersistenceGateway, RequestGeneration};
pub use contact::ContactMessage;
pub use workouts::{plan_for, WorkoutPlan, WorkoutSection};
pub use config::Config;
