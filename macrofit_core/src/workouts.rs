//! Static workout plan catalog.
//!
//! Fixed per-body-type training plans: four sections each, with canned
//! exercise prescriptions. Pure data lookup, no persistence.

use crate::BodyType;

/// One section of a plan (e.g. "Upper Body") and its exercises
#[derive(Clone, Copy, Debug)]
pub struct WorkoutSection {
    pub name: &'static str,
    pub exercises: &'static [&'static str],
}

/// A complete body-type plan
#[derive(Clone, Copy, Debug)]
pub struct WorkoutPlan {
    pub body_type: BodyType,
    pub description: &'static str,
    pub sections: &'static [WorkoutSection],
}

static ECTOMORPH_PLAN: WorkoutPlan = WorkoutPlan {
    body_type: BodyType::Ectomorph,
    description: "Naturally thin with fast metabolism. Focus on strength training with adequate recovery.",
    sections: &[
        WorkoutSection {
            name: "Upper Body",
            exercises: &[
                "Pull-ups (4x8)",
                "Incline Bench Press (4x10)",
                "Dumbbell Rows (4x12)",
                "Shoulder Press (3x12)",
            ],
        },
        WorkoutSection {
            name: "Lower Body",
            exercises: &[
                "Squats (4x10)",
                "Leg Press (3x12)",
                "Lunges (3x12 each leg)",
                "Calf Raises (3x20)",
            ],
        },
        WorkoutSection {
            name: "Core",
            exercises: &["Plank (3x60s)", "Russian Twists (3x20)", "Leg Raises (3x15)"],
        },
        WorkoutSection {
            name: "Cardio",
            exercises: &["Light Jog (15-20min)", "Cycling (20min)", "Jump Rope (10min)"],
        },
    ],
};

static MESOMORPH_PLAN: WorkoutPlan = WorkoutPlan {
    body_type: BodyType::Mesomorph,
    description: "Naturally muscular. Responds well to both strength and hypertrophy training.",
    sections: &[
        WorkoutSection {
            name: "Upper Body",
            exercises: &[
                "Bench Press (4x10)",
                "Pull-ups (4x8)",
                "Shoulder Press (4x12)",
                "Bicep Curls (3x15)",
            ],
        },
        WorkoutSection {
            name: "Lower Body",
            exercises: &[
                "Deadlifts (4x8)",
                "Squats (4x10)",
                "Lunges (3x12 each leg)",
                "Leg Curls (3x12)",
            ],
        },
        WorkoutSection {
            name: "Core",
            exercises: &["Plank (3x90s)", "Sit-ups (3x20)", "Bicycle Crunches (3x20)"],
        },
        WorkoutSection {
            name: "Cardio",
            exercises: &["HIIT (15min)", "Treadmill (20min moderate)", "Rowing (15min)"],
        },
    ],
};

static ENDOMORPH_PLAN: WorkoutPlan = WorkoutPlan {
    body_type: BodyType::Endomorph,
    description: "Gains easily, slower metabolism. Emphasize conditioning volume alongside strength work.",
    sections: &[
        WorkoutSection {
            name: "Upper Body",
            exercises: &[
                "Push-ups (4x15)",
                "Incline Dumbbell Press (3x12)",
                "Lat Pulldowns (3x12)",
                "Tricep Dips (3x15)",
            ],
        },
        WorkoutSection {
            name: "Lower Body",
            exercises: &[
                "Squats (4x12)",
                "Step-ups (3x12 each leg)",
                "Lunges (3x12)",
                "Leg Press (3x12)",
            ],
        },
        WorkoutSection {
            name: "Core",
            exercises: &[
                "Plank (3x45s)",
                "Mountain Climbers (3x30s)",
                "Leg Raises (3x12)",
            ],
        },
        WorkoutSection {
            name: "Cardio",
            exercises: &[
                "Brisk Walking (30min)",
                "Cycling (20-30min)",
                "Elliptical (20min)",
            ],
        },
    ],
};

/// Look up the fixed plan for a body type
pub fn plan_for(body_type: BodyType) -> &'static WorkoutPlan {
    match body_type {
        BodyType::Ectomorph => &ECTOMORPH_PLAN,
        BodyType::Mesomorph => &MESOMORPH_PLAN,
        BodyType::Endomorph => &ENDOMORPH_PLAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_body_type_has_four_sections() {
        for body_type in [BodyType::Ectomorph, BodyType::Mesomorph, BodyType::Endomorph] {
            let plan = plan_for(body_type);
            assert_eq!(plan.body_type, body_type);
            assert_eq!(plan.sections.len(), 4);
            for section in plan.sections {
                assert!(!section.exercises.is_empty(), "{} is empty", section.name);
            }
        }
    }

    #[test]
    fn test_section_names_are_stable() {
        let names: Vec<_> = plan_for(BodyType::Mesomorph)
            .sections
            .iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Upper Body", "Lower Body", "Core", "Cardio"]);
    }
}
