use clap::{Parser, Subcommand};
use macrofit_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "macrofit")]
#[command(about = "Fitness tracking and nutrition planning toolkit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Override API base URL
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and start a session
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Sign in and start a session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Drop the current session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Calculate a nutrition plan and save it to history
    Calc {
        #[arg(long)]
        age: u32,
        /// Body weight in kg
        #[arg(long)]
        weight: f64,
        /// Height in cm
        #[arg(long)]
        height: f64,
        /// male or female
        #[arg(long)]
        gender: String,
        /// Activity multiplier (1.2, 1.375, 1.55, 1.725, 1.9)
        #[arg(long, default_value_t = 1.2)]
        activity: f64,
        /// ectomorph, mesomorph, or endomorph
        #[arg(long, default_value = "mesomorph")]
        body_type: String,
        /// maintain, bulk, or cut
        #[arg(long, default_value = "maintain")]
        goal: String,
        /// Print the full 7-day meal plan
        #[arg(long)]
        meal_plan: bool,
    },

    /// Log a progress entry and estimate time to goal
    Log {
        #[arg(long)]
        calories_in: f64,
        #[arg(long)]
        calories_out: f64,
        /// Current weight in kg
        #[arg(long)]
        weight: f64,
        /// Target weight in kg
        #[arg(long)]
        target_weight: f64,
    },

    /// Show logged progress entries
    Dashboard,

    /// Show or manage recent nutrition calculations
    History {
        /// Delete one record by id
        #[arg(long, conflicts_with = "clear")]
        delete: Option<String>,

        /// Delete all records
        #[arg(long, conflicts_with = "delete")]
        clear: bool,
    },

    /// Show the workout plan for a body type
    Workouts {
        /// ectomorph, mesomorph, or endomorph
        #[arg(long, default_value = "mesomorph")]
        body_type: String,
    },

    /// Send a message to the team
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    macrofit_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let base_url = cli.api_url.unwrap_or_else(|| config.api.base_url.clone());

    tracing::debug!("Using data dir {:?}, API {}", data_dir, base_url);

    let session_store = SessionStore::new(&data_dir);
    let gateway = PersistenceGateway::new(RemoteApi::new(base_url), LocalStore::new(&data_dir));
    let mut session = session_store.load()?;

    match cli.command {
        Commands::Register {
            name,
            email,
            password,
        } => cmd_register(&gateway, &session_store, &name, &email, &password).await,
        Commands::Login { email, password } => {
            cmd_login(&gateway, &session_store, &email, &password).await
        }
        Commands::Logout => cmd_logout(&session_store, &mut session),
        Commands::Whoami => cmd_whoami(&session),
        Commands::Calc {
            age,
            weight,
            height,
            gender,
            activity,
            body_type,
            goal,
            meal_plan,
        } => {
            let profile = NutritionProfile {
                age,
                weight_kg: weight,
                height_cm: height,
                gender: parse_gender(&gender)?,
                activity_multiplier: activity,
                body_type: parse_body_type(&body_type),
                goal: parse_goal(&goal)?,
            };
            cmd_calc(&gateway, &session_store, &mut session, profile, meal_plan).await
        }
        Commands::Log {
            calories_in,
            calories_out,
            weight,
            target_weight,
        } => {
            let entry = ProgressEntry {
                date: chrono::Local::now().format("%Y-%m-%d").to_string(),
                calories_in,
                calories_out,
                weight_kg: weight,
                target_weight_kg: target_weight,
            };
            cmd_log(&gateway, &session_store, &mut session, entry).await
        }
        Commands::Dashboard => cmd_dashboard(&gateway, &session_store, &mut session).await,
        Commands::History { delete, clear } => {
            cmd_history(&gateway, &session_store, &mut session, delete, clear).await
        }
        Commands::Workouts { body_type } => cmd_workouts(parse_body_type(&body_type)),
        Commands::Contact {
            name,
            email,
            message,
        } => cmd_contact(&gateway, name, email, message).await,
    }
}

// ============================================================================
// Auth commands
// ============================================================================

async fn cmd_register(
    gateway: &PersistenceGateway,
    store: &SessionStore,
    name: &str,
    email: &str,
    password: &str,
) -> Result<()> {
    let auth = gateway
        .remote()
        .register(name, email, password)
        .await
        .map_err(|e| Error::Remote(e.to_string()))?;
    finish_login(store, auth)
}

async fn cmd_login(
    gateway: &PersistenceGateway,
    store: &SessionStore,
    email: &str,
    password: &str,
) -> Result<()> {
    let auth = gateway
        .remote()
        .login(email, password)
        .await
        .map_err(|e| Error::Remote(e.to_string()))?;
    finish_login(store, auth)
}

fn finish_login(store: &SessionStore, auth: remote::AuthResponse) -> Result<()> {
    let session = SessionContext::authenticated(auth.user, auth.token);
    store.save(&session)?;
    println!(
        "✓ Signed in as {} <{}>",
        session.user().map(|u| u.name.as_str()).unwrap_or(""),
        session.user().map(|u| u.email.as_str()).unwrap_or("")
    );
    Ok(())
}

fn cmd_logout(store: &SessionStore, session: &mut SessionContext) -> Result<()> {
    session.logout();
    store.clear()?;
    println!("✓ Signed out");
    Ok(())
}

fn cmd_whoami(session: &SessionContext) -> Result<()> {
    match session.user() {
        Some(user) => println!("{} <{}>", user.name, user.email),
        None => println!("Not signed in (local-only mode)"),
    }
    Ok(())
}

// ============================================================================
// Nutrition commands
// ============================================================================

async fn cmd_calc(
    gateway: &PersistenceGateway,
    store: &SessionStore,
    session: &mut SessionContext,
    profile: NutritionProfile,
    show_meal_plan: bool,
) -> Result<()> {
    // Compute-layer errors block the result; persistence never does.
    let result = formula::calculate(&profile)?;

    display_result(&profile, &result);

    if show_meal_plan {
        display_meal_plan(&WeeklyMealPlan::new(result));
    }

    let record = HistoryRecord::new(profile, result);
    let outcome = gateway.save_history(record, session).await?;
    if let Some(history) = apply_outcome(outcome, store)? {
        println!("\nSaved. {} calculation(s) in history.", history.len());
    }
    Ok(())
}

async fn cmd_history(
    gateway: &PersistenceGateway,
    store: &SessionStore,
    session: &mut SessionContext,
    delete: Option<String>,
    clear: bool,
) -> Result<()> {
    let outcome = if clear {
        gateway.delete_all_history(session).await?
    } else if let Some(id) = delete {
        gateway.delete_history(&id, session).await?
    } else {
        gateway.load_history(session).await?
    };

    let Some(records) = apply_outcome(outcome, store)? else {
        return Ok(());
    };

    if records.is_empty() {
        println!("No calculation history yet.");
        return Ok(());
    }

    println!("Last calculations:");
    for record in &records {
        println!(
            "  [{}] {}  {:?}: {} kcal  (C {}g / P {}g / F {}g)",
            record.id.as_deref().unwrap_or("-"),
            record.recorded_at.format("%Y-%m-%d"),
            record.profile.goal,
            record.result.calories,
            record.result.carbs_grams,
            record.result.protein_grams,
            record.result.fats_grams,
        );
    }
    Ok(())
}

// ============================================================================
// Progress commands
// ============================================================================

async fn cmd_log(
    gateway: &PersistenceGateway,
    store: &SessionStore,
    session: &mut SessionContext,
    entry: ProgressEntry,
) -> Result<()> {
    // The estimate displays immediately; persistence runs after.
    let estimate = projector::estimate_time_to_goal(&entry);
    println!("{}", estimate);

    let outcome = gateway.save_progress(entry, session).await?;
    if let Some(progress) = apply_outcome(outcome, store)? {
        println!("✓ Entry logged ({} total)", progress.len());
    }
    Ok(())
}

async fn cmd_dashboard(
    gateway: &PersistenceGateway,
    store: &SessionStore,
    session: &mut SessionContext,
) -> Result<()> {
    let outcome = gateway.load_progress(session).await?;
    let Some(progress) = apply_outcome(outcome, store)? else {
        return Ok(());
    };

    if progress.is_empty() {
        println!("No progress entries yet.");
        return Ok(());
    }

    println!("Progress:");
    for entry in &progress {
        println!(
            "  {}  in {:>5} kcal / out {:>5} kcal  {:.1} kg → {:.1} kg",
            entry.date,
            entry.calories_in,
            entry.calories_out,
            entry.weight_kg,
            entry.target_weight_kg,
        );
    }

    if let Some(latest) = progress.last() {
        println!("\n{}", projector::estimate_time_to_goal(latest));
    }
    Ok(())
}

// ============================================================================
// Workouts and contact
// ============================================================================

fn cmd_workouts(body_type: BodyType) -> Result<()> {
    let plan = plan_for(body_type);

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {:?} PLAN", plan.body_type);
    println!("╰─────────────────────────────────────────╯");
    println!("\n  {}\n", plan.description);

    for section in plan.sections {
        println!("  {}", section.name);
        for exercise in section.exercises {
            println!("    → {}", exercise);
        }
        println!();
    }
    Ok(())
}

async fn cmd_contact(
    gateway: &PersistenceGateway,
    name: String,
    email: String,
    message: String,
) -> Result<()> {
    let msg = ContactMessage {
        name,
        email,
        message,
    };
    // Validated locally before any network call
    msg.validate()?;

    gateway
        .remote()
        .send_contact(&msg)
        .await
        .map_err(|e| Error::Remote(e.to_string()))?;
    println!("✓ Message sent");
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Unwrap a gateway outcome: surface advisories, handle expiry
fn apply_outcome<T>(outcome: Outcome<T>, store: &SessionStore) -> Result<Option<T>> {
    match outcome {
        Outcome::Ok(data) => Ok(Some(data)),
        Outcome::RemoteFailed { data, reason } => {
            eprintln!("Cannot connect to server ({}). Using local data.", reason);
            Ok(Some(data))
        }
        Outcome::SessionExpired => {
            store.clear()?;
            eprintln!("Session expired. Please login again.");
            Ok(None)
        }
    }
}

fn display_result(profile: &NutritionProfile, result: &NutritionResult) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  YOUR RESULTS ({:?})", profile.goal);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Calories/day: {} kcal", result.calories);
    println!("  Carbs:   {} g", result.carbs_grams);
    println!("  Protein: {} g", result.protein_grams);
    println!("  Fats:    {} g", result.fats_grams);
    println!();
    println!("  Suggested foods:");
    println!("    Carbs:   rice, oats, potatoes, bread");
    println!("    Protein: chicken, eggs, fish, tofu");
    println!("    Fats:    avocado, olive oil, nuts");
}

fn display_meal_plan(plan: &WeeklyMealPlan) {
    for day in plan.days() {
        println!("\n  Day {}", day.day);
        for meal in &day.meals {
            println!(
                "    {}: C {}g / P {}g / F {}g  ({}, {}, {})",
                meal.slot,
                meal.carbs_grams,
                meal.protein_grams,
                meal.fats_grams,
                meal.carb_suggestion,
                meal.protein_suggestion,
                meal.fat_suggestion,
            );
        }
    }
}

fn parse_gender(value: &str) -> Result<Gender> {
    match value.to_lowercase().as_str() {
        "male" | "m" => Ok(Gender::Male),
        "female" | "f" => Ok(Gender::Female),
        other => Err(Error::InvalidInput(format!("unknown gender: {}", other))),
    }
}

fn parse_body_type(value: &str) -> BodyType {
    match value.to_lowercase().as_str() {
        "ectomorph" => BodyType::Ectomorph,
        "endomorph" => BodyType::Endomorph,
        "mesomorph" => BodyType::Mesomorph,
        other => {
            // Unrecognized body types fall back to mesomorph ratios,
            // matching the calculator's behavior.
            eprintln!("Unknown body type: {}. Using mesomorph.", other);
            BodyType::Mesomorph
        }
    }
}

fn parse_goal(value: &str) -> Result<Goal> {
    match value.to_lowercase().as_str() {
        "maintain" => Ok(Goal::Maintain),
        "bulk" => Ok(Goal::Bulk),
        "cut" => Ok(Goal::Cut),
        other => Err(Error::InvalidInput(format!("unknown goal: {}", other))),
    }
}
