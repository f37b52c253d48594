use clap::{Parser, Subcommand};
use fittrack_core::*;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "fittrack")]
#[command(about = "Personal fitness tracking system", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new user
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: String,
    },

    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Exercise catalog operations
    Exercise {
        #[command(subcommand)]
        command: ExerciseCommands,
    },

    /// Workout plan operations
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },

    /// Workout session operations
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },

    /// Body-weight tracking
    Weight {
        #[command(subcommand)]
        command: WeightCommands,
    },

    /// Weekly completion stats and weight trend
    Stats {
        #[arg(long)]
        user: Uuid,
    },

    /// Export history to CSV
    Export {
        #[arg(long)]
        user: Uuid,

        /// What to export (sessions, weights)
        #[arg(long, default_value = "sessions")]
        kind: String,

        /// Output file path
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Subcommand)]
enum ExerciseCommands {
    /// List or search exercises
    List {
        /// Case-insensitive name substring
        #[arg(long)]
        search: Option<String>,

        /// Muscle-group label filter
        #[arg(long)]
        muscle_group: Option<String>,
    },

    /// Create a custom exercise
    Add {
        #[arg(long)]
        name: String,

        /// Comma-separated muscle groups
        #[arg(long)]
        muscle_groups: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        instructions: Option<String>,

        /// Authoring user id
        #[arg(long)]
        user: Option<Uuid>,
    },
}

#[derive(Subcommand)]
enum PlanCommands {
    /// List a user's plans by day of week
    List {
        #[arg(long)]
        user: Uuid,
    },

    /// Create a workout plan
    Add {
        #[arg(long)]
        user: Uuid,
        #[arg(long)]
        name: String,
        /// Day of week, 0-6 (Sunday = 0)
        #[arg(long)]
        day: u8,
        /// Comma-separated muscle groups
        #[arg(long)]
        muscle_groups: String,
        /// Estimated duration in minutes
        #[arg(long, default_value_t = 45)]
        duration: u32,
    },

    /// Show a plan's ordered exercise list
    Show {
        #[arg(long)]
        plan: Uuid,
    },

    /// Add an exercise to a plan
    AddExercise {
        #[arg(long)]
        plan: Uuid,
        #[arg(long)]
        exercise: Uuid,
        #[arg(long)]
        sets: u32,
        #[arg(long)]
        reps: u32,
        /// Working weight in kg
        #[arg(long)]
        weight: Option<f64>,
        /// Rest between sets in seconds
        #[arg(long)]
        rest: Option<u32>,
        /// Position in the plan (appended if omitted)
        #[arg(long)]
        order: Option<u32>,
    },

    /// Seed the default weekly split
    SeedWeek {
        #[arg(long)]
        user: Uuid,
    },
}

#[derive(Subcommand)]
enum SessionCommands {
    /// List a user's sessions, newest first
    List {
        #[arg(long)]
        user: Uuid,
    },

    /// Start a session, optionally seeded from a plan
    Start {
        #[arg(long)]
        user: Uuid,
        #[arg(long)]
        plan: Option<Uuid>,
        #[arg(long)]
        name: Option<String>,
    },

    /// Show a session's exercise checklist
    Show {
        #[arg(long)]
        session: Uuid,
    },

    /// Append an exercise log to a live session
    Log {
        #[arg(long)]
        session: Uuid,
        #[arg(long)]
        exercise: Uuid,
        #[arg(long)]
        sets: u32,
        #[arg(long)]
        reps: u32,
        #[arg(long)]
        weight: Option<f64>,
    },

    /// Mark an exercise log completed
    Check {
        #[arg(long)]
        log: Uuid,
    },

    /// Finish a session (terminal)
    Finish {
        #[arg(long)]
        session: Uuid,

        /// Mark the session abandoned instead of completed
        #[arg(long)]
        abandon: bool,

        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Subcommand)]
enum WeightCommands {
    /// Record a weight measurement
    Add {
        #[arg(long)]
        user: Uuid,
        /// Weight in kg
        #[arg(long)]
        kg: f64,
        #[arg(long)]
        notes: Option<String>,
    },

    /// List a user's weight history, newest first
    List {
        #[arg(long)]
        user: Uuid,
    },
}

fn main() {
    // Initialize logging
    fittrack_core::logging::init();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    std::fs::create_dir_all(&data_dir)?;

    let mut store = Store::open(&data_dir)?;
    if config.catalog.seed_builtins {
        store.seed_builtins()?;
    }

    match cli.command {
        Commands::Register {
            username,
            email,
            password,
            name,
        } => {
            let profile = store.create_user(NewUser {
                username,
                email,
                password_hash: hash_password(&password),
                name,
                height_feet: None,
                height_inches: None,
                current_weight: None,
                goal_weight: None,
            })?;
            println!("✓ Registered {} ({})", profile.username, profile.id);
        }

        Commands::Login { email, password } => {
            let profile = store.authenticate(&email, &hash_password(&password))?;
            println!("✓ Logged in as {} ({})", profile.name, profile.id);
        }

        Commands::Exercise { command } => cmd_exercise(&mut store, command)?,
        Commands::Plan { command } => cmd_plan(&mut store, command)?,
        Commands::Session { command } => cmd_session(&mut store, command)?,
        Commands::Weight { command } => cmd_weight(&mut store, command)?,

        Commands::Stats { user } => {
            let stats = store.workout_stats(user, chrono::Utc::now())?;
            let trend = store.weight_trend(user)?;
            println!("This week:  {} workouts", stats.weekly_workouts);
            println!("All time:   {} sessions, {} completed", stats.total_workouts, stats.completed_workouts);
            println!("Completion: {}%", completion_rate(stats.weekly_workouts));
            println!("Weight:     {:+.1} kg since first log", trend);
        }

        Commands::Export { user, kind, out } => {
            let count = match kind.as_str() {
                "weights" => store.export_weights_csv(user, &out)?,
                _ => store.export_sessions_csv(user, &out)?,
            };
            println!("✓ Exported {} rows to {}", count, out.display());
        }
    }

    Ok(())
}

fn cmd_exercise(store: &mut Store, command: ExerciseCommands) -> Result<()> {
    match command {
        ExerciseCommands::List {
            search,
            muscle_group,
        } => {
            let exercises =
                store.search_exercises(search.as_deref(), muscle_group.as_deref());
            for exercise in &exercises {
                println!(
                    "{}  {} [{}]{}",
                    exercise.id,
                    exercise.name,
                    exercise.muscle_groups.join(", "),
                    if exercise.is_custom { " (custom)" } else { "" }
                );
            }
            println!("{} exercises", exercises.len());
        }

        ExerciseCommands::Add {
            name,
            muscle_groups,
            description,
            instructions,
            user,
        } => {
            let exercise = store.create_exercise(NewExercise {
                name,
                description,
                muscle_groups: split_groups(&muscle_groups),
                instructions,
                image_url: None,
                video_url: None,
                is_custom: true,
                created_by: user,
            })?;
            println!("✓ Created exercise {} ({})", exercise.name, exercise.id);
        }
    }
    Ok(())
}

fn cmd_plan(store: &mut Store, command: PlanCommands) -> Result<()> {
    match command {
        PlanCommands::List { user } => {
            for plan in store.plans_for_user(user) {
                println!(
                    "{}  day {}  {} ({} min){}",
                    plan.id,
                    plan.day_of_week,
                    plan.name,
                    plan.estimated_duration,
                    if plan.is_active { "" } else { " [inactive]" }
                );
            }
        }

        PlanCommands::Add {
            user,
            name,
            day,
            muscle_groups,
            duration,
        } => {
            let plan = store.create_plan(NewWorkoutPlan {
                user_id: user,
                name,
                day_of_week: day,
                muscle_groups: split_groups(&muscle_groups),
                estimated_duration: duration,
            })?;
            println!("✓ Created plan {} ({})", plan.name, plan.id);
        }

        PlanCommands::Show { plan } => {
            for entry in store.plan_entries(plan)? {
                let name = entry
                    .exercise
                    .as_ref()
                    .map_or("(missing exercise)", |e| e.name.as_str());
                print!("{}. {}  {}x{}", entry.order + 1, name, entry.sets, entry.reps);
                if let Some(weight) = entry.weight {
                    print!(" @ {} kg", weight);
                }
                if let Some(rest) = entry.rest_time {
                    print!(", rest {}s", rest);
                }
                println!("  [{}]", entry.id);
            }
        }

        PlanCommands::AddExercise {
            plan,
            exercise,
            sets,
            reps,
            weight,
            rest,
            order,
        } => {
            let entry =
                store.add_exercise_to_plan(plan, exercise, sets, reps, weight, rest, order)?;
            println!("✓ Added at position {} ({})", entry.order, entry.id);
        }

        PlanCommands::SeedWeek { user } => {
            let created = store.seed_default_week(user)?;
            println!("✓ Created {} plans", created.len());
            for plan in created {
                println!("  day {}: {}", plan.day_of_week, plan.name);
            }
        }
    }
    Ok(())
}

fn cmd_session(store: &mut Store, command: SessionCommands) -> Result<()> {
    match command {
        SessionCommands::List { user } => {
            for session in store.sessions_for_user(user) {
                let state = match (session.end_time, session.is_completed) {
                    (None, _) => "in progress",
                    (Some(_), true) => "completed",
                    (Some(_), false) => "abandoned",
                };
                println!(
                    "{}  {}  {} ({})",
                    session.id,
                    session.start_time.format("%Y-%m-%d %H:%M"),
                    session.name,
                    state
                );
            }
        }

        SessionCommands::Start { user, plan, name } => {
            let name = match (&name, plan) {
                (Some(name), _) => name.clone(),
                (None, Some(plan_id)) => store.plan(plan_id)?.name,
                (None, None) => "Workout".to_string(),
            };
            let session = store.start_session(user, plan, &name)?;
            let logs = store.session_logs(session.id)?;
            println!("✓ Started session {} ({})", session.name, session.id);
            if !logs.is_empty() {
                println!("  {} exercises on the checklist", logs.len());
            }
        }

        SessionCommands::Show { session } => {
            for log in store.session_logs(session)? {
                let name = store
                    .exercise(log.exercise_id)
                    .map(|e| e.name)
                    .unwrap_or_else(|_| "(missing exercise)".into());
                println!(
                    "[{}] {}. {}  {}x{}{}  ({})",
                    if log.is_completed { "x" } else { " " },
                    log.order + 1,
                    name,
                    log.sets,
                    log.reps,
                    log.weight.map_or(String::new(), |w| format!(" @ {} kg", w)),
                    log.id
                );
            }
        }

        SessionCommands::Log {
            session,
            exercise,
            sets,
            reps,
            weight,
        } => {
            let log = store.log_exercise(session, exercise, sets, reps, weight, None)?;
            println!("✓ Logged at position {} ({})", log.order, log.id);
        }

        SessionCommands::Check { log } => {
            store.update_log(
                log,
                LogPatch {
                    is_completed: Some(true),
                    ..Default::default()
                },
            )?;
            println!("✓ Marked complete");
        }

        SessionCommands::Finish {
            session,
            abandon,
            notes,
        } => {
            let finished = store.finish_session(session, !abandon, notes)?;
            println!(
                "✓ Session {} {}",
                finished.id,
                if finished.is_completed {
                    "completed"
                } else {
                    "abandoned"
                }
            );
        }
    }
    Ok(())
}

fn cmd_weight(store: &mut Store, command: WeightCommands) -> Result<()> {
    match command {
        WeightCommands::Add { user, kg, notes } => {
            let log = store.create_weight_log(NewWeightLog {
                user_id: user,
                weight: kg,
                date: None,
                notes,
            })?;
            println!("✓ Recorded {} kg ({})", log.weight, log.id);
        }

        WeightCommands::List { user } => {
            let logs = store.weight_logs_for_user(user)?;
            for log in &logs {
                println!(
                    "{}  {:.1} kg{}",
                    log.date.format("%Y-%m-%d"),
                    log.weight,
                    log.notes.as_deref().map_or(String::new(), |n| format!("  ({})", n))
                );
            }
            println!("Trend: {:+.1} kg", weight_delta(&logs));
        }
    }
    Ok(())
}

/// Hash a password at the boundary; the core only stores the digest.
fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

fn split_groups(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
