use clap::{Parser, Subcommand};
use hiit_core::records::{self, read_records, records_for_user};
use hiit_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "hiit")]
#[command(about = "HIIT workout companion", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the people taking part in sessions
    Users {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Show the session that would run with the current settings
    Plan,

    /// Record a completed session for the selected users
    Complete,

    /// Show statistics for every user, or for one
    Stats {
        #[arg(long)]
        user: Option<String>,
    },

    /// Delete all users and recorded sessions
    Reset {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Register a new user
    Add { name: String },
    /// Remove a user and their share of recorded sessions
    Remove { name: String },
    /// List registered users
    List,
    /// Select who takes part in the next session
    Select {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

struct DataPaths {
    users: PathBuf,
    records: PathBuf,
}

impl DataPaths {
    fn new(data_dir: &Path) -> Self {
        Self {
            users: data_dir.join("users.json"),
            records: data_dir.join("sessions.jsonl"),
        }
    }
}

fn main() -> Result<()> {
    hiit_core::logging::init_with_level("warn");

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) if path.exists() => Config::load_from(path)?,
        Some(path) => {
            tracing::info!("No config file at {:?}, using defaults", path);
            Config::default()
        }
        None => Config::load()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let paths = DataPaths::new(&data_dir);

    match cli.command {
        Commands::Users { action } => cmd_users(&paths, action),
        Commands::Plan => cmd_plan(&paths, &config),
        Commands::Complete => cmd_complete(&paths, &config),
        Commands::Stats { user } => cmd_stats(&paths, user.as_deref()),
        Commands::Reset { yes } => cmd_reset(&paths, yes),
    }
}

fn cmd_users(paths: &DataPaths, action: UserCommands) -> Result<()> {
    match action {
        UserCommands::Add { name } => {
            let name = UserRegistry::update(&paths.users, |registry| {
                Ok(registry.add(&name)?.name.clone())
            })?;
            println!("✓ Added user {}", name);
        }
        UserCommands::Remove { name } => {
            let user = UserRegistry::update(&paths.users, |registry| registry.remove(&name))?;
            let dropped = records::remove_user(&paths.records, user.id)?;
            println!("✓ Removed user {}", user.name);
            if dropped > 0 {
                println!("  Deleted {} session(s) recorded only for them", dropped);
            }
        }
        UserCommands::List => {
            let registry = UserRegistry::load(&paths.users)?;
            if registry.users.is_empty() {
                println!("No users registered.");
            }
            for user in &registry.users {
                let marker = if user.selected { "*" } else { " " };
                println!("{} {}", marker, user.name);
            }
        }
        UserCommands::Select { names } => {
            UserRegistry::update(&paths.users, |registry| registry.set_selected(&names))?;
            println!("✓ Selected {}", names.join(", "));
        }
    }
    Ok(())
}

/// Build the session for the selected users, reporting warnings
///
/// Returns `None` after printing the reasons when the session cannot start.
fn prepare(paths: &DataPaths, config: &Config) -> Result<Option<Session>> {
    config.validate()?;

    let catalog = get_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    let registry = UserRegistry::load(&paths.users)?;
    let plan = prepare_session(catalog, &config.workout, &registry.users);

    for warning in &plan.warnings {
        eprintln!("Warning: {}", warning);
    }

    Ok(plan.session)
}

fn cmd_plan(paths: &DataPaths, config: &Config) -> Result<()> {
    let Some(session) = prepare(paths, config)? else {
        return Err(Error::Other("Session cannot start".into()));
    };

    display_session(&session);
    Ok(())
}

fn cmd_complete(paths: &DataPaths, config: &Config) -> Result<()> {
    let Some(session) = prepare(paths, config)? else {
        return Err(Error::Other("Session cannot start".into()));
    };

    let now_ms = chrono::Utc::now().timestamp_millis();
    let record = completed_record(&session, now_ms);

    let mut sink = JsonlRecordSink::new(&paths.records);
    sink.append(&record)?;

    println!(
        "✓ Session recorded for {} user(s) ({})",
        record.user_ids.len(),
        format_duration(record.duration_ms)
    );
    Ok(())
}

fn cmd_stats(paths: &DataPaths, user: Option<&str>) -> Result<()> {
    let registry = UserRegistry::load(&paths.users)?;
    let users: Vec<&User> = match user {
        Some(name) => vec![registry
            .find(name)
            .ok_or_else(|| Error::UnknownUser(name.to_string()))?],
        None => registry.users.iter().collect(),
    };

    if users.is_empty() {
        println!("No users registered.");
        return Ok(());
    }

    let records = read_records(&paths.records)?;
    let calculator = StreakCalculator::local();
    let now_ms = chrono::Utc::now().timestamp_millis();

    for user in users {
        let stats = calculator.compute_statistics(&records_for_user(&records, user.id), now_ms);
        display_statistics(user, &stats);
    }
    Ok(())
}

fn cmd_reset(paths: &DataPaths, yes: bool) -> Result<()> {
    if !yes {
        eprintln!("This deletes all users and recorded sessions. Re-run with --yes to confirm.");
        return Err(Error::Other("Reset not confirmed".into()));
    }

    let had_records = records::reset(&paths.records)?;
    let had_users = paths.users.exists();
    if had_users {
        std::fs::remove_file(&paths.users)?;
    }

    if had_records || had_users {
        println!("✓ All data deleted");
    } else {
        println!("Nothing to delete.");
    }
    Ok(())
}

fn display_session(session: &Session) {
    let names: Vec<_> = session.users.iter().map(|u| u.name.as_str()).collect();

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  HIIT SESSION");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Duration: {}", format_duration(session.duration_ms));
    println!("  With: {}", names.join(", "));
    println!("  Beep: {}", if session.beep_enabled { "on" } else { "off" });
    println!();

    for (idx, step) in session.steps.iter().enumerate() {
        let exercise = step.exercise().map(|e| e.name).unwrap_or("Get ready");
        let side = match step.side() {
            Side::None => "",
            Side::First => " (side 1)",
            Side::Second => " (side 2)",
        };
        println!(
            "  {:>3}  {:<8} {:>7}  {}{}  [{} left]",
            idx + 1,
            step.kind_name(),
            format_duration(step.timing().duration_ms),
            exercise,
            side,
            format_duration(step.timing().remaining_after_ms)
        );
    }
    println!();
}

fn display_statistics(user: &User, stats: &UserStatistics) {
    println!("{}", user.name);
    println!("  Sessions:           {}", stats.total_sessions);
    println!("  Total time:         {}", format_duration(stats.cumulated_time_ms));
    println!(
        "  Average length:     {}",
        format_duration(stats.average_session_length_ms)
    );
    println!("  Current streak:     {} day(s)", stats.current_streak_days);
    println!("  Longest streak:     {} day(s)", stats.longest_streak_days);
    println!("  Sessions per week:  {}", stats.average_sessions_per_week);
}

fn format_duration(ms: u64) -> String {
    let total_secs = ms / 1000;
    let (hours, mins, secs) = (total_secs / 3600, (total_secs % 3600) / 60, total_secs % 60);
    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {:02}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}
