use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use clap::{Parser, Subcommand};
use genkido_core::*;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "genki")]
#[command(about = "Daily exercise and fasting-window tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's summary and streaks (default)
    Status,

    /// Mark an exercise complete for today
    Done {
        /// Exercise name (case-insensitive)
        exercise: String,
    },

    /// Undo today's completion for an exercise
    Undo {
        exercise: String,
    },

    /// Set today's count for an exercise
    Count {
        exercise: String,
        count: i64,
    },

    /// Log and manage meals
    Meal {
        #[command(subcommand)]
        command: MealCommands,
    },

    /// Manage the exercise catalog
    Exercise {
        #[command(subcommand)]
        command: ExerciseCommands,
    },

    /// Show or change per-weekday eating-window hours
    Window {
        #[command(subcommand)]
        command: WindowCommands,
    },

    /// Show per-day verdicts for recent days
    History {
        /// Number of days to show
        #[arg(long, default_value_t = 30)]
        days: i64,
    },

    /// Export day summaries to a CSV file
    Export {
        /// Output CSV path
        out: PathBuf,

        /// Number of days to export
        #[arg(long, default_value_t = 30)]
        days: i64,
    },
}

#[derive(Subcommand)]
enum MealCommands {
    /// Log a meal (defaults to now)
    Add {
        /// Time of the meal today, HH:MM
        #[arg(long)]
        at: Option<String>,

        /// Free-form note
        #[arg(long)]
        note: Option<String>,
    },

    /// List meals for a day (defaults to today)
    List {
        /// Day to list, YYYY-MM-DD
        #[arg(long)]
        day: Option<NaiveDate>,
    },

    /// Remove a meal by id
    Remove {
        id: Uuid,
    },
}

#[derive(Subcommand)]
enum ExerciseCommands {
    /// List exercises
    List {
        /// Include deactivated exercises
        #[arg(long)]
        all: bool,
    },

    /// Add a new exercise
    Add {
        name: String,

        /// Completion kind: counted, timed, or binary
        #[arg(long, default_value = "counted")]
        kind: String,

        /// Goal threshold (reps or seconds)
        #[arg(long, default_value_t = 50)]
        goal: i64,
    },

    /// Deactivate an exercise (keeps its history)
    Deactivate {
        name: String,
    },

    /// Reactivate an exercise
    Activate {
        name: String,
    },
}

#[derive(Subcommand)]
enum WindowCommands {
    /// Show the eating window for every weekday
    Show,

    /// Set the window hours for one weekday
    Set {
        /// Weekday name (e.g. monday, tue)
        weekday: String,

        /// Start hour, 0-23
        #[arg(long)]
        start: Option<u32>,

        /// End/cutoff hour, 0-23
        #[arg(long)]
        end: Option<u32>,
    },
}

/// File layout inside the data directory
struct Paths {
    catalog: PathBuf,
    log_book: PathBuf,
    meals: PathBuf,
    window: PathBuf,
}

impl Paths {
    fn new(data_dir: &PathBuf) -> Self {
        Self {
            catalog: data_dir.join("exercises.json"),
            log_book: data_dir.join("logs.json"),
            meals: data_dir.join("meals.jsonl"),
            window: data_dir.join("window.json"),
        }
    }
}

fn main() -> Result<()> {
    genkido_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    std::fs::create_dir_all(&data_dir)?;
    let paths = Paths::new(&data_dir);

    match cli.command {
        Some(Commands::Status) | None => cmd_status(&paths, &config),
        Some(Commands::Done { exercise }) => cmd_set_count(&paths, &exercise, SetCount::Goal),
        Some(Commands::Undo { exercise }) => cmd_set_count(&paths, &exercise, SetCount::Zero),
        Some(Commands::Count { exercise, count }) => {
            cmd_set_count(&paths, &exercise, SetCount::Exact(count))
        }
        Some(Commands::Meal { command }) => cmd_meal(&paths, command),
        Some(Commands::Exercise { command }) => cmd_exercise(&paths, command),
        Some(Commands::Window { command }) => cmd_window(&paths, command),
        Some(Commands::History { days }) => cmd_history(&paths, days),
        Some(Commands::Export { out, days }) => cmd_export(&paths, &out, days),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Derive the summary for one day from in-memory stores
///
/// `meals` is the full journal; it gets narrowed to the day here so that
/// multi-day walks (status streaks, history) read the journal only once.
fn summarize_day(
    day: NaiveDate,
    catalog: &ExerciseCatalog,
    book: &LogBook,
    meals: &[MealLog],
    window: &WindowConfig,
) -> DaySummary {
    let active: Vec<_> = catalog.active().into_iter().cloned().collect();
    let logs = book.logs_for_day(day);
    let day_meals: Vec<_> = meals.iter().filter(|m| m.day() == day).cloned().collect();
    DaySummary::evaluate(day, &active, &logs, &day_meals, window)
}

fn cmd_status(paths: &Paths, config: &Config) -> Result<()> {
    let catalog = ExerciseCatalog::load(&paths.catalog)?;
    let book = LogBook::load(&paths.log_book)?;
    let window = WindowConfig::load(&paths.window)?;
    let meals = journal::read_meals(&paths.meals)?;

    let day = today();
    let summary = summarize_day(day, &catalog, &book, &meals, &window);

    println!("{} ({})", day, day.weekday());
    println!();

    for status in &summary.exercises {
        let mark = if status.completed { "x" } else { " " };
        let definition = catalog.find(status.definition_id);
        let unit = definition.map(|d| d.kind.unit_name()).unwrap_or("");
        println!(
            "  [{}] {:<16} {:>4}/{} {}",
            mark, status.name, status.count, status.goal, unit
        );
    }

    println!();
    println!(
        "Exercises: {}/{}",
        summary.completed_count(),
        summary.total_count()
    );
    if summary.all_exercises_completed() && summary.total_count() > 0 {
        println!("All exercises complete for today");
    }

    if summary.meal_count > 0 {
        println!(
            "Meals: {}{}",
            summary.meal_count,
            if summary.has_meal_outside_window {
                " (outside eating window!)"
            } else {
                ""
            }
        );
    }

    let weekday = day.weekday();
    println!(
        "Eating window: {:02}:00-{:02}:00{}",
        window.start_hour(weekday),
        window.end_hour(weekday),
        if window.is_outside_window(now()) {
            " (fasting now)"
        } else {
            ""
        }
    );

    // Streaks exclude today; it is still in progress
    let horizon = config.streak.horizon_days;
    let lookup = |date: NaiveDate| summarize_day(date, &catalog, &book, &meals, &window);
    println!();
    println!("Current streak: {} days", current_streak(day, horizon, &lookup));
    println!("Longest streak: {} days", longest_streak(day, horizon, &lookup));

    Ok(())
}

enum SetCount {
    Goal,
    Zero,
    Exact(i64),
}

fn cmd_set_count(paths: &Paths, exercise: &str, action: SetCount) -> Result<()> {
    let catalog = ExerciseCatalog::load(&paths.catalog)?;
    catalog.save(&paths.catalog)?; // persist seeded defaults on first run
    let mut book = LogBook::load(&paths.log_book)?;
    let window = WindowConfig::load(&paths.window)?;

    let definition = catalog
        .find_by_name(exercise)
        .filter(|d| d.active)
        .ok_or_else(|| Error::Catalog(format!("No active exercise named '{}'", exercise)))?;

    let day = today();
    match action {
        SetCount::Goal => {
            book.complete(definition, day);
            println!("✓ {} done", definition.name);
        }
        SetCount::Zero => {
            book.undo(definition.id, day);
            println!("Undid {} for today", definition.name);
        }
        SetCount::Exact(count) => {
            if count < 0 {
                return Err(Error::Store(format!("Count must be non-negative, got {}", count)));
            }
            book.upsert(definition.id, day, count);
            println!(
                "{}: {}/{} {}",
                definition.name,
                count,
                definition.goal,
                definition.kind.unit_name()
            );
        }
    }
    book.save(&paths.log_book)?;

    // All-complete signal for the reminder collaborator
    let meals = journal::read_meals(&paths.meals)?;
    let summary = summarize_day(day, &catalog, &book, &meals, &window);
    if summary.all_exercises_completed() {
        println!(
            "All {} exercises complete for today!",
            summary.total_count()
        );
    } else {
        println!(
            "{}/{} exercises complete",
            summary.completed_count(),
            summary.total_count()
        );
    }

    Ok(())
}

fn cmd_meal(paths: &Paths, command: MealCommands) -> Result<()> {
    match command {
        MealCommands::Add { at, note } => {
            let timestamp = match at {
                Some(hhmm) => {
                    let time = NaiveTime::parse_from_str(&hhmm, "%H:%M")
                        .map_err(|e| Error::Other(format!("Invalid time '{}': {}", hhmm, e)))?;
                    today().and_time(time)
                }
                None => now(),
            };

            let meal = MealLog::new(timestamp, note);
            let mut journal = MealJournal::new(&paths.meals);
            journal.append(&meal)?;

            let window = WindowConfig::load(&paths.window)?;
            println!("✓ Meal logged at {} ({})", timestamp.format("%H:%M"), meal.id);
            if window.is_outside_window(timestamp) {
                // Before-start takes precedence when reporting
                let weekday = timestamp.date().weekday();
                if window.is_before_start(timestamp) {
                    println!(
                        "⚠ Outside eating window: before {:02}:00",
                        window.start_hour(weekday)
                    );
                } else {
                    println!(
                        "⚠ Outside eating window: at or after {:02}:00",
                        window.end_hour(weekday)
                    );
                }
            }
            Ok(())
        }

        MealCommands::List { day } => {
            let day = day.unwrap_or_else(today);
            let window = WindowConfig::load(&paths.window)?;
            let meals = journal::meals_for_day(&paths.meals, day)?;

            if meals.is_empty() {
                println!("No meals logged for {}", day);
                return Ok(());
            }

            for meal in meals {
                let flag = if window.is_outside_window(meal.at) {
                    "  ⚠ outside window"
                } else {
                    ""
                };
                println!(
                    "{}  {}  {}{}",
                    meal.at.format("%H:%M"),
                    meal.id,
                    meal.note.as_deref().unwrap_or("-"),
                    flag
                );
            }
            Ok(())
        }

        MealCommands::Remove { id } => {
            if journal::remove_meal(&paths.meals, id)? {
                println!("Removed meal {}", id);
                Ok(())
            } else {
                Err(Error::Store(format!("No meal with id {}", id)))
            }
        }
    }
}

fn parse_kind(kind: &str) -> Result<CompletionKind> {
    match kind.to_lowercase().as_str() {
        "counted" | "reps" => Ok(CompletionKind::Counted),
        "timed" => Ok(CompletionKind::Timed),
        "binary" | "done" => Ok(CompletionKind::Binary),
        other => Err(Error::Catalog(format!(
            "Unknown kind '{}' (expected counted, timed, or binary)",
            other
        ))),
    }
}

fn cmd_exercise(paths: &Paths, command: ExerciseCommands) -> Result<()> {
    let mut catalog = ExerciseCatalog::load(&paths.catalog)?;

    match command {
        ExerciseCommands::List { all } => {
            let exercises = if all { catalog.all() } else { catalog.active() };
            for definition in exercises {
                let marker = if definition.active { " " } else { "·" };
                println!(
                    "{} {:<16} {:?}, goal {} {}",
                    marker,
                    definition.name,
                    definition.kind,
                    definition.goal,
                    definition.kind.unit_name()
                );
            }
            Ok(())
        }

        ExerciseCommands::Add { name, kind, goal } => {
            let kind = parse_kind(&kind)?;
            catalog.add(name.clone(), kind, goal);

            let errors = catalog.validate();
            if !errors.is_empty() {
                for error in &errors {
                    eprintln!("  - {}", error);
                }
                return Err(Error::Catalog("Invalid exercise".into()));
            }

            catalog.save(&paths.catalog)?;
            println!("✓ Added exercise '{}'", name);
            Ok(())
        }

        ExerciseCommands::Deactivate { name } => {
            let id = catalog
                .find_by_name(&name)
                .map(|d| d.id)
                .ok_or_else(|| Error::Catalog(format!("No exercise named '{}'", name)))?;
            catalog.deactivate(id)?;
            catalog.save(&paths.catalog)?;
            println!("Deactivated '{}' (history kept)", name);
            Ok(())
        }

        ExerciseCommands::Activate { name } => {
            let id = catalog
                .find_by_name(&name)
                .map(|d| d.id)
                .ok_or_else(|| Error::Catalog(format!("No exercise named '{}'", name)))?;
            catalog.activate(id)?;
            catalog.save(&paths.catalog)?;
            println!("Reactivated '{}'", name);
            Ok(())
        }
    }
}

fn parse_weekday(name: &str) -> Result<Weekday> {
    name.parse::<Weekday>()
        .map_err(|_| Error::Config(format!("Unknown weekday '{}'", name)))
}

fn cmd_window(paths: &Paths, command: WindowCommands) -> Result<()> {
    let mut window = WindowConfig::load(&paths.window)?;

    match command {
        WindowCommands::Show => {
            for weekday in WEEKDAYS {
                println!(
                    "{:<9} {:02}:00-{:02}:00",
                    format!("{}", weekday),
                    window.start_hour(weekday),
                    window.end_hour(weekday)
                );
            }
            Ok(())
        }

        WindowCommands::Set { weekday, start, end } => {
            let weekday = parse_weekday(&weekday)?;
            if start.is_none() && end.is_none() {
                return Err(Error::Config("Nothing to set: pass --start and/or --end".into()));
            }
            if let Some(hour) = start {
                window.set_start_hour(weekday, hour)?;
            }
            if let Some(hour) = end {
                window.set_end_hour(weekday, hour)?;
            }
            window.save(&paths.window)?;
            println!(
                "{}: eating window {:02}:00-{:02}:00",
                weekday,
                window.start_hour(weekday),
                window.end_hour(weekday)
            );
            Ok(())
        }
    }
}

fn cmd_history(paths: &Paths, days: i64) -> Result<()> {
    let catalog = ExerciseCatalog::load(&paths.catalog)?;
    let book = LogBook::load(&paths.log_book)?;
    let window = WindowConfig::load(&paths.window)?;
    let meals = journal::read_meals(&paths.meals)?;

    let anchor = today();
    for offset in 0..days.max(0) {
        let day = anchor - Duration::days(offset);
        let summary = summarize_day(day, &catalog, &book, &meals, &window);

        // Today has no verdict yet; it is still in progress
        let verdict = if offset == 0 {
            "…"
        } else if summary.is_day_complete() {
            "✓"
        } else {
            "✗"
        };

        let meal_note = if summary.has_meal_outside_window {
            "  ⚠ meal outside window"
        } else {
            ""
        };
        println!(
            "{} {}  {}/{} exercises, {} meals{}",
            verdict,
            day,
            summary.completed_count(),
            summary.total_count(),
            summary.meal_count,
            meal_note
        );
    }

    Ok(())
}

fn cmd_export(paths: &Paths, out: &PathBuf, days: i64) -> Result<()> {
    let catalog = ExerciseCatalog::load(&paths.catalog)?;
    let book = LogBook::load(&paths.log_book)?;
    let window = WindowConfig::load(&paths.window)?;

    let count = export_history(out, today(), days, &catalog, &book, &paths.meals, &window)?;

    println!("✓ Exported {} day summaries", count);
    println!("  CSV: {}", out.display());
    Ok(())
}
