use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use somno_core::*;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "somno")]
#[command(about = "Sleep tracking and analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a sleep entry
    Log {
        /// Entry date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Bedtime (HH:MM, 24-hour)
        #[arg(long)]
        bedtime: String,

        /// Wake time (HH:MM, 24-hour)
        #[arg(long)]
        wake: String,

        /// Sleep quality, 1-10
        #[arg(long)]
        quality: u8,

        /// Free-text notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// List recent entries
    List {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value_t = 7)]
        count: usize,

        /// Start of an inclusive date range
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,

        /// End of an inclusive date range
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,
    },

    /// Edit an existing entry
    Edit {
        /// Entry id
        id: Uuid,

        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long)]
        bedtime: Option<String>,

        #[arg(long)]
        wake: Option<String>,

        #[arg(long)]
        quality: Option<u8>,

        #[arg(long, conflicts_with = "clear_notes")]
        notes: Option<String>,

        /// Remove the notes from the entry
        #[arg(long)]
        clear_notes: bool,
    },

    /// Delete an entry
    Delete {
        /// Entry id
        id: Uuid,
    },

    /// Show rolling statistics (default)
    Stats {
        /// Window size: the most recent N entries
        #[arg(short = 'n', long, default_value_t = DEFAULT_WINDOW)]
        window: usize,
    },

    /// Show advisory insights over the last two weeks
    Insights,

    /// Show or update sleep goals
    Goals {
        /// Target sleep duration in hours
        #[arg(long)]
        target: Option<f64>,

        /// Enable or disable the bedtime reminder (on/off)
        #[arg(long)]
        reminder: Option<String>,

        /// Minutes before bedtime to remind
        #[arg(long)]
        minutes_before: Option<u32>,
    },

    /// Export all entries to CSV
    Export {
        /// Output file path
        #[arg(long, short = 'o')]
        output: PathBuf,
    },
}

fn main() {
    somno_core::logging::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let snapshot_path = data_dir.join("sleep.json");

    // Restore state; a brand-new store takes its goals from the config
    let mut store = if snapshot_path.exists() {
        SleepStore::from_snapshot(Snapshot::load(&snapshot_path)?)
    } else {
        SleepStore::new(config.goals.initial_goals())
    };

    match cli.command {
        Some(Commands::Log {
            date,
            bedtime,
            wake,
            quality,
            notes,
        }) => cmd_log(&mut store, &snapshot_path, date, &bedtime, &wake, quality, notes),
        Some(Commands::List { count, from, to }) => cmd_list(&store, count, from, to),
        Some(Commands::Edit {
            id,
            date,
            bedtime,
            wake,
            quality,
            notes,
            clear_notes,
        }) => cmd_edit(
            &mut store,
            &snapshot_path,
            id,
            date,
            bedtime.as_deref(),
            wake.as_deref(),
            quality,
            notes,
            clear_notes,
        ),
        Some(Commands::Delete { id }) => cmd_delete(&mut store, &snapshot_path, id),
        Some(Commands::Stats { window }) => cmd_stats(&store, window),
        Some(Commands::Insights) => cmd_insights(&store),
        Some(Commands::Goals {
            target,
            reminder,
            minutes_before,
        }) => cmd_goals(&mut store, &snapshot_path, target, reminder.as_deref(), minutes_before),
        Some(Commands::Export { output }) => cmd_export(&store, &output),
        None => cmd_stats(&store, DEFAULT_WINDOW),
    }
}

fn persist(store: &SleepStore, snapshot_path: &std::path::Path) -> Result<()> {
    store.snapshot().save(snapshot_path)
}

fn validate_quality(quality: u8) -> Result<u8> {
    if (1..=10).contains(&quality) {
        Ok(quality)
    } else {
        Err(Error::InvalidQuality(quality))
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_log(
    store: &mut SleepStore,
    snapshot_path: &std::path::Path,
    date: Option<NaiveDate>,
    bedtime: &str,
    wake: &str,
    quality: u8,
    notes: Option<String>,
) -> Result<()> {
    let draft = SleepEntryDraft {
        date: date.unwrap_or_else(|| Local::now().date_naive()),
        bedtime: parse_time_of_day(bedtime)?,
        wake_time: parse_time_of_day(wake)?,
        quality: validate_quality(quality)?,
        notes,
    };

    let entry = store.add_entry(draft)?;
    persist(store, snapshot_path)?;

    println!("✓ Logged {:.1}h of sleep for {}", entry.duration, entry.date);
    println!("  id: {}", entry.id);
    Ok(())
}

fn cmd_list(
    store: &SleepStore,
    count: usize,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<()> {
    let entries: Vec<&SleepEntry> = match (from, to) {
        (Some(start), Some(end)) => store.entries_in_range(start, end),
        _ => store.recent(count).iter().collect(),
    };

    if entries.is_empty() {
        println!("No entries logged yet.");
        return Ok(());
    }

    for entry in entries {
        println!(
            "{}  {} → {}  {:>4.1}h  quality {:>2}/10  {}",
            entry.date,
            entry.bedtime.format("%H:%M"),
            entry.wake_time.format("%H:%M"),
            entry.duration,
            entry.quality,
            entry.id,
        );
        if let Some(ref notes) = entry.notes {
            println!("    {}", notes);
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_edit(
    store: &mut SleepStore,
    snapshot_path: &std::path::Path,
    id: Uuid,
    date: Option<NaiveDate>,
    bedtime: Option<&str>,
    wake: Option<&str>,
    quality: Option<u8>,
    notes: Option<String>,
    clear_notes: bool,
) -> Result<()> {
    let update = SleepEntryUpdate {
        date,
        bedtime: bedtime.map(parse_time_of_day).transpose()?,
        wake_time: wake.map(parse_time_of_day).transpose()?,
        quality: quality.map(validate_quality).transpose()?,
        notes: if clear_notes {
            Some(None)
        } else {
            notes.map(Some)
        },
    };

    match store.update_entry(id, update)? {
        Some(entry) => {
            persist(store, snapshot_path)?;
            println!("✓ Updated {} ({:.1}h, quality {}/10)", entry.date, entry.duration, entry.quality);
            Ok(())
        }
        None => {
            eprintln!("No entry found with id {}", id);
            std::process::exit(1);
        }
    }
}

fn cmd_delete(store: &mut SleepStore, snapshot_path: &std::path::Path, id: Uuid) -> Result<()> {
    if store.delete_entry(id) {
        persist(store, snapshot_path)?;
        println!("✓ Entry deleted");
        Ok(())
    } else {
        eprintln!("No entry found with id {}", id);
        std::process::exit(1);
    }
}

fn cmd_stats(store: &SleepStore, window: usize) -> Result<()> {
    let recent = store.recent(window);
    let today = Local::now().date_naive();

    let avg_quality = average_quality(recent);
    let avg_duration = average_duration(recent);
    let streak = sleep_streak(store.entries(), today);
    let score = sleep_score(avg_quality, avg_duration, store.goals().target_sleep_duration);

    println!("Sleep statistics (last {} entries)", recent.len());
    println!("─────────────────────────────────────────");
    println!("  Average duration: {:.1} h", avg_duration);
    println!("  Average quality:  {:.1} / 10", avg_quality);
    println!("  Sleep score:      {} / 100", score);
    println!("  Current streak:   {} day(s)", streak);

    if let Some(summary) = schedule_summary(recent) {
        println!(
            "  Typical schedule: {} → {} (bedtime spread ±{:.0} min)",
            summary.avg_bedtime.format("%H:%M"),
            summary.avg_wake_time.format("%H:%M"),
            summary.bedtime_stddev_minutes,
        );
    }

    println!();
    println!("Quality distribution:");
    for band in quality_distribution(recent) {
        println!(
            "  {:<9} ({:>2}-{:<2}) {}",
            band.label,
            band.min,
            band.max,
            "█".repeat(band.count)
        );
    }

    let weeks = weekly_averages(recent);
    if !weeks.is_empty() {
        println!();
        println!("Weekly averages:");
        for week in weeks {
            println!(
                "  week of {}: {:.2} h, quality {:.1} ({} nights)",
                week.week_start, week.avg_duration, week.avg_quality, week.nights
            );
        }
    }

    Ok(())
}

fn cmd_insights(store: &SleepStore) -> Result<()> {
    // Insights look at the last two weeks, like the rolling dashboard
    let window = store.recent(14);
    let goals = store.goals();

    for insight in generate_insights(window, goals) {
        let marker = match insight.kind {
            InsightKind::Success => "✓",
            InsightKind::Info => "ℹ",
            InsightKind::Warning => "!",
        };
        println!("{} {}", marker, insight.title);
        println!("    {}", insight.detail);
        println!("    → {}", insight.action);
        println!();
    }

    println!(
        "Suggested bedtime for a 07:00 wake-up: {}",
        optimal_bedtime(
            chrono::NaiveTime::from_hms_opt(7, 0, 0).unwrap_or(chrono::NaiveTime::MIN),
            goals.target_sleep_duration
        )
        .format("%H:%M")
    );
    Ok(())
}

fn cmd_goals(
    store: &mut SleepStore,
    snapshot_path: &std::path::Path,
    target: Option<f64>,
    reminder: Option<&str>,
    minutes_before: Option<u32>,
) -> Result<()> {
    let reminder_enabled = match reminder {
        Some(value) => match value.to_lowercase().as_str() {
            "on" | "true" | "yes" => Some(true),
            "off" | "false" | "no" => Some(false),
            other => {
                return Err(Error::Config(format!(
                    "expected on/off for --reminder, got {}",
                    other
                )))
            }
        },
        None => None,
    };

    let update = SleepGoalsUpdate {
        target_sleep_duration: target,
        reminder_enabled,
        reminder_minutes_before: minutes_before,
    };

    let changed = update.target_sleep_duration.is_some()
        || update.reminder_enabled.is_some()
        || update.reminder_minutes_before.is_some();

    if changed {
        store.update_goals(update);
        persist(store, snapshot_path)?;
        println!("✓ Goals updated");
    }

    let goals = store.goals();
    println!("  Target duration:  {:.1} h", goals.target_sleep_duration);
    println!(
        "  Reminder:         {}",
        if goals.reminder_enabled { "on" } else { "off" }
    );
    println!("  Remind before:    {} min", goals.reminder_minutes_before);
    Ok(())
}

fn cmd_export(store: &SleepStore, output: &std::path::Path) -> Result<()> {
    let count = export_entries(output, store.entries())?;
    println!("✓ Exported {} entries to {}", count, output.display());
    Ok(())
}
