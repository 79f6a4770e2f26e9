//! `booking` CLI — detect, validate, search and explain over a JSON event list.
//!
//! Every subcommand reads a JSON array of events (stdin by default) and writes
//! pretty-printed JSON.
//!
//! ## Usage
//!
//! ```sh
//! # Conflicts of event 3 against the rest of its owner's calendar
//! booking detect --event 3 -i events.json
//!
//! # Check event 3 against a constraint file
//! booking validate --event 3 --constraints rules.json -i events.json
//!
//! # Earliest free 90-minute slot for owner 7
//! booking find-slot --owner 7 --duration 90 -i events.json
//!
//! # Explanations for every conflict of event 3
//! cat events.json | booking explain --event 3
//! ```
//!
//! Set `-v` (or `RUST_LOG=debug`) to log progress to stderr.

use anyhow::{Context, Result};
use booking_engine::constraint::Constraint;
use booking_engine::event::others_for_owner;
use booking_engine::{
    Calendar, ConstraintValidator, Event, EventId, OwnerId, SlotSearch, DEFAULT_DURATION_MINUTES,
};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "booking",
    version,
    about = "Scheduling conflict detection and explanation"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List conflicts between one event and its owner's other events
    Detect {
        /// Id of the event to check
        #[arg(long)]
        event: EventId,
        /// JSON event list (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Check one event against a JSON list of constraints
    Validate {
        /// Id of the event to check
        #[arg(long)]
        event: EventId,
        /// JSON constraint list; a `no_conflicts` rule without `existing_events` uses the owner's calendar
        #[arg(long)]
        constraints: String,
        /// JSON event list (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Find the earliest free business-hours slot for an owner
    FindSlot {
        /// Owner whose calendar is searched
        #[arg(long)]
        owner: OwnerId,
        /// Slot length in minutes
        #[arg(long, default_value_t = DEFAULT_DURATION_MINUTES)]
        duration: i64,
        /// Search start as RFC 3339 (defaults to the current time)
        #[arg(long)]
        now: Option<DateTime<Utc>>,
        /// Number of days to search
        #[arg(long, default_value_t = SlotSearch::default().horizon_days)]
        horizon_days: u32,
        /// JSON event list (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Explain every conflict of one event
    Explain {
        /// Id of the event to explain
        #[arg(long)]
        event: EventId,
        /// JSON event list (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match cli.command {
        Commands::Detect {
            event,
            input,
            output,
        } => {
            let calendar = load_calendar(input.as_deref())?;
            let conflicts = calendar
                .conflicts_for(event)
                .with_context(|| format!("Failed to detect conflicts for event {}", event))?;
            tracing::info!(event, conflicts = conflicts.len(), "detected conflicts");
            write_json(output.as_deref(), &conflicts)?;
        }
        Commands::Validate {
            event,
            constraints,
            input,
            output,
        } => {
            let events = read_events(input.as_deref())?;
            let target = events
                .iter()
                .find(|e| e.id == event)
                .with_context(|| format!("Event not found: {}", event))?;

            let raw: Value = serde_json::from_str(&read_input(Some(&constraints))?)
                .with_context(|| format!("Failed to parse constraints: {}", constraints))?;
            let unfilled = unfilled_no_conflicts(&raw);
            let mut validator: ConstraintValidator = serde_json::from_value(raw)
                .with_context(|| format!("Failed to parse constraints: {}", constraints))?;
            fill_no_conflicts(&mut validator, &unfilled, &events, target);

            let violations = validator.validate_event(target);
            tracing::info!(
                event,
                constraints = validator.constraints().len(),
                violations = violations.len(),
                "validated event"
            );
            write_json(output.as_deref(), &violations)?;
        }
        Commands::FindSlot {
            owner,
            duration,
            now,
            horizon_days,
            input,
            output,
        } => {
            let calendar = load_calendar(input.as_deref())?;
            let search = SlotSearch {
                horizon_days,
                ..SlotSearch::default()
            };
            let now = now.unwrap_or_else(Utc::now);
            let slot = calendar.find_slot_for_owner(owner, duration, now, &search);
            match &slot {
                Some(found) => tracing::info!(owner, start = %found.start, "found slot"),
                None => tracing::warn!(owner, duration, horizon_days, "no free slot in horizon"),
            }
            write_json(output.as_deref(), &slot)?;
        }
        Commands::Explain {
            event,
            input,
            output,
        } => {
            let calendar = load_calendar(input.as_deref())?;
            let explanations = calendar
                .explain_conflicts(event)
                .with_context(|| format!("Failed to explain conflicts for event {}", event))?;
            tracing::info!(event, explanations = explanations.len(), "explained conflicts");
            write_json(output.as_deref(), &explanations)?;
        }
    }

    Ok(())
}

/// Positions of `no_conflicts` rules that omit `existing_events`. An explicit
/// empty list means "check against nothing" and is left alone.
fn unfilled_no_conflicts(raw: &Value) -> Vec<usize> {
    raw.as_array()
        .map(|rules| {
            rules
                .iter()
                .enumerate()
                .filter(|(_, rule)| {
                    rule.get("type").and_then(Value::as_str) == Some("no_conflicts")
                        && rule.pointer("/params/existing_events").is_none()
                })
                .map(|(i, _)| i)
                .collect()
        })
        .unwrap_or_default()
}

/// Give the `no_conflicts` rules at `positions` the target owner's other events.
fn fill_no_conflicts(
    validator: &mut ConstraintValidator,
    positions: &[usize],
    events: &[Event],
    target: &Event,
) {
    let others: Vec<_> = others_for_owner(events, target.owner_id, target.id)
        .into_iter()
        .map(|e| e.interval)
        .collect();

    let constraints = validator.constraints_mut();
    for &i in positions {
        if let Some(Constraint::NoConflicts(params)) = constraints.get_mut(i) {
            tracing::debug!(
                rule = i,
                candidates = others.len(),
                "filling no_conflicts from owner calendar"
            );
            params.existing_events = others.clone();
        }
    }
}

fn load_calendar(path: Option<&str>) -> Result<Calendar> {
    Calendar::from_events(read_events(path)?).context("Failed to load event list")
}

fn read_events(path: Option<&str>) -> Result<Vec<Event>> {
    let raw = read_input(path)?;
    let events: Vec<Event> =
        serde_json::from_str(&raw).context("Failed to parse event list as JSON")?;
    tracing::debug!(count = events.len(), "loaded events");
    Ok(events)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_json<T: Serialize>(path: Option<&str>, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
