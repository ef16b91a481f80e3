//! drive-runner - scenario evaluation for the driving kiosk.
//!
//! - `drive-runner list` - built-in scenarios
//! - `drive-runner run` - replay a recorded drive and score it
//! - `drive-runner latest` - most recent score, for the summary screen and receipt
//! - `drive-runner init` - write a default configuration

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

use drive_bt::Trace;
use drive_core::{Snapshot, SnapshotError};
use drive_scenario::{
    catalog, load_descriptor, load_route, ConfigError, RunState, RunnerConfig, ScenarioDescriptor,
    ScenarioRun,
};
use drive_score::{reducer_for, ReducerKind, ScoreRecord, ScoreStore, StoredScore};

#[derive(Parser)]
#[command(name = "drive-runner")]
#[command(about = "Driving scenario evaluation and scoring", version)]
struct Cli {
    /// Project root directory
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List built-in scenarios
    List,

    /// Replay a recorded snapshot stream through a scenario
    Run {
        /// Scenario name (built-in or `<scenarios_dir>/<name>.yaml`)
        scenario: String,

        /// JSON Lines file, one snapshot per tick
        #[arg(long)]
        snapshots: PathBuf,

        /// Route YAML; defaults to `<scenarios_dir>/<name>.route.yaml` when present
        #[arg(long)]
        route: Option<PathBuf>,

        /// Descriptor YAML, instead of looking the scenario up
        #[arg(long)]
        descriptor: Option<PathBuf>,

        /// Record id; defaults to one past the latest stored record
        #[arg(long)]
        id: Option<u64>,

        /// Score reducer; defaults to the configured one
        #[arg(long, value_enum)]
        reducer: Option<ReducerArg>,

        /// Print the record without storing it
        #[arg(long)]
        dry_run: bool,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the most recent score
    Latest {
        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default .drive/config.yaml
    Init,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReducerArg {
    Count,
    Compute,
}

impl From<ReducerArg> for ReducerKind {
    fn from(arg: ReducerArg) -> Self {
        match arg {
            ReducerArg::Count => ReducerKind::Count,
            ReducerArg::Compute => ReducerKind::Compute,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let project_root = match cli.project {
        Some(p) => p,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    match cli.command {
        Commands::List => list_scenarios(),
        Commands::Run {
            scenario,
            snapshots,
            route,
            descriptor,
            id,
            reducer,
            dry_run,
            json,
        } => {
            let config = RunnerConfig::load_from_project(&project_root)?;
            let desc = resolve_descriptor(&config, &scenario, descriptor.as_deref(), route.as_deref())?;
            let reducer = reducer.map(ReducerKind::from).unwrap_or(config.reducer);
            run_scenario(&config, &desc, &snapshots, id, reducer, dry_run, json)
        }
        Commands::Latest { json } => {
            let config = RunnerConfig::load_from_project(&project_root)?;
            show_latest(&config, json)
        }
        Commands::Init => init_project(&project_root),
    }
}

fn list_scenarios() -> Result<()> {
    println!("{:<26} {:<8} {:<24} {:>8}", "SCENARIO", "TOWN", "CATEGORY", "TIMEOUT");
    for desc in catalog::builtin() {
        println!(
            "{:<26} {:<8} {:<24} {:>7}s",
            desc.name, desc.town, desc.category, desc.timeout_secs
        );
    }
    Ok(())
}

fn resolve_descriptor(
    config: &RunnerConfig,
    name: &str,
    descriptor: Option<&Path>,
    route: Option<&Path>,
) -> Result<ScenarioDescriptor> {
    let desc = match descriptor {
        Some(path) => load_descriptor(path)?,
        None => match catalog::find(name) {
            Ok(desc) => desc,
            Err(ConfigError::UnknownScenario(_)) => {
                let path = config.scenarios_dir.join(format!("{name}.yaml"));
                if !path.exists() {
                    bail!("unknown scenario {name} (not built in, no {})", path.display());
                }
                load_descriptor(&path)?
            }
            Err(e) => return Err(e.into()),
        },
    };

    let route_path = route
        .map(Path::to_path_buf)
        .or_else(|| {
            let default = config.scenarios_dir.join(format!("{}.route.yaml", desc.name));
            default.exists().then_some(default)
        });

    match route_path {
        Some(path) => {
            let route = load_route(&path)?;
            tracing::debug!(route = %path.display(), waypoints = route.len(), "route loaded");
            Ok(desc.with_route(route))
        }
        None => Ok(desc),
    }
}

fn run_scenario(
    config: &RunnerConfig,
    desc: &ScenarioDescriptor,
    snapshots: &Path,
    id: Option<u64>,
    reducer: ReducerKind,
    dry_run: bool,
    json: bool,
) -> Result<()> {
    let store = ScoreStore::new(&config.store_path);
    let record = score_stream(config, desc, snapshots, &store, id, reducer)?;

    print_record(&record, json)?;

    if !dry_run {
        let stored = store
            .append(record)
            .with_context(|| format!("Failed to store score in {}", store.path().display()))?;
        tracing::info!(
            id = stored.record.id,
            path = %store.path().display(),
            "score persisted"
        );
    }
    Ok(())
}

/// Replay a snapshot stream and score it.
///
/// The store is only consulted for the next id; when it cannot be read the
/// run is still scored, under id 0.
fn score_stream(
    config: &RunnerConfig,
    desc: &ScenarioDescriptor,
    snapshots: &Path,
    store: &ScoreStore,
    id: Option<u64>,
    reducer: ReducerKind,
) -> Result<ScoreRecord> {
    let file = File::open(snapshots)
        .with_context(|| format!("Failed to open snapshot stream {}", snapshots.display()))?;
    let reader = BufReader::new(file);

    let mut run: Option<ScenarioRun<Snapshot>> = None;
    let mut unreadable = 0usize;

    for (n, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read {}", snapshots.display()))?;
        if line.trim().is_empty() {
            continue;
        }

        let parsed: Result<Snapshot, SnapshotError> = serde_json::from_str(&line)
            .map_err(|e| SnapshotError::Malformed(format!("line {}: {e}", n + 1)));

        let state = match parsed {
            Ok(mut snapshot) => {
                if run.is_none() {
                    run = Some(start_run(config, desc, &snapshot, n + 1)?);
                }
                match run.as_mut() {
                    Some(active) => active.tick(&mut snapshot),
                    None => RunState::Running,
                }
            }
            Err(e) => {
                unreadable += 1;
                match run.as_mut() {
                    Some(active) => active.skip(&e),
                    None => {
                        tracing::warn!(error = %e, "skipping unreadable snapshot before the run started");
                        RunState::Running
                    }
                }
            }
        };

        if state.is_finished() {
            break;
        }
    }

    let Some(mut run) = run else {
        bail!("no readable snapshot in {}", snapshots.display());
    };

    let id = match id {
        Some(id) => id,
        None => store.next_id().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "cannot read score store, scoring as #0");
            0
        }),
    };
    let record = run.finish(id, reducer_for(reducer, config.scoring.clone()).as_ref());

    if let Some(log) = run.trace_log() {
        for event in &log.events {
            tracing::debug!(tick = event.tick, tag = %event.tag, label = %event.label, "trace");
        }
    }
    if unreadable > 0 {
        tracing::warn!(count = unreadable, "snapshots skipped");
    }
    Ok(record)
}

/// Bind the scenario to the actors of the first readable snapshot.
fn start_run(
    config: &RunnerConfig,
    desc: &ScenarioDescriptor,
    first: &Snapshot,
    line: usize,
) -> Result<ScenarioRun<Snapshot>> {
    let roster = first
        .roster()
        .with_context(|| format!("line {line}: first snapshot has no ego actor"))?;
    let run = ScenarioRun::new(desc, &roster, config.dt_seconds)
        .with_context(|| format!("Failed to build scenario {}", desc.name))?;
    Ok(if config.trace {
        run.with_trace(Trace::with_log())
    } else {
        run
    })
}

fn show_latest(config: &RunnerConfig, json: bool) -> Result<()> {
    let store = ScoreStore::new(&config.store_path);
    match store.latest()? {
        Some(StoredScore {
            recorded_at,
            record,
        }) => {
            if !json {
                println!("Recorded: {}", recorded_at.format("%Y-%m-%d %H:%M:%S UTC"));
            }
            print_record(&record, json)
        }
        None => {
            println!("No scores recorded in {}", store.path().display());
            Ok(())
        }
    }
}

fn print_record(record: &ScoreRecord, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(record)?);
        return Ok(());
    }

    let b = &record.breakdown;
    println!("Scenario:   {} (#{})", record.scenario, record.id);
    println!("Outcome:    {}", record.outcome);
    println!("Score:      {:.1} ({})", record.final_score, record.reducer);
    println!(
        "Drive:      {} ticks, {:.1}s, {:.0}% of route",
        record.ticks, record.elapsed_seconds, b.route_completion
    );
    println!(
        "Violations: {} collisions, {} wrong lane, {} off track, {} red lights",
        b.collisions, b.wrong_lane, b.off_track, b.red_light
    );
    if b.target_reached {
        println!("Target reached");
    }
    Ok(())
}

fn init_project(project_root: &Path) -> Result<()> {
    let config_path = project_root.join(drive_scenario::config::CONFIG_PATH);
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
        return Ok(());
    }

    let written = RunnerConfig::default().save_to_project(project_root)?;
    let scenarios_dir = project_root.join(".drive/scenarios");
    std::fs::create_dir_all(&scenarios_dir)
        .with_context(|| format!("Failed to create {}", scenarios_dir.display()))?;

    println!("Initialized drive-runner project at {}", project_root.display());
    println!();
    println!("Created:");
    println!("  {} - runner configuration", written.display());
    println!("  {} - descriptors and routes", scenarios_dir.display());
    println!();
    println!("Next steps:");
    println!("  1. Put <Scenario>.route.yaml in .drive/scenarios");
    println!("  2. Run: drive-runner run <Scenario> --snapshots drive.jsonl");
    Ok(())
}
