//! `focus`: drive the goal-pursuit scheduler against scenario files.
//!
//! Scenarios describe a world snapshot and a goal catalog. `select` prints
//! the goal the scheduler would pursue first; `run` starts the feature
//! against a simulated world and ticks it until it turns itself off.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use focus::core::region::RegionOrdering;
use focus::driver::{DriveOptions, DriveStop, DriveSummary, TickReport, run_ticks, run_timer};
use focus::exit_codes;
use focus::feature::FocusFeature;
use focus::io::config::{FocusConfig, load_config};
use focus::io::prefs::{FilePreferences, MemoryPreferences, Preferences};
use focus::io::scenario::load_scenario;
use focus::io::sim::SimWorld;
use focus::io::tick_log::{TickLog, TickRecord};
use focus::logging;
use focus::select::{SelectOutcome, select_from_path};

#[derive(Parser)]
#[command(
    name = "focus",
    version,
    about = "Goal-pursuit scheduler for game automation"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check a scenario against the schema and catalog invariants.
    Validate { scenario: PathBuf },
    /// Print the id of the goal that would be pursued first.
    Select {
        scenario: PathBuf,
        /// Rank the deferrable category last.
        #[arg(long)]
        defer_last: bool,
        #[arg(long, default_value = "focus.toml")]
        config: PathBuf,
    },
    /// Start the feature against a simulated world and tick it.
    Run {
        scenario: PathBuf,
        #[arg(long, default_value = "focus.toml")]
        config: PathBuf,
        /// Stop after this many ticks (including the start tick).
        #[arg(long)]
        ticks: Option<u64>,
        /// Wait one tick period between ticks instead of running flat out.
        #[arg(long)]
        realtime: bool,
        /// Persist preferences to this TOML file (in memory otherwise).
        #[arg(long)]
        prefs: Option<PathBuf>,
        /// Write a JSON Lines tick log (overrides `tick_log` in the config).
        #[arg(long)]
        tick_log: Option<PathBuf>,
    },
}

struct RunArgs {
    scenario: PathBuf,
    ticks: Option<u64>,
    realtime: bool,
    tick_log: Option<PathBuf>,
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Validate { scenario } => cmd_validate(&scenario),
        Command::Select {
            scenario,
            defer_last,
            config,
        } => cmd_select(&scenario, defer_last, &config),
        Command::Run {
            scenario,
            config,
            ticks,
            realtime,
            prefs,
            tick_log,
        } => {
            let config = load_config(&config)?;
            let args = RunArgs {
                scenario,
                ticks,
                realtime,
                tick_log,
            };
            match prefs {
                Some(path) => cmd_run(&config, FilePreferences::open(&path)?, &args),
                None => cmd_run(&config, MemoryPreferences::new(), &args),
            }
        }
    }
}

fn cmd_validate(path: &Path) -> Result<i32> {
    let scenario = load_scenario(path)?;
    println!(
        "ok: {} goals, {} towns, {} routes",
        scenario.goals.len(),
        scenario.towns.len(),
        scenario.routes.len()
    );
    Ok(exit_codes::OK)
}

fn cmd_select(path: &Path, defer_last: bool, config: &Path) -> Result<i32> {
    let config = load_config(config)?;
    let mut ordering = RegionOrdering::new(&config.regions);
    if defer_last {
        ordering.set_defer_last(true);
    }
    match select_from_path(path, &ordering)? {
        SelectOutcome::Selected(goal) => {
            println!("{}", goal.id);
            Ok(exit_codes::OK)
        }
        SelectOutcome::NoGoal => {
            eprintln!("no eligible goal");
            Ok(exit_codes::NO_GOAL)
        }
    }
}

fn cmd_run<P: Preferences>(config: &FocusConfig, prefs: P, args: &RunArgs) -> Result<i32> {
    let scenario = load_scenario(&args.scenario)?;
    let total = scenario.goals.len();
    let mut world = SimWorld::new(scenario);
    let mut feature = FocusFeature::new(config, prefs);
    feature
        .build_settings()
        .context("apply preference defaults")?;

    let mut log = match args.tick_log.as_ref().or(config.tick_log.as_ref()) {
        Some(path) => Some(TickLog::create(path)?),
        None => None,
    };
    let options = DriveOptions {
        max_ticks: args.ticks,
    };
    let after_tick = |world: &mut SimWorld, report: &TickReport| -> Result<()> {
        let commands = world.drain_issued();
        if let Some(log) = log.as_mut() {
            log.append(&TickRecord::new(report, commands))?;
        }
        world.advance();
        Ok(())
    };

    let summary = if args.realtime {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("build tokio runtime")?;
        runtime.block_on(run_timer(&mut feature, &mut world, &options, after_tick))?
    } else {
        run_ticks(&mut feature, &mut world, &options, after_tick)?
    };

    print_summary(&summary, &world, total);
    Ok(exit_codes::OK)
}

fn print_summary(summary: &DriveSummary, world: &SimWorld, total: usize) {
    let stop = match summary.stop {
        DriveStop::FeatureStopped => "no eligible goal left",
        DriveStop::TickLimit => "tick limit reached",
        DriveStop::Interrupted => "interrupted",
    };
    println!("ticks: {}", summary.ticks);
    println!("stopped: {stop}");
    println!("completed: {}/{}", world.completed_goals(), total);
    if let Some(goal) = world.tracked() {
        println!("last tracked: {goal}");
    }
    for warning in world.warnings() {
        println!("warning: {}", warning.replace('\n', " "));
    }
}
