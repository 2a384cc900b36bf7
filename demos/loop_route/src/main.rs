//! loop_route — single-bus loop simulation with terminal consumers.
//!
//! The engine runs on its own thread and writes `bus_simulation_log.csv`.
//! The main thread plays the two presentation consumers:
//!
//! - every 100 ms: drain state updates, redraw the position / seat line;
//! - every 1 s:    drain alert events onto the alert board.
//!
//! Type a card number and press Enter to resolve that alert.

mod board;
mod view;


use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use bt_core::SimRng;
use bt_output::{CsvEventLog, EventSink};
use bt_sim::{SimBuilder, SimConfig, spawn};

use board::AlertBoard;
use view::MapView;

// ── Constants ─────────────────────────────────────────────────────────────────

const VIEW_INTERVAL:  Duration = Duration::from_millis(100);
const BOARD_INTERVAL: Duration = Duration::from_secs(1);

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Simulate a bus on a closed-loop route with live occupancy and alerts")]
struct Args {
    /// JSON configuration file.  Missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for bus_simulation_log.csv.
    #[arg(long, default_value = "output/loop_route")]
    out_dir: PathBuf,

    /// Override the configured RNG seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Stop the simulation after this many seconds.  Values too large to
    /// schedule run until the engine stops on its own.
    #[arg(long, default_value_t = 30)]
    run_secs: u64,

    /// Log filter used when BUS_LOG is unset.
    #[arg(long, default_value = "info")]
    log: String,
}

fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let file = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
    let config = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

/// Instant at which the run ends, or `None` when `run_secs` overflows the
/// clock and the run is unbounded.
fn run_deadline(start: Instant, run_secs: u64) -> Option<Instant> {
    start.checked_add(Duration::from_secs(run_secs))
}

/// Forward card numbers typed on stdin.  The reader thread is detached; it
/// ends with the process.
fn spawn_resolve_reader() -> mpsc::Receiver<usize> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match line.trim().trim_start_matches('#').parse::<usize>() {
                Ok(id) => {
                    if tx.send(id).is_err() {
                        break;
                    }
                }
                Err(_) => warn!("expected an alert card number, got {line:?}"),
            }
        }
    });
    rx
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("BUS_LOG", args.log.as_str()))
        .init();

    // 1. Configuration.
    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    info!(
        "capacity {}, {} stops, {} samples/segment, tick {} ms, p_dev {}, seed {}",
        config.capacity,
        config.waypoints.len(),
        config.samples_per_segment,
        config.tick_interval_ms,
        config.deviation_probability,
        config.seed
    );

    // 2. Event log.
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;
    let sink = CsvEventLog::create_in(&args.out_dir)?;
    info!("event log: {}", sink.path().display());

    // 3. Engine.
    let engine = SimBuilder::new(config.clone(), SimRng::new(config.seed), sink).build()?;
    let map = MapView::new(engine.route().clone(), config.capacity);
    let updates = engine.updates();
    let alerts = engine.alerts();
    let handle = spawn(engine)?;

    // 4. Consumers.
    let resolve_requests = spawn_resolve_reader();
    let mut board = AlertBoard::new();
    let deadline = run_deadline(Instant::now(), args.run_secs);
    let mut next_view = Instant::now();
    let mut next_board = Instant::now();
    let mut stdout = std::io::stdout();

    while deadline.is_none_or(|d| Instant::now() < d) && !handle.is_finished() {
        let now = Instant::now();

        if now >= next_view {
            if let Some(latest) = updates.drain().pop() {
                print!("\r{}", map.render(&latest));
                stdout.flush()?;
            }
            next_view += VIEW_INTERVAL;
        }

        if now >= next_board {
            for event in alerts.drain() {
                let id = board.push(event);
                if let Some(card) = board.card(id) {
                    println!("\n  ALERT {}", card.render());
                }
            }
            for id in resolve_requests.try_iter() {
                if board.resolve(id) {
                    println!("\n  resolved #{id}");
                } else {
                    warn!("no active alert card #{id}");
                }
            }
            next_board += BOARD_INTERVAL;
        }

        let wake = match deadline {
            Some(deadline) => next_view.min(next_board).min(deadline),
            None => next_view.min(next_board),
        };
        thread::sleep(wake.saturating_duration_since(Instant::now()));
    }

    // 5. Shutdown: finish the in-flight tick, then join.
    let engine = handle.stop()?;
    for event in alerts.drain() {
        board.push(event);
    }
    println!();
    println!("Simulation stopped: {}", engine.stats());
    println!(
        "Alert board: {} cards, {} active, {} resolved",
        board.len(),
        board.active().count(),
        board.resolved().count()
    );
    for card in board.active().take(10) {
        println!("  {}", card.render());
    }
    println!("Event log: {} rows", engine.sink().records_written());

    Ok(())
}
