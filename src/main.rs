//! tankrig host simulator.
//!
//! Runs the full rig over simulated pins: both tank cycles, the aqueduct
//! gate, the shared fill pump and the process-line lock, driven by the
//! same cooperative loop the controller board runs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                     │
//! │                                                             │
//! │  Relay<SimPin>  LevelSwitch<SimPin>  NvsSlot  LogEventSink  │
//! │  (Output)       (Input)              (Persist) (EventSink)  │
//! │                                                             │
//! │  ─────────────── Port Trait Boundary ────────────────       │
//! │                                                             │
//! │   ┌───────────────────────────────────────────────────┐     │
//! │   │  RigService: gate · tank A · tank B               │     │
//! │   └───────────────────────────────────────────────────┘     │
//! │                                                             │
//! │  stdin thread ──(embassy-sync channel)──▶ console drain     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::cell::RefCell;
use std::io::BufRead;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use tankrig::adapters::{LogEventSink, MonotonicClock, NvsAdapter, NvsSlot};
use tankrig::app::commands::TankId;
use tankrig::app::events::RigEvent;
use tankrig::app::ports::{ConfigPort, EventSink};
use tankrig::app::service::{RigIo, RigService, TankPins};
use tankrig::config::{Chem2Completion, RigConfig};
use tankrig::console::{self, ConsoleCommand, ConsoleError, LevelTarget};
use tankrig::drivers::{Relay, SimPin};
use tankrig::pins;
use tankrig::sensors::LevelSwitch;

#[derive(Parser)]
#[command(name = "tankrig")]
#[command(about = "Two-tank water-treatment rig simulator", long_about = None)]
struct Cli {
    /// JSON file backing the non-volatile store (in-memory if omitted)
    #[arg(long)]
    store: Option<PathBuf>,

    /// Coordinator loop period in milliseconds
    #[arg(long)]
    tick_ms: Option<u32>,

    /// Status log period in milliseconds
    #[arg(long)]
    status_ms: Option<u32>,

    /// Enable the lock-guarded IN_PROCESS phase
    #[arg(long)]
    process_line: bool,

    /// Advance to WAITING_IN_PROCESS when CHEM_2 completes
    #[arg(long)]
    chem2_advance: bool,
}

impl Cli {
    fn apply(&self, mut config: RigConfig) -> RigConfig {
        if let Some(ms) = self.tick_ms {
            config.tick_interval_ms = ms;
        }
        if let Some(ms) = self.status_ms {
            config.status_interval_ms = ms;
        }
        if self.process_line {
            config.process_line_enabled = true;
        }
        if self.chem2_advance {
            config.chem2_completion = Chem2Completion::AdvanceToWaitingInProcess;
        }
        config
    }
}

/// Level-switch pins the console drives.  The switches hold clones.
struct SimBoard {
    level_a: SimPin,
    level_b: SimPin,
    level_aq: SimPin,
}

type Store = Rc<RefCell<NvsAdapter>>;
type SimRig = RigService<Relay<SimPin>, LevelSwitch<SimPin>, NvsSlot<NvsAdapter>>;

fn relay(name: &'static str, pin: u8) -> Relay<SimPin> {
    debug!("{name} on pin {pin}");
    Relay::new(name, SimPin::new())
}

fn build_rig(config: &RigConfig, store: &Store) -> (SimRig, SimBoard) {
    let board = SimBoard {
        level_a: SimPin::new(),
        level_b: SimPin::new(),
        level_aq: SimPin::new(),
    };

    let tank = |id: TankId, board_level: &SimPin, key| -> TankPins<_, _, _> {
        let (ingress, recirc, process) = match id {
            TankId::A => (
                pins::TANK_A_INGRESS_VALVE,
                pins::TANK_A_RECIRC_PUMP,
                pins::TANK_A_PROCESS_VALVE,
            ),
            TankId::B => (
                pins::TANK_B_INGRESS_VALVE,
                pins::TANK_B_RECIRC_PUMP,
                pins::TANK_B_PROCESS_VALVE,
            ),
        };
        TankPins {
            ingress_valve: relay("ingress-valve", ingress),
            recirc_pump: relay("recirc-pump", recirc),
            process_valve: relay("process-valve", process),
            level: LevelSwitch::new(id.name(), board_level.clone()),
            slot: NvsSlot::new(Rc::clone(store), key),
        }
    };

    let io = RigIo {
        gate_valve: relay("aqueduct-valve", pins::AQUEDUCT_VALVE),
        gate_pump: relay("aqueduct-pump", pins::AQUEDUCT_PUMP),
        gate_level: LevelSwitch::new("aqueduct", board.level_aq.clone()),
        fill_pump: relay("fill-pump", pins::FILL_PUMP),
        heartbeat_led: relay("heartbeat", pins::HEARTBEAT_LED),
        tank_a: tank(TankId::A, &board.level_a, "a"),
        tank_b: tank(TankId::B, &board.level_b, "b"),
    };

    (RigService::new(config, io), board)
}

/// Read stdin on its own thread and queue complete lines.
fn spawn_console_reader() -> Result<()> {
    std::thread::Builder::new()
        .name("console".into())
        .spawn(|| {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                let mut res = console::submit(&line);
                while res == Err(ConsoleError::Backlog) {
                    std::thread::sleep(Duration::from_millis(5));
                    res = console::submit(&line);
                }
                if let Err(e) = res {
                    warn!("console: {e}");
                }
            }
            info!("console: stdin closed");
        })
        .context("spawning console reader")?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    info!("tankrig v{}", env!("CARGO_PKG_VERSION"));

    // ── Store and config ──────────────────────────────────────
    let nvs = match &cli.store {
        Some(path) => NvsAdapter::open(path)
            .map_err(tankrig::Error::from)
            .with_context(|| format!("opening store {}", path.display()))?,
        None => NvsAdapter::new(),
    };
    let config = match nvs.load() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("stored config unusable ({e}), using defaults");
            RigConfig::default()
        }
    };
    let config = cli.apply(config);
    nvs.save(&config)
        .map_err(tankrig::Error::from)
        .context("rejecting command-line overrides")?;
    let store: Store = Rc::new(RefCell::new(nvs));

    // ── Rig ───────────────────────────────────────────────────
    let (mut rig, board) = build_rig(&config, &store);
    let clock = MonotonicClock::new();
    let mut sink = LogEventSink::new();
    rig.start(clock.now(), &mut sink);

    spawn_console_reader()?;
    info!(
        "ready: tick {} ms, process line {}",
        config.tick_interval_ms,
        if config.process_line_enabled { "enabled" } else { "disabled" }
    );

    // ── Cooperative loop ──────────────────────────────────────
    let tick = Duration::from_millis(config.tick_interval_ms as u64);
    loop {
        let now = clock.now();
        rig.tick(now, &mut sink);

        while let Some(line) = console::poll() {
            match console::parse(&line) {
                Ok(ConsoleCommand::Rig(cmd)) => {
                    let _ = rig.handle_command(cmd, &mut sink);
                }
                Ok(ConsoleCommand::Status) => sink.emit(&RigEvent::Status(rig.status(now))),
                Ok(ConsoleCommand::SetLevel { target, high }) => {
                    let pin = match target {
                        LevelTarget::Tank(TankId::A) => &board.level_a,
                        LevelTarget::Tank(TankId::B) => &board.level_b,
                        LevelTarget::Aqueduct => &board.level_aq,
                    };
                    pin.set_level(high);
                }
                Err(ConsoleError::Empty) => {}
                Err(e) => warn!("console: {e}: {:?}", line.as_str()),
            }
        }

        rig.poll_status(now, &mut sink);
        std::thread::sleep(tick);
    }
}
