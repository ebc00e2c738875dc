//! Power Mower entry point
//!
//! Headless driver: plays rounds with the autopilot and reports each final
//! score. A graphical front end drives the same `tick` loop and reads the
//! same snapshots and events.

use std::env;
use std::path::PathBuf;

use power_mower::Tuning;
use power_mower::consts::*;
use power_mower::sim::{GameEvent, GameState, Snapshot, TickInput, tick};

struct CliArgs {
    seed: u64,
    rounds: u32,
    max_ticks: u64,
    tuning: Option<PathBuf>,
    json: bool,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = env::args().collect();
    let mut cli = CliArgs {
        seed: 12345,
        rounds: 1,
        max_ticks: 60 * 60 * 10,
        tuning: None,
        json: false,
    };

    let mut i = 1;
    while i < args.len() {
        if args[i] == "--seed" && i + 1 < args.len() {
            cli.seed = args[i + 1].parse().unwrap_or(cli.seed);
            i += 2;
        } else if args[i] == "--rounds" && i + 1 < args.len() {
            cli.rounds = args[i + 1].parse().unwrap_or(cli.rounds).max(1);
            i += 2;
        } else if args[i] == "--max-ticks" && i + 1 < args.len() {
            cli.max_ticks = args[i + 1].parse().unwrap_or(cli.max_ticks);
            i += 2;
        } else if args[i] == "--tuning" && i + 1 < args.len() {
            cli.tuning = Some(PathBuf::from(&args[i + 1]));
            i += 2;
        } else if args[i] == "--json" {
            cli.json = true;
            i += 1;
        } else {
            log::warn!("Ignoring unknown argument: {}", args[i]);
            i += 1;
        }
    }
    cli
}

/// Fixed-step driver fed with variable frame times
struct Game {
    state: GameState,
    accumulator: f32,
    input: TickInput,
}

impl Game {
    fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            state: GameState::with_tuning(seed, tuning),
            accumulator: 0.0,
            input: TickInput {
                intents: Vec::new(),
                autopilot: true,
            },
        }
    }

    /// Run as many simulation ticks as the frame time covers
    fn update(&mut self, frame_dt: f32) -> Vec<GameEvent> {
        self.accumulator += frame_dt.min(MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        self.state.drain_events()
    }
}

fn main() {
    env_logger::init();
    let cli = parse_args();
    log::info!("Power Mower (headless) starting...");

    let tuning = match &cli.tuning {
        Some(path) => Tuning::load(path),
        None => Tuning::default(),
    };
    let mut game = Game::new(cli.seed, tuning);

    let mut finished = 0;
    let mut ticks = 0u64;
    while finished < cli.rounds && ticks < cli.max_ticks {
        for event in game.update(SIM_DT) {
            match event {
                GameEvent::TierChanged { tier } => log::debug!("Tier {}", tier),
                GameEvent::RoundEnded { final_score } => {
                    finished += 1;
                    println!("Round {}: final score {}", finished, final_score);
                }
                _ => {}
            }
        }
        ticks += 1;
    }

    if finished < cli.rounds {
        log::warn!(
            "Stopped after {} ticks with {} of {} rounds finished (score so far {})",
            ticks,
            finished,
            cli.rounds,
            game.state.score()
        );
    }

    if cli.json {
        match serde_json::to_string_pretty(&Snapshot::capture(&game.state)) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Could not serialize snapshot: {}", e),
        }
    }
}
