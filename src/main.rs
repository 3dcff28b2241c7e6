//! Dino Dash headless runner
//!
//! Plays levels on autopilot at the fixed tick rate and prints the final
//! snapshot as JSON.
//!
//! Usage: dino-dash [--seed N] [--level L] [--max-ticks N] [--store settings.json]

use std::env;

use dino_dash::consts::TICK_RATE;
use dino_dash::highscores::HighScoreStore;
use dino_dash::persistence::{JsonFileStore, MemoryStore, SettingsStore};
use dino_dash::session::{Session, SessionStatus};
use dino_dash::sim::{GameEvent, GamePhase, TickInput};

const DEFAULT_SEED: u64 = 12345;
const DEFAULT_MAX_TICKS: u64 = 60 * 60 * 5;

struct Options {
    seed: u64,
    level: u32,
    max_ticks: u64,
    store: Option<String>,
}

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .skip_while(|a| a.as_str() != name)
        .nth(1)
        .map(String::as_str)
}

fn parse_flag<T: std::str::FromStr>(args: &[String], name: &str, default: T) -> T {
    match flag(args, name) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid {} value {:?}", name, raw);
            default
        }),
        None => default,
    }
}

fn parse_options() -> Options {
    let args: Vec<String> = env::args().collect();
    Options {
        seed: parse_flag(&args, "--seed", DEFAULT_SEED),
        level: parse_flag(&args, "--level", 1),
        max_ticks: parse_flag(&args, "--max-ticks", DEFAULT_MAX_TICKS),
        store: flag(&args, "--store").map(str::to_string),
    }
}

/// Play until the session finishes, the player loses, or the tick limit hits
fn run<S: SettingsStore + HighScoreStore>(session: &mut Session<S>, max_ticks: u64) {
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    for _ in 0..max_ticks {
        session.tick(&input);
        for event in &session.state().events {
            match event {
                GameEvent::LevelComplete | GameEvent::GameOver | GameEvent::NewHighScore { .. } => {
                    log::info!("{:?}", event)
                }
                _ => log::debug!("{:?}", event),
            }
        }

        match session.state().phase {
            GamePhase::LevelComplete => {
                if !session.advance_level() {
                    break;
                }
            }
            GamePhase::GameOver => break,
            GamePhase::Playing | GamePhase::Paused => {}
        }
    }

    let state = session.state();
    log::info!(
        "Stopped on level {} after {} ticks ({:.1}s), score {}, best {}",
        state.level,
        state.time_ticks,
        state.time_ticks as f64 / TICK_RATE,
        state.score_points(),
        session.store().high_score()
    );
    if session.status() == SessionStatus::Finished {
        log::info!("All levels cleared");
    }

    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Failed to encode snapshot: {}", err),
    }
}

fn main() {
    env_logger::init();
    let options = parse_options();
    log::info!("Dino Dash (headless) starting with seed {}", options.seed);

    match options.store {
        Some(path) => {
            let store = JsonFileStore::load_or_default(&path);
            let mut session = Session::new(store, options.seed, options.level);
            run(&mut session, options.max_ticks);
            if let Err(err) = session.store().save() {
                log::warn!("Could not save {}: {}", path, err);
            }
        }
        None => {
            let mut session = Session::new(MemoryStore::new(), options.seed, options.level);
            run(&mut session, options.max_ticks);
        }
    }
}
