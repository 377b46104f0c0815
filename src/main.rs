//! Console stand-in for the sensor board firmware loop.
//!
//! A reader thread forwards stdin lines while the main loop polls the game
//! on a fixed interval, as the hardware would. A line is either a command
//! (`reset`, `fen`, `fen <FEN>`, `board`, `sensors`, `quit`) or a sensor
//! script such as `-e2 +e4`.
//!
//! Start options: `--fen <FEN>` loads a position, `--mask <hex>` starts a
//! new game restricted to the given occupancy. Log output goes to stderr and
//! is filtered with `RUST_LOG`.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use log::{error, info, warn};

use sensor_chess::game_state::game_state::GameState;
use sensor_chess::sensors::sensor_script::replay_script;
use sensor_chess::utils::move_text::{move_line, status_text_padded};
use sensor_chess::utils::render_game_state::{render_game_state, render_occupancy};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let mut game_state = match initial_game_state(std::env::args().skip(1)) {
        Ok(game_state) => game_state,
        Err(message) => {
            error!("{message}");
            std::process::exit(2);
        }
    };
    let mut sensors = game_state.occupancy();

    let (line_tx, line_rx) = channel::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    print_status(&game_state);

    loop {
        match line_rx.recv_timeout(POLL_INTERVAL) {
            Ok(line) => {
                if !handle_line(line.trim(), &mut game_state, &mut sensors) {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                if game_state.evolve(sensors) {
                    print_status(&game_state);
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
        io::stdout().flush().ok();
    }

    info!("final position {}", game_state.get_fen());
}

/// Returns `false` when the loop should stop.
fn handle_line(line: &str, game_state: &mut GameState, sensors: &mut u64) -> bool {
    match line {
        "" => {}
        "quit" | "exit" => return false,
        "reset" => {
            *game_state = GameState::new_game_with_mask(*sensors);
            print_status(game_state);
        }
        "board" => println!("{}", render_game_state(game_state)),
        "sensors" => println!("{}", render_occupancy(*sensors)),
        "fen" => println!("{}", game_state.get_fen()),
        _ => {
            if let Some(fen) = line.strip_prefix("fen ") {
                match GameState::from_fen(fen) {
                    Ok(loaded) => {
                        *game_state = loaded;
                        *sensors = game_state.occupancy();
                        print_status(game_state);
                    }
                    Err(err) => warn!("ignoring FEN: {err}"),
                }
                return true;
            }

            match replay_script(game_state, *sensors, line) {
                Ok(outcome) => {
                    *sensors = outcome.sensors;
                    if outcome.committed_moves > 0 {
                        print_status(game_state);
                    }
                }
                Err(err) => warn!("ignoring input: {err}"),
            }
        }
    }
    true
}

fn print_status(game_state: &GameState) {
    println!(
        "{}| {}",
        status_text_padded(game_state.status),
        move_line(game_state)
    );
}

fn initial_game_state(mut args: impl Iterator<Item = String>) -> Result<GameState, String> {
    match args.next().as_deref() {
        None => Ok(GameState::new_game()),
        Some("--fen") => {
            let fen = args.collect::<Vec<_>>().join(" ");
            GameState::from_fen(&fen).map_err(|err| format!("invalid --fen: {err}"))
        }
        Some("--mask") => {
            let raw = args
                .next()
                .ok_or_else(|| "--mask needs a hexadecimal value".to_owned())?;
            let digits = raw.trim_start_matches("0x").trim_start_matches("0X");
            let mask = u64::from_str_radix(digits, 16)
                .map_err(|err| format!("invalid --mask {raw}: {err}"))?;
            Ok(GameState::new_game_with_mask(mask))
        }
        Some(other) => Err(format!("unknown argument: {other}")),
    }
}
