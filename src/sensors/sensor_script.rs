//! Text scripts of sensor events for replaying games without hardware.
//!
//! `-e2` lifts the piece on e2, `+e4` drops one on e4 and `_` polls without
//! any change. Whitespace between actions is optional, files are
//! case-insensitive and `#` starts a comment running to the end of the line.

use log::debug;

use crate::errors::ChessErrors;
use crate::game_state::{chess_types::Square, game_state::GameState};
use crate::utils::algebraic::algebraic_to_square;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorAction {
    Lift(Square),
    Place(Square),
    Idle,
}

impl SensorAction {
    /// Sensor mask after this action.
    #[inline]
    pub fn apply(self, sensors: u64) -> u64 {
        match self {
            SensorAction::Lift(square) => sensors & !(1u64 << square),
            SensorAction::Place(square) => sensors | (1u64 << square),
            SensorAction::Idle => sensors,
        }
    }
}

pub fn parse_sensor_script(script: &str) -> Result<Vec<SensorAction>, ChessErrors> {
    let mut actions = Vec::new();
    let mut chars = script.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '-' | '+' => {
                let name: String = chars.by_ref().take(2).collect::<String>().to_ascii_lowercase();
                let square = algebraic_to_square(&name)
                    .map_err(|_| ChessErrors::InvalidSensorSquare(name.clone()))?;
                actions.push(if ch == '+' {
                    SensorAction::Place(square)
                } else {
                    SensorAction::Lift(square)
                });
            }
            '_' => actions.push(SensorAction::Idle),
            '#' => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        break;
                    }
                }
            }
            ch if ch.is_whitespace() => {}
            other => return Err(ChessErrors::InvalidSensorAction(other)),
        }
    }

    Ok(actions)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayOutcome {
    /// Sensor mask after the last action.
    pub sensors: u64,
    pub committed_moves: usize,
}

/// Apply each scripted action to `sensors` and poll `game_state` after every one.
///
/// Nothing is replayed when the script fails to parse.
pub fn replay_script(
    game_state: &mut GameState,
    sensors: u64,
    script: &str,
) -> Result<ReplayOutcome, ChessErrors> {
    let actions = parse_sensor_script(script)?;
    let mut outcome = ReplayOutcome {
        sensors,
        committed_moves: 0,
    };

    for action in actions {
        outcome.sensors = action.apply(outcome.sensors);
        if game_state.evolve(outcome.sensors) {
            outcome.committed_moves += 1;
        }
    }

    debug!(
        "replayed script: {} moves committed, sensors {:#018x}",
        outcome.committed_moves, outcome.sensors
    );
    Ok(outcome)
}
