//! Occupancy diffing between the board model and a sensor poll.

use log::warn;

use crate::game_state::chess_types::Square;
use crate::utils::algebraic::SquareName;

/// At most one vacated and one newly occupied square per poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SensorDelta {
    pub removed: Option<Square>,
    pub placed: Option<Square>,
}

impl SensorDelta {
    #[inline]
    pub const fn is_idle(self) -> bool {
        self.removed.is_none() && self.placed.is_none()
    }
}

/// Compare the model's occupancy with the sensed mask.
///
/// When several squares changed the same way, only the highest-indexed one
/// is reported; the rest remain pending for later polls.
pub fn diff_occupancy(occupancy: u64, sensors: u64) -> SensorDelta {
    let vacated = occupancy & !sensors;
    let filled = sensors & !occupancy;

    let delta = SensorDelta {
        removed: highest_square(vacated),
        placed: highest_square(filled),
    };

    if vacated.count_ones() > 1 || filled.count_ones() > 1 {
        warn!(
            "{} squares vacated and {} filled in one poll, keeping {:?} and {:?}",
            vacated.count_ones(),
            filled.count_ones(),
            delta.removed.map(|sq| SquareName(sq).to_string()),
            delta.placed.map(|sq| SquareName(sq).to_string()),
        );
    }

    delta
}

#[inline]
fn highest_square(mask: u64) -> Option<Square> {
    (mask != 0).then(|| (63 - mask.leading_zeros()) as Square)
}
