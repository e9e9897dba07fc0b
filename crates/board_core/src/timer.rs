use std::num::NonZeroU32;

use crate::{Constants, GameState, PilotId};

/// Seconds a boarding attempt takes.
///
/// A small crew boarding a large one takes long, a large crew boarding a small
/// one is quick: `exp(target_crew / actor_crew)`, clamped to the configured
/// bounds.
pub fn board_duration(actor_crew: NonZeroU32, target_crew: NonZeroU32, constants: &Constants) -> f64 {
    let ratio = f64::from(target_crew.get()) / f64::from(actor_crew.get());
    ratio
        .exp()
        .min(constants.board_time_max_secs)
        .max(constants.board_time_min_secs)
}

/// Boarding duration for `pilot_id` against its current target, or `None` if
/// either pilot does not resolve. `None` means no attempt should start.
pub fn board_time(state: &GameState, pilot_id: &PilotId, constants: &Constants) -> Option<f64> {
    let pilot = state.pilots.get(pilot_id)?;
    let target = state.pilots.get(pilot.target.as_ref()?)?;
    Some(board_duration(pilot.crew, target.crew, constants))
}
