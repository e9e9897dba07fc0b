use crate::{BoardReason, Constants, GameState, PilotId, PilotState};

/// Boarding range grows with the boarder's own sprite size.
pub(crate) fn within_board_distance(
    pilot: &PilotState,
    target: &PilotState,
    constants: &Constants,
) -> bool {
    pilot.position.distance(target.position) <= pilot.size * constants.board_distance_factor
}

pub(crate) fn within_board_speed(
    pilot: &PilotState,
    target: &PilotState,
    constants: &Constants,
) -> bool {
    let max = constants.board_max_relative_speed;
    pilot.velocity.distance_squared(target.velocity) <= max * max
}

/// Why `pilot_id` can or cannot board its current target.
///
/// Checks run in a fixed order and the first failure wins: target, self,
/// not-boardable, already-boarded, not-disabled, distance, speed. The pilot's
/// own `boarding` flag is not consulted here.
pub fn can_board(state: &GameState, pilot_id: &PilotId, constants: &Constants) -> BoardReason {
    let Some(pilot) = state.pilots.get(pilot_id) else {
        return BoardReason::NoTarget;
    };
    let Some(target) = pilot
        .target
        .as_ref()
        .and_then(|target_id| state.pilots.get(target_id))
    else {
        return BoardReason::NoTarget;
    };
    check_pair(pilot, target, constants)
}

pub(crate) fn check_pair(
    pilot: &PilotState,
    target: &PilotState,
    constants: &Constants,
) -> BoardReason {
    if target.id == pilot.id {
        BoardReason::NoTarget
    } else if target.flags.no_board {
        BoardReason::NotBoardable
    } else if target.flags.boarded {
        BoardReason::AlreadyBoarded
    } else if !target.flags.disabled && !target.flags.boardable {
        BoardReason::NotDisabled
    } else if !within_board_distance(pilot, target, constants) {
        BoardReason::TooFar
    } else if !within_board_speed(pilot, target, constants) {
        BoardReason::TooFast
    } else {
        BoardReason::CanBoard
    }
}
