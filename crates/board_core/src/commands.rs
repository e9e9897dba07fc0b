use rand::Rng;

use crate::coordinator::{cancel_loot, confirm_loot, player_board, request_unboard};
use crate::hooks::BoardHooks;
use crate::session::{cancel_boarding, is_player, request_board};
use crate::{Command, CommandEnvelope, GameContent, GameState, PilotId, PrincipalId};

/// Pilot-control commands are only honoured from the pilot's owner.
fn owned_by(state: &GameState, pilot_id: &PilotId, issuer: &PrincipalId) -> bool {
    state
        .pilots
        .get(pilot_id)
        .is_some_and(|pilot| &pilot.owner == issuer)
}

fn player_owned_by(state: &GameState, issuer: &PrincipalId) -> bool {
    state
        .player
        .as_ref()
        .is_some_and(|player| owned_by(state, &player.pilot_id, issuer))
}

pub(crate) fn apply_commands(
    state: &mut GameState,
    commands: &[CommandEnvelope],
    content: &GameContent,
    hooks: &mut impl BoardHooks,
    rng: &mut impl Rng,
    events: &mut Vec<crate::EventEnvelope>,
) {
    let current_tick = state.meta.tick;

    for envelope in commands {
        if envelope.execute_at_tick != current_tick {
            continue;
        }
        let issuer = &envelope.issued_by;
        match &envelope.command {
            Command::SetTarget { pilot_id, target } => {
                if !owned_by(state, pilot_id, issuer) {
                    continue;
                }
                if let Some(pilot) = state.pilots.get_mut(pilot_id) {
                    pilot.target.clone_from(target);
                }
            }
            Command::SetVelocity { pilot_id, velocity } => {
                if !owned_by(state, pilot_id, issuer) {
                    continue;
                }
                if let Some(pilot) = state.pilots.get_mut(pilot_id) {
                    pilot.velocity = *velocity;
                }
            }
            Command::SetDisabled { pilot_id, disabled } => {
                if let Some(pilot) = state.pilots.get_mut(pilot_id) {
                    pilot.flags.disabled = *disabled;
                }
            }
            Command::Board { pilot_id } => {
                if !owned_by(state, pilot_id, issuer) {
                    continue;
                }
                if is_player(state, pilot_id) {
                    player_board(state, content, hooks, rng, events);
                } else {
                    request_board(state, pilot_id, content, hooks, events);
                }
            }
            Command::ConfirmLoot { selected } => {
                if player_owned_by(state, issuer) {
                    confirm_loot(state, content, selected, events);
                }
            }
            Command::CancelLoot => {
                if player_owned_by(state, issuer) {
                    cancel_loot(state, events);
                }
            }
            Command::Unboard => {
                request_unboard(state);
            }
            Command::CancelBoarding { pilot_id, reason } => {
                if !owned_by(state, pilot_id, issuer) {
                    continue;
                }
                cancel_boarding(state, pilot_id, *reason, content, events);
            }
        }
    }
}
