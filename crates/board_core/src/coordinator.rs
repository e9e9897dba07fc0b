//! Player boarding flow.
//!
//! The player differs from other boarders in two ways: it picks what to loot
//! through an interactive picker before the timer starts, and boarding its own
//! escort docks the escort instead. Whatever way an attempt ends, the picker
//! is closed and the session is back to `Idle`.

use rand::Rng;

use crate::eligibility::{can_board, within_board_distance, within_board_speed};
use crate::hooks::{BoardHooks, HookVerdict};
use crate::loot::lootable_categories;
use crate::session::{
    anomaly, begin_boarding, cancel_boarding, fire_board_hook, refuse, release_session, withdraw,
    BoardTransition,
};
use crate::{
    BoardPhase, BoardReason, BoardingSession, Event, EventEnvelope, GameContent, GameState,
    LootCategory, LootList, PilotId,
};

fn player_id(state: &GameState) -> Option<PilotId> {
    state.player.as_ref().map(|player| player.pilot_id.clone())
}

fn session(state: &GameState) -> Option<&BoardingSession> {
    state.player.as_ref().map(|player| &player.session)
}

fn session_mut(state: &mut GameState) -> Option<&mut BoardingSession> {
    state.player.as_mut().map(|player| &mut player.session)
}

/// Player presses "board".
pub fn player_board(
    state: &mut GameState,
    content: &GameContent,
    hooks: &mut impl BoardHooks,
    rng: &mut impl Rng,
    events: &mut Vec<EventEnvelope>,
) -> BoardTransition {
    let Some(pilot_id) = player_id(state) else {
        return BoardTransition::Idle;
    };
    let Some(pilot) = state.pilots.get(&pilot_id) else {
        return BoardTransition::Idle;
    };
    if pilot.flags.boarding || session(state).is_some_and(BoardingSession::is_open) {
        return refuse(state, &pilot_id, BoardReason::AlreadyBoarding, events);
    }

    if let Some(escort) = recover_escort(state, &pilot_id, content) {
        tracing::debug!(pilot = %pilot_id, %escort, "escort recovered");
        let tick = state.meta.tick;
        events.push(crate::emit(
            &mut state.counters,
            tick,
            Event::EscortRecovered {
                pilot_id: pilot_id.clone(),
                escort: escort.clone(),
            },
        ));
        return BoardTransition::Recovered { escort };
    }

    let reason = can_board(state, &pilot_id, &content.constants);
    if !reason.is_ok() {
        return refuse(state, &pilot_id, reason, events);
    }
    let Some(target) = state.pilots.get(&pilot_id).and_then(|p| p.target.clone()) else {
        return refuse(state, &pilot_id, BoardReason::NoTarget, events);
    };

    let session_id = crate::new_session_id(rng);
    if let Some(session) = session_mut(state) {
        *session = BoardingSession {
            id: Some(session_id),
            phase: BoardPhase::Requested,
            target: Some(target.clone()),
            cancel_requested: false,
            loot: LootList::new(),
        };
    }

    let verdict = fire_board_hook(state, &pilot_id, &target, Some(session_id), hooks, events);
    let unboard_requested = session(state).is_some_and(|s| s.cancel_requested);
    if verdict == HookVerdict::Unboard || unboard_requested {
        // The picker never opened, so there is nothing to close.
        if let Some(session) = session_mut(state) {
            session.clear();
        }
        let tick = state.meta.tick;
        events.push(crate::emit(
            &mut state.counters,
            tick,
            Event::BoardWithdrawn {
                pilot_id: pilot_id.clone(),
            },
        ));
        return BoardTransition::Withdrawn;
    }

    let available = state
        .pilots
        .get(&target)
        .map(lootable_categories)
        .unwrap_or_default();
    let tick = state.meta.tick;
    events.push(crate::emit(
        &mut state.counters,
        tick,
        Event::LootPickerOpened {
            pilot_id,
            target: target.clone(),
            available: available.clone(),
        },
    ));
    BoardTransition::AwaitingLoot { target, available }
}

/// Dock the player's own escort if it is the current target and there is bay
/// room. The escort leaves the pilot map intact and rides in the bay.
fn recover_escort(
    state: &mut GameState,
    pilot_id: &PilotId,
    content: &GameContent,
) -> Option<PilotId> {
    let pilot = state.pilots.get(pilot_id)?;
    let target_id = pilot.target.clone()?;
    let target = state.pilots.get(&target_id)?;
    if target.parent.as_ref() != Some(pilot_id) || target_id == *pilot_id {
        return None;
    }
    let bay = pilot.fighter_bay.as_ref()?;
    if bay.docked.len() >= bay.capacity as usize {
        return None;
    }
    if !within_board_distance(pilot, target, &content.constants)
        || !within_board_speed(pilot, target, &content.constants)
    {
        return None;
    }

    let mut escort = state.pilots.remove(&target_id)?;
    escort.target = None;
    escort.flags.boarding = false;
    escort.board_timer = 0.0;
    match state.pilots.get_mut(pilot_id) {
        Some(pilot) => {
            pilot.target = None;
            if let Some(bay) = pilot.fighter_bay.as_mut() {
                bay.docked.push(escort);
            }
            Some(target_id)
        }
        None => {
            state.pilots.insert(target_id, escort);
            None
        }
    }
}

/// Picker "start boarding" with the labels the player moved across.
///
/// Unknown labels are reported and skipped. An empty selection is reported
/// and boarding still goes ahead, yielding nothing on success.
pub fn confirm_loot(
    state: &mut GameState,
    content: &GameContent,
    selected: &[String],
    events: &mut Vec<EventEnvelope>,
) -> BoardTransition {
    let Some(pilot_id) = player_id(state) else {
        return BoardTransition::Idle;
    };
    let Some(current) = session(state) else {
        return BoardTransition::Idle;
    };
    if !current.picker_open() {
        return BoardTransition::Idle;
    }
    if current.cancel_requested {
        return withdraw(state, &pilot_id, events);
    }

    let target = state
        .pilots
        .get(&pilot_id)
        .and_then(|p| p.target.clone())
        .filter(|id| state.pilots.contains_key(id));
    let Some(target) = target else {
        return cancel_boarding(state, &pilot_id, BoardReason::NoTarget, content, events);
    };

    let mut loot = LootList::new();
    for label in selected {
        match label.parse::<LootCategory>() {
            Ok(category) => loot.push(category),
            Err(error) => anomaly(state, &pilot_id, &error, events),
        }
    }

    let tick = state.meta.tick;
    if loot.is_empty() {
        events.push(crate::emit(
            &mut state.counters,
            tick,
            Event::LootSelectionEmpty {
                pilot_id: pilot_id.clone(),
            },
        ));
    }
    if let Some(session) = session_mut(state) {
        session.target = Some(target);
        session.loot = loot;
    }
    release_picker(state, &pilot_id, events);

    let transition = begin_boarding(state, &pilot_id, content, events);
    if !matches!(transition, BoardTransition::Started { .. }) {
        if let Some(session) = session_mut(state) {
            session.clear();
        }
    }
    transition
}

/// Close the picker without ending the session.
fn release_picker(state: &mut GameState, pilot_id: &PilotId, events: &mut Vec<EventEnvelope>) {
    let tick = state.meta.tick;
    events.push(crate::emit(
        &mut state.counters,
        tick,
        Event::LootPickerClosed {
            pilot_id: pilot_id.clone(),
        },
    ));
}

/// Picker cancel button.
pub fn cancel_loot(state: &mut GameState, events: &mut Vec<EventEnvelope>) -> BoardTransition {
    let Some(pilot_id) = player_id(state) else {
        return BoardTransition::Idle;
    };
    if !session(state).is_some_and(BoardingSession::picker_open) {
        return BoardTransition::Idle;
    }
    release_session(state, &pilot_id, events);
    let tick = state.meta.tick;
    events.push(crate::emit(
        &mut state.counters,
        tick,
        Event::BoardWithdrawn { pilot_id },
    ));
    BoardTransition::Withdrawn
}

/// Ask the player's open session to stop. Seen on confirmation and at the
/// next tick. Returns whether there was a session to stop.
pub fn request_unboard(state: &mut GameState) -> bool {
    match session_mut(state) {
        Some(session) if session.is_open() => {
            session.cancel_requested = true;
            true
        }
        _ => false,
    }
}

/// Per-tick sweep: an unboard requested while the picker is still open
/// closes it without waiting for the player.
pub(crate) fn sweep_player_session(
    state: &mut GameState,
    events: &mut Vec<EventEnvelope>,
) -> BoardTransition {
    let Some(pilot_id) = player_id(state) else {
        return BoardTransition::Idle;
    };
    let pending = session(state).is_some_and(|s| s.picker_open() && s.cancel_requested);
    if !pending {
        return BoardTransition::Idle;
    }
    withdraw(state, &pilot_id, events)
}
