//! Boarding state machine shared by every pilot.
//!
//! A pilot moves `Idle → Requested → Active → Resolving → Idle`, or drops from
//! `Active` back to `Idle` when a per-tick eligibility re-check fails or an
//! external cancellation arrives. Each operation returns the transition it
//! took so callers never have to infer it from flags after the fact.

use rand::Rng;

use crate::eligibility::can_board;
use crate::hooks::{BoardHooks, HookVerdict};
use crate::loot::{apply_loot, plunder_credits, with_pair};
use crate::steal::{resolve_steal, StealAttempt};
use crate::timer::board_time;
use crate::{
    BoardError, BoardPhase, BoardReason, BoardingSession, Event, EventEnvelope, EventLevel,
    GameContent, GameState, LootOutcome, PilotId, StealOutcome,
};

#[derive(Debug, Clone, PartialEq)]
pub enum BoardTransition {
    /// Nothing to do for this pilot.
    Idle,
    Refused(BoardReason),
    /// A hook or forced unboard closed the attempt.
    Withdrawn,
    /// The target was the player's own escort and went straight into the bay.
    Recovered { escort: PilotId },
    /// Player only: the loot picker is open with these categories.
    AwaitingLoot {
        target: PilotId,
        available: Vec<crate::LootCategory>,
    },
    Started { target: PilotId, duration_secs: f64 },
    Counting { remaining_secs: f64 },
    Cancelled { reason: BoardReason, stunned: bool },
    Resolved(Resolution),
    /// The timer ran out but the attempt could not resolve.
    Fizzled(BoardError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub target: PilotId,
    pub steal: StealAttempt,
    pub loot: Vec<LootOutcome>,
    /// Credits skimmed by an NPC boarder.
    pub plundered: Option<u64>,
}

pub(crate) fn is_player(state: &GameState, pilot_id: &PilotId) -> bool {
    state
        .player
        .as_ref()
        .is_some_and(|player| &player.pilot_id == pilot_id)
}

/// The player's session, if `pilot_id` is the player.
pub(crate) fn player_session_mut<'a>(
    state: &'a mut GameState,
    pilot_id: &PilotId,
) -> Option<&'a mut BoardingSession> {
    state
        .player
        .as_mut()
        .filter(|player| &player.pilot_id == pilot_id)
        .map(|player| &mut player.session)
}

/// Close the player's session, telling the picker to go away if it was open.
pub(crate) fn release_session(
    state: &mut GameState,
    pilot_id: &PilotId,
    events: &mut Vec<EventEnvelope>,
) {
    let tick = state.meta.tick;
    let Some(session) = player_session_mut(state, pilot_id) else {
        return;
    };
    let picker_was_open = session.picker_open();
    session.clear();
    if picker_was_open {
        events.push(crate::emit(
            &mut state.counters,
            tick,
            Event::LootPickerClosed {
                pilot_id: pilot_id.clone(),
            },
        ));
    }
}

pub(crate) fn refuse(
    state: &mut GameState,
    pilot_id: &PilotId,
    reason: BoardReason,
    events: &mut Vec<EventEnvelope>,
) -> BoardTransition {
    tracing::debug!(pilot = %pilot_id, ?reason, "boarding refused");
    let tick = state.meta.tick;
    events.push(crate::emit(
        &mut state.counters,
        tick,
        Event::BoardRefused {
            pilot_id: pilot_id.clone(),
            reason,
        },
    ));
    BoardTransition::Refused(reason)
}

pub(crate) fn anomaly(
    state: &mut GameState,
    pilot_id: &PilotId,
    error: &BoardError,
    events: &mut Vec<EventEnvelope>,
) {
    tracing::warn!(pilot = %pilot_id, %error, "boarding anomaly");
    let tick = state.meta.tick;
    events.push(crate::emit(
        &mut state.counters,
        tick,
        Event::BoardingAnomaly {
            pilot_id: pilot_id.clone(),
            detail: error.to_string(),
        },
    ));
}

/// Notify hooks that `pilot_id` is about to board `target`. Returns whether
/// the attempt may continue.
pub(crate) fn fire_board_hook(
    state: &mut GameState,
    pilot_id: &PilotId,
    target: &PilotId,
    session: Option<uuid::Uuid>,
    hooks: &mut impl BoardHooks,
    events: &mut Vec<EventEnvelope>,
) -> HookVerdict {
    let tick = state.meta.tick;
    events.push(crate::emit(
        &mut state.counters,
        tick,
        Event::BoardRequested {
            pilot_id: pilot_id.clone(),
            target: target.clone(),
            session,
        },
    ));
    hooks.on_board(pilot_id, target)
}

/// Non-interactive request: gate, fire hooks, start the timer.
pub fn request_board(
    state: &mut GameState,
    pilot_id: &PilotId,
    content: &GameContent,
    hooks: &mut impl BoardHooks,
    events: &mut Vec<EventEnvelope>,
) -> BoardTransition {
    let Some(pilot) = state.pilots.get(pilot_id) else {
        return BoardTransition::Idle;
    };
    if pilot.flags.boarding {
        return refuse(state, pilot_id, BoardReason::AlreadyBoarding, events);
    }
    let reason = can_board(state, pilot_id, &content.constants);
    if !reason.is_ok() {
        return refuse(state, pilot_id, reason, events);
    }
    let Some(target) = state.pilots.get(pilot_id).and_then(|p| p.target.clone()) else {
        return refuse(state, pilot_id, BoardReason::NoTarget, events);
    };

    if fire_board_hook(state, pilot_id, &target, None, hooks, events) == HookVerdict::Unboard {
        return withdraw(state, pilot_id, events);
    }
    begin_boarding(state, pilot_id, content, events)
}

/// `Requested → Active`: set the boarding flag and arm the timer.
pub fn begin_boarding(
    state: &mut GameState,
    pilot_id: &PilotId,
    content: &GameContent,
    events: &mut Vec<EventEnvelope>,
) -> BoardTransition {
    let constants = &content.constants;
    let reason = can_board(state, pilot_id, constants);
    if !reason.is_ok() {
        return refuse(state, pilot_id, reason, events);
    }
    if state.pilots.get(pilot_id).is_some_and(|p| p.flags.boarding) {
        return refuse(state, pilot_id, BoardReason::AlreadyBoarding, events);
    }
    let Some(duration_secs) = board_time(state, pilot_id, constants) else {
        return refuse(state, pilot_id, BoardReason::NoTarget, events);
    };
    let Some(pilot) = state.pilots.get_mut(pilot_id) else {
        return BoardTransition::Idle;
    };
    let Some(target) = pilot.target.clone() else {
        return BoardTransition::Idle;
    };
    pilot.flags.boarding = true;
    pilot.board_timer = duration_secs;

    if let Some(session) = player_session_mut(state, pilot_id) {
        session.phase = BoardPhase::Active;
    }

    tracing::debug!(pilot = %pilot_id, %target, duration_secs, "boarding started");
    let tick = state.meta.tick;
    events.push(crate::emit(
        &mut state.counters,
        tick,
        Event::BoardingStarted {
            pilot_id: pilot_id.clone(),
            target: target.clone(),
            duration_secs,
        },
    ));
    BoardTransition::Started {
        target,
        duration_secs,
    }
}

/// Per-tick step for a boarding pilot: re-check, count down, resolve.
pub fn update_boarding(
    state: &mut GameState,
    pilot_id: &PilotId,
    content: &GameContent,
    rng: &mut impl Rng,
    event_level: EventLevel,
    events: &mut Vec<EventEnvelope>,
) -> BoardTransition {
    if !state.pilots.get(pilot_id).is_some_and(|p| p.flags.boarding) {
        return BoardTransition::Idle;
    }

    let reason = can_board(state, pilot_id, &content.constants);
    if !reason.is_ok() {
        return cancel_boarding(state, pilot_id, reason, content, events);
    }
    if state
        .player
        .as_ref()
        .is_some_and(|player| &player.pilot_id == pilot_id && player.session.cancel_requested)
    {
        return withdraw(state, pilot_id, events);
    }

    let Some(pilot) = state.pilots.get_mut(pilot_id) else {
        return BoardTransition::Idle;
    };
    pilot.board_timer -= content.constants.tick_seconds;
    if pilot.board_timer > 0.0 {
        return BoardTransition::Counting {
            remaining_secs: pilot.board_timer,
        };
    }
    complete_boarding(state, pilot_id, content, rng, event_level, events)
}

/// `Active → Idle` on a failed re-check or an external request.
///
/// A target that recovers and flies off stuns the boarder briefly, but only
/// once the timer is running: a player still at the picker is released
/// without a stun. Every other reason just drops the attempt. `CanBoard` is
/// not a reason to cancel and does nothing.
pub fn cancel_boarding(
    state: &mut GameState,
    pilot_id: &PilotId,
    reason: BoardReason,
    content: &GameContent,
    events: &mut Vec<EventEnvelope>,
) -> BoardTransition {
    if reason.is_ok() {
        return BoardTransition::Idle;
    }
    let session_open = state
        .player
        .as_ref()
        .is_some_and(|player| &player.pilot_id == pilot_id && player.session.is_open());
    let Some(pilot) = state.pilots.get_mut(pilot_id) else {
        return BoardTransition::Idle;
    };
    if !pilot.flags.boarding && !session_open {
        return BoardTransition::Idle;
    }

    let stunned = reason == BoardReason::NotDisabled && pilot.flags.boarding;
    if stunned {
        pilot.flags.disabled = true;
        pilot.stun_timer = content.constants.board_stun_secs;
    }
    pilot.board_timer = 0.0;
    pilot.flags.boarding = false;

    release_session(state, pilot_id, events);

    tracing::debug!(pilot = %pilot_id, ?reason, stunned, "boarding cancelled");
    let tick = state.meta.tick;
    events.push(crate::emit(
        &mut state.counters,
        tick,
        Event::BoardingCancelled {
            pilot_id: pilot_id.clone(),
            reason,
            stunned,
        },
    ));
    BoardTransition::Cancelled { reason, stunned }
}

/// Drop the attempt without a reason code and without a stun.
pub(crate) fn withdraw(
    state: &mut GameState,
    pilot_id: &PilotId,
    events: &mut Vec<EventEnvelope>,
) -> BoardTransition {
    if let Some(pilot) = state.pilots.get_mut(pilot_id) {
        pilot.flags.boarding = false;
        pilot.board_timer = 0.0;
    }
    release_session(state, pilot_id, events);

    tracing::debug!(pilot = %pilot_id, "boarding withdrawn");
    let tick = state.meta.tick;
    events.push(crate::emit(
        &mut state.counters,
        tick,
        Event::BoardWithdrawn {
            pilot_id: pilot_id.clone(),
        },
    ));
    BoardTransition::Withdrawn
}

/// `Active → Resolving → Idle`: roll the steal and hand out the loot.
///
/// The player takes what the session selected; any other boarder skims
/// credits. The player's session is released on every path out.
#[allow(clippy::too_many_lines)]
pub fn complete_boarding(
    state: &mut GameState,
    pilot_id: &PilotId,
    content: &GameContent,
    rng: &mut impl Rng,
    event_level: EventLevel,
    events: &mut Vec<EventEnvelope>,
) -> BoardTransition {
    let Some(pilot) = state.pilots.get_mut(pilot_id) else {
        return BoardTransition::Idle;
    };
    pilot.flags.boarding = false;
    pilot.board_timer = 0.0;
    let target_id = pilot.target.clone();

    let selected = match player_session_mut(state, pilot_id) {
        Some(session) => {
            session.phase = BoardPhase::Resolving;
            Some(session.loot.clone())
        }
        None => None,
    };

    let target_id = match target_id {
        Some(id) if state.pilots.contains_key(&id) => id,
        other => {
            let error = other.map_or_else(
                || BoardError::NoTarget(pilot_id.clone()),
                BoardError::MissingTarget,
            );
            anomaly(state, pilot_id, &error, events);
            release_session(state, pilot_id, events);
            return BoardTransition::Fizzled(error);
        }
    };
    // Only the player leaves a target marked; NPC raids can repeat.
    if let Some(target) = state.pilots.get_mut(&target_id).filter(|_| selected.is_some()) {
        target.flags.boarded = true;
    }

    let steal = resolve_steal(state, pilot_id, &content.constants, rng);
    let tick = state.meta.tick;
    if event_level == EventLevel::Debug {
        events.push(crate::emit(
            &mut state.counters,
            tick,
            Event::StealRoll {
                pilot_id: pilot_id.clone(),
                threshold: steal.threshold,
                rolled: steal.rolled,
            },
        ));
    }
    if let Some(amount) = steal.damage_dealt {
        events.push(crate::emit(
            &mut state.counters,
            tick,
            Event::PilotDamaged {
                pilot_id: target_id.clone(),
                attacker: pilot_id.clone(),
                amount,
            },
        ));
    }
    events.push(crate::emit(
        &mut state.counters,
        tick,
        Event::BoardingResolved {
            pilot_id: pilot_id.clone(),
            target: target_id.clone(),
            outcome: steal.outcome,
        },
    ));

    let mut loot = Vec::new();
    let mut plundered = None;
    if steal.outcome == StealOutcome::Success {
        if let Some(selected) = selected {
            loot = with_pair(state, pilot_id, &target_id, |actor, target| {
                apply_loot(actor, target, &selected, content)
            })
            .unwrap_or_default();
            for outcome in &loot {
                events.push(crate::emit(
                    &mut state.counters,
                    tick,
                    Event::LootTransferred {
                        pilot_id: pilot_id.clone(),
                        target: target_id.clone(),
                        outcome: outcome.clone(),
                    },
                ));
            }
        } else {
            let amount = with_pair(state, pilot_id, &target_id, |actor, target| {
                plunder_credits(actor, target, &content.constants)
            })
            .unwrap_or(0);
            events.push(crate::emit(
                &mut state.counters,
                tick,
                Event::CreditsPlundered {
                    pilot_id: pilot_id.clone(),
                    target: target_id.clone(),
                    amount,
                },
            ));
            plundered = Some(amount);
        }
    }

    release_session(state, pilot_id, events);
    tracing::debug!(pilot = %pilot_id, target = %target_id, outcome = ?steal.outcome, "boarding resolved");
    BoardTransition::Resolved(Resolution {
        target: target_id,
        steal,
        loot,
        plundered,
    })
}
