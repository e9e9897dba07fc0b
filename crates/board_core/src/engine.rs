use rand::Rng;

use crate::commands::apply_commands;
use crate::coordinator::sweep_player_session;
use crate::hooks::BoardHooks;
use crate::session::update_boarding;
use crate::{CommandEnvelope, Event, EventEnvelope, EventLevel, GameContent, GameState, PilotId};

/// Advance the simulation by one tick.
///
/// Order of operations:
/// 1. Count down boarding stuns.
/// 2. Apply commands scheduled for this tick.
/// 3. Integrate pilot motion.
/// 4. Re-check, count down, and resolve boarding attempts.
/// 5. Increment tick counter.
///
/// Returns all events produced this tick.
pub fn tick(
    state: &mut GameState,
    commands: &[CommandEnvelope],
    content: &GameContent,
    hooks: &mut impl BoardHooks,
    rng: &mut impl Rng,
    event_level: EventLevel,
) -> Vec<EventEnvelope> {
    let mut events = Vec::new();

    // A stun applied by this tick's commands or boarding checks holds until the next tick.
    advance_stuns(state, content, &mut events);
    apply_commands(state, commands, content, hooks, rng, &mut events);
    advance_motion(state, content);
    advance_boarding(state, content, rng, event_level, &mut events);

    state.meta.tick += 1;
    events
}

fn advance_motion(state: &mut GameState, content: &GameContent) {
    let dt = content.constants.tick_seconds;
    for pilot in state.pilots.values_mut() {
        pilot.position.x += pilot.velocity.x * dt;
        pilot.position.y += pilot.velocity.y * dt;
    }
}

fn advance_boarding(
    state: &mut GameState,
    content: &GameContent,
    rng: &mut impl Rng,
    event_level: EventLevel,
    events: &mut Vec<EventEnvelope>,
) {
    sweep_player_session(state, events);

    // Sorted for determinism: resolution order decides who draws which rolls.
    let mut boarders: Vec<PilotId> = state
        .pilots
        .values()
        .filter(|pilot| pilot.flags.boarding)
        .map(|pilot| pilot.id.clone())
        .collect();
    boarders.sort_by(|a, b| a.0.cmp(&b.0));

    for pilot_id in boarders {
        update_boarding(state, &pilot_id, content, rng, event_level, events);
    }
}

fn advance_stuns(state: &mut GameState, content: &GameContent, events: &mut Vec<EventEnvelope>) {
    let dt = content.constants.tick_seconds;
    let current_tick = state.meta.tick;

    let mut recovered: Vec<PilotId> = Vec::new();
    for pilot in state.pilots.values_mut() {
        if pilot.stun_timer <= 0.0 {
            continue;
        }
        pilot.stun_timer -= dt;
        if pilot.stun_timer <= 0.0 {
            pilot.stun_timer = 0.0;
            pilot.flags.disabled = false;
            recovered.push(pilot.id.clone());
        }
    }
    recovered.sort_by(|a, b| a.0.cmp(&b.0));

    for pilot_id in recovered {
        events.push(crate::emit(
            &mut state.counters,
            current_tick,
            Event::StunExpired { pilot_id },
        ));
    }
}
