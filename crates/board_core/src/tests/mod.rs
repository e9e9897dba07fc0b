use super::*;
use crate::test_fixtures::{
    base_content, base_state, crew, make_rng, npc_principal, pilot, player_command, player_id,
    player_principal, target_id,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

mod loot;
mod steal;

// --- Shared test helpers ------------------------------------------------

fn test_content() -> GameContent {
    base_content()
}

fn test_state(content: &GameContent) -> GameState {
    base_state(content)
}

/// Steal roll always beats a zero threshold.
fn certain_success(content: &mut GameContent) {
    content.constants.steal_crew_scale = 0.0;
}

/// Threshold above 1 so no draw can beat it.
fn certain_failure(content: &mut GameContent, self_destruct: bool) {
    content.constants.steal_crew_scale = 4.0;
    content.constants.self_destruct_chance = if self_destruct { 1.0 } else { 0.0 };
}

fn raider_id() -> PilotId {
    PilotId("ship_raider".to_string())
}

/// NPC boarder parked next to the base target.
fn add_raider(state: &mut GameState) -> PilotId {
    let mut raider = pilot("ship_raider");
    raider.crew = crew(5);
    raider.credits = 10;
    raider.position = Vec2::new(5.0, 0.0);
    raider.target = Some(target_id());
    let id = raider.id.clone();
    state.pilots.insert(id.clone(), raider);
    id
}

fn pilot_ref<'a>(state: &'a GameState, id: &PilotId) -> &'a PilotState {
    &state.pilots[id]
}

fn pilot_mut<'a>(state: &'a mut GameState, id: &PilotId) -> &'a mut PilotState {
    state.pilots.get_mut(id).unwrap()
}

fn session_of(state: &GameState) -> &BoardingSession {
    &state.player.as_ref().unwrap().session
}

fn labels(categories: &[LootCategory]) -> Vec<String> {
    categories.iter().map(|c| c.label().to_string()).collect()
}

fn count_events(events: &[EventEnvelope], pred: impl Fn(&Event) -> bool) -> usize {
    events.iter().filter(|e| pred(&e.event)).count()
}

/// Drive the player through board, confirm, and the countdown via `tick`.
/// Returns every event emitted along the way.
fn run_player_boarding(
    state: &mut GameState,
    content: &GameContent,
    selected: &[LootCategory],
    rng: &mut ChaCha8Rng,
) -> Vec<EventEnvelope> {
    let mut log = Vec::new();
    let board = player_command(state, Command::Board {
        pilot_id: player_id(),
    });
    log.extend(tick(state, &[board], content, &mut NoHooks, rng, EventLevel::Normal));

    let confirm = player_command(state, Command::ConfirmLoot {
        selected: labels(selected),
    });
    log.extend(tick(state, &[confirm], content, &mut NoHooks, rng, EventLevel::Normal));

    for _ in 0..20 {
        if !pilot_ref(state, &player_id()).flags.boarding {
            break;
        }
        log.extend(tick(state, &[], content, &mut NoHooks, rng, EventLevel::Normal));
    }
    log
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
