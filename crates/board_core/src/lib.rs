//! `board_core`: deterministic boarding simulation tick.
//!
//! No IO, no network. All randomness via the passed-in Rng.

mod commands;
mod coordinator;
mod eligibility;
mod engine;
mod error;
mod hooks;
mod loot;
pub mod messages;
pub mod pilot;
mod session;
mod steal;
mod timer;
mod types;

pub use coordinator::{cancel_loot, confirm_loot, player_board, request_unboard};
pub use eligibility::can_board;
pub use engine::tick;
pub use error::BoardError;
pub use hooks::{BoardHooks, GuardedTargets, HookVerdict, NoHooks};
pub use loot::{
    apply_loot, lootable_categories, pilot_worth, plunder_credits, steal_ammo, steal_cargo,
    steal_credits, steal_fuel,
};
pub use session::{
    begin_boarding, cancel_boarding, complete_boarding, request_board, update_boarding,
    BoardTransition, Resolution,
};
pub use steal::{resolve_steal, steal_success_probability, steal_threshold, StealAttempt};
pub use timer::{board_duration, board_time};
pub use types::*;

#[cfg(any(test, feature = "test-support"))]
pub mod test_fixtures;

pub(crate) fn emit(counters: &mut Counters, tick: u64, event: Event) -> EventEnvelope {
    let id = EventId(format!("evt_{:06}", counters.next_event_id));
    counters.next_event_id += 1;
    EventEnvelope { id, tick, event }
}

/// Deterministic v4-format session id drawn from the simulation RNG.
pub(crate) fn new_session_id(rng: &mut impl rand::Rng) -> uuid::Uuid {
    let bytes: [u8; 16] = rng.gen();
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}

#[cfg(test)]
mod tests;
