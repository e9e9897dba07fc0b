//! Loot transfer rules applied after a successful boarding.
//!
//! Each category handler re-checks availability on its own and reports a
//! shortfall as a `LootOutcome` instead of failing, so one empty category
//! never stops the others.

use crate::pilot::{
    ammo_capacity, ammo_count, cargo_add, cargo_free, cargo_remove, cargo_used, refresh_mass,
    refresh_weapons, slot_add_ammo, slot_remove_ammo,
};
use crate::{Constants, GameContent, GameState, LootCategory, LootOutcome, OutfitId, PilotId, PilotState};

/// Run `f` with mutable access to two distinct pilots. Returns `None` if the
/// ids are equal or either pilot does not resolve.
pub(crate) fn with_pair<R>(
    state: &mut GameState,
    actor_id: &PilotId,
    target_id: &PilotId,
    f: impl FnOnce(&mut PilotState, &mut PilotState) -> R,
) -> Option<R> {
    if actor_id == target_id {
        return None;
    }
    let mut target = state.pilots.remove(target_id)?;
    let result = state
        .pilots
        .get_mut(actor_id)
        .map(|actor| f(actor, &mut target));
    state.pilots.insert(target_id.clone(), target);
    result
}

/// Categories the target actually carries, in picker order.
pub fn lootable_categories(target: &PilotState) -> Vec<LootCategory> {
    LootCategory::ALL
        .into_iter()
        .filter(|category| match category {
            LootCategory::Credits => target.credits > 0,
            LootCategory::Cargo => cargo_used(target) > 0,
            LootCategory::Fuel => target.fuel > 0.0,
            LootCategory::Ammo => ammo_count(target) > 0,
        })
        .collect()
}

/// Apply each selected category in order. Duplicates run again and find
/// nothing left.
pub fn apply_loot(
    actor: &mut PilotState,
    target: &mut PilotState,
    selected: &[LootCategory],
    content: &GameContent,
) -> Vec<LootOutcome> {
    selected
        .iter()
        .map(|category| match category {
            LootCategory::Credits => steal_credits(actor, target),
            LootCategory::Cargo => steal_cargo(actor, target, content),
            LootCategory::Fuel => steal_fuel(actor, target),
            LootCategory::Ammo => steal_ammo(actor, target, content),
        })
        .collect()
}

pub fn steal_credits(actor: &mut PilotState, target: &mut PilotState) -> LootOutcome {
    if target.credits == 0 {
        return LootOutcome::NothingToSteal(LootCategory::Credits);
    }
    let amount = target.credits;
    actor.credits = actor.credits.saturating_add(amount);
    target.credits = 0;
    LootOutcome::Credits { amount }
}

/// Move cargo lot by lot from the front of the target's manifest until it is
/// empty or the boarder's hold stops accepting units. Empty lots are dropped
/// first so they never end the walk early.
pub fn steal_cargo(
    actor: &mut PilotState,
    target: &mut PilotState,
    content: &GameContent,
) -> LootOutcome {
    target.cargo.retain(|lot| lot.quantity > 0);
    if target.cargo.is_empty() {
        return LootOutcome::NothingToSteal(LootCategory::Cargo);
    }
    if cargo_free(actor) == 0 {
        return LootOutcome::NoRoom(LootCategory::Cargo);
    }

    let mut units = 0;
    while let Some(lot) = target.cargo.first().cloned() {
        let added = cargo_add(actor, &lot.commodity, lot.quantity);
        cargo_remove(target, &lot.commodity, added);
        units += added;
        if added == 0 {
            break;
        }
    }

    refresh_mass(actor, content);
    refresh_mass(target, content);
    LootOutcome::Cargo { units }
}

/// Take all the target's fuel; whatever the boarder's tank cannot hold goes back.
pub fn steal_fuel(actor: &mut PilotState, target: &mut PilotState) -> LootOutcome {
    if target.fuel <= 0.0 {
        return LootOutcome::NothingToSteal(LootCategory::Fuel);
    }
    if actor.fuel >= actor.fuel_max {
        return LootOutcome::NoRoom(LootCategory::Fuel);
    }

    let before = actor.fuel;
    actor.fuel += target.fuel;
    target.fuel = 0.0;
    if actor.fuel > actor.fuel_max {
        target.fuel = actor.fuel - actor.fuel_max;
        actor.fuel = actor.fuel_max;
    }
    LootOutcome::Fuel {
        amount: actor.fuel - before,
    }
}

/// Move rounds from target launchers into boarder launchers of the same ammo
/// type. Target slots are walked in order, and for each one the boarder's
/// slots are filled in order, so one boarder slot may be topped up from
/// several target slots.
pub fn steal_ammo(
    actor: &mut PilotState,
    target: &mut PilotState,
    content: &GameContent,
) -> LootOutcome {
    if ammo_count(target) == 0 {
        return LootOutcome::NothingToSteal(LootCategory::Ammo);
    }
    let capacity = ammo_capacity(actor);
    let loaded = ammo_count(actor);
    if loaded >= capacity {
        return LootOutcome::NoRoom(LootCategory::Ammo);
    }

    let mut room = capacity - loaded;
    let mut transfers: Vec<(OutfitId, u32)> = Vec::new();
    for target_slot in target.weapons.iter_mut().filter(|slot| slot.launcher) {
        if room == 0 {
            break;
        }
        let Some(load) = target_slot.ammo.clone() else {
            continue;
        };
        let mut left = load.quantity;
        for actor_slot in actor.weapons.iter_mut() {
            if left == 0 || room == 0 {
                break;
            }
            let added = slot_add_ammo(actor_slot, &load.ammo_type, left.min(room));
            if added == 0 {
                continue;
            }
            slot_remove_ammo(target_slot, added);
            left -= added;
            room -= added;
            match transfers.iter_mut().find(|(ammo_type, _)| *ammo_type == load.ammo_type) {
                Some((_, total)) => *total += added,
                None => transfers.push((load.ammo_type.clone(), added)),
            }
        }
    }

    refresh_mass(actor, content);
    refresh_weapons(actor);
    refresh_mass(target, content);
    refresh_weapons(target);
    LootOutcome::Ammo { transfers }
}

/// Appraised value of a ship: hull plus installed outfits.
pub fn pilot_worth(pilot: &PilotState) -> u64 {
    pilot.hull_value + pilot.weapons.iter().map(|slot| slot.value).sum::<u64>()
}

/// NPC boarding payout: the lesser of a fraction of the target's worth and
/// its actual balance. Returns credits moved.
pub fn plunder_credits(actor: &mut PilotState, target: &mut PilotState, constants: &Constants) -> u64 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let share = (constants.npc_plunder_fraction * pilot_worth(target) as f64).floor() as u64;
    let amount = share.min(target.credits);
    actor.credits = actor.credits.saturating_add(amount);
    target.credits -= amount;
    amount
}
