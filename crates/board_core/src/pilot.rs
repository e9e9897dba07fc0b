//! Pilot resource bookkeeping shared by the loot rules and the damage path.

use crate::{CommodityId, Damage, GameContent, OutfitId, PilotId, PilotState, WeaponSlot};

/// Units of cargo currently aboard.
pub fn cargo_used(pilot: &PilotState) -> u32 {
    pilot.cargo.iter().map(|lot| lot.quantity).sum()
}

pub fn cargo_free(pilot: &PilotState) -> u32 {
    pilot.cargo_capacity.saturating_sub(cargo_used(pilot))
}

/// Add up to `quantity` units, bounded by free capacity. Returns units added.
pub fn cargo_add(pilot: &mut PilotState, commodity: &CommodityId, quantity: u32) -> u32 {
    let added = quantity.min(cargo_free(pilot));
    if added == 0 {
        return 0;
    }
    if let Some(lot) = pilot.cargo.iter_mut().find(|lot| &lot.commodity == commodity) {
        lot.quantity += added;
    } else {
        pilot.cargo.push(crate::CargoLot {
            commodity: commodity.clone(),
            quantity: added,
        });
    }
    added
}

/// Remove up to `quantity` units, FIFO across lots of the commodity. Emptied lots
/// are dropped. Returns units removed.
pub fn cargo_remove(pilot: &mut PilotState, commodity: &CommodityId, quantity: u32) -> u32 {
    let mut remaining = quantity;
    for lot in pilot.cargo.iter_mut() {
        if remaining == 0 {
            break;
        }
        if &lot.commodity == commodity {
            let take = lot.quantity.min(remaining);
            lot.quantity -= take;
            remaining -= take;
        }
    }
    pilot.cargo.retain(|lot| lot.quantity > 0);
    quantity - remaining
}

fn launchers(pilot: &PilotState) -> impl Iterator<Item = &WeaponSlot> {
    pilot.weapons.iter().filter(|slot| slot.launcher)
}

/// Rounds loaded across all launcher slots.
pub fn ammo_count(pilot: &PilotState) -> u32 {
    launchers(pilot)
        .filter_map(|slot| slot.ammo.as_ref())
        .map(|load| load.quantity)
        .sum()
}

/// Total rounds all launcher slots can hold.
pub fn ammo_capacity(pilot: &PilotState) -> u32 {
    launchers(pilot).map(|slot| slot.ammo_capacity).sum()
}

/// Load up to `quantity` rounds of `ammo_type` into a launcher slot whose ammo
/// type matches. Returns rounds loaded.
pub fn slot_add_ammo(slot: &mut WeaponSlot, ammo_type: &OutfitId, quantity: u32) -> u32 {
    if !slot.launcher {
        return 0;
    }
    let capacity = slot.ammo_capacity;
    let Some(load) = slot.ammo.as_mut() else {
        return 0;
    };
    if &load.ammo_type != ammo_type {
        return 0;
    }
    let added = quantity.min(capacity.saturating_sub(load.quantity));
    load.quantity += added;
    added
}

/// Unload up to `quantity` rounds from a slot. Returns rounds removed.
pub fn slot_remove_ammo(slot: &mut WeaponSlot, quantity: u32) -> u32 {
    let Some(load) = slot.ammo.as_mut() else {
        return 0;
    };
    let removed = quantity.min(load.quantity);
    load.quantity -= removed;
    removed
}

/// A launcher can only fire with rounds loaded; other weapons are always armed.
pub fn refresh_weapons(pilot: &mut PilotState) {
    for slot in &mut pilot.weapons {
        slot.armed = !slot.launcher || slot.ammo.as_ref().is_some_and(|load| load.quantity > 0);
    }
}

/// Recompute derived mass: hull, cargo, and loaded ammunition.
///
/// Commodities or ammo types missing from content count as one tonne per unit.
pub fn refresh_mass(pilot: &mut PilotState, content: &GameContent) {
    let cargo_mass: f64 = pilot
        .cargo
        .iter()
        .map(|lot| {
            let per_unit = content
                .commodities
                .iter()
                .find(|def| def.id == lot.commodity)
                .map_or(1.0, |def| def.mass_per_unit);
            f64::from(lot.quantity) * per_unit
        })
        .sum();
    let ammo_mass: f64 = launchers(pilot)
        .filter_map(|slot| slot.ammo.as_ref())
        .map(|load| {
            let per_unit = content
                .ammo
                .iter()
                .find(|def| def.id == load.ammo_type)
                .map_or(1.0, |def| def.mass_per_unit);
            f64::from(load.quantity) * per_unit
        })
        .sum();
    pilot.mass = pilot.hull_mass + cargo_mass + ammo_mass;
}

/// Apply a hit attributed to `attacker`. Shields soak the non-penetrating
/// share first; the rest lands on armour, which floors at zero.
///
/// Returns the armour damage dealt.
pub fn take_damage(pilot: &mut PilotState, damage: &Damage, attacker: &PilotId) -> f64 {
    let penetrating = damage.amount * damage.penetration.clamp(0.0, 1.0);
    let soaked = damage.amount - penetrating;
    let absorbed = soaked.min(pilot.shield);
    pilot.shield -= absorbed;
    let to_armour = (penetrating + soaked - absorbed).min(pilot.armour);
    pilot.armour -= to_armour;
    pilot.last_attacker = Some(attacker.clone());
    to_armour
}
