use super::*;
use crate::pilot::{ammo_count, cargo_used};
use crate::test_fixtures::launcher;

fn seeker() -> OutfitId {
    OutfitId("ammo_seeker".to_string())
}

fn torpedo() -> OutfitId {
    OutfitId("ammo_torpedo".to_string())
}

fn pair(content: &GameContent) -> (PilotState, PilotState) {
    let state = test_state(content);
    (
        pilot_ref(&state, &player_id()).clone(),
        pilot_ref(&state, &target_id()).clone(),
    )
}

#[test]
fn test_credits_move_in_full_once() {
    let content = test_content();
    let (mut actor, mut target) = pair(&content);

    let outcomes = apply_loot(
        &mut actor,
        &mut target,
        &[LootCategory::Credits, LootCategory::Credits],
        &content,
    );
    assert_eq!(
        outcomes,
        vec![
            LootOutcome::Credits { amount: 1_000 },
            LootOutcome::NothingToSteal(LootCategory::Credits),
        ]
    );
    assert_eq!(actor.credits, 1_100);
    assert_eq!(target.credits, 0);
}

#[test]
fn test_cargo_transfer_conserves_units() {
    let content = test_content();
    let (mut actor, mut target) = pair(&content);
    actor.cargo_capacity = 4;
    let before = cargo_used(&actor) + cargo_used(&target);

    let outcome = steal_cargo(&mut actor, &mut target, &content);
    assert_eq!(outcome, LootOutcome::Cargo { units: 4 });
    assert_eq!(cargo_used(&target), 6);
    assert_eq!(cargo_used(&actor) + cargo_used(&target), before);

    assert_eq!(
        steal_cargo(&mut actor, &mut target, &content),
        LootOutcome::NoRoom(LootCategory::Cargo)
    );
}

#[test]
fn test_cargo_takes_every_lot_and_updates_mass() {
    let content = test_content();
    let (mut actor, mut target) = pair(&content);
    target.cargo.push(CargoLot {
        commodity: CommodityId("ore".to_string()),
        quantity: 5,
    });
    let actor_mass = actor.mass;

    let outcome = steal_cargo(&mut actor, &mut target, &content);
    assert_eq!(outcome, LootOutcome::Cargo { units: 15 });
    assert!(target.cargo.is_empty());
    assert_eq!(actor.cargo.len(), 2);
    // 10 food at 1.0 plus 5 ore at 2.0
    assert!(approx(actor.mass - actor_mass, 20.0));

    assert_eq!(
        steal_cargo(&mut actor, &mut target, &content),
        LootOutcome::NothingToSteal(LootCategory::Cargo)
    );
}

#[test]
fn test_fuel_overflow_returns_to_target() {
    let content = test_content();
    let (mut actor, mut target) = pair(&content);
    actor.fuel = 90.0;
    let total = actor.fuel + target.fuel;

    let LootOutcome::Fuel { amount } = steal_fuel(&mut actor, &mut target) else {
        panic!("expected a fuel transfer");
    };
    assert!(approx(amount, 10.0));
    assert!(approx(actor.fuel, actor.fuel_max));
    assert!(approx(target.fuel, 20.0));
    assert!(approx(actor.fuel + target.fuel, total));

    assert_eq!(
        steal_fuel(&mut actor, &mut target),
        LootOutcome::NoRoom(LootCategory::Fuel)
    );
}

#[test]
fn test_fuel_from_empty_tank() {
    let content = test_content();
    let (mut actor, mut target) = pair(&content);
    target.fuel = 0.0;
    assert_eq!(
        steal_fuel(&mut actor, &mut target),
        LootOutcome::NothingToSteal(LootCategory::Fuel)
    );
}

#[test]
fn test_ammo_only_moves_into_matching_launchers() {
    let content = test_content();
    let (mut actor, mut target) = pair(&content);
    actor.weapons.clear();
    actor.weapons.push(launcher("launcher_torpedo", "ammo_torpedo", 0, 5));

    let outcome = steal_ammo(&mut actor, &mut target, &content);
    assert_eq!(outcome, LootOutcome::Ammo { transfers: vec![] });
    assert_eq!(ammo_count(&target), 6);
    assert_eq!(ammo_count(&actor), 0);
}

#[test]
fn test_ammo_by_type_and_armed_state() {
    let content = test_content();
    let (mut actor, mut target) = pair(&content);
    actor.weapons.push(launcher("launcher_torpedo", "ammo_torpedo", 0, 5));
    target.weapons.push(launcher("launcher_torpedo", "ammo_torpedo", 3, 3));
    let total = ammo_count(&actor) + ammo_count(&target);

    let outcome = steal_ammo(&mut actor, &mut target, &content);
    assert_eq!(
        outcome,
        LootOutcome::Ammo {
            transfers: vec![(seeker(), 6), (torpedo(), 3)],
        }
    );
    assert_eq!(ammo_count(&actor) + ammo_count(&target), total);
    assert!(actor.weapons.iter().all(|slot| slot.armed));
    assert!(target.weapons.iter().all(|slot| !slot.armed));
}

#[test]
fn test_ammo_bounded_by_capacity() {
    let content = test_content();
    let (mut actor, mut target) = pair(&content);
    actor.weapons[0].ammo.as_mut().unwrap().quantity = 18;

    let outcome = steal_ammo(&mut actor, &mut target, &content);
    assert_eq!(
        outcome,
        LootOutcome::Ammo {
            transfers: vec![(seeker(), 2)],
        }
    );
    assert_eq!(ammo_count(&target), 4);

    assert_eq!(
        steal_ammo(&mut actor, &mut target, &content),
        LootOutcome::NoRoom(LootCategory::Ammo)
    );
}

#[test]
fn test_ammo_spreads_over_boarder_slots() {
    let content = test_content();
    let (mut actor, mut target) = pair(&content);
    actor.weapons.clear();
    actor.weapons.push(launcher("launcher_seeker", "ammo_seeker", 0, 4));
    actor.weapons.push(launcher("launcher_seeker", "ammo_seeker", 0, 4));

    let outcome = steal_ammo(&mut actor, &mut target, &content);
    assert_eq!(
        outcome,
        LootOutcome::Ammo {
            transfers: vec![(seeker(), 6)],
        }
    );
    let loads: Vec<u32> = actor
        .weapons
        .iter()
        .map(|slot| slot.ammo.as_ref().unwrap().quantity)
        .collect();
    assert_eq!(loads, vec![4, 2]);
}

#[test]
fn test_lootable_categories_reflect_target_contents() {
    let content = test_content();
    let (_, mut target) = pair(&content);
    assert_eq!(lootable_categories(&target), LootCategory::ALL.to_vec());

    target.credits = 0;
    target.fuel = 0.0;
    assert_eq!(
        lootable_categories(&target),
        vec![LootCategory::Cargo, LootCategory::Ammo]
    );
    assert!(lootable_categories(&pilot("ship_empty")).is_empty());
}

#[test]
fn test_plunder_takes_lesser_of_share_and_balance() {
    let content = test_content();
    let (mut actor, mut target) = pair(&content);
    // hull 20000 + launcher 1000
    assert_eq!(pilot_worth(&target), 21_000);

    assert_eq!(plunder_credits(&mut actor, &mut target, &content.constants), 1_000);
    assert_eq!(target.credits, 0);

    target.credits = 5_000;
    assert_eq!(plunder_credits(&mut actor, &mut target, &content.constants), 2_100);
    assert_eq!(target.credits, 2_900);
}

#[test]
fn test_loot_labels_parse_case_insensitively() {
    assert_eq!("credits".parse::<LootCategory>(), Ok(LootCategory::Credits));
    assert_eq!("Commodities".parse::<LootCategory>(), Ok(LootCategory::Cargo));
    assert_eq!("cargo".parse::<LootCategory>(), Ok(LootCategory::Cargo));
    assert_eq!(" AMMO ".parse::<LootCategory>(), Ok(LootCategory::Ammo));
    assert_eq!(
        "Outfits".parse::<LootCategory>(),
        Err(BoardError::UnknownLootCategory("Outfits".to_string()))
    );
}

#[test]
fn test_empty_category_does_not_stop_siblings() {
    let content = test_content();
    let (mut actor, mut target) = pair(&content);
    target.cargo.clear();
    let actor_cargo = actor.cargo.clone();

    let outcomes = apply_loot(
        &mut actor,
        &mut target,
        &[LootCategory::Cargo, LootCategory::Credits],
        &content,
    );
    assert_eq!(
        outcomes,
        vec![
            LootOutcome::NothingToSteal(LootCategory::Cargo),
            LootOutcome::Credits { amount: 1_000 },
        ]
    );
    assert_eq!(actor.cargo, actor_cargo);
}

#[test]
fn test_cargo_skips_empty_lot_at_front_of_hold() {
    let content = test_content();
    let (mut actor, mut target) = pair(&content);
    target.cargo.insert(
        0,
        CargoLot {
            commodity: CommodityId("ore".to_string()),
            quantity: 0,
        },
    );

    let outcome = steal_cargo(&mut actor, &mut target, &content);
    assert_eq!(outcome, LootOutcome::Cargo { units: 10 });
    assert!(target.cargo.is_empty());
    assert_eq!(cargo_used(&actor), 10);
}

#[test]
fn test_hold_of_empty_lots_has_nothing_to_offer() {
    let content = test_content();
    let (mut actor, mut target) = pair(&content);
    target.cargo[0].quantity = 0;

    assert!(!lootable_categories(&target).contains(&LootCategory::Cargo));
    assert_eq!(
        steal_cargo(&mut actor, &mut target, &content),
        LootOutcome::NothingToSteal(LootCategory::Cargo)
    );
}
