//! Shared test fixtures for board_core and downstream crates.
//!
//! `base_content()` carries two commodities and two ammo types with the usual
//! boarding constants. `base_state()` puts the player right next to a disabled,
//! loaded target so a board command succeeds without setup.

use std::num::NonZeroU32;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use smallvec::SmallVec;

use crate::{
    AmmoDef, AmmoLoad, CargoLot, CommandEnvelope, CommandId, CommodityDef, CommodityId, Constants,
    Counters, GameContent, GameState, MetaState, OutfitId, PilotFlags, PilotId, PilotMap,
    PilotState, PlayerContext, PrincipalId, Vec2, WeaponSlot,
};

pub fn base_content() -> GameContent {
    GameContent {
        content_version: "test".to_string(),
        commodities: vec![
            CommodityDef {
                id: CommodityId("food".to_string()),
                name: "Food".to_string(),
                mass_per_unit: 1.0,
            },
            CommodityDef {
                id: CommodityId("ore".to_string()),
                name: "Ore".to_string(),
                mass_per_unit: 2.0,
            },
        ],
        ammo: vec![
            AmmoDef {
                id: OutfitId("ammo_seeker".to_string()),
                name: "Seeker Missile".to_string(),
                mass_per_unit: 0.5,
            },
            AmmoDef {
                id: OutfitId("ammo_torpedo".to_string()),
                name: "Torpedo".to_string(),
                mass_per_unit: 2.0,
            },
        ],
        constants: Constants {
            tick_seconds: 1.0,
            board_time_min_secs: 1.0,
            board_time_max_secs: 15.0,
            board_distance_factor: 0.8,
            board_max_relative_speed: 25.0,
            board_stun_secs: 1.0,
            steal_crew_offset: 10.0,
            steal_crew_scale: 0.5,
            self_destruct_chance: 0.4,
            self_destruct_damage: 100.0,
            npc_plunder_fraction: 0.1,
        },
    }
}

pub fn player_id() -> PilotId {
    PilotId("ship_player".to_string())
}

pub fn target_id() -> PilotId {
    PilotId("ship_target".to_string())
}

pub fn player_principal() -> PrincipalId {
    PrincipalId("principal_player".to_string())
}

pub fn npc_principal() -> PrincipalId {
    PrincipalId("principal_npc".to_string())
}

pub fn crew(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).expect("crew must be at least 1")
}

/// A bare pilot at the origin: crew 1, no credits, empty hold of 10 units,
/// no weapons, not disabled.
pub fn pilot(id: &str) -> PilotState {
    PilotState {
        id: PilotId(id.to_string()),
        name: id.to_string(),
        owner: npc_principal(),
        crew: crew(1),
        credits: 0,
        cargo: Vec::new(),
        cargo_capacity: 10,
        fuel: 0.0,
        fuel_max: 100.0,
        weapons: SmallVec::new(),
        position: Vec2::ZERO,
        velocity: Vec2::ZERO,
        size: 40.0,
        shield: 100.0,
        armour: 100.0,
        hull_mass: 50.0,
        mass: 50.0,
        hull_value: 0,
        flags: PilotFlags::default(),
        target: None,
        parent: None,
        fighter_bay: None,
        board_timer: 0.0,
        stun_timer: 0.0,
        last_attacker: None,
    }
}

/// Launcher slot loaded with `quantity` rounds of `ammo_type`.
pub fn launcher(outfit: &str, ammo_type: &str, quantity: u32, capacity: u32) -> WeaponSlot {
    WeaponSlot {
        outfit: OutfitId(outfit.to_string()),
        launcher: true,
        ammo: Some(AmmoLoad {
            ammo_type: OutfitId(ammo_type.to_string()),
            quantity,
        }),
        ammo_capacity: capacity,
        armed: quantity > 0,
        value: 1_000,
    }
}

/// Player (crew 5) targeting a disabled target (crew 5) 10 units away.
///
/// The target carries 1000 credits, 10 food, 30 fuel and 6 seeker rounds.
/// The player has an empty seeker launcher (capacity 20), 100 credits and
/// half a tank of fuel.
pub fn base_state(content: &GameContent) -> GameState {
    let mut player = pilot("ship_player");
    player.name = "Player".to_string();
    player.owner = player_principal();
    player.crew = crew(5);
    player.credits = 100;
    player.cargo_capacity = 50;
    player.fuel = 50.0;
    player.weapons.push(launcher("launcher_seeker", "ammo_seeker", 0, 20));
    player.target = Some(target_id());

    let mut target = pilot("ship_target");
    target.name = "Derelict Hauler".to_string();
    target.crew = crew(5);
    target.credits = 1_000;
    target.cargo.push(CargoLot {
        commodity: CommodityId("food".to_string()),
        quantity: 10,
    });
    target.fuel = 30.0;
    target.weapons.push(launcher("launcher_seeker", "ammo_seeker", 6, 10));
    target.position = Vec2::new(10.0, 0.0);
    target.flags.disabled = true;
    target.hull_value = 20_000;

    for ship in [&mut player, &mut target] {
        crate::pilot::refresh_weapons(ship);
        crate::pilot::refresh_mass(ship, content);
    }

    let mut pilots = PilotMap::default();
    pilots.insert(player.id.clone(), player);
    pilots.insert(target.id.clone(), target);

    GameState {
        meta: MetaState {
            tick: 0,
            seed: 42,
            schema_version: 1,
            content_version: content.content_version.clone(),
        },
        pilots,
        player: Some(PlayerContext {
            pilot_id: player_id(),
            session: crate::BoardingSession::default(),
        }),
        counters: Counters::default(),
    }
}

/// Command issued at the current tick by the player's principal.
pub fn player_command(state: &GameState, command: crate::Command) -> CommandEnvelope {
    CommandEnvelope {
        id: CommandId(format!("cmd_{:06}", state.counters.next_command_id)),
        issued_by: player_principal(),
        issued_tick: state.meta.tick,
        execute_at_tick: state.meta.tick,
        command,
    }
}

pub fn make_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}
