//! Content and scenario loading shared by board_cli and the integration tests.

use anyhow::{Context, Result};
use board_core::pilot::{refresh_mass, refresh_weapons};
use board_core::{
    AmmoDef, BoardingSession, Command, CommandEnvelope, CommandId, CommodityDef, Constants,
    Counters, GameContent, GameState, MetaState, PilotId, PilotMap, PilotState, PlayerContext,
    PrincipalId,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Deserialize)]
struct CommoditiesFile {
    content_version: String,
    commodities: Vec<CommodityDef>,
}

#[derive(Deserialize)]
struct AmmoFile {
    ammo: Vec<AmmoDef>,
}

/// A starting arrangement of pilots plus the commands that drive it.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Used when the CLI is not given `--seed`.
    #[serde(default)]
    pub seed: Option<u64>,
    pub pilots: Vec<PilotState>,
    /// The pilot that goes through the loot picker, if any.
    #[serde(default)]
    pub player: Option<PilotId>,
    /// Targets a script refuses to let anyone board.
    #[serde(default)]
    pub guarded_targets: Vec<PilotId>,
    #[serde(default)]
    pub commands: Vec<ScriptedCommand>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptedCommand {
    pub at_tick: u64,
    pub issued_by: PrincipalId,
    pub command: Command,
}

/// Validates cross-references in loaded content, panicking on any authoring error.
pub fn validate_content(content: &GameContent) {
    let mut commodity_ids = HashSet::new();
    for commodity in &content.commodities {
        assert!(
            commodity_ids.insert(&commodity.id),
            "commodity '{}' is defined twice",
            commodity.id,
        );
        assert!(
            commodity.mass_per_unit >= 0.0,
            "commodity '{}' has negative mass",
            commodity.id,
        );
    }
    let mut ammo_ids = HashSet::new();
    for ammo in &content.ammo {
        assert!(ammo_ids.insert(&ammo.id), "ammo '{}' is defined twice", ammo.id);
        assert!(ammo.mass_per_unit >= 0.0, "ammo '{}' has negative mass", ammo.id);
    }
    validate_constants(&content.constants);
}

fn validate_constants(c: &Constants) {
    assert!(c.tick_seconds > 0.0, "tick_seconds must be positive");
    assert!(
        c.board_time_min_secs > 0.0 && c.board_time_min_secs <= c.board_time_max_secs,
        "board_time_min_secs must be positive and no larger than board_time_max_secs",
    );
    assert!(c.board_distance_factor > 0.0, "board_distance_factor must be positive");
    assert!(c.board_max_relative_speed >= 0.0, "board_max_relative_speed must not be negative");
    assert!(c.board_stun_secs >= 0.0, "board_stun_secs must not be negative");
    assert!(c.steal_crew_offset >= 0.0, "steal_crew_offset must not be negative");
    assert!(c.steal_crew_scale >= 0.0, "steal_crew_scale must not be negative");
    assert!(
        (0.0..=1.0).contains(&c.self_destruct_chance),
        "self_destruct_chance must be within 0..=1",
    );
    assert!(
        (0.0..=1.0).contains(&c.npc_plunder_fraction),
        "npc_plunder_fraction must be within 0..=1",
    );
}

/// Validates a scenario against content, panicking on any authoring error.
///
/// Every pilot id is unique; targets, parents, the player and guarded targets
/// name known pilots; cargo and ammo reference known content.
pub fn validate_scenario(scenario: &Scenario, content: &GameContent) {
    let mut pilot_ids = HashSet::new();
    for pilot in &scenario.pilots {
        assert!(
            pilot_ids.insert(&pilot.id),
            "scenario '{}' defines pilot '{}' twice",
            scenario.name,
            pilot.id,
        );
    }
    let commodity_ids: HashSet<_> = content.commodities.iter().map(|c| &c.id).collect();
    let ammo_ids: HashSet<_> = content.ammo.iter().map(|a| &a.id).collect();

    for pilot in &scenario.pilots {
        for reference in pilot.target.iter().chain(pilot.parent.iter()) {
            assert!(
                pilot_ids.contains(reference),
                "pilot '{}' references unknown pilot '{}'",
                pilot.id,
                reference,
            );
        }
        for lot in &pilot.cargo {
            assert!(
                commodity_ids.contains(&lot.commodity),
                "pilot '{}' carries unknown commodity '{}'",
                pilot.id,
                lot.commodity,
            );
            assert!(
                lot.quantity > 0,
                "pilot '{}' carries an empty lot of '{}'",
                pilot.id,
                lot.commodity,
            );
        }
        for load in pilot.weapons.iter().filter_map(|slot| slot.ammo.as_ref()) {
            assert!(
                ammo_ids.contains(&load.ammo_type),
                "pilot '{}' loads unknown ammo '{}'",
                pilot.id,
                load.ammo_type,
            );
        }
        assert!(
            pilot.fuel <= pilot.fuel_max,
            "pilot '{}' has more fuel than its tank holds",
            pilot.id,
        );
    }

    for id in scenario.player.iter().chain(&scenario.guarded_targets) {
        assert!(
            pilot_ids.contains(id),
            "scenario '{}' names unknown pilot '{}'",
            scenario.name,
            id,
        );
    }
}

pub fn load_content(content_dir: &str) -> Result<GameContent> {
    let dir = Path::new(content_dir);
    let constants: Constants = serde_json::from_str(
        &std::fs::read_to_string(dir.join("constants.json")).context("reading constants.json")?,
    )
    .context("parsing constants.json")?;
    let commodities_file: CommoditiesFile = serde_json::from_str(
        &std::fs::read_to_string(dir.join("commodities.json"))
            .context("reading commodities.json")?,
    )
    .context("parsing commodities.json")?;
    let ammo_file: AmmoFile = serde_json::from_str(
        &std::fs::read_to_string(dir.join("ammo.json")).context("reading ammo.json")?,
    )
    .context("parsing ammo.json")?;
    let content = GameContent {
        content_version: commodities_file.content_version,
        commodities: commodities_file.commodities,
        ammo: ammo_file.ammo,
        constants,
    };
    validate_content(&content);
    Ok(content)
}

pub fn load_scenario(path: &str, content: &GameContent) -> Result<Scenario> {
    let scenario: Scenario = serde_json::from_str(
        &std::fs::read_to_string(path).with_context(|| format!("reading scenario {path}"))?,
    )
    .with_context(|| format!("parsing scenario {path}"))?;
    validate_scenario(&scenario, content);
    Ok(scenario)
}

pub fn build_initial_state(content: &GameContent, seed: u64, scenario: &Scenario) -> GameState {
    let mut pilots = PilotMap::default();
    for pilot in &scenario.pilots {
        let mut pilot = pilot.clone();
        refresh_weapons(&mut pilot);
        refresh_mass(&mut pilot, content);
        pilots.insert(pilot.id.clone(), pilot);
    }
    GameState {
        meta: MetaState {
            tick: 0,
            seed,
            schema_version: 1,
            content_version: content.content_version.clone(),
        },
        pilots,
        player: scenario.player.clone().map(|pilot_id| PlayerContext {
            pilot_id,
            session: BoardingSession::default(),
        }),
        counters: Counters::default(),
    }
}

/// Envelope every scripted command, numbering ids in scenario order.
pub fn scenario_commands(scenario: &Scenario, state: &mut GameState) -> Vec<CommandEnvelope> {
    scenario
        .commands
        .iter()
        .map(|scripted| {
            let id = CommandId(format!("cmd_{:06}", state.counters.next_command_id));
            state.counters.next_command_id += 1;
            CommandEnvelope {
                id,
                issued_by: scripted.issued_by.clone(),
                issued_tick: 0,
                execute_at_tick: scripted.at_tick,
                command: scripted.command.clone(),
            }
        })
        .collect()
}
