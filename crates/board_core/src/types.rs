//! Type definitions for `board_core`.
//!
//! All public types, structs, enums, and ID newtypes used by the boarding simulation.

use std::collections::HashMap;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Type aliases
// ---------------------------------------------------------------------------

/// Pilot lookup. Iteration order is unspecified; callers sort ids for determinism.
pub type PilotMap = HashMap<PilotId, PilotState, ahash::RandomState>;
pub type WeaponSlots = SmallVec<[WeaponSlot; 4]>;
pub type LootList = SmallVec<[LootCategory; 4]>;

// ---------------------------------------------------------------------------
// ID newtypes
// ---------------------------------------------------------------------------

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(PilotId);
string_id!(CommodityId);
string_id!(OutfitId);
string_id!(CommandId);
string_id!(EventId);
string_id!(PrincipalId);

// ---------------------------------------------------------------------------
// Core enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventLevel {
    Normal,
    Debug,
}

/// Why a pilot can or cannot board its target.
///
/// Doubles as the cancellation reason for an in-flight boarding attempt.
/// `CooldownInterrupt` is never produced by the eligibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardReason {
    CanBoard,
    NoTarget,
    NotBoardable,
    AlreadyBoarded,
    NotDisabled,
    TooFar,
    TooFast,
    AlreadyBoarding,
    CooldownInterrupt,
}

impl BoardReason {
    pub const ALL: [BoardReason; 9] = [
        BoardReason::CanBoard,
        BoardReason::NoTarget,
        BoardReason::NotBoardable,
        BoardReason::AlreadyBoarded,
        BoardReason::NotDisabled,
        BoardReason::TooFar,
        BoardReason::TooFast,
        BoardReason::AlreadyBoarding,
        BoardReason::CooldownInterrupt,
    ];

    /// Stable numeric code, as exposed to scripting.
    pub fn code(self) -> u8 {
        match self {
            BoardReason::CanBoard => 0,
            BoardReason::NoTarget => 1,
            BoardReason::NotBoardable => 2,
            BoardReason::AlreadyBoarded => 3,
            BoardReason::NotDisabled => 4,
            BoardReason::TooFar => 5,
            BoardReason::TooFast => 6,
            BoardReason::AlreadyBoarding => 7,
            BoardReason::CooldownInterrupt => 8,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|reason| reason.code() == code)
    }

    pub fn is_ok(self) -> bool {
        self == BoardReason::CanBoard
    }
}

/// Transferable resource classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LootCategory {
    Credits,
    Cargo,
    Fuel,
    Ammo,
}

impl LootCategory {
    pub const ALL: [LootCategory; 4] = [
        LootCategory::Credits,
        LootCategory::Cargo,
        LootCategory::Fuel,
        LootCategory::Ammo,
    ];

    /// Label shown in the loot picker and sent back on confirmation.
    pub fn label(self) -> &'static str {
        match self {
            LootCategory::Credits => "Credits",
            LootCategory::Cargo => "Commodities",
            LootCategory::Fuel => "Fuel",
            LootCategory::Ammo => "Ammo",
        }
    }
}

impl std::fmt::Display for LootCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for LootCategory {
    type Err = crate::BoardError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let trimmed = label.trim();
        if trimmed.eq_ignore_ascii_case("cargo") {
            return Ok(LootCategory::Cargo);
        }
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| crate::BoardError::UnknownLootCategory(label.to_string()))
    }
}

/// Result of a steal attempt. The discriminants are the legacy integer codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i8)]
pub enum StealOutcome {
    Success = 0,
    Lockout = 1,
    SelfDestruct = -1,
}

impl StealOutcome {
    pub fn code(self) -> i8 {
        self as i8
    }
}

/// Per-category result of a loot transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LootOutcome {
    Credits { amount: u64 },
    Cargo { units: u32 },
    Fuel { amount: f64 },
    /// Empty when the target carried ammo but none matched the boarder's launchers.
    Ammo { transfers: Vec<(OutfitId, u32)> },
    NothingToSteal(LootCategory),
    NoRoom(LootCategory),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoardPhase {
    #[default]
    Idle,
    /// Eligibility confirmed. For the player this is where the loot picker is open.
    Requested,
    /// Timer counting down.
    Active,
    /// Timer expired; steal and loot logic executing.
    Resolving,
}

// ---------------------------------------------------------------------------
// State types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub meta: MetaState,
    pub pilots: PilotMap,
    /// Present when one pilot is under direct player control.
    pub player: Option<PlayerContext>,
    pub counters: Counters,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaState {
    pub tick: u64,
    pub seed: u64,
    pub schema_version: u32,
    pub content_version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Counters {
    pub next_event_id: u64,
    pub next_command_id: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Vec2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn distance_squared(self, other: Vec2) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PilotFlags {
    /// Currently boarding its target.
    pub boarding: bool,
    pub disabled: bool,
    /// Can be boarded even while not disabled.
    pub boardable: bool,
    pub no_board: bool,
    /// Has already been boarded once.
    pub boarded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CargoLot {
    pub commodity: CommodityId,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmmoLoad {
    pub ammo_type: OutfitId,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponSlot {
    pub outfit: OutfitId,
    pub launcher: bool,
    /// Launchers only. An empty launcher keeps its ammo type with quantity 0.
    #[serde(default)]
    pub ammo: Option<AmmoLoad>,
    #[serde(default)]
    pub ammo_capacity: u32,
    /// Derived: the slot can fire. Recomputed by `refresh_weapons`.
    #[serde(default)]
    pub armed: bool,
    #[serde(default)]
    pub value: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FighterBay {
    pub capacity: u32,
    #[serde(default)]
    pub docked: Vec<PilotState>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PilotState {
    pub id: PilotId,
    pub name: String,
    pub owner: PrincipalId,
    pub crew: NonZeroU32,
    pub credits: u64,
    #[serde(default)]
    pub cargo: Vec<CargoLot>,
    pub cargo_capacity: u32,
    pub fuel: f64,
    pub fuel_max: f64,
    #[serde(default)]
    pub weapons: WeaponSlots,
    #[serde(default)]
    pub position: Vec2,
    #[serde(default)]
    pub velocity: Vec2,
    /// Sprite width; scales the boarding distance threshold.
    pub size: f64,
    pub shield: f64,
    pub armour: f64,
    pub hull_mass: f64,
    /// Derived: hull + cargo + ammo. Recomputed by `refresh_mass`.
    #[serde(default)]
    pub mass: f64,
    #[serde(default)]
    pub hull_value: u64,
    #[serde(default)]
    pub flags: PilotFlags,
    #[serde(default)]
    pub target: Option<PilotId>,
    /// Pilot that deployed this one as an escort.
    #[serde(default)]
    pub parent: Option<PilotId>,
    #[serde(default)]
    pub fighter_bay: Option<FighterBay>,
    /// Seconds left on the current boarding attempt.
    #[serde(default)]
    pub board_timer: f64,
    /// Seconds left on a boarding-cancel stun.
    #[serde(default)]
    pub stun_timer: f64,
    #[serde(default)]
    pub last_attacker: Option<PilotId>,
}

/// Player-scoped context. Owns the single interactive boarding session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerContext {
    pub pilot_id: PilotId,
    #[serde(default)]
    pub session: BoardingSession,
}

/// One interactive boarding attempt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardingSession {
    pub id: Option<Uuid>,
    pub phase: BoardPhase,
    pub target: Option<PilotId>,
    pub cancel_requested: bool,
    pub loot: LootList,
}

impl BoardingSession {
    pub fn is_open(&self) -> bool {
        self.phase != BoardPhase::Idle
    }

    /// The loot picker is only open while the session waits in `Requested`.
    pub fn picker_open(&self) -> bool {
        self.phase == BoardPhase::Requested
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Damage instance applied through the normal hit path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Damage {
    pub amount: f64,
    /// Fraction of the damage that bypasses shields.
    pub penetration: f64,
}

// ---------------------------------------------------------------------------
// Command types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub id: CommandId,
    pub issued_by: PrincipalId,
    pub issued_tick: u64,
    pub execute_at_tick: u64,
    pub command: Command,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Command {
    SetTarget {
        pilot_id: PilotId,
        target: Option<PilotId>,
    },
    SetVelocity {
        pilot_id: PilotId,
        velocity: Vec2,
    },
    SetDisabled {
        pilot_id: PilotId,
        disabled: bool,
    },
    /// Board the pilot's current target. Routed through the player
    /// coordinator when `pilot_id` is the player.
    Board {
        pilot_id: PilotId,
    },
    /// Loot picker confirmation. Labels are untyped picker data.
    ConfirmLoot {
        selected: Vec<String>,
    },
    /// Loot picker cancel button.
    CancelLoot,
    /// Forced unboard of the player's session, observed cooperatively.
    Unboard,
    /// External cancellation of an in-flight attempt, e.g. cooldown start.
    CancelBoarding {
        pilot_id: PilotId,
        reason: BoardReason,
    },
}

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: EventId,
    pub tick: u64,
    pub event: Event,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// "board" hook notification, fired on entering `Requested`.
    BoardRequested {
        pilot_id: PilotId,
        target: PilotId,
        session: Option<Uuid>,
    },
    BoardRefused {
        pilot_id: PilotId,
        reason: BoardReason,
    },
    /// Hook or forced unboard closed the attempt without a reason code.
    BoardWithdrawn {
        pilot_id: PilotId,
    },
    EscortRecovered {
        pilot_id: PilotId,
        escort: PilotId,
    },
    LootPickerOpened {
        pilot_id: PilotId,
        target: PilotId,
        available: Vec<LootCategory>,
    },
    LootPickerClosed {
        pilot_id: PilotId,
    },
    LootSelectionEmpty {
        pilot_id: PilotId,
    },
    BoardingStarted {
        pilot_id: PilotId,
        target: PilotId,
        duration_secs: f64,
    },
    BoardingCancelled {
        pilot_id: PilotId,
        reason: BoardReason,
        stunned: bool,
    },
    BoardingResolved {
        pilot_id: PilotId,
        target: PilotId,
        outcome: StealOutcome,
    },
    LootTransferred {
        pilot_id: PilotId,
        target: PilotId,
        outcome: LootOutcome,
    },
    CreditsPlundered {
        pilot_id: PilotId,
        target: PilotId,
        amount: u64,
    },
    PilotDamaged {
        pilot_id: PilotId,
        attacker: PilotId,
        amount: f64,
    },
    StunExpired {
        pilot_id: PilotId,
    },
    /// Data anomaly: logged and skipped, never fatal.
    BoardingAnomaly {
        pilot_id: PilotId,
        detail: String,
    },
    /// Only emitted at `EventLevel::Debug`.
    StealRoll {
        pilot_id: PilotId,
        threshold: f64,
        rolled: f64,
    },
}

// ---------------------------------------------------------------------------
// Content types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameContent {
    pub content_version: String,
    pub commodities: Vec<CommodityDef>,
    pub ammo: Vec<AmmoDef>,
    pub constants: Constants,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommodityDef {
    pub id: CommodityId,
    pub name: String,
    /// Tonnes per unit of cargo.
    pub mass_per_unit: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmmoDef {
    pub id: OutfitId,
    pub name: String,
    pub mass_per_unit: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constants {
    /// Simulated seconds per tick.
    pub tick_seconds: f64,
    pub board_time_min_secs: f64,
    pub board_time_max_secs: f64,
    /// Boarding range is `pilot.size * board_distance_factor`.
    pub board_distance_factor: f64,
    pub board_max_relative_speed: f64,
    /// Stun applied when a target recovers mid-boarding.
    pub board_stun_secs: f64,
    pub steal_crew_offset: f64,
    pub steal_crew_scale: f64,
    pub self_destruct_chance: f64,
    pub self_destruct_damage: f64,
    /// Fraction of the target's worth an NPC boarder skims.
    pub npc_plunder_fraction: f64,
}
