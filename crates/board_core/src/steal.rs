use std::num::NonZeroU32;

use rand::Rng;

use crate::pilot::take_damage;
use crate::{Constants, Damage, GameState, PilotId, StealOutcome};

/// One resolved steal roll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StealAttempt {
    pub outcome: StealOutcome,
    /// The first draw must exceed this for the steal to succeed.
    pub threshold: f64,
    pub rolled: f64,
    /// Armour damage dealt to the target by a tripped self-destruct.
    pub damage_dealt: Option<f64>,
}

/// Security threshold: `scale * (offset + target_crew) / (offset + actor_crew)`.
pub fn steal_threshold(actor_crew: NonZeroU32, target_crew: NonZeroU32, constants: &Constants) -> f64 {
    let offset = constants.steal_crew_offset;
    constants.steal_crew_scale * (offset + f64::from(target_crew.get()))
        / (offset + f64::from(actor_crew.get()))
}

/// Chance a steal succeeds. Never decreases as the boarding crew grows.
pub fn steal_success_probability(
    actor_crew: NonZeroU32,
    target_crew: NonZeroU32,
    constants: &Constants,
) -> f64 {
    (1.0 - steal_threshold(actor_crew, target_crew, constants)).clamp(0.0, 1.0)
}

/// Roll whether `pilot_id` gets past its target's security.
///
/// A failed roll may trip the target's self-destruct: shields drop to zero,
/// armour to 1, and a fully penetrating hit is applied in the boarder's name
/// so any faction fallout lands on the boarder. A target that no longer
/// resolves counts as a lockout.
pub fn resolve_steal(
    state: &mut GameState,
    pilot_id: &PilotId,
    constants: &Constants,
    rng: &mut impl Rng,
) -> StealAttempt {
    let lockout = StealAttempt {
        outcome: StealOutcome::Lockout,
        threshold: 1.0,
        rolled: 0.0,
        damage_dealt: None,
    };
    let Some(pilot) = state.pilots.get(pilot_id) else {
        return lockout;
    };
    let actor_crew = pilot.crew;
    let Some(target_id) = pilot.target.clone() else {
        return lockout;
    };
    let Some(target) = state.pilots.get_mut(&target_id) else {
        return lockout;
    };

    let threshold = steal_threshold(actor_crew, target.crew, constants);
    let rolled: f64 = rng.gen();
    if rolled > threshold {
        return StealAttempt {
            outcome: StealOutcome::Success,
            threshold,
            rolled,
            damage_dealt: None,
        };
    }

    if rng.gen::<f64>() < constants.self_destruct_chance {
        target.shield = 0.0;
        target.armour = 1.0;
        let damage = Damage {
            amount: constants.self_destruct_damage,
            penetration: 1.0,
        };
        let dealt = take_damage(target, &damage, pilot_id);
        return StealAttempt {
            outcome: StealOutcome::SelfDestruct,
            threshold,
            rolled,
            damage_dealt: Some(dealt),
        };
    }

    StealAttempt {
        outcome: StealOutcome::Lockout,
        threshold,
        rolled,
        damage_dealt: None,
    }
}
