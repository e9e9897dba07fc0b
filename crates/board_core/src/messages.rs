//! Player-facing notification lines.
//!
//! Every reason, steal outcome, and loot outcome maps to exactly one line.

use crate::{BoardReason, Event, GameContent, LootCategory, LootOutcome, OutfitId, StealOutcome};

/// Why a board request was turned down.
pub fn refusal_message(reason: BoardReason) -> &'static str {
    match reason {
        BoardReason::CanBoard => "Target can be boarded.",
        BoardReason::NoTarget => "No target selected.",
        BoardReason::NotBoardable => "Target is not boardable.",
        BoardReason::AlreadyBoarded => "Target has already been boarded.",
        BoardReason::NotDisabled => "Target is not disabled.",
        BoardReason::TooFar => "Too far away from target to board it.",
        BoardReason::TooFast => "Going too fast to board target.",
        BoardReason::AlreadyBoarding => {
            "You are already boarding a target; can't board again right now!"
        }
        BoardReason::CooldownInterrupt => "Can't board while cooling down.",
    }
}

/// Why an attempt already under way was dropped.
pub fn cancellation_message(reason: BoardReason) -> &'static str {
    match reason {
        BoardReason::CanBoard => "Boarding continues.",
        BoardReason::NoTarget => "There is no longer a selected target.",
        BoardReason::NotBoardable => "The current target is no longer boardable.",
        BoardReason::AlreadyBoarded => {
            "The current target has now been boarded (by someone else perhaps)."
        }
        BoardReason::NotDisabled => {
            "The target is no longer disabled, blows the boarding tubes, and flies off, stunning you in the process."
        }
        BoardReason::TooFar => "You are now too far away to continue boarding.",
        BoardReason::TooFast => "You are now going too fast to continue boarding.",
        BoardReason::AlreadyBoarding => "Another boarding attempt replaced this one.",
        BoardReason::CooldownInterrupt => {
            "Starting the active cooldown interrupted the boarding process."
        }
    }
}

pub fn steal_message(outcome: StealOutcome) -> &'static str {
    match outcome {
        StealOutcome::Success => "You get past the ship's security.",
        StealOutcome::Lockout => "The ship's security system locks your crew out.",
        StealOutcome::SelfDestruct => "You have tripped the ship's self-destruct mechanism!",
    }
}

fn nothing_message(category: LootCategory) -> &'static str {
    match category {
        LootCategory::Credits => "The ship has no credits.",
        LootCategory::Cargo => "The ship has no cargo.",
        LootCategory::Fuel => "The ship has no fuel.",
        LootCategory::Ammo => "The ship has no ammo.",
    }
}

fn no_room_message(category: LootCategory) -> &'static str {
    match category {
        LootCategory::Credits => "You have no room for the ship's credits.",
        LootCategory::Cargo => "You have no room for the ship's cargo.",
        LootCategory::Fuel => "Your ship is at maximum fuel capacity.",
        LootCategory::Ammo => "You are already at max ammo.",
    }
}

fn ammo_name<'a>(content: &'a GameContent, ammo_type: &'a OutfitId) -> &'a str {
    content
        .ammo
        .iter()
        .find(|def| &def.id == ammo_type)
        .map_or(ammo_type.0.as_str(), |def| def.name.as_str())
}

pub fn loot_message(outcome: &LootOutcome, content: &GameContent) -> String {
    match outcome {
        LootOutcome::Credits { amount } => {
            format!("You manage to steal the ship's {amount} credits.")
        }
        LootOutcome::Cargo { units } => {
            format!("You manage to steal {units} units of the ship's cargo.")
        }
        LootOutcome::Fuel { amount } => {
            format!("You manage to steal {amount:.0} units of the ship's fuel.")
        }
        LootOutcome::Ammo { transfers } if transfers.is_empty() => {
            "There is no ammo compatible with your launchers on board.".to_string()
        }
        LootOutcome::Ammo { transfers } => transfers
            .iter()
            .map(|(ammo_type, count)| {
                format!("You looted {count} {}(s).", ammo_name(content, ammo_type))
            })
            .collect::<Vec<_>>()
            .join(" "),
        LootOutcome::NothingToSteal(category) => nothing_message(*category).to_string(),
        LootOutcome::NoRoom(category) => no_room_message(*category).to_string(),
    }
}

/// One log line per event.
pub fn event_message(event: &Event, content: &GameContent) -> String {
    match event {
        Event::BoardRequested {
            pilot_id, target, ..
        } => format!("{pilot_id} moves to board {target}."),
        Event::BoardRefused { reason, .. } => refusal_message(*reason).to_string(),
        Event::BoardWithdrawn { pilot_id } => format!("{pilot_id} backs off the boarding."),
        Event::EscortRecovered { escort, .. } => {
            format!("You recover {escort} into your fighter bay.")
        }
        Event::LootPickerOpened { target, available, .. } => {
            let labels: Vec<&str> = available.iter().map(|c| c.label()).collect();
            format!("Boarding ship {target}. Lootable: [{}]", labels.join(", "))
        }
        Event::LootPickerClosed { .. } => "Boarding window closed.".to_string(),
        Event::LootSelectionEmpty { .. } => "No items selected to loot from boarding.".to_string(),
        Event::BoardingStarted {
            pilot_id,
            target,
            duration_secs,
        } => format!("{pilot_id} started boarding {target}! Time left: {duration_secs:.2}s"),
        Event::BoardingCancelled { reason, .. } => cancellation_message(*reason).to_string(),
        Event::BoardingResolved { outcome, .. } => steal_message(*outcome).to_string(),
        Event::LootTransferred { outcome, .. } => loot_message(outcome, content),
        Event::CreditsPlundered {
            pilot_id,
            target,
            amount,
        } => format!("{pilot_id} has plundered {amount} credits from {target}!"),
        Event::PilotDamaged {
            pilot_id,
            attacker,
            amount,
        } => format!("{pilot_id} takes {amount:.0} damage, attributed to {attacker}."),
        Event::StunExpired { pilot_id } => format!("{pilot_id} recovers from the stun."),
        Event::BoardingAnomaly { detail, .. } => format!("warning: {detail}"),
        Event::StealRoll {
            threshold, rolled, ..
        } => format!("steal roll {rolled:.3} against {threshold:.3}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::base_content;

    #[test]
    fn every_reason_has_distinct_cancellation_line() {
        let lines: std::collections::HashSet<&str> =
            BoardReason::ALL.into_iter().map(cancellation_message).collect();
        assert_eq!(lines.len(), BoardReason::ALL.len());
    }

    #[test]
    fn every_reason_has_distinct_refusal_line() {
        let lines: std::collections::HashSet<&str> =
            BoardReason::ALL.into_iter().map(refusal_message).collect();
        assert_eq!(lines.len(), BoardReason::ALL.len());
    }

    #[test]
    fn ammo_message_uses_content_names() {
        let content = base_content();
        let outcome = LootOutcome::Ammo {
            transfers: vec![(OutfitId("ammo_seeker".to_string()), 4)],
        };
        assert_eq!(
            loot_message(&outcome, &content),
            "You looted 4 Seeker Missile(s)."
        );
    }

    #[test]
    fn empty_ammo_transfer_reports_incompatibility() {
        let content = base_content();
        let outcome = LootOutcome::Ammo { transfers: vec![] };
        assert!(loot_message(&outcome, &content).contains("compatible"));
    }
}
