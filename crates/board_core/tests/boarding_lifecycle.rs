//! End-to-end boarding runs through the public API only.

use board_core::test_fixtures::{base_content, base_state, make_rng, player_command, player_id, target_id};
use board_core::{
    tick, BoardPhase, BoardingSession, Command, Event, EventEnvelope, EventLevel, GameContent,
    GameState, GuardedTargets, LootCategory, NoHooks, StealOutcome,
};

fn run(
    state: &mut GameState,
    content: &GameContent,
    schedule: &[(u64, Command)],
    ticks: u64,
) -> Vec<EventEnvelope> {
    let mut rng = make_rng();
    let mut log = Vec::new();
    for _ in 0..ticks {
        let now = state.meta.tick;
        let commands: Vec<_> = schedule
            .iter()
            .filter(|(at, _)| *at == now)
            .map(|(_, command)| player_command(state, command.clone()))
            .collect();
        log.extend(tick(state, &commands, content, &mut NoHooks, &mut rng, EventLevel::Debug));
    }
    log
}

fn board_and_take(categories: &[LootCategory]) -> Vec<(u64, Command)> {
    vec![
        (
            0,
            Command::Board {
                pilot_id: player_id(),
            },
        ),
        (
            1,
            Command::ConfirmLoot {
                selected: categories.iter().map(|c| c.label().to_string()).collect(),
            },
        ),
    ]
}

#[test]
fn test_boarding_resolves_within_timer_bounds() {
    let content = base_content();
    let mut state = base_state(&content);

    let log = run(&mut state, &content, &board_and_take(&[LootCategory::Fuel]), 20);

    let started = log
        .iter()
        .find(|e| matches!(e.event, Event::BoardingStarted { .. }))
        .expect("boarding should start");
    let resolved = log
        .iter()
        .find(|e| matches!(e.event, Event::BoardingResolved { .. }))
        .expect("boarding should resolve");
    let Event::BoardingStarted { duration_secs, .. } = started.event else {
        unreachable!()
    };
    assert!(duration_secs >= content.constants.board_time_min_secs);
    assert!(duration_secs <= content.constants.board_time_max_secs);
    assert!(resolved.tick > started.tick);

    // Exactly one roll, visible at debug level.
    assert_eq!(
        log.iter()
            .filter(|e| matches!(e.event, Event::StealRoll { .. }))
            .count(),
        1
    );
    assert_eq!(state.player.as_ref().unwrap().session, BoardingSession::default());
    assert!(state.pilots[&target_id()].flags.boarded);
}

#[test]
fn test_success_transfers_and_failure_does_not() {
    let mut content = base_content();
    content.constants.steal_crew_scale = 0.0;
    let mut state = base_state(&content);
    run(&mut state, &content, &board_and_take(&[LootCategory::Credits]), 10);
    assert_eq!(state.pilots[&player_id()].credits, 1_100);

    let mut content = base_content();
    content.constants.steal_crew_scale = 4.0;
    content.constants.self_destruct_chance = 0.0;
    let mut state = base_state(&content);
    let log = run(&mut state, &content, &board_and_take(&[LootCategory::Credits]), 10);
    assert_eq!(state.pilots[&player_id()].credits, 100);
    assert!(log.iter().any(|e| matches!(
        e.event,
        Event::BoardingResolved {
            outcome: StealOutcome::Lockout,
            ..
        }
    )));
}

#[test]
fn test_picker_cancel_then_reboard() {
    let content = base_content();
    let mut state = base_state(&content);
    let schedule = vec![
        (
            0,
            Command::Board {
                pilot_id: player_id(),
            },
        ),
        (1, Command::CancelLoot),
        (
            2,
            Command::Board {
                pilot_id: player_id(),
            },
        ),
    ];
    let log = run(&mut state, &content, &schedule, 3);

    let opened = log
        .iter()
        .filter(|e| matches!(e.event, Event::LootPickerOpened { .. }))
        .count();
    assert_eq!(opened, 2);
    assert_eq!(
        state.player.as_ref().unwrap().session.phase,
        BoardPhase::Requested
    );
}

#[test]
fn test_guarded_target_is_never_boarded() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();
    let mut hooks = GuardedTargets {
        targets: vec![target_id()],
    };
    let board = player_command(
        &state,
        Command::Board {
            pilot_id: player_id(),
        },
    );

    let events = tick(&mut state, &[board], &content, &mut hooks, &mut rng, EventLevel::Normal);
    assert!(events
        .iter()
        .any(|e| matches!(e.event, Event::BoardWithdrawn { .. })));
    assert!(!state.pilots[&target_id()].flags.boarded);
    assert_eq!(state.player.as_ref().unwrap().session, BoardingSession::default());
}
