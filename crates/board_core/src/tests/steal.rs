use super::*;

#[test]
fn test_equal_crews_give_even_odds() {
    let constants = test_content().constants;
    assert!(approx(steal_threshold(crew(5), crew(5), &constants), 0.5));
    assert!(approx(steal_success_probability(crew(5), crew(5), &constants), 0.5));
}

#[test]
fn test_success_probability_never_drops_with_more_crew() {
    let constants = test_content().constants;
    for target in [1, 5, 30, 200] {
        let mut last = 0.0;
        for actor in 1..100 {
            let p = steal_success_probability(crew(actor), crew(target), &constants);
            assert!((0.0..=1.0).contains(&p));
            assert!(p >= last, "actor {actor} vs target {target}: {p} < {last}");
            last = p;
        }
    }
}

#[test]
fn test_certain_success_leaves_target_intact() {
    let mut content = test_content();
    certain_success(&mut content);
    let mut state = test_state(&content);
    let mut rng = make_rng();

    let attempt = resolve_steal(&mut state, &player_id(), &content.constants, &mut rng);
    assert_eq!(attempt.outcome, StealOutcome::Success);
    assert!(attempt.rolled > attempt.threshold);
    assert_eq!(attempt.damage_dealt, None);
    let target = pilot_ref(&state, &target_id());
    assert!(approx(target.shield, 100.0));
    assert!(target.last_attacker.is_none());
}

#[test]
fn test_lockout_without_self_destruct() {
    let mut content = test_content();
    certain_failure(&mut content, false);
    let mut state = test_state(&content);
    let mut rng = make_rng();

    let attempt = resolve_steal(&mut state, &player_id(), &content.constants, &mut rng);
    assert_eq!(attempt.outcome, StealOutcome::Lockout);
    assert_eq!(attempt.outcome.code(), 1);
    assert!(approx(pilot_ref(&state, &target_id()).armour, 100.0));
}

#[test]
fn test_self_destruct_wrecks_target_in_boarders_name() {
    let mut content = test_content();
    certain_failure(&mut content, true);
    let mut state = test_state(&content);
    let mut rng = make_rng();

    let attempt = resolve_steal(&mut state, &player_id(), &content.constants, &mut rng);
    assert_eq!(attempt.outcome, StealOutcome::SelfDestruct);
    assert_eq!(attempt.outcome.code(), -1);
    let target = pilot_ref(&state, &target_id());
    assert!(approx(target.shield, 0.0));
    assert!(approx(target.armour, 0.0));
    assert_eq!(target.last_attacker, Some(player_id()));
    assert!(approx(attempt.damage_dealt.unwrap(), 1.0));
    // Damage never removes the pilot.
    assert!(state.pilots.contains_key(&target_id()));
}

#[test]
fn test_missing_target_counts_as_lockout() {
    let content = test_content();
    let mut state = test_state(&content);
    let mut rng = make_rng();
    state.pilots.remove(&target_id());

    let attempt = resolve_steal(&mut state, &player_id(), &content.constants, &mut rng);
    assert_eq!(attempt.outcome, StealOutcome::Lockout);
    assert_eq!(attempt.damage_dealt, None);
}

#[test]
fn test_observed_success_rate_matches_probability() {
    let content = test_content();
    let mut state = test_state(&content);
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let trials = 2000;
    let mut successes = 0;
    for _ in 0..trials {
        let attempt = resolve_steal(&mut state, &player_id(), &content.constants, &mut rng);
        if attempt.outcome == StealOutcome::Success {
            successes += 1;
        }
    }
    let rate = f64::from(successes) / f64::from(trials);
    assert!((0.45..=0.55).contains(&rate), "observed rate {rate}");
}
