#[cfg(test)]
mod tests {
    use battlebases_core::config::GameConfig;
    use battlebases_core::enums::{FighterKind, Team};
    use battlebases_core::types::FighterId;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::battle::{Battle, BattleOutcome, BattleState};
    use crate::error::CombatError;
    use crate::fighter::Fighter;
    use crate::initiative::{resolve, Initiative, WalkProgress};

    const X: FighterId = FighterId(1);
    const Y: FighterId = FighterId(2);

    fn unit(team: Team, health: u32, strength: u32, period: f64) -> Fighter {
        Fighter::new(FighterKind::Mobile, team, health, strength, period)
    }

    fn outpost(team: Team) -> Fighter {
        Fighter::new(FighterKind::Outpost, team, 300, 0, 0.0)
    }

    // ---- Fighter ----

    #[test]
    fn test_damage_clamps_and_kills_once() {
        let mut f = unit(Team::Red, 25, 10, 1.0);
        let hit = f.apply_damage(10);
        assert_eq!(hit.health, 15);
        assert!(!hit.killed);

        let hit = f.apply_damage(40);
        assert_eq!(hit.health, 0);
        assert!(hit.killed);
        assert!(f.is_dead());

        // No resurrection, no second kill.
        let hit = f.apply_damage(0);
        assert_eq!(hit.health, 0);
        assert!(!hit.killed);
        assert!(f.is_dead());
        assert!(!f.can_attack());
    }

    #[test]
    fn test_non_positive_period_means_unarmed() {
        assert!(!unit(Team::Red, 10, 5, 0.0).can_attack());
        assert!(!unit(Team::Red, 10, 5, -1.0).can_attack());
        assert!(!unit(Team::Red, 10, 5, f64::NAN).can_attack());
        assert!(unit(Team::Red, 10, 5, 0.5).can_attack());
    }

    #[test]
    fn test_structures_never_armed_except_guns() {
        let base = Fighter::new(FighterKind::MainBase, Team::Red, 500, 50, 1.0);
        assert!(!base.can_attack());
        assert!(base.can_be_targeted());

        let gun = Fighter::new(FighterKind::StaticDefense, Team::Red, 10, 5, 0.25);
        assert!(gun.can_attack());
        assert!(!gun.can_be_targeted());
    }

    #[test]
    fn test_zero_health_fighter_starts_dead() {
        let f = unit(Team::Blue, 0, 5, 1.0);
        assert!(f.is_dead());
        assert!(!f.can_attack());
    }

    #[test]
    fn test_from_default_archetypes() {
        let config = GameConfig::default();
        let soldier = Fighter::from_archetype(Team::Red, &config.archetypes["soldier"]);
        assert_eq!(soldier.health(), soldier.max_health());
        assert!(soldier.can_attack());
        let post = Fighter::from_archetype(Team::Blue, &config.archetypes["outpost"]);
        assert!(!post.can_attack());
        assert!(post.is_structure());
    }

    // ---- Initiative ----

    #[test]
    fn test_mover_beats_immobile() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let walking = Some(WalkProgress::new(true, 0.2, 0.5));
        assert_eq!(resolve(walking, None, &mut rng), Initiative::First);
        assert_eq!(resolve(None, walking, &mut rng), Initiative::Second);
    }

    #[test]
    fn test_neither_can_move_second_wins() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(resolve(None, None, &mut rng), Initiative::Second);
    }

    #[test]
    fn test_walker_beats_resting() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let walking = Some(WalkProgress::new(true, 0.1, 0.5));
        let resting = Some(WalkProgress::new(false, 0.0, 0.5));
        assert_eq!(resolve(walking, resting, &mut rng), Initiative::First);
        assert_eq!(resolve(resting, walking, &mut rng), Initiative::Second);
    }

    #[test]
    fn test_neither_walking_defaults_to_second() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let resting = Some(WalkProgress::new(false, 0.3, 0.5));
        assert_eq!(resolve(resting, resting, &mut rng), Initiative::Second);
    }

    #[test]
    fn test_zero_progress_walkers_skip_the_draw() {
        use rand::RngCore;

        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut untouched = ChaCha8Rng::seed_from_u64(9);
        let idle = Some(WalkProgress::new(true, 0.0, 0.5));
        assert_eq!(resolve(idle, idle, &mut rng), Initiative::Second);
        assert_eq!(rng.next_u64(), untouched.next_u64());
    }

    #[test]
    fn test_lottery_only_one_side_has_progress() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let far = Some(WalkProgress::new(true, 0.4, 0.5));
        let start = Some(WalkProgress::new(true, 0.0, 0.5));
        for _ in 0..50 {
            assert_eq!(resolve(far, start, &mut rng), Initiative::First);
            assert_eq!(resolve(start, far, &mut rng), Initiative::Second);
        }
    }

    #[test]
    fn test_lottery_weighted_by_distance() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let far = Some(WalkProgress::new(true, 0.9, 1.0));
        let near = Some(WalkProgress::new(true, 0.1, 1.0));
        let wins = (0..2000)
            .filter(|_| resolve(far, near, &mut rng) == Initiative::First)
            .count();
        // Expected 90%.
        assert!((1700..1900).contains(&wins), "first won {wins} of 2000");
    }

    #[test]
    fn test_lottery_is_deterministic_per_seed() {
        let a = Some(WalkProgress::new(true, 0.3, 0.5));
        let b = Some(WalkProgress::new(true, 0.2, 0.5));
        let run = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            (0..32).map(|_| resolve(a, b, &mut rng)).collect::<Vec<_>>()
        };
        assert_eq!(run(7), run(7));
    }

    // ---- Battle ----

    #[test]
    fn test_scenario_a_initiative_winner_kills_first() {
        let mut x = unit(Team::Red, 100, 10, 1.0);
        let mut y = unit(Team::Blue, 30, 5, 2.0);
        let mut battle = Battle::mutual(X, &x, Y, &y).unwrap();
        assert!(!battle.interruptible());
        assert!(!battle.only_first_can_attack());

        let mut attack_times = Vec::new();
        let mut outcome = None;
        for second in 1..=6 {
            if battle.is_resolved() {
                break;
            }
            let report = battle.tick(1.0, &mut x, &mut y).unwrap();
            for attack in &report.attacks {
                assert_eq!(attack.attacker, X, "Y must never attack");
                attack_times.push(second);
            }
            if report.outcome.is_some() {
                outcome = report.outcome;
            }
        }

        assert_eq!(attack_times, vec![1, 2, 3]);
        assert_eq!(outcome, Some(BattleOutcome::Won { winner: X, loser: Y }));
        assert!(y.is_dead());
        assert_eq!(x.health(), 100);
    }

    #[test]
    fn test_loser_strikes_after_one_and_a_half_periods() {
        let mut a = unit(Team::Red, 1000, 1, 1.0);
        let mut b = unit(Team::Blue, 1000, 1, 1.0);
        let mut battle = Battle::mutual(X, &a, Y, &b).unwrap();

        let mut b_attacks = Vec::new();
        for step in 1..=6 {
            let report = battle.tick(0.5, &mut a, &mut b).unwrap();
            if report.attacks.iter().any(|r| r.attacker == Y) {
                b_attacks.push(step);
            }
        }
        // t = 1.5 and t = 2.5
        assert_eq!(b_attacks, vec![3, 5]);
    }

    #[test]
    fn test_first_listed_attacks_first_on_tie() {
        let mut a = unit(Team::Red, 10, 10, 1.0);
        let mut b = unit(Team::Blue, 10, 10, 1.0);
        let mut battle = Battle::mutual(X, &a, Y, &b).unwrap();
        // Both timers full on the same tick: first side lands the kill.
        let report = battle.tick(1.5, &mut a, &mut b).unwrap();
        assert_eq!(report.attacks.len(), 1);
        assert_eq!(report.outcome, Some(BattleOutcome::Won { winner: X, loser: Y }));
        assert_eq!(a.health(), 10);
    }

    #[test]
    fn test_thirty_small_ticks_make_one_period() {
        let mut a = unit(Team::Red, 100, 10, 1.0);
        let mut b = outpost(Team::Blue);
        let mut battle = Battle::one_attacker(X, &a, Y, &b).unwrap();
        let mut attacks = 0;
        for _ in 0..30 {
            attacks += battle.tick(1.0 / 30.0, &mut a, &mut b).unwrap().attacks.len();
        }
        assert_eq!(attacks, 1);
    }

    #[test]
    fn test_scenario_b_outpost_never_strikes_back() {
        let mut u = unit(Team::Red, 100, 50, 1.0);
        let mut post = outpost(Team::Blue);
        let mut battle = Battle::one_attacker(X, &u, Y, &post).unwrap();
        assert!(battle.interruptible());
        assert!(battle.only_first_can_attack());
        assert!(battle.is_attacker(X));
        assert!(!battle.is_attacker(Y));

        let mut outcome = None;
        while outcome.is_none() {
            let report = battle.tick(1.0, &mut u, &mut post).unwrap();
            assert!(report.attacks.iter().all(|r| r.attacker == X));
            outcome = report.outcome;
        }
        assert_eq!(outcome, Some(BattleOutcome::Won { winner: X, loser: Y }));
        assert_eq!(u.health(), 100);
    }

    #[test]
    fn test_unarmed_attacker_is_an_error() {
        let post = outpost(Team::Blue);
        let u = unit(Team::Red, 100, 10, 1.0);
        assert_eq!(
            Battle::one_attacker(Y, &post, X, &u),
            Err(CombatError::UnarmedAttacker(Y))
        );
    }

    #[test]
    fn test_paused_battle_does_not_advance() {
        let mut a = unit(Team::Red, 100, 10, 1.0);
        let mut b = unit(Team::Blue, 100, 10, 1.0);
        let mut battle = Battle::mutual(X, &a, Y, &b).unwrap();

        assert!(battle.set_paused(true));
        assert!(!battle.set_paused(true));
        for _ in 0..5 {
            let report = battle.tick(1.0, &mut a, &mut b).unwrap();
            assert!(report.attacks.is_empty());
        }
        assert_eq!(b.health(), 100);

        assert!(battle.set_paused(false));
        let report = battle.tick(1.0, &mut a, &mut b).unwrap();
        assert_eq!(report.attacks.len(), 1);
    }

    #[test]
    fn test_ticking_resolved_battle_is_an_error() {
        let mut a = unit(Team::Red, 100, 10, 1.0);
        let mut b = unit(Team::Blue, 10, 10, 1.0);
        let mut battle = Battle::mutual(X, &a, Y, &b).unwrap();
        battle.tick(1.0, &mut a, &mut b).unwrap();
        assert!(battle.is_resolved());
        assert!(!battle.set_paused(true));
        assert_eq!(
            battle.tick(1.0, &mut a, &mut b),
            Err(CombatError::BattleResolved(battle.key()))
        );
    }

    #[test]
    fn test_dead_side_resolves_without_attacking() {
        let mut a = unit(Team::Red, 100, 10, 1.0);
        let mut b = unit(Team::Blue, 100, 10, 1.0);
        let mut battle = Battle::mutual(X, &a, Y, &b).unwrap();
        b.apply_damage(1000);

        let report = battle.tick(5.0, &mut a, &mut b).unwrap();
        assert!(report.attacks.is_empty());
        assert_eq!(report.outcome, Some(BattleOutcome::Won { winner: X, loser: Y }));
    }

    #[test]
    fn test_both_dead_abandons() {
        let mut a = unit(Team::Red, 10, 10, 1.0);
        let mut b = unit(Team::Blue, 10, 10, 1.0);
        let mut battle = Battle::mutual(X, &a, Y, &b).unwrap();
        a.apply_damage(10);
        b.apply_damage(10);
        let report = battle.tick(1.0, &mut a, &mut b).unwrap();
        assert_eq!(report.outcome, Some(BattleOutcome::Abandoned { survivor: None }));
        assert_eq!(
            battle.state(),
            BattleState::Resolved(BattleOutcome::Abandoned { survivor: None })
        );
    }

    #[test]
    fn test_opponent_lookup() {
        let a = unit(Team::Red, 10, 1, 1.0);
        let b = unit(Team::Blue, 10, 1, 1.0);
        let battle = Battle::mutual(Y, &a, X, &b).unwrap();
        assert_eq!(battle.key().low, X);
        assert_eq!(battle.first(), Y);
        assert_eq!(battle.opponent_of(X), Some(Y));
        assert_eq!(battle.opponent_of(Y), Some(X));
        assert_eq!(battle.opponent_of(FighterId(99)), None);
    }

    // ---- Properties ----

    proptest! {
        #[test]
        fn prop_damage_conservation(health in 0u32..1000, hits in prop::collection::vec(0u32..300, 0..20)) {
            let mut f = unit(Team::Red, health, 1, 1.0);
            let mut kills = 0;
            for amount in hits {
                let before = f.health();
                let was_dead = f.is_dead();
                let outcome = f.apply_damage(amount);
                prop_assert_eq!(f.health(), before.saturating_sub(amount));
                prop_assert_eq!(f.is_dead(), f.health() == 0);
                prop_assert!(!(was_dead && !f.is_dead()));
                if outcome.killed {
                    kills += 1;
                }
            }
            prop_assert!(kills <= 1);
        }

        #[test]
        fn prop_battle_keeps_health_invariant(
            ha in 1u32..300, hb in 1u32..300,
            sa in 0u32..60, sb in 0u32..60,
            pa in 0.1f64..3.0, pb in 0.1f64..3.0,
            dt in 0.01f64..1.0,
        ) {
            let mut a = unit(Team::Red, ha, sa, pa);
            let mut b = unit(Team::Blue, hb, sb, pb);
            let mut battle = Battle::mutual(X, &a, Y, &b).unwrap();
            for _ in 0..400 {
                if battle.is_resolved() {
                    break;
                }
                let report = battle.tick(dt, &mut a, &mut b).unwrap();
                prop_assert!(report.attacks.len() <= 2);
                prop_assert_eq!(a.is_dead(), a.health() == 0);
                prop_assert_eq!(b.is_dead(), b.health() == 0);
                if let Some(BattleOutcome::Won { loser, .. }) = report.outcome {
                    let dead = if loser == X { a.is_dead() } else { b.is_dead() };
                    prop_assert!(dead);
                }
            }
        }
    }
}
