use rules_engine::api::{simulate_duel, simulate_duel_many, DuelConfig};

fn goblin_duel(seed: u64) -> DuelConfig {
    DuelConfig {
        target_id: Some("goblin".into()),
        target_json: None,
        weapons_id: Some("basic".into()),
        weapons_json: None,
        weapon: "longsword".into(),
        actor_conditions: vec![],
        enemy_conditions: vec![],
        seed,
        actor_hp: Some(12),
        actor_temp_hp: 0,
    }
}

#[test]
fn duel_with_builtins_runs_to_a_verdict() {
    let res = simulate_duel(goblin_duel(2025)).expect("duel ran");
    assert!(res.rounds > 0);
    assert!(matches!(res.winner.as_str(), "actor" | "enemy" | "draw"));
    assert!(!res.log.is_empty());
}

#[test]
fn identical_seeds_give_identical_duels() {
    let a = simulate_duel(goblin_duel(77)).unwrap();
    let b = simulate_duel(goblin_duel(77)).unwrap();
    assert_eq!(a.log, b.log);
    assert_eq!(a.winner, b.winner);
    assert_eq!(a.rounds, b.rounds);
}

#[test]
fn duel_many_summary_accounts_for_every_trial() {
    let stats = simulate_duel_many(goblin_duel(1), 50).unwrap();
    assert_eq!(stats.samples, 50);
    assert_eq!(stats.actor_wins + stats.enemy_wins + stats.draws, 50);
}

#[test]
fn unknown_builtin_target_is_an_error() {
    let cfg = DuelConfig {
        target_id: Some("tarrasque".into()),
        ..goblin_duel(1)
    };
    assert!(simulate_duel(cfg).is_err());
}

#[test]
fn config_parses_from_json_and_yaml() {
    let json = r#"{
        "target_id": "goblin",
        "weapons_id": "basic",
        "weapon": "shortsword",
        "enemy_conditions": ["poisoned"],
        "seed": 9
    }"#;
    let cfg = DuelConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.weapon, "shortsword");
    assert_eq!(cfg.seed, 9);

    let yaml = "target_id: goblin\nweapons_id: basic\nweapon: mace\nseed: 4\n";
    let cfg = DuelConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(cfg.weapon, "mace");
    assert!(simulate_duel(cfg).is_ok());
}

#[test]
fn temp_hp_shows_up_in_the_duel() {
    let cfg = DuelConfig {
        actor_temp_hp: 5,
        ..goblin_duel(3)
    };
    let res = simulate_duel(cfg).unwrap();
    assert!(res
        .log
        .iter()
        .any(|line| line.contains("temporary HP")));
}
