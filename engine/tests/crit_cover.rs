use rules_engine::{
    resolve_attack, resolve_attack_with_conditions, AttackInput, ConditionKind,
    ConditionedAttackInput, Cover, Dice, Vantage,
};

#[test]
fn crit_on_kept_20_without_advantage() {
    let mut dice = Dice::from_scripted(vec![20]);
    let res = resolve_attack(
        &mut dice,
        AttackInput {
            attack_bonus: 5,
            target_ac: 10,
            vantage: Vantage::Normal,
            cover: Cover::None,
            override_roll: None,
        },
    );
    assert!(res.is_crit);
    assert_eq!(res.raw_rolls, vec![20]);
    assert_eq!(res.roll, 20);
    assert!(res.hit);
}

#[test]
fn crit_on_kept_20_with_advantage() {
    let mut dice = Dice::from_scripted(vec![7, 20]);
    let res = resolve_attack(
        &mut dice,
        AttackInput {
            attack_bonus: 5,
            target_ac: 10,
            vantage: Vantage::Advantage,
            cover: Cover::None,
            override_roll: None,
        },
    );
    assert!(res.is_crit);
    assert_eq!(res.raw_rolls, vec![7, 20]);
    assert_eq!(res.roll, 20);
}

#[test]
fn no_crit_when_twenty_is_dropped_with_disadvantage() {
    let mut dice = Dice::from_scripted(vec![20, 7]);
    let res = resolve_attack(
        &mut dice,
        AttackInput {
            attack_bonus: 5,
            target_ac: 10,
            vantage: Vantage::Disadvantage,
            cover: Cover::None,
            override_roll: None,
        },
    );
    assert!(!res.is_crit);
    assert_eq!(res.raw_rolls, vec![20, 7]);
    assert_eq!(res.roll, 7);
}

#[test]
fn cover_bonuses_are_applied() {
    assert_eq!(Cover::None.ac_bonus(), 0);
    assert_eq!(Cover::Half.ac_bonus(), 2);
    assert_eq!(Cover::ThreeQuarters.ac_bonus(), 5);

    let mut dice = Dice::from_scripted(vec![12]);
    let res = resolve_attack(
        &mut dice,
        AttackInput {
            attack_bonus: 2,
            target_ac: 13,
            vantage: Vantage::Normal,
            cover: Cover::Half,
            override_roll: None,
        },
    );
    assert_eq!(res.ac, 15);
    assert!(!res.hit);
}

#[test]
fn melee_hit_on_paralyzed_defender_is_promoted_to_crit() {
    // Paralyzed also grants advantage, so two dice are consumed.
    let mut dice = Dice::from_scripted(vec![15, 3]);
    let res = resolve_attack_with_conditions(
        &mut dice,
        ConditionedAttackInput {
            attack: AttackInput {
                attack_bonus: 5,
                target_ac: 10,
                vantage: Vantage::Normal,
                cover: Cover::None,
                override_roll: None,
            },
            distance_ft: 5,
            attacker_conditions: vec![],
            defender_conditions: vec![ConditionKind::Paralyzed],
        },
    );
    assert!(res.hit);
    assert!(res.is_crit);
    assert!(!res.nat20);
}

#[test]
fn no_crit_promotion_beyond_melee_range() {
    let mut dice = Dice::from_scripted(vec![15, 3]);
    let res = resolve_attack_with_conditions(
        &mut dice,
        ConditionedAttackInput {
            attack: AttackInput {
                attack_bonus: 5,
                target_ac: 10,
                vantage: Vantage::Normal,
                cover: Cover::None,
                override_roll: None,
            },
            distance_ft: 30,
            attacker_conditions: vec![],
            defender_conditions: vec![ConditionKind::Paralyzed],
        },
    );
    assert!(res.hit);
    assert!(!res.is_crit);
}
