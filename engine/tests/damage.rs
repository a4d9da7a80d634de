use rules_engine::{resolve_damage, DamageInput, DamageType, Defenses, Dice, DiceFormula, DieSize};

fn fire_2d6(override_roll: Option<i32>, is_critical: bool) -> DamageInput {
    DamageInput {
        dice: DiceFormula::new(2, DieSize::D6, 0),
        damage_type: DamageType::Fire,
        is_critical,
        override_roll,
    }
}

fn defenses(
    resist: &[DamageType],
    vuln: &[DamageType],
    immune: &[DamageType],
) -> Defenses {
    Defenses {
        resistances: resist.iter().copied().collect(),
        vulnerabilities: vuln.iter().copied().collect(),
        immunities: immune.iter().copied().collect(),
    }
}

#[test]
fn resistance_halves_rounding_down() {
    let mut dice = Dice::from_scripted(vec![]);
    let d = defenses(&[DamageType::Fire], &[], &[]);
    let res = resolve_damage(&mut dice, fire_2d6(Some(7), false), Some(&d));
    assert_eq!(res.base_damage, 7);
    assert_eq!(res.final_damage, 3);
    assert!(res.was_resisted);
    assert!(!res.was_vulnerable);
    assert!(!res.was_immune);
}

#[test]
fn vulnerability_doubles() {
    let mut dice = Dice::from_scripted(vec![]);
    let d = defenses(&[], &[DamageType::Fire], &[]);
    let res = resolve_damage(&mut dice, fire_2d6(Some(7), false), Some(&d));
    assert_eq!(res.final_damage, 14);
    assert!(res.was_vulnerable);
}

#[test]
fn immunity_zeroes_and_beats_everything_else() {
    let mut dice = Dice::from_scripted(vec![]);
    // Exactly one bucket applies per check: immune wins over both.
    let d = defenses(&[DamageType::Fire], &[DamageType::Fire], &[DamageType::Fire]);
    let res = resolve_damage(&mut dice, fire_2d6(Some(9), false), Some(&d));
    assert_eq!(res.final_damage, 0);
    assert!(res.was_immune);
    assert!(!res.was_resisted);
    assert!(!res.was_vulnerable);
}

#[test]
fn resistance_beats_vulnerability() {
    let mut dice = Dice::from_scripted(vec![]);
    let d = defenses(&[DamageType::Fire], &[DamageType::Fire], &[]);
    let res = resolve_damage(&mut dice, fire_2d6(Some(9), false), Some(&d));
    assert_eq!(res.final_damage, 4);
    assert!(res.was_resisted);
}

#[test]
fn unrelated_defenses_leave_damage_alone() {
    let mut dice = Dice::from_scripted(vec![]);
    let d = defenses(&[DamageType::Cold], &[], &[DamageType::Poison]);
    let res = resolve_damage(&mut dice, fire_2d6(Some(8), false), Some(&d));
    assert_eq!(res.final_damage, 8);
}

#[test]
fn critical_damage_rolls_doubled_dice_with_flat_modifier() {
    // 1d8+3 critical rolls 2d8, modifier untouched.
    let mut dice = Dice::from_scripted(vec![4, 5]);
    let input = DamageInput {
        dice: DiceFormula::new(1, DieSize::D8, 3),
        damage_type: DamageType::Slashing,
        is_critical: true,
        override_roll: None,
    };
    let res = resolve_damage(&mut dice, input, None);
    assert_eq!(res.rolls, vec![4, 5]);
    assert_eq!(res.base_damage, 12);
    assert_eq!(res.final_damage, 12);
}

#[test]
fn damage_without_defenses_passes_through() {
    let mut dice = Dice::from_seed(9);
    let res = resolve_damage(&mut dice, fire_2d6(None, false), None);
    assert!(res.base_damage >= 2 && res.base_damage <= 12);
    assert_eq!(res.base_damage, res.final_damage);
}
