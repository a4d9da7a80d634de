use rules_engine::spells::{
    cantrip_dice, concentration_check, full_caster_slots, spell_attack_bonus, spell_save_dc,
    upcast_damage, SpellSlots,
};
use rules_engine::{Dice, DiceFormula, DieSize, RulesError};

#[test]
fn save_dc_and_attack_bonus_formulas() {
    assert_eq!(spell_save_dc(3, 4), 15);
    assert_eq!(spell_attack_bonus(3, 4), 7);
    assert_eq!(spell_save_dc(2, -1), 9);
}

#[test]
fn full_caster_progression_spot_checks() {
    assert_eq!(full_caster_slots(1), SpellSlots([2, 0, 0, 0, 0, 0, 0, 0, 0]));
    assert_eq!(full_caster_slots(5), SpellSlots([4, 3, 2, 0, 0, 0, 0, 0, 0]));
    assert_eq!(
        full_caster_slots(20),
        SpellSlots([4, 3, 3, 3, 3, 2, 2, 1, 1])
    );
    // Out-of-range caster levels clamp into the table.
    assert_eq!(full_caster_slots(0), full_caster_slots(1));
    assert_eq!(full_caster_slots(25), full_caster_slots(20));
}

#[test]
fn use_slot_returns_a_copy_and_never_mutates_the_input() {
    let slots = full_caster_slots(5);
    let spent = slots.use_slot(3).unwrap();
    assert_eq!(spent.slot(3).unwrap(), 1);
    // The input vector is untouched.
    assert_eq!(slots.slot(3).unwrap(), 2);
}

#[test]
fn consuming_an_empty_slot_is_an_error() {
    let slots = full_caster_slots(5);
    assert_eq!(
        slots.use_slot(9),
        Err(RulesError::NoSlotAvailable { level: 9 })
    );

    let mut drained = slots;
    drained = drained.use_slot(3).unwrap();
    drained = drained.use_slot(3).unwrap();
    assert_eq!(
        drained.use_slot(3),
        Err(RulesError::NoSlotAvailable { level: 3 })
    );
}

#[test]
fn restore_clamps_at_the_table_maximum() {
    let max = full_caster_slots(5);
    let spent = max.use_slot(1).unwrap();
    let restored = spent.restore_slot(1, &max).unwrap();
    assert_eq!(restored.slot(1).unwrap(), 4);
    // Restoring a full slot stays at the maximum.
    let again = restored.restore_slot(1, &max).unwrap();
    assert_eq!(again.slot(1).unwrap(), 4);
}

#[test]
fn spell_levels_outside_one_to_nine_are_rejected() {
    let slots = full_caster_slots(5);
    assert_eq!(slots.use_slot(0), Err(RulesError::InvalidSpellLevel(0)));
    assert_eq!(slots.slot(10), Err(RulesError::InvalidSpellLevel(10)));
}

#[test]
fn concentration_dc_is_half_damage_with_a_floor_of_ten() {
    let mut dice = Dice::from_scripted(vec![]);
    let res = concentration_check(&mut dice, 25, 0, Some(12));
    assert_eq!(res.dc, 12);
    assert!(res.maintained);

    let res = concentration_check(&mut dice, 4, 0, Some(9));
    assert_eq!(res.dc, 10);
    assert!(!res.maintained);

    let res = concentration_check(&mut dice, 22, 3, Some(8));
    assert_eq!(res.dc, 11);
    assert_eq!(res.total, 11);
    assert!(res.maintained);
}

#[test]
fn cantrips_scale_at_levels_five_eleven_seventeen() {
    let base = DiceFormula::new(1, DieSize::D10, 0);
    assert_eq!(cantrip_dice(base, 1).count, 1);
    assert_eq!(cantrip_dice(base, 4).count, 1);
    assert_eq!(cantrip_dice(base, 5).count, 2);
    assert_eq!(cantrip_dice(base, 10).count, 2);
    assert_eq!(cantrip_dice(base, 11).count, 3);
    assert_eq!(cantrip_dice(base, 16).count, 3);
    assert_eq!(cantrip_dice(base, 17).count, 4);
    assert_eq!(cantrip_dice(base, 20).count, 4);
    // Die size never changes.
    assert_eq!(cantrip_dice(base, 20).size, DieSize::D10);
}

#[test]
fn upcasting_with_matching_die_sums_into_one_term() {
    let base = DiceFormula::new(3, DieSize::D6, 0);
    let per_level = DiceFormula::new(1, DieSize::D6, 0);
    let terms = upcast_damage(base, per_level, 2);
    assert_eq!(terms, vec![DiceFormula::new(5, DieSize::D6, 0)]);
}

#[test]
fn upcasting_with_a_different_die_appends_a_term() {
    let base = DiceFormula::new(8, DieSize::D6, 0);
    let per_level = DiceFormula::new(1, DieSize::D10, 0);
    let terms = upcast_damage(base, per_level, 3);
    assert_eq!(
        terms,
        vec![
            DiceFormula::new(8, DieSize::D6, 0),
            DiceFormula::new(3, DieSize::D10, 0),
        ]
    );
}

#[test]
fn upcasting_zero_levels_is_the_base_alone() {
    let base = DiceFormula::new(3, DieSize::D6, 1);
    let per_level = DiceFormula::new(1, DieSize::D6, 0);
    assert_eq!(upcast_damage(base, per_level, 0), vec![base]);
}
