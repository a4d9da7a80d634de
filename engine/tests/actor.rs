use rules_engine::{proficiency_bonus, Ability, AbilityScores, Actor, Dice, Skill, Vantage};

fn sample_fighter() -> Actor {
    // L1 Fighter example: PB +2, STR/CON saves, Athletics + Perception
    Actor {
        abilities: AbilityScores {
            str_: 16,
            dex: 14,
            con: 14,
            int_: 10,
            wis: 12,
            cha: 8,
        },
        proficiency_bonus: 2,
        save_proficiencies: [Ability::Str, Ability::Con].into_iter().collect(),
        skill_proficiencies: [Skill::Athletics, Skill::Perception].into_iter().collect(),
    }
}

#[test]
fn fighter_mods() {
    let a = sample_fighter();
    // ability mods
    assert_eq!(a.ability_mod(Ability::Str), 3);
    assert_eq!(a.ability_mod(Ability::Dex), 2);
    assert_eq!(a.ability_mod(Ability::Wis), 1);
    // save profs: STR/CON add +2 PB
    assert_eq!(a.save_mod(Ability::Str), 5);
    assert_eq!(a.save_mod(Ability::Con), 4);
    assert_eq!(a.save_mod(Ability::Dex), 2);
    // skill profs: Athletics (STR), Perception (WIS) add +2 PB
    assert_eq!(a.skill_mod(Skill::Athletics), 5);
    assert_eq!(a.skill_mod(Skill::Perception), 3);
}

#[test]
fn fighter_checks_are_deterministic() {
    let a = sample_fighter();
    let mut dice = Dice::from_seed(222);
    let res = a.skill_check(&mut dice, Skill::Athletics, Vantage::Normal, 13);
    assert_eq!(res.passed, res.total >= res.dc);
    assert_eq!(res.total, res.roll + 5);
}

#[test]
fn skills_map_to_their_abilities() {
    assert_eq!(Skill::Athletics.ability(), Ability::Str);
    assert_eq!(Skill::Stealth.ability(), Ability::Dex);
    assert_eq!(Skill::Arcana.ability(), Ability::Int);
    assert_eq!(Skill::Perception.ability(), Ability::Wis);
    assert_eq!(Skill::Persuasion.ability(), Ability::Cha);
    assert_eq!(Skill::SleightOfHand.ability(), Ability::Dex);
    assert_eq!(Skill::AnimalHandling.ability(), Ability::Wis);
}

#[test]
fn skill_lookup_by_name() {
    assert_eq!(Skill::from_name("stealth"), Some(Skill::Stealth));
    assert_eq!(
        Skill::from_name("sleight_of_hand"),
        Some(Skill::SleightOfHand)
    );
    assert_eq!(Skill::from_name(" Perception "), Some(Skill::Perception));
    // Unknown names have no mapping; the caller handles None.
    assert_eq!(Skill::from_name("lockpicking"), None);
}

#[test]
fn proficiency_bonus_by_level() {
    assert_eq!(proficiency_bonus(1), 2);
    assert_eq!(proficiency_bonus(4), 2);
    assert_eq!(proficiency_bonus(5), 3);
    assert_eq!(proficiency_bonus(9), 4);
    assert_eq!(proficiency_bonus(13), 5);
    assert_eq!(proficiency_bonus(17), 6);
    assert_eq!(proficiency_bonus(20), 6);
}

#[test]
fn save_proficiency_flows_into_saving_throws() {
    let a = sample_fighter();
    let mut dice = Dice::from_scripted(vec![10]);
    let res = a.saving_throw(&mut dice, Ability::Str, 15, Vantage::Normal, &[]);
    assert_eq!(res.total, 15);
    assert!(res.passed);
}
