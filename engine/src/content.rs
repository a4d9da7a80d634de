//! Built-in demo content, embedded at compile time and keyed by id in
//! insertion order.

use indexmap::IndexMap;

pub fn builtin_targets() -> IndexMap<&'static str, &'static str> {
    IndexMap::from([
        ("goblin", include_str!("../content/targets/goblin.json")),
        ("skeleton", include_str!("../content/targets/skeleton.json")),
    ])
}

pub fn builtin_weapons() -> IndexMap<&'static str, &'static str> {
    IndexMap::from([("basic", include_str!("../content/weapons/basic.json"))])
}
