use std::collections::BTreeSet;

use keymint_authority::{CreateRequest, delegate};
use keymint_capability::{CapabilitySet, Parser, ParserRegistry, Value};
use keymint_common::Timestamp;
use proptest::prelude::*;
use serde_json::{Map, Value as Json, json};

const CREATE: &str = "keymint.key.create";

fn registry() -> ParserRegistry {
    ParserRegistry::new().with_default(Parser::basic("default"))
}

fn fields() -> impl Strategy<Value = Map<String, Json>> {
    prop::collection::btree_map("[p-s]", any::<i32>(), 0..4).prop_map(|fields| {
        fields
            .into_iter()
            .map(|(key, value)| (key, json!(value)))
            .collect()
    })
}

fn capabilities() -> impl Strategy<Value = Map<String, Json>> {
    prop::collection::btree_map("app\\.[a-d]", fields(), 0..4).prop_map(|capabilities| {
        capabilities
            .into_iter()
            .map(|(name, fields)| (name, Json::Object(fields)))
            .collect()
    })
}

fn authority(locked: bool, held: &Map<String, Json>, expiry: i64) -> CapabilitySet {
    let parsers = registry();
    let mut set = CapabilitySet::new("parent", vec![], Timestamp::from_millis(expiry), None);
    set.insert(
        parsers
            .parse(CREATE, &json!({ "capabilityLock": locked }))
            .unwrap(),
    );
    for (name, data) in held {
        set.insert(parsers.parse(name, data).unwrap());
    }
    set
}

proptest! {
    #[test]
    fn locked_authorities_never_introduce_capabilities(
        held in capabilities(),
        requested in capabilities(),
    ) {
        let authority = authority(true, &held, 1_000_000);
        let request = CreateRequest::new(requested.clone());

        let created = delegate(&authority, "child".into(), &request, CREATE, &registry(), Timestamp::from_millis(0)).unwrap();

        let names: BTreeSet<&str> = created.capabilities().map(|capability| capability.name()).collect();
        for name in requested.keys() {
            prop_assert_eq!(names.contains(name.as_str()), held.contains_key(name));
        }
    }

    #[test]
    fn locked_authorities_win_every_shared_field(
        held in capabilities(),
        requested in capabilities(),
    ) {
        let authority = authority(true, &held, 1_000_000);
        let request = CreateRequest::new(requested.clone());

        let created = delegate(&authority, "child".into(), &request, CREATE, &registry(), Timestamp::from_millis(0)).unwrap();

        for (name, data) in &requested {
            let Some(granted) = authority.get(name) else { continue };
            let minted = created.get(name).unwrap();
            for key in data.as_object().unwrap().keys() {
                if let Some(value) = granted.get(key) {
                    prop_assert_eq!(minted.get(key), Some(value));
                }
            }
        }
    }

    #[test]
    fn unlocked_requesters_win_every_shared_field(
        held in capabilities(),
        requested in capabilities(),
    ) {
        let authority = authority(false, &held, 1_000_000);
        let request = CreateRequest::new(requested.clone());

        let created = delegate(&authority, "child".into(), &request, CREATE, &registry(), Timestamp::from_millis(0)).unwrap();

        for (name, data) in &requested {
            let minted = created.get(name).unwrap();
            for (key, value) in data.as_object().unwrap() {
                let expected = value.as_i64().map(Value::Integer);
                prop_assert_eq!(minted.get(key).cloned(), expected);
            }
        }
    }

    #[test]
    fn delegates_never_outlive_their_authority(
        now in -1_000_000i64..1_000_000,
        lifetime in proptest::option::of(any::<i64>()),
        expiry in any::<i64>(),
    ) {
        let authority = authority(false, &Map::new(), expiry);
        let request = CreateRequest { lifetime, ..CreateRequest::default() };

        let created = delegate(&authority, "child".into(), &request, CREATE, &registry(), Timestamp::from_millis(now)).unwrap();

        prop_assert!(created.expiry() <= authority.expiry());
    }
}
