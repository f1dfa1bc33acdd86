use model_factories::{Attributes, Column, DataType, Factory, ModelRegistry, ModelSchema, Value};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn registry() -> ModelRegistry {
    ModelRegistry::new().with_model(ModelSchema::new(
        "demo",
        "Thing",
        vec![Column::new("name", DataType::Text)],
    ))
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Integer),
        any::<bool>().prop_map(Value::Boolean),
        "[a-zA-Z ]{0,8}".prop_map(Value::Text),
        Just(Value::Null),
    ]
}

fn mapping() -> impl Strategy<Value = BTreeMap<String, Value>> {
    prop::collection::btree_map("[a-z]{1,4}", scalar(), 0..8)
}

proptest! {
    #[test]
    fn overrides_replace_and_extend_defaults(defaults in mapping(), overrides in mapping()) {
        let registry = registry();
        let seeded: Attributes = defaults.clone().into_iter().collect();
        let factory = Factory::define("Things", &registry)
            .blueprint("thing", "demo.Thing", "", move |_| Ok(seeded.clone()))
            .unwrap()
            .build();

        let properties = factory
            .properties("thing", overrides.clone().into_iter().collect())
            .unwrap();

        let mut expected = defaults.clone();
        expected.extend(overrides.clone());
        prop_assert_eq!(properties.len(), expected.len());
        for (key, value) in &expected {
            prop_assert_eq!(properties.get(key), Some(value));
        }

        // Default keys keep their original order ahead of new override keys.
        let order: Vec<&str> = properties.keys().take(defaults.len()).collect();
        let default_keys: Vec<&str> = defaults.keys().map(String::as_str).collect();
        prop_assert_eq!(order, default_keys);
    }

    #[test]
    fn templates_see_overridden_values(title in "[a-zA-Z0-9 ]{1,12}") {
        let registry = registry();
        let factory = Factory::define("Things", &registry)
            .blueprint("thing", "demo.Thing", "", |_| {
                Ok(Attributes::new()
                    .with("title", "Default")
                    .with("name", "<%(title)s>"))
            })
            .unwrap()
            .build();

        let overrides = Attributes::new().with("title", title.as_str());
        let properties = factory.properties("thing", overrides).unwrap();
        let expected = format!("<{}>", title);
        prop_assert_eq!(properties.get("name"), Some(&Value::Text(expected)));
    }
}
