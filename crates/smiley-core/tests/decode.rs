use proptest::prelude::*;
use smiley_core::{
    DEFAULT_SCHEMA, DecodeResult, DeviceFamily, FieldLabel, SchemaRegistry, decode, dispatch,
};

/// 14-character families with a production year each one dispatches on.
const STANDARD_FAMILIES: [(DeviceFamily, &str); 4] = [
    (DeviceFamily::LegacyTouch1100Series, "17"),
    (DeviceFamily::SmileyMini, "22"),
    (DeviceFamily::SmileyTerminal, "23"),
    (DeviceFamily::SmileyTouch, "24"),
];

fn registry() -> SchemaRegistry {
    SchemaRegistry::bundled().expect("bundled schema")
}

/// Builds a 14-character serial from the first code of each table.
fn well_formed(registry: &SchemaRegistry, family: DeviceFamily, year: &str) -> String {
    let layout = registry.layout(family);
    let first = |codes: &smiley_core::Vocabulary| {
        codes
            .iter()
            .map(|(code, _)| code.to_string())
            .find(|code| code.len() == 1)
            .expect("single-character code")
    };
    let changelog = layout
        .changelog_codes()
        .iter()
        .map(|(code, _)| code.to_string())
        .next()
        .expect("changelog code");
    format!(
        "{year}01{}{}{}{}{changelog}0001",
        first(layout.type_codes()),
        first(layout.generation_codes()),
        first(layout.radio_codes()),
        first(layout.hardware_codes()),
    )
}

#[test]
fn well_formed_serials_decode_cleanly() {
    let registry = registry();
    for (family, year) in STANDARD_FAMILIES {
        let serial = well_formed(&registry, family, year);
        assert_eq!(dispatch(&serial, &registry), Some(family), "{serial}");

        let (result, errors) = decode(&serial, &registry);
        assert!(errors.is_empty(), "{serial}: {errors:?}");
        for (name, field) in [
            ("schema_name", &result.schema_name),
            ("device", &result.device),
            ("year", &result.year),
            ("week", &result.week),
            ("generation", &result.generation),
            ("radio", &result.radio),
            ("network", &result.network),
            ("hardware", &result.hardware),
            ("changelog", &result.changelog),
            ("sequence", &result.sequence),
        ] {
            let value = field.as_deref().unwrap_or_else(|| panic!("{serial}: {name} missing"));
            assert_ne!(value, "Unknown", "{serial}: {name}");
        }
        assert_eq!(result.schema_name.as_deref(), Some(family.name()));
        assert_eq!(result.sequence.as_deref(), Some("0001"));
    }
}

#[test]
fn bundled_terminal_wall_serial() {
    let (result, errors) = decode("2301x42b020042", &registry());
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(result.device.as_deref(), Some("Smiley Wall (Wall attachment)"));
    assert_eq!(result.radio.as_deref(), Some("Quectel BG95 (LTE-M / NB-IoT)"));
    assert_eq!(result.network.as_deref(), Some("LTE-M / NB-IoT"));
    assert_eq!(result.changelog.as_deref(), Some("New battery pack"));
}

#[test]
fn bundled_legacy_touch_1000() {
    let (result, errors) = decode("1801A05001", &registry());
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(result.device.as_deref(), Some("Smiley Touch 1000"));
    assert_eq!(result.radio.as_deref(), Some("Refer to Sharepoint document"));
}

#[test]
fn short_inputs_are_unrecognized() {
    let registry = registry();
    for len in 0..10 {
        let serial = "2205M1A2055001"[..len].to_string();
        let (result, errors) = decode(&serial, &registry);
        assert_eq!(result, DecodeResult::default());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "Serial number format not recognized");
    }
}

#[test]
fn unknown_type_is_one_error_in_every_family() {
    let bundled = registry();
    let mut value: serde_json::Value = serde_json::from_str(DEFAULT_SCHEMA).expect("bundled json");
    for (family, _) in STANDARD_FAMILIES {
        value[family.name()]["type"] = serde_json::json!({});
    }
    let untyped = SchemaRegistry::load(&value.to_string()).expect("schema without types");

    for (family, year) in STANDARD_FAMILIES {
        let serial = well_formed(&bundled, family, year);
        let (result, errors) = decode(&serial, &untyped);
        let messages: Vec<_> = errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            [format!("Invalid type code '{}' for {}", &serial[4..5], family.name())]
        );
        assert_eq!(result.schema_name.as_deref(), Some(family.name()));
        assert_eq!(result.device.as_deref(), Some("Unknown"));
    }
}

#[test]
fn registry_is_shareable_across_threads() {
    let registry = std::sync::Arc::new(registry());
    let handles: Vec<_> = ["2205M1A2055001", "1801A05001"]
        .into_iter()
        .map(|serial| {
            let registry = std::sync::Arc::clone(&registry);
            std::thread::spawn(move || decode(serial, &registry).1.len())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().expect("decode thread"), 0);
    }
}

proptest! {
    #[test]
    fn decode_ignores_case(serial in "[0-9A-Za-z]{0,16}") {
        let registry = registry();
        prop_assert_eq!(
            decode(&serial, &registry),
            decode(&serial.to_lowercase(), &registry)
        );
    }

    #[test]
    fn decode_is_idempotent(serial in "[0-9A-Z]{10,14}") {
        let registry = registry();
        prop_assert_eq!(decode(&serial, &registry), decode(&serial, &registry));
    }

    #[test]
    fn unknown_code_is_one_error(
        family_index in 0..STANDARD_FAMILIES.len(),
        field in prop::sample::select(vec![
            FieldLabel::Generation,
            FieldLabel::Radio,
            FieldLabel::Hardware,
            FieldLabel::Changelog,
        ]),
        code in "[0-9A-Z]{2}",
    ) {
        let registry = registry();
        let (family, year) = STANDARD_FAMILIES[family_index];
        let layout = registry.layout(family);
        let (range, codes) = match field {
            FieldLabel::Generation => (5..6, layout.generation_codes()),
            FieldLabel::Radio => (6..7, layout.radio_codes()),
            FieldLabel::Hardware => (7..8, layout.hardware_codes()),
            _ => (8..10, layout.changelog_codes()),
        };
        let code = &code[..range.len()];
        prop_assume!(codes.get(code).is_none());

        let mut serial = well_formed(&registry, family, year);
        serial.replace_range(range, code);
        let (result, errors) = decode(&serial, &registry);
        prop_assert_eq!(errors.len(), 1, "{}: {:?}", serial, errors);

        let label = match (family, field) {
            (DeviceFamily::LegacyTouch1100Series, FieldLabel::Changelog) => FieldLabel::Cable,
            _ => field,
        };
        let message = errors[0].to_string();
        prop_assert!(
            message.starts_with(&format!("Invalid {label} code '{code}' for ")),
            "{}", message
        );
        let value = match field {
            FieldLabel::Generation => &result.generation,
            FieldLabel::Radio => &result.radio,
            FieldLabel::Hardware => &result.hardware,
            _ => &result.changelog,
        };
        prop_assert_eq!(value.as_deref(), Some("Unknown"));
        if field == FieldLabel::Radio {
            prop_assert_eq!(result.network.as_deref(), Some("Unknown"));
        }
    }
}
