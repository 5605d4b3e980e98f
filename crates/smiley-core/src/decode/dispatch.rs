use log::debug;

use super::layout;
use super::reader::SerialReader;
use crate::{DeviceFamily, SchemaRegistry};

/// Extra condition on top of the (length, discriminator) shape.
#[derive(Debug, Clone, Copy)]
enum Guard {
    None,
    /// Year code is numeric and not later than the legacy cutoff.
    LegacyYear,
}

#[derive(Debug)]
struct Rule {
    len: usize,
    discriminators: &'static [char],
    guard: Guard,
    family: DeviceFamily,
}

/// Shape rules, evaluated in order. The legacy Touch 1100/3100 rule shares the
/// `T` marker with the current Touch and only claims serials whose production
/// year is at or before the legacy cutoff.
const RULES: [Rule; 5] = [
    Rule {
        len: layout::LEGACY_SERIAL_LEN,
        discriminators: &['A'],
        guard: Guard::None,
        family: DeviceFamily::LegacyTouch1000,
    },
    Rule {
        len: layout::SERIAL_LEN,
        discriminators: &['T'],
        guard: Guard::LegacyYear,
        family: DeviceFamily::LegacyTouch1100Series,
    },
    Rule {
        len: layout::SERIAL_LEN,
        discriminators: &['M'],
        guard: Guard::None,
        family: DeviceFamily::SmileyMini,
    },
    Rule {
        len: layout::SERIAL_LEN,
        discriminators: &['V', 'X'],
        guard: Guard::None,
        family: DeviceFamily::SmileyTerminal,
    },
    Rule {
        len: layout::SERIAL_LEN,
        discriminators: &['T', 'C'],
        guard: Guard::None,
        family: DeviceFamily::SmileyTouch,
    },
];

impl Rule {
    fn matches(&self, reader: &SerialReader, registry: &SchemaRegistry) -> bool {
        if reader.len() != self.len {
            return false;
        }
        let Some(discriminator) = reader.char_at(layout::TYPE_OFFSET) else {
            return false;
        };
        if !self.discriminators.contains(&discriminator) {
            return false;
        }
        match self.guard {
            Guard::None => true,
            Guard::LegacyYear => {
                let until = registry
                    .layout(self.family)
                    .legacy_until_year()
                    .unwrap_or(layout::LEGACY_TOUCH_UNTIL_YEAR);
                reader
                    .read_year_code(layout::YEAR_RANGE)
                    .is_some_and(|year| year <= until)
            }
        }
    }
}

/// Picks the family whose layout applies to a normalized serial.
///
/// Returns `None` when no shape rule matches.
pub fn dispatch(normalized: &str, registry: &SchemaRegistry) -> Option<DeviceFamily> {
    dispatch_reader(&SerialReader::new(normalized), registry)
}

pub(crate) fn dispatch_reader(
    reader: &SerialReader,
    registry: &SchemaRegistry,
) -> Option<DeviceFamily> {
    let family = RULES
        .iter()
        .find(|rule| rule.matches(reader, registry))
        .map(|rule| rule.family);
    debug!("dispatch: len={} -> {:?}", reader.len(), family);
    family
}

#[cfg(test)]
mod tests {
    use super::dispatch;
    use crate::{DeviceFamily, SchemaRegistry};

    fn registry() -> SchemaRegistry {
        SchemaRegistry::bundled().expect("bundled schema")
    }

    #[test]
    fn dispatches_each_shape() {
        let registry = registry();
        let cases = [
            ("1801A05001", DeviceFamily::LegacyTouch1000),
            ("1712T1GA015001", DeviceFamily::LegacyTouch1100Series),
            ("2205M1A2055001", DeviceFamily::SmileyMini),
            ("2301V41A010042", DeviceFamily::SmileyTerminal),
            ("2301X41A010042", DeviceFamily::SmileyTerminal),
            ("2440T2W1030007", DeviceFamily::SmileyTouch),
            ("2440C2W1030007", DeviceFamily::SmileyTouch),
        ];
        for (serial, family) in cases {
            assert_eq!(dispatch(serial, &registry), Some(family), "{serial}");
        }
    }

    #[test]
    fn touch_after_cutoff_is_current_family() {
        let registry = registry();
        assert_eq!(
            dispatch("1912T1GA015001", &registry),
            Some(DeviceFamily::LegacyTouch1100Series)
        );
        assert_eq!(
            dispatch("2001T1GA015001", &registry),
            Some(DeviceFamily::SmileyTouch)
        );
    }

    #[test]
    fn non_numeric_year_never_claims_legacy_touch() {
        assert_eq!(
            dispatch("A712T1GA015001", &registry()),
            Some(DeviceFamily::SmileyTouch)
        );
    }

    #[test]
    fn cutoff_comes_from_schema() {
        let mut value: serde_json::Value =
            serde_json::from_str(crate::DEFAULT_SCHEMA).expect("bundled json");
        value["LegacyTouch1100_3100"]["until_year"] = serde_json::json!(21);
        let registry = SchemaRegistry::load(&value.to_string()).expect("schema");
        assert_eq!(
            dispatch("2101T1GA015001", &registry),
            Some(DeviceFamily::LegacyTouch1100Series)
        );
    }

    #[test]
    fn cutoff_defaults_when_schema_is_silent() {
        let mut value: serde_json::Value =
            serde_json::from_str(crate::DEFAULT_SCHEMA).expect("bundled json");
        value["LegacyTouch1100_3100"]
            .as_object_mut()
            .expect("object")
            .remove("until_year");
        let registry = SchemaRegistry::load(&value.to_string()).expect("schema");
        assert_eq!(
            dispatch("1901T1GA015001", &registry),
            Some(DeviceFamily::LegacyTouch1100Series)
        );
        assert_eq!(
            dispatch("2001T1GA015001", &registry),
            Some(DeviceFamily::SmileyTouch)
        );
    }

    #[test]
    fn unmatched_shapes() {
        let registry = registry();
        for serial in ["", "2205", "1801B05001", "2205Q1A2055001", "2205M1A20550011"] {
            assert_eq!(dispatch(serial, &registry), None, "{serial}");
        }
    }

    #[test]
    fn legacy_marker_needs_ten_characters() {
        assert_eq!(dispatch("1801A1GA015001", &registry()), None);
    }
}
