use log::debug;

use super::dispatch::dispatch_reader;
use super::error::{DecodeError, FieldLabel};
use super::layout;
use super::reader::{SerialReader, normalize};
use crate::{DecodeResult, DeviceFamily, SchemaRegistry, SerialLayout, Vocabulary};

/// Positional fields of a 14-character serial.
struct StandardFields {
    year: String,
    week: String,
    type_code: String,
    generation: String,
    radio: String,
    hardware: String,
    changelog: String,
    sequence: String,
}

impl StandardFields {
    fn read(reader: &SerialReader) -> Option<Self> {
        Some(Self {
            year: reader.read_range(layout::YEAR_RANGE)?,
            week: reader.read_range(layout::WEEK_RANGE)?,
            type_code: reader.read_code(layout::TYPE_OFFSET)?,
            generation: reader.read_code(layout::GENERATION_OFFSET)?,
            radio: reader.read_code(layout::RADIO_OFFSET)?,
            hardware: reader.read_code(layout::HARDWARE_OFFSET)?,
            changelog: reader.read_range(layout::CHANGELOG_RANGE)?,
            sequence: reader.read_tail(layout::SEQUENCE_LEN)?,
        })
    }
}

/// Positional fields of a 10-character legacy Touch 1000 serial.
struct LegacyFields {
    year: String,
    week: String,
    type_code: String,
    subcode: String,
    sequence: String,
}

impl LegacyFields {
    fn read(reader: &SerialReader) -> Option<Self> {
        Some(Self {
            year: reader.read_range(layout::YEAR_RANGE)?,
            week: reader.read_range(layout::WEEK_RANGE)?,
            type_code: reader.read_code(layout::TYPE_OFFSET)?,
            subcode: reader.read_range(layout::LEGACY_SUBCODE_RANGE)?,
            sequence: reader.read_tail(layout::SEQUENCE_LEN)?,
        })
    }
}

/// Resolves codes against vocabularies and collects misses in field order.
struct Resolver {
    subject: String,
    errors: Vec<DecodeError>,
}

impl Resolver {
    fn new(subject: &str) -> Self {
        Self {
            subject: subject.to_string(),
            errors: Vec::new(),
        }
    }

    fn lookup(
        &mut self,
        vocabulary: &Vocabulary,
        label: FieldLabel,
        code: &str,
    ) -> Option<String> {
        let value = vocabulary.get(code).map(str::to_string);
        if value.is_none() {
            self.miss(label, code);
        }
        value
    }

    fn miss(&mut self, label: FieldLabel, code: &str) {
        self.errors.push(DecodeError::InvalidCode {
            label,
            code: code.to_string(),
            subject: self.subject.clone(),
        });
    }

    /// Device type goes first; its name becomes the subject of later errors.
    fn resolve_device(&mut self, family_layout: &SerialLayout, type_code: &str) -> String {
        let device = self.lookup(family_layout.type_codes(), FieldLabel::Type, type_code);
        self.subject = device.clone().unwrap_or_else(unknown);
        self.subject.clone()
    }
}

fn unknown() -> String {
    layout::UNKNOWN.to_string()
}

/// Decodes a serial against the registry.
///
/// The input is upper-cased, matched against the shape rules,
/// then split into positional fields that are resolved through the matched
/// family's vocabularies. Every unresolved code adds one error and leaves
/// `"Unknown"` in its field; an unmatched shape yields an empty result and a
/// single [`DecodeError::UnrecognizedFormat`].
///
/// # Examples
/// ```
/// use smiley_core::{SchemaRegistry, decode};
///
/// let registry = SchemaRegistry::bundled()?;
/// let (result, errors) = decode("2205m1a2055001", &registry);
/// assert!(errors.is_empty());
/// assert_eq!(result.device.as_deref(), Some("Smiley Mini"));
/// assert_eq!(result.sequence.as_deref(), Some("5001"));
/// # Ok::<(), smiley_core::SchemaError>(())
/// ```
pub fn decode(raw: &str, registry: &SchemaRegistry) -> (DecodeResult, Vec<DecodeError>) {
    let normalized = normalize(raw);
    let reader = SerialReader::new(&normalized);
    let decoded = dispatch_reader(&reader, registry).and_then(|family| {
        let family_layout = registry.layout(family);
        match family {
            DeviceFamily::LegacyTouch1000 => decode_legacy(&reader, family_layout),
            _ => decode_standard(&reader, family, family_layout),
        }
    });
    match decoded {
        Some((result, errors)) => {
            debug!("decoded {normalized} with {} error(s)", errors.len());
            (result, errors)
        }
        None => (DecodeResult::default(), vec![DecodeError::UnrecognizedFormat]),
    }
}

fn decode_standard(
    reader: &SerialReader,
    family: DeviceFamily,
    family_layout: &SerialLayout,
) -> Option<(DecodeResult, Vec<DecodeError>)> {
    let fields = StandardFields::read(reader)?;
    let mut resolver = Resolver::new(family.name());

    let device = resolver.resolve_device(family_layout, &fields.type_code);
    let generation = resolver.lookup(
        family_layout.generation_codes(),
        FieldLabel::Generation,
        &fields.generation,
    );
    let radio = resolver.lookup(family_layout.radio_codes(), FieldLabel::Radio, &fields.radio);
    // An unknown radio was already reported; network stays Unknown.
    let network = match (radio.as_deref(), family_layout.network_codes()) {
        (None, _) => unknown(),
        (Some(_), Some(network_codes)) => resolver
            .lookup(network_codes, FieldLabel::Network, &fields.radio)
            .unwrap_or_else(unknown),
        (Some(radio), None) => network_from_radio(radio),
    };
    let hardware = resolver.lookup(
        family_layout.hardware_codes(),
        FieldLabel::Hardware,
        &fields.hardware,
    );
    let changelog_label = match family {
        DeviceFamily::LegacyTouch1100Series => FieldLabel::Cable,
        _ => FieldLabel::Changelog,
    };
    let changelog =
        resolver.lookup(family_layout.changelog_codes(), changelog_label, &fields.changelog);

    let result = DecodeResult {
        schema_name: Some(family.name().to_string()),
        device: Some(device),
        year: Some(format!("{}{}", layout::CENTURY_PREFIX, fields.year)),
        week: Some(fields.week),
        generation: Some(generation.unwrap_or_else(unknown)),
        radio: Some(radio.unwrap_or_else(unknown)),
        network: Some(network),
        hardware: Some(hardware.unwrap_or_else(unknown)),
        changelog: Some(changelog.unwrap_or_else(unknown)),
        sequence: Some(fields.sequence),
    };
    Some((result, resolver.errors))
}

fn decode_legacy(
    reader: &SerialReader,
    family_layout: &SerialLayout,
) -> Option<(DecodeResult, Vec<DecodeError>)> {
    let fields = LegacyFields::read(reader)?;
    let family = DeviceFamily::LegacyTouch1000;
    let mut resolver = Resolver::new(family.name());

    let device = resolver.resolve_device(family_layout, &fields.type_code);
    let generation = resolver.lookup(
        family_layout.generation_codes(),
        FieldLabel::Generation,
        &fields.subcode,
    );
    let reference = || Some(layout::SHAREPOINT_REFERENCE.to_string());

    let result = DecodeResult {
        schema_name: Some(family.name().to_string()),
        device: Some(device),
        year: Some(format!("{}{}", layout::CENTURY_PREFIX, fields.year)),
        week: Some(fields.week),
        generation: Some(generation.unwrap_or_else(unknown)),
        radio: reference(),
        network: reference(),
        hardware: reference(),
        changelog: None,
        sequence: Some(fields.sequence),
    };
    Some((result, resolver.errors))
}

/// Network named in parentheses inside a radio description, else the radio.
fn network_from_radio(radio: &str) -> String {
    radio
        .split_once('(')
        .and_then(|(_, rest)| rest.split_once(')'))
        .map(|(inner, _)| inner.trim())
        .filter(|inner| !inner.is_empty())
        .unwrap_or(radio)
        .to_string()
}
