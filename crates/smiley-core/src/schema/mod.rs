//! Schema registry: the read-only code vocabularies per device family.
//!
//! The registry is built once from a JSON document whose top-level keys are
//! family names. Raw key quirks are handled in `raw`; everything past the
//! loader sees one [`SerialLayout`] shape. Vocabulary keys are upper-cased on
//! load so lookups with a normalized serial are case-insensitive.

mod error;
mod raw;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;

pub use error::SchemaError;

use crate::{DEFAULT_SCHEMA, DeviceFamily};
use raw::{RawFamily, RawTable};

/// Code-to-value table for one serial field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary(BTreeMap<String, String>);

impl Vocabulary {
    /// Upper-cases every code; codes that collide after that are rejected.
    fn from_raw(
        table: RawTable,
        family: &'static str,
        key: &'static str,
    ) -> Result<Self, SchemaError> {
        let mut codes = BTreeMap::new();
        for (code, value) in table {
            let code = code.to_uppercase();
            if codes.contains_key(&code) {
                return Err(SchemaError::DuplicateCode {
                    family,
                    table: key,
                    code,
                });
            }
            codes.insert(code, value);
        }
        Ok(Self(codes))
    }

    /// Looks up an already upper-cased code.
    pub fn get(&self, code: &str) -> Option<&str> {
        self.0.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(code, value)| (code.as_str(), value.as_str()))
    }
}

/// Normalized vocabularies and format description for one family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialLayout {
    format_descriptor: String,
    type_codes: Vocabulary,
    generation_codes: Vocabulary,
    radio_codes: Vocabulary,
    hardware_codes: Vocabulary,
    network_codes: Option<Vocabulary>,
    changelog_codes: Vocabulary,
    legacy_until_year: Option<u8>,
}

impl SerialLayout {
    pub fn format_descriptor(&self) -> &str {
        &self.format_descriptor
    }

    pub fn type_codes(&self) -> &Vocabulary {
        &self.type_codes
    }

    pub fn generation_codes(&self) -> &Vocabulary {
        &self.generation_codes
    }

    pub fn radio_codes(&self) -> &Vocabulary {
        &self.radio_codes
    }

    pub fn hardware_codes(&self) -> &Vocabulary {
        &self.hardware_codes
    }

    /// Dedicated network table; `None` means network is derived from radio.
    pub fn network_codes(&self) -> Option<&Vocabulary> {
        self.network_codes.as_ref()
    }

    /// Changelog codes (the cable table for the legacy Touch 1100/3100).
    pub fn changelog_codes(&self) -> &Vocabulary {
        &self.changelog_codes
    }

    /// Last two-digit production year still decoded with this layout.
    pub fn legacy_until_year(&self) -> Option<u8> {
        self.legacy_until_year
    }
}

/// All family layouts, loaded once and shared read-only.
///
/// # Examples
/// ```
/// use smiley_core::{DeviceFamily, SchemaRegistry};
///
/// let registry = SchemaRegistry::bundled()?;
/// let mini = registry.layout(DeviceFamily::SmileyMini);
/// assert_eq!(mini.type_codes().get("M"), Some("Smiley Mini"));
/// # Ok::<(), smiley_core::SchemaError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    legacy_touch_1000: SerialLayout,
    legacy_touch_1100_series: SerialLayout,
    smiley_mini: SerialLayout,
    smiley_terminal: SerialLayout,
    smiley_touch: SerialLayout,
}

impl SchemaRegistry {
    /// Parses a schema document. Every [`DeviceFamily`] must be present.
    pub fn load(source: &str) -> Result<Self, SchemaError> {
        let mut entries: BTreeMap<String, serde_json::Value> = serde_json::from_str(source)?;

        let mut take = |family: DeviceFamily| -> Result<SerialLayout, SchemaError> {
            let name = family.name();
            let value = entries
                .remove(name)
                .ok_or(SchemaError::MissingFamily { family: name })?;
            let raw: RawFamily = serde_json::from_value(value)
                .map_err(|source| SchemaError::InvalidFamily { family: name, source })?;
            raw.into_layout(family)
        };

        let registry = Self {
            legacy_touch_1000: take(DeviceFamily::LegacyTouch1000)?,
            legacy_touch_1100_series: take(DeviceFamily::LegacyTouch1100Series)?,
            smiley_mini: take(DeviceFamily::SmileyMini)?,
            smiley_terminal: take(DeviceFamily::SmileyTerminal)?,
            smiley_touch: take(DeviceFamily::SmileyTouch)?,
        };
        for name in entries.keys() {
            debug!("ignoring schema entry '{name}' with no decode rule");
        }
        debug!("schema loaded with {} families", DeviceFamily::ALL.len());
        Ok(registry)
    }

    pub fn load_file(path: &Path) -> Result<Self, SchemaError> {
        let source = fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("loading schema from {}", path.display());
        Self::load(&source)
    }

    /// Loads the schema document bundled with this crate.
    pub fn bundled() -> Result<Self, SchemaError> {
        Self::load(DEFAULT_SCHEMA)
    }

    pub fn layout(&self, family: DeviceFamily) -> &SerialLayout {
        match family {
            DeviceFamily::LegacyTouch1000 => &self.legacy_touch_1000,
            DeviceFamily::LegacyTouch1100Series => &self.legacy_touch_1100_series,
            DeviceFamily::SmileyMini => &self.smiley_mini,
            DeviceFamily::SmileyTerminal => &self.smiley_terminal,
            DeviceFamily::SmileyTouch => &self.smiley_touch,
        }
    }

    /// Looks up a layout by schema name. Unknown names are a caller bug, not
    /// a decode failure.
    pub fn get_layout(&self, name: &str) -> Result<&SerialLayout, SchemaError> {
        let family = name
            .parse::<DeviceFamily>()
            .map_err(|err| SchemaError::UnknownFamily { name: err.0 })?;
        Ok(self.layout(family))
    }

    /// Families with their layouts, in dispatch order.
    pub fn families(&self) -> impl Iterator<Item = (DeviceFamily, &SerialLayout)> {
        DeviceFamily::ALL
            .into_iter()
            .map(move |family| (family, self.layout(family)))
    }
}
