use std::collections::BTreeMap;

use serde::Deserialize;

use super::error::SchemaError;
use super::{SerialLayout, Vocabulary};
use crate::DeviceFamily;

pub(crate) type RawTable = BTreeMap<String, String>;

/// On-disk shape of one family entry. Key names differ between families
/// (`cables` vs `changelog`, `formats` vs `format`); they are folded into a
/// single [`SerialLayout`] here and nowhere else.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawFamily {
    #[serde(rename = "type")]
    pub type_codes: Option<RawTable>,
    pub generation: Option<RawTable>,
    pub radio: Option<RawTable>,
    pub hardware: Option<RawTable>,
    pub network: Option<RawTable>,
    pub changelog: Option<RawTable>,
    pub cables: Option<RawTable>,
    pub format: Option<String>,
    pub formats: Option<Vec<String>>,
    pub until_year: Option<u8>,
}

impl RawFamily {
    pub(crate) fn into_layout(self, family: DeviceFamily) -> Result<SerialLayout, SchemaError> {
        let name = family.name();
        let required = |table: Option<RawTable>, key: &'static str| {
            let table = table.ok_or(SchemaError::MissingTable { family: name, table: key })?;
            Vocabulary::from_raw(table, name, key)
        };

        let format_descriptor = match (self.format, self.formats) {
            (Some(format), _) => format,
            (None, Some(formats)) => formats.join("\n"),
            (None, None) => String::new(),
        };
        let type_codes = required(self.type_codes, "type")?;

        if family == DeviceFamily::LegacyTouch1000 {
            return Ok(SerialLayout {
                format_descriptor,
                type_codes,
                generation_codes: required(self.generation, "generation")?,
                radio_codes: Vocabulary::default(),
                hardware_codes: Vocabulary::default(),
                network_codes: None,
                changelog_codes: Vocabulary::default(),
                legacy_until_year: None,
            });
        }

        let changelog_key = match family {
            DeviceFamily::LegacyTouch1100Series => "cables",
            _ => "changelog",
        };
        Ok(SerialLayout {
            format_descriptor,
            type_codes,
            generation_codes: required(self.generation, "generation")?,
            radio_codes: required(self.radio, "radio")?,
            hardware_codes: required(self.hardware, "hardware")?,
            network_codes: self
                .network
                .map(|table| Vocabulary::from_raw(table, name, "network"))
                .transpose()?,
            changelog_codes: required(self.changelog.or(self.cables), changelog_key)?,
            legacy_until_year: self.until_year,
        })
    }
}
