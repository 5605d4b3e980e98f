use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Device product line with its own serial layout and code vocabularies.
///
/// The set is closed: the decoder dispatches on these variants only, and the
/// schema document must provide an entry for each of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeviceFamily {
    /// 10-character serials with the fixed `A` marker.
    LegacyTouch1000,
    /// 14-character `T` serials produced up to the legacy cutoff year.
    LegacyTouch1100Series,
    SmileyMini,
    SmileyTerminal,
    SmileyTouch,
}

impl DeviceFamily {
    /// All families in dispatch order.
    pub const ALL: [DeviceFamily; 5] = [
        DeviceFamily::LegacyTouch1000,
        DeviceFamily::LegacyTouch1100Series,
        DeviceFamily::SmileyMini,
        DeviceFamily::SmileyTerminal,
        DeviceFamily::SmileyTouch,
    ];

    /// Name used as the top-level key in the schema document.
    pub fn name(self) -> &'static str {
        match self {
            DeviceFamily::LegacyTouch1000 => "LegacyTouch1000",
            DeviceFamily::LegacyTouch1100Series => "LegacyTouch1100_3100",
            DeviceFamily::SmileyMini => "SmileyMini",
            DeviceFamily::SmileyTerminal => "SmileyTerminal",
            DeviceFamily::SmileyTouch => "SmileyTouch",
        }
    }
}

impl fmt::Display for DeviceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a name does not match any [`DeviceFamily`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown device family '{0}'")]
pub struct UnknownFamilyName(pub String);

impl FromStr for DeviceFamily {
    type Err = UnknownFamilyName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeviceFamily::ALL
            .into_iter()
            .find(|family| family.name() == s)
            .ok_or_else(|| UnknownFamilyName(s.to_string()))
    }
}
