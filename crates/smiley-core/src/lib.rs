//! Smiley core library for decoding device serial numbers.
//!
//! A serial encodes production year and week, device type, generation, radio,
//! hardware revision, changelog batch and a unit number at fixed positions.
//! The [`SchemaRegistry`] holds the code vocabularies per [`DeviceFamily`];
//! [`decode`] dispatches a serial to one family layout by shape and resolves
//! each positional code through that family's vocabularies.
//!
//! Invariants:
//! - Decoding never fails: unresolved codes are returned as [`DecodeError`]s
//!   next to a best-effort [`DecodeResult`].
//! - Codes are case-insensitive; serials and vocabulary keys are upper-cased.
//! - The registry is read-only after load and safe to share across threads.
//!
//! # Examples
//! ```
//! use smiley_core::{SchemaRegistry, decode};
//!
//! let registry = SchemaRegistry::bundled()?;
//! let (result, errors) = decode("1801A05001", &registry);
//! assert!(errors.is_empty());
//! assert_eq!(result.year.as_deref(), Some("2018"));
//! # Ok::<(), smiley_core::SchemaError>(())
//! ```

use serde::{Deserialize, Serialize};

mod decode;
mod family;
mod schema;

pub use decode::{DecodeError, FieldLabel, decode, dispatch, layout, normalize};
pub use family::{DeviceFamily, UnknownFamilyName};
pub use schema::{SchemaError, SchemaRegistry, SerialLayout, Vocabulary};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when the caller does not stamp the report.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";
/// Schema document bundled with the crate.
pub const DEFAULT_SCHEMA: &str = include_str!("../data/schemas.json");

/// Decoded serial attributes. Absent fields were not decodable.
///
/// # Examples
/// ```
/// use smiley_core::DecodeResult;
///
/// let result = DecodeResult {
///     year: Some("2022".to_string()),
///     ..DecodeResult::default()
/// };
/// assert!(result.device.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeResult {
    /// Family name the serial was dispatched to (e.g., "SmileyMini").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    /// Human-readable device name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// Four-digit production year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    /// Two-digit production week.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<String>,
    /// Radio chipset description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardware: Option<String>,
    /// Changelog or cable batch description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changelog: Option<String>,
    /// Unit number (last four characters).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<String>,
}

impl DecodeResult {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "smiley").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// One decode call in machine-readable form.
///
/// # Examples
/// ```
/// use smiley_core::{SchemaRegistry, decode_report};
///
/// let registry = SchemaRegistry::bundled()?;
/// let report = decode_report("2205m1a2055001", &registry);
/// assert_eq!(report.normalized, "2205M1A2055001");
/// assert!(report.errors.is_empty());
/// # Ok::<(), smiley_core::SchemaError>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialReport {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    /// RFC3339 timestamp representing the report generation time.
    pub generated_at: String,
    /// Serial as typed by the user.
    pub serial: String,
    /// Serial after upper-casing.
    pub normalized: String,
    pub result: DecodeResult,
    /// Decode error messages in serial order.
    pub errors: Vec<String>,
}

/// Decodes a serial and wraps the outcome in a [`SerialReport`].
pub fn decode_report(raw: &str, registry: &SchemaRegistry) -> SerialReport {
    let (result, errors) = decode(raw, registry);
    SerialReport {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "smiley".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        serial: raw.to_string(),
        normalized: normalize(raw),
        result,
        errors: errors.iter().map(ToString::to_string).collect(),
    }
}
