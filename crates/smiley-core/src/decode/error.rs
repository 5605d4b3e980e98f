use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Serial field whose code is resolved through a vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLabel {
    Type,
    Generation,
    Radio,
    Network,
    Hardware,
    Changelog,
    Cable,
}

impl fmt::Display for FieldLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FieldLabel::Type => "type",
            FieldLabel::Generation => "generation",
            FieldLabel::Radio => "radio",
            FieldLabel::Network => "network",
            FieldLabel::Hardware => "hardware",
            FieldLabel::Changelog => "changelog",
            FieldLabel::Cable => "cable",
        };
        f.write_str(label)
    }
}

/// Soft decode failure. Reported alongside a partial result, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Serial number format not recognized")]
    UnrecognizedFormat,
    #[error("Invalid {label} code '{code}' for {subject}")]
    InvalidCode {
        label: FieldLabel,
        code: String,
        subject: String,
    },
}

impl Serialize for DecodeError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{DecodeError, FieldLabel};

    #[test]
    fn invalid_code_message() {
        let err = DecodeError::InvalidCode {
            label: FieldLabel::Hardware,
            code: "9".to_string(),
            subject: "Smiley Mini".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid hardware code '9' for Smiley Mini");
    }

    #[test]
    fn serializes_as_message() {
        let value = serde_json::to_value(DecodeError::UnrecognizedFormat).expect("error json");
        assert_eq!(value, "Serial number format not recognized");
    }
}
