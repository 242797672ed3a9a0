//! dBASE column types supported by the attribute-table encoder.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum width of a Numeric (`N`) column.
pub const MAX_NUMERIC_LENGTH: u8 = 18;
/// Maximum width of a Character (`C`) column.
pub const MAX_CHARACTER_LENGTH: u8 = 254;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Numeric,
    Character,
    Logical,
    Date,
}

impl FieldKind {
    /// The single-byte type code stored at offset 11 of a field descriptor.
    pub fn type_code(self) -> u8 {
        match self {
            Self::Numeric => b'N',
            Self::Character => b'C',
            Self::Logical => b'L',
            Self::Date => b'D',
        }
    }

    pub fn from_type_code(code: u8) -> Option<Self> {
        match code {
            b'N' => Some(Self::Numeric),
            b'C' => Some(Self::Character),
            b'L' => Some(Self::Logical),
            b'D' => Some(Self::Date),
            _ => None,
        }
    }

    /// Clamps a requested width to what this column type allows.
    /// Logical and Date columns have a fixed width regardless of the request.
    pub fn clamp_length(self, requested: usize) -> u8 {
        match self {
            Self::Numeric => requested.min(MAX_NUMERIC_LENGTH as usize) as u8,
            Self::Character => requested.min(MAX_CHARACTER_LENGTH as usize) as u8,
            Self::Logical => 1,
            Self::Date => 8,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_code() as char)
    }
}
