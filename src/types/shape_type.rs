//! This module defines the canonical, type-safe representation of the geometry
//! kinds a shapefile can carry.

use crate::error::ShpforgeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The geometry kind of a shapefile and of every record inside it.
///
/// Only the three 2D kinds are written. The numeric codes are part of the
/// on-disk contract and appear in both the file header and every record.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ShapeType {
    Point,
    Polyline,
    Polygon,
}

impl ShapeType {
    /// All kinds in the order the writer facade exports them.
    pub const ALL: [ShapeType; 3] = [ShapeType::Point, ShapeType::Polyline, ShapeType::Polygon];

    /// The shape-type code written at byte 32 of the header and at the start
    /// of every record's content.
    pub fn code(self) -> i32 {
        match self {
            Self::Point => 1,
            Self::Polyline => 3,
            Self::Polygon => 5,
        }
    }

    /// Converts an on-disk shape-type code back into a `ShapeType`.
    pub fn from_code(code: i32) -> Result<Self, ShpforgeError> {
        match code {
            1 => Ok(Self::Point),
            3 => Ok(Self::Polyline),
            5 => Ok(Self::Polygon),
            other => Err(ShpforgeError::UnknownShapeType(other)),
        }
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Point => "POINT",
            Self::Polyline => "POLYLINE",
            Self::Polygon => "POLYGON",
        };
        f.write_str(name)
    }
}

/// Parses `"point"`, `"polyline"` or `"polygon"`, ignoring case.
impl FromStr for ShapeType {
    type Err = ShpforgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "point" => Ok(Self::Point),
            "polyline" => Ok(Self::Polyline),
            "polygon" => Ok(Self::Polygon),
            _ => Err(ShpforgeError::InvalidInput(format!(
                "Invalid shape type '{}'. Must be 'point', 'polyline', or 'polygon'.",
                s
            ))),
        }
    }
}
