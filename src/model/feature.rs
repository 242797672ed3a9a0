//! Geometry variants and the `Feature` record.

use crate::model::Attributes;
use crate::types::ShapeType;

/// One vertex, `(x, y)`, passed through to the output without reprojection.
pub type Coord = (f64, f64);

/// A closed union over the three supported geometry kinds.
///
/// Every encode site matches on this exhaustively, so adding a kind is a
/// compile error everywhere it has to be handled.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point { x: f64, y: f64 },
    /// Each path is one part; parts may hold any number of vertices.
    Polyline { paths: Vec<Vec<Coord>> },
    /// Rings are written in the order given; orientation is not corrected.
    Polygon { rings: Vec<Vec<Coord>> },
}

impl Geometry {
    pub fn shape_type(&self) -> ShapeType {
        match self {
            Self::Point { .. } => ShapeType::Point,
            Self::Polyline { .. } => ShapeType::Polyline,
            Self::Polygon { .. } => ShapeType::Polygon,
        }
    }

    /// The parts of a multi-part geometry. A point has none.
    pub fn parts(&self) -> &[Vec<Coord>] {
        match self {
            Self::Point { .. } => &[],
            Self::Polyline { paths } => paths,
            Self::Polygon { rings } => rings,
        }
    }

    /// Total vertex count over all parts (1 for a point).
    pub fn point_count(&self) -> usize {
        match self {
            Self::Point { .. } => 1,
            Self::Polyline { paths: parts } | Self::Polygon { rings: parts } => {
                parts.iter().map(Vec::len).sum()
            }
        }
    }
}

/// One geometry plus its (possibly empty) attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Geometry,
    pub attributes: Attributes,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            attributes: Attributes::new(),
        }
    }

    pub fn with_attributes(geometry: Geometry, attributes: Attributes) -> Self {
        Self {
            geometry,
            attributes,
        }
    }

    pub fn point(x: f64, y: f64) -> Self {
        Self::new(Geometry::Point { x, y })
    }

    pub fn polyline(paths: Vec<Vec<Coord>>) -> Self {
        Self::new(Geometry::Polyline { paths })
    }

    pub fn polygon(rings: Vec<Vec<Coord>>) -> Self {
        Self::new(Geometry::Polygon { rings })
    }

    pub fn shape_type(&self) -> ShapeType {
        self.geometry.shape_type()
    }
}
