//! Axis-aligned extent of a feature or of a whole file.

/// `xmin, ymin, xmax, ymax`, in the order they are stored on disk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BoundingBox {
    pub const ZERO: BoundingBox = BoundingBox {
        xmin: 0.0,
        ymin: 0.0,
        xmax: 0.0,
        ymax: 0.0,
    };

    /// An inverted box that any coordinate will grow.
    pub fn empty() -> Self {
        Self {
            xmin: f64::INFINITY,
            ymin: f64::INFINITY,
            xmax: f64::NEG_INFINITY,
            ymax: f64::NEG_INFINITY,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.xmin > self.xmax || self.ymin > self.ymax
    }

    pub fn extend(&mut self, x: f64, y: f64) {
        self.xmin = self.xmin.min(x);
        self.ymin = self.ymin.min(y);
        self.xmax = self.xmax.max(x);
        self.ymax = self.ymax.max(y);
    }

    pub fn union(&mut self, other: &BoundingBox) {
        if other.is_empty() {
            return;
        }
        self.extend(other.xmin, other.ymin);
        self.extend(other.xmax, other.ymax);
    }

    /// The box to write: an empty box is stored as all zeros.
    pub fn or_zero(self) -> Self {
        if self.is_empty() {
            Self::ZERO
        } else {
            self
        }
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.xmin, self.ymin, self.xmax, self.ymax]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_and_zero() {
        let mut bbox = BoundingBox::empty();
        assert!(bbox.is_empty());
        assert_eq!(bbox.or_zero(), BoundingBox::ZERO);
        bbox.extend(3.0, -1.0);
        bbox.extend(-2.0, 4.0);
        assert_eq!(bbox.to_array(), [-2.0, -1.0, 3.0, 4.0]);
    }
}
