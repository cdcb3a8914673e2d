//! Projected sample points and their weighted values.

use crate::{BoundingBox, InterpolationMethod};

/// One weighted field: a value per sample point and the method used to spread it.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedField {
    pub column: String,
    pub method: InterpolationMethod,
    /// Cell value multiplied by the field weight, one per point
    pub values: Vec<f64>,
}

/// Planar sample locations shared by every weighted field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Samples {
    /// `[x, y]` in meters (EPSG:3857)
    pub points: Vec<[f64; 2]>,
    pub fields: Vec<WeightedField>,
}

impl Samples {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Extent of the sample locations.
    pub fn extent(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.points.iter().map(|p| (p[0], p[1])))
    }
}
