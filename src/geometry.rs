//! Axis-aligned box corners and overlap measures.
//!
//! Corners are always ordered `(min_y, min_x, max_y, max_x)`. Consumers index
//! `Corners::to_array` positionally, so the order is part of the public API.

/// Box corners in `(min_y, min_x, max_y, max_x)` order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Corners {
    pub min_y: f32,
    pub min_x: f32,
    pub max_y: f32,
    pub max_x: f32,
}

impl Corners {
    pub const fn new(min_y: f32, min_x: f32, max_y: f32, max_x: f32) -> Self {
        Self {
            min_y,
            min_x,
            max_y,
            max_x,
        }
    }

    /// Builds corners from a center point and a size.
    pub fn from_center_size(center_x: f32, center_y: f32, width: f32, height: f32) -> Self {
        let half_w = width / 2.0;
        let half_h = height / 2.0;
        Self {
            min_y: center_y - half_h,
            min_x: center_x - half_w,
            max_y: center_y + half_h,
            max_x: center_x + half_w,
        }
    }

    /// Multiplies the Y pair by `sy` and the X pair by `sx`. No clamping.
    pub fn scale(self, sy: f32, sx: f32) -> Self {
        Self {
            min_y: self.min_y * sy,
            min_x: self.min_x * sx,
            max_y: self.max_y * sy,
            max_x: self.max_x * sx,
        }
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Signed area; negative for inverted boxes.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Area of the overlap with `other`, zero when disjoint on either axis.
    pub fn intersection_area(&self, other: &Corners) -> f32 {
        let overlap_w = (self.max_x.min(other.max_x) - self.min_x.max(other.min_x)).max(0.0);
        let overlap_h = (self.max_y.min(other.max_y) - self.min_y.max(other.min_y)).max(0.0);
        overlap_w * overlap_h
    }

    /// Intersection over union with `other`.
    pub fn iou(&self, other: &Corners) -> f32 {
        iou(self, other)
    }

    /// Returns `[min_y, min_x, max_y, max_x]`.
    pub fn to_array(self) -> [f32; 4] {
        [self.min_y, self.min_x, self.max_y, self.max_x]
    }
}

impl From<Corners> for [f32; 4] {
    fn from(value: Corners) -> Self {
        value.to_array()
    }
}

impl From<[f32; 4]> for Corners {
    fn from(value: [f32; 4]) -> Self {
        Self::new(value[0], value[1], value[2], value[3])
    }
}

/// Intersection over union of two boxes.
///
/// Returns 0 when the union area is not positive, so zero-area or inverted
/// boxes never count as overlapping.
pub fn iou(a: &Corners, b: &Corners) -> f32 {
    let inter = a.intersection_area(b);
    let union = a.area() + b.area() - inter;
    if union <= 0.0 {
        return 0.0;
    }
    inter / union
}
