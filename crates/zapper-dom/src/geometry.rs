//! Viewport and bounding box geometry.

use serde::{Deserialize, Serialize};

/// Viewport information for coordinate calculations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportInfo {
    /// Viewport width in pixels.
    pub width: f64,
    /// Viewport height in pixels.
    pub height: f64,
    /// Scroll X offset.
    #[serde(default)]
    pub scroll_x: f64,
    /// Scroll Y offset.
    #[serde(default)]
    pub scroll_y: f64,
}

impl Default for ViewportInfo {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }
}

impl ViewportInfo {
    /// Check if a viewport coordinate lies inside the visible area.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && y >= 0.0 && x < self.width && y < self.height
    }
}

/// Bounding box for an element, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Check if a point is inside this bounding box.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    /// Get the center point of this bounding box.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Neither dimension has extent.
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_contains() {
        let bbox = BoundingBox::new(10.0, 20.0, 100.0, 50.0);
        assert!(bbox.contains(50.0, 40.0));
        assert!(!bbox.contains(0.0, 0.0));
        assert!(!bbox.contains(200.0, 40.0));
    }

    #[test]
    fn test_bounding_box_edges() {
        let bbox = BoundingBox::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(bbox.bottom(), 70.0);
        assert_eq!(bbox.right(), 110.0);
        assert_eq!(bbox.center(), (60.0, 45.0));
    }

    #[test]
    fn test_bounding_box_empty() {
        assert!(BoundingBox::default().is_empty());
        assert!(!BoundingBox::new(0.0, 0.0, 0.0, 4.0).is_empty());
    }

    #[test]
    fn test_viewport_contains() {
        let vp = ViewportInfo::default();
        assert!(vp.contains(0.0, 0.0));
        assert!(!vp.contains(1280.0, 10.0));
        assert!(!vp.contains(-1.0, 10.0));
    }
}
