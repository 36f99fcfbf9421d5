use crate::config::ColorEntry;
use image::GrayImage;

/// Smallest band side, in pixels, whose centered color sample still lies
/// strictly inside the band.
pub const MIN_BAND_PIXELS: u32 = 3;

/// Axis-aligned pixel rectangle, origin at the top-left of the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Scale about the rectangle's own center. The result is never smaller than 1x1.
    pub fn scaled(&self, ratio: f64) -> Rect {
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        Rect {
            x: self.x + (w * (1.0 - ratio) / 2.0) as u32,
            y: self.y + (h * (1.0 - ratio) / 2.0) as u32,
            width: ((w * ratio) as u32).max(1),
            height: ((h * ratio) as u32).max(1),
        }
    }

    /// Inside `self` without touching any of its edges.
    pub fn strictly_contains(&self, other: &Rect) -> bool {
        other.x > self.x
            && other.y > self.y
            && other.right() < self.right()
            && other.bottom() < self.bottom()
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Filled binary mask (0 or 255) of the detected block stack.
#[derive(Debug, Clone)]
pub struct Silhouette {
    pub mask: GrayImage,
    /// Number of foreground pixels in `mask`, holes included.
    pub area: u64,
}

/// One classified block of the stack.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockDescriptor {
    /// Band occupied by the block.
    pub rect: Rect,
    /// Centered sub-rectangle of `rect` the color was averaged over.
    pub sample_rect: Rect,
    /// Mean RGB over `sample_rect`.
    pub average: [u8; 3],
    pub color: ColorEntry,
    pub width_units: u32,
}

impl BlockDescriptor {
    pub fn key(&self) -> BlockKey {
        BlockKey {
            color: self.color.name.clone(),
            width_units: self.width_units,
        }
    }
}

/// Geometry-free identity of a block, used to look up instructions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockKey {
    pub color: String,
    pub width_units: u32,
}

impl std::fmt::Display for BlockKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.color, self.width_units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_rect_stays_centered_inside() {
        let rect = Rect::new(100, 40, 150, 51);
        let inner = rect.scaled(0.2);
        assert_eq!(inner, Rect::new(160, 60, 30, 10));
        assert!(rect.contains(&inner));
    }

    #[test]
    fn scaled_rect_is_at_least_one_pixel() {
        let rect = Rect::new(10, 10, 3, 2);
        let inner = rect.scaled(0.2);
        assert_eq!((inner.width, inner.height), (1, 1));
        assert!(rect.contains(&inner));
    }

    #[test]
    fn sample_rect_is_strictly_inside_from_minimum_width() {
        for width in MIN_BAND_PIXELS..200 {
            let rect = Rect::new(3, 2, width, 30);
            assert!(rect.strictly_contains(&rect.scaled(0.2)), "width {width}");
        }
        // narrower bands can only be sampled on their edge
        let rect = Rect::new(3, 2, 2, 30);
        assert!(!rect.strictly_contains(&rect.scaled(0.2)));
    }

    #[test]
    fn keys_ignore_geometry() {
        let color = ColorEntry::new("red", [255, 0, 0]);
        let a = BlockDescriptor {
            rect: Rect::new(0, 0, 100, 51),
            sample_rect: Rect::new(40, 20, 20, 10),
            average: [250, 3, 1],
            color: color.clone(),
            width_units: 1,
        };
        let b = BlockDescriptor {
            rect: Rect::new(12, 60, 90, 51),
            sample_rect: Rect::new(48, 80, 18, 10),
            average: [240, 10, 10],
            color,
            width_units: 1,
        };
        assert_ne!(a, b);
        assert_eq!(a.key(), b.key());
        assert_eq!(a.key().to_string(), "red:1");
    }
}
