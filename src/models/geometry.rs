use serde::{Deserialize, Serialize};

/// A screen-space rectangle.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub const fn contains_point(&self, x: i32, y: i32) -> bool {
        let max_x = self.x + self.width as i32;
        let max_y = self.y + self.height as i32;
        self.x <= x && x < max_x && self.y <= y && y < max_y
    }

    /// The area shared with `other`, used to pick the screen a window
    /// mostly lives on.
    #[must_use]
    pub fn overlap_area(&self, other: &Self) -> u64 {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.width as i32).min(other.x + other.width as i32);
        let y2 = (self.y + self.height as i32).min(other.y + other.height as i32);
        if x2 <= x1 || y2 <= y1 {
            return 0;
        }
        (x2 - x1) as u64 * (y2 - y1) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_containment_excludes_far_edges() {
        let r = Rect::new(0, 0, 100, 50);
        assert!(r.contains_point(0, 0));
        assert!(r.contains_point(99, 49));
        assert!(!r.contains_point(100, 0));
        assert!(!r.contains_point(0, 50));
    }

    #[test]
    fn overlap_area_of_disjoint_rects_is_zero() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(20, 20, 10, 10);
        assert_eq!(a.overlap_area(&b), 0);
    }

    #[test]
    fn overlap_area_is_symmetric() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(50, 50, 100, 100);
        assert_eq!(a.overlap_area(&b), 2500);
        assert_eq!(b.overlap_area(&a), 2500);
    }
}
