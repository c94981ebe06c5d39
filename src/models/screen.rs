use serde::{Deserialize, Serialize};

use crate::models::Rect;

/// A physical output and the view currently bound to it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub geometry: Rect,
    /// Geometry minus the strips panels reserved for themselves.
    pub usable: Rect,
    /// Index into the view list.
    pub view: usize,
}

impl Screen {
    #[must_use]
    pub const fn new(geometry: Rect) -> Self {
        Self {
            geometry,
            usable: geometry,
            view: 0,
        }
    }

    #[must_use]
    pub const fn contains_point(&self, x: i32, y: i32) -> bool {
        self.geometry.contains_point(x, y)
    }

    /// Carve panel strips (top, right, bottom, left) out of the usable area.
    pub fn set_padding(&mut self, top: u32, right: u32, bottom: u32, left: u32) {
        self.usable = Rect {
            x: self.geometry.x + left as i32,
            y: self.geometry.y + top as i32,
            width: self.geometry.width.saturating_sub(left + right),
            height: self.geometry.height.saturating_sub(top + bottom),
        };
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new(Rect::new(0, 0, 800, 600))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_shrinks_the_usable_area_only() {
        let mut screen = Screen::new(Rect::new(0, 0, 800, 600));
        screen.set_padding(20, 0, 0, 10);
        assert_eq!(screen.usable, Rect::new(10, 20, 790, 580));
        assert_eq!(screen.geometry, Rect::new(0, 0, 800, 600));
    }
}
