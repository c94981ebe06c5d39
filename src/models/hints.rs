use serde::{Deserialize, Serialize};

use crate::models::Rect;

/// Size constraints a client announced for itself.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct SizeHints {
    pub min_width: u32,
    pub min_height: u32,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub width_inc: u32,
    pub height_inc: u32,
    pub base_width: u32,
    pub base_height: u32,
    pub min_ratio: Option<f32>,
    pub max_ratio: Option<f32>,
}

impl SizeHints {
    /// Constrain a placement slot to these hints.
    ///
    /// Width and height are clamped to the min/max bounds, rounded down to
    /// the nearest resize increment and pulled back to the hinted aspect
    /// ratio. The result is centered inside the original slot so the client
    /// does not drift towards its top-left corner.
    #[must_use]
    pub fn constrain(&self, slot: Rect) -> Rect {
        let mut width = slot.width;
        let mut height = slot.height;

        if self.min_width > 0 {
            width = width.max(self.min_width);
        }
        if self.min_height > 0 {
            height = height.max(self.min_height);
        }
        if let Some(max) = self.max_width {
            width = width.min(max);
        }
        if let Some(max) = self.max_height {
            height = height.min(max);
        }

        if self.width_inc > 1 && width > self.base_width {
            let units = (width - self.base_width) / self.width_inc;
            width = (self.base_width + units * self.width_inc).max(self.min_width);
        }
        if self.height_inc > 1 && height > self.base_height {
            let units = (height - self.base_height) / self.height_inc;
            height = (self.base_height + units * self.height_inc).max(self.min_height);
        }

        if height > 0 {
            let ratio = width as f32 / height as f32;
            if let Some(min) = self.min_ratio {
                if min > 0.0 && ratio < min {
                    height = (width as f32 / min) as u32;
                }
            }
            if let Some(max) = self.max_ratio {
                if max > 0.0 && ratio > max {
                    width = (height as f32 * max) as u32;
                }
            }
        }

        Rect {
            x: slot.x + (slot.width as i32 - width as i32) / 2,
            y: slot.y + (slot.height as i32 - height as i32) / 2,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_size_wins_over_slot() {
        let hints = SizeHints {
            min_width: 200,
            min_height: 100,
            ..SizeHints::default()
        };
        let out = hints.constrain(Rect::new(0, 0, 50, 50));
        assert_eq!((out.width, out.height), (200, 100));
    }

    #[test]
    fn increments_round_down_but_respect_min() {
        let hints = SizeHints {
            min_width: 10,
            width_inc: 7,
            base_width: 4,
            ..SizeHints::default()
        };
        let out = hints.constrain(Rect::new(0, 0, 30, 30));
        // 4 + 3 * 7 = 25 is the largest step not above 30
        assert_eq!(out.width, 25);
    }

    #[test]
    fn aspect_ratio_narrows_the_wide_axis() {
        let hints = SizeHints {
            max_ratio: Some(1.0),
            ..SizeHints::default()
        };
        let out = hints.constrain(Rect::new(0, 0, 200, 100));
        assert_eq!((out.width, out.height), (100, 100));
    }

    #[test]
    fn constrained_rect_stays_centered() {
        let hints = SizeHints {
            max_width: Some(100),
            max_height: Some(100),
            ..SizeHints::default()
        };
        let out = hints.constrain(Rect::new(0, 0, 300, 300));
        assert_eq!((out.x, out.y), (100, 100));
    }
}
