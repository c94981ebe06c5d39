use serde::{Deserialize, Serialize};

use crate::models::Rect;

/// A named placement template in percent units of a screen's usable area.
///
/// `Rect { x: 0, y: 0, width: 50, height: 100 }` is the left half, no
/// matter what the screen looks like.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Gravity {
    pub name: String,
    pub template: Rect,
}

impl Gravity {
    #[must_use]
    pub fn new(name: &str, template: Rect) -> Self {
        Self {
            name: name.to_owned(),
            template,
        }
    }

    /// Project the template onto a usable area.
    #[must_use]
    pub fn resolve(&self, usable: Rect) -> Rect {
        Rect {
            x: usable.x + (usable.width as i32 * self.template.x) / 100,
            y: usable.y + (usable.height as i32 * self.template.y) / 100,
            width: usable.width * self.template.width / 100,
            height: usable.height * self.template.height / 100,
        }
    }
}
