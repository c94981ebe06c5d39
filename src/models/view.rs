use serde::{Deserialize, Serialize};

use crate::models::TagMask;

/// A named tag mask; what a screen can be switched to look at.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub name: String,
    pub tags: TagMask,
}

impl View {
    #[must_use]
    pub fn new(name: &str, tags: TagMask) -> Self {
        Self {
            name: name.to_owned(),
            tags,
        }
    }

    pub fn tag(&mut self, index: usize) {
        self.tags |= 1 << index;
    }

    pub fn untag(&mut self, index: usize) {
        self.tags &= !(1 << index);
    }

    #[must_use]
    pub fn has_tag(&self, index: usize) -> bool {
        self.tags & (1 << index) != 0
    }
}
