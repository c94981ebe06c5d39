use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{ClientHandle, Handle};

/// What kind of entity a window handle belongs to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Client,
    Screen,
}

/// O(1) reverse lookup from a window handle to its slot in the owning
/// store. Events for handles that were never bound resolve to `None` and
/// cost nothing else.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Registry<H: Handle> {
    #[serde(bound = "")]
    map: HashMap<ClientHandle<H>, (EntityKind, usize)>,
}

impl<H: Handle> Registry<H> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn bind(&mut self, handle: ClientHandle<H>, kind: EntityKind, index: usize) {
        self.map.insert(handle, (kind, index));
    }

    #[must_use]
    pub fn lookup(&self, handle: &ClientHandle<H>) -> Option<(EntityKind, usize)> {
        self.map.get(handle).copied()
    }

    #[must_use]
    pub fn lookup_client(&self, handle: &ClientHandle<H>) -> Option<usize> {
        match self.lookup(handle) {
            Some((EntityKind::Client, index)) => Some(index),
            _ => None,
        }
    }

    pub fn unbind(&mut self, handle: &ClientHandle<H>) -> Option<(EntityKind, usize)> {
        self.map.remove(handle)
    }

    /// Fix up indices after slot `removed` of `kind` was deleted from its
    /// store; everything above it slid down by one.
    pub fn shift_down(&mut self, kind: EntityKind, removed: usize) {
        for (k, index) in self.map.values_mut() {
            if *k == kind && *index > removed {
                *index -= 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MockHandle;

    #[test]
    fn unknown_handles_resolve_to_none() {
        let registry: Registry<MockHandle> = Registry::new();
        assert_eq!(registry.lookup(&ClientHandle(42)), None);
    }

    #[test]
    fn indices_follow_store_removals() {
        let mut registry: Registry<MockHandle> = Registry::new();
        registry.bind(ClientHandle(1), EntityKind::Client, 0);
        registry.bind(ClientHandle(2), EntityKind::Client, 1);
        registry.bind(ClientHandle(3), EntityKind::Client, 2);
        registry.unbind(&ClientHandle(2));
        registry.shift_down(EntityKind::Client, 1);
        assert_eq!(registry.lookup_client(&ClientHandle(1)), Some(0));
        assert_eq!(registry.lookup_client(&ClientHandle(3)), Some(1));
    }

    #[test]
    fn kinds_do_not_interfere() {
        let mut registry: Registry<MockHandle> = Registry::new();
        registry.bind(ClientHandle(1), EntityKind::Screen, 5);
        registry.shift_down(EntityKind::Client, 0);
        assert_eq!(registry.lookup(&ClientHandle(1)), Some((EntityKind::Screen, 5)));
    }
}
