use bitflags::bitflags;
use serde::{de::Visitor, Deserialize, Serialize};

use crate::models::{ClientHandle, Handle};

bitflags! {
    /// Toggleable per-client modes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct ClientMode: u16 {
        /// Covers the whole screen, bypassing placement.
        const FULL = 1;
        /// Placed by its own requested geometry instead of a gravity.
        const FLOAT = 1 << 1;
        /// Visible on every view.
        const STICK = 1 << 2;
        const URGENT = 1 << 3;
        /// Honors interactive resize requests.
        const RESIZE = 1 << 4;
        const BORDERLESS = 1 << 5;
        /// Unmanaged, waiting to be dropped at the end of the dispatch step.
        const DEAD = 1 << 6;
    }
}

/// Role a client announced for itself.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientType {
    #[default]
    Normal,
    Desktop,
    Dock,
    Toolbar,
    Splash,
    Dialog,
}

/// What the dispatcher is currently in the middle of.
///
/// Drags and chained grabs are states of the dispatcher, not nested event
/// pumps. While one is active every incoming event is routed through it
/// first.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchMode<H: Handle> {
    #[serde(bound = "")]
    ReadyToMove(ClientHandle<H>),
    #[serde(bound = "")]
    ReadyToResize(ClientHandle<H>),
    #[serde(bound = "")]
    Moving(ClientHandle<H>),
    #[serde(bound = "")]
    Resizing(ClientHandle<H>),
    /// A chain head matched; waiting for link `depth` of grab `grab`.
    AwaitingChain { grab: usize, depth: usize },
    Normal,
}

impl<H: Handle> Default for DispatchMode<H> {
    fn default() -> Self {
        Self::Normal
    }
}

impl<H: Handle> DispatchMode<H> {
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Moving(_) | Self::Resizing(_))
    }
}

// serde impls (derive is not working with the bitflags macro)

impl Serialize for ClientMode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u16(self.bits())
    }
}

impl<'de> Deserialize<'de> for ClientMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ClientModeVisitor;

        impl<'de> Visitor<'de> for ClientModeVisitor {
            type Value = ClientMode;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a bitfield on 16 bits")
            }

            fn visit_u16<E>(self, v: u16) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(ClientMode::from_bits_retain(v))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(ClientMode::from_bits_retain(v as u16))
            }
        }

        deserializer.deserialize_u16(ClientModeVisitor)
    }
}
