//! Client information
#![allow(clippy::module_name_repetitions)]

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::models::{ClientMode, ClientType, Rect, SizeHints, TagMask, DEFAULT_TAG};

/// A trait which backend specific window handles need to implement
pub trait Handle:
    Serialize
    + DeserializeOwned
    + Debug
    + Clone
    + Copy
    + PartialEq
    + Eq
    + std::hash::Hash
    + Default
    + Send
    + 'static
{
}

/// A backend-agnostic handle used to identify a window.
///
/// # Serde
///
/// Generics plus serde derives need `#[serde(bound = "")]` wherever the
/// generic appears, see <https://github.com/serde-rs/serde/issues/1296>.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ClientHandle<H>(#[serde(bound = "")] pub H)
where
    H: Handle;

/// Handle for testing purposes
pub type MockHandle = i32;
impl Handle for MockHandle {}

/// A managed window and everything known about it.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Client<H: Handle> {
    #[serde(bound = "")]
    pub handle: ClientHandle<H>,
    #[serde(bound = "")]
    pub transient: Option<ClientHandle<H>>,
    pub name: Option<String>,
    pub instance: Option<String>,
    pub class: Option<String>,
    pub role: Option<String>,
    pub r#type: ClientType,
    pub geometry: Rect,
    /// Geometry to restore when leaving fullscreen.
    pub saved_geometry: Option<Rect>,
    /// Geometry used while floating, seeded from the size hints.
    pub float_geometry: Option<Rect>,
    pub hints: SizeHints,
    pub tags: TagMask,
    /// Bits granted by explicit tag commands, as opposed to matchers.
    /// Survives a retag untouched.
    pub manual_tags: TagMask,
    pub modes: ClientMode,
    pub gravity: usize,
    pub screen: usize,
    /// Honors `WM_TAKE_FOCUS` instead of a bare input-focus switch.
    pub takes_focus: bool,
    /// Honors `WM_DELETE_WINDOW`; otherwise closing means a hard kill.
    pub honors_close: bool,
    visible: bool,
}

impl<H: Handle> Client<H> {
    #[must_use]
    pub fn new(handle: ClientHandle<H>, name: Option<String>) -> Self {
        Self {
            handle,
            transient: None,
            name,
            instance: None,
            class: None,
            role: None,
            r#type: ClientType::Normal,
            geometry: Rect::default(),
            saved_geometry: None,
            float_geometry: None,
            hints: SizeHints::default(),
            tags: 0,
            manual_tags: 0,
            modes: ClientMode::empty(),
            gravity: 0,
            screen: 0,
            takes_focus: false,
            honors_close: false,
            visible: false,
        }
    }

    /// Whether a view showing `view_tags` shows this client.
    #[must_use]
    pub fn visible_on(&self, view_tags: TagMask) -> bool {
        self.tags & view_tags != 0
            || self.modes.contains(ClientMode::STICK)
            || self.r#type == ClientType::Desktop
    }

    pub fn set_visible(&mut self, value: bool) {
        self.visible = value;
    }

    #[must_use]
    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn tag(&mut self, index: usize) {
        self.tags |= 1 << index;
        self.manual_tags |= 1 << index;
    }

    pub fn untag(&mut self, index: usize) {
        self.tags &= !(1 << index);
        self.manual_tags &= !(1 << index);
        if self.tags == 0 {
            self.tags = DEFAULT_TAG;
        }
    }

    #[must_use]
    pub fn has_tag(&self, index: usize) -> bool {
        self.tags & (1 << index) != 0
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.modes.contains(ClientMode::FULL)
    }

    #[must_use]
    pub fn is_floating(&self) -> bool {
        self.modes.contains(ClientMode::FLOAT)
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.modes.contains(ClientMode::DEAD)
    }

    #[must_use]
    pub fn is_urgent(&self) -> bool {
        self.modes.contains(ClientMode::URGENT)
    }

    /// Placed by a gravity, as opposed to floating or covering the screen.
    #[must_use]
    pub fn is_tiled(&self) -> bool {
        !self.modes.intersects(ClientMode::FULL | ClientMode::FLOAT)
    }

    #[must_use]
    pub fn border(&self, width: u32) -> u32 {
        if self.is_full() || self.modes.contains(ClientMode::BORDERLESS) {
            0
        } else {
            width
        }
    }

    #[must_use]
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        self.geometry.contains_point(x, y)
    }

    /// Reserved window roles are never managed.
    #[must_use]
    pub fn is_manageable(&self) -> bool {
        self.r#type != ClientType::Splash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_be_able_to_tag_a_client() {
        let mut subject = Client::new(ClientHandle::<MockHandle>(1), None);
        subject.tag(2);
        assert!(subject.has_tag(2), "was unable to tag the client");
    }

    #[test]
    fn untagging_the_last_tag_falls_back_to_default() {
        let mut subject = Client::new(ClientHandle::<MockHandle>(1), None);
        subject.tag(3);
        subject.untag(3);
        assert_eq!(subject.tags, DEFAULT_TAG);
    }

    #[test]
    fn sticky_clients_are_visible_on_every_view() {
        let mut subject = Client::new(ClientHandle::<MockHandle>(1), None);
        subject.tags = 0b10;
        assert!(!subject.visible_on(0b100));
        subject.modes.insert(ClientMode::STICK);
        assert!(subject.visible_on(0b100));
    }

    #[test]
    fn desktop_clients_are_always_visible() {
        let mut subject = Client::new(ClientHandle::<MockHandle>(1), None);
        subject.tags = 0b10;
        subject.r#type = ClientType::Desktop;
        assert!(subject.visible_on(0b100));
    }
}
