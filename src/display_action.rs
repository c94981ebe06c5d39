use serde::{Deserialize, Serialize};

use crate::models::{Chord, ClientHandle, Handle, Rect, TagMask};

/// Model snapshots mirrored out to the property protocol. Every mutation
/// of the corresponding store enqueues one of these; the backend owns the
/// wire format, the model stays authoritative.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum PublishUpdate<H: Handle> {
    #[serde(bound = "")]
    Clients(Vec<ClientHandle<H>>),
    #[serde(bound = "")]
    Stacking(Vec<ClientHandle<H>>),
    #[serde(bound = "")]
    ClientTags(ClientHandle<H>, TagMask),
    TagList(Vec<String>),
    ViewList(Vec<(String, TagMask)>),
    /// View bound to each screen, in screen order.
    CurrentViews(Vec<usize>),
    GravityList(Vec<(String, Rect)>),
    #[serde(bound = "")]
    FocusedClient(Option<ClientHandle<H>>),
}

/// These are responses from the window manager.
/// The display server should act on these actions.
#[allow(clippy::large_enum_variant)]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum DisplayAction<H: Handle> {
    /// Get triggered after a new window is discovered and WE are
    /// managing it.
    #[serde(bound = "")]
    AddedClient(ClientHandle<H>),

    /// Move and size a window, with the border it should carry.
    #[serde(bound = "")]
    MoveResize(ClientHandle<H>, Rect, u32),

    /// Map or unmap a window.
    #[serde(bound = "")]
    SetVisible(ClientHandle<H>, bool),

    /// Sets the "z-index" order of the windows, first is the top.
    #[serde(bound = "")]
    SetClientOrder(Vec<ClientHandle<H>>),

    /// Tell a window to take focus, via its focus protocol if it speaks
    /// one.
    #[serde(bound = "")]
    FocusClient {
        #[serde(bound = "")]
        handle: ClientHandle<H>,
        takes_focus: bool,
    },

    /// Focus the root window, dropping focus from whatever had it.
    #[serde(bound = "")]
    Unfocus(Option<ClientHandle<H>>),

    /// Nicely ask a window if it would please close at its convenience.
    #[serde(bound = "")]
    CloseClient(ClientHandle<H>),

    /// Forcibly kill a window's connection.
    #[serde(bound = "")]
    KillClient(ClientHandle<H>),

    /// Tell the DS we no longer care about this window and other cleanup.
    #[serde(bound = "")]
    DestroyedClient(ClientHandle<H>),

    /// Grab the pointer; a move drag starts at the next motion event.
    #[serde(bound = "")]
    ReadyToMoveClient(ClientHandle<H>),

    /// Grab the pointer; a resize drag starts at the next motion event.
    #[serde(bound = "")]
    ReadyToResizeClient(ClientHandle<H>),

    /// Tell the DS to return to normal mode if it is not (ie resize a
    /// window or moving a window).
    NormalMode,

    /// Re-establish all key and button grabs after a reload.
    ReloadKeyGrabs(Vec<Chord>),

    #[serde(bound = "")]
    Publish(PublishUpdate<H>),
}
