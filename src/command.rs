use serde::{Deserialize, Serialize};

use crate::models::{ClientMode, Rect, TagMask};

/// Control commands, the same set no matter whether they come from a grab
/// or from the message protocol. Unknown names and stale indices are
/// ignored with a log line; commands never abort the loop.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Command {
    TagCreate(String),
    TagKill(String),
    /// Add or drop a tag on the focused client.
    TagClient { add: bool, tag: String },
    /// Add or drop a tag on a view.
    TagView { add: bool, view: usize, tag: String },

    ViewCreate { name: String, tags: TagMask },
    ViewKill(String),
    /// Switch the current screen to a view.
    ViewJump(usize),
    ScreenJump(usize),

    GravityCreate { name: String, template: Rect },
    GravityKill(String),
    /// Assign a gravity to the focused client.
    SetGravity(String),

    SendClientToScreen(usize),
    ToggleModes(ClientMode),
    /// Start an interactive move of the pressed or focused client.
    MoveDrag,
    /// Start an interactive resize of the pressed or focused client.
    ResizeDrag,
    /// Ask the focused client to close, honoring its close protocol.
    CloseClient,
    /// Force the focused client gone.
    KillClient,

    Spawn(String),
    Reload,
    Quit,
}
