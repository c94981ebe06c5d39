//! Objects the window manager is made of.
mod client;
mod geometry;
mod grab;
mod gravity;
mod hints;
mod manager;
mod mode;
mod registry;
mod screen;
mod tag;
mod view;

pub use client::Client;
pub use client::ClientHandle;
pub use client::Handle;
pub use client::MockHandle;
pub use geometry::Rect;
pub use grab::{Chord, Grab, GrabAction, Grabs};
pub use gravity::Gravity;
pub use hints::SizeHints;
pub use manager::Manager;
pub use mode::{ClientMode, ClientType, DispatchMode};
pub use registry::{EntityKind, Registry};
pub use screen::Screen;
pub use tag::{remove_bit, Matcher, Pattern, Tag, TagMask, Tags, DEFAULT_TAG, MAX_TAGS};
pub use view::View;
