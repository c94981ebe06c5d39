//! A tagging window manager core: clients carry tag bitmasks, views
//! select which tags a screen shows, gravities decide where tiled
//! clients land.
#![warn(clippy::pedantic)]
// Each of these lints are globally allowed because they otherwise make a lot
// of noise against the geometry and bitmask arithmetic.
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::must_use_candidate,
    clippy::default_trait_access
)]
mod command;
pub mod config;
mod display_action;
mod display_event;
pub mod display_servers;
pub mod errors;
mod event_loop;
mod handlers;
pub mod models;
pub mod state;
pub mod utils;

pub use command::Command;
pub use config::Config;
pub use display_action::{DisplayAction, PublishUpdate};
pub use display_event::{ClientChange, DisplayEvent};
pub use display_servers::DisplayServer;
pub use event_loop::ExitReason;
pub use models::Manager;
pub use models::{Client, ClientHandle, Handle};
pub use state::State;
pub use utils::child_process;
