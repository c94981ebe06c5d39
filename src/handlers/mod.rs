pub mod client_handler;
pub mod command_handler;
pub mod display_event_handler;
mod drag_handler;
mod grab_handler;
mod screen_create_handler;

use super::command::Command;
use super::config::Config;
use super::models::{Client, ClientHandle, ClientMode, DispatchMode, Manager, Screen};
use super::DisplayEvent;
