#[cfg(test)]
mod mock_display_server;

use std::pin::Pin;

use futures::prelude::*;

use crate::config::Config;
use crate::display_action::DisplayAction;
use crate::models::{Client, Handle};
use crate::DisplayEvent;

#[cfg(test)]
pub use self::mock_display_server::MockDisplayServer;

pub trait DisplayServer<H: Handle> {
    fn new(config: &impl Config) -> Self;

    fn get_next_events(&mut self) -> Vec<DisplayEvent<H>>;

    fn update_clients(&self, _clients: Vec<&Client<H>>) {}

    fn execute_action(&mut self, _act: DisplayAction<H>) -> Option<DisplayEvent<H>> {
        None
    }

    fn wait_readable(&self) -> Pin<Box<dyn Future<Output = ()>>>;

    fn flush(&self);
}
