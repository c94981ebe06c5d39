use super::{Config, DispatchMode, DisplayEvent, Manager};
use crate::display_servers::DisplayServer;
use crate::models::Handle;

impl<H: Handle, C: Config, SERVER: DisplayServer<H>> Manager<H, C, SERVER> {
    /// Process one event and apply its changes to the manager.
    /// Returns true if changes need to be rendered.
    pub fn display_event_handler(&mut self, event: DisplayEvent<H>) -> bool {
        match event {
            DisplayEvent::ScreenCreate(s) => self.screen_create_handler(s),
            DisplayEvent::ClientCreate(c) => self.client_created_handler(c),
            DisplayEvent::ClientChange(change) => self.client_changed_handler(change),
            DisplayEvent::ClientDestroy(handle) => self.client_destroyed_handler(&handle),

            DisplayEvent::KeyCombo(mods, sym) => self.key_combo_handler(mods, sym),

            DisplayEvent::MouseCombo(mods, button, handle, x, y) => {
                self.mouse_combo_handler(mods, button, handle, x, y)
            }

            DisplayEvent::MoveClient(handle, x, y) => {
                // Setup for when the client first moves.
                if let DispatchMode::ReadyToMove(h) = self.state.mode {
                    self.state.mode = DispatchMode::Moving(h);
                }
                self.client_move_handler(&handle, x, y)
            }
            DisplayEvent::ResizeClient(handle, x, y) => {
                // Setup for when the client first resizes.
                if let DispatchMode::ReadyToResize(h) = self.state.mode {
                    self.state.mode = DispatchMode::Resizing(h);
                }
                self.client_resize_handler(&handle, x, y)
            }

            DisplayEvent::ChangeToNormalMode => self.normal_mode_handler(),

            DisplayEvent::SendCommand(command) => self.command_handler(&command),
        }
    }
}
