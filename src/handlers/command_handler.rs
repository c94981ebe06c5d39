use super::{Command, Config, DispatchMode, Manager};
use crate::config::HookEvent;
use crate::display_action::DisplayAction;
use crate::display_servers::DisplayServer;
use crate::models::Handle;
use crate::utils::child_process::exec_shell;

impl<H: Handle, C: Config, SERVER: DisplayServer<H>> Manager<H, C, SERVER> {
    /// Run a control command, no matter where it came from.
    /// Returns true if changes need to be rendered.
    pub fn command_handler(&mut self, command: &Command) -> bool {
        tracing::trace!("command: {:?}", command);
        match command {
            Command::TagCreate(name) => {
                if self.state.tag_create(name).is_none() {
                    tracing::warn!("Cannot create tag {:?}: duplicate or table full", name);
                    return false;
                }
                // pick up clients the new tag's matchers claim
                for index in 0..self.state.clients.len() {
                    self.state.retag_client(index);
                }
                self.config.call_hook::<H>(HookEvent::TagCreate, None);
                self.refresh()
            }
            Command::TagKill(name) => {
                if !self.state.tag_kill(name) {
                    return false;
                }
                self.config.call_hook::<H>(HookEvent::TagKill, None);
                self.refresh()
            }
            Command::TagClient { add, tag } => {
                let Some(handle) = self.state.focused else {
                    return false;
                };
                self.state.tag_client(&handle, tag, *add) && self.refresh()
            }
            Command::TagView { add, view, tag } => {
                self.state.tag_view(*view, tag, *add) && self.refresh()
            }

            Command::ViewCreate { name, tags } => {
                self.state.view_create(name, *tags);
                self.config.call_hook::<H>(HookEvent::ViewCreate, None);
                false
            }
            Command::ViewKill(name) => match self.state.view_kill(name) {
                Ok(()) => {
                    self.config.call_hook::<H>(HookEvent::ViewKill, None);
                    self.refresh()
                }
                Err(err) => {
                    tracing::warn!("Cannot kill view {:?}: {}", name, err);
                    false
                }
            },
            Command::ViewJump(view) => {
                if !self.state.view_jump(*view) {
                    return false;
                }
                self.config.call_hook::<H>(HookEvent::ViewJump, None);
                self.refresh()
            }
            Command::ScreenJump(screen) => self.state.screen_jump(*screen),

            Command::GravityCreate { name, template } => {
                self.state.gravity_create(name, *template);
                self.refresh()
            }
            Command::GravityKill(name) => self.state.gravity_kill(name) && self.refresh(),
            Command::SetGravity(name) => {
                let Some(handle) = self.state.focused else {
                    return false;
                };
                self.state.set_gravity(&handle, name) && self.refresh()
            }

            Command::SendClientToScreen(screen) => {
                let Some(handle) = self.state.focused else {
                    return false;
                };
                let mask = self.state.screen_tags(*screen);
                if mask == 0 {
                    return false;
                }
                if let Some(client) = self.state.client_mut(&handle) {
                    client.screen = *screen;
                    client.tags |= mask;
                    client.manual_tags |= mask;
                }
                self.refresh()
            }
            Command::ToggleModes(modes) => {
                let Some(handle) = self.state.focused else {
                    return false;
                };
                self.state.toggle_modes(&handle, *modes) && {
                    self.state.sort_clients();
                    self.refresh()
                }
            }
            Command::MoveDrag => {
                let Some(handle) = self.state.focused else {
                    return false;
                };
                self.state.mode = DispatchMode::ReadyToMove(handle);
                self.state
                    .actions
                    .push_back(DisplayAction::ReadyToMoveClient(handle));
                false
            }
            Command::ResizeDrag => {
                let Some(handle) = self.state.focused else {
                    return false;
                };
                self.state.mode = DispatchMode::ReadyToResize(handle);
                self.state
                    .actions
                    .push_back(DisplayAction::ReadyToResizeClient(handle));
                false
            }
            Command::CloseClient => {
                if let Some(handle) = self.state.focused {
                    self.state.close_client(&handle);
                }
                false
            }
            Command::KillClient => {
                if let Some(handle) = self.state.focused {
                    self.state
                        .actions
                        .push_back(DisplayAction::KillClient(handle));
                }
                false
            }

            Command::Spawn(cmd) => {
                exec_shell(cmd, &mut self.children);
                false
            }
            Command::Reload => {
                self.request_reload();
                false
            }
            Command::Quit => {
                self.request_quit();
                false
            }
        }
    }

    /// Recompute what the change made stale. Always true, for tail calls
    /// from command arms that did change something.
    fn refresh(&mut self) -> bool {
        self.state.update_visibility();
        self.state.apply_placement();
        true
    }
}
