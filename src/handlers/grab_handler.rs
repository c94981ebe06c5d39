use super::{Command, Config, DispatchMode, Manager};
use crate::display_action::DisplayAction;
use crate::display_servers::DisplayServer;
use crate::models::{ClientHandle, GrabAction, Handle};
use crate::utils::child_process::exec_shell;
use crate::utils::keysym_lookup::{pointer_button, XKeysym};
use crate::utils::modmask_lookup::{clean_mask, ModMask};

impl<H: Handle, C: Config, SERVER: DisplayServer<H>> Manager<H, C, SERVER> {
    /// Dispatch a grabbed key press. While a chain is pending every key
    /// goes to the chain; anything that does not fit aborts it.
    pub fn key_combo_handler(&mut self, mods: ModMask, sym: XKeysym) -> bool {
        if let DispatchMode::AwaitingChain { grab, depth } = self.state.mode {
            return self.chain_advance_handler(grab, depth, mods, sym);
        }
        let Some(index) = self.state.grabs.resolve(sym, mods) else {
            return false;
        };
        let grab = match self.state.grabs.get(index) {
            Some(grab) => grab,
            None => return false,
        };
        if grab.is_chain() {
            self.state.mode = DispatchMode::AwaitingChain {
                grab: index,
                depth: 0,
            };
            self.arm_chain_deadline();
            return false;
        }
        let action = grab.action.clone();
        self.run_grab_action(&action)
    }

    /// Dispatch a grabbed pointer press. Drag commands are intercepted
    /// here so the grab decides which client the drag applies to.
    pub fn mouse_combo_handler(
        &mut self,
        mods: ModMask,
        button: u8,
        handle: ClientHandle<H>,
        x: i32,
        y: i32,
    ) -> bool {
        if self.state.mode.is_dragging() {
            return false;
        }
        self.abort_chain();
        let focus_changed = self.focus_client(&handle);
        let Some(index) = self.state.grabs.resolve(pointer_button(button), mods) else {
            return focus_changed;
        };
        let action = match self.state.grabs.get(index) {
            Some(grab) if !grab.is_chain() => grab.action.clone(),
            _ => return focus_changed,
        };
        match action {
            GrabAction::Command(Command::MoveDrag) => {
                self.state.mode = DispatchMode::ReadyToMove(handle);
                self.drag_point = Some((x, y));
                self.state
                    .actions
                    .push_back(DisplayAction::ReadyToMoveClient(handle));
                focus_changed
            }
            GrabAction::Command(Command::ResizeDrag) => {
                self.state.mode = DispatchMode::ReadyToResize(handle);
                self.drag_point = Some((x, y));
                self.state
                    .actions
                    .push_back(DisplayAction::ReadyToResizeClient(handle));
                focus_changed
            }
            action => self.run_grab_action(&action) || focus_changed,
        }
    }

    /// A chain is pending and a key arrived. Match it against the next
    /// expected chord, fire the action at the end of the chain.
    fn chain_advance_handler(
        &mut self,
        grab: usize,
        depth: usize,
        mods: ModMask,
        sym: XKeysym,
    ) -> bool {
        let (expected, remaining, action) = match self.state.grabs.get(grab) {
            Some(g) => (
                g.chain.get(depth).copied(),
                g.chain.len() - depth,
                g.action.clone(),
            ),
            None => {
                self.abort_chain();
                return false;
            }
        };
        let matched = expected
            .is_some_and(|chord| chord.sym == sym && chord.mods == clean_mask(mods));
        if !matched {
            tracing::debug!("chain aborted at depth {}", depth);
            self.abort_chain();
            return false;
        }
        if remaining == 1 {
            self.abort_chain();
            return self.run_grab_action(&action);
        }
        self.state.mode = DispatchMode::AwaitingChain {
            grab,
            depth: depth + 1,
        };
        self.arm_chain_deadline();
        false
    }

    /// Give up on a pending chain, if any. Also the timeout path.
    pub(crate) fn abort_chain(&mut self) {
        if matches!(self.state.mode, DispatchMode::AwaitingChain { .. }) {
            self.state.mode = DispatchMode::Normal;
        }
        self.chain_deadline = None;
    }

    fn arm_chain_deadline(&mut self) {
        let timeout = std::time::Duration::from_millis(self.config.chain_timeout_ms());
        self.chain_deadline = Some(tokio::time::Instant::now() + timeout);
    }

    pub(crate) fn run_grab_action(&mut self, action: &GrabAction) -> bool {
        match action {
            GrabAction::Spawn(cmd) => {
                exec_shell(cmd, &mut self.children);
                false
            }
            GrabAction::Hook(name) => C::hook_handler(name, self),
            GrabAction::Command(command) => self.command_handler(&command.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Client, Grab, MockHandle, Screen};

    fn manager_with_grabs(specs: Vec<(&str, GrabAction)>) -> Manager<
        MockHandle,
        crate::config::tests::TestConfig,
        crate::display_servers::MockDisplayServer,
    > {
        let grabs = specs
            .into_iter()
            .map(|(spec, action)| Grab::parse(spec, action).expect("grab spec"))
            .collect();
        let config = crate::config::tests::TestConfig {
            grabs,
            ..Default::default()
        };
        let mut manager = Manager::new(config).expect("test config builds");
        manager.screen_create_handler(Screen::default());
        manager
    }

    fn press(spec: &str) -> (ModMask, XKeysym) {
        let grab = Grab::parse(spec, GrabAction::Spawn(String::new())).expect("chord");
        (grab.chord.mods, grab.chord.sym)
    }

    #[test]
    fn plain_grab_fires_its_command() {
        let mut manager = manager_with_grabs(vec![(
            "W-q",
            GrabAction::Command(Command::ViewCreate {
                name: "extra".to_string(),
                tags: 1,
            }),
        )]);
        let (mods, sym) = press("W-q");
        manager.key_combo_handler(mods, sym);
        assert_eq!(manager.state.views.len(), 2);
    }

    #[test]
    fn chain_runs_only_after_every_chord() {
        let mut manager = manager_with_grabs(vec![(
            "A-x y",
            GrabAction::Command(Command::Quit),
        )]);
        let (mods, sym) = press("A-x");
        manager.key_combo_handler(mods, sym);
        assert!(matches!(
            manager.state.mode,
            DispatchMode::AwaitingChain { depth: 0, .. }
        ));
        assert!(manager.chain_deadline.is_some());
        assert!(!manager.quit_requested);

        let (mods, sym) = press("y");
        manager.key_combo_handler(mods, sym);
        assert!(manager.quit_requested);
        assert_eq!(manager.state.mode, DispatchMode::Normal);
        assert!(manager.chain_deadline.is_none());
    }

    #[test]
    fn chain_aborts_on_the_wrong_chord() {
        let mut manager = manager_with_grabs(vec![(
            "A-x y",
            GrabAction::Command(Command::Quit),
        )]);
        let (mods, sym) = press("A-x");
        manager.key_combo_handler(mods, sym);
        let (mods, sym) = press("z");
        manager.key_combo_handler(mods, sym);
        assert_eq!(manager.state.mode, DispatchMode::Normal);
        assert!(!manager.quit_requested);

        // the grab must still work from the top afterwards
        let (mods, sym) = press("A-x");
        manager.key_combo_handler(mods, sym);
        assert!(matches!(
            manager.state.mode,
            DispatchMode::AwaitingChain { .. }
        ));
    }

    #[test]
    fn lock_modifiers_do_not_break_chains() {
        let mut manager = manager_with_grabs(vec![(
            "A-x y",
            GrabAction::Command(Command::Quit),
        )]);
        let (mods, sym) = press("A-x");
        manager.key_combo_handler(mods | ModMask::Lock, sym);
        let (_, sym) = press("y");
        manager.key_combo_handler(ModMask::Mod2, sym);
        assert!(manager.quit_requested);
    }

    #[test]
    fn drag_buttons_arm_the_drag_and_focus_the_client() {
        let mut manager =
            manager_with_grabs(vec![("W-B1", GrabAction::Command(Command::MoveDrag))]);
        manager.client_created_handler(Client::new(crate::models::ClientHandle(9), None));
        manager.state.actions.clear();

        manager.mouse_combo_handler(ModMask::Mod4, 1, crate::models::ClientHandle(9), 40, 50);
        assert_eq!(
            manager.state.mode,
            DispatchMode::ReadyToMove(crate::models::ClientHandle(9))
        );
        assert_eq!(manager.drag_point, Some((40, 50)));
        assert!(manager.state.actions.iter().any(|action| matches!(
            action,
            DisplayAction::ReadyToMoveClient(_)
        )));
    }

    #[test]
    fn presses_during_a_drag_are_swallowed() {
        let mut manager =
            manager_with_grabs(vec![("W-B1", GrabAction::Command(Command::MoveDrag))]);
        manager.client_created_handler(Client::new(crate::models::ClientHandle(9), None));
        manager.state.mode = DispatchMode::Moving(crate::models::ClientHandle(9));
        manager.state.actions.clear();

        assert!(!manager.mouse_combo_handler(
            ModMask::Mod4,
            1,
            crate::models::ClientHandle(9),
            40,
            50
        ));
        assert_eq!(
            manager.state.mode,
            DispatchMode::Moving(crate::models::ClientHandle(9))
        );
        assert!(manager.state.actions.is_empty());
    }

    #[test]
    fn unbound_clicks_still_move_focus() {
        let mut manager = manager_with_grabs(vec![]);
        manager.client_created_handler(Client::new(crate::models::ClientHandle(3), None));
        manager.state.focused = None;
        assert!(manager.mouse_combo_handler(
            ModMask::empty(),
            1,
            crate::models::ClientHandle(3),
            5,
            5
        ));
        assert_eq!(manager.state.focused, Some(crate::models::ClientHandle(3)));
    }
}
