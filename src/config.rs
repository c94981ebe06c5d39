use serde::{Deserialize, Serialize};

use crate::display_servers::DisplayServer;
use crate::models::{Client, Grab, Gravity, Handle, Manager, Tag, View};
use crate::state::State;

/// Lifecycle moments a config can attach behavior to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookEvent {
    Start,
    Exit,
    Reload,
    ClientCreate,
    ClientFocus,
    ClientKill,
    TagCreate,
    TagKill,
    ViewCreate,
    ViewKill,
    ViewJump,
}

pub trait Config {
    /// Tags beyond the reserved default one, in bit order.
    fn create_tags(&self) -> Vec<Tag>;

    /// At least one view is required.
    fn create_views(&self) -> Vec<View>;

    /// At least one gravity is required; the first is the fallback.
    fn create_gravities(&self) -> Vec<Gravity>;

    fn create_grabs(&self) -> Vec<Grab>;

    fn border_width(&self) -> u32;

    fn focus_new_clients(&self) -> bool;

    /// How long a chained grab waits for its next chord.
    fn chain_timeout_ms(&self) -> u64 {
        5000
    }

    /// Observe a lifecycle moment. The model has already changed when
    /// this runs.
    fn call_hook<H: Handle>(&self, event: HookEvent, client: Option<&Client<H>>);

    /// Run a named hook, wired up from grabs, watches and timers.
    /// Returns true if the hook changed something that needs a render.
    fn hook_handler<H: Handle, SERVER>(name: &str, manager: &mut Manager<H, Self, SERVER>) -> bool
    where
        SERVER: DisplayServer<H>,
        Self: Sized;

    /// Attempt to write current state to a file.
    ///
    /// It will be used to restore the state after soft reload.
    ///
    /// **Note:** this function cannot fail.
    fn save_state<H: Handle>(&self, state: &State<H>);

    /// Load saved state if it exists.
    fn load_state<H: Handle>(&self, state: &mut State<H>);
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{Rect, TagMask, DEFAULT_TAG};

    #[allow(clippy::module_name_repetitions)]
    #[derive(Default)]
    pub struct TestConfig {
        pub tags: Vec<String>,
        pub views: Vec<View>,
        pub gravities: Vec<Gravity>,
        pub grabs: Vec<Grab>,
        pub border_width: u32,
        pub hooks_seen: std::sync::Mutex<Vec<HookEvent>>,
    }

    impl Config for TestConfig {
        fn create_tags(&self) -> Vec<Tag> {
            self.tags.iter().map(|name| Tag::new(name)).collect()
        }

        fn create_views(&self) -> Vec<View> {
            if !self.views.is_empty() {
                return self.views.clone();
            }
            if self.tags.is_empty() {
                return vec![View::new("default", DEFAULT_TAG)];
            }
            // one view per configured tag, each showing that tag's bit
            self.tags
                .iter()
                .enumerate()
                .map(|(i, name)| View::new(name, 1 << (i + 1) as TagMask))
                .collect()
        }

        fn create_gravities(&self) -> Vec<Gravity> {
            if self.gravities.is_empty() {
                return vec![Gravity::new("center", Rect::new(25, 25, 50, 50))];
            }
            self.gravities.clone()
        }

        fn create_grabs(&self) -> Vec<Grab> {
            self.grabs.clone()
        }

        fn border_width(&self) -> u32 {
            self.border_width
        }

        fn focus_new_clients(&self) -> bool {
            true
        }

        fn call_hook<H: Handle>(&self, event: HookEvent, _client: Option<&Client<H>>) {
            self.hooks_seen.lock().unwrap().push(event);
        }

        fn hook_handler<H: Handle, SERVER>(
            name: &str,
            manager: &mut Manager<H, Self, SERVER>,
        ) -> bool
        where
            SERVER: DisplayServer<H>,
        {
            match name {
                "jump-second-view" => {
                    manager.command_handler(&crate::Command::ViewJump(1))
                }
                _ => unimplemented!("hook handler: {:?}", name),
            }
        }

        fn save_state<H: Handle>(&self, _state: &State<H>) {
            unimplemented!()
        }

        fn load_state<H: Handle>(&self, _state: &mut State<H>) {
            unimplemented!()
        }
    }

    #[test]
    fn ensure_hook_handler_trait_boundary() {
        let mut manager = Manager::new_test(vec!["web".to_string(), "dev".to_string()]);
        manager.screen_create_handler(crate::models::Screen::default());
        assert!(TestConfig::hook_handler("jump-second-view", &mut manager));
        assert_eq!(manager.state.screens[0].view, 1);
    }
}
