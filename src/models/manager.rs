use std::sync::{atomic::AtomicBool, Arc};

use crate::config::Config;
use crate::display_servers::DisplayServer;
use crate::errors::Result;
use crate::models::Handle;
use crate::state::State;
use crate::utils::child_process::Children;
use crate::utils::watches::{TimerQueue, WatchList};

/// Maintains current program state.
pub struct Manager<H: Handle, C, SERVER> {
    pub state: State<H>,
    pub config: C,
    pub display_server: SERVER,

    pub(crate) children: Children,
    pub(crate) reap_requested: Arc<AtomicBool>,
    pub(crate) reload_flag: Arc<AtomicBool>,
    pub(crate) quit_flag: Arc<AtomicBool>,
    pub(crate) reload_requested: bool,
    pub(crate) quit_requested: bool,
    pub(crate) watches: WatchList,
    pub(crate) timers: TimerQueue,
    /// When the pending chain wait gives up.
    pub(crate) chain_deadline: Option<tokio::time::Instant>,
    /// Last pointer position reported while dragging.
    pub(crate) drag_point: Option<(i32, i32)>,
}

impl<H: Handle, C, SERVER> Manager<H, C, SERVER>
where
    C: Config,
    SERVER: DisplayServer<H>,
{
    /// Build the model from a config. Fails when the config produces no
    /// views or no gravities; there is nothing to run without them.
    pub fn new(config: C) -> Result<Self> {
        let display_server = SERVER::new(&config);

        Ok(Self {
            state: State::new(&config)?,
            config,
            display_server,
            children: Children::default(),
            reap_requested: Arc::default(),
            reload_flag: Arc::default(),
            quit_flag: Arc::default(),
            reload_requested: false,
            quit_requested: false,
            watches: WatchList::default(),
            timers: TimerQueue::default(),
            chain_deadline: None,
            drag_point: None,
        })
    }

    pub fn register_child_hook(&self) {
        crate::utils::child_process::register_child_hook(self.reap_requested.clone());
    }

    /// Route SIGHUP into a reload and SIGINT/SIGTERM into a clean quit.
    /// The handlers only flip flags; the loop acts on them.
    pub fn register_signal_hooks(&self) {
        for (signal, flag) in [
            (signal_hook::consts::signal::SIGHUP, &self.reload_flag),
            (signal_hook::consts::signal::SIGINT, &self.quit_flag),
            (signal_hook::consts::signal::SIGTERM, &self.quit_flag),
        ] {
            _ = signal_hook::flag::register(signal, flag.clone()).map_err(|err| {
                tracing::error!("Cannot register signal {} handler: {:?}", signal, err)
            });
        }
    }

    /// Tear down and rebuild from config, keeping what `restore_state`
    /// carries over.
    pub fn request_reload(&mut self) {
        self.reload_requested = true;
    }

    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }
}

#[cfg(test)]
impl
    Manager<
        crate::models::MockHandle,
        crate::config::tests::TestConfig,
        crate::display_servers::MockDisplayServer,
    >
{
    pub fn new_test(tags: Vec<String>) -> Self {
        Self::new(crate::config::tests::TestConfig {
            tags,
            ..Default::default()
        })
        .expect("test config builds")
    }
}
