use std::os::unix::io::RawFd;
use std::sync::atomic::Ordering;
use std::sync::Once;

use tokio::time::{Duration, Instant};

use crate::config::{Config, HookEvent};
use crate::display_servers::DisplayServer;
use crate::errors::Result;
use crate::models::{Client, Handle, Manager};
use crate::state::State;

/// Why the loop handed control back. A reload keeps the process alive
/// with a fresh config; a quit ends the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Quit,
    Reload,
}

/// Upper bound on an idle sleep so signal flags are noticed even when
/// nothing is scheduled.
const FALLBACK_TICK: Duration = Duration::from_secs(60);

impl<H: Handle, C: Config, SERVER: DisplayServer<H>> Manager<H, C, SERVER> {
    pub async fn event_loop(&mut self) -> ExitReason {
        self.config.call_hook::<H>(HookEvent::Start, None);

        // state restoring needs the first batch of screens and clients in
        let after_first_loop: Once = Once::new();

        let mut event_buffer = vec![];
        loop {
            self.display_server.flush();

            let mut needs_update = false;
            let deadline = self.next_deadline();
            tokio::select! {
                () = self.display_server.wait_readable(), if event_buffer.is_empty() => {
                    event_buffer.append(&mut self.display_server.get_next_events());
                    continue;
                }
                Some(hook) = self.watches.wait_readable(), if event_buffer.is_empty() => {
                    needs_update = C::hook_handler(&hook, self);
                }
                () = tokio::time::sleep_until(deadline), if event_buffer.is_empty() => {
                    needs_update = self.deadline_handler();
                }
                else => {
                    event_buffer
                        .drain(..)
                        .for_each(|event| needs_update = self.display_event_handler(event) || needs_update);
                }
            }

            if needs_update {
                self.state.update_visibility();
                self.state.apply_placement();
                let clients: Vec<&Client<H>> =
                    self.state.clients.iter().filter(|c| !c.is_dead()).collect();
                self.display_server.update_clients(clients);
            }

            // perform any actions requested by the handlers
            while let Some(act) = self.state.actions.pop_front() {
                if let Some(event) = self.display_server.execute_action(act) {
                    event_buffer.push(event);
                }
            }

            after_first_loop.call_once(|| self.config.load_state(&mut self.state));

            if self.reap_requested.swap(false, Ordering::SeqCst) {
                self.children.reap();
            }
            if self.reload_flag.swap(false, Ordering::SeqCst) {
                self.reload_requested = true;
            }
            if self.quit_flag.swap(false, Ordering::SeqCst) {
                self.quit_requested = true;
            }

            if self.quit_requested {
                self.config.call_hook::<H>(HookEvent::Exit, None);
                return ExitReason::Quit;
            }
            if self.reload_requested {
                self.reload_requested = false;
                self.config.save_state(&self.state);
                return ExitReason::Reload;
            }
        }
    }

    /// Swap in a new config without dropping the session. Clients and
    /// their manual tags survive; everything config-owned is rebuilt.
    pub fn reload(&mut self, config: C) -> Result<()> {
        let old = std::mem::replace(&mut self.state, State::new(&config)?);
        self.config = config;
        self.config.call_hook::<H>(HookEvent::Reload, None);
        self.state.restore_state(old);
        self.state.update_visibility();
        self.state.apply_placement();
        self.state.sort_clients();
        Ok(())
    }

    /// Everything that can wake the loop besides the display connection.
    fn next_deadline(&self) -> Instant {
        let mut deadline = Instant::now() + FALLBACK_TICK;
        if let Some(at) = self.timers.next_deadline() {
            deadline = deadline.min(at);
        }
        if let Some(at) = self.chain_deadline {
            deadline = deadline.min(at);
        }
        deadline
    }

    /// A deadline fired: expire a stale chain, run due timer hooks.
    fn deadline_handler(&mut self) -> bool {
        let now = Instant::now();
        if self.chain_deadline.is_some_and(|at| at <= now) {
            tracing::debug!("key chain timed out");
            self.abort_chain();
        }
        let mut needs_update = false;
        for hook in self.timers.pop_due(now) {
            needs_update = C::hook_handler(&hook, self) || needs_update;
        }
        needs_update
    }

    // -- the loop's pluggable wakers -------------------------------------

    /// Run `hook` whenever `fd` turns readable. The hook drains the fd.
    pub fn watch_add(&mut self, fd: RawFd, hook: &str) -> Result<()> {
        self.watches.add(fd, hook)
    }

    pub fn watch_del(&mut self, fd: RawFd) -> bool {
        self.watches.remove(fd)
    }

    /// Run `hook` after `delay`, then every `interval` if one is given.
    pub fn timer_add(&mut self, delay: Duration, interval: Option<Duration>, hook: &str) {
        self.timers.add(delay, interval, hook);
    }

    pub fn timer_del(&mut self, hook: &str) {
        self.timers.remove(hook);
    }
}
