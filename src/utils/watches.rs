//! Watch descriptors and the timer queue the main loop multiplexes.

use std::cmp::Ordering;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::os::unix::io::RawFd;

use tokio::io::unix::AsyncFd;
use tokio::io::Interest;
use tokio::time::{Duration, Instant};

use crate::errors::Result;

/// A foreign file descriptor the loop polls for readability. When it turns
/// readable the named hook runs and is expected to drain it.
pub struct Watch {
    pub fd: RawFd,
    pub hook: String,
    inner: AsyncFd<RawFd>,
}

#[derive(Default)]
pub struct WatchList {
    entries: Vec<Watch>,
}

impl WatchList {
    /// Register a descriptor. Watching the same fd twice just replaces
    /// the hook.
    pub fn add(&mut self, fd: RawFd, hook: &str) -> Result<()> {
        if let Some(watch) = self.entries.iter_mut().find(|w| w.fd == fd) {
            watch.hook = hook.to_owned();
            return Ok(());
        }
        let inner = AsyncFd::with_interest(fd, Interest::READABLE)?;
        self.entries.push(Watch {
            fd,
            hook: hook.to_owned(),
            inner,
        });
        Ok(())
    }

    pub fn remove(&mut self, fd: RawFd) -> bool {
        let before = self.entries.len();
        self.entries.retain(|w| w.fd != fd);
        self.entries.len() != before
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve with the hook of the first descriptor that turns readable.
    /// Pends forever while the list is empty.
    pub async fn wait_readable(&self) -> Option<String> {
        if self.entries.is_empty() {
            futures::future::pending::<()>().await;
        }
        let waits = self.entries.iter().map(|watch| {
            Box::pin(async move {
                match watch.inner.readable().await {
                    Ok(mut guard) => {
                        guard.clear_ready();
                        Some(watch.hook.clone())
                    }
                    Err(err) => {
                        tracing::warn!("watch on fd {} failed: {}", watch.fd, err);
                        None
                    }
                }
            })
        });
        let (hook, _, _) = futures::future::select_all(waits).await;
        hook
    }
}

#[derive(Debug)]
struct TimerEntry {
    deadline: Instant,
    seq: u64,
    interval: Option<Duration>,
    hook: String,
}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}
impl Eq for TimerEntry {}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.deadline
            .cmp(&other.deadline)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Min-heap of hook deadlines; the head is always the next one due.
#[derive(Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Reverse<TimerEntry>>,
    seq: u64,
}

impl TimerQueue {
    /// Schedule `hook` after `delay`. With an `interval` it re-arms
    /// itself every time it fires.
    pub fn add(&mut self, delay: Duration, interval: Option<Duration>, hook: &str) {
        self.seq += 1;
        self.heap.push(Reverse(TimerEntry {
            deadline: Instant::now() + delay,
            seq: self.seq,
            interval,
            hook: hook.to_owned(),
        }));
    }

    pub fn remove(&mut self, hook: &str) {
        let entries: Vec<TimerEntry> = std::mem::take(&mut self.heap)
            .into_iter()
            .map(|Reverse(e)| e)
            .filter(|e| e.hook != hook)
            .collect();
        self.heap = entries.into_iter().map(Reverse).collect();
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.heap.peek().map(|Reverse(e)| e.deadline)
    }

    /// Pop every hook due at `now`, re-arming interval timers from `now`
    /// so a stalled loop does not fire them in bursts.
    pub fn pop_due(&mut self, now: Instant) -> Vec<String> {
        let mut due = vec![];
        while let Some(Reverse(entry)) = self.heap.peek() {
            if entry.deadline > now {
                break;
            }
            let Some(Reverse(mut entry)) = self.heap.pop() else {
                break;
            };
            due.push(entry.hook.clone());
            if let Some(interval) = entry.interval {
                self.seq += 1;
                entry.deadline = now + interval;
                entry.seq = self.seq;
                self.heap.push(Reverse(entry));
            }
        }
        due
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::os::unix::io::AsRawFd;
    use std::os::unix::net::UnixStream;

    fn nonblocking_pair() -> (UnixStream, UnixStream) {
        let (writer, reader) = UnixStream::pair().expect("socketpair");
        reader.set_nonblocking(true).expect("nonblocking");
        (writer, reader)
    }

    #[tokio::test]
    async fn a_readable_descriptor_wakes_with_its_hook() {
        let (mut writer, reader) = nonblocking_pair();
        let mut watches = WatchList::default();
        watches.add(reader.as_raw_fd(), "drain-status").unwrap();

        writer.write_all(b"x").unwrap();
        assert_eq!(
            watches.wait_readable().await,
            Some("drain-status".to_owned())
        );
    }

    #[tokio::test]
    async fn rewatching_a_descriptor_swaps_the_hook() {
        let (mut writer, reader) = nonblocking_pair();
        let mut watches = WatchList::default();
        watches.add(reader.as_raw_fd(), "old").unwrap();
        watches.add(reader.as_raw_fd(), "new").unwrap();
        assert_eq!(watches.len(), 1);

        writer.write_all(b"x").unwrap();
        assert_eq!(watches.wait_readable().await, Some("new".to_owned()));
    }

    #[tokio::test]
    async fn removed_descriptors_stop_waking_the_list() {
        let (mut writer, reader) = nonblocking_pair();
        let mut watches = WatchList::default();
        watches.add(reader.as_raw_fd(), "noisy").unwrap();
        writer.write_all(b"x").unwrap();

        assert!(watches.remove(reader.as_raw_fd()));
        assert!(!watches.remove(reader.as_raw_fd()));
        assert!(watches.is_empty());

        tokio::select! {
            hook = watches.wait_readable() => panic!("woke on {hook:?} with nothing watched"),
            () = tokio::time::sleep(Duration::from_millis(20)) => {}
        }
    }

    #[test]
    fn the_nearest_deadline_is_always_the_head() {
        let mut timers = TimerQueue::default();
        timers.add(Duration::from_secs(30), None, "late");
        timers.add(Duration::from_secs(5), None, "soon");
        timers.add(Duration::from_secs(60), None, "later");
        let next = timers.next_deadline().unwrap();
        assert!(next <= Instant::now() + Duration::from_secs(5));
    }

    #[test]
    fn interval_timers_rearm_after_firing() {
        let mut timers = TimerQueue::default();
        timers.add(Duration::ZERO, Some(Duration::from_secs(10)), "tick");
        let now = Instant::now();
        assert_eq!(timers.pop_due(now), vec!["tick".to_owned()]);
        assert!(!timers.is_empty());
        assert!(timers.next_deadline().unwrap() > now);
    }

    #[test]
    fn one_shot_timers_fire_once() {
        let mut timers = TimerQueue::default();
        timers.add(Duration::ZERO, None, "once");
        assert_eq!(timers.pop_due(Instant::now()).len(), 1);
        assert!(timers.is_empty());
    }

    #[test]
    fn due_hooks_come_out_in_deadline_order() {
        let mut timers = TimerQueue::default();
        timers.add(Duration::from_millis(2), None, "b");
        timers.add(Duration::from_millis(1), None, "a");
        let due = timers.pop_due(Instant::now() + Duration::from_secs(1));
        assert_eq!(due, vec!["a".to_owned(), "b".to_owned()]);
    }

    #[test]
    fn removal_by_name_unschedules() {
        let mut timers = TimerQueue::default();
        timers.add(Duration::ZERO, None, "gone");
        timers.add(Duration::ZERO, None, "kept");
        timers.remove("gone");
        assert_eq!(timers.pop_due(Instant::now()), vec!["kept".to_owned()]);
    }
}
