//! Per-engine session state.
//!
//! [`Session`] is the single [`CommandObserver`] of an engine's traffic. It
//! owns the belief (through a [`StateTracker`]), the set of commands the
//! engine advertised, and the `busy` flag.

use crate::channel::CommandObserver;
use gtpsync_core::{EngineBelief, Observation, StateTracker};
use gtpsync_types::Command;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// Observed state of one engine session.
#[derive(Debug)]
pub struct Session {
    tracker: Mutex<StateTracker>,
    commands: Mutex<HashSet<String>>,
    in_flight: AtomicUsize,
    busy: watch::Sender<bool>,
}

impl Session {
    /// Create a session with the initial belief and no known commands.
    pub fn new() -> Self {
        let (busy, _) = watch::channel(false);
        Self {
            tracker: Mutex::new(StateTracker::new()),
            commands: Mutex::new(HashSet::new()),
            in_flight: AtomicUsize::new(0),
            busy,
        }
    }

    /// Snapshot of the current belief.
    pub fn belief(&self) -> EngineBelief {
        lock(&self.tracker).belief().clone()
    }

    /// Check if the engine advertised `name` in `list_commands`.
    pub fn supports(&self, name: &str) -> bool {
        lock(&self.commands).contains(name)
    }

    /// Commands the engine advertised, sorted.
    pub fn supported_commands(&self) -> Vec<String> {
        let mut commands: Vec<String> = lock(&self.commands).iter().cloned().collect();
        commands.sort();
        commands
    }

    /// Replace the advertised command set from a `list_commands` body.
    pub fn set_supported_commands(&self, list: &str) {
        *lock(&self.commands) = list
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
    }

    /// Whether any command is outstanding.
    pub fn is_busy(&self) -> bool {
        *self.busy.borrow()
    }

    /// Subscribe to `busy` changes.
    pub fn subscribe_busy(&self) -> watch::Receiver<bool> {
        self.busy.subscribe()
    }

    /// Forget the belief after the engine process stopped.
    ///
    /// Commands still in flight may update the fresh belief when they
    /// resolve; a dirty belief forces a full resync anyway. The in-flight
    /// count restarts at zero, so such a late completion can also clear
    /// `busy` while a command sent after the reset is still outstanding.
    pub fn reset(&self) {
        lock(&self.tracker).reset();
        self.in_flight.store(0, Ordering::SeqCst);
        self.set_busy(false);
    }

    fn set_busy(&self, value: bool) {
        self.busy.send_if_modified(|busy| {
            let changed = *busy != value;
            *busy = value;
            changed
        });
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandObserver for Session {
    fn command_sent(&self, _command: &Command) {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.set_busy(true);
    }

    fn response_received(&self, command: &Command, observation: Observation<'_>) {
        lock(&self.tracker).observe(command, observation);
    }

    fn command_finished(&self, _command: &Command) {
        // Saturating: a reset may have zeroed the counter mid-flight
        let previous = self
            .in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| Some(n.saturating_sub(1)))
            .unwrap_or(0);
        self.set_busy(previous > 1);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
