//! Mock host for unit testing and scripted replays.
//!
//! Stands in for the host application: it accepts hook registrations like a
//! real host would and lets the caller fire occurrences on demand.

use std::collections::{HashMap, HashSet};

use super::{HookCallback, HookError, HookPoint, HostExtensionPoints, HostOccurrence};

/// A mock implementation of [`HostExtensionPoints`].
#[derive(Default)]
pub struct MockHost {
    hooks: HashMap<HookPoint, HookCallback>,
    unsupported: HashSet<HookPoint>,
    fired: usize,
}

impl MockHost {
    /// Creates a host exposing every hook point.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a host that rejects registrations at `point`.
    pub fn without(point: HookPoint) -> Self {
        let mut host = Self::default();
        host.unsupported.insert(point);
        host
    }

    /// Simulates the host reaching the hook point for `occurrence`.
    ///
    /// Returns `true` if a callback was registered there and ran.
    pub fn fire(&mut self, occurrence: &HostOccurrence) -> bool {
        match self.hooks.get_mut(&occurrence.hook_point()) {
            Some(callback) => {
                callback(occurrence);
                self.fired += 1;
                true
            }
            None => false,
        }
    }

    /// Fires `TickComplete` `count` times.
    pub fn run_ticks(&mut self, count: usize) {
        for _ in 0..count {
            self.fire(&HostOccurrence::TickComplete);
        }
    }

    /// Fires a non-repeat key dispatch for `key_code`.
    pub fn press_key(&mut self, key_code: i32) -> bool {
        self.fire(&HostOccurrence::KeyDispatched {
            key_code,
            is_repeat: false,
        })
    }

    pub fn has_hook(&self, point: HookPoint) -> bool {
        self.hooks.contains_key(&point)
    }

    /// Number of occurrences that reached a registered callback.
    pub fn fired_count(&self) -> usize {
        self.fired
    }
}

impl HostExtensionPoints for MockHost {
    fn register_hook(&mut self, point: HookPoint, callback: HookCallback) -> Result<(), HookError> {
        if self.unsupported.contains(&point) {
            return Err(HookError::Unsupported(point));
        }
        if self.hooks.contains_key(&point) {
            return Err(HookError::AlreadyRegistered(point));
        }
        self.hooks.insert(point, callback);
        Ok(())
    }
}
