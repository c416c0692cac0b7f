//! Memory of spies a spotter has recognized as not being its target.

use std::collections::VecDeque;

use stealth_core::config::IgnoreRetention;
use stealth_core::types::ColliderHandle;

#[derive(Debug, Clone, Copy)]
struct IgnoreEntry {
    spy: ColliderHandle,
    age_secs: f32,
}

/// Ordered oldest-first so bounded retention evicts from the front.
#[derive(Debug, Clone)]
pub struct IgnoreList {
    retention: IgnoreRetention,
    entries: VecDeque<IgnoreEntry>,
}

impl IgnoreList {
    pub fn new(retention: IgnoreRetention) -> Self {
        Self {
            retention,
            entries: VecDeque::new(),
        }
    }

    pub fn contains(&self, spy: ColliderHandle) -> bool {
        self.entries.iter().any(|e| e.spy == spy)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remember `spy`. Re-inserting refreshes its age. Returns the spy
    /// evicted to make room, if any.
    pub fn insert(&mut self, spy: ColliderHandle) -> Option<ColliderHandle> {
        self.entries.retain(|e| e.spy != spy);
        self.entries.push_back(IgnoreEntry { spy, age_secs: 0.0 });

        match self.retention {
            IgnoreRetention::Bounded { capacity } if self.entries.len() > capacity => {
                self.entries.pop_front().map(|e| e.spy)
            }
            _ => None,
        }
    }

    /// Forget `spy` outright. Returns whether it was present.
    pub fn remove(&mut self, spy: ColliderHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.spy != spy);
        self.entries.len() != before
    }

    /// Age every entry by `dt` and drop expired ones.
    pub fn advance(&mut self, dt: f32) -> Vec<ColliderHandle> {
        let IgnoreRetention::Expiring { secs } = self.retention else {
            return Vec::new();
        };
        let mut expired = Vec::new();
        self.entries.retain_mut(|e| {
            e.age_secs += dt;
            if e.age_secs >= secs {
                expired.push(e.spy);
                false
            } else {
                true
            }
        });
        expired
    }
}
