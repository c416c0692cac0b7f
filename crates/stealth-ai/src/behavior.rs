//! Reaction hooks that drive game-specific spotter behavior.

use stealth_core::types::{ColliderHandle, LastSeen};

/// Game-side reactions to spotter state changes (movement, animation,
/// alerts). Injected into a [`crate::Spotter`] at construction.
pub trait SpotterBehavior: Send + Sync {
    /// A spy became suspicious; the spotter starts investigating it.
    fn on_spy_found(&mut self, spy: ColliderHandle);

    /// Investigation ended without recognizing the spy.
    fn on_spy_lost(&mut self, spy: ColliderHandle, last_seen: Option<LastSeen>);

    /// The designated target was recognized or re-acquired.
    fn on_target_found(&mut self, target: ColliderHandle);

    /// The target slipped away; a search begins around `last_seen`.
    fn on_target_lost(&mut self, target: ColliderHandle, last_seen: Option<LastSeen>);

    /// Stop pursuing whatever was being pursued.
    fn forget_target(&mut self);
}

/// Behavior with no reactions, for spotters observed only through events.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassiveBehavior;

impl SpotterBehavior for PassiveBehavior {
    fn on_spy_found(&mut self, _spy: ColliderHandle) {}
    fn on_spy_lost(&mut self, _spy: ColliderHandle, _last_seen: Option<LastSeen>) {}
    fn on_target_found(&mut self, _target: ColliderHandle) {}
    fn on_target_lost(&mut self, _target: ColliderHandle, _last_seen: Option<LastSeen>) {}
    fn forget_target(&mut self) {}
}
