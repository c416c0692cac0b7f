//! ECS systems that operate on the stealth world.
//!
//! Systems are free functions over `&mut World` (or `&World` when
//! read-only). Apart from the proximity tracker's overlap set they hold
//! no state; everything lives in components.

pub mod proximity;
pub mod snapshot;
pub mod stealth_tick;
