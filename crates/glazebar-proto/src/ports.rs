//! Port definitions consumed by the provider layer.
//!
//! This module exposes the GlazeWM port contract used by higher level crates
//! to observe window-manager state and dispatch commands without knowing how
//! the IPC is reached.

pub mod glazewm;
