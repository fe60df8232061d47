pub const HEIGHT: f64 = 34.;

pub mod adapters;
pub mod components;
pub mod config;
pub mod context;
pub mod event_bus;
pub mod providers;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use context::{ProviderContext, ProviderEventSender};
