use std::time::Duration;

use log::error;
use sysinfo::{MemoryRefreshKind, RefreshKind, System};
use tokio::{
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};

use crate::{context::ProviderContext, event_bus::ProviderEvent};

pub(crate) const SAMPLE_INTERVAL: Duration = Duration::from_secs(5);

/// Physical memory utilisation snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryOutput {
    /// Usage percentage in `0.0..=100.0`.
    pub usage: f32,
}

pub(crate) fn percentage(used: u64, total: u64) -> f32 {
    if total == 0 {
        return 0.0;
    }

    (used as f32 / total as f32) * 100.
}

pub(crate) struct MemorySampler {
    system: System,
}

impl MemorySampler {
    pub(crate) fn new() -> Self {
        Self {
            system: System::new_with_specifics(
                RefreshKind::nothing().with_memory(MemoryRefreshKind::nothing().with_ram()),
            ),
        }
    }

    pub(crate) fn sample(&mut self) -> MemoryOutput {
        self.system.refresh_memory();

        let total = self.system.total_memory();
        let used = total.saturating_sub(self.system.available_memory());

        MemoryOutput {
            usage: percentage(used, total),
        }
    }
}

pub(crate) fn spawn(ctx: &ProviderContext) -> JoinHandle<()> {
    let sender = ctx.provider_sender(ProviderEvent::Memory);

    ctx.runtime_handle().spawn(async move {
        let mut sampler = MemorySampler::new();
        let mut ticker = interval(SAMPLE_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            if let Err(err) = sender.try_send(sampler.sample()) {
                error!("failed to publish memory sample: {err}");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_handles_zero_total() {
        assert_eq!(percentage(5, 0), 0.0);
    }

    #[test]
    fn percentage_of_half_is_fifty() {
        assert_eq!(percentage(512, 1024), 50.0);
    }

    #[test]
    fn sampler_stays_in_percentage_range() {
        let mut sampler = MemorySampler::new();
        let output = sampler.sample();

        assert!(output.usage >= 0.0);
        assert!(output.usage <= 100.0);
    }
}
