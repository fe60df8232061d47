use std::time::Duration;

use log::error;
use sysinfo::{CpuRefreshKind, RefreshKind, System};
use tokio::{
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};

use crate::{context::ProviderContext, event_bus::ProviderEvent};

/// Interval between cpu usage samples.
pub(crate) const SAMPLE_INTERVAL: Duration = Duration::from_secs(5);

/// Global cpu utilisation snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CpuOutput {
    /// Usage percentage in `0.0..=100.0`.
    pub usage: f32,
}

impl CpuOutput {
    /// Whether the readout should use the high-usage color. Strictly above
    /// the threshold: a reading equal to it is still normal.
    pub fn is_high_usage(&self, threshold: u32) -> bool {
        self.usage > threshold as f32
    }
}

/// Samples cpu usage through [`sysinfo`], refreshing only what the readout
/// needs.
pub(crate) struct CpuSampler {
    system: System,
}

impl CpuSampler {
    pub(crate) fn new() -> Self {
        Self {
            system: System::new_with_specifics(
                RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing().with_cpu_usage()),
            ),
        }
    }

    pub(crate) fn sample(&mut self) -> CpuOutput {
        self.system
            .refresh_cpu_specifics(CpuRefreshKind::nothing().with_cpu_usage());

        CpuOutput {
            usage: self.system.global_cpu_usage(),
        }
    }
}

pub(crate) fn spawn(ctx: &ProviderContext) -> JoinHandle<()> {
    let sender = ctx.provider_sender(ProviderEvent::Cpu);

    ctx.runtime_handle().spawn(async move {
        let mut sampler = CpuSampler::new();
        let mut ticker = interval(SAMPLE_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            if let Err(err) = sender.try_send(sampler.sample()) {
                error!("failed to publish cpu sample: {err}");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_boundary_is_not_high_usage() {
        let output = CpuOutput { usage: 85.0 };

        assert!(!output.is_high_usage(85));
    }

    #[test]
    fn above_threshold_is_high_usage() {
        let output = CpuOutput { usage: 86.0 };

        assert!(output.is_high_usage(85));
    }

    #[test]
    fn sampler_stays_in_percentage_range() {
        let mut sampler = CpuSampler::new();
        let output = sampler.sample();

        assert!(output.usage >= 0.0);
        assert!(output.usage <= 100.0);
    }
}
