use std::time::{Duration, Instant};

use itertools::Itertools;
use log::error;
use sysinfo::Networks;
use tokio::{
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};

use crate::{context::ProviderContext, event_bus::ProviderEvent};

pub(crate) const SAMPLE_INTERVAL: Duration = Duration::from_secs(5);

/// Network utilisation snapshot.
///
/// Subscribed and stored like every other provider, but the bar renders no
/// readout for it; the slot exists so a future readout only touches the
/// view layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkOutput {
    pub address: String,
    /// KB/s since the previous sample.
    pub download_speed: u32,
    /// KB/s since the previous sample.
    pub upload_speed: u32,
}

#[derive(Debug, Clone)]
struct TrafficSnapshot {
    address: Option<String>,
    total_received: u64,
    total_transmitted: u64,
    timestamp: Instant,
}

impl TrafficSnapshot {
    fn capture(networks: &Networks, now: Instant) -> Option<Self> {
        let (address, total_received, total_transmitted) = networks.iter().fold(
            (None, 0_u64, 0_u64),
            |(first_address, received, transmitted), (_, data)| {
                let next_address = first_address.or_else(|| {
                    data.ip_networks()
                        .iter()
                        .sorted_by(|a, b| a.addr.cmp(&b.addr))
                        .next()
                        .map(|ip| ip.addr.to_string())
                });

                (
                    next_address,
                    received + data.received(),
                    transmitted + data.transmitted(),
                )
            },
        );

        let address = address?;

        Some(Self {
            address: Some(address),
            total_received,
            total_transmitted,
            timestamp: now,
        })
    }

    fn to_output(&self, previous: Option<&TrafficSnapshot>) -> NetworkOutput {
        let elapsed = previous
            .map(|snapshot| self.timestamp.saturating_duration_since(snapshot.timestamp))
            .unwrap_or_default();
        let seconds = elapsed.as_secs();

        let compute_speed = |current: u64, previous_total: u64| -> u32 {
            if seconds == 0 {
                return 0;
            }

            let delta = current.saturating_sub(previous_total);
            ((delta / 1000) as u32) / (seconds as u32)
        };

        NetworkOutput {
            address: self.address.clone().unwrap_or_else(|| "Unknown".to_string()),
            download_speed: compute_speed(
                self.total_received,
                previous.map_or(0, |snapshot| snapshot.total_received),
            ),
            upload_speed: compute_speed(
                self.total_transmitted,
                previous.map_or(0, |snapshot| snapshot.total_transmitted),
            ),
        }
    }
}

pub(crate) struct NetworkSampler {
    networks: Networks,
    last: Option<TrafficSnapshot>,
}

impl NetworkSampler {
    pub(crate) fn new() -> Self {
        Self {
            networks: Networks::new_with_refreshed_list(),
            last: None,
        }
    }

    pub(crate) fn sample(&mut self) -> Option<NetworkOutput> {
        self.networks.refresh(true);

        let observation = TrafficSnapshot::capture(&self.networks, Instant::now());
        let output = observation
            .as_ref()
            .map(|snapshot| snapshot.to_output(self.last.as_ref()));
        self.last = observation;

        output
    }
}

pub(crate) fn spawn(ctx: &ProviderContext) -> JoinHandle<()> {
    let sender = ctx.provider_sender(ProviderEvent::Network);

    ctx.runtime_handle().spawn(async move {
        let mut sampler = NetworkSampler::new();
        let mut ticker = interval(SAMPLE_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            if let Some(output) = sampler.sample() {
                if let Err(err) = sender.try_send(output) {
                    error!("failed to publish network sample: {err}");
                }
            }
        }
    })
}
