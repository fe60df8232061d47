use std::sync::Arc;

use glazebar_proto::{
    config::Config,
    ports::glazewm::{GlazewmPort, GlazewmState},
};
use tokio::task::JoinHandle;

use crate::{context::ProviderContext, event_bus::ProviderEvent};

pub mod battery;
pub mod cpu;
pub mod date;
pub mod glazewm;
pub mod memory;
pub mod network;
pub mod weather;

use battery::BatteryOutput;
use cpu::CpuOutput;
use date::DateOutput;
use memory::MemoryOutput;
use network::NetworkOutput;
use weather::WeatherOutput;

/// Latest output of every subscribed provider.
///
/// A slot stays `None` until its provider first emits; each emission
/// replaces the slot wholesale. The bar view is a pure function of this
/// snapshot.
#[derive(Debug, Clone, Default)]
pub struct OutputMap {
    pub glazewm: Option<GlazewmState>,
    pub date: Option<DateOutput>,
    pub cpu: Option<CpuOutput>,
    pub memory: Option<MemoryOutput>,
    pub battery: Option<BatteryOutput>,
    pub weather: Option<WeatherOutput>,
    pub network: Option<NetworkOutput>,
}

impl OutputMap {
    /// Fold one provider emission into the snapshot.
    pub fn apply(&mut self, event: ProviderEvent) {
        match event {
            ProviderEvent::Glazewm(state) => self.glazewm = Some(state),
            ProviderEvent::Date(output) => self.date = Some(output),
            ProviderEvent::Cpu(output) => self.cpu = Some(output),
            ProviderEvent::Memory(output) => self.memory = Some(output),
            ProviderEvent::Battery(output) => self.battery = Some(output),
            ProviderEvent::Weather(output) => self.weather = Some(output),
            ProviderEvent::Network(output) => self.network = Some(output),
        }
    }
}

/// The fixed provider subscription set.
///
/// Construction captures the static configuration; [`register`] spawns one
/// background task per provider on the context's runtime handle.
/// Registration is idempotent: calling it again aborts the previous tasks
/// before spawning replacements, so at most one task per provider is live.
///
/// [`register`]: ProviderGroup::register
pub struct ProviderGroup {
    port: Arc<dyn GlazewmPort>,
    config: Config,
    tasks: Vec<JoinHandle<()>>,
}

impl ProviderGroup {
    pub fn new(port: Arc<dyn GlazewmPort>, config: Config) -> Self {
        Self {
            port,
            config,
            tasks: Vec::new(),
        }
    }

    /// Spawn the provider tasks. Safe to call more than once.
    pub fn register(&mut self, ctx: &ProviderContext) {
        self.abort();

        self.tasks = vec![
            glazewm::spawn(ctx, Arc::clone(&self.port)),
            date::spawn(ctx, self.config.date.format.clone()),
            cpu::spawn(ctx),
            memory::spawn(ctx),
            network::spawn(ctx),
            battery::spawn(ctx),
            weather::spawn(ctx, self.config.weather.clone()),
        ];
    }

    fn abort(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for ProviderGroup {
    fn drop(&mut self) {
        self.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glazebar_proto::config::Config;

    use super::*;
    use crate::{
        event_bus::{EventBus, ProviderEvent},
        test_utils::MockGlazewmPort,
    };

    fn context() -> (ProviderContext, EventBus) {
        let bus = EventBus::new(std::num::NonZeroUsize::new(64).expect("capacity"));
        let ctx = ProviderContext::new(bus.sender(), tokio::runtime::Handle::current());

        (ctx, bus)
    }

    #[test]
    fn apply_replaces_slots_wholesale() {
        let mut map = OutputMap::default();
        assert!(map.cpu.is_none());

        map.apply(ProviderEvent::Cpu(CpuOutput { usage: 10.0 }));
        map.apply(ProviderEvent::Cpu(CpuOutput { usage: 99.0 }));

        assert_eq!(map.cpu.map(|c| c.usage), Some(99.0));
        assert!(map.glazewm.is_none());
    }

    #[tokio::test]
    async fn register_is_idempotent() {
        let (ctx, _bus) = context();
        let mock = Arc::new(MockGlazewmPort::default());
        let mut group = ProviderGroup::new(mock, Config::default());

        group.register(&ctx);
        assert_eq!(group.tasks.len(), 7);
        let first: Vec<_> = group.tasks.iter().map(|t| t.abort_handle()).collect();

        group.register(&ctx);
        assert_eq!(group.tasks.len(), 7);

        for _ in 0..100 {
            if first.iter().all(|handle| handle.is_finished()) {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        assert!(first.iter().all(|handle| handle.is_finished()));
    }
}
