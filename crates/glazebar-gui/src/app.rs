use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use glazebar_core::{
    HEIGHT,
    event_bus::{BusEvent, EventReceiver, ProviderEvent},
    providers::OutputMap,
};
use glazebar_proto::{config::Config, ports::glazewm::GlazewmPort};
use iced::{
    Alignment, Element, Length, Subscription, Task, Theme, time,
    widget::{Row, container, row},
};
use log::error;

use crate::views;

pub struct App {
    port: Arc<dyn GlazewmPort>,
    bus_receiver: Arc<Mutex<EventReceiver>>,
    micro_ticker: MicroTicker,
    pub config: Config,
    pub snapshot: OutputMap,
}

#[derive(Debug, Clone)]
pub enum Message {
    None,
    MicroTick,
    BusFlushed(BusFlushOutcome),
    Provider(ProviderEvent),
    RunCommand(String),
}

#[derive(Debug, Clone)]
pub struct BusFlushOutcome {
    events: Vec<BusEvent>,
    had_error: bool,
}

impl BusFlushOutcome {
    fn with_events(events: Vec<BusEvent>, had_error: bool) -> Self {
        Self { events, had_error }
    }

    fn had_error(&self) -> bool {
        self.had_error
    }

    fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn into_events(self) -> Vec<BusEvent> {
        self.events
    }
}

/// Adaptive cadence for draining the event bus: fast while events keep
/// arriving, slow after a few idle drains.
#[derive(Debug, Clone)]
struct MicroTicker {
    fast_interval: Duration,
    slow_interval: Duration,
    idle_threshold: u8,
    idle_ticks: u8,
    current_interval: Duration,
}

impl MicroTicker {
    fn new(fast_interval: Duration, slow_interval: Duration, idle_threshold: u8) -> Self {
        Self {
            fast_interval,
            slow_interval,
            idle_threshold,
            idle_ticks: 0,
            current_interval: fast_interval,
        }
    }

    fn interval(&self) -> Duration {
        self.current_interval
    }

    fn record_activity(&mut self) {
        self.idle_ticks = 0;
        self.current_interval = self.fast_interval;
    }

    fn record_idle(&mut self) {
        if self.idle_ticks < self.idle_threshold {
            self.idle_ticks += 1;
        }

        if self.idle_ticks >= self.idle_threshold {
            self.current_interval = self.slow_interval;
        }
    }
}

impl Default for MicroTicker {
    fn default() -> Self {
        Self::new(Duration::from_millis(50), Duration::from_millis(250), 3)
    }
}

impl App {
    pub fn new(
        (config, port, bus_receiver): (Config, Arc<dyn GlazewmPort>, EventReceiver),
    ) -> impl FnOnce() -> (Self, Task<Message>) {
        move || {
            (
                App {
                    port,
                    bus_receiver: Arc::new(Mutex::new(bus_receiver)),
                    micro_ticker: MicroTicker::default(),
                    config,
                    snapshot: OutputMap::default(),
                },
                Task::none(),
            )
        }
    }

    pub fn title(&self) -> String {
        String::from("glazebar")
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::None => Task::none(),
            Message::MicroTick => Task::perform(
                drain_bus(Arc::clone(&self.bus_receiver)),
                Message::BusFlushed,
            ),
            Message::BusFlushed(outcome) => {
                if outcome.had_error() {
                    error!("failed to drain event bus, keeping fast cadence");
                    self.micro_ticker.record_activity();
                }

                if outcome.is_empty() {
                    if !outcome.had_error() {
                        self.micro_ticker.record_idle();
                    }

                    Task::none()
                } else {
                    if !outcome.had_error() {
                        self.micro_ticker.record_activity();
                    }

                    let tasks: Vec<_> = outcome
                        .into_events()
                        .into_iter()
                        .map(|event| self.update(message_from_bus_event(event)))
                        .collect();

                    Task::batch(tasks)
                }
            }
            Message::Provider(event) => {
                self.snapshot.apply(event);

                Task::none()
            }
            Message::RunCommand(command) => {
                if let Err(err) = self.port.run_command(&command) {
                    error!("failed to dispatch wm command: {err}");
                }

                Task::none()
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let left: Element<_> = views::workspaces::workspace_buttons(self.snapshot.glazewm.as_ref())
            .unwrap_or_else(|| Row::new().into());

        let center = views::clock::render(self.snapshot.date.as_ref());

        let right = Row::new()
            .push_maybe(views::workspaces::tiling_toggle(
                self.snapshot.glazewm.as_ref(),
            ))
            .push_maybe(views::system::memory_readout(self.snapshot.memory.as_ref()))
            .push_maybe(views::system::cpu_readout(
                self.snapshot.cpu.as_ref(),
                &self.config.cpu,
            ))
            .push_maybe(views::battery::render(self.snapshot.battery.as_ref()))
            .push_maybe(views::weather::render(self.snapshot.weather.as_ref()))
            .spacing(8)
            .align_y(Alignment::Center);

        row![
            container(left)
                .width(Length::Fill)
                .align_x(Alignment::Start),
            container(center).width(Length::Shrink),
            container(right)
                .width(Length::Fill)
                .align_x(Alignment::End),
        ]
        .height(HEIGHT as f32)
        .align_y(Alignment::Center)
        .spacing(4)
        .padding([0, 8])
        .into()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        time::every(self.micro_ticker.interval()).map(|_| Message::MicroTick)
    }
}

fn message_from_bus_event(event: BusEvent) -> Message {
    match event {
        BusEvent::Redraw => Message::None,
        BusEvent::Provider(provider) => Message::Provider(provider),
        _ => Message::None,
    }
}

async fn drain_bus(receiver: Arc<Mutex<EventReceiver>>) -> BusFlushOutcome {
    let mut guard = match receiver.lock() {
        Ok(guard) => guard,
        Err(err) => {
            error!("event bus receiver poisoned: {err}");
            return BusFlushOutcome::with_events(Vec::new(), true);
        }
    };

    let mut events = Vec::new();
    let mut had_error = false;

    loop {
        match guard.try_recv() {
            Ok(Some(event)) => events.push(event),
            Ok(None) => break,
            Err(err) => {
                error!("failed to read event bus payload: {err}");
                had_error = true;
                break;
            }
        }
    }

    BusFlushOutcome::with_events(events, had_error)
}

#[cfg(test)]
mod tests {
    use glazebar_core::{
        event_bus::EventBus,
        providers::glazewm::focus_workspace_command,
        test_utils::MockGlazewmPort,
    };
    use glazebar_proto::ports::glazewm::{GlazewmState, TilingDirection};

    use super::*;

    fn test_app(mock: Arc<MockGlazewmPort>) -> App {
        let bus = EventBus::new(std::num::NonZeroUsize::new(16).expect("capacity"));

        App::new((Config::default(), mock, bus.receiver()))()
            .0
    }

    #[test]
    fn workspace_press_dispatches_exactly_one_focus_command() {
        let mock = Arc::new(MockGlazewmPort::default());
        let mut app = test_app(Arc::clone(&mock));

        let _ = app.update(Message::RunCommand(focus_workspace_command("2")));

        assert_eq!(mock.run_command_calls(), vec!["focus --workspace 2"]);
    }

    #[test]
    fn provider_event_replaces_snapshot_slot() {
        let mock = Arc::new(MockGlazewmPort::default());
        let mut app = test_app(mock);

        assert!(app.snapshot.glazewm.is_none());

        let state = GlazewmState {
            workspaces: vec![],
            tiling_direction: TilingDirection::Vertical,
        };
        let _ = app.update(Message::Provider(ProviderEvent::Glazewm(state.clone())));

        assert_eq!(app.snapshot.glazewm, Some(state));
    }

    #[test]
    fn micro_ticker_slows_after_idle_drains() {
        let mut ticker = MicroTicker::default();
        let fast = ticker.interval();

        ticker.record_idle();
        ticker.record_idle();
        assert_eq!(ticker.interval(), fast);

        ticker.record_idle();
        assert!(ticker.interval() > fast);

        ticker.record_activity();
        assert_eq!(ticker.interval(), fast);
    }
}
