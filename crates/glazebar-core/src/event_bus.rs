use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use glazebar_proto::ports::glazewm::GlazewmState;
use masterror::AppError;

use crate::providers::{
    battery::BatteryOutput, cpu::CpuOutput, date::DateOutput, memory::MemoryOutput,
    network::NetworkOutput, weather::WeatherOutput,
};

#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum BusEvent {
    Redraw,
    Provider(ProviderEvent),
}

impl BusEvent {
    fn is_coalescable_with(&self, other: &Self) -> bool {
        matches!((self, other), (BusEvent::Redraw, BusEvent::Redraw))
    }
}

/// One emission from a provider task. Each variant carries the complete new
/// output for its slot; the consumer replaces the slot wholesale.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum ProviderEvent {
    Glazewm(GlazewmState),
    Date(DateOutput),
    Cpu(CpuOutput),
    Memory(MemoryOutput),
    Battery(BatteryOutput),
    Weather(WeatherOutput),
    Network(NetworkOutput),
}

#[derive(Debug)]
struct EventBusInner {
    queue: Mutex<VecDeque<BusEvent>>,
    capacity: usize,
}

impl EventBusInner {
    fn new(capacity: NonZeroUsize) -> Self {
        Self {
            queue: Mutex::new(VecDeque::with_capacity(capacity.get())),
            capacity: capacity.get(),
        }
    }

    fn push(&self, event: BusEvent) -> Result<(), EventBusError> {
        let mut queue = self.queue.lock().map_err(|_| EventBusError::Poisoned)?;

        if queue.len() >= self.capacity {
            return Err(EventBusError::QueueFull {
                capacity: self.capacity,
            });
        }

        if let Some(last) = queue.back() {
            if event.is_coalescable_with(last) {
                return Ok(());
            }
        }

        queue.push_back(event);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum EventBusError {
    QueueFull { capacity: usize },
    Poisoned,
}

impl std::fmt::Display for EventBusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QueueFull { capacity } => {
                write!(f, "Event queue is full (capacity: {})", capacity)
            }
            Self::Poisoned => write!(f, "Event queue state is poisoned"),
        }
    }
}

impl std::error::Error for EventBusError {}

impl From<EventBusError> for AppError {
    fn from(err: EventBusError) -> Self {
        AppError::internal(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct EventBus {
    inner: Arc<EventBusInner>,
}

impl EventBus {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            inner: Arc::new(EventBusInner::new(capacity)),
        }
    }

    pub fn sender(&self) -> EventSender {
        EventSender {
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn receiver(&self) -> EventReceiver {
        EventReceiver {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventSender {
    inner: Arc<EventBusInner>,
}

impl EventSender {
    pub fn try_send(&self, event: BusEvent) -> Result<(), EventBusError> {
        self.inner.push(event)
    }
}

#[derive(Debug)]
pub struct EventReceiver {
    inner: Arc<EventBusInner>,
}

impl EventReceiver {
    pub fn try_recv(&mut self) -> Result<Option<BusEvent>, EventBusError> {
        let mut queue = self
            .inner
            .queue
            .lock()
            .map_err(|_| EventBusError::Poisoned)?;

        Ok(queue.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::providers::cpu::CpuOutput;

    fn bus(capacity: usize) -> EventBus {
        EventBus::new(NonZeroUsize::new(capacity).expect("capacity"))
    }

    #[test]
    fn capacity_bound_is_enforced() {
        let bus = bus(1);
        let sender = bus.sender();

        sender
            .try_send(BusEvent::Provider(ProviderEvent::Cpu(CpuOutput {
                usage: 10.0,
            })))
            .expect("first event fits");

        let err = sender
            .try_send(BusEvent::Provider(ProviderEvent::Cpu(CpuOutput {
                usage: 20.0,
            })))
            .expect_err("second event exceeds capacity");

        assert!(matches!(err, EventBusError::QueueFull { capacity: 1 }));
    }

    #[test]
    fn adjacent_redraws_coalesce() {
        let bus = bus(4);
        let sender = bus.sender();
        let mut receiver = bus.receiver();

        sender.try_send(BusEvent::Redraw).expect("queued");
        sender.try_send(BusEvent::Redraw).expect("coalesced");

        assert!(matches!(
            receiver.try_recv().expect("receive"),
            Some(BusEvent::Redraw)
        ));
        assert!(receiver.try_recv().expect("empty").is_none());
    }

    #[test]
    fn drain_preserves_fifo_order() {
        let bus = bus(4);
        let sender = bus.sender();
        let mut receiver = bus.receiver();

        sender
            .try_send(BusEvent::Provider(ProviderEvent::Cpu(CpuOutput {
                usage: 1.0,
            })))
            .expect("queued");
        sender.try_send(BusEvent::Redraw).expect("queued");

        assert!(matches!(
            receiver.try_recv().expect("receive"),
            Some(BusEvent::Provider(ProviderEvent::Cpu(_)))
        ));
        assert!(matches!(
            receiver.try_recv().expect("receive"),
            Some(BusEvent::Redraw)
        ));
    }
}
