use std::sync::Arc;

use tokio::runtime::Handle;

use crate::event_bus::{BusEvent, EventBusError, EventSender, ProviderEvent};

/// Shared utilities handed to provider tasks when they are registered.
///
/// The context owns an [`EventSender`] used to push [`BusEvent`] values into
/// the UI queue and a [`Handle`] tied to the runtime powering background
/// work. Tasks spawned through the handle are aborted on re-registration, so
/// they must tolerate being dropped at any await point.
#[derive(Debug, Clone)]
pub struct ProviderContext {
    event_sender: EventSender,
    runtime_handle: Handle,
}

impl ProviderContext {
    /// Create a new context bound to the provided event sender and runtime
    /// handle.
    ///
    /// # Examples
    ///
    /// ```
    /// # use glazebar_core::{event_bus::EventBus, context::ProviderContext};
    /// # use std::num::NonZeroUsize;
    /// # let runtime = tokio::runtime::Runtime::new().expect("runtime");
    /// let bus = EventBus::new(NonZeroUsize::new(4).expect("capacity"));
    /// let context = ProviderContext::new(bus.sender(), runtime.handle().clone());
    /// # drop(context);
    /// ```
    pub fn new(event_sender: EventSender, runtime_handle: Handle) -> Self {
        Self {
            event_sender,
            runtime_handle,
        }
    }

    /// Access the runtime handle used for spawning background tasks.
    pub fn runtime_handle(&self) -> &Handle {
        &self.runtime_handle
    }

    /// Request a redraw of the bar surface.
    ///
    /// Enqueues a [`BusEvent::Redraw`] if the bus has remaining capacity,
    /// otherwise returns [`EventBusError::QueueFull`].
    pub fn request_redraw(&self) -> Result<(), EventBusError> {
        self.event_sender.try_send(BusEvent::Redraw)
    }

    fn publish_provider_event(&self, event: ProviderEvent) -> Result<(), EventBusError> {
        self.event_sender.try_send(BusEvent::Provider(event))
    }

    /// Build a type-safe provider event sender from the provided conversion
    /// function.
    ///
    /// # Examples
    ///
    /// ```
    /// # use glazebar_core::{event_bus::EventBus, context::ProviderContext};
    /// # use glazebar_core::event_bus::ProviderEvent;
    /// # use glazebar_core::providers::cpu::CpuOutput;
    /// # use std::num::NonZeroUsize;
    /// # let runtime = tokio::runtime::Runtime::new().expect("runtime");
    /// let bus = EventBus::new(NonZeroUsize::new(2).expect("capacity"));
    /// let context = ProviderContext::new(bus.sender(), runtime.handle().clone());
    /// let sender = context.provider_sender(ProviderEvent::Cpu);
    /// sender.try_send(CpuOutput { usage: 12.0 }).expect("queued");
    /// ```
    pub fn provider_sender<T, F>(&self, convert: F) -> ProviderEventSender<T>
    where
        T: Send + 'static,
        F: Fn(T) -> ProviderEvent + Send + Sync + 'static,
    {
        ProviderEventSender {
            context: self.clone(),
            convert: Arc::new(convert),
        }
    }
}

/// Strongly-typed wrapper around the shared event sender, converting a
/// provider payload into a [`ProviderEvent`] before enqueueing it.
#[derive(Clone)]
pub struct ProviderEventSender<T> {
    context: ProviderContext,
    convert: Arc<dyn Fn(T) -> ProviderEvent + Send + Sync>,
}

impl<T> ProviderEventSender<T>
where
    T: Send + 'static,
{
    /// Convert the payload into a [`ProviderEvent`] and enqueue it on the
    /// bus, propagating [`EventBusError`] when the queue is full.
    pub fn try_send(&self, payload: T) -> Result<(), EventBusError> {
        let event = (self.convert)(payload);
        self.context.publish_provider_event(event)
    }
}
