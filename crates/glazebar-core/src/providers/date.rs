use std::time::Duration;

use chrono::Local;
use log::error;
use tokio::{
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};

use crate::{context::ProviderContext, event_bus::ProviderEvent};

/// Formatted date/time snapshot for the center readout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateOutput {
    pub formatted: String,
}

/// Determine the tick cadence from the format string: formats that display
/// seconds refresh every second, everything else every five.
pub(crate) fn determine_interval(format: &str) -> Duration {
    const SECOND_SPECIFIERS: [&str; 6] = ["%S", "%T", "%X", "%r", "%:z", "%s"];

    if SECOND_SPECIFIERS
        .iter()
        .any(|specifier| format.contains(specifier))
    {
        Duration::from_secs(1)
    } else {
        Duration::from_secs(5)
    }
}

fn format_now(format: &str) -> DateOutput {
    DateOutput {
        formatted: Local::now().format(format).to_string(),
    }
}

pub(crate) fn spawn(ctx: &ProviderContext, format: String) -> JoinHandle<()> {
    let sender = ctx.provider_sender(ProviderEvent::Date);
    let tick = determine_interval(&format);

    ctx.runtime_handle().spawn(async move {
        let mut ticker = interval(tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            if let Err(err) = sender.try_send(format_now(&format)) {
                error!("failed to publish date update: {err}");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use tokio::{task::yield_now, time::advance};

    use super::*;
    use crate::event_bus::{BusEvent, EventBus};

    #[test]
    fn determine_interval_with_seconds() {
        assert_eq!(determine_interval("%a %-d %b %T"), Duration::from_secs(1));
        assert_eq!(determine_interval("%H:%M:%S"), Duration::from_secs(1));
    }

    #[test]
    fn determine_interval_without_seconds() {
        assert_eq!(determine_interval("%H:%M"), Duration::from_secs(5));
    }

    #[test]
    fn format_now_applies_format() {
        let output = format_now("%H:%M");

        assert_eq!(output.formatted.len(), 5);
        assert!(output.formatted.contains(':'));
    }

    #[tokio::test(start_paused = true)]
    async fn emits_on_every_tick() {
        let bus = EventBus::new(NonZeroUsize::new(16).expect("capacity"));
        let ctx = ProviderContext::new(bus.sender(), tokio::runtime::Handle::current());
        let mut receiver = bus.receiver();

        let task = spawn(&ctx, String::from("%H:%M"));
        yield_now().await;

        // The first interval tick fires immediately.
        assert!(matches!(
            receiver.try_recv().expect("initial emission"),
            Some(BusEvent::Provider(ProviderEvent::Date(_)))
        ));

        advance(Duration::from_secs(5)).await;
        yield_now().await;

        assert!(matches!(
            receiver.try_recv().expect("tick emission"),
            Some(BusEvent::Provider(ProviderEvent::Date(_)))
        ));

        task.abort();
    }
}
