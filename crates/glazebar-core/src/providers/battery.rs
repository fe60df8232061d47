use futures::StreamExt;
use log::{error, warn};
use masterror::{AppError, AppResult};
use tokio::task::JoinHandle;
use zbus::proxy;

use crate::{
    ProviderEventSender, components::icons::Icons, context::ProviderContext,
    event_bus::ProviderEvent,
};

/// Battery state snapshot for the right-region readout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryOutput {
    /// Charge percentage in `0.0..=100.0`.
    pub charge_percent: f32,
    pub is_charging: bool,
}

/// Bracket icon for the given charge percentage.
///
/// Boundary values land in the lower bracket: 90 renders three quarters,
/// 70 half, 40 a quarter and 20 empty.
pub fn charge_icon(charge_percent: f32) -> Icons {
    if charge_percent > 90.0 {
        Icons::Battery4
    } else if charge_percent > 70.0 {
        Icons::Battery3
    } else if charge_percent > 40.0 {
        Icons::Battery2
    } else if charge_percent > 20.0 {
        Icons::Battery1
    } else {
        Icons::Battery0
    }
}

// UPower BatteryState codes: 1 charging, 2 discharging, 4 fully charged.
fn is_charging_state(state: u32) -> bool {
    state == 1
}

#[proxy(
    interface = "org.freedesktop.UPower.Device",
    default_service = "org.freedesktop.UPower",
    default_path = "/org/freedesktop/UPower/devices/DisplayDevice"
)]
trait Device {
    #[zbus(property)]
    fn percentage(&self) -> zbus::Result<f64>;

    #[zbus(property)]
    fn state(&self) -> zbus::Result<u32>;

    #[zbus(property)]
    fn is_present(&self) -> zbus::Result<bool>;
}

fn emit(sender: &ProviderEventSender<BatteryOutput>, charge_percent: f32, state: u32) {
    let output = BatteryOutput {
        charge_percent,
        is_charging: is_charging_state(state),
    };

    if let Err(err) = sender.try_send(output) {
        error!("failed to publish battery update: {err}");
    }
}

async fn watch(sender: ProviderEventSender<BatteryOutput>) -> AppResult<()> {
    let conn = zbus::Connection::system()
        .await
        .map_err(|e| AppError::internal(format!("Failed to connect to system bus: {e}")))?;

    let device = DeviceProxy::new(&conn)
        .await
        .map_err(|e| AppError::internal(format!("Failed to create UPower device proxy: {e}")))?;

    if !device.is_present().await.unwrap_or(false) {
        warn!("no battery reported by UPower, battery readout stays hidden");
        return Ok(());
    }

    let mut charge_percent = device
        .percentage()
        .await
        .map_err(|e| AppError::internal(format!("Failed to read battery percentage: {e}")))?
        as f32;
    let mut state = device
        .state()
        .await
        .map_err(|e| AppError::internal(format!("Failed to read battery state: {e}")))?;

    emit(&sender, charge_percent, state);

    let mut percentage_changes = device.receive_percentage_changed().await;
    let mut state_changes = device.receive_state_changed().await;

    loop {
        tokio::select! {
            Some(change) = percentage_changes.next() => {
                if let Ok(value) = change.get().await {
                    charge_percent = value as f32;
                }
            }
            Some(change) = state_changes.next() => {
                if let Ok(value) = change.get().await {
                    state = value;
                }
            }
            else => break,
        }

        emit(&sender, charge_percent, state);
    }

    Ok(())
}

pub(crate) fn spawn(ctx: &ProviderContext) -> JoinHandle<()> {
    let sender = ctx.provider_sender(ProviderEvent::Battery);

    ctx.runtime_handle().spawn(async move {
        if let Err(err) = watch(sender).await {
            warn!("battery provider unavailable: {err}");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charge_icon_brackets() {
        assert_eq!(charge_icon(100.0), Icons::Battery4);
        assert_eq!(charge_icon(91.0), Icons::Battery4);
        assert_eq!(charge_icon(89.0), Icons::Battery3);
        assert_eq!(charge_icon(71.0), Icons::Battery3);
        assert_eq!(charge_icon(41.0), Icons::Battery2);
        assert_eq!(charge_icon(21.0), Icons::Battery1);
        assert_eq!(charge_icon(10.0), Icons::Battery0);
        assert_eq!(charge_icon(0.0), Icons::Battery0);
    }

    #[test]
    fn charge_icon_boundaries_land_in_lower_bracket() {
        assert_eq!(charge_icon(90.0), Icons::Battery3);
        assert_eq!(charge_icon(70.0), Icons::Battery2);
        assert_eq!(charge_icon(40.0), Icons::Battery1);
        assert_eq!(charge_icon(20.0), Icons::Battery0);
    }

    #[test]
    fn only_charging_state_counts_as_charging() {
        assert!(is_charging_state(1));
        assert!(!is_charging_state(2));
        assert!(!is_charging_state(4));
    }
}
