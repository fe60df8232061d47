use std::{sync::Arc, time::Duration};

use glazebar_proto::ports::glazewm::{GlazewmPort, GlazewmState, TilingDirection};
use log::error;
use tokio::{task::JoinHandle, time::sleep};
use tokio_stream::StreamExt;

use crate::{
    ProviderEventSender, components::icons::Icons, context::ProviderContext,
    event_bus::ProviderEvent,
};

const EVENT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Command dispatched when a workspace button is pressed.
pub fn focus_workspace_command(name: &str) -> String {
    format!("focus --workspace {name}")
}

/// Command dispatched by the tiling-direction toggle button.
pub const TOGGLE_TILING_DIRECTION: &str = "toggle-tiling-direction";

/// Icon for the tiling-direction toggle.
pub fn direction_icon(direction: TilingDirection) -> Icons {
    match direction {
        TilingDirection::Horizontal => Icons::SwapHorizontal,
        TilingDirection::Vertical => Icons::SwapVertical,
    }
}

fn publish(sender: &ProviderEventSender<GlazewmState>, state: GlazewmState) {
    if let Err(err) = sender.try_send(state) {
        error!("failed to publish window manager state: {err}");
    }
}

pub(crate) fn spawn(ctx: &ProviderContext, port: Arc<dyn GlazewmPort>) -> JoinHandle<()> {
    let sender = ctx.provider_sender(ProviderEvent::Glazewm);

    ctx.runtime_handle().spawn(async move {
        loop {
            match port.state_snapshot().await {
                Ok(state) => publish(&sender, state),
                Err(err) => error!("failed to query window manager state: {err}"),
            }

            match port.events() {
                Ok(mut events) => {
                    // Every event invalidates the snapshot; re-query rather
                    // than patching it from event payloads.
                    while let Some(event) = events.next().await {
                        match event {
                            Ok(_) => match port.state_snapshot().await {
                                Ok(state) => publish(&sender, state),
                                Err(err) => {
                                    error!("failed to query window manager state: {err}")
                                }
                            },
                            Err(err) => {
                                error!("window manager event stream failed: {err}");
                                break;
                            }
                        }
                    }
                }
                Err(err) => error!("failed to subscribe to window manager events: {err}"),
            }

            sleep(EVENT_RETRY_DELAY).await;
        }
    })
}
