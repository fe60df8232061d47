//! [`GlazewmPort`] implementation backed by the `glazewm` CLI.
//!
//! The CLI fronts the window manager's IPC: `query` subcommands print a JSON
//! envelope on stdout, `sub` streams one envelope per event line, and
//! `command` dispatches an action. Keeping the IPC behind the CLI means this
//! adapter owns no connection state of its own.

use std::{process::Stdio, sync::Arc};

use glazebar_proto::ports::glazewm::{
    GlazewmError, GlazewmEvent, GlazewmEventStream, GlazewmPort, GlazewmState, GlazewmStateFuture,
    GlazewmWorkspace, TilingDirection,
};
use itertools::Itertools;
use log::error;
use serde::{Deserialize, de::DeserializeOwned};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    process::Command,
    sync::mpsc,
};
use tokio_stream::wrappers::ReceiverStream;

const SUBSCRIBED_EVENTS: [&str; 6] = [
    "workspace_activated",
    "workspace_deactivated",
    "workspace_updated",
    "focus_changed",
    "focused_container_moved",
    "tiling_direction_changed",
];

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkspacesData {
    workspaces: Vec<WireWorkspace>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireWorkspace {
    name: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    has_focus: bool,
    #[serde(default)]
    is_displayed: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TilingDirectionData {
    tiling_direction: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEvent {
    event_type: String,
}

fn parse_envelope<T: DeserializeOwned>(
    operation: &'static str,
    payload: &str,
) -> Result<T, GlazewmError> {
    let envelope: Envelope<T> = serde_json::from_str(payload)
        .map_err(|e| GlazewmError::protocol(operation, e.to_string()))?;

    if !envelope.success {
        return Err(GlazewmError::message(
            operation,
            envelope
                .error
                .unwrap_or_else(|| "unspecified IPC failure".to_string()),
        ));
    }

    envelope
        .data
        .ok_or_else(|| GlazewmError::protocol(operation, "missing data payload"))
}

fn map_event(event_type: &str) -> Option<GlazewmEvent> {
    match event_type {
        "workspace_activated" => Some(GlazewmEvent::WorkspaceActivated),
        "workspace_deactivated" => Some(GlazewmEvent::WorkspaceDeactivated),
        "workspace_updated" => Some(GlazewmEvent::WorkspaceUpdated),
        "focus_changed" => Some(GlazewmEvent::FocusChanged),
        "focused_container_moved" => Some(GlazewmEvent::FocusedContainerMoved),
        "tiling_direction_changed" => Some(GlazewmEvent::TilingDirectionChanged),
        _ => None,
    }
}

fn build_state(
    workspaces: WorkspacesData,
    tiling: &TilingDirectionData,
) -> Result<GlazewmState, GlazewmError> {
    let tiling_direction = TilingDirection::parse(&tiling.tiling_direction).ok_or_else(|| {
        GlazewmError::protocol(
            "query_tiling_direction",
            format!("unknown tiling direction `{}`", tiling.tiling_direction),
        )
    })?;

    // Guard against duplicate names in the IPC answer.
    let workspaces = workspaces
        .workspaces
        .into_iter()
        .unique_by(|w| w.name.clone())
        .map(|w| GlazewmWorkspace {
            name: w.name,
            display_name: w.display_name,
            has_focus: w.has_focus,
            is_displayed: w.is_displayed,
        })
        .collect();

    Ok(GlazewmState {
        workspaces,
        tiling_direction,
    })
}

async fn query_raw(
    binary: &str,
    args: &[&str],
    operation: &'static str,
) -> Result<String, GlazewmError> {
    let output = Command::new(binary)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .await
        .map_err(|e| GlazewmError::backend(operation, e))?;

    if !output.status.success() {
        return Err(GlazewmError::message(
            operation,
            format!("`{binary}` exited with status {}", output.status),
        ));
    }

    String::from_utf8(output.stdout).map_err(|e| GlazewmError::protocol(operation, e.to_string()))
}

/// GlazeWM integration reached through its CLI binary.
#[derive(Debug, Clone)]
pub struct GlazewmClient {
    command: Arc<str>,
}

impl GlazewmClient {
    pub fn new(command: impl Into<Arc<str>>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl GlazewmPort for GlazewmClient {
    fn state_snapshot(&self) -> GlazewmStateFuture {
        let binary = Arc::clone(&self.command);

        Box::pin(async move {
            let raw = query_raw(&binary, &["query", "workspaces"], "query_workspaces").await?;
            let workspaces: WorkspacesData = parse_envelope("query_workspaces", raw.trim())?;

            let raw = query_raw(
                &binary,
                &["query", "tiling-direction"],
                "query_tiling_direction",
            )
            .await?;
            let tiling: TilingDirectionData = parse_envelope("query_tiling_direction", raw.trim())?;

            build_state(workspaces, &tiling)
        })
    }

    fn events(&self) -> Result<GlazewmEventStream, GlazewmError> {
        let operation = "subscribe_events";

        let mut child = Command::new(self.command.as_ref())
            .arg("sub")
            .arg("--events")
            .args(SUBSCRIBED_EVENTS)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| GlazewmError::backend(operation, e))?;

        let stdout = child.stdout.take().ok_or_else(|| {
            GlazewmError::message(operation, "event subscription exposes no stdout")
        })?;

        let (tx, rx) = mpsc::channel(16);

        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();

            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }

                        match parse_envelope::<WireEvent>(operation, line) {
                            Ok(event) => {
                                // Unknown event types are tolerated and skipped.
                                if let Some(event) = map_event(&event.event_type) {
                                    if tx.send(Ok(event)).await.is_err() {
                                        break;
                                    }
                                }
                            }
                            Err(err) => {
                                if tx.send(Err(err)).await.is_err() {
                                    break;
                                }
                            }
                        }
                    }
                    Ok(None) => {
                        let _ = tx
                            .send(Err(GlazewmError::message(
                                operation,
                                "event subscription closed",
                            )))
                            .await;
                        break;
                    }
                    Err(err) => {
                        let _ = tx.send(Err(GlazewmError::backend(operation, err))).await;
                        break;
                    }
                }
            }

            let _ = child.kill().await;
        });

        Ok(Box::pin(ReceiverStream::new(rx)))
    }

    fn run_command(&self, command: &str) -> Result<(), GlazewmError> {
        let binary = Arc::clone(&self.command);
        let command = command.to_owned();

        // Fire-and-forget: the view never observes command outcomes.
        tokio::spawn(async move {
            match Command::new(binary.as_ref())
                .arg("command")
                .arg(&command)
                .output()
                .await
            {
                Ok(output) if !output.status.success() => {
                    error!(
                        "wm command `{command}` exited with status {}",
                        output.status
                    );
                }
                Ok(output) => {
                    if !output.stderr.is_empty() {
                        error!(
                            "wm command `{command}` produced stderr: {}",
                            String::from_utf8_lossy(&output.stderr)
                        );
                    }
                }
                Err(err) => error!("failed to dispatch wm command `{command}`: {err}"),
            }
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_envelope_maps_camel_case_workspaces() {
        let payload = r#"{
            "data": {
                "workspaces": [
                    {"name": "1", "displayName": "web", "hasFocus": true, "isDisplayed": true},
                    {"name": "2", "hasFocus": false, "isDisplayed": false}
                ]
            },
            "error": null,
            "messageType": "client_response",
            "success": true
        }"#;

        let data: WorkspacesData =
            parse_envelope("query_workspaces", payload).expect("envelope parses");

        assert_eq!(data.workspaces.len(), 2);
        assert_eq!(data.workspaces[0].display_name.as_deref(), Some("web"));
        assert!(data.workspaces[0].has_focus);
        assert!(data.workspaces[1].display_name.is_none());
        assert!(!data.workspaces[1].is_displayed);
    }

    #[test]
    fn parse_envelope_surfaces_ipc_failure() {
        let payload = r#"{"data": null, "error": "no focused workspace", "success": false}"#;

        let err = parse_envelope::<WorkspacesData>("query_workspaces", payload)
            .expect_err("failure envelope rejected");

        assert!(err.to_string().contains("no focused workspace"));
    }

    #[test]
    fn parse_envelope_rejects_malformed_payload() {
        assert!(parse_envelope::<WorkspacesData>("query_workspaces", "not json").is_err());
    }

    #[test]
    fn build_state_parses_direction_and_dedupes() {
        let workspaces = WorkspacesData {
            workspaces: vec![
                WireWorkspace {
                    name: "1".into(),
                    display_name: None,
                    has_focus: true,
                    is_displayed: true,
                },
                WireWorkspace {
                    name: "1".into(),
                    display_name: Some("dup".into()),
                    has_focus: false,
                    is_displayed: false,
                },
            ],
        };
        let tiling = TilingDirectionData {
            tiling_direction: "vertical".into(),
        };

        let state = build_state(workspaces, &tiling).expect("state builds");

        assert_eq!(state.workspaces.len(), 1);
        assert_eq!(state.tiling_direction, TilingDirection::Vertical);
    }

    #[test]
    fn build_state_rejects_unknown_direction() {
        let workspaces = WorkspacesData { workspaces: vec![] };
        let tiling = TilingDirectionData {
            tiling_direction: "sideways".into(),
        };

        assert!(build_state(workspaces, &tiling).is_err());
    }

    #[test]
    fn map_event_skips_unknown_types() {
        assert_eq!(
            map_event("workspace_activated"),
            Some(GlazewmEvent::WorkspaceActivated)
        );
        assert_eq!(
            map_event("tiling_direction_changed"),
            Some(GlazewmEvent::TilingDirectionChanged)
        );
        assert_eq!(map_event("binding_modes_changed"), None);
    }
}
