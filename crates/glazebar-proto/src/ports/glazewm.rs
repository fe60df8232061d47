use std::{error::Error, fmt, future::Future, pin::Pin};

use tokio_stream::Stream;

/// Stream type alias used for GlazeWM event subscriptions.
pub type GlazewmEventStream =
    Pin<Box<dyn Stream<Item = Result<GlazewmEvent, GlazewmError>> + Send + 'static>>;

/// Future type alias returned by state queries.
pub type GlazewmStateFuture =
    Pin<Box<dyn Future<Output = Result<GlazewmState, GlazewmError>> + Send + 'static>>;

/// Error type returned by [`GlazewmPort`] operations.
///
/// Each variant stores the logical operation name to aid diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum GlazewmError {
    /// The backend failed to execute the requested operation.
    #[error("operation `{operation}` failed: {source}")]
    Backend {
        /// Logical operation identifier.
        operation: &'static str,
        /// Source error reported by the backend implementation.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The backend answered with a payload the port could not interpret.
    #[error("operation `{operation}` returned an invalid payload: {message}")]
    Protocol {
        /// Logical operation identifier.
        operation: &'static str,
        /// Human readable description of the protocol violation.
        message: String,
    },
    /// The operation failed with an explanatory message.
    #[error("operation `{operation}` failed: {message}")]
    Message {
        /// Logical operation identifier.
        operation: &'static str,
        /// Human readable error description.
        message: String,
    },
}

impl GlazewmError {
    /// Helper for constructing [`GlazewmError::Backend`].
    pub fn backend(
        operation: &'static str,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        Self::Backend {
            operation,
            source: Box::new(source),
        }
    }

    /// Helper for constructing [`GlazewmError::Protocol`].
    pub fn protocol(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Protocol {
            operation,
            message: message.into(),
        }
    }

    /// Helper for constructing [`GlazewmError::Message`].
    pub fn message(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Message {
            operation,
            message: message.into(),
        }
    }
}

/// Metadata describing a GlazeWM workspace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlazewmWorkspace {
    /// Workspace name, also used as the focus-command parameter.
    pub name: String,
    /// Optional human readable label configured in GlazeWM.
    pub display_name: Option<String>,
    /// Whether the workspace currently holds keyboard focus.
    pub has_focus: bool,
    /// Whether the workspace is visible on some monitor.
    pub is_displayed: bool,
}

impl GlazewmWorkspace {
    /// Label shown on the workspace button: the display name when
    /// configured, the raw name otherwise.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// Direction in which new tiling windows are inserted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TilingDirection {
    Horizontal,
    Vertical,
}

impl TilingDirection {
    /// Parse the wire representation used by the GlazeWM IPC.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "horizontal" => Some(Self::Horizontal),
            "vertical" => Some(Self::Vertical),
            _ => None,
        }
    }
}

impl fmt::Display for TilingDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => f.write_str("horizontal"),
            Self::Vertical => f.write_str("vertical"),
        }
    }
}

/// Immutable snapshot of the window-manager state consumed by the bar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlazewmState {
    /// Known workspaces in display order.
    pub workspaces: Vec<GlazewmWorkspace>,
    /// Current tiling direction of the focused container.
    pub tiling_direction: TilingDirection,
}

/// Window-manager events the bar reacts to. Every variant triggers a fresh
/// state query, so the payloads carried on the wire are not surfaced here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlazewmEvent {
    WorkspaceActivated,
    WorkspaceDeactivated,
    WorkspaceUpdated,
    FocusChanged,
    FocusedContainerMoved,
    TilingDirectionChanged,
}

/// Abstraction over the GlazeWM integration required by the provider layer.
///
/// Backends surface failures as [`GlazewmError`]; all methods must be
/// thread-safe. `run_command` is fire-and-forget: implementations dispatch
/// the command in the background and only report dispatch failures, never
/// the command outcome.
pub trait GlazewmPort: Send + Sync {
    /// Query the current workspace and tiling-direction state.
    fn state_snapshot(&self) -> GlazewmStateFuture;

    /// Subscribe to window-manager events.
    fn events(&self) -> Result<GlazewmEventStream, GlazewmError>;

    /// Dispatch a WM command string such as `focus --workspace 2`.
    fn run_command(&self, command: &str) -> Result<(), GlazewmError>;
}
