use std::sync::Mutex;

use glazebar_proto::ports::glazewm::{
    GlazewmError, GlazewmEvent, GlazewmEventStream, GlazewmPort, GlazewmState, GlazewmStateFuture,
    GlazewmWorkspace, TilingDirection,
};

/// In-memory [`GlazewmPort`] used by unit tests: serves a canned state,
/// yields no events and records every dispatched command.
#[derive(Debug)]
pub struct MockGlazewmPort {
    pub state: Mutex<GlazewmState>,
    commands: Mutex<Vec<String>>,
}

impl Default for MockGlazewmPort {
    fn default() -> Self {
        Self {
            state: Mutex::new(GlazewmState {
                workspaces: vec![GlazewmWorkspace {
                    name: "1".into(),
                    display_name: None,
                    has_focus: true,
                    is_displayed: true,
                }],
                tiling_direction: TilingDirection::Horizontal,
            }),
            commands: Mutex::new(Vec::new()),
        }
    }
}

impl MockGlazewmPort {
    /// Commands dispatched through [`GlazewmPort::run_command`] so far.
    pub fn run_command_calls(&self) -> Vec<String> {
        self.commands.lock().expect("commands lock").clone()
    }
}

impl GlazewmPort for MockGlazewmPort {
    fn state_snapshot(&self) -> GlazewmStateFuture {
        let state = self.state.lock().expect("state lock").clone();

        Box::pin(async move { Ok(state) })
    }

    fn events(&self) -> Result<GlazewmEventStream, GlazewmError> {
        Ok(Box::pin(
            tokio_stream::empty::<Result<GlazewmEvent, GlazewmError>>(),
        ))
    }

    fn run_command(&self, command: &str) -> Result<(), GlazewmError> {
        self.commands
            .lock()
            .expect("commands lock")
            .push(command.to_owned());

        Ok(())
    }
}
