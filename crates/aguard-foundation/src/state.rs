use crate::error::AppError;
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Stopping,
}

/// Validated session lifecycle. Stop commands on an idle session are a
/// no-op at the caller, not an invalid transition; everything else must
/// follow Idle -> Running -> Stopping -> Idle.
#[derive(Clone)]
pub struct StateManager {
    state: Arc<RwLock<SessionState>>,
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl StateManager {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::Idle)),
        }
    }

    pub fn transition(&self, new_state: SessionState) -> Result<(), AppError> {
        let mut current = self.state.write();

        let valid = matches!(
            (&*current, &new_state),
            (SessionState::Idle, SessionState::Running)
                | (SessionState::Running, SessionState::Stopping)
                | (SessionState::Stopping, SessionState::Idle)
        );

        if !valid {
            return Err(AppError::InvalidState(format!(
                "{:?} -> {:?}",
                *current, new_state
            )));
        }

        tracing::info!("Session state: {:?} -> {:?}", *current, new_state);
        *current = new_state;
        Ok(())
    }

    pub fn current(&self) -> SessionState {
        *self.state.read()
    }

    pub fn is_running(&self) -> bool {
        self.current() == SessionState::Running
    }
}
