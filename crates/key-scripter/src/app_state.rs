use std::time::Instant;

use uuid::Uuid;

/// What the application is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Neither recording nor playing.
    Idle,
    /// Capturing keyboard input.
    Recording {
        /// Unique session ID for log correlation.
        session_id: Uuid,
        /// When recording started.
        started_at: Instant,
    },
    /// Replaying a macro into the foreground window.
    Playing {
        /// Unique session ID for log correlation.
        session_id: Uuid,
    },
}

impl AppState {
    /// Whether no session is running.
    pub fn is_idle(&self) -> bool {
        matches!(self, AppState::Idle)
    }
}
