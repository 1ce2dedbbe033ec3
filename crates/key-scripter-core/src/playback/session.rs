use crate::playback::TargetWindow;

use tokio_util::sync::CancellationToken;

/// Binding between the engine and one target window.
///
/// Created by `connect`; each `play` gives it a fresh cancellation token and
/// rewinds the instruction index.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    target: TargetWindow,
    token: CancellationToken,
    index: usize,
}

impl PlaybackSession {
    pub(crate) fn new(target: TargetWindow) -> Self {
        Self {
            target,
            token: CancellationToken::new(),
            index: 0,
        }
    }

    pub(crate) fn restart(&mut self, token: CancellationToken) {
        self.token = token;
        self.index = 0;
    }

    pub(crate) fn advance(&mut self) {
        self.index += 1;
    }

    /// The connected window.
    pub fn target(&self) -> TargetWindow {
        self.target
    }

    /// Index of the next instruction to execute in the current run.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether the current run has been asked to stop.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}
