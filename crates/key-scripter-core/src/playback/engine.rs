use crate::{
    CoreResult, MacroError, Transition, VirtualKey,
    playback::{KeyInjector, NativeInjector, PlaybackSession, TargetWindow},
    program::{MacroInstruction, MacroProgram},
};

use std::{
    panic::Location,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use error_location::ErrorLocation;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// What happened to a single Press/Release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Foreground was acquired and the window message was accepted.
    Delivered,
    /// The target could not be brought to the foreground; nothing was sent.
    ForegroundDenied,
    /// Foreground was acquired but posting the window message failed.
    MessageRejected,
}

/// Counters for one playback run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackReport {
    /// Instructions started, waits included.
    pub instructions_executed: usize,
    /// Transitions whose window message was accepted.
    pub delivered: usize,
    /// Transitions abandoned because focus could not be acquired.
    pub foreground_denied: usize,
    /// Transitions whose window message post failed.
    pub message_failures: usize,
    /// Keys the panic release sent an `Up` for after cancellation.
    pub panic_released: usize,
}

impl PlaybackReport {
    fn record(&mut self, outcome: TransitionOutcome) {
        match outcome {
            TransitionOutcome::Delivered => self.delivered += 1,
            TransitionOutcome::ForegroundDenied => self.foreground_denied += 1,
            TransitionOutcome::MessageRejected => self.message_failures += 1,
        }
    }
}

/// How a playback run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// Every instruction ran.
    Completed(PlaybackReport),
    /// A stop request ended the run early; every key was released afterwards.
    Cancelled(PlaybackReport),
}

impl PlaybackOutcome {
    /// Counters regardless of how the run ended.
    pub fn report(&self) -> &PlaybackReport {
        match self {
            PlaybackOutcome::Completed(report) | PlaybackOutcome::Cancelled(report) => report,
        }
    }

    /// Whether the run was stopped early.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PlaybackOutcome::Cancelled(_))
    }
}

fn lock_token(token: &Mutex<CancellationToken>) -> MutexGuard<'_, CancellationToken> {
    // A poisoned lock still holds a usable token.
    token.lock().unwrap_or_else(|e| e.into_inner())
}

/// Cloneable, thread-safe way to stop whatever run the engine is executing.
#[derive(Debug, Clone)]
pub struct StopHandle {
    current: Arc<Mutex<CancellationToken>>,
}

impl StopHandle {
    /// Cancel the current run. A run started later is unaffected.
    pub fn stop(&self) {
        lock_token(&self.current).cancel();
    }
}

/// Replays macro programs into a connected window.
///
/// Each Press/Release first makes sure the target is in the foreground,
/// then goes out over both injection paths: synthetic input first and the
/// window message second for a press, the reverse for a release. Waits are
/// interruptible. A cancelled run always ends by releasing every key so
/// nothing is left held down in the target.
pub struct PlaybackEngine<I: KeyInjector = NativeInjector> {
    injector: I,
    session: Option<PlaybackSession>,
    current: Arc<Mutex<CancellationToken>>,
}

impl Default for PlaybackEngine<NativeInjector> {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackEngine<NativeInjector> {
    /// Engine using the operating system's input APIs.
    pub fn new() -> Self {
        Self::with_injector(NativeInjector::new())
    }
}

impl<I: KeyInjector> PlaybackEngine<I> {
    /// Engine using a custom injector.
    pub fn with_injector(injector: I) -> Self {
        Self {
            injector,
            session: None,
            current: Arc::new(Mutex::new(CancellationToken::new())),
        }
    }

    /// Bind playback to a raw window handle, replacing any previous target.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn connect(&mut self, handle: isize) -> CoreResult<()> {
        let target = TargetWindow::new(handle)?;
        self.connect_window(target);
        Ok(())
    }

    /// Bind playback to an already validated window.
    pub fn connect_window(&mut self, target: TargetWindow) {
        if let Some(previous) = self.session.as_ref() {
            debug!(previous = %previous.target(), "Replacing playback target");
        }
        self.session = Some(PlaybackSession::new(target));
        info!(target = %target, "Playback target connected");
    }

    /// The current binding, if connected.
    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    /// Whether a target is bound.
    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// Handle that stops the running program from any thread.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            current: Arc::clone(&self.current),
        }
    }

    /// Stop the running program.
    pub fn stop(&self) {
        lock_token(&self.current).cancel();
    }

    /// Execute `program` against the connected window.
    ///
    /// # Errors
    ///
    /// Returns `NotConnected` if `connect` has not been called. Injection
    /// failures are counted in the report and never end the run.
    pub async fn play(&mut self, program: &MacroProgram) -> CoreResult<PlaybackOutcome> {
        self.play_with_parent(program, &CancellationToken::new()).await
    }

    /// Execute `program` in a run that is also cancelled by `parent`.
    ///
    /// The run token is a child of `parent`, so a caller that cancels
    /// `parent` between runs stops the next one before it injects anything.
    ///
    /// # Errors
    ///
    /// Same as [`play`](Self::play).
    #[instrument(skip_all, fields(instruction_count = program.len()))]
    pub async fn play_with_parent(
        &mut self,
        program: &MacroProgram,
        parent: &CancellationToken,
    ) -> CoreResult<PlaybackOutcome> {
        let token = parent.child_token();
        let target = {
            let session = self.session.as_mut().ok_or(MacroError::NotConnected {
                location: ErrorLocation::from(Location::caller()),
            })?;
            session.restart(token.clone());
            session.target()
        };
        *lock_token(&self.current) = token.clone();

        info!(
            target = %target,
            duration_ms = program.total_duration().as_millis() as u64,
            "Playback started"
        );

        let mut report = PlaybackReport::default();
        let mut cancelled = false;

        for instruction in program {
            if token.is_cancelled() {
                cancelled = true;
                break;
            }

            report.instructions_executed += 1;
            match *instruction {
                MacroInstruction::Press(key) => {
                    report.record(self.transition(target, key, Transition::Down));
                }
                MacroInstruction::Release(key) => {
                    report.record(self.transition(target, key, Transition::Up));
                }
                MacroInstruction::Wait(duration) => {
                    if !interruptible_sleep(&token, duration).await {
                        cancelled = true;
                        break;
                    }
                }
            }

            if let Some(session) = self.session.as_mut() {
                session.advance();
            }
        }

        // A stop that lands on the final instruction still counts.
        cancelled |= token.is_cancelled();

        if cancelled {
            report.panic_released = self.release_all(target);
            info!(
                executed = report.instructions_executed,
                released = report.panic_released,
                "Playback cancelled"
            );
            return Ok(PlaybackOutcome::Cancelled(report));
        }

        info!(
            executed = report.instructions_executed,
            delivered = report.delivered,
            foreground_denied = report.foreground_denied,
            message_failures = report.message_failures,
            "Playback completed"
        );

        Ok(PlaybackOutcome::Completed(report))
    }

    /// Press `key` in the connected window.
    #[track_caller]
    pub fn press(&mut self, key: VirtualKey) -> CoreResult<TransitionOutcome> {
        let target = self.connected_target()?;
        Ok(self.transition(target, key, Transition::Down))
    }

    /// Release `key` in the connected window.
    #[track_caller]
    pub fn release(&mut self, key: VirtualKey) -> CoreResult<TransitionOutcome> {
        let target = self.connected_target()?;
        Ok(self.transition(target, key, Transition::Up))
    }

    /// Sleep for `duration` unless the engine is stopped first. Returns
    /// whether the full duration elapsed.
    pub async fn sleep(&self, duration: Duration) -> bool {
        let token = lock_token(&self.current).clone();
        interruptible_sleep(&token, duration).await
    }

    #[track_caller]
    fn connected_target(&self) -> CoreResult<TargetWindow> {
        self.session
            .as_ref()
            .map(PlaybackSession::target)
            .ok_or(MacroError::NotConnected {
                location: ErrorLocation::from(Location::caller()),
            })
    }

    fn transition(
        &mut self,
        target: TargetWindow,
        key: VirtualKey,
        transition: Transition,
    ) -> TransitionOutcome {
        if !self.injector.ensure_foreground(target) {
            warn!(%key, ?transition, target = %target, "Target refused foreground");
            return TransitionOutcome::ForegroundDenied;
        }

        let posted = match transition {
            Transition::Down => {
                self.synthesize(key, transition);
                self.injector.post_message(target, key, transition)
            }
            Transition::Up => {
                let posted = self.injector.post_message(target, key, transition);
                self.synthesize(key, transition);
                posted
            }
        };

        match posted {
            Ok(()) => TransitionOutcome::Delivered,
            Err(e) => {
                debug!(%key, ?transition, error = %e, "Window message rejected");
                TransitionOutcome::MessageRejected
            }
        }
    }

    fn synthesize(&mut self, key: VirtualKey, transition: Transition) {
        if let Err(e) = self.injector.send_input(key, transition) {
            debug!(%key, ?transition, error = %e, "Synthetic input failed");
        }
    }

    /// Release every known key. Not cancellable and not gated on focus:
    /// both paths are tried for every key even if the target refuses the
    /// foreground. Returns how many keys a release was attempted for.
    fn release_all(&mut self, target: TargetWindow) -> usize {
        if !self.injector.ensure_foreground(target) {
            warn!(target = %target, "Target refused foreground, releasing keys anyway");
        }

        let mut attempted = 0;
        for &key in VirtualKey::ALL {
            if let Err(e) = self.injector.post_message(target, key, Transition::Up) {
                debug!(%key, error = %e, "Release message rejected");
            }
            self.synthesize(key, Transition::Up);
            attempted += 1;
        }
        attempted
    }
}

/// Sleep unless `token` fires first. Returns whether the sleep completed.
async fn interruptible_sleep(token: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        _ = token.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}
