use crate::{
    CoreResult, KeyInjector, MacroError,
    MacroInstruction::{Press, Release, Wait},
    MacroProgram, PlaybackEngine, PlaybackOutcome, TargetWindow, Transition, TransitionOutcome,
    VirtualKey,
};

use std::{
    panic::Location,
    sync::{Arc, Mutex},
    time::Duration,
};

use error_location::ErrorLocation;
use tokio_util::sync::CancellationToken;

const WINDOW: isize = 0x1234;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Call {
    Foreground(isize),
    Input(VirtualKey, Transition),
    Message(VirtualKey, Transition),
}

/// Injector that records every call and can be told to fail.
#[derive(Clone, Default)]
struct RecordingInjector {
    calls: Arc<Mutex<Vec<Call>>>,
    deny_foreground: bool,
    reject_messages: bool,
    fail_input: bool,
}

impl RecordingInjector {
    #[allow(clippy::unwrap_used)]
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    #[allow(clippy::unwrap_used)]
    fn log(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl KeyInjector for RecordingInjector {
    fn ensure_foreground(&mut self, window: TargetWindow) -> bool {
        self.log(Call::Foreground(window.raw()));
        !self.deny_foreground
    }

    fn send_input(&mut self, key: VirtualKey, transition: Transition) -> CoreResult<()> {
        self.log(Call::Input(key, transition));
        if self.fail_input {
            return Err(MacroError::InjectionFailed {
                reason: "input refused".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }

    fn post_message(
        &mut self,
        _window: TargetWindow,
        key: VirtualKey,
        transition: Transition,
    ) -> CoreResult<()> {
        self.log(Call::Message(key, transition));
        if self.reject_messages {
            return Err(MacroError::InjectionFailed {
                reason: "message refused".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }
}

#[allow(clippy::unwrap_used)]
fn connected(injector: RecordingInjector) -> PlaybackEngine<RecordingInjector> {
    let mut engine = PlaybackEngine::with_injector(injector);
    engine.connect(WINDOW).unwrap();
    engine
}

/// WHAT: Playing before connecting fails with NotConnected
/// WHY: Input must never be injected without an explicit target
#[tokio::test]
async fn given_no_target_when_playing_then_not_connected() {
    // Given: An engine with no target
    let injector = RecordingInjector::default();
    let mut engine = PlaybackEngine::with_injector(injector.clone());

    // When: Playing
    let result = engine.play(&MacroProgram::from(vec![Press(VirtualKey::A)])).await;

    // Then: Rejected before touching the injector
    assert!(matches!(result, Err(MacroError::NotConnected { .. })));
    assert!(injector.calls().is_empty());
    assert!(matches!(
        engine.press(VirtualKey::A),
        Err(MacroError::NotConnected { .. })
    ));
}

/// WHAT: Zero handles are rejected on connect
/// WHY: A null window would send input to whatever happens to be focused
#[test]
fn given_zero_handle_when_connecting_then_invalid_window_handle() {
    let mut engine = PlaybackEngine::with_injector(RecordingInjector::default());

    assert!(matches!(
        engine.connect(0),
        Err(MacroError::InvalidWindowHandle { handle: 0, .. })
    ));
    assert!(!engine.is_connected());
}

/// WHAT: Press sends input before the message, release posts the message first
/// WHY: Matches the order the target sees from a physical keyboard
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_tap_when_playing_then_paths_ordered_per_transition() {
    // Given: A connected engine and a single tap
    let injector = RecordingInjector::default();
    let mut engine = connected(injector.clone());
    let program = MacroProgram::from(vec![
        Wait(Duration::from_millis(5)),
        Press(VirtualKey::A),
        Wait(Duration::from_millis(5)),
        Release(VirtualKey::A),
    ]);

    // When: Playing
    let outcome = engine.play(&program).await.unwrap();

    // Then: Completed with both transitions delivered in order
    assert_eq!(
        injector.calls(),
        vec![
            Call::Foreground(WINDOW),
            Call::Input(VirtualKey::A, Transition::Down),
            Call::Message(VirtualKey::A, Transition::Down),
            Call::Foreground(WINDOW),
            Call::Message(VirtualKey::A, Transition::Up),
            Call::Input(VirtualKey::A, Transition::Up),
        ]
    );
    let PlaybackOutcome::Completed(report) = outcome else {
        unreachable!("playback was not stopped");
    };
    assert_eq!(report.instructions_executed, 4);
    assert_eq!(report.delivered, 2);
    assert_eq!(engine.session().unwrap().index(), 4);
}

/// WHAT: Waits sleep for their full duration
/// WHY: Replay timing must match the recording
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_waits_when_playing_then_total_time_elapses() {
    // Given: Two waits totalling 750ms
    let mut engine = connected(RecordingInjector::default());
    let program = MacroProgram::from(vec![
        Wait(Duration::from_millis(500)),
        Press(VirtualKey::B),
        Wait(Duration::from_millis(250)),
        Release(VirtualKey::B),
    ]);
    let start = tokio::time::Instant::now();

    // When: Playing
    let outcome = engine.play(&program).await.unwrap();

    // Then: At least the programmed time passed
    assert!(!outcome.is_cancelled());
    assert!(start.elapsed() >= Duration::from_millis(750));
}

/// WHAT: Focus denial abandons the transition and playback continues
/// WHY: A window that refuses focus must not abort the whole macro
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_foreground_denied_when_playing_then_transitions_skipped_and_counted() {
    // Given: An injector that never gets focus
    let injector = RecordingInjector {
        deny_foreground: true,
        ..RecordingInjector::default()
    };
    let mut engine = connected(injector.clone());
    let program = MacroProgram::from(vec![Press(VirtualKey::C), Release(VirtualKey::C)]);

    // When: Playing
    let outcome = engine.play(&program).await.unwrap();

    // Then: Nothing injected, both denials counted
    assert!(
        injector
            .calls()
            .iter()
            .all(|call| matches!(call, Call::Foreground(_)))
    );
    assert_eq!(outcome.report().foreground_denied, 2);
    assert_eq!(outcome.report().delivered, 0);
}

/// WHAT: Message failures are reported; input failures are only logged
/// WHY: The two injection paths are independent best-effort attempts
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_failing_paths_when_playing_then_only_message_failures_counted() {
    // Given: Both paths fail
    let injector = RecordingInjector {
        reject_messages: true,
        fail_input: true,
        ..RecordingInjector::default()
    };
    let mut engine = connected(injector.clone());
    let program = MacroProgram::from(vec![Press(VirtualKey::D), Release(VirtualKey::D)]);

    // When: Playing
    let outcome = engine.play(&program).await.unwrap();

    // Then: Both transitions were attempted on both paths
    assert!(!outcome.is_cancelled());
    assert_eq!(outcome.report().message_failures, 2);
    assert_eq!(injector.calls().len(), 6);
}

/// WHAT: Stopping during a wait cancels immediately and releases every key
/// WHY: A stopped macro must not leave modifiers stuck down
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_long_wait_when_stopped_then_cancelled_with_panic_release() {
    // Given: Shift pressed, then a ten second wait
    let injector = RecordingInjector::default();
    let mut engine = connected(injector.clone());
    let program = MacroProgram::from(vec![
        Press(VirtualKey::LShift),
        Wait(Duration::from_secs(10)),
        Release(VirtualKey::LShift),
    ]);
    let stop = engine.stop_handle();
    let stopper = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        stop.stop();
    });
    let start = tokio::time::Instant::now();

    // When: Playing while a task stops it after one second
    let outcome = engine.play(&program).await.unwrap();
    stopper.await.unwrap();

    // Then: The wait was cut short and every key got a release
    assert!(start.elapsed() < Duration::from_secs(10));
    let PlaybackOutcome::Cancelled(report) = outcome else {
        unreachable!("playback was stopped");
    };
    assert_eq!(report.instructions_executed, 2);
    assert_eq!(report.panic_released, VirtualKey::ALL.len());
    let released: Vec<VirtualKey> = injector
        .calls()
        .iter()
        .filter_map(|call| match call {
            Call::Message(key, Transition::Up) => Some(*key),
            _ => None,
        })
        .collect();
    assert_eq!(released, VirtualKey::ALL.to_vec());
}

/// WHAT: The release after a stop goes out even when focus is refused
/// WHY: A target that will not come to the front must still see its keys released
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_foreground_denied_when_stopped_then_every_key_still_released() {
    // Given: A target that refuses focus and a program holding Shift for ten seconds
    let injector = RecordingInjector {
        deny_foreground: true,
        ..RecordingInjector::default()
    };
    let mut engine = connected(injector.clone());
    let program = MacroProgram::from(vec![
        Press(VirtualKey::LShift),
        Wait(Duration::from_secs(10)),
        Release(VirtualKey::LShift),
    ]);
    let stop = engine.stop_handle();
    let stopper = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        stop.stop();
    });

    // When: Playing while a task stops it after one second
    let outcome = engine.play(&program).await.unwrap();
    stopper.await.unwrap();

    // Then: The press was skipped but Shift got an Up over both paths
    let PlaybackOutcome::Cancelled(report) = outcome else {
        unreachable!("playback was stopped");
    };
    assert_eq!(report.foreground_denied, 1);
    assert_eq!(report.panic_released, VirtualKey::ALL.len());
    let calls = injector.calls();
    assert!(calls.contains(&Call::Message(VirtualKey::LShift, Transition::Up)));
    assert!(calls.contains(&Call::Input(VirtualKey::LShift, Transition::Up)));
    assert!(!calls.contains(&Call::Input(VirtualKey::LShift, Transition::Down)));
}

/// WHAT: A cancelled parent token stops the run before anything is pressed
/// WHY: A stop that lands before the run starts must not be lost
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_cancelled_parent_when_playing_then_cancelled_without_presses() {
    // Given: A parent token that is already cancelled
    let injector = RecordingInjector::default();
    let mut engine = connected(injector.clone());
    let parent = CancellationToken::new();
    parent.cancel();

    // When: Playing under it
    let outcome = engine
        .play_with_parent(
            &MacroProgram::from(vec![Press(VirtualKey::E), Release(VirtualKey::E)]),
            &parent,
        )
        .await
        .unwrap();

    // Then: Nothing ran and the run ended with the release pass
    let PlaybackOutcome::Cancelled(report) = outcome else {
        unreachable!("parent was cancelled");
    };
    assert_eq!(report.instructions_executed, 0);
    assert!(
        !injector
            .calls()
            .iter()
            .any(|call| matches!(call, Call::Input(_, Transition::Down)))
    );
}

/// WHAT: A stop issued before play does not affect the next run
/// WHY: Every run gets a fresh cancellation token
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_stop_before_play_when_playing_then_run_completes() {
    // Given: An engine that was stopped while idle
    let mut engine = connected(RecordingInjector::default());
    engine.stop();

    // When: Playing
    let outcome = engine
        .play(&MacroProgram::from(vec![Press(VirtualKey::E), Release(VirtualKey::E)]))
        .await
        .unwrap();

    // Then: The run completes
    assert!(matches!(outcome, PlaybackOutcome::Completed(_)));
}

/// WHAT: Direct press/release calls go through the same delivery path
/// WHY: Callers can drive the connected window one transition at a time
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_connected_engine_when_pressing_directly_then_delivered() {
    // Given: A connected engine
    let injector = RecordingInjector::default();
    let mut engine = connected(injector.clone());

    // When: Pressing, sleeping and releasing directly
    let pressed = engine.press(VirtualKey::Space).unwrap();
    let slept = engine.sleep(Duration::from_millis(20)).await;
    let released = engine.release(VirtualKey::Space).unwrap();

    // Then: Both transitions delivered and the sleep ran to completion
    assert_eq!(pressed, TransitionOutcome::Delivered);
    assert_eq!(released, TransitionOutcome::Delivered);
    assert!(slept);
    assert_eq!(injector.calls().len(), 6);
}

/// WHAT: Reconnecting replaces the target
/// WHY: Only one window is bound at a time
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_connected_engine_when_reconnecting_then_new_target_used() {
    // Given: An engine bound to one window
    let injector = RecordingInjector::default();
    let mut engine = connected(injector.clone());

    // When: Connecting to another window and pressing
    engine.connect(0x9999).unwrap();
    let _ = engine.press(VirtualKey::G).unwrap();

    // Then: Focus was requested for the new window
    assert_eq!(injector.calls()[0], Call::Foreground(0x9999));
    assert_eq!(
        engine.session().map(|session| session.target().raw()),
        Some(0x9999)
    );
}
