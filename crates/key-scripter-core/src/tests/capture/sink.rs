use crate::{CaptureSink, ControlHotkeyMap, KeyEvent, Transition, VirtualKey};

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

/// WHAT: Unmapped native codes are dropped from the stream
/// WHY: Keys the model cannot name must not reach translation
#[test]
fn given_unmapped_code_when_handling_then_event_dropped() {
    // Given: A sink with no control keys
    let mut sink = CaptureSink::new(Arc::new(ControlHotkeyMap::new()));

    // When: Handling a mouse button code and a letter
    sink.handle_at(0x01, Transition::Down, Duration::from_millis(5));
    sink.handle_at(0x41, Transition::Down, Duration::from_millis(9));

    // Then: Only the letter is recorded
    assert_eq!(
        sink.into_stream().as_slice(),
        &[KeyEvent::down(VirtualKey::A, 9)]
    );
}

/// WHAT: Control actions fire on release only and the event is still logged
/// WHY: Capture is a raw log; firing on release avoids acting on auto-repeat
#[test]
fn given_control_key_when_pressed_and_released_then_action_fires_once() {
    // Given: F9 bound to a counter
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);
    let controls = ControlHotkeyMap::new().bind(VirtualKey::F9, move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let mut sink = CaptureSink::new(Arc::new(controls));

    // When: F9 auto-repeats then is released
    let f9 = u32::from(VirtualKey::F9.code());
    sink.handle_at(f9, Transition::Down, Duration::from_millis(100));
    sink.handle_at(f9, Transition::Down, Duration::from_millis(130));
    assert_eq!(fired.load(Ordering::SeqCst), 0);
    sink.handle_at(f9, Transition::Up, Duration::from_millis(150));

    // Then: One action, three logged events
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert_eq!(sink.stream().len(), 3);
}

/// WHAT: Live handling stamps events with whole milliseconds
/// WHY: Rendered waits are integers and must round-trip exactly
#[test]
fn given_live_event_when_handling_then_timestamp_whole_millis() {
    // Given: A fresh sink
    let mut sink = CaptureSink::new(Arc::new(ControlHotkeyMap::new()));

    // When: Handling an event against the real clock
    std::thread::sleep(Duration::from_millis(3));
    sink.handle(u32::from(VirtualKey::Q.code()), Transition::Up);

    // Then: The timestamp has no sub-millisecond part
    let stream = sink.into_stream();
    let timestamp = stream.as_slice()[0].timestamp;
    assert_eq!(timestamp.subsec_nanos() % 1_000_000, 0);
    assert!(timestamp >= Duration::from_millis(3));
}
