mod engine;
mod injector;
mod native;
mod session;
mod window;

pub use {
    engine::{PlaybackEngine, PlaybackOutcome, PlaybackReport, StopHandle, TransitionOutcome},
    injector::{KeyInjector, message_lparam, transition_lparam},
    native::NativeInjector,
    session::PlaybackSession,
    window::TargetWindow,
};
