mod key_event;
mod virtual_key;

pub use {
    key_event::{KeyEvent, KeyEventStream, Transition},
    virtual_key::VirtualKey,
};
