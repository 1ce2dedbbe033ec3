use crate::{CoreResult, Transition, VirtualKey, playback::TargetWindow};

/// Delivers synthetic key transitions to a window.
///
/// Playback drives two independent paths per transition: driver-level input
/// through [`send_input`](KeyInjector::send_input) and a direct keyboard
/// message through [`post_message`](KeyInjector::post_message). Either may
/// fail without affecting the other.
pub trait KeyInjector {
    /// Bring `window` to the foreground unless it already is. Returns
    /// whether it is in the foreground afterwards.
    fn ensure_foreground(&mut self, window: TargetWindow) -> bool;

    /// Inject a transition into the system input stream.
    fn send_input(&mut self, key: VirtualKey, transition: Transition) -> CoreResult<()>;

    /// Post a `WM_KEYDOWN`/`WM_KEYUP` message straight to `window`.
    fn post_message(
        &mut self,
        window: TargetWindow,
        key: VirtualKey,
        transition: Transition,
    ) -> CoreResult<()>;
}

const SCAN_CODE_SHIFT: u32 = 16;
const EXTENDED_KEY_BIT: u32 = 1 << 24;
const CONTEXT_CODE_BIT: u32 = 1 << 29;
const PREVIOUS_STATE_BIT: u32 = 1 << 30;
const TRANSITION_STATE_BIT: u32 = 1 << 31;

/// Build the `lParam` of a keyboard window message.
///
/// | bits  | field            |
/// |-------|------------------|
/// | 0-15  | repeat count     |
/// | 16-23 | scan code        |
/// | 24    | extended key     |
/// | 29    | context code     |
/// | 30    | previous state   |
/// | 31    | transition state |
pub fn message_lparam(
    repeat_count: u16,
    scan_code: u8,
    extended: bool,
    context_code: bool,
    previous_state: bool,
    transition_state: bool,
) -> u32 {
    let mut lparam = u32::from(repeat_count) | (u32::from(scan_code) << SCAN_CODE_SHIFT);
    if extended {
        lparam |= EXTENDED_KEY_BIT;
    }
    if context_code {
        lparam |= CONTEXT_CODE_BIT;
    }
    if previous_state {
        lparam |= PREVIOUS_STATE_BIT;
    }
    if transition_state {
        lparam |= TRANSITION_STATE_BIT;
    }
    lparam
}

/// `lParam` for a single transition given the extended scan code returned by
/// `MapVirtualKeyW(.., MAPVK_VK_TO_VSC_EX)`. An `0xE0`/`0xE1` high byte marks
/// an extended key. Releases set the previous and transition state bits the
/// way the system does for `WM_KEYUP`.
pub fn transition_lparam(extended_scan_code: u32, transition: Transition) -> u32 {
    let prefix = (extended_scan_code >> 8) & 0xFF;
    let extended = prefix == 0xE0 || prefix == 0xE1;
    let released = transition == Transition::Up;
    message_lparam(
        1,
        (extended_scan_code & 0xFF) as u8,
        extended,
        false,
        released,
        released,
    )
}
