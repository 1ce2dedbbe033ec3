use crate::{MacroError, VirtualKey};

/// WHAT: Names and codes resolve to the same key in both directions
/// WHY: Capture stores codes and macro text stores names; both must agree
#[test]
fn given_known_key_when_looking_up_by_code_and_name_then_same_key_returned() {
    // Given: A letter, a function key and an extended navigation key
    let cases = [
        (VirtualKey::A, 0x41, "A"),
        (VirtualKey::F5, 0x74, "F5"),
        (VirtualKey::Return, 0x0D, "Return"),
        (VirtualKey::RControl, 0xA3, "RControl"),
    ];

    for (key, code, name) in cases {
        // When: Looking the key up by code and by name
        let by_code = VirtualKey::from_code(code);
        let by_name = VirtualKey::from_name(name);

        // Then: Both resolve to the key and report the same code/name back
        assert_eq!(by_code, Some(key));
        assert_eq!(by_name, Some(key));
        assert_eq!(u32::from(key.code()), code);
        assert_eq!(key.name(), name);
    }
}

/// WHAT: Unmapped native codes resolve to None
/// WHY: Capture must drop keys it cannot name instead of guessing
#[test]
fn given_unmapped_code_when_resolving_then_none() {
    // Given: Codes that are mouse buttons, reserved, or out of range
    let unmapped = [0x00, 0x01, 0x07, 0x3A, 0xFF, 0x1_0000];

    // When/Then: None of them resolve
    for code in unmapped {
        assert_eq!(VirtualKey::from_code(code), None, "code {code:#x}");
    }
}

/// WHAT: Parsing an unknown key name yields UnknownKey
/// WHY: Config and tooling report bad names instead of silently ignoring them
#[test]
fn given_unknown_name_when_parsing_then_unknown_key_error() {
    // Given: A name that is not a virtual key
    let name = "Hyper";

    // When: Parsing it
    let result = name.parse::<VirtualKey>();

    // Then: UnknownKey carries the offending name
    assert!(matches!(
        result,
        Err(MacroError::UnknownKey { ref name, .. }) if name == "Hyper"
    ));
}

/// WHAT: FromStr trims surrounding whitespace
/// WHY: Hand-edited config values often carry stray spaces
#[test]
#[allow(clippy::unwrap_used)]
fn given_padded_name_when_parsing_then_key_resolved() {
    // Given/When: A padded key name
    let key: VirtualKey = "  F10 ".parse().unwrap();

    // Then: It resolves to F10
    assert_eq!(key, VirtualKey::F10);
    assert_eq!(key.to_string(), "F10");
}

/// WHAT: ALL lists every key exactly once in ascending code order
/// WHY: Panic release iterates ALL and must not miss or repeat keys
#[test]
fn given_all_keys_when_iterating_then_strictly_ascending_codes() {
    // Given: The full key table
    let all = VirtualKey::ALL;

    // Then: Codes strictly increase and every entry round-trips by code
    assert!(all.windows(2).all(|pair| pair[0].code() < pair[1].code()));
    for key in all {
        assert_eq!(VirtualKey::from_code(u32::from(key.code())), Some(*key));
        assert_eq!(VirtualKey::from_name(key.name()), Some(*key));
    }
}
