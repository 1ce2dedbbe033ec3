use crate::{
    MacroInstruction::{Press, Release, Wait},
    MacroProgram, RenderOptions, VirtualKey,
};

use std::time::Duration;

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// WHAT: A program renders one call per line with default identifiers
/// WHY: The text is pasted into automation scripts that expect this exact shape
#[test]
fn given_program_when_rendering_then_one_call_per_line() {
    // Given: Tap of F preceded by a wait
    let program = MacroProgram::from(vec![
        Wait(ms(832)),
        Press(VirtualKey::F),
        Wait(ms(144)),
        Release(VirtualKey::F),
    ]);

    // When: Rendering with defaults
    let text = program.render();

    // Then: Lines are joined by \n with no trailing terminator
    assert_eq!(
        text,
        "_keyboard.Sleep(832);\n\
         _keyboard.Press(VKey.F);\n\
         _keyboard.Sleep(144);\n\
         _keyboard.Release(VKey.F);"
    );
}

/// WHAT: Empty programs render to an empty string
/// WHY: A recording with no usable keys must not produce stray lines
#[test]
fn given_empty_program_when_rendering_then_empty_string() {
    assert_eq!(MacroProgram::new().render(), "");
}

/// WHAT: Custom target and namespace appear in every line
/// WHY: Output is embedded in scripts that name their keyboard object differently
#[test]
fn given_custom_options_when_rendering_then_identifiers_used() {
    // Given: Custom render options
    let options = RenderOptions {
        target_name: "kb".to_string(),
        key_namespace: "Keys".to_string(),
    };
    let program = MacroProgram::from(vec![Wait(ms(0)), Press(VirtualKey::Return)]);

    // When: Rendering
    let text = program.render_with(&options);

    // Then: Both identifiers are substituted
    assert_eq!(text, "kb.Sleep(0);\nkb.Press(Keys.Return);");
}

/// WHAT: Rendering the same program twice gives identical text
/// WHY: Saved macros are compared and diffed as text
#[test]
fn given_program_when_rendered_twice_then_identical() {
    // Given: A program with zero and non-zero waits
    let program = MacroProgram::from(vec![
        Wait(ms(0)),
        Press(VirtualKey::LShift),
        Wait(ms(25)),
        Press(VirtualKey::A),
        Wait(ms(0)),
        Release(VirtualKey::A),
        Wait(ms(10)),
        Release(VirtualKey::LShift),
    ]);

    // When/Then: Two renders match
    assert_eq!(program.render(), program.render());
    assert_eq!(program.total_duration(), ms(35));
    assert_eq!(program.key_instruction_count(), 4);
}
