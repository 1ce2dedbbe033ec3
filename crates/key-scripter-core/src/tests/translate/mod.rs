mod control_hotkeys;
