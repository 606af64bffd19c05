//! Labels for GRBL realtime command bytes.

/// Soft reset (Ctrl-X)
pub const SOFT_RESET: u8 = 0x18;
pub const STATUS_QUERY: u8 = b'?';
pub const CYCLE_START: u8 = b'~';
pub const FEED_HOLD: u8 = b'!';
pub const SAFETY_DOOR: u8 = 0x84;
pub const JOG_CANCEL: u8 = 0x85;

/// Human-readable name of a realtime command code
pub fn realtime_command_label(code: u32) -> String {
    let Ok(byte) = u8::try_from(code) else {
        return format!("unknown setting {}", code);
    };
    let label = match byte {
        SOFT_RESET => "Soft-Reset",
        STATUS_QUERY => "Status Report Query",
        CYCLE_START => "Cycle Start / Resume",
        FEED_HOLD => "Feed Hold",
        SAFETY_DOOR => "Safety Door",
        JOG_CANCEL => "Jog Cancel",
        0x90 => "Set 100% of programmed feed rate.",
        0x91 => "Feed Rate increase 10%",
        0x92 => "Feed Rate decrease 10%",
        0x93 => "Feed Rate increase 1%",
        0x94 => "Feed Rate decrease 1%",
        0x95 => "Set to 100% full rapid rate.",
        0x96 => "Set to 50% of rapid rate.",
        0x97 => "Set to 25% of rapid rate.",
        0x99 => "Set 100% of programmed spindle speed",
        0x9A => "Spindle Speed increase 10%",
        0x9B => "Spindle Speed decrease 10%",
        0x9C => "Spindle Speed increase 1%",
        0x9D => "Spindle Speed decrease 1%",
        0x9E => "Toggle Spindle Stop",
        0xA0 => "Toggle Flood Coolant",
        0xA1 => "Toggle Mist Coolant",
        _ => return format!("unknown setting {}", code),
    };
    label.to_string()
}
