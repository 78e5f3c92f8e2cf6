//! X-Touch Mini addressing once switched to MCU mode.

use crate::midi::Channel;

/// Buttons and rotary encoders all talk on the first channel.
pub const CHAN: Channel = Channel::ONE;

pub mod mode_select {
    use crate::midi::Channel;

    /// Channel Mode command selecting the device's protocol.
    pub const COMMAND: u8 = 127;
    pub const MCU: u8 = 1;
    pub const GLOBAL_CHAN: Channel = Channel::ONE;
}

pub mod button {
    /// LED velocities.
    pub const OFF: u8 = 0;
    pub const BLINK: u8 = 1;
    pub const ON: u8 = 127;

    /// Top row left to right, then bottom row left to right.
    pub const MAIN: [u8; 16] = [
        0x59, 0x5a, 0x28, 0x29, 0x2a, 0x2b, 0x2c, 0x2d, //
        0x57, 0x58, 0x5b, 0x5c, 0x56, 0x5d, 0x5e, 0x5f,
    ];

    /// Left side, top then bottom.
    pub const SIDE: [u8; 2] = [0x54, 0x55];

    /// Rotary encoder push buttons, left to right.
    pub const ROTARY: [u8; 8] = [0x20, 0x21, 0x22, 0x23, 0x24, 0x25, 0x26, 0x27];
}

pub mod rotary {
    /// Left to right.
    pub const CONTROLS: [u8; 8] = [0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17];

    /// The LED ring of rotary `cc` is addressed at `RING_OFFSET + cc`.
    pub const RING_OFFSET: u8 = 0x20;

    pub const SIGN: u8 = 0x40;
    pub const MAGNITUDE: u8 = 0x3f;

    /// Upper bound for the lit segment index.
    ///
    /// Kept just below the segment count so a value at max
    /// still lights the last segment.
    pub const FACTOR: f64 = 10.999999;
    pub const FACTOR_SPREAD: f64 = 6.999999;

    pub const BASE_SINGLE: u8 = 0x00;
    pub const BASE_TRIM: u8 = 0x10;
    pub const BASE_WRAP: u8 = 0x20;
    pub const BASE_SPREAD: u8 = 0x30;
}

pub mod fader {
    /// Pitch bend channel number.
    pub const CHAN_NUMBER: u8 = 9;

    /// Only the 7 most significant bits of the bend are reported.
    pub const MSB_MAX: u8 = 127;
}
