use super::ControlId;
use crate::midi;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("MIDI error: {}", .0)]
    Midi(#[from] midi::Error),

    #[error("Device not connected")]
    NotConnected,

    #[error("Invalid control number {:#04x}", .0)]
    InvalidControl(u8),

    #[error("Invalid range: min {min} > max {max}")]
    InvalidRange { min: i32, max: i32 },

    #[error("Button index {index} out of a group of {len}")]
    InvalidIndex { index: usize, len: usize },

    #[error("{} is disposed", .0)]
    Disposed(ControlId),
}
