use crate::bytes;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[cfg(feature = "hardware")]
    #[error("MIDI initialization failed")]
    Init(#[from] midir::InitError),

    #[cfg(feature = "hardware")]
    #[error("Error connecting to MIDI port {}", .0)]
    Connection(std::sync::Arc<str>),

    #[cfg(feature = "hardware")]
    #[error("Couldn't retrieve a MIDI port name")]
    PortInfoError(#[from] midir::PortInfoError),

    #[cfg(feature = "hardware")]
    #[error("Invalid MIDI port name {}", .0)]
    PortNotFound(std::sync::Arc<str>),

    #[cfg(feature = "hardware")]
    #[error("Couldn't send MIDI message: {}", .0)]
    Send(#[from] midir::SendError),

    #[error("MIDI port not connected")]
    NotConnected,

    #[error("Invalid MIDI channel {}, expected 1 to 16", .0)]
    InvalidChannel(u8),

    #[error("Invalid data byte in msg: {}", .0)]
    InvalidDataByte(bytes::Displayable<'static>),

    #[error("Truncated msg: {}", .0)]
    Truncated(bytes::Displayable<'static>),

    #[error("Unsupported msg: {}", .0)]
    UnsupportedMsg(bytes::Displayable<'static>),

    #[error("Invalid normalized pitch bend: {}", .0)]
    InvalidNormalizedBend(f64),

    #[error("Invalid channel mode command {:#04x}", .0)]
    InvalidChannelMode(u8),
}
