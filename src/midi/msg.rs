use std::fmt;

use super::{pitch_bend, tag, Channel, Error};
use crate::bytes;

/// Channel Mode commands occupy the upper controller numbers.
const CHANNEL_MODE_FIRST: u8 = 120;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Msg(Box<[u8]>);

impl Msg {
    pub fn inner(&self) -> &[u8] {
        self.0.as_ref()
    }

    pub fn display(&self) -> bytes::Displayable {
        bytes::Displayable::from(self.0.as_ref())
    }

    pub fn note_on(number: u8, velocity: u8, chan: Channel) -> Self {
        [tag::NOTE_ON | chan, number & 0x7f, velocity & 0x7f].into()
    }

    pub fn control_change(number: u8, value: u8, chan: Channel) -> Self {
        [tag::CONTROL_CHANGE | chan, number & 0x7f, value & 0x7f].into()
    }

    /// Builds a Pitch-Bend msg from a bend in `[-1, 1]`.
    pub fn pitch_bend(normalized: f64, chan: Channel) -> Result<Self, Error> {
        let [lsb, msb] = pitch_bend::from_normalized(normalized)?;

        Ok([tag::PITCH_BEND | chan, lsb, msb].into())
    }

    pub fn channel_mode(command: u8, value: u8, chan: Channel) -> Result<Self, Error> {
        if !(CHANNEL_MODE_FIRST..=0x7f).contains(&command) {
            return Err(Error::InvalidChannelMode(command));
        }

        Ok([tag::CONTROL_CHANGE | chan, command, value & 0x7f].into())
    }
}

impl fmt::Display for Msg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.display(), f)
    }
}

impl<const S: usize> From<[u8; S]> for Msg {
    fn from(buf: [u8; S]) -> Self {
        Self(buf.into())
    }
}

impl From<&[u8]> for Msg {
    fn from(buf: &[u8]) -> Self {
        Self(buf.into())
    }
}

impl std::ops::Deref for Msg {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mcu_mode_select() {
        let msg = Msg::channel_mode(127, 1, Channel::ONE).unwrap();
        assert_eq!(msg.inner(), &[0xb0, 0x7f, 0x01]);

        assert!(matches!(
            Msg::channel_mode(0x10, 1, Channel::ONE),
            Err(Error::InvalidChannelMode(0x10))
        ));
    }

    #[test]
    fn builders() {
        assert_eq!(Msg::note_on(0x59, 127, Channel::ONE).inner(), &[0x90, 0x59, 0x7f]);
        assert_eq!(
            Msg::control_change(0x30, 0x06, Channel::ONE).inner(),
            &[0xb0, 0x30, 0x06]
        );

        let chan = Channel::try_from_number(9).unwrap();
        assert_eq!(Msg::pitch_bend(1f64, chan).unwrap().inner(), &[0xe8, 0x7f, 0x7f]);
        assert_eq!(Msg::note_on(0x20, 0, Channel::ONE).to_string(), "90 20 00");
    }
}
