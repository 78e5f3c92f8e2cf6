mod error;
pub use error::Error;

pub mod event;
pub use event::{Event, EventClass, Subscription};

#[cfg(feature = "hardware")]
pub mod io;

pub mod msg;
pub use msg::Msg;

pub mod port;
pub use port::{Output, Port};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Tag(u8);

impl Tag {
    pub const fn from(byte: u8) -> Self {
        Self(byte & 0xf0)
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> u8 {
        tag.0
    }
}

pub mod tag {
    use super::Tag;

    pub const NOTE_OFF: Tag = Tag::from(0x80);
    pub const NOTE_ON: Tag = Tag::from(0x90);
    pub const CONTROL_CHANGE: Tag = Tag::from(0xb0);
    pub const PITCH_BEND: Tag = Tag::from(0xe0);
}

/// A MIDI channel.
///
/// Stored as the 4 bits nibble found on the wire,
/// but built from and displayed as the usual 1 to 16 number.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Channel(u8);

impl Channel {
    pub const ONE: Channel = Channel(0);

    pub const fn from(byte: u8) -> Self {
        Self(byte & 0x0f)
    }

    pub fn try_from_number(number: u8) -> Result<Self, Error> {
        if !(1..=16).contains(&number) {
            return Err(Error::InvalidChannel(number));
        }

        Ok(Self(number - 1))
    }

    pub fn number(self) -> u8 {
        self.0 + 1
    }
}

impl From<Channel> for u8 {
    fn from(chan: Channel) -> u8 {
        chan.0
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl std::ops::BitOr<Channel> for Tag {
    type Output = u8;

    fn bitor(self, chan: Channel) -> Self::Output {
        self.0 | chan.0
    }
}

pub const DATA_MAX: u8 = 0x7f;

#[inline]
pub fn is_data_byte(byte: u8) -> bool {
    byte <= DATA_MAX
}

pub mod pitch_bend {
    use super::Error;

    pub const MAX: u16 = 0x3fff;

    #[inline]
    pub fn from_le(lsb: u8, msb: u8) -> u16 {
        (lsb & 0x7f) as u16 | (((msb & 0x7f) as u16) << 7)
    }

    /// Converts a bend in `[-1, 1]` into its `[lsb, msb]` wire bytes.
    #[inline]
    pub fn from_normalized(val: f64) -> Result<[u8; 2], Error> {
        if !(-1f64..=1f64).contains(&val) {
            return Err(Error::InvalidNormalizedBend(val));
        }

        let level = (((val + 1f64) / 2f64) * MAX as f64).floor() as u16;

        Ok([level as u8 & 0x7f, (level >> 7) as u8 & 0x7f])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_numbers() {
        assert_eq!(Channel::try_from_number(1).unwrap(), Channel::ONE);
        assert_eq!(Channel::try_from_number(9).unwrap().number(), 9);
        assert_eq!(u8::from(Channel::try_from_number(16).unwrap()), 0x0f);
        assert!(matches!(
            Channel::try_from_number(0),
            Err(Error::InvalidChannel(0))
        ));
        assert!(Channel::try_from_number(17).is_err());
    }

    #[test]
    fn tag_and_channel() {
        let chan = Channel::try_from_number(9).unwrap();
        assert_eq!(tag::PITCH_BEND | chan, 0xe8);
        assert_eq!(Tag::from(0x9a), tag::NOTE_ON);
        assert_eq!(Channel::from(0x9a).number(), 11);
    }

    #[test]
    fn normalized_bend() {
        assert_eq!(pitch_bend::from_normalized(-1f64).unwrap(), [0x00, 0x00]);
        assert_eq!(pitch_bend::from_normalized(1f64).unwrap(), [0x7f, 0x7f]);
        assert_eq!(pitch_bend::from_normalized(0f64).unwrap(), [0x7f, 0x3f]);
        assert!(pitch_bend::from_normalized(1.5f64).is_err());
        assert!(pitch_bend::from_normalized(f64::NAN).is_err());
    }

    #[test]
    fn bend_from_wire() {
        assert_eq!(pitch_bend::from_le(0x7f, 0x7f), pitch_bend::MAX);
        assert_eq!(pitch_bend::from_le(0x00, 0x40), 0x2000);
    }
}
