//! Inbound MIDI events and the filters controls subscribe with.

use super::{is_data_byte, pitch_bend, tag, Channel, Error, Msg, Tag};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EventClass {
    NoteOn,
    NoteOff,
    ControlChange,
    PitchBend,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Event {
    NoteOn {
        chan: Channel,
        note: u8,
        velocity: u8,
    },
    NoteOff {
        chan: Channel,
        note: u8,
        velocity: u8,
    },
    ControlChange {
        chan: Channel,
        controller: u8,
        value: u8,
    },
    PitchBend {
        chan: Channel,
        value: u16,
    },
}

impl Event {
    pub fn class(&self) -> EventClass {
        match self {
            Event::NoteOn { .. } => EventClass::NoteOn,
            Event::NoteOff { .. } => EventClass::NoteOff,
            Event::ControlChange { .. } => EventClass::ControlChange,
            Event::PitchBend { .. } => EventClass::PitchBend,
        }
    }

    pub fn chan(&self) -> Channel {
        match *self {
            Event::NoteOn { chan, .. }
            | Event::NoteOff { chan, .. }
            | Event::ControlChange { chan, .. }
            | Event::PitchBend { chan, .. } => chan,
        }
    }

    /// The note or controller number, if the event carries one.
    pub fn number(&self) -> Option<u8> {
        match *self {
            Event::NoteOn { note, .. } | Event::NoteOff { note, .. } => Some(note),
            Event::ControlChange { controller, .. } => Some(controller),
            Event::PitchBend { .. } => None,
        }
    }
}

impl TryFrom<&Msg> for Event {
    type Error = Error;

    fn try_from(msg: &Msg) -> Result<Self, Error> {
        let buf = msg.inner();

        let (&status, data) = buf
            .split_first()
            .ok_or_else(|| Error::Truncated(msg.display().to_owned()))?;

        // System messages share the upper nibble 0xf0.
        if is_data_byte(status) || status >= 0xf0 {
            return Err(Error::UnsupportedMsg(msg.display().to_owned()));
        }

        let chan = Channel::from(status);
        let msg_tag = Tag::from(status);
        let supported = [tag::NOTE_OFF, tag::NOTE_ON, tag::CONTROL_CHANGE, tag::PITCH_BEND];
        if !supported.contains(&msg_tag) {
            return Err(Error::UnsupportedMsg(msg.display().to_owned()));
        }

        let (d1, d2) = match data {
            [d1, d2, ..] => (*d1, *d2),
            _ => return Err(Error::Truncated(msg.display().to_owned())),
        };

        if !is_data_byte(d1) || !is_data_byte(d2) {
            return Err(Error::InvalidDataByte(msg.display().to_owned()));
        }

        let event = match msg_tag {
            tag::NOTE_ON if d2 == 0 => Event::NoteOff {
                chan,
                note: d1,
                velocity: 0,
            },
            tag::NOTE_ON => Event::NoteOn {
                chan,
                note: d1,
                velocity: d2,
            },
            tag::NOTE_OFF => Event::NoteOff {
                chan,
                note: d1,
                velocity: d2,
            },
            tag::CONTROL_CHANGE => Event::ControlChange {
                chan,
                controller: d1,
                value: d2,
            },
            _ => Event::PitchBend {
                chan,
                value: pitch_bend::from_le(d1, d2),
            },
        };

        Ok(event)
    }
}

/// What a control listens to: an event class on a channel,
/// optionally narrowed to a note or controller number.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Subscription {
    pub class: EventClass,
    pub chan: Channel,
    pub number: Option<u8>,
}

impl Subscription {
    pub fn new(class: EventClass, chan: Channel) -> Self {
        Self {
            class,
            chan,
            number: None,
        }
    }

    pub fn with_number(mut self, number: u8) -> Self {
        self.number = Some(number);
        self
    }

    pub fn matches(&self, event: &Event) -> bool {
        if event.class() != self.class || event.chan() != self.chan {
            return false;
        }

        match self.number {
            Some(number) => event.number() == Some(number),
            None => true,
        }
    }
}
