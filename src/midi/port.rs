use std::{cell::RefCell, fmt, rc::Rc};

use super::{Channel, Error, Msg};

/// The sending half of a device connection.
pub trait Output {
    fn is_connected(&self) -> bool {
        true
    }

    fn send(&mut self, msg: &Msg) -> Result<(), Error>;
}

/// Shared handle on the connection to one physical device.
///
/// Every control attached to the device holds a clone. Dispatch is
/// single threaded, so the handle is neither `Send` nor `Sync`.
#[derive(Clone)]
pub struct Port {
    out: Rc<RefCell<dyn Output>>,
}

impl fmt::Debug for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Port")
            .field("is_connected", &self.is_connected())
            .finish()
    }
}

impl Port {
    pub fn new(out: impl Output + 'static) -> Self {
        Self {
            out: Rc::new(RefCell::new(out)),
        }
    }

    pub fn from_shared(out: Rc<RefCell<dyn Output>>) -> Self {
        Self { out }
    }

    pub fn is_connected(&self) -> bool {
        self.out.borrow().is_connected()
    }

    pub fn send(&self, msg: Msg) -> Result<(), Error> {
        log::trace!("Sending {msg}");

        let mut out = self.out.borrow_mut();
        if !out.is_connected() {
            return Err(Error::NotConnected);
        }

        out.send(&msg)
    }

    pub fn send_note(&self, number: u8, chan: Channel, velocity: u8) -> Result<(), Error> {
        self.send(Msg::note_on(number, velocity, chan))
    }

    pub fn send_control_change(&self, number: u8, value: u8, chan: Channel) -> Result<(), Error> {
        self.send(Msg::control_change(number, value, chan))
    }

    pub fn send_pitch_bend(&self, normalized: f64, chan: Channel) -> Result<(), Error> {
        self.send(Msg::pitch_bend(normalized, chan)?)
    }

    pub fn send_channel_mode(&self, command: u8, value: u8, chan: Channel) -> Result<(), Error> {
        self.send(Msg::channel_mode(command, value, chan)?)
    }
}
