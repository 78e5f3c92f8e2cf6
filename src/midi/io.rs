use crossbeam_channel as channel;
use std::sync::Arc;

use super::{Error, Msg, Output};

/// An open midir output connection.
pub struct MidiOut(midir::MidiOutputConnection);

impl Output for MidiOut {
    fn send(&mut self, msg: &Msg) -> Result<(), Error> {
        self.0.send(msg.inner()).map_err(|err| {
            log::error!("Failed to send MIDI msg {msg}: {err}");
            err
        })?;

        Ok(())
    }
}

impl MidiOut {
    pub fn connect(client_name: &str, port_name: &str) -> Result<Self, Error> {
        let midi_output = midir::MidiOutput::new(client_name)?;

        let mut found = None;
        for port in midi_output.ports() {
            let name = midi_output.port_name(&port)?;
            if name.contains(port_name) {
                found = Some((Arc::<str>::from(name), port));
                break;
            }
        }

        let (name, port) = found.ok_or_else(|| Error::PortNotFound(port_name.into()))?;
        let conn = midi_output.connect(&port, client_name).map_err(|_| {
            let err = Error::Connection(name.clone());
            log::error!("{err}");
            err
        })?;

        log::info!("Connected for Output to {name}");

        Ok(Self(conn))
    }

    pub fn close(self) {
        let _midi_output = self.0.close();
        log::debug!("Closed MIDI output connection");
    }
}

/// An open midir input connection forwarding raw msgs to a channel.
///
/// The midir callback runs on its own thread, the receiving end
/// is handled by the [`Session`](crate::session::Session) loop.
pub struct MidiIn(midir::MidiInputConnection<channel::Sender<Msg>>);

impl MidiIn {
    pub fn connect(
        client_name: &str,
        port_name: &str,
        msg_tx: channel::Sender<Msg>,
    ) -> Result<Self, Error> {
        let midi_input = midir::MidiInput::new(client_name)?;

        let mut found = None;
        for port in midi_input.ports() {
            let name = midi_input.port_name(&port)?;
            if name.contains(port_name) {
                found = Some((Arc::<str>::from(name), port));
                break;
            }
        }

        let (name, port) = found.ok_or_else(|| Error::PortNotFound(port_name.into()))?;
        let conn = midi_input
            .connect(
                &port,
                client_name,
                |_ts, buf, msg_tx| {
                    let _ = msg_tx.send(Msg::from(buf));
                },
                msg_tx,
            )
            .map_err(|_| {
                let err = Error::Connection(name.clone());
                log::error!("{err}");
                err
            })?;

        log::info!("Connected for Input to {name}");

        Ok(Self(conn))
    }

    pub fn close(self) {
        let (_midi_input, _msg_tx) = self.0.close();
        log::debug!("Closed MIDI input connection");
    }
}
