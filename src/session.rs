//! Single threaded dispatch between the device and its owner.
//!
//! Inbound MIDI msgs and requests from the owner (usually some UI
//! mirroring the controls) are handled one at a time, in order.

use crossbeam_channel as channel;
use std::ops::ControlFlow;

use crate::{
    ctrl_surf::{self, ButtonMode, ControlId, Disposable, LightMode, XTouchMini},
    midi,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("MIDI error: {}", .0)]
    Midi(#[from] midi::Error),

    #[error("Control surface error: {}", .0)]
    CtrlSurf(#[from] ctrl_surf::Error),

    #[error("Unknown control: {}", .0)]
    UnknownControl(ControlId),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Request {
    SetToggled { note: u8, toggled: bool },
    SetButtonMode { note: u8, mode: ButtonMode },
    SetRotaryValue { control: u8, value: i32 },
    SetRotaryRange { control: u8, min: i32, max: i32 },
    SetLightMode { control: u8, light_mode: LightMode },
    SetFaderValue(i32),
    SetFaderRange { min: i32, max: i32 },
    SetMotorized(bool),
    Refresh,
    Shutdown,
}

pub struct Session {
    device: XTouchMini,
    err_tx: channel::Sender<Error>,
}

impl Session {
    pub fn new(device: XTouchMini, err_tx: channel::Sender<Error>) -> Self {
        Self { device, err_tx }
    }

    pub fn device(&self) -> &XTouchMini {
        &self.device
    }

    pub fn handle_msg(&mut self, msg: &midi::Msg) {
        match self.device.handle_msg(msg) {
            Ok(_) => (),
            Err(midi::Error::UnsupportedMsg(_)) => log::trace!("Ignoring {msg}"),
            Err(err) => {
                log::warn!("{err}");
                let _ = self.err_tx.send(err.into());
            }
        }
    }

    pub fn handle_request(&mut self, request: Request) -> Result<ControlFlow<(), ()>, Error> {
        use Request::*;

        match request {
            SetToggled { note, toggled } => self.button(note)?.set_toggled(toggled),
            SetButtonMode { note, mode } => self.button(note)?.set_mode(mode),
            SetRotaryValue { control, value } => self.rotary(control)?.set_value(value),
            SetRotaryRange { control, min, max } => self.rotary(control)?.set_range(min, max)?,
            SetLightMode {
                control,
                light_mode,
            } => self.rotary(control)?.set_light_mode(light_mode),
            SetFaderValue(value) => self.device.fader_mut().set_value(value),
            SetFaderRange { min, max } => self.device.fader_mut().set_range(min, max)?,
            SetMotorized(motorized) => self.device.fader_mut().set_motorized(motorized),
            Refresh => self.device.refresh(),
            Shutdown => return Ok(ControlFlow::Break(())),
        }

        Ok(ControlFlow::Continue(()))
    }

    fn button(&mut self, note: u8) -> Result<&mut ctrl_surf::Button, Error> {
        self.device
            .button_mut(note)
            .ok_or(Error::UnknownControl(ControlId::Button(note)))
    }

    fn rotary(&mut self, control: u8) -> Result<&mut ctrl_surf::Rotary, Error> {
        self.device
            .rotary_mut(control)
            .ok_or(Error::UnknownControl(ControlId::Rotary(control)))
    }

    /// Runs until `Shutdown` is requested or one of the channels disconnects.
    ///
    /// The device is disposed on exit.
    pub fn run(
        mut self,
        midi_rx: channel::Receiver<midi::Msg>,
        req_rx: channel::Receiver<Request>,
    ) -> XTouchMini {
        loop {
            channel::select! {
                recv(midi_rx) -> msg => {
                    match msg {
                        Ok(msg) => self.handle_msg(&msg),
                        Err(err) => {
                            log::error!("Error MIDI msg channel: {err}");
                            break;
                        }
                    }
                }
                recv(req_rx) -> request => {
                    match request {
                        Ok(request) => match self.handle_request(request) {
                            Ok(ControlFlow::Continue(())) => (),
                            Ok(ControlFlow::Break(())) => break,
                            Err(err) => {
                                log::error!("{err}");
                                let _ = self.err_tx.send(err);
                            }
                        },
                        Err(err) => {
                            log::error!("Error request channel: {err}");
                            break;
                        }
                    }
                }
            }
        }

        log::debug!("Shutting down session loop");
        self.device.dispose();

        self.device
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ctrl_surf::Notification, midi::port::recorder};

    fn session() -> (
        Session,
        channel::Receiver<Error>,
        std::rc::Rc<std::cell::RefCell<recorder::Recorder>>,
    ) {
        let (port, recorder) = recorder::port();
        let device = XTouchMini::try_new(port).unwrap();
        recorder.borrow_mut().take();

        let (err_tx, err_rx) = channel::unbounded();

        (Session::new(device, err_tx), err_rx, recorder)
    }

    #[test]
    fn requests() {
        let (mut session, _err_rx, recorder) = session();

        let flow = session
            .handle_request(Request::SetToggled {
                note: 0x5f,
                toggled: true,
            })
            .unwrap();
        assert_eq!(flow, ControlFlow::Continue(()));
        assert_eq!(recorder.borrow_mut().take(), vec![vec![0x90, 0x5f, 0x7f]]);

        session
            .handle_request(Request::SetRotaryRange {
                control: 0x10,
                min: 0,
                max: 10,
            })
            .unwrap();
        assert_eq!(session.device().rotaries()[0].value(), 10);

        session.handle_request(Request::SetMotorized(true)).unwrap();
        session.handle_request(Request::SetFaderValue(127)).unwrap();
        assert_eq!(recorder.borrow_mut().take().last().unwrap(), &vec![0xe8, 0x7f, 0x7f]);

        assert_eq!(
            session.handle_request(Request::Shutdown).unwrap(),
            ControlFlow::Break(())
        );
    }

    #[test]
    fn request_errors() {
        let (mut session, _err_rx, _recorder) = session();

        assert!(matches!(
            session.handle_request(Request::SetToggled {
                note: 0x00,
                toggled: true
            }),
            Err(Error::UnknownControl(ControlId::Button(0x00)))
        ));
        assert!(matches!(
            session.handle_request(Request::SetFaderRange { min: 1, max: 0 }),
            Err(Error::CtrlSurf(ctrl_surf::Error::InvalidRange { .. }))
        ));
    }

    #[test]
    fn malformed_msgs_are_reported() {
        let (mut session, err_rx, _recorder) = session();

        session.handle_msg(&midi::Msg::from([0xf8u8].as_slice()));
        assert!(err_rx.try_recv().is_err());

        session.handle_msg(&midi::Msg::from([0xb0, 0x10]));
        assert!(matches!(
            err_rx.try_recv().unwrap(),
            Error::Midi(midi::Error::Truncated(_))
        ));
    }

    #[test]
    fn run_until_shutdown() {
        let (mut session, _err_rx, recorder) = session();
        let (notif_tx, notif_rx) = channel::unbounded();
        session.device.connect(notif_tx);

        let (midi_tx, midi_rx) = channel::unbounded();
        let (req_tx, req_rx) = channel::unbounded();

        midi_tx.send(midi::Msg::from([0xb0, 0x10, 0x02])).unwrap();
        req_tx.send(Request::Shutdown).unwrap();

        // select! picks among ready channels at random,
        // so the msg may or may not be processed first.
        let device = session.run(midi_rx, req_rx);
        assert!(device.is_disposed());

        let value = device.rotaries()[0].value();
        assert!(value == 50 || value == 52);

        let notifications: Vec<_> = notif_rx.try_iter().collect();
        assert!(matches!(notifications.last(), Some(Notification::Disposed(_))));
        drop(recorder);
    }

    #[test]
    fn run_until_disconnected() {
        let (session, _err_rx, _recorder) = session();

        let (midi_tx, midi_rx) = channel::unbounded();
        let (_req_tx, req_rx) = channel::unbounded();

        for _ in 0..3 {
            midi_tx.send(midi::Msg::from([0xb0, 0x10, 0x01])).unwrap();
        }
        drop(midi_tx);

        let device = session.run(midi_rx, req_rx);
        assert_eq!(device.rotaries()[0].value(), 53);
    }
}
