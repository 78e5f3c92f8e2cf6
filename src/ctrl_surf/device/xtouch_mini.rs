use crossbeam_channel as channel;

use crate::{
    ctrl_surf::{
        protocol::mcu, Button, ButtonOptions, Control, Disposable, Error, Fader, FaderOptions,
        Lifecycle, Notification, Rotary, RotaryOptions,
    },
    midi::{self, Event, Msg, Port},
};

/// Behringer X-Touch Mini in MCU mode.
///
/// Owns every control of the device, all bound to the same [`Port`].
#[derive(Debug)]
pub struct XTouchMini {
    port: Port,
    buttons: Vec<Button>,
    side_buttons: Vec<Button>,
    rotary_buttons: Vec<Button>,
    rotaries: Vec<Rotary>,
    fader: Fader,
    lifecycle: Lifecycle,
}

impl XTouchMini {
    pub fn try_new(port: Port) -> Result<Self, Error> {
        if !port.is_connected() {
            return Err(Error::NotConnected);
        }

        {
            use mcu::mode_select::*;
            port.send_channel_mode(COMMAND, MCU, GLOBAL_CHAN)?;
            log::debug!("Requested MCU mode");
        }

        let buttons = Self::build_buttons(&port, &mcu::button::MAIN, ButtonOptions::toggle())?;
        let side_buttons =
            Self::build_buttons(&port, &mcu::button::SIDE, ButtonOptions::default())?;
        let rotary_buttons =
            Self::build_buttons(&port, &mcu::button::ROTARY, ButtonOptions::default())?;

        let rotaries = mcu::rotary::CONTROLS
            .iter()
            .map(|&control| Rotary::try_new(&port, control, RotaryOptions::default()))
            .collect::<Result<Vec<_>, _>>()?;

        let fader = Fader::try_new(&port, mcu::fader::CHAN_NUMBER, FaderOptions::default())?;

        log::info!("X-Touch Mini controls ready");

        Ok(Self {
            port,
            buttons,
            side_buttons,
            rotary_buttons,
            rotaries,
            fader,
            lifecycle: Lifecycle::default(),
        })
    }

    fn build_buttons(
        port: &Port,
        notes: &[u8],
        options: ButtonOptions,
    ) -> Result<Vec<Button>, Error> {
        notes
            .iter()
            .map(|&note| Button::try_new(port, note, options))
            .collect()
    }

    pub fn port(&self) -> &Port {
        &self.port
    }

    /// Main buttons, top row left to right, then bottom row left to right.
    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    /// Left side buttons, top then bottom.
    pub fn side_buttons(&self) -> &[Button] {
        &self.side_buttons
    }

    /// Encoder push buttons, left to right.
    pub fn rotary_buttons(&self) -> &[Button] {
        &self.rotary_buttons
    }

    /// Rotary encoders, left to right.
    pub fn rotaries(&self) -> &[Rotary] {
        &self.rotaries
    }

    pub fn fader(&self) -> &Fader {
        &self.fader
    }

    /// Looks up any button of the device by note number.
    pub fn button_mut(&mut self, note: u8) -> Option<&mut Button> {
        self.buttons
            .iter_mut()
            .chain(self.side_buttons.iter_mut())
            .chain(self.rotary_buttons.iter_mut())
            .find(|button| button.control() == note)
    }

    pub fn rotary_mut(&mut self, control: u8) -> Option<&mut Rotary> {
        self.rotaries
            .iter_mut()
            .find(|rotary| rotary.control() == control)
    }

    pub fn fader_mut(&mut self) -> &mut Fader {
        &mut self.fader
    }

    fn controls_mut(&mut self) -> impl Iterator<Item = &mut dyn Control> + '_ {
        self.buttons
            .iter_mut()
            .chain(self.side_buttons.iter_mut())
            .chain(self.rotary_buttons.iter_mut())
            .map(|button| button as &mut dyn Control)
            .chain(
                self.rotaries
                    .iter_mut()
                    .map(|rotary| rotary as &mut dyn Control),
            )
            .chain(std::iter::once(&mut self.fader as &mut dyn Control))
    }

    /// Hands the event over to the subscribed controls.
    ///
    /// Returns `true` if at least one control handled it.
    pub fn handle(&mut self, event: &Event) -> bool {
        if self.lifecycle.is_disposed() {
            return false;
        }

        let mut handled = false;
        for control in self.controls_mut() {
            handled |= control.deliver(event);
        }

        if !handled {
            log::trace!("No control for {event:?}");
        }

        handled
    }

    pub fn handle_msg(&mut self, msg: &Msg) -> Result<bool, midi::Error> {
        let event = Event::try_from(msg)?;

        Ok(self.handle(&event))
    }

    /// Re-sends the state of every control, e.g. after a reconnection.
    pub fn refresh(&mut self) {
        for control in self.controls_mut() {
            control.refresh();
        }
    }

    /// Connects `listener` to every control.
    pub fn connect(&mut self, listener: channel::Sender<Notification>) {
        for control in self.controls_mut() {
            control.connect(listener.clone());
        }
    }
}

impl Disposable for XTouchMini {
    fn dispose(&mut self) {
        if self.lifecycle.is_disposed() {
            return;
        }

        for control in self.controls_mut() {
            control.dispose();
        }

        self.lifecycle = Lifecycle::Disposed;
        log::debug!("X-Touch Mini disposed");
    }

    fn is_disposed(&self) -> bool {
        self.lifecycle.is_disposed()
    }
}
