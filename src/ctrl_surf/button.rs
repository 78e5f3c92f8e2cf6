use crossbeam_channel as channel;

use super::{
    notify::{Changed, Listeners, StateChange},
    protocol::mcu,
    Control, ControlId, Disposable, Error, Lifecycle, Notification,
};
use crate::midi::{Event, EventClass, Port, Subscription};

/// How a button reacts to presses.
///
/// * `Momentary`: the state flips on press and flips back on release.
/// * `Toggle`: each full click flips the state.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ButtonMode {
    #[default]
    Momentary,
    Toggle,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Light {
    Off,
    Blink,
    On,
}

impl From<Light> for u8 {
    fn from(light: Light) -> u8 {
        use mcu::button::*;
        match light {
            Light::Off => OFF,
            Light::Blink => BLINK,
            Light::On => ON,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ButtonOptions {
    pub mode: ButtonMode,
    /// Whether the button has an LED reflecting its state.
    pub light: bool,
}

impl Default for ButtonOptions {
    fn default() -> Self {
        Self {
            mode: ButtonMode::Momentary,
            light: true,
        }
    }
}

impl ButtonOptions {
    pub fn toggle() -> Self {
        Self {
            mode: ButtonMode::Toggle,
            ..Default::default()
        }
    }
}

#[derive(Debug)]
pub struct Button {
    control: u8,
    mode: ButtonMode,
    light: bool,
    toggled: bool,
    port: Port,
    subscriptions: [Subscription; 2],
    listeners: Listeners,
    lifecycle: Lifecycle,
}

impl Button {
    pub fn try_new(port: &Port, control: u8, options: ButtonOptions) -> Result<Self, Error> {
        if control > crate::midi::DATA_MAX {
            return Err(Error::InvalidControl(control));
        }

        if !port.is_connected() {
            return Err(Error::NotConnected);
        }

        Ok(Self {
            control,
            mode: options.mode,
            light: options.light,
            toggled: false,
            port: port.clone(),
            subscriptions: [
                Subscription::new(EventClass::NoteOn, mcu::CHAN).with_number(control),
                Subscription::new(EventClass::NoteOff, mcu::CHAN).with_number(control),
            ],
            listeners: Listeners::new(ControlId::Button(control)),
            lifecycle: Lifecycle::default(),
        })
    }

    pub fn control(&self) -> u8 {
        self.control
    }

    pub fn mode(&self) -> ButtonMode {
        self.mode
    }

    pub fn has_light(&self) -> bool {
        self.light
    }

    pub fn is_toggled(&self) -> bool {
        self.toggled
    }

    pub fn set_toggled(&mut self, toggled: bool) {
        if self.lifecycle.is_disposed() {
            log::warn!("Attempt to toggle disposed {}", self.id());
            return;
        }

        if let Some(changed) = Changed::new(self.toggled, toggled) {
            self.toggled = toggled;
            self.refresh();
            self.listeners.changed(StateChange::Toggled(changed));
        }
    }

    pub fn set_mode(&mut self, mode: ButtonMode) {
        if self.lifecycle.is_disposed() {
            log::warn!("Attempt to change mode of disposed {}", self.id());
            return;
        }

        if let Some(changed) = Changed::new(self.mode, mode) {
            self.mode = mode;
            self.refresh();
            self.listeners.changed(StateChange::Mode(changed));
        }
    }

    /// Enables or disables LED feedback for future updates.
    pub fn set_has_light(&mut self, light: bool) {
        self.light = light;
    }

    pub fn set_light(&mut self, light: Light) {
        if !self.light || self.lifecycle.is_disposed() {
            return;
        }

        if let Err(err) = self.port.send_note(self.control, mcu::CHAN, light.into()) {
            log::error!("{}: couldn't set light: {err}", self.id());
        }
    }

    fn press(&mut self) {
        if self.mode == ButtonMode::Momentary {
            self.set_toggled(!self.toggled);
        }
    }

    fn release(&mut self) {
        self.listeners.click();
        self.set_toggled(!self.toggled);
    }
}

impl Control for Button {
    fn id(&self) -> ControlId {
        ControlId::Button(self.control)
    }

    fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    fn handle(&mut self, event: &Event) {
        match event {
            Event::NoteOn { .. } => self.press(),
            Event::NoteOff { .. } => self.release(),
            _ => (),
        }
    }

    fn refresh(&mut self) {
        self.set_light(if self.toggled { Light::On } else { Light::Off });
    }

    fn connect(&mut self, listener: channel::Sender<Notification>) {
        if !self.lifecycle.is_disposed() {
            self.listeners.connect(listener);
        }
    }
}

impl Disposable for Button {
    fn dispose(&mut self) {
        self.lifecycle.dispose(&mut self.listeners);
    }

    fn is_disposed(&self) -> bool {
        self.lifecycle.is_disposed()
    }
}
