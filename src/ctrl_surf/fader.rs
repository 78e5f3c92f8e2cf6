use crossbeam_channel as channel;

use super::{
    notify::{Changed, Listeners, StateChange},
    protocol::mcu,
    range::Bounded,
    Control, ControlId, Disposable, Error, Lifecycle, Notification,
};
use crate::midi::{Channel, Event, EventClass, Port, Subscription};

#[derive(Clone, Copy, Debug)]
pub struct FaderOptions {
    pub min: i32,
    pub max: i32,
    pub value: i32,
    /// Whether the device moves the fader to reflect the value.
    pub motorized: bool,
}

impl Default for FaderOptions {
    fn default() -> Self {
        Self {
            min: 0,
            max: 127,
            value: 50,
            motorized: false,
        }
    }
}

/// A bounded integer driven by an absolute Pitch-Bend fader.
#[derive(Debug)]
pub struct Fader {
    chan: Channel,
    motorized: bool,
    range: Bounded,
    port: Port,
    subscriptions: [Subscription; 1],
    listeners: Listeners,
    lifecycle: Lifecycle,
}

impl Fader {
    /// `chan_number` is the Pitch-Bend channel, from 1 to 16.
    pub fn try_new(port: &Port, chan_number: u8, options: FaderOptions) -> Result<Self, Error> {
        let chan = Channel::try_from_number(chan_number)?;

        if !port.is_connected() {
            return Err(Error::NotConnected);
        }

        let mut this = Self {
            chan,
            motorized: options.motorized,
            range: Bounded::try_new(options.min, options.max, options.value)?,
            port: port.clone(),
            subscriptions: [Subscription::new(EventClass::PitchBend, chan)],
            listeners: Listeners::new(ControlId::Fader(chan)),
            lifecycle: Lifecycle::default(),
        };

        this.refresh();

        Ok(this)
    }

    pub fn chan(&self) -> Channel {
        self.chan
    }

    pub fn is_motorized(&self) -> bool {
        self.motorized
    }

    pub fn min(&self) -> i32 {
        self.range.min()
    }

    pub fn max(&self) -> i32 {
        self.range.max()
    }

    pub fn value(&self) -> i32 {
        self.range.value()
    }

    pub fn set_value(&mut self, value: i32) {
        if !self.check_active() {
            return;
        }

        let changes = self.range.set_value(value);
        self.apply(changes);
    }

    pub fn set_min(&mut self, min: i32) {
        if !self.check_active() {
            return;
        }

        let changes = self.range.set_min(min);
        self.apply(changes);
    }

    pub fn set_max(&mut self, max: i32) {
        if !self.check_active() {
            return;
        }

        let changes = self.range.set_max(max);
        self.apply(changes);
    }

    pub fn set_range(&mut self, min: i32, max: i32) -> Result<(), Error> {
        if self.lifecycle.is_disposed() {
            return Err(Error::Disposed(self.id()));
        }

        let changes = self.range.set_range(min, max)?;
        self.apply(changes);

        Ok(())
    }

    pub fn set_motorized(&mut self, motorized: bool) {
        if !self.check_active() {
            return;
        }

        if let Some(changed) = Changed::new(self.motorized, motorized) {
            self.motorized = motorized;
            self.refresh();
            self.listeners.changed(StateChange::Motorized(changed));
        }
    }

    /// Maps the 7 most significant bits of the bend onto `[min, max]`.
    pub fn decode(&self, msb: u8) -> i32 {
        let (min, max) = (self.range.min(), self.range.max());
        let span = max as f64 - min as f64;
        let ratio = msb.min(mcu::fader::MSB_MAX) as f64 / mcu::fader::MSB_MAX as f64;

        let value = (span * ratio).round() as i64 + min as i64;

        value.clamp(min as i64, max as i64) as i32
    }

    /// The bend matching the value, from -1 to 1.
    pub fn bend(&self) -> f64 {
        self.range.fraction() * 2f64 - 1f64
    }

    fn apply(&mut self, changes: Vec<StateChange>) {
        if changes.is_empty() {
            return;
        }

        self.refresh();
        for change in changes {
            self.listeners.changed(change);
        }
    }

    fn check_active(&self) -> bool {
        if self.lifecycle.is_disposed() {
            log::warn!("Ignoring update of disposed {}", self.id());
            return false;
        }

        true
    }
}

impl Control for Fader {
    fn id(&self) -> ControlId {
        ControlId::Fader(self.chan)
    }

    fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    fn handle(&mut self, event: &Event) {
        if let Event::PitchBend { value, .. } = *event {
            let msb = (value >> 7) as u8;
            self.set_value(self.decode(msb));
        }
    }

    fn refresh(&mut self) {
        if !self.motorized || self.lifecycle.is_disposed() {
            return;
        }

        if let Err(err) = self.port.send_pitch_bend(self.bend(), self.chan) {
            log::error!("{}: couldn't move fader: {err}", self.id());
        }
    }

    fn connect(&mut self, listener: channel::Sender<Notification>) {
        if !self.lifecycle.is_disposed() {
            self.listeners.connect(listener);
        }
    }
}

impl Disposable for Fader {
    fn dispose(&mut self) {
        self.lifecycle.dispose(&mut self.listeners);
    }

    fn is_disposed(&self) -> bool {
        self.lifecycle.is_disposed()
    }
}
