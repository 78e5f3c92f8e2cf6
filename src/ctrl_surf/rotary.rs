use crossbeam_channel as channel;

use super::{
    notify::{Changed, Listeners, StateChange},
    protocol::mcu,
    range::Bounded,
    Control, ControlId, Disposable, Error, Lifecycle, Notification,
};
use crate::midi::{Event, EventClass, Port, Subscription};

/// How the LED ring around the encoder shows the value.
///
/// * `Single`: a single segment at the value.
/// * `Trim`: segments from the top to the value.
/// * `Wrap`: segments from the left to the value.
/// * `Spread`: segments from the top down both sides.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LightMode {
    #[default]
    Single,
    Trim,
    Wrap,
    Spread,
}

impl LightMode {
    fn base(self) -> u8 {
        use mcu::rotary::*;
        match self {
            LightMode::Single => BASE_SINGLE,
            LightMode::Trim => BASE_TRIM,
            LightMode::Wrap => BASE_WRAP,
            LightMode::Spread => BASE_SPREAD,
        }
    }

    fn factor(self) -> f64 {
        match self {
            LightMode::Spread => mcu::rotary::FACTOR_SPREAD,
            _ => mcu::rotary::FACTOR,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RotaryOptions {
    pub light_mode: LightMode,
    pub min: i32,
    pub max: i32,
    pub value: i32,
}

impl Default for RotaryOptions {
    fn default() -> Self {
        Self {
            light_mode: LightMode::Single,
            min: 0,
            max: 100,
            value: 50,
        }
    }
}

/// Decodes a relative encoder increment.
///
/// Bit 6 is the sign, bits 0 to 5 the magnitude.
pub fn decode_increment(payload: u8) -> i32 {
    use mcu::rotary::*;

    let magnitude = (payload & MAGNITUDE) as i32;
    if payload & SIGN == SIGN {
        -magnitude
    } else {
        magnitude
    }
}

/// A bounded integer driven by a relative encoder, shown on an LED ring.
#[derive(Debug)]
pub struct Rotary {
    control: u8,
    light_mode: LightMode,
    range: Bounded,
    port: Port,
    subscriptions: [Subscription; 1],
    listeners: Listeners,
    lifecycle: Lifecycle,
}

impl Rotary {
    pub fn try_new(port: &Port, control: u8, options: RotaryOptions) -> Result<Self, Error> {
        if control > crate::midi::DATA_MAX {
            return Err(Error::InvalidControl(control));
        }

        if !port.is_connected() {
            return Err(Error::NotConnected);
        }

        let mut this = Self {
            control,
            light_mode: options.light_mode,
            range: Bounded::try_new(options.min, options.max, options.value)?,
            port: port.clone(),
            subscriptions: [
                Subscription::new(EventClass::ControlChange, mcu::CHAN).with_number(control)
            ],
            listeners: Listeners::new(ControlId::Rotary(control)),
            lifecycle: Lifecycle::default(),
        };

        this.refresh();

        Ok(this)
    }

    pub fn control(&self) -> u8 {
        self.control
    }

    pub fn light_mode(&self) -> LightMode {
        self.light_mode
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

    /// Sets the min, bumping the value and the max if needed.
    pub fn set_min(&mut self, min: i32) {
        if !self.check_active() {
            return;
        }

        let changes = self.range.set_min(min);
        self.apply(changes);
    }

    /// Sets the max, lowering the value and the min if needed.
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

    pub fn set_light_mode(&mut self, light_mode: LightMode) {
        if !self.check_active() {
            return;
        }

        if let Some(changed) = Changed::new(self.light_mode, light_mode) {
            self.light_mode = light_mode;
            self.refresh();
            self.listeners.changed(StateChange::LightMode(changed));
        }
    }

    /// Number of lit segments, from 1 to 11.
    pub fn led_count(&self) -> u8 {
        (self.range.fraction() * self.light_mode.factor()).floor() as u8 + 1
    }

    /// The Control-Change value driving the LED ring.
    pub fn ring_value(&self) -> u8 {
        self.light_mode.base() + self.led_count()
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

impl Control for Rotary {
    fn id(&self) -> ControlId {
        ControlId::Rotary(self.control)
    }

    fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    fn handle(&mut self, event: &Event) {
        if let Event::ControlChange { value, .. } = *event {
            let increment = decode_increment(value);
            log::trace!("{}: increment {increment}", self.id());
            self.set_value(self.range.value().saturating_add(increment));
        }
    }

    fn refresh(&mut self) {
        if self.lifecycle.is_disposed() {
            return;
        }

        let number = mcu::rotary::RING_OFFSET + self.control;
        if let Err(err) = self
            .port
            .send_control_change(number, self.ring_value(), mcu::CHAN)
        {
            log::error!("{}: couldn't refresh LED ring: {err}", self.id());
        }
    }

    fn connect(&mut self, listener: channel::Sender<Notification>) {
        if !self.lifecycle.is_disposed() {
            self.listeners.connect(listener);
        }
    }
}

impl Disposable for Rotary {
    fn dispose(&mut self) {
        self.lifecycle.dispose(&mut self.listeners);
    }

    fn is_disposed(&self) -> bool {
        self.lifecycle.is_disposed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::{port::recorder, Channel};

    fn cc(controller: u8, value: u8) -> Event {
        Event::ControlChange {
            chan: Channel::ONE,
            controller,
            value,
        }
    }

    fn values(rx: &channel::Receiver<Notification>) -> Vec<(i32, i32)> {
        rx.try_iter()
            .filter_map(|notification| match notification {
                Notification::StateChanged {
                    change: StateChange::Value(changed),
                    ..
                } => Some((changed.old_value, changed.new_value)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn increments() {
        assert_eq!(decode_increment(0x01), 1);
        assert_eq!(decode_increment(0x02), 2);
        assert_eq!(decode_increment(0x3f), 63);
        assert_eq!(decode_increment(0x41), -1);
        assert_eq!(decode_increment(0x7f), -63);
        assert_eq!(decode_increment(0x40), 0);
    }

    #[test]
    fn relative_input() {
        let (port, recorder) = recorder::port();
        let options = RotaryOptions {
            value: 0,
            ..Default::default()
        };
        let mut rotary = Rotary::try_new(&port, 0x10, options).unwrap();
        assert_eq!(recorder.borrow_mut().take(), vec![vec![0xb0, 0x30, 0x01]]);

        let (tx, rx) = channel::unbounded();
        rotary.connect(tx);

        assert!(rotary.deliver(&cc(0x10, 0x02)));
        assert_eq!(rotary.value(), 2);
        assert_eq!(values(&rx), vec![(0, 2)]);
        // floor(0.02 * 10.999999) + 1
        assert_eq!(recorder.borrow_mut().take(), vec![vec![0xb0, 0x30, 0x01]]);

        rotary.deliver(&cc(0x10, 0x41));
        assert_eq!(rotary.value(), 1);
    }

    #[test]
    fn input_is_clamped() {
        let (port, recorder) = recorder::port();
        let mut rotary = Rotary::try_new(&port, 0x11, RotaryOptions::default()).unwrap();
        let (tx, rx) = channel::unbounded();
        rotary.connect(tx);

        rotary.deliver(&cc(0x11, 0x3f));
        assert_eq!(rotary.value(), 100);
        rotary.deliver(&cc(0x11, 0x01));
        assert_eq!(rotary.value(), 100);
        assert_eq!(values(&rx), vec![(50, 100)]);

        recorder.borrow_mut().take();
        rotary.deliver(&cc(0x12, 0x41));
        assert_eq!(rotary.value(), 100);
        assert!(recorder.borrow().sent.is_empty());
    }

    #[test]
    fn ring_output() {
        let (port, recorder) = recorder::port();
        let mut rotary = Rotary::try_new(&port, 0x10, RotaryOptions::default()).unwrap();

        assert_eq!(rotary.led_count(), 6);
        assert_eq!(recorder.borrow_mut().take(), vec![vec![0xb0, 0x30, 0x06]]);

        rotary.set_value(100);
        assert_eq!(rotary.led_count(), 11);

        rotary.set_light_mode(LightMode::Spread);
        assert_eq!(rotary.led_count(), 7);
        assert_eq!(rotary.ring_value(), 0x37);

        rotary.set_light_mode(LightMode::Trim);
        rotary.set_value(0);
        assert_eq!(rotary.ring_value(), 0x11);

        rotary.set_light_mode(LightMode::Wrap);
        assert_eq!(
            recorder.borrow_mut().take(),
            vec![
                vec![0xb0, 0x30, 0x0b],
                vec![0xb0, 0x30, 0x37],
                vec![0xb0, 0x30, 0x1b],
                vec![0xb0, 0x30, 0x11],
                vec![0xb0, 0x30, 0x21],
            ]
        );
    }

    #[test]
    fn degenerate_range() {
        let (port, _recorder) = recorder::port();
        let options = RotaryOptions {
            min: 5,
            max: 5,
            value: 5,
            ..Default::default()
        };
        let rotary = Rotary::try_new(&port, 0x10, options).unwrap();

        assert_eq!(rotary.led_count(), 1);
    }

    #[test]
    fn ring_over_full_i32_span() {
        let (port, recorder) = recorder::port();
        let options = RotaryOptions {
            min: i32::MIN,
            max: i32::MAX,
            value: 0,
            ..Default::default()
        };
        let mut rotary = Rotary::try_new(&port, 0x10, options).unwrap();
        assert_eq!(recorder.borrow_mut().take(), vec![vec![0xb0, 0x30, 0x06]]);

        rotary.deliver(&cc(0x10, 0x3f));
        assert_eq!(rotary.value(), 63);

        rotary.set_value(i32::MAX);
        assert_eq!(rotary.led_count(), 11);
        rotary.deliver(&cc(0x10, 0x01));
        assert_eq!(rotary.value(), i32::MAX);
    }

    #[test]
    fn bound_cascade_notifies() {
        let (port, recorder) = recorder::port();
        let mut rotary = Rotary::try_new(&port, 0x10, RotaryOptions::default()).unwrap();
        recorder.borrow_mut().take();
        let (tx, rx) = channel::unbounded();
        rotary.connect(tx);

        rotary.set_min(120);
        assert_eq!((rotary.min(), rotary.value(), rotary.max()), (120, 120, 120));

        let names: Vec<_> = rx
            .try_iter()
            .filter_map(|notification| match notification {
                Notification::StateChanged { change, .. } => Some(change.name()),
                _ => None,
            })
            .collect();
        assert_eq!(names, ["value", "max", "min"]);
        // A single refresh for the whole update.
        assert_eq!(recorder.borrow().sent.len(), 1);

        assert!(matches!(
            rotary.set_range(10, 0),
            Err(Error::InvalidRange { min: 10, max: 0 })
        ));
        rotary.set_range(0, 10).unwrap();
        assert_eq!(rotary.value(), 10);
    }

    #[test]
    fn invalid_options() {
        let (port, recorder) = recorder::port();
        let options = RotaryOptions {
            min: 10,
            max: 0,
            ..Default::default()
        };

        assert!(matches!(
            Rotary::try_new(&port, 0x10, options),
            Err(Error::InvalidRange { .. })
        ));
        assert!(recorder.borrow().sent.is_empty());
    }

    #[test]
    fn disposed_is_inert() {
        let (port, recorder) = recorder::port();
        let mut rotary = Rotary::try_new(&port, 0x10, RotaryOptions::default()).unwrap();
        recorder.borrow_mut().take();

        rotary.dispose();

        assert!(!rotary.deliver(&cc(0x10, 0x05)));
        rotary.set_value(10);
        rotary.refresh();
        assert!(matches!(rotary.set_range(0, 1), Err(Error::Disposed(_))));

        assert_eq!(rotary.value(), 50);
        assert!(recorder.borrow().sent.is_empty());
    }
}
