pub mod button;
pub use button::{Button, ButtonMode, ButtonOptions, Light};

pub mod button_group;
pub use button_group::ButtonGroup;

pub mod device;
pub use device::XTouchMini;

pub mod error;
pub use error::Error;

pub mod fader;
pub use fader::{Fader, FaderOptions};

pub mod lifecycle;
pub use lifecycle::{Disposable, Lifecycle};

pub mod notify;
pub use notify::{Changed, ControlId, Notification, StateChange};

pub mod protocol;

pub mod range;

pub mod rotary;
pub use rotary::{LightMode, Rotary, RotaryOptions};

use crossbeam_channel as channel;

use crate::midi::{Event, Subscription};

/// A stateful control bound to a device [`Port`](crate::midi::Port).
pub trait Control: Disposable {
    fn id(&self) -> ControlId;

    /// The inbound events this control reacts to.
    fn subscriptions(&self) -> &[Subscription];

    /// Handles an event matching one of the [`Control::subscriptions`].
    fn handle(&mut self, event: &Event);

    /// Re-sends the control's state to the device.
    fn refresh(&mut self);

    fn connect(&mut self, listener: channel::Sender<Notification>);

    /// Hands the event over to [`Control::handle`] if subscribed.
    ///
    /// Returns `true` if the event was handled.
    fn deliver(&mut self, event: &Event) -> bool {
        if self.is_disposed() || !self.subscriptions().iter().any(|sub| sub.matches(event)) {
            return false;
        }

        self.handle(event);

        true
    }
}
