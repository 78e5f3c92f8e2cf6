use crossbeam_channel as channel;
use std::fmt;

use super::{ButtonMode, LightMode};
use crate::midi::Channel;

/// Identifies a control by its protocol address.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ControlId {
    Button(u8),
    Rotary(u8),
    Fader(Channel),
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlId::Button(note) => write!(f, "Button {note:#04x}"),
            ControlId::Rotary(cc) => write!(f, "Rotary {cc:#04x}"),
            ControlId::Fader(chan) => write!(f, "Fader (channel {chan})"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Changed<T> {
    pub old_value: T,
    pub new_value: T,
}

impl<T: PartialEq> Changed<T> {
    /// Returns `None` if nothing actually changed.
    pub fn new(old_value: T, new_value: T) -> Option<Self> {
        (old_value != new_value).then(|| Self {
            old_value,
            new_value,
        })
    }
}

/// A named attribute change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StateChange {
    Toggled(Changed<bool>),
    Mode(Changed<ButtonMode>),
    Value(Changed<i32>),
    Min(Changed<i32>),
    Max(Changed<i32>),
    LightMode(Changed<LightMode>),
    Motorized(Changed<bool>),
}

impl StateChange {
    pub fn name(&self) -> &'static str {
        use StateChange::*;
        match self {
            Toggled(_) => "toggled",
            Mode(_) => "mode",
            Value(_) => "value",
            Min(_) => "min",
            Max(_) => "max",
            LightMode(_) => "lightMode",
            Motorized(_) => "motorized",
        }
    }
}

impl fmt::Display for StateChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use StateChange::*;
        match self {
            Toggled(c) | Motorized(c) => {
                write!(f, "{}: {} -> {}", self.name(), c.old_value, c.new_value)
            }
            Value(c) | Min(c) | Max(c) => {
                write!(f, "{}: {} -> {}", self.name(), c.old_value, c.new_value)
            }
            Mode(c) => write!(f, "{}: {:?} -> {:?}", self.name(), c.old_value, c.new_value),
            LightMode(c) => write!(f, "{}: {:?} -> {:?}", self.name(), c.old_value, c.new_value),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Notification {
    StateChanged { id: ControlId, change: StateChange },
    Click(ControlId),
    Disposed(ControlId),
}

impl Notification {
    pub fn id(&self) -> ControlId {
        match *self {
            Notification::StateChanged { id, .. }
            | Notification::Click(id)
            | Notification::Disposed(id) => id,
        }
    }
}

/// The listeners registered on a control.
///
/// Listeners whose receiving end was dropped are forgotten
/// on the next emission.
#[derive(Debug)]
pub struct Listeners {
    id: ControlId,
    txs: Vec<channel::Sender<Notification>>,
}

impl Listeners {
    pub fn new(id: ControlId) -> Self {
        Self {
            id,
            txs: Vec::new(),
        }
    }

    pub fn connect(&mut self, tx: channel::Sender<Notification>) {
        self.txs.push(tx);
    }

    pub fn len(&self) -> usize {
        self.txs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.txs.is_empty()
    }

    pub fn clear(&mut self) {
        self.txs.clear();
    }

    pub fn changed(&mut self, change: StateChange) {
        log::debug!("{}: {change}", self.id);
        self.emit(Notification::StateChanged {
            id: self.id,
            change,
        });
    }

    pub fn click(&mut self) {
        log::debug!("{}: click", self.id);
        self.emit(Notification::Click(self.id));
    }

    pub fn disposed(&mut self) {
        self.emit(Notification::Disposed(self.id));
    }

    fn emit(&mut self, notification: Notification) {
        self.txs.retain(|tx| tx.send(notification).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changed_only_on_difference() {
        assert_eq!(Changed::new(1, 1), None);
        assert_eq!(
            Changed::new(false, true),
            Some(Changed {
                old_value: false,
                new_value: true
            })
        );
    }

    #[test]
    fn emits_to_every_listener() {
        let id = ControlId::Rotary(0x10);
        let mut listeners = Listeners::new(id);

        let (tx1, rx1) = channel::unbounded();
        let (tx2, rx2) = channel::unbounded();
        listeners.connect(tx1);
        listeners.connect(tx2);

        listeners.click();

        assert_eq!(rx1.try_recv().unwrap(), Notification::Click(id));
        assert_eq!(rx2.try_recv().unwrap(), Notification::Click(id));
    }

    #[test]
    fn forgets_dropped_listeners() {
        let mut listeners = Listeners::new(ControlId::Button(0x59));

        let (tx1, rx1) = channel::unbounded();
        let (tx2, rx2) = channel::unbounded();
        listeners.connect(tx1);
        listeners.connect(tx2);
        drop(rx2);

        listeners.changed(StateChange::Toggled(Changed::new(false, true).unwrap()));

        assert_eq!(listeners.len(), 1);
        let notification = rx1.try_recv().unwrap();
        assert!(matches!(
            notification,
            Notification::StateChanged { change, .. } if change.name() == "toggled"
        ));
    }
}
