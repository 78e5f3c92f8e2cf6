use super::notify::Listeners;

/// Teardown capability shared by every stateful control.
///
/// Disposal is terminal: a disposed control ignores inbound events,
/// never sends to the device again and emits no further notifications.
pub trait Disposable {
    /// Disposes the control. Calls after the first one are no-ops.
    fn dispose(&mut self);

    fn is_disposed(&self) -> bool;
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Lifecycle {
    #[default]
    Active,
    Disposed,
}

impl Lifecycle {
    pub fn is_disposed(self) -> bool {
        matches!(self, Lifecycle::Disposed)
    }

    /// Switches to `Disposed`, notifies then drops the listeners.
    ///
    /// Returns `false` if already disposed.
    pub fn dispose(&mut self, listeners: &mut Listeners) -> bool {
        if self.is_disposed() {
            return false;
        }

        *self = Lifecycle::Disposed;
        listeners.disposed();
        listeners.clear();

        true
    }
}
