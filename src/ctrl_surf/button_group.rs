use crossbeam_channel as channel;

use super::{
    notify::{Changed, StateChange},
    Button, Control, Disposable, Error, Notification,
};
use crate::midi::Event;

/// Buttons of which at most one is toggled at a time.
///
/// The group listens to its members: whenever one of them gets toggled,
/// it becomes the active one and every other member is untoggled.
#[derive(Debug)]
pub struct ButtonGroup {
    buttons: Vec<Button>,
    active_index: Option<usize>,
    members_tx: channel::Sender<Notification>,
    members_rx: channel::Receiver<Notification>,
}

impl ButtonGroup {
    pub fn new(buttons: Vec<Button>) -> Self {
        let (members_tx, members_rx) = channel::unbounded();

        let mut this = Self {
            buttons,
            active_index: None,
            members_tx,
            members_rx,
        };

        for button in this.buttons.iter_mut() {
            button.connect(this.members_tx.clone());
        }

        if let Some(index) = this.buttons.iter().position(Button::is_toggled) {
            this.select(index);
        }

        this
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    /// Toggles the button at `index` and untoggles all the others.
    pub fn set_active_index(&mut self, index: usize) -> Result<(), Error> {
        if index >= self.buttons.len() {
            return Err(Error::InvalidIndex {
                index,
                len: self.buttons.len(),
            });
        }

        self.select(index);
        self.sync();

        Ok(())
    }

    pub fn set_toggled(&mut self, index: usize, toggled: bool) -> Result<(), Error> {
        let len = self.buttons.len();
        let button = self
            .buttons
            .get_mut(index)
            .ok_or(Error::InvalidIndex { index, len })?;

        button.set_toggled(toggled);
        self.sync();

        Ok(())
    }

    /// Hands the event over to the members.
    ///
    /// Returns `true` if a member handled it.
    pub fn handle(&mut self, event: &Event) -> bool {
        let mut handled = false;
        for button in self.buttons.iter_mut() {
            handled |= button.deliver(event);
        }

        self.sync();

        handled
    }

    pub fn refresh(&mut self) {
        for button in self.buttons.iter_mut() {
            button.refresh();
        }
    }

    /// Connects `listener` to every member.
    pub fn connect(&mut self, listener: channel::Sender<Notification>) {
        for button in self.buttons.iter_mut() {
            button.connect(listener.clone());
        }
    }

    /// Processes the pending member notifications.
    fn sync(&mut self) {
        while let Ok(notification) = self.members_rx.try_recv() {
            let Notification::StateChanged {
                id,
                change: StateChange::Toggled(Changed { new_value, .. }),
            } = notification
            else {
                continue;
            };

            let Some(index) = self.buttons.iter().position(|button| button.id() == id) else {
                continue;
            };

            if new_value {
                if self.active_index != Some(index) {
                    self.select(index);
                }
            } else if self.active_index == Some(index) {
                log::debug!("Button group: releasing {index}");
                self.active_index = None;
            }
        }
    }

    /// Toggles the button at `index` and untoggles all the others.
    ///
    /// Buttons already in the expected state send nothing.
    fn select(&mut self, index: usize) {
        log::debug!("Button group: selecting {index}");
        self.active_index = Some(index);

        for (idx, button) in self.buttons.iter_mut().enumerate() {
            button.set_toggled(idx == index);
        }
    }
}

impl Disposable for ButtonGroup {
    fn dispose(&mut self) {
        for button in self.buttons.iter_mut() {
            button.dispose();
        }
        // Drop the members' own disposal notifications.
        while self.members_rx.try_recv().is_ok() {}
    }

    fn is_disposed(&self) -> bool {
        self.buttons.iter().all(Button::is_disposed)
    }
}
