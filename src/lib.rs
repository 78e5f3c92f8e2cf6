//! Logical controls for a Behringer X-Touch Mini in MCU mode.
//!
//! Raw Note, Control-Change and Pitch-Bend msgs from the device drive
//! toggle buttons, bounded rotary encoders and a fader. Each control sends
//! its LED feedback back through the shared [`midi::Port`] and reports
//! state changes as [`ctrl_surf::Notification`]s.

pub mod bytes;

pub mod ctrl_surf;
pub use ctrl_surf::XTouchMini;

pub mod midi;

pub mod session;
pub use session::Session;
