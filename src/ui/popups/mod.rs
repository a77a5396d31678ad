//! Modal overlays: messages, the keybinding reference and the notification
//! history.

pub mod help;
pub mod history;
pub mod message;
