//! Stateless widgets shared across views.

pub mod toast;

pub use toast::render_toast;
