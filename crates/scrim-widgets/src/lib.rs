#![forbid(unsafe_code)]

//! Headless dialog widgets for scrim.

pub mod modal;

pub use modal::{ModalConfig, ModalController, ModalState};
