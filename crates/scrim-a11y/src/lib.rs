#![forbid(unsafe_code)]

//! Accessibility layer for scrim: which elements can take focus inside a
//! container, and how a container announces that it is hidden.

pub mod focusable;
pub mod hidden;

pub use focusable::{
    ContainerSnapshot, FocusCandidate, FocusableSet, compute_focusable, focusable_in,
};
pub use hidden::{ARIA_HIDDEN, HIDDEN, publish_hidden, read_hidden};
