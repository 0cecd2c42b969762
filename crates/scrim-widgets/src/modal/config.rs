#![forbid(unsafe_code)]

//! Modal configuration: markup markers and dismiss behavior.
//!
//! Defaults match the contact dialog markup:
//!
//! | Field | Default |
//! |-------|---------|
//! | `container_id` | `contactModal` |
//! | `box_class` | `modal__dialog` |
//! | `opener_attr` | `data-open-contact` |
//! | `closer_attr` | `data-close-modal` |
//! | `backdrop_class` | `modal__backdrop` |
//! | `focus_delay_ms` | `30` |
//!
//! With the `policy-config` feature, configs load from TOML. Missing keys take
//! their defaults, so a file only needs the fields it overrides.

use std::time::Duration;

/// Default delay before programmatic focus moves.
pub const DEFAULT_FOCUS_DELAY_MS: u64 = 30;

/// Modal markup markers and behavior switches.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "policy-config",
    derive(serde::Deserialize, serde::Serialize),
    serde(default, deny_unknown_fields)
)]
pub struct ModalConfig {
    /// `id` attribute of the dialog container.
    pub container_id: String,
    /// Class of the inner dialog box. Without one, the container is the box.
    pub box_class: String,
    /// Attribute marking opener elements anywhere in the document.
    pub opener_attr: String,
    /// Attribute marking closer elements inside the container.
    pub closer_attr: String,
    /// Class marking explicit backdrop elements inside the container.
    pub backdrop_class: String,
    /// Delay before focus moves after a visibility change.
    pub focus_delay_ms: u64,
    pub close_on_escape: bool,
    pub close_on_backdrop: bool,
    pub trap_focus: bool,
    /// Give `<button>` openers/closers without a `type` an explicit
    /// `type="button"` so they never submit a form.
    pub normalize_button_types: bool,
    /// Mirror the open state in the container's `open` attribute.
    pub mirror_open_attribute: bool,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            container_id: "contactModal".to_owned(),
            box_class: "modal__dialog".to_owned(),
            opener_attr: "data-open-contact".to_owned(),
            closer_attr: "data-close-modal".to_owned(),
            backdrop_class: "modal__backdrop".to_owned(),
            focus_delay_ms: DEFAULT_FOCUS_DELAY_MS,
            close_on_escape: true,
            close_on_backdrop: true,
            trap_focus: true,
            normalize_button_types: true,
            mirror_open_attribute: true,
        }
    }
}

impl ModalConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn container_id(mut self, id: impl Into<String>) -> Self {
        self.container_id = id.into();
        self
    }

    pub fn box_class(mut self, class: impl Into<String>) -> Self {
        self.box_class = class.into();
        self
    }

    pub fn opener_attr(mut self, attr: impl Into<String>) -> Self {
        self.opener_attr = attr.into();
        self
    }

    pub fn closer_attr(mut self, attr: impl Into<String>) -> Self {
        self.closer_attr = attr.into();
        self
    }

    pub fn backdrop_class(mut self, class: impl Into<String>) -> Self {
        self.backdrop_class = class.into();
        self
    }

    pub fn focus_delay(mut self, delay: Duration) -> Self {
        self.focus_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn close_on_escape(mut self, close: bool) -> Self {
        self.close_on_escape = close;
        self
    }

    pub fn close_on_backdrop(mut self, close: bool) -> Self {
        self.close_on_backdrop = close;
        self
    }

    pub fn trap_focus(mut self, trap: bool) -> Self {
        self.trap_focus = trap;
        self
    }

    pub fn normalize_button_types(mut self, normalize: bool) -> Self {
        self.normalize_button_types = normalize;
        self
    }

    pub fn mirror_open_attribute(mut self, mirror: bool) -> Self {
        self.mirror_open_attribute = mirror;
        self
    }

    /// Delay as a `Duration`.
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.focus_delay_ms)
    }
}

/// Errors from loading a [`ModalConfig`].
#[cfg(feature = "policy-config")]
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io(std::io::Error),
    /// The TOML was malformed or had unknown keys.
    Parse(toml::de::Error),
}

#[cfg(feature = "policy-config")]
impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read modal config: {err}"),
            Self::Parse(err) => write!(f, "invalid modal config: {err}"),
        }
    }
}

#[cfg(feature = "policy-config")]
impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

#[cfg(feature = "policy-config")]
impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

#[cfg(feature = "policy-config")]
impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err)
    }
}

#[cfg(feature = "policy-config")]
impl ModalConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML config file.
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
