#![forbid(unsafe_code)]

//! Reference page fixtures.
//!
//! [`contact_page`] builds the markup a configurator site ships for its
//! contact dialog:
//!
//! ```text
//! body
//! ├── a#home[href]
//! ├── form#quote
//! │   └── button[data-open-contact]          (no type attribute)
//! └── div#contactModal                       (visible in markup)
//!     ├── div.modal__backdrop
//!     └── div.modal__dialog
//!         ├── button.modal__close[data-close-modal]
//!         ├── input[name=email]
//!         ├── textarea[name=message]
//!         └── button[type=submit]
//! ```

use scrim_core::{Document, NodeId, Tag};

use crate::document::TestDocument;

/// Handles into a [`contact_page`] document.
#[derive(Debug, Clone)]
pub struct ContactPage {
    pub doc: TestDocument,
    pub home_link: NodeId,
    pub form: NodeId,
    pub opener: NodeId,
    pub container: NodeId,
    pub backdrop: NodeId,
    pub dialog_box: NodeId,
    pub close_button: NodeId,
    pub email: NodeId,
    pub message: NodeId,
    pub submit: NodeId,
}

impl ContactPage {
    /// Focusable controls inside the dialog box, in tab order.
    #[must_use]
    pub fn dialog_controls(&self) -> Vec<NodeId> {
        vec![self.close_button, self.email, self.message, self.submit]
    }
}

/// Build the contact page fixture.
#[must_use]
pub fn contact_page() -> ContactPage {
    let mut doc = TestDocument::new();
    let root = doc.root();

    let home_link = doc.el(root, Tag::A, &[("id", "home"), ("href", "/")]);
    let form = doc.el(root, Tag::Form, &[("id", "quote")]);
    let opener = doc.el(form, Tag::Button, &[("data-open-contact", "")]);

    let container = doc.el(
        root,
        Tag::Div,
        &[("id", "contactModal"), ("class", "modal"), ("aria-hidden", "false")],
    );
    let backdrop = doc.el(container, Tag::Div, &[("class", "modal__backdrop")]);
    let dialog_box = doc.el(
        container,
        Tag::Div,
        &[("class", "modal__dialog"), ("role", "dialog")],
    );
    let close_button = doc.el(
        dialog_box,
        Tag::Button,
        &[("class", "modal__close"), ("data-close-modal", "")],
    );
    let email = doc.el(dialog_box, Tag::Input, &[("name", "email")]);
    let message = doc.el(dialog_box, Tag::TextArea, &[("name", "message")]);
    let submit = doc.el(dialog_box, Tag::Button, &[("type", "submit")]);

    ContactPage {
        doc,
        home_link,
        form,
        opener,
        container,
        backdrop,
        dialog_box,
        close_button,
        email,
        message,
        submit,
    }
}

/// A dialog container with no inner box and no focusable content.
///
/// Returns `(document, opener, container, closer_outside_box)`; the closer is
/// a plain `span` (not focusable) so the focusable set is empty.
#[must_use]
pub fn bare_page() -> (TestDocument, NodeId, NodeId, NodeId) {
    let mut doc = TestDocument::new();
    let root = doc.root();
    let opener = doc.el(root, Tag::Button, &[("data-open-contact", ""), ("type", "button")]);
    let container = doc.el(root, Tag::Div, &[("id", "contactModal")]);
    let closer = doc.el(container, Tag::Span, &[("data-close-modal", "")]);
    (doc, opener, container, closer)
}
