#![no_main]

//! Drive the contact dialog with arbitrary gestures and DOM mutations and
//! check that presentation and scroll lock always match the dialog state.

use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use scrim_a11y::read_hidden;
use scrim_core::{Document, Event, KeyCode};
use scrim_harness::{contact_page, tab};
use scrim_runtime::Page;
use scrim_widgets::modal::{ModalConfig, ModalController};

#[derive(Debug, Arbitrary)]
enum Op {
    /// Click the n-th node of the fixture (wrapping).
    Click(u8),
    Key(Key),
    Tab { shift: bool },
    Focus(u8),
    Remove(u8),
    Hide(u8),
    Open,
    Close,
    Wait(u8),
}

#[derive(Debug, Arbitrary)]
enum Key {
    Escape,
    Enter,
    Char(char),
}

fuzz_target!(|ops: Vec<Op>| {
    let ids = contact_page();
    let nodes = [
        ids.home_link,
        ids.form,
        ids.opener,
        ids.container,
        ids.backdrop,
        ids.dialog_box,
        ids.close_button,
        ids.email,
        ids.message,
        ids.submit,
    ];
    let pick = |n: u8| nodes[usize::from(n) % nodes.len()];

    let mut page = Page::new(ids.doc.clone());
    let Ok(modal) = ModalController::attach(&mut page, ModalConfig::default()) else {
        return;
    };

    for op in ops.into_iter().take(256) {
        match op {
            Op::Click(n) => {
                page.dispatch(Event::click(pick(n)));
            }
            Op::Key(key) => {
                let code = match key {
                    Key::Escape => KeyCode::Escape,
                    Key::Enter => KeyCode::Enter,
                    Key::Char(c) => KeyCode::Char(c),
                };
                page.dispatch(Event::key(code));
            }
            Op::Tab { shift } => {
                page.dispatch(tab(shift));
            }
            Op::Focus(n) => {
                page.document_mut().focus(pick(n));
            }
            Op::Remove(n) => {
                let id = pick(n);
                if id != ids.container {
                    page.document_mut().remove(id);
                }
            }
            Op::Hide(n) => {
                let id = pick(n);
                if id != ids.container {
                    page.document_mut().set_displayed(id, false);
                }
            }
            Op::Open => {
                modal.open(page.context_mut());
            }
            Op::Close => {
                modal.close(page.context_mut());
            }
            Op::Wait(ms) => {
                page.advance(Duration::from_millis(u64::from(ms)));
            }
        }

        let doc = page.document();
        let open = modal.is_open();
        assert_eq!(read_hidden(doc, ids.container), Some(!open));
        assert_eq!(doc.scroll_lock_depth(), u32::from(open));
        assert!(open || modal.focus_memory().is_none());
    }
});
