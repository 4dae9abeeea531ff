#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;
pub(crate) mod store;

use std::sync::Arc;

use crate::{AppState, CurrentUser, store::SharedStore};

pub(crate) use form::{
    assert_form_input, assert_form_input_with_value, assert_form_submit_button,
    assert_hx_endpoint, must_get_form,
};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment};
pub(crate) use http::{assert_hx_redirect, assert_status_ok};
pub(crate) use store::FakeStore;

pub(crate) const TEST_USER_ID: &str = "user-1";

/// Create app state backed by a fresh [FakeStore], returning both.
pub(crate) fn get_test_state() -> (Arc<FakeStore>, AppState) {
    let fake = Arc::new(FakeStore::default());
    let store: SharedStore = fake.clone();
    let state = AppState::with_store(
        store,
        "Etc/UTC",
        CurrentUser::new(TEST_USER_ID, Some("Test User")),
    )
    .expect("Could not create test app state");

    (fake, state)
}
