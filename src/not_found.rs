//! The page shown for routes and resources that do not exist.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

pub fn get_404_not_found_response() -> Response {
    let page = error_view(
        "Not Found",
        "404",
        "Page not found.",
        "Sorry, we can't find that page. You'll find lots to explore on the home page.",
    );

    (StatusCode::NOT_FOUND, Html(page.into_string())).into_response()
}
