//! The page shown for routes that do not exist.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// The fallback route handler.
pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

/// A 404 response with the "page not found" page as its body.
pub fn get_404_not_found_response() -> Response {
    let page = error_view(
        "Not Found",
        "404",
        "Something's missing.",
        "Sorry, we can't find that page. You'll find lots to explore on the ledger page.",
    );

    (StatusCode::NOT_FOUND, Html(page.into_string())).into_response()
}
