//! The full page shown when a request fails in a way the user cannot fix.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// An error page with a short description of what went wrong and how the
/// user might fix it.
pub struct InternalServerError<'a> {
    pub description: &'a str,
    pub fix: &'a str,
}

impl Default for InternalServerError<'_> {
    fn default() -> Self {
        Self {
            description: "Sorry, something went wrong.",
            fix: "Try again later or check the server logs",
        }
    }
}

impl IntoResponse for InternalServerError<'_> {
    fn into_response(self) -> Response {
        let page = error_view("Internal Server Error", "500", self.description, self.fix);

        (StatusCode::INTERNAL_SERVER_ERROR, Html(page.into_string())).into_response()
    }
}
