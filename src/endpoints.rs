//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}',
//! use [format_endpoint].

use std::fmt::Display;

/// The ledger page.
pub const ROOT: &str = "/";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to list and create transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: impl Display) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
