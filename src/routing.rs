//! Application router configuration.

use axum::{
    Router, middleware,
    routing::{delete, get},
};
use tower_http::services::ServeDir;

use crate::{
    AppState, endpoints,
    ledger::{
        create_transaction_endpoint, delete_transaction_endpoint, get_ledger_page,
        get_transaction_list,
    },
    logging::logging_middleware,
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_ledger_page))
        .route(
            endpoints::TRANSACTIONS_API,
            get(get_transaction_list).post(create_transaction_endpoint),
        )
        .route(endpoints::TRANSACTION, delete(delete_transaction_endpoint))
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}
