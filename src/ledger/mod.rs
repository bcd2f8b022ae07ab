//! The ledger page: viewing, filtering, adding and deleting transactions.
//!
//! This module contains:
//! - `filter`: selecting and ordering the transactions shown in the list
//! - `views`: the page and the fragments that htmx swaps into it
//! - `handlers`: the route handlers that tie the repository to the views

mod filter;
mod handlers;
mod views;

pub use filter::{TransactionFilter, filter_transactions};
pub use handlers::{
    FilterQuery, TransactionForm, create_transaction_endpoint, delete_transaction_endpoint,
    get_ledger_page, get_transaction_list,
};
