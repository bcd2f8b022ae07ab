//! Selecting which transactions the list shows.

use serde::{Deserialize, Serialize};

use crate::transaction::{Transaction, TransactionType};

/// Which transactions to show in the transaction list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionFilter {
    /// Show every transaction.
    #[default]
    All,
    /// Only show income.
    Income,
    /// Only show expenses.
    Expense,
}

impl TransactionFilter {
    /// Every filter, in the order shown in the filter drop-down.
    pub const ALL: [TransactionFilter; 3] = [
        TransactionFilter::All,
        TransactionFilter::Income,
        TransactionFilter::Expense,
    ];

    /// The value used in query strings and forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionFilter::All => "all",
            TransactionFilter::Income => "income",
            TransactionFilter::Expense => "expense",
        }
    }

    /// The text shown in the filter drop-down.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionFilter::All => "All transactions",
            TransactionFilter::Income => "Income only",
            TransactionFilter::Expense => "Expenses only",
        }
    }

    fn matches(&self, transaction: &Transaction) -> bool {
        match self {
            TransactionFilter::All => true,
            TransactionFilter::Income => transaction.type_ == TransactionType::Income,
            TransactionFilter::Expense => transaction.type_ == TransactionType::Expense,
        }
    }
}

/// Selects the transactions matching `filter`, most recent first.
///
/// Returns a new vector, `transactions` is left untouched. Transactions on the
/// same date keep their relative order.
pub fn filter_transactions(
    transactions: &[Transaction],
    filter: TransactionFilter,
) -> Vec<Transaction> {
    let mut selected: Vec<Transaction> = transactions
        .iter()
        .filter(|transaction| filter.matches(transaction))
        .cloned()
        .collect();

    selected.sort_by(|a, b| b.date.cmp(&a.date));

    selected
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::transaction::{Category, Transaction, TransactionId, TransactionType};

    use super::{TransactionFilter, filter_transactions};

    fn ledger() -> Vec<Transaction> {
        [
            ("a", TransactionType::Income, date!(2024 - 01 - 01)),
            ("b", TransactionType::Expense, date!(2024 - 01 - 03)),
            ("c", TransactionType::Expense, date!(2024 - 01 - 02)),
            ("d", TransactionType::Income, date!(2024 - 02 - 01)),
            ("e", TransactionType::Expense, date!(2024 - 01 - 03)),
        ]
        .into_iter()
        .map(|(id, type_, date)| {
            Transaction::from_draft(
                TransactionId::from(id),
                Transaction::build(type_, 1.0, date, id).category(Category::Other),
            )
        })
        .collect()
    }

    fn ids(transactions: &[Transaction]) -> Vec<&str> {
        transactions.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn all_returns_every_transaction_newest_first() {
        let transactions = ledger();

        let filtered = filter_transactions(&transactions, TransactionFilter::All);

        assert_eq!(ids(&filtered), vec!["d", "b", "e", "c", "a"]);
    }

    #[test]
    fn income_returns_only_income() {
        let filtered = filter_transactions(&ledger(), TransactionFilter::Income);

        assert_eq!(ids(&filtered), vec!["d", "a"]);
        assert!(filtered.iter().all(|t| t.type_ == TransactionType::Income));
    }

    #[test]
    fn expense_returns_only_expenses() {
        let filtered = filter_transactions(&ledger(), TransactionFilter::Expense);

        assert_eq!(ids(&filtered), vec!["b", "e", "c"]);
        assert!(filtered.iter().all(|t| t.type_ == TransactionType::Expense));
    }

    #[test]
    fn leaves_input_order_untouched() {
        let transactions = ledger();

        filter_transactions(&transactions, TransactionFilter::All);

        assert_eq!(ids(&transactions), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn empty_ledger_gives_empty_list() {
        assert!(filter_transactions(&[], TransactionFilter::All).is_empty());
    }

    #[test]
    fn parses_filter_from_query_value() {
        let filter: TransactionFilter = serde_json::from_str("\"expense\"").unwrap();

        assert_eq!(filter, TransactionFilter::Expense);
    }
}
