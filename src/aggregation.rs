//! Totals and breakdowns derived from the ledger.
//!
//! Every function here is pure: the same transactions always give the same
//! result. Amounts keep full `f64` precision, rounding only happens when a
//! figure is formatted for display.

use crate::transaction::{Category, Transaction, TransactionType};

/// Sums the amounts of the transactions of type `type_`.
///
/// Returns zero when there are no matching transactions.
pub fn total_by_type(transactions: &[Transaction], type_: TransactionType) -> f64 {
    transactions
        .iter()
        .filter(|transaction| transaction.type_ == type_)
        .map(|transaction| transaction.amount)
        .sum()
}

/// Total income minus total expenses.
pub fn balance(transactions: &[Transaction]) -> f64 {
    total_by_type(transactions, TransactionType::Income)
        - total_by_type(transactions, TransactionType::Expense)
}

/// Expense totals grouped by category.
///
/// Only categories with at least one expense are present, in the order they
/// first appear in the ledger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpensesByCategory {
    totals: Vec<(Category, f64)>,
}

impl ExpensesByCategory {
    /// The total spent on `category`, if anything was spent on it.
    pub fn get(&self, category: &Category) -> Option<f64> {
        self.totals
            .iter()
            .find(|(key, _)| key == category)
            .map(|(_, total)| *total)
    }

    /// Iterate over each category and its total.
    pub fn iter(&self) -> impl Iterator<Item = (&Category, f64)> {
        self.totals.iter().map(|(category, total)| (category, *total))
    }

    /// The number of categories with expenses.
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    /// Whether there are no expenses at all.
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// The sum over all categories.
    pub fn total(&self) -> f64 {
        self.totals.iter().map(|(_, total)| total).sum()
    }
}

/// Groups expenses by category and sums each group.
pub fn expenses_by_category(transactions: &[Transaction]) -> ExpensesByCategory {
    let mut totals: Vec<(Category, f64)> = Vec::new();

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.type_ == TransactionType::Expense)
    {
        match totals
            .iter_mut()
            .find(|(category, _)| *category == transaction.category)
        {
            Some((_, total)) => *total += transaction.amount,
            None => totals.push((transaction.category.clone(), transaction.amount)),
        }
    }

    // Zero-amount expenses do not count as spending in a category.
    totals.retain(|(_, total)| *total != 0.0);

    ExpensesByCategory { totals }
}

/// The headline figures shown at the top of the ledger page.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    /// Total income minus total expenses.
    pub balance: f64,
    /// The sum of all income.
    pub income: f64,
    /// The sum of all expenses.
    pub expenses: f64,
}

impl Summary {
    /// Calculate the summary figures for `transactions`.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let income = total_by_type(transactions, TransactionType::Income);
        let expenses = total_by_type(transactions, TransactionType::Expense);

        Self {
            balance: income - expenses,
            income,
            expenses,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::transaction::{Category, Transaction, TransactionId, TransactionType};

    use super::{Summary, balance, expenses_by_category, total_by_type};

    fn transaction(
        id: &str,
        type_: TransactionType,
        amount: f64,
        category: Category,
    ) -> Transaction {
        Transaction::from_draft(
            TransactionId::from(id),
            Transaction::build(type_, amount, date!(2024 - 01 - 01), id).category(category),
        )
    }

    fn example_ledger() -> Vec<Transaction> {
        vec![
            transaction("pay", TransactionType::Income, 1000.0, Category::Salary),
            transaction("food", TransactionType::Expense, 300.0, Category::Food),
            transaction("bus", TransactionType::Expense, 200.0, Category::Transport),
        ]
    }

    #[test]
    fn empty_ledger_totals_are_zero() {
        assert_eq!(total_by_type(&[], TransactionType::Income), 0.0);
        assert_eq!(total_by_type(&[], TransactionType::Expense), 0.0);
        assert_eq!(balance(&[]), 0.0);
        assert!(expenses_by_category(&[]).is_empty());
        assert_eq!(Summary::from_transactions(&[]), Summary::default());
    }

    #[test]
    fn example_ledger_totals() {
        let transactions = example_ledger();

        assert_eq!(balance(&transactions), 500.0);
        assert_eq!(total_by_type(&transactions, TransactionType::Income), 1000.0);
        assert_eq!(total_by_type(&transactions, TransactionType::Expense), 500.0);

        let by_category = expenses_by_category(&transactions);
        assert_eq!(by_category.len(), 2);
        assert_eq!(by_category.get(&Category::Food), Some(300.0));
        assert_eq!(by_category.get(&Category::Transport), Some(200.0));
        assert_eq!(by_category.get(&Category::Salary), None);
    }

    #[test]
    fn totals_after_deleting_food_expense() {
        let transactions: Vec<_> = example_ledger()
            .into_iter()
            .filter(|transaction| transaction.id.as_str() != "food")
            .collect();

        let summary = Summary::from_transactions(&transactions);
        assert_eq!(summary.balance, 800.0);
        assert_eq!(summary.income, 1000.0);
        assert_eq!(summary.expenses, 200.0);

        let by_category = expenses_by_category(&transactions);
        assert_eq!(
            by_category.iter().collect::<Vec<_>>(),
            vec![(&Category::Transport, 200.0)]
        );
    }

    #[test]
    fn category_totals_sum_to_expense_total() {
        let transactions = vec![
            transaction("a", TransactionType::Expense, 10.25, Category::Food),
            transaction("b", TransactionType::Expense, 0.1, Category::Food),
            transaction("c", TransactionType::Expense, 0.2, Category::Housing),
            transaction("d", TransactionType::Income, 99.0, Category::Food),
            transaction("e", TransactionType::Expense, 3.5, Category::Unknown("pets".to_owned())),
        ];

        let by_category = expenses_by_category(&transactions);

        assert_eq!(by_category.len(), 3);
        assert!(by_category.iter().all(|(_, total)| total != 0.0));
        let expense_total = total_by_type(&transactions, TransactionType::Expense);
        assert!((by_category.total() - expense_total).abs() < 1e-9);
        assert_eq!(
            by_category.get(&Category::Unknown("pets".to_owned())),
            Some(3.5)
        );
    }

    #[test]
    fn zero_amount_expenses_do_not_create_a_category() {
        let transactions = vec![
            transaction("a", TransactionType::Expense, 0.0, Category::Food),
            transaction("b", TransactionType::Expense, 5.0, Category::Housing),
        ];

        let by_category = expenses_by_category(&transactions);

        assert_eq!(by_category.get(&Category::Food), None);
        assert_eq!(by_category.len(), 1);
    }

    #[test]
    fn categories_keep_first_appearance_order() {
        let transactions = vec![
            transaction("a", TransactionType::Expense, 1.0, Category::Shopping),
            transaction("b", TransactionType::Expense, 1.0, Category::Food),
            transaction("c", TransactionType::Expense, 1.0, Category::Shopping),
        ];

        let categories: Vec<_> = expenses_by_category(&transactions)
            .iter()
            .map(|(category, _)| category.clone())
            .collect();

        assert_eq!(categories, vec![Category::Shopping, Category::Food]);
    }

    #[test]
    fn income_only_ledger_has_no_expense_categories() {
        let transactions = vec![transaction(
            "pay",
            TransactionType::Income,
            1000.0,
            Category::Salary,
        )];

        assert!(expenses_by_category(&transactions).is_empty());
        assert_eq!(balance(&transactions), 1000.0);
    }
}
