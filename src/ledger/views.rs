//! HTML for the ledger page and the fragments htmx swaps into it.
//!
//! Every fragment has a fixed element ID. Fragments rendered with `oob` set
//! carry `hx-swap-oob="true"` so that a single response can replace several
//! parts of the page at once.

use maud::{Markup, html};
use time::Date;

use crate::{
    aggregation::Summary,
    alert::Alert,
    chart::{CategoryChartData, ChartRenderer},
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, HeadElement, PAGE_CONTAINER_STYLE, base, format_currency,
        format_date,
    },
    ledger::filter::{TransactionFilter, filter_transactions},
    transaction::{Category, Transaction, TransactionType},
};

pub(crate) const SUMMARY_ID: &str = "summary";
pub(crate) const TRANSACTION_LIST_ID: &str = "transactions-list";
pub(crate) const CATEGORY_BREAKDOWN_ID: &str = "category-breakdown";
pub(crate) const TRANSACTION_FORM_ID: &str = "transaction-form";
pub(crate) const FILTER_SELECT_ID: &str = "filter-type";

fn oob_attribute(oob: bool) -> Option<&'static str> {
    oob.then_some("true")
}

/// The full ledger page.
///
/// `alert` is the notification that is still visible, if any.
pub fn ledger_page(
    transactions: &[Transaction],
    filter: TransactionFilter,
    today: Date,
    renderer: &dyn ChartRenderer,
    alert: Option<Alert>,
) -> Markup {
    let head_elements: Vec<HeadElement> = renderer
        .head_scripts()
        .into_iter()
        .map(HeadElement::ScriptLink)
        .collect();

    let content = html!(
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-5xl space-y-6"
            {
                h1 class="text-3xl font-bold" { "Pocket Ledger" }

                (summary_view(&Summary::from_transactions(transactions), false))

                div class="grid gap-6 lg:grid-cols-2"
                {
                    section class=(CARD_STYLE)
                    {
                        h2 class="mb-4 text-xl font-semibold" { "Add Transaction" }
                        (transaction_form_view(today, false))
                    }

                    section class=(CARD_STYLE)
                    {
                        h2 class="mb-4 text-xl font-semibold" { "Expenses by Category" }
                        (category_breakdown_view(transactions, renderer, false))
                    }
                }

                section class=(CARD_STYLE)
                {
                    div class="flex items-center justify-between mb-4"
                    {
                        h2 class="text-xl font-semibold" { "Transactions" }
                        (filter_select_view(filter))
                    }

                    (transaction_list_view(transactions, filter, false))
                }
            }
        }
    );

    base(
        "Ledger",
        &head_elements,
        &content,
        alert.map(Alert::into_html),
    )
}

/// The balance, total income and total expenses.
pub fn summary_view(summary: &Summary, oob: bool) -> Markup {
    let balance_color = if summary.balance < 0.0 {
        "text-red-600 dark:text-red-400"
    } else {
        "text-gray-900 dark:text-white"
    };

    html!(
        div
            id=(SUMMARY_ID)
            hx-swap-oob=[oob_attribute(oob)]
            class="grid gap-4 sm:grid-cols-3"
        {
            div class=(CARD_STYLE)
            {
                p class="text-sm text-gray-500 dark:text-gray-400" { "Balance" }
                p data-summary="balance" class={ "text-2xl font-bold " (balance_color) }
                {
                    (format_currency(summary.balance))
                }
            }

            div class=(CARD_STYLE)
            {
                p class="text-sm text-gray-500 dark:text-gray-400" { "Income" }
                p data-summary="income" class="text-2xl font-bold text-green-600 dark:text-green-400"
                {
                    (format_currency(summary.income))
                }
            }

            div class=(CARD_STYLE)
            {
                p class="text-sm text-gray-500 dark:text-gray-400" { "Expenses" }
                p data-summary="expenses" class="text-2xl font-bold text-red-600 dark:text-red-400"
                {
                    (format_currency(summary.expenses))
                }
            }
        }
    )
}

/// The transactions that match `filter`, most recent first.
pub fn transaction_list_view(
    transactions: &[Transaction],
    filter: TransactionFilter,
    oob: bool,
) -> Markup {
    let transactions = filter_transactions(transactions, filter);

    html!(
        div id=(TRANSACTION_LIST_ID) hx-swap-oob=[oob_attribute(oob)]
        {
            @if transactions.is_empty() {
                p data-placeholder class="py-4 text-center text-gray-500 dark:text-gray-400"
                {
                    "No transactions"
                }
            } @else {
                ul class="divide-y divide-gray-200 dark:divide-gray-700"
                {
                    @for transaction in &transactions {
                        (transaction_row_view(transaction))
                    }
                }
            }
        }
    )
}

fn transaction_row_view(transaction: &Transaction) -> Markup {
    let (sign, amount_color) = match transaction.type_ {
        TransactionType::Income => ("+", "text-green-600 dark:text-green-400"),
        TransactionType::Expense => ("-", "text-red-600 dark:text-red-400"),
    };
    let delete_url = format_endpoint(endpoints::TRANSACTION, transaction.id.as_str());

    html!(
        li
            data-transaction-id=(transaction.id)
            data-type=(transaction.type_.as_str())
            class="flex items-center justify-between py-3"
        {
            div
            {
                p data-field="name" class="font-medium" { (transaction.name) }
                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    span data-field="category" { (transaction.category.label()) }
                    " · "
                    span data-field="date" { (format_date(transaction.date)) }
                }
            }

            div class="flex items-center gap-3"
            {
                span data-field="amount" class={ "font-semibold " (amount_color) }
                {
                    (sign) (format_currency(transaction.amount.abs()))
                }

                button
                    type="button"
                    title="Delete transaction"
                    hx-delete=(delete_url)
                    hx-include={ "#" (FILTER_SELECT_ID) }
                    hx-swap="none"
                    hx-target-error="#alert-container"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "×"
                }
            }
        }
    )
}

/// The chart of expenses per category, or a placeholder when there are no
/// expenses.
///
/// `renderer` is only called when there is something to chart.
pub fn category_breakdown_view(
    transactions: &[Transaction],
    renderer: &dyn ChartRenderer,
    oob: bool,
) -> Markup {
    let data = CategoryChartData::from_transactions(transactions);

    html!(
        div id=(CATEGORY_BREAKDOWN_ID) hx-swap-oob=[oob_attribute(oob)]
        {
            @if data.is_empty() {
                p data-placeholder class="py-4 text-center text-gray-500 dark:text-gray-400"
                {
                    "No data to display"
                }
            } @else {
                (renderer.render(&data))
            }
        }
    )
}

/// The form for adding a transaction, with the date set to `today`.
pub fn transaction_form_view(today: Date, oob: bool) -> Markup {
    html!(
        form
            id=(TRANSACTION_FORM_ID)
            hx-swap-oob=[oob_attribute(oob)]
            hx-post=(endpoints::TRANSACTIONS_API)
            hx-include={ "#" (FILTER_SELECT_ID) }
            hx-swap="none"
            hx-target-error="#alert-container"
            class="space-y-4"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Name" }
                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="e.g. Groceries"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
                input
                    id="amount"
                    type="number"
                    name="amount"
                    min="0"
                    step="0.01"
                    placeholder="0.00"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="grid gap-4 sm:grid-cols-2"
            {
                div
                {
                    label for="type" class=(FORM_LABEL_STYLE) { "Type" }
                    select id="type" name="type" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for type_ in [TransactionType::Expense, TransactionType::Income] {
                            option value=(type_.as_str()) { (type_.label()) }
                        }
                    }
                }

                div
                {
                    label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                    select id="category" name="category" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for category in Category::KNOWN.iter() {
                            option
                                value=(category.key())
                                selected[*category == Category::Other]
                            {
                                (category.label())
                            }
                        }
                    }
                }
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }
                input
                    id="date"
                    type="date"
                    name="date"
                    value=(today)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Transaction" }
        }
    )
}

/// The drop-down that picks which transactions the list shows.
///
/// Changing it fetches a fresh list. The add form and delete buttons include
/// its value so that their responses keep the list filtered.
pub fn filter_select_view(filter: TransactionFilter) -> Markup {
    html!(
        select
            id=(FILTER_SELECT_ID)
            name="filter"
            hx-get=(endpoints::TRANSACTIONS_API)
            hx-target={ "#" (TRANSACTION_LIST_ID) }
            hx-swap="outerHTML"
            hx-trigger="change"
            class="p-2 rounded text-sm text-gray-900 dark:text-white bg-gray-50
                dark:bg-gray-700 border border-gray-300 dark:border-gray-600"
        {
            @for option in TransactionFilter::ALL {
                option value=(option.as_str()) selected[option == filter] { (option.label()) }
            }
        }
    )
}
