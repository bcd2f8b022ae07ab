//! Route handlers for viewing the ledger and adding or deleting transactions.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, Query, State},
    response::{Html, IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error,
    aggregation::Summary,
    chart::ChartRenderer,
    ledger::{
        filter::TransactionFilter,
        views::{
            category_breakdown_view, ledger_page, summary_view, transaction_form_view,
            transaction_list_view,
        },
    },
    notification::Notifier,
    timezone::get_local_offset,
    transaction::{
        Category, Transaction, TransactionId, TransactionRepository, TransactionType, iso_date,
    },
};

/// The state needed to view and change the ledger.
#[derive(Clone)]
pub struct LedgerState {
    /// The transactions, shared with every other request.
    pub repository: Arc<Mutex<TransactionRepository>>,
    /// Shows "Transaction saved" and similar messages.
    pub notifier: Notifier,
    /// Draws the expense breakdown chart.
    pub chart_renderer: Arc<dyn ChartRenderer>,
    /// The local timezone as a canonical timezone name, e.g. "Europe/Moscow".
    pub local_timezone: String,
}

impl FromRef<AppState> for LedgerState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            repository: state.repository.clone(),
            notifier: state.notifier.clone(),
            chart_renderer: state.chart_renderer.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The form data for adding a transaction.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionForm {
    /// A short label for the transaction.
    pub name: String,
    /// The amount of money earned or spent, must be a finite number.
    pub amount: f64,
    /// Whether money was earned or spent.
    #[serde(rename = "type")]
    pub type_: TransactionType,
    /// What the money was earned or spent on.
    pub category: Category,
    /// When the transaction happened, today if empty.
    #[serde(default, with = "iso_date::option")]
    pub date: Option<Date>,
    /// The filter currently applied to the transaction list.
    #[serde(default)]
    pub filter: TransactionFilter,
}

/// The query parameters that select which transactions the list shows.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FilterQuery {
    /// The filter to apply, all transactions if absent.
    #[serde(default)]
    pub filter: TransactionFilter,
}

fn today(local_timezone: &str) -> Result<Date, Error> {
    let Some(local_offset) = get_local_offset(local_timezone) else {
        tracing::error!("Invalid timezone {local_timezone}");
        return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
    };

    Ok(OffsetDateTime::now_utc().to_offset(local_offset).date())
}

/// Display the ledger page.
pub async fn get_ledger_page(
    State(state): State<LedgerState>,
    Query(query): Query<FilterQuery>,
) -> Response {
    let today = match today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_response(),
    };

    let repository = match state.repository.lock() {
        Ok(repository) => repository,
        Err(error) => {
            tracing::error!("could not acquire ledger lock: {error}");
            return Error::LedgerLockError.into_response();
        }
    };

    ledger_page(
        repository.transactions(),
        query.filter,
        today,
        state.chart_renderer.as_ref(),
        state.notifier.current_alert(),
    )
    .into_response()
}

/// A route handler for adding a transaction.
///
/// Responds with the updated summary, list and chart, a blank form and a
/// notification, all swapped out-of-band.
pub async fn create_transaction_endpoint(
    State(state): State<LedgerState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let today = match today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    if !form.amount.is_finite() {
        tracing::error!("Rejected transaction with non-finite amount {}", form.amount);
        return Error::InvalidAmountError(form.amount.to_string()).into_alert_response();
    }

    let draft = Transaction::build(
        form.type_,
        form.amount,
        form.date.unwrap_or(today),
        &form.name,
    )
    .category(form.category);

    let mut repository = match state.repository.lock() {
        Ok(repository) => repository,
        Err(error) => {
            tracing::error!("could not acquire ledger lock: {error}");
            return Error::LedgerLockError.into_alert_response();
        }
    };

    let transaction = repository.add(draft);
    tracing::info!("Added transaction {}", transaction.id);

    let alert = match repository.persist() {
        Ok(()) => state.notifier.notify("Transaction saved").into_oob_html(),
        Err(error) => {
            tracing::error!("could not save transaction {}: {error}", transaction.id);
            error.into_alert().into_oob_html()
        }
    };

    Html(
        html!(
            (ledger_fragments(
                repository.transactions(),
                form.filter,
                state.chart_renderer.as_ref()
            ))
            (transaction_form_view(today, true))
            (alert)
        )
        .into_string(),
    )
    .into_response()
}

/// A route handler for deleting a transaction.
///
/// Deleting a transaction that does not exist changes nothing, but the
/// fragments are still sent so that the page catches up with the ledger.
pub async fn delete_transaction_endpoint(
    State(state): State<LedgerState>,
    Path(transaction_id): Path<String>,
    Query(query): Query<FilterQuery>,
) -> Response {
    let transaction_id = TransactionId::from(transaction_id);

    let mut repository = match state.repository.lock() {
        Ok(repository) => repository,
        Err(error) => {
            tracing::error!("could not acquire ledger lock: {error}");
            return Error::LedgerLockError.into_alert_response();
        }
    };

    let alert = if repository.remove(&transaction_id) {
        tracing::info!("Deleted transaction {transaction_id}");

        match repository.persist() {
            Ok(()) => state.notifier.notify("Transaction deleted").into_oob_html(),
            Err(error) => {
                tracing::error!("could not save deletion of {transaction_id}: {error}");
                error.into_alert().into_oob_html()
            }
        }
    } else {
        tracing::debug!("Tried to delete missing transaction {transaction_id}");
        html!()
    };

    Html(
        html!(
            (ledger_fragments(
                repository.transactions(),
                query.filter,
                state.chart_renderer.as_ref()
            ))
            (alert)
        )
        .into_string(),
    )
    .into_response()
}

/// A route handler for the transaction list, used when the filter changes.
pub async fn get_transaction_list(
    State(state): State<LedgerState>,
    Query(query): Query<FilterQuery>,
) -> Response {
    let repository = match state.repository.lock() {
        Ok(repository) => repository,
        Err(error) => {
            tracing::error!("could not acquire ledger lock: {error}");
            return Error::LedgerLockError.into_alert_response();
        }
    };

    Html(transaction_list_view(repository.transactions(), query.filter, false).into_string())
        .into_response()
}

/// The summary, list and chart, each marked for an out-of-band swap.
fn ledger_fragments(
    transactions: &[Transaction],
    filter: TransactionFilter,
    renderer: &dyn ChartRenderer,
) -> Markup {
    html!(
        (summary_view(&Summary::from_transactions(transactions), true))
        (transaction_list_view(transactions, filter, true))
        (category_breakdown_view(transactions, renderer, true))
    )
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use axum::{
        body::Body,
        extract::{Path, Query, State},
        http::{Response, StatusCode},
    };
    use axum_extra::extract::Form;
    use maud::{Markup, html};
    use scraper::{Html, Selector};
    use time::{OffsetDateTime, macros::date};

    use crate::{
        Error,
        chart::{CategoryChartData, ChartRenderer},
        ledger::filter::TransactionFilter,
        notification::Notifier,
        store::{DurableStore, JsonFileStore, MemoryStore},
        transaction::{
            Category, TRANSACTIONS_KEY, Transaction, TransactionRepository, TransactionType,
        },
    };

    use super::{
        FilterQuery, LedgerState, TransactionForm, create_transaction_endpoint,
        delete_transaction_endpoint, get_ledger_page, get_transaction_list,
    };

    /// Counts how often it is asked to draw a chart.
    #[derive(Default)]
    struct CountingRenderer {
        calls: AtomicUsize,
    }

    impl ChartRenderer for CountingRenderer {
        fn render(&self, data: &CategoryChartData) -> Markup {
            self.calls.fetch_add(1, Ordering::SeqCst);
            html!(div id="fake-chart" data-values=(data.values.len()) {})
        }
    }

    /// A store that accepts reads but fails every write.
    struct ReadOnlyStore;

    impl DurableStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, Error> {
            Ok(None)
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), Error> {
            Err(Error::StoreError(key.to_owned(), "read-only".to_owned()))
        }
    }

    fn get_test_state(store: impl DurableStore + 'static) -> (LedgerState, Arc<CountingRenderer>) {
        let renderer = Arc::new(CountingRenderer::default());
        let state = LedgerState {
            repository: Arc::new(Mutex::new(TransactionRepository::load(store))),
            notifier: Notifier::default(),
            chart_renderer: renderer.clone(),
            local_timezone: "Etc/UTC".to_owned(),
        };

        (state, renderer)
    }

    fn form(name: &str, amount: f64, type_: TransactionType, category: Category) -> TransactionForm {
        TransactionForm {
            name: name.to_owned(),
            amount,
            type_,
            category,
            date: Some(date!(2024 - 01 - 01)),
            filter: TransactionFilter::All,
        }
    }

    async fn parse_body(response: Response<Body>) -> Html {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        Html::parse_fragment(&String::from_utf8_lossy(&body))
    }

    #[track_caller]
    fn assert_text(html: &Html, selector: &str, want: &str) {
        let parsed = Selector::parse(selector).unwrap();
        let element = html
            .select(&parsed)
            .next()
            .unwrap_or_else(|| panic!("could not find element matching {selector}"));
        let got = element.text().collect::<String>();
        assert_eq!(got.trim(), want, "unexpected text for {selector}");
    }

    #[track_caller]
    fn assert_oob(html: &Html, id: &str) {
        let parsed = Selector::parse(&format!("#{id}[hx-swap-oob]")).unwrap();
        assert!(
            html.select(&parsed).next().is_some(),
            "want out-of-band fragment #{id}"
        );
    }

    fn count(html: &Html, selector: &str) -> usize {
        html.select(&Selector::parse(selector).unwrap()).count()
    }

    #[tokio::test]
    async fn create_adds_persists_and_renders_fragments() {
        let (state, renderer) = get_test_state(MemoryStore::new());

        let response = create_transaction_endpoint(
            State(state.clone()),
            Form(form("Groceries", 300.0, TransactionType::Expense, Category::Food)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_body(response).await;

        for id in [
            "summary",
            "transactions-list",
            "category-breakdown",
            "transaction-form",
            "alert-container",
        ] {
            assert_oob(&html, id);
        }
        assert_text(&html, "[data-summary='expenses']", "₽300.00");
        assert_text(&html, "[data-alert='success']", "Transaction saved");
        assert_eq!(count(&html, "li[data-transaction-id]"), 1);
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);

        let repository = state.repository.lock().unwrap();
        assert_eq!(repository.len(), 1);
        assert_eq!(repository.transactions()[0].name, "Groceries");
        assert_eq!(state.notifier.current().as_deref(), Some("Transaction saved"));
    }

    #[tokio::test]
    async fn create_without_date_uses_today() {
        let (state, _) = get_test_state(MemoryStore::new());
        let mut form = form("Pay", 1000.0, TransactionType::Income, Category::Salary);
        form.date = None;

        create_transaction_endpoint(State(state.clone()), Form(form)).await;

        let repository = state.repository.lock().unwrap();
        assert_eq!(
            repository.transactions()[0].date,
            OffsetDateTime::now_utc().date()
        );
    }

    #[tokio::test]
    async fn create_resets_form_date_to_today() {
        let (state, _) = get_test_state(MemoryStore::new());

        let response = create_transaction_endpoint(
            State(state),
            Form(form("Bus", 50.0, TransactionType::Expense, Category::Transport)),
        )
        .await;

        let html = parse_body(response).await;
        let date_input = Selector::parse("#transaction-form input[name='date']").unwrap();
        let value = html
            .select(&date_input)
            .next()
            .and_then(|input| input.value().attr("value"))
            .map(str::to_owned);
        assert_eq!(value, Some(OffsetDateTime::now_utc().date().to_string()));
    }

    #[tokio::test]
    async fn create_keeps_current_filter() {
        let (state, _) = get_test_state(MemoryStore::new());
        create_transaction_endpoint(
            State(state.clone()),
            Form(form("Pay", 1000.0, TransactionType::Income, Category::Salary)),
        )
        .await;

        let mut expense_form = form("Bus", 50.0, TransactionType::Expense, Category::Transport);
        expense_form.filter = TransactionFilter::Income;
        let response = create_transaction_endpoint(State(state), Form(expense_form)).await;

        let html = parse_body(response).await;
        assert_eq!(count(&html, "li[data-transaction-id]"), 1);
        assert_eq!(count(&html, "li[data-type='income']"), 1);
    }

    #[tokio::test]
    async fn income_does_not_invoke_chart_renderer() {
        let (state, renderer) = get_test_state(MemoryStore::new());

        let response = create_transaction_endpoint(
            State(state),
            Form(form("Pay", 1000.0, TransactionType::Income, Category::Salary)),
        )
        .await;

        let html = parse_body(response).await;
        assert_text(&html, "#category-breakdown [data-placeholder]", "No data to display");
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn create_reports_persist_failure_but_keeps_change() {
        let (state, _) = get_test_state(ReadOnlyStore);

        let response = create_transaction_endpoint(
            State(state.clone()),
            Form(form("Groceries", 300.0, TransactionType::Expense, Category::Food)),
        )
        .await;

        let html = parse_body(response).await;
        assert_text(
            &html,
            "[data-alert='error'] p",
            "Could not save your transactions",
        );
        assert_eq!(count(&html, "li[data-transaction-id]"), 1);
        assert_eq!(state.repository.lock().unwrap().len(), 1);
        assert_eq!(state.notifier.current(), None);
    }

    #[tokio::test]
    async fn create_rejects_non_finite_amount_and_keeps_saved_ledger() {
        let directory = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::open(directory.path()).unwrap();
        let (state, _) = get_test_state(store);
        create_transaction_endpoint(
            State(state.clone()),
            Form(form("Pay", 1000.0, TransactionType::Income, Category::Salary)),
        )
        .await;

        for amount in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let response = create_transaction_endpoint(
                State(state.clone()),
                Form(form("Broken", amount, TransactionType::Expense, Category::Food)),
            )
            .await;

            assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
            let html = parse_body(response).await;
            assert_text(&html, "[data-alert='error'] p", "Invalid amount");
        }

        assert_eq!(state.repository.lock().unwrap().len(), 1);
        let reloaded =
            TransactionRepository::load(JsonFileStore::open(directory.path()).unwrap());
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.transactions()[0].amount, 1000.0);
    }

    #[tokio::test]
    async fn create_with_invalid_timezone_returns_error_alert() {
        let (mut state, _) = get_test_state(MemoryStore::new());
        state.local_timezone = "Not/AZone".to_owned();

        let response = create_transaction_endpoint(
            State(state.clone()),
            Form(form("Groceries", 300.0, TransactionType::Expense, Category::Food)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(state.repository.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_removes_persists_and_renders_fragments() {
        let (state, _) = get_test_state(MemoryStore::new());
        create_transaction_endpoint(
            State(state.clone()),
            Form(form("Pay", 1000.0, TransactionType::Income, Category::Salary)),
        )
        .await;
        create_transaction_endpoint(
            State(state.clone()),
            Form(form("Groceries", 300.0, TransactionType::Expense, Category::Food)),
        )
        .await;
        let groceries_id = state.repository.lock().unwrap().transactions()[1].id.clone();

        let response = delete_transaction_endpoint(
            State(state.clone()),
            Path(groceries_id.to_string()),
            Query(FilterQuery::default()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_body(response).await;
        for id in ["summary", "transactions-list", "category-breakdown", "alert-container"] {
            assert_oob(&html, id);
        }
        assert_text(&html, "[data-summary='balance']", "₽1000.00");
        assert_text(&html, "[data-alert='success']", "Transaction deleted");
        assert_eq!(count(&html, "li[data-transaction-id]"), 1);

        let repository = state.repository.lock().unwrap();
        assert_eq!(repository.len(), 1);
        assert!(repository.get(&groceries_id).is_none());
    }

    #[tokio::test]
    async fn delete_writes_ledger_to_store() {
        let directory = tempfile::tempdir().expect("tempdir");
        let mut store = JsonFileStore::open(directory.path()).unwrap();
        store
            .set(
                TRANSACTIONS_KEY,
                r#"[{"id":"abc123xyz","name":"Pay","amount":10,"type":"income","category":"salary","date":"2024-01-01"}]"#,
            )
            .unwrap();
        let (state, _) = get_test_state(store);

        delete_transaction_endpoint(
            State(state.clone()),
            Path("abc123xyz".to_owned()),
            Query(FilterQuery::default()),
        )
        .await;

        let reopened = JsonFileStore::open(directory.path()).unwrap();
        assert_eq!(
            reopened.get(TRANSACTIONS_KEY).unwrap().as_deref(),
            Some("[]")
        );
    }

    #[tokio::test]
    async fn delete_missing_id_is_a_no_op() {
        let (state, _) = get_test_state(MemoryStore::new());
        create_transaction_endpoint(
            State(state.clone()),
            Form(form("Pay", 1000.0, TransactionType::Income, Category::Salary)),
        )
        .await;
        let before: Vec<Transaction> = state.repository.lock().unwrap().transactions().to_vec();

        let response = delete_transaction_endpoint(
            State(state.clone()),
            Path("missing00".to_owned()),
            Query(FilterQuery::default()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_body(response).await;
        assert_oob(&html, "transactions-list");
        assert_eq!(count(&html, "[data-alert]"), 0);
        assert_eq!(state.repository.lock().unwrap().transactions(), before.as_slice());
    }

    #[tokio::test]
    async fn list_endpoint_renders_filtered_list_only() {
        let (state, renderer) = get_test_state(MemoryStore::new());
        for (name, type_, category) in [
            ("Pay", TransactionType::Income, Category::Salary),
            ("Groceries", TransactionType::Expense, Category::Food),
        ] {
            create_transaction_endpoint(State(state.clone()), Form(form(name, 10.0, type_, category)))
                .await;
        }
        let chart_calls = renderer.calls.load(Ordering::SeqCst);

        let response = get_transaction_list(
            State(state),
            Query(FilterQuery {
                filter: TransactionFilter::Expense,
            }),
        )
        .await;

        let html = parse_body(response).await;
        assert_eq!(count(&html, "li[data-type='expense']"), 1);
        assert_eq!(count(&html, "li[data-type='income']"), 0);
        assert_eq!(count(&html, "#summary"), 0);
        assert_eq!(count(&html, "[hx-swap-oob]"), 0);
        assert_eq!(renderer.calls.load(Ordering::SeqCst), chart_calls);
    }

    #[tokio::test]
    async fn page_renders_loaded_ledger() {
        let store = MemoryStore::with_value(
            TRANSACTIONS_KEY,
            r#"[{"id":"abc123xyz","name":"Pay","amount":"700","type":"income","category":"salary","date":"2024-01-01"}]"#,
        );
        let (state, _) = get_test_state(store);

        let response = get_ledger_page(State(state), Query(FilterQuery::default())).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_body(response).await;
        assert_text(&html, "[data-summary='balance']", "₽700.00");
        assert_text(&html, "[data-field='name']", "Pay");
    }

    #[test]
    fn form_decodes_date_and_default_filter() {
        let form: TransactionForm = serde_html_form::from_str(
            "name=Pay&amount=1000&type=income&category=salary&date=2024-02-29",
        )
        .unwrap();

        assert_eq!(form.date, Some(date!(2024 - 02 - 29)));
        assert_eq!(form.filter, TransactionFilter::All);
    }
}
