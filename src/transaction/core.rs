//! Defines the core data models for transactions.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, de};
use time::Date;

// ============================================================================
// MODELS
// ============================================================================

time::serde::format_description!(pub(crate) iso_date, Date, "[year]-[month]-[day]");

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, build a [TransactionDraft] with
/// [Transaction::build] and add it to a
/// [TransactionRepository](crate::TransactionRepository).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A short label for what the transaction was for.
    pub name: String,
    /// The amount of money spent or earned in this transaction.
    ///
    /// The sign of the amount is ignored when deciding whether money came in
    /// or went out, use `type_` for that.
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: f64,
    /// Whether money was earned or spent.
    #[serde(rename = "type")]
    pub type_: TransactionType,
    /// What the money was earned or spent on.
    pub category: Category,
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
}

impl Transaction {
    /// Start building a new transaction.
    ///
    /// The category defaults to [Category::Other].
    pub fn build(type_: TransactionType, amount: f64, date: Date, name: &str) -> TransactionDraft {
        TransactionDraft {
            name: name.to_owned(),
            amount,
            type_,
            category: Category::Other,
            date,
        }
    }

    pub(crate) fn from_draft(id: TransactionId, draft: TransactionDraft) -> Self {
        Self {
            id,
            name: draft.name,
            amount: draft.amount,
            type_: draft.type_,
            category: draft.category,
            date: draft.date,
        }
    }
}

/// A transaction that has not been given an ID yet.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    /// A short label for what the transaction was for.
    pub name: String,
    /// The amount of money spent or earned, as entered by the user.
    pub amount: f64,
    /// Whether money was earned or spent.
    pub type_: TransactionType,
    /// What the money was earned or spent on.
    pub category: Category,
    /// When the transaction happened.
    pub date: Date,
}

impl TransactionDraft {
    /// Set the category for the transaction.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }
}

/// The unique, opaque identifier of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

/// The number of characters in a generated [TransactionId].
pub const TRANSACTION_ID_LENGTH: usize = 9;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

impl TransactionId {
    /// Generate a random lowercase base-36 ID.
    ///
    /// Uniqueness is not checked here, see
    /// [TransactionRepository::add](crate::TransactionRepository::add).
    pub fn random(rng: &mut impl Rng) -> Self {
        let id = (0..TRANSACTION_ID_LENGTH)
            .map(|_| char::from(ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())]))
            .collect();

        Self(id)
    }

    /// The ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for TransactionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a transaction is income or an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money that was earned.
    Income,
    /// Money that was spent.
    Expense,
}

impl TransactionType {
    /// The lowercase name used in forms and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// The human-readable name of the type.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }
}

/// What a transaction was for.
///
/// Values outside of the known set are kept as [Category::Unknown] so that
/// data written by other versions of the app survives a load/save cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    /// Wages and other regular pay.
    Salary,
    /// Groceries and eating out.
    Food,
    /// Public transport, fuel and taxis.
    Transport,
    /// Going out, games and subscriptions.
    Entertainment,
    /// Clothes and other purchases.
    Shopping,
    /// Rent and mortgage payments.
    Housing,
    /// Power, water and internet bills.
    Utilities,
    /// Doctors and medicine.
    Healthcare,
    /// Anything else.
    Other,
    /// A category that this version of the app does not know about.
    Unknown(String),
}

impl Category {
    /// Every category that can be selected in the transaction form, in display order.
    pub const KNOWN: [Category; 9] = [
        Category::Salary,
        Category::Food,
        Category::Transport,
        Category::Entertainment,
        Category::Shopping,
        Category::Housing,
        Category::Utilities,
        Category::Healthcare,
        Category::Other,
    ];

    /// The key used in forms and JSON.
    pub fn key(&self) -> &str {
        match self {
            Category::Salary => "salary",
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Entertainment => "entertainment",
            Category::Shopping => "shopping",
            Category::Housing => "housing",
            Category::Utilities => "utilities",
            Category::Healthcare => "healthcare",
            Category::Other => "other",
            Category::Unknown(raw) => raw,
        }
    }

    /// The human-readable name of the category.
    ///
    /// Unknown categories are shown as they were stored.
    pub fn label(&self) -> &str {
        match self {
            Category::Salary => "Salary",
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Housing => "Housing",
            Category::Utilities => "Utilities",
            Category::Healthcare => "Healthcare",
            Category::Other => "Other",
            Category::Unknown(raw) => raw,
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.as_str() {
            "salary" => Category::Salary,
            "food" => Category::Food,
            "transport" => Category::Transport,
            "entertainment" => Category::Entertainment,
            "shopping" => Category::Shopping,
            "housing" => Category::Housing,
            "utilities" => Category::Utilities,
            "healthcare" => Category::Healthcare,
            "other" => Category::Other,
            _ => Category::Unknown(value),
        }
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        match value {
            Category::Unknown(raw) => raw,
            known => known.key().to_owned(),
        }
    }
}

// ============================================================================
// SERDE HELPERS
// ============================================================================

/// Accept amounts stored either as JSON numbers or as numeric strings.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Number(f64),
        Text(String),
    }

    match RawAmount::deserialize(deserializer)? {
        RawAmount::Number(amount) => Ok(amount),
        RawAmount::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|error| de::Error::custom(format!("invalid amount \"{text}\": {error}"))),
    }
}

// ============================================================================
// TESTS
// ============================================================================
