//! The in-memory ledger and its persistence to a [DurableStore].

use std::collections::HashSet;

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    Error,
    store::DurableStore,
    transaction::{Transaction, TransactionDraft, TransactionId},
};

/// The store key that holds the JSON-serialized ledger.
pub const TRANSACTIONS_KEY: &str = "transactions";

/// The key a malformed ledger is copied to before the app starts empty.
pub const TRANSACTIONS_BACKUP_KEY: &str = "transactions.corrupt";

/// Owns every transaction in the ledger and writes them back to a store.
///
/// The collection has no meaningful order, views sort it explicitly.
pub struct TransactionRepository {
    store: Box<dyn DurableStore>,
    transactions: Vec<Transaction>,
    /// Every ID handed out or loaded during the lifetime of the repository,
    /// including those of deleted transactions, so an ID is never reused.
    issued_ids: HashSet<TransactionId>,
    rng: StdRng,
}

impl TransactionRepository {
    /// Create a repository holding the transactions saved in `store`.
    ///
    /// A missing, unreadable or malformed payload results in an empty ledger.
    /// The failure is logged, never returned.
    pub fn load(mut store: impl DurableStore + 'static) -> Self {
        let transactions = read_transactions(&mut store);
        let issued_ids = transactions.iter().map(|t| t.id.clone()).collect();

        tracing::info!("Loaded {} transactions", transactions.len());

        Self {
            store: Box::new(store),
            transactions,
            issued_ids,
            rng: StdRng::from_entropy(),
        }
    }

    /// Add a new transaction to the ledger and return the stored record.
    ///
    /// The change is only in memory until [TransactionRepository::persist] is called.
    pub fn add(&mut self, draft: TransactionDraft) -> Transaction {
        let id = self.next_id();
        let transaction = Transaction::from_draft(id, draft);

        tracing::debug!("Adding transaction {}", transaction.id);
        self.transactions.push(transaction.clone());

        transaction
    }

    /// Remove the transaction with `id`.
    ///
    /// Returns whether a transaction was removed. Removing an ID that is not
    /// in the ledger does nothing.
    pub fn remove(&mut self, id: &TransactionId) -> bool {
        let count_before = self.transactions.len();
        self.transactions.retain(|transaction| &transaction.id != id);
        let removed = self.transactions.len() != count_before;

        if removed {
            tracing::debug!("Removed transaction {id}");
        } else {
            tracing::debug!("Tried to remove transaction {id}, but it is not in the ledger");
        }

        removed
    }

    /// Write the whole ledger to the store.
    ///
    /// # Errors
    /// Returns [Error::JSONSerializationError] if the ledger could not be
    /// serialized, or [Error::StoreError] if the store could not be written.
    pub fn persist(&mut self) -> Result<(), Error> {
        let payload = serde_json::to_string(&self.transactions)
            .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

        self.store.set(TRANSACTIONS_KEY, &payload)
    }

    /// All transactions in the ledger, in no particular order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Get the transaction with `id`, if it is in the ledger.
    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions
            .iter()
            .find(|transaction| &transaction.id == id)
    }

    /// The number of transactions in the ledger.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the ledger has no transactions.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    fn next_id(&mut self) -> TransactionId {
        loop {
            let id = TransactionId::random(&mut self.rng);

            if self.issued_ids.insert(id.clone()) {
                return id;
            }

            tracing::debug!("Generated duplicate transaction ID {id}, trying again");
        }
    }
}

fn read_transactions(store: &mut impl DurableStore) -> Vec<Transaction> {
    let payload = match store.get(TRANSACTIONS_KEY) {
        Ok(Some(payload)) => payload,
        Ok(None) => return Vec::new(),
        Err(error) => {
            tracing::error!("Could not read saved transactions, starting empty: {error}");
            return Vec::new();
        }
    };

    match serde_json::from_str(&payload) {
        Ok(transactions) => transactions,
        Err(error) => {
            tracing::error!("Saved transactions are malformed, starting empty: {error}");

            // The next save replaces the payload, so keep a copy for manual recovery.
            match store.set(TRANSACTIONS_BACKUP_KEY, &payload) {
                Ok(()) => tracing::warn!(
                    "Copied the malformed transactions to \"{TRANSACTIONS_BACKUP_KEY}\""
                ),
                Err(error) => {
                    tracing::error!("Could not back up the malformed transactions: {error}")
                }
            }

            Vec::new()
        }
    }
}
