use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use error_stack::Report;
use serde_json::Value;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::KernelError;

pub use self::{listing::*, review::*, voucher::*};

mod listing;
mod review;
mod voucher;

/// In-memory document backend with the same optimistic-concurrency contract
/// as the Postgres driver: every write is buffered on its transaction and
/// applied all-or-nothing at commit, and a guarded update whose expected
/// revision no longer matches fails the whole commit with
/// [`KernelError::Conflict`].
///
/// Reads observe committed state only; a transaction does not see its own
/// buffered writes. Cloning shares the underlying store.
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    store: Arc<MemoryStore>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

type Collections = HashMap<&'static str, HashMap<Uuid, Document>>;

#[derive(Default)]
pub(in crate::database) struct MemoryStore {
    collections: Mutex<Collections>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Collections> {
        self.collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Clone)]
pub(in crate::database) struct Document {
    pub(in crate::database) version: i64,
    pub(in crate::database) body: Value,
}

pub(in crate::database) enum Write {
    Insert {
        collection: &'static str,
        id: Uuid,
        document: Document,
    },
    Update {
        collection: &'static str,
        id: Uuid,
        expected: i64,
        document: Document,
    },
}

pub struct MemoryTransaction {
    store: Arc<MemoryStore>,
    writes: Vec<Write>,
}

impl MemoryTransaction {
    pub(in crate::database) fn read(&self, collection: &'static str, id: &Uuid) -> Option<Document> {
        self.store
            .lock()
            .get(collection)
            .and_then(|documents| documents.get(id))
            .cloned()
    }

    pub(in crate::database) fn read_all(&self, collection: &'static str) -> Vec<Document> {
        self.store
            .lock()
            .get(collection)
            .map(|documents| documents.values().cloned().collect())
            .unwrap_or_default()
    }

    pub(in crate::database) fn push(&mut self, write: Write) {
        self.writes.push(write);
    }
}

#[async_trait::async_trait]
impl DatabaseConnection<MemoryTransaction> for MemoryDatabase {
    async fn transact(&self) -> error_stack::Result<MemoryTransaction, KernelError> {
        Ok(MemoryTransaction {
            store: Arc::clone(&self.store),
            writes: Vec::new(),
        })
    }
}

#[async_trait::async_trait]
impl Transaction for MemoryTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        let Self { store, writes } = self;
        let mut collections = store.lock();
        for write in &writes {
            if let Write::Update {
                collection,
                id,
                expected,
                ..
            } = write
            {
                let current = collections
                    .get(*collection)
                    .and_then(|documents| documents.get(id))
                    .map(|document| document.version);
                if current != Some(*expected) {
                    tracing::trace!(collection, %id, expected, "commit rejected on stale revision");
                    return Err(Report::new(KernelError::Conflict).attach_printable(
                        "document revision advanced by a concurrently committed transaction",
                    ));
                }
            }
        }
        for write in writes {
            match write {
                Write::Insert {
                    collection,
                    id,
                    document,
                }
                | Write::Update {
                    collection,
                    id,
                    document,
                    ..
                } => {
                    collections.entry(collection).or_default().insert(id, document);
                }
            }
        }
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}
