//! Transactional in-memory table keyed on strings.
//!
//! Read transactions hold an immutable snapshot and never observe later
//! commits. Write transactions serialize on a mutex, mutate a private copy
//! and publish it atomically on commit; dropping one without committing
//! discards the copy. Both maps are persistent, so taking the copy is O(1)
//! and each change touches O(log n) shared nodes.

use std::ops::Bound;
use std::sync::Arc;

use imbl::{HashMap, OrdMap};
use parking_lot::{Mutex, MutexGuard, RwLock};

use crate::error::TableError;

/// A row of a [`Table`]: unique string key plus a unique numeric id.
pub trait Record: Clone + Send + Sync + 'static {
    fn key(&self) -> &str;
    fn id(&self) -> u64;
}

#[derive(Debug, Clone)]
struct Snapshot<R> {
    rows: OrdMap<Arc<str>, Arc<R>>,
    ids: HashMap<u64, Arc<str>>,
}

impl<R: Record> Snapshot<R> {
    fn empty() -> Self {
        Snapshot {
            rows: OrdMap::new(),
            ids: HashMap::new(),
        }
    }

    fn get(&self, key: &str) -> Option<&R> {
        self.rows.get(key).map(Arc::as_ref)
    }

    fn get_by_id(&self, id: u64) -> Option<&R> {
        self.ids.get(&id).and_then(|key| self.get(key))
    }

    fn prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a R> + 'a {
        self.rows
            .range::<_, str>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(key, _)| key.starts_with(prefix))
            .map(|(_, row)| &**row)
    }
}

/// Thread-safe transactional table.
#[derive(Debug)]
pub struct Table<R> {
    current: RwLock<Arc<Snapshot<R>>>,
    writer: Mutex<()>,
}

impl<R: Record> Table<R> {
    pub fn new() -> Self {
        Table {
            current: RwLock::new(Arc::new(Snapshot::empty())),
            writer: Mutex::new(()),
        }
    }

    /// Open a read transaction on the latest committed state.
    pub fn read(&self) -> ReadTxn<R> {
        ReadTxn {
            snapshot: self.current.read().clone(),
        }
    }

    /// Open a write transaction, waiting for any writer in flight.
    pub fn write(&self) -> WriteTxn<'_, R> {
        let guard = self.writer.lock();
        let working = (**self.current.read()).clone();
        WriteTxn {
            table: self,
            guard,
            working,
        }
    }
}

impl<R: Record> Default for Table<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view of a [`Table`].
#[derive(Debug, Clone)]
pub struct ReadTxn<R> {
    snapshot: Arc<Snapshot<R>>,
}

impl<R: Record> ReadTxn<R> {
    pub fn get(&self, key: &str) -> Option<&R> {
        self.snapshot.get(key)
    }

    pub fn get_by_id(&self, id: u64) -> Option<&R> {
        self.snapshot.get_by_id(id)
    }

    /// All rows whose key starts with `prefix`, in key order.
    pub fn prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a R> + 'a {
        self.snapshot.prefix(prefix)
    }

    pub fn len(&self) -> usize {
        self.snapshot.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.rows.is_empty()
    }
}

/// Exclusive, private working copy of a [`Table`].
pub struct WriteTxn<'a, R> {
    table: &'a Table<R>,
    guard: MutexGuard<'a, ()>,
    working: Snapshot<R>,
}

impl<R: Record> WriteTxn<'_, R> {
    pub fn get(&self, key: &str) -> Option<&R> {
        self.working.get(key)
    }

    pub fn get_by_id(&self, id: u64) -> Option<&R> {
        self.working.get_by_id(id)
    }

    pub fn prefix<'b>(&'b self, prefix: &'b str) -> impl Iterator<Item = &'b R> + 'b {
        self.working.prefix(prefix)
    }

    pub fn len(&self) -> usize {
        self.working.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.working.rows.is_empty()
    }

    /// Insert or replace the row with the record's key.
    ///
    /// Fails if the record's id is already owned by a different key.
    pub fn insert(&mut self, record: R) -> Result<Option<Arc<R>>, TableError> {
        let key: Arc<str> = Arc::from(record.key());
        let id = record.id();

        if let Some(owner) = self.working.ids.get(&id) {
            if *owner != key {
                return Err(TableError::UniqueViolation {
                    id,
                    key: key.to_string(),
                    owner: owner.to_string(),
                });
            }
        }
        if let Some(old) = self.working.rows.get(&*key) {
            if old.id() != id {
                self.working.ids.remove(&old.id());
            }
        }

        self.working.ids.insert(id, Arc::clone(&key));
        Ok(self.working.rows.insert(key, Arc::new(record)))
    }

    pub fn delete(&mut self, key: &str) -> Option<Arc<R>> {
        let removed = self.working.rows.remove(key)?;
        self.working.ids.remove(&removed.id());
        Some(removed)
    }

    /// Delete every row whose key starts with `prefix`.
    pub fn delete_prefix(&mut self, prefix: &str) -> usize {
        let keys: Vec<Arc<str>> = self
            .working
            .prefix(prefix)
            .map(|row| Arc::from(row.key()))
            .collect();
        for key in &keys {
            self.delete(key);
        }
        keys.len()
    }

    /// Publish the working copy.
    pub fn commit(self) {
        let WriteTxn {
            table,
            guard,
            working,
        } = self;
        *table.current.write() = Arc::new(working);
        drop(guard);
    }
}
