//! Keyed document collection with declared unique indexes.
//!
//! Documents are stored under a monotonically increasing internal id. Each
//! unique index maps the extracted key to that id, so an insert either lands
//! in every index or in none of them.

use std::collections::{BTreeMap, HashMap};

use crate::domain::ports::{AccountRepositoryError, UniqueIndex};

/// Extracts the indexed key from a document.
pub(crate) type KeyFn<T> = fn(&T) -> &str;

struct IndexSpec<T> {
    index: UniqueIndex,
    key: KeyFn<T>,
    entries: HashMap<String, u64>,
}

/// In-memory collection of documents of type `T`.
pub(crate) struct DocumentCollection<T> {
    name: &'static str,
    documents: BTreeMap<u64, T>,
    next_id: u64,
    indexes: Vec<IndexSpec<T>>,
}

impl<T> DocumentCollection<T> {
    /// Create an empty collection without indexes.
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            documents: BTreeMap::new(),
            next_id: 0,
            indexes: Vec::new(),
        }
    }

    /// Declare a unique index over `key`.
    pub(crate) fn with_unique_index(mut self, index: UniqueIndex, key: KeyFn<T>) -> Self {
        self.indexes.push(IndexSpec {
            index,
            key,
            entries: HashMap::new(),
        });
        self
    }

    /// Collection name, used in log fields.
    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    /// Number of stored documents.
    pub(crate) fn len(&self) -> usize {
        self.documents.len()
    }

    /// Insert a document, rejecting it if any unique index already holds its
    /// key.
    pub(crate) fn insert(&mut self, document: T) -> Result<(), AccountRepositoryError> {
        if let Some(spec) = self
            .indexes
            .iter()
            .find(|spec| spec.entries.contains_key((spec.key)(&document)))
        {
            return Err(AccountRepositoryError::duplicate(spec.index));
        }

        let id = self.next_id;
        self.next_id += 1;
        for spec in &mut self.indexes {
            spec.entries.insert((spec.key)(&document).to_owned(), id);
        }
        self.documents.insert(id, document);
        Ok(())
    }

    fn id_for(&self, index: UniqueIndex, key: &str) -> Option<u64> {
        self.indexes
            .iter()
            .find(|spec| spec.index == index)
            .and_then(|spec| spec.entries.get(key).copied())
    }

    /// Look up a document through one of the declared indexes.
    pub(crate) fn find_by(&self, index: UniqueIndex, key: &str) -> Option<&T> {
        self.id_for(index, key)
            .and_then(|id| self.documents.get(&id))
    }

    /// Mutate the document stored under `key` in place.
    ///
    /// The closure must not change any indexed field.
    pub(crate) fn update_by<R>(
        &mut self,
        index: UniqueIndex,
        key: &str,
        update: impl FnOnce(&mut T) -> R,
    ) -> Option<R> {
        let id = self.id_for(index, key)?;
        self.documents.get_mut(&id).map(update)
    }

    /// Remove every document matching `predicate`, returning how many were
    /// removed.
    pub(crate) fn delete_where(&mut self, predicate: impl Fn(&T) -> bool) -> u64 {
        let doomed: Vec<u64> = self
            .documents
            .iter()
            .filter(|(_, document)| predicate(*document))
            .map(|(id, _)| *id)
            .collect();

        let mut removed = 0;
        for id in doomed {
            if let Some(document) = self.documents.remove(&id) {
                for spec in &mut self.indexes {
                    spec.entries.remove((spec.key)(&document));
                }
                removed += 1;
            }
        }
        removed
    }
}
