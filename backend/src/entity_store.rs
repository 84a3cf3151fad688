//! Normalized storage for records keyed by a string id.
//!
//! Records live in a map; a separate id list keeps insertion order. When the
//! store has a sort comparer, reads apply it on top of insertion order with a
//! stable sort, so records that compare equal stay in the order they arrived.

use std::cmp::Ordering;
use std::collections::HashMap;

pub trait Entity: Clone {
    fn id(&self) -> &str;
}

/// Partial changes merged into an existing record. Implementations must not
/// touch the record's id.
pub trait Patch<T> {
    fn apply(self, target: &mut T);
}

/// Named counters a record exposes for [`EntityStore::increment_counter`].
pub trait Counters {
    fn counter_mut(&mut self, name: &str) -> Option<&mut u32>;
}

pub type SortComparer<T> = fn(&T, &T) -> Ordering;

#[derive(Clone, Debug)]
pub struct EntityStore<T: Entity> {
    entities: HashMap<String, T>,
    ids: Vec<String>,
    sort_comparer: Option<SortComparer<T>>,
}

impl<T: Entity> Default for EntityStore<T> {
    fn default() -> Self {
        EntityStore {
            entities: HashMap::new(),
            ids: Vec::new(),
            sort_comparer: None,
        }
    }
}

impl<T: Entity> EntityStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sort(sort_comparer: SortComparer<T>) -> Self {
        EntityStore {
            sort_comparer: Some(sort_comparer),
            ..Self::default()
        }
    }

    // returns true when the id was not present before
    fn insert(&mut self, record: T) -> bool {
        let id = record.id().to_owned();
        match self.entities.insert(id.clone(), record) {
            Some(_) => false,
            None => {
                self.ids.push(id);
                true
            }
        }
    }

    /// Replaces the whole contents. A duplicated id keeps its first position
    /// and its last value.
    pub fn set_all<I: IntoIterator<Item = T>>(&mut self, records: I) {
        self.remove_all();
        for record in records {
            self.insert(record);
        }
    }

    /// Inserts or overwrites one record. Returns true if the id is new.
    pub fn add_one(&mut self, record: T) -> bool {
        self.insert(record)
    }

    /// Returns false when no record has this id.
    pub fn update_one<P: Patch<T>>(&mut self, id: &str, changes: P) -> bool {
        match self.entities.get_mut(id) {
            Some(record) => {
                changes.apply(record);
                debug_assert_eq!(record.id(), id, "a patch changed a record id");
                true
            }
            None => false,
        }
    }

    pub fn remove_all(&mut self) {
        self.entities.clear();
        self.ids.clear();
    }

    pub fn get_by_id(&self, id: &str) -> Option<&T> {
        self.entities.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    /// All records in display order.
    pub fn get_all(&self) -> Vec<&T> {
        let mut records: Vec<&T> = self
            .ids
            .iter()
            .filter_map(|id| self.entities.get(id))
            .collect();
        if let Some(sort_comparer) = self.sort_comparer {
            records.sort_by(|a, b| sort_comparer(a, b));
        }
        records
    }

    /// Ids in display order.
    pub fn ids(&self) -> Vec<&str> {
        self.get_all().into_iter().map(|record| record.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        let unique: std::collections::HashSet<&String> = self.ids.iter().collect();
        unique.len() == self.ids.len()
            && self.ids.len() == self.entities.len()
            && self.ids.iter().all(|id| self.entities.contains_key(id))
            && self.entities.iter().all(|(id, record)| id == record.id())
    }
}

impl<T: Entity + Counters> EntityStore<T> {
    /// Adds one to a named counter of one record. Returns false, changing
    /// nothing, when the id or the counter name is unknown.
    pub fn increment_counter(&mut self, id: &str, name: &str) -> bool {
        match self
            .entities
            .get_mut(id)
            .and_then(|record| record.counter_mut(name))
        {
            Some(counter) => {
                *counter = counter.saturating_add(1);
                true
            }
            None => false,
        }
    }
}
