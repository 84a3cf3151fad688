use std::cell::RefCell;
use std::fmt::Display;
use std::future::Future;

use log::{debug, info, warn};

use crate::entity_store::{Entity, EntityStore, SortComparer};
use crate::lifecycle::{Lifecycle, Status};

/// A remotely loaded collection: its records and the state of its load.
#[derive(Clone, Debug)]
pub struct Resource<T: Entity> {
    pub store: EntityStore<T>,
    pub lifecycle: Lifecycle,
    // bumped by `clear` so loads started before it are dropped
    generation: u64,
    // set by `invalidate` while a load is in flight
    stale: bool,
}

impl<T: Entity> Default for Resource<T> {
    fn default() -> Self {
        Resource {
            store: EntityStore::new(),
            lifecycle: Lifecycle::new(),
            generation: 0,
            stale: false,
        }
    }
}

impl<T: Entity> Resource<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sort(sort_comparer: SortComparer<T>) -> Self {
        Resource {
            store: EntityStore::with_sort(sort_comparer),
            ..Self::default()
        }
    }

    /// Back to the initial, never loaded state. A load that is in flight
    /// completes without touching the resource.
    pub fn clear(&mut self) {
        self.store.remove_all();
        self.lifecycle = Lifecycle::new();
        self.generation += 1;
        self.stale = false;
    }

    /// Marks the loaded records as out of date, so the next fetch loads them
    /// again. The records stay readable meanwhile. A load already in flight
    /// still lands, but leaves the resource idle instead of settled.
    pub fn invalidate(&mut self) {
        if self.lifecycle.is_pending() {
            self.stale = true;
        } else {
            self.lifecycle.reset();
        }
    }
}

/// Loads every record of `resource` through `load`, unless the resource is
/// not idle, in which case nothing happens. Returns the status afterwards.
///
/// No borrow of `resource` is held while `load` runs, so callers on the same
/// thread can read the store (and see `Pending`) in the meantime.
pub async fn fetch_all<T, E, F, Fut>(resource: &RefCell<Resource<T>>, name: &str, load: F) -> Status
where
    T: Entity,
    E: Display,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    let generation = {
        let mut resource = resource.borrow_mut();
        if !resource.lifecycle.begin() {
            debug!("{}: not fetching, status is {}", name, resource.lifecycle.status());
            return resource.lifecycle.status();
        }
        resource.generation
    };
    debug!("{}: fetching", name);

    let loaded = load().await;

    let mut resource = resource.borrow_mut();
    if resource.generation != generation {
        debug!("{}: resource was cleared during the fetch, dropping the result", name);
        return resource.lifecycle.status();
    }
    match loaded {
        Ok(records) => {
            info!("{}: loaded {} records", name, records.len());
            resource.store.set_all(records);
            resource.lifecycle.succeed();
        }
        Err(err) => {
            warn!("{}: fetch failed: {}", name, err);
            resource.lifecycle.fail(Some(err.to_string()));
        }
    }
    if resource.stale {
        debug!("{}: invalidated during the fetch, due for another", name);
        resource.stale = false;
        resource.lifecycle.reset();
    }
    resource.lifecycle.status()
}

/// Awaits `request` and stores the record it yields. On error the store is
/// left as it was and the error goes back to the caller.
pub async fn create_one<T, E, Fut>(resource: &RefCell<Resource<T>>, request: Fut) -> Result<T, E>
where
    T: Entity,
    Fut: Future<Output = Result<T, E>>,
{
    let record = request.await?;
    resource.borrow_mut().store.add_one(record.clone());
    Ok(record)
}
