//! Shared, persisted inventory state.
//!
//! One mutex guards the whole item map. Every public operation holds it only for its
//! in-memory critical section; snapshots for the durable record are produced under the
//! lock and written by a [`PersistWorker`] thread outside it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{Span, info, info_span, warn};

use packforge_core::{DomainError, DomainResult};
use packforge_inventory::{Allocation, InventoryRecord, ItemPackMap, Pack, PackSet, allocate};

use crate::store::{JsonFileStore, StoreError};
use crate::workers::persist_worker::{PersistWorker, PersistWorkerHandle, Persister};

/// Authoritative item → pack set mapping for the running process.
#[derive(Debug)]
pub struct InventoryStore {
    items: Mutex<ItemPackMap>,
    persister: Option<Persister<InventoryRecord>>,
    allocation_anomalies: AtomicU64,
    span: Span,
}

impl Default for InventoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InventoryStore {
    /// Empty, memory-only store.
    pub fn new() -> Self {
        Self::from_map(ItemPackMap::new())
    }

    /// Memory-only store seeded from a durable record.
    pub fn from_record(record: InventoryRecord) -> Self {
        Self::from_map(ItemPackMap::from_record(record))
    }

    fn from_map(items: ItemPackMap) -> Self {
        Self {
            items: Mutex::new(items),
            persister: None,
            allocation_anomalies: AtomicU64::new(0),
            span: info_span!("inventory"),
        }
    }

    /// Read the durable record and build a memory-only store from it.
    ///
    /// Fails if the record is missing or malformed. Individual bad packs inside a
    /// readable record are skipped with a warning.
    pub fn load(storage: &JsonFileStore<InventoryRecord>) -> Result<Self, StoreError> {
        let record = storage.load()?;
        let store = Self::from_record(record);
        {
            let _enter = store.span.enter();
            info!(path = %storage.path().display(), items = store.lock().len(), "loaded inventory");
        }
        Ok(store)
    }

    /// Load the durable record and start a worker that mirrors every mutation back to it.
    pub fn open(
        storage: JsonFileStore<InventoryRecord>,
    ) -> Result<(Self, PersistWorkerHandle), StoreError> {
        let store = Self::load(&storage)?;
        let (persister, handle) = PersistWorker::spawn("inventory-persist", storage)?;
        Ok((store.with_persister(persister), handle))
    }

    /// Mirror mutations through `persister`.
    pub fn with_persister(mut self, persister: Persister<InventoryRecord>) -> Self {
        self.persister = Some(persister);
        self
    }

    // A panic under the lock cannot leave a half-built pack set behind: sets are
    // built outside and swapped in whole, or mutated through fallible calls that
    // return before touching state.
    fn lock(&self) -> MutexGuard<'_, ItemPackMap> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue the current state for writing. Must be called with the lock held so
    /// snapshots reach the worker in mutation order.
    fn submit_locked(&self, items: &ItemPackMap) {
        let Some(persister) = &self.persister else {
            return;
        };
        if !persister.submit(items.to_record()) {
            warn!("persist worker is not running; snapshot dropped");
        }
    }

    /// Snapshot of one item's packs, ascending by size.
    pub fn get_packs(&self, item_id: &str) -> DomainResult<Vec<Pack>> {
        let items = self.lock();
        items
            .get(item_id)
            .map(PackSet::snapshot)
            .ok_or_else(|| DomainError::item_not_found(item_id))
    }

    /// Replace all packs of `item_id` with `packs`, creating the item if needed.
    ///
    /// The list is validated as a whole; one duplicate rejects it and leaves the previous
    /// packs in place. Returns the stored, sorted packs. Persistence is queued, not awaited.
    pub fn replace(&self, item_id: &str, packs: Vec<Pack>) -> DomainResult<Vec<Pack>> {
        let _enter = self.span.enter();

        let set = PackSet::try_from_packs(packs).map_err(|err| {
            warn!(item_id, error = %err, "rejected pack list");
            DomainError::validation(format!("invalid pack list for item {item_id}: {err}"))
        })?;
        let stored = set.snapshot();

        {
            let mut items = self.lock();
            items.insert(item_id, set);
            self.submit_locked(&items);
        }

        info!(item_id, packs = stored.len(), "replaced item packs");
        Ok(stored)
    }

    /// Add one pack to `item_id`, creating the item if needed.
    pub fn add_pack(&self, item_id: &str, pack: Pack) -> DomainResult<()> {
        let _enter = self.span.enter();
        let size = pack.size;

        let mut items = self.lock();
        match items.get_mut(item_id) {
            Some(set) => {
                set.add(pack)?;
                set.sort();
            }
            None => {
                items.insert(item_id, PackSet::try_from_packs([pack])?);
            }
        }
        self.submit_locked(&items);
        drop(items);

        info!(item_id, size, "added pack");
        Ok(())
    }

    /// Remove one pack from `item_id`.
    pub fn remove_pack(&self, item_id: &str, pack: &Pack) -> DomainResult<()> {
        let _enter = self.span.enter();

        let mut items = self.lock();
        let set = items
            .get_mut(item_id)
            .ok_or_else(|| DomainError::item_not_found(item_id))?;
        set.remove(pack)?;
        self.submit_locked(&items);
        drop(items);

        info!(item_id, size = pack.size, "removed pack");
        Ok(())
    }

    /// Re-sort one item's packs.
    pub fn sort_item(&self, item_id: &str) -> DomainResult<()> {
        self.lock().sort(item_id)
    }

    /// Durable shape of the whole inventory.
    pub fn serialize(&self) -> InventoryRecord {
        self.lock().to_record()
    }

    /// Queue the current state for writing. Failures are logged by the worker.
    pub fn persist(&self) {
        let _enter = self.span.enter();
        let items = self.lock();
        if self.persister.is_none() {
            warn!("persist requested on a store without durable storage");
            return;
        }
        self.submit_locked(&items);
    }

    /// Allocate packs of `item_id` for `count` units.
    ///
    /// The allocator runs on a snapshot, outside the lock. Runs that hit the iteration
    /// bound are counted in [`InventoryStore::allocation_anomalies`].
    pub fn process_order(&self, item_id: &str, count: i64) -> DomainResult<Allocation> {
        let _enter = self.span.enter();
        let packs = self.get_packs(item_id)?;
        let allocation = allocate(&packs, count);

        if allocation.exhausted {
            self.allocation_anomalies.fetch_add(1, Ordering::Relaxed);
            warn!(
                item_id,
                count,
                remaining = allocation.remaining,
                "order allocation stopped at iteration bound"
            );
        }

        info!(
            item_id,
            count,
            packs = allocation.order.pack_count(),
            units = allocation.order.total_units(),
            "processed order"
        );
        Ok(allocation)
    }

    /// Number of allocations that stopped at the iteration bound.
    pub fn allocation_anomalies(&self) -> u64 {
        self.allocation_anomalies.load(Ordering::Relaxed)
    }

    /// Known item identifiers, sorted.
    pub fn item_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.lock().item_ids().map(str::to_string).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
