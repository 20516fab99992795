use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, warn};

use packforge_core::{DomainError, DomainResult};

use crate::item::Pack;

/// Durable shape of the inventory: item identifier to its ordered pack list.
///
/// A `BTreeMap` keeps the serialized record stable across runs.
pub type InventoryRecord = BTreeMap<String, Vec<Pack>>;

/// Ordered, duplicate-free collection of packs for one item.
///
/// Membership is checked against a hash index; order lives in a separate vector so
/// it can be sorted. Sorting is explicit: call [`PackSet::sort`] after a batch of
/// mutations and before relying on ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackSet {
    keys: HashSet<Pack>,
    values: Vec<Pack>,
}

impl PackSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sorted set from `packs`, failing on the first pack that cannot be added.
    pub fn try_from_packs(packs: impl IntoIterator<Item = Pack>) -> DomainResult<Self> {
        let mut set = Self::new();
        for pack in packs {
            set.add(pack)?;
        }
        set.sort();
        Ok(set)
    }

    /// Insert `pack` at the end of the sequence.
    pub fn add(&mut self, pack: Pack) -> DomainResult<()> {
        if pack.size == 0 {
            return Err(DomainError::validation("pack size must be positive"));
        }
        if self.keys.contains(&pack) {
            return Err(DomainError::PackAlreadyExists { size: pack.size });
        }

        debug!(size = pack.size, item_id = %pack.item.id, "added pack to set");
        self.keys.insert(pack.clone());
        self.values.push(pack);
        Ok(())
    }

    /// Remove `pack`, keeping the relative order of the remaining packs.
    pub fn remove(&mut self, pack: &Pack) -> DomainResult<()> {
        // Positions shift on sort, so the index cannot be cached in `keys`.
        let Some(index) = self.values.iter().position(|p| p == pack) else {
            return Err(DomainError::PackNotFound { size: pack.size });
        };

        self.keys.remove(pack);
        self.values.remove(index);
        Ok(())
    }

    /// Stable sort by ascending pack size; equal sizes keep insertion order.
    pub fn sort(&mut self) {
        self.values.sort_by_key(|p| p.size);
    }

    pub fn contains(&self, pack: &Pack) -> bool {
        self.keys.contains(pack)
    }

    /// Borrowed view of the current order.
    pub fn packs(&self) -> &[Pack] {
        &self.values
    }

    /// Owned copy of the current order, unaffected by later mutations.
    pub fn snapshot(&self) -> Vec<Pack> {
        self.values.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pack> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Associates each item identifier with its pack set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPackMap {
    inner: HashMap<String, PackSet>,
}

impl ItemPackMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a map from its durable shape.
    ///
    /// Packs that cannot be added (duplicates, zero sizes) are logged and skipped so one
    /// bad entry does not hide the rest of that item's packs.
    pub fn from_record(record: InventoryRecord) -> Self {
        let mut map = Self::new();
        for (item_id, packs) in record {
            let mut set = PackSet::new();
            for pack in packs {
                let size = pack.size;
                if let Err(err) = set.add(pack) {
                    warn!(item_id = %item_id, size, error = %err, "skipping pack from durable record");
                }
            }
            set.sort();
            map.inner.insert(item_id, set);
        }
        map
    }

    /// Produce the durable shape, one ordered pack list per item.
    pub fn to_record(&self) -> InventoryRecord {
        self.inner
            .iter()
            .map(|(id, set)| (id.clone(), set.snapshot()))
            .collect()
    }

    /// Sort the packs of one item.
    pub fn sort(&mut self, item_id: &str) -> DomainResult<()> {
        let set = self
            .inner
            .get_mut(item_id)
            .ok_or_else(|| DomainError::indexed_item_not_found(item_id))?;
        set.sort();
        Ok(())
    }

    pub fn get(&self, item_id: &str) -> Option<&PackSet> {
        self.inner.get(item_id)
    }

    pub fn get_mut(&mut self, item_id: &str) -> Option<&mut PackSet> {
        self.inner.get_mut(item_id)
    }

    /// Returns the previous set for `item_id`, if any.
    pub fn insert(&mut self, item_id: impl Into<String>, set: PackSet) -> Option<PackSet> {
        self.inner.insert(item_id.into(), set)
    }

    pub fn remove(&mut self, item_id: &str) -> Option<PackSet> {
        self.inner.remove(item_id)
    }

    pub fn entry_or_default(&mut self, item_id: impl Into<String>) -> &mut PackSet {
        self.inner.entry(item_id.into()).or_default()
    }

    pub fn item_ids(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
