//! Greedy pack allocation.
//!
//! Given an item's packs sorted ascending by size and a requested unit count, pick the
//! packs that fulfil the order. The heuristic prefers the fewest, largest packs and
//! accepts at most one overshooting pack from the smallest size. It is deterministic but
//! not an exact minimal-waste solver.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, warn};

use crate::item::Pack;

/// Upper bound on loop passes for one allocation.
///
/// Requests far larger than the biggest pack can hit this before the count is covered;
/// the allocation then stops with a partial order and reports itself as exhausted.
pub const MAX_ALLOCATION_ITERATIONS: usize = 800;

/// Packs chosen for an order: pack to number of copies used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryOrder {
    counts: HashMap<Pack, u64>,
}

impl InventoryOrder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, pack: &Pack) {
        *self.counts.entry(pack.clone()).or_insert(0) += 1;
    }

    /// Copies of `pack` used, zero if it was not picked.
    pub fn count(&self, pack: &Pack) -> u64 {
        self.counts.get(pack).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Pack, u64)> {
        self.counts.iter().map(|(p, n)| (p, *n))
    }

    /// Number of distinct packs used.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of packs shipped.
    pub fn pack_count(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Total units shipped.
    pub fn total_units(&self) -> u64 {
        self.counts.iter().map(|(p, n)| p.size * n).sum()
    }

    /// Counts keyed by pack size. Packs of the same size but different item values are summed.
    pub fn by_size(&self) -> BTreeMap<u64, u64> {
        let mut out = BTreeMap::new();
        for (pack, n) in &self.counts {
            *out.entry(pack.size).or_insert(0) += n;
        }
        out
    }
}

/// Result of one allocation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub order: InventoryOrder,
    /// Loop passes taken (consumes and step-downs both count).
    pub iterations: usize,
    /// Units left uncovered; zero or negative once the order is fulfilled.
    pub remaining: i64,
    /// True when the loop stopped on [`MAX_ALLOCATION_ITERATIONS`] with units still owed.
    pub exhausted: bool,
}

impl Allocation {
    fn empty(requested: i64) -> Self {
        Self {
            order: InventoryOrder::new(),
            iterations: 0,
            remaining: requested.max(0),
            exhausted: false,
        }
    }

    /// Units shipped beyond the request (0 when exact or partial).
    pub fn overshoot(&self) -> u64 {
        if self.remaining < 0 { self.remaining.unsigned_abs() } else { 0 }
    }

    pub fn into_order(self) -> InventoryOrder {
        self.order
    }
}

/// Allocate packs for `requested` units.
///
/// `packs` must be sorted ascending by size. An empty pack list or a non-positive
/// request yields an empty order.
pub fn allocate(packs: &[Pack], requested: i64) -> Allocation {
    if requested <= 0 || packs.is_empty() {
        return Allocation::empty(requested);
    }

    // Smallest pack that covers the whole request, or the largest pack when none does.
    let mut index = packs
        .iter()
        .position(|p| size_as_units(p) >= requested)
        .unwrap_or(packs.len() - 1);

    let mut order = InventoryOrder::new();
    let mut remaining = requested;
    let mut iterations = 0;

    while remaining > 0 {
        if iterations == MAX_ALLOCATION_ITERATIONS {
            warn!(
                requested,
                remaining,
                iterations,
                "allocation hit iteration bound; returning partial order"
            );
            return Allocation {
                order,
                iterations,
                remaining,
                exhausted: true,
            };
        }
        iterations += 1;

        let pack = &packs[index];
        let size = size_as_units(pack);

        if remaining >= size {
            remaining -= size;
            order.push(pack);
            continue;
        }

        if index > 0 {
            index -= 1;
            continue;
        }

        // Already at the smallest pack: ship one more and accept the overshoot.
        remaining -= size;
        order.push(pack);
    }

    debug!(requested, remaining, iterations, packs = order.pack_count(), "allocation complete");
    Allocation {
        order,
        iterations,
        remaining,
        exhausted: false,
    }
}

fn size_as_units(pack: &Pack) -> i64 {
    i64::try_from(pack.size).unwrap_or(i64::MAX)
}
