//! Inventory domain module: items, packs, pack sets and order allocation.
//!
//! This crate contains business rules for pack inventory, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod allocator;
pub mod item;
pub mod pack_set;

pub use allocator::{allocate, Allocation, InventoryOrder, MAX_ALLOCATION_ITERATIONS};
pub use item::{Item, Pack};
pub use pack_set::{InventoryRecord, ItemPackMap, PackSet};
