use std::collections::BTreeMap;

use serde::Serialize;

use packforge_inventory::Allocation;

/// Success envelope: every 2xx body is `{"response": ...}`.
#[derive(Debug, Serialize)]
pub struct ResponseEnvelope<T> {
    pub response: T,
}

impl<T: Serialize> ResponseEnvelope<T> {
    pub fn new(response: T) -> Self {
        Self { response }
    }
}

/// Order body: pack size -> number of packs of that size.
pub fn order_to_json(allocation: &Allocation) -> BTreeMap<u64, u64> {
    allocation.order.by_size()
}
