use serde::{Deserialize, Serialize};

use packforge_core::{ItemId, ValueObject};

/// A physical product or virtual good that can be stocked in packs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Display name; not unique.
    pub name: String,
    #[serde(rename = "forSale")]
    pub for_sale: bool,
    /// Price in the smallest currency unit (e.g. cents).
    pub price: u32,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>, for_sale: bool, price: u32) -> Self {
        Self {
            id,
            name: name.into(),
            for_sale,
            price,
        }
    }
}

impl ValueObject for Item {}

/// A fixed-size bundle of one item.
///
/// Equality and hashing cover the whole item value plus the size, so an item
/// re-priced later counts as a different pack type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pack {
    #[serde(rename = "type")]
    pub item: Item,
    /// Units of `item` contained in one pack.
    pub size: u64,
}

impl Pack {
    pub fn new(item: Item, size: u64) -> Self {
        Self { item, size }
    }
}

impl ValueObject for Pack {}
