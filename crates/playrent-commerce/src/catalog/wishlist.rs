//! Wishlist membership.

use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// Products the current user has starred.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Wishlist {
    /// Starred product IDs, in the order they were added.
    #[serde(default)]
    pub product_ids: Vec<ProductId>,
}

impl Wishlist {
    /// Check membership.
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.product_ids.contains(product_id)
    }

    /// Toggle membership locally. Returns the new membership.
    pub fn toggle(&mut self, product_id: ProductId) -> bool {
        if let Some(pos) = self.product_ids.iter().position(|id| id == &product_id) {
            self.product_ids.remove(pos);
            false
        } else {
            self.product_ids.push(product_id);
            true
        }
    }

    pub fn len(&self) -> usize {
        self.product_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.product_ids.is_empty()
    }
}
