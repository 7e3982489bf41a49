//! Cart state: ordered lines and the derived total.
//!
//! The cart is the only state that outlives a checkout session. It is an
//! ordered, indexable sequence of lines, never an opaque running total, so a
//! removal operation can be added without reshaping the store. Lines are
//! never merged: adding the same product twice yields two independent lines.

use whizyre_core::{CartLineId, Price, ProductId};

use crate::catalog::{Catalog, CatalogError, Product};

/// One cart entry: a product snapshot with an implicit quantity of one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    /// Stable identifier for this line, unique within the cart.
    pub id: CartLineId,
    /// The referenced product, cloned out of the catalog.
    pub product: Product,
}

/// Ordered cart lines with a derived total.
///
/// Display order is add order. The total and item count are always derived
/// from the line sequence; nothing is cached to diverge.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    lines: Vec<CartLine>,
    next_line_id: i32,
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line referencing `product`. Always succeeds.
    ///
    /// No dedup, no quantity merge: the line count grows by one and the
    /// total grows by the product's price.
    pub fn add_item(&mut self, product: Product) {
        let id = CartLineId::new(self.next_line_id);
        self.next_line_id += 1;
        tracing::debug!(line = %id, product = %product.id, "added cart line");
        self.lines.push(CartLine { id, product });
    }

    /// Look up `id` in `catalog` and append it as a new line.
    ///
    /// This is the boundary where externally supplied product IDs are
    /// validated against the catalog, keeping the invariant that no line
    /// references a product outside it.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownProduct`] if the catalog has no such
    /// product.
    pub fn add_from_catalog(
        &mut self,
        catalog: &Catalog,
        id: ProductId,
    ) -> Result<(), CatalogError> {
        let product = catalog.require(id)?.clone();
        self.add_item(product);
        Ok(())
    }

    /// Sum of all line prices. Pure and side-effect free.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(|line| line.product.price).sum()
    }

    /// Number of lines, used as the cart badge.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// The lines in add order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Remove every line.
    ///
    /// Clearing after a successful checkout is the caller's responsibility;
    /// the checkout orchestrator only works on a snapshot.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
