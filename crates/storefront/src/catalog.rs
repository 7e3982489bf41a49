//! Static product catalog.
//!
//! The catalog is loaded once at startup from a JSON file (or an inline JSON
//! string in tests), kept in insertion order, and never mutated afterwards.
//! It is configuration, not derived state: the cart and checkout layers only
//! read from it.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use whizyre_core::{Price, ProductId};

/// Errors loading or querying the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Reading the catalog file failed.
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog JSON was malformed or violated a price invariant.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two catalog records share the same product ID.
    #[error("duplicate product id in catalog: {0}")]
    DuplicateId(ProductId),

    /// A lookup referenced a product the catalog does not contain.
    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),
}

/// A product as supplied by static configuration.
///
/// Immutable after load; unit prices are non-negative two-place decimals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique, stable identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Short description shown on the product card.
    pub description: String,
}

/// The ordered, read-only product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog from an ordered list of products.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if two products share an ID.
    pub fn from_products(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(products.len());
        for (pos, product) in products.iter().enumerate() {
            if index.insert(product.id, pos).is_some() {
                return Err(CatalogError::DuplicateId(product.id));
            }
        }
        Ok(Self { products, index })
    }

    /// Parse a catalog from a JSON array of product records.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] on malformed JSON or negative prices,
    /// [`CatalogError::DuplicateId`] on repeated IDs.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::from_products(products)
    }

    /// Load a catalog from a JSON file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read, plus the
    /// errors of [`Self::from_json`].
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        tracing::debug!(
            path = %path.display(),
            products = catalog.len(),
            "loaded product catalog"
        );
        Ok(catalog)
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.index.get(&id).and_then(|&pos| self.products.get(pos))
    }

    /// Look up a product by ID, erroring if absent.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownProduct`] if no product has `id`.
    pub fn require(&self, id: ProductId) -> Result<&Product, CatalogError> {
        self.get(id).ok_or(CatalogError::UnknownProduct(id))
    }

    /// All products, in configuration order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use whizyre_core::PriceError;

    pub(crate) const SAMPLE_CATALOG: &str = r#"[
        { "id": 1, "name": "Tidal Account", "price": "9.99",
          "description": "Premium Tidal streaming account" },
        { "id": 2, "name": "Twitter Script", "price": "19.99",
          "description": "Automate your Twitter activities" },
        { "id": 3, "name": "Instagram Script", "price": "24.99",
          "description": "Boost your Instagram engagement" }
    ]"#;

    pub(crate) fn sample_catalog() -> Catalog {
        Catalog::from_json(SAMPLE_CATALOG).unwrap()
    }

    #[test]
    fn test_load_preserves_order() {
        let catalog = sample_catalog();
        let names: Vec<_> = catalog.products().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            ["Tidal Account", "Twitter Script", "Instagram Script"]
        );
    }

    #[test]
    fn test_lookup_by_id() {
        let catalog = sample_catalog();
        let product = catalog.get(ProductId::new(2)).unwrap();
        assert_eq!(product.name, "Twitter Script");
        assert_eq!(product.price, Price::from_cents(1999).unwrap());
    }

    #[test]
    fn test_unknown_product() {
        let catalog = sample_catalog();
        assert!(catalog.get(ProductId::new(99)).is_none());
        assert!(matches!(
            catalog.require(ProductId::new(99)),
            Err(CatalogError::UnknownProduct(id)) if id == ProductId::new(99)
        ));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let json = r#"[
            { "id": 1, "name": "A", "price": "1.00", "description": "" },
            { "id": 1, "name": "B", "price": "2.00", "description": "" }
        ]"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::DuplicateId(_))
        ));
    }

    #[test]
    fn test_negative_price_rejected() {
        let json = r#"[
            { "id": 1, "name": "A", "price": "-1.00", "description": "" }
        ]"#;
        assert!(matches!(Catalog::from_json(json), Err(CatalogError::Parse(_))));
        // Same invariant at the type level
        assert!(matches!(
            Price::new(rust_decimal::Decimal::NEGATIVE_ONE),
            Err(PriceError::Negative(_))
        ));
    }
}
