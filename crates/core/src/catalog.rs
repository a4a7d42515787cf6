//! Product catalogue

use std::{fs, path::Path};

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use serde::Deserialize;
use thiserror::Error;

use crate::items::{LineItem, LineItemError};

/// Errors raised while loading a catalogue.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalogue file could not be read.
    #[error("failed to read catalogue")]
    Io(#[from] std::io::Error),

    /// The document is not a valid catalogue.
    #[error("failed to parse catalogue: {0}")]
    Parse(#[from] serde_norway::Error),

    /// Two products share an id.
    #[error("duplicate product id: {0}")]
    DuplicateId(String),

    /// A product cannot be sold as a cart line.
    #[error("invalid product {id}: {source}")]
    InvalidProduct {
        /// Offending product id
        id: String,

        /// Validation failure
        #[source]
        source: LineItemError,
    },
}

/// Catalogue document
#[derive(Debug, Deserialize)]
struct CatalogFixture {
    products: Vec<Product>,
}

/// A product card on the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Product {
    /// Product id, shared with its cart line
    pub id: String,

    /// Display name
    pub name: String,

    /// Price in major currency units
    pub price: Decimal,

    /// Card blurb
    #[serde(default)]
    pub description: Option<String>,
}

impl Product {
    /// The cart line added by this product's add-to-cart button.
    ///
    /// # Errors
    ///
    /// Returns a [`LineItemError`] if the product id is blank or the price is
    /// negative.
    pub fn line_item(&self) -> Result<LineItem, LineItemError> {
        LineItem::new(self.id.as_str(), self.name.as_str(), self.price, 1)
    }
}

/// Products in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Parses a catalogue from YAML.
    ///
    /// ```yaml
    /// products:
    ///   - id: r1
    ///     name: Ring
    ///     price: 5000
    /// ```
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Parse`]: the document does not match the schema.
    /// - [`CatalogError::DuplicateId`]: two products share an id.
    /// - [`CatalogError::InvalidProduct`]: a product id is blank or a price is
    ///   negative.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(yaml)?;
        let mut seen = FxHashSet::default();

        for product in &fixture.products {
            product
                .line_item()
                .map_err(|source| CatalogError::InvalidProduct {
                    id: product.id.clone(),
                    source,
                })?;

            if !seen.insert(product.id.as_str()) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
        }

        Ok(Self {
            products: fixture.products,
        })
    }

    /// Reads a YAML catalogue file.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the file cannot be read or is invalid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        Self::from_yaml(&fs::read_to_string(path)?)
    }

    /// Products in display order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Looks up a product by id.
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalogue has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
