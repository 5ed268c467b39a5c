use chrono::{Local, NaiveDateTime};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::product::{Product, ProductError, ProductType};
use crate::record::ProductRecord;

/// In-memory product catalog keyed by product id.
///
/// Iteration follows insertion order, which keeps listings and saved files
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    products: HashMap<String, Product>,
    order: Vec<String>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct products
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, product_id: &str) -> Option<&Product> {
        self.products.get(product_id)
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.products.contains_key(product_id)
    }

    /// Products in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Product> + '_ {
        self.order.iter().filter_map(|id| self.products.get(id))
    }

    pub fn add(&mut self, product: Product) -> InventoryResult<()> {
        if self.products.contains_key(product.product_id()) {
            return Err(InventoryError::DuplicateProduct(
                product.product_id().to_string(),
            ));
        }

        let product_id = product.product_id().to_string();
        self.order.push(product_id.clone());
        self.products.insert(product_id, product);
        Ok(())
    }

    pub fn remove(&mut self, product_id: &str) -> InventoryResult<()> {
        self.take(product_id)
            .map(|_| ())
            .ok_or_else(|| InventoryError::NotFound(product_id.to_string()))
    }

    /// Sell units of a product, returning the remaining quantity
    pub fn sell(&mut self, product_id: &str, quantity: i64) -> InventoryResult<u32> {
        let product = self.product_mut(product_id)?;
        product
            .sell(quantity)
            .map_err(|err| InventoryError::from_mutation("sell", product.name(), err))
    }

    /// Restock a product, returning the new stock level
    pub fn restock(&mut self, product_id: &str, quantity: i64) -> InventoryResult<u32> {
        let product = self.product_mut(product_id)?;
        product
            .restock(quantity)
            .map_err(|err| InventoryError::from_mutation("restock", product.name(), err))
    }

    pub fn set_price(&mut self, product_id: &str, new_price: f64) -> InventoryResult<()> {
        let product = self.product_mut(product_id)?;
        product
            .set_price(new_price)
            .map_err(|err| InventoryError::from_mutation("reprice", product.name(), err))
    }

    /// Case-insensitive substring match on the product name
    pub fn search_by_name(&self, needle: &str) -> Vec<&Product> {
        let needle = needle.to_lowercase();
        self.iter()
            .filter(|product| product.name().to_lowercase().contains(&needle))
            .collect()
    }

    /// Case-insensitive match on the discriminator tag. An unknown tag
    /// simply matches nothing.
    pub fn search_by_type(&self, type_tag: &str) -> Vec<&Product> {
        self.iter()
            .filter(|product| product.product_type().as_str().eq_ignore_ascii_case(type_tag))
            .collect()
    }

    pub fn list_all(&self) -> Vec<&Product> {
        self.iter().collect()
    }

    /// Sum of `price * quantity_in_stock` over every product
    pub fn total_value(&self) -> f64 {
        self.iter().map(Product::total_value).sum()
    }

    /// Remove every grocery that is expired at `reference` and hand the removed
    /// products back. Other categories are left alone.
    pub fn remove_expired(&mut self, reference: NaiveDateTime) -> Vec<Product> {
        let expired: HashSet<String> = self
            .iter()
            .filter(|product| product.is_expired(reference))
            .map(|product| product.product_id().to_string())
            .collect();
        if expired.is_empty() {
            return Vec::new();
        }

        let removed: Vec<Product> = self
            .order
            .iter()
            .filter(|id| expired.contains(*id))
            .filter_map(|id| self.products.remove(id))
            .collect();
        self.order.retain(|id| !expired.contains(id));

        tracing::debug!(removed = removed.len(), %reference, "expired groceries swept");
        removed
    }

    /// [`Inventory::remove_expired`] against the local wall clock
    pub fn remove_expired_now(&mut self) -> Vec<Product> {
        self.remove_expired(Local::now().naive_local())
    }

    pub fn to_records(&self) -> Vec<ProductRecord> {
        self.iter().map(Product::to_record).collect()
    }

    /// Build a fresh inventory from records. Nothing is kept if any record fails.
    pub fn from_records(records: Vec<ProductRecord>) -> InventoryResult<Self> {
        let mut staged = Self::new();
        for record in records {
            let product_id = record.product_id.clone();
            let product = Product::from_record(record)
                .map_err(|err| InventoryError::from_record(&product_id, err))?;
            staged.add(product)?;
        }
        Ok(staged)
    }

    /// Build a fresh inventory from raw JSON records. Each record's `type` tag
    /// is checked before any other field, so an unknown tag is always reported
    /// as `UnsupportedType`.
    pub fn from_values(values: Vec<Value>) -> InventoryResult<Self> {
        let mut records = Vec::with_capacity(values.len());
        for (index, value) in values.into_iter().enumerate() {
            let tag = value
                .get("type")
                .and_then(Value::as_str)
                .ok_or_else(|| InventoryError::Format(format!("record {index}: missing field `type`")))?;
            ProductType::from_tag(tag).map_err(|_| InventoryError::UnsupportedType(tag.to_string()))?;

            let record: ProductRecord = serde_json::from_value(value)
                .map_err(|err| InventoryError::Format(format!("record {index}: {err}")))?;
            records.push(record);
        }
        Self::from_records(records)
    }

    /// Write the whole catalog to `path` as a JSON array, replacing any existing file
    pub fn save(&self, path: impl AsRef<Path>) -> InventoryResult<()> {
        let path = path.as_ref();
        let records = self.to_records();

        let file = File::create(path).map_err(|source| InventoryError::io(path, source))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &records)
            .map_err(|err| InventoryError::io(path, err.into()))?;
        writer
            .write_all(b"\n")
            .and_then(|_| writer.flush())
            .map_err(|source| InventoryError::io(path, source))?;

        tracing::debug!(path = %path.display(), products = records.len(), "inventory saved");
        Ok(())
    }

    /// Replace the catalog with the contents of `path`. On any error the
    /// current contents are left as they were.
    pub fn load(&mut self, path: impl AsRef<Path>) -> InventoryResult<()> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => InventoryError::FileNotFound(path.to_path_buf()),
            _ => InventoryError::io(path, source),
        })?;

        let values: Vec<Value> = serde_json::from_reader(BufReader::new(file))
            .map_err(|err| {
                if err.is_io() {
                    InventoryError::io(path, err.into())
                } else {
                    InventoryError::Format(format!("{}: {}", path.display(), err))
                }
            })?;

        let staged = Self::from_values(values)?;
        *self = staged;

        tracing::debug!(path = %path.display(), products = self.len(), "inventory loaded");
        Ok(())
    }

    fn product_mut(&mut self, product_id: &str) -> InventoryResult<&mut Product> {
        self.products
            .get_mut(product_id)
            .ok_or_else(|| InventoryError::NotFound(product_id.to_string()))
    }

    fn take(&mut self, product_id: &str) -> Option<Product> {
        let product = self.products.remove(product_id)?;
        self.order.retain(|id| id != product_id);
        Some(product)
    }
}

/// Failure category, independent of the message payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    InsufficientStock,
    DuplicateProduct,
    NotFound,
    UnsupportedType,
    Format,
    FileNotFound,
    Io,
}

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Product with ID {0} already exists")]
    DuplicateProduct(String),

    #[error("No product with ID {0} exists in inventory")]
    NotFound(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Cannot sell product {name}: only {available} units available (requested {requested})")]
    InsufficientStock {
        name: String,
        requested: i64,
        available: u32,
    },

    #[error("Unknown product type: {0}")]
    UnsupportedType(String),

    #[error("Invalid inventory file format: {0}")]
    Format(String),

    #[error("File {} not found", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type InventoryResult<T> = Result<T, InventoryError>;

impl InventoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            InventoryError::DuplicateProduct(_) => ErrorKind::DuplicateProduct,
            InventoryError::NotFound(_) => ErrorKind::NotFound,
            InventoryError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            InventoryError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            InventoryError::UnsupportedType(_) => ErrorKind::UnsupportedType,
            InventoryError::Format(_) => ErrorKind::Format,
            InventoryError::FileNotFound(_) => ErrorKind::FileNotFound,
            InventoryError::Io { .. } => ErrorKind::Io,
        }
    }

    fn io(path: &Path, source: io::Error) -> Self {
        InventoryError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Attach the product name to a failed stock or price mutation
    fn from_mutation(action: &str, name: &str, err: ProductError) -> Self {
        match err {
            ProductError::InsufficientStock {
                requested,
                available,
            } => InventoryError::InsufficientStock {
                name: name.to_string(),
                requested,
                available,
            },
            other => InventoryError::InvalidArgument(format!("Cannot {action} product {name}: {other}")),
        }
    }

    fn from_record(product_id: &str, err: ProductError) -> Self {
        match err {
            ProductError::UnsupportedType(tag) => InventoryError::UnsupportedType(tag),
            other => InventoryError::Format(format!("product {product_id}: {other}")),
        }
    }
}
