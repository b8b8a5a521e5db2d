use std::{
    fs,
    path::{Path, PathBuf},
};

use enum_dispatch::enum_dispatch;
use thiserror::Error;

use crate::{
    fields::FieldSelector,
    product::{Product, Record},
};

/// Storage failure or rejected query
#[derive(Error, Debug)]
pub enum StoreError {
    /// Projection names a field products do not have
    #[error("unknown field `{0}`")]
    UnknownField(String),
    /// Catalog file could not be read
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    /// Catalog file is not a JSON array of products
    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where products are read from
#[allow(clippy::module_name_repetitions)]
#[derive(Debug)]
#[enum_dispatch]
pub enum StoreKind {
    /// Loaded once at startup
    Memory(MemoryStore),
    /// Read from disk on every query
    File(FileStore),
}

/// Read interface of a product catalog
#[enum_dispatch(StoreKind)]
pub trait Trait {
    /// Number of products
    /// # Errors
    /// Storage errors
    fn count(&self) -> Result<u64, StoreError>;
    /// At most `limit` products after skipping `offset`, projected through `fields`
    /// # Errors
    /// Storage errors, unknown fields
    fn find_page(
        &self,
        limit: u32,
        offset: u64,
        fields: &FieldSelector,
    ) -> Result<Vec<Record>, StoreError>;
    /// Product with the given id, projected through `fields`
    /// # Errors
    /// Storage errors, unknown fields
    fn find_by_id(&self, id: &str, fields: &FieldSelector) -> Result<Option<Record>, StoreError>;
    /// `count` and `find_page` taken from the same snapshot of the catalog
    /// # Errors
    /// Storage errors, unknown fields
    fn count_and_page(
        &self,
        limit: u32,
        offset: u64,
        fields: &FieldSelector,
    ) -> Result<(u64, Vec<Record>), StoreError> {
        Ok((self.count()?, self.find_page(limit, offset, fields)?))
    }
}

fn page_of(
    products: &[Product],
    limit: u32,
    offset: u64,
    fields: &FieldSelector,
) -> Result<Vec<Record>, StoreError> {
    Product::check_fields(fields)?;
    let skip = usize::try_from(offset).unwrap_or(usize::MAX);
    let take = usize::try_from(limit).unwrap_or(usize::MAX);
    products.iter().skip(skip).take(take).map(|p| p.project(fields)).collect()
}

fn by_id(
    products: &[Product],
    id: &str,
    fields: &FieldSelector,
) -> Result<Option<Record>, StoreError> {
    Product::check_fields(fields)?;
    products.iter().find(|p| p.id == id).map(|p| p.project(fields)).transpose()
}

fn load(path: &Path) -> Result<Vec<Product>, StoreError> {
    let mut products: Vec<Product> = serde_json::from_slice(&fs::read(path)?)?;
    products.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(products)
}

/// In memory catalog, ordered by id
#[derive(Debug, Default)]
pub struct MemoryStore {
    products: Vec<Product>,
}

impl MemoryStore {
    /// Create a store holding `products`
    #[must_use]
    pub fn new(mut products: Vec<Product>) -> Self {
        products.sort_by(|a, b| a.id.cmp(&b.id));
        Self { products }
    }

    /// Load a JSON array of products
    /// # Errors
    /// IO and parse errors
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Ok(Self { products: load(path.as_ref())? })
    }
}

impl Trait for MemoryStore {
    fn count(&self) -> Result<u64, StoreError> {
        Ok(self.products.len() as u64)
    }

    fn find_page(
        &self,
        limit: u32,
        offset: u64,
        fields: &FieldSelector,
    ) -> Result<Vec<Record>, StoreError> {
        page_of(&self.products, limit, offset, fields)
    }

    fn find_by_id(&self, id: &str, fields: &FieldSelector) -> Result<Option<Record>, StoreError> {
        by_id(&self.products, id, fields)
    }
}

/// Catalog backed by a JSON file, re-read on every query
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store reading `path`
    #[must_use]
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        Self { path }
    }
}

impl Trait for FileStore {
    fn count(&self) -> Result<u64, StoreError> {
        Ok(load(&self.path)?.len() as u64)
    }

    fn find_page(
        &self,
        limit: u32,
        offset: u64,
        fields: &FieldSelector,
    ) -> Result<Vec<Record>, StoreError> {
        page_of(&load(&self.path)?, limit, offset, fields)
    }

    fn find_by_id(&self, id: &str, fields: &FieldSelector) -> Result<Option<Record>, StoreError> {
        by_id(&load(&self.path)?, id, fields)
    }

    fn count_and_page(
        &self,
        limit: u32,
        offset: u64,
        fields: &FieldSelector,
    ) -> Result<(u64, Vec<Record>), StoreError> {
        let products = load(&self.path)?;
        Ok((products.len() as u64, page_of(&products, limit, offset, fields)?))
    }
}
