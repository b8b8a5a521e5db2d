use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{fields::FieldSelector, store::StoreError};

/// A product as returned to clients, possibly projected to a subset of fields
pub type Record = Map<String, Value>;

/// Catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Free text description
    #[serde(default)]
    pub description: String,
    /// Unit price
    pub price: f64,
    /// Category slug
    pub category: String,
    /// Units available
    #[serde(default)]
    pub stock: u32,
    /// RFC 3339 creation timestamp
    pub created_at: String,
}

impl Product {
    /// Serialized field names, in declaration order
    pub const FIELDS: [&'static str; 7] =
        ["id", "name", "description", "price", "category", "stock", "createdAt"];

    /// Check that every selected field exists.
    /// # Errors
    /// `StoreError::UnknownField` naming the first unknown field
    pub fn check_fields(fields: &FieldSelector) -> Result<(), StoreError> {
        match fields
            .names()
            .unwrap_or_default()
            .iter()
            .find(|name| !Self::FIELDS.contains(&name.as_str()))
        {
            Some(unknown) => Err(StoreError::UnknownField(unknown.clone())),
            None => Ok(()),
        }
    }

    /// Project the product through `fields`, keeping the selector order.
    /// # Errors
    /// `StoreError::UnknownField` for a field the product does not have
    pub fn project(&self, fields: &FieldSelector) -> Result<Record, StoreError> {
        let mut all: Record = serde_json::from_value(serde_json::to_value(self)?)?;

        let Some(names) = fields.names() else {
            return Ok(all);
        };

        names
            .iter()
            .map(|name| {
                all.remove(name)
                    .map(|value| (name.clone(), value))
                    .ok_or_else(|| StoreError::UnknownField(name.clone()))
            })
            .collect()
    }
}
