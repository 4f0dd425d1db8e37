//! The record abstraction shared by every stored collection.

use serde::{Serialize, de::DeserializeOwned};

use crate::error::ValidationError;
use crate::types::id::RecordId;

/// Name of a persisted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Categories,
    Products,
    Services,
    About,
    Articles,
    Advantages,
    Partners,
    Hero,
    Orders,
}

impl Collection {
    /// Every collection, in load order.
    pub const ALL: [Self; 9] = [
        Self::Categories,
        Self::Products,
        Self::Services,
        Self::About,
        Self::Articles,
        Self::Advantages,
        Self::Partners,
        Self::Hero,
        Self::Orders,
    ];

    /// Storage name of the collection.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Products => "products",
            Self::Services => "services",
            Self::About => "about",
            Self::Articles => "articles",
            Self::Advantages => "advantages",
            Self::Partners => "partners",
            Self::Hero => "hero",
            Self::Orders => "orders",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record kept in a named, id-keyed collection.
///
/// Implemented once per record shape; the storefront's generic collection
/// store provides list/get/create/update/delete for every implementor.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Identifier type of the record.
    type Id: RecordId;

    /// Collection this record is persisted in.
    const COLLECTION: Collection;

    /// The record's identifier.
    fn id(&self) -> &Self::Id;

    /// Replace the record's identifier.
    fn set_id(&mut self, id: Self::Id);

    /// Check field-level rules.
    ///
    /// # Errors
    ///
    /// Returns the first rule the record breaks.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Fill derived or defaulted fields before the record is stored.
    fn prepare(&mut self) {}
}

/// Check that every record has a usable id and ids are unique.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidId`] for a blank id or
/// [`ValidationError::DuplicateId`] for a repeated one.
pub fn check_ids<T: Record>(records: &[T]) -> Result<(), ValidationError> {
    let mut seen = std::collections::HashSet::with_capacity(records.len());
    for record in records {
        let id = record.id();
        if id.is_blank() {
            return Err(ValidationError::InvalidId(id.as_str().to_string()));
        }
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateId {
                collection: T::COLLECTION.as_str(),
                id: id.to_string(),
            });
        }
    }
    Ok(())
}
