//! Whole-store snapshot document for export and import.
//!
//! A snapshot is a single JSON document holding every catalog collection,
//! the hero banner and, optionally, the order log. Collections that are
//! absent from an imported document are left as they are.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::{Category, Product};
use super::content::{AboutItem, Advantage, Article, Hero, Partner, Service};
use super::order::Order;
use super::record::{Record, check_ids};
use crate::error::ValidationError;
use crate::types::CategoryId;

/// Exported store contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<Product>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<Service>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<Vec<AboutItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub articles: Option<Vec<Article>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advantages: Option<Vec<Advantage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partners: Option<Vec<Partner>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero: Option<Hero>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orders: Option<Vec<Order>>,
}

impl Snapshot {
    /// Parse a snapshot document.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MalformedSnapshot`] if the text is not a
    /// snapshot-shaped JSON object.
    pub fn parse(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json).map_err(|e| ValidationError::MalformedSnapshot(e.to_string()))
    }

    /// Validate every record and resolve product categories.
    ///
    /// `existing_categories` are the category ids currently in the store;
    /// they are used to resolve product references when the document does
    /// not carry its own category list. A product whose category resolves
    /// nowhere becomes uncategorized, matching what deleting that category
    /// would have done.
    ///
    /// Fills defaulted fields (article dates) as a side effect.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure; the snapshot must then be
    /// discarded.
    pub fn validate(
        &mut self,
        existing_categories: &HashSet<CategoryId>,
    ) -> Result<(), ValidationError> {
        prepare_all(self.categories.as_deref_mut())?;
        prepare_all(self.products.as_deref_mut())?;
        prepare_all(self.services.as_deref_mut())?;
        prepare_all(self.about.as_deref_mut())?;
        prepare_all(self.articles.as_deref_mut())?;
        prepare_all(self.advantages.as_deref_mut())?;
        prepare_all(self.partners.as_deref_mut())?;
        prepare_all(self.orders.as_deref_mut())?;
        if let Some(hero) = &self.hero {
            hero.validate()?;
        }

        let known: HashSet<CategoryId> = self.categories.as_ref().map_or_else(
            || existing_categories.clone(),
            |categories| categories.iter().map(|c| c.id.clone()).collect(),
        );
        if let Some(products) = self.products.as_mut() {
            for product in products {
                if product
                    .category_id
                    .as_ref()
                    .is_some_and(|id| !known.contains(id))
                {
                    product.category_id = None;
                }
            }
        }

        Ok(())
    }

    /// Number of records the snapshot carries, across all collections.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.categories.as_ref().map_or(0, Vec::len)
            + self.products.as_ref().map_or(0, Vec::len)
            + self.services.as_ref().map_or(0, Vec::len)
            + self.about.as_ref().map_or(0, Vec::len)
            + self.articles.as_ref().map_or(0, Vec::len)
            + self.advantages.as_ref().map_or(0, Vec::len)
            + self.partners.as_ref().map_or(0, Vec::len)
            + usize::from(self.hero.is_some())
            + self.orders.as_ref().map_or(0, Vec::len)
    }
}

fn prepare_all<T: Record>(records: Option<&mut [T]>) -> Result<(), ValidationError> {
    let Some(records) = records else {
        return Ok(());
    };
    check_ids(records)?;
    for record in records.iter_mut() {
        record.prepare();
        record.validate()?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const LEGACY: &str = r#"{
        "products": [
            {"id": "1", "name": "Signia X", "imageUrl": "", "price": 25000, "description": "", "specs": "", "categoryId": "c1"},
            {"id": "2", "name": "Phonak", "imageUrl": "", "price": 30000, "description": "", "specs": "", "categoryId": "gone"}
        ],
        "services": [{"id": "s1", "name": "Fitting", "imageUrl": "", "contact": "", "link": ""}],
        "about": [],
        "articles": [{"id": "a1", "title": "Care", "content": "", "imageUrl": "", "date": ""}]
    }"#;

    #[test]
    fn test_parse_legacy_export() {
        let mut snapshot = Snapshot::parse(LEGACY).unwrap();
        let existing = HashSet::from([CategoryId::new("c1")]);
        snapshot.validate(&existing).unwrap();

        let products = snapshot.products.as_ref().unwrap();
        assert_eq!(products[0].category_id, Some(CategoryId::new("c1")));
        assert_eq!(products[1].category_id, None);
        assert!(!snapshot.articles.as_ref().unwrap()[0].date.is_empty());
        assert!(snapshot.categories.is_none());
        assert_eq!(snapshot.record_count(), 4);
    }

    #[test]
    fn test_document_categories_take_precedence() {
        let json = r#"{
            "categories": [{"id": "new", "name": "Batteries"}],
            "products": [{"id": "1", "name": "Zinc 312", "price": 500, "categoryId": "c1"}]
        }"#;
        let mut snapshot = Snapshot::parse(json).unwrap();
        snapshot
            .validate(&HashSet::from([CategoryId::new("c1")]))
            .unwrap();
        assert_eq!(snapshot.products.unwrap()[0].category_id, None);
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(matches!(
            Snapshot::parse("[1,2,3]"),
            Err(ValidationError::MalformedSnapshot(_))
        ));
        assert!(Snapshot::parse(r#"{"prodcts": []}"#).is_err());
        assert!(Snapshot::parse(r#"{"products": [{"id": "1", "name": "x", "price": -3}]}"#).is_err());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let json = r#"{"partners": [{"id": "1", "name": "A"}, {"id": "1", "name": "B"}]}"#;
        let mut snapshot = Snapshot::parse(json).unwrap();
        assert!(matches!(
            snapshot.validate(&HashSet::new()),
            Err(ValidationError::DuplicateId { .. })
        ));
    }

    #[test]
    fn test_rejects_blank_names() {
        let json = r#"{"categories": [{"id": "1", "name": ""}]}"#;
        let mut snapshot = Snapshot::parse(json).unwrap();
        assert_eq!(
            snapshot.validate(&HashSet::new()),
            Err(ValidationError::EmptyField { field: "name" })
        );
    }
}
