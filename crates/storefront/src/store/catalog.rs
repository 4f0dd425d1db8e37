//! Catalog store: categories and the products that reference them.
//!
//! Both collections live in one [`Catalog`] snapshot so a category delete
//! and the product fallback it implies are published in a single swap.

use std::collections::HashSet;
use std::sync::Arc;

use clear_hearing_core::{
    Category, CategoryId, CategoryInput, Collection, Product, ProductFilter, ProductId,
    ProductInput, RecordId, ValidationError,
};
use tracing::{info, instrument};

use super::cell::{Draft, SnapshotCell};
use super::{EventBus, StoreError};
use crate::persistence::{Persistence, encode};

/// Categories and products, published together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
}

impl Catalog {
    #[must_use]
    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    pub fn products_matching<'a>(
        &'a self,
        filter: &'a ProductFilter,
    ) -> impl Iterator<Item = &'a Product> + 'a {
        self.products.iter().filter(move |p| filter.matches(p))
    }

    /// Clear category references that no longer resolve. Returns how many
    /// products were moved to uncategorized.
    pub fn uncategorize_orphans(&mut self) -> usize {
        let known: HashSet<CategoryId> = self.categories.iter().map(|c| c.id.clone()).collect();
        let mut moved = 0;
        for product in &mut self.products {
            if product
                .category_id
                .as_ref()
                .is_some_and(|id| !known.contains(id))
            {
                product.category_id = None;
                moved += 1;
            }
        }
        moved
    }

    fn check_category(&self, product: &Product) -> Result<(), ValidationError> {
        match &product.category_id {
            Some(id) if self.category(id).is_none() => {
                Err(ValidationError::UnknownCategory(id.to_string()))
            }
            _ => Ok(()),
        }
    }
}

pub struct CatalogStore {
    cell: SnapshotCell<Catalog>,
    persistence: Arc<dyn Persistence>,
    events: EventBus,
}

impl CatalogStore {
    pub(crate) fn new(catalog: Catalog, persistence: Arc<dyn Persistence>, events: EventBus) -> Self {
        Self {
            cell: SnapshotCell::new(catalog),
            persistence,
            events,
        }
    }

    /// Consistent view of categories and products.
    pub fn snapshot(&self) -> Arc<Catalog> {
        self.cell.load()
    }

    pub fn list_categories(&self) -> Vec<Category> {
        self.cell.load().categories.clone()
    }

    pub fn list_products(&self, filter: &ProductFilter) -> Vec<Product> {
        self.cell.load().products_matching(filter).cloned().collect()
    }

    pub fn get_product(&self, id: &ProductId) -> Option<Product> {
        self.cell.load().product(id).cloned()
    }

    pub fn get_category(&self, id: &CategoryId) -> Option<Category> {
        self.cell.load().category(id).cloned()
    }

    /// Create a category (`id` is `None`) or replace an existing one.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name and
    /// [`StoreError::NotFound`] when updating an unknown id.
    #[instrument(skip(self, input))]
    pub async fn upsert_category(
        &self,
        id: Option<CategoryId>,
        input: CategoryInput,
    ) -> Result<Category, StoreError> {
        let creating = id.is_none();
        let category = input.into_category(id.unwrap_or_else(CategoryId::generate))?;

        let mut draft = self.cell.begin().await;
        if creating {
            draft.categories.push(category.clone());
        } else {
            let slot = draft
                .categories
                .iter_mut()
                .find(|c| c.id == category.id)
                .ok_or_else(|| StoreError::not_found(Collection::Categories, category.id.as_str()))?;
            *slot = category.clone();
        }
        self.persist(&draft, &[Collection::Categories]).await?;
        draft.commit();

        if creating {
            self.events.created(Collection::Categories, category.id.as_str());
        } else {
            self.events.updated(Collection::Categories, category.id.as_str());
        }
        Ok(category)
    }

    /// Remove a category. Products in it become uncategorized in the same
    /// write. Returns how many products were moved.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: &CategoryId) -> Result<usize, StoreError> {
        let mut draft = self.cell.begin().await;
        let position = draft
            .categories
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| StoreError::not_found(Collection::Categories, id.as_str()))?;
        draft.categories.remove(position);

        let mut moved = 0;
        for product in draft.products.iter_mut().filter(|p| p.is_in(id)) {
            product.category_id = None;
            moved += 1;
        }

        if moved == 0 {
            self.persist(&draft, &[Collection::Categories]).await?;
        } else {
            self.persist(&draft, &[Collection::Categories, Collection::Products])
                .await?;
        }
        draft.commit();

        info!(category = %id, moved, "Category deleted");
        self.events.deleted(Collection::Categories, id.as_str());
        if moved > 0 {
            self.events.replaced(Collection::Products);
        }
        Ok(moved)
    }

    /// Create a product (`id` is `None`) or replace an existing one.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name, a negative price or a
    /// category that does not exist, and [`StoreError::NotFound`] when
    /// updating an unknown id.
    #[instrument(skip(self, input))]
    pub async fn upsert_product(
        &self,
        id: Option<ProductId>,
        input: ProductInput,
    ) -> Result<Product, StoreError> {
        let creating = id.is_none();
        let product = input.into_product(id.unwrap_or_else(ProductId::generate))?;

        let mut draft = self.cell.begin().await;
        draft.check_category(&product)?;
        if creating {
            draft.products.push(product.clone());
        } else {
            let slot = draft
                .products
                .iter_mut()
                .find(|p| p.id == product.id)
                .ok_or_else(|| StoreError::not_found(Collection::Products, product.id.as_str()))?;
            *slot = product.clone();
        }
        self.persist(&draft, &[Collection::Products]).await?;
        draft.commit();

        if creating {
            self.events.created(Collection::Products, product.id.as_str());
        } else {
            self.events.updated(Collection::Products, product.id.as_str());
        }
        Ok(product)
    }

    /// Remove a product. Placed orders keep their own copy and are not
    /// affected.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<Product, StoreError> {
        let mut draft = self.cell.begin().await;
        let position = draft
            .products
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| StoreError::not_found(Collection::Products, id.as_str()))?;
        let removed = draft.products.remove(position);
        self.persist(&draft, &[Collection::Products]).await?;
        draft.commit();

        self.events.deleted(Collection::Products, id.as_str());
        Ok(removed)
    }

    pub(crate) async fn begin(&self) -> Draft<'_, Catalog> {
        self.cell.begin().await
    }

    pub(crate) fn announce_replaced(&self, collection: Collection) {
        self.events.replaced(collection);
    }

    async fn persist(&self, catalog: &Catalog, collections: &[Collection]) -> Result<(), StoreError> {
        let batch = catalog_batch(catalog, collections)?;
        if let [(collection, values)] = batch.as_slice() {
            self.persistence.save_all(*collection, values.clone()).await?;
        } else {
            self.persistence.save_many(batch).await?;
        }
        Ok(())
    }
}

/// Encode the named catalog collections for a persistence write.
pub(crate) fn catalog_batch(
    catalog: &Catalog,
    collections: &[Collection],
) -> Result<Vec<(Collection, Vec<serde_json::Value>)>, StoreError> {
    let mut batch = Vec::with_capacity(collections.len());
    for &collection in collections {
        let values = match collection {
            Collection::Categories => encode(collection, &catalog.categories)?,
            _ => encode(collection, &catalog.products)?,
        };
        batch.push((collection, values));
    }
    Ok(batch)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::persistence::MemoryPersistence;
    use clear_hearing_core::Price;
    use rust_decimal::Decimal;

    fn store() -> (CatalogStore, Arc<MemoryPersistence>) {
        let persistence = Arc::new(MemoryPersistence::new());
        let catalog = Catalog {
            categories: clear_hearing_core::defaults::categories(),
            products: Vec::new(),
        };
        (
            CatalogStore::new(catalog, persistence.clone(), EventBus::new()),
            persistence,
        )
    }

    fn product(name: &str, price: i64, category: Option<&str>) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            image_url: String::new(),
            price: Decimal::new(price, 0),
            description: String::new(),
            specs: String::new(),
            category_id: category.map(CategoryId::new),
        }
    }

    #[tokio::test]
    async fn test_upsert_product_and_filter() {
        let (store, _) = store();
        store
            .upsert_product(None, product("Signia X", 25_000, Some("1")))
            .await
            .unwrap();
        store
            .upsert_product(None, product("Zinc 312", 500, Some("2")))
            .await
            .unwrap();
        store
            .upsert_product(None, product("Cleaning kit", 900, None))
            .await
            .unwrap();

        assert_eq!(store.list_products(&ProductFilter::All).len(), 3);
        let aids = store.list_products(&ProductFilter::from_query(Some("1")));
        assert_eq!(aids.len(), 1);
        assert_eq!(aids[0].price, Price::from_whole(25_000));
        assert_eq!(store.list_products(&ProductFilter::Uncategorized).len(), 1);
    }

    #[tokio::test]
    async fn test_rejects_invalid_products() {
        let (store, persistence) = store();
        assert!(matches!(
            store.upsert_product(None, product("", 1, None)).await,
            Err(StoreError::Validation(ValidationError::EmptyField { .. }))
        ));
        assert!(matches!(
            store.upsert_product(None, product("X", -5, None)).await,
            Err(StoreError::Validation(ValidationError::NegativePrice))
        ));
        assert!(matches!(
            store.upsert_product(None, product("X", 5, Some("missing"))).await,
            Err(StoreError::Validation(ValidationError::UnknownCategory(_)))
        ));
        assert!(store.list_products(&ProductFilter::All).is_empty());
        assert!(persistence.stored(Collection::Products).is_none());
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_rejects_unknown() {
        let (store, _) = store();
        let created = store
            .upsert_product(None, product("Signia X", 25_000, Some("1")))
            .await
            .unwrap();
        let updated = store
            .upsert_product(Some(created.id.clone()), product("Signia X Pro", 27_000, Some("1")))
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(store.list_products(&ProductFilter::All).len(), 1);
        assert!(matches!(
            store
                .upsert_product(Some(ProductId::new("ghost")), product("X", 1, None))
                .await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_category_uncategorizes_products() {
        let (store, persistence) = store();
        let aid = store
            .upsert_product(None, product("Signia X", 25_000, Some("1")))
            .await
            .unwrap();
        let battery = store
            .upsert_product(None, product("Zinc 312", 500, Some("2")))
            .await
            .unwrap();

        let moved = store.delete_category(&CategoryId::new("1")).await.unwrap();

        assert_eq!(moved, 1);
        let catalog = store.snapshot();
        assert!(catalog.category(&CategoryId::new("1")).is_none());
        assert_eq!(catalog.product(&aid.id).unwrap().category_id, None);
        assert_eq!(
            catalog.product(&battery.id).unwrap().category_id,
            Some(CategoryId::new("2"))
        );
        assert_eq!(
            store.list_products(&ProductFilter::from_query(Some("uncategorized")))[0].id,
            aid.id
        );

        let stored = persistence.stored(Collection::Products).unwrap();
        assert!(stored.iter().any(|p| p["id"] == aid.id.as_str() && p["categoryId"].is_null()));
    }

    #[tokio::test]
    async fn test_delete_category_storage_failure_changes_nothing() {
        let (store, persistence) = store();
        store
            .upsert_product(None, product("Signia X", 25_000, Some("1")))
            .await
            .unwrap();
        let before = store.snapshot();

        persistence.fail_writes(true);
        assert!(matches!(
            store.delete_category(&CategoryId::new("1")).await,
            Err(StoreError::Storage(_))
        ));
        assert_eq!(*store.snapshot(), *before);
    }

    #[tokio::test]
    async fn test_category_crud() {
        let (store, _) = store();
        let created = store
            .upsert_category(
                None,
                CategoryInput {
                    name: "Hearing aids".to_string(),
                    icon: String::new(),
                },
            )
            .await
            .unwrap();
        assert_eq!(store.list_categories().len(), 3);

        let renamed = store
            .upsert_category(
                Some(created.id.clone()),
                CategoryInput {
                    name: "In-ear".to_string(),
                    icon: "Ear".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(store.get_category(&created.id).unwrap(), renamed);

        assert!(store
            .upsert_category(None, CategoryInput::default())
            .await
            .is_err());
        assert!(matches!(
            store.delete_category(&CategoryId::new("ghost")).await,
            Err(StoreError::NotFound { .. })
        ));
    }
}
