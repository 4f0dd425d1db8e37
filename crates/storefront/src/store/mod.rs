//! Shared, persistent storefront state.
//!
//! [`Store`] owns every collection the site serves:
//!
//! - [`CatalogStore`] - categories and products
//! - [`RecordStore`] - one per flat content collection
//! - [`HeroStore`] - the home page banner
//! - [`OrderLog`] - placed orders
//!
//! Each keeps its data in a [`cell::SnapshotCell`]: readers get a consistent
//! `Arc` snapshot, writers build the next value off to the side, persist it,
//! and only then publish it. Every published write is announced as a
//! [`StoreEvent`] on a broadcast channel.

mod catalog;
mod cell;
mod checkout;
mod collection;
mod hero;
mod orders;

use std::sync::Arc;

use chrono::Utc;
use clear_hearing_core::{
    AboutItem, Advantage, Article, CategoryId, Collection, Hero, Order, Partner, Record, Service,
    Snapshot, ValidationError, defaults,
};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{info, instrument, trace};

pub use catalog::{Catalog, CatalogStore};
pub use checkout::{Receipt, checkout};
pub use collection::RecordStore;
pub use hero::HeroStore;
pub use orders::OrderLog;

use crate::persistence::{Persistence, StorageError, decode, encode};
use cell::Draft;

/// Store operation failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("{collection} record {id} not found")]
    NotFound { collection: Collection, id: String },
}

impl StoreError {
    pub(crate) fn not_found(collection: Collection, id: &str) -> Self {
        Self::NotFound {
            collection,
            id: id.to_string(),
        }
    }
}

/// What a write did to a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Change {
    Created,
    Updated,
    Deleted,
    /// The whole collection was rewritten (import, category fallback).
    Replaced,
}

/// Notification published after every successful write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreEvent {
    pub collection: Collection,
    pub change: Change,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Broadcast sender shared by the stores.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    const CAPACITY: usize = 256;

    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(Self::CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }

    fn publish(&self, collection: Collection, change: Change, id: Option<&str>) {
        let event = StoreEvent {
            collection,
            change,
            id: id.map(str::to_string),
        };
        if self.tx.send(event).is_err() {
            trace!(%collection, "No store subscribers");
        }
    }

    pub(crate) fn created(&self, collection: Collection, id: &str) {
        self.publish(collection, Change::Created, Some(id));
    }

    pub(crate) fn updated(&self, collection: Collection, id: &str) {
        self.publish(collection, Change::Updated, Some(id));
    }

    pub(crate) fn deleted(&self, collection: Collection, id: &str) {
        self.publish(collection, Change::Deleted, Some(id));
    }

    pub(crate) fn replaced(&self, collection: Collection) {
        self.publish(collection, Change::Replaced, None);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// What an import changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub collections: Vec<Collection>,
    pub records: usize,
}

/// Every collection of the storefront, loaded from one persistence backend.
pub struct Store {
    catalog: CatalogStore,
    services: RecordStore<Service>,
    about: RecordStore<AboutItem>,
    articles: RecordStore<Article>,
    advantages: RecordStore<Advantage>,
    partners: RecordStore<Partner>,
    hero: HeroStore,
    orders: OrderLog,
    events: EventBus,
    persistence: Arc<dyn Persistence>,
    seeded: Vec<Collection>,
}

impl Store {
    /// Load every collection. Collections that were never saved are written
    /// with built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if a collection cannot be read, is
    /// corrupt, or its defaults cannot be written.
    #[instrument(skip_all, fields(backend = %persistence.describe()))]
    pub async fn open(persistence: Arc<dyn Persistence>) -> Result<Self, StoreError> {
        let events = EventBus::new();
        let mut seeded = Vec::new();
        let p = &*persistence;

        let categories = load_or_seed(p, defaults::categories, &mut seeded).await?;
        let products = load_or_seed(p, Vec::new, &mut seeded).await?;
        let services: Vec<Service> = load_or_seed(p, Vec::new, &mut seeded).await?;
        let about: Vec<AboutItem> = load_or_seed(p, defaults::about, &mut seeded).await?;
        let articles: Vec<Article> = load_or_seed(p, Vec::new, &mut seeded).await?;
        let advantages: Vec<Advantage> = load_or_seed(p, defaults::advantages, &mut seeded).await?;
        let partners: Vec<Partner> = load_or_seed(p, Vec::new, &mut seeded).await?;
        let orders: Vec<Order> = load_or_seed(p, Vec::new, &mut seeded).await?;
        let hero = load_hero(p, &mut seeded).await?;

        if !seeded.is_empty() {
            info!(collections = ?seeded, "Seeded missing collections with defaults");
        }

        let shared = || Arc::clone(&persistence);
        let catalog = CatalogStore::new(
            Catalog {
                categories,
                products,
            },
            shared(),
            events.clone(),
        );
        let services = RecordStore::new(services, shared(), events.clone());
        let about = RecordStore::new(about, shared(), events.clone());
        let articles = RecordStore::new(articles, shared(), events.clone());
        let advantages = RecordStore::new(advantages, shared(), events.clone());
        let partners = RecordStore::new(partners, shared(), events.clone());
        let hero = HeroStore::new(hero, shared(), events.clone());
        let orders = OrderLog::new(RecordStore::new(orders, shared(), events.clone()));

        Ok(Self {
            catalog,
            services,
            about,
            articles,
            advantages,
            partners,
            hero,
            orders,
            events,
            persistence,
            seeded,
        })
    }

    #[must_use]
    pub const fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    #[must_use]
    pub const fn services(&self) -> &RecordStore<Service> {
        &self.services
    }

    #[must_use]
    pub const fn about(&self) -> &RecordStore<AboutItem> {
        &self.about
    }

    #[must_use]
    pub const fn articles(&self) -> &RecordStore<Article> {
        &self.articles
    }

    #[must_use]
    pub const fn advantages(&self) -> &RecordStore<Advantage> {
        &self.advantages
    }

    #[must_use]
    pub const fn partners(&self) -> &RecordStore<Partner> {
        &self.partners
    }

    #[must_use]
    pub const fn hero(&self) -> &HeroStore {
        &self.hero
    }

    #[must_use]
    pub const fn orders(&self) -> &OrderLog {
        &self.orders
    }

    /// Collections that were filled with defaults by [`Store::open`].
    #[must_use]
    pub fn seeded(&self) -> &[Collection] {
        &self.seeded
    }

    /// Backend description for logs.
    #[must_use]
    pub fn backend(&self) -> String {
        self.persistence.describe()
    }

    /// Subscribe to write notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Build a snapshot document of the whole store.
    #[must_use]
    pub fn export_snapshot(&self, include_orders: bool) -> Snapshot {
        let catalog = self.catalog.snapshot();
        Snapshot {
            exported_at: Some(Utc::now()),
            categories: Some(catalog.categories.clone()),
            products: Some(catalog.products.clone()),
            services: Some(self.services.list().to_vec()),
            about: Some(self.about.list().to_vec()),
            articles: Some(self.articles.list().to_vec()),
            advantages: Some(self.advantages.list().to_vec()),
            partners: Some(self.partners.list().to_vec()),
            hero: Some(self.hero.get()),
            orders: include_orders.then(|| self.orders.records().list().to_vec()),
        }
    }

    /// Replace the collections present in `snapshot`.
    ///
    /// The document is validated completely before anything is written.
    /// Collections it does not mention are left untouched. All replaced
    /// collections are written in one batch and published together.
    ///
    /// # Errors
    ///
    /// Validation errors leave the store unchanged; so do storage errors.
    #[instrument(skip_all, fields(records = snapshot.record_count()))]
    pub async fn import_snapshot(&self, mut snapshot: Snapshot) -> Result<ImportSummary, StoreError> {
        // Lock order: catalog, content collections, hero, orders.
        let mut catalog_draft = self.catalog.begin().await;
        let existing: std::collections::HashSet<CategoryId> =
            catalog_draft.categories.iter().map(|c| c.id.clone()).collect();
        snapshot.validate(&existing)?;

        let records = snapshot.record_count();
        let mut batch = Vec::new();

        let mut catalog_changed = Vec::new();
        if let Some(categories) = snapshot.categories.take() {
            catalog_draft.categories = categories;
            catalog_changed.push(Collection::Categories);
        }
        if let Some(products) = snapshot.products.take() {
            catalog_draft.products = products;
            catalog_changed.push(Collection::Products);
        } else if !catalog_changed.is_empty() {
            // Stored products may point at categories the document dropped.
            let orphaned = catalog_draft.uncategorize_orphans();
            if orphaned > 0 {
                info!(orphaned, "Imported categories left products uncategorized");
                catalog_changed.push(Collection::Products);
            }
        }
        batch.extend(catalog::catalog_batch(&catalog_draft, &catalog_changed)?);

        let services = stage(&self.services, snapshot.services.take(), &mut batch).await?;
        let about = stage(&self.about, snapshot.about.take(), &mut batch).await?;
        let articles = stage(&self.articles, snapshot.articles.take(), &mut batch).await?;
        let advantages = stage(&self.advantages, snapshot.advantages.take(), &mut batch).await?;
        let partners = stage(&self.partners, snapshot.partners.take(), &mut batch).await?;

        let hero = match snapshot.hero.take() {
            Some(incoming) => {
                let mut draft = self.hero.begin().await;
                batch.push((
                    Collection::Hero,
                    encode(Collection::Hero, std::slice::from_ref(&incoming))?,
                ));
                *draft = incoming;
                Some(draft)
            }
            None => None,
        };

        let orders = match snapshot.orders.take() {
            Some(incoming) => {
                let mut draft = self.orders.begin().await;
                batch.push((Collection::Orders, encode(Collection::Orders, &incoming)?));
                *draft = incoming;
                Some(draft)
            }
            None => None,
        };

        let collections: Vec<Collection> = batch.iter().map(|(c, _)| *c).collect();
        self.persistence.save_many(batch).await?;

        catalog_draft.commit();
        for &collection in &catalog_changed {
            self.catalog.announce_replaced(collection);
        }
        commit(services, &self.services);
        commit(about, &self.about);
        commit(articles, &self.articles);
        commit(advantages, &self.advantages);
        commit(partners, &self.partners);
        if let Some(draft) = hero {
            draft.commit();
            self.hero.announce_replaced();
        }
        if let Some(draft) = orders {
            draft.commit();
            self.orders.records().announce_replaced();
        }

        info!(?collections, records, "Snapshot imported");
        Ok(ImportSummary {
            collections,
            records,
        })
    }
}

async fn load_or_seed<T: Record>(
    persistence: &dyn Persistence,
    defaults: fn() -> Vec<T>,
    seeded: &mut Vec<Collection>,
) -> Result<Vec<T>, StoreError> {
    if let Some(values) = persistence.load(T::COLLECTION).await? {
        return Ok(decode(T::COLLECTION, values)?);
    }

    let records = defaults();
    persistence
        .save_all(T::COLLECTION, encode(T::COLLECTION, &records)?)
        .await?;
    seeded.push(T::COLLECTION);
    Ok(records)
}

async fn load_hero(
    persistence: &dyn Persistence,
    seeded: &mut Vec<Collection>,
) -> Result<Hero, StoreError> {
    if let Some(values) = persistence.load(Collection::Hero).await? {
        let stored: Vec<Hero> = decode(Collection::Hero, values)?;
        if let Some(hero) = stored.into_iter().next() {
            return Ok(hero);
        }
    }

    let hero = defaults::hero();
    persistence
        .save_all(
            Collection::Hero,
            encode(Collection::Hero, std::slice::from_ref(&hero))?,
        )
        .await?;
    seeded.push(Collection::Hero);
    Ok(hero)
}

async fn stage<'a, T: Record>(
    store: &'a RecordStore<T>,
    incoming: Option<Vec<T>>,
    batch: &mut Vec<(Collection, Vec<serde_json::Value>)>,
) -> Result<Option<Draft<'a, Vec<T>>>, StoreError> {
    let Some(incoming) = incoming else {
        return Ok(None);
    };
    let mut draft = store.begin().await;
    batch.push((T::COLLECTION, encode(T::COLLECTION, &incoming)?));
    *draft = incoming;
    Ok(Some(draft))
}

fn commit<T: Record>(draft: Option<Draft<'_, Vec<T>>>, store: &RecordStore<T>) {
    if let Some(draft) = draft {
        draft.commit();
        store.announce_replaced();
    }
}
