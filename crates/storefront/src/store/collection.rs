//! Generic record collection.
//!
//! Services, about items, articles, advantages, partners and the order log
//! are all a flat list of records with the same list/get/create/update/
//! delete surface. [`RecordStore`] implements it once for any [`Record`].

use std::sync::Arc;

use clear_hearing_core::{Record, RecordId, ValidationError};
use tracing::{debug, instrument};

use super::cell::{Draft, SnapshotCell};
use super::{EventBus, StoreError};
use crate::persistence::{Persistence, encode};

pub struct RecordStore<T: Record> {
    cell: SnapshotCell<Vec<T>>,
    persistence: Arc<dyn Persistence>,
    events: EventBus,
}

impl<T: Record> RecordStore<T> {
    pub(crate) fn new(records: Vec<T>, persistence: Arc<dyn Persistence>, events: EventBus) -> Self {
        Self {
            cell: SnapshotCell::new(records),
            persistence,
            events,
        }
    }

    /// All records in insertion order.
    pub fn list(&self) -> Arc<Vec<T>> {
        self.cell.load()
    }

    pub fn get(&self, id: &T::Id) -> Option<T> {
        self.cell.load().iter().find(|r| r.id() == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.cell.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cell.load().is_empty()
    }

    /// Add a record under a freshly generated id.
    ///
    /// # Errors
    ///
    /// Validation failures write nothing; storage failures leave the
    /// collection as it was.
    #[instrument(skip(self, record), fields(collection = %T::COLLECTION))]
    pub async fn create(&self, mut record: T) -> Result<T, StoreError> {
        record.set_id(T::Id::generate());
        record.prepare();
        record.validate()?;

        let mut draft = self.cell.begin().await;
        draft.push(record.clone());
        self.persist(&draft).await?;
        draft.commit();

        debug!(id = %record.id(), "Record created");
        self.events.created(T::COLLECTION, record.id().as_str());
        Ok(record)
    }

    /// Add a record keeping its id.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateId`] if the id is taken.
    pub async fn insert(&self, mut record: T) -> Result<T, StoreError> {
        if record.id().is_blank() {
            return Err(ValidationError::InvalidId(record.id().to_string()).into());
        }
        record.prepare();
        record.validate()?;

        let mut draft = self.cell.begin().await;
        if draft.iter().any(|r| r.id() == record.id()) {
            return Err(ValidationError::DuplicateId {
                collection: T::COLLECTION.as_str(),
                id: record.id().to_string(),
            }
            .into());
        }
        draft.push(record.clone());
        self.persist(&draft).await?;
        draft.commit();

        self.events.created(T::COLLECTION, record.id().as_str());
        Ok(record)
    }

    /// Replace the record stored under `id`. The id is preserved whatever
    /// the incoming record carries.
    #[instrument(skip(self, record), fields(collection = %T::COLLECTION))]
    pub async fn update(&self, id: &T::Id, mut record: T) -> Result<T, StoreError> {
        record.set_id(id.clone());
        record.prepare();
        record.validate()?;

        let mut draft = self.cell.begin().await;
        let slot = draft
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| StoreError::not_found(T::COLLECTION, id.as_str()))?;
        *slot = record.clone();
        self.persist(&draft).await?;
        draft.commit();

        self.events.updated(T::COLLECTION, id.as_str());
        Ok(record)
    }

    /// Apply `change` to one record in place.
    ///
    /// `change` returns whether it modified the record; nothing is written
    /// when it did not.
    pub async fn modify<F>(&self, id: &T::Id, change: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut T) -> bool,
    {
        let mut draft = self.cell.begin().await;
        let slot = draft
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| StoreError::not_found(T::COLLECTION, id.as_str()))?;
        if !change(slot) {
            return Ok(slot.clone());
        }
        slot.validate()?;
        let record = slot.clone();
        self.persist(&draft).await?;
        draft.commit();

        self.events.updated(T::COLLECTION, id.as_str());
        Ok(record)
    }

    #[instrument(skip(self), fields(collection = %T::COLLECTION))]
    pub async fn delete(&self, id: &T::Id) -> Result<T, StoreError> {
        let mut draft = self.cell.begin().await;
        let position = draft
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| StoreError::not_found(T::COLLECTION, id.as_str()))?;
        let removed = draft.remove(position);
        self.persist(&draft).await?;
        draft.commit();

        self.events.deleted(T::COLLECTION, id.as_str());
        Ok(removed)
    }

    pub(crate) async fn begin(&self) -> Draft<'_, Vec<T>> {
        self.cell.begin().await
    }

    pub(crate) fn announce_replaced(&self) {
        self.events.replaced(T::COLLECTION);
    }

    async fn persist(&self, records: &[T]) -> Result<(), StoreError> {
        let values = encode(T::COLLECTION, records)?;
        self.persistence.save_all(T::COLLECTION, values).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::persistence::MemoryPersistence;
    use crate::store::Change;
    use crate::store::StoreEvent;
    use clear_hearing_core::{Collection, Partner, PartnerId};

    fn partner(name: &str) -> Partner {
        Partner {
            id: PartnerId::default(),
            name: name.to_string(),
            logo_url: String::new(),
        }
    }

    fn store() -> (RecordStore<Partner>, Arc<MemoryPersistence>, EventBus) {
        let persistence = Arc::new(MemoryPersistence::new());
        let events = EventBus::new();
        let store = RecordStore::new(Vec::new(), persistence.clone(), events.clone());
        (store, persistence, events)
    }

    #[tokio::test]
    async fn test_create_assigns_fresh_ids() {
        let (store, persistence, _) = store();
        let a = store.create(partner("Signia")).await.unwrap();
        let b = store.create(partner("Signia")).await.unwrap();

        assert!(!a.id.is_blank());
        assert_ne!(a.id, b.id);
        assert_eq!(store.len(), 2);
        assert_eq!(persistence.stored(Collection::Partners).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_preserves_id() {
        let (store, _, _) = store();
        let created = store.create(partner("Signia")).await.unwrap();

        let mut edit = partner("Phonak");
        edit.id = PartnerId::new("smuggled");
        let updated = store.update(&created.id, edit).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(store.get(&created.id).unwrap().name, "Phonak");
        assert!(store.get(&PartnerId::new("smuggled")).is_none());
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let (store, _, _) = store();
        let ghost = PartnerId::new("ghost");
        assert!(matches!(
            store.update(&ghost, partner("X")).await,
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.delete(&ghost).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_validation_writes_nothing() {
        let (store, persistence, _) = store();
        assert!(matches!(
            store.create(partner("  ")).await,
            Err(StoreError::Validation(ValidationError::EmptyField { field: "name" }))
        ));
        assert!(store.is_empty());
        assert!(persistence.stored(Collection::Partners).is_none());
    }

    #[tokio::test]
    async fn test_storage_failure_leaves_state() {
        let (store, persistence, _) = store();
        let kept = store.create(partner("Signia")).await.unwrap();

        persistence.fail_writes(true);
        assert!(matches!(
            store.create(partner("Phonak")).await,
            Err(StoreError::Storage(_))
        ));
        assert!(store.delete(&kept.id).await.is_err());

        assert_eq!(store.list().as_slice(), &[kept]);
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicates() {
        let (store, _, _) = store();
        let mut record = partner("Signia");
        record.id = PartnerId::new("1");
        store.insert(record.clone()).await.unwrap();
        assert!(matches!(
            store.insert(record).await,
            Err(StoreError::Validation(ValidationError::DuplicateId { .. }))
        ));
    }

    #[tokio::test]
    async fn test_modify_without_change_skips_write() {
        let (store, persistence, _) = store();
        let created = store.create(partner("Signia")).await.unwrap();

        persistence.fail_writes(true);
        let same = store.modify(&created.id, |_| false).await.unwrap();
        assert_eq!(same, created);
    }

    #[tokio::test]
    async fn test_writes_are_announced() {
        let (store, _, events) = store();
        let mut rx = events.subscribe();
        let created = store.create(partner("Signia")).await.unwrap();
        store.delete(&created.id).await.unwrap();

        let first: StoreEvent = rx.recv().await.unwrap();
        assert_eq!(first.collection, Collection::Partners);
        assert_eq!(first.change, Change::Created);
        assert_eq!(rx.recv().await.unwrap().change, Change::Deleted);
    }
}
