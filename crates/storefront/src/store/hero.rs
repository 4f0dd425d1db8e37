//! Home page hero banner.

use std::sync::Arc;

use clear_hearing_core::{Collection, Hero};

use super::cell::{Draft, SnapshotCell};
use super::{EventBus, StoreError};
use crate::persistence::{Persistence, encode};

/// Singleton store. Persisted as a one-element collection.
pub struct HeroStore {
    cell: SnapshotCell<Hero>,
    persistence: Arc<dyn Persistence>,
    events: EventBus,
}

impl HeroStore {
    pub(crate) fn new(hero: Hero, persistence: Arc<dyn Persistence>, events: EventBus) -> Self {
        Self {
            cell: SnapshotCell::new(hero),
            persistence,
            events,
        }
    }

    pub fn get(&self) -> Hero {
        Hero::clone(&self.cell.load())
    }

    /// Replace the banner.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank title.
    pub async fn replace(&self, hero: Hero) -> Result<Hero, StoreError> {
        hero.validate()?;

        let mut draft = self.cell.begin().await;
        *draft = hero.clone();
        let values = encode(Collection::Hero, std::slice::from_ref(&hero))?;
        self.persistence.save_all(Collection::Hero, values).await?;
        draft.commit();

        self.events.replaced(Collection::Hero);
        Ok(hero)
    }

    pub(crate) async fn begin(&self) -> Draft<'_, Hero> {
        self.cell.begin().await
    }

    pub(crate) fn announce_replaced(&self) {
        self.events.replaced(Collection::Hero);
    }
}
