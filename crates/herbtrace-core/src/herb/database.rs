//! Herb data-access helpers over an [`ObjectStore`].
//!
//! Lookups read a single listing page (newest first, capped at
//! `list_limit`) and filter client-side. Older batches beyond the cap are
//! invisible to every lookup.

use tracing::{debug, error, info, instrument, warn};

use super::HERB_OBJECT_TYPE;
use super::types::{HerbBatch, HerbForm, HerbRecord, RecordStamp};
use crate::error::{Error, Result};
use crate::ids::{generate_batch_id, generate_placeholder_hash};
use crate::store::{ObjectStore, StoreError};

/// Listing cap used unless configured otherwise.
pub const DEFAULT_LIST_LIMIT: u32 = 100;

/// Today's local date as `M/D/YYYY`.
pub fn harvest_date_today() -> String {
    chrono::Local::now().format("%-m/%-d/%Y").to_string()
}

/// Herb batch helpers bound to one object store.
#[derive(Debug)]
pub struct HerbDatabase<S> {
    store: S,
    list_limit: u32,
}

impl<S: ObjectStore> HerbDatabase<S> {
    pub const fn new(store: S) -> Self {
        Self {
            store,
            list_limit: DEFAULT_LIST_LIMIT,
        }
    }

    /// Override the listing cap.
    #[must_use]
    pub fn with_list_limit(mut self, list_limit: u32) -> Self {
        self.list_limit = list_limit;
        self
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Validate a farmer submission, store it and return the new batch id.
    ///
    /// Every failure is logged and surfaced with the
    /// `Database operation failed` prefix; nothing is retried.
    #[instrument(skip(self, form))]
    pub async fn add_herb(&self, form: HerbForm, farmer_id: &str, farmer_name: &str) -> Result<String> {
        match self.try_add_herb(form, farmer_id, farmer_name).await {
            Ok(batch_id) => {
                info!(batch_id = %batch_id, "Herb batch stored");
                Ok(batch_id)
            }
            Err(e) => {
                error!(error = %e, "Herb submission failed");
                Err(e)
            }
        }
    }

    async fn try_add_herb(&self, form: HerbForm, farmer_id: &str, farmer_name: &str) -> Result<String> {
        let herb = form.validate()?;
        let stamp = RecordStamp {
            batch_id: generate_batch_id(),
            blockchain_hash: generate_placeholder_hash(),
            harvest_date: harvest_date_today(),
        };
        debug!(batch_id = %stamp.batch_id, "Generated batch identifiers");

        let record = HerbRecord::from_submission(herb, stamp, farmer_id, farmer_name)
            .map_err(StoreError::from)?;
        let data = serde_json::to_value(&record).map_err(StoreError::from)?;
        let created = self.store.create_object(HERB_OBJECT_TYPE, data).await?;
        debug!(object_id = %created.object_id, "Object store create succeeded");

        Ok(record.batch_id)
    }

    /// Batches submitted by `farmer_id`, newest first.
    ///
    /// A failed listing is logged and yields an empty list.
    #[instrument(skip(self))]
    pub async fn farmer_collections(&self, farmer_id: &str) -> Vec<HerbRecord> {
        match self.list_records().await {
            Ok(records) => records
                .into_iter()
                .filter(|r| r.farmer_id == farmer_id)
                .collect(),
            Err(e) => {
                error!(error = %e, "Error getting farmer collections");
                Vec::new()
            }
        }
    }

    /// Find a batch by id, decoding its location.
    ///
    /// `Ok(None)` when no batch in the listing matches; a failed listing is
    /// [`Error::Retrieval`].
    #[instrument(skip(self))]
    pub async fn get_herb(&self, batch_id: &str) -> Result<Option<HerbBatch>> {
        let records = self.list_records().await.map_err(|e| {
            error!(error = %e, "Error getting herb from database");
            Error::Retrieval(e)
        })?;
        Ok(records
            .into_iter()
            .find(|r| r.batch_id == batch_id)
            .map(HerbBatch::from))
    }

    /// Every batch in the listing, newest first (admin view).
    #[instrument(skip(self))]
    pub async fn list_batches(&self) -> Result<Vec<HerbRecord>> {
        self.list_records().await.map_err(|e| {
            error!(error = %e, "Error listing herb batches");
            Error::Retrieval(e)
        })
    }

    /// Read the first listing page and decode its herb records.
    ///
    /// Objects that do not decode as a [`HerbRecord`] are skipped.
    async fn list_records(&self) -> std::result::Result<Vec<HerbRecord>, StoreError> {
        let page = self
            .store
            .list_objects(HERB_OBJECT_TYPE, self.list_limit, true)
            .await?;
        if page.next_page_token.is_some() {
            debug!(limit = self.list_limit, "Listing truncated at first page");
        }
        Ok(page
            .items
            .into_iter()
            .filter_map(|item| {
                match serde_json::from_value::<HerbRecord>(item.object_data) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        warn!(object_id = %item.object_id, error = %e, "Skipping malformed herb object");
                        None
                    }
                }
            })
            .collect())
    }
}
