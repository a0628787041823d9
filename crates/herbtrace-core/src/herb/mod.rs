//! Herb batch records and their data-access helpers.

mod database;
mod types;

pub use database::{DEFAULT_LIST_LIMIT, HerbDatabase, harvest_date_today};
pub use types::{
    DEFAULT_FARMER_ID, DEFAULT_FARMER_NAME, DEFAULT_QUALITY_GRADE, HerbBatch, HerbForm,
    HerbRecord, Location, RecordStamp, ValidHerb, describe_entry,
};

/// Type tag under which every herb batch lives in the object store.
pub const HERB_OBJECT_TYPE: &str = "ayurvedic_herb";
