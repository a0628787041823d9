//! Herb batch records.
//!
//! [`HerbForm`] is what a farmer typed, [`ValidHerb`] is a form that passed
//! validation, [`HerbRecord`] is the shape written to the object store and
//! [`HerbBatch`] is a record read back with its location decoded.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ValidationError;

/// Quality grade used when the farmer leaves it blank.
pub const DEFAULT_QUALITY_GRADE: &str = "Standard";
/// Farmer id stored when the submitter has none.
pub const DEFAULT_FARMER_ID: &str = "FARMER001";
/// Farmer name stored when the submitter has none.
pub const DEFAULT_FARMER_NAME: &str = "Unknown Farmer";

/// Where a batch was collected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Location {
    /// Parse picker input. Blank `address` is stored as `None`.
    pub fn parse(latitude: &str, longitude: &str, address: &str) -> Result<Self, String> {
        let latitude: f64 = latitude
            .trim()
            .parse()
            .map_err(|_| format!("latitude {latitude:?} is not a number"))?;
        let longitude: f64 = longitude
            .trim()
            .parse()
            .map_err(|_| format!("longitude {longitude:?} is not a number"))?;
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(format!("latitude {latitude} out of range"));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(format!("longitude {longitude} out of range"));
        }
        let address = address.trim();
        Ok(Self {
            latitude,
            longitude,
            address: (!address.is_empty()).then(|| address.to_string()),
        })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)?;
        if let Some(ref address) = self.address {
            write!(f, " ({address})")?;
        }
        Ok(())
    }
}

/// Raw submission from the farmer form, as entered.
#[derive(Debug, Clone, Default)]
pub struct HerbForm {
    pub herb_name: Option<String>,
    /// Quantity text in kilograms.
    pub quantity: Option<String>,
    pub location: Option<Location>,
    pub photo: Option<String>,
    pub processing: Vec<serde_json::Value>,
    pub testing: Vec<serde_json::Value>,
    pub organic_certified: bool,
    pub quality_grade: Option<String>,
}

/// A form that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidHerb {
    pub herb_name: String,
    pub quantity: f64,
    pub location: Location,
    pub photo: String,
    pub processing: Vec<serde_json::Value>,
    pub testing: Vec<serde_json::Value>,
    pub organic_certified: bool,
    pub quality_grade: String,
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

impl HerbForm {
    /// Check required fields and coerce the rest.
    ///
    /// Every missing field among `herbName`, `quantity` and `location` is
    /// reported at once. A quantity that is present but not a positive
    /// number is rejected separately.
    pub fn validate(self) -> Result<ValidHerb, ValidationError> {
        let herb_name = present(self.herb_name.as_ref()).map(str::to_string);
        let quantity = present(self.quantity.as_ref()).map(str::to_string);

        let mut missing = Vec::new();
        if herb_name.is_none() {
            missing.push("herbName");
        }
        if quantity.is_none() {
            missing.push("quantity");
        }
        if self.location.is_none() {
            missing.push("location");
        }
        let (Some(herb_name), Some(quantity), Some(location)) = (herb_name, quantity, self.location)
        else {
            return Err(ValidationError::MissingFields(missing));
        };

        let quantity = match quantity.parse::<f64>() {
            Ok(q) if q.is_finite() && q > 0.0 => q,
            _ => return Err(ValidationError::InvalidQuantity(quantity)),
        };

        Ok(ValidHerb {
            herb_name,
            quantity,
            location,
            photo: self.photo.unwrap_or_default(),
            processing: self.processing,
            testing: self.testing,
            organic_certified: self.organic_certified,
            quality_grade: present(self.quality_grade.as_ref())
                .unwrap_or(DEFAULT_QUALITY_GRADE)
                .to_string(),
        })
    }
}

/// A herb batch as stored in the object store.
///
/// `location` holds the JSON text of a [`Location`]; use
/// [`HerbRecord::location`] to decode it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HerbRecord {
    pub batch_id: String,
    #[serde(default)]
    pub herb_name: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub harvest_date: String,
    #[serde(default)]
    pub blockchain_hash: String,
    #[serde(default)]
    pub farmer_id: String,
    #[serde(default)]
    pub farmer_name: String,
    #[serde(default)]
    pub processing: Vec<serde_json::Value>,
    #[serde(default)]
    pub testing: Vec<serde_json::Value>,
    #[serde(default)]
    pub organic_certified: bool,
    #[serde(default = "default_quality_grade")]
    pub quality_grade: String,
}

fn default_quality_grade() -> String {
    DEFAULT_QUALITY_GRADE.to_string()
}

/// Generated parts of a new record.
#[derive(Debug, Clone)]
pub struct RecordStamp {
    pub batch_id: String,
    pub blockchain_hash: String,
    pub harvest_date: String,
}

impl HerbRecord {
    /// Shape a validated submission into the stored record.
    pub fn from_submission(
        herb: ValidHerb,
        stamp: RecordStamp,
        farmer_id: &str,
        farmer_name: &str,
    ) -> Result<Self, serde_json::Error> {
        let or_default = |value: &str, default: &str| {
            if value.is_empty() {
                default.to_string()
            } else {
                value.to_string()
            }
        };
        Ok(Self {
            batch_id: stamp.batch_id,
            herb_name: herb.herb_name,
            quantity: herb.quantity,
            location: serde_json::to_string(&herb.location)?,
            photo: herb.photo,
            harvest_date: stamp.harvest_date,
            blockchain_hash: stamp.blockchain_hash,
            farmer_id: or_default(farmer_id, DEFAULT_FARMER_ID),
            farmer_name: or_default(farmer_name, DEFAULT_FARMER_NAME),
            processing: herb.processing,
            testing: herb.testing,
            organic_certified: herb.organic_certified,
            quality_grade: herb.quality_grade,
        })
    }

    /// Decode the stored location text. Malformed text yields `None`.
    pub fn location(&self) -> Option<Location> {
        if self.location.is_empty() {
            return None;
        }
        match serde_json::from_str(&self.location) {
            Ok(location) => Some(location),
            Err(e) => {
                warn!(batch_id = %self.batch_id, error = %e, "Failed to parse location data");
                None
            }
        }
    }
}

/// A stored record with its location decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HerbBatch {
    pub batch_id: String,
    pub herb_name: String,
    pub quantity: f64,
    pub location: Option<Location>,
    pub photo: String,
    pub harvest_date: String,
    pub blockchain_hash: String,
    pub farmer_id: String,
    pub farmer_name: String,
    pub processing: Vec<serde_json::Value>,
    pub testing: Vec<serde_json::Value>,
    pub organic_certified: bool,
    pub quality_grade: String,
}

impl From<HerbRecord> for HerbBatch {
    fn from(record: HerbRecord) -> Self {
        let location = record.location();
        Self {
            batch_id: record.batch_id,
            herb_name: record.herb_name,
            quantity: record.quantity,
            location,
            photo: record.photo,
            harvest_date: record.harvest_date,
            blockchain_hash: record.blockchain_hash,
            farmer_id: record.farmer_id,
            farmer_name: record.farmer_name,
            processing: record.processing,
            testing: record.testing,
            organic_certified: record.organic_certified,
            quality_grade: record.quality_grade,
        }
    }
}

/// Render an opaque processing/testing entry on one line.
pub fn describe_entry(entry: &serde_json::Value) -> String {
    match entry {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
