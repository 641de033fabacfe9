//! Launch dataset for launchboard.
//!
//! This module defines the launch record type and the immutable [`Dataset`]
//! that every view is computed from. A dataset is parsed once at startup and
//! shared read-only for the lifetime of the process.

pub mod source;

use std::collections::BTreeSet;
use std::io::Read;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

pub use source::{load, source_for, DatasetSource, FileSource, HttpSource};

/// CSV header for the launch site column.
pub const COLUMN_LAUNCH_SITE: &str = "Launch Site";

/// CSV header for the payload mass column.
pub const COLUMN_PAYLOAD_MASS: &str = "Payload Mass (kg)";

/// CSV header for the booster category column.
pub const COLUMN_BOOSTER_CATEGORY: &str = "Booster Version Category";

/// CSV header for the outcome column.
pub const COLUMN_OUTCOME: &str = "class";

/// Columns a dataset must provide. Anything else is ignored.
pub const REQUIRED_COLUMNS: [&str; 4] = [
    COLUMN_LAUNCH_SITE,
    COLUMN_PAYLOAD_MASS,
    COLUMN_OUTCOME,
    COLUMN_BOOSTER_CATEGORY,
];

/// Whether a launch succeeded.
///
/// Encoded as `1` (success) or `0` (failure) both in the CSV and in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Outcome {
    /// The launch failed.
    Failure,
    /// The launch succeeded.
    Success,
}

impl Outcome {
    /// Check whether this outcome is a success.
    #[must_use]
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

impl TryFrom<u8> for Outcome {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Failure),
            1 => Ok(Self::Success),
            other => Err(format!("outcome must be 0 or 1, got {other}")),
        }
    }
}

impl From<Outcome> for u8 {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Failure => 0,
            Outcome::Success => 1,
        }
    }
}

/// One row of the launch dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchRecord {
    /// Launch site identifier, e.g. `CCAFS LC-40`.
    #[serde(rename(deserialize = "Launch Site"))]
    pub launch_site: String,

    /// Payload mass in kilograms.
    #[serde(rename(deserialize = "Payload Mass (kg)"))]
    pub payload_mass_kg: f64,

    /// Booster version category, e.g. `FT` or `B5`.
    #[serde(rename(deserialize = "Booster Version Category"))]
    pub booster_version_category: String,

    /// Launch outcome.
    #[serde(rename(deserialize = "class"))]
    pub outcome: Outcome,
}

impl LaunchRecord {
    /// Create a new launch record.
    #[must_use]
    pub fn new(
        launch_site: impl Into<String>,
        payload_mass_kg: f64,
        booster_version_category: impl Into<String>,
        outcome: Outcome,
    ) -> Self {
        Self {
            launch_site: launch_site.into(),
            payload_mass_kg,
            booster_version_category: booster_version_category.into(),
            outcome,
        }
    }
}

/// Observed payload extrema of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayloadBounds {
    /// Smallest payload mass in kg.
    pub min: f64,
    /// Largest payload mass in kg.
    pub max: f64,
}

/// Where a dataset came from and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetInfo {
    /// Human-readable source description.
    pub source: String,
    /// BLAKE3 hash over the parsed records.
    pub fingerprint: String,
    /// When the dataset was loaded.
    pub loaded_at: DateTime<Utc>,
}

/// Serializable overview of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Number of records.
    pub rows: usize,
    /// Distinct launch sites in lexical order.
    pub sites: Vec<String>,
    /// Distinct booster categories in first-appearance order.
    pub booster_categories: Vec<String>,
    /// Payload extrema, absent for an empty dataset.
    pub payload_bounds: Option<PayloadBounds>,
    /// Overall success rate, absent for an empty dataset.
    pub success_rate: Option<f64>,
    /// Load metadata.
    #[serde(flatten)]
    pub info: DatasetInfo,
}

/// Immutable, ordered launch table.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<LaunchRecord>,
    info: DatasetInfo,
}

impl Dataset {
    /// Build a dataset from already-parsed records.
    #[must_use]
    pub fn new(records: Vec<LaunchRecord>, source: impl Into<String>) -> Self {
        let fingerprint = fingerprint(&records);
        Self {
            records,
            info: DatasetInfo {
                source: source.into(),
                fingerprint,
                loaded_at: Utc::now(),
            },
        }
    }

    /// Parse a dataset from CSV with a header row.
    ///
    /// Columns are matched by name; unknown columns are ignored and record
    /// order is preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if a required column is missing or a row fails to parse.
    pub fn from_csv_reader<R: Read>(reader: R, source: impl Into<String>) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|header| header == column) {
                return Err(Error::missing_column(column));
            }
        }

        let records = reader
            .deserialize()
            .collect::<std::result::Result<Vec<LaunchRecord>, csv::Error>>()?;

        debug!("Parsed {} launch records", records.len());
        Ok(Self::new(records, source))
    }

    /// All records in source order.
    #[must_use]
    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the dataset has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Load metadata.
    #[must_use]
    pub fn info(&self) -> &DatasetInfo {
        &self.info
    }

    /// Distinct launch sites in lexical order.
    #[must_use]
    pub fn sites(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|record| record.launch_site.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct booster categories in first-appearance order.
    #[must_use]
    pub fn booster_categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for record in &self.records {
            let category = record.booster_version_category.as_str();
            if !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }

    /// Smallest and largest payload mass, or `None` when empty.
    #[must_use]
    pub fn payload_bounds(&self) -> Option<PayloadBounds> {
        let first = self.records.first()?.payload_mass_kg;
        let bounds = self.records.iter().fold(
            PayloadBounds {
                min: first,
                max: first,
            },
            |acc, record| PayloadBounds {
                min: acc.min.min(record.payload_mass_kg),
                max: acc.max.max(record.payload_mass_kg),
            },
        );
        Some(bounds)
    }

    /// Build a serializable summary.
    #[must_use]
    pub fn summary(&self) -> DatasetSummary {
        let success_rate = if self.is_empty() {
            None
        } else {
            let successes = self
                .records
                .iter()
                .filter(|record| record.outcome.is_success())
                .count();
            #[allow(clippy::cast_precision_loss)]
            Some(successes as f64 / self.len() as f64)
        };

        DatasetSummary {
            rows: self.len(),
            sites: self.sites().into_iter().map(str::to_string).collect(),
            booster_categories: self
                .booster_categories()
                .into_iter()
                .map(str::to_string)
                .collect(),
            payload_bounds: self.payload_bounds(),
            success_rate,
            info: self.info.clone(),
        }
    }
}

/// Hash the record contents so identical tables share a fingerprint
/// regardless of CSV formatting.
fn fingerprint(records: &[LaunchRecord]) -> String {
    let mut hasher = blake3::Hasher::new();
    for record in records {
        hasher.update(record.launch_site.as_bytes());
        hasher.update(&[0]);
        hasher.update(&record.payload_mass_kg.to_le_bytes());
        hasher.update(record.booster_version_category.as_bytes());
        hasher.update(&[0, u8::from(record.outcome)]);
    }
    hasher.finalize().to_hex().to_string()
}
