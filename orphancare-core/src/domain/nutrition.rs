//! Nutrition record domain model
//!
//! Unlike child and health records, nutrition dates travel as full
//! ISO-8601 datetimes (`2024-03-01T00:00:00.000Z`).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::child::PageMetrics;
use super::result::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NutritionStatus {
    SeverelyMalnourished,
    Malnourished,
    Normal,
}

impl NutritionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NutritionStatus::SeverelyMalnourished => "severely_malnourished",
            NutritionStatus::Malnourished => "malnourished",
            NutritionStatus::Normal => "normal",
        }
    }
}

impl std::str::FromStr for NutritionStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "severely_malnourished" => Ok(Self::SeverelyMalnourished),
            "malnourished" => Ok(Self::Malnourished),
            "normal" => Ok(Self::Normal),
            other => Err(Error::validation(format!("Unknown nutrition status '{}'", other))),
        }
    }
}

/// Body mass index from weight in kilograms and height in centimetres
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionRecord {
    pub id: String,
    #[serde(default)]
    pub child_id: Option<String>,
    pub date: String,
    pub weight_kg: f64,
    pub height_cm: f64,
    /// Computed server-side
    #[serde(default)]
    pub bmi: Option<f64>,
    #[serde(default)]
    pub bmi_interpretation: Option<String>,
    #[serde(default)]
    pub nutrition_status: Option<String>,
    #[serde(default)]
    pub dhis2_event_id: Option<String>,
    #[serde(default)]
    pub synced: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl NutritionRecord {
    /// Server BMI when present, otherwise computed from the measurements
    pub fn bmi_or_computed(&self) -> f64 {
        self.bmi.unwrap_or_else(|| bmi(self.weight_kg, self.height_cm))
    }
}

/// `data` block of `GET /nutrition-records/{childId}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionRecordList {
    pub records: Vec<NutritionRecord>,
    #[serde(default)]
    pub metrics: Option<PageMetrics>,
}

mod iso_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Writable fields of a nutrition record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionPayload {
    #[serde(with = "iso_millis")]
    pub date: DateTime<Utc>,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub nutrition_status: String,
}

impl NutritionPayload {
    /// Payload for a measurement taken on `date` (stored at midnight UTC)
    pub fn on_day(date: NaiveDate, weight_kg: f64, height_cm: f64, status: NutritionStatus) -> Self {
        Self {
            date: DateTime::<Utc>::from_naive_utc_and_offset(date.and_time(NaiveTime::MIN), Utc),
            weight_kg,
            height_cm,
            nutrition_status: status.as_str().to_string(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.weight_kg.is_finite() || self.weight_kg <= 0.0 {
            return Err(Error::validation("Weight must be a positive number"));
        }
        if !self.height_cm.is_finite() || self.height_cm <= 0.0 {
            return Err(Error::validation("Height must be a positive number"));
        }
        if self.nutrition_status.trim().is_empty() {
            return Err(Error::validation("Nutrition status is required"));
        }
        Ok(())
    }

    pub fn bmi(&self) -> f64 {
        bmi(self.weight_kg, self.height_cm)
    }

    /// Prefill an edit form from an existing record
    ///
    /// A record whose date does not parse keeps today's date.
    pub fn from_record(record: &NutritionRecord) -> Self {
        let date = DateTime::parse_from_rfc3339(&record.date)
            .map(|d| d.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDate::parse_from_str(record.date.get(..10).unwrap_or(&record.date), "%Y-%m-%d")
                    .map(|d| DateTime::<Utc>::from_naive_utc_and_offset(d.and_time(NaiveTime::MIN), Utc))
            })
            .unwrap_or_else(|_| Utc::now());

        Self {
            date,
            weight_kg: record.weight_kg,
            height_cm: record.height_cm,
            nutrition_status: record.nutrition_status.clone().unwrap_or_default(),
        }
    }
}
