//! Child domain model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::health::HealthRecord;
use super::nutrition::NutritionRecord;
use super::result::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "M" | "MALE" | "BOY" => Ok(Gender::Male),
            "F" | "FEMALE" | "GIRL" => Ok(Gender::Female),
            other => Err(Error::validation(format!("Unknown gender '{}', expected M or F", other))),
        }
    }
}

/// Parental situation of a child
///
/// The server stores a free string; the three known values get variants
/// and anything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParentStatus {
    TotalOrphan,
    PartialOrphan,
    Abandoned,
    Other(String),
}

impl ParentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ParentStatus::TotalOrphan => "total_orphan",
            ParentStatus::PartialOrphan => "partial_orphan",
            ParentStatus::Abandoned => "abandoned",
            ParentStatus::Other(s) => s,
        }
    }
}

impl From<String> for ParentStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "total_orphan" => ParentStatus::TotalOrphan,
            "partial_orphan" => ParentStatus::PartialOrphan,
            "abandoned" => ParentStatus::Abandoned,
            _ => ParentStatus::Other(s),
        }
    }
}

impl From<ParentStatus> for String {
    fn from(status: ParentStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Row of `GET /children`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildSummary {
    pub id: String,
    #[serde(default)]
    pub orphanage_id: Option<String>,
    pub full_name: String,
    pub gender: Gender,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub estimated_age: Option<i32>,
    #[serde(default)]
    pub entry_date: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub parent_status: Option<ParentStatus>,
    #[serde(default)]
    pub internal_code: Option<String>,
    #[serde(default)]
    pub dhis2_tracked_entity_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub orphanage: Option<OrphanageRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrphanageRef {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageMetrics {
    #[serde(default)]
    pub total_count: i64,
    #[serde(default)]
    pub current_page: i64,
    #[serde(default)]
    pub total_pages: i64,
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub has_prev_page: bool,
    #[serde(default)]
    pub page_size: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChildFilters {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub parent_status: Option<String>,
}

/// `data` block of `GET /children`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildrenList {
    pub children: Vec<ChildSummary>,
    #[serde(default)]
    pub metrics: PageMetrics,
    #[serde(default)]
    pub filters: ChildFilters,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseName {
    pub name: String,
}

/// Disease association listed on a child's detail page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildDisease {
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub diseases: Option<DiseaseName>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub diagnosed_date: Option<String>,
}

/// `GET /child/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildDetail {
    #[serde(flatten)]
    pub summary: ChildSummary,
    #[serde(default)]
    pub nutrition_records: Vec<NutritionRecord>,
    #[serde(default)]
    pub health_records: Vec<HealthRecord>,
    #[serde(default)]
    pub child_diseases: Vec<ChildDisease>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// Writable fields of a child
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildPayload {
    pub full_name: String,
    pub gender: Gender,
    pub birth_date: Option<NaiveDate>,
    pub estimated_age: Option<i32>,
    pub entry_date: Option<NaiveDate>,
    pub parent_status: Option<ParentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_code: Option<String>,
}

impl ChildPayload {
    pub fn new(full_name: impl Into<String>, gender: Gender) -> Self {
        Self {
            full_name: full_name.into(),
            gender,
            birth_date: None,
            estimated_age: None,
            entry_date: None,
            parent_status: Some(ParentStatus::TotalOrphan),
            internal_code: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.full_name.trim().is_empty() {
            return Err(Error::validation("Full name is required"));
        }
        if let Some(age) = self.estimated_age {
            if !(0..=25).contains(&age) {
                return Err(Error::validation(format!("Estimated age {} is out of range", age)));
            }
        }
        if let (Some(birth), Some(entry)) = (self.birth_date, self.entry_date) {
            if entry < birth {
                return Err(Error::validation("Entry date cannot be before birth date"));
            }
        }
        Ok(())
    }

    /// Prefill an edit form from an existing record
    pub fn from_summary(child: &ChildSummary) -> Self {
        let parse = |d: &Option<String>| {
            d.as_deref()
                .and_then(|s| NaiveDate::parse_from_str(s.get(..10).unwrap_or(s), "%Y-%m-%d").ok())
        };
        Self {
            full_name: child.full_name.clone(),
            gender: child.gender,
            birth_date: parse(&child.birth_date),
            estimated_age: child.estimated_age,
            entry_date: parse(&child.entry_date),
            parent_status: Some(
                child.parent_status.clone().unwrap_or(ParentStatus::TotalOrphan),
            ),
            internal_code: child.internal_code.clone(),
        }
    }
}
