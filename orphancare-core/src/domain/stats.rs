//! Orphanage statistics returned by `GET /orphanage-stats`

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalDocument {
    pub url: String,
    pub path: String,
    pub file_name: String,
    pub file_size: i64,
    pub file_type: String,
    pub uploaded_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrphanageDocuments {
    #[serde(default)]
    pub legal_document: Option<LegalDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrphanageInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province_id: Option<String>,
    #[serde(default)]
    pub city_id: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub location_gps: Option<String>,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub legal_status: Option<String>,
    #[serde(default)]
    pub documents: OrphanageDocuments,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub dhis2_orgunit_id: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    pub child_capacity: i64,
    #[serde(default)]
    pub children_total: i64,
    #[serde(default)]
    pub boys_count: i64,
    #[serde(default)]
    pub girls_count: i64,
    #[serde(default)]
    pub schooling_rate: Option<f64>,
    #[serde(default)]
    pub annual_disease_rate: Option<f64>,
    #[serde(default)]
    pub meals_per_day: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenderBreakdown {
    pub boys: i64,
    pub girls: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgeGroups {
    #[serde(rename = "0-2")]
    pub infants: i64,
    #[serde(rename = "3-5")]
    pub toddlers: i64,
    #[serde(rename = "6-12")]
    pub children: i64,
    #[serde(rename = "13-17")]
    pub adolescents: i64,
    #[serde(rename = "18+")]
    pub adults: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildrenStats {
    pub total: i64,
    pub by_gender: GenderBreakdown,
    pub by_age_group: AgeGroups,
    #[serde(default)]
    pub new_this_month: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionStats {
    pub malnutrition_rate: f64,
    /// Count per nutrition status (`malnourished`, ...)
    #[serde(default)]
    pub by_status: Map<String, JsonValue>,
    #[serde(rename = "averageBMI", default)]
    pub average_bmi: f64,
}

impl NutritionStats {
    pub fn malnourished(&self) -> i64 {
        self.by_status
            .get("malnourished")
            .and_then(|v| v.as_i64())
            .unwrap_or(0)
    }

    pub fn level(&self) -> MalnutritionLevel {
        MalnutritionLevel::from_rate(self.malnutrition_rate)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseCount {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStats {
    pub vaccination_coverage: f64,
    #[serde(default)]
    pub common_diseases: Vec<DiseaseCount>,
    #[serde(default)]
    pub chronic_conditions: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityInfo {
    pub current: i64,
    pub max: i64,
    pub utilization_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub month: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trends {
    #[serde(default)]
    pub monthly_growth: Vec<TrendPoint>,
    #[serde(default)]
    pub nutrition_trend: Vec<TrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrphanageStats {
    pub orphanage: OrphanageInfo,
    pub children: ChildrenStats,
    pub nutrition: NutritionStats,
    pub health: HealthStats,
    pub capacity: CapacityInfo,
    #[serde(default)]
    pub trends: Trends,
}

/// Where a stats value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsSource {
    Live,
    Demo,
}

/// Dashboard statistics tagged with their origin
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub source: StatsSource,
    /// Why the live call was not used, when `source` is `Demo`
    pub fallback_reason: Option<String>,
    pub stats: OrphanageStats,
}

impl DashboardStats {
    pub fn is_demo(&self) -> bool {
        self.source == StatsSource::Demo
    }
}

/// Severity band for the malnutrition rate (percent)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MalnutritionLevel {
    Good,
    Moderate,
    High,
}

impl MalnutritionLevel {
    pub fn from_rate(rate: f64) -> Self {
        if rate < 10.0 {
            MalnutritionLevel::Good
        } else if rate < 20.0 {
            MalnutritionLevel::Moderate
        } else {
            MalnutritionLevel::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MalnutritionLevel::Good => "Good",
            MalnutritionLevel::Moderate => "Moderate",
            MalnutritionLevel::High => "High",
        }
    }
}
