//! Health record domain model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::child::PageMetrics;
use super::result::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VaccinationStatus {
    Vaccinated,
    PartiallyVaccinated,
    NotVaccinated,
    Unknown,
}

impl VaccinationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VaccinationStatus::Vaccinated => "vaccinated",
            VaccinationStatus::PartiallyVaccinated => "partially_vaccinated",
            VaccinationStatus::NotVaccinated => "not_vaccinated",
            VaccinationStatus::Unknown => "unknown",
        }
    }
}

impl std::str::FromStr for VaccinationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "vaccinated" => Ok(Self::Vaccinated),
            "partially_vaccinated" => Ok(Self::PartiallyVaccinated),
            "not_vaccinated" => Ok(Self::NotVaccinated),
            "unknown" => Ok(Self::Unknown),
            other => Err(Error::validation(format!("Unknown vaccination status '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl std::str::FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mild" => Ok(Self::Mild),
            "moderate" => Ok(Self::Moderate),
            "severe" => Ok(Self::Severe),
            other => Err(Error::validation(format!("Unknown severity '{}'", other))),
        }
    }
}

/// Structured vaccination block as stored by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaccinationStatusStructured {
    pub status: String,
    #[serde(default)]
    pub vaccines: Vec<JsonValue>,
    #[serde(default)]
    pub last_updated: String,
}

/// Disease attached to a health record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordDisease {
    pub id: String,
    pub disease_id: String,
    #[serde(default)]
    pub diagnosed_date: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub disease_name: Option<String>,
    #[serde(default)]
    pub disease_description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthRecord {
    pub id: String,
    #[serde(default)]
    pub child_id: Option<String>,
    pub date: String,
    #[serde(default)]
    pub vaccination_status: Option<String>,
    #[serde(default)]
    pub vaccination_status_structured: Option<VaccinationStatusStructured>,
    #[serde(default)]
    pub chronic_conditions: Option<String>,
    #[serde(default)]
    pub medications: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub dhis2_event_id: Option<String>,
    #[serde(default)]
    pub synced: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub diseases: Vec<RecordDisease>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildRef {
    pub id: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateFilters {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// `data` block of `GET /get-health-records/{childId}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthRecordList {
    pub health_records: Vec<HealthRecord>,
    #[serde(default)]
    pub metrics: PageMetrics,
    #[serde(default)]
    pub child: Option<ChildRef>,
    #[serde(default)]
    pub filters: DateFilters,
}

/// Catalogue entry from `GET /diseases`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disease {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DiseaseCatalogue {
    #[serde(default)]
    pub diseases: Vec<Disease>,
}

/// Disease picked on the health form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedDisease {
    pub disease_id: String,
    pub severity: Option<Severity>,
    pub notes: Option<String>,
}

/// Writable fields of a health record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecordPayload {
    pub date: Option<NaiveDate>,
    pub vaccination_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vaccination_status_structured: Option<VaccinationStatusStructured>,
    pub chronic_conditions: Option<String>,
    pub medications: Option<String>,
    pub remarks: Option<String>,
    #[serde(
        rename = "selectedDiseases",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub selected_diseases: Option<Vec<SelectedDisease>>,
}

impl HealthRecordPayload {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            vaccination_status: None,
            vaccination_status_structured: None,
            chronic_conditions: None,
            medications: None,
            remarks: None,
            selected_diseases: None,
        }
    }

    /// Set the structured vaccination status, stamped with the record date
    pub fn with_vaccination(mut self, status: VaccinationStatus) -> Self {
        self.vaccination_status_structured = Some(VaccinationStatusStructured {
            status: status.as_str().to_string(),
            vaccines: Vec::new(),
            last_updated: self.date.map(|d| d.to_string()).unwrap_or_default(),
        });
        self
    }

    /// Add a disease, ignoring one that is already selected
    pub fn select_disease(&mut self, disease_id: impl Into<String>, severity: Option<Severity>) {
        let disease_id = disease_id.into();
        let selected = self.selected_diseases.get_or_insert_with(Vec::new);
        if selected.iter().any(|d| d.disease_id == disease_id) {
            return;
        }
        selected.push(SelectedDisease {
            disease_id,
            severity,
            notes: None,
        });
    }

    pub fn deselect_disease(&mut self, disease_id: &str) {
        if let Some(selected) = self.selected_diseases.as_mut() {
            selected.retain(|d| d.disease_id != disease_id);
            if selected.is_empty() {
                self.selected_diseases = None;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.date.is_none() {
            return Err(Error::validation("Date is required"));
        }
        Ok(())
    }

    /// Prefill an edit form from an existing record
    pub fn from_record(record: &HealthRecord) -> Self {
        let date = record.date.get(..10).unwrap_or(&record.date);
        let selected: Vec<SelectedDisease> = record
            .diseases
            .iter()
            .map(|d| SelectedDisease {
                disease_id: d.disease_id.clone(),
                severity: d.severity.as_deref().and_then(|s| s.parse().ok()),
                notes: d.notes.clone(),
            })
            .collect();

        Self {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
            vaccination_status: record.vaccination_status.clone(),
            vaccination_status_structured: record.vaccination_status_structured.clone(),
            chronic_conditions: record.chronic_conditions.clone(),
            medications: record.medications.clone(),
            remarks: record.remarks.clone(),
            selected_diseases: (!selected.is_empty()).then_some(selected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_wire_format() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 14).unwrap();
        let mut payload = HealthRecordPayload::new(date).with_vaccination(VaccinationStatus::PartiallyVaccinated);
        payload.remarks = Some("Follow-up in a month".to_string());
        payload.select_disease("d-1", Some(Severity::Moderate));

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["date"], "2024-02-14");
        assert_eq!(json["vaccination_status_structured"]["status"], "partially_vaccinated");
        assert_eq!(json["vaccination_status_structured"]["last_updated"], "2024-02-14");
        assert_eq!(json["selectedDiseases"][0]["disease_id"], "d-1");
        assert_eq!(json["selectedDiseases"][0]["severity"], "moderate");
        assert!(json["chronic_conditions"].is_null());
    }

    #[test]
    fn test_optional_blocks_are_omitted() {
        let payload = HealthRecordPayload::new(NaiveDate::from_ymd_opt(2024, 2, 14).unwrap());
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("vaccination_status_structured").is_none());
        assert!(json.get("selectedDiseases").is_none());
    }

    #[test]
    fn test_disease_selection_is_unique() {
        let mut payload = HealthRecordPayload::new(NaiveDate::from_ymd_opt(2024, 2, 14).unwrap());
        payload.select_disease("d-1", None);
        payload.select_disease("d-1", Some(Severity::Severe));
        assert_eq!(payload.selected_diseases.as_ref().unwrap().len(), 1);

        payload.deselect_disease("d-1");
        assert!(payload.selected_diseases.is_none());
    }

    #[test]
    fn test_payload_from_record() {
        let record: HealthRecord = serde_json::from_value(serde_json::json!({
            "id": "h-1",
            "date": "2024-02-14T00:00:00+00:00",
            "remarks": "Stable",
            "diseases": [
                {"id": "cd-1", "disease_id": "d-1", "severity": "severe"},
                {"id": "cd-2", "disease_id": "d-2", "severity": "unheard-of"}
            ]
        }))
        .unwrap();

        let payload = HealthRecordPayload::from_record(&record);
        assert_eq!(payload.date, NaiveDate::from_ymd_opt(2024, 2, 14));
        assert_eq!(payload.remarks.as_deref(), Some("Stable"));
        let selected = payload.selected_diseases.unwrap();
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].severity, Some(Severity::Severe));
        assert_eq!(selected[1].severity, None);
    }

    #[test]
    fn test_date_required() {
        let mut payload = HealthRecordPayload::new(NaiveDate::from_ymd_opt(2024, 2, 14).unwrap());
        assert!(payload.validate().is_ok());
        payload.date = None;
        assert!(payload.validate().is_err());
    }
}
