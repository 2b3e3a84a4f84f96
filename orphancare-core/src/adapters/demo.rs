//! Demo statistics provider
//!
//! Fixed dataset for the "Maison Lumière" centre, shown on the dashboard
//! when the live statistics call fails. Pure and deterministic.

use serde_json::Map;

use crate::domain::stats::{
    AgeGroups, CapacityInfo, ChildrenStats, DiseaseCount, GenderBreakdown, HealthStats,
    LegalDocument, NutritionStats, OrphanageDocuments, OrphanageInfo, TrendPoint, Trends,
};
use crate::domain::OrphanageStats;

fn some(s: &str) -> Option<String> {
    Some(s.to_string())
}

fn monthly(month: &str, count: i64) -> TrendPoint {
    TrendPoint {
        month: month.to_string(),
        count: Some(count),
        rate: None,
    }
}

fn rate(month: &str, rate: f64) -> TrendPoint {
    TrendPoint {
        month: month.to_string(),
        count: None,
        rate: Some(rate),
    }
}

/// Generate the demo orphanage statistics
pub fn demo_orphanage_stats() -> OrphanageStats {
    let orphanage = OrphanageInfo {
        id: "demo-id".to_string(),
        name: "Maison Lumière".to_string(),
        province: some("Kasaï Oriental"),
        city: some("Mbuji-Mayi"),
        province_id: some("demo-province-id"),
        city_id: some("demo-city-id"),
        address: some("Rue Tshikapa 45, Quartier Diulu"),
        location_gps: None,
        contact_person: some("Jean-Claude Ilunga"),
        phone: some("+243 997 654 321"),
        email: some("lumiere@centre.cd"),
        description: some("Prend en charge les enfants abandonnés ou en détresse sociale."),
        legal_status: some("verified"),
        documents: OrphanageDocuments {
            legal_document: Some(LegalDocument {
                url: "https://example.com/document.jpg".to_string(),
                path: "temp/document.jpg".to_string(),
                file_name: "document.jpg".to_string(),
                file_size: 129_336,
                file_type: "image".to_string(),
                uploaded_at: "2025-07-11T19:33:54.830Z".to_string(),
            }),
        },
        photo_url: None,
        dhis2_orgunit_id: None,
        created_by: None,
        created_at: some("2025-07-11T19:33:55.087995+00:00"),
        updated_at: some("2025-07-11T19:42:49.232643+00:00"),
        child_capacity: 110,
        children_total: 110,
        boys_count: 60,
        girls_count: 50,
        schooling_rate: None,
        annual_disease_rate: None,
        meals_per_day: None,
    };

    let children = ChildrenStats {
        total: 2,
        by_gender: GenderBreakdown { boys: 0, girls: 0 },
        by_age_group: AgeGroups {
            children: 2,
            ..Default::default()
        },
        new_this_month: 0,
    };

    let mut by_status = Map::new();
    by_status.insert("malnourished".to_string(), 1.into());

    // Fraction of capacity in use, derived so it always matches the counts
    let utilization_rate = children.total as f64 / orphanage.child_capacity as f64;

    OrphanageStats {
        capacity: CapacityInfo {
            current: children.total,
            max: orphanage.child_capacity,
            utilization_rate,
        },
        orphanage,
        children,
        nutrition: NutritionStats {
            malnutrition_rate: 100.0,
            by_status,
            average_bmi: 9.5,
        },
        health: HealthStats {
            vaccination_coverage: 0.0,
            common_diseases: vec![
                DiseaseCount {
                    name: "Malnutrition".to_string(),
                    count: 1,
                },
                DiseaseCount {
                    name: "Dermatite".to_string(),
                    count: 1,
                },
            ],
            chronic_conditions: 1,
        },
        trends: Trends {
            monthly_growth: vec![
                monthly("Apr 2025", 0),
                monthly("May 2025", 0),
                monthly("Jun 2025", 0),
                monthly("Jul 2025", 1),
                monthly("Aug 2025", 1),
                monthly("Sep 2025", 0),
            ],
            nutrition_trend: vec![rate("Jul", 100.0), rate("Aug", 0.0), rate("Sep", 0.0)],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_is_deterministic() {
        assert_eq!(demo_orphanage_stats(), demo_orphanage_stats());
    }

    #[test]
    fn test_demo_is_consistent() {
        let stats = demo_orphanage_stats();
        assert_eq!(stats.orphanage.name, "Maison Lumière");
        assert_eq!(stats.capacity.current, stats.children.total);
        assert_eq!(stats.capacity.max, stats.orphanage.child_capacity);

        let expected = stats.children.total as f64 / stats.orphanage.child_capacity as f64;
        assert!((stats.capacity.utilization_rate - expected).abs() < 1e-9);
        assert!((stats.capacity.utilization_rate - 0.01818).abs() < 1e-4);
        assert_eq!(stats.nutrition.malnourished(), 1);
    }

    #[test]
    fn test_demo_wire_shape() {
        let json = serde_json::to_value(demo_orphanage_stats()).unwrap();
        assert_eq!(json["children"]["byAgeGroup"]["6-12"], 2);
        assert_eq!(json["nutrition"]["averageBMI"], 9.5);
        assert_eq!(json["trends"]["monthlyGrowth"][3]["count"], 1);
        assert!(json["trends"]["nutritionTrend"][0].get("count").is_none());
    }
}
