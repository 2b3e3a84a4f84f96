//! Resource clients against a mock API
//!
//! Run with: cargo test --test resource_tests -- --nocapture

mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use mockito::{Matcher, Server};
use tempfile::TempDir;

use orphancare_core::adapters::memory_store::MemoryCredentialStore;
use orphancare_core::domain::{
    bmi, ChildPayload, Gender, HealthRecordPayload, NutritionPayload, NutritionStatus,
    ParentStatus, Severity, VaccinationStatus,
};
use orphancare_core::{Error, StatsSource};

use common::*;

const METHODS: [&str; 4] = ["GET", "POST", "PUT", "DELETE"];

fn amani() -> ChildPayload {
    ChildPayload {
        full_name: "Amani K.".to_string(),
        gender: Gender::Female,
        birth_date: NaiveDate::from_ymd_opt(2015, 6, 1),
        estimated_age: Some(9),
        entry_date: NaiveDate::from_ymd_opt(2023, 1, 10),
        parent_status: Some(ParentStatus::TotalOrphan),
        internal_code: None,
    }
}

// ============================================================================
// Authentication gate
// ============================================================================

#[tokio::test]
async fn test_calls_without_token_fail_fast() {
    let mut server = Server::new_async().await;
    let mut untouched = Vec::new();
    for method in METHODS {
        untouched.push(
            server
                .mock(method, Matcher::Any)
                .expect(0)
                .create_async()
                .await,
        );
    }

    let dir = TempDir::new().unwrap();
    let ctx = context(
        config_for(&server.url()),
        dir.path(),
        Arc::new(MemoryCredentialStore::new()),
    );

    assert!(matches!(ctx.children.list().await, Err(Error::NoSession)));
    assert!(matches!(ctx.children.get("c-1").await, Err(Error::NoSession)));
    assert!(matches!(ctx.children.create(&amani()).await, Err(Error::NoSession)));
    assert!(matches!(ctx.children.delete("c-1").await, Err(Error::NoSession)));
    assert!(matches!(ctx.health.list_by_child("c-1").await, Err(Error::NoSession)));
    assert!(matches!(ctx.health.list_diseases().await, Err(Error::NoSession)));
    assert!(matches!(ctx.nutrition.get("n-1").await, Err(Error::NoSession)));
    assert!(matches!(ctx.stats.get_orphanage_stats().await, Err(Error::NoSession)));

    for mock in untouched {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_401_maps_to_session_expired_everywhere() {
    let mut server = Server::new_async().await;
    let mut mocks = Vec::new();
    for method in METHODS {
        mocks.push(
            server
                .mock(method, Matcher::Any)
                .with_status(401)
                .with_body(r#"{"message":"JWT expired"}"#)
                .create_async()
                .await,
        );
    }

    let dir = TempDir::new().unwrap();
    let ctx = context(config_for(&server.url()), dir.path(), signed_in_store().await);

    let nutrition = NutritionPayload::on_day(
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        25.5,
        120.5,
        NutritionStatus::Normal,
    );
    let health = HealthRecordPayload::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

    assert!(matches!(ctx.children.list().await, Err(Error::SessionExpired)));
    assert!(matches!(ctx.children.update("c-1", &amani()).await, Err(Error::SessionExpired)));
    assert!(matches!(ctx.children.delete("c-1").await, Err(Error::SessionExpired)));
    assert!(matches!(ctx.health.get("h-1").await, Err(Error::SessionExpired)));
    assert!(matches!(ctx.health.create("c-1", &health).await, Err(Error::SessionExpired)));
    assert!(matches!(ctx.nutrition.list_by_child("c-1").await, Err(Error::SessionExpired)));
    assert!(matches!(ctx.nutrition.create("c-1", &nutrition).await, Err(Error::SessionExpired)));
    assert!(matches!(ctx.stats.get_orphanage_stats().await, Err(Error::SessionExpired)));

    let err = ctx.children.get("c-1").await.unwrap_err();
    assert!(err.requires_reauth());
}

// ============================================================================
// Error mapping
// ============================================================================

#[tokio::test]
async fn test_non_2xx_maps_to_request_failed() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/child/missing")
        .with_status(404)
        .with_body(r#"{"error":"Enfant introuvable"}"#)
        .create_async()
        .await;
    let _mock = server
        .mock("GET", "/children")
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let ctx = context(config_for(&server.url()), dir.path(), signed_in_store().await);

    match ctx.children.get("missing").await {
        Err(Error::RequestFailed { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Enfant introuvable");
        }
        other => panic!("expected RequestFailed, got {:?}", other),
    }
    match ctx.children.list().await {
        Err(Error::RequestFailed { status, message }) => {
            assert_eq!(status, 500);
            assert!(message.contains("500"));
        }
        other => panic!("expected RequestFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_requests_are_logged_without_ids() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/child/c-secret-id")
        .with_status(500)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let (ctx, logger) = logged_context(config_for(&server.url()), dir.path(), signed_in_store().await);
    let _ = ctx.children.get("c-secret-id").await;

    let entries = logger.get_by_event("request_failed", 10).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].resource.as_deref(), Some("child"));
    assert_eq!(entries[0].error_details.as_deref(), Some("status=500"));
    assert!(!serde_json::to_string(&entries).unwrap().contains("c-secret-id"));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let dir = TempDir::new().unwrap();
    let ctx = context(config_for(&dead_url()), dir.path(), signed_in_store().await);
    assert!(matches!(ctx.children.list().await, Err(Error::Network(_))));
}

#[tokio::test]
async fn test_malformed_success_body_is_request_failed() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/children")
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let ctx = context(config_for(&server.url()), dir.path(), signed_in_store().await);
    assert!(matches!(
        ctx.children.list().await,
        Err(Error::RequestFailed { status: 200, .. })
    ));
}

// ============================================================================
// Children
// ============================================================================

#[tokio::test]
async fn test_child_create_then_get_round_trip() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/children-create")
        .match_header("authorization", bearer().as_str())
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(serde_json::json!({
            "full_name": "Amani K.",
            "gender": "F",
            "birth_date": "2015-06-01",
            "estimated_age": 9,
            "entry_date": "2023-01-10",
            "parent_status": "total_orphan"
        })))
        .with_status(201)
        .with_body(r#"{"success":true,"message":"Enfant créé","data":{"id":"c-42"}}"#)
        .create_async()
        .await;
    let _mock = server
        .mock("GET", "/child/c-42")
        .with_status(200)
        .with_body(
            serde_json::json!({
                "id": "c-42",
                "orphanage_id": "o-1",
                "full_name": "Amani K.",
                "gender": "F",
                "birth_date": "2015-06-01",
                "estimated_age": 9,
                "entry_date": "2023-01-10",
                "parent_status": "total_orphan",
                "photo_url": null,
                "nutrition_records": [],
                "health_records": [],
                "child_diseases": [],
                "orphanages": {"name": "Maison Lumière"}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let ctx = context(config_for(&server.url()), dir.path(), signed_in_store().await);

    let created = ctx.children.create(&amani()).await.unwrap();
    create.assert_async().await;
    let id = created.record_id().unwrap();

    let child = ctx.children.get(&id).await.unwrap();
    assert_eq!(child.summary.full_name, "Amani K.");
    assert_eq!(child.summary.gender, Gender::Female);
    assert_eq!(child.summary.birth_date.as_deref(), Some("2015-06-01"));
    assert_eq!(child.summary.estimated_age, Some(9));
    assert_eq!(child.summary.entry_date.as_deref(), Some("2023-01-10"));
    assert_eq!(child.summary.parent_status, Some(ParentStatus::TotalOrphan));
    assert_eq!(ChildPayload::from_summary(&child.summary), amani());
    assert!(child.extra.contains_key("orphanages"));
}

#[tokio::test]
async fn test_children_list_unwraps_envelope() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/children")
        .with_status(200)
        .with_body(
            serde_json::json!({
                "success": true,
                "data": {
                    "children": [
                        {"id": "c-1", "full_name": "Amani K.", "gender": "F"},
                        {"id": "c-2", "full_name": "Joseph M.", "gender": "M",
                         "parent_status": "abandoned"}
                    ],
                    "metrics": {"total_count": 2, "current_page": 1, "total_pages": 1,
                                "has_next_page": false, "has_prev_page": false, "page_size": 20},
                    "filters": {"search": null}
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let ctx = context(config_for(&server.url()), dir.path(), signed_in_store().await);

    let list = ctx.children.list().await.unwrap();
    assert_eq!(list.children.len(), 2);
    assert_eq!(list.metrics.total_count, 2);
    assert_eq!(list.children[1].parent_status, Some(ParentStatus::Abandoned));
}

#[tokio::test]
async fn test_children_list_error_names_malformed_field() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/children")
        .with_status(200)
        .with_body(r#"{"success":true,"data":{"children":[{"id":"c-1","gender":"F"}]}}"#)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let ctx = context(config_for(&server.url()), dir.path(), signed_in_store().await);

    match ctx.children.list().await {
        Err(Error::RequestFailed { status: 200, message }) => {
            assert!(message.contains("missing field `full_name`"), "{}", message);
        }
        other => panic!("expected RequestFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_record_ids_stay_in_one_path_segment() {
    let mut server = Server::new_async().await;
    let encoded = server
        .mock("GET", "/child/c%2F1%3Fpage=2")
        .with_status(200)
        .with_body(r#"{"id":"c/1?page=2","full_name":"Amani K.","gender":"F"}"#)
        .create_async()
        .await;
    let deleted = server
        .mock("DELETE", "/delete-nutrition-record/n%231")
        .with_status(200)
        .with_body(r#"{"success":true}"#)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let ctx = context(config_for(&server.url()), dir.path(), signed_in_store().await);

    let child = ctx.children.get("c/1?page=2").await.unwrap();
    assert_eq!(child.summary.id, "c/1?page=2");
    ctx.nutrition.delete("n#1").await.unwrap();

    encoded.assert_async().await;
    deleted.assert_async().await;
}

#[tokio::test]
async fn test_dot_segment_ids_are_rejected_before_sending() {
    let mut server = Server::new_async().await;
    let any = server
        .mock("DELETE", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let ctx = context(config_for(&server.url()), dir.path(), signed_in_store().await);

    for id in ["", ".", ".."] {
        assert!(
            matches!(ctx.children.delete(id).await, Err(Error::Validation(_))),
            "accepted {:?}",
            id
        );
    }
    any.assert_async().await;
}

#[tokio::test]
async fn test_invalid_child_is_rejected_before_sending() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/children-create")
        .expect(0)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let ctx = context(config_for(&server.url()), dir.path(), signed_in_store().await);

    let mut payload = amani();
    payload.full_name = "   ".to_string();
    assert!(matches!(ctx.children.create(&payload).await, Err(Error::Validation(_))));
    create.assert_async().await;
}

#[tokio::test]
async fn test_delete_sends_no_content_type() {
    let mut server = Server::new_async().await;
    let delete = server
        .mock("DELETE", "/delete-child/c-1")
        .match_header("authorization", bearer().as_str())
        .match_header("content-type", Matcher::Missing)
        .with_status(200)
        .with_body(r#"{"success":true,"message":"Enfant supprimé"}"#)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let ctx = context(config_for(&server.url()), dir.path(), signed_in_store().await);

    let result = ctx.children.delete("c-1").await.unwrap();
    assert_eq!(result.message.as_deref(), Some("Enfant supprimé"));
    delete.assert_async().await;
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_create_payload_shape() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/create-health-record/c-1")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "date": "2024-02-14",
            "vaccination_status_structured": {
                "status": "partially_vaccinated",
                "vaccines": [],
                "last_updated": "2024-02-14"
            },
            "selectedDiseases": [
                {"disease_id": "d-1", "severity": "moderate", "notes": null}
            ]
        })))
        .with_status(201)
        .with_body(r#"{"success":true,"data":{"health_record":{"id":"h-9"}}}"#)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let ctx = context(config_for(&server.url()), dir.path(), signed_in_store().await);

    let mut payload = HealthRecordPayload::new(NaiveDate::from_ymd_opt(2024, 2, 14).unwrap())
        .with_vaccination(VaccinationStatus::PartiallyVaccinated);
    payload.select_disease("d-1", Some(Severity::Moderate));

    let result = ctx.health.create("c-1", &payload).await.unwrap();
    assert_eq!(result.record_id().as_deref(), Some("h-9"));
    create.assert_async().await;
}

#[tokio::test]
async fn test_health_without_date_is_rejected() {
    let server = Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let ctx = context(config_for(&server.url()), dir.path(), signed_in_store().await);

    let mut payload = HealthRecordPayload::new(NaiveDate::from_ymd_opt(2024, 2, 14).unwrap());
    payload.date = None;
    assert!(matches!(ctx.health.update("h-1", &payload).await, Err(Error::Validation(_))));
}

#[tokio::test]
async fn test_disease_catalogue() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/diseases")
        .with_status(200)
        .with_body(
            r#"{"data":{"diseases":[
                {"id":"d-1","name":"Paludisme","description":"Malaria"},
                {"id":"d-2","name":"Dermatite"}
            ]}}"#,
        )
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let ctx = context(config_for(&server.url()), dir.path(), signed_in_store().await);

    let diseases = ctx.health.list_diseases().await.unwrap();
    assert_eq!(diseases.len(), 2);
    assert_eq!(diseases[1].name, "Dermatite");
    assert!(diseases[1].description.is_none());
}

#[tokio::test]
async fn test_health_records_list() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/get-health-records/c-1")
        .with_status(200)
        .with_body(
            serde_json::json!({
                "success": true,
                "data": {
                    "health_records": [{
                        "id": "h-1", "child_id": "c-1", "date": "2024-02-14",
                        "vaccination_status": "vaccinated",
                        "diseases": [{"id": "rd-1", "disease_id": "d-2",
                                      "severity": "mild", "disease_name": "Dermatite"}]
                    }],
                    "child": {"id": "c-1", "full_name": "Amani K."}
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let ctx = context(config_for(&server.url()), dir.path(), signed_in_store().await);

    let list = ctx.health.list_by_child("c-1").await.unwrap();
    assert_eq!(list.health_records.len(), 1);
    assert_eq!(list.health_records[0].diseases[0].disease_name.as_deref(), Some("Dermatite"));
}

// ============================================================================
// Nutrition
// ============================================================================

#[tokio::test]
async fn test_nutrition_create_and_detail_bmi() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/create-nutrition-record/c-1")
        .match_body(Matcher::Json(serde_json::json!({
            "date": "2024-03-01T00:00:00.000Z",
            "weight_kg": 25.5,
            "height_cm": 120.5,
            "nutrition_status": "normal"
        })))
        .with_status(201)
        .with_body(r#"{"success":true,"data":{"id":"n-7"}}"#)
        .create_async()
        .await;
    let expected_bmi = 25.5 / (1.205 * 1.205);
    let _mock = server
        .mock("GET", "/nutrition-record/n-7")
        .with_status(200)
        .with_body(
            serde_json::json!({
                "success": true,
                "data": {
                    "id": "n-7", "child_id": "c-1",
                    "date": "2024-03-01T00:00:00+00:00",
                    "weight_kg": 25.5, "height_cm": 120.5,
                    "bmi": expected_bmi,
                    "bmi_interpretation": "Normal",
                    "nutrition_status": "normal"
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let ctx = context(config_for(&server.url()), dir.path(), signed_in_store().await);

    let payload = NutritionPayload::on_day(
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        25.5,
        120.5,
        NutritionStatus::Normal,
    );
    let id = ctx
        .nutrition
        .create("c-1", &payload)
        .await
        .unwrap()
        .record_id()
        .unwrap();
    create.assert_async().await;

    let record = ctx.nutrition.get(&id).await.unwrap();
    let server_bmi = record.bmi.unwrap();
    assert!((server_bmi - bmi(record.weight_kg, record.height_cm)).abs() < 1e-9);
    assert!((server_bmi - 17.56).abs() < 0.01);
}

#[tokio::test]
async fn test_nutrition_list_reads_records() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/nutrition-records/c-1")
        .with_status(200)
        .with_body(
            r#"{"success":true,"data":{"records":[
                {"id":"n-1","date":"2024-01-01T00:00:00.000Z","weight_kg":20,"height_cm":110}
            ]}}"#,
        )
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let ctx = context(config_for(&server.url()), dir.path(), signed_in_store().await);

    let list = ctx.nutrition.list_by_child("c-1").await.unwrap();
    assert_eq!(list.records.len(), 1);
    assert!((list.records[0].bmi_or_computed() - bmi(20.0, 110.0)).abs() < 1e-9);
}

#[tokio::test]
async fn test_nutrition_rejects_non_positive_measurements() {
    let server = Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let ctx = context(config_for(&server.url()), dir.path(), signed_in_store().await);

    let payload = NutritionPayload::on_day(
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        0.0,
        120.5,
        NutritionStatus::Normal,
    );
    assert!(matches!(
        ctx.nutrition.update("n-1", &payload).await,
        Err(Error::Validation(_))
    ));
}

// ============================================================================
// Stats
// ============================================================================

#[tokio::test]
async fn test_stats_network_failure_falls_back_to_demo() {
    let dir = TempDir::new().unwrap();
    let (ctx, logger) = logged_context(config_for(&dead_url()), dir.path(), signed_in_store().await);

    let dashboard = ctx.stats.get_orphanage_stats_or_demo().await.unwrap();
    assert_eq!(dashboard.source, StatsSource::Demo);
    assert!(dashboard.is_demo());
    assert!(dashboard.fallback_reason.is_some());

    let stats = &dashboard.stats;
    assert_eq!(stats.orphanage.name, "Maison Lumière");
    let expected = stats.children.total as f64 / stats.orphanage.child_capacity as f64;
    assert!((stats.capacity.utilization_rate - expected).abs() < 1e-9);
    assert!((stats.capacity.utilization_rate - 0.01818).abs() < 1e-4);

    assert_eq!(logger.get_by_event("stats_fallback", 10).unwrap().len(), 1);
}

#[tokio::test]
async fn test_stats_server_error_falls_back_to_demo() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/orphanage-stats")
        .with_status(500)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let ctx = context(config_for(&server.url()), dir.path(), signed_in_store().await);

    let dashboard = ctx.stats.get_orphanage_stats_or_demo().await.unwrap();
    assert!(dashboard.is_demo());
}

#[tokio::test]
async fn test_stats_fallback_can_be_disabled() {
    let dir = TempDir::new().unwrap();
    let mut config = config_for(&dead_url());
    config.demo_fallback = false;
    let ctx = context(config, dir.path(), signed_in_store().await);

    assert!(matches!(
        ctx.stats.get_orphanage_stats_or_demo().await,
        Err(Error::Network(_))
    ));
}

#[tokio::test]
async fn test_stats_live() {
    let mut server = Server::new_async().await;
    let live = serde_json::to_value(orphancare_core::adapters::demo::demo_orphanage_stats())
        .map(|mut v| {
            v["orphanage"]["name"] = "Centre Espoir".into();
            v
        })
        .unwrap();
    let _mock = server
        .mock("GET", "/orphanage-stats")
        .match_header("authorization", bearer().as_str())
        .with_status(200)
        .with_body(live.to_string())
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let ctx = context(config_for(&server.url()), dir.path(), signed_in_store().await);

    let dashboard = ctx.stats.get_orphanage_stats_or_demo().await.unwrap();
    assert_eq!(dashboard.source, StatsSource::Live);
    assert!(dashboard.fallback_reason.is_none());
    assert_eq!(dashboard.stats.orphanage.name, "Centre Espoir");
}
