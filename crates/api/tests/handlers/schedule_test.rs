use axum::http::{header, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use slotbook_core::models::schedule::{SaveScheduleResponse, Schedule, ScheduleSummary};

use crate::test_utils::TestContext;

fn demo_document() -> Value {
    json!({
        "scheduleName": "Demo",
        "timeZone": "UTC",
        "scheduleDetails": [{
            "startDate": "2024-01-01",
            "endDate": "2024-01-01",
            "startTime": "09:00",
            "endTime": "10:00"
        }]
    })
}

#[tokio::test]
async fn test_save_then_get_assigns_slot_id() {
    let ctx = TestContext::new().await;

    let response = ctx.server.post("/api/schedules").json(&demo_document()).await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<SaveScheduleResponse>(),
        SaveScheduleResponse {
            id: "demo".to_string(),
            message: "Schedule saved successfully".to_string(),
            name: "Demo".to_string(),
        }
    );

    let response = ctx.server.get("/api/schedules/demo").await;
    response.assert_status_ok();
    let mut stored: Value = response.json();

    let slot_id = stored["scheduleDetails"][0]["id"]
        .as_str()
        .expect("slot should carry an id")
        .to_string();
    assert!(!slot_id.is_empty());

    stored["scheduleDetails"][0]
        .as_object_mut()
        .unwrap()
        .remove("id");
    assert_eq!(stored, demo_document());
}

#[tokio::test]
async fn test_save_requires_schedule_name() {
    let ctx = TestContext::new().await;

    for body in [
        json!({"timeZone": "UTC", "scheduleDetails": []}),
        json!({"scheduleName": "", "timeZone": "UTC"}),
    ] {
        let response = ctx.server.post("/api/schedules").json(&body).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let error: Value = response.json();
        assert!(error["error"].as_str().unwrap().contains("scheduleName"));
    }
    assert!(ctx.store.dir().read_dir().unwrap().next().is_none());
}

#[tokio::test]
async fn test_save_malformed_body_is_bad_request() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/schedules")
        .content_type("application/json")
        .bytes("{\"scheduleName\": ".into())
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = ctx
        .server
        .post("/api/schedules")
        .json(&json!({
            "scheduleName": "Bad Slot",
            "timeZone": "UTC",
            "scheduleDetails": [{"startDate": "yesterday", "endDate": "2024-01-01", "startTime": "09:00", "endTime": "10:00"}]
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_save_rejects_times_that_would_not_read_back() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/schedules")
        .json(&json!({
            "scheduleName": "Seconds",
            "timeZone": "UTC",
            "scheduleDetails": [{"startDate": "2024-01-01", "endDate": "2024-01-01", "startTime": "09:00:30", "endTime": "9:05"}]
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    ctx.server
        .get("/api/schedules/seconds")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_save_fills_default_time_zone() {
    let ctx = TestContext::new().await;

    ctx.server
        .post("/api/schedules")
        .json(&json!({"scheduleName": "No Zone"}))
        .await
        .assert_status_ok();

    let stored: Schedule = ctx.server.get("/api/schedules/no_zone").await.json();
    assert_eq!(stored.time_zone.as_deref(), Some("UTC"));
    assert!(stored.schedule_details.is_empty());
}

#[tokio::test]
async fn test_save_overwrites_colliding_id() {
    let ctx = TestContext::new().await;
    ctx.server
        .post("/api/schedules")
        .json(&demo_document())
        .await
        .assert_status_ok();

    let replacement = json!({
        "scheduleName": "DEMO!",
        "timeZone": "Asia/Tokyo",
        "scheduleDetails": []
    });
    let response = ctx.server.post("/api/schedules").json(&replacement).await;
    response.assert_status_ok();
    assert_eq!(response.json::<SaveScheduleResponse>().id, "demo");

    let stored: Schedule = ctx.server.get("/api/schedules/demo").await.json();
    assert_eq!(stored.schedule_name, "DEMO!");
    assert_eq!(stored.time_zone.as_deref(), Some("Asia/Tokyo"));
    assert!(stored.schedule_details.is_empty());
}

#[tokio::test]
async fn test_save_without_overwrite_conflicts() {
    let ctx = TestContext::new().await;
    ctx.server
        .post("/api/schedules")
        .json(&demo_document())
        .await
        .assert_status_ok();

    let response = ctx
        .server
        .post("/api/schedules")
        .add_query_param("overwrite", "false")
        .json(&demo_document())
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_list_schedules() {
    let ctx = TestContext::new().await;
    assert_eq!(
        ctx.server.get("/api/schedules").await.json::<Vec<ScheduleSummary>>(),
        vec![]
    );

    ctx.server
        .post("/api/schedules")
        .json(&demo_document())
        .await
        .assert_status_ok();
    ctx.server
        .post("/api/schedules")
        .json(&json!({"scheduleName": "Team Sync!! 2024", "timeZone": "Europe/Paris"}))
        .await
        .assert_status_ok();

    let response = ctx.server.get("/api/schedules").await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!([
            {"id": "demo", "name": "Demo", "timeZone": "UTC", "eventCount": 1},
            {"id": "team_sync_2024", "name": "Team Sync!! 2024", "timeZone": "Europe/Paris", "eventCount": 0}
        ])
    );
}

#[tokio::test]
async fn test_list_skips_corrupt_file() {
    let ctx = TestContext::new().await;
    ctx.write_raw("broken.json", "not json at all");
    ctx.server
        .post("/api/schedules")
        .json(&demo_document())
        .await
        .assert_status_ok();

    let summaries: Vec<ScheduleSummary> = ctx.server.get("/api/schedules").await.json();

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].id, "demo");
}

#[tokio::test]
async fn test_get_missing_schedule_is_not_found() {
    let ctx = TestContext::new().await;

    let response = ctx.server.get("/api/schedules/nope").await;

    response.assert_status_not_found();
    assert_eq!(
        response.json::<Value>(),
        json!({"error": "Schedule with ID nope not found"})
    );
}

#[tokio::test]
async fn test_get_traversal_id_is_not_found() {
    let ctx = TestContext::new().await;

    ctx.server
        .get("/api/schedules/..%2Fsecret")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_delete_schedule() {
    let ctx = TestContext::new().await;
    ctx.server
        .post("/api/schedules")
        .json(&demo_document())
        .await
        .assert_status_ok();

    let response = ctx.server.delete("/api/schedules/demo").await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({"message": "Schedule deleted successfully"})
    );
    ctx.server.get("/api/schedules/demo").await.assert_status_not_found();
    ctx.server.delete("/api/schedules/demo").await.assert_status_not_found();
}

#[tokio::test]
async fn test_schedule_named_import_is_addressable() {
    let ctx = TestContext::new().await;

    for name in ["Import", "IMPORT!"] {
        let response = ctx
            .server
            .post("/api/schedules")
            .json(&json!({"scheduleName": name, "timeZone": "UTC"}))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<SaveScheduleResponse>().id, "import");

        let stored: Schedule = ctx.server.get("/api/schedules/import").await.json();
        assert_eq!(stored.schedule_name, name);
        ctx.server
            .get("/api/schedules/import/export")
            .await
            .assert_status_ok();

        ctx.server
            .delete("/api/schedules/import")
            .await
            .assert_status_ok();
        ctx.server
            .get("/api/schedules/import")
            .await
            .assert_status_not_found();
    }
}

#[tokio::test]
async fn test_import_schedule() {
    let ctx = TestContext::new().await;
    let exported = r#"{
        "scheduleName": "Office Hours",
        "timeZone": "America/Chicago",
        "scheduleDetails": [
            {"title": "Drop-in", "startDate": "2024-03-04", "endDate": "2024-03-04", "startTime": "13:00", "endTime": "15:00"}
        ]
    }"#;

    let response = ctx
        .server
        .post("/api/import")
        .text(exported)
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<SaveScheduleResponse>().id, "office_hours");
    let stored: Schedule = ctx.server.get("/api/schedules/office_hours").await.json();
    assert_eq!(stored.schedule_details[0].title.as_deref(), Some("Drop-in"));
    assert!(stored.schedule_details[0].has_id());
}

#[tokio::test]
async fn test_import_requires_time_zone() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/import")
        .text(r#"{"scheduleName": "Zoneless"}"#)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({"error": "Invalid schedule format: missing required fields"})
    );
}

#[tokio::test]
async fn test_export_schedule() {
    let ctx = TestContext::new().await;
    ctx.server
        .post("/api/schedules")
        .json(&json!({"scheduleName": "Weekly Team Meeting", "timeZone": "America/New_York"}))
        .await
        .assert_status_ok();

    let response = ctx.server.get("/api/schedules/weekly_team_meeting/export").await;

    response.assert_status_ok();
    assert_eq!(
        response.header(header::CONTENT_DISPOSITION),
        "attachment; filename=\"Weekly_Team_Meeting.json\""
    );
    assert_eq!(response.header(header::CONTENT_TYPE), "application/json");
    let document: Value = response.json();
    assert_eq!(document["scheduleName"], "Weekly Team Meeting");
}

#[tokio::test]
async fn test_duplicate_slot_across_dates() {
    let ctx = TestContext::new().await;
    ctx.server
        .post("/api/schedules")
        .json(&demo_document())
        .await
        .assert_status_ok();
    let stored: Schedule = ctx.server.get("/api/schedules/demo").await.json();
    let slot_id = stored.schedule_details[0].id.clone();

    let response = ctx
        .server
        .post(&format!("/api/schedules/demo/slots/{}/duplicate", slot_id))
        .json(&json!({"dates": ["2024-01-01", "2024-01-02", "2024-01-03"]}))
        .await;

    response.assert_status_ok();
    let updated: Schedule = response.json();
    assert_eq!(updated.id.as_deref(), Some("demo"));
    let dates: Vec<String> = updated
        .schedule_details
        .iter()
        .map(|s| s.start_date.to_string())
        .collect();
    assert_eq!(dates, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
    assert_eq!(updated.schedule_details[0].id, slot_id);

    let reloaded: Schedule = ctx.server.get("/api/schedules/demo").await.json();
    assert_eq!(reloaded.schedule_details.len(), 3);
}

#[tokio::test]
async fn test_duplicate_unknown_slot_is_not_found() {
    let ctx = TestContext::new().await;
    ctx.server
        .post("/api/schedules")
        .json(&demo_document())
        .await
        .assert_status_ok();

    ctx.server
        .post("/api/schedules/demo/slots/missing/duplicate")
        .json(&json!({"dates": ["2024-01-02"]}))
        .await
        .assert_status_not_found();
}
