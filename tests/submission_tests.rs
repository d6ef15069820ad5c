mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::Value;

use common::{SubmissionForm, TestApp, request};
use quotation_server::intake::MAX_PLAN_FILE_BYTES;

async fn fetch_record(app: &TestApp, token: &str, id: i64) -> Value {
    let (status, body) = app
        .send(request(
            "GET",
            &format!("/api/admin/quotations/{id}"),
            Some(token),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    body["data"].clone()
}

async fn total_records(app: &TestApp, token: &str) -> i64 {
    let (status, body) = app
        .send(request("GET", "/api/admin/quotations", Some(token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    body["pagination"]["total"].as_i64().unwrap()
}

#[tokio::test]
async fn valid_submission_is_stored_as_pending() {
    let app = TestApp::new().await;

    let (status, body) = app.send(SubmissionForm::valid().build()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["message"],
        "Quotation submitted successfully! We will contact you within 24 hours."
    );
    let id = body["quotationId"].as_i64().expect("quotation id");

    let token = app.login().await;
    let record = fetch_record(&app, &token, id).await;
    assert_eq!(record["status"], "pending");
    assert_eq!(record["plan_file"], Value::Null);
    assert_eq!(record["notes"], Value::Null);
    assert_eq!(record["project_type"], "renovation");
    assert_eq!(record["budget"], 500000.0);
    assert_eq!(record["has_plans"], false);
    assert_eq!(record["consultation"], true);
    assert_eq!(record["full_name"], "A B");
    assert_eq!(record["email"], "a@b.com");
    assert_eq!(record["city"], "Pune");
}

#[tokio::test]
async fn missing_fields_are_all_reported_and_nothing_is_stored() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(SubmissionForm::new().text("city", "Pune").build())
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let errors: Vec<&str> = body["errors"]
        .as_array()
        .expect("errors list")
        .iter()
        .map(|e| e.as_str().unwrap())
        .collect();
    for expected in [
        "Project type is required",
        "Valid budget is required",
        "Full name is required",
        "Valid email is required",
        "Phone number is required",
    ] {
        assert!(errors.contains(&expected), "missing {expected:?} in {errors:?}");
    }
    assert!(!errors.contains(&"City is required"));

    let token = app.login().await;
    assert_eq!(total_records(&app, &token).await, 0);
}

#[tokio::test]
async fn form_level_rules_are_enforced_server_side() {
    let app = TestApp::new().await;

    let cases = [
        (
            SubmissionForm::valid().text("fullName", "Al"),
            "Full name must be at least 3 characters",
        ),
        (
            SubmissionForm::valid().text("email", "not-an-email"),
            "Valid email is required",
        ),
        (
            SubmissionForm::valid().text("phone", "12345"),
            "Valid phone number is required",
        ),
        (
            SubmissionForm::valid().text("budget", "-5"),
            "Valid budget is required",
        ),
        (
            SubmissionForm::valid().text(
                "startDate",
                &(Utc::now().date_naive() - Duration::days(1))
                    .format("%Y-%m-%d")
                    .to_string(),
            ),
            "Start date cannot be in the past",
        ),
        (
            SubmissionForm::valid().text("startDate", "soon"),
            "Start date must be a valid date",
        ),
    ];

    for (form, expected) in cases {
        let (status, body) = app.send(form.build()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "case {expected:?}");
        let errors = body["errors"].as_array().expect("errors list");
        assert!(
            errors.iter().any(|e| e == expected),
            "missing {expected:?} in {errors:?}"
        );
    }

    // A later duplicated field overrides the earlier one, so the valid
    // base never leaks through; nothing was stored along the way.
    let token = app.login().await;
    assert_eq!(total_records(&app, &token).await, 0);
}

#[tokio::test]
async fn plan_file_is_stored_on_disk_and_linked() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            SubmissionForm::valid()
                .text("hasPlans", "yes")
                .file("planFile", "site-plan.pdf", b"%PDF-1.4 test")
                .build(),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["quotationId"].as_i64().unwrap();

    let token = app.login().await;
    let record = fetch_record(&app, &token, id).await;
    assert_eq!(record["has_plans"], true);
    let name = record["plan_file"].as_str().expect("plan file name");
    assert!(name.starts_with("plan_"));
    assert!(name.ends_with(".pdf"));

    let stored = std::fs::read(app.upload_dir.join(name)).expect("stored file");
    assert_eq!(stored, b"%PDF-1.4 test");
}

#[tokio::test]
async fn bad_plan_files_reject_the_whole_submission() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            SubmissionForm::valid()
                .text("hasPlans", "yes")
                .file("planFile", "malware.exe", b"MZ")
                .build(),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid file type. Only PDF, JPG, PNG allowed");

    let oversized = vec![0u8; MAX_PLAN_FILE_BYTES + 1];
    let (status, body) = app
        .send(
            SubmissionForm::valid()
                .text("hasPlans", "yes")
                .file("planFile", "big.pdf", &oversized)
                .build(),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "File size exceeds 10MB limit");

    let token = app.login().await;
    assert_eq!(total_records(&app, &token).await, 0);
    // Nothing was written to the upload directory either
    assert_eq!(std::fs::read_dir(&app.upload_dir).unwrap().count(), 0);
}

#[tokio::test]
async fn plan_file_is_ignored_without_has_plans() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            SubmissionForm::valid()
                .file("planFile", "site-plan.pdf", b"%PDF-1.4")
                .build(),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let token = app.login().await;
    let record = fetch_record(&app, &token, body["quotationId"].as_i64().unwrap()).await;
    assert_eq!(record["has_plans"], false);
    assert_eq!(record["plan_file"], Value::Null);
    assert_eq!(std::fs::read_dir(&app.upload_dir).unwrap().count(), 0);
}

#[tokio::test]
async fn submitted_text_is_sanitized_before_storage() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            SubmissionForm::valid()
                .text("projectType", "  <script>x</script>renovation ")
                .text("fullName", "<b>Jane</b> Doe")
                .build(),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let record = app
        .state
        .quotations
        .get(body["quotationId"].as_i64().unwrap())
        .await
        .unwrap();
    assert_eq!(record.project_type, "xrenovation");
    assert_eq!(record.full_name, "Jane Doe");
}

#[tokio::test]
async fn wrong_method_on_the_submission_route_is_a_json_405() {
    let app = TestApp::new().await;

    let (status, body) = app.send(request("GET", "/api/quotations", None)).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid request method");
}
