//! API Integration Tests
//!
//! Each test spawns its own server on the in-memory store; no external
//! services are needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_error, assert_json, AuditLogPage, AuditLogResponse, OrganizationResponse,
    RecordRequest, RiskSummary, TestServer,
};
use reqwest::StatusCode;
use serde_json::json;

const ORG_AUDIT_LOGS: &str = "/api/v1/organizations/org-1/audit-logs";

async fn server() -> TestServer {
    TestServer::start(&["org-1:alice:admin", "org-1:bob", "org-2:carol"])
        .await
        .expect("Failed to start server")
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = server().await;

    let response = server.get("/health").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = server.get("/health/ready").await.unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "ready");
}

// ============================================================================
// Writer Tests
// ============================================================================

#[tokio::test]
async fn test_record_low_risk_entry() {
    let server = server().await;
    let token = server.token_for("alice").unwrap();

    let response = server
        .post_auth(ORG_AUDIT_LOGS, &token, &RecordRequest::new("hello", "hi"))
        .await
        .unwrap();
    let entry: AuditLogResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(entry.risk_level, "low");
    assert_eq!(entry.actor_id, "alice");
    assert_eq!(entry.organization_id, "org-1");
    assert_eq!(entry.action, "AI Completion");
    assert!(entry.metadata.is_empty());
    assert!(!entry.id.is_empty());
}

#[tokio::test]
async fn test_classification_scenarios() {
    let server = server().await;
    let token = server.token_for("alice").unwrap();

    let cases = [
        ("My SSN is 123-45-6789", "noted", "high"),
        ("Please process this payment", "Confirmed, $250 charged", "medium"),
        ("What's the weather today?", "It's sunny and 72 degrees.", "low"),
        ("here is my api_key: xyz", "ok", "high"),
        ("card 4111111111111111", "stored", "high"),
        ("PASSWORD reset", "ok", "high"),
    ];

    for (input, output, expected) in cases {
        let response = server
            .post_auth(ORG_AUDIT_LOGS, &token, &RecordRequest::new(input, output))
            .await
            .unwrap();
        let entry: AuditLogResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
        assert_eq!(entry.risk_level, expected, "input: {input}");
    }
}

#[tokio::test]
async fn test_risk_level_in_body_is_ignored() {
    let server = server().await;
    let token = server.token_for("alice").unwrap();
    let body = json!({
        "input_summary": "my secret recipe",
        "output_summary": "ok",
        "risk_level": "low",
        "action": "Recipe Assistant",
        "metadata": {"model": "gpt-4o", "tokens": 42}
    });

    let response = server.post_auth(ORG_AUDIT_LOGS, &token, &body).await.unwrap();
    let entry: AuditLogResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(entry.risk_level, "high");
    assert_eq!(entry.action, "Recipe Assistant");
    assert_eq!(entry.metadata["tokens"], 42);
}

#[tokio::test]
async fn test_unauthenticated_write_is_rejected() {
    let server = server().await;

    let response = server
        .post(ORG_AUDIT_LOGS, &RecordRequest::new("hello", "hi"))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "UNAUTHORIZED");

    // A malformed token counts as no identity
    let response = server
        .post_auth(ORG_AUDIT_LOGS, "not-a-jwt", &RecordRequest::new("hello", "hi"))
        .await
        .unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let token = server.token_for("alice").unwrap();
    let page: AuditLogPage = assert_json(
        server.get_auth(ORG_AUDIT_LOGS, &token).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(page.data.is_empty());
}

#[tokio::test]
async fn test_validation_errors() {
    let server = server().await;
    let token = server.token_for("alice").unwrap();

    let bodies = [
        json!({"input_summary": "", "output_summary": "hi"}),
        json!({"output_summary": "hi"}),
        json!({"input_summary": "hello", "output_summary": "hi", "metadata": [1, 2]}),
    ];
    for body in bodies {
        let response = server.post_auth(ORG_AUDIT_LOGS, &token, &body).await.unwrap();
        let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
        assert_eq!(code, "VALIDATION_ERROR", "body: {body}");
    }
}

#[tokio::test]
async fn test_non_member_write_persists_nothing() {
    let server = server().await;
    let alice = server.token_for("alice").unwrap();
    let carol = server.token_for("carol").unwrap();

    let response = server
        .post_auth(
            "/api/v1/organizations/org-2/audit-logs",
            &alice,
            &RecordRequest::unique(),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::INTERNAL_SERVER_ERROR)
        .await
        .unwrap();
    assert_eq!(code, "PERSISTENCE_ERROR");

    let page: AuditLogPage = assert_json(
        server
            .get_auth("/api/v1/organizations/org-2/audit-logs", &carol)
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(page.data.is_empty());
}

#[tokio::test]
async fn test_implicit_organization_write() {
    let server = server().await;
    let bob = server.token_for("bob").unwrap();
    let stranger = server.token_for("dave").unwrap();

    let response = server
        .post_auth("/api/v1/audit-logs", &bob, &RecordRequest::unique().with_action("Chat"))
        .await
        .unwrap();
    let entry: AuditLogResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(entry.organization_id, "org-1");
    assert_eq!(entry.action, "Chat");

    let response = server
        .post_auth("/api/v1/audit-logs", &stranger, &RecordRequest::unique())
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "NO_ORGANIZATION");
}

// ============================================================================
// Read Tests
// ============================================================================

#[tokio::test]
async fn test_list_filters_and_pagination() {
    let server = server().await;
    let token = server.token_for("alice").unwrap();

    for (input, output) in [
        ("Draft the refund email", "Sure"),
        ("Create invoice for ACME", "Created"),
        ("Store my password", "No"),
        ("Translate to French", "Bonjour"),
    ] {
        let response = server
            .post_auth(ORG_AUDIT_LOGS, &token, &RecordRequest::new(input, output))
            .await
            .unwrap();
        assert_json::<AuditLogResponse>(response, StatusCode::CREATED)
            .await
            .unwrap();
    }

    let page: AuditLogPage = assert_json(
        server
            .get_auth(&format!("{ORG_AUDIT_LOGS}?limit=3"), &token)
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(page.data.len(), 3);
    assert_eq!(page.data[0].input_summary, "Translate to French");
    assert!(page.pagination.has_more);
    assert_eq!(page.pagination.limit, 3);

    let cursor = page.pagination.next_before.unwrap();
    let rest: AuditLogPage = assert_json(
        server
            .get_auth(&format!("{ORG_AUDIT_LOGS}?limit=3&before={cursor}"), &token)
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(rest.data.len(), 1);
    assert_eq!(rest.data[0].input_summary, "Draft the refund email");

    let medium: AuditLogPage = assert_json(
        server
            .get_auth(&format!("{ORG_AUDIT_LOGS}?risk_level=medium"), &token)
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(medium.data.len(), 1);
    assert_eq!(medium.data[0].risk_level, "medium");

    let search: AuditLogPage = assert_json(
        server
            .get_auth(&format!("{ORG_AUDIT_LOGS}?search=REFUND"), &token)
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(search.data.len(), 1);
}

#[tokio::test]
async fn test_reads_require_membership() {
    let server = server().await;
    let alice = server.token_for("alice").unwrap();
    let carol = server.token_for("carol").unwrap();

    let response = server
        .post_auth(ORG_AUDIT_LOGS, &alice, &RecordRequest::unique())
        .await
        .unwrap();
    let entry: AuditLogResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    let entry_path = format!("{ORG_AUDIT_LOGS}/{}", entry.id);

    let fetched: AuditLogResponse = assert_json(
        server.get_auth(&entry_path, &alice).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(fetched.id, entry.id);

    let code = assert_error(
        server.get_auth(&entry_path, &carol).await.unwrap(),
        StatusCode::FORBIDDEN,
    )
    .await
    .unwrap();
    assert_eq!(code, "FORBIDDEN");

    // Another organization's path never exposes the entry
    let code = assert_error(
        server
            .get_auth(
                &format!("/api/v1/organizations/org-2/audit-logs/{}", entry.id),
                &carol,
            )
            .await
            .unwrap(),
        StatusCode::NOT_FOUND,
    )
    .await
    .unwrap();
    assert_eq!(code, "NOT_FOUND");

    let code = assert_error(server.get(ORG_AUDIT_LOGS).await.unwrap(), StatusCode::UNAUTHORIZED)
        .await
        .unwrap();
    assert_eq!(code, "UNAUTHORIZED");
}

#[tokio::test]
async fn test_risk_summary() {
    let server = server().await;
    let token = server.token_for("alice").unwrap();

    for (input, output) in [("hello", "hi"), ("api key rotation", "done"), ("billing", "ok")] {
        let response = server
            .post_auth(ORG_AUDIT_LOGS, &token, &RecordRequest::new(input, output))
            .await
            .unwrap();
        assert_json::<AuditLogResponse>(response, StatusCode::CREATED)
            .await
            .unwrap();
    }

    let summary: RiskSummary = assert_json(
        server
            .get_auth("/api/v1/organizations/org-1/risk-summary?days=14", &token)
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();

    assert_eq!(summary.organization_id, "org-1");
    assert_eq!(summary.days, 14);
    assert_eq!(summary.daily.len(), 14);
    assert_eq!(
        (summary.totals.low, summary.totals.medium, summary.totals.high),
        (1, 1, 1)
    );
    assert_eq!(summary.totals.total, 3);

    let today = summary.daily.last().unwrap();
    assert_eq!(today.date, chrono::Utc::now().date_naive().to_string());
    assert_eq!(today.low + today.medium + today.high, 3);

    let code = assert_error(
        server
            .get_auth("/api/v1/organizations/org-1/risk-summary?days=365", &token)
            .await
            .unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();
    assert_eq!(code, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_current_user_organizations() {
    let server = TestServer::start(&["org-1:alice:admin", "org-2:alice"])
        .await
        .unwrap();
    let token = server.token_for("alice").unwrap();

    let orgs: Vec<OrganizationResponse> = assert_json(
        server
            .get_auth("/api/v1/users/@me/organizations", &token)
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();

    let ids: Vec<_> = orgs.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, ["org-1", "org-2"]);
    assert_eq!(orgs[0].role, "admin");
    assert_eq!(orgs[1].role, "member");
    assert_eq!(orgs[0].subscription_tier, "starter");
}
