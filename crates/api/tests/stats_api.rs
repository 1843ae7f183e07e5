//! Integration tests for the per-form statistics endpoint.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json};
use sqlx::PgPool;

/// A checkbox gate plus a required select that is only visible when the
/// gate is ticked. Respondents who leave the gate unticked submit validly
/// without the required field -- which is exactly what the completion rate
/// measures (it counts all required fields, visible or not).
fn gated_form_body() -> serde_json::Value {
    serde_json::json!({
        "title": "Gated survey",
        "fields": [
            {"id": "f0", "label": "I used the product this quarter", "type": "checkbox",
             "required": false},
            {"id": "f1", "label": "How was it?", "type": "single_select",
             "required": true, "options": ["Yes", "No"],
             "visibility": {"dependsOnId": "f0", "operator": "checked"}},
            {"id": "f2", "label": "Anything else?", "type": "long_text",
             "required": false}
        ]
    })
}

async fn submit(pool: &PgPool, share_id: &str, respondent: &str, answers: serde_json::Value) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/v1/survey/{share_id}/responses"),
        serde_json::json!({"respondentId": respondent, "answers": answers}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn stats_over_three_responses(pool: PgPool) {
    let token = common::signup_and_token(&pool, "owner@acme.test").await;
    let (form_id, share_id) = common::create_active_form(&pool, &token, gated_form_body()).await;

    submit(
        &pool,
        &share_id,
        "resp-1",
        serde_json::json!({"f0": true, "f1": "Yes", "f2": "Great support, really great"}),
    )
    .await;
    submit(
        &pool,
        &share_id,
        "resp-2",
        serde_json::json!({"f0": true, "f1": "No", "f2": "Too slow and broken"}),
    )
    .await;
    // Gate unticked: f1 hidden, so this submission validly omits it.
    submit(&pool, &share_id, "resp-3", serde_json::json!({"f0": false})).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/forms/{form_id}/stats"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let stats = &json["data"];

    assert_eq!(stats["responseCount"], 3);
    // One required field, answered by 2 of 3 responses: 66.6 -> 67.
    assert_eq!(stats["completionRatePct"], 67);
    // Answered fields: 3 + 3 + 1 = 7, mean 2.33 -> 2.
    assert_eq!(stats["avgAnsweredFields"], 2);

    // Option distribution over the declared options, in declared order.
    let distribution = stats["optionDistribution"].as_array().unwrap();
    assert_eq!(distribution.len(), 1);
    assert_eq!(distribution[0]["fieldId"], "f1");
    assert_eq!(distribution[0]["counts"]["Yes"], 1);
    assert_eq!(distribution[0]["counts"]["No"], 1);

    // "great" appears twice in one answer, once-counted words trail it.
    let keywords = stats["topKeywords"].as_array().unwrap();
    assert_eq!(keywords[0]["keyword"], "great");
    assert_eq!(keywords[0]["count"], 2);

    // Lexicon tally: one positive, one negative, one neutral (no text).
    assert_eq!(stats["sentiment"]["positive"], 1);
    assert_eq!(stats["sentiment"]["negative"], 1);
    assert_eq!(stats["sentiment"]["neutral"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn stats_with_no_required_fields_reports_full_completion(pool: PgPool) {
    let token = common::signup_and_token(&pool, "owner@acme.test").await;
    let body = serde_json::json!({
        "title": "Optional-only",
        "fields": [
            {"id": "f1", "label": "Notes", "type": "short_text", "required": false}
        ]
    });
    let (form_id, share_id) = common::create_active_form(&pool, &token, body).await;
    submit(&pool, &share_id, "resp-1", serde_json::json!({})).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/forms/{form_id}/stats"), &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["completionRatePct"], 100);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn stats_for_a_form_without_responses(pool: PgPool) {
    let token = common::signup_and_token(&pool, "owner@acme.test").await;
    let (form_id, _) = common::create_active_form(&pool, &token, gated_form_body()).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/forms/{form_id}/stats"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["responseCount"], 0);
    assert_eq!(json["data"]["completionRatePct"], 0);
    assert_eq!(json["data"]["topKeywords"], serde_json::json!([]));
}
