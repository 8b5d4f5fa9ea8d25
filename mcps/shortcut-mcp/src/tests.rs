//! End-to-end action tests against the scripted transport

use std::time::Duration;

use serde_json::{json, Value};

use crate::handlers::{Outcome, HELP_TEXT};
use crate::params::ShortcutParams;
use crate::shortcut::ShortcutError;
use crate::testing::{raw, reference_transport, service};

fn params(value: Value) -> ShortcutParams {
    serde_json::from_value(value).unwrap()
}

fn story_json(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "story_type": "feature",
        "workflow_state_id": 500002,
        "app_url": format!("https://app.shortcut.com/acme/story/{id}")
    })
}

// ============================================================================
// get
// ============================================================================

#[tokio::test]
async fn test_get_story_with_comments() {
    let transport = reference_transport();
    let mut story = story_json(704, "Fix login");
    story["comments"] = json!([
        {"author_id": "m-ada", "text": "Looking into it", "created_at": "2024-05-01T10:00:00Z"}
    ]);
    transport.respond_json("GET", "/stories/704", story);
    let svc = service(&transport);

    let outcome = svc
        .dispatch(params(json!({"action": "get", "id": "https://app.shortcut.com/acme/story/704/fix-login"})))
        .await
        .unwrap();

    let Outcome::Success(text) = outcome else {
        panic!("expected success, got {outcome:?}");
    };
    assert!(text.starts_with("sc-704: Fix login"));
    assert!(text.contains("State: In Progress"));
    assert!(text.contains("- Ada Lovelace (2024-05-01T10:00:00Z): Looking into it"));
}

#[tokio::test]
async fn test_get_missing_story() {
    let transport = reference_transport();
    let svc = service(&transport);

    let outcome = svc.dispatch(params(json!({"action": "get", "id": 99}))).await.unwrap();
    assert_eq!(outcome, Outcome::Guidance("Story sc-99 not found.".into()));
}

#[tokio::test]
async fn test_get_requires_valid_id() {
    let svc = service(&reference_transport());

    let err = svc.dispatch(params(json!({"action": "get"}))).await.unwrap_err();
    assert!(matches!(err, ShortcutError::Validation(_)));

    let err = svc
        .dispatch(params(json!({"action": "get", "id": "login bug"})))
        .await
        .unwrap_err();
    assert!(matches!(err, ShortcutError::InvalidId(_)));
}

#[tokio::test(start_paused = true)]
async fn test_get_retries_after_rate_limit() {
    let transport = reference_transport();
    transport.respond("GET", "/stories/704", raw(429, "slow down").with_retry_after("2"));
    transport.respond_json("GET", "/stories/704", story_json(704, "Fix login"));
    let svc = service(&transport);

    let start = tokio::time::Instant::now();
    let outcome = svc.dispatch(params(json!({"action": "get", "id": "sc-704"}))).await.unwrap();

    assert!(matches!(outcome, Outcome::Success(_)));
    assert_eq!(transport.count_for("GET", "/stories/704"), 2);
    assert!(start.elapsed() >= Duration::from_secs(2));
}

#[tokio::test]
async fn test_reference_data_fetched_once() {
    let transport = reference_transport();
    transport.respond_json("GET", "/stories/1", story_json(1, "One"));
    transport.respond_json("GET", "/stories/2", story_json(2, "Two"));
    let svc = service(&transport);

    svc.dispatch(params(json!({"action": "get", "id": 1}))).await.unwrap();
    svc.dispatch(params(json!({"action": "get", "id": 2}))).await.unwrap();

    assert_eq!(transport.count_for("GET", "/workflows"), 1);
}

// ============================================================================
// update
// ============================================================================

#[tokio::test]
async fn test_update_unknown_state_lists_valid_states() {
    let transport = reference_transport();
    let svc = service(&transport);

    let outcome = svc
        .dispatch(params(json!({"action": "update", "id": 704, "state": "Nonexistent"})))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::Guidance(
            "State \"Nonexistent\" not found. Valid states: Unscheduled, Ready for Development, \
             In Progress, Ready for Review, Done, To Do, Designing, Shipped"
                .into()
        )
    );
    assert!(transport.mutations().is_empty());
}

#[tokio::test]
async fn test_update_unknown_owner_lists_members() {
    let transport = reference_transport();
    let svc = service(&transport);

    let outcome = svc
        .dispatch(params(json!({"action": "update", "id": 704, "owner": "nobody"})))
        .await
        .unwrap();

    assert_eq!(
        outcome.text(),
        "Member \"nobody\" not found. Valid members: Ada Lovelace (@ada), Grace Hopper (@grace), Linus T (@lt)"
    );
    assert!(transport.mutations().is_empty());
}

#[tokio::test]
async fn test_update_without_fields() {
    let transport = reference_transport();
    let svc = service(&transport);

    let outcome = svc
        .dispatch(params(json!({"action": "update", "id": 704})))
        .await
        .unwrap();

    assert!(matches!(outcome, Outcome::Guidance(_)));
    assert!(outcome.text().starts_with("No updates provided"));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_update_resolves_state_and_owner() {
    let transport = reference_transport();
    let mut updated = story_json(704, "Fix login");
    updated["workflow_state_id"] = json!(500004);
    transport.respond_json("PUT", "/stories/704", updated);
    let svc = service(&transport);

    let outcome = svc
        .dispatch(params(json!({
            "action": "update",
            "id": "sc-704",
            "state": "finished",
            "owner": "me",
            "estimate": 3,
            "labels": ["auth"]
        })))
        .await
        .unwrap();

    assert!(outcome.text().starts_with("Updated sc-704\n\nsc-704: Fix login"));
    assert!(outcome.text().contains("State: Done"));

    let mutations = transport.mutations();
    assert_eq!(mutations.len(), 1);
    assert_eq!(
        mutations[0].body,
        Some(json!({
            "workflow_state_id": 500004,
            "owner_ids": ["m-grace"],
            "estimate": 3,
            "labels": [{"name": "auth"}]
        }))
    );
}

#[tokio::test]
async fn test_update_with_non_story_response_still_succeeds() {
    let transport = reference_transport();
    transport.respond("PUT", "/stories/704", raw(200, "OK"));
    let svc = service(&transport);

    let outcome = svc
        .dispatch(params(json!({"action": "update", "id": 704, "name": "Renamed"})))
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Success("Updated sc-704".into()));
    assert_eq!(transport.mutations().len(), 1);
}

#[tokio::test]
async fn test_update_missing_story() {
    let transport = reference_transport();
    let svc = service(&transport);

    let outcome = svc
        .dispatch(params(json!({"action": "update", "id": 5, "name": "Renamed"})))
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Guidance("Story sc-5 not found.".into()));
}

#[tokio::test]
async fn test_update_rejects_bad_epic() {
    let transport = reference_transport();
    let svc = service(&transport);

    let err = svc
        .dispatch(params(json!({"action": "update", "id": 5, "epic": "someday"})))
        .await
        .unwrap_err();
    assert!(matches!(err, ShortcutError::InvalidId(_)));
    assert!(transport.mutations().is_empty());
}

// ============================================================================
// create
// ============================================================================

#[tokio::test]
async fn test_create_defaults_to_first_unstarted_state() {
    let transport = reference_transport();
    transport.respond_json(
        "POST",
        "/stories",
        json!({"id": 900, "name": "Bug title", "app_url": "https://app.shortcut.com/acme/story/900"}),
    );
    let svc = service(&transport);

    let outcome = svc
        .dispatch(params(json!({"action": "create", "name": "Bug title"})))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::Success("Created sc-900: Bug title\nURL: https://app.shortcut.com/acme/story/900".into())
    );

    let body = transport.mutations()[0].body.clone().unwrap();
    assert_eq!(body["workflow_state_id"], json!(500001));
    assert_eq!(body["story_type"], json!("feature"));
    assert_eq!(body["name"], json!("Bug title"));
}

#[tokio::test]
async fn test_create_with_explicit_fields() {
    let transport = reference_transport();
    transport.respond_json("POST", "/stories", json!({"id": 901, "name": "Crash"}));
    let svc = service(&transport);

    svc.dispatch(params(json!({
        "action": "create",
        "name": "Crash",
        "type": "bug",
        "state": "designing",
        "owner": "@lt",
        "epic": "https://app.shortcut.com/acme/epic/12"
    })))
    .await
    .unwrap();

    let body = transport.mutations()[0].body.clone().unwrap();
    assert_eq!(body["workflow_state_id"], json!(600002));
    assert_eq!(body["story_type"], json!("bug"));
    assert_eq!(body["owner_ids"], json!(["m-linus"]));
    assert_eq!(body["epic_id"], json!(12));
}

#[tokio::test]
async fn test_create_with_empty_response_still_succeeds() {
    let transport = reference_transport();
    transport.respond("POST", "/stories", raw(201, ""));
    let svc = service(&transport);

    let outcome = svc
        .dispatch(params(json!({"action": "create", "name": "Bug title"})))
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Success("Created story: Bug title".into()));
    assert_eq!(transport.mutations().len(), 1);
}

#[tokio::test]
async fn test_create_requires_name() {
    let transport = reference_transport();
    let svc = service(&transport);

    let err = svc
        .dispatch(params(json!({"action": "create", "name": "  "})))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "name is required for create");
    assert_eq!(transport.request_count(), 0);
}

// ============================================================================
// comment
// ============================================================================

#[tokio::test]
async fn test_comment_echo_is_truncated() {
    let transport = reference_transport();
    transport.respond_json("POST", "/stories/704/comments", json!({"id": 1}));
    let svc = service(&transport);
    let long = "x".repeat(150);

    let outcome = svc
        .dispatch(params(json!({"action": "comment", "id": 704, "body": long})))
        .await
        .unwrap();

    assert_eq!(
        outcome.text(),
        format!("Comment added to sc-704: \"{}...\"", "x".repeat(100))
    );
    assert_eq!(
        transport.mutations()[0].body,
        Some(json!({"text": "x".repeat(150)}))
    );
}

#[tokio::test]
async fn test_comment_requires_body() {
    let transport = reference_transport();
    let svc = service(&transport);

    let err = svc
        .dispatch(params(json!({"action": "comment", "id": 704})))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "body is required for comment");
    assert!(transport.mutations().is_empty());
}

// ============================================================================
// search
// ============================================================================

#[tokio::test]
async fn test_search_defaults_to_my_stories() {
    let transport = reference_transport();
    transport.respond_json(
        "POST",
        "/stories/search",
        json!([story_json(1, "One"), story_json(2, "Two")]),
    );
    let svc = service(&transport);

    let outcome = svc.dispatch(params(json!({"action": "search"}))).await.unwrap();

    assert!(outcome.text().starts_with("Found 2 stories:"));
    assert!(outcome.text().contains("- sc-1 [feature] One (In Progress)"));
    assert_eq!(
        transport.mutations()[0].body,
        Some(json!({"owner_ids": ["m-grace"], "archived": false}))
    );
}

#[tokio::test]
async fn test_search_text_query() {
    let transport = reference_transport();
    transport.respond_json(
        "GET",
        "/search/stories",
        json!({"data": [story_json(3, "Three")], "next": null}),
    );
    let svc = service(&transport);

    let outcome = svc
        .dispatch(params(json!({"action": "search", "query": "owner:ada state:done"})))
        .await
        .unwrap();

    assert!(outcome.text().starts_with("Found 1 story:"));
    let request = &transport.requests()[0];
    assert_eq!(
        request.path,
        "/search/stories?query=owner%3Aada+state%3Adone&page_size=25"
    );
}

#[tokio::test]
async fn test_search_filter_drops_unresolved_fields() {
    let transport = reference_transport();
    transport.respond_json("POST", "/stories/search", json!([]));
    let svc = service(&transport);

    let outcome = svc
        .dispatch(params(json!({
            "action": "search",
            "query": {"owner": "nobody", "state": "done", "epic": "later", "type": "bug"}
        })))
        .await
        .unwrap();

    assert_eq!(outcome.text(), "No stories found.");
    assert_eq!(
        transport.mutations()[0].body,
        Some(json!({"workflow_state_id": 500004, "story_type": "bug"}))
    );
}

#[tokio::test]
async fn test_search_blank_text_is_default_search() {
    let transport = reference_transport();
    transport.respond_json("POST", "/stories/search", json!([]));
    let svc = service(&transport);

    svc.dispatch(params(json!({"action": "search", "query": "   "})))
        .await
        .unwrap();

    assert_eq!(transport.count_for("GET", "/member"), 1);
    assert_eq!(transport.count_for("POST", "/stories/search"), 1);
}

// ============================================================================
// epic
// ============================================================================

#[tokio::test]
async fn test_epic_lists_stories_with_remainder() {
    let transport = reference_transport();
    transport.respond_json(
        "GET",
        "/epics/12",
        json!({
            "id": 12,
            "name": "Auth revamp",
            "state": "in progress",
            "stats": {"num_stories_total": 30, "num_stories_done": 4}
        }),
    );
    let stories: Vec<Value> = (1..=30).map(|i| story_json(i, &format!("S{i}"))).collect();
    transport.respond_json("POST", "/stories/search", Value::Array(stories));
    let svc = service(&transport);

    let outcome = svc
        .dispatch(params(json!({"action": "epic", "id": "https://app.shortcut.com/acme/epic/12"})))
        .await
        .unwrap();

    let text = outcome.text();
    assert!(text.starts_with("Epic 12: Auth revamp"));
    assert!(text.contains("Progress: 4/30 stories done"));
    assert!(text.contains("Found 30 stories:"));
    assert!(text.contains("- sc-25 "));
    assert!(!text.contains("- sc-26 "));
    assert!(text.ends_with("... and 5 more"));
    assert_eq!(transport.mutations()[0].body, Some(json!({"epic_id": 12})));
}

#[tokio::test]
async fn test_epic_not_found() {
    let transport = reference_transport();
    let svc = service(&transport);

    let outcome = svc.dispatch(params(json!({"action": "epic", "id": 12}))).await.unwrap();
    assert_eq!(outcome, Outcome::Guidance("Epic 12 not found.".into()));
}

// ============================================================================
// api / help
// ============================================================================

#[tokio::test]
async fn test_api_renders_json() {
    let transport = reference_transport();
    let svc = service(&transport);

    let outcome = svc
        .dispatch(params(json!({"action": "api", "method": "get", "path": "/member"})))
        .await
        .unwrap();

    assert!(outcome.text().contains("\"id\": \"m-grace\""));
}

#[tokio::test]
async fn test_api_get_is_repeatable() {
    let transport = reference_transport();
    transport.respond_json(
        "GET",
        "/member",
        json!({
            "id": "m-grace",
            "name": "Grace Hopper",
            "mention_name": "grace",
            "workspace2": {"url_slug": "acme", "estimate_scale": [0, 1, 2, 4, 8]},
            "role": "admin"
        }),
    );
    let svc = service(&transport);
    let request = json!({"action": "api", "method": "GET", "path": "/member"});

    let first = svc.dispatch(params(request.clone())).await.unwrap();
    let second = svc.dispatch(params(request)).await.unwrap();

    assert_eq!(first.text(), second.text());
    assert!(first.text().contains("\"url_slug\": \"acme\""));
    assert_eq!(transport.count_for("GET", "/member"), 2);
}

#[tokio::test]
async fn test_api_empty_and_text_responses() {
    let transport = reference_transport();
    transport.respond("DELETE", "/stories/5", raw(204, ""));
    transport.respond("GET", "/ping", raw(200, "pong"));
    let svc = service(&transport);

    let outcome = svc
        .dispatch(params(json!({"action": "api", "method": "DELETE", "path": "/stories/5"})))
        .await
        .unwrap();
    assert_eq!(outcome.text(), "(empty response)");

    let outcome = svc
        .dispatch(params(json!({"action": "api", "method": "GET", "path": "/ping"})))
        .await
        .unwrap();
    assert_eq!(outcome.text(), "pong");
}

#[tokio::test]
async fn test_api_validation() {
    let transport = reference_transport();
    let svc = service(&transport);

    let err = svc
        .dispatch(params(json!({"action": "api", "path": "/member"})))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "method is required for api");

    let err = svc
        .dispatch(params(json!({"action": "api", "method": "GET"})))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "path is required for api");

    let err = svc
        .dispatch(params(json!({"action": "api", "method": "GET", "path": "member"})))
        .await
        .unwrap_err();
    assert!(matches!(err, ShortcutError::Validation(_)));

    let err = svc
        .dispatch(params(json!({"action": "api", "method": "GE T", "path": "/member"})))
        .await
        .unwrap_err();
    assert!(matches!(err, ShortcutError::Validation(_)));

    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_api_upstream_error_propagates() {
    let transport = reference_transport();
    transport.respond("POST", "/stories", raw(400, "{\"message\":\"bad\"}"));
    let svc = service(&transport);

    let err = svc
        .dispatch(params(json!({"action": "api", "method": "POST", "path": "/stories", "body": {}})))
        .await
        .unwrap_err();
    assert!(matches!(err, ShortcutError::Upstream { status: 400, .. }));
}

#[tokio::test]
async fn test_help() {
    let transport = reference_transport();
    let svc = service(&transport);

    let outcome = svc.dispatch(params(json!({"action": "help"}))).await.unwrap();
    assert_eq!(outcome, Outcome::Success(HELP_TEXT.to_string()));
    assert_eq!(transport.request_count(), 0);
}
