mod support;

use axum::http::StatusCode;
use serde_json::json;

use support::fulfillment_app::{TEST_DATABASE, build_test_router, fulfill};
use support::query_service_mock::{MockQueryService, ScriptedAnswer};

#[tokio::test]
async fn single_state_answer_drills_down_on_following_turns() {
    let service = MockQueryService::start(vec![
        ScriptedAnswer::Rows("venue_state", vec!["CA"]),
        ScriptedAnswer::Rows("venue_name", vec!["Hollywood Bowl", "Greek Theatre"]),
        ScriptedAnswer::Rows("month", vec!["JUL", "AUG", "SEP"]),
    ])
    .await;
    let app = build_test_router(&service.endpoint_url);

    let first = fulfill(&app, json!({ "dimension": "states", "count": "1" }), None).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.fulfillment_state(), "Fulfilled");
    assert_eq!(first.content(), "The top state was California.");
    assert_eq!(first.remembered_slots()["venue_state"], "California");

    let second = fulfill(
        &app,
        json!({ "dimension": "venues", "count": "2" }),
        Some(first.session_attributes()),
    )
    .await;
    assert_eq!(
        second.content(),
        "The top 2 venues in the state of California were 1, Hollywood Bowl; and 2, Greek Theatre."
    );

    let third = fulfill(
        &app,
        json!({ "dimension": "months", "count": "3", "event_name": null }),
        Some(second.session_attributes()),
    )
    .await;
    assert_eq!(
        third.content(),
        "The top 3 months in the state of California were 1, July; 2, August; and 3, September."
    );

    let queries = service.seen_queries().await;
    assert_eq!(queries.len(), 3);
    assert!(!queries[0].contains("LIKE"));
    assert!(queries[1].contains("AND LOWER(v.venue_state) LIKE LOWER('%CA%')"));
    assert!(queries[1].ends_with("GROUP BY v.venue_name ORDER BY ticket_sales desc LIMIT 2"));
    assert!(queries[2].contains("AND LOWER(v.venue_state) LIKE LOWER('%CA%')"));
    assert!(queries[2].starts_with("SELECT d.month, "));
    assert_eq!(service.seen_databases().await, vec![TEST_DATABASE; 3]);
}

#[tokio::test]
async fn remembered_dimension_and_count_carry_into_follow_up() {
    let service = MockQueryService::start(vec![
        ScriptedAnswer::Rows("event_name", vec!["Wicked", "Mamma Mia!", "Jersey Boys"]),
        ScriptedAnswer::Rows("event_name", vec!["Hamlet", "Macbeth", "Othello"]),
    ])
    .await;
    let app = build_test_router(&service.endpoint_url);

    let first = fulfill(&app, json!({ "dimension": "events", "count": "3" }), None).await;
    assert_eq!(
        first.content(),
        "The top 3 events were 1, Wicked; 2, Mamma Mia!; and 3, Jersey Boys."
    );

    let follow_up = fulfill(
        &app,
        json!({ "dimension": null, "count": null, "cat_desc": "plays" }),
        Some(first.session_attributes()),
    )
    .await;
    assert_eq!(
        follow_up.content(),
        "The top 3 events for Plays were 1, Hamlet; 2, Macbeth; and 3, Othello."
    );

    let remembered = follow_up.remembered_slots();
    assert_eq!(remembered["dimension"], "events");
    assert_eq!(remembered["count"], "3");
    assert_eq!(remembered["cat_desc"], "plays");

    let queries = service.seen_queries().await;
    assert!(queries[1].contains("AND LOWER(c.cat_desc) LIKE LOWER('%plays%')"));
    assert!(queries[1].ends_with("LIMIT 3"));
}

#[tokio::test]
async fn active_dimension_filter_from_memory_is_cleared() {
    let service = MockQueryService::start(vec![
        ScriptedAnswer::Rows("venue_city", vec!["Boston"]),
        ScriptedAnswer::Rows("venue_city", vec!["Boston", "Denver"]),
    ])
    .await;
    let app = build_test_router(&service.endpoint_url);

    let first = fulfill(&app, json!({ "dimension": "cities", "count": "1" }), None).await;
    assert_eq!(first.content(), "The top city was Boston.");

    let second = fulfill(
        &app,
        json!({ "count": "2" }),
        Some(first.session_attributes()),
    )
    .await;
    assert_eq!(
        second.content(),
        "The top 2 cities were 1, Boston; and 2, Denver."
    );

    let queries = service.seen_queries().await;
    assert!(
        !queries[1].contains("venue_city) LIKE"),
        "remembered city should not filter the city ranking: {}",
        queries[1]
    );
}

#[tokio::test]
async fn clarification_does_not_touch_the_query_service() {
    let service = MockQueryService::start(Vec::new()).await;
    let app = build_test_router(&service.endpoint_url);

    let response = fulfill(
        &app,
        json!({ "count": "2" }),
        Some(json!({ "custom": "kept" })),
    )
    .await;

    assert_eq!(response.fulfillment_state(), "Fulfilled");
    assert_eq!(
        response.content(),
        "Please tell me a dimension, for example, \"top five events\". I can also report on \
         months, venues, cities, states, and categories."
    );
    assert_eq!(response.session_attributes()["custom"], "kept");
    assert_eq!(response.session_attributes()["greetingCount"], "1");
    assert!(service.seen_queries().await.is_empty());
}
