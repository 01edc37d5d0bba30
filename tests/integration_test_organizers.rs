mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{parse_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn organizer_lifecycle_with_stats_and_membership() {
    let app = TestApp::new().await;
    let token = app.signup_and_signin("owner@uranus.test").await;
    let organizer_id = app.create_organizer(&token, "Theaterwerkstatt").await;

    let organizer = parse_body(app.get(&format!("/organizer/{organizer_id}")).await).await;
    assert_eq!(organizer["contact_email"], "owner@uranus.test");

    let venue_id = app.create_venue(&token, organizer_id, json!({ "name": "Werft" })).await;
    app.request("POST", "/space/", Some(&token), Some(json!({ "venue_id": venue_id, "name": "Halle" }))).await;
    for days in [5, -5] {
        app.create_event(&token, json!({
            "organizer_id": organizer_id,
            "venue_id": venue_id,
            "title": format!("Stück {days}"),
            "date_start": (Utc::now() + Duration::days(days)).to_rfc3339()
        })).await;
    }

    let stats = parse_body(app.get(&format!("/organizer/{organizer_id}/stats")).await).await;
    assert_eq!(stats["count_venues"], 1);
    assert_eq!(stats["count_spaces"], 1);
    assert_eq!(stats["count_events"], 1);

    let mine = parse_body(app.request("GET", "/user/organizer", Some(&token), None).await).await;
    assert_eq!(mine[0]["organizer_name"], "Theaterwerkstatt");
    assert_eq!(mine[0]["can_edit"], true);

    let res = app.request("PUT", &format!("/organizer/{organizer_id}"), Some(&token), Some(json!({
        "name": "Theaterwerkstatt Pilkentafel",
        "city": "Flensburg"
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["city"], "Flensburg");

    let list = parse_body(app.get("/organizer/").await).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let res = app.request("DELETE", &format!("/organizer/{organizer_id}"), Some(&token), None).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.get(&format!("/organizer/{organizer_id}")).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.get(&format!("/organizer/{organizer_id}/stats")).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn outsiders_cannot_change_organizers_and_venue_roles_are_listed() {
    let app = TestApp::new().await;
    let token = app.signup_and_signin("owner@uranus.test").await;
    let organizer_id = app.create_organizer(&token, "Kulturhof").await;
    let venue_id = app.create_venue(&token, organizer_id, json!({ "name": "Hof" })).await;

    let outsider = app.signup_and_signin("outsider@uranus.test").await;
    let res = app.request("DELETE", &format!("/organizer/{organizer_id}"), Some(&outsider), None).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.request("POST", "/user/role/venue", Some(&outsider), Some(json!({
        "venue_id": venue_id,
        "user_role_id": 2
    }))).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.request("POST", "/user/role/venue", Some(&token), Some(json!({
        "venue_id": venue_id,
        "user_role_id": 2
    }))).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let roles = parse_body(app.request("GET", "/user/role/venue", Some(&token), None).await).await;
    assert_eq!(roles[0]["venue_name"], "Hof");
    assert_eq!(roles[0]["user_role_name"], "editor");
}
