mod common;

use axum::http::StatusCode;
use chrono::{Duration, NaiveDate, Utc};
use common::{parse_body, TestApp, BASE_URL};
use serde_json::{json, Value};

struct Fixture {
    token: String,
    organizer_id: i64,
    flensburg: i64,
    kiel: i64,
}

async fn fixture(app: &TestApp) -> Fixture {
    let token = app.signup_and_signin("events@uranus.test").await;
    let organizer_id = app.create_organizer(&token, "Kulturbüro Nord").await;
    let flensburg = app.create_venue(&token, organizer_id, json!({
        "name": "Volksbad",
        "postal_code": "24937",
        "city": "Flensburg",
        "venue_type_ids": [1]
    })).await;
    let kiel = app.create_venue(&token, organizer_id, json!({
        "name": "Pumpe",
        "postal_code": "24103",
        "city": "Kiel",
        "venue_type_ids": [2]
    })).await;
    Fixture { token, organizer_id, flensburg, kiel }
}

fn event_body(f: &Fixture, venue_id: i64, title: &str, days_ahead: i64, types: &[i64]) -> Value {
    json!({
        "organizer_id": f.organizer_id,
        "venue_id": venue_id,
        "title": title,
        "description": "",
        "date_start": (Utc::now() + Duration::days(days_ahead)).to_rfc3339(),
        "event_type_ids": types,
    })
}

async fn register_image(app: &TestApp, token: &str, source_name: &str) -> i64 {
    let res = app.request("POST", "/image/", Some(token), Some(json!({
        "origin_name": "plakat.jpg",
        "source_name": source_name,
        "mime_type": "image/webp",
        "license_type_id": 1
    }))).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    parse_body(res).await["id"].as_i64().unwrap()
}

fn image_urls(rows: &Value) -> Vec<Option<String>> {
    rows.as_array()
        .unwrap()
        .iter()
        .map(|r| r["image_url"].as_str().map(str::to_string))
        .collect()
}

fn uploaded(source_name: &str) -> Option<String> {
    Some(format!("{BASE_URL}uploads/{source_name}"))
}

fn titles(rows: &Value) -> Vec<String> {
    rows.as_array()
        .unwrap()
        .iter()
        .map(|r| r["event_title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn created_event_is_found_by_its_type_in_the_requested_language() {
    let app = TestApp::new().await;
    let f = fixture(&app).await;

    let detail = app.create_event(&f.token, event_body(&f, f.flensburg, "Jazz am Hafen", 10, &[1])).await;
    let event_id = detail["event"]["id"].as_i64().unwrap();
    assert_eq!(detail["event_type_ids"], json!([1]));

    let res = app.get("/event/?event_type_id=1&lang=en").await;
    assert_eq!(res.status(), StatusCode::OK);
    let rows = parse_body(res).await;
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["event_id"].as_i64().unwrap(), event_id);
    assert_eq!(rows[0]["event_type"], "Concert");
    assert_eq!(rows[0]["venue_type"], "Cultural centre");
    assert_eq!(rows[0]["organizer_name"], "Kulturbüro Nord");

    let rows = parse_body(app.get("/event/?event_type_id=1").await).await;
    assert_eq!(rows[0]["event_type"], "Konzert");
}

#[tokio::test]
async fn filters_combine_with_and_across_keys_and_or_within_a_key() {
    let app = TestApp::new().await;
    let f = fixture(&app).await;

    app.create_event(&f.token, event_body(&f, f.flensburg, "Konzert Flensburg", 5, &[1])).await;
    app.create_event(&f.token, event_body(&f, f.flensburg, "Lesung Flensburg", 6, &[3])).await;
    app.create_event(&f.token, event_body(&f, f.kiel, "Konzert Kiel", 7, &[1])).await;

    let rows = parse_body(app.get("/event/?city=Flensburg&event_type_id=1").await).await;
    assert_eq!(titles(&rows), vec!["Konzert Flensburg"]);

    let uri = format!("/event/?venue_id={}&venue_id={}&event_type_id=1", f.flensburg, f.kiel);
    let rows = parse_body(app.get(&uri).await).await;
    assert_eq!(titles(&rows), vec!["Konzert Flensburg", "Konzert Kiel"]);

    let rows = parse_body(app.get("/event/?event_type_id=1,3&postal_code=24937").await).await;
    assert_eq!(titles(&rows), vec!["Konzert Flensburg", "Lesung Flensburg"]);

    let res = app.get("/event/?city=Kiel&event_type_id=3").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn date_filters_bound_the_start_time() {
    let app = TestApp::new().await;
    let f = fixture(&app).await;

    app.create_event(&f.token, event_body(&f, f.flensburg, "Bald", 2, &[])).await;
    app.create_event(&f.token, event_body(&f, f.flensburg, "Später", 40, &[])).await;

    let cutoff = (Utc::now() + Duration::days(20)).date_naive();
    let rows = parse_body(app.get(&format!("/event/?date_start=%3E%3D{cutoff}")).await).await;
    assert_eq!(titles(&rows), vec!["Später"]);

    let rows = parse_body(app.get(&format!("/event/?date_end={cutoff}")).await).await;
    assert_eq!(titles(&rows), vec!["Bald"]);

    let res = app.get("/event/?date_start=gestern").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(parse_body(res).await["error"].as_str().unwrap().contains("date_start"));

    let last_day = NaiveDate::MAX.format("%Y-%m-%d").to_string().replace('+', "%2B");
    let res = app.get(&format!("/event/?date_start=%3D{last_day}")).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(parse_body(res).await["error"].as_str().unwrap().contains("out of range"));
}

#[tokio::test]
async fn aggregated_types_list_every_link_even_when_filtering_by_one() {
    let app = TestApp::new().await;
    let f = fixture(&app).await;

    let mut body = event_body(&f, f.flensburg, "Lesekonzert", 3, &[3, 1]);
    body["genre_type_ids"] = json!([1, 2]);
    app.create_event(&f.token, body).await;
    app.create_event(&f.token, event_body(&f, f.flensburg, "Ohne Typ", 4, &[])).await;

    let rows = parse_body(app.get("/event/?event_type_id=3&lang=en").await).await;
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["event_type"], "Concert, Reading");
    assert_eq!(rows[0]["genre_type"], "Classical, Jazz");

    let rows = parse_body(app.get(&format!("/event/?venue_id={}", f.flensburg)).await).await;
    let untyped = rows.as_array().unwrap().iter().find(|r| r["event_title"] == "Ohne Typ").unwrap();
    assert!(untyped["event_type"].is_null());
    assert!(untyped["genre_type"].is_null());
}

#[tokio::test]
async fn type_names_sharing_a_translation_are_listed_once() {
    let app = TestApp::new().await;
    let f = fixture(&app).await;

    sqlx::query("INSERT INTO event_type (type_id, i18n_locale_id, name) VALUES (5, 2, 'Concert')")
        .execute(&app.pool)
        .await
        .unwrap();
    app.create_event(&f.token, event_body(&f, f.flensburg, "Doppelt", 3, &[1, 5, 3])).await;

    let rows = parse_body(app.get("/event/?event_type_id=5&lang=en").await).await;
    assert_eq!(rows[0]["event_type"], "Concert, Reading");
}

#[tokio::test]
async fn unsupported_language_keeps_rows_without_type_names() {
    let app = TestApp::new().await;
    let f = fixture(&app).await;
    app.create_event(&f.token, event_body(&f, f.flensburg, "Konzert", 3, &[1])).await;

    let res = app.get(&format!("/event/?venue_id={}&lang=fr", f.flensburg)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let rows = parse_body(res).await;
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["venue_name"], "Volksbad");
    assert!(rows[0]["event_type"].is_null());
}

#[tokio::test]
async fn image_url_is_null_without_main_image_and_built_from_source_name_with_one() {
    let app = TestApp::new().await;
    let f = fixture(&app).await;

    let image_id = register_image(&app, &f.token, "9c1e5f.webp").await;

    let mut with_image = event_body(&f, f.flensburg, "Mit Bild", 3, &[]);
    with_image["image_id"] = json!(image_id);
    app.create_event(&f.token, with_image).await;
    app.create_event(&f.token, event_body(&f, f.flensburg, "Ohne Bild", 4, &[])).await;

    let rows = parse_body(app.get(&format!("/event/?venue_id={}", f.flensburg)).await).await;
    assert_eq!(rows[0]["image_url"], format!("{BASE_URL}uploads/9c1e5f.webp"));
    assert_eq!(rows[0]["image_id"].as_i64().unwrap(), image_id);
    assert!(rows[1]["image_url"].is_null());
}

#[tokio::test]
async fn search_rejects_missing_and_unknown_filters() {
    let app = TestApp::new().await;

    let res = app.get("/event/").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.get("/event/?lang=en").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.get("/event/?colour=blue").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(parse_body(res).await["error"].as_str().unwrap().contains("colour"));

    let res = app.get("/event/?venue_id=abc").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn sort_endpoint_orders_by_creation_time() {
    let app = TestApp::new().await;
    let f = fixture(&app).await;

    app.create_event(&f.token, event_body(&f, f.flensburg, "Erstes", 30, &[])).await;
    app.create_event(&f.token, event_body(&f, f.kiel, "Zweites", 1, &[])).await;

    let rows = parse_body(app.get("/event/sort?order_by=desc").await).await;
    assert_eq!(titles(&rows), vec!["Zweites", "Erstes"]);

    let rows = parse_body(app.get("/event/sort?order_by=asc").await).await;
    assert_eq!(titles(&rows), vec!["Erstes", "Zweites"]);

    let res = app.get("/event/sort?city=Kiel").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_missing_event_names_the_id_and_existing_event_disappears() {
    let app = TestApp::new().await;
    let f = fixture(&app).await;

    let res = app.request("DELETE", "/event/4711", Some(&f.token), None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(parse_body(res).await["error"].as_str().unwrap().contains("4711"));

    let detail = app.create_event(&f.token, event_body(&f, f.flensburg, "Kurz", 3, &[1])).await;
    let event_id = detail["event"]["id"].as_i64().unwrap();

    let res = app.get(&format!("/event/{event_id}")).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.request("DELETE", &format!("/event/{event_id}"), Some(&f.token), None).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = app.get(&format!("/event/{event_id}")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_by_date_changes_fields_and_diffs_type_links() {
    let app = TestApp::new().await;
    let f = fixture(&app).await;

    let detail = app.create_event(&f.token, event_body(&f, f.flensburg, "Alt", 3, &[1, 2])).await;
    let event_id = detail["event"]["id"].as_i64().unwrap();
    let event_date_id = detail["event_date"]["id"].as_i64().unwrap();

    let res = app.request("PUT", &format!("/event/{event_date_id}"), Some(&f.token), Some(json!({
        "title": "Neu",
        "event_type_ids": [2, 3]
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = parse_body(res).await;
    assert_eq!(updated["event"]["title"], "Neu");
    assert_eq!(updated["event_type_ids"], json!([2, 3]));

    let rows = parse_body(app.get(&format!("/event/{event_id}?lang=en")).await).await;
    assert_eq!(rows[0]["event_type"], "Reading, Theatre");

    let res = app.request("PUT", "/event/999", Some(&f.token), Some(json!({ "title": "X" }))).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn extra_dates_become_extra_occurrences() {
    let app = TestApp::new().await;
    let f = fixture(&app).await;

    let detail = app.create_event(&f.token, event_body(&f, f.flensburg, "Serie", 3, &[])).await;
    let event_id = detail["event"]["id"].as_i64().unwrap();

    let res = app.request("POST", &format!("/event/{event_id}/date"), Some(&f.token), Some(json!({
        "venue_id": f.kiel,
        "date_start": (Utc::now() + Duration::days(9)).to_rfc3339()
    }))).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let rows = parse_body(app.get(&format!("/event/{event_id}")).await).await;
    let cities: Vec<&str> = rows.as_array().unwrap().iter().map(|r| r["venue_city"].as_str().unwrap()).collect();
    assert_eq!(cities, vec!["Flensburg", "Kiel"]);
}

#[tokio::test]
async fn invalid_references_and_foreign_organizers_are_refused() {
    let app = TestApp::new().await;
    let f = fixture(&app).await;

    let res = app.request("POST", "/event/", Some(&f.token), Some(event_body(&f, 999, "Nirgendwo", 3, &[]))).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(parse_body(res).await["error"], "The venue_id (999) provided is invalid.");

    let res = app.request("POST", "/event/", Some(&f.token), Some(event_body(&f, f.flensburg, "Falscher Typ", 3, &[42]))).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let outsider = app.signup_and_signin("outsider@uranus.test").await;
    let res = app.request("POST", "/event/", Some(&outsider), Some(event_body(&f, f.flensburg, "Fremd", 3, &[]))).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.request("POST", "/event/", None, Some(event_body(&f, f.flensburg, "Anonym", 3, &[]))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn partial_date_update_is_checked_against_the_stored_dates() {
    let app = TestApp::new().await;
    let f = fixture(&app).await;

    let detail = app.create_event(&f.token, event_body(&f, f.flensburg, "Später", 10, &[])).await;
    let event_date_id = detail["event_date"]["id"].as_i64().unwrap();
    let uri = format!("/event/{event_date_id}");

    let res = app.request("PUT", &uri, Some(&f.token), Some(json!({
        "date_end": (Utc::now() + Duration::days(1)).to_rfc3339()
    }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(parse_body(res).await["error"].as_str().unwrap().contains("date_end"));

    let res = app.request("PUT", &uri, Some(&f.token), Some(json!({
        "date_end": (Utc::now() + Duration::days(11)).to_rfc3339(),
        "entry_time": "18:30:00"
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.request("PUT", &uri, Some(&f.token), Some(json!({
        "date_start": (Utc::now() + Duration::days(12)).to_rfc3339()
    }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.request("PUT", &uri, Some(&f.token), Some(json!({ "date_end": null }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = parse_body(res).await;
    assert!(updated["event_date"]["date_end"].is_null());
    assert_eq!(updated["event_date"]["entry_time"], "18:30:00");
    assert_eq!(updated["event"]["title"], "Später");
}

#[tokio::test]
async fn new_main_image_replaces_the_previous_one() {
    let app = TestApp::new().await;
    let f = fixture(&app).await;
    let first = register_image(&app, &f.token, "erstes.webp").await;
    let second = register_image(&app, &f.token, "zweites.webp").await;

    let mut body = event_body(&f, f.flensburg, "Plakatwechsel", 3, &[]);
    body["image_id"] = json!(first);
    let detail = app.create_event(&f.token, body).await;
    let event_id = detail["event"]["id"].as_i64().unwrap();
    let event_date_id = detail["event_date"]["id"].as_i64().unwrap();

    let res = app.request("PUT", &format!("/event/{event_date_id}"), Some(&f.token), Some(json!({
        "image_id": second
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);

    let rows = parse_body(app.get(&format!("/event/{event_id}")).await).await;
    assert_eq!(image_urls(&rows), vec![uploaded("zweites.webp")]);

    let main_images: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM event_link_images WHERE event_id = ? AND main_image = 1")
            .bind(event_id)
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(main_images, 1);
}

#[tokio::test]
async fn date_image_overrides_the_event_image_and_other_dates_fall_back() {
    let app = TestApp::new().await;
    let f = fixture(&app).await;
    let event_image = register_image(&app, &f.token, "reihe.webp").await;
    let second_date_image = register_image(&app, &f.token, "zweiter-abend.webp").await;
    let first_date_image = register_image(&app, &f.token, "erster-abend.webp").await;

    let mut body = event_body(&f, f.flensburg, "Reihe", 3, &[]);
    body["image_id"] = json!(event_image);
    let detail = app.create_event(&f.token, body).await;
    let event_id = detail["event"]["id"].as_i64().unwrap();
    let first_date_id = detail["event_date"]["id"].as_i64().unwrap();

    let res = app.request("POST", &format!("/event/{event_id}/date"), Some(&f.token), Some(json!({
        "date_start": (Utc::now() + Duration::days(9)).to_rfc3339(),
        "image_id": second_date_image
    }))).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let rows = parse_body(app.get(&format!("/event/{event_id}")).await).await;
    assert_eq!(image_urls(&rows), vec![uploaded("reihe.webp"), uploaded("zweiter-abend.webp")]);

    for image_id in [second_date_image, first_date_image] {
        let res = app.request("PUT", &format!("/event/{first_date_id}"), Some(&f.token), Some(json!({
            "date_image_id": image_id
        }))).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let rows = parse_body(app.get(&format!("/event/{event_id}")).await).await;
    assert_eq!(image_urls(&rows), vec![uploaded("erster-abend.webp"), uploaded("zweiter-abend.webp")]);

    let main_images: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM event_date_link_images WHERE event_date_id = ? AND main_image = 1",
    )
        .bind(first_date_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(main_images, 1);

    let res = app.request("POST", &format!("/event/{event_id}/date"), Some(&f.token), Some(json!({
        "date_start": (Utc::now() + Duration::days(12)).to_rfc3339(),
        "image_id": 999
    }))).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}
