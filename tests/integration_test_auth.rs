mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp, PASSWORD};
use serde_json::json;

#[tokio::test]
async fn signup_enforces_password_policy_and_unique_email() {
    let app = TestApp::new().await;

    let res = app.request("POST", "/user/signup", None, Some(json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email_address": "ada@uranus.test",
        "password": "kurz"
    }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.request("POST", "/user/signup", None, Some(json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email_address": "ada@uranus.test",
        "password": "nouppercase-2024"
    }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(parse_body(res).await["error"].as_str().unwrap().to_lowercase().contains("upper"));

    let res = app.request("POST", "/user/signup", None, Some(json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email_address": "keine-adresse",
        "password": PASSWORD
    }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    app.signup_and_signin("ada@uranus.test").await;

    let res = app.request("POST", "/user/signup", None, Some(json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email_address": "ADA@uranus.test",
        "password": PASSWORD
    }))).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn signin_refresh_and_profile() {
    let app = TestApp::new().await;
    app.signup_and_signin("grace@uranus.test").await;

    let res = app.request("POST", "/user/signin", None, Some(json!({
        "email_address": "grace@uranus.test",
        "password": "Falsches-Passwort-1"
    }))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app.request("POST", "/user/signin", None, Some(json!({
        "email_address": "grace@uranus.test",
        "password": PASSWORD
    }))).await;
    let tokens = parse_body(res).await;
    assert_eq!(tokens["token_type"], "bearer");
    let access = tokens["access_token"].as_str().unwrap();
    let refresh = tokens["refresh_token"].as_str().unwrap();

    let res = app.request("GET", "/user/profile", Some(access), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let profile = parse_body(res).await;
    assert_eq!(profile["email_address"], "grace@uranus.test");
    assert!(profile.get("password_hash").is_none());

    let res = app.request("GET", "/user/profile", Some(refresh), None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.get("/user/profile").await.status(), StatusCode::UNAUTHORIZED);

    let res = app.request("POST", "/user/token/refresh", None, Some(json!({ "refresh_token": access }))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app.request("POST", "/user/token/refresh", None, Some(json!({ "refresh_token": refresh }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let renewed = parse_body(res).await["access_token"].as_str().unwrap().to_string();
    assert_eq!(app.request("GET", "/user/profile", Some(&renewed), None).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn profile_update_changes_names_and_locale() {
    let app = TestApp::new().await;
    let token = app.signup_and_signin("linus@uranus.test").await;

    let res = app.request("PUT", "/user/update", Some(&token), Some(json!({
        "first_name": "Linus",
        "i18n_locale_id": 2
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let user = parse_body(res).await;
    assert_eq!(user["first_name"], "Linus");
    assert_eq!(user["last_name"], "User");
    assert_eq!(user["i18n_locale_id"], 2);

    let res = app.request("PUT", "/user/update", Some(&token), Some(json!({ "i18n_locale_id": 77 }))).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = app.request("PUT", "/user/update", Some(&token), Some(json!({ "password": "schwach" }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn password_reset_round_trip_through_the_mailer() {
    let app = TestApp::new().await;
    app.signup_and_signin("reset@uranus.test").await;

    let res = app.request("POST", "/user/renew/password", None, Some(json!({
        "email_address": "unbekannt@uranus.test"
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(app.mailer.sent.lock().unwrap().is_empty());

    let res = app.request("POST", "/user/renew/password", None, Some(json!({
        "email_address": "reset@uranus.test"
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);

    let mail = app.mailer.sent.lock().unwrap()[0].clone();
    assert_eq!(mail.recipient, "reset@uranus.test");
    let marker = "reset/password?token=";
    assert!(mail.body.contains("http://frontend.test/reset/password?token="));
    let start = mail.body.find(marker).unwrap() + marker.len();
    let token: String = mail.body[start..].chars().take_while(|c| !c.is_whitespace()).collect();

    let new_password = "Ganz-Neues-Passwort-7";
    let res = app.request("POST", "/user/confirm/password", None, Some(json!({
        "token": token,
        "password": new_password
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.request("POST", "/user/signin", None, Some(json!({
        "email_address": "reset@uranus.test",
        "password": PASSWORD
    }))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app.request("POST", "/user/signin", None, Some(json!({
        "email_address": "reset@uranus.test",
        "password": new_password
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.request("POST", "/user/confirm/password", None, Some(json!({
        "token": "not-a-token",
        "password": new_password
    }))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
