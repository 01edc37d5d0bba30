mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};

#[tokio::test]
async fn localized_type_tables_default_to_german() {
    let app = TestApp::new().await;

    let types = parse_body(app.get("/event/type").await).await;
    let names: Vec<&str> = types.as_array().unwrap().iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Ausstellung", "Konzert", "Lesung", "Theater"]);

    let types = parse_body(app.get("/genre/type?lang=en").await).await;
    assert_eq!(types.as_array().unwrap().len(), 3);
    assert!(types.as_array().unwrap().iter().all(|t| t["iso_639_1"] == "en"));

    let res = app.get("/space/type?lang=deutsch").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn image_and_license_types_span_all_locales_without_lang() {
    let app = TestApp::new().await;

    let all = parse_body(app.get("/image/type").await).await;
    assert_eq!(all.as_array().unwrap().len(), 4);
    let english = parse_body(app.get("/image/type?lang=en").await).await;
    assert_eq!(english.as_array().unwrap().len(), 2);

    let licenses = parse_body(app.get("/license/type").await).await;
    assert_eq!(licenses.as_array().unwrap().len(), 2);
    assert_eq!(licenses[0]["license_type_short_name"], "CC BY 4.0");

    let locales = parse_body(app.get("/locale/type").await).await;
    assert_eq!(locales.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn countries_and_states() {
    let app = TestApp::new().await;

    let countries = parse_body(app.get("/country/code?code=deu").await).await;
    assert_eq!(countries[0]["country_name"], "Deutschland");

    let country = parse_body(app.get("/country/name?name=Danmark").await).await;
    assert_eq!(country["country_code"], "DNK");
    assert_eq!(app.get("/country/name?name=Atlantis").await.status(), StatusCode::NOT_FOUND);

    let states = parse_body(app.get("/state").await).await;
    assert_eq!(states.as_array().unwrap().len(), 3);

    let state = parse_body(app.get("/state/code?code=sh").await).await;
    assert_eq!(state["state_name"], "Schleswig-Holstein");
    assert_eq!(state["state_country_code"], "DEU");

    let roles = parse_body(app.get("/user/role").await).await;
    assert_eq!(roles[0]["name"], "admin");
}

#[tokio::test]
async fn health_check_answers() {
    let app = TestApp::new().await;
    let res = app.get("/health").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["status"], "ok");
}
