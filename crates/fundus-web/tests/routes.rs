use std::collections::HashMap;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use jiff::Timestamp;
use jiff::civil::date;
use tower::ServiceExt;

use fundus_core::access_code::AccessCode;
use fundus_core::messages;
use fundus_core::models::questionnaire::Questionnaire;
use fundus_core::models::result::{EyeSide, ResultRecord};
use fundus_export::styles::ReportFont;
use fundus_storage::memory::MemoryStore;
use fundus_web::app;
use fundus_web::config::WebConfig;
use fundus_web::state::AppState;

const CODE: &str = "a1b2c3d4-e5f6";
const EARLIER: &str = "2023-05-01T02:00:00Z";
const LATER: &str = "2024-06-15T01:00:00Z";

fn config(max_failed_attempts: &str) -> WebConfig {
    let vars: HashMap<&str, String> = HashMap::from([
        ("FUNDUS_STORE", "memory".to_string()),
        ("FUNDUS_SESSION_SECRET", "x".repeat(48)),
        ("FUNDUS_COOKIE_SECURE", "false".to_string()),
        ("FUNDUS_MAX_FAILED_ATTEMPTS", max_failed_attempts.to_string()),
        ("FUNDUS_SUPPORT_EMAIL", "support@example.com".to_string()),
        ("FUNDUS_FONT_PATH", "/opt/fonts/ipaexg.ttf".to_string()),
    ]);
    WebConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

fn questionnaire(captured_at: &str) -> Questionnaire {
    Questionnaire {
        access_code: AccessCode::parse(CODE).unwrap(),
        captured_at: captured_at.parse().unwrap(),
        birthdate: date(1990, 6, 15),
        gender: Some("男性".to_string()),
        height_cm: Some(171.0),
        weight_kg: Some(64.5),
        health_status: None,
        image_url_right: None,
        image_url_left: None,
    }
}

fn result(captured_at: &str, eye: EyeSide, glaucoma: f64) -> ResultRecord {
    ResultRecord {
        access_code: AccessCode::parse(CODE).unwrap(),
        captured_at: captured_at.parse().unwrap(),
        eye,
        fundus_age: Some(38),
        glaucoma_risk: Some(glaucoma),
        atherosclerosis_risk: Some(0.4),
        analysis: None,
    }
}

fn router_for(store: MemoryStore, max_failed_attempts: &str) -> Router {
    let state = AppState::new(store, &config(max_failed_attempts), ReportFont::Builtin).unwrap();
    app::router(state)
}

fn app_with(max_failed_attempts: &str) -> Router {
    let store = MemoryStore::new();
    store.insert_questionnaire(questionnaire(EARLIER));
    store.insert_questionnaire(questionnaire(LATER));
    store.insert_result(result(LATER, EyeSide::Left, 0.75));
    store.insert_result(result(LATER, EyeSide::Right, 0.1));
    router_for(store, max_failed_attempts)
}

fn app() -> Router {
    app_with("5")
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, form: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

/// Verify with the correct birthdate and return the `name=value` cookie pair.
async fn login(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(post_form("/verify", &format!("uuid={CODE}&birthdate=1990-06-15"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let set_cookie = response.headers()[SET_COOKIE].to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn health_check_returns_ok() {
    let response = app().oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("ok"));
}

#[tokio::test]
async fn missing_access_code_shows_error_page() {
    let response = app().oneshot(get("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains(messages::MISSING_ACCESS_CODE));
}

#[tokio::test]
async fn unverified_visit_shows_gate_form() {
    let response = app()
        .oneshot(get(&format!("/?uuid={CODE}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("action=\"/verify\""));
    assert!(body.contains(CODE));
    assert!(!body.contains(messages::DISCLAIMER[0]));
}

#[tokio::test]
async fn correct_birthdate_sets_session_and_redirects() {
    let app = app();
    let response = app
        .clone()
        .oneshot(post_form(
            "/verify",
            &format!("uuid={CODE}&timestamp={EARLIER}&birthdate=1990-06-15"),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()[LOCATION].to_str().unwrap();
    assert_eq!(location, format!("/?uuid={CODE}&timestamp={EARLIER}"));
    let cookie = response.headers()[SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("fundus_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(!cookie.contains("Secure"));
}

#[tokio::test]
async fn wrong_birthdate_and_unknown_code_look_the_same() {
    let app = app();
    let wrong = app
        .clone()
        .oneshot(post_form("/verify", &format!("uuid={CODE}&birthdate=1990-06-16"), None))
        .await
        .unwrap();
    let unknown = app
        .clone()
        .oneshot(post_form("/verify", "uuid=no-such-code&birthdate=1990-06-15", None))
        .await
        .unwrap();

    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert!(wrong.headers().get(SET_COOKIE).is_none());

    let wrong = body_text(wrong).await;
    let unknown = body_text(unknown).await;
    for body in [&wrong, &unknown] {
        assert!(body.contains(messages::NO_MATCH));
        assert!(body.contains("support@example.com"));
    }
}

#[tokio::test]
async fn empty_birthdate_is_rejected_without_lookup() {
    let response = app()
        .oneshot(post_form("/verify", &format!("uuid={CODE}&birthdate="), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains(messages::BIRTHDATE_REQUIRED));
}

#[tokio::test]
async fn repeated_failures_lock_the_code() {
    let app = app_with("2");
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(post_form("/verify", &format!("uuid={CODE}&birthdate=2000-01-01"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // Even the correct birthdate is refused while locked.
    let response = app
        .clone()
        .oneshot(post_form("/verify", &format!("uuid={CODE}&birthdate=1990-06-15"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(body_text(response).await.contains(messages::TOO_MANY_ATTEMPTS));
}

#[tokio::test]
async fn verified_visit_shows_latest_results() {
    let app = app();
    let cookie = login(&app).await;

    let response = app
        .clone()
        .oneshot(get(&format!("/?uuid={CODE}"), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains(messages::DISCLAIMER[0]));
    assert!(body.contains("緑内障リスク（左目）"));
    assert!(body.contains("リスク：高"));
    assert!(body.contains("動脈硬化リスク（両眼）"));
    assert!(body.contains("過去の結果"));
    assert!(body.contains("report.pdf?uuid="));
}

#[tokio::test]
async fn older_session_without_results_is_pending() {
    let app = app();
    let cookie = login(&app).await;

    let response = app
        .clone()
        .oneshot(get(&format!("/?uuid={CODE}&timestamp={EARLIER}"), Some(&cookie)))
        .await
        .unwrap();
    let body = body_text(response).await;
    assert!(body.contains(messages::ANALYSIS_PENDING));
    assert!(!body.contains("緑内障リスク"));
}

#[tokio::test]
async fn unknown_timestamp_does_not_fall_back_to_latest() {
    let app = app();
    let cookie = login(&app).await;

    for ts in ["2001-01-01T00:00:00Z", "not-a-time"] {
        let response = app
            .clone()
            .oneshot(get(&format!("/?uuid={CODE}&timestamp={ts}"), Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains(messages::HISTORY_NOT_FOUND));
        assert!(!body.contains("緑内障リスク"));
    }
}

#[tokio::test]
async fn unknown_timestamp_still_links_a_lone_entry() {
    let store = MemoryStore::new();
    store.insert_questionnaire(questionnaire(LATER));
    let app = router_for(store, "5");
    let cookie = login(&app).await;

    let response = app
        .clone()
        .oneshot(get(
            &format!("/?uuid={CODE}&timestamp=2001-01-01T00:00:00Z"),
            Some(&cookie),
        ))
        .await
        .unwrap();
    let body = body_text(response).await;
    assert!(body.contains(messages::HISTORY_NOT_FOUND));
    assert!(body.contains("過去の結果"));
    assert!(body.contains(&format!("timestamp={LATER}")));
}

#[tokio::test]
async fn session_does_not_cover_other_codes() {
    let app = app();
    let cookie = login(&app).await;

    let response = app
        .clone()
        .oneshot(get("/?uuid=someone-else", Some(&cookie)))
        .await
        .unwrap();
    let body = body_text(response).await;
    assert!(body.contains("action=\"/verify\""));
    assert!(!body.contains(messages::DISCLAIMER[0]));
}

#[tokio::test]
async fn tampered_cookie_is_ignored() {
    let app = app();
    let cookie = login(&app).await;
    let tampered = format!("{cookie}x");

    let response = app
        .clone()
        .oneshot(get(&format!("/?uuid={CODE}"), Some(&tampered)))
        .await
        .unwrap();
    assert!(body_text(response).await.contains("action=\"/verify\""));
}

#[tokio::test]
async fn pdf_requires_a_session() {
    let response = app()
        .oneshot(get(&format!("/report.pdf?uuid={CODE}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn pdf_download_for_verified_caller() {
    let app = app();
    let cookie = login(&app).await;

    let response = app
        .clone()
        .oneshot(get(&format!("/report.pdf?uuid={CODE}&timestamp={LATER}"), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/pdf");
    let disposition = response.headers()["content-disposition"].to_str().unwrap();
    assert!(disposition.contains(&format!("result_{CODE}.pdf")));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn pdf_for_unknown_session_is_not_found() {
    let app = app();
    let cookie = login(&app).await;

    let response = app
        .clone()
        .oneshot(get(
            &format!("/report.pdf?uuid={CODE}&timestamp=2001-01-01T00:00:00Z"),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_results_returns_report_json() {
    let app = app();
    let cookie = login(&app).await;

    let response = app
        .clone()
        .oneshot(get(&format!("/api/results?uuid={CODE}"), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["history"].as_array().unwrap().len(), 2);
    assert_eq!(json["history"][0]["selected"], true);
    assert_eq!(json["report"]["pending"], false);
    assert_eq!(json["report"]["atherosclerosis"]["band"], "medium");
}

#[tokio::test]
async fn api_results_without_session_is_json_error() {
    let response = app()
        .oneshot(get(&format!("/api/results?uuid={CODE}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["error"], messages::SESSION_EXPIRED);
}

const SURVEY: &str = "overall_satisfaction=5&ease_of_use=4&clarity_of_results=4\
    &explanation_quality=3&wait_time=5&recommend_likelihood=4&comments=%E8%89%AF%E3%81%84";

#[tokio::test]
async fn feedback_is_accepted_once_per_code() {
    let app = app();
    let cookie = login(&app).await;
    let form = format!("uuid={CODE}&{SURVEY}");

    let first = app
        .clone()
        .oneshot(post_form("/feedback", &form, Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let body = body_text(first).await;
    assert!(body.contains(messages::FEEDBACK_THANKS));
    assert!(!body.contains("action=\"/feedback\""));

    let second = app
        .clone()
        .oneshot(post_form("/feedback", &form, Some(&cookie)))
        .await
        .unwrap();
    let body = body_text(second).await;
    assert!(body.contains(messages::FEEDBACK_ALREADY_SUBMITTED));
    assert!(!body.contains(messages::FEEDBACK_THANKS));
}

#[tokio::test]
async fn incomplete_feedback_is_not_stored() {
    let app = app();
    let cookie = login(&app).await;

    let response = app
        .clone()
        .oneshot(post_form(
            "/feedback",
            &format!("uuid={CODE}&overall_satisfaction=5"),
            Some(&cookie),
        ))
        .await
        .unwrap();
    let body = body_text(response).await;
    assert!(body.contains(messages::FEEDBACK_INVALID));
    assert!(body.contains("action=\"/feedback\""));
}

#[tokio::test]
async fn out_of_range_rating_is_rejected() {
    let app = app();
    let cookie = login(&app).await;
    let form = format!("uuid={CODE}&{}", SURVEY.replace("wait_time=5", "wait_time=9"));

    let response = app
        .clone()
        .oneshot(post_form("/feedback", &form, Some(&cookie)))
        .await
        .unwrap();
    assert!(body_text(response).await.contains(messages::FEEDBACK_INVALID));
}

#[tokio::test]
async fn feedback_requires_a_session() {
    let response = app()
        .oneshot(post_form("/feedback", &format!("uuid={CODE}&{SURVEY}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_clears_the_cookie() {
    let response = app()
        .oneshot(post_form("/logout", &format!("uuid={CODE}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], format!("/?uuid={CODE}").as_str());
    let cookie = response.headers()[SET_COOKIE].to_str().unwrap();
    assert!(cookie.contains("Max-Age=0"));
}

#[test]
fn sessions_expire() {
    use fundus_web::session::SessionKeys;
    use jiff::SignedDuration;

    let keys = SessionKeys::new(&[7u8; 32], SignedDuration::from_mins(30), true);
    let code = AccessCode::parse(CODE).unwrap();

    let fresh = keys.issue(&code, Timestamp::now()).unwrap();
    assert_eq!(keys.verify(&fresh).unwrap().sub, CODE);

    let stale = keys
        .issue(&code, Timestamp::now() - SignedDuration::from_hours(2))
        .unwrap();
    assert!(keys.verify(&stale).is_none());
    assert!(keys.set_cookie(&fresh).ends_with("; Secure"));
}
