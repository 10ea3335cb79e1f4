use fundus_core::access_code::AccessCode;
use fundus_core::models::feedback::{Feedback, FeedbackAnswers};
use fundus_core::models::questionnaire::Questionnaire;
use fundus_core::models::result::{EyeSide, ResultRecord};
use fundus_storage::error::StorageError;
use fundus_storage::memory::{MemoryStore, SeedData};
use fundus_storage::store::RecordStore;
use jiff::Timestamp;
use jiff::civil::date;

fn code(s: &str) -> AccessCode {
    AccessCode::parse(s).unwrap()
}

fn ts(s: &str) -> Timestamp {
    s.parse().unwrap()
}

fn questionnaire(c: &str, captured_at: &str) -> Questionnaire {
    Questionnaire {
        access_code: code(c),
        captured_at: ts(captured_at),
        birthdate: date(1990, 6, 15),
        gender: None,
        height_cm: None,
        weight_kg: None,
        health_status: None,
        image_url_right: None,
        image_url_left: None,
    }
}

fn result(c: &str, captured_at: &str, eye: EyeSide) -> ResultRecord {
    ResultRecord {
        access_code: code(c),
        captured_at: ts(captured_at),
        eye,
        fundus_age: Some(40),
        glaucoma_risk: None,
        atherosclerosis_risk: None,
        analysis: None,
    }
}

fn feedback(c: &str) -> Feedback {
    Feedback::new(
        code(c),
        FeedbackAnswers {
            overall_satisfaction: 4,
            ease_of_use: 4,
            clarity_of_results: 4,
            explanation_quality: 4,
            wait_time: 4,
            recommend_likelihood: 4,
            good_points: String::new(),
            improvements: String::new(),
            comments: String::new(),
        },
        ts("2024-06-15T00:00:00Z"),
    )
    .unwrap()
}

#[tokio::test]
async fn questionnaires_are_filtered_by_code() {
    let store = MemoryStore::from_seed(SeedData {
        questionnaires: vec![
            questionnaire("abc", "2024-01-01T00:00:00Z"),
            questionnaire("abc", "2024-02-01T00:00:00Z"),
            questionnaire("xyz", "2024-01-01T00:00:00Z"),
        ],
        ..SeedData::default()
    });

    assert_eq!(store.questionnaires(&code("abc")).await.unwrap().len(), 2);
    assert_eq!(store.questionnaires(&code("xyz")).await.unwrap().len(), 1);
    assert!(store.questionnaires(&code("nope")).await.unwrap().is_empty());
}

#[tokio::test]
async fn results_are_filtered_by_code_and_session() {
    let store = MemoryStore::new();
    store.insert_result(result("abc", "2024-01-01T00:00:00Z", EyeSide::Left));
    store.insert_result(result("abc", "2024-01-01T00:00:00Z", EyeSide::Right));
    store.insert_result(result("abc", "2024-02-01T00:00:00Z", EyeSide::Left));

    let rows = store
        .results(&code("abc"), ts("2024-01-01T00:00:00Z"))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);

    let rows = store
        .results(&code("abc"), ts("2024-03-01T00:00:00Z"))
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn feedback_is_inserted_once_per_code() {
    let store = MemoryStore::new();
    assert!(!store.feedback_exists(&code("abc")).await.unwrap());

    store.insert_feedback(&feedback("abc")).await.unwrap();
    assert!(store.feedback_exists(&code("abc")).await.unwrap());
    assert!(store.feedback(&code("abc")).is_some());

    let second = store.insert_feedback(&feedback("abc")).await;
    assert!(matches!(second, Err(StorageError::AlreadyExists { .. })));

    store.insert_feedback(&feedback("xyz")).await.unwrap();
}

#[test]
fn seed_file_round_trips_through_json() {
    let dir = std::env::temp_dir().join(format!("fundus-seed-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("seed.json");
    std::fs::write(
        &path,
        r#"{
            "questionnaires": [{
                "access_code": "abc",
                "captured_at": "2024-01-01T00:00:00Z",
                "birthdate": "1990-06-15",
                "gender": "男性"
            }],
            "results": [{
                "access_code": "abc",
                "captured_at": "2024-01-01T00:00:00Z",
                "eye": "left",
                "analysis": "{\"glaucoma_risk\": 0.4}"
            }]
        }"#,
    )
    .unwrap();

    let store = MemoryStore::load_seed_file(&path).unwrap();
    let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let rows = rt.block_on(store.questionnaires(&code("abc"))).unwrap();
    assert_eq!(rows[0].gender.as_deref(), Some("男性"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_seed_file_is_an_error() {
    let err = MemoryStore::load_seed_file(std::path::Path::new("/nonexistent/seed.json"));
    assert!(matches!(err, Err(StorageError::Seed(_))));
}
