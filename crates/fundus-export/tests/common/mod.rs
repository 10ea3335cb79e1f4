use fundus_core::access_code::AccessCode;
use fundus_core::models::questionnaire::Questionnaire;
use fundus_core::models::result::{EyeSide, ResultRecord};
use fundus_core::report::ScreeningReport;
use jiff::civil::date;
use jiff::tz::TimeZone;

pub fn questionnaire() -> Questionnaire {
    Questionnaire {
        access_code: AccessCode::parse("9f1c2e7a-0b3d-4c55").unwrap(),
        captured_at: "2024-06-15T01:00:00Z".parse().unwrap(),
        birthdate: date(1984, 1, 1),
        gender: Some("女性".to_string()),
        height_cm: Some(160.0),
        weight_kg: None,
        health_status: None,
        image_url_right: Some("https://images.example.com/r.jpg".to_string()),
        image_url_left: None,
    }
}

pub fn analysed_report() -> ScreeningReport {
    let q = questionnaire();
    let left = ResultRecord {
        access_code: q.access_code.clone(),
        captured_at: q.captured_at,
        eye: EyeSide::Left,
        fundus_age: Some(43),
        glaucoma_risk: Some(0.5),
        atherosclerosis_risk: Some(0.2),
        analysis: None,
    };
    let right = ResultRecord {
        eye: EyeSide::Right,
        fundus_age: Some(39),
        glaucoma_risk: Some(0.1),
        atherosclerosis_risk: Some(0.8),
        ..left.clone()
    };
    ScreeningReport::build(&q, &[left, right], date(2024, 6, 15), &TimeZone::UTC)
}

pub fn pending_report() -> ScreeningReport {
    ScreeningReport::build(&questionnaire(), &[], date(2024, 6, 15), &TimeZone::UTC)
}

/// Analysed report whose questionnaire references only the chosen eyes.
pub fn report_with_images(right: bool, left: bool) -> ScreeningReport {
    let mut q = questionnaire();
    q.image_url_right = right.then(|| "https://images.example.com/r.png".to_string());
    q.image_url_left = left.then(|| "https://images.example.com/l.png".to_string());
    ScreeningReport::build(&q, &[], date(2024, 6, 15), &TimeZone::UTC)
}
