use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::access_code::AccessCode;
use crate::error::CoreError;

/// Survey answers as submitted by the results page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackAnswers {
    pub overall_satisfaction: u8,
    pub ease_of_use: u8,
    pub clarity_of_results: u8,
    pub explanation_quality: u8,
    pub wait_time: u8,
    pub recommend_likelihood: u8,
    #[serde(default)]
    pub good_points: String,
    #[serde(default)]
    pub improvements: String,
    #[serde(default)]
    pub comments: String,
}

impl FeedbackAnswers {
    pub const RATING_MIN: u8 = 1;
    pub const RATING_MAX: u8 = 5;
    pub const TEXT_MAX_CHARS: usize = 2000;

    pub fn validate(&self) -> Result<(), CoreError> {
        let ratings = [
            ("overall_satisfaction", self.overall_satisfaction),
            ("ease_of_use", self.ease_of_use),
            ("clarity_of_results", self.clarity_of_results),
            ("explanation_quality", self.explanation_quality),
            ("wait_time", self.wait_time),
            ("recommend_likelihood", self.recommend_likelihood),
        ];
        for (field, value) in ratings {
            if !(Self::RATING_MIN..=Self::RATING_MAX).contains(&value) {
                return Err(CoreError::RatingOutOfRange { field, value });
            }
        }

        let texts = [
            ("good_points", &self.good_points),
            ("improvements", &self.improvements),
            ("comments", &self.comments),
        ];
        for (field, text) in texts {
            if text.chars().count() > Self::TEXT_MAX_CHARS {
                return Err(CoreError::FieldTooLong {
                    field,
                    max: Self::TEXT_MAX_CHARS,
                });
            }
        }

        Ok(())
    }
}

/// A stored survey response. At most one exists per access code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: Uuid,
    pub access_code: AccessCode,
    pub submitted_at: Timestamp,
    #[serde(flatten)]
    pub answers: FeedbackAnswers,
}

impl Feedback {
    /// Validate the answers and stamp them with a fresh id.
    pub fn new(
        access_code: AccessCode,
        answers: FeedbackAnswers,
        submitted_at: Timestamp,
    ) -> Result<Self, CoreError> {
        answers.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            access_code,
            submitted_at,
            answers: FeedbackAnswers {
                good_points: answers.good_points.trim().to_string(),
                improvements: answers.improvements.trim().to_string(),
                comments: answers.comments.trim().to_string(),
                ..answers
            },
        })
    }
}
