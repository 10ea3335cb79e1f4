pub mod feedback;
pub mod questionnaire;
pub mod result;
