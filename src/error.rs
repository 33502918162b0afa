//! Error taxonomy for the mastery/quiz core and its HTTP mapping.
//!
//! Degenerate BKT denominators, short question pools and empty cohorts are handled where
//! they occur and never show up here.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
  #[error("{entity} not found: {id}")]
  NotFound { entity: &'static str, id: String },

  #[error("no mastery record for student {student_id} in subtopic {subtopic_id}")]
  MasteryRecordNotFound { student_id: String, subtopic_id: String },

  #[error("mastery record for student {student_id} in subtopic {subtopic_id} changed since it was read")]
  VersionConflict { student_id: String, subtopic_id: String },

  #[error("gave up updating mastery record for student {student_id} in subtopic {subtopic_id} after {attempts} attempts")]
  Contended { student_id: String, subtopic_id: String, attempts: usize },

  #[error("quiz {0} is already completed")]
  AlreadyCompleted(String),

  #[error("quiz {quiz_id} is not assigned to student {student_id}")]
  NotAssigned { quiz_id: String, student_id: String },

  #[error("teacher {0} has no subject")]
  NoSubject(String),

  #[error("{name} must be a probability in [0, 1], got {value}")]
  InvalidProbability { name: &'static str, value: f64 },
}

impl CoreError {
  pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
    Self::NotFound { entity, id: id.into() }
  }

  fn status_and_code(&self) -> (StatusCode, &'static str) {
    match self {
      Self::NotFound { .. } | Self::MasteryRecordNotFound { .. } | Self::NoSubject(_) => {
        (StatusCode::NOT_FOUND, "NOT_FOUND")
      }
      Self::VersionConflict { .. } | Self::Contended { .. } => (StatusCode::CONFLICT, "CONTENDED"),
      Self::AlreadyCompleted(_) => (StatusCode::CONFLICT, "ALREADY_COMPLETED"),
      Self::NotAssigned { .. } => (StatusCode::FORBIDDEN, "NOT_ASSIGNED"),
      Self::InvalidProbability { .. } => (StatusCode::BAD_REQUEST, "INVALID_PROBABILITY"),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ErrorOut {
  pub error: String,
  pub code: &'static str,
}

impl IntoResponse for CoreError {
  fn into_response(self) -> Response {
    let (status, code) = self.status_and_code();
    (status, Json(ErrorOut { error: self.to_string(), code })).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn not_found_maps_to_404() {
    let resp = CoreError::not_found("student", "s9").into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[test]
  fn completion_twice_is_a_conflict() {
    let resp = CoreError::AlreadyCompleted("q1".into()).into_response();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
  }

  #[test]
  fn message_names_the_missing_record() {
    let err = CoreError::MasteryRecordNotFound { student_id: "s1".into(), subtopic_id: "alg".into() };
    assert_eq!(err.to_string(), "no mastery record for student s1 in subtopic alg");
  }
}
