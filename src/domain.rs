//! Domain models: curriculum (subjects, subtopics, questions), people, BKT parameters,
//! per-subtopic mastery records and quiz assignments.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Subject {
  pub id: String,
  pub name: String,
}

/// A subtopic sits under exactly one subject. Mastery is tracked at this grain.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Subtopic {
  pub id: String,
  pub name: String,
  pub subject: String,
}

/// Immutable multiple-choice item. `correct_answer` is compared as opaque text.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
  pub id: String,
  pub subject: String,
  pub subtopic: String,
  pub text: String,
  pub answers: [String; 4],
  pub correct_answer: String,
}

impl Question {
  pub fn is_correct(&self, selected_answer: &str) -> bool {
    selected_answer == self.correct_answer
  }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Student {
  pub id: String,
  pub first_name: String,
  pub surname: String,
  /// Class group, e.g. "10A". Teachers assign quizzes to a whole form.
  pub form: String,
}

impl Student {
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.surname)
  }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Teacher {
  pub id: String,
  pub first_name: String,
  pub surname: String,
  pub form: String,
  #[serde(default)] pub subject: Option<String>,
}

impl Teacher {
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.surname)
  }
}

/// The four fixed BKT parameters. Set once at provisioning, never touched by updates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BktParams {
  /// Prior probability the skill is already known.
  pub p_init: f64,
  /// Probability of moving from unknown to known after one opportunity.
  #[serde(alias = "p_will_learn")]
  pub p_learn: f64,
  pub p_slip: f64,
  pub p_guess: f64,
}

impl BktParams {
  pub fn validate(&self) -> Result<(), CoreError> {
    for (name, value) in [
      ("p_init", self.p_init),
      ("p_learn", self.p_learn),
      ("p_slip", self.p_slip),
      ("p_guess", self.p_guess),
    ] {
      if !(0.0..=1.0).contains(&value) {
        return Err(CoreError::InvalidProbability { name, value });
      }
    }
    Ok(())
  }
}

impl Default for BktParams {
  fn default() -> Self {
    // Four-option multiple choice: a blind guess lands 25% of the time.
    Self { p_init: 0.3, p_learn: 0.2, p_slip: 0.1, p_guess: 0.25 }
  }
}

/// Persisted BKT state for one (student, subtopic) pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MasteryRecord {
  pub student_id: String,
  pub subtopic_id: String,
  pub subject_id: String,
  pub params: BktParams,
  pub p_known: f64,
  /// Bumped by the store on every successful save; used for compare-and-swap.
  pub version: u64,
}

impl MasteryRecord {
  /// Fresh record at enrollment time: `p_known` starts at the prior.
  pub fn provision(student_id: &str, subtopic: &Subtopic, params: BktParams) -> Self {
    Self {
      student_id: student_id.to_string(),
      subtopic_id: subtopic.id.clone(),
      subject_id: subtopic.subject.clone(),
      params,
      p_known: params.p_init,
      version: 0,
    }
  }
}

/// A quiz a teacher assigned to one student for one subject.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuizAssignment {
  pub id: String,
  pub teacher_id: String,
  pub student_id: String,
  pub subject_id: String,
  /// Chosen once, on first open. `None` until then.
  #[serde(default)] pub question_ids: Option<Vec<String>>,
  pub completed: bool,
  #[serde(default)] pub score: Option<u32>,
  #[serde(default)] pub total_questions: Option<u32>,
}
