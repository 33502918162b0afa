//! Loading the curriculum (subjects, subtopics, questions, people, enrollment) and
//! service knobs from TOML.
//!
//! See `CurriculumConfig` for the expected schema. Every table is optional; an empty file
//! yields an empty curriculum with default BKT parameters.

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::BktParams;
use crate::report::ReportScope;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct CurriculumConfig {
  /// Parameters given to every mastery record created at enrollment.
  #[serde(default)]
  pub bkt: BktParams,
  #[serde(default)]
  pub report: ReportScope,
  #[serde(default)]
  pub quiz: QuizCfg,
  #[serde(default)]
  pub subjects: Vec<SubjectCfg>,
  #[serde(default)]
  pub subtopics: Vec<SubtopicCfg>,
  #[serde(default)]
  pub questions: Vec<QuestionCfg>,
  #[serde(default)]
  pub students: Vec<StudentCfg>,
  #[serde(default)]
  pub teachers: Vec<TeacherCfg>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct QuizCfg {
  /// Fixed rng seed for assembly. Unset means a fresh entropy seed at startup.
  #[serde(default)] pub seed: Option<u64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SubjectCfg {
  pub id: String,
  pub name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SubtopicCfg {
  pub id: String,
  pub name: String,
  pub subject: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct QuestionCfg {
  pub id: String,
  pub subject: String,
  pub subtopic: String,
  pub text: String,
  pub answers: [String; 4],
  pub correct_answer: String,
}

/// A student and the subjects they are enrolled in. Enrollment provisions one mastery
/// record per subtopic of each listed subject.
#[derive(Clone, Debug, Deserialize)]
pub struct StudentCfg {
  pub id: String,
  pub first_name: String,
  pub surname: String,
  pub form: String,
  #[serde(default)] pub subjects: Vec<String>,
  /// Overrides `[bkt]` for this student's records.
  #[serde(default)] pub bkt: Option<BktParams>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TeacherCfg {
  pub id: String,
  pub first_name: String,
  pub surname: String,
  pub form: String,
  #[serde(default)] pub subject: Option<String>,
}

impl CurriculumConfig {
  pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
    toml::from_str(s)
  }
}

/// Attempt to load `CurriculumConfig` from CURRICULUM_PATH. On any parsing/IO error, returns None.
pub fn load_curriculum_from_env() -> Option<CurriculumConfig> {
  let path = std::env::var("CURRICULUM_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match CurriculumConfig::from_toml_str(&s) {
      Ok(cfg) => {
        info!(target: "adaptive_quiz", %path, "Loaded curriculum (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "adaptive_quiz", %path, error = %e, "Failed to parse curriculum TOML");
        None
      }
    },
    Err(e) => {
      error!(target: "adaptive_quiz", %path, error = %e, "Failed to read curriculum file");
      None
    }
  }
}
