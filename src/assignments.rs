//! Teacher-assigned quizzes: creation per class, the student's pending list, opening
//! (which fixes the question list the first time) and one-shot completion.

use rand::Rng;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::assembler::{assemble_by_subject, resolve_questions};
use crate::domain::{Question, QuizAssignment, Subject};
use crate::error::CoreError;
use crate::store::Store;

/// Create one assignment for every student in the teacher's form.
#[instrument(level = "info", skip(store))]
pub fn assign_to_class(store: &dyn Store, teacher_id: &str, subject_id: &str) -> Result<Vec<String>, CoreError> {
  let teacher = store.teacher(teacher_id)?;
  store.subject(subject_id)?;

  let ids: Vec<String> = store
    .students_in_form(&teacher.form)
    .into_iter()
    .map(|student| {
      let id = Uuid::new_v4().to_string();
      store.insert_assignment(QuizAssignment {
        id: id.clone(),
        teacher_id: teacher.id.clone(),
        student_id: student.id,
        subject_id: subject_id.to_string(),
        question_ids: None,
        completed: false,
        score: None,
        total_questions: None,
      });
      id
    })
    .collect();

  info!(target: "quiz", %teacher_id, %subject_id, form = %teacher.form, created = ids.len(), "Quizzes assigned");
  Ok(ids)
}

#[derive(Clone, Debug, PartialEq)]
pub struct PendingQuiz {
  pub quiz_id: String,
  pub subject: Subject,
  pub teacher_id: String,
  pub teacher_name: String,
}

/// Assignments the student has not completed yet.
#[instrument(level = "info", skip(store))]
pub fn pending_for_student(store: &dyn Store, student_id: &str) -> Result<Vec<PendingQuiz>, CoreError> {
  store.student(student_id)?;
  store
    .assignments_for_student(student_id)
    .into_iter()
    .filter(|a| !a.completed)
    .map(|a| {
      let subject = store.subject(&a.subject_id)?;
      let teacher = store.teacher(&a.teacher_id)?;
      Ok(PendingQuiz { quiz_id: a.id, subject, teacher_name: teacher.full_name(), teacher_id: teacher.id })
    })
    .collect()
}

#[derive(Clone, Debug)]
pub struct OpenedQuiz {
  pub quiz_id: String,
  pub subject: Subject,
  pub questions: Vec<Question>,
  /// True when this call chose the questions; false on a replay.
  pub freshly_assembled: bool,
}

/// Return the questions of an assignment, assembling them on first open only. Later opens
/// replay the stored list in the stored order.
#[instrument(level = "info", skip(store, rng))]
pub fn open_assignment<R: Rng + ?Sized>(
  store: &dyn Store,
  student_id: &str,
  quiz_id: &str,
  rng: &mut R,
) -> Result<OpenedQuiz, CoreError> {
  let assignment = store.assignment(quiz_id)?;
  if assignment.student_id != student_id {
    return Err(CoreError::NotAssigned { quiz_id: quiz_id.to_string(), student_id: student_id.to_string() });
  }

  if let Some(ids) = &assignment.question_ids {
    let subject = store.subject(&assignment.subject_id)?;
    let questions = resolve_questions(store, ids)?;
    return Ok(OpenedQuiz { quiz_id: assignment.id, subject, questions, freshly_assembled: false });
  }

  let quiz = assemble_by_subject(store, student_id, &assignment.subject_id, rng)?;
  let chosen = quiz.question_ids();

  // Another open may have materialized the list between our read and now; its choice wins.
  let stored = store.update_assignment(quiz_id, &mut |a| {
    if a.question_ids.is_none() {
      a.question_ids = Some(chosen.clone());
    }
    Ok(())
  })?;

  let ids = stored.question_ids.unwrap_or_default();
  if ids != chosen {
    let questions = resolve_questions(store, &ids)?;
    return Ok(OpenedQuiz { quiz_id: stored.id, subject: quiz.subject, questions, freshly_assembled: false });
  }

  info!(target: "quiz", %quiz_id, %student_id, total = ids.len(), "Assigned quiz materialized");
  Ok(OpenedQuiz { quiz_id: stored.id, subject: quiz.subject, questions: quiz.questions, freshly_assembled: true })
}

/// Mark an assignment completed with its score. Allowed once.
#[instrument(level = "info", skip(store))]
pub fn complete_assignment(
  store: &dyn Store,
  quiz_id: &str,
  score: u32,
  total_questions: u32,
) -> Result<QuizAssignment, CoreError> {
  let done = store.update_assignment(quiz_id, &mut |a| {
    if a.completed {
      return Err(CoreError::AlreadyCompleted(a.id.clone()));
    }
    a.completed = true;
    a.score = Some(score);
    a.total_questions = Some(total_questions);
    Ok(())
  })?;
  info!(target: "quiz", %quiz_id, score, total_questions, "Quiz completed");
  Ok(done)
}
