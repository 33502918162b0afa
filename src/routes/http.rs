//! HTTP endpoint handlers. These are thin wrappers that forward to the core modules.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use axum::{extract::{State, Query}, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::assignments::{assign_to_class, complete_assignment, open_assignment, pending_for_student};
use crate::error::CoreError;
use crate::protocol::*;
use crate::report::{class_report, class_roster, ClassReport, ClassRoster};
use crate::state::AppState;
use crate::store::{MasteryFilter, Store};
use crate::{assembler, tracker};

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state, body), fields(%body.student_id, %body.question_id))]
pub async fn http_post_answer(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AnswerIn>,
) -> Result<Json<AnswerOut>, CoreError> {
  let out = tracker::record_answer(state.store.as_ref(), &body.student_id, &body.question_id, &body.selected_answer)?;
  info!(target: "mastery", student_id = %body.student_id, question_id = %body.question_id, correct = out.correct, p_known = out.p_known, "HTTP answer recorded");
  Ok(Json(AnswerOut { correct: out.correct, correct_answer: out.correct_answer, p_known: out.p_known }))
}

#[instrument(level = "info", skip(state), fields(%q.student_id))]
pub async fn http_get_mastery(
  State(state): State<Arc<AppState>>,
  Query(q): Query<MasteryQuery>,
) -> Result<Json<Vec<MasteryOut>>, CoreError> {
  state.store.student(&q.student_id)?;
  let mut filter = MasteryFilter::student(&q.student_id);
  if let Some(subject_id) = &q.subject_id {
    filter = filter.with_subject(subject_id);
  }
  let records = state.store.mastery_records(&filter);
  Ok(Json(records.into_iter().map(MasteryOut::from).collect()))
}

#[instrument(level = "info", skip(state), fields(%q.student_id, %q.subject_id))]
pub async fn http_get_adaptive_quiz(
  State(state): State<Arc<AppState>>,
  Query(q): Query<AdaptiveQuizQuery>,
) -> Result<Json<QuizOut>, CoreError> {
  let quiz = {
    let mut rng = state.rng.lock();
    assembler::assemble_by_subject(state.store.as_ref(), &q.student_id, &q.subject_id, &mut *rng)?
  };
  info!(target: "quiz", student_id = %q.student_id, subject_id = %q.subject_id, total = quiz.questions.len(), "HTTP adaptive quiz served");
  Ok(Json(to_quiz_out(&quiz.subject.name, &quiz.questions)))
}

#[instrument(level = "info", skip(state, body), fields(%body.teacher_id, %body.subject_id))]
pub async fn http_post_assign(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AssignIn>,
) -> Result<Json<AssignOut>, CoreError> {
  let quiz_ids = assign_to_class(state.store.as_ref(), &body.teacher_id, &body.subject_id)?;
  Ok(Json(AssignOut { quiz_ids, teacher_id: body.teacher_id }))
}

#[instrument(level = "info", skip(state), fields(%q.student_id))]
pub async fn http_get_pending(
  State(state): State<Arc<AppState>>,
  Query(q): Query<StudentQuery>,
) -> Result<Json<PendingOut>, CoreError> {
  let assigned_quizzes: Vec<PendingQuizOut> = pending_for_student(state.store.as_ref(), &q.student_id)?
    .into_iter()
    .map(PendingQuizOut::from)
    .collect();
  let total_count = assigned_quizzes.len();
  Ok(Json(PendingOut { assigned_quizzes, total_count }))
}

#[instrument(level = "info", skip(state), fields(%q.student_id, %q.quiz_id))]
pub async fn http_get_open_quiz(
  State(state): State<Arc<AppState>>,
  Query(q): Query<OpenQuizQuery>,
) -> Result<Json<QuizOut>, CoreError> {
  let opened = {
    let mut rng = state.rng.lock();
    open_assignment(state.store.as_ref(), &q.student_id, &q.quiz_id, &mut *rng)?
  };
  info!(target: "quiz", quiz_id = %q.quiz_id, fresh = opened.freshly_assembled, total = opened.questions.len(), "HTTP assigned quiz served");
  Ok(Json(to_quiz_out(&opened.subject.name, &opened.questions)))
}

#[instrument(level = "info", skip(state, body), fields(%body.quiz_id))]
pub async fn http_post_complete(
  State(state): State<Arc<AppState>>,
  Json(body): Json<CompleteIn>,
) -> Result<Json<CompleteOut>, CoreError> {
  let done = complete_assignment(state.store.as_ref(), &body.quiz_id, body.score, body.total_questions)?;
  Ok(Json(CompleteOut {
    quiz_id: done.id,
    score: done.score.unwrap_or(body.score),
    total_questions: done.total_questions.unwrap_or(body.total_questions),
  }))
}

#[instrument(level = "info", skip(state), fields(%q.teacher_id))]
pub async fn http_get_roster(
  State(state): State<Arc<AppState>>,
  Query(q): Query<TeacherQuery>,
) -> Result<Json<ClassRoster>, CoreError> {
  Ok(Json(class_roster(state.store.as_ref(), &q.teacher_id)?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_progress(State(state): State<Arc<AppState>>) -> Json<Vec<ClassReport>> {
  let report = class_report(state.store.as_ref(), state.report_scope);
  info!(target: "report", subjects = report.len(), scope_to_subject = state.report_scope.scope_to_subject, "HTTP progress report served");
  Json(report)
}
