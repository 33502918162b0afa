//! Public protocol structs for the HTTP endpoints (serde ready).
//! Field names are what the quiz frontend reads; keep them stable.

use serde::{Deserialize, Serialize};

use crate::assembler::QUIZ_TYPE_ASSIGNED;
use crate::assignments::PendingQuiz;
use crate::domain::{MasteryRecord, Question};

#[derive(Debug, Deserialize)]
pub struct AnswerIn {
    pub student_id: String,
    pub question_id: String,
    pub selected_answer: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerOut {
    pub correct: bool,
    pub correct_answer: String,
    pub p_known: f64,
}

#[derive(Debug, Deserialize)]
pub struct MasteryQuery {
    pub student_id: String,
    pub subject_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MasteryOut {
    pub student_id: String,
    pub subject_id: String,
    pub subtopic_id: String,
    pub p_known: f64,
}

impl From<MasteryRecord> for MasteryOut {
    fn from(r: MasteryRecord) -> Self {
        Self { student_id: r.student_id, subject_id: r.subject_id, subtopic_id: r.subtopic_id, p_known: r.p_known }
    }
}

#[derive(Debug, Deserialize)]
pub struct AdaptiveQuizQuery {
    pub student_id: String,
    pub subject_id: String,
}

#[derive(Debug, Deserialize)]
pub struct OpenQuizQuery {
    pub student_id: String,
    pub quiz_id: String,
}

/// A question as shown to the student: the correct answer is withheld.
#[derive(Debug, Serialize)]
pub struct QuestionOut {
    pub question_id: String,
    pub question_text: String,
    pub answer_1: String,
    pub answer_2: String,
    pub answer_3: String,
    pub answer_4: String,
}

impl From<&Question> for QuestionOut {
    fn from(q: &Question) -> Self {
        let [a1, a2, a3, a4] = q.answers.clone();
        Self {
            question_id: q.id.clone(),
            question_text: q.text.clone(),
            answer_1: a1,
            answer_2: a2,
            answer_3: a3,
            answer_4: a4,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuizOut {
    pub questions: Vec<QuestionOut>,
    pub total_questions: usize,
    pub subject_name: String,
    pub quiz_type: &'static str,
}

pub fn to_quiz_out(subject_name: &str, questions: &[Question]) -> QuizOut {
    QuizOut {
        questions: questions.iter().map(QuestionOut::from).collect(),
        total_questions: questions.len(),
        subject_name: subject_name.to_string(),
        quiz_type: QUIZ_TYPE_ASSIGNED,
    }
}

#[derive(Debug, Deserialize)]
pub struct AssignIn {
    pub teacher_id: String,
    pub subject_id: String,
}

#[derive(Debug, Serialize)]
pub struct AssignOut {
    pub quiz_ids: Vec<String>,
    pub teacher_id: String,
}

#[derive(Debug, Deserialize)]
pub struct StudentQuery {
    pub student_id: String,
}

#[derive(Debug, Serialize)]
pub struct PendingQuizOut {
    pub quiz_id: String,
    pub subject_id: String,
    pub subject_name: String,
    pub teacher_id: String,
    pub teacher_name: String,
}

impl From<PendingQuiz> for PendingQuizOut {
    fn from(p: PendingQuiz) -> Self {
        Self {
            quiz_id: p.quiz_id,
            subject_id: p.subject.id,
            subject_name: p.subject.name,
            teacher_id: p.teacher_id,
            teacher_name: p.teacher_name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PendingOut {
    pub assigned_quizzes: Vec<PendingQuizOut>,
    pub total_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct CompleteIn {
    // Older frontends send `assigned_quiz_id`.
    #[serde(alias = "assigned_quiz_id")]
    pub quiz_id: String,
    pub score: u32,
    pub total_questions: u32,
}

#[derive(Debug, Serialize)]
pub struct CompleteOut {
    pub quiz_id: String,
    pub score: u32,
    pub total_questions: u32,
}

#[derive(Debug, Deserialize)]
pub struct TeacherQuery {
    pub teacher_id: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
