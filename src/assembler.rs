//! Adaptive quiz assembly.
//!
//! Weaker subtopics get more questions: each subtopic's `p_known` picks a target count,
//! that many questions are drawn at random from the subtopic's pool, and the combined list
//! is shuffled once more so position says nothing about subtopic. Two calls on the same
//! state can differ in order and, when pools exceed targets, in content. Pass a seeded rng
//! for reproducible output.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, instrument, warn};

use crate::domain::{Question, Subject};
use crate::error::CoreError;
use crate::store::Store;

pub const QUIZ_TYPE_ASSIGNED: &str = "assigned";

/// Questions to draw for a subtopic at the given mastery.
///
/// `p ≤ 0.4` → 3, `0.4 < p < 0.8` → 2, `p ≥ 0.8` → 1.
pub fn question_target(p_known: f64) -> usize {
    if p_known <= 0.4 {
        3
    } else if p_known < 0.8 {
        2
    } else {
        1
    }
}

/// Per-subtopic selection, kept for logging and for callers that care about shortfalls.
#[derive(Clone, Debug, PartialEq)]
pub struct SubtopicDraw {
    pub subtopic_id: String,
    pub p_known: f64,
    pub target: usize,
    pub available: usize,
    pub taken: usize,
}

impl SubtopicDraw {
    pub fn is_short(&self) -> bool {
        self.taken < self.target
    }
}

#[derive(Clone, Debug)]
pub struct AssembledQuiz {
    pub subject: Subject,
    pub questions: Vec<Question>,
    pub draws: Vec<SubtopicDraw>,
}

impl AssembledQuiz {
    pub fn question_ids(&self) -> Vec<String> {
        self.questions.iter().map(|q| q.id.clone()).collect()
    }
}

/// Build a fresh quiz for `student_id` across every subtopic of `subject_id`.
///
/// Every subtopic must already have a mastery record for the student.
#[instrument(level = "info", skip(store, rng), fields(%student_id, %subject_id))]
pub fn assemble_by_subject<R: Rng + ?Sized>(
    store: &dyn Store,
    student_id: &str,
    subject_id: &str,
    rng: &mut R,
) -> Result<AssembledQuiz, CoreError> {
    let subject = store.subject(subject_id)?;
    store.student(student_id)?;

    let mut questions = Vec::new();
    let mut draws = Vec::new();

    for subtopic in store.subtopics(subject_id) {
        let record = store.mastery_record(student_id, &subtopic.id)?;
        let target = question_target(record.p_known);

        let mut pool = store.questions(subject_id, &subtopic.id);
        pool.shuffle(rng);
        let available = pool.len();
        pool.truncate(target);

        let draw = SubtopicDraw {
            subtopic_id: subtopic.id.clone(),
            p_known: record.p_known,
            target,
            available,
            taken: pool.len(),
        };
        if draw.is_short() {
            warn!(
                target: "quiz",
                %student_id,
                subtopic_id = %draw.subtopic_id,
                target = draw.target,
                available = draw.available,
                "Question pool smaller than target; quiz will be shorter"
            );
        } else {
            debug!(target: "quiz", subtopic_id = %draw.subtopic_id, p_known = draw.p_known, taken = draw.taken, "Subtopic drawn");
        }

        questions.extend(pool);
        draws.push(draw);
    }

    questions.shuffle(rng);
    Ok(AssembledQuiz { subject, questions, draws })
}

/// Rebuild a quiz from previously chosen ids, keeping their order.
pub fn resolve_questions(store: &dyn Store, ids: &[String]) -> Result<Vec<Question>, CoreError> {
    ids.iter().map(|id| store.question(id)).collect()
}
