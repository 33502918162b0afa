//! Bayesian Knowledge Tracing update, applied once per answered question.
//!
//! Each answer runs an evidence step (Bayes over "knew it" / "didn't") followed by a
//! learning step (chance the opportunity itself taught the skill). The persisted value is
//! rounded to 2 decimals and every later update compounds on that rounded value; callers
//! get a 3-decimal copy for display.

use tracing::{debug, info, instrument, warn};

use crate::domain::{BktParams, MasteryRecord};
use crate::error::CoreError;
use crate::store::Store;
use crate::util::round_to;

pub const PERSIST_DECIMALS: i32 = 2;
pub const DISPLAY_DECIMALS: i32 = 3;

/// Attempts at the read-compute-save cycle before giving up on a contended record.
const MAX_SAVE_ATTEMPTS: usize = 16;

/// Intermediate values of one BKT transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BktStep {
    /// Posterior after the evidence step.
    pub p_learned: f64,
    /// After the learning step, clamped to [0, 1] but not rounded.
    pub p_known: f64,
    /// The evidence denominator was zero and the prior was kept.
    pub degenerate: bool,
}

pub fn bkt_step(params: &BktParams, p_known: f64, correct: bool) -> BktStep {
    let (numerator, denominator) = if correct {
        let n = p_known * (1.0 - params.p_slip);
        (n, n + (1.0 - p_known) * params.p_guess)
    } else {
        let n = p_known * params.p_slip;
        (n, n + (1.0 - p_known) * (1.0 - params.p_guess))
    };

    let degenerate = denominator == 0.0;
    let p_learned = if degenerate { p_known } else { numerator / denominator };
    let next = p_learned + (1.0 - p_learned) * params.p_learn;

    BktStep { p_learned, p_known: next.clamp(0.0, 1.0), degenerate }
}

/// The value to persist after observing one answer on `record`.
pub fn update(record: &MasteryRecord, correct: bool) -> f64 {
    round_to(bkt_step(&record.params, record.p_known, correct).p_known, PERSIST_DECIMALS)
}

/// What the student sees after submitting an answer.
#[derive(Clone, Debug, PartialEq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_answer: String,
    /// Display copy (3 decimals). The stored value is in `record.p_known`.
    pub p_known: f64,
    pub record: MasteryRecord,
}

/// Grade `selected_answer` for `question_id` and fold the result into the student's
/// mastery record for that question's subtopic.
#[instrument(level = "info", skip(store, selected_answer), fields(%student_id, %question_id))]
pub fn record_answer(
    store: &dyn Store,
    student_id: &str,
    question_id: &str,
    selected_answer: &str,
) -> Result<AnswerOutcome, CoreError> {
    let question = store.question(question_id)?;
    store.student(student_id)?;
    let correct = question.is_correct(selected_answer);

    for attempt in 1..=MAX_SAVE_ATTEMPTS {
        let mut record = store.mastery_record(student_id, &question.subtopic)?;
        let step = bkt_step(&record.params, record.p_known, correct);
        if step.degenerate {
            warn!(
                target: "mastery",
                %student_id,
                subtopic_id = %record.subtopic_id,
                p_known = record.p_known,
                "Zero evidence denominator; keeping prior"
            );
        }

        let previous = record.p_known;
        record.p_known = round_to(step.p_known, PERSIST_DECIMALS);

        match store.save_mastery_record(&record) {
            Ok(saved) => {
                info!(
                    target: "mastery",
                    %student_id,
                    subtopic_id = %saved.subtopic_id,
                    %correct,
                    previous,
                    p_known = saved.p_known,
                    attempt,
                    "Mastery updated"
                );
                return Ok(AnswerOutcome {
                    correct,
                    correct_answer: question.correct_answer,
                    p_known: round_to(step.p_known, DISPLAY_DECIMALS),
                    record: saved,
                });
            }
            Err(CoreError::VersionConflict { .. }) => {
                debug!(target: "mastery", %student_id, subtopic_id = %question.subtopic, attempt, "Concurrent update; retrying");
            }
            Err(e) => return Err(e),
        }
    }

    Err(CoreError::Contended {
        student_id: student_id.to_string(),
        subtopic_id: question.subtopic,
        attempts: MAX_SAVE_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Question, Student, Subtopic};
    use crate::store::MemoryStore;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn params(p_learn: f64, p_slip: f64, p_guess: f64) -> BktParams {
        BktParams { p_init: 0.5, p_learn, p_slip, p_guess }
    }

    fn record(p_known: f64, params: BktParams) -> MasteryRecord {
        let topic = Subtopic { id: "alg".into(), name: "Algebra".into(), subject: "maths".into() };
        let mut r = MasteryRecord::provision("s1", &topic, params);
        r.p_known = p_known;
        r
    }

    fn seeded_store(p_known: f64, params: BktParams) -> MemoryStore {
        let store = MemoryStore::new();
        store.insert_student(Student {
            id: "s1".into(),
            first_name: "Ada".into(),
            surname: "Lovelace".into(),
            form: "10A".into(),
        });
        store.insert_question(Question {
            id: "q1".into(),
            subject: "maths".into(),
            subtopic: "alg".into(),
            text: "2x = 4, x = ?".into(),
            answers: ["1".into(), "2".into(), "3".into(), "4".into()],
            correct_answer: "2".into(),
        });
        store.provision_mastery(record(p_known, params));
        store
    }

    #[test]
    fn correct_answer_worked_example() {
        let step = bkt_step(&params(0.3, 0.1, 0.2), 0.5, true);
        assert!((step.p_learned - 0.45 / 0.55).abs() < 1e-12);
        assert!((step.p_known - 0.872_727).abs() < 1e-6);
        assert_eq!(update(&record(0.5, params(0.3, 0.1, 0.2)), true), 0.87);
    }

    #[test]
    fn incorrect_answer_worked_example() {
        let step = bkt_step(&params(0.3, 0.1, 0.2), 0.5, false);
        assert!((step.p_learned - 0.05 / 0.45).abs() < 1e-12);
        assert_eq!(update(&record(0.5, params(0.3, 0.1, 0.2)), false), 0.38);
    }

    #[test]
    fn zero_denominator_keeps_prior() {
        // Knows it for sure, never slips, yet answered wrong.
        let step = bkt_step(&params(0.3, 0.0, 0.0), 1.0, false);
        assert!(step.degenerate);
        assert_eq!(step.p_learned, 1.0);
        assert_eq!(step.p_known, 1.0);

        // Knows nothing, cannot guess, yet answered right.
        let step = bkt_step(&params(0.3, 0.0, 0.0), 0.0, true);
        assert!(step.degenerate);
        assert_eq!(step.p_learned, 0.0);
        assert!((step.p_known - 0.3).abs() < 1e-12);
    }

    #[test]
    fn record_answer_persists_rounded_and_returns_display_value() {
        let store = seeded_store(0.5, params(0.3, 0.1, 0.2));
        let out = record_answer(&store, "s1", "q1", "2").unwrap();
        assert!(out.correct);
        assert_eq!(out.correct_answer, "2");
        assert_eq!(out.p_known, 0.873);
        assert_eq!(store.mastery_record("s1", "alg").unwrap().p_known, 0.87);

        // Next update compounds on the stored 0.87, not on 0.873.
        let out = record_answer(&store, "s1", "q1", "4").unwrap();
        assert!(!out.correct);
        let expected = update(&record(0.87, params(0.3, 0.1, 0.2)), false);
        assert_eq!(out.record.p_known, expected);
    }

    #[test]
    fn params_are_untouched_by_updates() {
        let p = params(0.3, 0.1, 0.2);
        let store = seeded_store(0.5, p);
        record_answer(&store, "s1", "q1", "2").unwrap();
        assert_eq!(store.mastery_record("s1", "alg").unwrap().params, p);
    }

    #[test]
    fn unknown_question_or_unprovisioned_student_is_rejected() {
        let store = seeded_store(0.5, params(0.3, 0.1, 0.2));
        assert!(matches!(
            record_answer(&store, "s1", "nope", "2"),
            Err(CoreError::NotFound { entity: "question", .. })
        ));
        store.insert_student(Student {
            id: "s2".into(),
            first_name: "Alan".into(),
            surname: "Turing".into(),
            form: "10A".into(),
        });
        assert!(matches!(
            record_answer(&store, "s2", "q1", "2"),
            Err(CoreError::MasteryRecordNotFound { .. })
        ));
    }

    #[test]
    fn concurrent_answers_are_not_lost() {
        let p = params(0.1, 0.1, 0.2);
        let store = Arc::new(seeded_store(0.1, p));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || record_answer(store.as_ref(), "s1", "q1", "2").unwrap())
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let mut expected = record(0.1, p);
        for _ in 0..8 {
            expected.p_known = update(&expected, true);
        }
        let stored = store.mastery_record("s1", "alg").unwrap();
        assert_eq!(stored.p_known, expected.p_known);
        assert_eq!(stored.version, 8);
    }

    fn unit() -> impl Strategy<Value = f64> {
        (0u64..=1000u64).prop_map(|v| v as f64 / 1000.0)
    }

    fn below_half() -> impl Strategy<Value = f64> {
        (0u64..500u64).prop_map(|v| v as f64 / 1000.0)
    }

    proptest! {
        #[test]
        fn update_stays_in_unit_interval(
            pk in unit(), learn in unit(), slip in unit(), guess in unit(), correct in any::<bool>()
        ) {
            let step = bkt_step(&params(learn, slip, guess), pk, correct);
            prop_assert!((0.0..=1.0).contains(&step.p_known));
            let persisted = update(&record(pk, params(learn, slip, guess)), correct);
            prop_assert!((0.0..=1.0).contains(&persisted));
        }

        #[test]
        fn evidence_moves_the_right_way(
            pk in unit(), learn in unit(), slip in below_half(), guess in below_half()
        ) {
            let p = params(learn, slip, guess);
            prop_assert!(bkt_step(&p, pk, true).p_learned >= pk - 1e-12);
            prop_assert!(bkt_step(&p, pk, false).p_learned <= pk + 1e-12);
        }
    }
}
