//! Application state: the store, the assembly rng and the report scope.
//!
//! Building state from a curriculum:
//!   - subjects, then subtopics (must name a known subject)
//!   - questions (must name a known subtopic; correct answer must be one of the four)
//!   - students, with one mastery record provisioned per subtopic of each enrolled subject
//!   - teachers
//!
//! Invalid entries are logged and skipped rather than failing startup.

use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, instrument};

use crate::config::{load_curriculum_from_env, CurriculumConfig};
use crate::domain::{MasteryRecord, Question, Student, Subject, Subtopic, Teacher};
use crate::report::ReportScope;
use crate::seeds::seed_curriculum;
use crate::store::{MemoryStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub rng: Arc<Mutex<StdRng>>,
    pub report_scope: ReportScope,
}

impl AppState {
    /// Build state from CURRICULUM_PATH, or from the built-in demo curriculum.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let cfg = load_curriculum_from_env().unwrap_or_else(|| {
            info!(target: "adaptive_quiz", "No curriculum loaded; using built-in demo curriculum.");
            seed_curriculum()
        });
        Self::from_config(&cfg)
    }

    #[instrument(level = "info", skip_all)]
    pub fn from_config(cfg: &CurriculumConfig) -> Self {
        let store = MemoryStore::new();

        if let Err(e) = cfg.bkt.validate() {
            error!(target: "adaptive_quiz", error = %e, "Default [bkt] parameters are invalid; enrolled records will be skipped.");
        }

        for s in &cfg.subjects {
            store.insert_subject(Subject { id: s.id.clone(), name: s.name.clone() });
        }

        for t in &cfg.subtopics {
            if store.subject(&t.subject).is_err() {
                error!(target: "adaptive_quiz", subtopic = %t.id, subject = %t.subject, "Skipping subtopic: unknown subject.");
                continue;
            }
            if !store.insert_subtopic(Subtopic { id: t.id.clone(), name: t.name.clone(), subject: t.subject.clone() }) {
                error!(target: "adaptive_quiz", subtopic = %t.id, subject = %t.subject, "Skipping subtopic: id already used.");
            }
        }

        for q in &cfg.questions {
            if !store.has_subtopic(&q.subject, &q.subtopic) {
                error!(target: "adaptive_quiz", question = %q.id, subject = %q.subject, subtopic = %q.subtopic, "Skipping question: unknown subtopic.");
                continue;
            }
            if !q.answers.contains(&q.correct_answer) {
                error!(target: "adaptive_quiz", question = %q.id, "Skipping question: correct answer is not one of the options.");
                continue;
            }
            let inserted = store.insert_question(Question {
                id: q.id.clone(),
                subject: q.subject.clone(),
                subtopic: q.subtopic.clone(),
                text: q.text.clone(),
                answers: q.answers.clone(),
                correct_answer: q.correct_answer.clone(),
            });
            if !inserted {
                error!(target: "adaptive_quiz", question = %q.id, "Skipping question: id already used.");
            }
        }

        for s in &cfg.students {
            store.insert_student(Student {
                id: s.id.clone(),
                first_name: s.first_name.clone(),
                surname: s.surname.clone(),
                form: s.form.clone(),
            });

            let params = s.bkt.unwrap_or(cfg.bkt);
            if let Err(e) = params.validate() {
                error!(target: "adaptive_quiz", student = %s.id, error = %e, "Skipping enrollment: invalid BKT parameters.");
                continue;
            }
            for subject_id in &s.subjects {
                let subtopics = store.subtopics(subject_id);
                if subtopics.is_empty() {
                    error!(target: "adaptive_quiz", student = %s.id, subject = %subject_id, "Enrollment in a subject with no subtopics.");
                }
                for t in &subtopics {
                    store.provision_mastery(MasteryRecord::provision(&s.id, t, params));
                }
            }
        }

        for t in &cfg.teachers {
            store.insert_teacher(Teacher {
                id: t.id.clone(),
                first_name: t.first_name.clone(),
                surname: t.surname.clone(),
                form: t.form.clone(),
                subject: t.subject.clone(),
            });
        }

        info!(
            target: "adaptive_quiz",
            subjects = store.subjects().len(),
            questions = store.question_count(),
            students = store.students().len(),
            mastery_records = store.mastery_count(),
            "Startup curriculum inventory"
        );

        let rng = match cfg.quiz.seed {
            Some(seed) => {
                info!(target: "quiz", seed, "Quiz assembly uses a fixed seed.");
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };

        Self {
            store: Arc::new(store),
            rng: Arc::new(Mutex::new(rng)),
            report_scope: cfg.report,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
