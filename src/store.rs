//! Persistence collaborator: the `Store` trait the core reads and writes through, and the
//! in-memory implementation the service runs on.
//!
//! The in-memory store keeps:
//!   - curriculum indices (subjects, subtopics by subject, questions by id and by subtopic)
//!   - students and teachers
//!   - mastery records keyed by (student, subtopic)
//!   - quiz assignments by id, listed back in creation order
//!
//! Mastery saves are compare-and-swap on `MasteryRecord::version` and replace the whole
//! record under one write lock.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use tracing::{debug, instrument};

use crate::domain::{MasteryRecord, Question, QuizAssignment, Student, Subject, Subtopic, Teacher};
use crate::error::CoreError;

/// Selects mastery records for reporting. Empty fields match everything.
#[derive(Clone, Debug, Default)]
pub struct MasteryFilter {
    pub student_id: Option<String>,
    pub subject_id: Option<String>,
    pub subtopic_id: Option<String>,
}

impl MasteryFilter {
    pub fn student(student_id: &str) -> Self {
        Self { student_id: Some(student_id.to_string()), ..Self::default() }
    }

    pub fn with_subject(mut self, subject_id: &str) -> Self {
        self.subject_id = Some(subject_id.to_string());
        self
    }

    pub fn with_subtopic(mut self, subtopic_id: &str) -> Self {
        self.subtopic_id = Some(subtopic_id.to_string());
        self
    }

    fn matches(&self, r: &MasteryRecord) -> bool {
        self.student_id.as_deref().map_or(true, |s| s == r.student_id)
            && self.subject_id.as_deref().map_or(true, |s| s == r.subject_id)
            && self.subtopic_id.as_deref().map_or(true, |s| s == r.subtopic_id)
    }
}

pub trait Store: Send + Sync {
    fn subject(&self, subject_id: &str) -> Result<Subject, CoreError>;
    fn subjects(&self) -> Vec<Subject>;
    /// Subtopics of a subject in curriculum order.
    fn subtopics(&self, subject_id: &str) -> Vec<Subtopic>;
    fn question(&self, question_id: &str) -> Result<Question, CoreError>;
    fn questions(&self, subject_id: &str, subtopic_id: &str) -> Vec<Question>;

    fn student(&self, student_id: &str) -> Result<Student, CoreError>;
    fn students(&self) -> Vec<Student>;
    fn students_in_form(&self, form: &str) -> Vec<Student>;
    fn teacher(&self, teacher_id: &str) -> Result<Teacher, CoreError>;

    fn mastery_record(&self, student_id: &str, subtopic_id: &str) -> Result<MasteryRecord, CoreError>;
    /// Replaces the stored record if its version still equals `record.version`.
    /// Returns the stored copy with the bumped version.
    fn save_mastery_record(&self, record: &MasteryRecord) -> Result<MasteryRecord, CoreError>;
    fn mastery_records(&self, filter: &MasteryFilter) -> Vec<MasteryRecord>;

    fn insert_assignment(&self, assignment: QuizAssignment);
    fn assignment(&self, quiz_id: &str) -> Result<QuizAssignment, CoreError>;
    fn assignments_for_student(&self, student_id: &str) -> Vec<QuizAssignment>;
    /// Applies `f` to the stored assignment under the write lock; nothing is written if `f` fails.
    fn update_assignment(
        &self,
        quiz_id: &str,
        f: &mut dyn FnMut(&mut QuizAssignment) -> Result<(), CoreError>,
    ) -> Result<QuizAssignment, CoreError>;
}

#[derive(Default)]
pub struct MemoryStore {
    subjects: RwLock<BTreeMap<String, Subject>>,
    subtopics: RwLock<HashMap<String, Vec<Subtopic>>>,
    questions_by_id: RwLock<HashMap<String, Question>>,
    questions_by_subtopic: RwLock<HashMap<(String, String), Vec<String>>>,
    students: RwLock<BTreeMap<String, Student>>,
    teachers: RwLock<BTreeMap<String, Teacher>>,
    mastery: RwLock<HashMap<(String, String), MasteryRecord>>,
    assignments: RwLock<BTreeMap<String, QuizAssignment>>,
    /// Assignment ids in creation order.
    assignment_order: RwLock<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_subject(&self, s: Subject) {
        self.subjects.write().insert(s.id.clone(), s);
    }

    /// Subtopic ids are unique across all subjects since mastery is keyed on them.
    /// Returns false and stores nothing when the id is taken.
    pub fn insert_subtopic(&self, t: Subtopic) -> bool {
        let mut subtopics = self.subtopics.write();
        if subtopics.values().flatten().any(|existing| existing.id == t.id) {
            return false;
        }
        subtopics.entry(t.subject.clone()).or_default().push(t);
        true
    }

    pub fn has_subtopic(&self, subject_id: &str, subtopic_id: &str) -> bool {
        self.subtopics
            .read()
            .get(subject_id)
            .is_some_and(|ts| ts.iter().any(|t| t.id == subtopic_id))
    }

    /// Returns false and keeps the stored question when the id is taken.
    pub fn insert_question(&self, q: Question) -> bool {
        let mut by_id = self.questions_by_id.write();
        let mut by_subtopic = self.questions_by_subtopic.write();
        if by_id.contains_key(&q.id) {
            return false;
        }
        let key = (q.subject.clone(), q.subtopic.clone());
        by_subtopic.entry(key).or_default().push(q.id.clone());
        by_id.insert(q.id.clone(), q);
        true
    }

    pub fn insert_student(&self, s: Student) {
        self.students.write().insert(s.id.clone(), s);
    }

    pub fn insert_teacher(&self, t: Teacher) {
        self.teachers.write().insert(t.id.clone(), t);
    }

    /// Inserts the record unless one already exists for its (student, subtopic) key.
    /// Returns whether a record was created.
    pub fn provision_mastery(&self, record: MasteryRecord) -> bool {
        let key = (record.student_id.clone(), record.subtopic_id.clone());
        let mut mastery = self.mastery.write();
        if mastery.contains_key(&key) {
            return false;
        }
        mastery.insert(key, record);
        true
    }

    pub fn question_count(&self) -> usize {
        self.questions_by_id.read().len()
    }

    pub fn mastery_count(&self) -> usize {
        self.mastery.read().len()
    }
}

impl Store for MemoryStore {
    fn subject(&self, subject_id: &str) -> Result<Subject, CoreError> {
        self.subjects
            .read()
            .get(subject_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("subject", subject_id))
    }

    fn subjects(&self) -> Vec<Subject> {
        self.subjects.read().values().cloned().collect()
    }

    fn subtopics(&self, subject_id: &str) -> Vec<Subtopic> {
        self.subtopics.read().get(subject_id).cloned().unwrap_or_default()
    }

    fn question(&self, question_id: &str) -> Result<Question, CoreError> {
        self.questions_by_id
            .read()
            .get(question_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("question", question_id))
    }

    fn questions(&self, subject_id: &str, subtopic_id: &str) -> Vec<Question> {
        let key = (subject_id.to_string(), subtopic_id.to_string());
        let ids = { self.questions_by_subtopic.read().get(&key).cloned() };
        let by_id = self.questions_by_id.read();
        ids.unwrap_or_default()
            .iter()
            .filter_map(|id| by_id.get(id).cloned())
            .collect()
    }

    fn student(&self, student_id: &str) -> Result<Student, CoreError> {
        self.students
            .read()
            .get(student_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("student", student_id))
    }

    fn students(&self) -> Vec<Student> {
        self.students.read().values().cloned().collect()
    }

    fn students_in_form(&self, form: &str) -> Vec<Student> {
        self.students.read().values().filter(|s| s.form == form).cloned().collect()
    }

    fn teacher(&self, teacher_id: &str) -> Result<Teacher, CoreError> {
        self.teachers
            .read()
            .get(teacher_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("teacher", teacher_id))
    }

    fn mastery_record(&self, student_id: &str, subtopic_id: &str) -> Result<MasteryRecord, CoreError> {
        let key = (student_id.to_string(), subtopic_id.to_string());
        self.mastery.read().get(&key).cloned().ok_or_else(|| CoreError::MasteryRecordNotFound {
            student_id: student_id.to_string(),
            subtopic_id: subtopic_id.to_string(),
        })
    }

    #[instrument(level = "debug", skip(self, record), fields(student_id = %record.student_id, subtopic_id = %record.subtopic_id, version = record.version))]
    fn save_mastery_record(&self, record: &MasteryRecord) -> Result<MasteryRecord, CoreError> {
        let key = (record.student_id.clone(), record.subtopic_id.clone());
        let mut mastery = self.mastery.write();
        let stored = mastery.get_mut(&key).ok_or_else(|| CoreError::MasteryRecordNotFound {
            student_id: record.student_id.clone(),
            subtopic_id: record.subtopic_id.clone(),
        })?;
        if stored.version != record.version {
            debug!(target: "mastery", stored = stored.version, "Stale mastery record rejected");
            return Err(CoreError::VersionConflict {
                student_id: record.student_id.clone(),
                subtopic_id: record.subtopic_id.clone(),
            });
        }
        let mut next = record.clone();
        next.version += 1;
        *stored = next.clone();
        Ok(next)
    }

    fn mastery_records(&self, filter: &MasteryFilter) -> Vec<MasteryRecord> {
        let mut out: Vec<MasteryRecord> =
            self.mastery.read().values().filter(|r| filter.matches(r)).cloned().collect();
        out.sort_by(|a, b| (&a.student_id, &a.subtopic_id).cmp(&(&b.student_id, &b.subtopic_id)));
        out
    }

    fn insert_assignment(&self, assignment: QuizAssignment) {
        let mut assignments = self.assignments.write();
        let id = assignment.id.clone();
        if assignments.insert(id.clone(), assignment).is_none() {
            self.assignment_order.write().push(id);
        }
    }

    fn assignment(&self, quiz_id: &str) -> Result<QuizAssignment, CoreError> {
        self.assignments
            .read()
            .get(quiz_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("quiz", quiz_id))
    }

    fn assignments_for_student(&self, student_id: &str) -> Vec<QuizAssignment> {
        let assignments = self.assignments.read();
        self.assignment_order
            .read()
            .iter()
            .filter_map(|id| assignments.get(id))
            .filter(|a| a.student_id == student_id)
            .cloned()
            .collect()
    }

    fn update_assignment(
        &self,
        quiz_id: &str,
        f: &mut dyn FnMut(&mut QuizAssignment) -> Result<(), CoreError>,
    ) -> Result<QuizAssignment, CoreError> {
        let mut assignments = self.assignments.write();
        let stored = assignments
            .get_mut(quiz_id)
            .ok_or_else(|| CoreError::not_found("quiz", quiz_id))?;
        let mut next = stored.clone();
        f(&mut next)?;
        *stored = next.clone();
        Ok(next)
    }
}
