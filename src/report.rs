//! Teacher-facing progress rollups over stored mastery: per-student means, a class average
//! and per-subtopic means for each subject, plus the class roster for a teacher.
//!
//! `ReportScope::scope_to_subject` picks what a student's mean covers. With `false` (the
//! default) it spans every record the student has, whatever subject is being reported.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::CoreError;
use crate::store::{MasteryFilter, Store};
use crate::util::{as_percent, mean_or_zero};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ReportScope {
  #[serde(default)] pub scope_to_subject: bool,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct StudentProgress {
  pub student_id: String,
  pub student_name: String,
  pub average_p_known: f64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SubtopicProgress {
  pub subtopic_id: String,
  pub subtopic_name: String,
  pub mean_p_known: f64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SubjectProgress {
  pub subject_id: String,
  pub subject_name: String,
  pub students: Vec<StudentProgress>,
  pub class_average_p_known: f64,
  pub subtopics: Vec<SubtopicProgress>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ClassReport {
  pub class_id: String,
  pub class_name: String,
  pub subject: SubjectProgress,
}

/// One entry per subject. Percentages are `mean * 100` with two decimals; anything with
/// nothing to average reports 0.
#[instrument(level = "info", skip(store))]
pub fn class_report(store: &dyn Store, scope: ReportScope) -> Vec<ClassReport> {
  let students = store.students();

  store
    .subjects()
    .into_iter()
    .map(|subject| {
      let mut student_means = Vec::with_capacity(students.len());
      let student_rows = students
        .iter()
        .map(|s| {
          let mut filter = MasteryFilter::student(&s.id);
          if scope.scope_to_subject {
            filter = filter.with_subject(&subject.id);
          }
          let mean = mean_or_zero(store.mastery_records(&filter).iter().map(|r| r.p_known));
          student_means.push(mean);
          StudentProgress {
            student_id: s.id.clone(),
            student_name: s.full_name(),
            average_p_known: as_percent(mean),
          }
        })
        .collect();

      let subtopics = store
        .subtopics(&subject.id)
        .into_iter()
        .map(|t| {
          let records = store.mastery_records(&MasteryFilter::default().with_subtopic(&t.id));
          SubtopicProgress {
            subtopic_id: t.id,
            subtopic_name: t.name,
            mean_p_known: as_percent(mean_or_zero(records.iter().map(|r| r.p_known))),
          }
        })
        .collect();

      let class_average = mean_or_zero(student_means.iter().copied());
      debug!(target: "report", subject_id = %subject.id, students = student_means.len(), class_average, "Subject rolled up");

      ClassReport {
        class_id: subject.id.clone(),
        class_name: subject.name.clone(),
        subject: SubjectProgress {
          subject_id: subject.id,
          subject_name: subject.name,
          students: student_rows,
          class_average_p_known: as_percent(class_average),
          subtopics,
        },
      }
    })
    .collect()
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RosterStudent {
  pub student_id: String,
  pub student_name: String,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ClassRoster {
  pub class_id: String,
  pub subject_id: String,
  pub subject_name: String,
  pub students: Vec<RosterStudent>,
}

/// Students in the teacher's form, labelled with the teacher's subject.
#[instrument(level = "info", skip(store))]
pub fn class_roster(store: &dyn Store, teacher_id: &str) -> Result<ClassRoster, CoreError> {
  let teacher = store.teacher(teacher_id)?;
  let subject_id = teacher.subject.clone().ok_or_else(|| CoreError::NoSubject(teacher.id.clone()))?;
  let subject = store.subject(&subject_id)?;
  let students = store
    .students_in_form(&teacher.form)
    .into_iter()
    .map(|s| RosterStudent { student_name: s.full_name(), student_id: s.id })
    .collect();

  Ok(ClassRoster {
    class_id: subject.id.clone(),
    subject_id: subject.id,
    subject_name: subject.name,
    students,
  })
}
