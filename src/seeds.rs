//! Built-in demo curriculum so the service is usable without a CURRICULUM_PATH.

use crate::config::{CurriculumConfig, QuestionCfg, StudentCfg, SubjectCfg, SubtopicCfg, TeacherCfg};

fn q(id: &str, subtopic: &str, text: &str, answers: [&str; 4], correct: &str) -> QuestionCfg {
  QuestionCfg {
    id: id.into(),
    subject: "maths".into(),
    subtopic: subtopic.into(),
    text: text.into(),
    answers: answers.map(String::from),
    correct_answer: correct.into(),
  }
}

fn student(id: &str, first_name: &str, surname: &str, form: &str) -> StudentCfg {
  StudentCfg {
    id: id.into(),
    first_name: first_name.into(),
    surname: surname.into(),
    form: form.into(),
    subjects: vec!["maths".into()],
    bkt: None,
  }
}

/// One subject with three subtopics, a handful of questions each, a form of students
/// and their teacher.
pub fn seed_curriculum() -> CurriculumConfig {
  CurriculumConfig {
    subjects: vec![SubjectCfg { id: "maths".into(), name: "Maths".into() }],
    subtopics: vec![
      SubtopicCfg { id: "algebra".into(), name: "Algebra".into(), subject: "maths".into() },
      SubtopicCfg { id: "geometry".into(), name: "Geometry".into(), subject: "maths".into() },
      SubtopicCfg { id: "statistics".into(), name: "Statistics".into(), subject: "maths".into() },
    ],
    questions: vec![
      q("alg1", "algebra", "Solve 2x + 3 = 11", ["x = 3", "x = 4", "x = 5", "x = 7"], "x = 4"),
      q("alg2", "algebra", "Expand 3(a - 2)", ["3a - 2", "3a - 6", "a - 6", "3a + 6"], "3a - 6"),
      q("alg3", "algebra", "Factorise x² - 9", ["(x - 3)²", "(x + 9)(x - 1)", "(x - 3)(x + 3)", "x(x - 9)"], "(x - 3)(x + 3)"),
      q("alg4", "algebra", "If y = 2x and x = 5, what is y?", ["7", "10", "25", "2.5"], "10"),
      q("geo1", "geometry", "Interior angles of a triangle sum to", ["90°", "180°", "270°", "360°"], "180°"),
      q("geo2", "geometry", "Area of a 4 by 6 rectangle", ["10", "20", "24", "48"], "24"),
      q("geo3", "geometry", "A regular hexagon has how many sides?", ["5", "6", "7", "8"], "6"),
      q("geo4", "geometry", "Circumference of a circle of radius r", ["πr²", "2πr", "πd²", "r²"], "2πr"),
      q("stat1", "statistics", "Mean of 2, 4, 6", ["3", "4", "5", "6"], "4"),
      q("stat2", "statistics", "Median of 1, 3, 8, 9, 10", ["3", "8", "6.2", "9"], "8"),
      q("stat3", "statistics", "Mode of 2, 2, 3, 5", ["2", "3", "5", "3.0"], "2"),
    ],
    students: vec![
      student("s1", "Ada", "Lovelace", "10A"),
      student("s2", "Alan", "Turing", "10A"),
      student("s3", "Katherine", "Johnson", "10A"),
      student("s4", "Emmy", "Noether", "11B"),
    ],
    teachers: vec![TeacherCfg {
      id: "t1".into(),
      first_name: "Grace".into(),
      surname: "Hopper".into(),
      form: "10A".into(),
      subject: Some("maths".into()),
    }],
    ..CurriculumConfig::default()
  }
}
