use axum::http::StatusCode;
use serde_json::json;

mod common;

use common::{create_test_app, get, post};

#[tokio::test]
async fn test_health() {
    let app = create_test_app();
    let (status, body) = get(&app, "/api/v1/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_answer_updates_mastery() {
    let app = create_test_app();

    let (status, body) = post(
        &app,
        "/api/v1/mastery/answer",
        json!({ "student_id": "s1", "question_id": "alg1", "selected_answer": "x = 4" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["correct"], true);
    assert_eq!(body["correct_answer"], "x = 4");
    assert_eq!(body["p_known"], 0.685);

    let (status, body) = get(&app, "/api/v1/mastery/records?student_id=s1&subject_id=maths").await;
    assert_eq!(status, StatusCode::OK);
    let algebra = body
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["subtopic_id"] == "algebra")
        .unwrap();
    assert_eq!(algebra["p_known"], 0.69);
}

#[tokio::test]
async fn test_wrong_answer_reveals_correct_one() {
    let app = create_test_app();
    let (status, body) = post(
        &app,
        "/api/v1/mastery/answer",
        json!({ "student_id": "s2", "question_id": "geo2", "selected_answer": "48" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["correct"], false);
    assert_eq!(body["correct_answer"], "24");
    assert!(body["p_known"].as_f64().unwrap() < 0.3);
}

#[tokio::test]
async fn test_unknown_student_is_404() {
    let app = create_test_app();
    let (status, body) = post(
        &app,
        "/api/v1/mastery/answer",
        json!({ "student_id": "nobody", "question_id": "alg1", "selected_answer": "x = 4" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_adaptive_quiz_follows_mastery() {
    let app = create_test_app();

    // Everyone starts at p_init = 0.3: three per subtopic, statistics only has three.
    let (status, body) = get(&app, "/api/v1/quiz/adaptive?student_id=s1&subject_id=maths").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_questions"], 9);
    assert_eq!(body["subject_name"], "Maths");
    assert_eq!(body["quiz_type"], "assigned");
    let first = &body["questions"][0];
    assert!(first["question_id"].is_string());
    assert!(first["answer_4"].is_string());
    assert!(first.get("correct_answer").is_none());

    // Lift algebra above 0.4 and it drops to two questions.
    post(
        &app,
        "/api/v1/mastery/answer",
        json!({ "student_id": "s1", "question_id": "alg2", "selected_answer": "3a - 6" }),
    )
    .await;
    let (_, body) = get(&app, "/api/v1/quiz/adaptive?student_id=s1&subject_id=maths").await;
    assert_eq!(body["total_questions"], 8);
    let algebra = body["questions"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|q| q["question_id"].as_str().unwrap().starts_with("alg"))
        .count();
    assert_eq!(algebra, 2);
}

#[tokio::test]
async fn test_assigned_quiz_lifecycle() {
    let app = create_test_app();

    let (status, body) = post(&app, "/api/v1/quiz/assign", json!({ "teacher_id": "t1", "subject_id": "maths" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quiz_ids"].as_array().unwrap().len(), 3);
    assert_eq!(body["teacher_id"], "t1");

    let (_, pending) = get(&app, "/api/v1/quiz/pending?student_id=s1").await;
    assert_eq!(pending["total_count"], 1);
    assert_eq!(pending["assigned_quizzes"][0]["teacher_name"], "Grace Hopper");
    let quiz_id = pending["assigned_quizzes"][0]["quiz_id"].as_str().unwrap().to_string();

    let uri = format!("/api/v1/quiz/open?student_id=s1&quiz_id={quiz_id}");
    let (status, first) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    let (_, again) = get(&app, &uri).await;
    assert_eq!(first["questions"], again["questions"]);

    let (status, _) = get(&app, &format!("/api/v1/quiz/open?student_id=s2&quiz_id={quiz_id}")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, done) = post(
        &app,
        "/api/v1/quiz/complete",
        json!({ "assigned_quiz_id": quiz_id, "score": 7, "total_questions": 9 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["score"], 7);

    let (status, body) = post(
        &app,
        "/api/v1/quiz/complete",
        json!({ "quiz_id": quiz_id, "score": 9, "total_questions": 9 }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ALREADY_COMPLETED");

    let (_, pending) = get(&app, "/api/v1/quiz/pending?student_id=s1").await;
    assert_eq!(pending["total_count"], 0);
}

#[tokio::test]
async fn test_teacher_views() {
    let app = create_test_app();

    let (status, roster) = get(&app, "/api/v1/teacher/roster?teacher_id=t1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(roster["class_id"], "maths");
    assert_eq!(roster["students"].as_array().unwrap().len(), 3);
    assert_eq!(roster["students"][0]["student_name"], "Ada Lovelace");

    let (status, report) = get(&app, "/api/v1/teacher/progress").await;
    assert_eq!(status, StatusCode::OK);
    let maths = &report[0];
    assert_eq!(maths["class_name"], "Maths");
    assert_eq!(maths["subject"]["students"].as_array().unwrap().len(), 4);
    assert_eq!(maths["subject"]["class_average_p_known"], 30.0);
    assert_eq!(maths["subject"]["subtopics"][0]["subtopic_id"], "algebra");
    assert_eq!(maths["subject"]["subtopics"][0]["mean_p_known"], 30.0);
}
