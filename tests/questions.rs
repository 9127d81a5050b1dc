mod common;

use axum::http::StatusCode;
use rstest::rstest;
use serde_json::json;
use trivia_api::db::queries::questions::{get_all_questions, get_question_by_id};

use common::{assert_error, empty_app, seeded_app};

#[tokio::test]
async fn first_page_has_ten_questions() {
    let app = seeded_app().await;
    let response = app.get("/questions").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["questions"].as_array().unwrap().len(), 10);
    assert_eq!(response.body["total_questions"], 19);
    assert_eq!(response.body["categories"]["1"], "Science");
    assert_eq!(response.body["categories"].as_object().unwrap().len(), 6);
    assert!(response.body["current_category"].is_null());
    assert_eq!(
        response.body["questions"][0],
        json!({
            "id": 2,
            "question": "What movie earned Tom Hanks his third straight Oscar nomination, in 1996?",
            "answer": "Apollo 13",
            "category": "5",
            "difficulty": 4
        })
    );
}

#[tokio::test]
async fn second_page_has_the_rest() {
    let app = seeded_app().await;
    let response = app.get("/questions?page=2").await;

    assert_eq!(response.status, StatusCode::OK);
    let questions = response.body["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 9);
    assert_eq!(questions[0]["id"], 15);
    assert_eq!(questions[8]["id"], 23);
    assert_eq!(response.body["total_questions"], 19);
}

#[rstest]
#[case("3")]
#[case("1000")]
#[case("0")]
#[case("-1")]
#[tokio::test]
async fn pages_outside_range_are_not_found(#[case] page: &str) {
    let app = seeded_app().await;
    let response = app.get(&format!("/questions?page={page}")).await;
    assert_error(&response, 404, "Resource not found");
}

#[tokio::test]
async fn non_numeric_page_means_first_page() {
    let app = seeded_app().await;
    let response = app.get("/questions?page=last").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["questions"][0]["id"], 2);
}

#[tokio::test]
async fn no_questions_is_not_found() {
    let app = empty_app().await;
    assert_error(&app.get("/questions").await, 404, "Resource not found");
}

#[tokio::test]
async fn delete_existing_question() {
    let app = seeded_app().await;
    let response = app.delete("/questions/5").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"success": true, "deleted": 5}));
    assert!(matches!(
        get_question_by_id(&app.pool, 5).await,
        Err(sqlx::Error::RowNotFound)
    ));
    assert_eq!(get_all_questions(&app.pool).await.unwrap().len(), 18);

    assert_error(&app.delete("/questions/5").await, 404, "Resource not found");
}

#[rstest]
#[case("/questions/9999")]
#[case("/questions/abc")]
#[tokio::test]
async fn delete_unknown_question(#[case] uri: &str) {
    let app = seeded_app().await;
    assert_error(&app.delete(uri).await, 404, "Resource not found");
    assert_eq!(get_all_questions(&app.pool).await.unwrap().len(), 19);
}

#[tokio::test]
async fn create_question() {
    let app = seeded_app().await;
    let response = app
        .post_json(
            "/questions",
            json!({
                "question": "What is the capital of France?",
                "answer": "Paris",
                "category": "3",
                "difficulty": 1
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    let id = response.body["created"].as_i64().unwrap();
    let created = get_question_by_id(&app.pool, id).await.unwrap();
    assert_eq!(created.answer, "Paris");
    assert_eq!(created.category, "3");

    let last_page = app.get("/questions?page=2").await;
    assert_eq!(last_page.body["total_questions"], 20);
    assert_eq!(last_page.body["questions"][9]["id"], id);
}

#[tokio::test]
async fn create_accepts_numeric_category() {
    let app = empty_app().await;
    let response = app
        .post_json(
            "/questions",
            json!({"question": "Q?", "answer": "A", "category": 2, "difficulty": 5}),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let id = response.body["created"].as_i64().unwrap();
    assert_eq!(get_question_by_id(&app.pool, id).await.unwrap().category, "2");
}

#[rstest]
#[case(json!({"question": "Incomplete question"}))]
#[case(json!({"answer": "A", "category": "1", "difficulty": 1}))]
#[case(json!({"question": "Q?", "category": "1", "difficulty": 1}))]
#[case(json!({"question": "Q?", "answer": "A", "difficulty": 1}))]
#[case(json!({"question": "Q?", "answer": "A", "category": "1"}))]
#[case(json!({"question": "Q?", "answer": "A", "category": "1", "difficulty": 0}))]
#[case(json!({"question": "", "answer": "A", "category": "1", "difficulty": 1}))]
#[case(json!({"question": "Q?", "answer": "A", "category": "1", "difficulty": "hard"}))]
#[case(json!([]))]
#[tokio::test]
async fn create_rejects_incomplete_question(#[case] body: serde_json::Value) {
    let app = empty_app().await;
    let response = app.post_json("/questions", body).await;
    assert_error(&response, 422, "Unprocessable entity");
    assert!(get_all_questions(&app.pool).await.unwrap().is_empty());
}

#[tokio::test]
async fn create_rejects_malformed_json() {
    let app = empty_app().await;
    let response = app
        .post_raw("/questions", "{\"question\": ".to_owned())
        .await;
    assert_error(&response, 400, "Bad request");
}

#[tokio::test]
async fn search_finds_title() {
    let app = seeded_app().await;
    let response = app
        .post_json("/questions/search", json!({"searchTerm": "title"}))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert!(response.body["total_questions"].as_u64().unwrap() >= 1);
    let questions = response.body["questions"].as_array().unwrap();
    assert!(questions.iter().any(|q| q["answer"] == "Edward Scissorhands"));
    assert!(questions
        .iter()
        .all(|q| q["question"].as_str().unwrap().to_lowercase().contains("title")));
}

#[tokio::test]
async fn search_is_case_insensitive() {
    let app = seeded_app().await;
    app.post_json(
        "/questions",
        json!({
            "question": "What is the Capital of France?",
            "answer": "Paris",
            "category": "3",
            "difficulty": 1
        }),
    )
    .await;

    let response = app
        .post_json("/questions/search", json!({"searchTerm": "capital"}))
        .await;
    assert_eq!(response.body["total_questions"], 1);
    assert_eq!(response.body["questions"][0]["answer"], "Paris");
}

#[tokio::test]
async fn search_without_matches_succeeds() {
    let app = seeded_app().await;
    let response = app
        .post_json("/questions/search", json!({"searchTerm": "zeppelin"}))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({"success": true, "questions": [], "total_questions": 0})
    );
}

#[tokio::test]
async fn search_without_term_returns_everything() {
    let app = seeded_app().await;
    let response = app.post_json("/questions/search", json!({})).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total_questions"], 19);
}

#[tokio::test]
async fn search_with_null_term_returns_everything() {
    let app = seeded_app().await;
    let response = app
        .post_json("/questions/search", json!({"searchTerm": null}))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total_questions"], 19);
}

#[tokio::test]
async fn search_accepts_numeric_term() {
    let app = seeded_app().await;
    let response = app
        .post_json("/questions/search", json!({"searchTerm": 1996}))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total_questions"], 1);
    assert_eq!(response.body["questions"][0]["id"], 2);
}

#[tokio::test]
async fn create_failure_is_unprocessable() {
    let app = seeded_app().await;
    sqlx::query(
        r#"
        CREATE TRIGGER reject_insert BEFORE INSERT ON questions
        BEGIN SELECT RAISE(ABORT, 'inserts disabled'); END
        "#,
    )
    .execute(&app.pool)
    .await
    .unwrap();

    let response = app
        .post_json(
            "/questions",
            json!({
                "question": "Who painted the Mona Lisa?",
                "answer": "Leonardo da Vinci",
                "category": "2",
                "difficulty": 1
            }),
        )
        .await;

    assert_error(&response, 422, "Unprocessable entity");
    assert_eq!(get_all_questions(&app.pool).await.unwrap().len(), 19);
}

#[tokio::test]
async fn delete_failure_keeps_question() {
    let app = seeded_app().await;
    sqlx::query(
        r#"
        CREATE TRIGGER reject_delete BEFORE DELETE ON questions
        BEGIN SELECT RAISE(ABORT, 'deletes disabled'); END
        "#,
    )
    .execute(&app.pool)
    .await
    .unwrap();

    let response = app.delete("/questions/5").await;

    assert_error(&response, 422, "Unprocessable entity");
    assert!(get_question_by_id(&app.pool, 5).await.is_ok());
    assert_eq!(get_all_questions(&app.pool).await.unwrap().len(), 19);
}
