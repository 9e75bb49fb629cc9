use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;
use trivia_api::db::queries::categories::{upsert_category, Category};
use trivia_api::db::queries::questions::{get_all_questions, get_question_by_id, import_questions};
use trivia_api::db::{establish_in_memory_connection, run_migrations, Question};
use trivia_api::server::app::{build_router, AppState};
use trivia_api::settings::TriviaSettings;

async fn empty_pool() -> SqlitePool {
    let pool = establish_in_memory_connection().await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

/// Categories Science(1) and Art(2); questions 1..=n alternate between them, odd ids in
/// Science. Question 3 mentions a "Title".
async fn seeded(n: i64) -> (Router, SqlitePool) {
    let pool = empty_pool().await;
    upsert_category(&pool, &Category { id: 1, kind: "Science".into() })
        .await
        .unwrap();
    upsert_category(&pool, &Category { id: 2, kind: "Art".into() })
        .await
        .unwrap();
    let questions = (1..=n)
        .map(|id| Question {
            id,
            question: if id == 3 {
                "Which book has the longest Title?".to_owned()
            } else {
                format!("Question number {id}?")
            },
            answer: format!("Answer {id}"),
            category: if id % 2 == 1 { "1" } else { "2" }.to_owned(),
            difficulty: id % 5 + 1,
        })
        .collect();
    import_questions(&pool, questions).await.unwrap();
    let app = build_router(AppState::new(pool.clone(), TriviaSettings::default()));
    (app, pool)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap())),
        None => builder.body(Body::empty()),
    }
    .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn assert_error(status: StatusCode, body: &Value, code: u16, message: &str) {
    assert_eq!(status.as_u16(), code, "body: {body}");
    assert_eq!(
        body,
        &json!({ "success": false, "error": code, "message": message })
    );
}

#[tokio::test]
async fn fifteen_questions_span_two_pages() {
    let (app, _pool) = seeded(15).await;

    let (status, first) = send(&app, Method::GET, "/questions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["questions"].as_array().unwrap().len(), 10);
    assert_eq!(first["totalQuestions"], 15);
    assert_eq!(first["currentCategory"], "all");
    assert_eq!(first["categories"], json!({ "1": "Science", "2": "Art" }));
    assert_eq!(first["questions"][0]["id"], 1);

    let (status, second) = send(&app, Method::GET, "/questions?page=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["questions"].as_array().unwrap().len(), 5);
    assert_eq!(second["totalQuestions"], 15);
    assert_eq!(second["questions"][4]["id"], 15);

    let (status, third) = send(&app, Method::GET, "/questions?page=3", None).await;
    assert_error(status, &third, 404, "resource not found");
}

#[tokio::test]
async fn non_numeric_page_falls_back_to_first() {
    let (app, _pool) = seeded(12).await;
    let (status, body) = send(&app, Method::GET, "/questions?page=two", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["questions"][0]["id"], 1);
}

#[tokio::test]
async fn question_payload_shape() {
    let (app, _pool) = seeded(1).await;
    let (_, body) = send(&app, Method::GET, "/questions", None).await;
    assert_eq!(
        body["questions"][0],
        json!({
            "id": 1,
            "question": "Question number 1?",
            "answer": "Answer 1",
            "category": "1",
            "difficulty": 2
        })
    );
}

#[tokio::test]
async fn categories_mapping() {
    let (app, _pool) = seeded(2).await;
    let (status, body) = send(&app, Method::GET, "/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "categories": { "1": "Science", "2": "Art" } }));

    let empty = build_router(AppState::new(empty_pool().await, TriviaSettings::default()));
    let (status, body) = send(&empty, Method::GET, "/categories", None).await;
    assert_error(status, &body, 404, "resource not found");
}

#[tokio::test]
async fn search_is_case_insensitive() {
    let (app, _pool) = seeded(15).await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/questions",
        Some(json!({ "searchTerm": "title" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalQuestions"], 1);
    assert_eq!(body["questions"][0]["id"], 3);
    assert_eq!(body["currentCategory"], "Entertainment");
    assert!(body.get("categories").is_none());
}

#[tokio::test]
async fn search_folds_accented_capitals() {
    let (app, pool) = seeded(2).await;
    import_questions(
        &pool,
        vec![Question {
            id: 10,
            question: "Where was the Éclair invented?".into(),
            answer: "France".into(),
            category: "2".into(),
            difficulty: 1,
        }],
    )
    .await
    .unwrap();
    let (status, body) = send(
        &app,
        Method::POST,
        "/questions",
        Some(json!({ "searchTerm": "éclair" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalQuestions"], 1);
    assert_eq!(body["questions"][0]["id"], 10);
}

#[tokio::test]
async fn search_paginates_matches() {
    let (app, _pool) = seeded(15).await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/questions?page=2",
        Some(json!({ "searchTerm": "number" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalQuestions"], 14);
    assert_eq!(body["questions"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn search_without_matches_is_not_found() {
    let (app, _pool) = seeded(5).await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/questions",
        Some(json!({ "searchTerm": "zeppelin" })),
    )
    .await;
    assert_error(status, &body, 404, "resource not found");
}

#[tokio::test]
async fn create_question_persists() {
    let (app, pool) = seeded(3).await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/questions",
        Some(json!({
            "question": "What is the capital of Peru?",
            "answer": "Lima",
            "category": "2",
            "difficulty": 2
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));

    let all = get_all_questions(&pool).await.unwrap();
    assert_eq!(all.len(), 4);
    let created = get_question_by_id(&pool, all[3].id).await.unwrap().unwrap();
    assert_eq!(created.answer, "Lima");
    assert_eq!(created.category, "2");
}

#[tokio::test]
async fn create_with_invalid_fields_is_unprocessable() {
    let (app, pool) = seeded(3).await;
    let invalid = [
        json!({ "question": "", "answer": "answer", "category": 1, "difficulty": 3 }),
        json!({ "question": "Q?", "answer": "A", "category": 1, "difficulty": null }),
        json!({ "question": "Q?", "answer": "A", "category": 1 }),
        json!({ "question": "Q?", "answer": "A", "category": 0, "difficulty": 1 }),
        json!({ "question": "Q?", "answer": "A", "category": 9, "difficulty": 1 }),
        json!({ "question": "Q?", "answer": "A", "category": "Science", "difficulty": 1 }),
        json!({ "searchTerm": "" }),
    ];
    for body in invalid {
        let (status, response) = send(&app, Method::POST, "/questions", Some(body)).await;
        assert_error(status, &response, 422, "unprocessable");
    }
    assert_eq!(get_all_questions(&pool).await.unwrap().len(), 3);
}

#[tokio::test]
async fn create_without_body_is_bad_request() {
    let (app, _pool) = seeded(1).await;
    let (status, body) = send(&app, Method::POST, "/questions", None).await;
    assert_error(status, &body, 400, "bad request");

    let (status, body) = send(&app, Method::POST, "/questions", Some(json!({}))).await;
    assert_error(status, &body, 400, "bad request");
}

#[tokio::test]
async fn delete_is_reported_once() {
    let (app, pool) = seeded(4).await;
    let (status, body) = send(&app, Method::DELETE, "/questions/2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "deleted": 2 }));
    assert_eq!(get_question_by_id(&pool, 2).await.unwrap(), None);

    let (status, body) = send(&app, Method::DELETE, "/questions/2", None).await;
    assert_error(status, &body, 404, "resource not found");

    let (status, body) = send(&app, Method::DELETE, "/questions/two", None).await;
    assert_error(status, &body, 404, "resource not found");
}

#[tokio::test]
async fn questions_by_category() {
    let (app, _pool) = seeded(15).await;
    let (status, body) = send(&app, Method::GET, "/categories/2/questions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currentCategory"], "Art");
    assert_eq!(body["totalQuestions"], 7);
    assert!(body["questions"]
        .as_array()
        .unwrap()
        .iter()
        .all(|q| q["category"] == "2"));

    let (status, body) = send(&app, Method::GET, "/categories/1/questions?page=2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{body}");

    let (status, body) = send(&app, Method::GET, "/categories/99/questions", None).await;
    assert_error(status, &body, 404, "resource not found");
}

#[tokio::test]
async fn quiz_skips_previous_questions() {
    let (app, _pool) = seeded(6).await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/quizzes",
        Some(json!({ "previous_questions": [1, 3], "quiz_category": { "type": "Science", "id": "1" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["question"]["id"], 5);
    assert_eq!(body["question"]["category"], "1");
}

#[tokio::test]
async fn quiz_over_all_categories() {
    let (app, _pool) = seeded(6).await;
    for _ in 0..10 {
        let (status, body) = send(
            &app,
            Method::POST,
            "/quizzes",
            Some(json!({ "previous_questions": [1, 2, 3], "quiz_category": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let id = body["question"]["id"].as_i64().unwrap();
        assert!((4..=6).contains(&id), "got {id}");
    }
}

#[tokio::test]
async fn exhausted_quiz_is_not_found() {
    let (app, _pool) = seeded(4).await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/quizzes",
        Some(json!({ "previous_questions": [2, 4], "quiz_category": 2 })),
    )
    .await;
    assert_error(status, &body, 404, "resource not found");

    let (status, body) = send(
        &app,
        Method::POST,
        "/quizzes",
        Some(json!({ "previous_questions": [], "quiz_category": "42" })),
    )
    .await;
    assert_error(status, &body, 404, "resource not found");
}

#[tokio::test]
async fn quiz_with_malformed_body_is_not_found() {
    let (app, _pool) = seeded(2).await;
    let (status, body) = send(&app, Method::POST, "/quizzes", None).await;
    assert_error(status, &body, 404, "resource not found");

    let (status, body) = send(
        &app,
        Method::POST,
        "/quizzes",
        Some(json!({ "previous_questions": "1,2" })),
    )
    .await;
    assert_error(status, &body, 404, "resource not found");
}

#[tokio::test]
async fn quiz_store_failure_is_not_found() {
    let (app, pool) = seeded(2).await;
    pool.close().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/quizzes",
        Some(json!({ "previous_questions": [], "quiz_category": 1 })),
    )
    .await;
    assert_error(status, &body, 404, "resource not found");
}

#[tokio::test]
async fn unknown_route_and_wrong_method() {
    let (app, _pool) = seeded(1).await;
    let (status, body) = send(&app, Method::GET, "/nowhere", None).await;
    assert_error(status, &body, 404, "resource not found");

    let (status, body) = send(&app, Method::PUT, "/questions", None).await;
    assert_error(status, &body, 405, "method not allowed");
}

#[tokio::test]
async fn cors_preflight_allows_any_origin() {
    let (app, _pool) = seeded(1).await;
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/questions")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
    let methods = response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap()
        .to_owned();
    assert!(methods.contains("DELETE"), "{methods}");
}

#[tokio::test]
async fn metrics_expose_quiz_counter() {
    let (app, _pool) = seeded(2).await;
    send(
        &app,
        Method::POST,
        "/quizzes",
        Some(json!({ "previous_questions": [], "quiz_category": 0 })),
    )
    .await;
    send(
        &app,
        Method::POST,
        "/quizzes",
        Some(json!({ "previous_questions": [], "quiz_category": { "id": 1, "type": "Science" } })),
    )
    .await;

    let request = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let text = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(text.to_vec()).unwrap();
    assert!(text.contains("quiz_questions_served_total"), "{text}");
    assert!(
        text.contains(r#"quiz_questions_served_total{category="Science"}"#),
        "{text}"
    );
    assert!(text.contains(r#"quiz_questions_served_total{category="all"}"#), "{text}");
    assert!(!text.contains(r#"category="1""#), "{text}");
}
