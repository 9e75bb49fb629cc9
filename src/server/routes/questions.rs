use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::{
    error::Error,
    server::{
        app::AppState,
        deserializers::{non_empty_object, LooseI64},
    },
    settings::TriviaSettings,
    telemetry::QUESTION_MUTATIONS_CNTR,
    trivia::{NewQuestion, QuestionFinder, QuestionsPage},
};

use super::{ApiResponse, PageQuery};

// one body shape serves both search and create, a non-empty searchTerm selects search
#[derive(Deserialize)]
struct QuestionsBody {
    question: Option<String>,
    answer: Option<String>,
    category: Option<LooseI64>,
    difficulty: Option<LooseI64>,
    #[serde(rename = "searchTerm")]
    search_term: Option<String>,
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    State(settings): State<Arc<TriviaSettings>>,
    Query(page): Query<PageQuery>,
) -> ApiResponse<Json<QuestionsPage>> {
    let page = QuestionFinder::new(&pool, &settings)
        .list_all(page.number(), &settings.all_label)
        .await?;
    Ok(Json(page))
}

async fn create_or_search_questions(
    State(pool): State<SqlitePool>,
    State(settings): State<Arc<TriviaSettings>>,
    Query(page): Query<PageQuery>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResponse<Json<Value>> {
    let body: QuestionsBody = serde_json::from_value(non_empty_object(body)?)
        .map_err(|err| Error::unprocessable(err.to_string()))?;
    let finder = QuestionFinder::new(&pool, &settings);

    match body.search_term {
        Some(term) if !term.is_empty() => {
            let page = finder
                .search(&term, page.number(), &settings.search_label)
                .await?;
            Ok(Json(json!(page)))
        }
        _ => {
            finder
                .create(NewQuestion {
                    question: body.question,
                    answer: body.answer,
                    category: body.category.map(|c| c.0),
                    difficulty: body.difficulty.map(|d| d.0),
                })
                .await?;
            QUESTION_MUTATIONS_CNTR.with_label_values(&["create"]).inc();
            Ok(Json(json!({})))
        }
    }
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    State(settings): State<Arc<TriviaSettings>>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResponse<Json<Value>> {
    let Path(id) = id.map_err(|rejection| Error::not_found(rejection.body_text()))?;
    let deleted = QuestionFinder::new(&pool, &settings).delete(id).await?;
    QUESTION_MUTATIONS_CNTR.with_label_values(&["delete"]).inc();
    Ok(Json(json!({ "deleted": deleted })))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/questions",
            get(list_questions).post(create_or_search_questions),
        )
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}
