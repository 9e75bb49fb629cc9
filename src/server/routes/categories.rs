use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::{
    error::Error,
    server::app::AppState,
    settings::TriviaSettings,
    trivia::{QuestionFinder, QuestionsPage},
};

use super::{ApiResponse, PageQuery};

async fn get_categories(
    State(pool): State<SqlitePool>,
    State(settings): State<Arc<TriviaSettings>>,
) -> ApiResponse<Json<Value>> {
    let categories = QuestionFinder::new(&pool, &settings).categories().await?;
    Ok(Json(json!({ "categories": categories })))
}

// a non-integer id does not name a category
async fn questions_for_category(
    State(pool): State<SqlitePool>,
    State(settings): State<Arc<TriviaSettings>>,
    id: Result<Path<i64>, PathRejection>,
    Query(page): Query<PageQuery>,
) -> ApiResponse<Json<QuestionsPage>> {
    let Path(id) = id.map_err(|rejection| Error::not_found(rejection.body_text()))?;
    let page = QuestionFinder::new(&pool, &settings)
        .by_category(id, page.number())
        .await?;
    Ok(Json(page))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(questions_for_category))
        .with_state(state)
}
