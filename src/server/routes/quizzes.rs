use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::{
    error::Error,
    server::{
        app::AppState,
        deserializers::{json_body, CategoryRef, LooseI64},
    },
    settings::TriviaSettings,
    telemetry::{QUIZ_EXHAUSTED_CNTR, QUIZ_QUESTIONS_CNTR},
    trivia::{pick, resolve, QuizPick, QuizScope, Resolved, ALL_CATEGORIES},
};

use super::ApiResponse;

#[derive(Deserialize)]
struct QuizRequest {
    previous_questions: Option<Vec<LooseI64>>,
    quiz_category: Option<CategoryRef>,
}

/// Counter label for a quiz scope: the category's display label, `unknown` for ids that do not
/// resolve.
async fn scope_label(pool: &SqlitePool, settings: &TriviaSettings, scope: QuizScope) -> String {
    let id = match scope {
        QuizScope::All => return settings.all_label.clone(),
        QuizScope::Category(id) => id,
    };
    match resolve(pool, id).await {
        Ok(Resolved::Label(label)) => label,
        Ok(Resolved::All) => settings.all_label.clone(),
        Ok(Resolved::NotFound) => "unknown".to_owned(),
        Err(err) => {
            tracing::warn!(category = id, "Failed to resolve quiz category label: {err}");
            "unknown".to_owned()
        }
    }
}

// every failure on this endpoint, including unreadable bodies and store errors, is reported as
// "no question available"
async fn next_quiz_question(
    State(pool): State<SqlitePool>,
    State(settings): State<Arc<TriviaSettings>>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResponse<Json<Value>> {
    let request: QuizRequest = json_body(body)
        .and_then(|value| {
            serde_json::from_value::<QuizRequest>(value).map_err(|err| Error::BadRequest(err.to_string()))
        })
        .map_err(|err| {
            tracing::debug!("Unreadable quiz request: {err}");
            Error::not_found("no quiz question available")
        })?;
    let previous: HashSet<i64> = request
        .previous_questions
        .unwrap_or_default()
        .into_iter()
        .map(|id| id.0)
        .collect();
    let scope = QuizScope::from(request.quiz_category.map_or(ALL_CATEGORIES, |c| c.id()));

    let picked = pick(&pool, scope, &previous).await.map_err(|err| {
        tracing::error!("Failed to pick quiz question: {err}");
        Error::not_found("no quiz question available")
    })?;
    let label = scope_label(&pool, &settings, scope).await;

    match picked {
        QuizPick::Question(question) => {
            QUIZ_QUESTIONS_CNTR.with_label_values(&[label.as_str()]).inc();
            Ok(Json(json!({ "question": question })))
        }
        QuizPick::Exhausted => {
            QUIZ_EXHAUSTED_CNTR.with_label_values(&[label.as_str()]).inc();
            tracing::debug!(
                category = %label,
                seen = previous.len(),
                "No unseen quiz question left"
            );
            Err(Error::not_found("no unseen quiz question left"))
        }
    }
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_quiz_question))
        .with_state(state)
}
