use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::db::queries::questions::{self, NewQuestionRow};
use crate::db::Question;
use crate::error::{Error, Result};
use crate::settings::TriviaSettings;

use super::category::{category_map, resolve, Resolved, ALL_CATEGORIES};
use super::paginate::paginate;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionsPage {
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub current_category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<BTreeMap<i64, String>>,
}

/// Unvalidated create request, every field may be missing.
#[derive(Debug, Clone, Default)]
pub struct NewQuestion {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<i64>,
    pub difficulty: Option<i64>,
}

impl NewQuestion {
    fn validate(self) -> Result<NewQuestionRow> {
        let question = non_empty(self.question, "question")?;
        let answer = non_empty(self.answer, "answer")?;
        let category = match self.category {
            None | Some(ALL_CATEGORIES) => return Err(Error::unprocessable("category is required")),
            Some(category) => category,
        };
        let difficulty = self
            .difficulty
            .ok_or_else(|| Error::unprocessable("difficulty is required"))?;
        Ok(NewQuestionRow {
            question,
            answer,
            category,
            difficulty,
        })
    }
}

fn non_empty(value: Option<String>, field: &str) -> Result<String> {
    match value {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(Error::unprocessable(format!("{field} must not be empty"))),
    }
}

pub struct QuestionFinder<'a> {
    pool: &'a SqlitePool,
    per_page: usize,
    all_label: &'a str,
}

impl<'a> QuestionFinder<'a> {
    pub fn new(pool: &'a SqlitePool, settings: &'a TriviaSettings) -> Self {
        Self {
            pool,
            per_page: settings.questions_per_page,
            all_label: &settings.all_label,
        }
    }

    pub async fn categories(&self) -> Result<BTreeMap<i64, String>> {
        let categories = category_map(self.pool).await?;
        if categories.is_empty() {
            return Err(Error::not_found("no categories"));
        }
        Ok(categories)
    }

    /// Page of every question. An empty page is reported as not found, also past the end of
    /// a non-empty store.
    pub async fn list_all(&self, page: usize, current_category: &str) -> Result<QuestionsPage> {
        let all = questions::get_all_questions(self.pool).await?;
        let current = paginate(page, self.per_page, &all);
        if current.is_empty() {
            return Err(Error::not_found(format!("questions page {page}")));
        }
        Ok(QuestionsPage {
            questions: current.to_vec(),
            total_questions: all.len(),
            current_category: current_category.to_owned(),
            categories: Some(category_map(self.pool).await?),
        })
    }

    pub async fn search(
        &self,
        term: &str,
        page: usize,
        current_category: &str,
    ) -> Result<QuestionsPage> {
        let matches = questions::search_questions(self.pool, term).await?;
        if matches.is_empty() {
            return Err(Error::not_found(format!("questions matching {term:?}")));
        }
        tracing::debug!(term, total = matches.len(), "search matched");
        Ok(QuestionsPage {
            questions: paginate(page, self.per_page, &matches).to_vec(),
            total_questions: matches.len(),
            current_category: current_category.to_owned(),
            categories: None,
        })
    }

    /// `totalQuestions` counts the returned page only.
    pub async fn by_category(&self, category_id: i64, page: usize) -> Result<QuestionsPage> {
        let (label, selection) = match resolve(self.pool, category_id).await? {
            Resolved::NotFound => {
                return Err(Error::not_found(format!("category {category_id}")));
            }
            Resolved::All => (
                self.all_label.to_owned(),
                questions::get_all_questions(self.pool).await?,
            ),
            Resolved::Label(label) => (
                label,
                questions::get_questions_for_category(self.pool, category_id).await?,
            ),
        };
        let current = paginate(page, self.per_page, &selection).to_vec();
        if current.is_empty() {
            return Err(Error::not_found(format!(
                "page {page} of category {category_id}"
            )));
        }
        Ok(QuestionsPage {
            total_questions: current.len(),
            questions: current,
            current_category: label,
            categories: None,
        })
    }

    pub async fn create(&self, new: NewQuestion) -> Result<i64> {
        let row = new.validate()?;
        match resolve(self.pool, row.category)
            .await
            .map_err(store_failure)?
        {
            Resolved::Label(_) => {}
            _ => {
                return Err(Error::unprocessable(format!(
                    "unknown category {}",
                    row.category
                )))
            }
        }

        let mut tx = self.pool.begin().await.map_err(store_failure)?;
        match questions::create_question(&mut *tx, &row).await {
            Ok(id) => {
                tx.commit().await.map_err(store_failure)?;
                tracing::info!(id, category = row.category, "question created");
                Ok(id)
            }
            Err(err) => {
                rollback(tx).await;
                Err(store_failure(err))
            }
        }
    }

    pub async fn delete(&self, id: i64) -> Result<i64> {
        let mut tx = self.pool.begin().await.map_err(store_failure)?;
        match questions::delete_question(&mut *tx, id).await {
            Ok(0) => {
                rollback(tx).await;
                Err(Error::not_found(format!("question {id}")))
            }
            Ok(_) => {
                tx.commit().await.map_err(store_failure)?;
                tracing::info!(id, "question deleted");
                Ok(id)
            }
            Err(err) => {
                rollback(tx).await;
                Err(store_failure(err))
            }
        }
    }
}

async fn rollback(tx: Transaction<'_, Sqlite>) {
    if let Err(err) = tx.rollback().await {
        tracing::warn!("Rollback failed: {err}");
    }
}

fn store_failure(err: sqlx::Error) -> Error {
    tracing::error!("Store failure during mutation: {err}");
    Error::unprocessable(err.to_string())
}
