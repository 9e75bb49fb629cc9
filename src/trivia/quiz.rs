use std::collections::HashSet;

use rand::Rng;
use sqlx::SqlitePool;

use crate::db::queries::questions::{get_all_questions, get_questions_for_category};
use crate::db::Question;

use super::category::ALL_CATEGORIES;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizScope {
    All,
    Category(i64),
}

impl From<i64> for QuizScope {
    fn from(category_id: i64) -> Self {
        if category_id == ALL_CATEGORIES {
            QuizScope::All
        } else {
            QuizScope::Category(category_id)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizPick {
    Question(Question),
    Exhausted,
}

/// Draws one question of `scope` that is not in `previous`. The client owns `previous`, nothing
/// is remembered between calls.
pub async fn pick(
    pool: &SqlitePool,
    scope: QuizScope,
    previous: &HashSet<i64>,
) -> sqlx::Result<QuizPick> {
    let candidates = match scope {
        QuizScope::All => get_all_questions(pool).await?,
        QuizScope::Category(id) => get_questions_for_category(pool, id).await?,
    };
    Ok(pick_from(candidates, previous, &mut rand::thread_rng()))
}

/// Uniform draw over `candidates - previous`.
pub fn pick_from<R: Rng + ?Sized>(
    candidates: Vec<Question>,
    previous: &HashSet<i64>,
    rng: &mut R,
) -> QuizPick {
    let mut eligible: Vec<Question> = candidates
        .into_iter()
        .filter(|q| !previous.contains(&q.id))
        .collect();
    if eligible.is_empty() {
        return QuizPick::Exhausted;
    }
    let index = rng.gen_range(0..eligible.len());
    QuizPick::Question(eligible.swap_remove(index))
}
