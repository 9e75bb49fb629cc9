use std::collections::BTreeMap;

use sqlx::SqlitePool;

use crate::db::queries::categories::{get_all_categories, get_category};

/// Category id meaning "no filter".
pub const ALL_CATEGORIES: i64 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Label(String),
    All,
    NotFound,
}

pub async fn resolve(pool: &SqlitePool, category_id: i64) -> sqlx::Result<Resolved> {
    if category_id == ALL_CATEGORIES {
        return Ok(Resolved::All);
    }
    Ok(match get_category(pool, category_id).await? {
        Some(category) => Resolved::Label(category.kind),
        None => Resolved::NotFound,
    })
}

/// Every category as id -> label, ordered by id.
pub async fn category_map(pool: &SqlitePool) -> sqlx::Result<BTreeMap<i64, String>> {
    Ok(get_all_categories(pool)
        .await?
        .into_iter()
        .map(|c| (c.id, c.kind))
        .collect())
}
