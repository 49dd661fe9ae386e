use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error::{ApiError, QueryError};
use crate::schema::Ingredient;

pub async fn list_ingredients(pool: &Pool<Postgres>) -> Result<Vec<Ingredient>, ApiError> {
    let list: Vec<Ingredient> = sqlx::query_as("SELECT * FROM ingredients ORDER BY name ASC")
        .fetch_all(pool)
        .await
        .map_err(|e| QueryError::from(e).into())?;

    Ok(list)
}

/// Natural-key lookup used by the seed path so an existing ingredient is
/// never recreated under a new identity.
pub async fn find_ingredient(name: &str, pool: &Pool<Postgres>) -> Result<Option<Uuid>, ApiError> {
    let row: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM ingredients WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await
        .map_err(|e| QueryError::from(e).into())?;

    Ok(row.map(|r| r.0))
}

pub async fn create_ingredient(
    name: &str,
    category: &str,
    pool: &Pool<Postgres>,
) -> Result<Uuid, ApiError> {
    let row: (Uuid,) =
        sqlx::query_as("INSERT INTO ingredients (name, category) VALUES ($1, $2) RETURNING id")
            .bind(name)
            .bind(category)
            .fetch_one(pool)
            .await
            .map_err(|e| QueryError::from(e).into())?;

    Ok(row.0)
}
