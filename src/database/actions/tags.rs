use std::collections::HashMap;

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error::{ApiError, QueryError};
use crate::schema::{RecipeTagRow, Tag};

pub async fn list_tags(pool: &Pool<Postgres>) -> Result<Vec<Tag>, ApiError> {
    let list: Vec<Tag> = sqlx::query_as("SELECT * FROM tags ORDER BY type ASC, name ASC")
        .fetch_all(pool)
        .await
        .map_err(|e| QueryError::from(e).into())?;

    Ok(list)
}

/// Natural key is (name, type).
pub async fn find_tag(
    name: &str,
    r#type: &str,
    pool: &Pool<Postgres>,
) -> Result<Option<Uuid>, ApiError> {
    let row: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM tags WHERE name = $1 AND type = $2")
        .bind(name)
        .bind(r#type)
        .fetch_optional(pool)
        .await
        .map_err(|e| QueryError::from(e).into())?;

    Ok(row.map(|r| r.0))
}

/// Name-only fallback for seed recipes that reference tags by name.
pub async fn find_tag_by_name(name: &str, pool: &Pool<Postgres>) -> Result<Option<Uuid>, ApiError> {
    let row: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM tags WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await
        .map_err(|e| QueryError::from(e).into())?;

    Ok(row.map(|r| r.0))
}

pub async fn create_tag(
    name: &str,
    r#type: &str,
    pool: &Pool<Postgres>,
) -> Result<Uuid, ApiError> {
    let row: (Uuid,) = sqlx::query_as("INSERT INTO tags (name, type) VALUES ($1, $2) RETURNING id")
        .bind(name)
        .bind(r#type)
        .fetch_one(pool)
        .await
        .map_err(|e| QueryError::from(e).into())?;

    Ok(row.0)
}

/// One batched lookup for a whole set of recipes. Callers take their tag
/// vector out of the map and fall back to an empty one, so recipes without
/// tags still serialize as `[]`.
pub async fn map_tags_for_recipes(
    recipe_ids: &[Uuid],
    pool: &Pool<Postgres>,
) -> Result<HashMap<Uuid, Vec<Tag>>, ApiError> {
    if recipe_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<RecipeTagRow> = sqlx::query_as(
        "
        SELECT rt.recipe_id, t.id, t.name, t.type
        FROM recipe_tags rt
        INNER JOIN tags t ON t.id = rt.tag_id
        WHERE rt.recipe_id = ANY($1)
    ",
    )
    .bind(recipe_ids)
    .fetch_all(pool)
    .await
    .map_err(|e| QueryError::from(e).into())?;

    let mut map: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    for row in rows {
        map.entry(row.recipe_id).or_default().push(Tag {
            id: row.id,
            name: row.name,
            r#type: row.r#type,
        });
    }

    Ok(map)
}

pub async fn attach_tag(
    recipe_id: Uuid,
    tag_id: Uuid,
    pool: &Pool<Postgres>,
) -> Result<(), ApiError> {
    sqlx::query(
        "INSERT INTO recipe_tags (recipe_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(recipe_id)
    .bind(tag_id)
    .execute(pool)
    .await
    .map_err(|e| QueryError::from(e).into())?;

    Ok(())
}
