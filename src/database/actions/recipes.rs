use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error::{ApiError, QueryError};
use crate::pagination::Page;
use crate::schema::{
    NewRecipe, NewRecipeIngredient, Recipe, RecipeIngredientDetail, SortDirection, Tag,
};

use super::tags::map_tags_for_recipes;

/// Creates the recipe row and all of its links in one transaction. A link
/// referencing a missing ingredient or tag violates a foreign key, the
/// transaction rolls back and no partial recipe is ever visible.
pub async fn create_recipe(
    draft: &NewRecipe,
    links: &[NewRecipeIngredient],
    tags: &[Tag],
    pool: &Pool<Postgres>,
) -> Result<Recipe, ApiError> {
    let mut tr = pool
        .begin()
        .await
        .map_err(|e| QueryError::from(e).into())?;

    let mut recipe: Recipe = sqlx::query_as(
        "
        INSERT INTO recipes (title, description, glassware, method, steps, image_url, sweetness, sourness, strength)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
    ",
    )
    .bind(&draft.title)
    .bind(&draft.description)
    .bind(&draft.glassware)
    .bind(&draft.method)
    .bind(&draft.steps)
    .bind(&draft.image_url)
    .bind(draft.sweetness)
    .bind(draft.sourness)
    .bind(draft.strength)
    .fetch_one(&mut *tr)
    .await
    .map_err(|e| QueryError::from(e).into())?;

    for link in links {
        sqlx::query(
            "
            INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount, unit)
            VALUES ($1, $2, $3, $4)
        ",
        )
        .bind(recipe.id)
        .bind(link.ingredient_id)
        .bind(&link.amount)
        .bind(&link.unit)
        .execute(&mut *tr)
        .await
        .map_err(|e| QueryError::from(e).into())?;
    }

    for tag in tags {
        sqlx::query("INSERT INTO recipe_tags (recipe_id, tag_id) VALUES ($1, $2)")
            .bind(recipe.id)
            .bind(tag.id)
            .execute(&mut *tr)
            .await
            .map_err(|e| QueryError::from(e).into())?;
    }

    tr.commit()
        .await
        .map_err(|e| QueryError::from(e).into())?;

    recipe.tags = tags.to_vec();
    Ok(recipe)
}

pub async fn find_recipe(title: &str, pool: &Pool<Postgres>) -> Result<Option<Uuid>, ApiError> {
    let row: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM recipes WHERE title = $1")
        .bind(title)
        .fetch_optional(pool)
        .await
        .map_err(|e| QueryError::from(e).into())?;

    Ok(row.map(|r| r.0))
}

/// One page of recipes ordered by strength, with the paging-independent
/// total. Tag sets are attached through a single batched lookup keyed by
/// the page's recipe ids, never per row.
pub async fn fetch_recipes(
    limit: i64,
    offset: i64,
    direction: SortDirection,
    pool: &Pool<Postgres>,
) -> Result<Page<Recipe>, ApiError> {
    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipes")
        .fetch_one(pool)
        .await
        .map_err(|e| QueryError::from(e).into())?;

    let query = match direction {
        SortDirection::Asc => "SELECT * FROM recipes ORDER BY strength ASC LIMIT $1 OFFSET $2",
        SortDirection::Desc => "SELECT * FROM recipes ORDER BY strength DESC LIMIT $1 OFFSET $2",
    };

    let mut recipes: Vec<Recipe> = sqlx::query_as(query)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .map_err(|e| QueryError::from(e).into())?;

    let ids: Vec<Uuid> = recipes.iter().map(|r| r.id).collect();
    let mut tag_map = map_tags_for_recipes(&ids, pool).await?;
    for recipe in recipes.iter_mut() {
        recipe.tags = tag_map.remove(&recipe.id).unwrap_or_default();
    }

    Ok(Page {
        items: recipes,
        total: total.0,
    })
}

/// Single-recipe view with resolved ingredient details and tags attached.
pub async fn get_recipe(id: Uuid, pool: &Pool<Postgres>) -> Result<Option<Recipe>, ApiError> {
    let recipe: Option<Recipe> = sqlx::query_as("SELECT * FROM recipes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| QueryError::from(e).into())?;

    let mut recipe = match recipe {
        Some(recipe) => recipe,
        None => return Ok(None),
    };

    let details: Vec<RecipeIngredientDetail> = sqlx::query_as(
        "
        SELECT i.id AS ingredient_id, i.name, i.category, ri.amount, ri.unit
        FROM recipe_ingredients ri
        INNER JOIN ingredients i ON i.id = ri.ingredient_id
        WHERE ri.recipe_id = $1
    ",
    )
    .bind(id)
    .fetch_all(pool)
    .await
    .map_err(|e| QueryError::from(e).into())?;

    recipe.ingredients = details;

    let mut tag_map = map_tags_for_recipes(&[id], pool).await?;
    recipe.tags = tag_map.remove(&id).unwrap_or_default();

    Ok(Some(recipe))
}

/// Seed-path link upsert: re-inserting an existing (recipe, ingredient)
/// pair overwrites amount/unit instead of duplicating the link.
pub async fn upsert_recipe_ingredient(
    recipe_id: Uuid,
    ingredient_id: Uuid,
    amount: &str,
    unit: &str,
    pool: &Pool<Postgres>,
) -> Result<(), ApiError> {
    sqlx::query(
        "
        INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount, unit)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (recipe_id, ingredient_id) DO UPDATE
        SET amount = EXCLUDED.amount, unit = EXCLUDED.unit
    ",
    )
    .bind(recipe_id)
    .bind(ingredient_id)
    .bind(amount)
    .bind(unit)
    .execute(pool)
    .await
    .map_err(|e| QueryError::from(e).into())?;

    Ok(())
}
