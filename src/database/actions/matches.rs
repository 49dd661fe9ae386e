use std::collections::HashMap;

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::constants::NEAR_MATCH_MISSING_LIMIT;
use crate::error::{ApiError, QueryError};
use crate::schema::RecipeMatch;

use super::tags::map_tags_for_recipes;

/// Aggregate core of the matcher: per recipe, its total link count and how
/// many of those links fall inside the owned set. Candidates are recipes
/// missing at most one ingredient.
const MATCH_BASE: &str = "
    WITH recipe_counts AS (
        SELECT recipe_id, COUNT(*) AS total_ingredients
        FROM recipe_ingredients
        GROUP BY recipe_id
    ),
    owned_matches AS (
        SELECT recipe_id, COUNT(*) AS owned_count
        FROM recipe_ingredients
        WHERE ingredient_id = ANY($1)
        GROUP BY recipe_id
    )
    SELECT r.id, r.title, r.description, r.image_url,
           r.glassware, r.method,
           r.sweetness, r.sourness, r.strength,
           rc.total_ingredients,
           COALESCE(om.owned_count, 0) AS owned_count,
           rc.total_ingredients - COALESCE(om.owned_count, 0) AS missing_count
    FROM recipes r
    INNER JOIN recipe_counts rc ON rc.recipe_id = r.id
    LEFT JOIN owned_matches om ON om.recipe_id = r.id
    WHERE rc.total_ingredients - COALESCE(om.owned_count, 0) <=";

/// Composes the match query from fixed clause fragments. Filter values only
/// ever travel through parameter binds; the builder just tracks which
/// placeholder each optional clause gets.
pub(crate) struct MatchQuery {
    sql: String,
    next_placeholder: usize,
}

impl MatchQuery {
    pub fn new() -> Self {
        // $1 is always the owned-ingredient set.
        Self {
            sql: format!("{MATCH_BASE} {NEAR_MATCH_MISSING_LIMIT}"),
            next_placeholder: 2,
        }
    }

    pub fn with_min_strength(&mut self) -> &mut Self {
        self.sql
            .push_str(&format!(" AND r.strength >= ${}", self.next_placeholder));
        self.next_placeholder += 1;
        self
    }

    /// OR semantics across the tag set: one matching tag link is enough.
    pub fn with_any_tag(&mut self) -> &mut Self {
        self.sql.push_str(&format!(
            "
    AND EXISTS (
        SELECT 1 FROM recipe_tags rt
        WHERE rt.recipe_id = r.id AND rt.tag_id = ANY(${})
    )",
            self.next_placeholder
        ));
        self.next_placeholder += 1;
        self
    }

    pub fn finish(mut self) -> String {
        self.sql
            .push_str("\n    ORDER BY missing_count ASC, r.title ASC");
        self.sql
    }
}

/// Ranks recipes by how many required ingredients the owned set leaves
/// missing. An empty owned set short-circuits without touching storage;
/// any storage failure aborts the whole match.
pub async fn match_recipes(
    owned: &[Uuid],
    min_strength: i32,
    tag_ids: &[Uuid],
    pool: &Pool<Postgres>,
) -> Result<Vec<RecipeMatch>, ApiError> {
    if owned.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder = MatchQuery::new();
    if min_strength > 0 {
        builder.with_min_strength();
    }
    if !tag_ids.is_empty() {
        builder.with_any_tag();
    }
    let sql = builder.finish();

    let mut query = sqlx::query_as::<_, RecipeMatch>(&sql).bind(owned);
    if min_strength > 0 {
        query = query.bind(min_strength);
    }
    if !tag_ids.is_empty() {
        query = query.bind(tag_ids);
    }

    let mut matches = query
        .fetch_all(pool)
        .await
        .map_err(|e| QueryError::from(e).into())?;

    attach_missing_ingredients(&mut matches, owned, pool).await?;

    let ids: Vec<Uuid> = matches.iter().map(|m| m.id).collect();
    let mut tag_map = map_tags_for_recipes(&ids, pool).await?;
    for m in matches.iter_mut() {
        m.tags = tag_map.remove(&m.id).unwrap_or_default();
    }

    Ok(matches)
}

/// Resolves the one unowned ingredient of every near match in a single
/// batched query. DISTINCT ON with a fixed order keeps the pick
/// deterministic should the missing-count threshold ever loosen.
async fn attach_missing_ingredients(
    matches: &mut [RecipeMatch],
    owned: &[Uuid],
    pool: &Pool<Postgres>,
) -> Result<(), ApiError> {
    let near: Vec<Uuid> = matches
        .iter()
        .filter(|m| m.missing_count == 1)
        .map(|m| m.id)
        .collect();

    if near.is_empty() {
        return Ok(());
    }

    let rows: Vec<(Uuid, Uuid)> = sqlx::query_as(
        "
        SELECT DISTINCT ON (recipe_id) recipe_id, ingredient_id
        FROM recipe_ingredients
        WHERE recipe_id = ANY($1) AND ingredient_id <> ALL($2)
        ORDER BY recipe_id, ingredient_id
    ",
    )
    .bind(&near)
    .bind(owned)
    .fetch_all(pool)
    .await
    .map_err(|e| QueryError::from(e).into())?;

    let missing: HashMap<Uuid, Uuid> = rows.into_iter().collect();
    for m in matches.iter_mut() {
        if let Some(ingredient_id) = missing.get(&m.id) {
            m.missing_ingredients = vec![*ingredient_id];
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_query_keeps_only_near_matches() {
        let sql = MatchQuery::new().finish();

        assert!(sql.contains("COUNT(*) AS total_ingredients"));
        assert!(sql.contains("ingredient_id = ANY($1)"));
        assert!(sql.contains("<= 1"));
        assert!(sql.ends_with("ORDER BY missing_count ASC, r.title ASC"));
    }

    #[test]
    fn optional_clauses_are_absent_by_default() {
        let sql = MatchQuery::new().finish();

        assert!(!sql.contains("strength >="));
        assert!(!sql.contains("recipe_tags"));
    }

    #[test]
    fn min_strength_binds_the_second_placeholder() {
        let mut builder = MatchQuery::new();
        builder.with_min_strength();
        let sql = builder.finish();

        assert!(sql.contains("r.strength >= $2"));
    }

    #[test]
    fn placeholders_stay_contiguous_with_both_filters() {
        let mut builder = MatchQuery::new();
        builder.with_min_strength();
        builder.with_any_tag();
        let sql = builder.finish();

        assert!(sql.contains("r.strength >= $2"));
        assert!(sql.contains("rt.tag_id = ANY($3)"));
    }

    #[test]
    fn tag_filter_alone_takes_the_second_placeholder() {
        let mut builder = MatchQuery::new();
        builder.with_any_tag();
        let sql = builder.finish();

        assert!(sql.contains("rt.tag_id = ANY($2)"));
        assert!(!sql.contains("$3"));
    }
}
