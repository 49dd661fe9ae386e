use serde::Deserialize;
use sqlx::{Pool, Postgres};
use uuid::Uuid;
use warp::http::StatusCode;
use warp::{reply, Rejection, Reply};

use crate::actions::{ingredients, matches, recipes, tags};
use crate::constants::{TASTE_SCALE_MAX, TASTE_SCALE_MIN};
use crate::error::ApiError;
use crate::pagination::ListQuery;
use crate::schema::{NewRecipe, NewRecipeIngredient, Tag};

pub async fn list_ingredients(pool: Pool<Postgres>) -> Result<impl Reply, Rejection> {
    let list = ingredients::list_ingredients(&pool)
        .await
        .map_err(warp::reject::custom)?;

    Ok(reply::json(&list))
}

pub async fn list_tags(pool: Pool<Postgres>) -> Result<impl Reply, Rejection> {
    let list = tags::list_tags(&pool).await.map_err(warp::reject::custom)?;

    Ok(reply::json(&list))
}

pub async fn list_recipes(query: ListQuery, pool: Pool<Postgres>) -> Result<impl Reply, Rejection> {
    let params = query.params();
    let page = recipes::fetch_recipes(params.limit, params.offset, query.direction(), &pool)
        .await
        .map_err(warp::reject::custom)?;

    Ok(reply::json(&page))
}

pub async fn get_recipe(id: String, pool: Pool<Postgres>) -> Result<impl Reply, Rejection> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| warp::reject::custom(ApiError::Validation(String::from("invalid recipe id"))))?;

    let recipe = recipes::get_recipe(id, &pool)
        .await
        .map_err(warp::reject::custom)?;

    match recipe {
        Some(recipe) => Ok(reply::json(&recipe)),
        None => Err(warp::reject::custom(ApiError::NotFound(String::from(
            "recipe not found",
        )))),
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct CreateRecipeRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub glassware: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub steps: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub sweetness: i32,
    #[serde(default)]
    pub sourness: i32,
    #[serde(default)]
    pub strength: i32,
    #[serde(default)]
    pub ingredients: Vec<NewRecipeIngredient>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl CreateRecipeRequest {
    /// Field-level validation, performed before any store call.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty()
            || self.method.trim().is_empty()
            || self.steps.trim().is_empty()
        {
            return Err(ApiError::Validation(String::from(
                "title, method and steps are required",
            )));
        }

        for value in [self.sweetness, self.sourness, self.strength] {
            if !(TASTE_SCALE_MIN..=TASTE_SCALE_MAX).contains(&value) {
                return Err(ApiError::Validation(format!(
                    "taste attributes must be between {TASTE_SCALE_MIN} and {TASTE_SCALE_MAX}"
                )));
            }
        }

        Ok(())
    }

    fn draft(&self) -> NewRecipe {
        NewRecipe {
            title: self.title.clone(),
            description: self.description.clone(),
            glassware: self.glassware.clone(),
            method: self.method.clone(),
            steps: self.steps.clone(),
            image_url: self.image_url.clone(),
            sweetness: self.sweetness,
            sourness: self.sourness,
            strength: self.strength,
        }
    }
}

pub async fn create_recipe(
    request: CreateRecipeRequest,
    pool: Pool<Postgres>,
) -> Result<impl Reply, Rejection> {
    request.validate().map_err(warp::reject::custom)?;

    let recipe = recipes::create_recipe(&request.draft(), &request.ingredients, &request.tags, &pool)
        .await
        .map_err(warp::reject::custom)?;

    Ok(reply::with_status(
        reply::json(&recipe),
        StatusCode::CREATED,
    ))
}

#[derive(Deserialize, Debug, Default)]
pub struct MatchRequest {
    #[serde(default)]
    pub owned_ingredient_ids: Vec<String>,
    #[serde(default)]
    pub min_strength: i32,
    #[serde(default)]
    pub tag_ids: Vec<String>,
}

/// Ids that parse as uuids, in request order. A malformed id is not an
/// error; it can never contribute to an owned count, so it is dropped.
pub fn parse_id_list(values: &[String]) -> Vec<Uuid> {
    values
        .iter()
        .filter_map(|v| Uuid::parse_str(v).ok())
        .collect()
}

pub async fn match_cocktails(
    request: MatchRequest,
    pool: Pool<Postgres>,
) -> Result<impl Reply, Rejection> {
    let owned = parse_id_list(&request.owned_ingredient_ids);
    let tag_ids = parse_id_list(&request.tag_ids);

    let matches = matches::match_recipes(&owned, request.min_strength, &tag_ids, &pool)
        .await
        .map_err(warp::reject::custom)?;

    Ok(reply::json(&matches))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateRecipeRequest {
        CreateRecipeRequest {
            title: String::from("Gin & Tonic"),
            method: String::from("build"),
            steps: String::from("Pour gin over ice, top with tonic."),
            sweetness: 2,
            sourness: 1,
            strength: 5,
            ..Default::default()
        }
    }

    #[test]
    fn create_request_with_required_fields_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn empty_title_is_rejected() {
        let mut request = valid_request();
        request.title = String::from("   ");
        assert!(matches!(
            request.validate(),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn empty_method_or_steps_is_rejected() {
        let mut request = valid_request();
        request.method = String::new();
        assert!(request.validate().is_err());

        let mut request = valid_request();
        request.steps = String::new();
        assert!(request.validate().is_err());
    }

    #[test]
    fn taste_attributes_must_stay_on_the_scale() {
        let mut request = valid_request();
        request.strength = TASTE_SCALE_MAX + 1;
        assert!(request.validate().is_err());

        let mut request = valid_request();
        request.sourness = TASTE_SCALE_MIN - 1;
        assert!(request.validate().is_err());
    }

    #[test]
    fn malformed_ids_are_dropped_not_rejected() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let values = vec![
            a.to_string(),
            String::from("not-a-uuid"),
            b.to_string(),
            String::new(),
        ];

        assert_eq!(parse_id_list(&values), vec![a, b]);
    }

    #[test]
    fn match_request_fields_all_default() {
        let request: MatchRequest = serde_json::from_str("{}").unwrap();
        assert!(request.owned_ingredient_ids.is_empty());
        assert_eq!(request.min_strength, 0);
        assert!(request.tag_ids.is_empty());
    }
}
