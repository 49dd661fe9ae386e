use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub category: String,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub r#type: String,
}

/// Row of the batched recipe-tag lookup; `recipe_id` keys the grouping.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct RecipeTagRow {
    pub recipe_id: Uuid,
    pub id: Uuid,
    pub name: String,
    pub r#type: String,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub glassware: String,
    pub method: String,
    pub steps: String,
    pub image_url: String,
    pub sweetness: i32,
    pub sourness: i32,
    pub strength: i32,
    pub created_at: DateTime<Utc>,

    /// Attached for the single-recipe view only, never at list granularity.
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ingredients: Vec<RecipeIngredientDetail>,
    #[sqlx(skip)]
    pub tags: Vec<Tag>,
}

/// Column set for a recipe insert; id and created_at are generated.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub title: String,
    pub description: String,
    pub glassware: String,
    pub method: String,
    pub steps: String,
    pub image_url: String,
    pub sweetness: i32,
    pub sourness: i32,
    pub strength: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecipeIngredient {
    pub ingredient_id: Uuid,
    pub amount: String,
    pub unit: String,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct RecipeIngredientDetail {
    pub ingredient_id: Uuid,
    pub name: String,
    pub category: String,
    pub amount: String,
    pub unit: String,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct RecipeMatch {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub glassware: String,
    pub method: String,
    pub sweetness: i32,
    pub sourness: i32,
    pub strength: i32,

    pub total_ingredients: i64,
    pub owned_count: i64,
    pub missing_count: i64,

    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_ingredients: Vec<Uuid>,
    #[sqlx(skip)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Anything other than an explicit `asc` sorts descending.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.to_ascii_lowercase()).as_deref() {
            Some("asc") => Self::Asc,
            _ => Self::Desc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_direction_defaults_to_desc() {
        assert_eq!(SortDirection::parse(None), SortDirection::Desc);
        assert_eq!(SortDirection::parse(Some("")), SortDirection::Desc);
        assert_eq!(SortDirection::parse(Some("sideways")), SortDirection::Desc);
    }

    #[test]
    fn sort_direction_accepts_asc_case_insensitively() {
        assert_eq!(SortDirection::parse(Some("asc")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("ASC")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("desc")), SortDirection::Desc);
    }

    #[test]
    fn match_serialization_omits_empty_missing_list() {
        let m = RecipeMatch {
            id: Uuid::new_v4(),
            title: String::from("Gin & Tonic"),
            description: String::new(),
            image_url: String::new(),
            glassware: String::from("highball"),
            method: String::from("build"),
            sweetness: 2,
            sourness: 1,
            strength: 5,
            total_ingredients: 2,
            owned_count: 2,
            missing_count: 0,
            missing_ingredients: vec![],
            tags: vec![],
        };

        let value = serde_json::to_value(&m).unwrap();
        assert!(value.get("missing_ingredients").is_none());
        assert_eq!(value["tags"], serde_json::json!([]));
        assert_eq!(value["missing_count"], 0);
    }

    #[test]
    fn match_serialization_keeps_nonempty_missing_list() {
        let missing = Uuid::new_v4();
        let m = RecipeMatch {
            id: Uuid::new_v4(),
            title: String::from("Negroni"),
            description: String::new(),
            image_url: String::new(),
            glassware: String::new(),
            method: String::new(),
            sweetness: 3,
            sourness: 0,
            strength: 8,
            total_ingredients: 3,
            owned_count: 2,
            missing_count: 1,
            missing_ingredients: vec![missing],
            tags: vec![],
        };

        let value = serde_json::to_value(&m).unwrap();
        assert_eq!(
            value["missing_ingredients"],
            serde_json::json!([missing.to_string()])
        );
    }

    #[test]
    fn recipe_serialization_omits_ingredients_at_list_granularity() {
        let recipe = Recipe {
            id: Uuid::new_v4(),
            title: String::from("Daiquiri"),
            description: String::new(),
            glassware: String::from("coupe"),
            method: String::from("shake"),
            steps: String::from("Shake with ice, double strain."),
            image_url: String::new(),
            sweetness: 4,
            sourness: 6,
            strength: 6,
            created_at: Utc::now(),
            ingredients: vec![],
            tags: vec![],
        };

        let value = serde_json::to_value(&recipe).unwrap();
        assert!(value.get("ingredients").is_none());
        assert_eq!(value["tags"], serde_json::json!([]));
    }
}
