//! Bulk loader for the JSON seed description. Upserts match existing rows
//! by natural key (ingredient name, tag name+type, recipe title), and a
//! failing item logs a warning and is skipped instead of aborting the load.

use std::collections::HashMap;

use log::{info, warn};
use serde::Deserialize;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::actions::{ingredients, recipes, tags};
use crate::schema::NewRecipe;

#[derive(Deserialize, Debug, Default)]
pub struct SeedData {
    #[serde(default)]
    pub ingredients: Vec<IngredientSeed>,
    #[serde(default)]
    pub tags: Vec<TagSeed>,
    #[serde(default)]
    pub recipes: Vec<RecipeSeed>,
}

#[derive(Deserialize, Debug)]
pub struct IngredientSeed {
    pub name: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Deserialize, Debug)]
pub struct TagSeed {
    pub name: String,
    pub r#type: String,
}

#[derive(Deserialize, Debug)]
pub struct RecipeIngredientSeed {
    pub name: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub unit: String,
}

#[derive(Deserialize, Debug)]
pub struct RecipeSeed {
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
    pub ingredients: Vec<RecipeIngredientSeed>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl RecipeSeed {
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

pub async fn run(data: &SeedData, pool: &Pool<Postgres>) {
    let ingredient_ids = seed_ingredients(&data.ingredients, pool).await;
    let tag_ids = seed_tags(&data.tags, pool).await;
    seed_recipes(&data.recipes, &ingredient_ids, &tag_ids, pool).await;

    info!("seeding check complete");
}

async fn seed_ingredients(
    seeds: &[IngredientSeed],
    pool: &Pool<Postgres>,
) -> HashMap<String, Uuid> {
    let mut ids = HashMap::new();

    for seed in seeds {
        match ingredients::find_ingredient(&seed.name, pool).await {
            Ok(Some(id)) => {
                ids.insert(seed.name.clone(), id);
            }
            Ok(None) => match ingredients::create_ingredient(&seed.name, &seed.category, pool).await
            {
                Ok(id) => {
                    info!("inserted new ingredient: {}", seed.name);
                    ids.insert(seed.name.clone(), id);
                }
                Err(e) => warn!("failed to insert ingredient {}: {}", seed.name, e),
            },
            Err(e) => warn!("failed to look up ingredient {}: {}", seed.name, e),
        }
    }

    info!("processed {} ingredients", seeds.len());
    ids
}

async fn seed_tags(seeds: &[TagSeed], pool: &Pool<Postgres>) -> HashMap<String, Uuid> {
    let mut ids = HashMap::new();

    for seed in seeds {
        match tags::find_tag(&seed.name, &seed.r#type, pool).await {
            Ok(Some(id)) => {
                ids.insert(seed.name.clone(), id);
            }
            Ok(None) => match tags::create_tag(&seed.name, &seed.r#type, pool).await {
                Ok(id) => {
                    info!("inserted new tag: {}", seed.name);
                    ids.insert(seed.name.clone(), id);
                }
                Err(e) => warn!("failed to insert tag {}: {}", seed.name, e),
            },
            Err(e) => warn!("failed to look up tag {}: {}", seed.name, e),
        }
    }

    info!("processed {} tags", seeds.len());
    ids
}

async fn seed_recipes(
    seeds: &[RecipeSeed],
    ingredient_ids: &HashMap<String, Uuid>,
    tag_ids: &HashMap<String, Uuid>,
    pool: &Pool<Postgres>,
) {
    for seed in seeds {
        let recipe_id = match recipes::find_recipe(&seed.title, pool).await {
            Ok(Some(id)) => {
                info!("recipe '{}' already exists, checking associations", seed.title);
                id
            }
            Ok(None) => match recipes::create_recipe(&seed.draft(), &[], &[], pool).await {
                Ok(recipe) => {
                    info!("inserted new recipe: {}", seed.title);
                    recipe.id
                }
                Err(e) => {
                    warn!("failed to seed recipe {}: {}", seed.title, e);
                    continue;
                }
            },
            Err(e) => {
                warn!("failed to look up recipe {}: {}", seed.title, e);
                continue;
            }
        };

        for link in &seed.ingredients {
            let ingredient_id = match resolve_ingredient(&link.name, ingredient_ids, pool).await {
                Some(id) => id,
                None => {
                    warn!(
                        "missing ingredient '{}' for recipe '{}', skipping link",
                        link.name, seed.title
                    );
                    continue;
                }
            };

            if let Err(e) = recipes::upsert_recipe_ingredient(
                recipe_id,
                ingredient_id,
                &link.amount,
                &link.unit,
                pool,
            )
            .await
            {
                warn!(
                    "failed to link ingredient {} to {}: {}",
                    link.name, seed.title, e
                );
            }
        }

        for tag_name in &seed.tags {
            let tag_id = match resolve_tag(tag_name, tag_ids, pool).await {
                Some(id) => id,
                None => {
                    warn!(
                        "missing tag '{}' for recipe '{}', skipping link",
                        tag_name, seed.title
                    );
                    continue;
                }
            };

            if let Err(e) = tags::attach_tag(recipe_id, tag_id, pool).await {
                warn!("failed to link tag {} to {}: {}", tag_name, seed.title, e);
            }
        }
    }
}

async fn resolve_ingredient(
    name: &str,
    ids: &HashMap<String, Uuid>,
    pool: &Pool<Postgres>,
) -> Option<Uuid> {
    match ids.get(name) {
        Some(id) => Some(*id),
        None => ingredients::find_ingredient(name, pool).await.ok().flatten(),
    }
}

async fn resolve_tag(name: &str, ids: &HashMap<String, Uuid>, pool: &Pool<Postgres>) -> Option<Uuid> {
    match ids.get(name) {
        Some(id) => Some(*id),
        None => tags::find_tag_by_name(name, pool).await.ok().flatten(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_file_parses_with_sparse_fields() {
        let raw = r#"
        {
            "ingredients": [
                {"name": "Gin", "category": "spirit"},
                {"name": "Tonic Water"}
            ],
            "tags": [{"name": "Refreshing", "type": "flavor"}],
            "recipes": [
                {
                    "title": "Gin & Tonic",
                    "method": "build",
                    "steps": "Pour gin over ice, top with tonic.",
                    "strength": 5,
                    "ingredients": [
                        {"name": "Gin", "amount": "50", "unit": "ml"},
                        {"name": "Tonic Water", "amount": "100", "unit": "ml"}
                    ],
                    "tags": ["Refreshing"]
                }
            ]
        }
        "#;

        let data: SeedData = serde_json::from_str(raw).unwrap();
        assert_eq!(data.ingredients.len(), 2);
        assert_eq!(data.ingredients[1].category, "");
        assert_eq!(data.tags[0].r#type, "flavor");
        assert_eq!(data.recipes[0].ingredients.len(), 2);
        assert_eq!(data.recipes[0].tags, vec!["Refreshing"]);
        assert_eq!(data.recipes[0].sweetness, 0);
    }

    #[test]
    fn empty_document_is_a_valid_seed() {
        let data: SeedData = serde_json::from_str("{}").unwrap();
        assert!(data.ingredients.is_empty());
        assert!(data.tags.is_empty());
        assert!(data.recipes.is_empty());
    }
}
