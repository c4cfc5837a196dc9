use chrono::NaiveDateTime;
use serde::Serialize;

use crate::database::models::{Collection, CollectionDetail, Creator, Recipe};
use crate::soap::SubscriptionStatus;

/// Cover shown for a collection that has no recipes yet.
pub const DEFAULT_COVER: &str = "default-pro-cover.png";

/// Builds client-facing media URLs from stored file names:
/// `{public base}/public/{filename}`.
#[derive(Debug, Clone)]
pub struct MediaUrls {
    base: String,
}

impl MediaUrls {
    pub fn new(public_base_url: &str) -> Self {
        Self {
            base: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn public_url(&self, filename: &str) -> String {
        format!("{}/public/{}", self.base, filename)
    }

    /// Cover for a collection: the first linked recipe's image, or the default.
    pub fn cover_url(&self, first_recipe_image: Option<&str>) -> String {
        self.public_url(first_recipe_image.unwrap_or(DEFAULT_COVER))
    }

    pub fn collection(&self, detail: CollectionDetail) -> CollectionView {
        let cover = self.cover_url(detail.first_recipe_image.as_deref());
        let Collection {
            id,
            title,
            created_at,
            total_recipe,
            user_id,
        } = detail.collection;

        CollectionView {
            id,
            title,
            created_at,
            total_recipe,
            cover,
            user_id,
            creator_name: detail.creator_name,
        }
    }

    pub fn recipe(&self, recipe: Recipe) -> RecipeView {
        RecipeView {
            image_path: self.public_url(&recipe.image_path),
            id: recipe.id,
            title: recipe.title,
            desc: recipe.desc,
            tag: recipe.tag,
            difficulty: recipe.difficulty,
            duration: recipe.duration,
            created_at: recipe.created_at,
            user_id: recipe.user_id,
        }
    }

    pub fn recipes(&self, recipes: Vec<Recipe>) -> Vec<RecipeView> {
        recipes.into_iter().map(|r| self.recipe(r)).collect()
    }
}

/// Collection as returned to clients, with its computed cover URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionView {
    pub id: i32,
    pub title: String,
    pub created_at: NaiveDateTime,
    pub total_recipe: i32,
    pub cover: String,
    pub user_id: i32,
    pub creator_name: String,
}

/// Recipe as returned to clients. Never carries the stored video name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeView {
    pub id: i32,
    pub title: String,
    pub desc: String,
    pub tag: String,
    pub difficulty: String,
    pub duration: i32,
    pub image_path: String,
    pub created_at: NaiveDateTime,
    pub user_id: i32,
}

/// Creator entry of the pro listing. `subsStatus` is null when the
/// subscription service could not answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatorStatus {
    pub id: i32,
    pub username: String,
    pub name: String,
    #[serde(rename = "subsStatus")]
    pub subs_status: Option<SubscriptionStatus>,
}

impl CreatorStatus {
    pub fn new(creator: Creator, subs_status: Option<SubscriptionStatus>) -> Self {
        Self {
            id: creator.id,
            username: creator.username,
            name: creator.name,
            subs_status,
        }
    }
}
