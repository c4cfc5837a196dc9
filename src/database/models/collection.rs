use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Collection {
    pub id: i32,
    pub title: String,
    pub created_at: NaiveDateTime,
    pub total_recipe: i32,
    pub user_id: i32,
}

/// Collection joined with what its public view needs: the owner's display
/// name and the image of the first linked recipe (lowest recipe id), if any.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CollectionDetail {
    #[sqlx(flatten)]
    pub collection: Collection,
    pub creator_name: String,
    pub first_recipe_image: Option<String>,
}
