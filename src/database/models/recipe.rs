use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: i32,
    pub title: String,
    pub desc: String,
    pub tag: String,
    pub difficulty: String,
    /// Stored filename under the videos directory. Server-internal.
    #[serde(skip_serializing)]
    pub video_path: String,
    pub duration: i32,
    /// Stored filename under the images directory; rewritten to a URL on output.
    pub image_path: String,
    pub created_at: NaiveDateTime,
    pub user_id: i32,
}
