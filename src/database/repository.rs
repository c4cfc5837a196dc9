use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Collection, CollectionDetail, Creator, Recipe};
use crate::types::UserId;

/// Persistence seam for users, recipes and collections.
///
/// Handlers only ever talk to this trait; the Postgres implementation below
/// is wired in `main`, and tests substitute an in-memory one.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn ping(&self) -> Result<(), DatabaseError>;

    /// All non-admin users, in repository order.
    async fn list_creators(&self) -> Result<Vec<Creator>, DatabaseError>;

    /// A non-admin user by id.
    async fn find_creator(&self, id: UserId) -> Result<Option<Creator>, DatabaseError>;

    async fn find_collection(&self, id: i32) -> Result<Option<CollectionDetail>, DatabaseError>;

    async fn collections_by_owner(&self, owner: UserId) -> Result<Vec<CollectionDetail>, DatabaseError>;

    /// Recipes linked to a collection, ordered by recipe id.
    async fn collection_recipes(&self, collection_id: i32) -> Result<Vec<Recipe>, DatabaseError>;

    async fn find_recipe(&self, id: i32) -> Result<Option<Recipe>, DatabaseError>;

    async fn recipes_by_owner(&self, owner: UserId) -> Result<Vec<Recipe>, DatabaseError>;

    async fn create_collection(&self, owner: UserId, title: &str) -> Result<Collection, DatabaseError>;

    async fn rename_collection(&self, id: i32, title: &str) -> Result<(), DatabaseError>;

    async fn delete_collection(&self, id: i32) -> Result<(), DatabaseError>;

    /// Link a recipe and bump `total_recipe`. Returns false if already linked.
    async fn add_recipe_to_collection(&self, collection_id: i32, recipe_id: i32) -> Result<bool, DatabaseError>;

    /// Unlink a recipe and decrement `total_recipe`. Returns false if it was not linked.
    async fn remove_recipe_from_collection(&self, collection_id: i32, recipe_id: i32) -> Result<bool, DatabaseError>;
}

/// Postgres implementation over the shared content schema
/// (`"user"`, `recipe`, `collection`, `collection_recipe`).
#[derive(Clone)]
pub struct PgContentRepository {
    pool: PgPool,
}

impl PgContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const RECIPE_COLUMNS: &str = r#"
    r.id, r.title, r."desc", r.tag::text AS tag, r.difficulty::text AS difficulty,
    r.video_path, r.duration, r.image_path, r.created_at, r.user_id
"#;

const COLLECTION_DETAIL_SELECT: &str = r#"
    SELECT c.id, c.title, c.created_at, c.total_recipe, c.user_id,
           u.name AS creator_name,
           (SELECT r.image_path
              FROM collection_recipe cr
              JOIN recipe r ON r.id = cr."recipeId"
             WHERE cr."collectionId" = c.id
             ORDER BY r.id
             LIMIT 1) AS first_recipe_image
      FROM collection c
      JOIN "user" u ON u.id = c.user_id
"#;

#[async_trait]
impl ContentRepository for PgContentRepository {
    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn list_creators(&self) -> Result<Vec<Creator>, DatabaseError> {
        let creators = sqlx::query_as::<_, Creator>(
            r#"SELECT id, username, name FROM "user" WHERE is_admin = false ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(creators)
    }

    async fn find_creator(&self, id: UserId) -> Result<Option<Creator>, DatabaseError> {
        let creator = sqlx::query_as::<_, Creator>(
            r#"SELECT id, username, name FROM "user" WHERE id = $1 AND is_admin = false"#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;
        Ok(creator)
    }

    async fn find_collection(&self, id: i32) -> Result<Option<CollectionDetail>, DatabaseError> {
        let sql = format!("{} WHERE c.id = $1", COLLECTION_DETAIL_SELECT);
        let collection = sqlx::query_as::<_, CollectionDetail>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(collection)
    }

    async fn collections_by_owner(&self, owner: UserId) -> Result<Vec<CollectionDetail>, DatabaseError> {
        let sql = format!("{} WHERE c.user_id = $1 ORDER BY c.id", COLLECTION_DETAIL_SELECT);
        let collections = sqlx::query_as::<_, CollectionDetail>(&sql)
            .bind(owner.get())
            .fetch_all(&self.pool)
            .await?;
        Ok(collections)
    }

    async fn collection_recipes(&self, collection_id: i32) -> Result<Vec<Recipe>, DatabaseError> {
        let sql = format!(
            r#"SELECT {} FROM collection_recipe cr
               JOIN recipe r ON r.id = cr."recipeId"
               WHERE cr."collectionId" = $1
               ORDER BY r.id"#,
            RECIPE_COLUMNS
        );
        let recipes = sqlx::query_as::<_, Recipe>(&sql)
            .bind(collection_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(recipes)
    }

    async fn find_recipe(&self, id: i32) -> Result<Option<Recipe>, DatabaseError> {
        let sql = format!("SELECT {} FROM recipe r WHERE r.id = $1", RECIPE_COLUMNS);
        let recipe = sqlx::query_as::<_, Recipe>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(recipe)
    }

    async fn recipes_by_owner(&self, owner: UserId) -> Result<Vec<Recipe>, DatabaseError> {
        let sql = format!("SELECT {} FROM recipe r WHERE r.user_id = $1 ORDER BY r.id", RECIPE_COLUMNS);
        let recipes = sqlx::query_as::<_, Recipe>(&sql)
            .bind(owner.get())
            .fetch_all(&self.pool)
            .await?;
        Ok(recipes)
    }

    async fn create_collection(&self, owner: UserId, title: &str) -> Result<Collection, DatabaseError> {
        let collection = sqlx::query_as::<_, Collection>(
            "INSERT INTO collection (title, user_id) VALUES ($1, $2)
             RETURNING id, title, created_at, total_recipe, user_id",
        )
        .bind(title)
        .bind(owner.get())
        .fetch_one(&self.pool)
        .await?;
        Ok(collection)
    }

    async fn rename_collection(&self, id: i32, title: &str) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE collection SET title = $1 WHERE id = $2")
            .bind(title)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Collection not found.".to_string()));
        }
        Ok(())
    }

    async fn delete_collection(&self, id: i32) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM collection WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Collection not found.".to_string()));
        }
        Ok(())
    }

    async fn add_recipe_to_collection(&self, collection_id: i32, recipe_id: i32) -> Result<bool, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"INSERT INTO collection_recipe ("recipeId", "collectionId") VALUES ($1, $2)
               ON CONFLICT DO NOTHING"#,
        )
        .bind(recipe_id)
        .bind(collection_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("UPDATE collection SET total_recipe = total_recipe + 1 WHERE id = $1")
            .bind(collection_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn remove_recipe_from_collection(&self, collection_id: i32, recipe_id: i32) -> Result<bool, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query(r#"DELETE FROM collection_recipe WHERE "recipeId" = $1 AND "collectionId" = $2"#)
            .bind(recipe_id)
            .bind(collection_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("UPDATE collection SET total_recipe = GREATEST(total_recipe - 1, 0) WHERE id = $1")
            .bind(collection_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }
}
