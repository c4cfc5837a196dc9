use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Public projection of a non-admin user. The `user` table also holds the
/// password hash and admin flag; neither is ever selected into this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Creator {
    pub id: i32,
    pub username: String,
    pub name: String,
}
