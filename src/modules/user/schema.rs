use serde::Serialize;
use sqlx::prelude::FromRow;

#[allow(unused)]
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Public view of a user; the image itself is served separately.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub has_image: bool,
}
