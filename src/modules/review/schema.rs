use serde::Serialize;
use sqlx::prelude::FromRow;

/// A review together with its movie, rating and author.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ReviewEntity {
    pub id: i64,
    pub review: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub rating: i32,
    pub movie_id: i64,
    pub movie_title: String,
    pub user_id: i64,
    pub username: String,
}

/// A review as listed on its movie's page.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct MovieReviewRow {
    pub id: i64,
    pub rating: i32,
    pub user_id: i64,
    pub username: String,
    pub review: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A review as listed on its author's page.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct UserReviewRow {
    pub id: i64,
    pub movie_id: i64,
    pub movie_title: String,
    pub rating: i32,
    pub review: String,
}
