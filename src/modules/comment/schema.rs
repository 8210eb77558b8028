use serde::Serialize;
use sqlx::prelude::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct CommentEntity {
    pub id: i64,
    pub comment: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub review_id: i64,
    pub user_id: i64,
    pub username: String,
}

/// A comment as listed under its review.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ReviewCommentRow {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub comment: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
