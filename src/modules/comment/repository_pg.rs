use crate::{
    api::error,
    modules::comment::{
        model::NewComment,
        repository::CommentRepository,
        schema::{CommentEntity, ReviewCommentRow},
    },
};

#[derive(Clone)]
pub struct CommentRepositoryPg {
    pool: sqlx::PgPool,
}

impl CommentRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CommentRepository for CommentRepositoryPg {
    async fn find_by_id(&self, id: i64) -> Result<Option<CommentEntity>, error::SystemError> {
        let comment = sqlx::query_as::<_, CommentEntity>(
            r#"
            SELECT c.id, c.comment, c.created_at, c.review_id, u.id AS user_id, u.username
            FROM comments c
            JOIN users u ON c.user_id = u.id
            WHERE c.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(comment)
    }

    async fn find_by_review(
        &self,
        review_id: i64,
    ) -> Result<Vec<ReviewCommentRow>, error::SystemError> {
        let comments = sqlx::query_as::<_, ReviewCommentRow>(
            r#"
            SELECT c.id, u.id AS user_id, u.username, c.comment, c.created_at
            FROM comments c
            JOIN users u ON c.user_id = u.id
            WHERE c.review_id = $1
            ORDER BY c.id DESC
            "#,
        )
        .bind(review_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }

    async fn create(&self, comment: &NewComment) -> Result<i64, error::SystemError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO comments (review_id, user_id, comment) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(comment.review_id)
        .bind(comment.user_id)
        .bind(&comment.comment)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn update(&self, id: i64, comment: &str) -> Result<(), error::SystemError> {
        sqlx::query("UPDATE comments SET comment = $1, created_at = NOW() WHERE id = $2")
            .bind(comment)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), error::SystemError> {
        sqlx::query("DELETE FROM comments WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(())
    }
}
