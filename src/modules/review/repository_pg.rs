use crate::{
    api::error,
    modules::review::{
        model::NewReview,
        repository::ReviewRepository,
        schema::{MovieReviewRow, ReviewEntity, UserReviewRow},
    },
};

#[derive(Clone)]
pub struct ReviewRepositoryPg {
    pool: sqlx::PgPool,
}

impl ReviewRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ReviewRepository for ReviewRepositoryPg {
    async fn find_rating_id(&self, value: i32) -> Result<Option<i64>, error::SystemError> {
        let id = sqlx::query_scalar::<_, i64>("SELECT id FROM ratings WHERE value = $1")
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ReviewEntity>, error::SystemError> {
        let review = sqlx::query_as::<_, ReviewEntity>(
            r#"
            SELECT
                r.id,
                r.review,
                r.created_at,
                ra.value AS rating,
                m.id AS movie_id,
                m.title AS movie_title,
                u.id AS user_id,
                u.username
            FROM reviews r
            JOIN ratings ra ON r.rating_id = ra.id
            JOIN movies m ON r.movie_id = m.id
            JOIN users u ON r.user_id = u.id
            WHERE r.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(review)
    }

    async fn find_by_movie(
        &self,
        movie_id: i64,
    ) -> Result<Vec<MovieReviewRow>, error::SystemError> {
        let reviews = sqlx::query_as::<_, MovieReviewRow>(
            r#"
            SELECT r.id, ra.value AS rating, u.id AS user_id, u.username, r.review, r.created_at
            FROM reviews r
            JOIN users u ON r.user_id = u.id
            JOIN ratings ra ON r.rating_id = ra.id
            WHERE r.movie_id = $1
            ORDER BY r.id DESC
            "#,
        )
        .bind(movie_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(reviews)
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Vec<UserReviewRow>, error::SystemError> {
        let reviews = sqlx::query_as::<_, UserReviewRow>(
            r#"
            SELECT r.id, m.id AS movie_id, m.title AS movie_title, ra.value AS rating, r.review
            FROM reviews r
            JOIN movies m ON r.movie_id = m.id
            JOIN ratings ra ON r.rating_id = ra.id
            WHERE r.user_id = $1
            ORDER BY r.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(reviews)
    }

    async fn create(&self, review: &NewReview) -> Result<i64, error::SystemError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO reviews (movie_id, user_id, rating_id, review)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(review.movie_id)
        .bind(review.user_id)
        .bind(review.rating_id)
        .bind(&review.review)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn update(
        &self,
        id: i64,
        review: &str,
        rating_id: i64,
    ) -> Result<(), error::SystemError> {
        sqlx::query("UPDATE reviews SET review = $1, rating_id = $2, created_at = NOW() WHERE id = $3")
            .bind(review)
            .bind(rating_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), error::SystemError> {
        sqlx::query("DELETE FROM reviews WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(())
    }
}
