use crate::{
    api::error,
    modules::review::{
        model::NewReview,
        schema::{MovieReviewRow, ReviewEntity, UserReviewRow},
    },
};

#[async_trait::async_trait]
pub trait ReviewRepository {
    /// Stored id of the rating with the given numeric value.
    async fn find_rating_id(&self, value: i32) -> Result<Option<i64>, error::SystemError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<ReviewEntity>, error::SystemError>;
    async fn find_by_movie(&self, movie_id: i64)
        -> Result<Vec<MovieReviewRow>, error::SystemError>;
    async fn find_by_user(&self, user_id: i64) -> Result<Vec<UserReviewRow>, error::SystemError>;

    async fn create(&self, review: &NewReview) -> Result<i64, error::SystemError>;
    /// Replaces text and rating and moves the timestamp to now.
    async fn update(&self, id: i64, review: &str, rating_id: i64)
        -> Result<(), error::SystemError>;
    async fn delete(&self, id: i64) -> Result<(), error::SystemError>;
}
