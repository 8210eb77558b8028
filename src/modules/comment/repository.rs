use crate::{
    api::error,
    modules::comment::{
        model::NewComment,
        schema::{CommentEntity, ReviewCommentRow},
    },
};

#[async_trait::async_trait]
pub trait CommentRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<CommentEntity>, error::SystemError>;
    async fn find_by_review(
        &self,
        review_id: i64,
    ) -> Result<Vec<ReviewCommentRow>, error::SystemError>;

    async fn create(&self, comment: &NewComment) -> Result<i64, error::SystemError>;
    /// Replaces the text and moves the timestamp to now.
    async fn update(&self, id: i64, comment: &str) -> Result<(), error::SystemError>;
    async fn delete(&self, id: i64) -> Result<(), error::SystemError>;
}
