use serde::{Deserialize, Serialize};

use crate::modules::{comment::schema::CommentEntity, review::schema::ReviewEntity};

#[derive(Deserialize)]
pub struct CreateCommentModel {
    pub csrf_token: Option<String>,
    pub review_id: i64,
    pub comment: String,
}

#[derive(Deserialize)]
pub struct EditCommentModel {
    pub csrf_token: Option<String>,
    #[serde(default)]
    pub confirm: bool,
    pub comment: Option<String>,
}

pub struct NewComment {
    pub review_id: i64,
    pub user_id: i64,
    pub comment: String,
}

#[derive(Debug, Serialize)]
pub struct CommentPageResponse {
    pub comment: CommentEntity,
    pub review: ReviewEntity,
}

#[derive(Debug, Serialize)]
pub struct EditCommentResponse {
    pub review_id: i64,
    pub comment: CommentEntity,
}
