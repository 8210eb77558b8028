use serde::{Deserialize, Serialize};

use crate::modules::{comment::schema::ReviewCommentRow, review::schema::ReviewEntity};

#[derive(Deserialize)]
pub struct CreateReviewModel {
    pub csrf_token: Option<String>,
    pub movie_id: i64,
    pub rating: i32,
    pub review: String,
}

#[derive(Deserialize)]
pub struct EditReviewModel {
    pub csrf_token: Option<String>,
    #[serde(default)]
    pub confirm: bool,
    pub rating: Option<i32>,
    pub review: Option<String>,
}

pub struct NewReview {
    pub movie_id: i64,
    pub user_id: i64,
    pub rating_id: i64,
    pub review: String,
}

#[derive(Debug, Serialize)]
pub struct ReviewPageResponse {
    pub review: ReviewEntity,
    pub comments: Vec<ReviewCommentRow>,
}

#[derive(Debug, Serialize)]
pub struct EditReviewResponse {
    pub movie_id: i64,
    pub review: ReviewEntity,
}
