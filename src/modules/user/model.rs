use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::modules::{review::schema::UserReviewRow, user::schema::UserProfile};

/// Missing fields deserialize as empty so they fail with the form's own message.
#[derive(Deserialize, Validate)]
pub struct RegisterModel {
    #[serde(default)]
    #[validate(length(min = 3, message = "Käyttäjänimen tulee olla vähintään 3 merkkiä pitkä"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 5, message = "Salasanan tulee olla vähintään 5 merkkiä pitkä"))]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

#[derive(Deserialize)]
pub struct LoginModel {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub struct InsertUser {
    pub username: String,
    pub password_hash: String,
}

/// A profile image as received from the upload form.
pub struct ImageUpload {
    pub csrf_token: Option<String>,
    pub confirm: bool,
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
    /// Set when the upload was cut off for exceeding the size limit.
    pub truncated: bool,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: i64,
    pub username: String,
    pub csrf_token: String,
}

#[derive(Debug, Serialize)]
pub struct UserPageResponse {
    pub user: UserProfile,
    pub reviews: Vec<UserReviewRow>,
}
