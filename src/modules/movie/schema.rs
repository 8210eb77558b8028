use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// A movie together with the username of whoever added it.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct MovieEntity {
    pub id: i64,
    pub title: String,
    pub director: String,
    pub year: i32,
    pub description: String,
    pub user_id: i64,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct MovieSummary {
    pub id: i64,
    pub title: String,
    pub director: String,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct MovieSearchRow {
    pub id: i64,
    pub title: String,
}

/// A (title, value) classification pair, e.g. ("Genre", "Draama").
///
/// Used both for the rows of the classification scheme and for the pairs
/// attached to a movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct MovieClass {
    pub title: String,
    pub value: String,
}

#[cfg(test)]
impl MovieClass {
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self { title: title.into(), value: value.into() }
    }
}
