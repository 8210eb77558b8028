use serde::{Deserialize, Serialize};

use crate::modules::{
    movie::schema::{MovieClass, MovieEntity, MovieSearchRow},
    review::schema::MovieReviewRow,
};

/// Fields of the add and edit movie forms. Only the edit form reads `confirm`.
#[derive(Deserialize)]
pub struct MovieForm {
    pub csrf_token: Option<String>,
    #[serde(default)]
    pub confirm: bool,
    pub title: String,
    pub director: String,
    pub year: String,
    pub description: String,
    #[serde(default)]
    pub classes: Vec<MovieClass>,
}

#[derive(Deserialize)]
pub struct UpdateMovieModel {
    pub movie_id: i64,
    #[serde(flatten)]
    pub form: MovieForm,
}

/// Movie fields after validation, trimmed and with the year parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieFields {
    pub title: String,
    pub director: String,
    pub year: i32,
    pub description: String,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

/// The enumerated classification scheme: every title with its allowed values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassScheme {
    pub groups: Vec<ClassGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassGroup {
    pub title: String,
    pub values: Vec<String>,
}

impl ClassScheme {
    /// Groups scheme rows by title, keeping the order rows were given in.
    pub fn from_rows(rows: Vec<MovieClass>) -> Self {
        let mut groups: Vec<ClassGroup> = Vec::new();
        for row in rows {
            match groups.iter_mut().find(|g| g.title == row.title) {
                Some(group) => group.values.push(row.value),
                None => groups.push(ClassGroup { title: row.title, values: vec![row.value] }),
            }
        }
        Self { groups }
    }

    pub fn values(&self, title: &str) -> Option<&[String]> {
        self.groups.iter().find(|g| g.title == title).map(|g| g.values.as_slice())
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<MovieSearchRow>,
}

#[derive(Debug, Serialize)]
pub struct MoviePageResponse {
    pub movie: MovieEntity,
    pub reviews: Vec<MovieReviewRow>,
    pub classes: Vec<MovieClass>,
}

#[derive(Debug, Serialize)]
pub struct NewMovieResponse {
    pub classes: ClassScheme,
}

/// Current choice for one scheme title on the edit form.
#[derive(Debug, PartialEq, Serialize)]
pub struct SelectedClass {
    pub title: String,
    pub value: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EditMovieResponse {
    pub movie: MovieEntity,
    pub classes: Vec<SelectedClass>,
    pub all_classes: ClassScheme,
}

#[derive(Debug, Serialize)]
pub struct RemoveMovieResponse {
    pub movie: MovieEntity,
}
