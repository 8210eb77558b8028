use crate::{
    api::error,
    modules::movie::{
        model::MovieFields,
        schema::{MovieClass, MovieEntity, MovieSearchRow, MovieSummary},
    },
};

#[async_trait::async_trait]
pub trait MovieRepository {
    /// Every movie, newest first.
    async fn find_all(&self) -> Result<Vec<MovieSummary>, error::SystemError>;
    /// Movies whose title, description or director contains `query`,
    /// ignoring case. Newest first.
    async fn search(&self, query: &str) -> Result<Vec<MovieSearchRow>, error::SystemError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<MovieEntity>, error::SystemError>;

    async fn find_classes(&self, movie_id: i64) -> Result<Vec<MovieClass>, error::SystemError>;
    /// Rows of the classification scheme in their defined order.
    async fn find_class_scheme(&self) -> Result<Vec<MovieClass>, error::SystemError>;

    /// Inserts the movie and its classes atomically.
    async fn create(
        &self,
        user_id: i64,
        movie: &MovieFields,
        classes: &[MovieClass],
    ) -> Result<i64, error::SystemError>;
    /// Updates the fields and replaces the whole class set atomically.
    async fn update(
        &self,
        id: i64,
        movie: &MovieFields,
        classes: &[MovieClass],
    ) -> Result<(), error::SystemError>;
    async fn delete(&self, id: i64) -> Result<(), error::SystemError>;
}
