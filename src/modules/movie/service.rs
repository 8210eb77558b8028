use log::info;
use std::sync::Arc;

use crate::api::error::{self, ErrorType};
use crate::middlewares::SessionContext;
use crate::modules::movie::{
    model::{
        ClassScheme, EditMovieResponse, MovieFields, MovieForm, MoviePageResponse,
        RemoveMovieResponse, SearchResponse, SelectedClass,
    },
    repository::MovieRepository,
    schema::{MovieClass, MovieEntity, MovieSummary},
};
use crate::modules::review::repository::ReviewRepository;
use crate::utils::{validation, ConfirmForm};

const PAGE: ErrorType = ErrorType("Virhe sivun hakemisessa");
const CREATE: ErrorType = ErrorType("Virhe elokuvan lisäämisessä");
const EDIT: ErrorType = ErrorType("Virhe muokatessa elokuvan tietoja");
const REMOVE: ErrorType = ErrorType("Virhe elokuvan poistossa");

#[derive(Clone)]
pub struct MovieService<M, R>
where
    M: MovieRepository + Send + Sync,
    R: ReviewRepository + Send + Sync,
{
    movie_repo: Arc<M>,
    review_repo: Arc<R>,
}

impl<M, R> MovieService<M, R>
where
    M: MovieRepository + Send + Sync,
    R: ReviewRepository + Send + Sync,
{
    pub fn with_dependencies(movie_repo: Arc<M>, review_repo: Arc<R>) -> Self {
        info!("MovieService initialized with dependencies");
        MovieService { movie_repo, review_repo }
    }

    pub async fn list_movies(&self) -> Result<Vec<MovieSummary>, error::SystemError> {
        self.movie_repo.find_all().await
    }

    /// An empty query finds nothing rather than everything.
    pub async fn find_movies(
        &self,
        query: Option<String>,
    ) -> Result<SearchResponse, error::SystemError> {
        let query = query.unwrap_or_default();
        if query.is_empty() {
            return Ok(SearchResponse { query, results: Vec::new() });
        }

        let results = self.movie_repo.search(&query).await?;
        Ok(SearchResponse { query, results })
    }

    pub async fn movie_page(&self, id: i64) -> Result<MoviePageResponse, error::SystemError> {
        let movie = self
            .movie_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| PAGE.not_found("Elokuvaa ei löytynyt"))?;

        let (reviews, classes) =
            tokio::try_join!(self.review_repo.find_by_movie(id), self.movie_repo.find_classes(id))?;

        Ok(MoviePageResponse { movie, reviews, classes })
    }

    pub async fn class_scheme(&self) -> Result<ClassScheme, error::SystemError> {
        let rows = self.movie_repo.find_class_scheme().await?;
        Ok(ClassScheme::from_rows(rows))
    }

    pub async fn create_movie(
        &self,
        session: &SessionContext,
        form: MovieForm,
    ) -> Result<i64, error::SystemError> {
        session.check_csrf(form.csrf_token.as_deref())?;

        let scheme = self.class_scheme().await?;
        let (movie, classes) = validate_movie(form, &scheme, CREATE)?;

        let id = self.movie_repo.create(session.user_id, &movie, &classes).await?;
        info!("Movie {} created by user {}", id, session.user_id);
        Ok(id)
    }

    pub async fn edit_movie_page(
        &self,
        session: &SessionContext,
        id: i64,
    ) -> Result<EditMovieResponse, error::SystemError> {
        let movie = self.owned_movie(session, id, EDIT).await?;

        let (all_classes, current) =
            tokio::try_join!(self.class_scheme(), self.movie_repo.find_classes(id))?;

        let classes = all_classes
            .groups
            .iter()
            .map(|group| SelectedClass {
                title: group.title.clone(),
                value: current
                    .iter()
                    .rev()
                    .find(|c| c.title == group.title)
                    .map(|c| c.value.clone()),
            })
            .collect();

        Ok(EditMovieResponse { movie, classes, all_classes })
    }

    pub async fn update_movie(
        &self,
        session: &SessionContext,
        id: i64,
        form: MovieForm,
    ) -> Result<(), error::SystemError> {
        session.check_csrf(form.csrf_token.as_deref())?;
        self.owned_movie(session, id, EDIT).await?;

        if !form.confirm {
            return Ok(());
        }

        let scheme = self.class_scheme().await?;
        let (movie, classes) = validate_movie(form, &scheme, EDIT)?;

        self.movie_repo.update(id, &movie, &classes).await?;
        info!("Movie {} updated by user {}", id, session.user_id);
        Ok(())
    }

    pub async fn remove_movie_page(
        &self,
        session: &SessionContext,
        id: i64,
    ) -> Result<RemoveMovieResponse, error::SystemError> {
        let movie = self.owned_movie(session, id, REMOVE).await?;
        Ok(RemoveMovieResponse { movie })
    }

    /// Deletes the movie when the form confirms it. Returns whether it did.
    pub async fn remove_movie(
        &self,
        session: &SessionContext,
        id: i64,
        form: ConfirmForm,
    ) -> Result<bool, error::SystemError> {
        session.check_csrf(form.csrf_token.as_deref())?;
        self.owned_movie(session, id, REMOVE).await?;

        if !form.remove {
            return Ok(false);
        }

        self.movie_repo.delete(id).await?;
        info!("Movie {} removed by user {}", id, session.user_id);
        Ok(true)
    }

    async fn owned_movie(
        &self,
        session: &SessionContext,
        id: i64,
        category: ErrorType,
    ) -> Result<MovieEntity, error::SystemError> {
        let movie = self
            .movie_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| category.not_found("Elokuvaa ei löytynyt"))?;

        if movie.user_id != session.user_id {
            let message = if category == REMOVE {
                "Käyttäjällä ei oikeuksia poistaa elokuvaa"
            } else {
                "Käyttäjällä ei ole oikeuksia muokata elokuvan tietoja"
            };
            return Err(category.forbidden(message));
        }

        Ok(movie)
    }
}

/// Checks the form field by field and returns the values to store.
///
/// Classification pairs with an empty value are unselected choices and are
/// dropped; every other pair must exist in `scheme`.
fn validate_movie(
    form: MovieForm,
    scheme: &ClassScheme,
    category: ErrorType,
) -> Result<(MovieFields, Vec<MovieClass>), error::SystemError> {
    validation::bounded_text(&form.title, 50)
        .map_err(|_| category.bad_request("Virheellinen elokuvan nimi"))?;
    validation::bounded_text(&form.director, 50)
        .map_err(|_| category.bad_request("Virheellinen ohjaajan nimi"))?;
    let year = validation::matches_pattern(&form.year, &validation::YEAR)
        .ok()
        .and_then(|_| form.year.parse::<i32>().ok())
        .ok_or_else(|| category.bad_request("Virheellinen julkaisuvuosi"))?;
    validation::bounded_text(&form.description, 1000)
        .map_err(|_| category.bad_request("Virheellinen kuvaus"))?;

    let mut classes = Vec::with_capacity(form.classes.len());
    for class in form.classes {
        if class.value.is_empty() {
            continue;
        }
        let allowed =
            scheme.values(&class.title).ok_or_else(|| category.bad_request("Virheellinen luokitus"))?;
        validation::one_of(&class.value, allowed)
            .map_err(|_| category.bad_request("Virheellinen luokitus"))?;
        classes.push(class);
    }

    let movie = MovieFields {
        title: form.title.trim().to_string(),
        director: form.director.trim().to_string(),
        year,
        description: form.description.trim().to_string(),
    };

    Ok((movie, classes))
}
