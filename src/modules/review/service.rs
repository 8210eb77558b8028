use log::info;
use std::sync::Arc;

use crate::api::error::{self, ErrorType};
use crate::middlewares::SessionContext;
use crate::modules::comment::repository::CommentRepository;
use crate::modules::movie::repository::MovieRepository;
use crate::modules::review::{
    model::{
        CreateReviewModel, EditReviewModel, EditReviewResponse, NewReview, ReviewPageResponse,
    },
    repository::ReviewRepository,
    schema::ReviewEntity,
};
use crate::utils::{validation, ConfirmForm};

const SHOW: ErrorType = ErrorType("Virhe kommentin näytössä");
const CREATE: ErrorType = ErrorType("Virhe arvostelun lisäämisessä");
const EDIT: ErrorType = ErrorType("Virhe muokatessa arvostelua");
const REMOVE: ErrorType = ErrorType("Virhe arvostelun poistossa");

const MAX_REVIEW_LENGTH: usize = 1000;

#[derive(Clone)]
pub struct ReviewService<R, M, C>
where
    R: ReviewRepository + Send + Sync,
    M: MovieRepository + Send + Sync,
    C: CommentRepository + Send + Sync,
{
    review_repo: Arc<R>,
    movie_repo: Arc<M>,
    comment_repo: Arc<C>,
}

impl<R, M, C> ReviewService<R, M, C>
where
    R: ReviewRepository + Send + Sync,
    M: MovieRepository + Send + Sync,
    C: CommentRepository + Send + Sync,
{
    pub fn with_dependencies(review_repo: Arc<R>, movie_repo: Arc<M>, comment_repo: Arc<C>) -> Self {
        info!("ReviewService initialized with dependencies");
        ReviewService { review_repo, movie_repo, comment_repo }
    }

    pub async fn review_page(&self, id: i64) -> Result<ReviewPageResponse, error::SystemError> {
        let review = self
            .review_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| SHOW.not_found("Arvostelua ei löytynyt"))?;
        let comments = self.comment_repo.find_by_review(id).await?;
        Ok(ReviewPageResponse { review, comments })
    }

    /// Returns the id of the movie the review was written for.
    pub async fn create_review(
        &self,
        session: &SessionContext,
        review: CreateReviewModel,
    ) -> Result<i64, error::SystemError> {
        session.check_csrf(review.csrf_token.as_deref())?;

        self.movie_repo
            .find_by_id(review.movie_id)
            .await?
            .ok_or_else(|| CREATE.not_found("Elokuvaa ei löytynyt"))?;

        let text = review_text(Some(review.review.as_str()), CREATE)?;
        let rating_id = self.rating_id(Some(review.rating), CREATE).await?;

        let new_review =
            NewReview { movie_id: review.movie_id, user_id: session.user_id, rating_id, review: text };
        let id = self.review_repo.create(&new_review).await?;
        info!("Review {} created by user {} for movie {}", id, session.user_id, review.movie_id);

        Ok(review.movie_id)
    }

    pub async fn edit_review_page(
        &self,
        session: &SessionContext,
        id: i64,
    ) -> Result<EditReviewResponse, error::SystemError> {
        let review = self.owned_review(session, id, EDIT).await?;
        Ok(EditReviewResponse { movie_id: review.movie_id, review })
    }

    /// Applies the edit when the form confirms it; otherwise leaves the
    /// review as it is.
    pub async fn edit_review(
        &self,
        session: &SessionContext,
        id: i64,
        form: EditReviewModel,
    ) -> Result<(), error::SystemError> {
        session.check_csrf(form.csrf_token.as_deref())?;
        self.owned_review(session, id, EDIT).await?;

        if !form.confirm {
            return Ok(());
        }

        let text = review_text(form.review.as_deref(), EDIT)?;
        let rating_id = self.rating_id(form.rating, EDIT).await?;

        self.review_repo.update(id, &text, rating_id).await?;
        info!("Review {} updated by user {}", id, session.user_id);
        Ok(())
    }

    pub async fn remove_review_page(
        &self,
        session: &SessionContext,
        id: i64,
    ) -> Result<ReviewEntity, error::SystemError> {
        self.owned_review(session, id, REMOVE).await
    }

    /// Deletes the review when the form confirms it. Returns the movie id
    /// if it did.
    pub async fn remove_review(
        &self,
        session: &SessionContext,
        id: i64,
        form: ConfirmForm,
    ) -> Result<Option<i64>, error::SystemError> {
        session.check_csrf(form.csrf_token.as_deref())?;
        let review = self.owned_review(session, id, REMOVE).await?;

        if !form.remove {
            return Ok(None);
        }

        self.review_repo.delete(id).await?;
        info!("Review {} removed by user {}", id, session.user_id);
        Ok(Some(review.movie_id))
    }

    async fn rating_id(
        &self,
        rating: Option<i32>,
        category: ErrorType,
    ) -> Result<i64, error::SystemError> {
        let invalid = || category.bad_request("Virheellinen arvosana");
        let rating = rating.ok_or_else(invalid)?;
        self.review_repo.find_rating_id(rating).await?.ok_or_else(invalid)
    }

    async fn owned_review(
        &self,
        session: &SessionContext,
        id: i64,
        category: ErrorType,
    ) -> Result<ReviewEntity, error::SystemError> {
        let review = self
            .review_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| category.not_found("Arvostelua ei löytynyt"))?;

        if review.user_id != session.user_id {
            let message = if category == REMOVE {
                "Käyttäjällä ei oikeuksia poistaa arvostelua"
            } else {
                "Käyttäjällä ei ole oikeuksia muokata arvostelua"
            };
            return Err(category.forbidden(message));
        }

        Ok(review)
    }
}

fn review_text(text: Option<&str>, category: ErrorType) -> Result<String, error::SystemError> {
    let text = text.ok_or_else(|| category.bad_request("Virheellinen arvostelu"))?;
    validation::bounded_text(text, MAX_REVIEW_LENGTH)
        .map_err(|_| category.bad_request("Virheellinen arvostelu"))?;
    Ok(text.trim().to_string())
}
