use log::info;
use std::sync::Arc;

use crate::api::error::{self, ErrorType};
use crate::middlewares::SessionContext;
use crate::modules::comment::{
    model::{
        CommentPageResponse, CreateCommentModel, EditCommentModel, EditCommentResponse, NewComment,
    },
    repository::CommentRepository,
    schema::CommentEntity,
};
use crate::modules::review::repository::ReviewRepository;
use crate::utils::{validation, ConfirmForm};

const SHOW: ErrorType = ErrorType("Virhe kommentin näytössä");
const CREATE: ErrorType = ErrorType("Virhe kommentin lisäämisessä");
const EDIT: ErrorType = ErrorType("Virhe muokatessa kommenttia");
const REMOVE: ErrorType = ErrorType("Virhe kommentin poistossa");

const MAX_COMMENT_LENGTH: usize = 1000;

#[derive(Clone)]
pub struct CommentService<C, R>
where
    C: CommentRepository + Send + Sync,
    R: ReviewRepository + Send + Sync,
{
    comment_repo: Arc<C>,
    review_repo: Arc<R>,
}

impl<C, R> CommentService<C, R>
where
    C: CommentRepository + Send + Sync,
    R: ReviewRepository + Send + Sync,
{
    pub fn with_dependencies(comment_repo: Arc<C>, review_repo: Arc<R>) -> Self {
        info!("CommentService initialized with dependencies");
        CommentService { comment_repo, review_repo }
    }

    pub async fn comment_page(&self, id: i64) -> Result<CommentPageResponse, error::SystemError> {
        let comment = self
            .comment_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| SHOW.not_found("Kommenttia ei löytynyt"))?;
        let review = self
            .review_repo
            .find_by_id(comment.review_id)
            .await?
            .ok_or_else(|| SHOW.not_found("Arvostelua ei löytynyt"))?;
        Ok(CommentPageResponse { comment, review })
    }

    /// Returns the id of the review the comment was written on.
    pub async fn create_comment(
        &self,
        session: &SessionContext,
        comment: CreateCommentModel,
    ) -> Result<i64, error::SystemError> {
        session.check_csrf(comment.csrf_token.as_deref())?;

        self.review_repo
            .find_by_id(comment.review_id)
            .await?
            .ok_or_else(|| CREATE.not_found("Arvostelua ei löytynyt"))?;

        let text = comment_text(Some(comment.comment.as_str()), CREATE)?;

        let new_comment =
            NewComment { review_id: comment.review_id, user_id: session.user_id, comment: text };
        let id = self.comment_repo.create(&new_comment).await?;
        info!("Comment {} created by user {} on review {}", id, session.user_id, comment.review_id);

        Ok(comment.review_id)
    }

    pub async fn edit_comment_page(
        &self,
        session: &SessionContext,
        id: i64,
    ) -> Result<EditCommentResponse, error::SystemError> {
        let comment = self.owned_comment(session, id, EDIT).await?;
        Ok(EditCommentResponse { review_id: comment.review_id, comment })
    }

    pub async fn edit_comment(
        &self,
        session: &SessionContext,
        id: i64,
        form: EditCommentModel,
    ) -> Result<(), error::SystemError> {
        session.check_csrf(form.csrf_token.as_deref())?;
        self.owned_comment(session, id, EDIT).await?;

        if !form.confirm {
            return Ok(());
        }

        let text = comment_text(form.comment.as_deref(), EDIT)?;
        self.comment_repo.update(id, &text).await?;
        info!("Comment {} updated by user {}", id, session.user_id);
        Ok(())
    }

    pub async fn remove_comment_page(
        &self,
        session: &SessionContext,
        id: i64,
    ) -> Result<CommentEntity, error::SystemError> {
        self.owned_comment(session, id, REMOVE).await
    }

    /// Deletes the comment when the form confirms it. Returns the review id
    /// if it did.
    pub async fn remove_comment(
        &self,
        session: &SessionContext,
        id: i64,
        form: ConfirmForm,
    ) -> Result<Option<i64>, error::SystemError> {
        session.check_csrf(form.csrf_token.as_deref())?;
        let comment = self.owned_comment(session, id, REMOVE).await?;

        if !form.remove {
            return Ok(None);
        }

        self.comment_repo.delete(id).await?;
        info!("Comment {} removed by user {}", id, session.user_id);
        Ok(Some(comment.review_id))
    }

    async fn owned_comment(
        &self,
        session: &SessionContext,
        id: i64,
        category: ErrorType,
    ) -> Result<CommentEntity, error::SystemError> {
        let comment = self
            .comment_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| category.not_found("Kommenttia ei löytynyt"))?;

        if comment.user_id != session.user_id {
            let message = if category == REMOVE {
                "Käyttäjällä ei oikeuksia poistaa kommenttia"
            } else {
                "Käyttäjällä ei ole oikeuksia muokata kommenttia"
            };
            return Err(category.forbidden(message));
        }

        Ok(comment)
    }
}

fn comment_text(text: Option<&str>, category: ErrorType) -> Result<String, error::SystemError> {
    let text = text.ok_or_else(|| category.bad_request("Virheellinen kommentti"))?;
    validation::bounded_text(text, MAX_COMMENT_LENGTH)
        .map_err(|_| category.bad_request("Virheellinen kommentti"))?;
    Ok(text.trim().to_string())
}
