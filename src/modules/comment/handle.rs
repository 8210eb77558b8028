use actix_web::{get, post, web};

use crate::{
    api::{error, success},
    middlewares::SessionContext,
    modules::{
        comment::{
            model::{CommentPageResponse, CreateCommentModel, EditCommentModel, EditCommentResponse},
            repository_pg::CommentRepositoryPg,
            schema::CommentEntity,
            service::CommentService,
        },
        review::repository_pg::ReviewRepositoryPg,
    },
    utils::ConfirmForm,
};

pub type CommentSvc = CommentService<CommentRepositoryPg, ReviewRepositoryPg>;

#[get("/comment/{id}")]
pub async fn show_comment(
    comment_service: web::Data<CommentSvc>,
    id: web::Path<i64>,
) -> Result<success::Success<CommentPageResponse>, error::Error> {
    let page = comment_service.comment_page(*id).await?;
    Ok(success::Success::ok(Some(page)))
}

#[post("/create_comment")]
pub async fn create_comment(
    comment_service: web::Data<CommentSvc>,
    session: SessionContext,
    body: web::Json<CreateCommentModel>,
) -> Result<success::Success<()>, error::Error> {
    let review_id = comment_service.create_comment(&session, body.into_inner()).await?;
    Ok(success::Success::see_other(format!("/review/{}", review_id)))
}

#[get("/edit_comment/{id}")]
pub async fn edit_comment_page(
    comment_service: web::Data<CommentSvc>,
    session: SessionContext,
    id: web::Path<i64>,
) -> Result<success::Success<EditCommentResponse>, error::Error> {
    let page = comment_service.edit_comment_page(&session, *id).await?;
    Ok(success::Success::ok(Some(page)))
}

#[post("/edit_comment/{id}")]
pub async fn edit_comment(
    comment_service: web::Data<CommentSvc>,
    session: SessionContext,
    id: web::Path<i64>,
    body: web::Json<EditCommentModel>,
) -> Result<success::Success<()>, error::Error> {
    comment_service.edit_comment(&session, *id, body.into_inner()).await?;
    Ok(success::Success::see_other(format!("/comment/{}", id)))
}

#[get("/remove_comment/{id}")]
pub async fn remove_comment_page(
    comment_service: web::Data<CommentSvc>,
    session: SessionContext,
    id: web::Path<i64>,
) -> Result<success::Success<CommentEntity>, error::Error> {
    let comment = comment_service.remove_comment_page(&session, *id).await?;
    Ok(success::Success::ok(Some(comment)))
}

#[post("/remove_comment/{id}")]
pub async fn remove_comment(
    comment_service: web::Data<CommentSvc>,
    session: SessionContext,
    id: web::Path<i64>,
    body: web::Json<ConfirmForm>,
) -> Result<success::Success<()>, error::Error> {
    let review_id = comment_service.remove_comment(&session, *id, body.into_inner()).await?;
    Ok(after_remove(*id, review_id))
}

fn after_remove(id: i64, review_id: Option<i64>) -> success::Success<()> {
    match review_id {
        Some(review_id) => success::Success::see_other(format!("/review/{}", review_id)),
        None => success::Success::see_other(format!("/comment/{}", id)),
    }
}
