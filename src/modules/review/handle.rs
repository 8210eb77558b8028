use actix_web::{get, post, web};

use crate::{
    api::{error, success},
    middlewares::SessionContext,
    modules::{
        comment::repository_pg::CommentRepositoryPg,
        movie::repository_pg::MovieRepositoryPg,
        review::{
            model::{CreateReviewModel, EditReviewModel, EditReviewResponse, ReviewPageResponse},
            repository_pg::ReviewRepositoryPg,
            schema::ReviewEntity,
            service::ReviewService,
        },
    },
    utils::ConfirmForm,
};

pub type ReviewSvc = ReviewService<ReviewRepositoryPg, MovieRepositoryPg, CommentRepositoryPg>;

#[get("/review/{id}")]
pub async fn show_review(
    review_service: web::Data<ReviewSvc>,
    id: web::Path<i64>,
) -> Result<success::Success<ReviewPageResponse>, error::Error> {
    let page = review_service.review_page(*id).await?;
    Ok(success::Success::ok(Some(page)))
}

#[post("/create_review")]
pub async fn create_review(
    review_service: web::Data<ReviewSvc>,
    session: SessionContext,
    body: web::Json<CreateReviewModel>,
) -> Result<success::Success<()>, error::Error> {
    let movie_id = review_service.create_review(&session, body.into_inner()).await?;
    Ok(success::Success::see_other(format!("/movie/{}", movie_id)))
}

#[get("/edit_review/{id}")]
pub async fn edit_review_page(
    review_service: web::Data<ReviewSvc>,
    session: SessionContext,
    id: web::Path<i64>,
) -> Result<success::Success<EditReviewResponse>, error::Error> {
    let page = review_service.edit_review_page(&session, *id).await?;
    Ok(success::Success::ok(Some(page)))
}

#[post("/edit_review/{id}")]
pub async fn edit_review(
    review_service: web::Data<ReviewSvc>,
    session: SessionContext,
    id: web::Path<i64>,
    body: web::Json<EditReviewModel>,
) -> Result<success::Success<()>, error::Error> {
    review_service.edit_review(&session, *id, body.into_inner()).await?;
    Ok(success::Success::see_other(format!("/review/{}", id)))
}

#[get("/remove_review/{id}")]
pub async fn remove_review_page(
    review_service: web::Data<ReviewSvc>,
    session: SessionContext,
    id: web::Path<i64>,
) -> Result<success::Success<ReviewEntity>, error::Error> {
    let review = review_service.remove_review_page(&session, *id).await?;
    Ok(success::Success::ok(Some(review)))
}

#[post("/remove_review/{id}")]
pub async fn remove_review(
    review_service: web::Data<ReviewSvc>,
    session: SessionContext,
    id: web::Path<i64>,
    body: web::Json<ConfirmForm>,
) -> Result<success::Success<()>, error::Error> {
    let movie_id = review_service.remove_review(&session, *id, body.into_inner()).await?;
    Ok(after_remove(*id, movie_id))
}

fn after_remove(id: i64, movie_id: Option<i64>) -> success::Success<()> {
    match movie_id {
        Some(movie_id) => success::Success::see_other(format!("/movie/{}", movie_id)),
        None => success::Success::see_other(format!("/review/{}", id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{
        http::{header, StatusCode},
        test, Responder,
    };

    fn redirect(response: success::Success<()>) -> (StatusCode, String) {
        let req = test::TestRequest::default().to_http_request();
        let resp = response.respond_to(&req);
        let location = resp.headers().get(header::LOCATION).unwrap().to_str().unwrap().to_string();
        (resp.status(), location)
    }

    #[actix_web::test]
    async fn remove_redirects_to_movie_or_back_to_review() {
        let (status, location) = redirect(after_remove(9, Some(3)));
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location, "/movie/3");
        let (status, location) = redirect(after_remove(9, None));
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location, "/review/9");
    }
}
