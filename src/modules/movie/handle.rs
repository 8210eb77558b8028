use actix_web::{get, post, web};

use crate::{
    api::{error, success},
    middlewares::SessionContext,
    modules::{
        movie::{
            model::{
                EditMovieResponse, MovieForm, MoviePageResponse, NewMovieResponse,
                RemoveMovieResponse, SearchQuery, SearchResponse, UpdateMovieModel,
            },
            repository_pg::MovieRepositoryPg,
            schema::MovieSummary,
            service::MovieService,
        },
        review::repository_pg::ReviewRepositoryPg,
    },
    utils::ConfirmForm,
};

pub type MovieSvc = MovieService<MovieRepositoryPg, ReviewRepositoryPg>;

#[get("/")]
pub async fn index(
    movie_service: web::Data<MovieSvc>,
) -> Result<success::Success<Vec<MovieSummary>>, error::Error> {
    let movies = movie_service.list_movies().await?;
    Ok(success::Success::ok(Some(movies)))
}

#[get("/find_movie")]
pub async fn find_movie(
    movie_service: web::Data<MovieSvc>,
    query: web::Query<SearchQuery>,
) -> Result<success::Success<SearchResponse>, error::Error> {
    let response = movie_service.find_movies(query.into_inner().query).await?;
    Ok(success::Success::ok(Some(response)))
}

#[get("/movie/{id}")]
pub async fn show_movie(
    movie_service: web::Data<MovieSvc>,
    id: web::Path<i64>,
) -> Result<success::Success<MoviePageResponse>, error::Error> {
    let page = movie_service.movie_page(*id).await?;
    Ok(success::Success::ok(Some(page)))
}

#[get("/new_movie")]
pub async fn new_movie(
    movie_service: web::Data<MovieSvc>,
    _session: SessionContext,
) -> Result<success::Success<NewMovieResponse>, error::Error> {
    let classes = movie_service.class_scheme().await?;
    Ok(success::Success::ok(Some(NewMovieResponse { classes })))
}

#[post("/create_movie")]
pub async fn create_movie(
    movie_service: web::Data<MovieSvc>,
    session: SessionContext,
    body: web::Json<MovieForm>,
) -> Result<success::Success<()>, error::Error> {
    movie_service.create_movie(&session, body.into_inner()).await?;
    Ok(success::Success::see_other("/"))
}

#[get("/edit_movie/{id}")]
pub async fn edit_movie_page(
    movie_service: web::Data<MovieSvc>,
    session: SessionContext,
    id: web::Path<i64>,
) -> Result<success::Success<EditMovieResponse>, error::Error> {
    let page = movie_service.edit_movie_page(&session, *id).await?;
    Ok(success::Success::ok(Some(page)))
}

#[post("/edit_movie/{id}")]
pub async fn edit_movie(
    movie_service: web::Data<MovieSvc>,
    session: SessionContext,
    id: web::Path<i64>,
    body: web::Json<MovieForm>,
) -> Result<success::Success<()>, error::Error> {
    movie_service.update_movie(&session, *id, body.into_inner()).await?;
    Ok(success::Success::see_other(format!("/movie/{}", id)))
}

/// Same as `POST /edit_movie/{id}` with the id carried in the body.
#[post("/update_movie")]
pub async fn update_movie(
    movie_service: web::Data<MovieSvc>,
    session: SessionContext,
    body: web::Json<UpdateMovieModel>,
) -> Result<success::Success<()>, error::Error> {
    let UpdateMovieModel { movie_id, form } = body.into_inner();
    movie_service.update_movie(&session, movie_id, form).await?;
    Ok(success::Success::see_other(format!("/movie/{}", movie_id)))
}

#[get("/remove_movie/{id}")]
pub async fn remove_movie_page(
    movie_service: web::Data<MovieSvc>,
    session: SessionContext,
    id: web::Path<i64>,
) -> Result<success::Success<RemoveMovieResponse>, error::Error> {
    let page = movie_service.remove_movie_page(&session, *id).await?;
    Ok(success::Success::ok(Some(page)))
}

#[post("/remove_movie/{id}")]
pub async fn remove_movie(
    movie_service: web::Data<MovieSvc>,
    session: SessionContext,
    id: web::Path<i64>,
    body: web::Json<ConfirmForm>,
) -> Result<success::Success<()>, error::Error> {
    let removed = movie_service.remove_movie(&session, *id, body.into_inner()).await?;
    Ok(after_remove(*id, removed))
}

/// A removed movie leads to the index, a cancelled removal back to the movie.
fn after_remove(id: i64, removed: bool) -> success::Success<()> {
    if removed {
        success::Success::see_other("/")
    } else {
        success::Success::see_other(format!("/movie/{}", id))
    }
}
