use actix_cors::Cors;
use actix_web::{
    self, App, HttpServer,
    middleware::{Logger, from_fn},
    web,
};
use std::sync::{Arc, LazyLock};

use crate::{
    api::error,
    configs::{RedisCache, connect_database},
    middlewares::{SessionConfig, load_session},
    modules::{
        comment::{repository_pg::CommentRepositoryPg, service::CommentService},
        movie::{repository_pg::MovieRepositoryPg, service::MovieService},
        review::{repository_pg::ReviewRepositoryPg, service::ReviewService},
        session::repository_redis::SessionRepositoryRedis,
        user::{repository_pg::UserRepositoryPg, service::UserService},
    },
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
#[cfg(test)]
mod test;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

/// Malformed bodies, paths and queries are reported like any other form error.
fn invalid_request<E: std::fmt::Display>(err: E) -> actix_web::Error {
    log::debug!("Rejected request: {err}");
    error::Error::bad_request("Virheellinen pyyntö", "Virhe pyynnön käsittelyssä").into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let db_pool =
        connect_database().await.map_err(|_| std::io::Error::other("Database connection error"))?;

    let redis_pool =
        RedisCache::new().await.map_err(|_| std::io::Error::other("Redis connection error"))?;

    let session_config = SessionConfig {
        secret: ENV.secret_key.as_bytes().to_vec(),
        expiration: ENV.session_expiration,
        secure: ENV.cookie_secure,
    };

    let user_repo = Arc::new(UserRepositoryPg::new(db_pool.clone()));
    let movie_repo = Arc::new(MovieRepositoryPg::new(db_pool.clone()));
    let review_repo = Arc::new(ReviewRepositoryPg::new(db_pool.clone()));
    let comment_repo = Arc::new(CommentRepositoryPg::new(db_pool.clone()));
    let session_repo = Arc::new(SessionRepositoryRedis::new(Arc::new(redis_pool)));

    let user_service = UserService::with_dependencies(
        user_repo.clone(),
        review_repo.clone(),
        session_repo.clone(),
        session_config.clone(),
    );
    let movie_service = MovieService::with_dependencies(movie_repo.clone(), review_repo.clone());
    let review_service =
        ReviewService::with_dependencies(review_repo.clone(), movie_repo.clone(), comment_repo.clone());
    let comment_service = CommentService::with_dependencies(comment_repo, review_repo);

    log::info!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&ENV.frontend_url)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();

        App::new()
            .wrap(from_fn(load_session::<SessionRepositoryRedis, _>))
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(web::JsonConfig::default().error_handler(|err, _| invalid_request(err)))
            .app_data(web::PathConfig::default().error_handler(|err, _| invalid_request(err)))
            .app_data(web::QueryConfig::default().error_handler(|err, _| invalid_request(err)))
            .app_data(web::Data::new(session_config.clone()))
            .app_data(web::Data::from(session_repo.clone()))
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(movie_service.clone()))
            .app_data(web::Data::new(review_service.clone()))
            .app_data(web::Data::new(comment_service.clone()))
            .configure(modules::user::route::configure)
            .configure(modules::movie::route::configure)
            .configure(modules::review::route::configure)
            .configure(modules::comment::route::configure)
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}
