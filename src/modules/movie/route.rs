use crate::modules::movie::handle::*;
use actix_web::web::ServiceConfig;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(index)
        .service(find_movie)
        .service(show_movie)
        .service(new_movie)
        .service(create_movie)
        .service(edit_movie_page)
        .service(edit_movie)
        .service(update_movie)
        .service(remove_movie_page)
        .service(remove_movie);
}
