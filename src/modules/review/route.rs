use crate::modules::review::handle::*;
use actix_web::web::ServiceConfig;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(show_review)
        .service(create_review)
        .service(edit_review_page)
        .service(edit_review)
        .service(remove_review_page)
        .service(remove_review);
}
