use crate::modules::comment::handle::*;
use actix_web::web::ServiceConfig;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(show_comment)
        .service(create_comment)
        .service(edit_comment_page)
        .service(edit_comment)
        .service(remove_comment_page)
        .service(remove_comment);
}
