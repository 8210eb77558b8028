use crate::modules::user::handle::*;
use actix_web::web::ServiceConfig;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(register_page)
        .service(register)
        .service(login_page)
        .service(login)
        .service(logout)
        .service(show_user)
        .service(add_image_page)
        .service(add_image)
        .service(show_image)
        .service(remove_image_page)
        .service(remove_image);
}
