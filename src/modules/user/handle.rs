use actix_multipart::Multipart;
use actix_web::{
    cookie::{time, Cookie, SameSite},
    get,
    http::header,
    post, web, HttpResponse,
};
use futures_util::TryStreamExt;

use crate::{
    api::{error, success},
    constants::{MAX_IMAGE_SIZE, SESSION_COOKIE},
    middlewares::{SessionConfig, SessionContext},
    modules::{
        review::repository_pg::ReviewRepositoryPg,
        session::repository_redis::SessionRepositoryRedis,
        user::{
            model::{
                ImageUpload, LoginModel, LoginResponse, RegisterModel, RegisterResponse,
                UserPageResponse,
            },
            repository_pg::UserRepositoryPg,
            schema::UserProfile,
            service::UserService,
        },
    },
    utils::ConfirmForm,
};

pub type UserSvc = UserService<UserRepositoryPg, ReviewRepositoryPg, SessionRepositoryRedis>;

#[get("/register")]
pub async fn register_page() -> success::Success<()> {
    success::Success::ok(None).message("Luo tunnus")
}

#[post("/register")]
pub async fn register(
    user_service: web::Data<UserSvc>,
    body: web::Json<RegisterModel>,
) -> Result<success::Success<RegisterResponse>, error::Error> {
    let id = user_service.register(body.into_inner()).await?;
    Ok(success::Success::created(Some(RegisterResponse { id })).message("Tunnus luotu"))
}

#[get("/login")]
pub async fn login_page() -> success::Success<()> {
    success::Success::ok(None).message("Kirjaudu sisään")
}

#[post("/login")]
pub async fn login(
    user_service: web::Data<UserSvc>,
    session_config: web::Data<SessionConfig>,
    body: web::Json<LoginModel>,
) -> Result<success::Success<LoginResponse>, error::Error> {
    let (token, response) = user_service.login(body.into_inner()).await?;
    let session_cookie = Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(session_config.secure)
        .max_age(time::Duration::seconds(session_config.expiration as i64))
        .finish();

    Ok(success::Success::ok(Some(response)).cookies(vec![session_cookie]))
}

#[get("/logout")]
pub async fn logout(
    user_service: web::Data<UserSvc>,
    session: Option<SessionContext>,
) -> Result<success::Success<()>, error::Error> {
    user_service.logout(session).await?;
    Ok(success::Success::see_other("/").cookies(vec![expired_session_cookie()]))
}

/// Overwrites the session cookie with an empty one that has already expired.
fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .max_age(time::Duration::seconds(0))
        .expires(time::OffsetDateTime::UNIX_EPOCH)
        .finish()
}

#[get("/user/{id}")]
pub async fn show_user(
    user_service: web::Data<UserSvc>,
    id: web::Path<i64>,
) -> Result<success::Success<UserPageResponse>, error::Error> {
    let page = user_service.user_page(*id).await?;
    Ok(success::Success::ok(Some(page)))
}

#[get("/add_image")]
pub async fn add_image_page(session: SessionContext) -> success::Success<()> {
    success::Success::ok(None).message(format!("Profiilikuva käyttäjälle {}", session.username))
}

#[post("/add_image")]
pub async fn add_image(
    user_service: web::Data<UserSvc>,
    session: SessionContext,
    payload: Multipart,
) -> Result<success::Success<()>, error::Error> {
    let upload = read_image_upload(payload).await?;
    user_service.add_image(&session, upload).await?;
    Ok(success::Success::see_other(format!("/user/{}", session.user_id)))
}

#[get("/image/{id}")]
pub async fn show_image(
    user_service: web::Data<UserSvc>,
    id: web::Path<i64>,
) -> Result<HttpResponse, error::Error> {
    let image = user_service.image(*id).await?;
    let mime = mime_guess::from_ext("jpg").first_or_octet_stream();
    Ok(HttpResponse::Ok().insert_header((header::CONTENT_TYPE, mime.to_string())).body(image))
}

#[get("/remove_image")]
pub async fn remove_image_page(
    user_service: web::Data<UserSvc>,
    session: SessionContext,
) -> Result<success::Success<UserProfile>, error::Error> {
    let user = user_service.remove_image_page(&session).await?;
    Ok(success::Success::ok(Some(user)))
}

#[post("/remove_image")]
pub async fn remove_image(
    user_service: web::Data<UserSvc>,
    session: SessionContext,
    body: web::Json<ConfirmForm>,
) -> Result<success::Success<()>, error::Error> {
    user_service.remove_image(&session, body.into_inner()).await?;
    Ok(success::Success::see_other(format!("/user/{}", session.user_id)))
}

/// Longest `csrf_token` field kept from the upload form.
const MAX_TOKEN_FIELD: usize = 64;

/// Collects the `csrf_token`, `confirm` and `image` fields of the upload form.
///
/// Image bytes beyond [`MAX_IMAGE_SIZE`] are drained but not kept. A token
/// longer than [`MAX_TOKEN_FIELD`] is dropped.
async fn read_image_upload(mut payload: Multipart) -> Result<ImageUpload, error::Error> {
    let malformed = |e: actix_multipart::MultipartError| {
        log::debug!("Malformed image upload: {e}");
        error::Error::bad_request("Virheellinen lomake", "Virhe profiilin muokkaamisessa")
    };

    let mut upload = ImageUpload {
        csrf_token: None,
        confirm: false,
        filename: None,
        bytes: Vec::new(),
        truncated: false,
    };

    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                upload.filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .map(str::to_string);
                while let Some(chunk) = field.try_next().await.map_err(malformed)? {
                    if upload.truncated || upload.bytes.len() + chunk.len() > MAX_IMAGE_SIZE {
                        upload.truncated = true;
                    } else {
                        upload.bytes.extend_from_slice(&chunk);
                    }
                }
            }
            "csrf_token" => {
                let mut value = Vec::new();
                let mut oversized = false;
                while let Some(chunk) = field.try_next().await.map_err(malformed)? {
                    if oversized || value.len() + chunk.len() > MAX_TOKEN_FIELD {
                        oversized = true;
                    } else {
                        value.extend_from_slice(&chunk);
                    }
                }
                upload.csrf_token =
                    (!oversized).then(|| String::from_utf8_lossy(&value).into_owned());
            }
            "confirm" => {
                upload.confirm = true;
                while field.try_next().await.map_err(malformed)?.is_some() {}
            }
            _ => while field.try_next().await.map_err(malformed)?.is_some() {},
        }
    }

    Ok(upload)
}
