use actix_web::{
    body::MessageBody,
    dev::{Payload, ServiceRequest, ServiceResponse},
    middleware::Next,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::{ready, Ready};
use uuid::Uuid;

use crate::{
    api::error::{self, ErrorType},
    constants::SESSION_COOKIE,
    modules::session::repository::SessionRepository,
    utils::SessionClaims,
};

const LOGIN: ErrorType = ErrorType("Virhe kirjautumisessa");
const SESSION: ErrorType = ErrorType("Virhe istunnon tietojen hakemisessa");

/// How session cookies are signed and how long sessions live.
#[derive(Clone)]
pub struct SessionConfig {
    pub secret: Vec<u8>,
    pub expiration: u64,
    pub secure: bool,
}

/// The authenticated user behind the current request.
///
/// Extracting `SessionContext` in a handler requires login; extract
/// `Option<SessionContext>` where anonymous visitors are allowed too.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub session_id: Uuid,
    pub user_id: i64,
    pub username: String,
    pub csrf_token: String,
}

impl SessionContext {
    /// Fails unless the submitted token equals the one issued at login.
    pub fn check_csrf(&self, token: Option<&str>) -> Result<(), error::SystemError> {
        match token {
            Some(token) if token == self.csrf_token => Ok(()),
            _ => Err(SESSION.forbidden("Istuntoa ei voitu vahvistaa")),
        }
    }
}

impl FromRequest for SessionContext {
    type Error = error::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let session = req.extensions().get::<SessionContext>().cloned();
        ready(session.ok_or_else(|| LOGIN.unauthorized("Kirjautuminen vaaditaan").into()))
    }
}

/// Resolves the session cookie into a [`SessionContext`] request extension.
///
/// Requests with a missing, forged, expired or revoked session continue
/// anonymously; handlers that need a login reject them when extracting.
pub async fn load_session<R, B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<B>, Error>
where
    R: SessionRepository + Send + Sync + 'static,
    B: MessageBody + 'static,
{
    if let Some(session) = resolve_session::<R>(&req).await {
        req.extensions_mut().insert(session);
    }

    next.call(req).await
}

async fn resolve_session<R>(req: &ServiceRequest) -> Option<SessionContext>
where
    R: SessionRepository + Send + Sync + 'static,
{
    let cookie = req.cookie(SESSION_COOKIE)?;
    let config = req.app_data::<web::Data<SessionConfig>>()?.clone();
    let sessions = req.app_data::<web::Data<R>>()?.clone();

    let claims = match SessionClaims::decode(cookie.value(), &config.secret) {
        Ok(claims) => claims,
        Err(e) => {
            log::debug!("Rejected session cookie: {e}");
            return None;
        }
    };

    let record = match sessions.find(&claims.jti).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            log::debug!("Session {} not found or revoked", claims.jti);
            return None;
        }
        Err(e) => {
            log::error!("Session lookup failed: {e:?}");
            return None;
        }
    };

    if record.user_id.to_string() != claims.sub {
        log::debug!("Session {} does not belong to user {}", claims.jti, claims.sub);
        return None;
    }

    Some(SessionContext {
        session_id: claims.jti,
        user_id: record.user_id,
        username: record.username,
        csrf_token: record.csrf_token,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{
        cookie::Cookie,
        http::StatusCode,
        middleware::from_fn,
        test::{self, TestRequest},
        App, HttpResponse,
    };

    use super::*;
    use crate::{modules::session::schema::SessionRecord, test::MemoryDb};

    fn session_config() -> SessionConfig {
        SessionConfig { secret: b"test-secret".to_vec(), expiration: 3600, secure: false }
    }

    async fn whoami(session: SessionContext) -> HttpResponse {
        HttpResponse::Ok().body(session.username)
    }

    async fn maybe(session: Option<SessionContext>) -> HttpResponse {
        HttpResponse::Ok().body(session.map(|s| s.username).unwrap_or_default())
    }

    async fn store_session(db: &MemoryDb, user_id: i64) -> (Uuid, String) {
        let session_id = Uuid::new_v4();
        let record = SessionRecord {
            user_id,
            username: "maija".into(),
            csrf_token: "0123456789abcdef0123456789abcdef".into(),
        };
        db.save(&session_id, &record, 3600).await.unwrap();
        let token = SessionClaims::new(user_id, session_id, 3600).encode(b"test-secret").unwrap();
        (session_id, token)
    }

    macro_rules! app {
        ($db:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(session_config()))
                    .app_data(web::Data::from($db.clone()))
                    .wrap(from_fn(load_session::<MemoryDb, _>))
                    .route("/me", web::get().to(whoami))
                    .route("/maybe", web::get().to(maybe)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn anonymous_request_needs_login() {
        let db = Arc::new(MemoryDb::default());
        let app = app!(db);

        let res = test::call_service(&app, TestRequest::get().uri("/me").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "Kirjautuminen vaaditaan");
        assert_eq!(body["error_type"], "Virhe kirjautumisessa");

        let res = test::call_service(&app, TestRequest::get().uri("/maybe").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn valid_cookie_binds_session() {
        let db = Arc::new(MemoryDb::default());
        let (_, token) = store_session(&db, 4).await;
        let app = app!(db);

        let req = TestRequest::get().uri("/me").cookie(Cookie::new(SESSION_COOKIE, token)).to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, web::Bytes::from_static(b"maija"));
    }

    #[actix_web::test]
    async fn revoked_session_is_anonymous() {
        let db = Arc::new(MemoryDb::default());
        let (session_id, token) = store_session(&db, 4).await;
        db.delete(&session_id).await.unwrap();
        let app = app!(db);

        let req = TestRequest::get().uri("/me").cookie(Cookie::new(SESSION_COOKIE, token)).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn forged_cookie_is_anonymous() {
        let db = Arc::new(MemoryDb::default());
        let (session_id, _) = store_session(&db, 4).await;
        let forged = SessionClaims::new(4, session_id, 3600).encode(b"wrong-secret").unwrap();
        let app = app!(db);

        let req =
            TestRequest::get().uri("/maybe").cookie(Cookie::new(SESSION_COOKIE, forged)).to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert!(body.is_empty());
    }

    #[test]
    fn csrf_token_must_match() {
        let session = SessionContext {
            session_id: Uuid::new_v4(),
            user_id: 1,
            username: "maija".into(),
            csrf_token: "a".repeat(32),
        };

        assert!(session.check_csrf(Some(&"a".repeat(32))).is_ok());
        assert!(matches!(
            session.check_csrf(None),
            Err(error::SystemError::Forbidden(ref body)) if body.message == "Istuntoa ei voitu vahvistaa"
        ));
        assert!(session.check_csrf(Some(&"b".repeat(32))).is_err());
    }
}
