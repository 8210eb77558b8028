use log::info;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::api::error::{self, ErrorType};
use crate::constants::MAX_IMAGE_SIZE;
use crate::middlewares::{SessionConfig, SessionContext};
use crate::modules::review::repository::ReviewRepository;
use crate::modules::session::{repository::SessionRepository, schema::SessionRecord};
use crate::modules::user::{
    model::{ImageUpload, InsertUser, LoginModel, LoginResponse, RegisterModel, UserPageResponse},
    repository::UserRepository,
    schema::UserProfile,
};
use crate::utils::{
    generate_csrf_token, hash_password, validation, verify_password, ConfirmForm, SessionClaims,
};

const REGISTER: ErrorType = ErrorType("Virhe käyttäjän luomisessa");
const LOGIN: ErrorType = ErrorType("Virhe kirjautumisessa");
const PAGE: ErrorType = ErrorType("Virhe sivun hakemisessa");
const PROFILE: ErrorType = ErrorType("Virhe profiilin muokkaamisessa");
const SHOW_IMAGE: ErrorType = ErrorType("Virhe profiilikuvan hakemisessa");
const REMOVE_IMAGE: ErrorType = ErrorType("Virhe profiilikuvan poistamisessa");

#[derive(Clone)]
pub struct UserService<U, R, S>
where
    U: UserRepository + Send + Sync,
    R: ReviewRepository + Send + Sync,
    S: SessionRepository + Send + Sync,
{
    user_repo: Arc<U>,
    review_repo: Arc<R>,
    session_repo: Arc<S>,
    session_config: SessionConfig,
}

impl<U, R, S> UserService<U, R, S>
where
    U: UserRepository + Send + Sync,
    R: ReviewRepository + Send + Sync,
    S: SessionRepository + Send + Sync,
{
    pub fn with_dependencies(
        user_repo: Arc<U>,
        review_repo: Arc<R>,
        session_repo: Arc<S>,
        session_config: SessionConfig,
    ) -> Self {
        info!("UserService initialized with dependencies");
        UserService { user_repo, review_repo, session_repo, session_config }
    }

    pub async fn register(&self, user: RegisterModel) -> Result<i64, error::SystemError> {
        if user.username.is_empty() || user.password1.is_empty() || user.password2.is_empty() {
            return Err(REGISTER.bad_request("Kaikki kentät tulee täyttää"));
        }
        if user.password1 != user.password2 {
            return Err(REGISTER.bad_request("Salasanat eivät täsmää"));
        }
        if let Err(errors) = user.validate() {
            let message = validation::first_message(&errors, &["username", "password1"])
                .unwrap_or_else(|| "Virheelliset tiedot".to_string());
            return Err(REGISTER.bad_request(message));
        }

        let password_hash = hash_password(&user.password1)?;
        let new_user = InsertUser { username: user.username, password_hash };

        let id = match self.user_repo.create(&new_user).await {
            Ok(id) => id,
            Err(error::SystemError::Conflict(_)) => {
                return Err(REGISTER.conflict("Käyttäjänimi varattu"));
            }
            Err(e) => return Err(e),
        };

        info!("User {} registered as {}", id, new_user.username);
        Ok(id)
    }

    /// Starts a session with a fresh CSRF token. Returns the signed cookie
    /// value along with the session details for the client.
    pub async fn login(
        &self,
        user: LoginModel,
    ) -> Result<(String, LoginResponse), error::SystemError> {
        if user.username.is_empty() || user.password.is_empty() {
            return Err(LOGIN.bad_request("Kaikki kentät tulee täyttää"));
        }

        let invalid = || LOGIN.unauthorized("Virheellinen käyttäjätunnus/salasana");

        let user_entity =
            self.user_repo.find_by_username(&user.username).await?.ok_or_else(invalid)?;
        if !verify_password(&user_entity.password_hash, &user.password)? {
            return Err(invalid());
        }

        let session_id = Uuid::new_v4();
        let record = SessionRecord {
            user_id: user_entity.id,
            username: user_entity.username,
            csrf_token: generate_csrf_token(),
        };

        let token = SessionClaims::new(record.user_id, session_id, self.session_config.expiration)
            .encode(&self.session_config.secret)?;
        self.session_repo.save(&session_id, &record, self.session_config.expiration).await?;
        info!("User {} logged in", record.user_id);

        let response = LoginResponse {
            user_id: record.user_id,
            username: record.username,
            csrf_token: record.csrf_token,
        };
        Ok((token, response))
    }

    pub async fn logout(&self, session: Option<SessionContext>) -> Result<(), error::SystemError> {
        if let Some(session) = session {
            self.session_repo.delete(&session.session_id).await?;
            info!("User {} logged out", session.user_id);
        }
        Ok(())
    }

    pub async fn user_page(&self, id: i64) -> Result<UserPageResponse, error::SystemError> {
        let (user, reviews) =
            tokio::try_join!(self.user_repo.find_by_id(id), self.review_repo.find_by_user(id))?;
        let user = user.ok_or_else(|| PAGE.not_found("Käyttäjää ei löytynyt"))?;
        Ok(UserPageResponse { user, reviews })
    }

    /// Stores the uploaded profile image when the form confirms it.
    pub async fn add_image(
        &self,
        session: &SessionContext,
        upload: ImageUpload,
    ) -> Result<(), error::SystemError> {
        session.check_csrf(upload.csrf_token.as_deref())?;

        if !upload.confirm {
            return Ok(());
        }

        let is_jpg = upload.filename.as_deref().is_some_and(|name| name.ends_with(".jpg"));
        if !is_jpg {
            return Err(PROFILE.bad_request("Väärä tiedostomuoto"));
        }
        if upload.truncated || upload.bytes.len() > MAX_IMAGE_SIZE {
            return Err(PROFILE.bad_request("Liian suuri kuva"));
        }

        self.user_repo.update_image(session.user_id, &upload.bytes).await?;
        info!("User {} updated profile image ({} bytes)", session.user_id, upload.bytes.len());
        Ok(())
    }

    pub async fn image(&self, user_id: i64) -> Result<Vec<u8>, error::SystemError> {
        self.user_repo
            .find_image(user_id)
            .await?
            .ok_or_else(|| SHOW_IMAGE.not_found("Profiilikuvaa ei löytynyt"))
    }

    pub async fn remove_image_page(
        &self,
        session: &SessionContext,
    ) -> Result<UserProfile, error::SystemError> {
        let user = self
            .user_repo
            .find_by_id(session.user_id)
            .await?
            .ok_or_else(|| REMOVE_IMAGE.not_found("Käyttäjää ei löytynyt"))?;

        if !user.has_image {
            return Err(REMOVE_IMAGE.not_found("Profiilikuvaa ei löytynyt"));
        }

        Ok(user)
    }

    pub async fn remove_image(
        &self,
        session: &SessionContext,
        form: ConfirmForm,
    ) -> Result<(), error::SystemError> {
        session.check_csrf(form.csrf_token.as_deref())?;
        self.remove_image_page(session).await?;

        if form.remove {
            self.user_repo.remove_image(session.user_id).await?;
            info!("User {} removed profile image", session.user_id);
        }
        Ok(())
    }
}
