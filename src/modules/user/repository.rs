use crate::{
    api::error,
    modules::user::{
        model::InsertUser,
        schema::{UserEntity, UserProfile},
    },
};

#[async_trait::async_trait]
pub trait UserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<UserProfile>, error::SystemError>;
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserEntity>, error::SystemError>;
    /// Fails with `SystemError::Conflict` when the username is taken.
    async fn create(&self, user: &InsertUser) -> Result<i64, error::SystemError>;

    async fn find_image(&self, id: i64) -> Result<Option<Vec<u8>>, error::SystemError>;
    async fn update_image(&self, id: i64, image: &[u8]) -> Result<(), error::SystemError>;
    async fn remove_image(&self, id: i64) -> Result<(), error::SystemError>;
}
