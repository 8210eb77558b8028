use uuid::Uuid;

use crate::{api::error, modules::session::schema::SessionRecord};

#[async_trait::async_trait]
pub trait SessionRepository {
    async fn save(
        &self,
        session_id: &Uuid,
        record: &SessionRecord,
        expiration: u64,
    ) -> Result<(), error::SystemError>;

    async fn find(&self, session_id: &Uuid) -> Result<Option<SessionRecord>, error::SystemError>;

    async fn delete(&self, session_id: &Uuid) -> Result<(), error::SystemError>;
}
