use std::sync::Arc;

use uuid::Uuid;

use crate::{
    api::error,
    configs::RedisCache,
    modules::session::{repository::SessionRepository, schema::SessionRecord},
};

#[derive(Clone)]
pub struct SessionRepositoryRedis {
    cache: Arc<RedisCache>,
}

impl SessionRepositoryRedis {
    pub fn new(cache: Arc<RedisCache>) -> Self {
        Self { cache }
    }

    fn key(session_id: &Uuid) -> String {
        format!("session:{session_id}")
    }
}

#[async_trait::async_trait]
impl SessionRepository for SessionRepositoryRedis {
    async fn save(
        &self,
        session_id: &Uuid,
        record: &SessionRecord,
        expiration: u64,
    ) -> Result<(), error::SystemError> {
        self.cache.set(&Self::key(session_id), record, expiration).await
    }

    async fn find(&self, session_id: &Uuid) -> Result<Option<SessionRecord>, error::SystemError> {
        self.cache.get::<SessionRecord>(&Self::key(session_id)).await
    }

    async fn delete(&self, session_id: &Uuid) -> Result<(), error::SystemError> {
        self.cache.delete(&Self::key(session_id)).await
    }
}
