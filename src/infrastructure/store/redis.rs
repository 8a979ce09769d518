use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Config, Connection, Pool, Runtime};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::domain::{
    ports::{InterviewStore, OrderStore, UserStore},
    DomainError, Interview, Order, User,
};

pub type RedisPool = Pool;

pub fn create_pool(redis_url: &str) -> Result<RedisPool, DomainError> {
    let cfg = Config::from_url(redis_url);
    cfg.create_pool(Some(Runtime::Tokio1))
        .map_err(|e| DomainError::internal(format!("Redis pool error: {e}")))
}

pub mod keys {
    use uuid::Uuid;

    pub const ONGOING_SET: &str = "interviews:ongoing";

    pub fn user(id: &Uuid) -> String {
        format!("user:{id}")
    }

    pub fn user_by_username(username: &str) -> String {
        format!("user:by-username:{username}")
    }

    pub fn interview(id: &Uuid) -> String {
        format!("interview:{id}")
    }

    pub fn interviews_by_user(user_id: &Uuid) -> String {
        format!("interviews:by-user:{user_id}")
    }

    pub fn ongoing_by_user(user_id: &Uuid) -> String {
        format!("interview:ongoing:{user_id}")
    }

    pub fn order(id: &Uuid) -> String {
        format!("order:{id}")
    }

    pub fn order_by_session(session_id: &str) -> String {
        format!("order:by-session:{session_id}")
    }
}

/// Document store over Redis. Entities are stored as JSON values with a few
/// secondary-index keys; there is no cross-key atomicity.
#[derive(Clone)]
pub struct RedisStore {
    pool: RedisPool,
}

impl RedisStore {
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> Result<Connection, DomainError> {
        self.pool
            .get()
            .await
            .map_err(|e| DomainError::internal(format!("Redis pool error: {e}")))
    }

    async fn set_json<T: Serialize>(
        conn: &mut Connection,
        key: &str,
        value: &T,
    ) -> Result<(), DomainError> {
        let json = serde_json::to_string(value)
            .map_err(|e| DomainError::internal(format!("serialize {key}: {e}")))?;
        conn.set::<_, _, ()>(key, json)
            .await
            .map_err(|e| DomainError::internal(format!("Redis error: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(
        conn: &mut Connection,
        key: &str,
    ) -> Result<Option<T>, DomainError> {
        let raw: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| DomainError::internal(format!("Redis error: {e}")))?;
        raw.map(|json| {
            serde_json::from_str(&json)
                .map_err(|e| DomainError::internal(format!("deserialize {key}: {e}")))
        })
        .transpose()
    }

    async fn get_str(conn: &mut Connection, key: &str) -> Result<Option<String>, DomainError> {
        conn.get(key)
            .await
            .map_err(|e| DomainError::internal(format!("Redis error: {e}")))
    }
}

fn redis_err(e: deadpool_redis::redis::RedisError) -> DomainError {
    DomainError::internal(format!("Redis error: {e}"))
}

#[async_trait]
impl UserStore for RedisStore {
    async fn insert(&self, user: &User) -> Result<(), DomainError> {
        let mut conn = self.conn().await?;
        Self::set_json(&mut conn, &keys::user(&user.id), user).await?;
        conn.set::<_, _, ()>(keys::user_by_username(&user.username), user.id.to_string())
            .await
            .map_err(redis_err)
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let mut conn = self.conn().await?;
        Self::get_json(&mut conn, &keys::user(&id)).await
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let mut conn = self.conn().await?;
        let id = match Self::get_str(&mut conn, &keys::user_by_username(username)).await? {
            Some(id) => id,
            None => return Ok(None),
        };
        let id = id
            .parse::<Uuid>()
            .map_err(|e| DomainError::internal(format!("corrupt username index: {e}")))?;
        Self::get_json(&mut conn, &keys::user(&id)).await
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let mut conn = self.conn().await?;
        Self::set_json(&mut conn, &keys::user(&user.id), user).await
    }
}

#[async_trait]
impl InterviewStore for RedisStore {
    async fn insert(&self, interview: &Interview) -> Result<(), DomainError> {
        let mut conn = self.conn().await?;
        Self::set_json(&mut conn, &keys::interview(&interview.id), interview).await?;
        // Newest first, so pagination can read straight off the list.
        conn.lpush::<_, _, ()>(
            keys::interviews_by_user(&interview.user_id),
            interview.id.to_string(),
        )
        .await
        .map_err(redis_err)?;
        if interview.active {
            conn.set::<_, _, ()>(
                keys::ongoing_by_user(&interview.user_id),
                interview.id.to_string(),
            )
            .await
            .map_err(redis_err)?;
            conn.sadd::<_, _, ()>(keys::ONGOING_SET, interview.id.to_string())
                .await
                .map_err(redis_err)?;
        }
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Interview>, DomainError> {
        let mut conn = self.conn().await?;
        Self::get_json(&mut conn, &keys::interview(&id)).await
    }

    async fn ongoing_by_user(&self, user_id: Uuid) -> Result<Option<Interview>, DomainError> {
        let mut conn = self.conn().await?;
        let id = match Self::get_str(&mut conn, &keys::ongoing_by_user(&user_id)).await? {
            Some(id) => id,
            None => return Ok(None),
        };
        let id = id
            .parse::<Uuid>()
            .map_err(|e| DomainError::internal(format!("corrupt ongoing index: {e}")))?;
        let interview: Option<Interview> = Self::get_json(&mut conn, &keys::interview(&id)).await?;
        Ok(interview.filter(|i| i.active))
    }

    async fn list_ongoing(&self) -> Result<Vec<Interview>, DomainError> {
        let mut conn = self.conn().await?;
        let ids: Vec<String> = conn.smembers(keys::ONGOING_SET).await.map_err(redis_err)?;

        let mut interviews = Vec::with_capacity(ids.len());
        for raw in ids {
            let id = raw
                .parse::<Uuid>()
                .map_err(|e| DomainError::internal(format!("corrupt ongoing set: {e}")))?;
            if let Some(interview) = Self::get_json::<Interview>(&mut conn, &keys::interview(&id))
                .await?
                .filter(|i| i.active)
            {
                interviews.push(interview);
            }
        }
        Ok(interviews)
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Interview>, u64), DomainError> {
        let mut conn = self.conn().await?;
        let list_key = keys::interviews_by_user(&user_id);
        let total: u64 = conn.llen(&list_key).await.map_err(redis_err)?;
        if limit == 0 || offset >= total {
            return Ok((Vec::new(), total));
        }

        let stop = (offset + limit - 1) as isize;
        let ids: Vec<String> = conn
            .lrange(&list_key, offset as isize, stop)
            .await
            .map_err(redis_err)?;

        let mut interviews = Vec::with_capacity(ids.len());
        for raw in ids {
            let id = raw
                .parse::<Uuid>()
                .map_err(|e| DomainError::internal(format!("corrupt interview index: {e}")))?;
            if let Some(interview) =
                Self::get_json::<Interview>(&mut conn, &keys::interview(&id)).await?
            {
                interviews.push(interview);
            }
        }
        Ok((interviews, total))
    }

    async fn update(&self, interview: &Interview) -> Result<(), DomainError> {
        let mut conn = self.conn().await?;
        Self::set_json(&mut conn, &keys::interview(&interview.id), interview).await?;
        if interview.active {
            conn.set::<_, _, ()>(
                keys::ongoing_by_user(&interview.user_id),
                interview.id.to_string(),
            )
            .await
            .map_err(redis_err)?;
            conn.sadd::<_, _, ()>(keys::ONGOING_SET, interview.id.to_string())
                .await
                .map_err(redis_err)?;
        } else {
            conn.del::<_, ()>(keys::ongoing_by_user(&interview.user_id))
                .await
                .map_err(redis_err)?;
            conn.srem::<_, _, ()>(keys::ONGOING_SET, interview.id.to_string())
                .await
                .map_err(redis_err)?;
        }
        Ok(())
    }
}

#[async_trait]
impl OrderStore for RedisStore {
    async fn insert(&self, order: &Order) -> Result<(), DomainError> {
        let mut conn = self.conn().await?;
        Self::set_json(&mut conn, &keys::order(&order.id), order).await?;
        conn.set::<_, _, ()>(
            keys::order_by_session(&order.checkout_session_id),
            order.id.to_string(),
        )
        .await
        .map_err(redis_err)
    }

    async fn get_by_session(&self, session_id: &str) -> Result<Option<Order>, DomainError> {
        let mut conn = self.conn().await?;
        let id = match Self::get_str(&mut conn, &keys::order_by_session(session_id)).await? {
            Some(id) => id,
            None => return Ok(None),
        };
        let id = id
            .parse::<Uuid>()
            .map_err(|e| DomainError::internal(format!("corrupt session index: {e}")))?;
        Self::get_json(&mut conn, &keys::order(&id)).await
    }

    async fn update(&self, order: &Order) -> Result<(), DomainError> {
        let mut conn = self.conn().await?;
        Self::set_json(&mut conn, &keys::order(&order.id), order).await
    }
}
