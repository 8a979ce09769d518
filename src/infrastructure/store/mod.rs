mod in_memory;
mod redis;

pub use in_memory::InMemoryStore;
pub use redis::{create_pool, keys, RedisPool, RedisStore};
