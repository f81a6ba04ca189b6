pub mod cached;
pub mod redis;
pub mod seed;
pub mod sqlite;
pub mod store;

pub use self::cached::CachedExerciseStore;
pub use self::redis::{create_redis_client, Cache, CacheKey, CacheWriterHandle};
pub use self::seed::{parse_catalog, seed_catalog, seed_catalog_from_file};
pub use self::sqlite::{create_pool, init_schema};
pub use self::store::{ExerciseStore, SqliteExerciseStore};
