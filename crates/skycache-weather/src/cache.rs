//! Key-value cache backends.
//!
//! [`CacheStore`] is the narrow surface the HTTP handlers need: point reads
//! and writes with a TTL, a full key scan, TTL inspection and a liveness
//! probe. Values are opaque bytes; encoding is the caller's concern.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, RedisError};
use tokio::time::Instant;

use crate::types::CacheError;

/// Keys requested per SCAN round trip
const SCAN_BATCH: usize = 100;

#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read a value. `Ok(None)` means the key is absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Write a value that expires after `ttl`, replacing any previous one.
    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError>;

    /// Every key currently stored.
    ///
    /// This walks the whole keyspace in one call; there is no pagination.
    async fn keys(&self) -> Result<Vec<String>, CacheError>;

    /// Remaining time to live. `None` when the key is absent or never expires.
    async fn ttl(&self, key: &str) -> Result<Option<Duration>, CacheError>;

    /// Side-effect free reachability check.
    async fn ping(&self) -> Result<(), CacheError>;
}

/// Redis-backed store sharing one multiplexed connection across requests.
///
/// The connection is established lazily. If it cannot be opened, or drops
/// later, the next operation makes a single fresh attempt.
pub struct RedisCache {
    client: Client,
    conn: RwLock<Option<MultiplexedConnection>>,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("addr", &self.client.get_connection_info().addr)
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl RedisCache {
    /// Create a store for `url` (e.g. `redis://localhost:6379/0`).
    ///
    /// Only parses the URL; no network traffic happens until [`connect`](Self::connect)
    /// or the first operation.
    pub fn new(url: &str) -> Result<Self, CacheError> {
        let client = Client::open(url).map_err(|e| CacheError::Connection(e.to_string()))?;
        Ok(Self {
            client,
            conn: RwLock::new(None),
        })
    }

    /// Open the shared connection and confirm it answers PING.
    pub async fn connect(&self) -> Result<(), CacheError> {
        self.ping().await
    }

    pub fn is_connected(&self) -> bool {
        self.conn.read().is_some()
    }

    async fn connection(&self) -> Result<MultiplexedConnection, CacheError> {
        if let Some(conn) = self.conn.read().clone() {
            return Ok(conn);
        }

        let conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))?;

        tracing::info!("Connected to Redis at {}", self.client.get_connection_info().addr);
        *self.conn.write() = Some(conn.clone());
        Ok(conn)
    }

    /// Map a command failure, dropping the shared connection if it is dead.
    fn command_error(&self, command: &'static str, err: RedisError) -> CacheError {
        if err.is_connection_dropped() || err.is_io_error() {
            tracing::warn!("Redis connection lost during {}: {}", command, err);
            *self.conn.write() = None;
        }
        CacheError::command(command, err)
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut conn = self.connection().await?;
        let value: Option<Vec<u8>> = conn
            .get(key)
            .await
            .map_err(|e| self.command_error("GET", e))?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        let _: () = conn
            .set_ex(key, value, expire_seconds(ttl))
            .await
            .map_err(|e| self.command_error("SETEX", e))?;
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, CacheError> {
        let mut conn = self.connection().await?;
        let mut seen = HashSet::new();
        let mut keys = Vec::new();
        let mut cursor: u64 = 0;

        loop {
            let (next, batch): (u64, Vec<Vec<u8>>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg("*")
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| self.command_error("SCAN", e))?;

            // SCAN may return a key more than once across iterations
            for raw in batch {
                if seen.insert(raw.clone()) {
                    keys.push(decode_key(raw));
                }
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        Ok(keys)
    }

    async fn ttl(&self, key: &str) -> Result<Option<Duration>, CacheError> {
        let mut conn = self.connection().await?;
        // -2: missing key, -1: no expiry
        let secs: i64 = conn
            .ttl(key)
            .await
            .map_err(|e| self.command_error("TTL", e))?;
        Ok(u64::try_from(secs)
            .ok()
            .filter(|s| *s > 0)
            .map(Duration::from_secs))
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| self.command_error("PING", e))?;
        Ok(())
    }
}

/// SETEX rejects 0, so sub-second TTLs round up to one second.
fn expire_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

/// Keys are binary-safe in Redis; ones that are not UTF-8 are listed lossily.
fn decode_key(raw: Vec<u8>) -> String {
    match String::from_utf8(raw) {
        Ok(key) => key,
        Err(e) => {
            let key = String::from_utf8_lossy(e.as_bytes()).into_owned();
            tracing::warn!("Cache key is not valid UTF-8, listing it as {:?}", key);
            key
        }
    }
}

#[derive(Debug, Clone)]
struct MemoryEntry {
    value: Vec<u8>,
    expires_at: Instant,
}

/// In-process store with the same expiry semantics as Redis.
///
/// Expiry is measured on the tokio clock, so paused-time tests can step
/// past a TTL without sleeping.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, MemoryEntry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .values()
            .filter(|e| e.expires_at > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn live_entry(&self, key: &str) -> Option<MemoryEntry> {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let expired = match entries.get(key) {
            Some(entry) if entry.expires_at > now => return Some(entry.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.remove(key);
        }
        None
    }
}

#[async_trait]
impl CacheStore for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.live_entry(key).map(|e| e.value))
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        let entry = MemoryEntry {
            value: value.to_vec(),
            expires_at: Instant::now() + ttl,
        };
        self.entries.lock().insert(key.to_string(), entry);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        entries.retain(|_, e| e.expires_at > now);
        Ok(entries.keys().cloned().collect())
    }

    async fn ttl(&self, key: &str) -> Result<Option<Duration>, CacheError> {
        Ok(self
            .live_entry(key)
            .map(|e| e.expires_at.saturating_duration_since(Instant::now()))
            .filter(|d| !d.is_zero()))
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIVE_MINUTES: Duration = Duration::from_secs(300);

    #[tokio::test(start_paused = true)]
    async fn test_memory_set_then_get() {
        let cache = InMemoryCache::new();
        cache.set("paris", b"{}", FIVE_MINUTES).await.unwrap();
        assert_eq!(cache.get("paris").await.unwrap(), Some(b"{}".to_vec()));
        assert_eq!(cache.get("Paris").await.unwrap(), None);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_memory_entry_expires() {
        let cache = InMemoryCache::new();
        cache.set("paris", b"{}", FIVE_MINUTES).await.unwrap();

        tokio::time::advance(Duration::from_secs(299)).await;
        assert!(cache.get("paris").await.unwrap().is_some());
        assert_eq!(cache.ttl("paris").await.unwrap(), Some(Duration::from_secs(1)));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get("paris").await.unwrap().is_none());
        assert!(cache.keys().await.unwrap().is_empty());
        assert_eq!(cache.ttl("paris").await.unwrap(), None);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_memory_overwrite_resets_ttl() {
        let cache = InMemoryCache::new();
        cache.set("oslo", b"1", FIVE_MINUTES).await.unwrap();
        tokio::time::advance(Duration::from_secs(200)).await;
        cache.set("oslo", b"2", FIVE_MINUTES).await.unwrap();
        tokio::time::advance(Duration::from_secs(200)).await;

        assert_eq!(cache.get("oslo").await.unwrap(), Some(b"2".to_vec()));
        assert_eq!(cache.ttl("oslo").await.unwrap(), Some(Duration::from_secs(100)));
    }

    #[tokio::test]
    async fn test_memory_keys_lists_all() {
        let cache = InMemoryCache::new();
        cache.set("a", b"1", FIVE_MINUTES).await.unwrap();
        cache.set("b", b"2", FIVE_MINUTES).await.unwrap();
        let mut keys = cache.keys().await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
        assert!(cache.ping().await.is_ok());
    }

    #[test]
    fn test_scan_reply_keeps_keys_that_are_not_utf8() {
        let reply = redis::Value::Array(vec![
            redis::Value::BulkString(b"0".to_vec()),
            redis::Value::Array(vec![
                redis::Value::BulkString(b"paris".to_vec()),
                redis::Value::BulkString(vec![0xff, 0xfe]),
            ]),
        ]);
        let (cursor, batch): (u64, Vec<Vec<u8>>) = redis::from_redis_value(&reply).unwrap();
        assert_eq!(cursor, 0);

        let keys: Vec<String> = batch.into_iter().map(decode_key).collect();
        assert_eq!(keys, vec!["paris".to_string(), "\u{fffd}\u{fffd}".to_string()]);
    }

    #[test]
    fn test_sub_second_ttl_rounds_up() {
        assert_eq!(expire_seconds(Duration::from_millis(200)), 1);
        assert_eq!(expire_seconds(Duration::ZERO), 1);
        assert_eq!(expire_seconds(FIVE_MINUTES), 300);
    }

    #[test]
    fn test_redis_new_rejects_bad_url() {
        assert!(matches!(
            RedisCache::new("not a url"),
            Err(CacheError::Connection(_))
        ));
    }

    #[tokio::test]
    async fn test_redis_unreachable_reports_connection_error() {
        let cache = RedisCache::new("redis://127.0.0.1:1/0").unwrap();
        assert!(!cache.is_connected());
        assert!(matches!(cache.ping().await, Err(CacheError::Connection(_))));
        assert!(cache.get("paris").await.is_err());
        assert!(!cache.is_connected());
    }
}
