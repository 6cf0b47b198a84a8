//! In-memory registry of tracked artifacts
//!
//! Maps artifact path to creation time. Every mutating or iterating
//! operation takes the exclusive lock for its full duration; `len` and `get`
//! only take the shared lock. The registry never touches the filesystem.
//! Callers that delete a tracked file do so while holding a [`RegistryGuard`]
//! so the file removal and the entry removal happen in one critical section.

use crate::types::{ArtifactPair, RegistryEntry};
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::{RwLock, RwLockWriteGuard};

#[derive(Debug, Default)]
pub struct CacheRegistry {
    entries: RwLock<HashMap<PathBuf, DateTime<Utc>>>,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an entry
    pub async fn put(&self, path: impl Into<PathBuf>, created_at: DateTime<Utc>) {
        self.lock().await.put(path, created_at);
    }

    /// Register both artifacts of a pair with the same timestamp
    pub async fn put_pair(&self, pair: &ArtifactPair, created_at: DateTime<Utc>) {
        self.lock().await.put_pair(pair, created_at);
    }

    /// Remove an entry; absent entries are ignored
    pub async fn delete(&self, path: &Path) {
        self.lock().await.delete(path);
    }

    pub async fn delete_pair(&self, pair: &ArtifactPair) {
        self.lock().await.delete_pair(pair);
    }

    pub async fn get(&self, path: &Path) -> Option<DateTime<Utc>> {
        self.entries.read().await.get(path).copied()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Copy of all entries, oldest first
    pub async fn snapshot(&self) -> Vec<RegistryEntry> {
        self.lock().await.snapshot()
    }

    /// Take the exclusive lock. Puts and deletes from other tasks wait until
    /// the guard is dropped.
    pub async fn lock(&self) -> RegistryGuard<'_> {
        RegistryGuard {
            entries: self.entries.write().await,
        }
    }
}

/// Exclusive access to the registry for a multi-step critical section
pub struct RegistryGuard<'a> {
    entries: RwLockWriteGuard<'a, HashMap<PathBuf, DateTime<Utc>>>,
}

impl RegistryGuard<'_> {
    pub fn put(&mut self, path: impl Into<PathBuf>, created_at: DateTime<Utc>) {
        self.entries.insert(path.into(), created_at);
    }

    pub fn put_pair(&mut self, pair: &ArtifactPair, created_at: DateTime<Utc>) {
        self.put(pair.input.clone(), created_at);
        self.put(pair.output.clone(), created_at);
    }

    pub fn delete(&mut self, path: &Path) {
        self.entries.remove(path);
    }

    pub fn delete_pair(&mut self, pair: &ArtifactPair) {
        self.delete(&pair.input);
        self.delete(&pair.output);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn snapshot(&self) -> Vec<RegistryEntry> {
        let mut entries: Vec<RegistryEntry> = self
            .entries
            .iter()
            .map(|(path, created_at)| RegistryEntry {
                path: path.clone(),
                created_at: *created_at,
            })
            .collect();
        entries.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.path.cmp(&b.path))
        });
        entries
    }

    /// Entries whose age at `now` is strictly greater than `retention`
    pub fn expired(&self, now: DateTime<Utc>, retention: TimeDelta) -> Vec<RegistryEntry> {
        self.snapshot()
            .into_iter()
            .filter(|entry| now.signed_duration_since(entry.created_at) > retention)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn pair(key: &str) -> ArtifactPair {
        ArtifactPair {
            key: key.to_string(),
            input: PathBuf::from(format!("/cache/{}.html", key)),
            output: PathBuf::from(format!("/cache/{}.pdf", key)),
        }
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let registry = CacheRegistry::new();
        let path = PathBuf::from("/cache/a.html");
        let first = Utc::now() - TimeDelta::minutes(5);
        let second = Utc::now();

        registry.put(path.clone(), first).await;
        registry.put(path.clone(), second).await;

        assert_eq!(registry.len().await, 1);
        assert_eq!(registry.get(&path).await, Some(second));
    }

    #[tokio::test]
    async fn test_delete_absent_is_noop() {
        let registry = CacheRegistry::new();
        registry.delete(Path::new("/cache/nothing.pdf")).await;
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_pair_registration() {
        let registry = CacheRegistry::new();
        let p = pair("abc");
        let now = Utc::now();

        registry.put_pair(&p, now).await;
        assert_eq!(registry.len().await, 2);
        assert_eq!(registry.get(&p.input).await, Some(now));
        assert_eq!(registry.get(&p.output).await, Some(now));

        registry.delete_pair(&p).await;
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_snapshot_is_oldest_first() {
        let registry = CacheRegistry::new();
        let now = Utc::now();
        registry.put("/cache/new.pdf", now).await;
        registry.put("/cache/old.pdf", now - TimeDelta::hours(2)).await;
        registry.put("/cache/mid.pdf", now - TimeDelta::hours(1)).await;

        let paths: Vec<_> = registry
            .snapshot()
            .await
            .into_iter()
            .map(|e| e.path)
            .collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/cache/old.pdf"),
                PathBuf::from("/cache/mid.pdf"),
                PathBuf::from("/cache/new.pdf"),
            ]
        );
    }

    #[tokio::test]
    async fn test_expired_is_strictly_older_than_retention() {
        let registry = CacheRegistry::new();
        let now = Utc::now();
        let retention = TimeDelta::hours(1);
        registry.put("/cache/exact.pdf", now - retention).await;
        registry
            .put("/cache/over.pdf", now - retention - TimeDelta::seconds(1))
            .await;
        registry
            .put("/cache/under.pdf", now - retention + TimeDelta::seconds(1))
            .await;

        let guard = registry.lock().await;
        let expired = guard.expired(now, retention);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].path, PathBuf::from("/cache/over.pdf"));
    }

    #[tokio::test]
    async fn test_guard_blocks_concurrent_put() {
        let registry = Arc::new(CacheRegistry::new());
        let mut guard = registry.lock().await;

        let writer = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move { registry.put("/cache/late.pdf", Utc::now()).await })
        };
        tokio::task::yield_now().await;

        // The spawned put cannot land while the guard is held
        assert!(guard.is_empty());
        guard.put("/cache/early.pdf", Utc::now());
        drop(guard);

        writer.await.unwrap();
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_puts_and_deletes() {
        let registry = Arc::new(CacheRegistry::new());
        let mut handles = Vec::new();

        for i in 0..100 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                let p = pair(&format!("k{}", i));
                registry.put_pair(&p, Utc::now()).await;
                if i % 2 == 0 {
                    registry.delete_pair(&p).await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(registry.len().await, 100);
    }
}
