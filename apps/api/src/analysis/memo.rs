//! Memoization of oracle results, keyed by an input fingerprint.
//!
//! Caches are unbounded and live as long as the process. Only successful
//! results are stored; a failed call is attempted again on the next identical
//! request.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::models::analysis::{
    ComparisonResult, GeneratedQuestions, ResumeComparison, ResumeFeedback,
};
use crate::models::resume::ParsedResume;

/// Deterministic key over an operation name and all of its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn builder(operation: &str) -> FingerprintBuilder {
        FingerprintBuilder::new(operation)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Feeds length-prefixed inputs into SHA-256 so that adjacent inputs can
/// never run together ("ab" + "c" differs from "a" + "bc").
pub struct FingerprintBuilder {
    hasher: Sha256,
}

impl FingerprintBuilder {
    fn new(operation: &str) -> Self {
        let builder = Self {
            hasher: Sha256::new(),
        };
        builder.bytes(operation.as_bytes())
    }

    pub fn bytes(mut self, data: &[u8]) -> Self {
        self.hasher.update((data.len() as u64).to_le_bytes());
        self.hasher.update(data);
        self
    }

    pub fn text(self, text: &str) -> Self {
        self.bytes(text.as_bytes())
    }

    /// Hashes the canonical JSON form of a prior record.
    pub fn record<T: Serialize>(self, record: &T) -> Self {
        let encoded = serde_json::to_vec(record).unwrap_or_default();
        self.bytes(&encoded)
    }

    pub fn finish(self) -> Fingerprint {
        Fingerprint(format!("{:x}", self.hasher.finalize()))
    }
}

/// A per-operation result cache.
pub struct MemoCache<T> {
    operation: &'static str,
    entries: Mutex<HashMap<Fingerprint, T>>,
}

impl<T: Clone> MemoCache<T> {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn get(&self, key: &Fingerprint) -> Option<T> {
        self.lock().get(key).cloned()
    }

    /// Returns the cached value for `key`, or runs `compute` and stores its
    /// success. The lock is not held while `compute` runs.
    pub async fn memoize<F, Fut, E>(&self, key: Fingerprint, compute: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.get(&key) {
            debug!("Cache hit for {} ({})", self.operation, &key.as_str()[..12]);
            return Ok(hit);
        }

        let value = compute().await?;
        self.lock().insert(key, value.clone());
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Fingerprint, T>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Cache sizes reported by the health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub parse: usize,
    pub compare_jd: usize,
    pub compare_peers: usize,
    pub feedback: usize,
    pub questions: usize,
}

/// One cache per oracle operation, shared for the life of the process.
pub struct OperationCaches {
    pub parse: MemoCache<ParsedResume>,
    pub compare_jd: MemoCache<ComparisonResult>,
    pub compare_peers: MemoCache<ResumeComparison>,
    pub feedback: MemoCache<ResumeFeedback>,
    pub questions: MemoCache<GeneratedQuestions>,
}

impl Default for OperationCaches {
    fn default() -> Self {
        Self {
            parse: MemoCache::new("parse_resume"),
            compare_jd: MemoCache::new("compare_to_jd"),
            compare_peers: MemoCache::new("compare_two_resumes"),
            feedback: MemoCache::new("resume_feedback"),
            questions: MemoCache::new("interview_questions"),
        }
    }
}

impl OperationCaches {
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            parse: self.parse.len(),
            compare_jd: self.compare_jd.len(),
            compare_peers: self.compare_peers.len(),
            feedback: self.feedback.len(),
            questions: self.questions.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_fingerprint_is_deterministic() {
        let a = Fingerprint::builder("op").text("jd").bytes(b"file").finish();
        let b = Fingerprint::builder("op").text("jd").bytes(b"file").finish();
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);
    }

    #[test]
    fn test_fingerprint_separates_operations_and_boundaries() {
        let base = Fingerprint::builder("op").text("ab").text("c").finish();
        assert_ne!(base, Fingerprint::builder("op").text("a").text("bc").finish());
        assert_ne!(base, Fingerprint::builder("other").text("ab").text("c").finish());
    }

    #[tokio::test]
    async fn test_identical_inputs_compute_once() {
        let cache: MemoCache<u32> = MemoCache::new("test");
        let calls = AtomicUsize::new(0);
        let key = || Fingerprint::builder("test").text("same").finish();

        for _ in 0..2 {
            let value = cache
                .memoize(key(), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ()>(7)
                })
                .await
                .unwrap();
            assert_eq!(value, 7);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cache: MemoCache<u32> = MemoCache::new("test");
        let calls = AtomicUsize::new(0);
        let key = || Fingerprint::builder("test").finish();

        let first = cache
            .memoize(key(), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>("boom")
            })
            .await;
        assert!(first.is_err());

        let second = cache
            .memoize(key(), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, &str>(3)
            })
            .await;
        assert_eq!(second, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
