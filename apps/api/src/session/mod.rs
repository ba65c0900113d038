//! Per-user session state.
//!
//! A session keeps the last batch (job description, ranked entries, failures)
//! and the last selected candidate. Sessions live in memory only: they are
//! created explicitly, cleared by reset, and discarded on delete, after sitting
//! idle past the store's limit, or on restart.

pub mod handlers;

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::analysis::batch::{BatchEntry, BatchFailure, BatchReport};
use crate::analysis::ranking::{rank_by_score, select_by_name, NotFound, Selected};

/// One row of the ranked candidate table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingRow {
    pub rank: usize,
    pub candidate_id: Uuid,
    pub name: String,
    pub score: String,
    pub summary: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("No batch results in this session")]
    NoResults,

    #[error("Provide a candidate_id or a name")]
    MissingKey,

    #[error("No candidate with id {0}")]
    UnknownId(Uuid),

    #[error(transparent)]
    UnknownName(#[from] NotFound),
}

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub job_description: Option<String>,
    /// Kept in ranked order.
    pub entries: Vec<BatchEntry>,
    pub failures: Vec<BatchFailure>,
    pub selected: Option<Uuid>,
}

impl Session {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            last_active: now,
            job_description: None,
            entries: Vec::new(),
            failures: Vec::new(),
            selected: None,
        }
    }

    pub fn reset(&mut self) {
        self.job_description = None;
        self.entries.clear();
        self.failures.clear();
        self.selected = None;
    }

    /// Replaces any previous batch with this one.
    pub fn store_batch(&mut self, job_description: &str, report: BatchReport) {
        self.job_description = Some(job_description.to_string());
        self.entries = rank_by_score(report.entries);
        self.failures = report.failures;
        self.selected = None;
    }

    pub fn ranking(&self) -> Vec<RankingRow> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| RankingRow {
                rank: i + 1,
                candidate_id: entry.candidate_id,
                name: entry.comparison.name.clone(),
                score: format!("{}%", entry.comparison.match_score),
                summary: entry.comparison.summary.clone(),
            })
            .collect()
    }

    pub fn entry(&self, candidate_id: Uuid) -> Option<&BatchEntry> {
        self.entries.iter().find(|e| e.candidate_id == candidate_id)
    }

    /// Resolves a candidate by stable id, or by name when no id is given.
    pub fn select(
        &mut self,
        candidate_id: Option<Uuid>,
        name: Option<&str>,
    ) -> Result<Selected<'_, BatchEntry>, SelectionError> {
        if self.entries.is_empty() {
            return Err(SelectionError::NoResults);
        }

        let selected = match (candidate_id, name) {
            (Some(id), _) => {
                let item = self.entry(id).ok_or(SelectionError::UnknownId(id))?;
                Selected {
                    item,
                    duplicates: 0,
                }
            }
            (None, Some(name)) => select_by_name(&self.entries, name)?,
            (None, None) => return Err(SelectionError::MissingKey),
        };

        let id = selected.item.candidate_id;
        let duplicates = selected.duplicates;
        self.selected = Some(id);
        let item = self.entry(id).ok_or(SelectionError::UnknownId(id))?;
        Ok(Selected { item, duplicates })
    }
}

pub const DEFAULT_IDLE_MINUTES: i64 = 60;

/// All live sessions in this process.
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, Session>>,
    idle_limit: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::minutes(DEFAULT_IDLE_MINUTES))
    }
}

impl SessionStore {
    pub fn new(idle_limit: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_limit,
        }
    }

    pub fn create(&self) -> Session {
        let session = Session::new();
        self.lock().insert(session.id, session.clone());
        session
    }

    pub fn exists(&self, id: Uuid) -> bool {
        self.lock().contains_key(&id)
    }

    /// Runs `f` against the session, if it exists. The store lock is held for
    /// the duration of `f`, so `f` must not block or await.
    pub fn with_session<R>(&self, id: Uuid, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        self.lock().get_mut(&id).map(|session| {
            session.last_active = Utc::now();
            f(session)
        })
    }

    /// Drops sessions idle for longer than the store's limit as of `now`.
    /// Returns how many were dropped.
    pub fn sweep_idle(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|_, session| now - session.last_active <= self.idle_limit);
        before - sessions.len()
    }

    pub fn remove(&self, id: Uuid) -> Option<Session> {
        self.lock().remove(&id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Session>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::ComparisonResult;
    use crate::models::resume::ParsedResume;

    fn entry(name: &str, score: u8) -> BatchEntry {
        BatchEntry {
            candidate_id: Uuid::new_v4(),
            file_name: format!("{name}.pdf"),
            resume: ParsedResume {
                name: Some(name.to_string()),
                email: None,
                phone: None,
                summary: None,
                skills: vec![],
                education: vec![],
                experience: vec![],
            },
            comparison: ComparisonResult {
                name: name.to_string(),
                match_score: score,
                summary: format!("{name} fits"),
                strengths: vec![],
                gaps: vec![],
            },
        }
    }

    fn session_with(entries: Vec<BatchEntry>) -> Session {
        let mut session = Session::new();
        session.store_batch(
            "JD",
            BatchReport {
                entries,
                failures: vec![],
            },
        );
        session
    }

    #[test]
    fn test_store_batch_ranks_and_builds_rows() {
        let session = session_with(vec![entry("r1", 70), entry("r2", 95), entry("r3", 82)]);
        let rows = session.ranking();
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].name, "r2");
        assert_eq!(rows[0].score, "95%");
        assert_eq!(rows[2].name, "r1");
        assert_eq!(session.job_description.as_deref(), Some("JD"));
    }

    #[test]
    fn test_select_by_id_returns_stored_record() {
        let first = entry("Alex", 60);
        let second = entry("Alex", 90);
        let wanted = first.candidate_id;
        let mut session = session_with(vec![first, second]);

        let selected = session.select(Some(wanted), None).unwrap();
        assert_eq!(selected.item.comparison.match_score, 60);
        assert!(!selected.is_ambiguous());
        assert_eq!(session.selected, Some(wanted));
    }

    #[test]
    fn test_select_by_duplicate_name_picks_highest_and_flags() {
        let mut session = session_with(vec![entry("Alex", 60), entry("Alex", 90)]);
        let selected = session.select(None, Some("Alex")).unwrap();
        assert_eq!(selected.item.comparison.match_score, 90);
        assert!(selected.is_ambiguous());
    }

    #[test]
    fn test_select_unknown_name_is_not_found() {
        let mut session = session_with(vec![entry("Ada", 60)]);
        let err = session.select(None, Some("Grace")).unwrap_err();
        assert_eq!(err, SelectionError::UnknownName(NotFound("Grace".to_string())));
        assert!(session.selected.is_none());
    }

    #[test]
    fn test_select_without_results() {
        let mut session = Session::new();
        assert_eq!(
            session.select(None, Some("Ada")).unwrap_err(),
            SelectionError::NoResults
        );
    }

    #[test]
    fn test_select_requires_id_or_name() {
        let mut session = session_with(vec![entry("Ada", 60)]);
        assert_eq!(
            session.select(None, None).unwrap_err(),
            SelectionError::MissingKey
        );
    }

    #[test]
    fn test_reset_clears_batch_state() {
        let mut session = session_with(vec![entry("Ada", 60)]);
        session.reset();
        assert!(session.entries.is_empty());
        assert!(session.job_description.is_none());
        assert!(session.ranking().is_empty());
    }

    #[test]
    fn test_store_lifecycle() {
        let store = SessionStore::default();
        let session = store.create();
        assert!(store.exists(session.id));
        assert_eq!(store.len(), 1);

        let count = store.with_session(session.id, |s| s.entries.len());
        assert_eq!(count, Some(0));

        assert!(store.remove(session.id).is_some());
        assert!(!store.exists(session.id));
        assert!(store.with_session(session.id, |_| ()).is_none());
    }

    #[test]
    fn test_sweep_drops_only_idle_sessions() {
        let store = SessionStore::new(Duration::minutes(30));
        let stale = store.create();
        let fresh = store.create();
        let now = Utc::now() + Duration::minutes(45);
        store.with_session(stale.id, |s| s.last_active = now - Duration::minutes(31));
        store.with_session(fresh.id, |s| s.last_active = now - Duration::minutes(5));

        assert_eq!(store.sweep_idle(now), 1);
        assert!(!store.exists(stale.id));
        assert!(store.exists(fresh.id));
    }

    #[test]
    fn test_access_keeps_session_alive() {
        let store = SessionStore::new(Duration::minutes(30));
        let session = store.create();
        let later = Utc::now() + Duration::minutes(20);
        assert_eq!(store.sweep_idle(later), 0);

        store.with_session(session.id, |_| ());
        assert_eq!(store.sweep_idle(Utc::now() + Duration::minutes(29)), 0);
        assert_eq!(store.sweep_idle(Utc::now() + Duration::minutes(90)), 1);
    }
}
